use serde::{Deserialize, Serialize};

use super::super::domain::{PurchaseOrder, Receipt};
use super::{percentage, round2};

/// An in-period order paired with the receipts booked against it inside the same period.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDeliveries<'a> {
    pub order: &'a PurchaseOrder,
    pub receipts: Vec<Receipt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryMetrics {
    pub on_time_rate: f64,
    pub on_time_orders: u32,
    pub late_orders: u32,
    pub avg_delay_days: f64,
    pub score: f64,
}

impl Default for DeliveryMetrics {
    fn default() -> Self {
        Self {
            on_time_rate: 0.0,
            on_time_orders: 0,
            late_orders: 0,
            avg_delay_days: 0.0,
            score: 0.0,
        }
    }
}

/// Tally on-time versus late deliveries.
///
/// The earliest receipt is the delivered-on date. Orders with no receipt, or with neither a
/// promised nor a required date, stay out of the ratio.
pub fn delivery_timeliness(window: &[OrderDeliveries<'_>]) -> DeliveryMetrics {
    let mut on_time_orders: u32 = 0;
    let mut late_orders: u32 = 0;
    let mut total_delay_days: i64 = 0;

    for entry in window {
        let Some(delivered_on) = entry.receipts.iter().map(|r| r.receipt_date).min() else {
            continue;
        };
        let Some(due_date) = entry.order.due_date() else {
            continue;
        };

        if delivered_on <= due_date {
            on_time_orders += 1;
        } else {
            late_orders += 1;
            total_delay_days += (delivered_on - due_date).num_days();
        }
    }

    let on_time_rate = percentage(
        f64::from(on_time_orders),
        f64::from(on_time_orders + late_orders),
    );
    let avg_delay_days = if late_orders == 0 {
        0.0
    } else {
        round2(total_delay_days as f64 / f64::from(late_orders))
    };

    DeliveryMetrics {
        on_time_rate,
        on_time_orders,
        late_orders,
        avg_delay_days,
        score: on_time_rate,
    }
}
