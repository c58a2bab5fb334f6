use serde::{Deserialize, Serialize};

use super::super::domain::{DateRange, PurchaseOrder};
use super::{round2, NEUTRAL_SCORE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetrics {
    pub measured_orders: u32,
    pub avg_hours: f64,
    pub score: f64,
}

impl Default for ResponseMetrics {
    fn default() -> Self {
        Self {
            measured_orders: 0,
            avg_hours: 0.0,
            score: NEUTRAL_SCORE,
        }
    }
}

/// Average submission-to-approval turnaround for orders whose timestamps both fall in range.
///
/// An approval stamped before its submission counts as an immediate (0h) turnaround.
pub fn response_speed(orders: &[PurchaseOrder], range: &DateRange) -> ResponseMetrics {
    let durations: Vec<f64> = orders
        .iter()
        .filter_map(|order| match (&order.submitted_at, &order.approved_at) {
            (Some(submitted), Some(approved))
                if range.contains_instant(submitted) && range.contains_instant(approved) =>
            {
                let seconds = (*approved - *submitted).num_seconds().max(0);
                Some(seconds as f64 / 3600.0)
            }
            _ => None,
        })
        .collect();

    if durations.is_empty() {
        return ResponseMetrics::default();
    }

    let avg_hours = durations.iter().sum::<f64>() / durations.len() as f64;

    ResponseMetrics {
        measured_orders: durations.len() as u32,
        avg_hours: round2(avg_hours),
        score: response_band(avg_hours),
    }
}

/// Banded score for an average turnaround; beyond two days it decays by 5 points per day
/// down to a floor of 30.
pub fn response_band(avg_hours: f64) -> f64 {
    if avg_hours <= 4.0 {
        100.0
    } else if avg_hours <= 8.0 {
        90.0
    } else if avg_hours <= 24.0 {
        80.0
    } else if avg_hours <= 48.0 {
        60.0
    } else {
        round2((60.0 - (avg_hours - 48.0) / 24.0 * 5.0).max(30.0))
    }
}
