use serde::{Deserialize, Serialize};

use super::super::domain::ReceiptLineItem;
use super::percentage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub pass_rate: f64,
    pub received_qty: f64,
    pub qualified_qty: f64,
    pub rejected_qty: f64,
    pub score: f64,
}

impl Default for QualityMetrics {
    fn default() -> Self {
        Self {
            pass_rate: 0.0,
            received_qty: 0.0,
            qualified_qty: 0.0,
            rejected_qty: 0.0,
            score: 0.0,
        }
    }
}

pub fn quality_pass_rate(items: &[ReceiptLineItem]) -> QualityMetrics {
    let (received_qty, qualified_qty, rejected_qty) =
        items
            .iter()
            .fold((0.0, 0.0, 0.0), |(received, qualified, rejected), item| {
                (
                    received + item.received_qty,
                    qualified + item.qualified_qty,
                    rejected + item.rejected_qty,
                )
            });

    // Inspection data is not cross-checked, so the rate is clamped to 0-100.
    let pass_rate = percentage(qualified_qty, received_qty);

    QualityMetrics {
        pass_rate,
        received_qty,
        qualified_qty,
        rejected_qty,
        score: pass_rate,
    }
}
