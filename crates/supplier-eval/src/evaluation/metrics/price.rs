use serde::{Deserialize, Serialize};

use super::{round2, NEUTRAL_SCORE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceMetrics {
    pub supplier_avg_price: Option<f64>,
    pub market_avg_price: Option<f64>,
    /// Percentage deviation from the market average; negative means cheaper.
    pub vs_market_pct: f64,
    pub score: f64,
}

impl Default for PriceMetrics {
    fn default() -> Self {
        Self {
            supplier_avg_price: None,
            market_avg_price: None,
            vs_market_pct: 0.0,
            score: NEUTRAL_SCORE,
        }
    }
}

/// Compare the supplier's average paid unit price against the market baseline.
///
/// Without priced supplier lines the neutral score applies. A missing market average
/// falls back to the supplier's own average, which yields a zero deviation.
pub fn price_competitiveness(
    supplier_avg: Option<f64>,
    market_avg: Option<f64>,
) -> PriceMetrics {
    let Some(supplier_avg) = supplier_avg.filter(|price| *price > 0.0) else {
        return PriceMetrics {
            market_avg_price: market_avg,
            ..PriceMetrics::default()
        };
    };

    let market_avg = market_avg
        .filter(|price| *price > 0.0)
        .unwrap_or(supplier_avg);
    let vs_market_pct = (supplier_avg - market_avg) / market_avg * 100.0;

    PriceMetrics {
        supplier_avg_price: Some(round2(supplier_avg)),
        market_avg_price: Some(round2(market_avg)),
        vs_market_pct: round2(vs_market_pct),
        score: price_band(vs_market_pct),
    }
}

/// Map a market deviation to a score, most favorable band first.
pub fn price_band(vs_market_pct: f64) -> f64 {
    if vs_market_pct <= -20.0 {
        100.0
    } else if vs_market_pct <= -10.0 {
        90.0
    } else if vs_market_pct <= 0.0 {
        80.0
    } else if vs_market_pct <= 10.0 {
        60.0
    } else if vs_market_pct <= 20.0 {
        40.0
    } else {
        20.0
    }
}
