//! Pure sub-metric calculators.
//!
//! Each calculator consumes a slice of one supplier's history for one period and returns
//! the raw figures together with a 0-100 score. None of them fail: every empty
//! denominator resolves to an explicit default.

mod delivery;
mod price;
mod quality;
mod response;

pub use delivery::{delivery_timeliness, DeliveryMetrics, OrderDeliveries};
pub use price::{price_band, price_competitiveness, PriceMetrics};
pub use quality::{quality_pass_rate, QualityMetrics};
pub use response::{response_band, response_speed, ResponseMetrics};

/// Score used for price and response when there is nothing to measure.
pub const NEUTRAL_SCORE: f64 = 50.0;

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 {
        return 0.0;
    }
    round2((numerator / denominator * 100.0).clamp(0.0, 100.0))
}
