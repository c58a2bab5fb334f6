use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::metrics::round2;

/// Percentage weights applied to each dimension before summation.
///
/// All four fields are required together; the default is 30/30/20/20. The weights are
/// not normalized, so callers overriding them are expected to keep the sum at 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WeightFields")]
pub struct WeightConfig {
    pub delivery: f64,
    pub quality: f64,
    pub price: f64,
    pub response: f64,
}

impl WeightConfig {
    pub const fn new(delivery: f64, quality: f64, price: f64, response: f64) -> Self {
        Self {
            delivery,
            quality,
            price,
            response,
        }
    }

    pub fn total(&self) -> f64 {
        self.delivery + self.quality + self.price + self.response
    }

    fn is_valid(&self) -> bool {
        [self.delivery, self.quality, self.price, self.response]
            .iter()
            .all(|weight| weight.is_finite() && *weight >= 0.0)
    }
}

/// Wire shape of [`WeightConfig`], checked before it is accepted.
#[derive(Deserialize)]
struct WeightFields {
    delivery: f64,
    quality: f64,
    price: f64,
    response: f64,
}

impl TryFrom<WeightFields> for WeightConfig {
    type Error = WeightParseError;

    fn try_from(fields: WeightFields) -> Result<Self, Self::Error> {
        let weights = Self::new(fields.delivery, fields.quality, fields.price, fields.response);
        if weights.is_valid() {
            Ok(weights)
        } else {
            Err(WeightParseError(format!(
                "{},{},{},{}",
                fields.delivery, fields.quality, fields.price, fields.response
            )))
        }
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self::new(30.0, 30.0, 20.0, 20.0)
    }
}

/// Parses `delivery,quality,price,response`, e.g. `30,30,20,20`.
impl FromStr for WeightConfig {
    type Err = WeightParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || WeightParseError(raw.to_string());

        let parts = raw
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;

        match parts.as_slice() {
            [delivery, quality, price, response] => {
                let weights = Self::new(*delivery, *quality, *price, *response);
                if weights.is_valid() {
                    Ok(weights)
                } else {
                    Err(invalid())
                }
            }
            _ => Err(invalid()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("weights '{0}' must list four non-negative numbers (delivery,quality,price,response)")]
pub struct WeightParseError(pub String);

/// The four banded sub-scores, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub delivery: f64,
    pub quality: f64,
    pub price: f64,
    pub response: f64,
}

impl SubScores {
    /// Unrounded weighted sum, divided by 100.
    pub fn weighted(&self, weights: &WeightConfig) -> f64 {
        let sum = self.delivery * weights.delivery
            + self.quality * weights.quality
            + self.price * weights.price
            + self.response * weights.response;
        sum / 100.0
    }
}

/// Letter rating derived from the composite score. Variants are ordered lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rating {
    D,
    C,
    B,
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl Rating {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Rating::APlus
        } else if score >= 80.0 {
            Rating::A
        } else if score >= 70.0 {
            Rating::B
        } else if score >= 60.0 {
            Rating::C
        } else {
            Rating::D
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::APlus => "A+",
            Rating::A => "A",
            Rating::B => "B",
            Rating::C => "C",
            Rating::D => "D",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Overall score and rating for one set of sub-scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeScore {
    pub overall: f64,
    pub rating: Rating,
}

/// The rating is taken from the exact weighted sum; only the stored overall is rounded.
pub fn composite_score(scores: &SubScores, weights: &WeightConfig) -> CompositeScore {
    let overall = scores.weighted(weights);
    CompositeScore {
        overall: round2(overall),
        rating: Rating::from_score(overall),
    }
}
