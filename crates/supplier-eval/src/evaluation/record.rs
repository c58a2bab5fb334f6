use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Supplier, SupplierId};
use super::metrics::{DeliveryMetrics, PriceMetrics, QualityMetrics, ResponseMetrics};
use super::period::EvaluationPeriod;
use super::scoring::{Rating, SubScores, WeightConfig};

/// Store-assigned identifier of an evaluation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EvaluationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Pending,
    Computed,
}

impl EvaluationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EvaluationStatus::Pending => "Pending",
            EvaluationStatus::Computed => "Computed",
        }
    }
}

/// Audit trail of every raw figure behind the sub-scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationBreakdown {
    pub delivery: DeliveryMetrics,
    pub quality: QualityMetrics,
    pub price: PriceMetrics,
    pub response: ResponseMetrics,
}

impl EvaluationBreakdown {
    pub fn scores(&self) -> SubScores {
        SubScores {
            delivery: self.delivery.score,
            quality: self.quality.score,
            price: self.price.score,
            response: self.response.score,
        }
    }
}

/// Persisted evaluation of one supplier for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: EvaluationId,
    pub supplier_id: SupplierId,
    pub supplier_code: String,
    pub supplier_name: String,
    pub period: EvaluationPeriod,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_orders: u32,
    pub total_amount: f64,
    pub breakdown: EvaluationBreakdown,
    pub weights: WeightConfig,
    pub overall_score: f64,
    pub rating: Rating,
    pub status: EvaluationStatus,
}

impl EvaluationRecord {
    /// Fresh row as created by the store on first evaluation of a (supplier, period) pair.
    pub fn pending(id: EvaluationId, supplier: &Supplier, period: EvaluationPeriod) -> Self {
        Self {
            id,
            supplier_id: supplier.id.clone(),
            supplier_code: supplier.code.clone(),
            supplier_name: supplier.name.clone(),
            period,
            period_start: period.first_day(),
            period_end: period.last_day(),
            total_orders: 0,
            total_amount: 0.0,
            breakdown: EvaluationBreakdown::default(),
            weights: WeightConfig::default(),
            overall_score: 0.0,
            rating: Rating::D,
            status: EvaluationStatus::Pending,
        }
    }

    pub fn scores(&self) -> SubScores {
        self.breakdown.scores()
    }

    pub fn summary_view(&self) -> EvaluationSummaryView {
        let scores = self.scores();
        EvaluationSummaryView {
            supplier_id: self.supplier_id.clone(),
            supplier_code: self.supplier_code.clone(),
            supplier_name: self.supplier_name.clone(),
            period: self.period,
            total_orders: self.total_orders,
            delivery_score: scores.delivery,
            quality_score: scores.quality,
            price_score: scores.price,
            response_score: scores.response,
            overall_score: self.overall_score,
            rating: self.rating.label(),
        }
    }
}

/// Compact ranking row exposed to report consumers.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationSummaryView {
    pub supplier_id: SupplierId,
    pub supplier_code: String,
    pub supplier_name: String,
    pub period: EvaluationPeriod,
    pub total_orders: u32,
    pub delivery_score: f64,
    pub quality_score: f64,
    pub price_score: f64,
    pub response_score: f64,
    pub overall_score: f64,
    pub rating: &'static str,
}
