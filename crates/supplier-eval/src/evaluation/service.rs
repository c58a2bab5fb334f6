use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{OrderId, Supplier, SupplierId};
use super::metrics::{
    delivery_timeliness, price_competitiveness, quality_pass_rate, response_speed, round2,
    OrderDeliveries,
};
use super::period::{EvaluationPeriod, PeriodParseError};
use super::record::{EvaluationBreakdown, EvaluationRecord, EvaluationStatus};
use super::repository::{EvaluationRepository, RepositoryError, SupplierDataSource};
use super::scoring::{composite_score, WeightConfig};

/// Service composing the procurement data source, the calculators, and the record store.
pub struct SupplierEvaluationService<S, R> {
    source: Arc<S>,
    repository: Arc<R>,
    default_weights: WeightConfig,
    ranking_limit: usize,
}

/// Ranking length used when a caller does not ask for a specific one.
pub const DEFAULT_RANKING_LIMIT: usize = 10;

impl<S, R> SupplierEvaluationService<S, R>
where
    S: SupplierDataSource + 'static,
    R: EvaluationRepository + 'static,
{
    pub fn new(source: Arc<S>, repository: Arc<R>) -> Self {
        Self {
            source,
            repository,
            default_weights: WeightConfig::default(),
            ranking_limit: DEFAULT_RANKING_LIMIT,
        }
    }

    /// Replace the weights applied when a caller does not supply its own.
    pub fn with_default_weights(mut self, weights: WeightConfig) -> Self {
        self.default_weights = weights;
        self
    }

    pub fn with_ranking_limit(mut self, limit: usize) -> Self {
        self.ranking_limit = limit;
        self
    }

    pub fn default_weights(&self) -> WeightConfig {
        self.default_weights
    }

    pub fn ranking_limit(&self) -> usize {
        self.ranking_limit
    }

    /// Compute and persist the evaluation of one supplier for a `YYYY-MM` period.
    ///
    /// Re-running for the same pair overwrites the existing record in place.
    pub fn evaluate(
        &self,
        supplier_id: &SupplierId,
        period: &str,
        weights: Option<WeightConfig>,
    ) -> Result<EvaluationRecord, EvaluationServiceError> {
        let period: EvaluationPeriod = period.parse()?;
        let supplier = self
            .source
            .get_supplier(supplier_id)?
            .ok_or_else(|| EvaluationServiceError::SupplierNotFound(supplier_id.clone()))?;

        self.evaluate_supplier(
            &supplier,
            period,
            weights.unwrap_or(self.default_weights),
        )
    }

    /// Stored evaluations for a period, best overall score first.
    pub fn rank(
        &self,
        period: &str,
        limit: usize,
    ) -> Result<Vec<EvaluationRecord>, EvaluationServiceError> {
        let period: EvaluationPeriod = period.parse()?;
        let mut records = self.repository.list_for_period(period)?;
        records.sort_by(|left, right| {
            right
                .overall_score
                .total_cmp(&left.overall_score)
                .then_with(|| left.supplier_code.cmp(&right.supplier_code))
        });
        records.truncate(limit);
        Ok(records)
    }

    /// Evaluate every active material supplier, isolating failures per supplier.
    ///
    /// Only an invalid period or a failure to enumerate suppliers aborts the run.
    pub fn batch_evaluate(
        &self,
        period: &str,
        weights: Option<WeightConfig>,
    ) -> Result<BatchEvaluation, EvaluationServiceError> {
        let period: EvaluationPeriod = period.parse()?;
        let weights = weights.unwrap_or(self.default_weights);
        let suppliers = self.source.list_active_material_suppliers()?;

        let outcomes: Vec<_> = suppliers
            .iter()
            .map(|supplier| {
                self.evaluate_supplier(supplier, period, weights)
                    .map_err(|err| {
                        warn!(
                            supplier_id = %supplier.id,
                            supplier_code = %supplier.code,
                            %period,
                            error = %err,
                            "supplier evaluation failed; skipping"
                        );
                        SupplierFailure {
                            supplier_id: supplier.id.clone(),
                            supplier_code: supplier.code.clone(),
                            reason: err.to_string(),
                        }
                    })
            })
            .collect();

        let batch = BatchEvaluation { period, outcomes };
        info!(
            %period,
            suppliers = suppliers.len(),
            evaluated = batch.evaluated_count(),
            failed = batch.failures().count(),
            "batch supplier evaluation finished"
        );
        Ok(batch)
    }

    /// Fetch the stored evaluation for one supplier and period.
    pub fn get(
        &self,
        supplier_id: &SupplierId,
        period: &str,
    ) -> Result<EvaluationRecord, EvaluationServiceError> {
        let period: EvaluationPeriod = period.parse()?;
        let record = self
            .repository
            .fetch(supplier_id, period)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// A supplier's stored evaluations, most recent period first.
    pub fn history(
        &self,
        supplier_id: &SupplierId,
        limit: usize,
    ) -> Result<Vec<EvaluationRecord>, EvaluationServiceError> {
        let mut records = self.repository.list_for_supplier(supplier_id)?;
        records.sort_by(|left, right| right.period.cmp(&left.period));
        records.truncate(limit);
        Ok(records)
    }

    fn evaluate_supplier(
        &self,
        supplier: &Supplier,
        period: EvaluationPeriod,
        weights: WeightConfig,
    ) -> Result<EvaluationRecord, EvaluationServiceError> {
        let range = period.date_range();
        let orders = self.source.list_orders(&supplier.id, &range)?;

        let mut window = Vec::with_capacity(orders.len());
        for order in &orders {
            let receipts = self.source.list_receipts(&order.id, &range)?;
            window.push(OrderDeliveries { order, receipts });
        }

        let order_ids: Vec<OrderId> = orders.iter().map(|order| order.id.clone()).collect();
        let receipt_items = if order_ids.is_empty() {
            Vec::new()
        } else {
            self.source.list_receipt_items(&order_ids, &range)?
        };

        let supplier_avg = self.source.avg_unit_price(Some(&supplier.id), &range)?;
        let market_avg = self.source.avg_unit_price(None, &range)?;

        let breakdown = EvaluationBreakdown {
            delivery: delivery_timeliness(&window),
            quality: quality_pass_rate(&receipt_items),
            price: price_competitiveness(supplier_avg, market_avg),
            response: response_speed(&orders, &range),
        };
        let composite = composite_score(&breakdown.scores(), &weights);
        let total_orders = orders.len() as u32;
        let total_amount = round2(orders.iter().map(|order| order.total_amount).sum());

        let record = self
            .repository
            .upsert(supplier, period, &mut |row: &mut EvaluationRecord| {
                row.supplier_code = supplier.code.clone();
                row.supplier_name = supplier.name.clone();
                row.period_start = range.start;
                row.period_end = range.end;
                row.total_orders = total_orders;
                row.total_amount = total_amount;
                row.breakdown = breakdown.clone();
                row.weights = weights;
                row.overall_score = composite.overall;
                row.rating = composite.rating;
                row.status = EvaluationStatus::Computed;
            })?;

        debug!(
            supplier_id = %supplier.id,
            %period,
            overall = record.overall_score,
            rating = %record.rating,
            "supplier evaluation stored"
        );
        Ok(record)
    }
}

/// A supplier skipped by a batch run and the cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierFailure {
    pub supplier_id: SupplierId,
    pub supplier_code: String,
    pub reason: String,
}

/// Per-supplier results of a batch run, in enumeration order.
#[derive(Debug, Clone)]
pub struct BatchEvaluation {
    pub period: EvaluationPeriod,
    pub outcomes: Vec<Result<EvaluationRecord, SupplierFailure>>,
}

impl BatchEvaluation {
    pub fn evaluated_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_ok()).count()
    }

    pub fn records(&self) -> impl Iterator<Item = &EvaluationRecord> {
        self.outcomes.iter().filter_map(|outcome| outcome.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &SupplierFailure> {
        self.outcomes.iter().filter_map(|outcome| outcome.as_ref().err())
    }

    pub fn summary_view(&self) -> BatchSummaryView {
        BatchSummaryView {
            period: self.period,
            evaluated: self.evaluated_count(),
            failed: self.failures().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummaryView {
    pub period: EvaluationPeriod,
    pub evaluated: usize,
    pub failed: Vec<SupplierFailure>,
}

/// Error raised by the evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationServiceError {
    #[error("supplier {0} not found")]
    SupplierNotFound(SupplierId),
    #[error(transparent)]
    InvalidPeriod(#[from] PeriodParseError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
