//! Supplier performance evaluation.
//!
//! Four calculators (delivery timeliness, quality pass rate, price competitiveness,
//! response speed) feed a weighted composite score and letter rating. The service resolves
//! the supplier and period, runs the calculators over the storage collaborator's data,
//! upserts one record per (supplier, period), and offers ranking and fleet-wide batch runs.

pub mod domain;
pub mod memory;
pub mod metrics;
pub mod period;
pub mod record;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    DateRange, OrderId, OrderLineItem, PurchaseOrder, Receipt, ReceiptId, ReceiptLineItem,
    Supplier, SupplierCategory, SupplierId, SupplierStatus,
};
pub use memory::InMemorySupplierStore;
pub use period::{EvaluationPeriod, PeriodParseError};
pub use record::{
    EvaluationBreakdown, EvaluationId, EvaluationRecord, EvaluationStatus, EvaluationSummaryView,
};
pub use repository::{EvaluationRepository, RepositoryError, SupplierDataSource};
pub use router::evaluation_router;
pub use scoring::{
    composite_score, CompositeScore, Rating, SubScores, WeightConfig, WeightParseError,
};
pub use service::{
    BatchEvaluation, BatchSummaryView, EvaluationServiceError, SupplierEvaluationService,
    SupplierFailure, DEFAULT_RANKING_LIMIT,
};
