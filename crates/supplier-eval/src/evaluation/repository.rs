use super::domain::{
    DateRange, OrderId, PurchaseOrder, Receipt, ReceiptLineItem, Supplier, SupplierId,
};
use super::period::EvaluationPeriod;
use super::record::EvaluationRecord;

/// Read access to the procurement history the calculators consume.
pub trait SupplierDataSource: Send + Sync {
    fn get_supplier(&self, id: &SupplierId) -> Result<Option<Supplier>, RepositoryError>;

    /// Orders placed by the supplier with an order date inside `range`.
    fn list_orders(
        &self,
        supplier_id: &SupplierId,
        range: &DateRange,
    ) -> Result<Vec<PurchaseOrder>, RepositoryError>;

    /// Receipts for one order with a receipt date inside `range`.
    fn list_receipts(
        &self,
        order_id: &OrderId,
        range: &DateRange,
    ) -> Result<Vec<Receipt>, RepositoryError>;

    /// Line items of the in-range receipts belonging to any of `order_ids`.
    fn list_receipt_items(
        &self,
        order_ids: &[OrderId],
        range: &DateRange,
    ) -> Result<Vec<ReceiptLineItem>, RepositoryError>;

    /// Average positive unit price over in-range order lines. `None` as supplier selects the
    /// market-wide average; `None` as result means no priced lines.
    fn avg_unit_price(
        &self,
        supplier_id: Option<&SupplierId>,
        range: &DateRange,
    ) -> Result<Option<f64>, RepositoryError>;

    fn list_active_material_suppliers(&self) -> Result<Vec<Supplier>, RepositoryError>;
}

/// Storage for evaluation records, keyed by (supplier, period).
pub trait EvaluationRepository: Send + Sync {
    /// Atomically fetch the record for the key, creating a pending one if absent, apply
    /// `mutate` and persist the result. Implementations must hold the row for the whole
    /// operation so that concurrent calls for the same key never duplicate it.
    fn upsert(
        &self,
        supplier: &Supplier,
        period: EvaluationPeriod,
        mutate: &mut dyn FnMut(&mut EvaluationRecord),
    ) -> Result<EvaluationRecord, RepositoryError>;

    fn fetch(
        &self,
        supplier_id: &SupplierId,
        period: EvaluationPeriod,
    ) -> Result<Option<EvaluationRecord>, RepositoryError>;

    fn list_for_period(
        &self,
        period: EvaluationPeriod,
    ) -> Result<Vec<EvaluationRecord>, RepositoryError>;

    fn list_for_supplier(
        &self,
        supplier_id: &SupplierId,
    ) -> Result<Vec<EvaluationRecord>, RepositoryError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
