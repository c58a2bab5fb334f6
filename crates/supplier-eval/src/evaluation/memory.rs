use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::domain::{
    DateRange, OrderId, PurchaseOrder, Receipt, ReceiptId, ReceiptLineItem, Supplier, SupplierId,
};
use super::period::EvaluationPeriod;
use super::record::{EvaluationId, EvaluationRecord};
use super::repository::{EvaluationRepository, RepositoryError, SupplierDataSource};

/// Process-local store backing both the procurement history and the evaluation table.
///
/// Used by the API service and tests. Clones share the same underlying state.
#[derive(Default, Clone)]
pub struct InMemorySupplierStore {
    suppliers: Arc<Mutex<BTreeMap<SupplierId, Supplier>>>,
    history: Arc<Mutex<ProcurementHistory>>,
    evaluations: Arc<Mutex<EvaluationTable>>,
}

#[derive(Default)]
struct ProcurementHistory {
    orders: Vec<PurchaseOrder>,
    receipts: Vec<Receipt>,
    receipt_items: Vec<ReceiptLineItem>,
}

#[derive(Default)]
struct EvaluationTable {
    last_id: u64,
    rows: BTreeMap<(SupplierId, EvaluationPeriod), EvaluationRecord>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
}

impl InMemorySupplierStore {
    pub fn add_supplier(&self, supplier: Supplier) {
        self.suppliers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(supplier.id.clone(), supplier);
    }

    pub fn add_order(&self, order: PurchaseOrder) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .orders
            .push(order);
    }

    /// Record a goods receipt together with its inspected lines.
    pub fn add_receipt(&self, receipt: Receipt, items: Vec<ReceiptLineItem>) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history.receipts.push(receipt);
        history.receipt_items.extend(items);
    }

    pub fn evaluation_count(&self) -> usize {
        self.evaluations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .rows
            .len()
    }
}

impl SupplierDataSource for InMemorySupplierStore {
    fn get_supplier(&self, id: &SupplierId) -> Result<Option<Supplier>, RepositoryError> {
        Ok(lock(&self.suppliers)?.get(id).cloned())
    }

    fn list_orders(
        &self,
        supplier_id: &SupplierId,
        range: &DateRange,
    ) -> Result<Vec<PurchaseOrder>, RepositoryError> {
        let history = lock(&self.history)?;
        Ok(history
            .orders
            .iter()
            .filter(|order| &order.supplier_id == supplier_id && range.contains(order.order_date))
            .cloned()
            .collect())
    }

    fn list_receipts(
        &self,
        order_id: &OrderId,
        range: &DateRange,
    ) -> Result<Vec<Receipt>, RepositoryError> {
        let history = lock(&self.history)?;
        Ok(history
            .receipts
            .iter()
            .filter(|receipt| &receipt.order_id == order_id && range.contains(receipt.receipt_date))
            .cloned()
            .collect())
    }

    fn list_receipt_items(
        &self,
        order_ids: &[OrderId],
        range: &DateRange,
    ) -> Result<Vec<ReceiptLineItem>, RepositoryError> {
        let history = lock(&self.history)?;
        let receipt_ids: BTreeSet<&ReceiptId> = history
            .receipts
            .iter()
            .filter(|receipt| {
                order_ids.contains(&receipt.order_id) && range.contains(receipt.receipt_date)
            })
            .map(|receipt| &receipt.id)
            .collect();

        Ok(history
            .receipt_items
            .iter()
            .filter(|item| receipt_ids.contains(&item.receipt_id))
            .cloned()
            .collect())
    }

    fn avg_unit_price(
        &self,
        supplier_id: Option<&SupplierId>,
        range: &DateRange,
    ) -> Result<Option<f64>, RepositoryError> {
        let history = lock(&self.history)?;
        let (sum, count) = history
            .orders
            .iter()
            .filter(|order| range.contains(order.order_date))
            .filter(|order| supplier_id.map_or(true, |id| &order.supplier_id == id))
            .flat_map(|order| order.lines.iter())
            .filter(|line| line.unit_price > 0.0)
            .fold((0.0, 0_u32), |(sum, count), line| {
                (sum + line.unit_price, count + 1)
            });

        Ok((count > 0).then(|| sum / f64::from(count)))
    }

    fn list_active_material_suppliers(&self) -> Result<Vec<Supplier>, RepositoryError> {
        Ok(lock(&self.suppliers)?
            .values()
            .filter(|supplier| supplier.is_batch_eligible())
            .cloned()
            .collect())
    }
}

impl EvaluationRepository for InMemorySupplierStore {
    fn upsert(
        &self,
        supplier: &Supplier,
        period: EvaluationPeriod,
        mutate: &mut dyn FnMut(&mut EvaluationRecord),
    ) -> Result<EvaluationRecord, RepositoryError> {
        let mut table = lock(&self.evaluations)?;
        let EvaluationTable { last_id, rows } = &mut *table;

        let record = rows
            .entry((supplier.id.clone(), period))
            .or_insert_with(|| {
                *last_id += 1;
                EvaluationRecord::pending(EvaluationId(*last_id), supplier, period)
            });
        mutate(record);
        Ok(record.clone())
    }

    fn fetch(
        &self,
        supplier_id: &SupplierId,
        period: EvaluationPeriod,
    ) -> Result<Option<EvaluationRecord>, RepositoryError> {
        let table = lock(&self.evaluations)?;
        Ok(table.rows.get(&(supplier_id.clone(), period)).cloned())
    }

    fn list_for_period(
        &self,
        period: EvaluationPeriod,
    ) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        let table = lock(&self.evaluations)?;
        Ok(table
            .rows
            .values()
            .filter(|record| record.period == period)
            .cloned()
            .collect())
    }

    fn list_for_supplier(
        &self,
        supplier_id: &SupplierId,
    ) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        let table = lock(&self.evaluations)?;
        Ok(table
            .rows
            .values()
            .filter(|record| &record.supplier_id == supplier_id)
            .cloned()
            .collect())
    }
}
