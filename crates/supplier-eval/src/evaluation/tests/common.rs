use std::collections::BTreeSet;
use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::evaluation::domain::{
    DateRange, OrderId, OrderLineItem, PurchaseOrder, Receipt, ReceiptId, ReceiptLineItem,
    Supplier, SupplierCategory, SupplierId, SupplierStatus,
};
use crate::evaluation::memory::InMemorySupplierStore;
use crate::evaluation::period::EvaluationPeriod;
use crate::evaluation::record::EvaluationRecord;
use crate::evaluation::repository::{EvaluationRepository, RepositoryError, SupplierDataSource};
use crate::evaluation::service::SupplierEvaluationService;

pub(super) const PERIOD: &str = "2025-03";

pub(super) fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn march() -> DateRange {
    let period: EvaluationPeriod = PERIOD.parse().expect("valid period");
    period.date_range()
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn supplier(id: &str, code: &str) -> Supplier {
    Supplier {
        id: SupplierId(id.to_string()),
        code: code.to_string(),
        name: format!("{code} Industrial Supply"),
        status: SupplierStatus::Active,
        category: SupplierCategory::Material,
    }
}

pub(super) fn order(id: &str, supplier_id: &str, order_date: NaiveDate) -> PurchaseOrder {
    PurchaseOrder {
        id: OrderId(id.to_string()),
        supplier_id: SupplierId(supplier_id.to_string()),
        order_date,
        promised_date: None,
        required_date: None,
        submitted_at: None,
        approved_at: None,
        total_amount: 0.0,
        lines: Vec::new(),
    }
}

pub(super) fn promised(mut order: PurchaseOrder, promised_date: NaiveDate) -> PurchaseOrder {
    order.promised_date = Some(promised_date);
    order
}

pub(super) fn priced(mut order: PurchaseOrder, unit_price: f64, quantity: f64) -> PurchaseOrder {
    order.lines.push(OrderLineItem {
        order_id: order.id.clone(),
        unit_price,
        quantity,
    });
    order.total_amount += unit_price * quantity;
    order
}

pub(super) fn approved(
    mut order: PurchaseOrder,
    submitted_at: DateTime<Utc>,
    approved_at: DateTime<Utc>,
) -> PurchaseOrder {
    order.submitted_at = Some(submitted_at);
    order.approved_at = Some(approved_at);
    order
}

pub(super) fn receipt(id: &str, order_id: &str, receipt_date: NaiveDate) -> Receipt {
    Receipt {
        id: ReceiptId(id.to_string()),
        order_id: OrderId(order_id.to_string()),
        receipt_date,
    }
}

pub(super) fn inspected(receipt_id: &str, received: f64, qualified: f64) -> ReceiptLineItem {
    ReceiptLineItem {
        receipt_id: ReceiptId(receipt_id.to_string()),
        received_qty: received,
        qualified_qty: qualified,
        rejected_qty: received - qualified,
    }
}

/// Two March suppliers with hand-checked figures.
///
/// `sup-1`: one on-time and one 3-day-late delivery, 148/150 passed, unit price 9.00 against
/// a 9.67 market, 3h average approval. `sup-2`: one undelivered order at 11.00.
pub(super) fn seeded_store() -> InMemorySupplierStore {
    let store = InMemorySupplierStore::default();
    store.add_supplier(supplier("sup-1", "ACME"));
    store.add_supplier(supplier("sup-2", "BOLT"));

    store.add_order(approved(
        priced(
            promised(order("po-1", "sup-1", day(2025, 3, 2)), day(2025, 3, 10)),
            9.0,
            100.0,
        ),
        at(2025, 3, 2, 8, 0),
        at(2025, 3, 2, 10, 0),
    ));
    store.add_order(approved(
        priced(
            promised(order("po-2", "sup-1", day(2025, 3, 5)), day(2025, 3, 12)),
            9.0,
            50.0,
        ),
        at(2025, 3, 5, 9, 0),
        at(2025, 3, 5, 13, 0),
    ));
    store.add_receipt(
        receipt("gr-1", "po-1", day(2025, 3, 9)),
        vec![inspected("gr-1", 100.0, 98.0)],
    );
    store.add_receipt(
        receipt("gr-2", "po-2", day(2025, 3, 15)),
        vec![inspected("gr-2", 50.0, 50.0)],
    );

    store.add_order(priced(order("po-3", "sup-2", day(2025, 3, 3)), 11.0, 10.0));
    store
}

pub(super) type MemoryService = SupplierEvaluationService<InMemorySupplierStore, InMemorySupplierStore>;

pub(super) fn build_service(store: &InMemorySupplierStore) -> MemoryService {
    SupplierEvaluationService::new(Arc::new(store.clone()), Arc::new(store.clone()))
}

/// Data source that fails every order query for the listed suppliers.
pub(super) struct FlakySource {
    pub(super) inner: InMemorySupplierStore,
    pub(super) failing: BTreeSet<SupplierId>,
}

impl SupplierDataSource for FlakySource {
    fn get_supplier(&self, id: &SupplierId) -> Result<Option<Supplier>, RepositoryError> {
        self.inner.get_supplier(id)
    }

    fn list_orders(
        &self,
        supplier_id: &SupplierId,
        range: &DateRange,
    ) -> Result<Vec<PurchaseOrder>, RepositoryError> {
        if self.failing.contains(supplier_id) {
            return Err(RepositoryError::Unavailable("order query timed out".to_string()));
        }
        self.inner.list_orders(supplier_id, range)
    }

    fn list_receipts(
        &self,
        order_id: &OrderId,
        range: &DateRange,
    ) -> Result<Vec<Receipt>, RepositoryError> {
        self.inner.list_receipts(order_id, range)
    }

    fn list_receipt_items(
        &self,
        order_ids: &[OrderId],
        range: &DateRange,
    ) -> Result<Vec<ReceiptLineItem>, RepositoryError> {
        self.inner.list_receipt_items(order_ids, range)
    }

    fn avg_unit_price(
        &self,
        supplier_id: Option<&SupplierId>,
        range: &DateRange,
    ) -> Result<Option<f64>, RepositoryError> {
        self.inner.avg_unit_price(supplier_id, range)
    }

    fn list_active_material_suppliers(&self) -> Result<Vec<Supplier>, RepositoryError> {
        self.inner.list_active_material_suppliers()
    }
}

pub(super) struct UnavailableRepository;

impl EvaluationRepository for UnavailableRepository {
    fn upsert(
        &self,
        _supplier: &Supplier,
        _period: EvaluationPeriod,
        _mutate: &mut dyn FnMut(&mut EvaluationRecord),
    ) -> Result<EvaluationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(
        &self,
        _supplier_id: &SupplierId,
        _period: EvaluationPeriod,
    ) -> Result<Option<EvaluationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_period(
        &self,
        _period: EvaluationPeriod,
    ) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_supplier(
        &self,
        _supplier_id: &SupplierId,
    ) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
