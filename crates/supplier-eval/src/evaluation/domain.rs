use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for suppliers registered in the vendor master.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SupplierId(pub String);

impl fmt::Display for SupplierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for purchase orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub String);

/// Identifier wrapper for goods receipts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReceiptId(pub String);

/// Lifecycle status maintained by the vendor master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierStatus {
    Active,
    Inactive,
    Blacklisted,
}

impl SupplierStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SupplierStatus::Active => "Active",
            SupplierStatus::Inactive => "Inactive",
            SupplierStatus::Blacklisted => "Blacklisted",
        }
    }
}

/// Procurement category. Only material suppliers take part in fleet-wide evaluation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierCategory {
    Material,
    Outsourcing,
    Service,
    Other,
}

/// Vendor master snapshot consumed by the evaluation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub code: String,
    pub name: String,
    pub status: SupplierStatus,
    pub category: SupplierCategory,
}

impl Supplier {
    pub fn is_batch_eligible(&self) -> bool {
        self.status == SupplierStatus::Active && self.category == SupplierCategory::Material
    }
}

/// Purchase order header along with its priced lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: OrderId,
    pub supplier_id: SupplierId,
    pub order_date: NaiveDate,
    pub promised_date: Option<NaiveDate>,
    pub required_date: Option<NaiveDate>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub total_amount: f64,
    #[serde(default)]
    pub lines: Vec<OrderLineItem>,
}

impl PurchaseOrder {
    /// Date the delivery is measured against: the promise, falling back to the requirement.
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.promised_date.or(self.required_date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub order_id: OrderId,
    pub unit_price: f64,
    pub quantity: f64,
}

/// Goods receipt posted against an order. Partial deliveries produce several receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,
    pub order_id: OrderId,
    pub receipt_date: NaiveDate,
}

/// Inspection quantities booked on a receipt line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptLineItem {
    pub receipt_id: ReceiptId,
    pub received_qty: f64,
    pub qualified_qty: f64,
    pub rejected_qty: f64,
}

/// Inclusive calendar-date window used for every storage query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn contains_instant(&self, instant: &DateTime<Utc>) -> bool {
        self.contains(instant.date_naive())
    }
}
