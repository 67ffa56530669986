// ==========================================
// Stock movement events
// ==========================================
// The originating records behind every balance mutation. Balances are
// mutated by the reconciler, not by event construction; events are the
// only audit trail.
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operation tag of a unified-sheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    StockIn,
    StockOut,
}

impl OperationKind {
    /// Recognize the exact literal tags of the unified sheet:
    /// the Persian spelling or the ASCII fallback.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "ورودی" | "in" => Some(Self::StockIn),
            "خروجی" | "out" => Some(Self::StockOut),
            _ => None,
        }
    }
}

/// Direction tag of a transfer-sheet row; matched by substring, not
/// exact value ("انتقال به انبار", "to warehouse", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferKind {
    ToWarehouse,
    FromWarehouse,
}

impl TransferKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.contains("به انبار") || tag.contains("to warehouse") {
            Some(Self::ToWarehouse)
        } else if tag.contains("از انبار") || tag.contains("from warehouse") {
            Some(Self::FromWarehouse)
        } else {
            None
        }
    }
}

// ==========================================
// StockInEvent
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockInEvent {
    pub event_id: String, // UUID
    pub warehouse_id: i64,
    pub material_type_id: i64,
    pub supplier_id: i64,
    pub customer_id: Option<i64>,
    pub quantity: i64,
    pub unit_price: i64,
    pub total_price: Option<i64>, // quantity * unit_price when both present
    pub invoice_number: String,
    pub notes: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub manual_date: Option<NaiveDate>, // business date entered on the sheet
}

// ==========================================
// StockOutEvent
// ==========================================
// Mirror of StockInEvent with the customer as primary counterparty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockOutEvent {
    pub event_id: String,
    pub warehouse_id: i64,
    pub material_type_id: i64,
    pub customer_id: i64,
    pub supplier_id: Option<i64>, // optional supplier attribution
    pub quantity: i64,
    pub unit_price: i64,
    pub total_price: Option<i64>,
    pub invoice_number: String,
    pub notes: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub manual_date: Option<NaiveDate>,
}

// ==========================================
// StockTransferEvent
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockTransferEvent {
    pub event_id: String,
    pub source_warehouse_id: Option<i64>,
    pub destination_warehouse_id: Option<i64>,
    pub material_type_id: i64,
    pub kind: TransferKind,
    pub quantity: i64,
    pub notes: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub manual_date: Option<NaiveDate>,
}

/// quantity * unit_price, or None when either side is absent/zero.
pub fn derive_total_price(quantity: i64, unit_price: i64) -> Option<i64> {
    if quantity != 0 && unit_price != 0 {
        Some(quantity * unit_price)
    } else {
        None
    }
}

pub fn new_event_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_kind_tags() {
        assert_eq!(OperationKind::from_tag("ورودی"), Some(OperationKind::StockIn));
        assert_eq!(OperationKind::from_tag(" خروجی "), Some(OperationKind::StockOut));
        assert_eq!(OperationKind::from_tag("in"), Some(OperationKind::StockIn));
        assert_eq!(OperationKind::from_tag("out"), Some(OperationKind::StockOut));
        assert_eq!(OperationKind::from_tag("انتقال"), None);
        assert_eq!(OperationKind::from_tag(""), None);
    }

    #[test]
    fn test_transfer_kind_substring_match() {
        assert_eq!(
            TransferKind::from_tag("انتقال به انبار"),
            Some(TransferKind::ToWarehouse)
        );
        assert_eq!(
            TransferKind::from_tag("انتقال از انبار"),
            Some(TransferKind::FromWarehouse)
        );
        assert_eq!(
            TransferKind::from_tag("move to warehouse B"),
            Some(TransferKind::ToWarehouse)
        );
        assert_eq!(TransferKind::from_tag("جابجایی"), None);
    }

    #[test]
    fn test_derive_total_price() {
        assert_eq!(derive_total_price(1000, 15000), Some(15_000_000));
        assert_eq!(derive_total_price(0, 15000), None);
        assert_eq!(derive_total_price(1000, 0), None);
    }
}
