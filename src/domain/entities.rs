// ==========================================
// Dimension entities and inventory balances
// ==========================================
// Written by the ingestion pipeline (find-or-create) and by direct form
// submission; never soft-deleted.
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default unit of measure for newly created materials.
pub const DEFAULT_UNIT: &str = "کیلوگرم";

/// Warehouse used when a row leaves the warehouse column blank.
pub const DEFAULT_WAREHOUSE_NAME: &str = "انبار اصلی";

// ==========================================
// Warehouse
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: i64,
    pub name: String,          // upsert key in the import path
    pub code: String,          // unique; default = first 10 chars of name, uppercased
    pub address: String,
    pub manager: String,
    pub phone: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Warehouse {
    /// Default warehouse code derived from the name (import-path rule).
    pub fn default_code(name: &str) -> String {
        name.chars().take(10).collect::<String>().to_uppercase()
    }
}

// ==========================================
// MaterialType
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialType {
    pub id: i64,
    pub name: String,          // identity
    pub description: String,
    pub unit: String,          // default کیلوگرم
}

// ==========================================
// Supplier / Customer
// ==========================================
// Structurally identical but distinct entities: a supplier name and a
// customer name never collapse into one row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// InventoryBalance
// ==========================================
// Keyed by (warehouse, material[, supplier]). Quantity is signed: the
// import path pre-checks stock-outs, but transfers may drive a balance
// negative (no floor at write time).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryBalance {
    pub id: i64,
    pub warehouse_id: i64,
    pub material_type_id: i64,
    pub supplier_id: Option<i64>,
    pub current_quantity: i64,
    pub last_updated: DateTime<Utc>,
}

/// Balance key as the reconciler addresses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BalanceKey {
    pub warehouse_id: i64,
    pub material_type_id: i64,
    pub supplier_id: Option<i64>,
}

impl BalanceKey {
    pub fn new(warehouse_id: i64, material_type_id: i64, supplier_id: Option<i64>) -> Self {
        Self {
            warehouse_id,
            material_type_id,
            supplier_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_code_truncates_and_uppercases() {
        assert_eq!(Warehouse::default_code("main depot"), "MAIN DEPOT");
        assert_eq!(Warehouse::default_code("abcdefghijklmn"), "ABCDEFGHIJ");
        // counts characters, not bytes
        assert_eq!(Warehouse::default_code("انبار اصلی مرکزی"), "انبار اصلی");
    }
}
