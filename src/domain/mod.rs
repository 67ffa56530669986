// ==========================================
// Domain layer
// ==========================================
// Entities, events, calendar arithmetic and the import report type.
// No data access, no pipeline logic.
// ==========================================

pub mod calendar;
pub mod entities;
pub mod events;
pub mod report;

pub use calendar::{
    gregorian_to_shamsi, is_shamsi_leap_year, shamsi_to_gregorian, to_shamsi_datetime_string,
    to_shamsi_string, ShamsiDate,
};
pub use entities::{
    BalanceKey, Customer, InventoryBalance, MaterialType, Supplier, Warehouse, DEFAULT_UNIT,
    DEFAULT_WAREHOUSE_NAME,
};
pub use events::{
    derive_total_price, new_event_id, OperationKind, StockInEvent, StockOutEvent,
    StockTransferEvent, TransferKind,
};
pub use report::{ImportReport, SHEET_ROW_OFFSET};
