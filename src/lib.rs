// ==========================================
// Warehouse inventory tracker - core library
// ==========================================
// Stock-in / stock-out / transfer events over per-warehouse material
// balances, with spreadsheet ingestion and Shamsi calendar handling.
// ==========================================

// Initialize internationalization
rust_i18n::i18n!("locales", fallback = "fa");

// ==========================================
// Module declarations
// ==========================================

// Domain layer: entities, events, calendar, report
pub mod domain;

// Data access layer
pub mod repository;

// Spreadsheet ingestion pipeline
pub mod importer;

// Templates and inventory report
pub mod exporter;

// Configuration
pub mod config;

// Database infrastructure (connection init / uniform PRAGMAs)
pub mod db;

// Logging
pub mod logging;

// Internationalization helpers
pub mod i18n;

// API layer
pub mod api;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    gregorian_to_shamsi, shamsi_to_gregorian, to_shamsi_string, BalanceKey, Customer,
    ImportReport, InventoryBalance, MaterialType, OperationKind, ShamsiDate, StockInEvent,
    StockOutEvent, StockTransferEvent, Supplier, TransferKind, Warehouse,
};

pub use repository::{
    BalanceRepository, DebitOutcome, EntityRepository, EventRepository, TransferDebitOutcome,
};

pub use importer::{normalize_date, ParsedDate, SheetKind, StockImporter, StockImporterImpl};

pub use api::{ApiError, ApiResult, DashboardCounts, StockApi};

pub use config::{config, init_config, AppConfig};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "سیستم انبارداری آهن";
