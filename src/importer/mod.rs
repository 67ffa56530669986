// ==========================================
// Spreadsheet ingestion pipeline
// ==========================================
// parse -> resolve columns -> per-row validate/normalize -> resolve
// entities -> record event + reconcile balance -> aggregate report.
// ==========================================

pub mod column_resolver;
pub mod date_normalizer;
pub mod error;
pub mod row_reader;
pub mod sheet_parser;
pub mod stock_importer_impl;
pub mod stock_importer_trait;

pub use column_resolver::{
    resolve_columns, CanonicalField, STOCK_IN_SHEET, STOCK_OUT_SHEET, TRANSFER_SHEET,
    UNIFIED_SHEET,
};
pub use date_normalizer::{normalize_date, ParsedDate};
pub use error::{ImportError, ImportResult};
pub use row_reader::RowReader;
pub use sheet_parser::{ParsedSheet, SheetParser};
pub use stock_importer_impl::StockImporterImpl;
pub use stock_importer_trait::{SheetKind, StockImporter};
