// ==========================================
// Stock import interface
// ==========================================
// Interface only; the pipeline implementation lives in
// stock_importer_impl. One call processes one file to completion and
// always returns a report, never an Err: file-level failures become
// the report's only error entry.
// ==========================================

use crate::domain::report::ImportReport;
use async_trait::async_trait;
use std::path::Path;

/// Which ingest schema a file follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    /// In and out rows mixed, discriminated by the operation column.
    Unified,
    StockIn,
    StockOut,
    Transfer,
}

// ==========================================
// StockImporter Trait
// ==========================================
#[async_trait]
pub trait StockImporter: Send + Sync {
    /// Import a unified in/out sheet.
    ///
    /// Pipeline per row: resolve columns (file-level, fail-fast) ->
    /// validate and coerce fields -> normalize the business date ->
    /// find-or-create dimension entities -> record the event and
    /// reconcile the balance -> append one report entry.
    async fn import_unified<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        user: &str,
    ) -> ImportReport;

    /// Import a dedicated stock-in sheet (supplier counterparty).
    async fn import_stock_in<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        user: &str,
    ) -> ImportReport;

    /// Import a dedicated stock-out sheet (customer counterparty).
    async fn import_stock_out<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        user: &str,
    ) -> ImportReport;

    /// Import an inter-warehouse transfer sheet.
    async fn import_transfers<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        user: &str,
    ) -> ImportReport;

    /// Import several files concurrently. Files are independent; one
    /// file's failure only shows up in its own report.
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        files: Vec<(SheetKind, P)>,
        user: &str,
    ) -> Vec<ImportReport>;
}
