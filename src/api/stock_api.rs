// ==========================================
// Stock API
// ==========================================
// The surface an outer shell (CLI, web frontend) calls. Owns one
// shared connection; wires the importer, the repositories and the
// exporters together. No business rules live here.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::entities::BalanceKey;
use crate::domain::report::ImportReport;
use crate::exporter;
use crate::importer::stock_importer_trait::{SheetKind, StockImporter};
use crate::importer::StockImporterImpl;
use crate::repository::{BalanceRepository, BalanceView, EntityRepository, EventRepository};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Entity and event counts for the dashboard page.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardCounts {
    pub warehouses: i64,
    pub materials: i64,
    pub suppliers: i64,
    pub customers: i64,
    pub stock_in_events: i64,
    pub stock_out_events: i64,
    pub transfer_events: i64,
}

pub struct StockApi {
    importer: StockImporterImpl,
    entities: EntityRepository,
    balances: BalanceRepository,
    events: EventRepository,
}

impl StockApi {
    /// Open (or create) the database at `db_path` and build the full
    /// stack on one shared connection.
    pub fn new(db_path: &str) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        init_schema(&conn).map_err(|e| ApiError::Storage(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ApiResult<Self> {
        Ok(Self {
            importer: StockImporterImpl::from_connection(conn.clone())?,
            entities: EntityRepository::from_connection(conn.clone())?,
            balances: BalanceRepository::from_connection(conn.clone())?,
            events: EventRepository::from_connection(conn)?,
        })
    }

    // ===== Import =====

    pub async fn import_sheet<P: AsRef<Path> + Send>(
        &self,
        kind: SheetKind,
        file_path: P,
        user: &str,
    ) -> ImportReport {
        match kind {
            SheetKind::Unified => self.importer.import_unified(file_path, user).await,
            SheetKind::StockIn => self.importer.import_stock_in(file_path, user).await,
            SheetKind::StockOut => self.importer.import_stock_out(file_path, user).await,
            SheetKind::Transfer => self.importer.import_transfers(file_path, user).await,
        }
    }

    pub async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        files: Vec<(SheetKind, P)>,
        user: &str,
    ) -> Vec<ImportReport> {
        self.importer.batch_import(files, user).await
    }

    // ===== Export =====

    pub fn write_template<P: AsRef<Path>>(&self, kind: SheetKind, path: P) -> ApiResult<()> {
        exporter::write_template(kind, path).map_err(|e| ApiError::Export(e.to_string()))
    }

    pub fn export_inventory<P: AsRef<Path>>(&self, path: P) -> ApiResult<usize> {
        exporter::export_inventory(&self.balances, path)
            .map_err(|e| ApiError::Export(e.to_string()))
    }

    // ===== Queries =====

    pub fn list_balances(&self) -> ApiResult<Vec<BalanceView>> {
        Ok(self.balances.list_balances()?)
    }

    /// Current quantity for (warehouse, material) by name; None when
    /// either entity or the balance row does not exist.
    pub fn get_quantity(&self, warehouse: &str, material: &str) -> ApiResult<Option<i64>> {
        let Some(wh) = self.entities.find_warehouse(warehouse)? else {
            return Ok(None);
        };
        let Some(mat) = self.entities.find_material(material)? else {
            return Ok(None);
        };
        let key = BalanceKey::new(wh.id, mat.id, None);
        Ok(self.balances.get_quantity(&key)?)
    }

    pub fn dashboard_counts(&self) -> ApiResult<DashboardCounts> {
        Ok(DashboardCounts {
            warehouses: self.entities.count_warehouses()?,
            materials: self.entities.count_materials()?,
            suppliers: self.entities.count_suppliers()?,
            customers: self.entities.count_customers()?,
            stock_in_events: self.events.count_stock_in()?,
            stock_out_events: self.events.count_stock_out()?,
            transfer_events: self.events.count_transfers()?,
        })
    }
}
