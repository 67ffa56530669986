// ==========================================
// Stock movement event repository
// ==========================================
// Append-only audit trail. Inserting an event never touches the
// inventory_balance table; the reconciler does that separately.
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::events::{StockInEvent, StockOutEvent, StockTransferEvent, TransferKind};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

fn transfer_kind_tag(kind: TransferKind) -> &'static str {
    match kind {
        TransferKind::ToWarehouse => "to_warehouse",
        TransferKind::FromWarehouse => "from_warehouse",
    }
}

pub struct EventRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EventRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::Lock(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::Lock(e.to_string()))
    }

    pub fn insert_stock_in(&self, event: &StockInEvent) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO stock_in_event
                 (event_id, warehouse_id, material_type_id, supplier_id, customer_id,
                  quantity, unit_price, total_price, invoice_number, notes,
                  created_by, created_at, manual_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                event.event_id,
                event.warehouse_id,
                event.material_type_id,
                event.supplier_id,
                event.customer_id,
                event.quantity,
                event.unit_price,
                event.total_price,
                event.invoice_number,
                event.notes,
                event.created_by,
                event.created_at.to_rfc3339(),
                event.manual_date.map(|d| d.to_string()),
            ],
        )?;
        Ok(())
    }

    pub fn insert_stock_out(&self, event: &StockOutEvent) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO stock_out_event
                 (event_id, warehouse_id, material_type_id, customer_id, supplier_id,
                  quantity, unit_price, total_price, invoice_number, notes,
                  created_by, created_at, manual_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                event.event_id,
                event.warehouse_id,
                event.material_type_id,
                event.customer_id,
                event.supplier_id,
                event.quantity,
                event.unit_price,
                event.total_price,
                event.invoice_number,
                event.notes,
                event.created_by,
                event.created_at.to_rfc3339(),
                event.manual_date.map(|d| d.to_string()),
            ],
        )?;
        Ok(())
    }

    pub fn insert_transfer(&self, event: &StockTransferEvent) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO stock_transfer_event
                 (event_id, source_warehouse_id, destination_warehouse_id, material_type_id,
                  transfer_kind, quantity, notes, created_by, created_at, manual_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                event.event_id,
                event.source_warehouse_id,
                event.destination_warehouse_id,
                event.material_type_id,
                transfer_kind_tag(event.kind),
                event.quantity,
                event.notes,
                event.created_by,
                event.created_at.to_rfc3339(),
                event.manual_date.map(|d| d.to_string()),
            ],
        )?;
        Ok(())
    }

    pub fn count_stock_in(&self) -> RepositoryResult<i64> {
        self.count_table("stock_in_event")
    }

    pub fn count_stock_out(&self) -> RepositoryResult<i64> {
        self.count_table("stock_out_event")
    }

    pub fn count_transfers(&self) -> RepositoryResult<i64> {
        self.count_table("stock_transfer_event")
    }

    fn count_table(&self, table: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?;
        Ok(n)
    }
}
