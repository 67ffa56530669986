// ==========================================
// Inventory balance repository (reconciler)
// ==========================================
// All balance mutations go through here. Credits create the balance row
// at zero first; checked debits decrement through a single conditional
// UPDATE (quantity guard in the WHERE clause) so the availability check
// and the write cannot race; transfer debits skip missing source rows
// instead of creating them.
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::entities::{BalanceKey, InventoryBalance};
use crate::repository::entity_repo::parse_timestamp;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

/// Outcome of a checked debit (stock-out path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebitOutcome {
    /// Balance decremented.
    Applied,
    /// Balance exists but holds less than requested; nothing written.
    Insufficient { available: i64 },
    /// No balance row for the key; nothing written.
    NotFound,
}

/// Outcome of a transfer-side debit. Unlike the checked debit it never
/// refuses on quantity: a transfer out of an existing balance may drive
/// it negative. A missing source row is a recorded no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferDebitOutcome {
    Applied,
    SourceMissing,
}

/// A balance row joined with its dimension names, as the export and
/// listing surfaces present it.
#[derive(Debug, Clone)]
pub struct BalanceView {
    pub warehouse_name: String,
    pub material_name: String,
    pub supplier_name: Option<String>,
    pub unit: String,
    pub current_quantity: i64,
    pub last_updated: chrono::DateTime<Utc>,
}

pub struct BalanceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BalanceRepository {
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

    /// Current quantity for a key, or None when no balance row exists.
    pub fn get_quantity(&self, key: &BalanceKey) -> RepositoryResult<Option<i64>> {
        let conn = self.get_conn()?;
        let qty = conn
            .query_row(
                "SELECT current_quantity FROM inventory_balance
                 WHERE warehouse_id = ?1 AND material_type_id = ?2 AND supplier_id IS ?3",
                params![key.warehouse_id, key.material_type_id, key.supplier_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(qty)
    }

    /// Increment a balance, creating the row at zero first when absent.
    /// Returns the quantity after the credit.
    pub fn credit(&self, key: &BalanceKey, amount: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let now = Utc::now().to_rfc3339();

        let updated = conn.execute(
            "UPDATE inventory_balance
             SET current_quantity = current_quantity + ?4, last_updated = ?5
             WHERE warehouse_id = ?1 AND material_type_id = ?2 AND supplier_id IS ?3",
            params![
                key.warehouse_id,
                key.material_type_id,
                key.supplier_id,
                amount,
                now
            ],
        )?;

        if updated == 0 {
            conn.execute(
                "INSERT INTO inventory_balance
                     (warehouse_id, material_type_id, supplier_id, current_quantity, last_updated)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    key.warehouse_id,
                    key.material_type_id,
                    key.supplier_id,
                    amount,
                    now
                ],
            )?;
        }

        let qty = conn.query_row(
            "SELECT current_quantity FROM inventory_balance
             WHERE warehouse_id = ?1 AND material_type_id = ?2 AND supplier_id IS ?3",
            params![key.warehouse_id, key.material_type_id, key.supplier_id],
            |row| row.get(0),
        )?;
        Ok(qty)
    }

    /// Decrement a balance only when it currently holds at least
    /// `amount`. The guard lives inside the UPDATE's WHERE clause, so
    /// check and write are one statement.
    pub fn debit_checked(&self, key: &BalanceKey, amount: i64) -> RepositoryResult<DebitOutcome> {
        let conn = self.get_conn()?;
        let now = Utc::now().to_rfc3339();

        let updated = conn.execute(
            "UPDATE inventory_balance
             SET current_quantity = current_quantity - ?4, last_updated = ?5
             WHERE warehouse_id = ?1 AND material_type_id = ?2 AND supplier_id IS ?3
               AND current_quantity >= ?4",
            params![
                key.warehouse_id,
                key.material_type_id,
                key.supplier_id,
                amount,
                now
            ],
        )?;
        if updated > 0 {
            return Ok(DebitOutcome::Applied);
        }

        // Refused or absent; distinguish for the caller's message.
        let available: Option<i64> = conn
            .query_row(
                "SELECT current_quantity FROM inventory_balance
                 WHERE warehouse_id = ?1 AND material_type_id = ?2 AND supplier_id IS ?3",
                params![key.warehouse_id, key.material_type_id, key.supplier_id],
                |row| row.get(0),
            )
            .optional()?;

        match available {
            Some(available) => Ok(DebitOutcome::Insufficient { available }),
            None => Ok(DebitOutcome::NotFound),
        }
    }

    /// Transfer-side debit: decrement an existing balance without a
    /// quantity guard, and do nothing when the row does not exist.
    pub fn debit_if_exists(
        &self,
        key: &BalanceKey,
        amount: i64,
    ) -> RepositoryResult<TransferDebitOutcome> {
        let conn = self.get_conn()?;
        let now = Utc::now().to_rfc3339();

        let updated = conn.execute(
            "UPDATE inventory_balance
             SET current_quantity = current_quantity - ?4, last_updated = ?5
             WHERE warehouse_id = ?1 AND material_type_id = ?2 AND supplier_id IS ?3",
            params![
                key.warehouse_id,
                key.material_type_id,
                key.supplier_id,
                amount,
                now
            ],
        )?;

        if updated > 0 {
            Ok(TransferDebitOutcome::Applied)
        } else {
            Ok(TransferDebitOutcome::SourceMissing)
        }
    }

    /// All balances joined with dimension names, ordered for display
    /// and export.
    pub fn list_balances(&self) -> RepositoryResult<Vec<BalanceView>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT w.name, m.name, s.name, m.unit, b.current_quantity, b.last_updated
             FROM inventory_balance b
             JOIN warehouse w ON w.id = b.warehouse_id
             JOIN material_type m ON m.id = b.material_type_id
             LEFT JOIN supplier s ON s.id = b.supplier_id
             ORDER BY w.name, m.name, s.name",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(BalanceView {
                warehouse_name: row.get(0)?,
                material_name: row.get(1)?,
                supplier_name: row.get(2)?,
                unit: row.get(3)?,
                current_quantity: row.get(4)?,
                last_updated: parse_timestamp(row.get::<_, String>(5)?),
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
