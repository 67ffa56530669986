// ==========================================
// SQLite connection setup
// ==========================================
// Every connection gets the same PRAGMA treatment: foreign_keys must be
// enabled per connection, and busy_timeout reduces spurious busy errors
// when the importer and a form submission touch the database together.
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// Default busy_timeout (milliseconds).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Apply the uniform PRAGMA set to a connection.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a connection with the uniform configuration applied.
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create all tables if absent. Idempotent; safe to run at every startup.
///
/// The balance uniqueness index uses IFNULL so that the supplierless
/// balance row of a (warehouse, material) pair is unique too — SQLite
/// treats NULLs as distinct inside plain UNIQUE constraints.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS warehouse (
            id            INTEGER PRIMARY KEY,
            name          TEXT NOT NULL UNIQUE,
            code          TEXT NOT NULL UNIQUE,
            address       TEXT NOT NULL DEFAULT '',
            manager       TEXT NOT NULL DEFAULT '',
            phone         TEXT NOT NULL DEFAULT '',
            is_active     INTEGER NOT NULL DEFAULT 1,
            created_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS material_type (
            id            INTEGER PRIMARY KEY,
            name          TEXT NOT NULL UNIQUE,
            description   TEXT NOT NULL DEFAULT '',
            unit          TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS supplier (
            id             INTEGER PRIMARY KEY,
            name           TEXT NOT NULL UNIQUE,
            contact_person TEXT NOT NULL DEFAULT '',
            phone          TEXT NOT NULL DEFAULT '',
            address        TEXT NOT NULL DEFAULT '',
            created_at     TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS customer (
            id             INTEGER PRIMARY KEY,
            name           TEXT NOT NULL UNIQUE,
            contact_person TEXT NOT NULL DEFAULT '',
            phone          TEXT NOT NULL DEFAULT '',
            address        TEXT NOT NULL DEFAULT '',
            created_at     TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS inventory_balance (
            id               INTEGER PRIMARY KEY,
            warehouse_id     INTEGER NOT NULL REFERENCES warehouse(id),
            material_type_id INTEGER NOT NULL REFERENCES material_type(id),
            supplier_id      INTEGER REFERENCES supplier(id),
            current_quantity INTEGER NOT NULL DEFAULT 0,
            last_updated     TEXT NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_inventory_balance_key
            ON inventory_balance (warehouse_id, material_type_id, IFNULL(supplier_id, 0));

        CREATE TABLE IF NOT EXISTS stock_in_event (
            event_id         TEXT PRIMARY KEY,
            warehouse_id     INTEGER NOT NULL REFERENCES warehouse(id),
            material_type_id INTEGER NOT NULL REFERENCES material_type(id),
            supplier_id      INTEGER NOT NULL REFERENCES supplier(id),
            customer_id      INTEGER REFERENCES customer(id),
            quantity         INTEGER NOT NULL DEFAULT 0,
            unit_price       INTEGER NOT NULL DEFAULT 0,
            total_price      INTEGER,
            invoice_number   TEXT NOT NULL DEFAULT '',
            notes            TEXT NOT NULL DEFAULT '',
            created_by       TEXT NOT NULL,
            created_at       TEXT NOT NULL,
            manual_date      TEXT
        );

        CREATE TABLE IF NOT EXISTS stock_out_event (
            event_id         TEXT PRIMARY KEY,
            warehouse_id     INTEGER NOT NULL REFERENCES warehouse(id),
            material_type_id INTEGER NOT NULL REFERENCES material_type(id),
            customer_id      INTEGER NOT NULL REFERENCES customer(id),
            supplier_id      INTEGER REFERENCES supplier(id),
            quantity         INTEGER NOT NULL DEFAULT 0,
            unit_price       INTEGER NOT NULL DEFAULT 0,
            total_price      INTEGER,
            invoice_number   TEXT NOT NULL DEFAULT '',
            notes            TEXT NOT NULL DEFAULT '',
            created_by       TEXT NOT NULL,
            created_at       TEXT NOT NULL,
            manual_date      TEXT
        );

        CREATE TABLE IF NOT EXISTS stock_transfer_event (
            event_id                 TEXT PRIMARY KEY,
            source_warehouse_id      INTEGER REFERENCES warehouse(id),
            destination_warehouse_id INTEGER REFERENCES warehouse(id),
            material_type_id         INTEGER NOT NULL REFERENCES material_type(id),
            transfer_kind            TEXT NOT NULL,
            quantity                 INTEGER NOT NULL DEFAULT 0,
            notes                    TEXT NOT NULL DEFAULT '',
            created_by               TEXT NOT NULL,
            created_at               TEXT NOT NULL,
            manual_date              TEXT
        );
        "#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
    }

    #[test]
    fn test_balance_key_unique_with_null_supplier() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO warehouse (name, code, created_at) VALUES ('w', 'W', '2025-01-01')",
            [],
        )
        .unwrap();
        conn.execute("INSERT INTO material_type (name, unit) VALUES ('m', 'kg')", [])
            .unwrap();

        conn.execute(
            "INSERT INTO inventory_balance (warehouse_id, material_type_id, supplier_id, current_quantity, last_updated)
             VALUES (1, 1, NULL, 0, '2025-01-01')",
            [],
        )
        .unwrap();

        let dup = conn.execute(
            "INSERT INTO inventory_balance (warehouse_id, material_type_id, supplier_id, current_quantity, last_updated)
             VALUES (1, 1, NULL, 0, '2025-01-01')",
            [],
        );
        assert!(dup.is_err());
    }
}
