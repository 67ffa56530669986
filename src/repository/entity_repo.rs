// ==========================================
// Dimension entity repository
// ==========================================
// Find-by-name-or-create-with-defaults for warehouses, materials,
// suppliers and customers. The upsert is idempotent: repeated imports of
// the same names never create duplicate dimension rows.
// No business rules here beyond the documented creation defaults.
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::entities::{Customer, MaterialType, Supplier, Warehouse, DEFAULT_UNIT};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

/// Resolution outcome: the entity plus whether this call created it.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub entity: T,
    pub created: bool,
}

pub struct EntityRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EntityRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Reuse an existing connection; re-applies the uniform PRAGMAs
    /// (idempotent) so behavior does not depend on who opened it.
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

    // ===== Warehouse =====

    /// Read-only lookup by name.
    pub fn find_warehouse(&self, name: &str) -> RepositoryResult<Option<Warehouse>> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                "SELECT id, name, code, address, manager, phone, is_active, created_at
                 FROM warehouse WHERE name = ?1",
                params![name],
                map_warehouse,
            )
            .optional()?;
        Ok(found)
    }

    /// Find a warehouse by name, creating it with defaults when absent:
    /// code = first 10 chars of the name uppercased, active = true.
    pub fn find_or_create_warehouse(&self, name: &str) -> RepositoryResult<Resolved<Warehouse>> {
        let conn = self.get_conn()?;

        if let Some(existing) = conn
            .query_row(
                "SELECT id, name, code, address, manager, phone, is_active, created_at
                 FROM warehouse WHERE name = ?1",
                params![name],
                map_warehouse,
            )
            .optional()?
        {
            return Ok(Resolved {
                entity: existing,
                created: false,
            });
        }

        let now = Utc::now();
        let code = Warehouse::default_code(name);
        conn.execute(
            "INSERT INTO warehouse (name, code, is_active, created_at) VALUES (?1, ?2, 1, ?3)",
            params![name, code, now.to_rfc3339()],
        )?;
        let id = conn.last_insert_rowid();

        Ok(Resolved {
            entity: Warehouse {
                id,
                name: name.to_string(),
                code,
                address: String::new(),
                manager: String::new(),
                phone: String::new(),
                is_active: true,
                created_at: now,
            },
            created: true,
        })
    }

    // ===== MaterialType =====

    /// Read-only lookup by name.
    pub fn find_material(&self, name: &str) -> RepositoryResult<Option<MaterialType>> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                "SELECT id, name, description, unit FROM material_type WHERE name = ?1",
                params![name],
                |row| {
                    Ok(MaterialType {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                        unit: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(found)
    }

    /// Find a material by name, creating it with the default unit.
    pub fn find_or_create_material(&self, name: &str) -> RepositoryResult<Resolved<MaterialType>> {
        let conn = self.get_conn()?;

        if let Some(existing) = conn
            .query_row(
                "SELECT id, name, description, unit FROM material_type WHERE name = ?1",
                params![name],
                |row| {
                    Ok(MaterialType {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                        unit: row.get(3)?,
                    })
                },
            )
            .optional()?
        {
            return Ok(Resolved {
                entity: existing,
                created: false,
            });
        }

        conn.execute(
            "INSERT INTO material_type (name, unit) VALUES (?1, ?2)",
            params![name, DEFAULT_UNIT],
        )?;
        let id = conn.last_insert_rowid();

        Ok(Resolved {
            entity: MaterialType {
                id,
                name: name.to_string(),
                description: String::new(),
                unit: DEFAULT_UNIT.to_string(),
            },
            created: true,
        })
    }

    // ===== Supplier =====

    pub fn find_or_create_supplier(&self, name: &str) -> RepositoryResult<Resolved<Supplier>> {
        let conn = self.get_conn()?;

        if let Some(existing) = conn
            .query_row(
                "SELECT id, name, contact_person, phone, address, created_at
                 FROM supplier WHERE name = ?1",
                params![name],
                map_supplier,
            )
            .optional()?
        {
            return Ok(Resolved {
                entity: existing,
                created: false,
            });
        }

        let now = Utc::now();
        conn.execute(
            "INSERT INTO supplier (name, created_at) VALUES (?1, ?2)",
            params![name, now.to_rfc3339()],
        )?;
        let id = conn.last_insert_rowid();

        Ok(Resolved {
            entity: Supplier {
                id,
                name: name.to_string(),
                contact_person: String::new(),
                phone: String::new(),
                address: String::new(),
                created_at: now,
            },
            created: true,
        })
    }

    // ===== Customer =====

    pub fn find_or_create_customer(&self, name: &str) -> RepositoryResult<Resolved<Customer>> {
        let conn = self.get_conn()?;

        if let Some(existing) = conn
            .query_row(
                "SELECT id, name, contact_person, phone, address, created_at
                 FROM customer WHERE name = ?1",
                params![name],
                map_customer,
            )
            .optional()?
        {
            return Ok(Resolved {
                entity: existing,
                created: false,
            });
        }

        let now = Utc::now();
        conn.execute(
            "INSERT INTO customer (name, created_at) VALUES (?1, ?2)",
            params![name, now.to_rfc3339()],
        )?;
        let id = conn.last_insert_rowid();

        Ok(Resolved {
            entity: Customer {
                id,
                name: name.to_string(),
                contact_person: String::new(),
                phone: String::new(),
                address: String::new(),
                created_at: now,
            },
            created: true,
        })
    }

    // ===== Counts (dashboard surface) =====

    pub fn count_warehouses(&self) -> RepositoryResult<i64> {
        self.count_table("warehouse")
    }

    pub fn count_materials(&self) -> RepositoryResult<i64> {
        self.count_table("material_type")
    }

    pub fn count_suppliers(&self) -> RepositoryResult<i64> {
        self.count_table("supplier")
    }

    pub fn count_customers(&self) -> RepositoryResult<i64> {
        self.count_table("customer")
    }

    fn count_table(&self, table: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?;
        Ok(n)
    }
}

fn map_warehouse(row: &Row<'_>) -> rusqlite::Result<Warehouse> {
    Ok(Warehouse {
        id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
        address: row.get(3)?,
        manager: row.get(4)?,
        phone: row.get(5)?,
        is_active: row.get::<_, i64>(6)? != 0,
        created_at: parse_timestamp(row.get::<_, String>(7)?),
    })
}

fn map_supplier(row: &Row<'_>) -> rusqlite::Result<Supplier> {
    Ok(Supplier {
        id: row.get(0)?,
        name: row.get(1)?,
        contact_person: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
        created_at: parse_timestamp(row.get::<_, String>(5)?),
    })
}

fn map_customer(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        contact_person: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
        created_at: parse_timestamp(row.get::<_, String>(5)?),
    })
}

pub(crate) fn parse_timestamp(raw: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
