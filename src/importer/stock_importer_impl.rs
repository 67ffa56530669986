// ==========================================
// Stock import pipeline implementation
// ==========================================
// One file per call, one report per file. Column resolution failures
// abort before any row; row failures skip only their row. Rows that
// commit stay committed regardless of later failures (no batch
// rollback). Balance reconciliation happens here, next to the event
// insert; constructing an event alone never moves a balance.
// ==========================================

use crate::domain::entities::{BalanceKey, DEFAULT_WAREHOUSE_NAME};
use crate::domain::events::{
    derive_total_price, new_event_id, OperationKind, StockInEvent, StockOutEvent,
    StockTransferEvent, TransferKind,
};
use crate::domain::report::ImportReport;
use crate::importer::column_resolver::{
    resolve_columns, CanonicalField, STOCK_IN_SHEET, STOCK_OUT_SHEET, TRANSFER_SHEET,
    UNIFIED_SHEET,
};
use crate::importer::date_normalizer::normalize_date;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::row_reader::RowReader;
use crate::importer::sheet_parser::{ParsedSheet, SheetParser};
use crate::importer::stock_importer_trait::{SheetKind, StockImporter};
use crate::repository::{
    BalanceRepository, DebitOutcome, EntityRepository, EventRepository, TransferDebitOutcome,
};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

enum RowOutcome {
    Success(String),
    Failure(String),
}

pub struct StockImporterImpl {
    entities: EntityRepository,
    balances: BalanceRepository,
    events: EventRepository,
}

impl StockImporterImpl {
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        crate::db::init_schema(&conn)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ImportResult<Self> {
        Ok(Self {
            entities: EntityRepository::from_connection(conn.clone())?,
            balances: BalanceRepository::from_connection(conn.clone())?,
            events: EventRepository::from_connection(conn)?,
        })
    }

    /// Parse the file and resolve its header row against a schema.
    fn load_sheet(
        &self,
        path: &Path,
        schema: &[CanonicalField],
    ) -> ImportResult<(ParsedSheet, std::collections::HashMap<&'static str, String>)> {
        let sheet = SheetParser.parse(path)?;
        let columns = resolve_columns(&sheet.headers, schema)?;
        Ok((sheet, columns))
    }

    /// Report shape for failures that abort before any row.
    fn file_failure(err: ImportError) -> ImportReport {
        let mut report = ImportReport::new();
        match err {
            ImportError::MissingColumns { missing, present } => {
                report.push_file_error(format!("ستون‌های زیر در فایل یافت نشد: {}", missing));
                report.push_file_error(format!("ستون‌های موجود: {}", present));
            }
            other => report.push_file_error(format!("خطا در خواندن فایل: {}", other)),
        }
        report
    }

    fn run_rows<F>(&self, sheet: &ParsedSheet, columns: &std::collections::HashMap<&'static str, String>, mut process: F) -> ImportReport
    where
        F: FnMut(&RowReader<'_>) -> ImportResult<RowOutcome>,
    {
        let mut report = ImportReport::new();
        for (index, row) in sheet.rows.iter().enumerate() {
            let reader = RowReader::new(row, columns);
            match process(&reader) {
                Ok(RowOutcome::Success(msg)) => report.push_success(index, msg),
                Ok(RowOutcome::Failure(msg)) => report.push_error(index, msg),
                // unexpected errors are caught per row; the batch continues
                Err(e) => report.push_error(index, format!("خطا - {}", e)),
            }
        }
        report
    }

    // ===== Unified sheet rows =====

    fn process_unified_row(&self, reader: &RowReader<'_>, user: &str) -> ImportResult<RowOutcome> {
        let Some(operation) = OperationKind::from_tag(&reader.get_string("operation_type")) else {
            return Ok(RowOutcome::Failure(
                "نوع عملیات نامعتبر - باید 'ورودی' یا 'خروجی' باشد".to_string(),
            ));
        };

        let material_name = reader.get_string("material_name");
        if material_name.is_empty() {
            return Ok(RowOutcome::Failure("نام کالا خالی است".to_string()));
        }

        let counterparty = reader.get_string("counterparty");
        if counterparty.is_empty() {
            return Ok(RowOutcome::Failure(
                "هویت کالا/نام مشتری خالی است".to_string(),
            ));
        }

        match operation {
            OperationKind::StockIn => {
                self.apply_stock_in(reader, &material_name, &counterparty, user)
            }
            OperationKind::StockOut => {
                self.apply_stock_out(reader, &material_name, &counterparty, user)
            }
        }
    }

    // ===== Shared stock-in / stock-out application =====

    fn resolve_warehouse_name(&self, reader: &RowReader<'_>) -> String {
        let name = reader.get_string("warehouse");
        if name.is_empty() {
            DEFAULT_WAREHOUSE_NAME.to_string()
        } else {
            name
        }
    }

    fn apply_stock_in(
        &self,
        reader: &RowReader<'_>,
        material_name: &str,
        supplier_name: &str,
        user: &str,
    ) -> ImportResult<RowOutcome> {
        let warehouse_name = self.resolve_warehouse_name(reader);
        let warehouse = self.entities.find_or_create_warehouse(&warehouse_name)?.entity;
        let material = self.entities.find_or_create_material(material_name)?.entity;
        let supplier = self.entities.find_or_create_supplier(supplier_name)?.entity;

        let quantity = reader.get_i64("quantity");
        let unit_price = reader.get_i64("unit_price");

        let event = StockInEvent {
            event_id: new_event_id(),
            warehouse_id: warehouse.id,
            material_type_id: material.id,
            supplier_id: supplier.id,
            customer_id: None,
            quantity,
            unit_price,
            total_price: derive_total_price(quantity, unit_price),
            invoice_number: reader.get_string("invoice_number"),
            notes: reader.get_string("notes"),
            created_by: user.to_string(),
            created_at: Utc::now(),
            manual_date: normalize_date(&reader.get_string("date")).as_option(),
        };
        self.events.insert_stock_in(&event)?;

        let key = BalanceKey::new(warehouse.id, material.id, None);
        self.balances.credit(&key, quantity)?;

        Ok(RowOutcome::Success(format!(
            "ورودی {} با موفقیت ثبت شد",
            material_name
        )))
    }

    fn apply_stock_out(
        &self,
        reader: &RowReader<'_>,
        material_name: &str,
        customer_name: &str,
        user: &str,
    ) -> ImportResult<RowOutcome> {
        let warehouse_name = self.resolve_warehouse_name(reader);
        let warehouse = self.entities.find_or_create_warehouse(&warehouse_name)?.entity;
        let material = self.entities.find_or_create_material(material_name)?.entity;
        let customer = self.entities.find_or_create_customer(customer_name)?.entity;

        let quantity = reader.get_i64("quantity");
        let unit_price = reader.get_i64("unit_price");
        let key = BalanceKey::new(warehouse.id, material.id, None);

        // Debit first: the guard and the decrement are one statement,
        // and the event is only recorded for an applied debit.
        match self.balances.debit_checked(&key, quantity)? {
            DebitOutcome::Applied => {}
            DebitOutcome::Insufficient { available } => {
                return Ok(RowOutcome::Failure(format!(
                    "موجودی ناکافی برای {} در انبار {} (موجودی: {}, درخواستی: {})",
                    material_name, warehouse.name, available, quantity
                )));
            }
            DebitOutcome::NotFound => {
                return Ok(RowOutcome::Failure(format!(
                    "موجودی برای {} در انبار {} یافت نشد",
                    material_name, warehouse.name
                )));
            }
        }

        let event = StockOutEvent {
            event_id: new_event_id(),
            warehouse_id: warehouse.id,
            material_type_id: material.id,
            customer_id: customer.id,
            supplier_id: None,
            quantity,
            unit_price,
            total_price: derive_total_price(quantity, unit_price),
            invoice_number: reader.get_string("invoice_number"),
            notes: reader.get_string("notes"),
            created_by: user.to_string(),
            created_at: Utc::now(),
            manual_date: normalize_date(&reader.get_string("date")).as_option(),
        };
        self.events.insert_stock_out(&event)?;

        Ok(RowOutcome::Success(format!(
            "خروجی {} با موفقیت ثبت شد",
            material_name
        )))
    }

    // ===== Dedicated sheets =====

    fn process_stock_in_row(&self, reader: &RowReader<'_>, user: &str) -> ImportResult<RowOutcome> {
        let material_name = reader.get_string("material_name");
        if material_name.is_empty() {
            return Ok(RowOutcome::Failure("نام کالا خالی است".to_string()));
        }
        let supplier_name = reader.get_string("counterparty");
        if supplier_name.is_empty() {
            return Ok(RowOutcome::Failure("هویت کالا خالی است".to_string()));
        }
        self.apply_stock_in(reader, &material_name, &supplier_name, user)
    }

    fn process_stock_out_row(&self, reader: &RowReader<'_>, user: &str) -> ImportResult<RowOutcome> {
        let material_name = reader.get_string("material_name");
        if material_name.is_empty() {
            return Ok(RowOutcome::Failure("نام کالا خالی است".to_string()));
        }
        let customer_name = reader.get_string("counterparty");
        if customer_name.is_empty() {
            return Ok(RowOutcome::Failure("نام مشتری خالی است".to_string()));
        }
        self.apply_stock_out(reader, &material_name, &customer_name, user)
    }

    // ===== Transfer sheet =====

    fn process_transfer_row(&self, reader: &RowReader<'_>, user: &str) -> ImportResult<RowOutcome> {
        let material_name = reader.get_string("material_name");
        if material_name.is_empty() {
            return Ok(RowOutcome::Failure("نام کالا خالی است".to_string()));
        }

        let Some(kind) = TransferKind::from_tag(&reader.get_string("transfer_type")) else {
            return Ok(RowOutcome::Failure(
                "نوع انتقال نامعتبر - باید شامل 'به انبار' یا 'از انبار' باشد".to_string(),
            ));
        };

        let material = self.entities.find_or_create_material(&material_name)?.entity;
        let quantity = reader.get_i64("quantity");
        let source_name = reader.get_string("source_location");
        let destination_name = reader.get_string("destination_location");

        // Source side: decrement only an existing balance. A missing
        // source row skips the decrement (logged, not an error); the
        // destination side always lands. Transfers have no quantity
        // guard, so a source balance may go negative.
        let mut source_warehouse_id = None;
        if !source_name.is_empty() {
            let source = self.entities.find_or_create_warehouse(&source_name)?.entity;
            source_warehouse_id = Some(source.id);
            let key = BalanceKey::new(source.id, material.id, None);
            if self.balances.debit_if_exists(&key, quantity)?
                == TransferDebitOutcome::SourceMissing
            {
                warn!(
                    warehouse = %source_name,
                    material = %material_name,
                    "transfer source balance missing; decrement skipped"
                );
            }
        }

        let mut destination_warehouse_id = None;
        if !destination_name.is_empty() {
            let destination = self
                .entities
                .find_or_create_warehouse(&destination_name)?
                .entity;
            destination_warehouse_id = Some(destination.id);
            let key = BalanceKey::new(destination.id, material.id, None);
            self.balances.credit(&key, quantity)?;
        }

        let event = StockTransferEvent {
            event_id: new_event_id(),
            source_warehouse_id,
            destination_warehouse_id,
            material_type_id: material.id,
            kind,
            quantity,
            notes: reader.get_string("notes"),
            created_by: user.to_string(),
            created_at: Utc::now(),
            manual_date: normalize_date(&reader.get_string("date")).as_option(),
        };
        self.events.insert_transfer(&event)?;

        Ok(RowOutcome::Success(format!(
            "انتقال {} با موفقیت ثبت شد",
            material_name
        )))
    }

    async fn import(&self, kind: SheetKind, path: &Path, user: &str) -> ImportReport {
        match kind {
            SheetKind::Unified => self.import_unified(path, user).await,
            SheetKind::StockIn => self.import_stock_in(path, user).await,
            SheetKind::StockOut => self.import_stock_out(path, user).await,
            SheetKind::Transfer => self.import_transfers(path, user).await,
        }
    }
}

#[async_trait]
impl StockImporter for StockImporterImpl {
    async fn import_unified<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        user: &str,
    ) -> ImportReport {
        let path = file_path.as_ref();
        info!(file = %path.display(), "importing unified stock sheet");

        let (sheet, columns) = match self.load_sheet(path, UNIFIED_SHEET) {
            Ok(loaded) => loaded,
            Err(e) => return Self::file_failure(e),
        };

        let report = self.run_rows(&sheet, &columns, |reader| {
            self.process_unified_row(reader, user)
        });
        info!(
            success = report.success.len(),
            errors = report.errors.len(),
            "unified import finished"
        );
        report
    }

    async fn import_stock_in<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        user: &str,
    ) -> ImportReport {
        let path = file_path.as_ref();
        info!(file = %path.display(), "importing stock-in sheet");

        let (sheet, columns) = match self.load_sheet(path, STOCK_IN_SHEET) {
            Ok(loaded) => loaded,
            Err(e) => return Self::file_failure(e),
        };

        let report = self.run_rows(&sheet, &columns, |reader| {
            self.process_stock_in_row(reader, user)
        });
        info!(
            success = report.success.len(),
            errors = report.errors.len(),
            "stock-in import finished"
        );
        report
    }

    async fn import_stock_out<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        user: &str,
    ) -> ImportReport {
        let path = file_path.as_ref();
        info!(file = %path.display(), "importing stock-out sheet");

        let (sheet, columns) = match self.load_sheet(path, STOCK_OUT_SHEET) {
            Ok(loaded) => loaded,
            Err(e) => return Self::file_failure(e),
        };

        let report = self.run_rows(&sheet, &columns, |reader| {
            self.process_stock_out_row(reader, user)
        });
        info!(
            success = report.success.len(),
            errors = report.errors.len(),
            "stock-out import finished"
        );
        report
    }

    async fn import_transfers<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        user: &str,
    ) -> ImportReport {
        let path = file_path.as_ref();
        info!(file = %path.display(), "importing transfer sheet");

        let (sheet, columns) = match self.load_sheet(path, TRANSFER_SHEET) {
            Ok(loaded) => loaded,
            Err(e) => return Self::file_failure(e),
        };

        let report = self.run_rows(&sheet, &columns, |reader| {
            self.process_transfer_row(reader, user)
        });
        info!(
            success = report.success.len(),
            errors = report.errors.len(),
            "transfer import finished"
        );
        report
    }

    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        files: Vec<(SheetKind, P)>,
        user: &str,
    ) -> Vec<ImportReport> {
        let futures = files
            .iter()
            .map(|(kind, path)| self.import(*kind, path.as_ref(), user));
        futures::future::join_all(futures).await
    }
}
