// ==========================================
// Inventory report export
// ==========================================
// Flat CSV of every balance row with its dimension names. The
// last-updated column is rendered in the Shamsi calendar, matching
// what operators see everywhere else in the product.
// ==========================================

use crate::domain::calendar::to_shamsi_datetime_string;
use crate::importer::error::ImportResult;
use crate::repository::BalanceRepository;
use csv::WriterBuilder;
use std::path::Path;

const EXPORT_HEADERS: [&str; 6] = [
    "انبار",
    "نام کالا",
    "تامین‌کننده",
    "واحد اندازه‌گیری",
    "موجودی فعلی",
    "آخرین بروزرسانی",
];

/// Write all inventory balances to a CSV file. Returns the number of
/// data rows written.
pub fn export_inventory<P: AsRef<Path>>(
    balances: &BalanceRepository,
    path: P,
) -> ImportResult<usize> {
    let views = balances.list_balances()?;

    let mut writer = WriterBuilder::new().from_path(path.as_ref())?;
    writer.write_record(EXPORT_HEADERS.iter())?;

    for view in &views {
        let quantity = view.current_quantity.to_string();
        let updated = to_shamsi_datetime_string(view.last_updated.naive_utc());
        writer.write_record([
            view.warehouse_name.as_str(),
            view.material_name.as_str(),
            view.supplier_name.as_deref().unwrap_or(""),
            view.unit.as_str(),
            quantity.as_str(),
            updated.as_str(),
        ])?;
    }

    writer
        .flush()
        .map_err(crate::importer::error::ImportError::from)?;
    Ok(views.len())
}
