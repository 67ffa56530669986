// ==========================================
// Export surfaces
// ==========================================
// Ingest templates and the inventory report, both CSV.
// ==========================================

pub mod inventory_export;
pub mod templates;

pub use inventory_export::export_inventory;
pub use templates::write_template;
