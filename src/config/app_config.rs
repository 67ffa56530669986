// ==========================================
// Application configuration
// ==========================================
// One struct, loaded once at startup and immutable afterwards.
// Branding strings are configuration, not code; re-registering them at
// runtime is not supported.
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Branding shown in report headers and the CLI banner.
    pub site_header: String,
    pub site_title: String,
    pub index_title: String,

    /// SQLite database file.
    pub database_path: String,

    /// Warehouse used for rows that leave the warehouse column blank.
    pub default_warehouse: String,

    /// Unit of measure for newly created materials.
    pub default_unit: String,

    /// Creator recorded on events when the caller passes no identity.
    pub import_user: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site_header: "سیستم انبارداری آهن".to_string(),
            site_title: "پنل مدیریت انبار".to_string(),
            index_title: "خوش آمدید به سیستم انبارداری".to_string(),
            database_path: default_database_path()
                .to_string_lossy()
                .to_string(),
            default_warehouse: crate::domain::entities::DEFAULT_WAREHOUSE_NAME.to_string(),
            default_unit: crate::domain::entities::DEFAULT_UNIT.to_string(),
            import_user: "excel_import".to_string(),
        }
    }
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("anbar")
        .join("anbar.db")
}

impl AppConfig {
    /// Load from a JSON file; missing keys fall back to defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: AppConfig = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Load from the given file if present, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(p) if p.exists() => Self::load_from_file(p).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Install the process-wide configuration. Later calls keep the first
/// value; the winner is returned either way.
pub fn init_config(config: AppConfig) -> &'static AppConfig {
    CONFIG.get_or_init(|| config)
}

/// Process-wide configuration, defaults if never installed.
pub fn config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::default)
}
