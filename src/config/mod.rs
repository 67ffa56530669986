// ==========================================
// Configuration
// ==========================================

pub mod app_config;

pub use app_config::{config, init_config, AppConfig};
