// ==========================================
// API layer
// ==========================================
// The interface the outer shell calls; no business rules here.
// ==========================================

pub mod error;
pub mod stock_api;

pub use error::{ApiError, ApiResult};
pub use stock_api::{DashboardCounts, StockApi};
