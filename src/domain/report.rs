// ==========================================
// Import result aggregation
// ==========================================
// Two ordered message lists; each data row contributes at most one
// entry, tagged with its 1-based sheet row number (header row offset
// included, so data row 0 reports as row 2).
// ==========================================

use serde::{Deserialize, Serialize};

/// Offset between a 0-based data row index and the row number shown to
/// the user (1-based plus the header row).
pub const SHEET_ROW_OFFSET: usize = 2;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    pub success: Vec<String>,
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report that aborts before any row (file-level failure).
    pub fn file_error(message: String) -> Self {
        Self {
            success: Vec::new(),
            errors: vec![message],
        }
    }

    pub fn push_success(&mut self, row_index: usize, message: impl Into<String>) {
        self.success
            .push(format!("ردیف {}: {}", row_index + SHEET_ROW_OFFSET, message.into()));
    }

    pub fn push_error(&mut self, row_index: usize, message: impl Into<String>) {
        self.errors
            .push(format!("ردیف {}: {}", row_index + SHEET_ROW_OFFSET, message.into()));
    }

    /// File-level error without a row tag.
    pub fn push_file_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
