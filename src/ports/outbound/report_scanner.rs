use crate::shared::Result;
use std::path::{Path, PathBuf};

/// ReportScanner port for discovering previously written reports
pub trait ReportScanner {
    /// Lists the spreadsheet reports found under `dir`, recursively
    ///
    /// # Returns
    /// Paths relative to `dir`, sorted, or `None` when `dir` does not exist
    ///
    /// # Errors
    /// Returns an error if `dir` exists but cannot be traversed
    fn list_reports(&self, dir: &Path) -> Result<Option<Vec<PathBuf>>>;
}
