use crate::ports::outbound::ReportScanner;
use crate::shared::Result;
use anyhow::Context;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const REPORT_EXTENSION: &str = "xlsx";

/// WalkDirReportScanner adapter listing spreadsheet reports on disk
///
/// Symlinks are not followed.
pub struct WalkDirReportScanner;

impl WalkDirReportScanner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WalkDirReportScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportScanner for WalkDirReportScanner {
    fn list_reports(&self, dir: &Path) -> Result<Option<Vec<PathBuf>>> {
        if !dir.is_dir() {
            return Ok(None);
        }

        let mut reports = Vec::new();
        for entry in WalkDir::new(dir).follow_links(false) {
            let entry = entry.with_context(|| format!("unable to walk {}", dir.display()))?;
            let is_report = entry.file_type().is_file()
                && entry.path().extension().and_then(|e| e.to_str()) == Some(REPORT_EXTENSION);
            if is_report {
                if let Ok(relative) = entry.path().strip_prefix(dir) {
                    reports.push(relative.to_path_buf());
                }
            }
        }
        reports.sort();
        Ok(Some(reports))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_lists_nested_spreadsheets_only() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("v4.8")).unwrap();
        fs::write(dir.path().join("bundles_catalog_v4.8.xlsx"), "").unwrap();
        fs::write(dir.path().join("v4.8/packages_catalog_v4.8.xlsx"), "").unwrap();
        fs::write(dir.path().join("bundles_catalog_v4.8.json"), "").unwrap();

        let reports = WalkDirReportScanner::new().list_reports(dir.path()).unwrap();
        assert_eq!(
            reports.unwrap(),
            vec![
                PathBuf::from("bundles_catalog_v4.8.xlsx"),
                PathBuf::from("v4.8/packages_catalog_v4.8.xlsx"),
            ]
        );
    }

    #[test]
    fn test_missing_dir_is_none() {
        let reports = WalkDirReportScanner::new()
            .list_reports(Path::new("/nonexistent/reports"))
            .unwrap();
        assert!(reports.is_none());
    }

    #[test]
    fn test_empty_dir_has_no_reports() {
        let dir = TempDir::new().unwrap();
        let reports = WalkDirReportScanner::default()
            .list_reports(dir.path())
            .unwrap();
        assert_eq!(reports, Some(Vec::new()));
    }
}
