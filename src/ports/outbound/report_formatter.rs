use crate::application::read_models::AuditReport;
use crate::shared::Result;

/// ReportFormatter port for serializing audit reports
///
/// This port abstracts the output encodings (JSON, XLSX) of a report.
pub trait ReportFormatter {
    /// File extension of the produced output, without the dot
    fn extension(&self) -> &'static str;

    /// Renders `report` into the bytes of one output file
    ///
    /// # Errors
    /// Returns an error if serialization fails as a whole; cell-level
    /// problems are logged and skipped
    fn render(&self, report: &AuditReport) -> Result<Vec<u8>>;
}
