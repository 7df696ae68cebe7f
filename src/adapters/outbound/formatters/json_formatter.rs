use crate::application::read_models::AuditReport;
use crate::ports::outbound::ReportFormatter;
use crate::shared::error::AuditError;
use crate::shared::Result;

/// JsonFormatter adapter for machine-readable reports
///
/// Serializes the report as-is: `columns`, `flags`, `index_image_inspect`,
/// `generated_at` and `run_id`.
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, report: &AuditReport) -> Result<Vec<u8>> {
        let rendered = match report {
            AuditReport::Bundles(r) => serde_json::to_vec_pretty(r),
            AuditReport::Packages(r) => serde_json::to_vec_pretty(r),
            AuditReport::Channels(r) => serde_json::to_vec_pretty(r),
        };

        rendered.map_err(|e| {
            AuditError::ReportRender {
                format: "json".to_string(),
                details: e.to_string(),
            }
            .into()
        })
    }
}
