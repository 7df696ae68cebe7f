use crate::application::dto::ReportType;
use crate::application::read_models::{Dashboard, IndexPage, ReportLink};
use crate::ports::outbound::ReportScanner;
use crate::shared::Result;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

const UNKNOWN_KIND: &str = "UNKNOWN";
const DEFAULT_TAG: &str = "latest";

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v\d+\.\d+").expect("tag regex is valid"));

/// GenerateIndexPageUseCase - builds the index of previously written reports
///
/// Each configured catalog directory under the reports root becomes one
/// dashboard named after its index image. Directories that do not exist
/// are skipped.
///
/// # Type Parameters
/// * `RS` - ReportScanner implementation
pub struct GenerateIndexPageUseCase<RS> {
    scanner: RS,
}

impl<RS: ReportScanner> GenerateIndexPageUseCase<RS> {
    pub fn new(scanner: RS) -> Self {
        Self { scanner }
    }

    /// Executes the use case
    ///
    /// # Arguments
    /// * `catalogs` - Report directory name → index image
    /// * `reports_root` - Directory holding the catalog directories
    ///
    /// # Returns
    /// The page model, dashboards sorted by image and reports by name
    pub fn execute(
        &self,
        catalogs: &BTreeMap<String, String>,
        reports_root: &Path,
    ) -> Result<IndexPage> {
        let mut dashboards = Vec::new();

        for (dir, image) in catalogs {
            let Some(files) = self.scanner.list_reports(&reports_root.join(dir))? else {
                tracing::debug!(dir = %dir, "report directory not found, skipping");
                continue;
            };

            let mut reports: Vec<ReportLink> = files
                .iter()
                .map(|relative| {
                    let file_name = relative
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    let kind = report_kind(&file_name);
                    ReportLink {
                        path: link_path(reports_root, dir, relative),
                        name: format!("[{}] - Tag: {}", kind, report_tag(&file_name)),
                        kind,
                    }
                })
                .collect();
            reports.sort_by(|a, b| a.name.cmp(&b.name));

            dashboards.push(Dashboard {
                name: image.clone(),
                reports,
            });
        }

        dashboards.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(IndexPage { dashboards })
    }
}

fn report_kind(file_name: &str) -> String {
    match ReportType::from_file_name(file_name) {
        Some(ReportType::Bundles) => "Bundles",
        Some(ReportType::Packages) => "Packages",
        Some(ReportType::Channels) => "Channels",
        None => UNKNOWN_KIND,
    }
    .to_string()
}

/// `v<major>.<minor>` found in the file name, `latest` otherwise
fn report_tag(file_name: &str) -> String {
    TAG_PATTERN
        .find(file_name)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_TAG.to_string())
}

/// Link target, always with `/` separators
fn link_path(reports_root: &Path, dir: &str, relative: &Path) -> String {
    reports_root
        .join(dir)
        .join(relative)
        .to_string_lossy()
        .replace('\\', "/")
}
