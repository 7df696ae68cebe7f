use crate::audit::domain::{AuditBundle, ImageInspection};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One catalog package with the bundles audited for it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditedPackage {
    pub name: String,
    pub default_channel: Option<String>,
    /// Every channel of the package in the catalog, audited or not
    pub channels: Vec<String>,
    pub bundles: Vec<AuditBundle>,
}

/// AuditResponse - Internal response DTO from the index audit use case
///
/// Report rows are derived from this; it holds no presentation decisions.
#[derive(Debug, Clone)]
pub struct AuditResponse {
    pub index_inspection: ImageInspection,
    pub packages: Vec<AuditedPackage>,
    pub generated_at: DateTime<Utc>,
    pub run_id: Uuid,
}

impl AuditResponse {
    pub fn new(index_inspection: ImageInspection, packages: Vec<AuditedPackage>) -> Self {
        Self {
            index_inspection,
            packages,
            generated_at: Utc::now(),
            run_id: Uuid::new_v4(),
        }
    }

    pub fn bundles(&self) -> impl Iterator<Item = &AuditBundle> {
        self.packages.iter().flat_map(|p| p.bundles.iter())
    }

    pub fn bundle_count(&self) -> usize {
        self.bundles().count()
    }

    pub fn bundles_with_issues(&self) -> usize {
        self.bundles().filter(|b| b.has_issues()).count()
    }
}
