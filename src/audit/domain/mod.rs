pub mod audit_bundle;
pub mod bundle_issue;
pub mod bundle_manifest;
pub mod catalog;
pub mod check_results;
pub mod image_inspection;

pub use audit_bundle::AuditBundle;
pub use bundle_issue::{BundleIssue, IssueCategory};
pub use bundle_manifest::{BundleManifest, ClusterServiceVersion, ManifestObject};
pub use catalog::{Catalog, CatalogBundle, CatalogChannel, CatalogPackage, ChannelEntry};
pub use check_results::{ScorecardReport, ScorecardTestResult, TestState, ValidatorReport};
pub use image_inspection::ImageInspection;
