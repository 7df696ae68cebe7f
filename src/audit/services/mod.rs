pub mod bundle_checks;
pub mod package_selector;
pub mod versioning;

pub use bundle_checks::{BundleChecks, BundleFindings, InstallModeSupport};
pub use package_selector::PackageSelector;
pub use versioning::VersioningRules;
