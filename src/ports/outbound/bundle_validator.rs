use crate::audit::domain::ValidatorReport;
use crate::shared::Result;
use std::path::Path;

/// BundleValidator port for the static validation suite
pub trait BundleValidator {
    /// Validates the bundle rooted at `bundle_dir`
    ///
    /// # Returns
    /// Errors and warnings found; a failed validation is still `Ok`
    ///
    /// # Errors
    /// Returns an error only if the suite could not produce a result
    fn validate(&self, bundle_dir: &Path) -> Result<ValidatorReport>;
}
