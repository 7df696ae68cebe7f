use crate::audit::domain::BundleManifest;
use crate::shared::Result;
use std::path::Path;

/// BundleReader port for loading an unpacked bundle directory
pub trait BundleReader {
    /// Loads the bundle rooted at `bundle_dir`
    ///
    /// # Arguments
    /// * `bundle_dir` - Directory holding `manifests/` and `metadata/`
    ///
    /// # Returns
    /// The parsed bundle with its ClusterServiceVersion, manifest objects,
    /// metadata annotations and scorecard test images
    ///
    /// # Errors
    /// Returns an error if `manifests/` is missing or has no valid CSV
    fn read_bundle(&self, bundle_dir: &Path) -> Result<BundleManifest>;
}
