use crate::shared::Result;
use std::path::Path;

/// ArchiveExtractor port for unpacking tarballs
pub trait ArchiveExtractor {
    /// Extracts `archive` into the existing directory `destination`
    ///
    /// Files already present in `destination` are overwritten, which is what
    /// gives later image layers precedence over earlier ones.
    ///
    /// # Errors
    /// Returns an error if the archive is missing or cannot be unpacked
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()>;
}
