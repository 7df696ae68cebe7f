use crate::audit::domain::Catalog;
use crate::shared::Result;
use std::path::Path;

/// CatalogReader port for reading the catalog of an extracted index image
pub trait CatalogReader {
    /// Reads the package, channel and bundle documents under `catalog_dir`
    ///
    /// # Arguments
    /// * `catalog_dir` - Catalog directory inside the unpacked index image
    ///
    /// # Returns
    /// The assembled [`Catalog`]; an empty directory yields an empty catalog
    ///
    /// # Errors
    /// Returns an error if the directory does not exist or a catalog file
    /// cannot be read
    fn read_catalog(&self, catalog_dir: &Path) -> Result<Catalog>;
}
