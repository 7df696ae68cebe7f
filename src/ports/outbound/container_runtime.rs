use crate::audit::domain::ImageInspection;
use crate::shared::Result;
use std::path::Path;

/// ContainerRuntime port for the local container engine
///
/// Abstracts `docker`/`podman` so the extractor only deals with images and
/// archives, not command lines.
pub trait ContainerRuntime {
    /// Pulls `image` into the local image store
    ///
    /// # Errors
    /// Returns an error if the image cannot be downloaded
    fn pull(&self, image: &str) -> Result<()>;

    /// Saves a locally available image as a tarball
    ///
    /// # Arguments
    /// * `image` - Image reference without digest
    /// * `archive` - Path of the tarball to create
    ///
    /// # Errors
    /// Returns an error if the engine fails to export the image
    fn save(&self, image: &str, archive: &Path) -> Result<()>;

    /// Inspects a locally available image
    ///
    /// # Errors
    /// Returns an error if the image is unknown or the output cannot be parsed
    fn inspect(&self, image: &str) -> Result<ImageInspection>;

    /// Removes an image from the local image store
    ///
    /// # Errors
    /// Returns an error if the engine refuses to remove it
    fn remove(&self, image: &str) -> Result<()>;
}
