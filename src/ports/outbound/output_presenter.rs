use crate::shared::Result;

/// OutputPresenter port for presenting final output
///
/// This port abstracts the output destination where a rendered report or
/// index page ends up.
pub trait OutputPresenter {
    /// Presents the rendered content to the output destination
    ///
    /// # Arguments
    /// * `content` - The rendered bytes (JSON, XLSX or HTML)
    ///
    /// # Errors
    /// Returns an error if:
    /// - Writing to the output destination fails
    /// - File permissions prevent writing
    /// - The destination is a symbolic link
    fn present(&self, content: &[u8]) -> Result<()>;
}
