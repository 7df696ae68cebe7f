/// ProgressReporter port for reporting progress during an audit
///
/// This port abstracts progress reporting (e.g., to stderr)
/// to provide user feedback while bundles are pulled and checked.
pub trait ProgressReporter {
    /// Reports a progress message
    ///
    /// # Arguments
    /// * `message` - The progress message to report
    fn report(&self, message: &str);

    /// Reports progress over the audited bundles
    ///
    /// # Arguments
    /// * `current` - Number of bundles processed so far
    /// * `total` - Number of bundles to process
    /// * `message` - Optional message to include (usually the bundle name)
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports an error or warning message
    ///
    /// # Arguments
    /// * `message` - The error/warning message
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    ///
    /// # Arguments
    /// * `message` - Completion message
    fn report_completion(&self, message: &str);
}
