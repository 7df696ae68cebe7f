use crate::audit::domain::ScorecardReport;
use crate::shared::Result;
use std::path::Path;

/// ScorecardRunner port for the scorecard conformance suite
pub trait ScorecardRunner {
    /// Runs the scorecard tests configured in the bundle at `bundle_dir`
    ///
    /// # Returns
    /// One result per test; failing tests are still `Ok`
    ///
    /// # Errors
    /// Returns an error if the suite could not run or its output is unreadable
    fn run(&self, bundle_dir: &Path) -> Result<ScorecardReport>;
}
