/// Mock implementations for testing
mod mock_bundle_checks;
mod mock_command_executor;
mod mock_progress_reporter;

pub use mock_bundle_checks::{MockBundleValidator, MockScorecardRunner};
pub use mock_command_executor::{MockCommandExecutor, MockImage};
pub use mock_progress_reporter::MockProgressReporter;
