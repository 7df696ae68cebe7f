/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (processes, file system, console, etc.).
pub mod archive_extractor;
pub mod bundle_reader;
pub mod bundle_validator;
pub mod catalog_reader;
pub mod command_executor;
pub mod container_runtime;
pub mod output_presenter;
pub mod progress_reporter;
pub mod report_formatter;
pub mod report_scanner;
pub mod scorecard_runner;

pub use archive_extractor::ArchiveExtractor;
pub use bundle_reader::BundleReader;
pub use bundle_validator::BundleValidator;
pub use catalog_reader::CatalogReader;
pub use command_executor::{CommandExecutor, CommandOutput};
pub use container_runtime::ContainerRuntime;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use report_formatter::ReportFormatter;
pub use report_scanner::ReportScanner;
pub use scorecard_runner::ScorecardRunner;
