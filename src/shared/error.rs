use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between a clean audit,
/// an audit that found problems and a run that could not be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - the audit completed (or no issues were found with --fail-on-issues)
    Success = 0,
    /// Bundles with issues were found and --fail-on-issues was set
    IssuesDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (index extraction, config, file I/O, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::IssuesDetected => write!(f, "Issues Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Unrecoverable setup failures of an audit run.
///
/// Per-bundle problems are never raised through this type; they are
/// recorded as [`crate::audit::domain::BundleIssue`] on the bundle instead.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Unable to extract index image: {image}\nDetails: {details}\n\n💡 Hint: Check that the image exists and that the container engine can pull it")]
    IndexExtraction { image: String, details: String },

    #[error("Unable to read the catalog of index image: {image}\nDetails: {details}\n\n💡 Hint: Only file-based catalogs (olm.package/olm.channel/olm.bundle) are supported")]
    CatalogRead { image: String, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid output path: {path}\nReason: {reason}\n\n💡 Hint: Please specify an existing directory with --output-path")]
    InvalidOutputPath { path: PathBuf, reason: String },

    #[error("Failed to render {format} report\nDetails: {details}")]
    ReportRender { format: String, details: String },

    /// Validation error for request and filter construction
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}
