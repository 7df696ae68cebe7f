//! operator-audit - audit tool for operator catalog images
//!
//! This library pulls an operator index image, extracts every selected
//! bundle image, runs `operator-sdk` validators and scorecard on it and turns
//! the findings into bundle, package and channel reports (JSON and XLSX),
//! following hexagonal architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`audit`): Catalog and bundle models, audit policies and checks
//! - **Application Layer** (`application`): Use cases, report read models and services
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use operator_audit::prelude::*;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<()> {
//! // Create adapters
//! let executor = SystemCommandExecutor::new();
//! let extractor = BundleExtractor::new(
//!     CliContainerRuntime::new(executor, ContainerEngine::Docker),
//!     TarArchiveExtractor::new(executor),
//!     PathBuf::from("/tmp/operator-audit"),
//!     false,
//! );
//!
//! // Create use case
//! let use_case = AuditIndexUseCase::new(
//!     extractor,
//!     FileBasedCatalogReader::new(),
//!     FileSystemBundleReader::new(),
//!     OperatorSdkValidator::new(executor),
//!     OperatorSdkScorecard::new(executor, DEFAULT_WAIT_TIME_SECS),
//!     StderrProgressReporter::new(),
//! );
//!
//! // Execute
//! let request = AuditRequest::new("quay.io/operatorhubio/catalog:latest");
//! let flags = ReportFlags::from_request(&request);
//! let response = use_case.execute(request)?;
//!
//! // Format output
//! let report = ReportBuilder::new(&response, flags).build(ReportType::Packages);
//! let output = JsonFormatter::new().render(&report)?;
//! println!("{}", String::from_utf8_lossy(&output));
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod audit;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::container::{CliContainerRuntime, TarArchiveExtractor};
    pub use crate::adapters::outbound::filesystem::{
        FileBasedCatalogReader, FileSystemBundleReader, FileSystemWriter, WalkDirReportScanner,
    };
    pub use crate::adapters::outbound::formatters::{
        HtmlIndexFormatter, JsonFormatter, SheetLayout, XlsxFormatter,
    };
    pub use crate::adapters::outbound::operator_sdk::{
        OperatorSdkScorecard, OperatorSdkValidator, DEFAULT_WAIT_TIME_SECS,
    };
    pub use crate::adapters::outbound::process::SystemCommandExecutor;
    pub use crate::application::dto::{
        AuditRequest, AuditResponse, AuditedPackage, ContainerEngine, OutputFormat, ReportType,
    };
    pub use crate::application::read_models::{
        AuditReport, IndexPage, Report, ReportBuilder, ReportFlags,
    };
    pub use crate::application::services::{BundleExtractor, Extraction};
    pub use crate::application::use_cases::{AuditIndexUseCase, GenerateIndexPageUseCase};
    pub use crate::audit::domain::{
        AuditBundle, BundleIssue, BundleManifest, Catalog, ImageInspection, IssueCategory,
        ScorecardReport, ValidatorReport,
    };
    pub use crate::ports::outbound::{
        ArchiveExtractor, BundleReader, BundleValidator, CatalogReader, CommandExecutor,
        CommandOutput, ContainerRuntime, OutputPresenter, ProgressReporter, ReportFormatter,
        ReportScanner, ScorecardRunner,
    };
    pub use crate::shared::Result;
}
