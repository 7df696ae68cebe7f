/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the audit domain isolated.
mod audit_request;
mod audit_response;
mod container_engine;
mod output_format;
mod report_type;

pub use audit_request::AuditRequest;
pub use audit_response::{AuditResponse, AuditedPackage};
pub use container_engine::ContainerEngine;
pub use output_format::OutputFormat;
pub use report_type::ReportType;
