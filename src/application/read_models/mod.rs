/// Read models - report rows and the documents built from them
///
/// Rows are flat and immutable once built; formatters only read them.
mod columns;
mod index_page;
mod report;
mod report_builder;

pub use columns::{BundleColumn, ChannelColumn, PackageColumn};
pub use index_page::{Dashboard, IndexPage, ReportLink};
pub use report::{report_file_name, AuditReport, Report, ReportFlags};
pub use report_builder::ReportBuilder;
