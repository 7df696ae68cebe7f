/// Filesystem adapters for file I/O operations
mod bundle_reader;
mod catalog_reader;
mod file_writer;
mod report_scanner;

pub use bundle_reader::FileSystemBundleReader;
pub use catalog_reader::FileBasedCatalogReader;
pub use file_writer::FileSystemWriter;
pub use report_scanner::WalkDirReportScanner;
