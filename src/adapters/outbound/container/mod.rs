/// Container engine and archive adapters built on the command executor
mod cli_container_runtime;
mod tar_archive_extractor;

pub use cli_container_runtime::CliContainerRuntime;
pub use tar_archive_extractor::TarArchiveExtractor;
