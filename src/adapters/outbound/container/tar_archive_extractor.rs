use crate::ports::outbound::{ArchiveExtractor, CommandExecutor};
use crate::shared::Result;
use std::path::Path;

/// TarArchiveExtractor adapter unpacking archives with the system `tar`
pub struct TarArchiveExtractor<E> {
    executor: E,
}

impl<E: CommandExecutor> TarArchiveExtractor<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E: CommandExecutor> ArchiveExtractor for TarArchiveExtractor<E> {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
        let args = vec![
            "-xf".to_string(),
            archive.to_string_lossy().into_owned(),
            "-C".to_string(),
            destination.to_string_lossy().into_owned(),
        ];
        let output = self.executor.run("tar", &args)?;
        if !output.is_success() {
            anyhow::bail!(
                "tar failed for {} ({})",
                archive.display(),
                output.failure_details()
            );
        }
        Ok(())
    }
}
