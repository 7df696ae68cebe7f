use crate::shared::error::AuditError;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum size of a single manifest or catalog file read from an image (32 MB)
pub const MAX_MANIFEST_SIZE: u64 = 32 * 1024 * 1024;

/// Validates that `path` is an existing, non-symlinked directory usable as report output
///
/// # Security
/// Uses `symlink_metadata()` so the link itself is checked, not its target.
pub fn validate_output_directory(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| AuditError::InvalidOutputPath {
        path: path.to_path_buf(),
        reason: format!("Directory does not exist ({})", e),
    })?;

    if metadata.is_symlink() {
        return Err(AuditError::SecurityError {
            path: path.to_path_buf(),
            reason: "Output path is a symbolic link".to_string(),
            hint: "Use a regular directory instead".to_string(),
        }
        .into());
    }

    if !metadata.is_dir() {
        return Err(AuditError::InvalidOutputPath {
            path: path.to_path_buf(),
            reason: "Not a directory".to_string(),
        }
        .into());
    }

    Ok(())
}

/// Reads a file extracted from an image, rejecting symlinks and oversized files
///
/// Image content is untrusted: a layer may plant a symlink pointing outside
/// the working directory.
pub fn read_untrusted_file(path: &Path) -> Result<String> {
    let metadata = fs::symlink_metadata(path)
        .map_err(|e| anyhow::anyhow!("Failed to read metadata of {}: {}", path.display(), e))?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. Symbolic links inside images are not followed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    if metadata.len() > MAX_MANIFEST_SIZE {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            metadata.len(),
            MAX_MANIFEST_SIZE
        );
    }

    fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))
}

/// Turns an arbitrary bundle or image name into a single safe path component
pub fn sanitize_path_component(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = sanitized.trim_start_matches('.');
    if trimmed.is_empty() {
        "unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}
