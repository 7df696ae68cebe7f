//! Configuration file support for operator-audit.
//!
//! Provides YAML-based configuration through `operator-audit.config.yml`
//! files, including data structures, file loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use operator_audit::shared::Result;

pub const CONFIG_FILENAME: &str = "operator-audit.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub container_engine: Option<String>,
    pub output_path: Option<PathBuf>,
    pub output_format: Option<String>,
    pub work_dir: Option<PathBuf>,
    pub disable_scorecard: Option<bool>,
    pub disable_validators: Option<bool>,
    pub server_mode: Option<bool>,
    pub label: Option<String>,
    pub label_value: Option<String>,
    /// Seconds passed to `operator-sdk scorecard --wait-time`
    pub scorecard_wait_time: Option<u64>,
    /// Report directory name → index image, for the index page
    pub catalogs: Option<BTreeMap<String, String>>,
    pub reports_dir: Option<PathBuf>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    // An empty file deserializes to null; treat it as an empty config
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref engine) = config.container_engine {
        if let Err(e) = engine.parse::<operator_audit::application::dto::ContainerEngine>() {
            bail!(
                "Invalid config: container_engine: {}\n\n💡 Hint: Use 'docker' or 'podman'.",
                e
            );
        }
    }

    if let Some(ref format) = config.output_format {
        if let Err(e) = format.parse::<operator_audit::application::dto::OutputFormat>() {
            bail!(
                "Invalid config: output_format: {}\n\n💡 Hint: Use 'json', 'xlsx' or 'all'.",
                e
            );
        }
    }

    if config.label.is_some() != config.label_value.is_some() {
        bail!(
            "Invalid config: 'label' and 'label_value' must be set together.\n\n\
             💡 Hint: Set both fields, or remove both."
        );
    }

    if config.scorecard_wait_time == Some(0) {
        bail!(
            "Invalid config: scorecard_wait_time must be greater than 0.\n\n\
             💡 Hint: The default is 120 seconds."
        );
    }

    if let Some(ref catalogs) = config.catalogs {
        for (dir, image) in catalogs {
            if dir.trim().is_empty() || dir.contains('/') || dir.contains("..") {
                bail!(
                    "Invalid config: catalogs key '{}' must be a plain directory name.\n\n\
                     💡 Hint: Keys name directories under reports_dir, e.g. \"operatorhubio_catalog\".",
                    dir
                );
            }
            if image.trim().is_empty() {
                bail!(
                    "Invalid config: catalogs.{} must name an index image.\n\n\
                     💡 Hint: e.g. \"quay.io/operatorhubio/catalog\".",
                    dir
                );
            }
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
