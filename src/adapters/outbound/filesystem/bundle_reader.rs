use crate::audit::domain::bundle_manifest::string_map;
use crate::audit::domain::BundleManifest;
use crate::ports::outbound::BundleReader;
use crate::shared::security::read_untrusted_file;
use crate::shared::Result;
use anyhow::Context;
use serde::Deserialize;
use serde_yaml_ng::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const MANIFESTS_DIR: &str = "manifests";
const ANNOTATIONS_FILE: &str = "metadata/annotations.yaml";
const SCORECARD_CONFIG_FILE: &str = "tests/scorecard/config.yaml";

#[derive(Debug, Default, Deserialize)]
struct AnnotationsFile {
    #[serde(default, deserialize_with = "string_map")]
    annotations: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct ScorecardConfig {
    #[serde(default)]
    stages: Vec<ScorecardStage>,
}

#[derive(Debug, Default, Deserialize)]
struct ScorecardStage {
    #[serde(default)]
    tests: Vec<ScorecardTest>,
}

#[derive(Debug, Default, Deserialize)]
struct ScorecardTest {
    #[serde(default)]
    image: String,
}

/// FileSystemBundleReader adapter loading a bundle in registry+v1 layout
///
/// Reads every `.yaml`, `.yml` and `.json` file of `manifests/` (JSON is
/// parsed as YAML), the optional `metadata/annotations.yaml` and the
/// optional scorecard config.
pub struct FileSystemBundleReader;

impl FileSystemBundleReader {
    pub fn new() -> Self {
        Self
    }

    fn read_manifest_documents(&self, manifests_dir: &Path) -> Result<Vec<Value>> {
        let mut files: Vec<_> = fs::read_dir(manifests_dir)
            .with_context(|| format!("unable to read {}", manifests_dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("yaml" | "yml" | "json")
                )
            })
            .collect();
        files.sort();

        let mut documents = Vec::new();
        for path in files {
            let content = read_untrusted_file(&path)?;
            for document in serde_yaml_ng::Deserializer::from_str(&content) {
                let value = Value::deserialize(document)
                    .with_context(|| format!("invalid manifest {}", path.display()))?;
                if !value.is_null() {
                    documents.push(value);
                }
            }
        }
        Ok(documents)
    }

    fn read_optional<T>(&self, path: &Path) -> Result<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        if fs::symlink_metadata(path).is_err() {
            return Ok(None);
        }
        let content = read_untrusted_file(path)?;
        let parsed = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("invalid {}", path.display()))?;
        Ok(Some(parsed))
    }
}

impl Default for FileSystemBundleReader {
    fn default() -> Self {
        Self::new()
    }
}

impl BundleReader for FileSystemBundleReader {
    fn read_bundle(&self, bundle_dir: &Path) -> Result<BundleManifest> {
        let manifests_dir = bundle_dir.join(MANIFESTS_DIR);
        if !manifests_dir.is_dir() {
            anyhow::bail!("no {} directory in {}", MANIFESTS_DIR, bundle_dir.display());
        }

        let documents = self.read_manifest_documents(&manifests_dir)?;
        let annotations = self
            .read_optional::<AnnotationsFile>(&bundle_dir.join(ANNOTATIONS_FILE))?
            .unwrap_or_default()
            .annotations;
        let test_images = self
            .read_optional::<ScorecardConfig>(&bundle_dir.join(SCORECARD_CONFIG_FILE))?
            .unwrap_or_default()
            .stages
            .into_iter()
            .flat_map(|stage| stage.tests)
            .map(|test| test.image)
            .filter(|image| !image.is_empty())
            .collect();

        Ok(BundleManifest::from_documents(documents)?
            .with_annotations(annotations)
            .with_scorecard_test_images(test_images))
    }
}
