use crate::shared::Result;
use serde::{Deserialize, Deserializer};
use serde_yaml_ng::Value;
use std::collections::BTreeMap;

pub const CSV_KIND: &str = "ClusterServiceVersion";

/// Annotation carrying the blang-style range of versions a bundle replaces
pub const SKIP_RANGE_ANNOTATION: &str = "olm.skipRange";

/// Annotation listing infrastructure features (disconnected, proxy-aware, ...)
pub const INFRA_FEATURES_ANNOTATION: &str = "operators.openshift.io/infrastructure-features";

/// Annotation naming the tool that built the bundle (operator-sdk-v1.x, ...)
pub const BUILDER_ANNOTATION: &str = "operators.operatorframework.io.metrics.builder";

/// Label prefix declaring a supported architecture: `operatorframework.io/arch.amd64`
pub const ARCH_LABEL_PREFIX: &str = "operatorframework.io/arch.";

/// Object metadata shared by every Kubernetes manifest
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "string_map")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "string_map")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InstallMode {
    #[serde(rename = "type")]
    pub mode: String,
    #[serde(default)]
    pub supported: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeploymentSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub spec: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InstallStrategySpec {
    #[serde(default)]
    pub deployments: Vec<DeploymentSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InstallStrategy {
    #[serde(default)]
    pub spec: InstallStrategySpec,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvSpec {
    #[serde(default, deserialize_with = "optional_scalar")]
    pub version: Option<String>,
    #[serde(default)]
    pub replaces: Option<String>,
    #[serde(default)]
    pub skips: Vec<String>,
    #[serde(default)]
    pub install_modes: Vec<InstallMode>,
    #[serde(default)]
    pub webhookdefinitions: Vec<Value>,
    #[serde(default)]
    pub install: InstallStrategy,
}

/// The subset of a ClusterServiceVersion the audit looks at
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClusterServiceVersion {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: CsvSpec,
}

impl ClusterServiceVersion {
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata.annotations.get(key).map(String::as_str)
    }

    pub fn skip_range(&self) -> Option<&str> {
        self.annotation(SKIP_RANGE_ANNOTATION)
    }
}

/// Identity of any manifest shipped in the bundle's `manifests/` directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestObject {
    pub api_version: String,
    pub kind: String,
    pub name: String,
}

/// A bundle loaded from its on-disk directory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleManifest {
    pub csv: ClusterServiceVersion,
    pub objects: Vec<ManifestObject>,
    /// `annotations:` of `metadata/annotations.yaml`
    pub annotations: BTreeMap<String, String>,
    /// Test images listed in `tests/scorecard/config.yaml`
    pub scorecard_test_images: Vec<String>,
}

impl BundleManifest {
    /// Builds a manifest from the parsed YAML/JSON documents of `manifests/`
    ///
    /// # Errors
    /// Returns an error when no document is a ClusterServiceVersion, or when
    /// the CSV document does not have the expected shape.
    pub fn from_documents(documents: Vec<Value>) -> Result<Self> {
        let mut csv = None;
        let mut objects = Vec::new();

        for document in documents {
            let kind = str_field(&document, "kind");
            if kind.is_empty() {
                continue;
            }

            let object = ManifestObject {
                api_version: str_field(&document, "apiVersion"),
                kind: kind.clone(),
                name: document
                    .get("metadata")
                    .map(|m| str_field(m, "name"))
                    .unwrap_or_default(),
            };

            if kind == CSV_KIND {
                if csv.is_some() {
                    anyhow::bail!("more than one ClusterServiceVersion found in manifests");
                }
                let parsed: ClusterServiceVersion = serde_yaml_ng::from_value(document)
                    .map_err(|e| anyhow::anyhow!("invalid ClusterServiceVersion: {}", e))?;
                csv = Some(parsed);
            }
            objects.push(object);
        }

        let csv =
            csv.ok_or_else(|| anyhow::anyhow!("no ClusterServiceVersion found in manifests"))?;

        Ok(Self {
            csv,
            objects,
            annotations: BTreeMap::new(),
            scorecard_test_images: Vec::new(),
        })
    }

    pub fn with_annotations(mut self, annotations: BTreeMap<String, String>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_scorecard_test_images(mut self, images: Vec<String>) -> Self {
        self.scorecard_test_images = images;
        self
    }

    pub fn name(&self) -> &str {
        &self.csv.metadata.name
    }

    pub fn version(&self) -> Option<&str> {
        self.csv.spec.version.as_deref()
    }

    /// Builder annotation, looked up in bundle metadata first and the CSV second
    pub fn builder(&self) -> Option<&str> {
        self.annotations
            .get(BUILDER_ANNOTATION)
            .map(String::as_str)
            .or_else(|| self.csv.annotation(BUILDER_ANNOTATION))
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Renders a YAML scalar as the string Kubernetes would store
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

/// Deserializes annotation/label maps, tolerating unquoted booleans and numbers
pub fn string_map<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| scalar_to_string(&v).map(|s| (k, s)))
        .collect())
}

/// Deserializes an optional scalar as a string, so `version: 1.0` stays "1.0"
pub fn optional_scalar<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(scalar_to_string)
        .filter(|s| !s.is_empty()))
}
