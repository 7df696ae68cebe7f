use crate::shared::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label carrying the build date on images that do not set `Created`
pub const BUILD_DATE_LABEL: &str = "build-date";

/// Label listing the OpenShift versions a bundle supports
pub const OCP_VERSIONS_LABEL: &str = "com.redhat.openshift.versions";

/// Label pointing at the file-based catalog inside an index image
pub const INDEX_CONFIGS_LABEL: &str = "operators.operatorframework.io.index.configs.v1";

/// Catalog location used when an index image does not declare one
pub const DEFAULT_CONFIGS_PATH: &str = "/configs";

/// Metadata of a local image as reported by `<engine> inspect`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInspection {
    pub id: String,
    pub created: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawInspect {
    #[serde(rename = "Id", default)]
    id: String,
    #[serde(rename = "Created", default)]
    created: Option<String>,
    #[serde(rename = "Config", default)]
    config: Option<RawConfig>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(rename = "Labels", default)]
    labels: Option<BTreeMap<String, String>>,
}

impl ImageInspection {
    /// Parses the JSON array printed by `docker inspect` / `podman inspect`
    ///
    /// Only the first element is used; inspecting a single reference never
    /// yields more than one.
    pub fn from_inspect_json(output: &str) -> Result<Self> {
        let raw: Vec<RawInspect> = serde_json::from_str(output)
            .map_err(|e| anyhow::anyhow!("unable to parse inspect output: {}", e))?;

        let first = raw
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("inspect returned no image"))?;

        Ok(Self {
            id: first.id,
            created: first.created.unwrap_or_default(),
            labels: first.config.and_then(|c| c.labels).unwrap_or_default(),
        })
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    /// Build timestamp: `Created` when present, the `build-date` label otherwise
    pub fn build_at(&self) -> Option<String> {
        if !self.created.is_empty() {
            return Some(self.created.clone());
        }
        self.label(BUILD_DATE_LABEL).map(str::to_string)
    }

    pub fn ocp_versions(&self) -> Option<&str> {
        self.label(OCP_VERSIONS_LABEL)
    }

    /// Whether the image carries `label` with exactly `value`
    pub fn has_label_value(&self, label: &str, value: &str) -> bool {
        !label.is_empty() && self.label(label) == Some(value)
    }

    /// Location of the file-based catalog, relative to the image root
    pub fn configs_path(&self) -> &str {
        self.label(INDEX_CONFIGS_LABEL)
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_CONFIGS_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCKER_INSPECT: &str = r#"[
      {
        "Id": "sha256:4f7b2c",
        "Created": "2021-06-01T10:00:00.000000000Z",
        "Config": {
          "Labels": {
            "com.redhat.openshift.versions": "v4.6-v4.8",
            "operators.operatorframework.io.index.configs.v1": "/catalog"
          }
        }
      }
    ]"#;

    #[test]
    fn test_parse_docker_inspect() {
        let inspection = ImageInspection::from_inspect_json(DOCKER_INSPECT).unwrap();
        assert_eq!(inspection.id, "sha256:4f7b2c");
        assert_eq!(
            inspection.build_at().as_deref(),
            Some("2021-06-01T10:00:00.000000000Z")
        );
        assert_eq!(inspection.ocp_versions(), Some("v4.6-v4.8"));
        assert_eq!(inspection.configs_path(), "/catalog");
    }

    #[test]
    fn test_build_date_label_fallback() {
        let json = r#"[{"Id":"sha256:1","Config":{"Labels":{"build-date":"2021-03-03"}}}]"#;
        let inspection = ImageInspection::from_inspect_json(json).unwrap();
        assert_eq!(inspection.build_at().as_deref(), Some("2021-03-03"));
    }

    #[test]
    fn test_null_labels_and_default_configs_path() {
        let json = r#"[{"Id":"sha256:1","Created":"2021","Config":{"Labels":null}}]"#;
        let inspection = ImageInspection::from_inspect_json(json).unwrap();
        assert!(inspection.labels.is_empty());
        assert_eq!(inspection.configs_path(), DEFAULT_CONFIGS_PATH);
    }

    #[test]
    fn test_has_label_value() {
        let inspection = ImageInspection::from_inspect_json(DOCKER_INSPECT).unwrap();
        assert!(inspection.has_label_value("com.redhat.openshift.versions", "v4.6-v4.8"));
        assert!(!inspection.has_label_value("com.redhat.openshift.versions", "v4.9"));
        assert!(!inspection.has_label_value("", ""));
    }

    #[test]
    fn test_empty_array_is_error() {
        let result = ImageInspection::from_inspect_json("[]");
        assert!(result.unwrap_err().to_string().contains("no image"));
    }

    #[test]
    fn test_invalid_json_is_error() {
        let result = ImageInspection::from_inspect_json("Error: no such image");
        assert!(result.is_err());
    }
}
