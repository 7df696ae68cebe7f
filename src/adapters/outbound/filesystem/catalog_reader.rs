use crate::audit::domain::{Catalog, CatalogBundle, CatalogChannel, ChannelEntry};
use crate::ports::outbound::CatalogReader;
use crate::shared::security::read_untrusted_file;
use crate::shared::Result;
use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use walkdir::WalkDir;

const PACKAGE_SCHEMA: &str = "olm.package";
const CHANNEL_SCHEMA: &str = "olm.channel";
const BUNDLE_SCHEMA: &str = "olm.bundle";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageDocument {
    name: String,
    #[serde(default)]
    default_channel: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelDocument {
    package: String,
    name: String,
    #[serde(default)]
    entries: Vec<EntryDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryDocument {
    name: String,
    #[serde(default)]
    replaces: Option<String>,
    #[serde(default)]
    skips: Vec<String>,
    #[serde(default)]
    skip_range: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BundleDocument {
    name: String,
    package: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    properties: Vec<PropertyDocument>,
}

#[derive(Debug, Deserialize)]
struct PropertyDocument {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    value: Value,
}

impl BundleDocument {
    /// Version from the `olm.package` property
    fn version(&self) -> Option<String> {
        self.properties
            .iter()
            .filter(|p| p.kind == PACKAGE_SCHEMA)
            .find_map(|p| p.value.get("version"))
            .and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }
}

#[derive(Default)]
struct Documents {
    packages: Vec<(String, Option<String>)>,
    channels: Vec<(String, CatalogChannel)>,
    bundles: Vec<CatalogBundle>,
}

/// FileBasedCatalogReader adapter reading a file-based catalog (FBC)
///
/// Walks the catalog directory for `.json`, `.yaml` and `.yml` files. JSON
/// files may hold a stream of concatenated objects; YAML files may hold
/// several `---` separated documents. Documents with other schemas are
/// ignored. Malformed documents, and files that cannot be read or parsed,
/// are skipped with a warning.
pub struct FileBasedCatalogReader;

impl FileBasedCatalogReader {
    pub fn new() -> Self {
        Self
    }

    fn parse_file(path: &Path, content: &str) -> Result<Vec<Value>> {
        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        if is_json {
            serde_json::Deserializer::from_str(content)
                .into_iter::<Value>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .with_context(|| format!("invalid JSON in {}", path.display()))
        } else {
            serde_yaml_ng::Deserializer::from_str(content)
                .map(Value::deserialize)
                .collect::<std::result::Result<Vec<_>, _>>()
                .with_context(|| format!("invalid YAML in {}", path.display()))
        }
    }

    fn collect(documents: &mut Documents, path: &Path, value: Value) {
        let schema = value
            .get("schema")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let outcome = match schema.as_str() {
            PACKAGE_SCHEMA => serde_json::from_value::<PackageDocument>(value).map(|doc| {
                documents.packages.push((doc.name, doc.default_channel));
            }),
            CHANNEL_SCHEMA => serde_json::from_value::<ChannelDocument>(value).map(|doc| {
                let channel = CatalogChannel {
                    name: doc.name,
                    entries: doc
                        .entries
                        .into_iter()
                        .map(|e| ChannelEntry {
                            name: e.name,
                            replaces: e.replaces,
                            skips: e.skips,
                            skip_range: e.skip_range,
                        })
                        .collect(),
                };
                documents.channels.push((doc.package, channel));
            }),
            BUNDLE_SCHEMA => serde_json::from_value::<BundleDocument>(value).map(|doc| {
                documents.bundles.push(CatalogBundle {
                    version: doc.version(),
                    name: doc.name,
                    package: doc.package,
                    image: doc.image,
                });
            }),
            _ => Ok(()),
        };

        if let Err(e) = outcome {
            tracing::warn!(
                file = %path.display(),
                schema = %schema,
                "skipping malformed catalog document: {}",
                e
            );
        }
    }
}

impl Default for FileBasedCatalogReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogReader for FileBasedCatalogReader {
    fn read_catalog(&self, catalog_dir: &Path) -> Result<Catalog> {
        if !catalog_dir.is_dir() {
            anyhow::bail!("catalog directory {} not found", catalog_dir.display());
        }

        let mut documents = Documents::default();
        let walker = WalkDir::new(catalog_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.')
            });

        for entry in walker {
            let entry =
                entry.with_context(|| format!("unable to walk {}", catalog_dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("json" | "yaml" | "yml")
            ) {
                continue;
            }

            let values = read_untrusted_file(path).and_then(|c| Self::parse_file(path, &c));
            match values {
                Ok(values) => {
                    for value in values {
                        Self::collect(&mut documents, path, value);
                    }
                }
                Err(e) => {
                    tracing::warn!(file = %path.display(), "skipping catalog file: {:#}", e);
                }
            }
        }

        tracing::debug!(
            packages = documents.packages.len(),
            channels = documents.channels.len(),
            bundles = documents.bundles.len(),
            "catalog documents read"
        );

        Ok(Catalog::assemble(
            documents.packages,
            documents.channels,
            documents.bundles,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const ETCD_JSON: &str = r#"{
    "schema": "olm.package",
    "name": "etcd",
    "defaultChannel": "singlenamespace-alpha"
}
{
    "schema": "olm.channel",
    "package": "etcd",
    "name": "singlenamespace-alpha",
    "entries": [
        {"name": "etcdoperator.v0.9.2"},
        {"name": "etcdoperator.v0.9.4", "replaces": "etcdoperator.v0.9.2", "skipRange": ">=0.9.0 <0.9.4"}
    ]
}
{
    "schema": "olm.bundle",
    "name": "etcdoperator.v0.9.4",
    "package": "etcd",
    "image": "quay.io/operatorhubio/etcd@sha256:abc",
    "properties": [
        {"type": "olm.package", "value": {"packageName": "etcd", "version": "0.9.4"}}
    ]
}
{
    "schema": "olm.bundle",
    "name": "etcdoperator.v0.9.2",
    "package": "etcd",
    "image": "quay.io/operatorhubio/etcd@sha256:def"
}"#;

    const MEMCACHED_YAML: &str = r#"---
schema: olm.package
name: memcached-operator
defaultChannel: alpha
---
schema: olm.channel
package: memcached-operator
name: alpha
entries:
  - name: memcached-operator.v0.0.1
---
schema: olm.bundle
name: memcached-operator.v0.0.1
package: memcached-operator
image: quay.io/example/memcached-operator-bundle:v0.0.1
---
schema: olm.deprecations
package: memcached-operator
"#;

    #[test]
    fn test_read_mixed_catalog() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("etcd")).unwrap();
        fs::write(dir.path().join("etcd/catalog.json"), ETCD_JSON).unwrap();
        fs::create_dir_all(dir.path().join("memcached-operator")).unwrap();
        fs::write(
            dir.path().join("memcached-operator/index.yaml"),
            MEMCACHED_YAML,
        )
        .unwrap();

        let catalog = FileBasedCatalogReader::new()
            .read_catalog(dir.path())
            .unwrap();

        assert_eq!(catalog.packages.len(), 2);
        assert_eq!(catalog.bundle_count(), 3);

        let etcd = &catalog.packages[0];
        assert_eq!(etcd.name, "etcd");
        assert_eq!(etcd.default_channel.as_deref(), Some("singlenamespace-alpha"));
        assert_eq!(etcd.bundles[0].version.as_deref(), Some("0.9.4"));
        assert!(etcd.is_head("etcdoperator.v0.9.4"));
        assert!(!etcd.is_head("etcdoperator.v0.9.2"));
        assert_eq!(
            etcd.channels[0].entries[1].skip_range.as_deref(),
            Some(">=0.9.0 <0.9.4")
        );
    }

    #[test]
    fn test_malformed_document_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("index.yaml"),
            "schema: olm.bundle\nname: broken\n---\nschema: olm.package\nname: ok\n",
        )
        .unwrap();

        let catalog = FileBasedCatalogReader::new()
            .read_catalog(dir.path())
            .unwrap();
        assert_eq!(catalog.packages.len(), 1);
        assert_eq!(catalog.packages[0].name, "ok");
    }

    #[test]
    fn test_unparsable_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("etcd")).unwrap();
        fs::write(dir.path().join("etcd/catalog.json"), ETCD_JSON).unwrap();
        fs::create_dir_all(dir.path().join("broken")).unwrap();
        fs::write(
            dir.path().join("broken/catalog.json"),
            r#"{"schema": "olm.package", "name": "broken""#,
        )
        .unwrap();
        fs::write(dir.path().join("broken/index.yaml"), "schema: [olm.package
").unwrap();

        let catalog = FileBasedCatalogReader::new()
            .read_catalog(dir.path())
            .unwrap();
        assert_eq!(catalog.packages.len(), 1);
        assert_eq!(catalog.packages[0].name, "etcd");
        assert_eq!(catalog.bundle_count(), 2);
    }

    #[test]
    fn test_empty_catalog() {
        let dir = TempDir::new().unwrap();
        let catalog = FileBasedCatalogReader::new()
            .read_catalog(dir.path())
            .unwrap();
        assert!(catalog.packages.is_empty());
    }

    #[test]
    fn test_missing_catalog_dir() {
        let result =
            FileBasedCatalogReader::new().read_catalog(Path::new("/nonexistent/configs"));
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
