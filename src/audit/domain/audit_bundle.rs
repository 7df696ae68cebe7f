use super::bundle_issue::BundleIssue;
use super::bundle_manifest::BundleManifest;
use super::catalog::{CatalogBundle, CatalogPackage, ChannelEntry};
use super::check_results::{ScorecardReport, ValidatorReport};

/// One operator bundle under audit
///
/// Created from the index catalog, then filled in stage by stage. Every
/// stage records failures as [`BundleIssue`]s and carries on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditBundle {
    pub package_name: String,
    pub bundle_name: String,
    pub image_path: String,
    pub default_channel: Option<String>,
    pub channels: Vec<String>,
    pub is_head_of_channel: bool,
    /// Upgrade edges as published in the catalog (union over channels)
    pub catalog_skips: Vec<String>,
    pub catalog_skip_range: Option<String>,
    pub bundle: Option<BundleManifest>,
    pub issues: Vec<BundleIssue>,
    pub build_at: Option<String>,
    pub ocp_label: Option<String>,
    pub found_label: bool,
    pub validator: Option<ValidatorReport>,
    pub scorecard: Option<ScorecardReport>,
}

impl AuditBundle {
    pub fn new(
        package_name: impl Into<String>,
        bundle_name: impl Into<String>,
        image_path: impl Into<String>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            bundle_name: bundle_name.into(),
            image_path: image_path.into(),
            ..Default::default()
        }
    }

    /// Builds the audit record of `bundle` with its channel membership in `package`
    pub fn from_catalog(package: &CatalogPackage, bundle: &CatalogBundle) -> Self {
        let channels = package.channels_of(&bundle.name);
        let entries: Vec<&ChannelEntry> = channels
            .iter()
            .filter_map(|c| c.entry(&bundle.name))
            .collect();

        let mut catalog_skips: Vec<String> = entries
            .iter()
            .flat_map(|e| e.skips.iter().cloned())
            .collect();
        catalog_skips.sort();
        catalog_skips.dedup();

        Self {
            package_name: package.name.clone(),
            bundle_name: bundle.name.clone(),
            image_path: bundle.image.clone(),
            default_channel: package.default_channel.clone(),
            channels: channels.iter().map(|c| c.name.clone()).collect(),
            is_head_of_channel: package.is_head(&bundle.name),
            catalog_skips,
            catalog_skip_range: entries.iter().find_map(|e| e.skip_range.clone()),
            ..Default::default()
        }
    }

    pub fn record(&mut self, issue: BundleIssue) {
        tracing::warn!(bundle = %self.bundle_name, "{}", issue);
        self.issues.push(issue);
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Issue texts as shown in report "Issues" columns
    pub fn issue_messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// Skips declared by the catalog or the CSV
    pub fn skips(&self) -> Vec<String> {
        let mut skips = self.catalog_skips.clone();
        if let Some(bundle) = &self.bundle {
            skips.extend(bundle.csv.spec.skips.iter().cloned());
        }
        skips.sort();
        skips.dedup();
        skips
    }

    /// skipRange declared by the CSV, falling back to the catalog entry
    pub fn skip_range(&self) -> Option<&str> {
        self.bundle
            .as_ref()
            .and_then(|b| b.csv.skip_range())
            .or(self.catalog_skip_range.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::domain::catalog::CatalogChannel;

    fn package() -> CatalogPackage {
        CatalogPackage {
            name: "etcd".to_string(),
            default_channel: Some("alpha".to_string()),
            channels: vec![
                CatalogChannel {
                    name: "alpha".to_string(),
                    entries: vec![
                        ChannelEntry {
                            name: "etcd.v1".to_string(),
                            ..Default::default()
                        },
                        ChannelEntry {
                            name: "etcd.v2".to_string(),
                            replaces: Some("etcd.v1".to_string()),
                            skips: vec!["etcd.v1.1".to_string()],
                            skip_range: Some(">=1.0.0 <2.0.0".to_string()),
                        },
                    ],
                },
                CatalogChannel {
                    name: "stable".to_string(),
                    entries: vec![ChannelEntry {
                        name: "etcd.v1".to_string(),
                        ..Default::default()
                    }],
                },
            ],
            bundles: vec![],
        }
    }

    #[test]
    fn test_from_catalog_collects_channels_and_edges() {
        let bundle = CatalogBundle {
            name: "etcd.v2".to_string(),
            package: "etcd".to_string(),
            image: "quay.io/etcd/bundle:v2".to_string(),
            version: None,
        };
        let audit = AuditBundle::from_catalog(&package(), &bundle);
        assert_eq!(audit.channels, vec!["alpha"]);
        assert!(audit.is_head_of_channel);
        assert_eq!(audit.skips(), vec!["etcd.v1.1"]);
        assert_eq!(audit.skip_range(), Some(">=1.0.0 <2.0.0"));
        assert_eq!(audit.default_channel.as_deref(), Some("alpha"));
    }

    #[test]
    fn test_head_in_any_channel() {
        let bundle = CatalogBundle {
            name: "etcd.v1".to_string(),
            package: "etcd".to_string(),
            image: "quay.io/etcd/bundle:v1".to_string(),
            version: None,
        };
        let audit = AuditBundle::from_catalog(&package(), &bundle);
        assert_eq!(audit.channels, vec!["alpha", "stable"]);
        // replaced in alpha, but the only entry of stable
        assert!(audit.is_head_of_channel);
    }

    #[test]
    fn test_record_issue() {
        let mut audit = AuditBundle::new("etcd", "etcd.v1", "");
        assert!(!audit.has_issues());
        audit.record(BundleIssue::MissingImagePath);
        assert!(audit.has_issues());
        assert_eq!(
            audit.issue_messages(),
            vec!["bundle image path not found in the index catalog"]
        );
    }
}
