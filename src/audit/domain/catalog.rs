use std::collections::{BTreeMap, HashSet};

/// One entry of an `olm.channel` document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelEntry {
    pub name: String,
    pub replaces: Option<String>,
    pub skips: Vec<String>,
    pub skip_range: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogChannel {
    pub name: String,
    pub entries: Vec<ChannelEntry>,
}

impl CatalogChannel {
    /// Names of the entries that no other entry replaces or skips
    ///
    /// A well-formed channel has exactly one head; a broken upgrade graph can
    /// yield several, and all of them are reported.
    pub fn heads(&self) -> Vec<&str> {
        let superseded: HashSet<&str> = self
            .entries
            .iter()
            .flat_map(|e| {
                e.replaces
                    .iter()
                    .map(String::as_str)
                    .chain(e.skips.iter().map(String::as_str))
            })
            .collect();

        self.entries
            .iter()
            .map(|e| e.name.as_str())
            .filter(|name| !superseded.contains(name))
            .collect()
    }

    pub fn entry(&self, bundle_name: &str) -> Option<&ChannelEntry> {
        self.entries.iter().find(|e| e.name == bundle_name)
    }
}

/// An `olm.bundle` document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogBundle {
    pub name: String,
    pub package: String,
    pub image: String,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPackage {
    pub name: String,
    pub default_channel: Option<String>,
    pub channels: Vec<CatalogChannel>,
    pub bundles: Vec<CatalogBundle>,
}

impl CatalogPackage {
    /// Channels that list `bundle_name` as an entry, in catalog order
    pub fn channels_of(&self, bundle_name: &str) -> Vec<&CatalogChannel> {
        self.channels
            .iter()
            .filter(|c| c.entry(bundle_name).is_some())
            .collect()
    }

    pub fn is_head(&self, bundle_name: &str) -> bool {
        self.channels
            .iter()
            .any(|c| c.heads().contains(&bundle_name))
    }
}

/// The package → channel → bundle graph of an index image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub packages: Vec<CatalogPackage>,
}

impl Catalog {
    /// Assembles packages from loosely ordered catalog documents
    ///
    /// Channels and bundles referring to a package without an `olm.package`
    /// document still create the package, so nothing in the index is lost.
    pub fn assemble(
        packages: Vec<(String, Option<String>)>,
        channels: Vec<(String, CatalogChannel)>,
        bundles: Vec<CatalogBundle>,
    ) -> Self {
        let mut by_name: BTreeMap<String, CatalogPackage> = BTreeMap::new();

        for (name, default_channel) in packages {
            let package = by_name.entry(name.clone()).or_insert_with(|| CatalogPackage {
                name,
                ..Default::default()
            });
            package.default_channel = default_channel;
        }

        for (package_name, channel) in channels {
            by_name
                .entry(package_name.clone())
                .or_insert_with(|| CatalogPackage {
                    name: package_name,
                    ..Default::default()
                })
                .channels
                .push(channel);
        }

        for bundle in bundles {
            by_name
                .entry(bundle.package.clone())
                .or_insert_with(|| CatalogPackage {
                    name: bundle.package.clone(),
                    ..Default::default()
                })
                .bundles
                .push(bundle);
        }

        Self {
            packages: by_name.into_values().collect(),
        }
    }

    pub fn bundle_count(&self) -> usize {
        self.packages.iter().map(|p| p.bundles.len()).sum()
    }
}
