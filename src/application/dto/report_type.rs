use serde::{Deserialize, Serialize};

/// The three report granularities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Bundles,
    Packages,
    Channels,
}

impl ReportType {
    pub const ALL: [ReportType; 3] = [
        ReportType::Bundles,
        ReportType::Packages,
        ReportType::Channels,
    ];

    /// Prefix of the report file name
    pub fn tag(self) -> &'static str {
        match self {
            ReportType::Bundles => "bundles",
            ReportType::Packages => "packages",
            ReportType::Channels => "channels",
        }
    }

    /// Recovers the report type from a report file name prefix
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| file_name.starts_with(&format!("{}_", t.tag())))
    }
}

impl std::str::FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bundles" | "bundle" => Ok(ReportType::Bundles),
            "packages" | "package" => Ok(ReportType::Packages),
            "channels" | "channel" => Ok(ReportType::Channels),
            _ => Err(format!(
                "Invalid report: {}. Please specify 'bundles', 'packages' or 'channels'",
                s
            )),
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
