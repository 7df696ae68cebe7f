use serde::{Deserialize, Serialize};

/// Output format enumeration for audit reports
///
/// `All` writes every format; formatters themselves only ever produce a
/// single one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Structured JSON, for programmatic consumption
    Json,
    /// Spreadsheet with conditional styling
    Xlsx,
    /// Both of the above (default)
    All,
}

impl OutputFormat {
    /// Concrete formats to write for this selection
    pub fn targets(self) -> Vec<OutputFormat> {
        match self {
            OutputFormat::All => vec![OutputFormat::Json, OutputFormat::Xlsx],
            single => vec![single],
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "xlsx" | "xls" => Ok(OutputFormat::Xlsx),
            "all" => Ok(OutputFormat::All),
            _ => Err(format!(
                "Invalid format: {}. Please specify 'json', 'xlsx' or 'all'",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Xlsx => write!(f, "xlsx"),
            OutputFormat::All => write!(f, "all"),
        }
    }
}
