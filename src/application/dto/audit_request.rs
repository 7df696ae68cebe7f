/// AuditRequest - Internal request DTO for the index audit use case
#[derive(Debug, Clone, Default)]
pub struct AuditRequest {
    /// Index image to audit
    pub index_image: String,
    /// Package name patterns to include (empty = all packages)
    pub filter_patterns: Vec<String>,
    /// Maximum number of packages to audit
    pub limit: Option<usize>,
    /// Only audit the heads of the channels
    pub head_only: bool,
    pub disable_scorecard: bool,
    pub disable_validators: bool,
    /// Image label to look for on every bundle, with its expected value
    pub label: Option<(String, String)>,
}

impl AuditRequest {
    pub fn new(index_image: impl Into<String>) -> Self {
        Self {
            index_image: index_image.into(),
            ..Default::default()
        }
    }
}
