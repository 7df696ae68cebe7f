use crate::audit::domain::IssueCategory;
use serde::{Deserialize, Serialize};

/// One row of the bundles report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleColumn {
    pub package_name: String,
    pub bundle_name: String,
    pub bundle_image_path: String,
    pub default_channel: String,
    pub channels: Vec<String>,
    pub is_head_of_channel: bool,
    pub builder: String,
    pub build_at: String,
    pub ocp_labels: String,
    pub found_label: bool,
    pub kinds_deprecate_apis: Vec<String>,
    pub has_webhooks: bool,
    pub multiple_architectures: Vec<String>,
    pub has_scorecard_suggestions: bool,
    pub has_scorecard_failing_tests: bool,
    pub scorecard_failing_tests: Vec<String>,
    pub scorecard_suggestions: Vec<String>,
    pub has_validator_errors: bool,
    pub has_validator_warnings: bool,
    pub validator_errors: Vec<String>,
    pub validator_warnings: Vec<String>,
    pub has_invalid_versioning: bool,
    pub has_invalid_skip_range: bool,
    pub skips: Vec<String>,
    pub skip_range: String,
    pub has_support_for_all_namespaces: bool,
    pub has_support_for_single_namespace: bool,
    pub has_support_for_own_namespace: bool,
    pub has_support_for_multi_namespace: bool,
    pub has_infra_annotation: bool,
    pub has_possible_performance_issues: bool,
    pub has_custom_scorecard_tests: bool,
    pub audit_errors: Vec<String>,
    /// Category of each entry of `audit_errors`, in the same order
    pub audit_error_categories: Vec<IssueCategory>,
}

/// One row of the packages report, aggregated over the channel heads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageColumn {
    pub package_name: String,
    pub kinds_deprecate_apis: Vec<String>,
    pub has_webhooks: bool,
    pub multiple_architectures: Vec<String>,
    pub has_scorecard_suggestions: bool,
    pub has_scorecard_failing_tests: bool,
    pub scorecard_failing_tests: Vec<String>,
    pub has_validator_errors: bool,
    pub has_validator_warnings: bool,
    pub has_invalid_versioning: bool,
    pub has_invalid_skip_range: bool,
    pub is_multi_channel: bool,
    pub has_support_for_all_namespaces: bool,
    pub has_support_for_single_namespace: bool,
    pub has_support_for_own_namespace: bool,
    pub has_support_for_multi_namespace: bool,
    pub has_infra_annotation: bool,
    pub has_possible_performance_issues: bool,
    pub has_custom_scorecard_tests: bool,
    pub audit_errors: Vec<String>,
}

/// One row of the channels report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelColumn {
    pub package_name: String,
    pub channel_name: String,
    pub is_using_skips: bool,
    pub is_using_skip_range: bool,
    pub is_following_name_convention: bool,
    pub has_invalid_versioning: bool,
    pub has_invalid_skip_range: bool,
    pub audit_errors: Vec<String>,
}
