use super::versioning::VersioningRules;
use crate::audit::domain::bundle_manifest::{ARCH_LABEL_PREFIX, INFRA_FEATURES_ANNOTATION};
use crate::audit::domain::{AuditBundle, BundleManifest};
use crate::audit::policies::DeprecatedApiPolicy;
use serde_yaml_ng::Value;

/// Image of the stock scorecard tests; anything else is a custom test
pub const DEFAULT_SCORECARD_IMAGE: &str = "quay.io/operator-framework/scorecard-test";

/// Install modes a CSV declares as supported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallModeSupport {
    pub all_namespaces: bool,
    pub single_namespace: bool,
    pub own_namespace: bool,
    pub multi_namespace: bool,
}

/// Everything the reports need to know about one audited bundle
///
/// Computed once per bundle; bundle, package and channel rows are all
/// derived from these values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleFindings {
    pub deprecated_api_kinds: Vec<String>,
    pub has_webhooks: bool,
    pub architectures: Vec<String>,
    pub install_modes: InstallModeSupport,
    pub has_infra_annotation: bool,
    pub has_possible_performance_issues: bool,
    pub has_custom_scorecard_tests: bool,
    pub builder: Option<String>,
    pub is_using_skips: bool,
    pub is_using_skip_range: bool,
    pub has_invalid_versioning: bool,
    pub has_invalid_skip_range: bool,
    pub has_scorecard_suggestions: bool,
    pub has_scorecard_failing_tests: bool,
    pub scorecard_failing_tests: Vec<String>,
    pub scorecard_suggestions: Vec<String>,
    pub has_validator_errors: bool,
    pub has_validator_warnings: bool,
    pub validator_errors: Vec<String>,
    pub validator_warnings: Vec<String>,
}

/// BundleChecks derives findings from an audited bundle
///
/// Pure functions only: the external suites have already run and their
/// outcomes are read from the [`AuditBundle`].
pub struct BundleChecks;

impl BundleChecks {
    pub fn evaluate(audit: &AuditBundle) -> BundleFindings {
        let mut findings = BundleFindings {
            is_using_skips: !audit.skips().is_empty(),
            is_using_skip_range: audit.skip_range().is_some(),
            has_invalid_skip_range: audit
                .skip_range()
                .is_some_and(|r| !VersioningRules::is_valid_skip_range(r)),
            ..Default::default()
        };

        if let Some(bundle) = &audit.bundle {
            findings.deprecated_api_kinds = DeprecatedApiPolicy::removed_kinds(&bundle.objects);
            findings.has_webhooks = !bundle.csv.spec.webhookdefinitions.is_empty();
            findings.architectures = Self::architectures(bundle);
            findings.install_modes = Self::install_modes(bundle);
            findings.has_infra_annotation = bundle
                .csv
                .annotation(INFRA_FEATURES_ANNOTATION)
                .is_some_and(|v| !v.trim().is_empty());
            findings.has_possible_performance_issues =
                Self::has_possible_performance_issues(bundle);
            findings.has_custom_scorecard_tests = Self::has_custom_scorecard_tests(bundle);
            findings.builder = bundle.builder().map(str::to_string);
            findings.has_invalid_versioning = !VersioningRules::is_valid_version(bundle.version());
        }

        if let Some(scorecard) = &audit.scorecard {
            findings.scorecard_failing_tests = scorecard.failing_tests();
            findings.scorecard_suggestions = scorecard.suggestions();
            findings.has_scorecard_failing_tests = scorecard.has_failing_tests();
            findings.has_scorecard_suggestions = !findings.scorecard_suggestions.is_empty();
        }

        if let Some(validator) = &audit.validator {
            findings.has_validator_errors = validator.has_errors();
            findings.has_validator_warnings = validator.has_warnings();
            findings.validator_errors = validator.errors.clone();
            findings.validator_warnings = validator.warnings.clone();
        }

        findings
    }

    /// Architectures declared with `operatorframework.io/arch.<arch>: supported`
    pub fn architectures(bundle: &BundleManifest) -> Vec<String> {
        bundle
            .csv
            .metadata
            .labels
            .iter()
            .filter(|(_, value)| value.as_str() == "supported")
            .filter_map(|(key, _)| key.strip_prefix(ARCH_LABEL_PREFIX))
            .map(str::to_string)
            .collect()
    }

    pub fn install_modes(bundle: &BundleManifest) -> InstallModeSupport {
        let mut support = InstallModeSupport::default();
        for mode in bundle.csv.spec.install_modes.iter().filter(|m| m.supported) {
            match mode.mode.as_str() {
                "AllNamespaces" => support.all_namespaces = true,
                "SingleNamespace" => support.single_namespace = true,
                "OwnNamespace" => support.own_namespace = true,
                "MultiNamespace" => support.multi_namespace = true,
                _ => {}
            }
        }
        support
    }

    /// True when a container of the install strategy declares neither requests nor limits
    pub fn has_possible_performance_issues(bundle: &BundleManifest) -> bool {
        bundle
            .csv
            .spec
            .install
            .spec
            .deployments
            .iter()
            .flat_map(|d| Self::containers(&d.spec))
            .any(|container| {
                let resources = container.get("resources");
                let declared = |key: &str| {
                    resources
                        .and_then(|r| r.get(key))
                        .and_then(Value::as_mapping)
                        .is_some_and(|m| !m.is_empty())
                };
                !declared("requests") && !declared("limits")
            })
    }

    fn containers(deployment_spec: &Value) -> Vec<&Value> {
        deployment_spec
            .get("template")
            .and_then(|t| t.get("spec"))
            .and_then(|s| s.get("containers"))
            .and_then(Value::as_sequence)
            .map(|seq| seq.iter().collect())
            .unwrap_or_default()
    }

    pub fn has_custom_scorecard_tests(bundle: &BundleManifest) -> bool {
        bundle
            .scorecard_test_images
            .iter()
            .any(|image| image.split(':').next() != Some(DEFAULT_SCORECARD_IMAGE))
    }
}
