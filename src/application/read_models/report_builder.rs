use super::columns::{BundleColumn, ChannelColumn, PackageColumn};
use super::report::{AuditReport, Report, ReportFlags};
use crate::application::dto::{AuditResponse, AuditedPackage, ReportType};
use crate::audit::domain::{AuditBundle, BundleIssue};
use crate::audit::services::{BundleChecks, BundleFindings, VersioningRules};

/// ReportBuilder turns an audit response into report rows
///
/// Findings are derived per bundle with [`BundleChecks`]; package and
/// channel rows aggregate them.
pub struct ReportBuilder<'a> {
    response: &'a AuditResponse,
    flags: ReportFlags,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(response: &'a AuditResponse, flags: ReportFlags) -> Self {
        Self { response, flags }
    }

    pub fn build(&self, report_type: ReportType) -> AuditReport {
        match report_type {
            ReportType::Bundles => AuditReport::Bundles(self.report(self.bundle_columns())),
            ReportType::Packages => AuditReport::Packages(self.report(self.package_columns())),
            ReportType::Channels => AuditReport::Channels(self.report(self.channel_columns())),
        }
    }

    fn report<C>(&self, columns: Vec<C>) -> Report<C> {
        Report {
            columns,
            flags: self.flags.clone(),
            index_image_inspect: self.response.index_inspection.clone(),
            generated_at: self.response.generated_at,
            run_id: self.response.run_id,
        }
    }

    /// One row per audited bundle, in catalog order
    pub fn bundle_columns(&self) -> Vec<BundleColumn> {
        self.response.bundles().map(bundle_column).collect()
    }

    /// One row per audited package
    pub fn package_columns(&self) -> Vec<PackageColumn> {
        self.response.packages.iter().map(package_column).collect()
    }

    /// One row per channel with at least one audited bundle
    pub fn channel_columns(&self) -> Vec<ChannelColumn> {
        self.response
            .packages
            .iter()
            .flat_map(|package| {
                package.channels.iter().filter_map(move |channel| {
                    let bundles: Vec<&AuditBundle> = package
                        .bundles
                        .iter()
                        .filter(|b| b.channels.contains(channel))
                        .collect();
                    (!bundles.is_empty()).then(|| channel_column(package, channel, &bundles))
                })
            })
            .collect()
    }
}

fn bundle_column(audit: &AuditBundle) -> BundleColumn {
    let findings = BundleChecks::evaluate(audit);
    BundleColumn {
        package_name: audit.package_name.clone(),
        bundle_name: audit.bundle_name.clone(),
        bundle_image_path: audit.image_path.clone(),
        default_channel: audit.default_channel.clone().unwrap_or_default(),
        channels: audit.channels.clone(),
        is_head_of_channel: audit.is_head_of_channel,
        builder: findings.builder.unwrap_or_default(),
        build_at: audit.build_at.clone().unwrap_or_default(),
        ocp_labels: audit.ocp_label.clone().unwrap_or_default(),
        found_label: audit.found_label,
        kinds_deprecate_apis: findings.deprecated_api_kinds,
        has_webhooks: findings.has_webhooks,
        multiple_architectures: findings.architectures,
        has_scorecard_suggestions: findings.has_scorecard_suggestions,
        has_scorecard_failing_tests: findings.has_scorecard_failing_tests,
        scorecard_failing_tests: findings.scorecard_failing_tests,
        scorecard_suggestions: findings.scorecard_suggestions,
        has_validator_errors: findings.has_validator_errors,
        has_validator_warnings: findings.has_validator_warnings,
        validator_errors: findings.validator_errors,
        validator_warnings: findings.validator_warnings,
        has_invalid_versioning: findings.has_invalid_versioning,
        has_invalid_skip_range: findings.has_invalid_skip_range,
        skips: audit.skips(),
        skip_range: audit.skip_range().unwrap_or_default().to_string(),
        has_support_for_all_namespaces: findings.install_modes.all_namespaces,
        has_support_for_single_namespace: findings.install_modes.single_namespace,
        has_support_for_own_namespace: findings.install_modes.own_namespace,
        has_support_for_multi_namespace: findings.install_modes.multi_namespace,
        has_infra_annotation: findings.has_infra_annotation,
        has_possible_performance_issues: findings.has_possible_performance_issues,
        has_custom_scorecard_tests: findings.has_custom_scorecard_tests,
        audit_errors: audit.issue_messages(),
        audit_error_categories: audit.issues.iter().map(BundleIssue::category).collect(),
    }
}

fn package_column(package: &AuditedPackage) -> PackageColumn {
    let heads: Vec<&AuditBundle> = package
        .bundles
        .iter()
        .filter(|b| b.is_head_of_channel)
        .collect();
    let selected = if heads.is_empty() {
        package.bundles.iter().collect()
    } else {
        heads
    };

    let mut column = PackageColumn {
        package_name: package.name.clone(),
        is_multi_channel: package.channels.len() > 1,
        ..Default::default()
    };

    for audit in selected {
        let f = BundleChecks::evaluate(audit);
        column.kinds_deprecate_apis.extend(f.deprecated_api_kinds);
        column.has_webhooks |= f.has_webhooks;
        column.multiple_architectures.extend(f.architectures);
        column.has_scorecard_suggestions |= f.has_scorecard_suggestions;
        column.has_scorecard_failing_tests |= f.has_scorecard_failing_tests;
        column.scorecard_failing_tests.extend(f.scorecard_failing_tests);
        column.has_validator_errors |= f.has_validator_errors;
        column.has_validator_warnings |= f.has_validator_warnings;
        column.has_invalid_versioning |= f.has_invalid_versioning;
        column.has_invalid_skip_range |= f.has_invalid_skip_range;
        column.has_support_for_all_namespaces |= f.install_modes.all_namespaces;
        column.has_support_for_single_namespace |= f.install_modes.single_namespace;
        column.has_support_for_own_namespace |= f.install_modes.own_namespace;
        column.has_support_for_multi_namespace |= f.install_modes.multi_namespace;
        column.has_infra_annotation |= f.has_infra_annotation;
        column.has_possible_performance_issues |= f.has_possible_performance_issues;
        column.has_custom_scorecard_tests |= f.has_custom_scorecard_tests;
        column.audit_errors.extend(prefixed_issues(audit));
    }

    sort_unique(&mut column.kinds_deprecate_apis);
    sort_unique(&mut column.multiple_architectures);
    sort_unique(&mut column.scorecard_failing_tests);
    column
}

fn channel_column(
    package: &AuditedPackage,
    channel: &str,
    bundles: &[&AuditBundle],
) -> ChannelColumn {
    let findings: Vec<BundleFindings> = bundles.iter().map(|b| BundleChecks::evaluate(b)).collect();
    ChannelColumn {
        package_name: package.name.clone(),
        channel_name: channel.to_string(),
        is_using_skips: findings.iter().any(|f| f.is_using_skips),
        is_using_skip_range: findings.iter().any(|f| f.is_using_skip_range),
        is_following_name_convention: VersioningRules::follows_channel_naming(channel),
        has_invalid_versioning: findings.iter().any(|f| f.has_invalid_versioning),
        has_invalid_skip_range: findings.iter().any(|f| f.has_invalid_skip_range),
        audit_errors: bundles.iter().flat_map(|b| prefixed_issues(b)).collect(),
    }
}

fn prefixed_issues(audit: &AuditBundle) -> Vec<String> {
    audit
        .issue_messages()
        .into_iter()
        .map(|message| format!("{}: {}", audit.bundle_name, message))
        .collect()
}

fn sort_unique(values: &mut Vec<String>) {
    values.sort();
    values.dedup();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::domain::{ImageInspection, IssueCategory, ValidatorReport};

    fn bundle(name: &str, channels: &[&str], head: bool) -> AuditBundle {
        let mut audit = AuditBundle::new("etcd", name, format!("quay.io/etcd/bundle:{}", name));
        audit.channels = channels.iter().map(|c| c.to_string()).collect();
        audit.is_head_of_channel = head;
        audit
    }

    fn response(bundles: Vec<AuditBundle>) -> AuditResponse {
        AuditResponse::new(
            ImageInspection::default(),
            vec![AuditedPackage {
                name: "etcd".to_string(),
                default_channel: Some("stable".to_string()),
                channels: vec!["stable".to_string(), "clusterwide-alpha".to_string()],
                bundles,
            }],
        )
    }

    #[test]
    fn test_every_bundle_has_one_row() {
        let mut failed = bundle("etcd.v2", &["stable"], true);
        failed.record(BundleIssue::Download {
            image: failed.image_path.clone(),
            details: "manifest unknown".to_string(),
        });
        let response = response(vec![bundle("etcd.v1", &["stable"], false), failed]);

        let rows = ReportBuilder::new(&response, ReportFlags::default()).bundle_columns();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].audit_errors.is_empty());
        assert_eq!(rows[1].audit_errors.len(), 1);
        assert!(rows[1].audit_errors[0].contains("manifest unknown"));
        assert_eq!(
            rows[1].audit_error_categories,
            vec![IssueCategory::Environment]
        );

        let json = serde_json::to_value(&rows[1]).unwrap();
        assert_eq!(json["audit_error_categories"][0], "environment");
    }

    #[test]
    fn test_package_row_aggregates_heads_only() {
        let mut old = bundle("etcd.v1", &["stable"], false);
        old.validator = Some(ValidatorReport {
            errors: vec!["old error".to_string()],
            warnings: vec![],
        });
        let mut head = bundle("etcd.v2", &["stable"], true);
        head.validator = Some(ValidatorReport {
            errors: vec![],
            warnings: vec!["icon missing".to_string()],
        });
        head.record(BundleIssue::Scorecard {
            details: "no cluster".to_string(),
        });
        let response = response(vec![old, head]);

        let rows = ReportBuilder::new(&response, ReportFlags::default()).package_columns();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert!(!row.has_validator_errors);
        assert!(row.has_validator_warnings);
        assert!(row.is_multi_channel);
        assert_eq!(row.audit_errors, vec!["etcd.v2: unable to run scorecard: no cluster"]);
    }

    #[test]
    fn test_package_row_falls_back_to_all_bundles() {
        let mut only = bundle("etcd.v1", &["stable"], false);
        only.validator = Some(ValidatorReport {
            errors: vec!["broken".to_string()],
            warnings: vec![],
        });
        let response = response(vec![only]);

        let rows = ReportBuilder::new(&response, ReportFlags::default()).package_columns();
        assert!(rows[0].has_validator_errors);
    }

    #[test]
    fn test_channel_rows_per_channel_with_bundles() {
        let mut v1 = bundle("etcd.v1", &["stable", "clusterwide-alpha"], false);
        v1.catalog_skips = vec!["etcd.v0".to_string()];
        let mut v2 = bundle("etcd.v2", &["stable"], true);
        v2.catalog_skip_range = Some("not a range".to_string());
        let response = AuditResponse::new(
            ImageInspection::default(),
            vec![AuditedPackage {
                name: "etcd".to_string(),
                default_channel: None,
                channels: vec![
                    "stable".to_string(),
                    "clusterwide-alpha".to_string(),
                    "empty".to_string(),
                ],
                bundles: vec![v1, v2],
            }],
        );

        let rows = ReportBuilder::new(&response, ReportFlags::default()).channel_columns();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].channel_name, "stable");
        assert!(rows[0].is_using_skips);
        assert!(rows[0].is_using_skip_range);
        assert!(rows[0].has_invalid_skip_range);
        assert!(rows[0].is_following_name_convention);

        assert_eq!(rows[1].channel_name, "clusterwide-alpha");
        assert!(rows[1].is_using_skips);
        assert!(!rows[1].is_using_skip_range);
        assert!(!rows[1].is_following_name_convention);
    }

    #[test]
    fn test_build_carries_run_metadata() {
        let response = response(vec![bundle("etcd.v1", &["stable"], true)]);
        let flags = ReportFlags {
            index_image: "quay.io/operatorhubio/catalog:latest".to_string(),
            ..Default::default()
        };

        let report = ReportBuilder::new(&response, flags).build(ReportType::Channels);
        assert_eq!(report.report_type(), ReportType::Channels);
        assert_eq!(report.row_count(), 1);
        assert_eq!(report.generated_at(), response.generated_at);
        assert_eq!(
            report.file_name("json"),
            "channels_quay.io_operatorhubio_catalog_latest.json"
        );
    }
}
