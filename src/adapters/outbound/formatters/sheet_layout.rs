use crate::application::read_models::{
    AuditReport, BundleColumn, ChannelColumn, PackageColumn, Report,
};

pub const SHEET_NAME: &str = "Sheet1";

/// Zero-based row of the column headers; rows above hold the header block
pub const COLUMN_HEADER_ROW: u32 = 4;

const BUNDLE_HEADERS: [&str; 29] = [
    "Package Name",
    "Bundle Name",
    "Bundle Image Path",
    "Default Channel",
    "Channels",
    "Is Head of Channel",
    "Builder",
    "Build At",
    "OCP Labels",
    "Found Label",
    "Kinds \n (Suggestion API(s) usage)",
    "Is using Webhooks",
    "Multiple Architectures used",
    "Has Scorecard Suggestions",
    "Has Scorecard Failing Tests",
    "Has Validator Errors",
    "Has Validator Warnings",
    "Has Invalid Versioning",
    "Has Invalid SkipRange",
    "Skips",
    "SkipRange",
    "Has Support for All Namespaces",
    "Has Support for Single Namespaces",
    "Has Support for Own Namespaces",
    "Has Support for Multi Namespaces",
    "Has Infrastructure Support",
    "Has possible performance issues",
    "Has custom Scorecards",
    "Issues (To process this report)",
];

const PACKAGE_HEADERS: [&str; 19] = [
    "Package Name",
    "Kinds \n (Suggestion API(s) usage)",
    "Is using Webhooks",
    "Multiple Architectures used",
    "Has Scorecard Suggestions",
    "Has Scorecard Failing Tests",
    "Has Validator Errors",
    "Has Validator Warnings",
    "Has Invalid Versioning",
    "Has Invalid SkipRange",
    "Is multi-channel",
    "Has Support for All Namespaces",
    "Has Support for Single Namespaces",
    "Has Support for Own Namespaces",
    "Has Support for Multi Namespaces",
    "Has Infrastructure Support",
    "Has possible performance issues",
    "Has custom Scorecards",
    "Issues (To process this report)",
];

const CHANNEL_HEADERS: [&str; 8] = [
    "Package Name",
    "Channel Name",
    "Is using skips",
    "Is using skipRange",
    "Is Following Name Convention",
    "Has Invalid Versioning",
    "Has Invalid SkipRange",
    "Issues (To process this report)",
];

// N, O / P, Q
const BUNDLE_SCORECARD_COLUMNS: [u16; 2] = [13, 14];
const BUNDLE_VALIDATOR_COLUMNS: [u16; 2] = [15, 16];
// E, F / G, H
const PACKAGE_SCORECARD_COLUMNS: [u16; 2] = [4, 5];
const PACKAGE_VALIDATOR_COLUMNS: [u16; 2] = [6, 7];

/// Font colour class of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStyle {
    #[default]
    Plain,
    /// Orange: something worth a look
    Warning,
    /// Red: failing checks
    Error,
    /// Green: a checked finding in its good state
    Ok,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    pub value: String,
    pub style: CellStyle,
    /// Comment attached to the cell
    pub note: Option<String>,
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    fn flag(value: bool) -> Self {
        Self::text(if value { "YES" } else { "NO" })
    }

    fn list(values: &[String]) -> Self {
        Self::text(values.join("\n"))
    }

    fn styled(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }

    fn with_note(mut self, lines: &[String]) -> Self {
        if !lines.is_empty() {
            self.note = Some(lines.join("\n"));
        }
        self
    }
}

fn warn_if(condition: bool) -> CellStyle {
    if condition {
        CellStyle::Warning
    } else {
        CellStyle::Plain
    }
}

/// Orange when `condition` holds, green otherwise
fn warn_or_ok(condition: bool) -> CellStyle {
    if condition {
        CellStyle::Warning
    } else {
        CellStyle::Ok
    }
}

fn error_or_ok(condition: bool) -> CellStyle {
    if condition {
        CellStyle::Error
    } else {
        CellStyle::Ok
    }
}

fn ok_if(condition: bool) -> CellStyle {
    if condition {
        CellStyle::Ok
    } else {
        CellStyle::Plain
    }
}

/// Everything that ends up on the worksheet, decided up front
///
/// Building the layout is pure: the same report always yields an equal
/// layout, so values and styling can be checked without opening a workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub title: String,
    /// Label/value pairs of rows 2 to 4
    pub header_block: Vec<(String, String)>,
    pub column_headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// Zero-based indexes of the columns to hide
    pub hidden_columns: Vec<u16>,
}

impl SheetLayout {
    pub fn from_report(report: &AuditReport) -> Self {
        match report {
            AuditReport::Bundles(r) => Self::bundles(r),
            AuditReport::Packages(r) => Self::packages(r),
            AuditReport::Channels(r) => Self::channels(r),
        }
    }

    /// Index of the last column
    pub fn last_column(&self) -> u16 {
        self.column_headers.len().saturating_sub(1) as u16
    }

    fn bundles(report: &Report<BundleColumn>) -> Self {
        let rows = report.columns.iter().map(bundle_row).collect();
        let mut layout = Self::with_header(
            report,
            format!("Audit Bundles Report (Generated at {})", date_of(report)),
            &BUNDLE_HEADERS,
            rows,
        );
        layout.hide_disabled(report, BUNDLE_SCORECARD_COLUMNS, BUNDLE_VALIDATOR_COLUMNS);
        layout
    }

    fn packages(report: &Report<PackageColumn>) -> Self {
        let rows = report.columns.iter().map(package_row).collect();
        let mut layout = Self::with_header(
            report,
            format!(
                "Audit Packages Report (Generated at {}). IMPORTANT: This report only checks the head \
                 operators of the channels. Use the bundles report to check all bundles",
                date_of(report)
            ),
            &PACKAGE_HEADERS,
            rows,
        );
        layout.hide_disabled(report, PACKAGE_SCORECARD_COLUMNS, PACKAGE_VALIDATOR_COLUMNS);
        layout
    }

    fn channels(report: &Report<ChannelColumn>) -> Self {
        let rows = report.columns.iter().map(channel_row).collect();
        Self::with_header(
            report,
            format!("Audit Channels Report (Generated at {})", date_of(report)),
            &CHANNEL_HEADERS,
            rows,
        )
    }

    fn with_header<C>(
        report: &Report<C>,
        title: String,
        headers: &[&str],
        rows: Vec<Vec<Cell>>,
    ) -> Self {
        Self {
            title,
            header_block: vec![
                ("Image used".to_string(), report.flags.index_image.clone()),
                (
                    "Image Index Create Date:".to_string(),
                    report.index_image_inspect.created.clone(),
                ),
                (
                    "Image Index ID:".to_string(),
                    report.index_image_inspect.id.clone(),
                ),
            ],
            column_headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
            hidden_columns: Vec::new(),
        }
    }

    fn hide_disabled<C>(&mut self, report: &Report<C>, scorecard: [u16; 2], validator: [u16; 2]) {
        if report.flags.disable_scorecard {
            self.hidden_columns.extend(scorecard);
        }
        if report.flags.disable_validators {
            self.hidden_columns.extend(validator);
        }
    }
}

fn date_of<C>(report: &Report<C>) -> String {
    report.generated_at.format("%Y-%m-%d").to_string()
}

fn bundle_row(c: &BundleColumn) -> Vec<Cell> {
    vec![
        Cell::text(&c.package_name),
        Cell::text(&c.bundle_name),
        Cell::text(&c.bundle_image_path),
        Cell::text(&c.default_channel),
        Cell::list(&c.channels),
        Cell::flag(c.is_head_of_channel),
        Cell::text(&c.builder),
        Cell::text(&c.build_at),
        Cell::text(&c.ocp_labels),
        Cell::flag(c.found_label),
        Cell::list(&c.kinds_deprecate_apis).styled(warn_if(!c.kinds_deprecate_apis.is_empty())),
        Cell::flag(c.has_webhooks),
        Cell::list(&c.multiple_architectures),
        Cell::flag(c.has_scorecard_suggestions)
            .styled(warn_if(c.has_scorecard_suggestions))
            .with_note(&c.scorecard_suggestions),
        failing_tests_cell(c.has_scorecard_failing_tests, &c.scorecard_failing_tests),
        Cell::flag(c.has_validator_errors)
            .styled(error_or_ok(c.has_validator_errors))
            .with_note(&c.validator_errors),
        Cell::flag(c.has_validator_warnings)
            .styled(warn_or_ok(c.has_validator_warnings))
            .with_note(&c.validator_warnings),
        Cell::flag(c.has_invalid_versioning).styled(warn_or_ok(c.has_invalid_versioning)),
        Cell::flag(c.has_invalid_skip_range).styled(warn_if(c.has_invalid_skip_range)),
        Cell::list(&c.skips),
        Cell::text(&c.skip_range),
        Cell::flag(c.has_support_for_all_namespaces),
        Cell::flag(c.has_support_for_single_namespace),
        Cell::flag(c.has_support_for_own_namespace),
        Cell::flag(c.has_support_for_multi_namespace),
        Cell::flag(c.has_infra_annotation),
        Cell::flag(c.has_possible_performance_issues)
            .styled(warn_if(c.has_possible_performance_issues)),
        Cell::flag(c.has_custom_scorecard_tests).styled(ok_if(c.has_custom_scorecard_tests)),
        Cell::list(&c.audit_errors),
    ]
}

fn package_row(c: &PackageColumn) -> Vec<Cell> {
    vec![
        Cell::text(&c.package_name),
        Cell::list(&c.kinds_deprecate_apis).styled(warn_if(!c.kinds_deprecate_apis.is_empty())),
        Cell::flag(c.has_webhooks),
        Cell::list(&c.multiple_architectures),
        Cell::flag(c.has_scorecard_suggestions).styled(warn_if(c.has_scorecard_suggestions)),
        failing_tests_cell(c.has_scorecard_failing_tests, &c.scorecard_failing_tests),
        Cell::flag(c.has_validator_errors).styled(error_or_ok(c.has_validator_errors)),
        Cell::flag(c.has_validator_warnings).styled(warn_or_ok(c.has_validator_warnings)),
        Cell::flag(c.has_invalid_versioning).styled(warn_or_ok(c.has_invalid_versioning)),
        Cell::flag(c.has_invalid_skip_range).styled(warn_if(c.has_invalid_skip_range)),
        Cell::flag(c.is_multi_channel),
        Cell::flag(c.has_support_for_all_namespaces),
        Cell::flag(c.has_support_for_single_namespace),
        Cell::flag(c.has_support_for_own_namespace),
        Cell::flag(c.has_support_for_multi_namespace),
        Cell::flag(c.has_infra_annotation),
        Cell::flag(c.has_possible_performance_issues)
            .styled(warn_if(c.has_possible_performance_issues)),
        Cell::flag(c.has_custom_scorecard_tests).styled(ok_if(c.has_custom_scorecard_tests)),
        Cell::list(&c.audit_errors),
    ]
}

fn channel_row(c: &ChannelColumn) -> Vec<Cell> {
    vec![
        Cell::text(&c.package_name),
        Cell::text(&c.channel_name),
        Cell::flag(c.is_using_skips),
        Cell::flag(c.is_using_skip_range),
        Cell::flag(c.is_following_name_convention)
            .styled(warn_if(!c.is_following_name_convention)),
        Cell::flag(c.has_invalid_versioning).styled(warn_if(c.has_invalid_versioning)),
        Cell::flag(c.has_invalid_skip_range).styled(warn_if(c.has_invalid_skip_range)),
        Cell::list(&c.audit_errors),
    ]
}

/// Red with the failing test names as a note, green when nothing fails
fn failing_tests_cell(has_failing: bool, failing: &[String]) -> Cell {
    if failing.is_empty() {
        Cell::flag(has_failing).styled(CellStyle::Ok)
    } else {
        Cell::flag(has_failing)
            .styled(CellStyle::Error)
            .with_note(failing)
    }
}
