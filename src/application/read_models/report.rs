use super::columns::{BundleColumn, ChannelColumn, PackageColumn};
use crate::application::dto::{AuditRequest, ContainerEngine, OutputFormat, ReportType};
use crate::audit::domain::ImageInspection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Options an audit run was started with, stored alongside its reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFlags {
    pub index_image: String,
    pub output_format: Option<OutputFormat>,
    pub output_path: PathBuf,
    pub container_engine: ContainerEngine,
    pub filter: Vec<String>,
    pub limit: Option<usize>,
    pub head_only: bool,
    pub disable_scorecard: bool,
    pub disable_validators: bool,
    pub server_mode: bool,
    pub label: Option<String>,
    pub label_value: Option<String>,
}

impl ReportFlags {
    pub fn from_request(request: &AuditRequest) -> Self {
        Self {
            index_image: request.index_image.clone(),
            filter: request.filter_patterns.clone(),
            limit: request.limit,
            head_only: request.head_only,
            disable_scorecard: request.disable_scorecard,
            disable_validators: request.disable_validators,
            label: request.label.as_ref().map(|(l, _)| l.clone()),
            label_value: request.label.as_ref().map(|(_, v)| v.clone()),
            ..Default::default()
        }
    }

    pub fn with_output(mut self, format: OutputFormat, path: PathBuf) -> Self {
        self.output_format = Some(format);
        self.output_path = path;
        self
    }

    pub fn with_runtime(mut self, engine: ContainerEngine, server_mode: bool) -> Self {
        self.container_engine = engine;
        self.server_mode = server_mode;
        self
    }
}

/// An audit report: rows of one granularity plus run metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report<C> {
    pub columns: Vec<C>,
    pub flags: ReportFlags,
    pub index_image_inspect: ImageInspection,
    pub generated_at: DateTime<Utc>,
    pub run_id: Uuid,
}

/// A report of any of the three granularities
#[derive(Debug, Clone, PartialEq)]
pub enum AuditReport {
    Bundles(Report<BundleColumn>),
    Packages(Report<PackageColumn>),
    Channels(Report<ChannelColumn>),
}

impl AuditReport {
    pub fn report_type(&self) -> ReportType {
        match self {
            AuditReport::Bundles(_) => ReportType::Bundles,
            AuditReport::Packages(_) => ReportType::Packages,
            AuditReport::Channels(_) => ReportType::Channels,
        }
    }

    pub fn flags(&self) -> &ReportFlags {
        match self {
            AuditReport::Bundles(r) => &r.flags,
            AuditReport::Packages(r) => &r.flags,
            AuditReport::Channels(r) => &r.flags,
        }
    }

    pub fn index_image_inspect(&self) -> &ImageInspection {
        match self {
            AuditReport::Bundles(r) => &r.index_image_inspect,
            AuditReport::Packages(r) => &r.index_image_inspect,
            AuditReport::Channels(r) => &r.index_image_inspect,
        }
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        match self {
            AuditReport::Bundles(r) => r.generated_at,
            AuditReport::Packages(r) => r.generated_at,
            AuditReport::Channels(r) => r.generated_at,
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            AuditReport::Bundles(r) => r.columns.len(),
            AuditReport::Packages(r) => r.columns.len(),
            AuditReport::Channels(r) => r.columns.len(),
        }
    }

    /// File name of this report for `extension`
    pub fn file_name(&self, extension: &str) -> String {
        report_file_name(&self.flags().index_image, self.report_type(), extension)
    }
}

/// `<report_type>_<image>.<ext>` with `/`, `:`, `@` and `-` of the image replaced by `_`
pub fn report_file_name(index_image: &str, report_type: ReportType, extension: &str) -> String {
    let image: String = index_image
        .chars()
        .map(|c| match c {
            '/' | ':' | '@' | '-' => '_',
            other => other,
        })
        .collect();
    format!("{}_{}.{}", report_type.tag(), image, extension)
}
