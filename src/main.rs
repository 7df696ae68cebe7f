mod cli;
mod config;

use clap::Parser;
use cli::{Args, AuditArgs, Command, IndexPageArgs};
use config::ConfigFile;
use operator_audit::adapters::outbound::console::StderrProgressReporter;
use operator_audit::adapters::outbound::container::{CliContainerRuntime, TarArchiveExtractor};
use operator_audit::adapters::outbound::filesystem::{
    FileBasedCatalogReader, FileSystemBundleReader, FileSystemWriter, WalkDirReportScanner,
};
use operator_audit::adapters::outbound::formatters::HtmlIndexFormatter;
use operator_audit::adapters::outbound::operator_sdk::{
    OperatorSdkScorecard, OperatorSdkValidator, DEFAULT_WAIT_TIME_SECS,
};
use operator_audit::adapters::outbound::process::SystemCommandExecutor;
use operator_audit::application::dto::{AuditRequest, ContainerEngine, OutputFormat, ReportType};
use operator_audit::application::factories::FormatterFactory;
use operator_audit::application::read_models::{ReportBuilder, ReportFlags};
use operator_audit::application::services::BundleExtractor;
use operator_audit::application::use_cases::{AuditIndexUseCase, GenerateIndexPageUseCase};
use operator_audit::ports::outbound::OutputPresenter;
use operator_audit::shared::error::{AuditError, ExitCode};
use operator_audit::shared::security::validate_output_directory;
use operator_audit::shared::Result;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

const DEFAULT_WORK_DIR: &str = "operator-audit";
const DEFAULT_REPORTS_DIR: &str = "reports";
const DEFAULT_INDEX_PAGE: &str = "index.html";

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are reported through clap errors too
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    init_tracing(&args.log_level);

    match run(args) {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    match args.command {
        Command::Audit(audit) => {
            let config = load_config(audit.config.as_deref())?;
            run_audit(audit, config.unwrap_or_default())
        }
        Command::IndexPage(page) => {
            let config = load_config(page.config.as_deref())?;
            run_index_page(page, config.unwrap_or_default())
        }
    }
}

/// Loads an explicit config file, or discovers one in the current directory
fn load_config(explicit: Option<&Path>) -> Result<Option<ConfigFile>> {
    if let Some(path) = explicit {
        let config = config::load_config_from_path(path)?;
        eprintln!("📄 Loaded config from: {}", path.display());
        return Ok(Some(config));
    }

    let cwd = std::env::current_dir()?;
    let discovered = config::discover_config(&cwd)?;
    if discovered.is_some() {
        eprintln!(
            "📄 Auto-discovered config file: {}",
            cwd.join(config::CONFIG_FILENAME).display()
        );
    }
    Ok(discovered)
}

/// Audit settings after applying CLI > config > defaults
struct AuditSettings {
    output_format: OutputFormat,
    output_path: PathBuf,
    container_engine: ContainerEngine,
    work_dir: PathBuf,
    server_mode: bool,
    scorecard_wait_time: u64,
}

impl AuditSettings {
    fn merge(args: &AuditArgs, config: &ConfigFile) -> Result<Self> {
        let output_format = match args.output_format {
            Some(format) => format,
            None => parse_config_value(config.output_format.as_deref(), "output_format")?
                .unwrap_or(OutputFormat::All),
        };
        let container_engine = match args.container_engine {
            Some(engine) => engine,
            None => parse_config_value(config.container_engine.as_deref(), "container_engine")?
                .unwrap_or_default(),
        };

        Ok(Self {
            output_format,
            output_path: args
                .output_path
                .clone()
                .or_else(|| config.output_path.clone())
                .unwrap_or_else(|| PathBuf::from(".")),
            container_engine,
            work_dir: args
                .work_dir
                .clone()
                .or_else(|| config.work_dir.clone())
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_WORK_DIR)),
            server_mode: args.server_mode || config.server_mode.unwrap_or(false),
            scorecard_wait_time: args
                .scorecard_wait_time
                .or(config.scorecard_wait_time)
                .unwrap_or(DEFAULT_WAIT_TIME_SECS),
        })
    }
}

fn parse_config_value<T: std::str::FromStr<Err = String>>(
    value: Option<&str>,
    field: &str,
) -> Result<Option<T>> {
    value
        .map(|v| {
            v.parse::<T>().map_err(|e| {
                anyhow::Error::from(AuditError::Validation {
                    message: format!("{}: {}", field, e),
                })
            })
        })
        .transpose()
}

fn build_request(args: &AuditArgs, config: &ConfigFile) -> AuditRequest {
    let label = match (&args.label, &args.label_value) {
        (Some(label), Some(value)) => Some((label.clone(), value.clone())),
        _ => config.label.clone().zip(config.label_value.clone()),
    };

    AuditRequest {
        filter_patterns: args.filter.clone(),
        limit: args.limit,
        head_only: args.head_only,
        disable_scorecard: args.disable_scorecard || config.disable_scorecard.unwrap_or(false),
        disable_validators: args.disable_validators
            || config.disable_validators.unwrap_or(false),
        label,
        ..AuditRequest::new(args.index_image.clone())
    }
}

fn run_audit(args: AuditArgs, config: ConfigFile) -> Result<ExitCode> {
    let settings = AuditSettings::merge(&args, &config)?;
    validate_output_directory(&settings.output_path)?;
    std::fs::create_dir_all(&settings.work_dir).map_err(|e| AuditError::InvalidOutputPath {
        path: settings.work_dir.clone(),
        reason: format!("Unable to create working directory ({})", e),
    })?;

    // Create adapters (Dependency Injection)
    let executor = SystemCommandExecutor::new();
    let extractor = BundleExtractor::new(
        CliContainerRuntime::new(executor, settings.container_engine),
        TarArchiveExtractor::new(executor),
        settings.work_dir.clone(),
        settings.server_mode,
    );
    let use_case = AuditIndexUseCase::new(
        extractor,
        FileBasedCatalogReader::new(),
        FileSystemBundleReader::new(),
        OperatorSdkValidator::new(executor),
        OperatorSdkScorecard::new(executor, settings.scorecard_wait_time),
        StderrProgressReporter::new(),
    );

    let request = build_request(&args, &config);
    let flags = ReportFlags::from_request(&request)
        .with_output(settings.output_format, settings.output_path.clone())
        .with_runtime(settings.container_engine, settings.server_mode);

    let response = use_case.execute(request)?;

    eprintln!("{}", FormatterFactory::progress_message(settings.output_format));
    let builder = ReportBuilder::new(&response, flags);
    let report_types: Vec<ReportType> = match args.report {
        Some(report_type) => vec![report_type],
        None => ReportType::ALL.to_vec(),
    };
    let formatters = FormatterFactory::create(settings.output_format);

    for report_type in report_types {
        let report = builder.build(report_type);
        for formatter in &formatters {
            let content = formatter.render(&report)?;
            let path = settings
                .output_path
                .join(report.file_name(formatter.extension()));
            FileSystemWriter::new(path).present(&content)?;
        }
    }

    let with_issues = response.bundles_with_issues();
    print_summary(response.bundle_count(), with_issues);

    if args.fail_on_issues && with_issues > 0 {
        return Ok(ExitCode::IssuesDetected);
    }
    Ok(ExitCode::Success)
}

fn print_summary(total: usize, with_issues: usize) {
    eprintln!();
    eprintln!("{}", "Audit summary".bold());
    eprintln!("   Bundles audited:     {}", total);
    if with_issues == 0 {
        eprintln!("   Bundles with issues: {}", with_issues.green());
    } else if with_issues < total {
        eprintln!("   Bundles with issues: {}", with_issues.yellow());
    } else {
        eprintln!("   Bundles with issues: {}", with_issues.red());
    }
}

fn run_index_page(args: IndexPageArgs, config: ConfigFile) -> Result<ExitCode> {
    let reports_dir = args
        .reports_dir
        .or(config.reports_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORTS_DIR));
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_PAGE));
    let catalogs = config.catalogs.unwrap_or_default();

    if catalogs.is_empty() {
        tracing::warn!("no catalogs configured, the index page will be empty");
    }

    let use_case = GenerateIndexPageUseCase::new(WalkDirReportScanner::new());
    let page = use_case.execute(&catalogs, &reports_dir)?;
    let html = HtmlIndexFormatter::new().render(&page);

    FileSystemWriter::new(output).present(html.as_bytes())?;
    Ok(ExitCode::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn audit_args(extra: &[&str]) -> AuditArgs {
        let mut argv = vec!["operator-audit", "audit", "--index-image", "quay.io/op/index:v4.8"];
        argv.extend_from_slice(extra);
        match Args::try_parse_from(argv).unwrap().command {
            Command::Audit(audit) => audit,
            Command::IndexPage(_) => panic!("expected audit subcommand"),
        }
    }

    #[test]
    fn test_settings_defaults() {
        let settings = AuditSettings::merge(&audit_args(&[]), &ConfigFile::default()).unwrap();
        assert_eq!(settings.output_format, OutputFormat::All);
        assert_eq!(settings.output_path, PathBuf::from("."));
        assert_eq!(settings.container_engine, ContainerEngine::Docker);
        assert_eq!(settings.scorecard_wait_time, DEFAULT_WAIT_TIME_SECS);
        assert!(!settings.server_mode);
        assert!(settings.work_dir.ends_with(DEFAULT_WORK_DIR));
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = ConfigFile {
            output_format: Some("json".to_string()),
            container_engine: Some("podman".to_string()),
            scorecard_wait_time: Some(30),
            server_mode: Some(true),
            ..Default::default()
        };
        let args = audit_args(&["--output-format", "xlsx", "--scorecard-wait-time", "60"]);

        let settings = AuditSettings::merge(&args, &config).unwrap();
        assert_eq!(settings.output_format, OutputFormat::Xlsx);
        assert_eq!(settings.container_engine, ContainerEngine::Podman);
        assert_eq!(settings.scorecard_wait_time, 60);
        assert!(settings.server_mode);
    }

    #[test]
    fn test_request_takes_label_from_config() {
        let config = ConfigFile {
            label: Some("com.example/tier".to_string()),
            label_value: Some("gold".to_string()),
            disable_validators: Some(true),
            ..Default::default()
        };
        let request = build_request(&audit_args(&["--head-only"]), &config);

        assert_eq!(request.index_image, "quay.io/op/index:v4.8");
        assert_eq!(
            request.label,
            Some(("com.example/tier".to_string(), "gold".to_string()))
        );
        assert!(request.disable_validators);
        assert!(!request.disable_scorecard);
        assert!(request.head_only);
    }

    #[test]
    fn test_index_page_without_catalogs() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("index.html");
        let args = IndexPageArgs {
            reports_dir: Some(dir.path().join("reports")),
            output: Some(output.clone()),
            config: None,
        };
        let config = ConfigFile {
            catalogs: Some(BTreeMap::new()),
            ..Default::default()
        };

        let code = run_index_page(args, config).unwrap();
        assert_eq!(code, ExitCode::Success);
        assert!(std::fs::read_to_string(output)
            .unwrap()
            .contains("No reports found."));
    }
}
