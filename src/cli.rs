use clap::{Args as ClapArgs, Parser, Subcommand};
use operator_audit::application::dto::{ContainerEngine, OutputFormat, ReportType};
use std::path::PathBuf;

/// Audit operator catalog images
#[derive(Parser, Debug)]
#[command(name = "operator-audit")]
#[command(version)]
#[command(
    about = "Audit the bundles of an operator catalog image and write bundle, package and channel reports",
    long_about = None
)]
pub struct Args {
    /// Tracing filter for diagnostics (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "warn", value_name = "FILTER")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pull an index image, audit its bundles and write the reports
    Audit(AuditArgs),
    /// Build an HTML page linking the spreadsheet reports of each catalog
    IndexPage(IndexPageArgs),
}

#[derive(ClapArgs, Debug)]
pub struct AuditArgs {
    /// Index image to audit, e.g. quay.io/operatorhubio/catalog:latest
    #[arg(long, value_name = "IMAGE")]
    pub index_image: String,

    /// Write only this report (bundles, packages or channels); all by default
    #[arg(long, value_name = "TYPE")]
    pub report: Option<ReportType>,

    /// Output format: json, xlsx or all
    #[arg(long, value_name = "FORMAT")]
    pub output_format: Option<OutputFormat>,

    /// Directory the reports are written to (defaults to current directory)
    #[arg(long, value_name = "DIR")]
    pub output_path: Option<PathBuf>,

    /// Do not run operator-sdk scorecard
    #[arg(long)]
    pub disable_scorecard: bool,

    /// Do not run operator-sdk bundle validate
    #[arg(long)]
    pub disable_validators: bool,

    /// Keep pulled images in the local store
    #[arg(long)]
    pub server_mode: bool,

    /// Image label to look for on each bundle
    #[arg(long, requires = "label_value")]
    pub label: Option<String>,

    /// Value the label must have
    #[arg(long, requires = "label")]
    pub label_value: Option<String>,

    /// Audit only packages matching patterns (supports wildcards: *)
    /// Can be specified multiple times: --filter "etcd" --filter "mongodb-*"
    #[arg(long = "filter", value_name = "PATTERN")]
    pub filter: Vec<String>,

    /// Audit only the heads of the channels
    #[arg(long)]
    pub head_only: bool,

    /// Maximum number of packages to audit
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Container engine: docker or podman
    #[arg(long, value_name = "ENGINE")]
    pub container_engine: Option<ContainerEngine>,

    /// Directory for temporary extraction trees
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Seconds scorecard waits for its tests
    #[arg(long, value_name = "SECONDS")]
    pub scorecard_wait_time: Option<u64>,

    /// Exit with status 1 when any bundle has issues
    #[arg(long)]
    pub fail_on_issues: bool,

    /// Path to config file (defaults to operator-audit.config.yml in current directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct IndexPageArgs {
    /// Directory holding one sub-directory of reports per catalog
    #[arg(long, value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Output file path (defaults to index.html)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to config file (defaults to operator-audit.config.yml in current directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_audit() {
        let args = Args::try_parse_from([
            "operator-audit",
            "audit",
            "--index-image",
            "quay.io/operatorhubio/catalog:latest",
            "--report",
            "packages",
            "--output-format",
            "xlsx",
            "--filter",
            "etcd",
            "--filter",
            "mongodb-*",
            "--container-engine",
            "podman",
            "--limit",
            "3",
        ])
        .unwrap();

        let Command::Audit(audit) = args.command else {
            panic!("expected audit subcommand");
        };
        assert_eq!(audit.index_image, "quay.io/operatorhubio/catalog:latest");
        assert_eq!(audit.report, Some(ReportType::Packages));
        assert_eq!(audit.output_format, Some(OutputFormat::Xlsx));
        assert_eq!(audit.filter, vec!["etcd", "mongodb-*"]);
        assert_eq!(audit.container_engine, Some(ContainerEngine::Podman));
        assert_eq!(audit.limit, Some(3));
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn test_label_requires_value() {
        let result = Args::try_parse_from([
            "operator-audit",
            "audit",
            "--index-image",
            "quay.io/operatorhubio/catalog:latest",
            "--label",
            "tier",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_format_rejected() {
        let result = Args::try_parse_from([
            "operator-audit",
            "audit",
            "--index-image",
            "x",
            "--output-format",
            "markdown",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_index_page_with_global_log_level() {
        let args = Args::try_parse_from([
            "operator-audit",
            "index-page",
            "--reports-dir",
            "reports",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.log_level, "debug");
        assert!(matches!(
            args.command,
            Command::IndexPage(ref p) if p.reports_dir == Some(PathBuf::from("reports"))
        ));
    }
}
