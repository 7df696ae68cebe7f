use super::OPERATOR_SDK;
use crate::audit::domain::ValidatorReport;
use crate::ports::outbound::{BundleValidator, CommandExecutor};
use crate::shared::Result;
use serde::Deserialize;
use std::path::Path;

/// Output of `operator-sdk bundle validate --output json-alpha1`
#[derive(Debug, Deserialize)]
struct ValidateResult {
    #[serde(default)]
    passed: bool,
    #[serde(default)]
    outputs: Option<Vec<ValidateOutput>>,
}

#[derive(Debug, Deserialize)]
struct ValidateOutput {
    #[serde(rename = "type")]
    level: String,
    message: String,
}

/// OperatorSdkValidator adapter running `operator-sdk bundle validate`
///
/// The optional `operatorframework` suite is always selected. A failed
/// validation exits non-zero but still prints its findings, so stdout is
/// parsed regardless of the exit status.
pub struct OperatorSdkValidator<E> {
    executor: E,
}

impl<E: CommandExecutor> OperatorSdkValidator<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    fn parse(stdout: &str) -> Result<ValidatorReport> {
        let result: ValidateResult = serde_json::from_str(stdout)?;
        let mut report = ValidatorReport::default();

        for output in result.outputs.unwrap_or_default() {
            match output.level.to_lowercase().as_str() {
                "error" => report.errors.push(output.message),
                "warning" => report.warnings.push(output.message),
                _ => {}
            }
        }

        if !result.passed && report.errors.is_empty() {
            report
                .errors
                .push("bundle validation failed without reporting errors".to_string());
        }

        Ok(report)
    }
}

impl<E: CommandExecutor> BundleValidator for OperatorSdkValidator<E> {
    fn validate(&self, bundle_dir: &Path) -> Result<ValidatorReport> {
        let args = vec![
            "bundle".to_string(),
            "validate".to_string(),
            bundle_dir.to_string_lossy().into_owned(),
            "--select-optional".to_string(),
            "suite=operatorframework".to_string(),
            "--output".to_string(),
            "json-alpha1".to_string(),
        ];
        let output = self.executor.run(OPERATOR_SDK, &args)?;

        Self::parse(&output.stdout).map_err(|e| {
            if output.is_success() {
                anyhow::anyhow!("unreadable validator output: {}", e)
            } else {
                anyhow::anyhow!("{}", output.failure_details())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::CommandOutput;

    struct Fixed(CommandOutput);

    impl CommandExecutor for Fixed {
        fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
            assert_eq!(program, "operator-sdk");
            assert_eq!(args[0..2], ["bundle".to_string(), "validate".to_string()]);
            assert!(args.contains(&"suite=operatorframework".to_string()));
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_failed_validation_is_parsed() {
        let stdout = r#"{"passed":false,"outputs":[
            {"type":"error","message":"Value etcdclusters.etcd.database.coreos.com: owned CRD not found"},
            {"type":"warning","message":"csv.Spec.Icon not specified"}]}"#;
        let validator = OperatorSdkValidator::new(Fixed(CommandOutput {
            status_code: Some(1),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }));

        let report = validator.validate(Path::new("/tmp/bundle")).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.warnings, vec!["csv.Spec.Icon not specified"]);
    }

    #[test]
    fn test_passed_without_outputs() {
        let validator = OperatorSdkValidator::new(Fixed(
            CommandOutput::success().with_stdout(r#"{"passed":true,"outputs":null}"#),
        ));
        let report = validator.validate(Path::new("/tmp/bundle")).unwrap();
        assert!(!report.has_errors());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_crash_is_error() {
        let validator = OperatorSdkValidator::new(Fixed(CommandOutput::failure(
            2,
            "unknown flag: --select-optional",
        )));
        let err = validator.validate(Path::new("/tmp/bundle")).unwrap_err();
        assert!(err.to_string().contains("unknown flag"));
    }
}
