use super::OPERATOR_SDK;
use crate::audit::domain::{ScorecardReport, ScorecardTestResult, TestState};
use crate::ports::outbound::{CommandExecutor, ScorecardRunner};
use crate::shared::Result;
use serde::Deserialize;
use std::path::Path;

/// Default time scorecard waits for its test pods, in seconds
pub const DEFAULT_WAIT_TIME_SECS: u64 = 120;

/// `v1alpha3` TestList printed by `operator-sdk scorecard --output json`
#[derive(Debug, Deserialize)]
struct TestList {
    #[serde(default)]
    items: Vec<Test>,
}

#[derive(Debug, Deserialize)]
struct Test {
    #[serde(default)]
    status: TestStatus,
}

#[derive(Debug, Default, Deserialize)]
struct TestStatus {
    #[serde(default)]
    results: Vec<TestResult>,
}

#[derive(Debug, Deserialize)]
struct TestResult {
    name: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    suggestions: Option<Vec<String>>,
    #[serde(default)]
    errors: Option<Vec<String>>,
}

/// OperatorSdkScorecard adapter running `operator-sdk scorecard`
///
/// Scorecard needs a reachable cluster; without one the command fails and
/// the failure is returned as an error.
pub struct OperatorSdkScorecard<E> {
    executor: E,
    wait_time_secs: u64,
}

impl<E: CommandExecutor> OperatorSdkScorecard<E> {
    pub fn new(executor: E, wait_time_secs: u64) -> Self {
        Self {
            executor,
            wait_time_secs,
        }
    }

    fn parse(stdout: &str) -> Result<ScorecardReport> {
        let list: TestList = serde_json::from_str(stdout)?;
        let results = list
            .items
            .into_iter()
            .flat_map(|test| test.status.results)
            .map(|r| ScorecardTestResult {
                name: r.name,
                state: match r.state.as_str() {
                    "pass" => TestState::Pass,
                    "fail" => TestState::Fail,
                    _ => TestState::Error,
                },
                suggestions: r.suggestions.unwrap_or_default(),
                errors: r.errors.unwrap_or_default(),
            })
            .collect();
        Ok(ScorecardReport { results })
    }
}

impl<E: CommandExecutor> ScorecardRunner for OperatorSdkScorecard<E> {
    fn run(&self, bundle_dir: &Path) -> Result<ScorecardReport> {
        let args = vec![
            "scorecard".to_string(),
            bundle_dir.to_string_lossy().into_owned(),
            "--output".to_string(),
            "json".to_string(),
            "--wait-time".to_string(),
            format!("{}s", self.wait_time_secs),
        ];
        let output = self.executor.run(OPERATOR_SDK, &args)?;

        // failing tests make scorecard exit non-zero with a complete TestList
        Self::parse(&output.stdout).map_err(|e| {
            if output.is_success() {
                anyhow::anyhow!("unreadable scorecard output: {}", e)
            } else {
                anyhow::anyhow!("{}", output.failure_details())
            }
        })
    }
}
