use serde::{Deserialize, Serialize};

/// Outcome of the static validator suite for one bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidatorReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestState {
    Pass,
    Fail,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorecardTestResult {
    pub name: String,
    pub state: TestState,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Outcome of the scorecard suite for one bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorecardReport {
    pub results: Vec<ScorecardTestResult>,
}

impl ScorecardReport {
    /// Names of the tests that did not pass
    pub fn failing_tests(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| r.state != TestState::Pass)
            .map(|r| r.name.clone())
            .collect()
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.results
            .iter()
            .flat_map(|r| r.suggestions.iter().cloned())
            .collect()
    }

    pub fn has_failing_tests(&self) -> bool {
        self.results.iter().any(|r| r.state != TestState::Pass)
    }
}
