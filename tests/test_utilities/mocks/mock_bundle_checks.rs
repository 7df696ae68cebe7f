use operator_audit::audit::domain::{ScorecardTestResult, TestState};
use operator_audit::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Mock BundleValidator returning a fixed report and recording the bundle dirs it saw
#[derive(Default, Clone)]
pub struct MockBundleValidator {
    report: ValidatorReport,
    pub seen: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockBundleValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_warning(mut self, warning: &str) -> Self {
        self.report.warnings.push(warning.to_string());
        self
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.report.errors.push(error.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl BundleValidator for MockBundleValidator {
    fn validate(&self, bundle_dir: &Path) -> Result<ValidatorReport> {
        self.seen.lock().unwrap().push(bundle_dir.to_path_buf());
        Ok(self.report.clone())
    }
}

/// Mock ScorecardRunner with one test per configured state
#[derive(Default, Clone)]
pub struct MockScorecardRunner {
    results: Vec<ScorecardTestResult>,
    pub runs: Arc<Mutex<usize>>,
}

impl MockScorecardRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_test(mut self, name: &str, state: TestState) -> Self {
        self.results.push(ScorecardTestResult {
            name: name.to_string(),
            state,
            suggestions: Vec::new(),
            errors: Vec::new(),
        });
        self
    }

    pub fn run_count(&self) -> usize {
        *self.runs.lock().unwrap()
    }
}

impl ScorecardRunner for MockScorecardRunner {
    fn run(&self, _bundle_dir: &Path) -> Result<ScorecardReport> {
        *self.runs.lock().unwrap() += 1;
        Ok(ScorecardReport {
            results: self.results.clone(),
        })
    }
}
