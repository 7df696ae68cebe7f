use crate::shared::Result;

/// Captured result of an external process run to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit status; `None` when the process was terminated by a signal
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success() -> Self {
        Self {
            status_code: Some(0),
            ..Default::default()
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn failure(status_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == Some(0)
    }

    /// Short description of a failed run, for issue and error messages
    pub fn failure_details(&self) -> String {
        let stderr = self.stderr.trim();
        let status = match self.status_code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
        if stderr.is_empty() {
            status
        } else {
            format!("{}: {}", status, stderr)
        }
    }
}

/// CommandExecutor port for running external programs
///
/// Every interaction with the container engine, `tar` and `operator-sdk`
/// goes through this port, so the pipeline can be exercised without any of
/// them installed.
pub trait CommandExecutor {
    /// Runs `program` with `args` and waits for it to exit
    ///
    /// # Arguments
    /// * `program` - Program name, resolved through `PATH`
    /// * `args` - Arguments passed verbatim, without shell interpretation
    ///
    /// # Returns
    /// The captured output, including non-zero exit statuses
    ///
    /// # Errors
    /// Returns an error only if the process could not be started
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}
