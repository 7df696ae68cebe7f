use crate::ports::outbound::{CommandExecutor, CommandOutput};
use crate::shared::Result;
use anyhow::Context;
use std::process::Command;

/// SystemCommandExecutor adapter running programs with `std::process`
///
/// Arguments are passed as-is; no shell is involved.
#[derive(Debug, Clone, Copy)]
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        tracing::debug!(program, args = ?args, "running command");

        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| {
                format!("Failed to start '{}'. Is it installed and on PATH?", program)
            })?;

        let result = CommandOutput {
            status_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.is_success() {
            tracing::debug!(program, details = %result.failure_details(), "command failed");
        }

        Ok(result)
    }
}
