//! Subprocess runner for post-scaffold steps.

use std::{
    path::PathBuf,
    process::Command,
};

use kscaff_core::{
    application::{ApplicationError, ports::CommandRunner},
    error::KscaffResult,
};
use tracing::{debug, info};

/// Runs external commands in the project directory and captures their output.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    dir: PathBuf,
}

impl ProcessRunner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[&str]) -> KscaffResult<()> {
        let command = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        info!(command = %command, "Running");

        let output = Command::new(program)
            .args(args)
            .current_dir(&self.dir)
            .output()
            .map_err(|e| ApplicationError::PostScaffold {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(stdout = %stdout.trim_end(), stderr = %stderr.trim_end(), "Command output");

        if !output.status.success() {
            let mut reason = output.status.to_string();
            if !stderr.trim().is_empty() {
                reason.push_str(": ");
                reason.push_str(stderr.trim_end());
            }
            return Err(ApplicationError::PostScaffold { command, reason }.into());
        }
        Ok(())
    }
}
