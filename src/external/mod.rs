//! External command execution
//!
//! The report builder and both distribution sinks are operator-configured
//! programs. This module runs them and captures what they print.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::process::{Command, ExitStatus, Stdio};

/// Captured result of a finished command
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Last non-blank stdout line, trimmed
    pub fn last_line(&self) -> Option<&str> {
        self.stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
    }

    /// Short description of a failed run for log messages
    pub fn failure_detail(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("exited with {}", self.status)
        } else {
            format!("exited with {}: {}", self.status, stderr)
        }
    }
}

/// A program plus the fixed arguments configured for it
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>, args: &[String]) -> Self {
        Self {
            program: program.into(),
            args: args.to_vec(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run to completion with `extra_args` appended and optional stdin content
    pub fn run(&self, extra_args: &[OsString], stdin: Option<&[u8]>) -> Result<CommandOutput> {
        tracing::debug!(
            "Running: {} {} {:?}",
            self.program,
            self.args.join(" "),
            extra_args
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .args(extra_args)
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to execute command: {}", self.program))?;

        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            // A child that exits without reading its input is not an error here
            if let Err(e) = pipe.write_all(input) {
                if e.kind() != ErrorKind::BrokenPipe {
                    return Err(e)
                        .with_context(|| format!("Failed to write input to {}", self.program));
                }
            }
        }

        let output = child
            .wait_with_output()
            .with_context(|| format!("Failed to wait for command: {}", self.program))?;

        let result = CommandOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if !result.stderr.trim().is_empty() {
            tracing::debug!("{} stderr: {}", self.program, result.stderr.trim());
        }
        Ok(result)
    }
}
