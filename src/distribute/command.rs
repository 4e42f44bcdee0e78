use anyhow::{Result, bail};
use std::ffi::OsString;

use super::{Notifier, NotifyOutcome, StorageUploader};
use crate::config::{NotifyConfig, UploadConfig};
use crate::external::{CommandOutput, ExternalCommand};
use crate::report::Artifact;

/// Uploads by running the configured command with the report path appended
///
/// Whatever the command prints is the shareable reference.
pub struct CommandUploader {
    command: ExternalCommand,
}

impl CommandUploader {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            command: ExternalCommand::new(config.command.clone(), &config.args),
        }
    }
}

impl StorageUploader for CommandUploader {
    fn upload(&self, artifact: &Artifact) -> Result<String> {
        let output = self
            .command
            .run(&[artifact.path().as_os_str().to_os_string()], None)?;
        if !output.status.success() {
            bail!("{} {}", self.command.program(), output.failure_detail());
        }

        let reference = output.stdout.trim();
        if reference.is_empty() {
            bail!("{} returned no shareable reference", self.command.program());
        }
        Ok(reference.to_string())
    }
}

/// Notifies by running the configured command
///
/// The command gets `--message <text>` or `--file <path>`. It may print a JSON
/// object `{"ok": bool, "error": "..."}`; otherwise its exit status decides.
pub struct CommandNotifier {
    command: ExternalCommand,
}

impl CommandNotifier {
    pub fn new(config: &NotifyConfig) -> Self {
        Self {
            command: ExternalCommand::new(config.command.clone(), &config.args),
        }
    }

    fn notify(&self, args: &[OsString]) -> Result<NotifyOutcome> {
        let output = self.command.run(args, None)?;
        Ok(outcome_from(&output))
    }
}

impl Notifier for CommandNotifier {
    fn post_reference(&self, message: &str) -> Result<NotifyOutcome> {
        self.notify(&["--message".into(), message.into()])
    }

    fn upload_direct(&self, artifact: &Artifact) -> Result<NotifyOutcome> {
        self.notify(&["--file".into(), artifact.path().as_os_str().to_os_string()])
    }
}

fn outcome_from(output: &CommandOutput) -> NotifyOutcome {
    if let Ok(outcome) = serde_json::from_str::<NotifyOutcome>(output.stdout.trim()) {
        return outcome;
    }
    if output.status.success() {
        NotifyOutcome::ok()
    } else {
        NotifyOutcome::failed(output.failure_detail())
    }
}
