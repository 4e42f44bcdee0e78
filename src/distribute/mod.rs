//! Distribution fan-out
//!
//! The finished report goes to each enabled sink on its own. A sink that is
//! skipped or fails never stops the next one, and nothing is rolled back.
//! Test reports are never sent anywhere.

use serde::Deserialize;

use crate::config::{NotifyMode, ReportConfig};
use crate::report::Artifact;

mod command;

pub use command::{CommandNotifier, CommandUploader};

/// Cause used when a post-by-reference notification has nothing to post
pub const NO_REFERENCE_CAUSE: &str = "no uploaded artifact reference to post";

/// Cloud storage for finished reports
pub trait StorageUploader {
    /// Upload the report and return a shareable reference (link or message)
    fn upload(&self, artifact: &Artifact) -> anyhow::Result<String>;
}

/// Chat channel notifications
pub trait Notifier {
    /// Post a message pointing at an already uploaded report
    fn post_reference(&self, message: &str) -> anyhow::Result<NotifyOutcome>;

    /// Upload the report file itself to the channel
    fn upload_direct(&self, artifact: &Artifact) -> anyhow::Result<NotifyOutcome>;
}

/// What the chat service said about a notification
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NotifyOutcome {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl NotifyOutcome {
    pub fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
        }
    }
}

/// Result of one sink for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistributionOutcome {
    Delivered(String),
    Skipped(String),
    Failed(String),
}

impl DistributionOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, DistributionOutcome::Failed(_))
    }
}

/// Outcomes of every sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionReport {
    pub upload: DistributionOutcome,
    pub notify: DistributionOutcome,
    /// Kept even when the notification could not use it
    pub shareable_reference: Option<String>,
}

impl DistributionReport {
    pub fn is_partial(&self) -> bool {
        self.upload.is_failed() || self.notify.is_failed()
    }
}

/// Send the report to every enabled sink
pub fn fan_out(
    artifact: &Artifact,
    config: &ReportConfig,
    test: bool,
    uploader: &dyn StorageUploader,
    notifier: &dyn Notifier,
) -> DistributionReport {
    let (upload, shareable_reference) = upload_step(artifact, config.upload.enabled, test, uploader);
    let notify = notify_step(
        artifact,
        config.notify.enabled,
        config.notify.mode,
        test,
        shareable_reference.as_deref(),
        notifier,
    );

    DistributionReport {
        upload,
        notify,
        shareable_reference,
    }
}

fn upload_step(
    artifact: &Artifact,
    enabled: bool,
    test: bool,
    uploader: &dyn StorageUploader,
) -> (DistributionOutcome, Option<String>) {
    if !enabled {
        tracing::debug!("Storage upload disabled");
        return (DistributionOutcome::Skipped("upload disabled".into()), None);
    }
    if test {
        tracing::info!("Test report NOT uploaded to storage.");
        return (DistributionOutcome::Skipped("test report".into()), None);
    }

    match uploader.upload(artifact) {
        Ok(reference) => {
            tracing::info!("{}", reference);
            (DistributionOutcome::Delivered(reference.clone()), Some(reference))
        }
        Err(e) => {
            let cause = format!("{e:#}");
            tracing::error!("Report {} was NOT uploaded to storage with error: {}", artifact, cause);
            (DistributionOutcome::Failed(cause), None)
        }
    }
}

fn notify_step(
    artifact: &Artifact,
    enabled: bool,
    mode: NotifyMode,
    test: bool,
    shareable_reference: Option<&str>,
    notifier: &dyn Notifier,
) -> DistributionOutcome {
    if !enabled {
        tracing::debug!("Chat notification disabled");
        return DistributionOutcome::Skipped("notification disabled".into());
    }
    if test {
        tracing::info!("Test report NOT posted to chat.");
        return DistributionOutcome::Skipped("test report".into());
    }

    let response = match mode {
        NotifyMode::Post => match shareable_reference {
            Some(reference) => notifier.post_reference(reference),
            None => {
                tracing::error!(
                    "Report {} was NOT posted to chat with error: {}",
                    artifact,
                    NO_REFERENCE_CAUSE
                );
                return DistributionOutcome::Failed(NO_REFERENCE_CAUSE.into());
            }
        },
        NotifyMode::File => notifier.upload_direct(artifact),
    };

    let cause = match response {
        Ok(outcome) if outcome.ok => {
            tracing::info!("Report {} successfully posted to chat!", artifact);
            return DistributionOutcome::Delivered(format!("posted via {mode}"));
        }
        Ok(outcome) => outcome.error.unwrap_or_else(|| "unknown error".to_string()),
        Err(e) => format!("{e:#}"),
    };
    tracing::error!("Report {} was NOT posted to chat with error: {}", artifact, cause);
    DistributionOutcome::Failed(cause)
}

#[cfg(test)]
mod tests;
