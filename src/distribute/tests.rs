use super::*;
use anyhow::anyhow;
use std::cell::RefCell;

#[derive(Default)]
struct FakeUploader {
    fail: bool,
    calls: RefCell<usize>,
}

impl StorageUploader for FakeUploader {
    fn upload(&self, artifact: &Artifact) -> anyhow::Result<String> {
        *self.calls.borrow_mut() += 1;
        if self.fail {
            return Err(anyhow!("storage unreachable"));
        }
        Ok(format!("https://drive.example/{}", artifact))
    }
}

#[derive(Default)]
struct FakeNotifier {
    outcome: Option<NotifyOutcome>,
    posted: RefCell<Vec<String>>,
    files: RefCell<Vec<Artifact>>,
}

impl FakeNotifier {
    fn calls(&self) -> usize {
        self.posted.borrow().len() + self.files.borrow().len()
    }

    fn response(&self) -> NotifyOutcome {
        self.outcome.clone().unwrap_or_else(NotifyOutcome::ok)
    }
}

impl Notifier for FakeNotifier {
    fn post_reference(&self, message: &str) -> anyhow::Result<NotifyOutcome> {
        self.posted.borrow_mut().push(message.to_string());
        Ok(self.response())
    }

    fn upload_direct(&self, artifact: &Artifact) -> anyhow::Result<NotifyOutcome> {
        self.files.borrow_mut().push(artifact.clone());
        Ok(self.response())
    }
}

fn config(upload: bool, notify: bool, mode: NotifyMode) -> ReportConfig {
    let mut config = ReportConfig::sample();
    config.upload.enabled = upload;
    config.upload.command = "upload".into();
    config.notify.enabled = notify;
    config.notify.mode = mode;
    config.notify.command = "notify".into();
    config
}

fn artifact() -> Artifact {
    Artifact::new("week-5.pdf")
}

#[test]
fn test_disabled_sinks_are_skipped() {
    let uploader = FakeUploader::default();
    let notifier = FakeNotifier::default();

    let report = fan_out(
        &artifact(),
        &config(false, false, NotifyMode::File),
        false,
        &uploader,
        &notifier,
    );

    assert!(matches!(report.upload, DistributionOutcome::Skipped(_)));
    assert!(matches!(report.notify, DistributionOutcome::Skipped(_)));
    assert_eq!(*uploader.calls.borrow(), 0);
    assert_eq!(notifier.calls(), 0);
}

#[test]
fn test_test_reports_never_leave_the_machine() {
    let uploader = FakeUploader::default();
    let notifier = FakeNotifier::default();

    let report = fan_out(
        &artifact(),
        &config(true, true, NotifyMode::Post),
        true,
        &uploader,
        &notifier,
    );

    assert_eq!(report.upload, DistributionOutcome::Skipped("test report".into()));
    assert_eq!(report.notify, DistributionOutcome::Skipped("test report".into()));
    assert_eq!(*uploader.calls.borrow(), 0);
    assert_eq!(notifier.calls(), 0);
    assert!(!report.is_partial());
}

#[test]
fn test_post_mode_uses_uploaded_reference() {
    let uploader = FakeUploader::default();
    let notifier = FakeNotifier::default();

    let report = fan_out(
        &artifact(),
        &config(true, true, NotifyMode::Post),
        false,
        &uploader,
        &notifier,
    );

    let reference = "https://drive.example/week-5.pdf".to_string();
    assert_eq!(report.upload, DistributionOutcome::Delivered(reference.clone()));
    assert_eq!(report.shareable_reference, Some(reference.clone()));
    assert_eq!(*notifier.posted.borrow(), vec![reference]);
    assert!(matches!(report.notify, DistributionOutcome::Delivered(_)));
}

#[test]
fn test_upload_failure_does_not_stop_file_notification() {
    let uploader = FakeUploader {
        fail: true,
        ..FakeUploader::default()
    };
    let notifier = FakeNotifier::default();

    let report = fan_out(
        &artifact(),
        &config(true, true, NotifyMode::File),
        false,
        &uploader,
        &notifier,
    );

    assert_eq!(
        report.upload,
        DistributionOutcome::Failed("storage unreachable".into())
    );
    assert!(matches!(report.notify, DistributionOutcome::Delivered(_)));
    assert_eq!(*notifier.files.borrow(), vec![artifact()]);
    assert!(report.is_partial());
}

#[test]
fn test_post_without_reference_fails_without_calling_notifier() {
    let uploader = FakeUploader::default();
    let notifier = FakeNotifier::default();

    let report = fan_out(
        &artifact(),
        &config(false, true, NotifyMode::Post),
        false,
        &uploader,
        &notifier,
    );

    assert_eq!(
        report.notify,
        DistributionOutcome::Failed(NO_REFERENCE_CAUSE.into())
    );
    assert_eq!(notifier.calls(), 0);
}

#[test]
fn test_rejected_notification_keeps_shareable_reference() {
    let uploader = FakeUploader::default();
    let notifier = FakeNotifier {
        outcome: Some(NotifyOutcome::failed("channel_not_found")),
        ..FakeNotifier::default()
    };

    let report = fan_out(
        &artifact(),
        &config(true, true, NotifyMode::Post),
        false,
        &uploader,
        &notifier,
    );

    assert_eq!(
        report.notify,
        DistributionOutcome::Failed("channel_not_found".into())
    );
    assert_eq!(
        report.shareable_reference.as_deref(),
        Some("https://drive.example/week-5.pdf")
    );
}

#[test]
fn test_post_after_failed_upload_fails_without_calling_notifier() {
    let uploader = FakeUploader {
        fail: true,
        ..FakeUploader::default()
    };
    let notifier = FakeNotifier::default();

    let report = fan_out(
        &artifact(),
        &config(true, true, NotifyMode::Post),
        false,
        &uploader,
        &notifier,
    );

    assert_eq!(*uploader.calls.borrow(), 1);
    assert_eq!(
        report.notify,
        DistributionOutcome::Failed(NO_REFERENCE_CAUSE.into())
    );
    assert_eq!(notifier.calls(), 0);
    assert_eq!(report.shareable_reference, None);
}
