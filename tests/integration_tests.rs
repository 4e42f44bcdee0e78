//! Integration tests for the fantasy-report CLI
//!
//! Each test runs the binary inside a temporary project directory whose
//! config points the builder and both sinks at small `sh` scripts.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BUILD_SCRIPT: &str = r#"cat > request.json
echo "building report"
touch report.pdf
echo "$PWD/report.pdf"
"#;

const UPLOAD_SCRIPT: &str = r#"touch uploaded
echo "https://drive.example/$(basename "$1")"
"#;

const NOTIFY_SCRIPT: &str = r#"touch notified
echo '{"ok": true}'
"#;

const DISTRIBUTING_CONFIG: &str = r#"
[report]
command = "sh"
args = ["build.sh"]

[upload]
enabled = true
command = "sh"
args = ["upload.sh"]

[notify]
enabled = true
mode = "file"
command = "sh"
args = ["notify.sh"]
"#;

/// Temporary project with collaborator scripts and a config file
struct Project {
    dir: TempDir,
}

impl Project {
    fn new(config: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("build.sh"), BUILD_SCRIPT).unwrap();
        fs::write(dir.path().join("upload.sh"), UPLOAD_SCRIPT).unwrap();
        fs::write(dir.path().join("notify.sh"), NOTIFY_SCRIPT).unwrap();
        fs::write(dir.path().join("config.toml"), config).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("fantasy-report").unwrap();
        cmd.current_dir(self.path())
            .env_remove("FANTASY_REPORT_CONFIG")
            .env("RUST_LOG", "info")
            .env("NO_COLOR", "1");
        cmd
    }

    fn exists(&self, name: &str) -> bool {
        self.path().join(name).exists()
    }

    fn request(&self) -> String {
        fs::read_to_string(self.path().join("request.json")).unwrap()
    }
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    let project = Project::new(DISTRIBUTING_CONFIG);
    project
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--fantasy-platform"))
        .stdout(predicate::str::contains("Generate report"))
        .stdout(predicate::str::contains("For Developers"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    let project = Project::new(DISTRIBUTING_CONFIG);
    project
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fantasy-report"));
}

#[test]
fn test_help_still_requires_config() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("fantasy-report").unwrap();
    cmd.current_dir(temp_dir.path())
        .env_remove("FANTASY_REPORT_CONFIG")
        .env("NO_COLOR", "1")
        .arg("--help")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--fantasy-platform").not())
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_unknown_flag_is_a_usage_error() {
    let project = Project::new(DISTRIBUTING_CONFIG);
    project
        .cmd()
        .arg("--bogus")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--bogus"));
    assert!(!project.exists("request.json"));
}

#[test]
fn test_missing_config_aborts() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("fantasy-report").unwrap();
    cmd.current_dir(temp_dir.path())
        .env_remove("FANTASY_REPORT_CONFIG")
        .env("NO_COLOR", "1")
        .args(["-l", "12345"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Please make sure that it exists in project root directory.",
        ));
}

#[test]
fn test_config_path_from_environment() {
    let project = Project::new(DISTRIBUTING_CONFIG);
    fs::rename(
        project.path().join("config.toml"),
        project.path().join("weekly.toml"),
    )
    .unwrap();

    project
        .cmd()
        .env("FANTASY_REPORT_CONFIG", "weekly.toml")
        .args(["-n", "-t"])
        .assert()
        .success();
    assert!(project.exists("request.json"));
}

#[test]
fn test_missing_dependencies_abort_before_any_prompt() {
    let config = format!(
        "[preflight]\nrequirements = [\"fantasy-report-missing-a\", \"fantasy-report-missing-b>=2\"]\n{}",
        DISTRIBUTING_CONFIG
    );
    let project = Project::new(&config);

    project
        .cmd()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Generate report for").not())
        .stderr(predicate::str::contains("MISSING DEPENDENCY: fantasy-report-missing-a"))
        .stderr(predicate::str::contains("MISSING 2 DEPENDENCIES"));
    assert!(!project.exists("request.json"));
}

#[test]
fn test_unsupported_notify_mode_is_a_usage_error() {
    let config = DISTRIBUTING_CONFIG.replace("mode = \"file\"", "mode = \"carrier-pigeon\"");
    let project = Project::new(&config);

    project
        .cmd()
        .args(["-l", "12345", "-w", "5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("mode = carrier-pigeon"));
    assert!(!project.exists("request.json"));
}

#[test]
fn test_full_cli_test_report_is_never_distributed() {
    let project = Project::new(DISTRIBUTING_CONFIG);

    project
        .cmd()
        .args(["-f", "yahoo", "-l", "12345", "-w", "5", "-t"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(y/n)").not())
        .stderr(predicate::str::contains("Test report NOT uploaded to storage."))
        .stderr(predicate::str::contains("Test report NOT posted to chat."));

    let request = project.request();
    assert!(request.contains(r#""platform":"yahoo""#));
    assert!(request.contains(r#""league_id":"12345""#));
    assert!(request.contains(r#""week":5"#));
    assert!(request.contains(r#""test":true"#));
    assert!(project.exists("report.pdf"));
    assert!(!project.exists("uploaded"));
    assert!(!project.exists("notified"));
}

#[test]
fn test_out_of_range_week_falls_back_to_prompt() {
    let project = Project::new(DISTRIBUTING_CONFIG);

    project
        .cmd()
        .args(["-l", "12345", "-w", "25", "-t"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Please select a valid week number from 1 to 17.",
        ))
        .stdout(predicate::str::contains("Generate report for default week? (y/n)"));

    assert!(project.request().contains(r#""week":null"#));
}

#[test]
fn test_invalid_week_in_batch_mode_is_a_usage_error() {
    let project = Project::new(DISTRIBUTING_CONFIG);

    project
        .cmd()
        .args(["-n", "-w", "25"])
        .assert()
        .code(2);
    assert!(!project.exists("request.json"));
}

#[test]
fn test_closed_input_cancels_the_run() {
    let project = Project::new(DISTRIBUTING_CONFIG);

    project
        .cmd()
        .write_stdin("maybe\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("You must select either 'y' or 'n'."))
        .stderr(predicate::str::contains("Report generation cancelled by operator."));
    assert!(!project.exists("request.json"));
}

#[test]
fn test_upload_failure_still_notifies() {
    let project = Project::new(DISTRIBUTING_CONFIG);
    fs::write(
        project.path().join("upload.sh"),
        "echo 'storage quota exceeded' >&2\nexit 1\n",
    )
    .unwrap();

    project
        .cmd()
        .args(["-n", "-l", "12345"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FAILED"))
        .stderr(predicate::str::contains("storage quota exceeded"))
        .stderr(predicate::str::contains("successfully posted to chat!"));
    assert!(project.exists("notified"));
}

#[test]
fn test_unknown_league_in_batch_mode_aborts() {
    let project = Project::new(DISTRIBUTING_CONFIG);
    fs::write(project.path().join("build.sh"), "cat > request.json\nexit 3\n").unwrap();

    project
        .cmd()
        .args(["-n", "-l", "999"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("league 999 does not correspond to a real league"));
    assert!(!project.exists("uploaded"));
}
