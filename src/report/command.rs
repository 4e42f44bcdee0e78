use anyhow::{Context, anyhow};

use super::{Artifact, ReportBuilder, ReportError, ReportRequest};
use crate::config::BuilderConfig;
use crate::external::ExternalCommand;

/// Runs the configured builder program
///
/// The request goes to the child's stdin as JSON. The last non-blank stdout
/// line is the artifact path. A dedicated exit status means the league does
/// not exist.
pub struct CommandReportBuilder {
    command: ExternalCommand,
    league_not_found_exit_code: i32,
}

impl CommandReportBuilder {
    pub fn new(config: &BuilderConfig) -> Self {
        Self {
            command: ExternalCommand::new(config.command.clone(), &config.args),
            league_not_found_exit_code: config.league_not_found_exit_code,
        }
    }
}

impl ReportBuilder for CommandReportBuilder {
    fn build(&self, request: &ReportRequest) -> Result<Artifact, ReportError> {
        let input = serde_json::to_vec(request).context("Failed to encode report request")?;
        let output = self.command.run(&[], Some(input.as_slice()))?;

        if output.status.code() == Some(self.league_not_found_exit_code) {
            return Err(ReportError::LeagueNotFound {
                league: request.league(),
            });
        }
        if !output.status.success() {
            return Err(anyhow!(
                "{} {}",
                self.command.program(),
                output.failure_detail()
            )
            .into());
        }

        let path = output
            .last_line()
            .ok_or_else(|| anyhow!("{} did not report an artifact path", self.command.program()))?;
        let artifact = Artifact::new(path);
        if !artifact.path().exists() {
            tracing::warn!("Builder reported {} but no such file exists", artifact);
        }
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{LeagueSelection, ReportOptions};
    use std::path::{Path, PathBuf};

    fn builder(script: &str) -> CommandReportBuilder {
        CommandReportBuilder::new(&BuilderConfig {
            command: "sh".into(),
            args: vec!["-c".into(), script.into()],
            league_not_found_exit_code: 3,
        })
    }

    fn request(league_id: Option<&str>) -> ReportRequest {
        ReportRequest {
            platform: Some("fleaflicker".into()),
            league_id: league_id.map(str::to_string),
            week: None,
            game_id: None,
            season: None,
            options: ReportOptions::default(),
            config_file: PathBuf::from("config.toml"),
        }
    }

    #[test]
    fn test_artifact_path_from_last_line() {
        let artifact = builder("cat >/dev/null; echo building; echo /tmp/week.pdf")
            .build(&request(None))
            .unwrap();
        assert_eq!(artifact.path(), Path::new("/tmp/week.pdf"));
    }

    #[test]
    fn test_request_arrives_on_stdin() {
        let artifact = builder("grep -q '\"league_id\":\"555\"' && echo found.pdf")
            .build(&request(Some("555")))
            .unwrap();
        assert_eq!(artifact.path(), Path::new("found.pdf"));
    }

    #[test]
    fn test_league_not_found_exit_code() {
        let err = builder("exit 3").build(&request(Some("999"))).unwrap_err();
        assert!(matches!(
            err,
            ReportError::LeagueNotFound { league: LeagueSelection::Explicit(ref id) } if id == "999"
        ));
    }

    #[test]
    fn test_other_failures_carry_stderr() {
        let err = builder("echo 'api token expired' >&2; exit 1")
            .build(&request(None))
            .unwrap_err();
        assert!(matches!(err, ReportError::Failed(_)));
        assert!(err.to_string().contains("api token expired"));
    }

    #[test]
    fn test_missing_artifact_path_is_a_failure() {
        let err = builder("true").build(&request(None)).unwrap_err();
        assert!(err.to_string().contains("did not report an artifact path"));
    }
}
