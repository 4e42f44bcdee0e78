//! Run orchestration
//!
//! Configuration and preflight come first, then the resolve/build loop, then
//! the fan-out. Every way the run can end is a [`RunError`] with its own exit
//! status, except partial distribution, which still counts as success.

use std::path::Path;
use thiserror::Error;

use crate::cli::{Cli, Output};
use crate::config::{ConfigError, ReportConfig};
use crate::distribute::{self, DistributionReport, Notifier, StorageUploader};
use crate::params::prompt;
use crate::params::{
    ParameterOverrides, ParameterSet, Prompter, ResolveError, Resolver, WeekError, WeekSelection,
};
use crate::preflight::{self, Environment, PreflightError};
use crate::report::{self, Artifact, ReportBuilder, ReportError};

pub const INVALID_WEEK_ARGUMENT: &str = "Please select a valid week number from 1 to 17.";

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Preflight(#[from] PreflightError),

    #[error("Invalid --week: {0}. Please select a valid week number from 1 to 17.")]
    InvalidWeek(WeekError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl RunError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Config(e) if e.is_usage() => 2,
            RunError::InvalidWeek(_) => 2,
            _ => 1,
        }
    }
}

/// Services the run hands work to
pub struct Collaborators<'a> {
    pub builder: &'a dyn ReportBuilder,
    pub uploader: &'a dyn StorageUploader,
    pub notifier: &'a dyn Notifier,
}

/// What one successful run produced
#[derive(Debug)]
pub struct RunSummary {
    pub params: ParameterSet,
    pub artifact: Artifact,
    pub distribution: DistributionReport,
}

impl RunSummary {
    pub fn print(&self, output: &Output) {
        let distribution = &self.distribution;
        let week = self
            .params
            .week
            .map_or_else(|| "default".to_string(), |week| week.to_string());

        output.header("Weekly report");
        output.key_value("Report:", &self.artifact.to_string(), true);
        output.key_value("League:", &self.params.league.to_string(), false);
        output.key_value("Week:", &week, false);
        output.sink("upload", &distribution.upload);
        output.sink("notify", &distribution.notify);
        if let Some(reference) = &distribution.shareable_reference {
            output.key_value("Shared:", reference, true);
        }

        if distribution.is_partial() {
            output.warning("Report generated, but not every destination received it.");
        } else {
            output.success("Report generation complete.");
        }
    }
}

/// Load the configuration and check the environment before anything else
pub fn prepare(config_path: &Path, env: &dyn Environment) -> Result<ReportConfig, RunError> {
    let config = ReportConfig::load(config_path)?;
    preflight::run(&config, env)?;
    Ok(config)
}

/// Resolve parameters, build the report and distribute it
pub fn run<P: Prompter>(
    cli: &Cli,
    config: &ReportConfig,
    collaborators: &Collaborators<'_>,
    mut prompter: P,
) -> Result<RunSummary, RunError> {
    let interactive = config.general.interactive && !cli.non_interactive;
    let overrides = overrides(cli, interactive, &mut prompter)?;
    let mut resolver = Resolver::new(overrides, prompter, interactive);

    let (params, artifact) = build_report(&mut resolver, collaborators.builder, config)?;
    let distribution = distribute::fan_out(
        &artifact,
        config,
        params.options.test,
        collaborators.uploader,
        collaborators.notifier,
    );

    Ok(RunSummary {
        params,
        artifact,
        distribution,
    })
}

/// Command-line values with the week validated
///
/// A bad week is replaced right away by asking the operator, before any
/// league question, and is a usage error when nobody can be asked.
fn overrides<P: Prompter>(
    cli: &Cli,
    interactive: bool,
    prompter: &mut P,
) -> Result<ParameterOverrides, RunError> {
    let mut overrides = cli.overrides();
    match cli.week() {
        None => {}
        Some(Ok(week)) => overrides.week = Some(WeekSelection::Week(week)),
        Some(Err(e)) if interactive => {
            tracing::debug!("Ignoring --week: {}", e);
            prompter.say(INVALID_WEEK_ARGUMENT).map_err(ResolveError::from)?;
            overrides.week = Some(prompt::select_week(prompter)?);
        }
        Some(Err(e)) => return Err(RunError::InvalidWeek(e)),
    }
    Ok(overrides)
}

/// Resolve and build until the builder accepts the league
pub fn build_report<P: Prompter>(
    resolver: &mut Resolver<P>,
    builder: &dyn ReportBuilder,
    config: &ReportConfig,
) -> Result<(ParameterSet, Artifact), RunError> {
    loop {
        let params = resolver.resolve()?;
        match report::invoke(builder, &params, config) {
            Ok(artifact) => return Ok((params, artifact)),
            Err(ReportError::LeagueNotFound { league }) if resolver.is_interactive() => {
                tracing::warn!("{} does not correspond to a real league", league);
                resolver.reject_league()?;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
