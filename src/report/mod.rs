//! Report invocation
//!
//! Builds the request from the resolved parameters and hands it to the
//! report builder. Everything that happens inside the builder (data retrieval,
//! metrics, PDF rendering) is its own business; this layer only cares whether
//! an artifact came back and whether the league was unknown.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::ReportConfig;
use crate::params::{LeagueSelection, ParameterSet, ReportOptions, Week};

mod command;

pub use command::CommandReportBuilder;

#[derive(Debug, Error)]
pub enum ReportError {
    /// The builder has no league matching the selection
    #[error("{league} does not correspond to a real league")]
    LeagueNotFound { league: LeagueSelection },

    #[error("Report generation failed: {0:#}")]
    Failed(#[from] anyhow::Error),
}

/// Everything the builder needs for one report
#[derive(Debug, Clone, Serialize)]
pub struct ReportRequest {
    pub platform: Option<String>,
    /// `None` selects the builder's default league
    pub league_id: Option<String>,
    /// `None` selects the builder's current week
    pub week: Option<Week>,
    pub game_id: Option<String>,
    pub season: Option<String>,
    #[serde(flatten)]
    pub options: ReportOptions,
    /// Lets the builder read its own settings from the shared config file
    pub config_file: PathBuf,
}

impl ReportRequest {
    pub fn new(params: &ParameterSet, config: &ReportConfig) -> Self {
        Self {
            platform: params.platform.clone(),
            league_id: params.league.id().map(str::to_string),
            week: params.week,
            game_id: params.game_id.clone(),
            season: params.season.clone(),
            options: params.options,
            config_file: config.path.clone(),
        }
    }

    pub fn league(&self) -> LeagueSelection {
        match &self.league_id {
            Some(id) => LeagueSelection::Explicit(id.clone()),
            None => LeagueSelection::Default,
        }
    }
}

/// The finished report file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: PathBuf,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Produces the report file for a request
pub trait ReportBuilder {
    fn build(&self, request: &ReportRequest) -> Result<Artifact, ReportError>;
}

/// Build one report for the resolved parameters
pub fn invoke(
    builder: &dyn ReportBuilder,
    params: &ParameterSet,
    config: &ReportConfig,
) -> Result<Artifact, ReportError> {
    let request = ReportRequest::new(params, config);
    match params.week {
        Some(week) => tracing::info!("Generating report for {}, week {}", params.league, week),
        None => tracing::info!("Generating report for {}, default week", params.league),
    }

    let artifact = builder.build(&request)?;
    tracing::info!("Report created: {}", artifact);
    Ok(artifact)
}
