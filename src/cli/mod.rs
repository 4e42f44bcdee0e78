//! Command-line interface for the report runner
//!
//! Flags mirror the report builder's options. Anything left out is either
//! prompted for or left to the builder's defaults.

use clap::Parser;

use crate::params::{ParameterOverrides, ReportOptions, Week, WeekError};

mod output;

pub use output::Output;

/// Generate the weekly fantasy football report and distribute it
#[derive(Debug, Parser)]
#[command(name = "fantasy-report", author, version, about, long_about = None)]
pub struct Cli {
    /// Fantasy football platform for which to generate a report
    #[arg(short = 'f', long, value_name = "PLATFORM", help_heading = "Generate report")]
    pub fantasy_platform: Option<String>,

    /// Fantasy football league ID
    #[arg(short, long, value_name = "ID", help_heading = "Generate report")]
    pub league_id: Option<String>,

    /// Week for which to generate the report (1 - 17)
    #[arg(
        short,
        long,
        value_name = "WEEK",
        allow_hyphen_values = true,
        help_heading = "Generate report"
    )]
    pub week: Option<String>,

    /// Platform game ID for the season
    #[arg(short, long, value_name = "GAME_ID", help_heading = "Generate report")]
    pub game_id: Option<String>,

    /// Season year
    #[arg(short = 'y', long, value_name = "YEAR", help_heading = "Generate report")]
    pub year: Option<String>,

    /// Save all retrieved data locally for faster future report generation
    #[arg(short, long, help_heading = "Configuration")]
    pub save_data: bool,

    /// Refresh all data cached from the web
    #[arg(short, long, help_heading = "Configuration")]
    pub refresh_web_data: bool,

    /// Number of Monte Carlo simulations for playoff probabilities
    #[arg(short, long, value_name = "SIMS", help_heading = "Configuration")]
    pub playoff_prob_sims: Option<u32>,

    /// Break ties in power rankings and scoring
    #[arg(short, long, help_heading = "Configuration")]
    pub break_ties: bool,

    /// Disqualify teams from coaching efficiency for ineligible players
    #[arg(short = 'q', long, help_heading = "Configuration")]
    pub disqualify_ce: bool,

    /// Never prompt; use default league and week for anything not given
    #[arg(short, long, help_heading = "Configuration")]
    pub non_interactive: bool,

    /// Run offline against locally saved data
    #[arg(short, long, help_heading = "For Developers")]
    pub dev_offline: bool,

    /// Generate a test report that is never uploaded or posted
    #[arg(short, long, help_heading = "For Developers")]
    pub test: bool,
}

impl Cli {
    /// Week given on the command line, validated
    pub fn week(&self) -> Option<Result<Week, WeekError>> {
        self.week.as_deref().map(str::parse::<Week>)
    }

    pub fn options(&self) -> ReportOptions {
        ReportOptions {
            save_data: self.save_data,
            refresh_web_data: self.refresh_web_data,
            playoff_prob_sims: self.playoff_prob_sims,
            break_ties: self.break_ties,
            dq_ce: self.disqualify_ce,
            dev_offline: self.dev_offline,
            test: self.test,
        }
    }

    /// Everything but the week, which needs validating first
    pub fn overrides(&self) -> ParameterOverrides {
        ParameterOverrides {
            platform: self.fantasy_platform.clone(),
            league_id: self.league_id.clone(),
            week: None,
            game_id: self.game_id.clone(),
            season: self.year.clone(),
            options: self.options(),
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` or `info` by default
pub fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
