//! Run parameters
//!
//! Command-line values are authoritative; anything they leave open is filled
//! in by the [`Resolver`], which prompts the operator when running
//! interactively. The result is a [`ParameterSet`] that is never modified once
//! it has been handed to the report builder.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod prompt;
pub mod resolver;

pub use prompt::{ConsolePrompter, Prompter};
pub use resolver::{ResolveError, Resolver};

pub const FIRST_WEEK: u8 = 1;
pub const LAST_WEEK: u8 = 17;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeekError {
    #[error("\"{0}\" is not a week number")]
    NotANumber(String),

    #[error("week {0} is outside {FIRST_WEEK}-{LAST_WEEK}")]
    OutOfRange(i64),
}

/// A regular-season week, always within 1..=17
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Week(u8);

impl Week {
    pub fn new(number: i64) -> Result<Self, WeekError> {
        if (i64::from(FIRST_WEEK)..=i64::from(LAST_WEEK)).contains(&number) {
            Ok(Week(number as u8))
        } else {
            Err(WeekError::OutOfRange(number))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl FromStr for Week {
    type Err = WeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = s
            .trim()
            .parse::<i64>()
            .map_err(|_| WeekError::NotANumber(s.trim().to_string()))?;
        Week::new(number)
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Week to report on, or let the builder pick the current week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekSelection {
    Default,
    Week(Week),
}

impl WeekSelection {
    pub fn week(self) -> Option<Week> {
        match self {
            WeekSelection::Default => None,
            WeekSelection::Week(week) => Some(week),
        }
    }
}

/// League to report on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeagueSelection {
    /// The league configured for the report builder
    Default,
    Explicit(String),
}

impl LeagueSelection {
    pub fn id(&self) -> Option<&str> {
        match self {
            LeagueSelection::Default => None,
            LeagueSelection::Explicit(id) => Some(id),
        }
    }
}

impl fmt::Display for LeagueSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeagueSelection::Default => f.write_str("default league"),
            LeagueSelection::Explicit(id) => write!(f, "league {id}"),
        }
    }
}

/// Report behaviour switches, passed through to the builder untouched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportOptions {
    pub save_data: bool,
    pub refresh_web_data: bool,
    /// `None` lets the builder use its own simulation count
    pub playoff_prob_sims: Option<u32>,
    pub break_ties: bool,
    pub dq_ce: bool,
    pub dev_offline: bool,
    pub test: bool,
}

/// Values supplied explicitly on the command line
///
/// `None` means "not given", and the resolver fills those in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterOverrides {
    pub platform: Option<String>,
    pub league_id: Option<String>,
    pub week: Option<WeekSelection>,
    pub game_id: Option<String>,
    pub season: Option<String>,
    pub options: ReportOptions,
}

/// Fully resolved inputs for one report build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    pub platform: Option<String>,
    pub league: LeagueSelection,
    pub week: Option<Week>,
    pub game_id: Option<String>,
    pub season: Option<String>,
    pub options: ReportOptions,
}
