use std::io;
use thiserror::Error;

use super::prompt::{self, Prompter};
use super::{LeagueSelection, ParameterOverrides, ParameterSet, WeekSelection};

pub const INVALID_LEAGUE_MESSAGE: &str = "The league ID you have selected is not valid.";

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The operator's input ended while a question was open
    #[error("Report generation cancelled by operator.")]
    Declined,

    #[error("Failed to prompt operator: {0}")]
    Io(#[from] io::Error),
}

/// Turns command-line overrides into a complete [`ParameterSet`]
///
/// The resolver keeps the week once chosen, so a league retry only asks about
/// the league again.
pub struct Resolver<P> {
    overrides: ParameterOverrides,
    prompter: P,
    interactive: bool,
}

impl<P: Prompter> Resolver<P> {
    pub fn new(overrides: ParameterOverrides, prompter: P, interactive: bool) -> Self {
        Self {
            overrides,
            prompter,
            interactive,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn into_prompter(self) -> P {
        self.prompter
    }

    /// Resolve the league, then the week, and assemble the parameter set
    pub fn resolve(&mut self) -> Result<ParameterSet, ResolveError> {
        let league = self.resolve_league()?;
        let week = self.resolve_week()?;

        let overrides = &self.overrides;
        let params = ParameterSet {
            platform: overrides.platform.clone(),
            league,
            week: week.week(),
            game_id: overrides.game_id.clone(),
            season: overrides.season.clone(),
            options: overrides.options,
        };
        tracing::debug!("Resolved parameters: {:?}", params);
        Ok(params)
    }

    /// Forget the league that the builder could not find
    ///
    /// The next [`resolve`](Self::resolve) asks for the league again instead
    /// of reusing the rejected ID.
    pub fn reject_league(&mut self) -> Result<(), ResolveError> {
        self.prompter.say(INVALID_LEAGUE_MESSAGE)?;
        self.overrides.league_id = None;
        Ok(())
    }

    fn resolve_league(&mut self) -> Result<LeagueSelection, ResolveError> {
        if let Some(id) = &self.overrides.league_id {
            // Given on the command line: already selected, no confirmation
            return Ok(LeagueSelection::Explicit(id.clone()));
        }
        if !self.interactive {
            return Ok(LeagueSelection::Default);
        }

        if prompt::ask_yes_no(&mut self.prompter, prompt::LEAGUE_DEFAULT_QUESTION)? {
            Ok(LeagueSelection::Default)
        } else {
            let id = prompt::ask_non_empty(&mut self.prompter, prompt::LEAGUE_ID_QUESTION)?;
            Ok(LeagueSelection::Explicit(id))
        }
    }

    fn resolve_week(&mut self) -> Result<WeekSelection, ResolveError> {
        if let Some(selection) = self.overrides.week {
            return Ok(selection);
        }

        let selection = if self.interactive {
            prompt::select_week(&mut self.prompter)?
        } else {
            WeekSelection::Default
        };
        self.overrides.week = Some(selection);
        Ok(selection)
    }
}
