//! Operator prompts
//!
//! Every question loops until it gets an acceptable answer. The loops are
//! plain iteration so any number of bad answers costs no extra stack.

use console::style;
use std::io::{self, BufRead, Stdout, StdinLock, Write};

use super::{ResolveError, Week, WeekSelection};

pub const LEAGUE_DEFAULT_QUESTION: &str = "Generate report for default league? (y/n) -> ";
pub const LEAGUE_ID_QUESTION: &str =
    "What is the league ID of the league for which you want to generate a report? -> ";
pub const WEEK_DEFAULT_QUESTION: &str = "Generate report for default week? (y/n) -> ";
pub const WEEK_NUMBER_QUESTION: &str =
    "For which week would you like to generate a report? (1 - 17) -> ";

pub const YES_NO_REMINDER: &str = "You must select either 'y' or 'n'.";
pub const EMPTY_ANSWER_REMINDER: &str = "An answer is required.";
pub const INVALID_WEEK_ANSWER: &str = "Please select a valid week number between 1 and 17.";

/// Line-oriented conversation with the operator
pub trait Prompter {
    /// Ask a question and wait for one line; `Ok(None)` once input is exhausted
    fn ask(&mut self, question: &str) -> io::Result<Option<String>>;

    /// Show a message to the operator
    fn say(&mut self, message: &str) -> io::Result<()>;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        (**self).ask(question)
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        (**self).say(message)
    }
}

/// Prompter over any reader/writer pair, normally the terminal
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", style(message).yellow())
    }
}

fn answer<P: Prompter + ?Sized>(prompter: &mut P, question: &str) -> Result<String, ResolveError> {
    prompter.ask(question)?.ok_or(ResolveError::Declined)
}

/// Ask until the operator answers `y` or `n`
pub fn ask_yes_no<P: Prompter + ?Sized>(
    prompter: &mut P,
    question: &str,
) -> Result<bool, ResolveError> {
    loop {
        match answer(prompter, question)?.trim().to_ascii_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => prompter.say(YES_NO_REMINDER)?,
        }
    }
}

/// Ask until the operator gives a non-blank answer
pub fn ask_non_empty<P: Prompter + ?Sized>(
    prompter: &mut P,
    question: &str,
) -> Result<String, ResolveError> {
    loop {
        let reply = answer(prompter, question)?;
        let reply = reply.trim();
        if !reply.is_empty() {
            return Ok(reply.to_string());
        }
        prompter.say(EMPTY_ANSWER_REMINDER)?;
    }
}

/// Default week, or a specific week number
///
/// An unusable week number starts the selection over from the y/n question.
pub fn select_week<P: Prompter + ?Sized>(prompter: &mut P) -> Result<WeekSelection, ResolveError> {
    loop {
        if ask_yes_no(prompter, WEEK_DEFAULT_QUESTION)? {
            return Ok(WeekSelection::Default);
        }
        match answer(prompter, WEEK_NUMBER_QUESTION)?.parse::<Week>() {
            Ok(week) => return Ok(WeekSelection::Week(week)),
            Err(e) => {
                tracing::debug!("Rejected week answer: {}", e);
                prompter.say(INVALID_WEEK_ANSWER)?;
            }
        }
    }
}
