//! # fantasy-report - weekly fantasy football report runner
//!
//! Checks the local environment, works out which league and week to report on
//! (from flags or by asking), has the report builder produce the PDF, and then
//! hands it to cloud storage and chat.
//!
//! ## Features
//!
//! - **Preflight**: every declared tool is verified before any work starts
//! - **Interactive or batch**: prompts for anything not given on the command line, or never prompts with `-n`
//! - **League retry**: an unknown league ID is asked for again instead of failing the run
//! - **Independent sinks**: a failed upload never stops the chat notification
//!
//! ## Quick Start
//!
//! ```bash
//! # Generate a test report for week 5 without distributing it
//! fantasy-report -f yahoo -l 12345 -w 5 -t
//! ```

pub mod cli;
pub mod config;
pub mod distribute;
pub mod external;
pub mod params;
pub mod pipeline;
pub mod preflight;
pub mod report;

pub use cli::{Cli, Output};
pub use config::ReportConfig;
