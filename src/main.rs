use clap::Parser;
use std::process::ExitCode;

use fantasy_report::cli::{self, Cli, Output};
use fantasy_report::config::ReportConfig;
use fantasy_report::distribute::{CommandNotifier, CommandUploader};
use fantasy_report::params::ConsolePrompter;
use fantasy_report::pipeline::{self, Collaborators, RunError, RunSummary};
use fantasy_report::preflight::SystemEnvironment;
use fantasy_report::report::CommandReportBuilder;

fn main() -> ExitCode {
    cli::setup_logging();

    match run() {
        Ok(summary) => {
            summary.print(&Output::new());
            ExitCode::SUCCESS
        }
        Err(e) => {
            if e.exit_code() == 2 {
                tracing::warn!("{}", e);
            } else {
                tracing::error!("{}", e);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<RunSummary, RunError> {
    // Config and dependencies are checked before any argument is looked at
    let config = pipeline::prepare(&ReportConfig::locate(), &SystemEnvironment)?;
    let cli = Cli::parse();

    let builder = CommandReportBuilder::new(&config.report);
    let uploader = CommandUploader::new(&config.upload);
    let notifier = CommandNotifier::new(&config.notify);
    let collaborators = Collaborators {
        builder: &builder,
        uploader: &uploader,
        notifier: &notifier,
    };

    pipeline::run(&cli, &config, &collaborators, ConsolePrompter::stdio())
}
