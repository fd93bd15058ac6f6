mod cli;
mod config;
mod platform;

use std::process::ExitCode;

use clap::Parser;
use client_logging::LogDestination;
use log::LevelFilter;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("skiptrace: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    let file_config = config::load_file_config(cli.config.as_deref())?;
    let config = config::resolve(&cli, file_config)?;

    let level = if config.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    match cli.headless.as_deref() {
        Some(csv) => {
            if !client_logging::initialize(LogDestination::Terminal, level, &config.log_file) {
                eprintln!("skiptrace: warning: logging is disabled");
            }
            platform::headless::run(&config, csv, cli.query.as_deref())
        }
        None => {
            // The terminal belongs to the UI, so logs go to a file only.
            if !client_logging::initialize(LogDestination::File, level, &config.log_file) {
                eprintln!(
                    "skiptrace: warning: cannot log to {}; continuing without logs",
                    config.log_file.display()
                );
            }
            platform::app::run_tui(&config, cli.file.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
