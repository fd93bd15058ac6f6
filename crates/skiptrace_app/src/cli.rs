use std::path::PathBuf;

use clap::Parser;

/// Upload business CSVs for skip tracing and browse the results.
#[derive(Debug, Default, Parser)]
#[command(name = "skiptrace", version)]
pub struct Cli {
    /// Base URL of the skip-trace service.
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Directory for downloaded and exported CSV files.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Delay between job status polls.
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval_ms: Option<u64>,

    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: Option<u64>,

    /// RON settings file (defaults to ./skiptrace.ron when present).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,

    /// Process one CSV without the interactive UI and save the results.
    #[arg(long, value_name = "CSV")]
    pub headless: Option<PathBuf>,

    /// With --headless, also export the rows matching this search.
    #[arg(long, value_name = "TEXT", requires = "headless")]
    pub query: Option<String>,

    /// CSV to preselect in the interactive UI.
    #[arg(value_name = "CSV", conflicts_with = "headless")]
    pub file: Option<PathBuf>,
}
