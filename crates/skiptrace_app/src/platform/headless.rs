use std::path::Path;
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use client_logging::{client_error, client_info};
use skiptrace_core::{AppViewModel, Msg, Screen};

use super::dispatch::Dispatcher;
use super::effects::EffectRunner;
use crate::config::AppConfig;

const WAIT_SLICE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Selecting,
    Processing,
    Saving { pending: usize },
}

/// Uploads `csv`, waits for the job and saves its results without a UI.
pub fn run(config: &AppConfig, csv: &Path, query: Option<&str>) -> anyhow::Result<ExitCode> {
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(config.client_config(), msg_tx)
        .context("failed to start the job client")?;
    let mut dispatcher = Dispatcher::new(runner, msg_rx);

    client_info!("Headless run for {:?} against {}", csv, config.server_url);
    dispatcher.dispatch(Msg::PathInputChanged(csv.display().to_string()));
    dispatcher.dispatch(Msg::PathSubmitted);

    let mut step = Step::Selecting;
    let mut last_progress = String::new();

    loop {
        if let Some(message) = dispatcher.state().error() {
            client_error!("{}", message);
            return Ok(ExitCode::FAILURE);
        }

        match step {
            Step::Selecting => {
                if dispatcher.state().selected_file().is_some() {
                    dispatcher.dispatch(Msg::UploadClicked);
                    step = Step::Processing;
                    continue;
                }
            }
            Step::Processing if dispatcher.state().screen() == Screen::Results => {
                print_summary(&dispatcher.view());
                step = Step::Saving {
                    pending: request_saves(&mut dispatcher, query),
                };
                continue;
            }
            Step::Processing => {
                let view = dispatcher.view();
                if view.screen == Screen::Progress && view.progress.text != last_progress {
                    client_info!(
                        "{}: {} ({}, about {} left)",
                        view.progress.status_label,
                        view.progress.text,
                        view.progress.percentage_label,
                        view.progress.eta_label
                    );
                    last_progress = view.progress.text;
                }
            }
            Step::Saving { pending: 0 } => return Ok(ExitCode::SUCCESS),
            Step::Saving { .. } => {}
        }

        let Some(msg) = dispatcher.recv_timeout(WAIT_SLICE) else {
            continue;
        };
        if let Step::Saving { pending } = &mut step {
            match &msg {
                Msg::DownloadSaved { path, .. } | Msg::ExportSaved { path } => {
                    println!("Saved {}", path.display());
                    *pending = pending.saturating_sub(1);
                }
                _ => {}
            }
        }
        dispatcher.dispatch(msg);
    }
}

/// Requests the server CSV and, for a query with matches, the filtered
/// export. Returns how many files to wait for.
fn request_saves(dispatcher: &mut Dispatcher, query: Option<&str>) -> usize {
    let mut pending = 0;
    if let Some(query) = query {
        dispatcher.dispatch(Msg::SearchChanged(query.to_string()));
        let matches = dispatcher.state().visible_rows().len();
        println!("Rows matching {query:?}: {matches}");
        if matches > 0 {
            dispatcher.dispatch(Msg::ExportFilteredClicked);
            pending += 1;
        }
    }
    dispatcher.dispatch(Msg::DownloadClicked);
    pending + 1
}

fn print_summary(view: &AppViewModel) {
    let summary = &view.summary;
    println!("Total businesses: {}", summary.total);
    println!("With contacts: {}", summary.with_contacts);
    println!("Success rate: {}", summary.success_rate_label);
}
