use std::path::PathBuf;

use crate::{AppState, Effect, JobPhase, Msg, Screen};

pub const INVALID_FILE_TYPE_MESSAGE: &str = "Please select a CSV file.";
pub const NO_FILE_SELECTED_MESSAGE: &str = "Please select a file first.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PathInputChanged(text) => {
            if accepts_file_input(&state) {
                state.set_path_input(text);
            }
            Vec::new()
        }
        Msg::PathSubmitted => {
            let path = state.path_input().trim().to_string();
            if !accepts_file_input(&state) || path.is_empty() {
                return (state, Vec::new());
            }
            vec![Effect::InspectFile {
                path: PathBuf::from(path),
            }]
        }
        Msg::FileDropped(raw) => {
            let Some(path) = parse_dropped_path(&raw) else {
                return (state, Vec::new());
            };
            if !accepts_file_input(&state) {
                return (state, Vec::new());
            }
            state.set_path_input(path.clone());
            vec![Effect::InspectFile {
                path: PathBuf::from(path),
            }]
        }
        Msg::FileChosen(candidate) => {
            if accepts_file_input(&state) {
                if candidate.is_csv() {
                    state.select_file(candidate);
                } else {
                    // The previous selection, if any, stays in place.
                    state.show_error(INVALID_FILE_TYPE_MESSAGE.to_string());
                }
            }
            Vec::new()
        }
        Msg::FileInspectFailed { path, message } => {
            if accepts_file_input(&state) {
                state.show_error(format!("Could not read {}: {}", path.display(), message));
            }
            Vec::new()
        }
        Msg::UploadClicked => {
            if !accepts_file_input(&state) {
                return (state, Vec::new());
            }
            match state.selected_file().map(|file| file.path.clone()) {
                Some(path) => {
                    state.begin_upload();
                    vec![Effect::Upload { path }]
                }
                None => {
                    state.show_error(NO_FILE_SELECTED_MESSAGE.to_string());
                    Vec::new()
                }
            }
        }
        Msg::UploadSucceeded { job_id } => {
            // An upload answer after a reset belongs to nobody.
            if !state.is_uploading() {
                return (state, Vec::new());
            }
            state.start_job(job_id.clone());
            vec![Effect::StartPolling { job_id }]
        }
        Msg::UploadFailed(message) => {
            if state.is_uploading() {
                state.finish_upload();
                state.show_error(format!("Upload failed: {message}"));
            }
            Vec::new()
        }
        Msg::StatusReceived { job_id, status } => {
            if !state.is_current_job(&job_id) || state.screen() != Screen::Progress {
                return (state, Vec::new());
            }
            state.apply_status(&status);
            match status.phase {
                JobPhase::Completed => vec![
                    Effect::StopPolling {
                        job_id: job_id.clone(),
                    },
                    Effect::FetchResults { job_id },
                ],
                JobPhase::Error => {
                    let reason = status.error.as_deref().unwrap_or("unknown error");
                    state.show_error(format!("Processing failed: {reason}"));
                    let mut effects = vec![Effect::StopPolling { job_id }];
                    effects.extend(reset_effects(&mut state));
                    effects
                }
                JobPhase::Processing | JobPhase::Other(_) => Vec::new(),
            }
        }
        // Transient; the platform logs it and the next tick retries.
        Msg::StatusPollFailed { .. } => Vec::new(),
        Msg::ResultsLoaded { job_id, rows } => {
            if state.is_current_job(&job_id) && state.screen() == Screen::Progress {
                state.replace_results(rows);
            }
            Vec::new()
        }
        Msg::ResultsFailed { job_id, message } => {
            if state.is_current_job(&job_id) {
                state.show_error(format!("Failed to load results: {message}"));
            }
            Vec::new()
        }
        Msg::SearchChanged(query) => {
            if state.screen() == Screen::Results {
                state.set_query(query);
            }
            Vec::new()
        }
        Msg::DownloadClicked => match state.job_id() {
            Some(job_id) if state.screen() == Screen::Results => vec![Effect::DownloadResults {
                job_id: job_id.to_string(),
            }],
            _ => Vec::new(),
        },
        Msg::DownloadSaved { job_id, path } => {
            if state.is_current_job(&job_id) {
                state.set_notice(format!("Saved server results to {}", path.display()));
            }
            Vec::new()
        }
        Msg::DownloadFailed { job_id, message } => {
            if state.is_current_job(&job_id) {
                state.show_error(format!("Download failed: {message}"));
            }
            Vec::new()
        }
        Msg::ExportFilteredClicked => {
            if state.screen() != Screen::Results {
                return (state, Vec::new());
            }
            let rows = state.visible_rows();
            if rows.is_empty() {
                Vec::new()
            } else {
                vec![Effect::ExportRows { rows }]
            }
        }
        Msg::ExportSaved { path } => {
            state.set_notice(format!("Exported filtered rows to {}", path.display()));
            Vec::new()
        }
        Msg::ExportFailed(message) => {
            state.show_error(format!("Export failed: {message}"));
            Vec::new()
        }
        Msg::ErrorDismissed => {
            state.dismiss_error();
            Vec::new()
        }
        Msg::ResetRequested => reset_effects(&mut state),
    };

    (state, effects)
}

fn accepts_file_input(state: &AppState) -> bool {
    state.screen() == Screen::Upload && !state.is_uploading()
}

fn reset_effects(state: &mut AppState) -> Vec<Effect> {
    match state.reset() {
        Some(job_id) => vec![Effect::AbandonJob { job_id }],
        None => Vec::new(),
    }
}

/// Terminals paste dropped files as quoted, escaped or `file://` paths.
fn parse_dropped_path(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|line| !line.is_empty())?;
    let unquoted = strip_matching_quotes(line);
    let without_scheme = unquoted.strip_prefix("file://").unwrap_or(unquoted);
    let path = without_scheme.replace("\\ ", " ");
    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}

fn strip_matching_quotes(text: &str) -> &str {
    for quote in ['\'', '"'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}
