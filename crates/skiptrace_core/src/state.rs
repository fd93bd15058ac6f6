use std::path::PathBuf;

use crate::format::{
    capitalize, estimate_remaining_seconds, format_duration_estimate, format_file_size,
    progress_percentage, success_rate,
};
use crate::rows::{contact_tokens, filter_indices, ResultRow};
use crate::view_model::{
    AppViewModel, ContactCell, FileInfoView, ProgressView, ResultRowView, SummaryView,
    NOT_AVAILABLE,
};

pub type JobId = String;

pub const CSV_MIME: &str = "text/csv";

const INITIAL_PROGRESS_TEXT: &str = "0 / 0 processed";
const INITIAL_ETA_TEXT: &str = "Calculating...";
const INITIAL_STATUS_TEXT: &str = "Initializing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Upload,
    Progress,
    Results,
}

/// A file as inspected on disk, before type validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
    pub mime: Option<String>,
}

impl FileCandidate {
    pub fn is_csv(&self) -> bool {
        self.name.ends_with(".csv") || self.mime.as_deref() == Some(CSV_MIME)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobPhase {
    Processing,
    Completed,
    Error,
    /// Any status string the server may add later; treated as non-terminal.
    Other(String),
}

impl JobPhase {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "processing" => JobPhase::Processing,
            "completed" => JobPhase::Completed,
            "error" => JobPhase::Error,
            other => JobPhase::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobPhase::Processing => "processing",
            JobPhase::Completed => "completed",
            JobPhase::Error => "error",
            JobPhase::Other(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobPhase::Completed | JobPhase::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub phase: JobPhase,
    pub progress: u64,
    pub total: u64,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ProgressDisplay {
    percent: u32,
    text: String,
    eta: String,
    status: String,
}

impl Default for ProgressDisplay {
    fn default() -> Self {
        Self {
            percent: 0,
            text: INITIAL_PROGRESS_TEXT.to_string(),
            eta: INITIAL_ETA_TEXT.to_string(),
            status: INITIAL_STATUS_TEXT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    screen: Screen,
    path_input: String,
    selected_file: Option<SelectedFile>,
    uploading: bool,
    job: Option<JobId>,
    progress: ProgressDisplay,
    results: Vec<ResultRow>,
    query: String,
    visible: Vec<usize>,
    error: Option<String>,
    notice: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job.as_deref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn results(&self) -> &[ResultRow] {
        &self.results
    }

    pub fn path_input(&self) -> &str {
        &self.path_input
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Rows matching the current query, in server order.
    pub fn visible_rows(&self) -> Vec<ResultRow> {
        self.visible
            .iter()
            .filter_map(|&index| self.results.get(index).cloned())
            .collect()
    }

    pub fn view(&self) -> AppViewModel {
        let with_contacts = self.results.iter().filter(|row| row.has_contacts()).count();
        let rate = success_rate(with_contacts, self.results.len());

        AppViewModel {
            screen: self.screen,
            path_input: self.path_input.clone(),
            file: self.selected_file.as_ref().map(|file| FileInfoView {
                name: file.name.clone(),
                size_label: format_file_size(file.size_bytes),
            }),
            uploading: self.uploading,
            job_id: self.job.clone(),
            progress: ProgressView {
                percent: self.progress.percent,
                text: self.progress.text.clone(),
                percentage_label: format!("{}%", self.progress.percent),
                eta_label: self.progress.eta.clone(),
                status_label: self.progress.status.clone(),
            },
            summary: SummaryView {
                total: self.results.len(),
                with_contacts,
                success_rate: rate,
                success_rate_label: format!("{rate}%"),
            },
            rows: self
                .visible
                .iter()
                .filter_map(|&index| self.results.get(index))
                .map(row_view)
                .collect(),
            query: self.query.clone(),
            error: self.error.clone(),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_path_input(&mut self, text: String) {
        if self.path_input != text {
            self.path_input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn select_file(&mut self, candidate: FileCandidate) {
        self.selected_file = Some(SelectedFile {
            path: candidate.path,
            name: candidate.name,
            size_bytes: candidate.size_bytes,
        });
        self.mark_dirty();
    }

    pub(crate) fn begin_upload(&mut self) {
        self.uploading = true;
        self.mark_dirty();
    }

    pub(crate) fn finish_upload(&mut self) {
        self.uploading = false;
        self.mark_dirty();
    }

    pub(crate) fn start_job(&mut self, job_id: JobId) {
        self.uploading = false;
        self.job = Some(job_id);
        self.progress = ProgressDisplay::default();
        self.screen = Screen::Progress;
        self.mark_dirty();
    }

    pub(crate) fn is_current_job(&self, job_id: &str) -> bool {
        self.job.as_deref() == Some(job_id)
    }

    pub(crate) fn apply_status(&mut self, status: &JobStatus) {
        let percent = progress_percentage(status.progress, status.total);
        self.progress.percent = percent;
        self.progress.text = format!("{} / {} processed", status.progress, status.total);
        self.progress.status = capitalize(status.phase.as_str());
        if let Some(seconds) = estimate_remaining_seconds(status.progress, status.total) {
            self.progress.eta = format_duration_estimate(seconds);
        }
        self.mark_dirty();
    }

    pub(crate) fn replace_results(&mut self, rows: Vec<ResultRow>) {
        self.results = rows;
        self.visible = filter_indices(&self.results, &self.query);
        self.screen = Screen::Results;
        self.mark_dirty();
    }

    pub(crate) fn set_query(&mut self, query: String) {
        self.query = query;
        self.visible = filter_indices(&self.results, &self.query);
        self.mark_dirty();
    }

    pub(crate) fn show_error(&mut self, message: String) {
        self.error = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn dismiss_error(&mut self) {
        if self.error.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn set_notice(&mut self, notice: String) {
        self.notice = Some(notice);
        self.mark_dirty();
    }

    /// Returns to the Upload screen with every field at its initial value.
    ///
    /// The error slot survives so a failure reported right before the reset
    /// stays visible. Returns the job that was active, if any.
    pub(crate) fn reset(&mut self) -> Option<JobId> {
        let previous_job = self.job.take();
        self.screen = Screen::Upload;
        self.path_input.clear();
        self.selected_file = None;
        self.uploading = false;
        self.progress = ProgressDisplay::default();
        self.results.clear();
        self.query.clear();
        self.visible.clear();
        self.notice = None;
        self.mark_dirty();
        previous_job
    }
}

fn row_view(row: &ResultRow) -> ResultRowView {
    let contacts = match row.contact_numbers.as_deref() {
        Some(raw) if !raw.trim().is_empty() => ContactCell::Numbers(contact_tokens(raw)),
        _ => ContactCell::NoneFound,
    };
    ResultRowView {
        business_name: or_placeholder(row.business_name.as_deref()),
        business_address: or_placeholder(row.business_address.as_deref()),
        contacts,
        search_resources: or_placeholder(row.search_resources.as_deref()),
    }
}

fn or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}
