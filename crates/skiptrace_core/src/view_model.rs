use crate::{JobId, Screen};

/// Placeholder for a missing or empty text field.
pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_CONTACTS_FOUND: &str = "No contacts found";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub screen: Screen,
    pub path_input: String,
    pub file: Option<FileInfoView>,
    pub uploading: bool,
    pub job_id: Option<JobId>,
    pub progress: ProgressView,
    pub summary: SummaryView,
    /// Rows passing the current search, ready for display.
    pub rows: Vec<ResultRowView>,
    pub query: String,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfoView {
    pub name: String,
    pub size_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressView {
    pub percent: u32,
    pub text: String,
    pub percentage_label: String,
    /// Rough heuristic, not a guarantee.
    pub eta_label: String,
    pub status_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryView {
    pub total: usize,
    pub with_contacts: usize,
    pub success_rate: u32,
    pub success_rate_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRowView {
    pub business_name: String,
    pub business_address: String,
    pub contacts: ContactCell,
    pub search_resources: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactCell {
    /// Individually highlighted phone numbers.
    Numbers(Vec<String>),
    NoneFound,
}
