//! Skiptrace core: pure state machine and view-model helpers.
mod effect;
mod format;
mod msg;
mod rows;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use format::{
    capitalize, estimate_remaining_seconds, format_duration_estimate, format_file_size,
    progress_percentage, success_rate, ETA_SECONDS_PER_ITEM,
};
pub use msg::Msg;
pub use rows::{contact_tokens, filter_indices, ResultRow};
pub use state::{
    AppState, FileCandidate, JobId, JobPhase, JobStatus, Screen, SelectedFile, CSV_MIME,
};
pub use update::{
    update, INVALID_FILE_TYPE_MESSAGE, NO_FILE_SELECTED_MESSAGE,
};
pub use view_model::{
    AppViewModel, ContactCell, FileInfoView, ProgressView, ResultRowView, SummaryView,
    NOT_AVAILABLE, NO_CONTACTS_FOUND,
};
