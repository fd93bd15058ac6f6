use std::path::PathBuf;

use crate::{FileCandidate, JobId, JobStatus, ResultRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the file path input.
    PathInputChanged(String),
    /// User confirmed the typed path.
    PathSubmitted,
    /// A path was pasted or dropped onto the terminal.
    FileDropped(String),
    /// The platform inspected a file on disk.
    FileChosen(FileCandidate),
    /// The platform could not read the requested file.
    FileInspectFailed { path: PathBuf, message: String },
    /// User asked to upload the selected file.
    UploadClicked,
    UploadSucceeded { job_id: JobId },
    UploadFailed(String),
    /// One status poll answered for a job.
    StatusReceived { job_id: JobId, status: JobStatus },
    /// A status poll failed; polling carries on.
    StatusPollFailed { job_id: JobId, message: String },
    ResultsLoaded { job_id: JobId, rows: Vec<ResultRow> },
    ResultsFailed { job_id: JobId, message: String },
    /// User edited the search box.
    SearchChanged(String),
    /// User asked for the server-generated CSV.
    DownloadClicked,
    DownloadSaved { job_id: JobId, path: PathBuf },
    DownloadFailed { job_id: JobId, message: String },
    /// User asked to export the rows currently shown.
    ExportFilteredClicked,
    ExportSaved { path: PathBuf },
    ExportFailed(String),
    /// User closed the error dialog.
    ErrorDismissed,
    /// User asked to start over.
    ResetRequested,
}
