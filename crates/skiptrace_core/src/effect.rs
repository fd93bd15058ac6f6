use std::path::PathBuf;

use crate::{JobId, ResultRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    InspectFile { path: PathBuf },
    Upload { path: PathBuf },
    /// Poll once now, then on every interval until a terminal status.
    StartPolling { job_id: JobId },
    StopPolling { job_id: JobId },
    FetchResults { job_id: JobId },
    DownloadResults { job_id: JobId },
    ExportRows { rows: Vec<ResultRow> },
    /// Cancel polling and every in-flight request tied to the job.
    AbandonJob { job_id: JobId },
}
