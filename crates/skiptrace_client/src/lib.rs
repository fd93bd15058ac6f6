//! Skiptrace client: job API transport, status polling and local CSV output.
mod api;
mod engine;
mod export;
mod filename;
mod persist;
mod poller;
mod types;

pub use api::{ClientSettings, JobApi, ReqwestJobApi};
pub use engine::{ClientConfig, ClientHandle};
pub use export::{rows_to_csv, save_rows_csv, ExportError, EXPORT_HEADERS};
pub use filename::{download_filename, DownloadKind};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use poller::{poll_until_terminal, ChannelEventSink, EventSink, MIN_POLL_INTERVAL};
pub use types::{
    ApiError, ClientEvent, FailureKind, JobId, ResultRecord, StatusPayload, UploadAccepted,
};
