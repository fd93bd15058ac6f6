use std::fs;
use std::path::Path;
use std::sync::{mpsc, Arc};

use client_logging::{client_debug, client_info, client_warn};
use skiptrace_client::{
    ApiError, ClientConfig, ClientEvent, ClientHandle, EventSink, ResultRecord, StatusPayload,
};
use skiptrace_core::{Effect, FileCandidate, JobPhase, JobStatus, Msg, ResultRow, CSV_MIME};

/// Turns effects into client commands and local file inspections.
pub struct EffectRunner {
    client: ClientHandle,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(config: ClientConfig, msg_tx: mpsc::Sender<Msg>) -> Result<Self, ApiError> {
        client_info!(
            "Client targets {} (output dir {:?})",
            config.settings.base_url,
            config.output_dir
        );
        let sink = Arc::new(MsgSink {
            msg_tx: msg_tx.clone(),
        });
        let client = ClientHandle::new(config, sink)?;
        Ok(Self { client, msg_tx })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::InspectFile { path } => {
                    let _ = self.msg_tx.send(inspect_file(&path));
                }
                Effect::Upload { path } => {
                    client_info!("Upload path={:?}", path);
                    self.client.upload(path);
                }
                Effect::StartPolling { job_id } => self.client.start_polling(job_id),
                Effect::StopPolling { job_id } => self.client.stop_polling(job_id),
                Effect::FetchResults { job_id } => self.client.fetch_results(job_id),
                Effect::DownloadResults { job_id } => self.client.download(job_id),
                Effect::ExportRows { rows } => {
                    client_info!("Export rows={}", rows.len());
                    self.client
                        .export(rows.into_iter().map(to_record).collect());
                }
                Effect::AbandonJob { job_id } => {
                    client_debug!("Abandon job_id={}", job_id);
                    self.client.abandon_job(job_id);
                }
            }
        }
    }
}

struct MsgSink {
    msg_tx: mpsc::Sender<Msg>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.msg_tx.send(map_event(event));
    }
}

pub(crate) fn inspect_file(path: &Path) -> Msg {
    let failed = |message: String| Msg::FileInspectFailed {
        path: path.to_path_buf(),
        message,
    };

    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) => return failed(format!("Cannot read {}: {}", path.display(), err)),
    };
    if !metadata.is_file() {
        return failed(format!("{} is not a file", path.display()));
    }

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime = path
        .extension()
        .filter(|ext| ext.eq_ignore_ascii_case("csv"))
        .map(|_| CSV_MIME.to_string());

    Msg::FileChosen(FileCandidate {
        path: path.to_path_buf(),
        name,
        size_bytes: metadata.len(),
        mime,
    })
}

pub(crate) fn map_event(event: ClientEvent) -> Msg {
    match event {
        ClientEvent::Uploaded { result } => match result {
            Ok(job_id) => Msg::UploadSucceeded { job_id },
            Err(err) => {
                client_warn!("Upload failed: {} ({})", err, err.kind);
                Msg::UploadFailed(err.message)
            }
        },
        ClientEvent::Status { job_id, result } => match result {
            Ok(payload) => Msg::StatusReceived {
                job_id,
                status: to_status(payload),
            },
            Err(err) => Msg::StatusPollFailed {
                job_id,
                message: err.message,
            },
        },
        ClientEvent::Results { job_id, result } => match result {
            Ok(records) => Msg::ResultsLoaded {
                job_id,
                rows: records.into_iter().map(to_row).collect(),
            },
            Err(err) => Msg::ResultsFailed {
                job_id,
                message: err.message,
            },
        },
        ClientEvent::Downloaded { job_id, result } => match result {
            Ok(path) => Msg::DownloadSaved { job_id, path },
            Err(err) => Msg::DownloadFailed {
                job_id,
                message: err.message,
            },
        },
        ClientEvent::Exported { result } => match result {
            Ok(path) => Msg::ExportSaved { path },
            Err(err) => Msg::ExportFailed(err.message),
        },
    }
}

fn to_status(payload: StatusPayload) -> JobStatus {
    JobStatus {
        phase: JobPhase::parse(&payload.status),
        progress: payload.progress.unwrap_or(0),
        total: payload.total.unwrap_or(0),
        error: payload.error,
    }
}

fn to_row(record: ResultRecord) -> ResultRow {
    ResultRow {
        business_name: record.business_name,
        business_address: record.business_address,
        contact_numbers: record.contact_numbers,
        search_resources: record.search_resources,
    }
}

fn to_record(row: ResultRow) -> ResultRecord {
    ResultRecord {
        business_name: row.business_name,
        business_address: row.business_address,
        contact_numbers: row.contact_numbers,
        search_resources: row.search_resources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn inspect_reports_size_and_csv_mime() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("Leads.CSV");
        fs::write(&path, "name\nAcme\n").unwrap();

        assert_eq!(
            inspect_file(&path),
            Msg::FileChosen(FileCandidate {
                path: path.clone(),
                name: "Leads.CSV".to_string(),
                size_bytes: 10,
                mime: Some(CSV_MIME.to_string()),
            })
        );
    }

    #[test]
    fn inspect_leaves_other_extensions_untyped() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "x").unwrap();

        match inspect_file(&path) {
            Msg::FileChosen(candidate) => assert_eq!(candidate.mime, None),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn inspect_rejects_missing_files_and_directories() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            inspect_file(&temp.path().join("gone.csv")),
            Msg::FileInspectFailed { .. }
        ));
        assert!(matches!(
            inspect_file(temp.path()),
            Msg::FileInspectFailed { .. }
        ));
    }

    #[test]
    fn status_payload_defaults_missing_counts() {
        let msg = map_event(ClientEvent::Status {
            job_id: "job-1".to_string(),
            result: Ok(StatusPayload {
                status: "processing".to_string(),
                progress: None,
                total: Some(40),
                error: None,
            }),
        });
        assert_eq!(
            msg,
            Msg::StatusReceived {
                job_id: "job-1".to_string(),
                status: JobStatus {
                    phase: JobPhase::Processing,
                    progress: 0,
                    total: 40,
                    error: None,
                },
            }
        );
    }

    #[test]
    fn transfer_events_map_to_outcome_messages() {
        assert_eq!(
            map_event(ClientEvent::Downloaded {
                job_id: "job-1".to_string(),
                result: Ok(PathBuf::from("out/skip_trace_results_2026-10-14.csv")),
            }),
            Msg::DownloadSaved {
                job_id: "job-1".to_string(),
                path: PathBuf::from("out/skip_trace_results_2026-10-14.csv"),
            }
        );
        assert_eq!(
            map_event(ClientEvent::Results {
                job_id: "job-1".to_string(),
                result: Ok(vec![ResultRecord {
                    business_name: Some("Acme".to_string()),
                    ..ResultRecord::default()
                }]),
            }),
            Msg::ResultsLoaded {
                job_id: "job-1".to_string(),
                rows: vec![ResultRow {
                    business_name: Some("Acme".to_string()),
                    business_address: None,
                    contact_numbers: None,
                    search_resources: None,
                }],
            }
        );
    }
}
