use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use client_logging::{client_debug, client_info, client_warn};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::api::{ClientSettings, JobApi, ReqwestJobApi};
use crate::export::save_rows_csv;
use crate::filename::{download_filename, DownloadKind};
use crate::persist::AtomicFileWriter;
use crate::poller::{poll_until_terminal, EventSink};
use crate::{ApiError, ClientEvent, FailureKind, JobId, ResultRecord};

type DateSource = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Clone)]
pub struct ClientConfig {
    pub settings: ClientSettings,
    /// Directory receiving downloaded and exported CSV files.
    pub output_dir: PathBuf,
    /// Current date as `YYYY-MM-DD`, used in output filenames.
    pub today: DateSource,
}

impl ClientConfig {
    pub fn new(
        settings: ClientSettings,
        output_dir: PathBuf,
        today: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            settings,
            output_dir,
            today: Arc::new(today),
        }
    }
}

enum ClientCommand {
    Upload { path: PathBuf },
    StartPolling { job_id: JobId },
    StopPolling { job_id: JobId },
    FetchResults { job_id: JobId },
    Download { job_id: JobId },
    Export { rows: Vec<ResultRecord> },
    AbandonJob { job_id: JobId },
}

/// Front door to the background IO thread.
///
/// Commands return immediately; outcomes arrive on the `EventSink`.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
}

impl ClientHandle {
    pub fn new(config: ClientConfig, sink: Arc<dyn EventSink>) -> Result<Self, ApiError> {
        let api = Arc::new(ReqwestJobApi::new(&config.settings)?);
        Self::with_api(config, api, sink)
    }

    pub fn with_api(
        config: ClientConfig,
        api: Arc<dyn JobApi>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, ApiError> {
        let runtime = Runtime::new()
            .map_err(|err| ApiError::new(FailureKind::Io, format!("tokio runtime: {err}")))?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::Builder::new()
            .name("skiptrace-client".to_string())
            .spawn(move || {
                let mut worker = Worker {
                    runtime,
                    api,
                    sink,
                    config,
                    jobs: HashMap::new(),
                };
                while let Ok(command) = cmd_rx.recv() {
                    worker.handle(command);
                }
                client_debug!("Client command channel closed");
            })
            .map_err(|err| ApiError::new(FailureKind::Io, format!("client thread: {err}")))?;

        Ok(Self { cmd_tx })
    }

    pub fn upload(&self, path: PathBuf) {
        self.send(ClientCommand::Upload { path });
    }

    pub fn start_polling(&self, job_id: JobId) {
        self.send(ClientCommand::StartPolling { job_id });
    }

    pub fn stop_polling(&self, job_id: JobId) {
        self.send(ClientCommand::StopPolling { job_id });
    }

    pub fn fetch_results(&self, job_id: JobId) {
        self.send(ClientCommand::FetchResults { job_id });
    }

    pub fn download(&self, job_id: JobId) {
        self.send(ClientCommand::Download { job_id });
    }

    pub fn export(&self, rows: Vec<ResultRecord>) {
        self.send(ClientCommand::Export { rows });
    }

    pub fn abandon_job(&self, job_id: JobId) {
        self.send(ClientCommand::AbandonJob { job_id });
    }

    fn send(&self, command: ClientCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

/// Cancellation scope of one job: the poller is a child of the job token.
struct JobTokens {
    job: CancellationToken,
    poll: Option<CancellationToken>,
}

struct Worker {
    runtime: Runtime,
    api: Arc<dyn JobApi>,
    sink: Arc<dyn EventSink>,
    config: ClientConfig,
    jobs: HashMap<JobId, JobTokens>,
}

impl Worker {
    fn handle(&mut self, command: ClientCommand) {
        match command {
            ClientCommand::Upload { path } => {
                let api = self.api.clone();
                let sink = self.sink.clone();
                self.runtime.spawn(async move {
                    client_info!("Uploading {}", path.display());
                    let result = api.upload(&path).await;
                    match &result {
                        Ok(job_id) => client_info!("Upload accepted, job_id={}", job_id),
                        Err(err) => client_warn!("Upload failed: {} ({})", err, err.kind),
                    }
                    sink.emit(ClientEvent::Uploaded { result });
                });
            }
            ClientCommand::StartPolling { job_id } => {
                let interval = self.config.settings.poll_interval;
                let tokens = self.job_tokens(&job_id);
                if let Some(previous) = tokens.poll.take() {
                    previous.cancel();
                }
                let poll_token = tokens.job.child_token();
                tokens.poll = Some(poll_token.clone());

                let api = self.api.clone();
                let sink = self.sink.clone();
                self.runtime.spawn(async move {
                    poll_until_terminal(api.as_ref(), &job_id, interval, &poll_token, sink.as_ref())
                        .await;
                });
            }
            ClientCommand::StopPolling { job_id } => {
                if let Some(poll) = self.jobs.get_mut(&job_id).and_then(|t| t.poll.take()) {
                    poll.cancel();
                }
            }
            ClientCommand::FetchResults { job_id } => {
                let token = self.job_tokens(&job_id).job.child_token();
                let api = self.api.clone();
                let sink = self.sink.clone();
                self.runtime.spawn(async move {
                    let result = tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            client_debug!("Results fetch for job {} cancelled", job_id);
                            return;
                        }
                        result = api.results(&job_id) => result,
                    };
                    if let Ok(rows) = &result {
                        client_info!("Loaded {} result rows for job {}", rows.len(), job_id);
                    }
                    sink.emit(ClientEvent::Results { job_id, result });
                });
            }
            ClientCommand::Download { job_id } => {
                let token = self.job_tokens(&job_id).job.child_token();
                let api = self.api.clone();
                let sink = self.sink.clone();
                let writer = AtomicFileWriter::new(self.config.output_dir.clone());
                let filename =
                    download_filename(DownloadKind::ServerResults, &(self.config.today)());
                self.runtime.spawn(async move {
                    let bytes = tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            client_debug!("Download for job {} cancelled", job_id);
                            return;
                        }
                        result = api.download(&job_id) => result,
                    };
                    let result = match bytes {
                        Ok(bytes) => tokio::task::spawn_blocking(move || {
                            writer
                                .write(&filename, &bytes)
                                .map_err(|err| ApiError::new(FailureKind::Io, err.to_string()))
                        })
                        .await
                        .unwrap_or_else(|err| Err(ApiError::new(FailureKind::Io, err.to_string()))),
                        Err(err) => Err(err),
                    };
                    if let Ok(path) = &result {
                        client_info!("Saved server results for job {} to {:?}", job_id, path);
                    }
                    sink.emit(ClientEvent::Downloaded { job_id, result });
                });
            }
            ClientCommand::Export { rows } => {
                let sink = self.sink.clone();
                let output_dir = self.config.output_dir.clone();
                let filename =
                    download_filename(DownloadKind::FilteredExport, &(self.config.today)());
                self.runtime.spawn(async move {
                    let row_count = rows.len();
                    let result = tokio::task::spawn_blocking(move || {
                        save_rows_csv(&output_dir, &filename, &rows)
                            .map_err(|err| ApiError::new(FailureKind::Io, err.to_string()))
                    })
                    .await
                    .unwrap_or_else(|err| Err(ApiError::new(FailureKind::Io, err.to_string())));
                    if let Ok(path) = &result {
                        client_info!("Exported {} rows to {:?}", row_count, path);
                    }
                    sink.emit(ClientEvent::Exported { result });
                });
            }
            ClientCommand::AbandonJob { job_id } => {
                if let Some(tokens) = self.jobs.remove(&job_id) {
                    client_info!("Abandoning job {}", job_id);
                    tokens.job.cancel();
                }
            }
        }
    }

    fn job_tokens(&mut self, job_id: &str) -> &mut JobTokens {
        self.jobs
            .entry(job_id.to_string())
            .or_insert_with(|| JobTokens {
                job: CancellationToken::new(),
                poll: None,
            })
    }
}
