use std::sync::mpsc;
use std::time::Duration;

use client_logging::{client_debug, client_warn};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{ClientEvent, JobApi};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<ClientEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}

/// Shortest delay between polls; `tokio::time::interval` rejects zero.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Polls `GET /status/{job_id}` immediately and then once per `interval`.
///
/// Every answer, successful or not, is emitted as `ClientEvent::Status`.
/// Failed polls do not stop the loop; a terminal status or cancellation does.
pub async fn poll_until_terminal(
    api: &dyn JobApi,
    job_id: &str,
    interval: Duration,
    cancel: &CancellationToken,
    sink: &dyn EventSink,
) {
    let mut ticker = tokio::time::interval(interval.max(MIN_POLL_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = api.status(job_id) => result,
        };

        let terminal = match &result {
            Ok(payload) => payload.is_terminal(),
            Err(err) => {
                client_warn!("Status poll for job {} failed: {} ({})", job_id, err, err.kind);
                false
            }
        };
        sink.emit(ClientEvent::Status {
            job_id: job_id.to_string(),
            result,
        });
        if terminal {
            client_debug!("Job {} reached a terminal status; polling stops", job_id);
            return;
        }
    }

    client_debug!("Polling for job {} cancelled", job_id);
}
