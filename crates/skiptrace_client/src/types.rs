use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub type JobId = String;

/// Body of a successful `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadAccepted {
    pub job_id: JobId,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `GET /status/{job_id}`.
///
/// The server omits `progress` and `total` when it reports an error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusPayload {
    pub status: String,
    #[serde(default)]
    pub progress: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusPayload {
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "completed" | "error")
    }
}

/// One element of `GET /results/{job_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ResultRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub business_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub business_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub contact_numbers: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub search_resources: Option<String>,
}

// Records come from a dataframe dump, so cells may be numbers or booleans.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Uploaded {
        result: Result<JobId, ApiError>,
    },
    Status {
        job_id: JobId,
        result: Result<StatusPayload, ApiError>,
    },
    Results {
        job_id: JobId,
        result: Result<Vec<ResultRecord>, ApiError>,
    },
    Downloaded {
        job_id: JobId,
        result: Result<PathBuf, ApiError>,
    },
    Exported {
        result: Result<PathBuf, ApiError>,
    },
}

/// Failure of a client operation; `message` is suitable for the error dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    NonJsonResponse,
    InvalidBody,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::NonJsonResponse => write!(f, "non-json response"),
            FailureKind::InvalidBody => write!(f, "invalid response body"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
