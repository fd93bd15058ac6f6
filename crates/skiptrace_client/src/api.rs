use std::path::Path;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{ApiError, FailureKind, JobId, ResultRecord, StatusPayload, UploadAccepted};

const UPLOAD_FIELD: &str = "file";
const UPLOAD_MIME: &str = "text/csv";
const NON_JSON_EXCERPT_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub max_download_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(2),
            max_download_bytes: 64 * 1024 * 1024,
        }
    }
}

/// The four endpoints of the skip-trace job service.
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    async fn upload(&self, path: &Path) -> Result<JobId, ApiError>;
    async fn status(&self, job_id: &str) -> Result<StatusPayload, ApiError>;
    async fn results(&self, job_id: &str) -> Result<Vec<ResultRecord>, ApiError>;
    async fn download(&self, job_id: &str) -> Result<Bytes, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobApi {
    client: reqwest::Client,
    base_url: Url,
    max_download_bytes: u64,
}

impl ReqwestJobApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            base_url,
            max_download_bytes: settings.max_download_bytes,
        })
    }

    /// Appends percent-encoded path segments to the base url.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::new(FailureKind::InvalidUrl, "base url cannot take path segments")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = read_json_body(response).await?;
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                detail_message(&body).unwrap_or_else(|| status.to_string()),
            ));
        }
        serde_json::from_value(body)
            .map_err(|err| ApiError::new(FailureKind::InvalidBody, err.to_string()))
    }
}

#[async_trait::async_trait]
impl JobApi for ReqwestJobApi {
    async fn upload(&self, path: &Path) -> Result<JobId, ApiError> {
        let content = tokio::fs::read(path).await.map_err(|err| {
            ApiError::new(
                FailureKind::Io,
                format!("could not read {}: {}", path.display(), err),
            )
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.csv")
            .to_string();

        let part = Part::bytes(content)
            .file_name(file_name)
            .mime_str(UPLOAD_MIME)
            .map_err(map_reqwest_error)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(self.endpoint(&["upload"])?)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = read_json_body(response).await?;
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                detail_message(&body).unwrap_or_else(|| "Upload failed".to_string()),
            ));
        }

        let accepted: UploadAccepted = serde_json::from_value(body)
            .map_err(|err| ApiError::new(FailureKind::InvalidBody, err.to_string()))?;
        Ok(accepted.job_id)
    }

    async fn status(&self, job_id: &str) -> Result<StatusPayload, ApiError> {
        self.get_json(self.endpoint(&["status", job_id])?).await
    }

    async fn results(&self, job_id: &str) -> Result<Vec<ResultRecord>, ApiError> {
        self.get_json(self.endpoint(&["results", job_id])?).await
    }

    async fn download(&self, job_id: &str) -> Result<Bytes, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&["download", job_id])?)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.max_download_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut buffer = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = buffer.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            buffer.extend_from_slice(&chunk);
        }
        Ok(buffer.freeze())
    }
}

/// Reads a body that must be JSON; anything else is a protocol violation.
async fn read_json_body(response: Response) -> Result<Value, ApiError> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    if !is_json {
        let text = response.text().await.map_err(map_reqwest_error)?;
        let excerpt: String = text.chars().take(NON_JSON_EXCERPT_CHARS).collect();
        return Err(ApiError::new(
            FailureKind::NonJsonResponse,
            format!("Server returned non-JSON response: {excerpt}"),
        ));
    }

    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes)
        .map_err(|err| ApiError::new(FailureKind::InvalidBody, err.to_string()))
}

/// FastAPI puts the reason in `detail`, either as text or a validation list.
fn detail_message(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn too_large(max_bytes: u64, actual: u64) -> ApiError {
    ApiError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        format!("download exceeds {max_bytes} bytes"),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
