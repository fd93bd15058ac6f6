use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use skiptrace_client::{ClientConfig, ClientSettings};

use crate::cli::Cli;

const DEFAULT_CONFIG_FILE: &str = "skiptrace.ron";
const DEFAULT_LOG_FILE: &str = "skiptrace.log";

/// Optional settings file; every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub poll_interval_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server_url: String,
    pub output_dir: PathBuf,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub log_file: PathBuf,
    pub verbose: bool,
}

impl AppConfig {
    pub fn client_config(&self) -> ClientConfig {
        let settings = ClientSettings {
            base_url: self.server_url.clone(),
            request_timeout: self.request_timeout,
            poll_interval: self.poll_interval,
            ..ClientSettings::default()
        };
        ClientConfig::new(settings, self.output_dir.clone(), || {
            Utc::now().format("%Y-%m-%d").to_string()
        })
    }
}

/// Reads the settings file. An explicit path must exist; the default
/// `skiptrace.ron` is used only when present.
pub fn load_file_config(explicit: Option<&Path>) -> anyhow::Result<FileConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                return Ok(FileConfig::default());
            }
            default
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_file_config(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

fn parse_file_config(content: &str) -> anyhow::Result<FileConfig> {
    Ok(ron::from_str(content)?)
}

/// Command line flags win over the file, the file wins over defaults.
/// Zero poll intervals and request timeouts are rejected.
pub fn resolve(cli: &Cli, file: FileConfig) -> anyhow::Result<AppConfig> {
    let defaults = ClientSettings::default();

    let server_url = cli
        .server
        .clone()
        .or(file.server_url)
        .unwrap_or(defaults.base_url);
    let output_dir = cli
        .output_dir
        .clone()
        .or(file.output_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let poll_interval = cli
        .poll_interval_ms
        .or(file.poll_interval_ms)
        .map(Duration::from_millis)
        .unwrap_or(defaults.poll_interval);
    let request_timeout = cli
        .request_timeout_secs
        .or(file.request_timeout_secs)
        .map(Duration::from_secs)
        .unwrap_or(defaults.request_timeout);
    if poll_interval.is_zero() {
        bail!("poll_interval_ms must be at least 1");
    }
    if request_timeout.is_zero() {
        bail!("request_timeout_secs must be at least 1");
    }

    Ok(AppConfig {
        server_url,
        output_dir,
        poll_interval,
        request_timeout,
        log_file: cli
            .log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        verbose: cli.verbose,
    })
}
