//! Runtime configuration for the scan pipeline.

use std::path::PathBuf;
use std::time::Duration;

use crate::constants;

/// Scan pipeline configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Classification service base URL (no trailing slash)
    pub service_url: String,

    /// Optional API key sent to the service
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Directory holding the persisted history log
    pub data_dir: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            service_url: constants::DEFAULT_SERVICE_URL.to_string(),
            api_key: None,
            timeout_secs: constants::DEFAULT_TIMEOUT_SECS,
            data_dir: PathBuf::from(".").join(constants::DATA_DIR_NAME),
        }
    }
}

impl ScanConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            service_url: constants::get_service_url(),
            api_key: constants::get_api_key(),
            timeout_secs: constants::get_timeout_secs(),
            data_dir: constants::get_data_dir(),
        }
    }

    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Full URL of the prediction endpoint
    pub fn predict_url(&self) -> String {
        format!("{}{}", self.service_url, constants::PREDICT_PATH)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Path of the persisted history file
    pub fn history_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}.json", constants::HISTORY_STORAGE_KEY))
    }
}
