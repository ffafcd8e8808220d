//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change the default classification service, only edit this file.

use std::path::PathBuf;

/// Default classification service base URL
///
/// This is the fallback URL when no environment variable is set.
/// For development the service listens on port 5000.
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";

/// Path of the prediction endpoint, relative to the service base URL
pub const PREDICT_PATH: &str = "/predict";

/// Header carrying the optional service API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Default request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of scans kept in the history log
pub const HISTORY_CAPACITY: usize = 30;

/// Maximum number of ranked feature contributions per result
pub const MAX_CONTRIBUTIONS: usize = 8;

/// Fixed namespace key the history log is stored under
pub const HISTORY_STORAGE_KEY: &str = "phishlens.scan_history.v1";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "PhishLens";

/// Directory name under the platform data dir
pub const DATA_DIR_NAME: &str = "phishlens";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get classification service URL from environment or use default
pub fn get_service_url() -> String {
    std::env::var("PHISHLENS_SERVICE_URL")
        .ok()
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string())
}

/// Get service API key from environment, if any
pub fn get_api_key() -> Option<String> {
    std::env::var("PHISHLENS_API_KEY")
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Get request timeout from environment or use default
pub fn get_timeout_secs() -> u64 {
    std::env::var("PHISHLENS_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

/// Get history data directory from environment or use the platform default
pub fn get_data_dir() -> PathBuf {
    std::env::var("PHISHLENS_DATA_DIR")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DATA_DIR_NAME)
        })
}
