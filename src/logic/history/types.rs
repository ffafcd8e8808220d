use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::logic::classifier::{ClassificationResult, Prediction};

/// One completed scan, as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub url: String,
    /// Epoch milliseconds
    #[serde(rename = "t")]
    pub timestamp: i64,
    pub prediction: Prediction,
    pub confidence: Option<f64>,
}

impl HistoryRecord {
    pub fn new(url: impl Into<String>, prediction: Prediction, confidence: Option<f64>) -> Self {
        Self {
            url: url.into(),
            timestamp: Utc::now().timestamp_millis(),
            prediction,
            confidence,
        }
    }

    pub fn from_result(url: &str, result: &ClassificationResult) -> Self {
        Self::new(url, result.prediction, result.confidence)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("history index {index} out of range (history has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("failed to persist history: {0}")]
    Persist(String),
}

/// Reasons a persisted log could not be read. Never leaves the store.
#[derive(Debug, thiserror::Error)]
pub(crate) enum HistoryLoadError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt history: {0}")]
    Corrupt(#[from] serde_json::Error),
}
