use serde::{Deserialize, Serialize};

use crate::logic::explain::Contributions;
use crate::logic::scan::ScanError;

// ============================================================================
// REQUEST
// ============================================================================

/// Validated scan request; serializes to the service request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRequest {
    url: String,
}

impl ScanRequest {
    /// Trim `url` and reject it if nothing is left
    pub fn new(url: &str) -> Result<Self, ScanError> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(ScanError::Validation);
        }
        Ok(Self {
            url: trimmed.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

// ============================================================================
// RESULT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prediction {
    Phishing,
    Legitimate,
}

impl Prediction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prediction::Phishing => "Phishing",
            Prediction::Legitimate => "Legitimate",
        }
    }

    pub fn is_phishing(&self) -> bool {
        matches!(self, Prediction::Phishing)
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed outcome of one successful classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub prediction: Prediction,
    /// `None` when the service did not report a confidence
    pub confidence: Option<f64>,
    pub contributions: Contributions,
}

impl ClassificationResult {
    /// Confidence as a whole percentage (0.93 -> 93)
    pub fn confidence_percent(&self) -> Option<u8> {
        self.confidence.map(|c| (c * 100.0).round().clamp(0.0, 100.0) as u8)
    }
}

// ============================================================================
// TRANSPORT
// ============================================================================

/// Raw HTTP answer from the classification service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReply {
    pub status: u16,
    pub body: String,
}

impl ServiceReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to obtain any reply from the service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}
