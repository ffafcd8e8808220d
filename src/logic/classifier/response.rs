//! Boundary validation of classification service replies.

use serde::Deserialize;

use super::types::{ClassificationResult, Prediction, ServiceReply};
use crate::logic::explain::{normalize, ExplanationRegistry, RawContribution};
use crate::logic::scan::ScanError;

/// Wire shape of a 2xx body. Unknown fields (e.g. the echoed `url`) are ignored.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    prediction: Prediction,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    top_contributions: Option<Vec<RawContribution>>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Convert a service reply into a typed result or a scan error
pub fn parse_reply(
    reply: &ServiceReply,
    registry: &ExplanationRegistry,
) -> Result<ClassificationResult, ScanError> {
    if !reply.is_success() {
        return Err(ScanError::Service {
            status: reply.status,
            message: error_message(reply),
        });
    }

    let parsed: PredictResponse = serde_json::from_str(&reply.body)
        .map_err(|e| ScanError::Parse(e.to_string()))?;

    if let Some(c) = parsed.confidence {
        if !(0.0..=1.0).contains(&c) {
            return Err(ScanError::Parse(format!("confidence {} outside [0, 1]", c)));
        }
    }

    Ok(ClassificationResult {
        prediction: parsed.prediction,
        confidence: parsed.confidence,
        contributions: normalize(parsed.top_contributions.as_deref(), registry),
    })
}

/// Message for a non-2xx reply: JSON `error` field, else plain text, else a status description
fn error_message(reply: &ServiceReply) -> String {
    let body = reply.body.trim();

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if !parsed.error.trim().is_empty() {
            return parsed.error.trim().to_string();
        }
    }

    let looks_like_json = body.starts_with('{') || body.starts_with('[');
    if !body.is_empty() && !looks_like_json {
        return body.to_string();
    }

    status_description(reply.status)
}

fn status_description(status: u16) -> String {
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason());

    match reason {
        Some(reason) => format!("Classification service returned HTTP {} ({})", status, reason),
        None => format!("Classification service returned HTTP {}", status),
    }
}
