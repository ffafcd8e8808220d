use serde::{Deserialize, Serialize};

/// Feature contribution exactly as reported by the classification service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawContribution {
    #[serde(rename = "feature")]
    pub feature_id: String,
    pub contribution: f64,
}

impl RawContribution {
    pub fn new(feature_id: impl Into<String>, contribution: f64) -> Self {
        Self {
            feature_id: feature_id.into(),
            contribution,
        }
    }
}

/// Ranked, explained contribution ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature_id: String,
    pub contribution: f64, // signed: positive pushes toward Phishing
    pub explanation: String,
    pub display_value: String,
}

/// Normalized contributions of one scan.
///
/// `Unavailable` is the explicit marker for a service that returned no
/// contributions; it is distinct from a scan that has not completed yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "items", rename_all = "snake_case")]
pub enum Contributions {
    Ranked(Vec<FeatureContribution>),
    Unavailable,
}

impl Contributions {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Contributions::Unavailable)
    }

    pub fn len(&self) -> usize {
        match self {
            Contributions::Ranked(items) => items.len(),
            Contributions::Unavailable => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[FeatureContribution] {
        match self {
            Contributions::Ranked(items) => items,
            Contributions::Unavailable => &[],
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeatureContribution> {
        self.as_slice().iter()
    }
}
