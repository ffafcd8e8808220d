use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::logic::classifier::{ClassificationResult, ScanRequest, TransportError};

// ============================================================================
// ERRORS
// ============================================================================

/// Everything that can end a scan in the `Error` phase
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("Please enter a URL to scan")]
    Validation,
    #[error("Could not reach the classification service: {0}")]
    Transport(String),
    #[error("{message}")]
    Service { status: u16, message: String },
    #[error("Unexpected response from the classification service: {0}")]
    Parse(String),
}

impl ScanError {
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::Validation => "validation",
            ScanError::Transport(_) => "transport",
            ScanError::Service { .. } => "service",
            ScanError::Parse(_) => "parse",
        }
    }
}

impl From<TransportError> for ScanError {
    fn from(err: TransportError) -> Self {
        ScanError::Transport(err.to_string())
    }
}

impl Serialize for ScanError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ScanError", 2)?;
        s.serialize_field("kind", self.kind())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

// ============================================================================
// STATE
// ============================================================================

/// Lifecycle phase of the current scan
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ScanPhase {
    Idle,
    Pending {
        url: String,
        is_replay: bool,
    },
    Success {
        url: String,
        is_replay: bool,
        result: ClassificationResult,
    },
    Error {
        url: String,
        error: ScanError,
    },
}

/// Orchestrator state; `token` is the most recently issued request token
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanState {
    pub token: u64,
    #[serde(flatten)]
    pub phase: ScanPhase,
}

impl Default for ScanState {
    fn default() -> Self {
        Self {
            token: 0,
            phase: ScanPhase::Idle,
        }
    }
}

impl ScanState {
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, ScanPhase::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, ScanPhase::Pending { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, ScanPhase::Success { .. } | ScanPhase::Error { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match &self.phase {
            ScanPhase::Idle => None,
            ScanPhase::Pending { url, .. }
            | ScanPhase::Success { url, .. }
            | ScanPhase::Error { url, .. } => Some(url),
        }
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        match &self.phase {
            ScanPhase::Success { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ScanError> {
        match &self.phase {
            ScanPhase::Error { error, .. } => Some(error),
            _ => None,
        }
    }
}

// ============================================================================
// COMMAND TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Re-run of a history entry; never recorded again
    pub is_replay: bool,
}

impl SubmitOptions {
    pub fn replay() -> Self {
        Self { is_replay: true }
    }
}

/// Proof that a request was issued; consumed when its reply is applied
#[derive(Debug)]
pub struct ScanTicket {
    pub(super) token: u64,
    pub(super) request: ScanRequest,
    pub(super) is_replay: bool,
}

impl ScanTicket {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn request(&self) -> &ScanRequest {
        &self.request
    }

    pub fn is_replay(&self) -> bool {
        self.is_replay
    }
}

/// What happened to the history log as a result of a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "history", content = "reason", rename_all = "snake_case")]
pub enum HistoryEffect {
    Appended,
    SkippedReplay,
    NotRecorded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The reply was applied to the current state
    Completed { state: ScanState, history: HistoryEffect },
    /// The reply belonged to an older request and was dropped
    Superseded { token: u64, latest: u64 },
    /// Rejected before any request was issued
    Rejected(ScanError),
}

impl SubmitOutcome {
    pub fn state(&self) -> Option<&ScanState> {
        match self {
            SubmitOutcome::Completed { state, .. } => Some(state),
            _ => None,
        }
    }
}
