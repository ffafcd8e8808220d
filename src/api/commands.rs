//! Commands - API for UI layers
//!
//! Each command returns the resulting scan state plus a description of the
//! side effect it performed, independent of any UI event model.

use std::sync::Arc;

use serde::Serialize;

use crate::logic::classifier::ClassificationService;
use crate::logic::explain::ExplanationRegistry;
use crate::logic::history::{HistoryError, HistoryRecord, HistoryStore};
use crate::logic::scan::{
    HistoryEffect, ScanError, ScanOrchestrator, ScanState, SubmitOptions, SubmitOutcome,
};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit { url: String },
    Replay { index: usize },
    Clear,
}

/// Side effect performed by a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// The service was asked and its reply applied
    Classified { history: HistoryEffect },
    /// The reply arrived after a newer submission and was dropped
    Discarded { token: u64, latest: u64 },
    HistoryCleared,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandOutcome {
    pub state: ScanState,
    pub effect: Effect,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

// ============================================================================
// SESSION
// ============================================================================

/// One user's scanning session: orchestrator plus its history log
pub struct ScanSession<S> {
    orchestrator: ScanOrchestrator<S>,
}

impl<S: ClassificationService> ScanSession<S> {
    pub fn new(service: S, history: Arc<HistoryStore>) -> Self {
        Self::with_registry(service, history, ExplanationRegistry::builtin())
    }

    pub fn with_registry(
        service: S,
        history: Arc<HistoryStore>,
        registry: Arc<ExplanationRegistry>,
    ) -> Self {
        Self {
            orchestrator: ScanOrchestrator::new(service, history, registry),
        }
    }

    pub fn orchestrator(&self) -> &ScanOrchestrator<S> {
        &self.orchestrator
    }

    pub fn state(&self) -> ScanState {
        self.orchestrator.snapshot()
    }

    /// Persisted history, newest first
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.orchestrator.history().load()
    }

    pub async fn execute(&self, command: Command) -> Result<CommandOutcome, CommandError> {
        match command {
            Command::Submit { url } => self.submit(&url).await,
            Command::Replay { index } => self.replay(index).await,
            Command::Clear => self.clear(),
        }
    }

    pub async fn submit(&self, url: &str) -> Result<CommandOutcome, CommandError> {
        let outcome = self
            .orchestrator
            .submit(url, SubmitOptions::default())
            .await;
        self.outcome(outcome)
    }

    pub async fn replay(&self, index: usize) -> Result<CommandOutcome, CommandError> {
        let outcome = self
            .orchestrator
            .history()
            .replay(index, &self.orchestrator)
            .await?;
        self.outcome(outcome)
    }

    pub fn clear(&self) -> Result<CommandOutcome, CommandError> {
        self.orchestrator.history().clear()?;
        Ok(CommandOutcome {
            state: self.orchestrator.snapshot(),
            effect: Effect::HistoryCleared,
        })
    }

    fn outcome(&self, outcome: SubmitOutcome) -> Result<CommandOutcome, CommandError> {
        match outcome {
            SubmitOutcome::Completed { state, history } => Ok(CommandOutcome {
                state,
                effect: Effect::Classified { history },
            }),
            SubmitOutcome::Superseded { token, latest } => Ok(CommandOutcome {
                state: self.orchestrator.snapshot(),
                effect: Effect::Discarded { token, latest },
            }),
            SubmitOutcome::Rejected(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::classifier::{ScanRequest, ServiceReply, TransportError};
    use std::future::Future;

    struct FixedService(&'static str);

    impl ClassificationService for FixedService {
        fn classify(
            &self,
            _request: &ScanRequest,
        ) -> impl Future<Output = Result<ServiceReply, TransportError>> + Send {
            let body = self.0;
            async move { Ok(ServiceReply::new(200, body)) }
        }
    }

    fn session() -> (tempfile::TempDir, ScanSession<FixedService>) {
        let dir = tempfile::tempdir().unwrap();
        let history = Arc::new(HistoryStore::open(dir.path().join("history.json")));
        let service = FixedService(r#"{"prediction":"Phishing","confidence":0.7}"#);
        (dir, ScanSession::new(service, history))
    }

    #[tokio::test]
    async fn test_submit_then_replay_then_clear() {
        let (_dir, session) = session();

        let submitted = session
            .execute(Command::Submit { url: "http://a.test".to_string() })
            .await
            .unwrap();
        assert_eq!(
            submitted.effect,
            Effect::Classified { history: HistoryEffect::Appended }
        );
        assert_eq!(session.history().len(), 1);

        let replayed = session.execute(Command::Replay { index: 0 }).await.unwrap();
        assert_eq!(
            replayed.effect,
            Effect::Classified { history: HistoryEffect::SkippedReplay }
        );
        assert_eq!(session.history().len(), 1);

        let cleared = session.execute(Command::Clear).await.unwrap();
        assert_eq!(cleared.effect, Effect::HistoryCleared);
        // clearing history keeps the last result on screen
        assert!(cleared.state.result().is_some());
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_errors_surface_as_command_errors() {
        let (_dir, session) = session();

        let err = session
            .execute(Command::Submit { url: "   ".to_string() })
            .await
            .unwrap_err();
        assert_eq!(err, CommandError::Scan(ScanError::Validation));

        let err = session.execute(Command::Replay { index: 0 }).await.unwrap_err();
        assert_eq!(
            err,
            CommandError::History(HistoryError::IndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_stale_reply_maps_to_discarded() {
        let (_dir, session) = session();
        let orch = session.orchestrator();
        let first = orch.begin("http://a.test", SubmitOptions::default()).unwrap();
        let _second = orch.begin("http://b.test", SubmitOptions::default()).unwrap();

        let stale = orch.complete(
            first,
            Ok(ServiceReply::new(200, r#"{"prediction":"Legitimate","confidence":0.9}"#)),
        );
        let outcome = session.outcome(stale).unwrap();

        assert_eq!(outcome.effect, Effect::Discarded { token: 1, latest: 2 });
        assert!(outcome.state.is_pending());
        assert_eq!(outcome.state.url(), Some("http://b.test"));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_outcome_serializes_for_ui() {
        let (_dir, session) = session();
        let outcome = session.clear().unwrap();

        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["state"]["phase"], "idle");
        assert_eq!(json["state"]["token"], 0);
        assert_eq!(json["effect"]["effect"], "history_cleared");
    }
}
