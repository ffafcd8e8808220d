//! Scan Orchestrator - request lifecycle state machine
//!
//! `Idle -> Pending -> {Success, Error}`, re-entering `Pending` on every new
//! submission. Every issued request carries a token; a reply whose token is
//! not the latest one is dropped without touching state.

use std::sync::Arc;

use parking_lot::Mutex;

use super::state::{
    HistoryEffect, ScanError, ScanPhase, ScanState, ScanTicket, SubmitOptions, SubmitOutcome,
};
use crate::logic::classifier::{
    parse_reply, ClassificationService, ScanRequest, ServiceReply, TransportError,
};
use crate::logic::explain::ExplanationRegistry;
use crate::logic::history::{HistoryRecord, HistoryStore};

pub struct ScanOrchestrator<S> {
    service: S,
    history: Arc<HistoryStore>,
    registry: Arc<ExplanationRegistry>,
    // never held across an await
    state: Mutex<ScanState>,
}

impl<S: ClassificationService> ScanOrchestrator<S> {
    pub fn new(service: S, history: Arc<HistoryStore>, registry: Arc<ExplanationRegistry>) -> Self {
        Self {
            service,
            history,
            registry,
            state: Mutex::new(ScanState::default()),
        }
    }

    pub fn snapshot(&self) -> ScanState {
        self.state.lock().clone()
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Validate `url` and run the full request cycle
    pub async fn submit(&self, url: &str, options: SubmitOptions) -> SubmitOutcome {
        let ticket = match self.begin(url, options) {
            Ok(ticket) => ticket,
            Err(e) => return SubmitOutcome::Rejected(e),
        };

        let reply = self.service.classify(ticket.request()).await;
        self.complete(ticket, reply)
    }

    /// Issue a new request token and enter `Pending`.
    ///
    /// An empty URL issues no token; a finished scan returns to `Idle`, an
    /// in-flight one is left alone.
    pub fn begin(&self, url: &str, options: SubmitOptions) -> Result<ScanTicket, ScanError> {
        let request = match ScanRequest::new(url) {
            Ok(request) => request,
            Err(e) => {
                let mut state = self.state.lock();
                if !state.is_pending() {
                    state.phase = ScanPhase::Idle;
                }
                log::debug!("Rejected scan submission: {}", e);
                return Err(e);
            }
        };

        let mut state = self.state.lock();
        state.token += 1;
        state.phase = ScanPhase::Pending {
            url: request.url().to_string(),
            is_replay: options.is_replay,
        };

        log::debug!(
            "Scan #{} pending for {} (replay: {})",
            state.token,
            request.url(),
            options.is_replay
        );

        Ok(ScanTicket {
            token: state.token,
            request,
            is_replay: options.is_replay,
        })
    }

    /// Apply the service reply for `ticket`, unless a newer request was issued since
    pub fn complete(
        &self,
        ticket: ScanTicket,
        reply: Result<ServiceReply, TransportError>,
    ) -> SubmitOutcome {
        let (snapshot, history) = {
            let mut state = self.state.lock();
            if ticket.token != state.token {
                log::warn!(
                    "Discarding stale reply for scan #{} ({}); latest is #{}",
                    ticket.token,
                    ticket.request.url(),
                    state.token
                );
                return SubmitOutcome::Superseded {
                    token: ticket.token,
                    latest: state.token,
                };
            }

            let url = ticket.request.url().to_string();
            let parsed = reply
                .map_err(ScanError::from)
                .and_then(|r| parse_reply(&r, &self.registry));

            state.phase = match parsed {
                Ok(result) => {
                    log::info!(
                        "Scan #{} {} -> {} ({})",
                        ticket.token,
                        url,
                        result.prediction,
                        result
                            .confidence_percent()
                            .map(|p| format!("{}%", p))
                            .unwrap_or_else(|| "confidence unknown".to_string())
                    );
                    ScanPhase::Success {
                        url,
                        is_replay: ticket.is_replay,
                        result,
                    }
                }
                Err(error) => {
                    log::info!("Scan #{} {} failed: {}", ticket.token, url, error);
                    ScanPhase::Error { url, error }
                }
            };
            // appended before the lock is released, so history follows token order
            let history = self.record_history(&state, ticket.is_replay);
            (state.clone(), history)
        };

        SubmitOutcome::Completed {
            state: snapshot,
            history,
        }
    }

    /// Dismiss a finished scan. No effect while a scan is pending.
    pub fn reset(&self) -> ScanState {
        let mut state = self.state.lock();
        if state.is_terminal() {
            state.phase = ScanPhase::Idle;
        }
        state.clone()
    }

    fn record_history(&self, state: &ScanState, is_replay: bool) -> HistoryEffect {
        let (url, result) = match &state.phase {
            ScanPhase::Success { url, result, .. } => (url, result),
            _ => return HistoryEffect::NotRecorded,
        };

        if is_replay {
            return HistoryEffect::SkippedReplay;
        }

        match self.history.append(HistoryRecord::from_result(url, result)) {
            Ok(()) => HistoryEffect::Appended,
            Err(e) => {
                log::warn!("Scan of {} not recorded: {}", url, e);
                HistoryEffect::Failed(e.to_string())
            }
        }
    }
}
