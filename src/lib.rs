//! phishlens-core - scan-result processing pipeline for phishing URL checks.
//!
//! Sends a URL to a remote classification service, ranks and explains the
//! per-feature contributions it returns, and keeps a bounded local history
//! of past scans that can be replayed.

pub mod api;
pub mod constants;
pub mod logic;

pub use api::{Command, CommandError, CommandOutcome, Effect, ScanSession};
pub use logic::classifier::{ClassificationResult, ClassificationService, HttpClassifier, Prediction};
pub use logic::config::ScanConfig;
pub use logic::history::{HistoryRecord, HistoryStore};
pub use logic::scan::{ScanError, ScanOrchestrator, ScanPhase, ScanState};
