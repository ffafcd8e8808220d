//! Scan Module - drives one URL through classification and into history

pub mod orchestrator;
pub mod state;


pub use orchestrator::ScanOrchestrator;
pub use state::{
    HistoryEffect, ScanError, ScanPhase, ScanState, ScanTicket, SubmitOptions, SubmitOutcome,
};
