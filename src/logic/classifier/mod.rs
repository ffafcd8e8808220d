//! Classifier Module - contract with the remote URL classification service
//!
//! - `types`: request, reply and typed result
//! - `response`: schema validation of service replies
//! - `client`: the service trait and its reqwest implementation

pub mod client;
pub mod response;
pub mod types;

pub use client::{ClassificationService, HttpClassifier};
pub use response::parse_reply;
pub use types::{ClassificationResult, Prediction, ScanRequest, ServiceReply, TransportError};
