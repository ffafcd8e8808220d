//! History Module - local scan history with replay
//!
//! Single-session, single-user log; see `store` for persistence rules.

pub mod store;
pub mod types;


pub use store::HistoryStore;
pub use types::{HistoryError, HistoryRecord};
