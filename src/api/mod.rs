pub mod commands;

pub use commands::{Command, CommandError, CommandOutcome, Effect, ScanSession};
