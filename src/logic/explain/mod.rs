//! Explain Module - ranked, human-readable feature contributions
//!
//! Turns the per-feature scores returned by the classification service into
//! a short ranked list with an explanation attached to every entry.

pub mod normalize;
pub mod registry;
pub mod types;

pub use normalize::{display_value, normalize};
pub use registry::{ExplanationRegistry, DEFAULT_KEY};
pub use types::{Contributions, FeatureContribution, RawContribution};
