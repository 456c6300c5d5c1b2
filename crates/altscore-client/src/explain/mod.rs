pub mod chain;
pub mod payload;
pub mod prompt;
pub mod provider;

pub use chain::{ExplainError, NARRATIVE_MODEL_CHAIN, NarrativeOutcome};
pub use payload::ExplanationPayload;
pub use provider::{AttemptError, GenerativeBackend, HttpBackend};
