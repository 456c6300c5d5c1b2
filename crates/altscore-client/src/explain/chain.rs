use std::time::{Duration, Instant};

use thiserror::Error;

use crate::explain::payload::{ExplanationPayload, parse_and_validate};
use crate::explain::provider::{AttemptError, GenerativeBackend};

/// Models tried in order until one yields a valid payload. Ordering trades
/// quality for availability: the preferred model first, then progressively
/// more conservative fallbacks.
pub const NARRATIVE_MODEL_CHAIN: [&str; 4] = [
    "gemini-2.0-flash-exp",
    "gemini-2.5-flash",
    "gemini-flash-latest",
    "gemini-2.0-flash",
];

/// Per-model request timeout.
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(15);

/// Overall wall-clock budget for the whole chain. The scoring pipeline stays
/// interactive even when every model hangs at its timeout.
pub const CHAIN_DEADLINE: Duration = Duration::from_secs(45);

#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("no narrative backend is configured; set GOOGLE_GENAI_API_KEY to enable narratives")]
    NotConfigured,
    #[error("all {attempts} narrative models failed; last error: {last}")]
    Exhausted { attempts: i64, last: AttemptError },
    #[error("narrative deadline exhausted after {attempts} attempts")]
    DeadlineExhausted {
        attempts: i64,
        last: Option<AttemptError>,
    },
}

impl ExplainError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "narrative_not_configured",
            Self::Exhausted { .. } => "narrative_exhausted",
            Self::DeadlineExhausted { .. } => "narrative_deadline_exhausted",
        }
    }

    pub const fn attempts(&self) -> i64 {
        match self {
            Self::NotConfigured => 0,
            Self::Exhausted { attempts, .. } | Self::DeadlineExhausted { attempts, .. } => {
                *attempts
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct NarrativeOutcome {
    pub payload: ExplanationPayload,
    pub model: String,
    pub attempts: i64,
}

pub fn run_chain(
    backend: &dyn GenerativeBackend,
    prompt: &str,
) -> Result<NarrativeOutcome, ExplainError> {
    run_chain_with_budget(backend, prompt, CHAIN_DEADLINE)
}

/// Walks the model chain sequentially, keeping the most recent attempt error
/// so an exhausted chain reports the terminal diagnosis rather than the first
/// transient one.
pub fn run_chain_with_budget(
    backend: &dyn GenerativeBackend,
    prompt: &str,
    budget: Duration,
) -> Result<NarrativeOutcome, ExplainError> {
    let started = Instant::now();
    let mut attempts: i64 = 0;
    let mut last_error: Option<AttemptError> = None;

    for model in NARRATIVE_MODEL_CHAIN {
        let elapsed = started.elapsed();
        if elapsed >= budget {
            return Err(ExplainError::DeadlineExhausted {
                attempts,
                last: last_error,
            });
        }

        let call_timeout = ATTEMPT_TIMEOUT.min(budget - elapsed);
        attempts += 1;

        match backend.generate(model, prompt, call_timeout) {
            Ok(text) => match parse_and_validate(&text) {
                Ok(payload) => {
                    return Ok(NarrativeOutcome {
                        payload,
                        model: model.to_string(),
                        attempts,
                    });
                }
                Err(error) => last_error = Some(error),
            },
            Err(error) => last_error = Some(error),
        }
    }

    let last = last_error.unwrap_or_else(|| {
        AttemptError::Transport("no narrative attempt was made".to_string())
    });
    Err(ExplainError::Exhausted { attempts, last })
}
