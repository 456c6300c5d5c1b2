use std::env;
use std::time::Duration;

use serde_json::{Value, json};
use thiserror::Error;

/// Failure taxonomy for a single narrative attempt. The chain keeps only the
/// most recent attempt's error, so each variant must stand alone as a
/// diagnosis.
#[derive(Debug, Clone, Error)]
pub enum AttemptError {
    #[error("model request failed: {0}")]
    Transport(String),
    #[error("model output is not the expected JSON shape: {0}")]
    Parse(String),
    #[error("model output failed validation: {0}")]
    Validation(String),
}

impl AttemptError {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Parse(_) => "parse",
            Self::Validation(_) => "validation",
        }
    }
}

/// One narrative text generation against a named model. Implementations are
/// swapped out in tests, so the trait stays narrow: text in, text out.
pub trait GenerativeBackend {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, AttemptError>;
}

const API_KEY_ENV: &str = "GOOGLE_GENAI_API_KEY";
const BASE_URL_ENV: &str = "ALTSCORE_GENAI_BASE_URL";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct HttpBackend {
    api_key: String,
    base_url: String,
}

impl HttpBackend {
    /// Returns `None` when no API key is configured. Callers treat that as
    /// the not-configured degraded mode rather than attempting the chain.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var(API_KEY_ENV).ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = env::var(BASE_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Some(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request_body(prompt: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
            "generationConfig": {
                "temperature": 0.7,
                "topP": 0.95,
                "topK": 40,
                "maxOutputTokens": 2048,
                "responseMimeType": "application/json",
            },
        })
    }

    fn extract_candidate_text(response: &Value) -> Option<String> {
        response
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .get(0)?
            .get("text")?
            .as_str()
            .map(str::to_string)
    }
}

impl GenerativeBackend for HttpBackend {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, AttemptError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| AttemptError::Transport(error.to_string()))?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let response = client
            .post(&url)
            .json(&Self::request_body(prompt))
            .send()
            .map_err(|error| AttemptError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Transport(format!(
                "model `{model}` returned HTTP {status}"
            )));
        }

        let body: Value = response
            .json()
            .map_err(|error| AttemptError::Parse(error.to_string()))?;

        Self::extract_candidate_text(&body).ok_or_else(|| {
            AttemptError::Parse(format!("model `{model}` returned no candidate text"))
        })
    }
}
