//! Ollama generate client for note formatting.
//!
//! One synchronous request per note: the composed prompt embeds the system
//! prompt and the note content verbatim, since the backend is trusted local
//! infrastructure. Streaming stays disabled so the full response arrives as
//! one unit, and the whole call is bounded by a global timeout rather than
//! left to hang.

use std::io;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use ureq::Agent;

use crate::error::PipelineError;

/// Default Ollama model used when `--model` is not given.
pub const DEFAULT_MODEL: &str = "qwen2.5:14b-instruct-q5_K_M";

/// Default generate endpoint of a local Ollama instance.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";

/// Environment variable overriding the generate endpoint.
pub const ENDPOINT_ENV: &str = "NOTEFORM_ENDPOINT";

/// Upper bound on a single generate call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Low temperature and near-1 nucleus sampling favor deterministic output.
const TEMPERATURE: f64 = 0.3;
const TOP_P: f64 = 0.9;

/// Seam between the driver and the generation backend.
pub trait Formatter {
    /// Format one note's content under the system prompt.
    fn format(&self, content: &str, system_prompt: &str) -> Result<String, PipelineError>;

    /// Model identifier recorded in artifact headers.
    fn model(&self) -> &str;
}

/// Request body for the Ollama `/api/generate` endpoint.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f64,
    top_p: f64,
}

/// HTTP client for a local Ollama-compatible backend.
pub struct LmClient {
    endpoint: String,
    model: String,
    agent: Agent,
}

impl LmClient {
    /// Build a client for `model`, honoring the `NOTEFORM_ENDPOINT`
    /// override.
    pub fn new(model: String) -> Self {
        let endpoint =
            std::env::var(ENDPOINT_ENV).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            endpoint,
            model,
            agent,
        }
    }
}

impl Formatter for LmClient {
    fn format(&self, content: &str, system_prompt: &str) -> Result<String, PipelineError> {
        let prompt = build_prompt(system_prompt, content);
        let body = GenerateRequest {
            model: &self.model,
            prompt: &prompt,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
                top_p: TOP_P,
            },
        };

        tracing::debug!(
            model = %self.model,
            prompt_bytes = prompt.len(),
            "sending generate request"
        );
        let mut response = self
            .agent
            .post(self.endpoint.as_str())
            .send_json(&body)
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::BadStatus {
                status: status.as_u16(),
            });
        }

        let raw = response
            .body_mut()
            .read_to_string()
            .map_err(map_transport_error)?;
        parse_generate_response(&raw)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Compose the single textual payload sent to the backend.
fn build_prompt(system_prompt: &str, content: &str) -> String {
    format!(
        "System: {system_prompt}\n\nUser: Please format the following text according to the system instructions:\n\n{content}"
    )
}

/// Extract the trimmed `response` field from a generate response body.
///
/// An empty `response` is a valid result and passes through unchanged.
fn parse_generate_response(raw: &str) -> Result<String, PipelineError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| PipelineError::MalformedResponse {
            detail: err.to_string(),
        })?;
    let text = value
        .get("response")
        .and_then(Value::as_str)
        .ok_or_else(|| PipelineError::MalformedResponse {
            detail: "missing response field".to_string(),
        })?;
    Ok(text.trim().to_string())
}

fn map_transport_error(err: ureq::Error) -> PipelineError {
    match err {
        ureq::Error::Timeout(_) => PipelineError::Timeout {
            limit_secs: REQUEST_TIMEOUT.as_secs(),
        },
        ureq::Error::Io(err) if err.kind() == io::ErrorKind::TimedOut => PipelineError::Timeout {
            limit_secs: REQUEST_TIMEOUT.as_secs(),
        },
        other => PipelineError::Unreachable {
            detail: other.to_string(),
        },
    }
}
