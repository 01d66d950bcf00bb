use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::TARGET_LLM_REQUEST;

/// Responses shorter than this many characters get the short-content
/// advisory. The text itself is never altered or regenerated.
pub const SHORT_CONTENT_THRESHOLD: usize = 50;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("generation service returned status {0}")]
    Status(StatusCode),
    #[error("generation service returned an unexpected response body")]
    MalformedResponse,
}

#[derive(Deserialize)]
struct GenerationChunk {
    generated_text: String,
}

/// Client for the hosted text-generation endpoint. One POST per call; errors
/// propagate to the caller as advisories, they are not retried here.
#[derive(Clone)]
pub struct GenerationClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl GenerationClient {
    pub fn new(http: Client, endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        GenerationClient {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        max_new_tokens: u32,
    ) -> Result<String, GenerationError> {
        let url = format!("{}/{}", self.endpoint.trim_end_matches('/'), model);
        debug!(target: TARGET_LLM_REQUEST, "Sending generation request to {} ({} prompt chars)", url, prompt.chars().count());

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({
                "inputs": prompt,
                "parameters": {
                    "max_new_tokens": max_new_tokens,
                    "return_full_text": false,
                },
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(target: TARGET_LLM_REQUEST, "Generation request to model {} failed with status {}", model, status);
            return Err(GenerationError::Status(status));
        }

        let chunks: Vec<GenerationChunk> = response.json().await.map_err(|e| {
            warn!(target: TARGET_LLM_REQUEST, "Failed to decode generation response: {}", e);
            GenerationError::MalformedResponse
        })?;

        let text = chunks
            .into_iter()
            .next()
            .ok_or(GenerationError::MalformedResponse)?
            .generated_text;

        debug!(target: TARGET_LLM_REQUEST, "Model {} generated {} chars", model, text.chars().count());
        Ok(text)
    }
}

/// Short-response heuristic from the original service: under 50 characters is
/// worth a warning, but the text is still returned as-is.
pub fn is_suspiciously_short(text: &str) -> bool {
    text.chars().count() < SHORT_CONTENT_THRESHOLD
}
