//! # Gemini Client
//!
//! Minimal blocking client for the Gemini `generateContent` endpoint. It sends
//! one user prompt and returns the reply text; everything else about the
//! provider's wire format stays in this module.

use crate::config::Config;
use crate::error::{MoodifyError, MoodifyResult};
use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "gemini";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, all parts concatenated. `None` when the
    /// model produced nothing usable (e.g. the reply was blocked).
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

fn safety_settings() -> Vec<SafetySetting> {
    [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category,
        threshold: "BLOCK_MEDIUM_AND_ABOVE",
    })
    .collect()
}

/// Blocking client for one Gemini model.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns [`MoodifyError::Configuration`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> MoodifyResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MoodifyError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// # Errors
    ///
    /// See [`GeminiClient::new`].
    pub fn from_config(config: &Config) -> MoodifyResult<Self> {
        Self::new(
            &config.gemini_api_base,
            &config.gemini_api_key,
            &config.gemini_model,
            config.request_timeout(),
        )
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send `prompt` as a single user message and return the reply text.
    ///
    /// # Errors
    ///
    /// Returns [`MoodifyError::Upstream`] when the request fails or times out,
    /// the status is not a success, or the reply carries no text.
    pub fn generate_content(&self, prompt: &str) -> MoodifyResult<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.9,
                top_p: 1.0,
                top_k: 1,
                max_output_tokens: 2048,
            },
            safety_settings: safety_settings(),
        };

        debug!("POST {} ({} prompt chars)", self.endpoint(), prompt.len());
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(MoodifyError::upstream(SERVICE, format!("API error ({status}): {body}")));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| MoodifyError::upstream(SERVICE, format!("Failed to parse response: {e}")))?;

        parsed
            .text()
            .ok_or_else(|| MoodifyError::upstream(SERVICE, "No response content"))
    }
}
