// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Gemini client for the transliteration and translation call

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::errors::LontaraError;

/// Public Gemini REST endpoint
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default generative model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// A text-in, text-out generative language service
///
/// The model is an explicit argument so one shared client can serve calls
/// that override the default model.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, LontaraError>;
}

// --- Gemini serde structs ---

#[derive(serde::Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(serde::Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(serde::Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(serde::Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(serde::Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    total_token_count: u32,
}

impl GenerateResponse {
    /// Text of the first candidate, all parts concatenated
    fn into_text(self) -> Result<String, LontaraError> {
        let candidate = self.candidates.into_iter().next().ok_or_else(|| {
            LontaraError::ExternalServiceFailure("response contained no candidates".into())
        })?;

        let content = candidate.content.ok_or_else(|| {
            LontaraError::ExternalServiceFailure(format!(
                "candidate has no content (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ))
        })?;

        Ok(content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect())
    }
}

/// Client for the Gemini `generateContent` REST API
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// No timeout is applied unless one is given; a hung call blocks the
    /// request until the caller gives up.
    pub fn new(
        endpoint: &str,
        api_key: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, LontaraError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            LontaraError::ExternalServiceFailure(format!("failed to build HTTP client: {}", e))
        })?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!("Gemini client configured: endpoint={}", endpoint);

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, model)
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, LontaraError> {
        let start = Instant::now();
        let request = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.generate_url(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LontaraError::ExternalServiceFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LontaraError::ExternalServiceFailure(format!(
                "{} returned {}: {}",
                model, status, body
            )));
        }

        let response: GenerateResponse = response.json().await.map_err(|e| {
            LontaraError::ExternalServiceFailure(format!("invalid response body: {}", e))
        })?;
        let tokens_used = response
            .usage_metadata
            .as_ref()
            .map(|u| u.total_token_count)
            .unwrap_or(0);
        let text = response.into_text()?;

        debug!(
            "Gemini {} replied with {} chars in {}ms ({} tokens)",
            model,
            text.len(),
            start.elapsed().as_millis(),
            tokens_used
        );
        Ok(text)
    }
}
