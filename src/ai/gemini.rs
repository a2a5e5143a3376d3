// ABOUTME: Gemini REST backend implementing the GenerativeBackend seam
// ABOUTME: Single generateContent call per prompt with an explicit timeout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! Gemini provider backend
//!
//! Thin client for the `generateContent` endpoint of the Gemini REST API.
//! One prompt in, one text candidate out; all transport and provider errors
//! map to `AiServiceFailure`. Retry-on-malformed-output policy lives in the
//! [`AiClient`](super::AiClient), not here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::GenerativeBackend;
use crate::errors::{AppError, AppResult};

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini backend configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Provider API key
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Request timeout, seconds
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Gemini REST backend
pub struct GeminiBackend {
    config: GeminiConfig,
    http: Client,
}

impl GeminiBackend {
    /// Create a backend with the configured timeout
    #[must_use]
    pub fn new(config: GeminiConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { config, http }
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ai_service(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ai_service(format!(
                "Gemini returned HTTP {status}: {body}"
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::ai_service(format!("Gemini response parse failed: {e}")))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| AppError::ai_service("Gemini returned no text candidate"))
    }
}
