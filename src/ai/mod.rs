// ABOUTME: AI analysis client with structured-response validation and single retry
// ABOUTME: GenerativeBackend trait seam lets tests script provider behavior
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! AI analysis client
//!
//! [`AiClient`] turns workout data into a structured [`AiAssessment`] or a
//! weekly narrative by prompting a generative provider through the
//! [`GenerativeBackend`] seam. The analysis path parses and validates the
//! provider's reply against a fixed JSON schema and retries exactly once
//! with a stricter prompt on malformed output; a second failure propagates
//! as `AiServiceBadFormat`. Network-level failures propagate immediately
//! with no retry.
//!
//! With no provider credential configured the client holds no backend and
//! returns fixed stub responses without any network call. That is a designed
//! degraded mode, not an error.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::errors::{AppError, AppResult};
use crate::models::AiAssessment;

pub mod gemini;

pub use gemini::{GeminiBackend, GeminiConfig};

/// Stub narrative returned when no provider credential is configured
pub const NO_KEY_NARRATIVE: &str = "No AI key configured, unable to generate summary.";

/// Seam between the analysis logic and the generative provider
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Send one prompt and return the provider's raw text reply
    ///
    /// # Errors
    /// Returns `AiServiceFailure` for transport or provider errors.
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

/// Client for workout analysis and weekly narratives
#[derive(Clone)]
pub struct AiClient {
    backend: Option<Arc<dyn GenerativeBackend>>,
}

impl AiClient {
    /// Client with a live backend
    #[must_use]
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Client in stub mode; no network calls are ever made
    #[must_use]
    pub const fn disabled() -> Self {
        Self { backend: None }
    }

    /// Build from configuration: a Gemini backend when a key is present
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        match &config.gemini_api_key {
            Some(key) => {
                let gemini = GeminiBackend::new(GeminiConfig {
                    api_key: key.clone(),
                    timeout_secs: config.ai_timeout_secs,
                    ..GeminiConfig::default()
                });
                Self::new(Arc::new(gemini))
            }
            None => {
                info!("no AI key configured, analysis responses will be stubbed");
                Self::disabled()
            }
        }
    }

    /// Whether a live provider backend is configured
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Analyze one workout, returning a validated structured assessment
    ///
    /// # Errors
    /// - `AiServiceFailure` when the provider call itself fails
    /// - `AiServiceBadFormat` when both attempts return malformed output
    pub async fn analyze_workout(&self, workout: &Value) -> AppResult<AiAssessment> {
        let Some(backend) = &self.backend else {
            return Ok(AiAssessment::stub());
        };

        let workout_json = serde_json::to_string(workout)
            .map_err(|e| AppError::internal(format!("workout serialization failed: {e}")))?;

        let mut prompt = analysis_prompt(&workout_json);
        let mut last_error = String::new();

        for attempt in 0..2 {
            let text = backend.generate(&prompt).await?;
            match parse_assessment(&text) {
                Ok(assessment) => return Ok(assessment),
                Err(e) => {
                    warn!(attempt, error = %e, "malformed analysis response");
                    last_error = e.to_string();
                    prompt = strict_analysis_prompt(&workout_json);
                }
            }
        }

        Err(AppError::ai_bad_format(format!(
            "provider returned malformed analysis twice: {last_error}"
        )))
    }

    /// Produce a free-form weekly narrative; no validation, no retry
    ///
    /// # Errors
    /// Returns `AiServiceFailure` when the provider call fails.
    pub async fn weekly_summary(&self, workouts: &[Value]) -> AppResult<String> {
        let Some(backend) = &self.backend else {
            return Ok(NO_KEY_NARRATIVE.to_owned());
        };

        let history = serde_json::to_string(workouts)
            .map_err(|e| AppError::internal(format!("history serialization failed: {e}")))?;
        backend.generate(&weekly_prompt(&history)).await
    }
}

const SCHEMA_DESCRIPTION: &str = "{ summary: string, strengths: string[], \
     improvements: string[], next_session_tips: string, overall_score: number between 1 and 10 }";

fn analysis_prompt(workout_json: &str) -> String {
    format!(
        "You are an expert personal fitness coach. Analyze this workout and respond ONLY \
         with valid JSON matching this exact schema: {SCHEMA_DESCRIPTION}. \
         Workout data: {workout_json}"
    )
}

fn strict_analysis_prompt(workout_json: &str) -> String {
    format!(
        "You are an expert personal fitness coach. Respond ONLY with valid JSON exactly \
         matching the schema below. Do not include any additional text. \
         Schema: {SCHEMA_DESCRIPTION}. Workout data: {workout_json}"
    )
}

fn weekly_prompt(history: &str) -> String {
    format!(
        "You are a personal fitness coach. Given the following last 7 days of workouts \
         (including exercises), write a concise weekly progress narrative. \
         Workout history: {history}"
    )
}

/// Parse and validate a provider reply as an assessment
///
/// Providers routinely wrap the JSON in markdown fences or stray prose, so
/// after a direct parse fails the outermost brace-delimited span is tried.
fn parse_assessment(text: &str) -> AppResult<AiAssessment> {
    let direct: Result<AiAssessment, _> = serde_json::from_str(text.trim());
    let assessment = match direct {
        Ok(assessment) => assessment,
        Err(first_err) => {
            let candidate = extract_json_object(text)
                .ok_or_else(|| AppError::ai_bad_format(format!("no JSON object: {first_err}")))?;
            serde_json::from_str(candidate)
                .map_err(|e| AppError::ai_bad_format(format!("JSON parse failed: {e}")))?
        }
    };
    assessment.validate()?;
    Ok(assessment)
}

fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}
