// ABOUTME: AI analysis orchestration spanning the store and the AI client
// ABOUTME: Analysis rows are upserted keyed on workout_id so reruns replace, never duplicate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! Analysis service
//!
//! The analyze path deliberately answers `Forbidden` both for a foreign
//! workout and for a missing one, so callers cannot probe for existence.
//! Direct analysis reads use the usual owner-scoped `NotFound`. Weekly
//! summaries cover an inclusive trailing 7-day window and are never
//! persisted.

use chrono::{Duration, Utc};
use serde_json::Value;

use super::rows;
use crate::ai::AiClient;
use crate::errors::{AppError, AppResult};
use crate::models::{AiAnalysis, AuthenticatedUser};
use crate::store::{Datastore, JoinSpec, Query, Row, ANALYSES_TABLE, WORKOUTS_TABLE};

/// AI analysis and weekly summary orchestration
#[derive(Clone)]
pub struct AnalysisService {
    store: Datastore,
    ai: AiClient,
}

impl AnalysisService {
    /// Create a service over the given store and AI client
    #[must_use]
    pub const fn new(store: Datastore, ai: AiClient) -> Self {
        Self { store, ai }
    }

    /// Analyze a workout and store the result, replacing any prior analysis
    ///
    /// # Errors
    /// - `Forbidden` when the workout is missing or owned by someone else
    /// - `AiServiceFailure` / `AiServiceBadFormat` from the provider integration
    /// - `Persistence` when the upsert fails
    pub async fn analyze(
        &self,
        user: &AuthenticatedUser,
        workout_id: &str,
    ) -> AppResult<AiAnalysis> {
        let fetched = rows(
            self.store
                .execute(
                    Query::table(WORKOUTS_TABLE)
                        .eq("id", workout_id)
                        .join(JoinSpec::exercises())
                        .select(),
                )
                .await,
            |d| AppError::store_rejected("Failed to retrieve workout", d),
        )?;

        // Missing and foreign-owned are intentionally indistinguishable here.
        let Some(workout) = fetched.into_iter().next() else {
            return Err(AppError::Forbidden);
        };
        if workout.get("user_id").and_then(Value::as_str) != Some(user.id.as_str()) {
            return Err(AppError::Forbidden);
        }

        let assessment = self.ai.analyze_workout(&Value::Object(workout)).await?;
        // Redundant with the client's own check; kept so a future client
        // change cannot silently persist an out-of-range score.
        assessment.validate()?;

        let mut row = Row::new();
        row.insert("workout_id".to_owned(), Value::String(workout_id.to_owned()));
        row.insert("user_id".to_owned(), Value::String(user.id.clone()));
        row.insert("summary".to_owned(), Value::String(assessment.summary));
        row.insert(
            "strengths".to_owned(),
            Value::Array(assessment.strengths.into_iter().map(Value::String).collect()),
        );
        row.insert(
            "improvements".to_owned(),
            Value::Array(
                assessment
                    .improvements
                    .into_iter()
                    .map(Value::String)
                    .collect(),
            ),
        );
        row.insert(
            "next_session_tips".to_owned(),
            assessment
                .next_session_tips
                .map_or(Value::Null, Value::String),
        );
        row.insert(
            "overall_score".to_owned(),
            Value::Number(assessment.overall_score.into()),
        );

        let stored = rows(
            self.store
                .execute(Query::table(ANALYSES_TABLE).upsert(vec![row], "workout_id"))
                .await,
            |d| AppError::persistence("Failed to save analysis", d),
        )?;
        stored.into_iter().next().map_or_else(
            || Err(AppError::persistence("Failed to save analysis", "upsert returned no rows")),
            into_analysis,
        )
    }

    /// Fetch the stored analysis for a workout, scoped to the owner
    ///
    /// # Errors
    /// Returns `NotFound` when no owned analysis exists for the workout.
    pub async fn get_analysis(
        &self,
        user: &AuthenticatedUser,
        workout_id: &str,
    ) -> AppResult<AiAnalysis> {
        let data = rows(
            self.store
                .execute(
                    Query::table(ANALYSES_TABLE)
                        .eq("workout_id", workout_id)
                        .eq("user_id", user.id.as_str())
                        .select(),
                )
                .await,
            |d| AppError::store_rejected("Failed to retrieve analysis", d),
        )?;
        data.into_iter()
            .next()
            .map_or(Err(AppError::NotFound("Analysis")), into_analysis)
    }

    /// Narrate the requesting user's last 7 days of workouts
    ///
    /// # Errors
    /// Returns a store failure or `AiServiceFailure` from the provider.
    pub async fn weekly_summary(&self, user: &AuthenticatedUser) -> AppResult<String> {
        let cutoff = (Utc::now() - Duration::days(7)).date_naive().to_string();
        let data = rows(
            self.store
                .execute(
                    Query::table(WORKOUTS_TABLE)
                        .eq("user_id", user.id.as_str())
                        .gte("date", cutoff)
                        .join(JoinSpec::exercises())
                        .select(),
                )
                .await,
            |d| AppError::store_rejected("Failed to fetch workouts", d),
        )?;

        let history: Vec<Value> = data.into_iter().map(Value::Object).collect();
        self.ai.weekly_summary(&history).await
    }
}

fn into_analysis(row: Row) -> AppResult<AiAnalysis> {
    serde_json::from_value(Value::Object(row))
        .map_err(|e| AppError::internal(format!("stored analysis row malformed: {e}")))
}
