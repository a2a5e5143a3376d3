// ABOUTME: Domain data models for workouts, exercises, and AI analyses
// ABOUTME: Create-payload validation mirrors the REST contract's field constraints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! Domain models
//!
//! Store rows are schema-less JSON maps; these types define the shapes the
//! API accepts and returns. Create payloads validate themselves before any
//! store call; response types are deserialized from store rows so malformed
//! rows never leave the service layer unnoticed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Principal identified by a decoded bearer credential; never persisted here
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    /// Opaque user identifier (token subject)
    pub id: String,
    /// Optional email claim
    pub email: Option<String>,
}

/// Exercise payload inside a workout creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseCreate {
    /// Exercise name, required, at most 100 characters
    pub name: String,
    /// Number of sets, non-negative
    pub sets: Option<u32>,
    /// Repetitions per set, non-negative
    pub reps: Option<u32>,
    /// Weight in kilograms, non-negative
    pub weight_kg: Option<f64>,
    /// Targeted muscle group, at most 50 characters
    pub muscle_group: Option<String>,
}

impl ExerciseCreate {
    fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::invalid_input("Exercise name is required"));
        }
        if self.name.chars().count() > 100 {
            return Err(AppError::invalid_input(
                "Exercise name must be at most 100 characters",
            ));
        }
        if let Some(group) = &self.muscle_group {
            if group.chars().count() > 50 {
                return Err(AppError::invalid_input(
                    "Muscle group must be at most 50 characters",
                ));
            }
        }
        if self.weight_kg.is_some_and(|w| w < 0.0) {
            return Err(AppError::invalid_input("Weight must be non-negative"));
        }
        Ok(())
    }
}

/// Workout creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutCreate {
    /// Workout title, required, at most 100 characters
    pub title: String,
    /// Workout date
    pub date: Option<NaiveDate>,
    /// Duration in minutes, non-negative
    pub duration_minutes: Option<u32>,
    /// Free-form notes, at most 1000 characters
    pub notes: Option<String>,
    /// Exercises performed, created together with the workout
    #[serde(default)]
    pub exercises: Vec<ExerciseCreate>,
}

impl WorkoutCreate {
    /// Validate field constraints before any store operation runs
    ///
    /// # Errors
    /// Returns `InvalidInput` naming the first violated constraint.
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::invalid_input("Workout title is required"));
        }
        if self.title.chars().count() > 100 {
            return Err(AppError::invalid_input(
                "Workout title must be at most 100 characters",
            ));
        }
        if let Some(notes) = &self.notes {
            if notes.chars().count() > 1000 {
                return Err(AppError::invalid_input(
                    "Notes must be at most 1000 characters",
                ));
            }
        }
        for exercise in &self.exercises {
            exercise.validate()?;
        }
        Ok(())
    }
}

/// Stored exercise row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    /// Server-generated identifier
    pub id: String,
    /// Owning workout identifier
    pub workout_id: String,
    /// Exercise name
    pub name: String,
    /// Number of sets
    pub sets: Option<u32>,
    /// Repetitions per set
    pub reps: Option<u32>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// Targeted muscle group
    pub muscle_group: Option<String>,
}

/// Stored workout row joined with its exercises
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    /// Server-generated identifier
    pub id: String,
    /// Owning user identifier
    pub user_id: String,
    /// Workout title
    pub title: String,
    /// Workout date
    pub date: Option<NaiveDate>,
    /// Duration in minutes
    pub duration_minutes: Option<u32>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp assigned by the store
    pub created_at: DateTime<Utc>,
    /// Child exercises, attached by the store join
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

/// Structured assessment the AI provider must return for a single workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAssessment {
    /// Narrative summary of the workout
    pub summary: String,
    /// Observed strengths
    pub strengths: Vec<String>,
    /// Suggested improvements
    pub improvements: Vec<String>,
    /// Tips for the next session
    pub next_session_tips: Option<String>,
    /// Overall score, 1 through 10 inclusive
    pub overall_score: i64,
}

impl AiAssessment {
    /// Fixed response used when no AI credential is configured
    #[must_use]
    pub fn stub() -> Self {
        Self {
            summary: "No AI key configured".to_owned(),
            strengths: Vec::new(),
            improvements: Vec::new(),
            next_session_tips: Some(String::new()),
            overall_score: 5,
        }
    }

    /// Check the schema constraints the prompt demands of the provider
    ///
    /// # Errors
    /// Returns `AiServiceBadFormat` when `overall_score` falls outside 1..=10.
    pub fn validate(&self) -> AppResult<()> {
        if !(1..=10).contains(&self.overall_score) {
            return Err(AppError::ai_bad_format(format!(
                "overall_score {} outside 1..=10",
                self.overall_score
            )));
        }
        Ok(())
    }
}

/// Stored AI analysis row, at most one per workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiAnalysis {
    /// Server-generated identifier
    pub id: String,
    /// Analyzed workout identifier (upsert conflict key)
    pub workout_id: String,
    /// Owning user identifier
    pub user_id: String,
    /// Narrative summary
    pub summary: String,
    /// Observed strengths
    pub strengths: Vec<String>,
    /// Suggested improvements
    pub improvements: Vec<String>,
    /// Tips for the next session
    pub next_session_tips: Option<String>,
    /// Overall score, 1 through 10 inclusive
    pub overall_score: i64,
    /// Creation timestamp assigned by the store
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn payload(title: &str) -> WorkoutCreate {
        WorkoutCreate {
            title: title.to_owned(),
            date: None,
            duration_minutes: None,
            notes: None,
            exercises: Vec::new(),
        }
    }

    #[test]
    fn rejects_blank_title() {
        assert!(payload("  ").validate().is_err());
        assert!(payload("Leg day").validate().is_ok());
    }

    #[test]
    fn rejects_overlong_fields() {
        assert!(payload(&"x".repeat(101)).validate().is_err());
        let mut p = payload("ok");
        p.notes = Some("n".repeat(1001));
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_invalid_exercise() {
        let mut p = payload("ok");
        p.exercises.push(ExerciseCreate {
            name: String::new(),
            sets: None,
            reps: None,
            weight_kg: None,
            muscle_group: None,
        });
        assert!(p.validate().is_err());
    }

    #[test]
    fn assessment_score_bounds() {
        let mut a = AiAssessment::stub();
        assert!(a.validate().is_ok());
        a.overall_score = 0;
        assert!(a.validate().is_err());
        a.overall_score = 11;
        assert!(a.validate().is_err());
    }
}
