// ABOUTME: Workout and exercise orchestration over the store abstraction
// ABOUTME: Multi-row creation runs a compensating delete when a child insert fails
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! Workout/exercise service
//!
//! All operations are owner-scoped: reads and deletes filter on the
//! requesting principal's id, and ownership failures are indistinguishable
//! from absence (`NotFound`). Creation inserts the workout row first, then
//! each exercise; a failed exercise insert triggers a best-effort
//! compensating delete of the workout so no partial workout stays visible.

use serde_json::Value;
use tracing::{error, warn};

use super::rows;
use crate::errors::{AppError, AppResult};
use crate::models::{AuthenticatedUser, ExerciseCreate, Workout, WorkoutCreate};
use crate::store::{Datastore, JoinSpec, Query, Row, EXERCISES_TABLE, WORKOUTS_TABLE};

/// Workout CRUD orchestration
#[derive(Clone)]
pub struct WorkoutService {
    store: Datastore,
}

impl WorkoutService {
    /// Create a service over the given store
    #[must_use]
    pub const fn new(store: Datastore) -> Self {
        Self { store }
    }

    /// Create a workout and its exercises for the requesting user
    ///
    /// # Errors
    /// - `InvalidInput` when the payload fails validation
    /// - `Persistence` when any insert fails; a failed exercise insert rolls
    ///   the workout back first
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        payload: WorkoutCreate,
    ) -> AppResult<Workout> {
        payload.validate()?;

        let workout_row = workout_row(&user.id, &payload)?;
        let inserted = rows(
            self.store
                .execute(Query::table(WORKOUTS_TABLE).insert(vec![workout_row]))
                .await,
            |d| AppError::store_rejected("Failed to create workout", d),
        )?;
        let created = inserted
            .into_iter()
            .next()
            .ok_or_else(|| AppError::persistence("Failed to create workout", "insert returned no rows"))?;
        let workout_id = created
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::persistence("Failed to create workout", "inserted row missing id"))?
            .to_owned();

        for exercise in &payload.exercises {
            let row = exercise_row(exercise, &workout_id)?;
            let result = self
                .store
                .execute(Query::table(EXERCISES_TABLE).insert(vec![row]))
                .await;
            if let Some(detail) = result.error {
                self.roll_back_workout(&workout_id).await;
                return Err(AppError::persistence("Failed to save exercises", detail));
            }
        }

        self.fetch_created(&workout_id).await
    }

    /// List the requesting user's workouts with exercises, newest date first
    ///
    /// # Errors
    /// Returns a store failure as a read-path persistence error.
    pub async fn list(&self, user: &AuthenticatedUser) -> AppResult<Vec<Workout>> {
        let data = rows(
            self.store
                .execute(
                    Query::table(WORKOUTS_TABLE)
                        .eq("user_id", user.id.as_str())
                        .join(JoinSpec::exercises())
                        .order_by("date", true)
                        .select(),
                )
                .await,
            |d| AppError::store_rejected("Failed to list workouts", d),
        )?;
        data.into_iter().map(into_workout).collect()
    }

    /// Fetch one workout by id, scoped to the owner
    ///
    /// # Errors
    /// Returns `NotFound` when the workout is absent or owned by someone else.
    pub async fn get(&self, user: &AuthenticatedUser, workout_id: &str) -> AppResult<Workout> {
        let data = rows(
            self.store
                .execute(
                    Query::table(WORKOUTS_TABLE)
                        .eq("id", workout_id)
                        .eq("user_id", user.id.as_str())
                        .join(JoinSpec::exercises())
                        .select(),
                )
                .await,
            |d| AppError::store_rejected("Failed to retrieve workout", d),
        )?;
        data.into_iter()
            .next()
            .map_or(Err(AppError::NotFound("Workout")), into_workout)
    }

    /// Delete one workout and its exercises, scoped to the owner
    ///
    /// # Errors
    /// Returns `NotFound` when no owned workout matched.
    pub async fn delete(&self, user: &AuthenticatedUser, workout_id: &str) -> AppResult<()> {
        let removed = rows(
            self.store
                .execute(
                    Query::table(WORKOUTS_TABLE)
                        .eq("id", workout_id)
                        .eq("user_id", user.id.as_str())
                        .delete(),
                )
                .await,
            |d| AppError::store_rejected("Failed to delete workout", d),
        )?;
        if removed.is_empty() {
            return Err(AppError::NotFound("Workout"));
        }

        // The in-memory store has no foreign-key cascade; remove children here.
        let children = self
            .store
            .execute(
                Query::table(EXERCISES_TABLE)
                    .eq("workout_id", workout_id)
                    .delete(),
            )
            .await;
        if let Some(detail) = children.error {
            error!(workout_id, detail, "exercise cascade delete failed, orphan rows may remain");
            return Err(AppError::store_rejected("Failed to delete workout", detail));
        }

        Ok(())
    }

    async fn fetch_created(&self, workout_id: &str) -> AppResult<Workout> {
        let data = rows(
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
        data.into_iter().next().map_or_else(
            || Err(AppError::internal("created workout missing on re-fetch")),
            into_workout,
        )
    }

    /// Compensating action: delete the just-created workout. Best-effort; a
    /// failure here leaves an orphan and is logged as its own error.
    async fn roll_back_workout(&self, workout_id: &str) {
        let result = self
            .store
            .execute(Query::table(WORKOUTS_TABLE).eq("id", workout_id).delete())
            .await;
        match result.error {
            Some(detail) => error!(
                workout_id,
                detail, "compensating workout delete failed, orphan workout may remain"
            ),
            None => warn!(workout_id, "exercise insert failed, workout creation rolled back"),
        }
    }
}

fn workout_row(user_id: &str, payload: &WorkoutCreate) -> AppResult<Row> {
    let mut row = to_row(payload)?;
    row.remove("exercises");
    row.insert("user_id".to_owned(), Value::String(user_id.to_owned()));
    Ok(row)
}

fn exercise_row(payload: &ExerciseCreate, workout_id: &str) -> AppResult<Row> {
    let mut row = to_row(payload)?;
    row.insert("workout_id".to_owned(), Value::String(workout_id.to_owned()));
    Ok(row)
}

fn to_row<T: serde::Serialize>(payload: &T) -> AppResult<Row> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(row)) => Ok(row),
        Ok(other) => Err(AppError::internal(format!(
            "payload serialized to non-object: {other}"
        ))),
        Err(e) => Err(AppError::internal(format!("payload serialization failed: {e}"))),
    }
}

fn into_workout(row: Row) -> AppResult<Workout> {
    serde_json::from_value(Value::Object(row))
        .map_err(|e| AppError::internal(format!("stored workout row malformed: {e}")))
}
