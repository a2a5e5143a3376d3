// ABOUTME: Workout CRUD route handlers
// ABOUTME: Thin wrappers that authenticate, deserialize, and delegate to WorkoutService
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! Workout routes
//!
//! All endpoints require a bearer credential. Ownership scoping happens in
//! the service layer; a foreign workout id is indistinguishable from a
//! missing one.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};

use super::authenticate;
use crate::errors::AppError;
use crate::models::WorkoutCreate;
use crate::resources::ServerResources;
use crate::services::WorkoutService;

/// Workout routes
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create all workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/workouts", post(Self::handle_create).get(Self::handle_list))
            .route("/workouts/", post(Self::handle_create).get(Self::handle_list))
            .route("/workouts/:id", get(Self::handle_get))
            .route("/workouts/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    fn service(resources: &Arc<ServerResources>) -> WorkoutService {
        WorkoutService::new(resources.store.clone())
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(payload): Json<WorkoutCreate>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources)?;
        let workout = Self::service(&resources).create(&user, payload).await?;
        Ok((StatusCode::CREATED, Json(workout)).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources)?;
        let workouts = Self::service(&resources).list(&user).await?;
        Ok((StatusCode::OK, Json(workouts)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources)?;
        let workout = Self::service(&resources).get(&user, &id).await?;
        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources)?;
        Self::service(&resources).delete(&user, &id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
