// ABOUTME: AI analysis route handlers
// ABOUTME: Exposes analyze, stored-analysis retrieval, and the weekly summary narrative
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! AI routes
//!
//! `POST /ai/analyze/{workout_id}` answers 403 for a missing workout as well
//! as a foreign one; the ambiguity is deliberate anti-enumeration behavior.
//! `GET /ai/analysis/{workout_id}` is a plain owner-scoped read with the
//! usual 404.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::authenticate;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::AnalysisService;

/// AI analysis routes
pub struct AiRoutes;

impl AiRoutes {
    /// Create all AI routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/ai/analyze/:workout_id", post(Self::handle_analyze))
            .route("/ai/analysis/:workout_id", get(Self::handle_get_analysis))
            .route("/ai/weekly-summary", get(Self::handle_weekly_summary))
            .with_state(resources)
    }

    fn service(resources: &Arc<ServerResources>) -> AnalysisService {
        AnalysisService::new(resources.store.clone(), resources.ai.clone())
    }

    async fn handle_analyze(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(workout_id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources)?;
        let analysis = Self::service(&resources).analyze(&user, &workout_id).await?;
        Ok((StatusCode::CREATED, Json(analysis)).into_response())
    }

    async fn handle_get_analysis(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(workout_id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources)?;
        let analysis = Self::service(&resources)
            .get_analysis(&user, &workout_id)
            .await?;
        Ok((StatusCode::OK, Json(analysis)).into_response())
    }

    async fn handle_weekly_summary(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources)?;
        let narrative = Self::service(&resources).weekly_summary(&user).await?;
        Ok((StatusCode::OK, Json(json!({ "narrative": narrative }))).into_response())
    }
}
