// ABOUTME: Health probe route
// ABOUTME: Confirms the process is up; no dependencies are touched
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

/// Health check routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health routes
    #[must_use]
    pub fn routes() -> Router {
        Router::new().route("/", get(Self::handle_root))
    }

    async fn handle_root() -> impl IntoResponse {
        Json(json!({ "message": "FitTrack Pro backend is running" }))
    }
}
