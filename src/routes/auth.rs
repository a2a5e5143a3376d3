// ABOUTME: Guest session route handler
// ABOUTME: Rate-limited sign-in against the remote auth service, with a local fallback session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! Authentication routes
//!
//! `POST /auth/guest` issues a session for an anonymous visitor. With a
//! remote database and guest credentials configured it signs into the remote
//! auth service with the server-side guest account and passes the session
//! through; otherwise it returns a minimal local session whose access token
//! is the degraded-mode sentinel. Guest credentials never leave the server.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::info;

use super::client_key;
use crate::auth::{GUEST_EMAIL, GUEST_TOKEN, GUEST_USER_ID};
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create the auth routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/auth/guest", post(Self::handle_guest))
            .with_state(resources)
    }

    async fn handle_guest(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let key = client_key(&headers);
        if !resources.guest_limiter.check(&key).await {
            return Err(AppError::RateLimited);
        }

        let session = match (&resources.config.database, &resources.config.guest_credentials) {
            (Some(_), Some(_)) => Self::remote_guest_session(&resources).await?,
            _ => {
                info!("issuing local guest session");
                Self::local_guest_session()
            }
        };

        Ok((StatusCode::OK, Json(session)).into_response())
    }

    /// Minimal session used when no remote auth service is configured
    fn local_guest_session() -> Value {
        json!({
            "access_token": GUEST_TOKEN,
            "token_type": "bearer",
            "user": { "id": GUEST_USER_ID, "email": GUEST_EMAIL }
        })
    }

    /// Password sign-in with the server-side guest account
    async fn remote_guest_session(resources: &Arc<ServerResources>) -> AppResult<Value> {
        let (Some(db), Some(guest)) = (
            &resources.config.database,
            &resources.config.guest_credentials,
        ) else {
            return Err(AppError::internal("guest sign-in misconfigured"));
        };

        let url = format!("{}/auth/v1/token", db.url);
        let response = resources
            .http
            .post(&url)
            .query(&[("grant_type", "password")])
            .header("apikey", &db.service_key)
            .json(&json!({ "email": guest.email, "password": guest.password }))
            .send()
            .await
            .map_err(|e| AppError::internal(format!("guest sign-in request failed: {e}")))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(AppError::invalid_input("Guest sign-in rejected"));
        }

        let session: Value = serde_json::from_str(&body)
            .map_err(|e| AppError::internal(format!("guest session parse failed: {e}")))?;
        if session.get("access_token").and_then(Value::as_str).is_none() {
            return Err(AppError::internal("guest sign-in returned no session"));
        }
        Ok(session)
    }
}
