// ABOUTME: Route module organization for FitTrack HTTP endpoints
// ABOUTME: Each domain module holds a Routes struct with thin handlers delegating to services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! Route modules
//!
//! Routes are organized by domain; handlers stay thin and delegate to the
//! service layer. Every authenticated handler resolves the bearer credential
//! through [`authenticate`] before any service logic runs.

use std::sync::Arc;

use axum::http::{header, HeaderMap};

use crate::errors::{AppError, AppResult};
use crate::models::AuthenticatedUser;
use crate::resources::ServerResources;

/// Health probe route
pub mod health;

/// Guest session endpoint
pub mod auth;

/// Workout CRUD endpoints
pub mod workouts;

/// AI analysis endpoints
pub mod ai;

pub use ai::AiRoutes;
pub use auth::AuthRoutes;
pub use health::HealthRoutes;
pub use workouts::WorkoutRoutes;

/// Resolve the requesting principal from the `Authorization` header
pub(crate) fn authenticate(
    headers: &HeaderMap,
    resources: &Arc<ServerResources>,
) -> AppResult<AuthenticatedUser> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::malformed_credential("missing authorization header"))?;
    resources.validator.decode_bearer(header_value)
}

/// Best-effort client key for rate limiting: first hop of `X-Forwarded-For`
///
/// The server is expected to sit behind a proxy that sets the header;
/// without one, all anonymous clients share a single bucket.
pub(crate) fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map_or_else(|| "unknown".to_owned(), |ip| ip.trim().to_owned())
}
