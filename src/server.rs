// ABOUTME: Router assembly, middleware stack, and HTTP serving loop
// ABOUTME: CORS, request-size limiting, tracing, and request logging wrap the domain routers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! HTTP server assembly
//!
//! Merges the per-domain routers and wraps them with the middleware stack:
//! CORS restricted to the configured frontend origin, a request-body size
//! limit, HTTP tracing, and a per-request log line that includes the
//! best-effort decoded user id.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;
use crate::routes::{AiRoutes, AuthRoutes, HealthRoutes, WorkoutRoutes};

/// Maximum accepted request body size in bytes; larger payloads get 413
pub const MAX_REQUEST_BYTES: usize = 1_000_000;

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let mut router = Router::new()
        .merge(HealthRoutes::routes())
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(WorkoutRoutes::routes(resources.clone()))
        .merge(AiRoutes::routes(resources.clone()));

    if let Some(cors) = cors_layer(resources.config.frontend_url.as_deref()) {
        router = router.layer(cors);
    }

    router
        .layer(middleware::from_fn_with_state(resources, log_requests))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BYTES))
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured port and serve until the process exits
///
/// # Errors
/// Returns an error when binding or serving fails.
pub async fn serve(resources: Arc<ServerResources>) -> AppResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], resources.config.http_port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("failed to bind {addr}: {e}")))?;
    let local = listener
        .local_addr()
        .map_err(|e| AppError::internal(format!("failed to read local addr: {e}")))?;

    info!(
        addr = %local,
        store = resources.store.backend_name(),
        ai_enabled = resources.ai.is_enabled(),
        "starting FitTrack server"
    );
    if !resources.validator.is_signed() {
        warn!("JWT_SECRET not set: running degraded token auth, unsafe for production");
    }

    axum::serve(listener, build_router(resources))
        .await
        .map_err(|e| AppError::internal(format!("server error: {e}")))
}

fn cors_layer(origin: Option<&str>) -> Option<CorsLayer> {
    let origin = origin?.parse::<HeaderValue>().ok()?;
    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
    )
}

/// One log line per request with the best-effort decoded user id
async fn log_requests(
    State(resources): State<Arc<ServerResources>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let user_id = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| resources.validator.decode_bearer(h).ok())
        .map(|u| u.id);

    let response = next.run(request).await;

    info!(
        %method,
        path,
        user = user_id.as_deref().unwrap_or("-"),
        status = response.status().as_u16(),
        "request"
    );
    response
}
