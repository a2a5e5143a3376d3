// ABOUTME: Dependency-injected resource bundle shared by all route handlers
// ABOUTME: Constructed once at process start and held for the process lifetime
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! Server resources
//!
//! One explicitly constructed bundle replaces module-level singletons: the
//! datastore, the AI client, the token validator, and the guest-endpoint
//! limiter are built from configuration at startup and injected into every
//! router as shared axum state. Nothing re-initializes behind the scenes.

use std::time::Duration;

use crate::ai::AiClient;
use crate::auth::TokenValidator;
use crate::config::ServerConfig;
use crate::errors::AppResult;
use crate::rate_limiting::{FixedWindowLimiter, GUEST_REQUESTS_PER_MINUTE};
use crate::store::Datastore;

/// Shared server dependencies
pub struct ServerResources {
    /// Loaded configuration
    pub config: ServerConfig,
    /// Active store backend
    pub store: Datastore,
    /// AI analysis client
    pub ai: AiClient,
    /// Bearer credential validator
    pub validator: TokenValidator,
    /// Limiter for the guest sign-in endpoint
    pub guest_limiter: FixedWindowLimiter,
    /// Shared HTTP client for the remote auth service
    pub http: reqwest::Client,
}

impl ServerResources {
    /// Wire all dependencies from configuration
    ///
    /// # Errors
    /// Returns an error when the shared HTTP client cannot be constructed.
    pub fn from_config(config: ServerConfig) -> AppResult<Self> {
        let store = Datastore::from_config(&config);
        let ai = AiClient::from_config(&config);
        let validator = TokenValidator::new(config.jwt_secret.clone());
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.store_timeout_secs))
            .build()
            .map_err(|e| crate::errors::AppError::internal(format!("http client init failed: {e}")))?;

        Ok(Self {
            config,
            store,
            ai,
            validator,
            guest_limiter: FixedWindowLimiter::new(
                GUEST_REQUESTS_PER_MINUTE,
                Duration::from_secs(60),
            ),
            http,
        })
    }
}
