// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Components receive config by injection and never read the environment directly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! Server configuration
//!
//! All environment access happens in [`ServerConfig::from_env`]. Absent
//! optional configuration selects a documented degraded mode instead of
//! failing startup:
//!
//! - no `DATABASE_URL`/`DATABASE_SERVICE_KEY` pair: in-memory store
//! - no `JWT_SECRET`: unsigned-token auth (unsafe for production)
//! - no `GEMINI_API_KEY`: stubbed AI responses

use std::env;

use crate::errors::{AppError, AppResult};

/// Default HTTP port when `HTTP_PORT` is unset
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default timeout for backing-store HTTP calls, seconds
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

/// Default timeout for AI provider calls, seconds
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;

/// Remote relational database endpoint and service credential
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Base URL of the database service
    pub url: String,
    /// Service-role key sent with every request
    pub service_key: String,
}

/// Server-side guest account credentials for `POST /auth/guest`
#[derive(Debug, Clone)]
pub struct GuestCredentials {
    /// Guest account email
    pub email: String,
    /// Guest account password
    pub password: String,
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Allowed CORS origin; `None` leaves CORS unconfigured
    pub frontend_url: Option<String>,
    /// Remote database endpoint; `None` selects the in-memory store
    pub database: Option<DatabaseConfig>,
    /// Symmetric signing secret for bearer tokens; `None` selects degraded auth
    pub jwt_secret: Option<String>,
    /// AI provider credential; `None` selects stubbed analysis responses
    pub gemini_api_key: Option<String>,
    /// Guest account for the remote auth service
    pub guest_credentials: Option<GuestCredentials>,
    /// Timeout for backing-store HTTP calls, seconds
    pub store_timeout_secs: u64,
    /// Timeout for AI provider calls, seconds
    pub ai_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    /// Returns an error when a present variable fails to parse (e.g. a
    /// non-numeric `HTTP_PORT`). Absent optional variables never fail.
    pub fn from_env() -> AppResult<Self> {
        let http_port = match env_trimmed("HTTP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::internal(format!("invalid HTTP_PORT {raw:?}: {e}")))?,
            None => DEFAULT_HTTP_PORT,
        };

        let database = match (env_trimmed("DATABASE_URL"), env_trimmed("DATABASE_SERVICE_KEY")) {
            (Some(url), Some(service_key)) => Some(DatabaseConfig { url, service_key }),
            _ => None,
        };

        let guest_credentials = match (env_trimmed("GUEST_EMAIL"), env_trimmed("GUEST_PASSWORD")) {
            (Some(email), Some(password)) => Some(GuestCredentials { email, password }),
            _ => None,
        };

        Ok(Self {
            http_port,
            frontend_url: env_trimmed("FRONTEND_URL"),
            database,
            jwt_secret: env_trimmed("JWT_SECRET"),
            gemini_api_key: env_trimmed("GEMINI_API_KEY"),
            guest_credentials,
            store_timeout_secs: parse_secs("STORE_TIMEOUT_SECS", DEFAULT_STORE_TIMEOUT_SECS)?,
            ai_timeout_secs: parse_secs("AI_TIMEOUT_SECS", DEFAULT_AI_TIMEOUT_SECS)?,
        })
    }

    /// Configuration suitable for tests: everything degraded, no env reads
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            http_port: 0,
            frontend_url: None,
            database: None,
            jwt_secret: None,
            gemini_api_key: None,
            guest_credentials: None,
            store_timeout_secs: DEFAULT_STORE_TIMEOUT_SECS,
            ai_timeout_secs: DEFAULT_AI_TIMEOUT_SECS,
        }
    }
}

/// Read an env var, treating unset and whitespace-only values as absent
fn env_trimmed(name: &str) -> Option<String> {
    env::var(name).ok().and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    })
}

fn parse_secs(name: &str, default: u64) -> AppResult<u64> {
    match env_trimmed(name) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|e| AppError::internal(format!("invalid {name} {raw:?}: {e}"))),
        None => Ok(default),
    }
}
