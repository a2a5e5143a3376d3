// ABOUTME: Application error taxonomy and HTTP response mapping
// ABOUTME: Defines AppError variants, constructor helpers, and the axum IntoResponse translation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! Application error handling
//!
//! Every failure in the system maps to one [`AppError`] variant, and every
//! variant maps to a stable status code and a generic response message.
//! Internal detail (store error payloads, provider responses, token decode
//! failures) is carried alongside for logging and is never serialized into a
//! response body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Result alias used across the crate
pub type AppResult<T> = Result<T, AppError>;

/// Unified application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Authorization header is missing the bearer scheme or carries no token
    #[error("Invalid authorization header")]
    MalformedCredential(String),

    /// Signed credential has passed its expiry
    #[error("Token expired")]
    ExpiredCredential,

    /// Credential failed verification (bad signature, malformed claims, no subject)
    #[error("Invalid token")]
    InvalidCredential(String),

    /// Resource absent or not owned by the caller; the two are indistinguishable
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Ownership check failed on a path that deliberately hides existence
    #[error("Forbidden")]
    Forbidden,

    /// Request payload failed validation
    #[error("{0}")]
    InvalidInput(String),

    /// Backing-store operation failed
    #[error("{message}")]
    Persistence {
        /// Generic message returned to the caller
        message: &'static str,
        /// Store-reported detail, logged only
        detail: String,
        /// Status code for the response; read paths report 400, writes 500
        status: StatusCode,
    },

    /// AI provider call failed (network, HTTP error, empty response)
    #[error("AI service failed")]
    AiServiceFailure(String),

    /// AI provider replied but the payload never matched the expected schema
    #[error("AI service returned unexpected format")]
    AiServiceBadFormat(String),

    /// Client exceeded the request quota for a rate-limited endpoint
    #[error("Too many requests")]
    RateLimited,

    /// Unexpected internal failure
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Validation error for request payloads
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Malformed `Authorization` header
    pub fn malformed_credential(detail: impl Into<String>) -> Self {
        Self::MalformedCredential(detail.into())
    }

    /// Credential verification failure
    pub fn invalid_credential(detail: impl Into<String>) -> Self {
        Self::InvalidCredential(detail.into())
    }

    /// Store failure on a write path (reported as 500)
    pub fn persistence(message: &'static str, detail: impl Into<String>) -> Self {
        Self::Persistence {
            message,
            detail: detail.into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Store failure on a read path (reported as 400, matching the REST contract)
    pub fn store_rejected(message: &'static str, detail: impl Into<String>) -> Self {
        Self::Persistence {
            message,
            detail: detail.into(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    /// AI provider integration failure
    pub fn ai_service(detail: impl Into<String>) -> Self {
        Self::AiServiceFailure(detail.into())
    }

    /// AI provider produced output that never parsed/validated
    pub fn ai_bad_format(detail: impl Into<String>) -> Self {
        Self::AiServiceBadFormat(detail.into())
    }

    /// Unexpected internal failure
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    /// Status code this error maps to
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedCredential(_) | Self::ExpiredCredential | Self::InvalidCredential(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Persistence { status, .. } => *status,
            Self::AiServiceFailure(_) | Self::AiServiceBadFormat(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Internal detail for logging, when the variant carries any
    fn detail(&self) -> Option<&str> {
        match self {
            Self::MalformedCredential(d)
            | Self::InvalidCredential(d)
            | Self::AiServiceFailure(d)
            | Self::AiServiceBadFormat(d)
            | Self::Internal(d) => Some(d),
            Self::Persistence { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let Some(detail) = self.detail() {
            error!(status = status.as_u16(), error = %self, detail, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn store_errors_split_read_and_write_status() {
        assert_eq!(
            AppError::store_rejected("Failed to list workouts", "boom").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::persistence("Failed to save exercises", "boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn auth_errors_are_unauthorized() {
        for err in [
            AppError::malformed_credential("no scheme"),
            AppError::ExpiredCredential,
            AppError::invalid_credential("bad signature"),
        ] {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
    }
}
