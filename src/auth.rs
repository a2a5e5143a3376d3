// ABOUTME: Bearer token validation producing an authenticated principal
// ABOUTME: Verifies HS256-signed claims, with a documented degraded mode when no secret is set
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! Token authentication
//!
//! [`TokenValidator`] turns a raw `Authorization` header value into an
//! [`AuthenticatedUser`] or fails. It is a pure decode-and-validate step with
//! no I/O; route handlers run it before any service logic.
//!
//! # Degraded mode
//!
//! When no signing secret is configured the validator performs **no
//! signature check**: the sentinel token `dummy` maps to a fixed guest
//! identity, and any other non-empty token is taken verbatim as the user id.
//! This exists for local development and tests only and is unsafe for
//! production.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::errors::{AppError, AppResult};
use crate::models::AuthenticatedUser;

/// Sentinel token accepted in degraded mode
pub const GUEST_TOKEN: &str = "dummy";

/// Fixed identity the sentinel token maps to
pub const GUEST_USER_ID: &str = "guest";

/// Email of the fixed guest identity
pub const GUEST_EMAIL: &str = "guest@local";

/// Claim set carried by signed tokens
#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
    email: Option<String>,
}

/// Validates bearer credentials against an optional symmetric signing secret
#[derive(Clone)]
pub struct TokenValidator {
    secret: Option<String>,
}

impl TokenValidator {
    /// Create a validator; `None` selects degraded (unsigned) mode
    #[must_use]
    pub const fn new(secret: Option<String>) -> Self {
        Self { secret }
    }

    /// Whether signed verification is active
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        self.secret.is_some()
    }

    /// Decode a raw `Authorization` header value into a principal
    ///
    /// # Errors
    /// - `MalformedCredential` when the scheme is not `bearer` or the token is empty
    /// - `ExpiredCredential` when the claim set's expiry has passed
    /// - `InvalidCredential` for any other verification failure or a missing subject
    pub fn decode_bearer(&self, header_value: &str) -> AppResult<AuthenticatedUser> {
        let mut parts = header_value.trim().splitn(2, char::is_whitespace);
        let scheme = parts.next().unwrap_or_default();
        let token = parts.next().unwrap_or_default().trim();

        if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
            return Err(AppError::malformed_credential(format!(
                "unsupported scheme {scheme:?} or empty token"
            )));
        }

        match &self.secret {
            None => Ok(Self::decode_unsigned(token)),
            Some(secret) => Self::decode_signed(token, secret),
        }
    }

    /// Degraded mode: token string is the identity
    fn decode_unsigned(token: &str) -> AuthenticatedUser {
        if token == GUEST_TOKEN {
            AuthenticatedUser {
                id: GUEST_USER_ID.to_owned(),
                email: Some(GUEST_EMAIL.to_owned()),
            }
        } else {
            AuthenticatedUser {
                id: token.to_owned(),
                email: None,
            }
        }
    }

    fn decode_signed(token: &str, secret: &str) -> AppResult<AuthenticatedUser> {
        let key = DecodingKey::from_secret(secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);

        let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::ExpiredCredential,
            _ => AppError::invalid_credential(format!("token verification failed: {e}")),
        })?;

        let sub = data
            .claims
            .sub
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::invalid_credential("token payload missing sub claim"))?;

        Ok(AuthenticatedUser {
            id: sub,
            email: data.claims.email,
        })
    }
}
