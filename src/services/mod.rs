// ABOUTME: Service layer organization for workout and AI analysis orchestration
// ABOUTME: Shared store-response checking lives here so every execute is verified
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! Service layer
//!
//! Services own the orchestration between the store abstraction and the AI
//! client. Route handlers stay thin: they authenticate, deserialize, call a
//! service, and serialize the result.

use crate::errors::{AppError, AppResult};
use crate::store::{Row, StoreResponse};

pub mod analysis;
pub mod workouts;

pub use analysis::AnalysisService;
pub use workouts::WorkoutService;

/// Check a store response, translating a populated `error` field
///
/// Every `execute()` result flows through here so no store fault goes
/// unchecked.
pub(crate) fn rows(
    response: StoreResponse,
    on_error: impl FnOnce(String) -> AppError,
) -> AppResult<Vec<Row>> {
    match response.error {
        Some(detail) => Err(on_error(detail)),
        None => Ok(response.data),
    }
}
