// ABOUTME: Main library entry point for the FitTrack Pro backend
// ABOUTME: Workout tracking REST API with AI-assisted workout analysis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

#![deny(unsafe_code)]

//! # FitTrack Server
//!
//! Backend API for a fitness-tracking application: it authenticates users,
//! stores workout and exercise records, and forwards workout data to a
//! generative-AI provider for narrative analysis.
//!
//! ## Architecture
//!
//! - **auth**: bearer-token validation producing an identified principal
//! - **store**: relational store abstraction with an in-memory emulation and
//!   a remote HTTP backend
//! - **ai**: generative-AI client with structured-response validation and a
//!   single format retry
//! - **services**: workout/exercise and analysis orchestration
//! - **routes** / **server**: thin axum handlers and the middleware stack
//!
//! Each inbound request is handled independently; the only shared mutable
//! state is the backing store. Degraded modes (in-memory store, unsigned
//! auth, stubbed AI) activate when their configuration is absent and are
//! logged at startup.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fittrack_server::config::ServerConfig;
//! use fittrack_server::errors::AppResult;
//! use fittrack_server::resources::ServerResources;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = Arc::new(ServerResources::from_config(config)?);
//!     fittrack_server::server::serve(resources).await
//! }
//! ```

/// Generative-AI analysis client
pub mod ai;

/// Bearer-token authentication
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// Application error taxonomy
pub mod errors;

/// Domain data models
pub mod models;

/// Request rate limiting
pub mod rate_limiting;

/// Dependency-injected server resources
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Router assembly and serving
pub mod server;

/// Workout and analysis services
pub mod services;

/// Relational store abstraction
pub mod store;
