// ABOUTME: Shared test utilities for integration tests
// ABOUTME: In-memory resource wiring, a scripted AI backend, and an in-process request helper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code, missing_docs)]

//! Shared test utilities for `fittrack_server`
//!
//! Every test runs against the in-memory store; the scripted AI backend
//! stands in for the generative provider.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::ServiceExt;

use fittrack_server::ai::{AiClient, GenerativeBackend};
use fittrack_server::auth::TokenValidator;
use fittrack_server::config::ServerConfig;
use fittrack_server::errors::{AppError, AppResult};
use fittrack_server::rate_limiting::{FixedWindowLimiter, GUEST_REQUESTS_PER_MINUTE};
use fittrack_server::resources::ServerResources;
use fittrack_server::store::{Datastore, MemoryStore};

/// Build resources over a fresh in-memory store with a stubbed AI client
pub fn memory_resources() -> (Arc<ServerResources>, MemoryStore) {
    resources_with(AiClient::disabled(), None)
}

/// Build resources with an explicit AI client and optional signing secret
pub fn resources_with(
    ai: AiClient,
    jwt_secret: Option<String>,
) -> (Arc<ServerResources>, MemoryStore) {
    let store = MemoryStore::new();
    let resources = ServerResources {
        config: ServerConfig::for_testing(),
        store: Datastore::Memory(store.clone()),
        ai,
        validator: TokenValidator::new(jwt_secret),
        guest_limiter: FixedWindowLimiter::new(
            GUEST_REQUESTS_PER_MINUTE,
            Duration::from_secs(60),
        ),
        http: reqwest::Client::new(),
    };
    (Arc::new(resources), store)
}

/// AI backend that replays a scripted sequence of replies and records prompts
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<AppResult<String>>>,
    /// Prompts received, in call order
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<AppResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub async fn call_count(&self) -> usize {
        self.prompts.lock().await.len()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        self.prompts.lock().await.push(prompt.to_owned());
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(AppError::ai_service("script exhausted")))
    }
}

/// A well-formed provider reply with the given summary and score
pub fn assessment_json(summary: &str, score: i64) -> String {
    json!({
        "summary": summary,
        "strengths": ["consistency"],
        "improvements": ["more rest"],
        "next_session_tips": "hydrate",
        "overall_score": score,
    })
    .to_string()
}

/// A workout creation payload with the given title, date, and exercise names
pub fn workout_payload(title: &str, date: &str, exercises: &[&str]) -> Value {
    json!({
        "title": title,
        "date": date,
        "duration_minutes": 45,
        "notes": "felt strong",
        "exercises": exercises
            .iter()
            .map(|name| json!({ "name": name, "sets": 3, "reps": 10, "weight_kg": 60.0 }))
            .collect::<Vec<_>>(),
    })
}

/// Send one in-process request through the router
pub async fn send(
    router: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
