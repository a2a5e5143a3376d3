// ABOUTME: End-to-end tests through the assembled axum router
// ABOUTME: Covers status codes, auth rejection, guest rate limiting, and response bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{
    assessment_json, memory_resources, resources_with, send, workout_payload, ScriptedBackend,
};
use fittrack_server::ai::{AiClient, NO_KEY_NARRATIVE};
use fittrack_server::rate_limiting::GUEST_REQUESTS_PER_MINUTE;
use fittrack_server::server::build_router;

#[tokio::test]
async fn health_probe_answers_on_root() {
    let (resources, _) = memory_resources();
    let router = build_router(resources);

    let (status, body) = send(&router, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("FitTrack Pro backend is running")
    );
}

#[tokio::test]
async fn guest_endpoint_issues_local_session() {
    let (resources, _) = memory_resources();
    let router = build_router(resources);

    let (status, body) = send(&router, Method::POST, "/auth/guest", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("access_token"), Some(&json!("dummy")));
    assert_eq!(body["user"]["id"], json!("guest"));
}

#[tokio::test]
async fn guest_endpoint_rate_limits_after_the_window_fills() {
    let (resources, _) = memory_resources();
    let router = build_router(resources);

    for _ in 0..GUEST_REQUESTS_PER_MINUTE {
        let (status, _) = send(&router, Method::POST, "/auth/guest", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&router, Method::POST, "/auth/guest", None, None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body.get("error").and_then(Value::as_str).is_some());
}

#[tokio::test]
async fn missing_authorization_header_is_unauthorized() {
    let (resources, _) = memory_resources();
    let router = build_router(resources);

    let (status, body) = send(&router, Method::GET, "/workouts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("error").and_then(Value::as_str).is_some());
}

#[tokio::test]
async fn bad_token_in_signed_mode_is_unauthorized() {
    let (resources, _) = resources_with(AiClient::disabled(), Some("secret".to_owned()));
    let router = build_router(resources);

    let (status, _) = send(&router, Method::GET, "/workouts", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn workout_crud_round_trip() {
    let (resources, _) = memory_resources();
    let router = build_router(resources);

    let (status, created) = send(
        &router,
        Method::POST,
        "/workouts",
        Some("alice"),
        Some(workout_payload("Push day", "2026-08-25", &["Bench", "OHP"])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_owned();
    assert_eq!(created["user_id"], json!("alice"));
    assert_eq!(created["exercises"].as_array().unwrap().len(), 2);

    let (status, listed) = send(&router, Method::GET, "/workouts", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, fetched) = send(
        &router,
        Method::GET,
        &format!("/workouts/{id}"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], json!("Push day"));

    let (status, _) = send(
        &router,
        Method::DELETE,
        &format!("/workouts/{id}"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &router,
        Method::GET,
        &format!("/workouts/{id}"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.get("error"), Some(&json!("Workout not found")));
}

#[tokio::test]
async fn invalid_workout_payload_is_bad_request() {
    let (resources, _) = memory_resources();
    let router = build_router(resources);

    let (status, body) = send(
        &router,
        Method::POST,
        "/workouts",
        Some("alice"),
        Some(json!({ "title": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("error").and_then(Value::as_str).is_some());
}

#[tokio::test]
async fn foreign_workout_reads_are_not_found() {
    let (resources, _) = memory_resources();
    let router = build_router(resources);

    let (_, created) = send(
        &router,
        Method::POST,
        "/workouts",
        Some("alice"),
        Some(workout_payload("Private", "2026-08-25", &["Squat"])),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = send(
        &router,
        Method::GET,
        &format!("/workouts/{id}"),
        Some("bob"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn analyze_stores_and_reads_back_with_expected_codes() {
    let backend = ScriptedBackend::new(vec![Ok(assessment_json("well done", 8))]);
    let (resources, _) = resources_with(AiClient::new(backend), None);
    let router = build_router(resources);

    let (_, created) = send(
        &router,
        Method::POST,
        "/workouts",
        Some("alice"),
        Some(workout_payload("Leg day", "2026-08-25", &["Squat"])),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_owned();

    let (status, analysis) = send(
        &router,
        Method::POST,
        &format!("/ai/analyze/{id}"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(analysis["summary"], json!("well done"));
    assert_eq!(analysis["overall_score"], json!(8));

    let (status, fetched) = send(
        &router,
        Method::GET,
        &format!("/ai/analysis/{id}"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["workout_id"], json!(id));
}

#[tokio::test]
async fn analyze_answers_forbidden_for_foreign_and_missing_workouts() {
    let (resources, _) = memory_resources();
    let router = build_router(resources);

    let (_, created) = send(
        &router,
        Method::POST,
        "/workouts",
        Some("alice"),
        Some(workout_payload("Hidden", "2026-08-25", &["Squat"])),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = send(
        &router,
        Method::POST,
        &format!("/ai/analyze/{id}"),
        Some("bob"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &router,
        Method::POST,
        "/ai/analyze/no-such-workout",
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn analysis_read_without_a_stored_row_is_not_found() {
    let (resources, _) = memory_resources();
    let router = build_router(resources);

    let (status, body) = send(
        &router,
        Method::GET,
        "/ai/analysis/anything",
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.get("error"), Some(&json!("Analysis not found")));
}

#[tokio::test]
async fn weekly_summary_wraps_the_narrative() {
    let (resources, _) = memory_resources();
    let router = build_router(resources);

    let (status, body) = send(
        &router,
        Method::GET,
        "/ai/weekly-summary",
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("narrative"), Some(&json!(NO_KEY_NARRATIVE)));
}

#[tokio::test]
async fn guest_sentinel_token_reaches_workout_routes() {
    let (resources, _) = memory_resources();
    let router = build_router(resources);

    let (status, created) = send(
        &router,
        Method::POST,
        "/workouts",
        Some("dummy"),
        Some(workout_payload("Guest session", "2026-08-25", &[])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["user_id"], json!("guest"));
}
