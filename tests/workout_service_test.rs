// ABOUTME: Integration tests for workout/exercise orchestration
// ABOUTME: Covers cascade integrity, ownership isolation, compensation, and delete semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{memory_resources, workout_payload};
use fittrack_server::errors::AppError;
use fittrack_server::models::{AuthenticatedUser, WorkoutCreate};
use fittrack_server::services::WorkoutService;
use fittrack_server::store::{MemoryStore, Query};

fn user(id: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        id: id.to_owned(),
        email: None,
    }
}

fn payload(title: &str, exercises: &[&str]) -> WorkoutCreate {
    serde_json::from_value(workout_payload(title, "2026-08-25", exercises)).unwrap()
}

fn service(store: &MemoryStore) -> WorkoutService {
    WorkoutService::new(fittrack_server::store::Datastore::Memory(store.clone()))
}

#[tokio::test]
async fn create_returns_workout_joined_with_exercises() {
    let (_, store) = memory_resources();
    let service = service(&store);

    let workout = service
        .create(&user("alice"), payload("Push day", &["Bench", "OHP", "Dips"]))
        .await
        .unwrap();

    assert_eq!(workout.user_id, "alice");
    assert_eq!(workout.title, "Push day");
    assert_eq!(workout.exercises.len(), 3);
    for exercise in &workout.exercises {
        assert_eq!(exercise.workout_id, workout.id);
    }
}

#[tokio::test]
async fn list_is_owner_scoped_and_date_descending() {
    let (_, store) = memory_resources();
    let service = service(&store);
    let alice = user("alice");

    for (title, date) in [("Older", "2026-08-01"), ("Newer", "2026-08-20")] {
        let p: WorkoutCreate =
            serde_json::from_value(workout_payload(title, date, &["Squat"])).unwrap();
        service.create(&alice, p).await.unwrap();
    }
    service
        .create(&user("bob"), payload("Bob's workout", &[]))
        .await
        .unwrap();

    let workouts = service.list(&alice).await.unwrap();
    assert_eq!(workouts.len(), 2);
    assert_eq!(workouts[0].title, "Newer");
    assert_eq!(workouts[1].title, "Older");
}

#[tokio::test]
async fn get_and_delete_hide_foreign_workouts() {
    let (_, store) = memory_resources();
    let service = service(&store);

    let workout = service
        .create(&user("alice"), payload("Leg day", &["Squat"]))
        .await
        .unwrap();

    let bob = user("bob");
    assert!(matches!(
        service.get(&bob, &workout.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.delete(&bob, &workout.id).await,
        Err(AppError::NotFound(_))
    ));

    // still there for the owner
    let fetched = service.get(&user("alice"), &workout.id).await.unwrap();
    assert_eq!(fetched.id, workout.id);
}

#[tokio::test]
async fn failed_exercise_insert_rolls_back_the_workout() {
    let (_, store) = memory_resources();
    let service = service(&store);
    let alice = user("alice");

    let baseline = service
        .create(&alice, payload("Keeps", &["Squat"]))
        .await
        .unwrap();

    store.fail_next_inserts("exercises", 1).await;
    let result = service
        .create(&alice, payload("Rolls back", &["Bench", "Rows"]))
        .await;
    assert!(matches!(result, Err(AppError::Persistence { .. })));

    let workouts = service.list(&alice).await.unwrap();
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0].id, baseline.id);
}

#[tokio::test]
async fn delete_cascades_to_exercises() {
    let (_, store) = memory_resources();
    let service = service(&store);
    let alice = user("alice");

    let workout = service
        .create(&alice, payload("Pull day", &["Rows", "Curls"]))
        .await
        .unwrap();
    service.delete(&alice, &workout.id).await.unwrap();

    assert!(matches!(
        service.get(&alice, &workout.id).await,
        Err(AppError::NotFound(_))
    ));
    let leftovers = store
        .execute(Query::table("exercises").eq("workout_id", workout.id.as_str()).select())
        .await;
    assert!(leftovers.data.is_empty());
}

#[tokio::test]
async fn create_rejects_invalid_payload_before_any_insert() {
    let (_, store) = memory_resources();
    let service = service(&store);

    let mut invalid = payload("", &["Squat"]);
    invalid.title = String::new();
    assert!(matches!(
        service.create(&user("alice"), invalid).await,
        Err(AppError::InvalidInput(_))
    ));

    let rows = store.execute(Query::table("workouts").select()).await;
    assert!(rows.data.is_empty());
}

#[tokio::test]
async fn exercises_survive_round_trip_with_fields() {
    let (_, store) = memory_resources();
    let service = service(&store);
    let alice = user("alice");

    let created = service
        .create(&alice, payload("Full body", &["Deadlift"]))
        .await
        .unwrap();
    let fetched = service.get(&alice, &created.id).await.unwrap();
    let exercise = &fetched.exercises[0];
    assert_eq!(exercise.name, "Deadlift");
    assert_eq!(exercise.sets, Some(3));
    assert_eq!(exercise.reps, Some(10));
    assert_eq!(exercise.weight_kg, Some(60.0));
    assert_eq!(fetched.notes.as_deref(), Some("felt strong"));
    assert_eq!(
        fetched.date.map(|d| d.to_string()).as_deref(),
        Some("2026-08-25")
    );
}
