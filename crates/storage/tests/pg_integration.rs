//! Integration tests for PgStorage.
//! Run with: DATABASE_URL=... cargo test -p eventboard-storage -- --ignored pg_

#![allow(clippy::unwrap_used, reason = "integration test code")]

use chrono::{NaiveDate, Utc};
use eventboard_core::{EventInput, EventQuery, EventRecord, ReviewAction, SubmissionStatus, SubscriptionFilter};
use eventboard_storage::traits::{EventStore, GameSystemStore, LocationStore, SubscriberStore};
use eventboard_storage::PgStorage;
use uuid::Uuid;

async fn create_pg_storage() -> PgStorage {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for PgStorage integration tests");
    PgStorage::new(&url).await.expect("Failed to connect to PostgreSQL")
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

fn record(location: &str, game: &str, title: &str, date: NaiveDate) -> EventRecord {
    let input = EventInput::new(location, game, title, date).with_source("https://example.com/e", "discord");
    EventRecord::from_input(&input, Utc::now()).unwrap()
}

fn far_future() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 6, 1).unwrap()
}

// ── Catalog ─────────────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_get_or_create_location_is_idempotent() {
    let storage = create_pg_storage().await;
    let name = unique("Vault");
    let a = storage.get_or_create_location(&name).await.unwrap();
    let b = storage.get_or_create_location(&name).await.unwrap();
    assert_eq!(a.id, b.id);
    assert!(storage.list_locations().await.unwrap().iter().any(|l| l.name == name));
}

#[tokio::test]
#[ignore]
async fn pg_game_system_slug_collision_gets_suffix() {
    let storage = create_pg_storage().await;
    let base = unique("Kill Team");
    let a = storage.get_or_create_game_system(&base).await.unwrap();
    let b = storage.get_or_create_game_system(&format!("{base}!")).await.unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(b.slug, format!("{}-1", a.slug));
}

// ── Events ──────────────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_upsert_dedups_and_revives() {
    let storage = create_pg_storage().await;
    let loc = storage.get_or_create_location(&unique("Vault")).await.unwrap();
    let game = storage.get_or_create_game_system(&unique("40K")).await.unwrap();
    let rec = record(&loc.name, &game.name, "Old League", NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());

    let (first, created) = storage.upsert_event(&rec, loc.id, game.id).await.unwrap();
    assert!(created);
    assert!(storage.expire_old_events(NaiveDate::from_ymd_opt(2000, 2, 1).unwrap()).await.unwrap() >= 1);

    let (again, created) = storage.upsert_event(&rec, loc.id, game.id).await.unwrap();
    assert!(!created);
    assert_eq!(first.id, again.id);
    assert!(!again.is_expired);
}

#[tokio::test]
#[ignore]
async fn pg_list_events_filters_by_location_and_game() {
    let storage = create_pg_storage().await;
    let loc = storage.get_or_create_location(&unique("Den")).await.unwrap();
    let game = storage.get_or_create_game_system(&unique("AoS")).await.unwrap();
    let rec = record(&loc.name, &game.name, "Skirmish", far_future());
    storage.upsert_event(&rec, loc.id, game.id).await.unwrap();

    let query = EventQuery {
        location_id: Some(loc.id),
        game_system_ids: vec![game.id],
        ..EventQuery::default()
    };
    let events = storage.list_events(&query).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].location.name, loc.name);
    assert_eq!(events[0].game_system.slug, game.slug);

    let other = EventQuery { game_system_ids: vec![-1], location_id: Some(loc.id), ..EventQuery::default() };
    assert!(storage.list_events(&other).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn pg_submit_and_reject() {
    let storage = create_pg_storage().await;
    let loc = storage.get_or_create_location(&unique("Tavern")).await.unwrap();
    let game = storage.get_or_create_game_system(&unique("Kill Team")).await.unwrap();
    let rec = record(&loc.name, &game.name, "Community Night", far_future());

    let event = storage.submit_event(&rec, loc.id, game.id, "auth0|tester").await.unwrap();
    assert_eq!(event.submission_status, Some(SubmissionStatus::PendingReview));
    assert!(storage.pending_events().await.unwrap().iter().any(|e| e.event.id == event.id));

    let rejected = storage.review_event(event.id, ReviewAction::Reject).await.unwrap();
    assert_eq!(rejected.submission_status, Some(SubmissionStatus::Rejected));
    assert!(rejected.is_expired);

    assert!(storage.review_event(-1, ReviewAction::Approve).await.unwrap_err().is_not_found());
}

// ── Subscribers ─────────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_subscriber_round_trip() {
    let storage = create_pg_storage().await;
    let email = format!("{}@example.com", Uuid::new_v4());
    let loc = storage.get_or_create_location(&unique("Vault")).await.unwrap();
    let game = storage.get_or_create_game_system(&unique("40K")).await.unwrap();
    storage.upsert_event(&record(&loc.name, &game.name, "Upcoming", far_future()), loc.id, game.id).await.unwrap();

    let sub = storage
        .upsert_subscriber(&email, &SubscriptionFilter::new(vec![loc.id], vec![]))
        .await
        .unwrap();
    assert_eq!(sub.filter.location_ids, vec![loc.id]);

    let events = storage.events_for_subscriber(&sub.filter, Utc::now().date_naive()).await.unwrap();
    assert!(events.iter().any(|e| e.event.location_id == loc.id));

    assert!(storage.deactivate_subscriber(&email).await.unwrap());
    assert!(!storage.active_subscribers().await.unwrap().iter().any(|s| s.email == email));
}
