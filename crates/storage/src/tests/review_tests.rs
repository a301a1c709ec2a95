use chrono::Utc;
use eventboard_core::{EventQuery, ReviewAction, SubmissionStatus};

use super::{date, default_relations, make_input, make_record};
use crate::traits::EventStore;
use crate::MemoryStorage;

#[tokio::test]
async fn submission_is_pending_and_listed_for_review() {
    let storage = MemoryStorage::new();
    let (loc, game) = default_relations(&storage).await;
    let input = make_input("Community Skirmish", "2026-03-14", None);

    let event = storage
        .submit_event(&make_record(&input, Utc::now()), loc, game, "auth0|player")
        .await
        .unwrap();
    assert_eq!(event.submission_status, Some(SubmissionStatus::PendingReview));
    assert_eq!(event.submitted_by.as_deref(), Some("auth0|player"));

    let pending = storage.pending_events().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].event.id, event.id);
}

#[tokio::test]
async fn resubmitting_expired_event_revives_it() {
    let storage = MemoryStorage::new();
    let (loc, game) = default_relations(&storage).await;
    let input = make_input("Community Skirmish", "2026-01-03", None);

    storage.upsert_event(&make_record(&input, Utc::now()), loc, game).await.unwrap();
    storage.expire_old_events(date("2026-02-01")).await.unwrap();

    let event = storage
        .submit_event(&make_record(&input, Utc::now()), loc, game, "auth0|player")
        .await
        .unwrap();
    assert!(!event.is_expired);
    assert_eq!(event.submission_status, Some(SubmissionStatus::PendingReview));
}

#[tokio::test]
async fn approve_keeps_event_listed() {
    let storage = MemoryStorage::new();
    let (loc, game) = default_relations(&storage).await;
    let input = make_input("Community Skirmish", "2026-03-14", None);
    let event = storage
        .submit_event(&make_record(&input, Utc::now()), loc, game, "auth0|player")
        .await
        .unwrap();

    let reviewed = storage.review_event(event.id, ReviewAction::Approve).await.unwrap();
    assert_eq!(reviewed.submission_status, Some(SubmissionStatus::Approved));
    assert!(!reviewed.is_expired);
    assert!(storage.pending_events().await.unwrap().is_empty());
    assert_eq!(storage.list_events(&EventQuery::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn reject_expires_event() {
    let storage = MemoryStorage::new();
    let (loc, game) = default_relations(&storage).await;
    let input = make_input("Community Skirmish", "2026-03-14", None);
    let event = storage
        .submit_event(&make_record(&input, Utc::now()), loc, game, "auth0|player")
        .await
        .unwrap();

    let reviewed = storage.review_event(event.id, ReviewAction::Reject).await.unwrap();
    assert_eq!(reviewed.submission_status, Some(SubmissionStatus::Rejected));
    assert!(reviewed.is_expired);
    assert!(storage.list_events(&EventQuery::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn review_of_missing_event_is_not_found() {
    let storage = MemoryStorage::new();
    let err = storage.review_event(999, ReviewAction::Approve).await.unwrap_err();
    assert!(err.is_not_found());
}
