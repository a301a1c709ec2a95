//! Test utilities and module declarations for storage tests.

use chrono::{DateTime, NaiveDate, Utc};
use eventboard_core::{EventInput, EventRecord};

use crate::traits::{GameSystemStore, LocationStore};
use crate::MemoryStorage;

mod review_tests;

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn make_record(input: &EventInput, seen: DateTime<Utc>) -> EventRecord {
    EventRecord::from_input(input, seen).unwrap()
}

pub fn make_input(title: &str, on: &str, time: Option<&str>) -> EventInput {
    let input = EventInput::new("Game Vault", "Warhammer 40,000", title, date(on))
        .with_source("https://example.com/events/1", "facebook");
    match time {
        Some(t) => input.with_time(t),
        None => input,
    }
}

/// Location and game system ids for the default test input.
#[expect(clippy::unwrap_used, reason = "test code")]
pub async fn default_relations(storage: &MemoryStorage) -> (i64, i64) {
    let location = storage.get_or_create_location("Game Vault").await.unwrap();
    let game = storage.get_or_create_game_system("Warhammer 40,000").await.unwrap();
    (location.id, game.id)
}
