//! Bulk import of crawled event JSON files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use eventboard_core::{EventInput, EventRecord, ImportSummary, EXPIRY_DAYS};
use eventboard_storage::traits::EventStore;
use eventboard_storage::StorageBackend;
use serde::Deserialize;
use serde_json::Value;

use crate::{EventService, ServiceError};

/// One crawled event as found on disk.
///
/// Accepts both the importer's own field names and the scraper's
/// (`venue`, `start_time`, `source`, `extracted_at`).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ImportRecord {
    #[serde(default, alias = "store_name", alias = "venue")]
    pub location_name: Option<String>,
    #[serde(default)]
    pub game_system: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, alias = "start_time")]
    pub time: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default, alias = "source")]
    pub source_type: Option<String>,
    #[serde(default, alias = "extracted_at")]
    pub last_seen_at: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Parse an ISO-8601 timestamp; naive timestamps are taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

impl ImportRecord {
    /// Validate and convert into an upsert-ready input.
    pub fn into_input(self, now: DateTime<Utc>) -> Result<EventInput, ServiceError> {
        let missing = |field: &str| ServiceError::InvalidInput(format!("missing field '{field}'"));
        let location = non_blank(self.location_name.as_ref()).ok_or_else(|| missing("location_name"))?;
        let game = non_blank(self.game_system.as_ref()).ok_or_else(|| missing("game_system"))?;
        let title = non_blank(self.title.as_ref()).ok_or_else(|| missing("title"))?;
        let raw_date = non_blank(self.date.as_ref()).ok_or_else(|| missing("date"))?;
        let date: NaiveDate = raw_date
            .parse()
            .map_err(|_| ServiceError::InvalidInput(format!("invalid date '{raw_date}'")))?;

        let time = non_blank(self.time.as_ref())
            .filter(|t| !t.eq_ignore_ascii_case("unknown"))
            .map(str::to_owned);
        let last_seen_at = non_blank(self.last_seen_at.as_ref())
            .and_then(parse_timestamp)
            .unwrap_or(now);

        let mut input = EventInput::new(location, game, title, date).with_last_seen_at(last_seen_at);
        input.time = time;
        input.description = self.description;
        input.source_url = self.source_url;
        input.source_type = self.source_type;
        Ok(input)
    }
}

/// Flatten a file's JSON into raw records: a single object, an array, or `{ "events": [...] }`.
fn records_from_value(value: Value) -> Result<Vec<Value>, ServiceError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("events") {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => {
                map.insert("events".to_owned(), other);
                Ok(vec![Value::Object(map)])
            },
            None => Ok(vec![Value::Object(map)]),
        },
        other => Err(ServiceError::InvalidInput(format!(
            "expected a JSON object or array, found {}",
            json_kind(&other)
        ))),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

async fn load_json_file(path: &Path) -> Result<Vec<Value>, ServiceError> {
    let content = tokio::fs::read_to_string(path).await?;
    records_from_value(serde_json::from_str(&content)?)
}

/// Sorted `*.json` files in `dir`. A missing directory has no files.
async fn json_files(dir: &Path) -> Result<Vec<PathBuf>, ServiceError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub struct ImportService {
    storage: Arc<StorageBackend>,
    events: Arc<EventService>,
}

impl ImportService {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>, events: Arc<EventService>) -> Self {
        Self { storage, events }
    }

    /// Import every `*.json` file in `data_dir`, then expire events older than
    /// `today - EXPIRY_DAYS`.
    pub async fn run_import(
        &self,
        data_dir: &Path,
        today: NaiveDate,
    ) -> Result<ImportSummary, ServiceError> {
        let files = json_files(data_dir).await?;
        if files.is_empty() {
            tracing::warn!(dir = %data_dir.display(), "no JSON files found");
            return Ok(ImportSummary::default());
        }

        let mut summary = ImportSummary::default();
        let now = Utc::now();
        for file in &files {
            tracing::info!(file = %file.display(), "importing");
            let records = match load_json_file(file).await {
                Ok(records) => records,
                Err(e) => {
                    tracing::error!(file = %file.display(), error = %e, "failed to load file");
                    continue;
                },
            };

            for raw in records {
                let input = serde_json::from_value::<ImportRecord>(raw)
                    .map_err(ServiceError::from)
                    .and_then(|record| record.into_input(now));
                let record = match input
                    .and_then(|i| EventRecord::from_input(&i, now).map_err(ServiceError::from))
                {
                    Ok(record) => record,
                    Err(e) => {
                        tracing::warn!(file = %file.display(), error = %e, "skipping record");
                        summary.errors += 1;
                        continue;
                    },
                };
                summary.processed += 1;
                match self.events.upsert_record(&record).await {
                    Ok((_, true)) => summary.created += 1,
                    Ok((_, false)) => summary.updated += 1,
                    Err(e) => {
                        tracing::warn!(title = %record.title, error = %e, "upsert failed");
                        summary.errors += 1;
                    },
                }
            }
        }

        let cutoff = today - Duration::days(EXPIRY_DAYS);
        summary.expired = self.storage.expire_old_events(cutoff).await?;
        tracing::info!(
            processed = summary.processed,
            created = summary.created,
            updated = summary.updated,
            expired = summary.expired,
            errors = summary.errors,
            "import complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventboard_core::EventQuery;
    use serde_json::json;
    use tempfile::TempDir;

    fn services() -> (ImportService, Arc<StorageBackend>) {
        let storage = Arc::new(StorageBackend::new_memory());
        let events = Arc::new(EventService::new(Arc::clone(&storage)));
        (ImportService::new(Arc::clone(&storage), events), storage)
    }

    fn write(dir: &TempDir, name: &str, value: &Value) {
        std::fs::write(dir.path().join(name), serde_json::to_string(value).unwrap()).unwrap();
    }

    fn today() -> NaiveDate {
        "2026-03-15".parse().unwrap()
    }

    fn record(title: &str, date: &str) -> Value {
        json!({
            "location_name": "Game Vault",
            "game_system": "Warhammer 40,000",
            "title": title,
            "date": date,
            "time": "18:00",
            "source_url": "https://example.com/e"
        })
    }

    #[tokio::test]
    async fn empty_directory_returns_zeros() {
        let (svc, _) = services();
        let dir = TempDir::new().unwrap();
        let summary = svc.run_import(dir.path(), today()).await.unwrap();
        assert_eq!(summary, ImportSummary::default());
    }

    #[tokio::test]
    async fn missing_directory_returns_zeros() {
        let (svc, _) = services();
        let dir = TempDir::new().unwrap();
        let summary = svc.run_import(&dir.path().join("absent"), today()).await.unwrap();
        assert_eq!(summary, ImportSummary::default());
    }

    #[tokio::test]
    async fn imports_arrays_and_single_objects() {
        let (svc, storage) = services();
        let dir = TempDir::new().unwrap();
        write(&dir, "a.json", &json!([record("One", "2026-03-20"), record("Two", "2026-03-21")]));
        write(&dir, "b.json", &record("Three", "2026-03-22"));
        write(&dir, "notes.txt", &json!({"ignored": true}));

        let summary = svc.run_import(dir.path(), today()).await.unwrap();
        assert_eq!(summary.processed, 3);
        assert_eq!(summary.created, 3);
        assert_eq!(summary.errors, 0);
        assert_eq!(storage.list_events(&EventQuery::default()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn reimport_counts_updates() {
        let (svc, _) = services();
        let dir = TempDir::new().unwrap();
        write(&dir, "a.json", &json!([record("One", "2026-03-20")]));
        svc.run_import(dir.path(), today()).await.unwrap();
        let summary = svc.run_import(dir.path(), today()).await.unwrap();
        assert_eq!(summary.created, 0);
        assert_eq!(summary.updated, 1);
    }

    #[tokio::test]
    async fn invalid_records_are_counted_as_errors() {
        let (svc, _) = services();
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "a.json",
            &json!([
                record("Good", "2026-03-20"),
                {"game_system": "40K", "title": "No location", "date": "2026-03-20"},
                record("Bad date", "20/03/2026"),
                {"location_name": "Vault", "game_system": "40K", "title": 7, "date": "2026-03-20"}
            ]),
        );
        let summary = svc.run_import(dir.path(), today()).await.unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.errors, 3);
    }

    #[tokio::test]
    async fn unreadable_file_is_skipped() {
        let (svc, _) = services();
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        write(&dir, "ok.json", &json!([record("One", "2026-03-20")]));
        let summary = svc.run_import(dir.path(), today()).await.unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.errors, 0);
    }

    #[tokio::test]
    async fn old_events_are_expired_after_import() {
        let (svc, storage) = services();
        let dir = TempDir::new().unwrap();
        // Cutoff is 2026-02-13.
        write(&dir, "a.json", &json!([record("Old", "2026-02-01"), record("Recent", "2026-02-20")]));
        let summary = svc.run_import(dir.path(), today()).await.unwrap();
        assert_eq!(summary.expired, 1);
        let listed = storage.list_events(&EventQuery::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].event.title, "Recent");
    }

    #[tokio::test]
    async fn accepts_scraper_envelope() {
        let (svc, storage) = services();
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "gaming_events_20260310_120000.json",
            &json!({
                "scraped_at": "2026-03-10T12:00:00",
                "total_events": 2,
                "events": [
                    {
                        "title": "FNM Draft",
                        "game_system": "MTG",
                        "venue": "Dragon's Den",
                        "date": "2026-03-20",
                        "start_time": "Unknown",
                        "source": "facebook",
                        "extracted_at": "2026-03-10T11:59:00.123456"
                    },
                    {
                        "title": "Kill Team Night",
                        "game_system": "Warhammer",
                        "venue": "Game Vault",
                        "date": "2026-03-21",
                        "start_time": "7:00 PM",
                        "source": "discord",
                        "source_url": "https://discord.com/channels/1/2/3",
                        "extracted_at": "2026-03-10T11:59:30"
                    }
                ]
            }),
        );
        let summary = svc.run_import(dir.path(), today()).await.unwrap();
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.errors, 0);

        let events = storage.list_events(&EventQuery::default()).await.unwrap();
        assert_eq!(events[0].location.name, "Dragon's Den");
        assert_eq!(events[0].event.start_time, None);
        assert_eq!(events[0].event.source_type.as_deref(), Some("facebook"));
        assert_eq!(events[1].event.start_time.as_deref(), Some("7:00 PM"));
    }

    #[test]
    fn record_falls_back_to_now_for_bad_timestamp() {
        let now = Utc::now();
        let raw = ImportRecord {
            location_name: Some("Vault".to_owned()),
            game_system: Some("40K".to_owned()),
            title: Some("T".to_owned()),
            date: Some("2026-03-20".to_owned()),
            last_seen_at: Some("yesterday-ish".to_owned()),
            ..ImportRecord::default()
        };
        assert_eq!(raw.into_input(now).unwrap().last_seen_at, Some(now));
    }

    #[test]
    fn record_parses_offset_timestamp() {
        let raw = ImportRecord {
            location_name: Some("Vault".to_owned()),
            game_system: Some("40K".to_owned()),
            title: Some("T".to_owned()),
            date: Some("2026-03-20".to_owned()),
            last_seen_at: Some("2026-03-10T12:00:00+02:00".to_owned()),
            ..ImportRecord::default()
        };
        let seen = raw.into_input(Utc::now()).unwrap().last_seen_at.unwrap();
        assert_eq!(seen.to_rfc3339(), "2026-03-10T10:00:00+00:00");
    }
}
