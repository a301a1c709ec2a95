//! JSON snapshot files of scraped events.

use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDate};

use crate::error::ScraperError;
use crate::models::{GamingEvent, ScrapeFile};

/// Directory of `ScrapeFile` snapshots.
#[derive(Debug, Clone)]
pub struct EventStorage {
    dir: PathBuf,
}

/// Last day of an upcoming window, saturating at the calendar bounds.
fn window_end(today: NaiveDate, days_ahead: i64) -> NaiveDate {
    Duration::try_days(days_ahead)
        .and_then(|d| today.checked_add_signed(d))
        .unwrap_or(if days_ahead < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

impl EventStorage {
    /// Opens `dir`, creating it if needed.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, ScraperError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes a snapshot. Without a filename one is derived from the local time.
    pub async fn save_events(
        &self,
        events: &[GamingEvent],
        filename: Option<&str>,
    ) -> Result<PathBuf, ScraperError> {
        let name = filename.map_or_else(
            || Local::now().format("gaming_events_%Y%m%d_%H%M%S.json").to_string(),
            str::to_owned,
        );
        let path = self.dir.join(name);
        let file = ScrapeFile::new(events.to_vec());
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| ScraperError::json(path.display().to_string(), e))?;
        tokio::fs::write(&path, json).await?;
        tracing::info!(path = %path.display(), count = events.len(), "saved events");
        Ok(path)
    }

    /// Events in one snapshot; a missing file reads as empty.
    pub async fn load_events(&self, filename: &str) -> Result<Vec<GamingEvent>, ScraperError> {
        let path = self.dir.join(filename);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "snapshot not found");
                return Ok(Vec::new());
            },
            Err(e) => return Err(e.into()),
        };
        let file: ScrapeFile = serde_json::from_str(&raw)
            .map_err(|e| ScraperError::json(path.display().to_string(), e))?;
        Ok(file.events)
    }

    /// Snapshot file names, sorted.
    pub async fn list_files(&self) -> Result<Vec<String>, ScraperError> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_owned());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Events from every snapshot. Unreadable snapshots are skipped.
    pub async fn get_all_events(&self) -> Result<Vec<GamingEvent>, ScraperError> {
        let mut all = Vec::new();
        for name in self.list_files().await? {
            match self.load_events(&name).await {
                Ok(events) => all.extend(events),
                Err(e) => tracing::warn!(file = %name, error = %e, "skipping snapshot"),
            }
        }
        Ok(all)
    }

    pub async fn get_events_by_game(&self, game_system: &str) -> Result<Vec<GamingEvent>, ScraperError> {
        let mut events = self.get_all_events().await?;
        events.retain(|e| e.game_system.eq_ignore_ascii_case(game_system));
        Ok(events)
    }

    pub async fn get_events_by_source(&self, source: &str) -> Result<Vec<GamingEvent>, ScraperError> {
        let mut events = self.get_all_events().await?;
        events.retain(|e| e.source.eq_ignore_ascii_case(source));
        Ok(events)
    }

    /// Case-insensitive substring match on the venue.
    pub async fn get_events_by_venue(&self, venue: &str) -> Result<Vec<GamingEvent>, ScraperError> {
        let needle = venue.to_lowercase();
        let mut events = self.get_all_events().await?;
        events.retain(|e| e.venue.to_lowercase().contains(&needle));
        Ok(events)
    }

    /// Dated events from today through `days_ahead` days out, soonest first.
    pub async fn get_upcoming_events(&self, days_ahead: i64) -> Result<Vec<GamingEvent>, ScraperError> {
        self.upcoming_from(Local::now().date_naive(), days_ahead).await
    }

    pub async fn upcoming_from(
        &self,
        today: NaiveDate,
        days_ahead: i64,
    ) -> Result<Vec<GamingEvent>, ScraperError> {
        let end = window_end(today, days_ahead);
        let mut dated: Vec<(NaiveDate, GamingEvent)> = self
            .get_all_events()
            .await?
            .into_iter()
            .filter_map(|e| {
                let date = NaiveDate::parse_from_str(&e.date, "%Y-%m-%d").ok()?;
                (today..=end).contains(&date).then_some((date, e))
            })
            .collect();
        dated.sort_by_key(|(date, _)| *date);
        Ok(dated.into_iter().map(|(_, e)| e).collect())
    }

    /// Removes a snapshot. Returns false when it did not exist.
    pub async fn delete_file(&self, filename: &str) -> Result<bool, ScraperError> {
        match tokio::fs::remove_file(self.dir.join(filename)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(title: &str, game: &str, venue: &str, date: &str, source: &str) -> GamingEvent {
        GamingEvent::new(title, game, venue, date, "19:00", source)
    }

    async fn seeded() -> (tempfile::TempDir, EventStorage) {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = EventStorage::new(tmp.path().join("scraped")).await.unwrap();
        storage
            .save_events(
                &[
                    event("FNM", "MTG", "Card Kingdom", "2024-07-19", "facebook"),
                    event("40k League", "Warhammer", "Dragon's Den", "2024-07-25", "discord"),
                ],
                Some("a.json"),
            )
            .await
            .unwrap();
        storage
            .save_events(
                &[
                    event("Commander", "MTG", "Card Kingdom West", "2024-07-18", "discord"),
                    event("Someday", "D&D", "Library", "Unknown", "facebook"),
                ],
                Some("b.json"),
            )
            .await
            .unwrap();
        (tmp, storage)
    }

    #[tokio::test]
    async fn save_and_load_snapshot() {
        let (_tmp, storage) = seeded().await;
        let loaded = storage.load_events("a.json").await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].title, "FNM");

        let raw = std::fs::read_to_string(storage.dir().join("a.json")).unwrap();
        let file: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(file["total_events"], 2);
        assert!(file["scraped_at"].is_string());
    }

    #[tokio::test]
    async fn default_filename_is_timestamped() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = EventStorage::new(tmp.path()).await.unwrap();
        let path = storage.save_events(&[], None).await.unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("gaming_events_") && name.ends_with(".json"), "{name}");
        let local_day = Local::now().format("gaming_events_%Y%m%d_").to_string();
        assert!(name.starts_with(&local_day), "{name} is not stamped with local date {local_day}");
    }

    #[tokio::test]
    async fn missing_snapshot_is_empty() {
        let (_tmp, storage) = seeded().await;
        assert!(storage.load_events("nope.json").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn filters() {
        let (_tmp, storage) = seeded().await;
        assert_eq!(storage.get_all_events().await.unwrap().len(), 4);
        assert_eq!(storage.get_events_by_game("mtg").await.unwrap().len(), 2);
        assert_eq!(storage.get_events_by_source("DISCORD").await.unwrap().len(), 2);
        assert_eq!(storage.get_events_by_venue("card kingdom").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_skipped() {
        let (_tmp, storage) = seeded().await;
        std::fs::write(storage.dir().join("c.json"), "not json").unwrap();
        assert_eq!(storage.get_all_events().await.unwrap().len(), 4);
        assert!(storage.load_events("c.json").await.is_err());
    }

    #[tokio::test]
    async fn upcoming_window_sorted() {
        let (_tmp, storage) = seeded().await;
        let today = NaiveDate::from_ymd_opt(2024, 7, 18).unwrap();
        let titles: Vec<String> = storage
            .upcoming_from(today, 3)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["Commander", "FNM"]);
    }

    #[tokio::test]
    async fn huge_window_does_not_overflow() {
        let (_tmp, storage) = seeded().await;
        let today = NaiveDate::from_ymd_opt(2024, 7, 18).unwrap();
        let far = storage.upcoming_from(today, i64::MAX).await.unwrap();
        assert!(far.len() >= 2);
        assert!(storage.upcoming_from(today, i64::MIN).await.unwrap().is_empty());
    }

    #[test]
    fn window_end_saturates() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 18).unwrap();
        assert_eq!(window_end(today, 3), NaiveDate::from_ymd_opt(2024, 7, 21).unwrap());
        assert_eq!(window_end(today, i64::MAX), NaiveDate::MAX);
        assert_eq!(window_end(today, 1_000_000_000), NaiveDate::MAX);
        assert_eq!(window_end(today, i64::MIN), NaiveDate::MIN);
    }

    #[tokio::test]
    async fn list_and_delete() {
        let (_tmp, storage) = seeded().await;
        assert_eq!(storage.list_files().await.unwrap(), vec!["a.json", "b.json"]);
        assert!(storage.delete_file("a.json").await.unwrap());
        assert!(!storage.delete_file("a.json").await.unwrap());
        assert_eq!(storage.list_files().await.unwrap(), vec!["b.json"]);
    }
}
