use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use crate::discord::DiscordEventScraper;
use crate::error::ScraperError;
use crate::facebook::FacebookEventScraper;
use crate::models::GamingEvent;
use crate::storage::EventStorage;

/// A guild to scan, optionally restricted to channels whose names contain one of `channels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordServer {
    pub guild_id: String,
    pub channels: Option<Vec<String>>,
}

impl DiscordServer {
    #[must_use]
    pub fn new(guild_id: impl Into<String>) -> Self {
        Self { guild_id: guild_id.into(), channels: None }
    }

    #[must_use]
    pub fn with_channels(mut self, channels: Vec<String>) -> Self {
        self.channels = Some(channels);
        self
    }
}

/// Drops repeats of (title, date, start time), keeping the first seen.
/// Titles compare trimmed and case-insensitively.
#[must_use]
pub fn dedup_events(events: Vec<GamingEvent>) -> Vec<GamingEvent> {
    let mut seen = HashSet::new();
    events
        .into_iter()
        .filter(|e| {
            seen.insert((e.title.trim().to_lowercase(), e.date.clone(), e.start_time.clone()))
        })
        .collect()
}

#[derive(Debug)]
pub struct GamingEventsScraper {
    facebook: FacebookEventScraper,
    discord: DiscordEventScraper,
    storage: EventStorage,
}

impl GamingEventsScraper {
    pub async fn new(
        facebook_token: Option<String>,
        discord_token: Option<String>,
        data_dir: impl Into<PathBuf>,
    ) -> Result<Self, ScraperError> {
        Ok(Self::from_parts(
            FacebookEventScraper::new(facebook_token)?,
            DiscordEventScraper::new(discord_token)?,
            EventStorage::new(data_dir).await?,
        ))
    }

    #[must_use]
    pub const fn from_parts(
        facebook: FacebookEventScraper,
        discord: DiscordEventScraper,
        storage: EventStorage,
    ) -> Self {
        Self { facebook, discord, storage }
    }

    #[must_use]
    pub const fn storage(&self) -> &EventStorage {
        &self.storage
    }

    /// Scrapes every page and guild, then removes duplicates.
    pub async fn scrape_all_sources(
        &self,
        facebook_pages: &[String],
        discord_servers: &[DiscordServer],
    ) -> Vec<GamingEvent> {
        let mut events = Vec::new();
        for page in facebook_pages {
            tracing::info!(page, "scraping Facebook page");
            events.extend(self.facebook.scrape_page_events(page).await);
        }
        for server in discord_servers {
            tracing::info!(guild_id = %server.guild_id, "scraping Discord server");
            events.extend(
                self.discord.scrape_server_events(&server.guild_id, server.channels.as_deref()).await,
            );
        }
        let total = events.len();
        let unique = dedup_events(events);
        tracing::info!(total, unique = unique.len(), "scrape finished");
        unique
    }

    /// Scrapes and writes a snapshot. Returns `None` when nothing was found.
    pub async fn scrape_and_save(
        &self,
        facebook_pages: &[String],
        discord_servers: &[DiscordServer],
        filename: Option<&str>,
    ) -> Result<Option<PathBuf>, ScraperError> {
        let events = self.scrape_all_sources(facebook_pages, discord_servers).await;
        if events.is_empty() {
            tracing::warn!("no events found");
            return Ok(None);
        }
        let mut by_game: BTreeMap<&str, usize> = BTreeMap::new();
        for event in &events {
            *by_game.entry(event.game_system.as_str()).or_default() += 1;
        }
        for (game, count) in &by_game {
            tracing::info!(game, count, "events by game system");
        }
        self.storage.save_events(&events, filename).await.map(Some)
    }
}
