//! Discord guild messages via the REST API (bot token).

use serde::Deserialize;

use crate::error::ScraperError;
use crate::extractors::{truncate_title, EventExtractor};
use crate::models::GamingEvent;

pub const DISCORD_API_BASE: &str = "https://discord.com/api/v10";
pub const DEFAULT_CHANNEL_NAMES: &[&str] = &["events", "schedule", "announcements", "general"];
const GUILD_TEXT: u8 = 0;
const MESSAGE_LIMIT: u8 = 100;
const SOURCE: &str = "discord";
const MAX_TITLE_CHARS: usize = 100;

#[derive(Debug, Deserialize)]
struct Guild {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct Channel {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: u8,
}

#[derive(Debug, Deserialize)]
struct Message {
    id: String,
    #[serde(default)]
    content: String,
}

pub struct DiscordEventScraper {
    client: reqwest::Client,
    bot_token: Option<String>,
    api_base: String,
    extractor: EventExtractor,
}

impl std::fmt::Debug for DiscordEventScraper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordEventScraper")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "***"))
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl DiscordEventScraper {
    pub fn new(bot_token: Option<String>) -> Result<Self, ScraperError> {
        Ok(Self {
            client: crate::http_client()?,
            bot_token: bot_token.filter(|t| !t.trim().is_empty()),
            api_base: DISCORD_API_BASE.to_owned(),
            extractor: EventExtractor::new(),
        })
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_owned();
        self
    }

    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.bot_token.is_some()
    }

    /// Gaming events posted in a guild's matching text channels.
    ///
    /// `channel_names` match as case-insensitive substrings of the channel
    /// name; `None` uses `DEFAULT_CHANNEL_NAMES`. Without a token, or on a
    /// guild-level failure, the result is empty.
    pub async fn scrape_server_events(
        &self,
        guild_id: &str,
        channel_names: Option<&[String]>,
    ) -> Vec<GamingEvent> {
        let Some(token) = &self.bot_token else {
            tracing::warn!(guild_id, "no Discord bot token provided");
            return Vec::new();
        };
        let names: Vec<String> = match channel_names {
            Some(names) => names.iter().map(|n| n.to_lowercase()).collect(),
            None => DEFAULT_CHANNEL_NAMES.iter().map(|n| (*n).to_owned()).collect(),
        };
        match self.scrape_guild(guild_id, token, &names).await {
            Ok(events) => {
                tracing::info!(guild_id, count = events.len(), "scraped Discord server");
                events
            },
            Err(e) => {
                tracing::error!(guild_id, error = %e, "error scraping Discord server");
                Vec::new()
            },
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> Result<T, ScraperError> {
        let response = self
            .client
            .get(format!("{}{path}", self.api_base))
            .header("Authorization", format!("Bot {token}"))
            .send()
            .await?;
        let body = ScraperError::check(response).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| ScraperError::json(path, e))
    }

    async fn scrape_guild(
        &self,
        guild_id: &str,
        token: &str,
        names: &[String],
    ) -> Result<Vec<GamingEvent>, ScraperError> {
        let guild: Guild = self.get_json(&format!("/guilds/{guild_id}"), token).await?;
        let channels: Vec<Channel> =
            self.get_json(&format!("/guilds/{guild_id}/channels"), token).await?;

        let mut events = Vec::new();
        for channel in channels.iter().filter(|c| {
            let lower = c.name.to_lowercase();
            c.kind == GUILD_TEXT && names.iter().any(|n| lower.contains(n.as_str()))
        }) {
            tracing::debug!(channel = %channel.name, "scanning channel");
            let path = format!("/channels/{}/messages?limit={MESSAGE_LIMIT}", channel.id);
            let messages: Vec<Message> = match self.get_json(&path, token).await {
                Ok(messages) => messages,
                Err(e) => {
                    tracing::warn!(channel = %channel.name, error = %e, "skipping channel");
                    continue;
                },
            };
            events.extend(
                messages.iter().filter_map(|m| self.parse_message(m, &guild, &channel.id)),
            );
        }
        Ok(events)
    }

    fn parse_message(&self, message: &Message, guild: &Guild, channel_id: &str) -> Option<GamingEvent> {
        let content = &message.content;
        if !self.extractor.contains_gaming_keywords(content) {
            return None;
        }
        let (date, start_time) = self.extractor.date_and_time(content);
        Some(
            GamingEvent::new(
                truncate_title(content, MAX_TITLE_CHARS),
                self.extractor.extract_game_system(content),
                &guild.name,
                date,
                start_time,
                SOURCE,
            )
            .with_source_url(format!(
                "https://discord.com/channels/{}/{channel_id}/{}",
                guild.id, message.id
            ))
            .with_description(content),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn discord_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/guilds/42"))
            .and(header("Authorization", "Bot tok"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "42", "name": "Dragon's Den"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/guilds/42/channels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "100", "name": "upcoming-events", "type": 0},
                {"id": "101", "name": "off-topic", "type": 0},
                {"id": "102", "name": "events-voice", "type": 2}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/channels/100/messages"))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "9001", "content": "Kill Team league 8/3/2024 at 6 PM, Warhammer only"},
                {"id": "9002", "content": "Who wants pizza?"}
            ])))
            .mount(&server)
            .await;
        server
    }

    fn scraper(token: Option<&str>, server: &MockServer) -> DiscordEventScraper {
        DiscordEventScraper::new(token.map(str::to_owned)).unwrap().with_api_base(&server.uri())
    }

    #[tokio::test]
    async fn scans_matching_text_channels() {
        let server = discord_server().await;
        let events = scraper(Some("tok"), &server).scrape_server_events("42", None).await;
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.game_system, "Warhammer");
        assert_eq!(event.venue, "Dragon's Den");
        assert_eq!(event.date, "2024-08-03");
        assert_eq!(event.start_time, "6:00 PM");
        assert_eq!(event.source, "discord");
        assert_eq!(event.source_url.as_deref(), Some("https://discord.com/channels/42/100/9001"));
    }

    #[tokio::test]
    async fn custom_channel_names_narrow_the_scan() {
        let server = discord_server().await;
        let only = vec!["SCHEDULE".to_owned()];
        let events = scraper(Some("tok"), &server).scrape_server_events("42", Some(&only)).await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn no_token_returns_empty() {
        let server = discord_server().await;
        assert!(scraper(None, &server).scrape_server_events("42", None).await.is_empty());
    }

    #[tokio::test]
    async fn unknown_guild_returns_empty() {
        let server = discord_server().await;
        assert!(scraper(Some("tok"), &server).scrape_server_events("7", None).await.is_empty());
    }

    #[test]
    fn debug_hides_token() {
        let s = DiscordEventScraper::new(Some("bot-secret".to_owned())).unwrap();
        assert!(!format!("{s:?}").contains("bot-secret"));
    }
}
