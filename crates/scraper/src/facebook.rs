//! Facebook page events via the Graph API, with a public-page text fallback.

use chrono::DateTime;
use serde::Deserialize;

use crate::error::ScraperError;
use crate::extractors::{truncate_title, EventExtractor};
use crate::html::html_to_lines;
use crate::models::{GamingEvent, UNKNOWN};

pub const GRAPH_API_BASE: &str = "https://graph.facebook.com/v18.0";
pub const FACEBOOK_PUBLIC_BASE: &str = "https://www.facebook.com";
const GRAPH_FIELDS: &str = "name,description,start_time,place";
const SOURCE: &str = "facebook";
const MAX_TITLE_CHARS: usize = 100;

#[derive(Debug, Default, Deserialize)]
struct GraphEvents {
    #[serde(default)]
    data: Vec<GraphEvent>,
}

#[derive(Debug, Default, Deserialize)]
struct GraphEvent {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    place: Option<GraphPlace>,
}

#[derive(Debug, Default, Deserialize)]
struct GraphPlace {
    #[serde(default)]
    name: Option<String>,
}

/// Split a Graph `start_time` (`2024-07-18T19:00:00-0500`) into local date and `HH:MM`.
fn split_start_time(raw: &str) -> Option<(String, String)> {
    let dt = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()?;
    Some((dt.date_naive().to_string(), dt.format("%H:%M").to_string()))
}

pub struct FacebookEventScraper {
    client: reqwest::Client,
    access_token: Option<String>,
    graph_base: String,
    public_base: String,
    extractor: EventExtractor,
}

impl std::fmt::Debug for FacebookEventScraper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacebookEventScraper")
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("graph_base", &self.graph_base)
            .field("public_base", &self.public_base)
            .finish_non_exhaustive()
    }
}

impl FacebookEventScraper {
    pub fn new(access_token: Option<String>) -> Result<Self, ScraperError> {
        Ok(Self {
            client: crate::http_client()?,
            access_token: access_token.filter(|t| !t.trim().is_empty()),
            graph_base: GRAPH_API_BASE.to_owned(),
            public_base: FACEBOOK_PUBLIC_BASE.to_owned(),
            extractor: EventExtractor::new(),
        })
    }

    /// Point both endpoints elsewhere (tests, proxies).
    #[must_use]
    pub fn with_base_urls(mut self, graph_base: &str, public_base: &str) -> Self {
        self.graph_base = graph_base.trim_end_matches('/').to_owned();
        self.public_base = public_base.trim_end_matches('/').to_owned();
        self
    }

    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.access_token.is_some()
    }

    /// Gaming events for a page. Failures are logged and yield an empty list.
    pub async fn scrape_page_events(&self, page_id: &str) -> Vec<GamingEvent> {
        let result = match &self.access_token {
            Some(token) => self.fetch_graph_events(page_id, token).await,
            None => {
                tracing::warn!(page_id, "no Facebook access token, using public page fallback");
                self.fetch_public_page(page_id).await
            },
        };
        match result {
            Ok(events) => {
                tracing::info!(page_id, count = events.len(), "scraped Facebook page");
                events
            },
            Err(e) => {
                tracing::error!(page_id, error = %e, "error scraping Facebook page");
                Vec::new()
            },
        }
    }

    async fn fetch_graph_events(
        &self,
        page_id: &str,
        token: &str,
    ) -> Result<Vec<GamingEvent>, ScraperError> {
        let response = self
            .client
            .get(format!("{}/{page_id}/events", self.graph_base))
            .query(&[("access_token", token), ("fields", GRAPH_FIELDS)])
            .send()
            .await?;
        let body = ScraperError::check(response).await?.text().await?;
        let parsed: GraphEvents = serde_json::from_str(&body)
            .map_err(|e| ScraperError::json(format!("Graph events for {page_id}"), e))?;
        let page_url = format!("https://facebook.com/{page_id}");
        Ok(parsed.data.iter().filter_map(|e| self.parse_graph_event(e, &page_url)).collect())
    }

    async fn fetch_public_page(&self, page_id: &str) -> Result<Vec<GamingEvent>, ScraperError> {
        let response =
            self.client.get(format!("{}/{page_id}/events", self.public_base)).send().await?;
        let html = ScraperError::check(response).await?.text().await?;
        let page_url = format!("https://facebook.com/{page_id}");
        Ok(html_to_lines(&html)
            .iter()
            .filter(|line| self.extractor.contains_gaming_keywords(line))
            .filter_map(|line| self.parse_text_event(line, &page_url))
            .collect())
    }

    fn parse_graph_event(&self, data: &GraphEvent, source_url: &str) -> Option<GamingEvent> {
        let combined = format!("{} {}", data.name, data.description).to_lowercase();
        if !self.extractor.contains_gaming_keywords(&combined) {
            return None;
        }
        let game_system = self.extractor.extract_game_system(&combined);
        let venue = data
            .place
            .as_ref()
            .and_then(|p| p.name.clone())
            .unwrap_or_else(|| UNKNOWN.to_owned());
        let (date, start_time) = data
            .start_time
            .as_deref()
            .and_then(split_start_time)
            .unwrap_or_else(|| self.extractor.date_and_time(&combined));

        Some(
            GamingEvent::new(&data.name, game_system, venue, date, start_time, SOURCE)
                .with_source_url(source_url)
                .with_description(&data.description),
        )
    }

    /// One line of page text; only lines naming a known game system count.
    fn parse_text_event(&self, text: &str, source_url: &str) -> Option<GamingEvent> {
        let game_system = self.extractor.extract_game_system(text);
        if game_system == UNKNOWN {
            return None;
        }
        let (date, start_time) = self.extractor.date_and_time(text);
        Some(
            GamingEvent::new(
                truncate_title(text, MAX_TITLE_CHARS),
                game_system,
                UNKNOWN,
                date,
                start_time,
                SOURCE,
            )
            .with_source_url(source_url)
            .with_description(text.trim()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn scraper(token: Option<&str>, server: &MockServer) -> FacebookEventScraper {
        FacebookEventScraper::new(token.map(str::to_owned))
            .unwrap()
            .with_base_urls(&server.uri(), &server.uri())
    }

    #[test]
    fn start_time_with_offset() {
        assert_eq!(
            split_start_time("2024-07-18T19:00:00-0500"),
            Some(("2024-07-18".to_owned(), "19:00".to_owned()))
        );
        assert_eq!(
            split_start_time("2024-07-18T09:30:00Z"),
            Some(("2024-07-18".to_owned(), "09:30".to_owned()))
        );
        assert_eq!(split_start_time("next friday"), None);
    }

    #[test]
    fn debug_hides_token() {
        let s = FacebookEventScraper::new(Some("secret-token".to_owned())).unwrap();
        assert!(!format!("{s:?}").contains("secret-token"));
        assert!(s.has_token());
        assert!(!FacebookEventScraper::new(Some("  ".to_owned())).unwrap().has_token());
    }

    #[tokio::test]
    async fn graph_api_keeps_gaming_events() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cardshop/events"))
            .and(query_param("access_token", "tok"))
            .and(query_param("fields", GRAPH_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {
                        "name": "Friday Night Magic",
                        "description": "Standard FNM",
                        "start_time": "2024-07-19T18:30:00-0500",
                        "place": {"name": "Card Shop"}
                    },
                    {
                        "name": "Warhammer League",
                        "description": "Bring your army 7/20/2024 at 2pm"
                    },
                    {
                        "name": "Book club",
                        "description": "Reading night",
                        "start_time": "2024-07-19T18:30:00-0500"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let events = scraper(Some("tok"), &server).scrape_page_events("cardshop").await;
        assert_eq!(events.len(), 2);

        let fnm = &events[0];
        assert_eq!(fnm.game_system, "MTG");
        assert_eq!(fnm.venue, "Card Shop");
        assert_eq!((fnm.date.as_str(), fnm.start_time.as_str()), ("2024-07-19", "18:30"));
        assert_eq!(fnm.source, "facebook");
        assert_eq!(fnm.source_url.as_deref(), Some("https://facebook.com/cardshop"));

        let league = &events[1];
        assert_eq!(league.game_system, "Warhammer");
        assert_eq!(league.venue, UNKNOWN);
        assert_eq!((league.date.as_str(), league.start_time.as_str()), ("2024-07-20", "2:00 PM"));
    }

    #[tokio::test]
    async fn graph_error_yields_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cardshop/events"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad token"))
            .mount(&server)
            .await;
        assert!(scraper(Some("tok"), &server).scrape_page_events("cardshop").await.is_empty());
    }

    #[tokio::test]
    async fn public_fallback_parses_text_lines() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cardshop/events"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<html><body><div>Commander Night 7/25/2024 6:30 PM</div>\
                 <div>Sealed draft this weekend</div><div>Open mic</div>\
                 <div>Digimon meetup</div></body></html>",
            ))
            .mount(&server)
            .await;

        let events = scraper(None, &server).scrape_page_events("cardshop").await;
        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        // Digimon is a keyword but not a recognised game system.
        assert_eq!(titles, vec!["Commander Night 7/25/2024 6:30 PM", "Sealed draft this weekend"]);
        assert_eq!(events[0].date, "2024-07-25");
        assert_eq!(events[0].start_time, "6:30 PM");
        assert_eq!(events[1].date, UNKNOWN);
        assert_eq!(events[0].venue, UNKNOWN);
    }
}
