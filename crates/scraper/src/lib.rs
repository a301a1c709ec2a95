//! Gaming-event scraper for Facebook pages and Discord servers.
//!
//! Independent of the web service: it writes JSON snapshots that the
//! service's importer can read.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]

mod discord;
mod error;
mod extractors;
mod facebook;
mod html;
mod models;
mod orchestrator;
mod storage;

pub use discord::{DiscordEventScraper, DEFAULT_CHANNEL_NAMES, DISCORD_API_BASE};
pub use error::ScraperError;
pub use extractors::EventExtractor;
pub use facebook::{FacebookEventScraper, FACEBOOK_PUBLIC_BASE, GRAPH_API_BASE};
pub use html::html_to_lines;
pub use models::{GamingEvent, ScrapeFile, UNKNOWN};
pub use orchestrator::{dedup_events, DiscordServer, GamingEventsScraper};
pub use storage::EventStorage;

/// Build the shared HTTP client used by both scrapers.
pub(crate) fn http_client() -> Result<reqwest::Client, ScraperError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        .build()
        .map_err(|e| ScraperError::ClientInit(e.to_string()))
}
