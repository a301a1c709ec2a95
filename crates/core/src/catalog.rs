//! Locations (stores, clubs) and the game systems played there.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A venue hosting events. Created on demand from event submissions by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub website: Option<String>,
    pub discord_url: Option<String>,
    pub facebook_url: Option<String>,
    #[serde(skip_serializing, default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Location {
    /// A bare location carrying only its name, as created by `get_or_create`.
    #[must_use]
    pub fn named(id: i64, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            city: None,
            state: None,
            website: None,
            discord_url: None,
            facebook_url: None,
            created_at,
        }
    }
}

/// A tabletop game (e.g. "Warhammer 40,000") with a unique URL slug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSystem {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub publisher: Option<String>,
    #[serde(skip_serializing, default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}
