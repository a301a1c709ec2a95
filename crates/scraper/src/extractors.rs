//! Keyword and regex heuristics shared by the scrapers.

use std::sync::LazyLock;

use chrono::{Datelike, Local};
use regex::Regex;

use crate::models::UNKNOWN;

/// Any of these marks text as gaming-related.
const GAME_KEYWORDS: &[&str] = &[
    "mtg",
    "magic",
    "magic the gathering",
    "warhammer",
    "40k",
    "age of sigmar",
    "d&d",
    "dungeons and dragons",
    "dnd",
    "pokemon",
    "yugioh",
    "digimon",
    "fnm",
    "friday night magic",
    "commander",
    "edh",
    "draft",
    "sealed",
    "prerelease",
];

/// Checked in order; first system with a matching keyword wins.
const GAME_SYSTEMS: &[(&str, &[&str])] = &[
    ("MTG", &["mtg", "magic", "fnm", "commander", "edh", "draft", "sealed", "prerelease"]),
    ("Warhammer", &["warhammer", "40k", "age of sigmar"]),
    ("D&D", &["d&d", "dungeons", "dnd"]),
    ("Pokemon", &["pokemon"]),
    ("Yu-Gi-Oh", &["yugioh"]),
];

#[expect(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static TIME_12H: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,2}):?(\d{2})\s*(am|pm)").unwrap());

#[expect(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static TIME_HOUR_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,2})\s*(am|pm)").unwrap());

#[expect(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static TIME_24H: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{1,2}):?(\d{2})").unwrap());

#[expect(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static DATE_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})[/-](\d{1,2})[/-](\d{4})").unwrap());

#[expect(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static DATE_MONTH_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})",
    )
    .unwrap()
});

#[expect(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static DATE_MONTH_ABBR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\s+(\d{1,2})").unwrap()
});

fn month_number(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_ascii_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn pad2(digits: &str) -> String {
    format!("{digits:0>2}")
}

/// Stateless text classifier. All matching is case-insensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventExtractor;

impl EventExtractor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn contains_gaming_keywords(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        GAME_KEYWORDS.iter().any(|k| lower.contains(k))
    }

    /// `MTG`, `Warhammer`, `D&D`, `Pokemon`, `Yu-Gi-Oh` or `Unknown`.
    #[must_use]
    pub fn extract_game_system(&self, text: &str) -> &'static str {
        let lower = text.to_lowercase();
        GAME_SYSTEMS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map_or(UNKNOWN, |&(name, _)| name)
    }

    /// First time found: `7:30 PM`, `6:00 PM` (hour only) or `19:00`.
    #[must_use]
    pub fn extract_time(&self, text: &str) -> Option<String> {
        if let Some(c) = TIME_12H.captures(text) {
            return Some(format!("{}:{} {}", &c[1], &c[2], c[3].to_uppercase()));
        }
        if let Some(c) = TIME_HOUR_ONLY.captures(text) {
            return Some(format!("{}:00 {}", &c[1], c[2].to_uppercase()));
        }
        TIME_24H.captures(text).map(|c| format!("{}:{}", &c[1], &c[2]))
    }

    /// First date found, as `YYYY-MM-DD`. Month-name dates assume the current year.
    #[must_use]
    pub fn extract_date(&self, text: &str) -> Option<String> {
        self.extract_date_in_year(text, Local::now().year())
    }

    /// Like `extract_date`, with an explicit year for month-name dates.
    #[must_use]
    pub fn extract_date_in_year(&self, text: &str, year: i32) -> Option<String> {
        if let Some(c) = DATE_NUMERIC.captures(text) {
            return Some(format!("{}-{}-{}", &c[3], pad2(&c[1]), pad2(&c[2])));
        }
        [&*DATE_MONTH_NAME, &*DATE_MONTH_ABBR].into_iter().find_map(|re| {
            let c = re.captures(text)?;
            let month = month_number(&c[1])?;
            Some(format!("{year}-{month:02}-{}", pad2(&c[2])))
        })
    }

    /// Date and time from free text, `Unknown` where nothing was found.
    #[must_use]
    pub fn date_and_time(&self, text: &str) -> (String, String) {
        (
            self.extract_date(text).unwrap_or_else(|| UNKNOWN.to_owned()),
            self.extract_time(text).unwrap_or_else(|| UNKNOWN.to_owned()),
        )
    }
}

/// First `max` characters of `text`, trimmed.
pub(crate) fn truncate_title(text: &str, max: usize) -> String {
    text.trim().chars().take(max).collect()
}
