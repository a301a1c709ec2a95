//! Event identity hashing and name slugging.

use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

#[expect(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static NON_SLUG_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Dedup key for an event: SHA-256 over `location|game|title|date[|time]`.
///
/// Components are trimmed and the joined key is lowercased, so the hash is
/// case-insensitive. A missing time and an empty time hash identically.
#[must_use]
pub fn compute_dedup_hash(
    location_name: &str,
    game_system: &str,
    title: &str,
    event_date: &str,
    time: Option<&str>,
) -> String {
    let mut raw = format!(
        "{}|{}|{}|{}",
        location_name.trim(),
        game_system.trim(),
        title.trim(),
        event_date.trim()
    );
    if let Some(time) = time.map(str::trim).filter(|t| !t.is_empty()) {
        raw.push('|');
        raw.push_str(time);
    }
    let digest = Sha256::digest(raw.to_lowercase().as_bytes());
    hex::encode(digest)
}

/// URL slug for a game system name, e.g. `"Warhammer 40,000"` -> `"warhammer-40-000"`.
#[must_use]
pub fn make_slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    NON_SLUG_CHARS.replace_all(&lowered, "-").trim_matches('-').to_owned()
}

/// Candidate slugs in the order they should be tried: `base`, `base-1`, `base-2`, ...
pub fn slug_candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_owned()).chain((1_u32..).map(move |n| format!("{base}-{n}")))
}
