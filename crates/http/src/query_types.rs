//! Request/query types (Deserialize)

use eventboard_core::{EventQuery, ReviewAction, DEFAULT_EVENT_LIMIT};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
    #[serde(default)]
    pub location_ids: Vec<i64>,
    #[serde(default)]
    pub game_system_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UnsubscribeRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub action: ReviewAction,
}

fn parse_param<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value.trim().parse().map_err(|_| format!("invalid value for '{key}': {value}"))
}

/// Build an `EventQuery` from raw `GET /events` parameters.
///
/// `game_system_id` and `game_system_ids` may both repeat; all values are
/// merged. Unknown keys are ignored. Range checks happen in `EventQuery::validate`.
pub fn parse_event_query(params: &[(String, String)]) -> Result<EventQuery, String> {
    let mut query = EventQuery { limit: DEFAULT_EVENT_LIMIT, ..EventQuery::default() };
    for (key, value) in params {
        match key.as_str() {
            "location_id" => query.location_id = Some(parse_param(key, value)?),
            "game_system_id" | "game_system_ids" | "game_system_ids[]" => {
                query.game_system_ids.push(parse_param(key, value)?);
            },
            "date_from" => query.date_from = Some(parse_param(key, value)?),
            "date_to" => query.date_to = Some(parse_param(key, value)?),
            "skip" => query.skip = parse_param(key, value)?,
            "limit" => query.limit = parse_param(key, value)?,
            _ => {},
        }
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn defaults() {
        let query = parse_event_query(&[]).unwrap();
        assert_eq!(query.limit, DEFAULT_EVENT_LIMIT);
        assert_eq!(query.skip, 0);
        assert!(query.game_system_ids.is_empty());
    }

    #[test]
    fn repeated_game_system_keys_merge() {
        let query = parse_event_query(&params(&[
            ("game_system_ids", "1"),
            ("game_system_ids", "2"),
            ("game_system_id", "5"),
            ("location_id", "3"),
        ]))
        .unwrap();
        assert_eq!(query.game_system_ids, vec![1, 2, 5]);
        assert_eq!(query.location_id, Some(3));
    }

    #[test]
    fn dates_and_paging() {
        let query = parse_event_query(&params(&[
            ("date_from", "2026-03-01"),
            ("date_to", "2026-03-31"),
            ("skip", "10"),
            ("limit", "20"),
            ("utm_source", "mail"),
        ]))
        .unwrap();
        assert_eq!(query.date_from, "2026-03-01".parse().ok());
        assert_eq!(query.date_to, "2026-03-31".parse().ok());
        assert_eq!((query.skip, query.limit), (10, 20));
    }

    #[test]
    fn bad_values_are_rejected() {
        for (key, value) in [("skip", "-1"), ("limit", "ten"), ("date_from", "03/01/2026")] {
            let err = parse_event_query(&params(&[(key, value)])).unwrap_err();
            assert!(err.contains(key), "{err}");
        }
    }
}
