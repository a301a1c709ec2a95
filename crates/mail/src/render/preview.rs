use chrono::{Datelike, NaiveDate};
use eventboard_core::EventWithRelations;

use super::{build_calendar_html, escape_html, header_cell};

/// Monthly magazine preview: calendar grid followed by the full event table.
#[must_use]
pub fn build_preview_email(
    events: &[EventWithRelations],
    website_url: &str,
    today: NaiveDate,
) -> String {
    let calendar = build_calendar_html(events, today.year(), today.month(), today);
    let safe_url = escape_html(website_url);

    let mut rows = String::new();
    for e in events {
        let time = e
            .event
            .start_time
            .as_deref()
            .map_or_else(|| "TBD".to_owned(), |t| format!("{t} CST"));
        let link = e.event.source_url.as_deref().map_or_else(String::new, |url| {
            format!(
                r#"<a href="{}" target="_blank" style="color:#7c3aed;text-decoration:none;">↗</a>"#,
                escape_html(url)
            )
        });
        rows.push_str(&format!(
            r#"
        <tr style="border-bottom: 1px solid #e5e7eb;">
          <td style="padding: 10px 12px; white-space: nowrap;">{date}</td>
          <td style="padding: 10px 12px; white-space: nowrap;">{time}</td>
          <td style="padding: 10px 12px; font-weight: 600; color: #7c3aed;">{game}</td>
          <td style="padding: 10px 12px;">{location}</td>
          <td style="padding: 10px 12px; font-weight: 500;">{title}</td>
          <td style="padding: 10px 12px; color: #6b7280; font-size: 13px;">{description}</td>
          <td style="padding: 10px 12px; text-align: center;">{link}</td>
        </tr>"#,
            date = e.event.date.format("%a, %b %d"),
            time = escape_html(&time),
            game = escape_html(&e.game_system.name),
            location = escape_html(&e.location.name),
            title = escape_html(&e.event.title),
            description = escape_html(e.event.description.as_deref().unwrap_or_default()),
        ));
    }

    let headers: String =
        ["Date", "Time", "Game", "Location", "Event", "Details", "Link"].map(header_cell).concat();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Metro Milwaukee Miniature Monthly Magazine</title>
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
             background: #f9fafb; margin: 0; padding: 32px 16px;">
  <div style="max-width: 800px; margin: 0 auto; background: white;
              border-radius: 12px; overflow: hidden; box-shadow: 0 1px 3px rgba(0,0,0,0.1);">
    <a href="{safe_url}" style="text-decoration: none; display: block;">
      <div style="background: #7c3aed; padding: 32px; text-align: center;">
        <h1 style="color: white; margin: 0; font-size: 24px;">&#127922; Metro Milwaukee Miniature Monthly Magazine</h1>
        <p style="color: #ddd6fe; margin: 8px 0 0; font-size: 15px;">All Events This Month</p>
      </div>
    </a>
    <div style="padding: 32px;">
      {calendar}
      <div style="overflow-x: auto;">
        <table style="width: 100%; border-collapse: collapse; font-size: 14px;">
          <thead>
            <tr style="background: #f3f4f6; text-align: left;">{headers}</tr>
          </thead>
          <tbody>{rows}
          </tbody>
        </table>
      </div>
    </div>
  </div>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures::{default_event, event};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const SITE: &str = "https://events.example.com";

    #[test]
    fn returns_html_document_with_heading() {
        let html = build_preview_email(&[default_event(date(2026, 2, 15))], SITE, date(2026, 2, 1));
        assert!(html.trim_start().starts_with("<!DOCTYPE html>"));
        assert!(html.contains("All Events This Month"));
        assert!(html.contains(r#"<a href="https://events.example.com""#));
    }

    #[test]
    fn includes_event_details() {
        let e = event("Saturday Skirmish", (2, "Age of Sigmar"), "Dragon's Den", date(2026, 2, 15));
        let html = build_preview_email(&[e], SITE, date(2026, 2, 1));
        assert!(html.contains("Saturday Skirmish"));
        assert!(html.contains("Age of Sigmar"));
        assert!(html.contains("Dragon&#x27;s Den"));
        assert!(html.contains("18:00 CST"));
    }

    #[test]
    fn table_dates_omit_the_year() {
        let html = build_preview_email(&[default_event(date(2026, 2, 15))], SITE, date(2026, 2, 1));
        assert!(html.contains(">Sun, Feb 15</td>"));
        assert!(!html.contains("Feb 15 2026"));
    }

    #[test]
    fn empty_events_still_render_table() {
        let html = build_preview_email(&[], SITE, date(2026, 2, 1));
        assert!(html.contains("<table"));
        assert!(html.contains("<tbody>"));
        assert!(html.contains("February 2026"));
    }

    #[test]
    fn missing_start_time_shows_tbd() {
        let mut e = default_event(date(2026, 2, 15));
        e.event.start_time = None;
        let html = build_preview_email(&[e], SITE, date(2026, 2, 1));
        assert!(html.contains(">TBD</td>"));
        assert!(!html.contains("CST"));
    }

    #[test]
    fn link_column_only_when_source_url_present() {
        let mut linked = event("Linked", (1, "40K"), "Game Vault", date(2026, 2, 15));
        linked.event.source_url = Some("https://example.com/e?a=1&b=2".to_owned());
        let unlinked = event("Unlinked", (1, "40K"), "Game Vault", date(2026, 2, 16));
        let html = build_preview_email(&[linked, unlinked], SITE, date(2026, 2, 1));
        assert_eq!(html.matches("↗</a>").count(), 1);
        assert!(html.contains(r#"href="https://example.com/e?a=1&amp;b=2""#));
    }

    #[test]
    fn multiple_events_all_appear() {
        let events = vec![
            event("Event Alpha", (1, "40K"), "Game Vault", date(2026, 2, 3)),
            event("Event Beta", (1, "40K"), "Game Vault", date(2026, 2, 4)),
        ];
        let html = build_preview_email(&events, SITE, date(2026, 2, 1));
        assert!(html.contains("Event Alpha"));
        assert!(html.contains("Event Beta"));
    }
}
