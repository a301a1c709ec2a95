use eventboard_core::EventWithRelations;

use super::{escape_html, header_cell};

/// Personal digest of upcoming events for one subscriber.
#[must_use]
pub fn build_subscriber_email(events: &[EventWithRelations]) -> String {
    let mut rows = String::new();
    for e in events {
        rows.push_str(&format!(
            r#"
        <tr style="border-bottom: 1px solid #e5e7eb;">
          <td style="padding: 10px 12px; white-space: nowrap;">{date}</td>
          <td style="padding: 10px 12px; white-space: nowrap;">{time}</td>
          <td style="padding: 10px 12px; font-weight: 600; color: #7c3aed;">{game}</td>
          <td style="padding: 10px 12px;">{location}</td>
          <td style="padding: 10px 12px; font-weight: 500;">{title}</td>
          <td style="padding: 10px 12px; color: #6b7280; font-size: 13px;">{description}</td>
        </tr>"#,
            date = e.event.date.format("%a, %b %d %Y"),
            time = escape_html(e.event.start_time.as_deref().unwrap_or("TBD")),
            game = escape_html(&e.game_system.name),
            location = escape_html(&e.location.name),
            title = escape_html(&e.event.title),
            description = escape_html(e.event.description.as_deref().unwrap_or_default()),
        ));
    }

    let headers: String =
        ["Date", "Time", "Game", "Location", "Event", "Details"].map(header_cell).concat();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Your Upcoming Wargame Events</title>
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
             background: #f9fafb; margin: 0; padding: 32px 16px;">
  <div style="max-width: 700px; margin: 0 auto; background: white;
              border-radius: 12px; overflow: hidden; box-shadow: 0 1px 3px rgba(0,0,0,0.1);">
    <div style="background: #7c3aed; padding: 32px; text-align: center;">
      <h1 style="color: white; margin: 0; font-size: 24px;">&#127922; Wargame Event Finder</h1>
      <p style="color: #ddd6fe; margin: 8px 0 0; font-size: 15px;">Your upcoming events for this month</p>
    </div>
    <div style="padding: 32px;">
      <p style="color: #374151; margin: 0 0 24px;">
        Hi there! Here are the upcoming events matching your interests:
      </p>
      <div style="overflow-x: auto;">
        <table style="width: 100%; border-collapse: collapse; font-size: 14px;">
          <thead>
            <tr style="background: #f3f4f6; text-align: left;">{headers}</tr>
          </thead>
          <tbody>{rows}
          </tbody>
        </table>
      </div>
      <p style="color: #9ca3af; font-size: 13px; margin: 32px 0 0; text-align: center;">
        You&#39;re receiving this because you subscribed at Wargame Event Finder.<br>
        To unsubscribe or update preferences, reply to this email.
      </p>
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
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn renders_document_with_title() {
        let html = build_subscriber_email(&[default_event(date(2026, 3, 6))]);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Your Upcoming Wargame Events</title>"));
        assert!(html.contains("Wargame Event Finder"));
    }

    #[test]
    fn formats_date_with_weekday_and_year() {
        let html = build_subscriber_email(&[default_event(date(2026, 3, 6))]);
        assert!(html.contains("Fri, Mar 06 2026"));
    }

    #[test]
    fn missing_time_shows_tbd() {
        let mut e = default_event(date(2026, 3, 6));
        e.event.start_time = None;
        let html = build_subscriber_email(&[e]);
        assert!(html.contains(">TBD</td>"));
    }

    #[test]
    fn crawled_text_is_escaped() {
        let mut e = event("<img src=x>", (1, "40K & More"), "Dragon's Den", date(2026, 3, 6));
        e.event.description = Some("<script>".to_owned());
        let html = build_subscriber_email(&[e]);
        assert!(html.contains("&lt;img src=x&gt;"));
        assert!(html.contains("40K &amp; More"));
        assert!(html.contains("Dragon&#x27;s Den"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn has_one_row_per_event() {
        let events = vec![default_event(date(2026, 3, 6)), default_event(date(2026, 3, 7))];
        let html = build_subscriber_email(&events);
        assert_eq!(html.matches("border-bottom: 1px solid #e5e7eb").count(), 2);
    }
}
