//! Inline-styled HTML rendering for newsletters.

mod calendar;
mod preview;
mod subscriber;

pub use calendar::build_calendar_html;
pub use preview::build_preview_email;
pub use subscriber::build_subscriber_email;

/// Escape text for HTML element content and quoted attribute values.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shared column header cell.
pub(crate) fn header_cell(label: &str) -> String {
    format!(r#"<th style="padding: 10px 12px; color: #6b7280; font-weight: 600;">{label}</th>"#)
}
