use chrono::{Datelike, NaiveDate};
use eventboard_core::{days_in_month, EventWithRelations};

use super::escape_html;

/// Pill colours as (background, text), indexed by `(game_system.id - 1) % 7`.
const PILL_COLORS: [(&str, &str); 7] = [
    ("#ede9fe", "#5b21b6"),
    ("#e0e7ff", "#3730a3"),
    ("#e0f2fe", "#075985"),
    ("#d1fae5", "#065f46"),
    ("#fef3c7", "#92400e"),
    ("#ffe4e6", "#9f1239"),
    ("#ccfbf1", "#115e59"),
];

const MAX_PILLS_PER_DAY: usize = 3;

fn pill_color(game_system_id: i64) -> (&'static str, &'static str) {
    let idx = (game_system_id - 1).rem_euclid(PILL_COLORS.len() as i64);
    PILL_COLORS[usize::try_from(idx).unwrap_or(0)]
}

const EMPTY_CELL: &str = r#"<td style="border-right:1px solid #f3f4f6;border-bottom:1px solid #f3f4f6;background:#f9fafb;padding:6px;min-width:0;height:80px;"></td>"#;

/// Month grid (Sunday first) with up to three event pills per day and a game legend.
#[must_use]
pub fn build_calendar_html(
    events: &[EventWithRelations],
    year: i32,
    month: u32,
    today: NaiveDate,
) -> String {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return String::new();
    };

    // Legend keeps first-seen order of game systems in this month.
    let mut legend_systems: Vec<(i64, &str)> = Vec::new();
    for e in events {
        if e.event.date.year() == year
            && e.event.date.month() == month
            && !legend_systems.iter().any(|(id, _)| *id == e.game_system.id)
        {
            legend_systems.push((e.game_system.id, &e.game_system.name));
        }
    }

    let leading = first.weekday().num_days_from_sunday() as usize;
    let day_count = days_in_month(year, month);
    let mut cells: Vec<Option<u32>> = vec![None; leading];
    cells.extend((1..=day_count).map(Some));
    while cells.len() % 7 != 0 {
        cells.push(None);
    }

    let day_headers: String = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
        .iter()
        .map(|d| {
            format!(
                r#"<th style="padding:8px 4px;text-align:center;color:#9ca3af;font-size:11px;font-weight:600;text-transform:uppercase;letter-spacing:0.05em;border-bottom:1px solid #f3f4f6;">{d}</th>"#
            )
        })
        .collect();

    let mut rows = String::new();
    for week in cells.chunks(7) {
        rows.push_str("<tr>");
        for cell in week {
            let Some(day) = *cell else {
                rows.push_str(EMPTY_CELL);
                continue;
            };
            let Some(date) = first.with_day(day) else {
                rows.push_str(EMPTY_CELL);
                continue;
            };
            let day_events: Vec<&EventWithRelations> =
                events.iter().filter(|e| e.event.date == date).collect();
            let highlight = if date == today {
                "background:#7c3aed;color:white;"
            } else {
                "color:#374151;"
            };

            let mut pills = String::new();
            for e in day_events.iter().take(MAX_PILLS_PER_DAY) {
                let (bg, fg) = pill_color(e.game_system.id);
                pills.push_str(&format!(
                    r#"<div style="font-size:11px;padding:1px 5px;border-radius:3px;font-weight:500;overflow:hidden;white-space:nowrap;text-overflow:ellipsis;margin-bottom:2px;background:{bg};color:{fg};">{}</div>"#,
                    escape_html(&e.event.title)
                ));
            }
            let overflow = day_events.len().saturating_sub(MAX_PILLS_PER_DAY);
            if overflow > 0 {
                pills.push_str(&format!(
                    r#"<div style="font-size:11px;color:#9ca3af;padding-left:4px;">+{overflow} more</div>"#
                ));
            }

            rows.push_str(&format!(
                r#"<td style="vertical-align:top;padding:6px;border-right:1px solid #f3f4f6;border-bottom:1px solid #f3f4f6;min-width:0;height:80px;"><div style="text-align:right;margin-bottom:4px;"><span style="display:inline-flex;align-items:center;justify-content:center;width:22px;height:22px;border-radius:50%;font-size:11px;font-weight:600;{highlight}">{day}</span></div>{pills}</td>"#
            ));
        }
        rows.push_str("</tr>");
    }

    let legend: String = legend_systems
        .iter()
        .map(|(id, name)| {
            let (bg, fg) = pill_color(*id);
            format!(
                r#"<span style="font-size:12px;padding:2px 10px;border-radius:9999px;font-weight:500;margin-right:6px;background:{bg};color:{fg};">{}</span>"#,
                escape_html(name)
            )
        })
        .collect();
    let legend_block = if legend.is_empty() {
        String::new()
    } else {
        format!(r#"<div style="margin-top:10px;line-height:2;">{legend}</div>"#)
    };

    let month_name = first.format("%B %Y");
    format!(
        r#"<div style="margin-bottom:24px;"><h2 style="font-size:15px;font-weight:600;color:#374151;margin:0 0 12px 0;">{month_name}</h2><div style="border-radius:12px;overflow:hidden;border:1px solid #f3f4f6;box-shadow:0 1px 3px rgba(0,0,0,0.06);"><table style="width:100%;border-collapse:collapse;table-layout:fixed;background:white;"><thead><tr>{day_headers}</tr></thead><tbody>{rows}</tbody></table></div>{legend_block}</div>"#
    )
}
