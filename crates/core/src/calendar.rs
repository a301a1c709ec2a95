//! Calendar arithmetic for the monthly newsletter schedule.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Number of days in the given month, 28..=31.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map_or(31, |d| d.day())
}

/// First and last day of the month containing `date`.
#[must_use]
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = date.with_day(days_in_month(date.year(), date.month())).unwrap_or(date);
    (first, last)
}

/// All Saturdays in the month containing `date`, ascending.
fn saturdays_in_month(date: NaiveDate) -> Vec<NaiveDate> {
    let (first, last) = month_bounds(date);
    let offset = (7 + Weekday::Sat.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
    let mut day = first + Duration::days(i64::from(offset));
    let mut saturdays = Vec::with_capacity(5);
    while day <= last {
        saturdays.push(day);
        day += Duration::days(7);
    }
    saturdays
}

/// True when `date` is the second-to-last Saturday of its month.
#[must_use]
pub fn is_second_to_last_saturday(date: NaiveDate) -> bool {
    let saturdays = saturdays_in_month(date);
    saturdays.len() >= 2 && saturdays[saturdays.len() - 2] == date
}
