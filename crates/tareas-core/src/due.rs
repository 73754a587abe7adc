//! Due-date classification and display labels.
//!
//! Due dates are compared at calendar-day granularity against an explicit
//! `now`, so the functions stay deterministic under test. The variants with
//! no `_at` suffix read the wall clock and assume a Monday week start, the
//! convention of the app's Spanish locale.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};

/// Derived classification of how a due date relates to the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// Strictly in the past, not today
    Overdue,
    /// Due today
    Today,
    /// Later this calendar week
    Soon,
    /// Beyond the current week
    Normal,
}

fn week_bounds(today: NaiveDate, week_starts_on: Weekday) -> (NaiveDate, NaiveDate) {
    let offset = (7 + today.weekday().num_days_from_monday() as i64
        - week_starts_on.num_days_from_monday() as i64)
        % 7;
    let start = today - Duration::days(offset);
    (start, start + Duration::days(6))
}

/// Classify a due date relative to `now`. Returns `None` when there is no
/// due date.
///
/// Overdue and today are mutually exclusive and checked before soon, so a
/// date earlier this week is overdue, never soon.
pub fn due_status_at(
    due: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    week_starts_on: Weekday,
) -> Option<DueStatus> {
    let due_day = due?.date_naive();
    let today = now.date_naive();

    if due_day < today {
        return Some(DueStatus::Overdue);
    }
    if due_day == today {
        return Some(DueStatus::Today);
    }
    let (_, week_end) = week_bounds(today, week_starts_on);
    if due_day <= week_end {
        return Some(DueStatus::Soon);
    }
    Some(DueStatus::Normal)
}

/// [`due_status_at`] against the wall clock with a Monday week start.
pub fn due_status(due: Option<DateTime<Utc>>) -> Option<DueStatus> {
    due_status_at(due, Utc::now(), Weekday::Mon)
}

/// Human-readable due-date label relative to `now`: `"Hoy"` when due today,
/// otherwise a relative phrase in days ("en 2 días", "hace 3 días").
/// Empty string when there is no due date.
pub fn format_due_date_at(due: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(due) = due else {
        return String::new();
    };
    let days = (due.date_naive() - now.date_naive()).num_days();
    match days {
        0 => "Hoy".to_string(),
        1 => "en 1 día".to_string(),
        -1 => "hace 1 día".to_string(),
        d if d > 0 => format!("en {d} días"),
        d => format!("hace {} días", -d),
    }
}

/// [`format_due_date_at`] against the wall clock.
pub fn format_due_date(due: Option<DateTime<Utc>>) -> String {
    format_due_date_at(due, Utc::now())
}
