//! Productivity statistics derived from a task snapshot.
//!
//! All aggregations are pure functions of the snapshot and an explicit
//! `now`; completion dates are taken from `updated_at` (a completed task's
//! last mutation is its completion toggle in practice).

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};

use crate::task::{Category, Task};

/// Number of tasks in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

/// Completed-task count for one day of the current week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCompletion {
    pub day: NaiveDate,
    /// Spanish weekday abbreviation ("lun", "mar", ...)
    pub label: &'static str,
    pub completed: usize,
}

/// Consecutive-day completion streak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakStats {
    /// Days of the streak ending today or yesterday, capped at 7
    pub current: u32,
    /// Longest consecutive run anywhere in history
    pub max: u32,
}

/// Count tasks per category, one entry per category present, in the order
/// categories first appear in the snapshot.
pub fn tasks_by_category(tasks: &[Task]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    for task in tasks {
        match counts.iter_mut().find(|c| c.category == task.category) {
            Some(entry) => entry.count += 1,
            None => counts.push(CategoryCount { category: task.category, count: 1 }),
        }
    }
    counts
}

fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "lun",
        Weekday::Tue => "mar",
        Weekday::Wed => "mié",
        Weekday::Thu => "jue",
        Weekday::Fri => "vie",
        Weekday::Sat => "sáb",
        Weekday::Sun => "dom",
    }
}

fn start_of_week(today: NaiveDate, week_starts_on: Weekday) -> NaiveDate {
    let offset = (7 + today.weekday().num_days_from_monday() as i64
        - week_starts_on.num_days_from_monday() as i64)
        % 7;
    today - Duration::days(offset)
}

/// Completed-task counts for each day of the calendar week containing `now`,
/// in week order. Always returns 7 entries.
pub fn weekly_productivity_at(
    tasks: &[Task],
    now: DateTime<Utc>,
    week_starts_on: Weekday,
) -> Vec<DailyCompletion> {
    let week_start = start_of_week(now.date_naive(), week_starts_on);
    (0..7)
        .map(|i| {
            let day = week_start + Duration::days(i);
            let completed = tasks
                .iter()
                .filter(|t| t.completed && t.updated_at.date_naive() == day)
                .count();
            DailyCompletion { day, label: weekday_label(day.weekday()), completed }
        })
        .collect()
}

/// [`weekly_productivity_at`] against the wall clock, Monday-start week.
pub fn weekly_productivity(tasks: &[Task]) -> Vec<DailyCompletion> {
    weekly_productivity_at(tasks, Utc::now(), Weekday::Mon)
}

/// Completion streak over the distinct calendar dates with at least one
/// completed task.
///
/// `current` only counts a streak still alive (most recent completion today
/// or yesterday) and is capped at 7 for display; `max` is the longest run of
/// strictly adjacent dates anywhere in history.
pub fn completion_streak_at(tasks: &[Task], now: DateTime<Utc>) -> StreakStats {
    let mut dates: Vec<NaiveDate> = tasks
        .iter()
        .filter(|t| t.completed)
        .map(|t| t.updated_at.date_naive())
        .collect();
    dates.sort();
    dates.dedup();

    let Some(&newest) = dates.last() else {
        return StreakStats::default();
    };

    let mut max = 1u32;
    let mut run = 1u32;
    for pair in dates.windows(2) {
        if pair[1] - pair[0] == Duration::days(1) {
            run += 1;
            max = max.max(run);
        } else {
            run = 1;
        }
    }

    let today = now.date_naive();
    let current = if today - newest <= Duration::days(1) {
        let mut streak = 1u32;
        for pair in dates.windows(2).rev() {
            if pair[1] - pair[0] == Duration::days(1) {
                streak += 1;
            } else {
                break;
            }
        }
        streak.min(7)
    } else {
        0
    };

    StreakStats { current, max }
}

/// [`completion_streak_at`] against the wall clock.
pub fn completion_streak(tasks: &[Task]) -> StreakStats {
    completion_streak_at(tasks, Utc::now())
}

/// Mean `updated_at - created_at` in days over completed tasks, 0 when no
/// task is completed.
pub fn average_completion_days(tasks: &[Task]) -> f64 {
    let completed: Vec<&Task> = tasks.iter().filter(|t| t.completed).collect();
    if completed.is_empty() {
        return 0.0;
    }
    let total_days: f64 = completed
        .iter()
        .map(|t| {
            let millis = (t.updated_at - t.created_at).num_milliseconds().abs();
            millis as f64 / (1000.0 * 60.0 * 60.0 * 24.0)
        })
        .sum();
    total_days / completed.len() as f64
}
