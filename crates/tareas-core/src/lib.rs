//! # Tareas Core Library
//!
//! Core business logic for the Tareas task tracker: the task data model and
//! its mutation/query engine. The presentation layer (lists, modals,
//! drag-and-drop, calendar, charts) is a thin rendering shell over this
//! crate.
//!
//! ## Architecture
//!
//! - **Task Store**: owns the authoritative task list and is its only
//!   mutator; every operation validates, applies, then persists through the
//!   injected storage collaborator
//! - **Derivations**: filtering and statistics are pure functions over a
//!   snapshot of the list and never mutate it
//! - **Codecs**: JSON round-trip plus one-way CSV and Markdown exports
//! - **Storage**: a key-value abstraction with in-memory and JSON-file
//!   implementations, plus TOML settings
//!
//! ## Key Components
//!
//! - [`TaskStore`]: mutation operations over the task list
//! - [`Task`], [`SubTask`], [`Category`], [`Priority`]: the entity model
//! - [`filter_tasks`]: multi-criteria filtering
//! - [`stats`]: category breakdown, weekly productivity, streaks

pub mod categorize;
pub mod due;
pub mod error;
pub mod export;
pub mod filter;
pub mod stats;
pub mod storage;
pub mod store;
pub mod task;
pub mod validate;

pub use categorize::assign_category_by_keywords;
pub use due::{due_status, due_status_at, format_due_date, format_due_date_at, DueStatus};
pub use error::{Result, TaskError};
pub use export::{export_to_csv, export_to_json, export_to_markdown, import_from_json};
pub use filter::{filter_tasks, StatusFilter, TaskFilter};
pub use stats::{
    average_completion_days, completion_streak, tasks_by_category, weekly_productivity,
    CategoryCount, DailyCompletion, StreakStats,
};
pub use storage::{JsonFileStorage, MemoryStorage, Settings, Storage};
pub use store::{TaskPatch, TaskStore};
pub use task::{Category, Priority, SubTask, SubTaskProgress, Task};
