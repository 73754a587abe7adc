//! Multi-criteria task filtering.
//!
//! Filtering is a pure derivation over a snapshot: criteria compose
//! conjunctively and the result preserves the snapshot's order.

use serde::{Deserialize, Serialize};

use crate::task::{Category, Task};

/// Completion-status criterion.
///
/// Wire strings are the Spanish filter names the presentation layer saves.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatusFilter {
    #[serde(rename = "Todas")]
    All,
    #[serde(rename = "Activas")]
    Active,
    #[serde(rename = "Completadas")]
    Completed,
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::All
    }
}

/// A filter specification. `Default` matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub status: StatusFilter,
    /// `None` means all categories
    pub category: Option<Category>,
    /// Tasks must share at least one selected tag; empty means no tag filter
    pub tags: Vec<String>,
    /// Case-insensitive substring match over text, tags and category name
    pub query: String,
}

fn matches(task: &Task, filter: &TaskFilter) -> bool {
    match filter.status {
        StatusFilter::Active if task.completed => return false,
        StatusFilter::Completed if !task.completed => return false,
        _ => {}
    }

    if let Some(category) = filter.category {
        if task.category != category {
            return false;
        }
    }

    if !filter.tags.is_empty() && !filter.tags.iter().any(|tag| task.tags.contains(tag)) {
        return false;
    }

    if !filter.query.is_empty() {
        let query = filter.query.to_lowercase();
        let in_text = task.text.to_lowercase().contains(&query);
        let in_tags = task.tags.iter().any(|tag| tag.to_lowercase().contains(&query));
        let in_category = task.category.name().to_lowercase().contains(&query);
        if !in_text && !in_tags && !in_category {
            return false;
        }
    }

    true
}

/// Apply a filter to a snapshot, keeping the snapshot's relative order.
pub fn filter_tasks(tasks: &[Task], filter: &TaskFilter) -> Vec<Task> {
    tasks.iter().filter(|t| matches(t, filter)).cloned().collect()
}
