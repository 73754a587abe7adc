//! Task and sub-task entity types.
//!
//! `Task` is the single persisted entity of the application. The serialized
//! field names (camelCase) and the enum wire strings are a stable contract
//! shared with the export/import codec and with previously saved data, so
//! they must not change.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Closed classification label for a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Design,
    Development,
    Review,
    General,
}

impl Category {
    /// All categories, in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Design,
            Category::Development,
            Category::Review,
            Category::General,
        ]
    }

    /// Serialized name, as written to JSON/CSV/Markdown.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Design => "Design",
            Category::Development => "Development",
            Category::Review => "Review",
            Category::General => "General",
        }
    }

    /// Spanish display label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Design => "Diseño",
            Category::Development => "Desarrollo",
            Category::Review => "Revisión",
            Category::General => "General",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::General
    }
}

/// Optional urgency label for a task.
///
/// Wire strings are the Spanish labels, matching previously saved data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    #[serde(rename = "Alta")]
    High,
    #[serde(rename = "Media")]
    Medium,
    #[serde(rename = "Baja")]
    Low,
}

impl Priority {
    /// All priorities, highest first.
    pub fn all() -> &'static [Priority] {
        &[Priority::High, Priority::Medium, Priority::Low]
    }

    /// Spanish display label (also the wire string).
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "Alta",
            Priority::Medium => "Media",
            Priority::Low => "Baja",
        }
    }

    /// Sort rank, highest priority first; tasks without a priority sort last.
    fn rank(priority: Option<Priority>) -> u8 {
        match priority {
            Some(Priority::High) => 1,
            Some(Priority::Medium) => 2,
            Some(Priority::Low) => 3,
            None => 4,
        }
    }
}

/// A child checklist item belonging to exactly one task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubTask {
    /// Identifier, unique within the parent's sub-task list
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

/// A user-created to-do item with scheduling and categorization metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier within the store
    pub id: i64,
    /// Task text, non-empty and whitespace-collapsed
    pub text: String,
    /// Whether the task is completed
    pub completed: bool,
    /// Category label, defaulted by keyword heuristics when not given
    pub category: Category,
    /// Optional urgency label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Optional due date (date-only granularity in practice)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Tags, unique within the task, display order
    #[serde(default)]
    pub tags: Vec<String>,
    /// Sub-tasks in display order
    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,
    /// Creation timestamp, immutable after creation
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp, refreshed on every change to the task
    /// or its sub-tasks
    pub updated_at: DateTime<Utc>,
}

/// Completion progress over a task's sub-task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubTaskProgress {
    pub completed: usize,
    pub total: usize,
    /// Rounded percentage, 0 when there are no sub-tasks
    pub percentage: u32,
}

impl Task {
    /// Create a task with the given identity and defaults for everything else.
    pub fn new(id: i64, text: impl Into<String>, category: Category, now: DateTime<Utc>) -> Self {
        Task {
            id,
            text: text.into(),
            completed: false,
            category,
            priority: None,
            due_date: None,
            tags: Vec::new(),
            sub_tasks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Progress over the sub-task checklist.
    pub fn sub_task_progress(&self) -> SubTaskProgress {
        let total = self.sub_tasks.len();
        if total == 0 {
            return SubTaskProgress::default();
        }
        let completed = self.sub_tasks.iter().filter(|st| st.completed).count();
        let percentage = ((completed as f64 / total as f64) * 100.0).round() as u32;
        SubTaskProgress {
            completed,
            total,
            percentage,
        }
    }
}

/// Sort a snapshot by priority, highest first; unprioritized tasks last.
///
/// Returns a new list; the input order is the tie-breaker (stable sort).
pub fn sort_by_priority(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by_key(|t| Priority::rank(t.priority));
    sorted
}

/// Sort a snapshot by due date. Tasks without a due date always sort last.
pub fn sort_by_due_date(tasks: &[Task], ascending: bool) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| match (a.due_date, b.due_date) {
        (None, None) => std::cmp::Ordering::Equal,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (Some(_), None) => std::cmp::Ordering::Less,
        (Some(da), Some(db)) => {
            if ascending {
                da.cmp(&db)
            } else {
                db.cmp(&da)
            }
        }
    });
    sorted
}

/// Sort a snapshot by creation time, newest first by default.
pub fn sort_by_created(tasks: &[Task], ascending: bool) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| {
        if ascending {
            a.created_at.cmp(&b.created_at)
        } else {
            b.created_at.cmp(&a.created_at)
        }
    });
    sorted
}

/// Distinct tags across all tasks, sorted alphabetically.
pub fn all_tags(tasks: &[Task]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for task in tasks {
        for tag in &task.tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
    }
    tags.sort();
    tags
}

fn is_hashtag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "áéíóúñÁÉÍÓÚÑ".contains(c)
}

/// Extract `#hashtag` tokens from free text, without the leading `#`.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '#' {
            continue;
        }
        let mut tag = String::new();
        while let Some(&next) = chars.peek() {
            if !is_hashtag_char(next) {
                break;
            }
            tag.push(next);
            chars.next();
        }
        if !tag.is_empty() {
            tags.push(tag);
        }
    }
    tags
}

/// Starter tasks shown on a fresh install, before the user has saved anything.
pub fn seed_tasks(now: DateTime<Utc>) -> Vec<Task> {
    let mut figma = Task::new(1, "Diseñar la interfaz de usuario en Figma", Category::Design, now);
    figma.priority = Some(Priority::High);

    let mut react = Task::new(2, "Desarrollar componentes de React", Category::Development, now);
    react.priority = Some(Priority::Medium);

    let mut state = Task::new(3, "Implementar la lógica de estado", Category::Development, now);
    state.due_date = Some(now + Duration::days(2));

    let mut feedback = Task::new(4, "Revisar el feedback del equipo", Category::Review, now);
    feedback.completed = true;
    feedback.tags = vec!["equipo".to_string(), "feedback".to_string()];

    vec![figma, react, state, feedback]
}
