//! Input validation rules for task text and tags.
//!
//! Validation happens strictly before mutation: the store calls these on the
//! add path, and editing surfaces call them before submitting an update.

use crate::error::{Result, TaskError};
use crate::task::Task;

/// Maximum task text length, in characters.
pub const MAX_TASK_LENGTH: usize = 500;
/// Maximum tag length, in characters.
pub const MAX_TAG_LENGTH: usize = 20;
/// Maximum number of tags on a single task.
pub const MAX_TAGS_PER_TASK: usize = 10;

/// Validate task text: non-empty after trimming, at most [`MAX_TASK_LENGTH`].
pub fn validate_task_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(TaskError::EmptyText);
    }
    if text.chars().count() > MAX_TASK_LENGTH {
        return Err(TaskError::TooLong { max: MAX_TASK_LENGTH });
    }
    Ok(())
}

// Letters (including accented Spanish), digits, spaces and hyphens.
fn is_valid_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || c == '-' || "áéíóúñÁÉÍÓÚÑ".contains(c)
}

/// Validate a single tag: non-empty, at most [`MAX_TAG_LENGTH`], restricted
/// character set.
pub fn validate_tag(tag: &str) -> Result<()> {
    if tag.trim().is_empty() {
        return Err(TaskError::EmptyTag);
    }
    if tag.chars().count() > MAX_TAG_LENGTH {
        return Err(TaskError::TagTooLong { max: MAX_TAG_LENGTH });
    }
    if !tag.chars().all(is_valid_tag_char) {
        return Err(TaskError::InvalidCharacters);
    }
    Ok(())
}

/// Validate a tag set: at most [`MAX_TAGS_PER_TASK`], then each tag in order,
/// propagating the first failure.
pub fn validate_tags(tags: &[String]) -> Result<()> {
    if tags.len() > MAX_TAGS_PER_TASK {
        return Err(TaskError::TooManyTags { max: MAX_TAGS_PER_TASK });
    }
    for tag in tags {
        validate_tag(tag)?;
    }
    Ok(())
}

/// Whether any task other than `exclude_id` has the same text, compared
/// case-insensitively after trimming.
pub fn is_duplicate_task(tasks: &[Task], text: &str, exclude_id: Option<i64>) -> bool {
    let needle = text.trim().to_lowercase();
    tasks.iter().any(|task| {
        Some(task.id) != exclude_id && task.text.trim().to_lowercase() == needle
    })
}

/// Trim and collapse internal whitespace runs to single spaces.
pub fn sanitize_input(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
