//! The task store: single writer over the authoritative task list.
//!
//! Every mutation validates first, applies in memory, then persists the
//! whole list through the injected [`Storage`] collaborator before
//! returning, so readers always see a fully committed snapshot. All other
//! components (filtering, stats, codecs) are pure functions over the
//! snapshot exposed by [`TaskStore::tasks`].

use chrono::{DateTime, Duration, Utc};

use crate::categorize::assign_category_by_keywords;
use crate::error::{Result, TaskError};
use crate::storage::{Storage, TASKS_KEY};
use crate::task::{seed_tasks, Category, Priority, SubTask, Task};
use crate::validate::{is_duplicate_task, sanitize_input, validate_task_text};

/// A partial update for [`TaskStore::update_task`].
///
/// `None` leaves a field untouched; the nested options clear or set the
/// optional fields. Updates are not re-validated or re-deduplicated here;
/// editing surfaces run the validators before submitting.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub category: Option<Category>,
    pub priority: Option<Option<Priority>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub tags: Option<Vec<String>>,
}

/// Owner of the in-memory task list and its sole authorized mutator.
pub struct TaskStore<S: Storage> {
    storage: S,
    tasks: Vec<Task>,
    next_id: i64,
    last_stamp: DateTime<Utc>,
}

impl<S: Storage> TaskStore<S> {
    /// Open a store over the given storage, loading any persisted task list.
    pub fn open(storage: S) -> Result<Self> {
        let tasks: Vec<Task> = match storage.get(TASKS_KEY)? {
            Some(value) => serde_json::from_value(value)?,
            None => Vec::new(),
        };
        Ok(Self::with_tasks(storage, tasks))
    }

    /// Open a store, seeding the starter tasks on first run (when the
    /// storage has no task list yet).
    pub fn open_or_seed(storage: S) -> Result<Self> {
        match storage.get(TASKS_KEY)? {
            Some(value) => Ok(Self::with_tasks(storage, serde_json::from_value(value)?)),
            None => {
                let mut store = Self::with_tasks(storage, seed_tasks(Utc::now()));
                store.persist()?;
                Ok(store)
            }
        }
    }

    fn with_tasks(storage: S, tasks: Vec<Task>) -> Self {
        let next_id = Self::id_floor(&tasks);
        Self {
            storage,
            tasks,
            next_id,
            last_stamp: DateTime::<Utc>::MIN_UTC,
        }
    }

    // Fresh ids stay unique and roughly time-ordered: never below the
    // current unix-millis, never at or below an existing id.
    fn id_floor(tasks: &[Task]) -> i64 {
        let max_existing = tasks.iter().map(|t| t.id).max().unwrap_or(0);
        max_existing.max(Utc::now().timestamp_millis()) + 1
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // Mutation timestamp, clamped to strictly advance past the previous
    // stamp issued by this store even within one clock tick.
    fn stamp(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if now <= self.last_stamp {
            now = self.last_stamp + Duration::microseconds(1);
        }
        self.last_stamp = now;
        now
    }

    fn persist(&mut self) -> Result<()> {
        let value = serde_json::to_value(&self.tasks)?;
        self.storage.set(TASKS_KEY, value)
    }

    /// The current committed snapshot, in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Create a task and prepend it to the list. Returns the new task's id.
    ///
    /// The text is sanitized and validated, duplicates (case-insensitive,
    /// trimmed) are rejected, and the category falls back to the keyword
    /// heuristic when not given.
    pub fn add_task(
        &mut self,
        text: &str,
        category: Option<Category>,
        priority: Option<Priority>,
        due_date: Option<DateTime<Utc>>,
        tags: Option<Vec<String>>,
    ) -> Result<i64> {
        let sanitized = sanitize_input(text);
        validate_task_text(&sanitized)?;
        if is_duplicate_task(&self.tasks, &sanitized, None) {
            return Err(TaskError::DuplicateTask);
        }

        let category = category.unwrap_or_else(|| assign_category_by_keywords(&sanitized));
        let now = self.stamp();
        let id = self.allocate_id();

        let mut task = Task::new(id, sanitized, category, now);
        task.priority = priority;
        task.due_date = due_date;
        task.tags = tags.unwrap_or_default();

        self.tasks.insert(0, task);
        self.persist()?;
        Ok(id)
    }

    /// Merge a patch into the task with the given id and refresh its
    /// `updated_at`. No-op when the id is unknown.
    pub fn update_task(&mut self, id: i64, patch: TaskPatch) -> Result<()> {
        let now = self.stamp();
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(());
        };
        if let Some(text) = patch.text {
            task.text = text;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        if let Some(category) = patch.category {
            task.category = category;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(tags) = patch.tags {
            task.tags = tags;
        }
        task.updated_at = now;
        self.persist()
    }

    /// Remove the task with the given id. No-op when the id is unknown.
    pub fn delete_task(&mut self, id: i64) -> Result<()> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Ok(());
        }
        self.persist()
    }

    /// Flip the completion flag of the task with the given id.
    pub fn toggle_task(&mut self, id: i64) -> Result<()> {
        let now = self.stamp();
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(());
        };
        task.completed = !task.completed;
        task.updated_at = now;
        self.persist()
    }

    /// Append a sub-task to the given task. No-op when the text is empty
    /// after sanitizing or the task is unknown.
    pub fn add_sub_task(&mut self, task_id: i64, text: &str) -> Result<()> {
        let sanitized = sanitize_input(text);
        if sanitized.is_empty() {
            return Ok(());
        }
        let now = self.stamp();
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return Ok(());
        };
        let sub_id = task.sub_tasks.iter().map(|st| st.id).max().unwrap_or(0) + 1;
        task.sub_tasks.push(SubTask {
            id: sub_id,
            text: sanitized,
            completed: false,
        });
        task.updated_at = now;
        self.persist()
    }

    /// Flip the completion flag of a sub-task and refresh the parent's
    /// `updated_at`.
    pub fn toggle_sub_task(&mut self, task_id: i64, sub_task_id: i64) -> Result<()> {
        let now = self.stamp();
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return Ok(());
        };
        let Some(sub) = task.sub_tasks.iter_mut().find(|st| st.id == sub_task_id) else {
            return Ok(());
        };
        sub.completed = !sub.completed;
        task.updated_at = now;
        self.persist()
    }

    /// Remove a sub-task and refresh the parent's `updated_at`.
    pub fn delete_sub_task(&mut self, task_id: i64, sub_task_id: i64) -> Result<()> {
        let now = self.stamp();
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return Ok(());
        };
        let before = task.sub_tasks.len();
        task.sub_tasks.retain(|st| st.id != sub_task_id);
        if task.sub_tasks.len() == before {
            return Ok(());
        }
        task.updated_at = now;
        self.persist()
    }

    /// Replace the list with a caller-supplied permutation of itself, after
    /// a drag-reorder. The caller guarantees no tasks were added or removed.
    pub fn reorder_tasks(&mut self, tasks: Vec<Task>) -> Result<()> {
        self.tasks = tasks;
        self.persist()
    }

    /// Replace the whole list with imported tasks, verbatim. Bypasses
    /// validation and deduplication; the codec has already repaired shapes.
    pub fn import_tasks(&mut self, tasks: Vec<Task>) -> Result<()> {
        self.tasks = tasks;
        self.next_id = Self::id_floor(&self.tasks);
        self.persist()
    }

    /// Remove every task.
    pub fn clear_all_tasks(&mut self) -> Result<()> {
        self.tasks.clear();
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonFileStorage, MemoryStorage};

    fn store() -> TaskStore<MemoryStorage> {
        TaskStore::open(MemoryStorage::new()).unwrap()
    }

    #[test]
    fn add_task_prepends_with_defaults() {
        let mut store = store();
        store.add_task("Primera tarea", None, None, None, None).unwrap();
        let id = store.add_task("Segunda tarea", None, None, None, None).unwrap();

        let tasks = store.tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, id);
        assert_eq!(tasks[0].text, "Segunda tarea");
        assert!(!tasks[0].completed);
        assert_eq!(tasks[0].created_at, tasks[0].updated_at);
    }

    #[test]
    fn add_task_sanitizes_and_autocategorizes() {
        let mut store = store();
        store
            .add_task("  Design   the login screen ", None, None, None, None)
            .unwrap();
        let task = &store.tasks()[0];
        assert_eq!(task.text, "Design the login screen");
        assert_eq!(task.category, Category::Design);
    }

    #[test]
    fn explicit_category_wins_over_heuristic() {
        let mut store = store();
        store
            .add_task("Design the login screen", Some(Category::Review), None, None, None)
            .unwrap();
        assert_eq!(store.tasks()[0].category, Category::Review);
    }

    #[test]
    fn add_task_rejects_invalid_text_without_mutating() {
        let mut store = store();
        assert!(matches!(
            store.add_task("   ", None, None, None, None),
            Err(TaskError::EmptyText)
        ));
        assert!(matches!(
            store.add_task(&"x".repeat(501), None, None, None, None),
            Err(TaskError::TooLong { .. })
        ));
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn add_task_rejects_duplicates_case_insensitively() {
        let mut store = store();
        store.add_task("Comprar café", None, None, None, None).unwrap();
        let before = store.tasks().to_vec();

        assert!(matches!(
            store.add_task("  comprar CAFÉ ", None, None, None, None),
            Err(TaskError::DuplicateTask)
        ));
        assert_eq!(store.tasks(), &before[..]);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut store = store();
        let a = store.add_task("uno", None, None, None, None).unwrap();
        let b = store.add_task("dos", None, None, None, None).unwrap();
        let c = store.add_task("tres", None, None, None, None).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn toggle_twice_restores_completed_and_advances_updated_at() {
        let mut store = store();
        let id = store.add_task("alternar", None, None, None, None).unwrap();
        let t0 = store.tasks()[0].updated_at;

        store.toggle_task(id).unwrap();
        assert!(store.tasks()[0].completed);
        let t1 = store.tasks()[0].updated_at;
        assert!(t1 > t0);

        store.toggle_task(id).unwrap();
        assert!(!store.tasks()[0].completed);
        assert!(store.tasks()[0].updated_at > t1);
    }

    #[test]
    fn update_task_merges_patch_and_clears_optionals() {
        let mut store = store();
        let id = store
            .add_task("editar", None, Some(Priority::High), Some(Utc::now()), None)
            .unwrap();

        store
            .update_task(
                id,
                TaskPatch {
                    text: Some("editada".to_string()),
                    priority: Some(None),
                    due_date: Some(None),
                    tags: Some(vec!["ui".to_string()]),
                    ..Default::default()
                },
            )
            .unwrap();

        let task = &store.tasks()[0];
        assert_eq!(task.text, "editada");
        assert_eq!(task.priority, None);
        assert_eq!(task.due_date, None);
        assert_eq!(task.tags, vec!["ui".to_string()]);
        assert!(task.updated_at > task.created_at);
    }

    #[test]
    fn update_unknown_id_is_a_no_op() {
        let mut store = store();
        store.add_task("fija", None, None, None, None).unwrap();
        let before = store.tasks().to_vec();
        store
            .update_task(999, TaskPatch { text: Some("x".into()), ..Default::default() })
            .unwrap();
        assert_eq!(store.tasks(), &before[..]);
    }

    #[test]
    fn delete_task_removes_only_the_target() {
        let mut store = store();
        let a = store.add_task("una", None, None, None, None).unwrap();
        let b = store.add_task("otra", None, None, None, None).unwrap();

        store.delete_task(a).unwrap();
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].id, b);

        store.delete_task(999).unwrap();
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn sub_task_lifecycle_refreshes_parent() {
        let mut store = store();
        let id = store.add_task("con subtareas", None, None, None, None).unwrap();

        store.add_sub_task(id, "  primer   paso ").unwrap();
        store.add_sub_task(id, "segundo paso").unwrap();
        store.add_sub_task(id, "   ").unwrap(); // ignored

        let task = &store.tasks()[0];
        assert_eq!(task.sub_tasks.len(), 2);
        assert_eq!(task.sub_tasks[0].text, "primer paso");
        assert_eq!(task.sub_tasks[0].id, 1);
        assert_eq!(task.sub_tasks[1].id, 2);

        let updated_before = task.updated_at;
        store.toggle_sub_task(id, 1).unwrap();
        let task = &store.tasks()[0];
        assert!(task.sub_tasks[0].completed);
        assert!(task.updated_at > updated_before);

        store.delete_sub_task(id, 1).unwrap();
        let task = &store.tasks()[0];
        assert_eq!(task.sub_tasks.len(), 1);
        assert_eq!(task.sub_tasks[0].id, 2);
    }

    #[test]
    fn sub_task_ids_do_not_repeat_after_deletion() {
        let mut store = store();
        let id = store.add_task("ids", None, None, None, None).unwrap();
        store.add_sub_task(id, "a").unwrap();
        store.add_sub_task(id, "b").unwrap();
        store.delete_sub_task(id, 1).unwrap();
        store.add_sub_task(id, "c").unwrap();

        let ids: Vec<i64> = store.tasks()[0].sub_tasks.iter().map(|st| st.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn reorder_replaces_order_without_touching_fields() {
        let mut store = store();
        store.add_task("una", None, None, None, None).unwrap();
        store.add_task("dos", None, None, None, None).unwrap();

        let mut reversed = store.tasks().to_vec();
        reversed.reverse();
        store.reorder_tasks(reversed.clone()).unwrap();
        assert_eq!(store.tasks(), &reversed[..]);
    }

    #[test]
    fn import_replaces_list_and_keeps_new_ids_unique() {
        let mut store = store();
        store.add_task("previa", None, None, None, None).unwrap();

        let now = Utc::now();
        let imported = vec![
            Task::new(i64::MAX - 10, "importada", Category::General, now),
            Task::new(2, "vieja", Category::Review, now),
        ];
        store.import_tasks(imported.clone()).unwrap();
        assert_eq!(store.tasks(), &imported[..]);

        let fresh = store.add_task("nueva", None, None, None, None).unwrap();
        assert!(store.tasks().iter().filter(|t| t.id == fresh).count() == 1);
        assert!(fresh > i64::MAX - 10);
    }

    #[test]
    fn clear_all_tasks_empties_the_list() {
        let mut store = store();
        store.add_task("una", None, None, None, None).unwrap();
        store.clear_all_tasks().unwrap();
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn open_or_seed_populates_first_run_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datos.json");

        let mut store = TaskStore::open_or_seed(JsonFileStorage::open(&path)).unwrap();
        assert_eq!(store.tasks().len(), 4);
        store.clear_all_tasks().unwrap();

        // A second open sees the cleared list, not the seeds again.
        let reopened = TaskStore::open_or_seed(JsonFileStorage::open(&path)).unwrap();
        assert!(reopened.tasks().is_empty());
    }

    #[test]
    fn every_mutation_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datos.json");

        let mut store = TaskStore::open(JsonFileStorage::open(&path)).unwrap();
        let id = store.add_task("persistida", None, None, None, None).unwrap();
        store.add_sub_task(id, "paso").unwrap();
        store.toggle_task(id).unwrap();

        let reopened = TaskStore::open(JsonFileStorage::open(&path)).unwrap();
        assert_eq!(reopened.tasks(), store.tasks());
    }
}
