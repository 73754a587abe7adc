//! Export/import codecs for the task list.
//!
//! JSON is the lossless round-trip format; CSV and Markdown are one-way
//! exports with a fixed layout the app has always produced, so the header
//! text, quoting and date formats here are contracts, not style choices.
//!
//! Import is deliberately lenient: structurally broken fields fall back to
//! defaults instead of failing the whole file. Imported tasks bypass text
//! and tag validation; only the shape is repaired.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{Result, TaskError};
use crate::task::{Category, Priority, SubTask, Task};

/// Placeholder text for imported tasks with no usable `text` field.
const UNTITLED: &str = "Tarea sin título";

const CSV_HEADER: &str =
    "ID,Texto,Completada,Categoría,Prioridad,Fecha Vencimiento,Etiquetas,Creada,Actualizada";

/// Serialize the task list as pretty-printed JSON.
pub fn export_to_json(tasks: &[Task]) -> Result<String> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Serialize the task list as CSV with a Spanish header row.
///
/// The text field is double-quoted with internal quotes doubled; dates are
/// `yyyy-MM-dd` (due) and `yyyy-MM-dd HH:mm` (created/updated); tags are
/// joined by `"; "`.
pub fn export_to_csv(tasks: &[Task]) -> String {
    let mut lines = vec![CSV_HEADER.to_string()];
    for task in tasks {
        let row = [
            task.id.to_string(),
            format!("\"{}\"", task.text.replace('"', "\"\"")),
            if task.completed { "Sí" } else { "No" }.to_string(),
            task.category.name().to_string(),
            task.priority.map(|p| p.label().to_string()).unwrap_or_default(),
            task.due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            task.tags.join("; "),
            task.created_at.format("%Y-%m-%d %H:%M").to_string(),
            task.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        ];
        lines.push(row.join(","));
    }
    lines.join("\n")
}

/// Serialize the task list as a Markdown document with one checklist section
/// per category, in the order categories first appear.
pub fn export_to_markdown(tasks: &[Task]) -> String {
    let mut markdown = String::from("# Mi Lista de Tareas\n\n");

    let mut categories: Vec<Category> = Vec::new();
    for task in tasks {
        if !categories.contains(&task.category) {
            categories.push(task.category);
        }
    }

    for category in categories {
        markdown.push_str(&format!("## {}\n\n", category.name()));

        for task in tasks.iter().filter(|t| t.category == category) {
            let checkbox = if task.completed { "[x]" } else { "[ ]" };
            markdown.push_str(&format!("- {checkbox} {}", task.text));

            if let Some(priority) = task.priority {
                markdown.push_str(&format!(" **[{}]**", priority.label()));
            }
            if let Some(due) = task.due_date {
                markdown.push_str(&format!(" 📅 {}", due.format("%Y-%m-%d")));
            }
            if !task.tags.is_empty() {
                let hashtags: Vec<String> = task.tags.iter().map(|t| format!("#{t}")).collect();
                markdown.push_str(&format!(" {}", hashtags.join(" ")));
            }
            markdown.push('\n');

            for sub in &task.sub_tasks {
                let sub_checkbox = if sub.completed { "[x]" } else { "[ ]" };
                markdown.push_str(&format!("  - {sub_checkbox} {}\n", sub.text));
            }
        }

        markdown.push('\n');
    }

    markdown
}

fn parse_datetime(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let text = value?.as_str()?;
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn parse_category(value: Option<&Value>) -> Category {
    match value.and_then(Value::as_str) {
        Some("Design") => Category::Design,
        Some("Development") => Category::Development,
        Some("Review") => Category::Review,
        _ => Category::General,
    }
}

fn parse_priority(value: Option<&Value>) -> Option<Priority> {
    match value?.as_str()? {
        "Alta" => Some(Priority::High),
        "Media" => Some(Priority::Medium),
        "Baja" => Some(Priority::Low),
        _ => None,
    }
}

fn parse_sub_tasks(value: Option<&Value>) -> Vec<SubTask> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| SubTask {
            id: item.get("id").and_then(Value::as_i64).unwrap_or(i as i64 + 1),
            text: item
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or(UNTITLED)
                .to_string(),
            completed: item.get("completed").and_then(Value::as_bool).unwrap_or(false),
        })
        .collect()
}

fn parse_tags(value: Option<&Value>) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// Parse a JSON document into a task list as of `now`, with defensive
/// per-field defaulting.
///
/// Fails with [`TaskError::InvalidFormat`] only when the document is not
/// valid JSON or its top level is not an array.
pub fn import_from_json_at(json: &str, now: DateTime<Utc>) -> Result<Vec<Task>> {
    let data: Value = serde_json::from_str(json)
        .map_err(|_| TaskError::InvalidFormat("formato JSON inválido".to_string()))?;

    let Some(items) = data.as_array() else {
        return Err(TaskError::InvalidFormat(
            "el archivo JSON debe contener un array de tareas".to_string(),
        ));
    };

    let tasks = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let text = item
                .get("text")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .unwrap_or(UNTITLED);
            Task {
                id: item
                    .get("id")
                    .and_then(Value::as_i64)
                    .unwrap_or(now.timestamp_millis() + i as i64),
                text: text.to_string(),
                completed: item.get("completed").and_then(Value::as_bool).unwrap_or(false),
                category: parse_category(item.get("category")),
                priority: parse_priority(item.get("priority")),
                due_date: parse_datetime(item.get("dueDate")),
                tags: parse_tags(item.get("tags")),
                sub_tasks: parse_sub_tasks(item.get("subTasks")),
                created_at: parse_datetime(item.get("createdAt")).unwrap_or(now),
                updated_at: parse_datetime(item.get("updatedAt")).unwrap_or(now),
            }
        })
        .collect();

    Ok(tasks)
}

/// [`import_from_json_at`] against the wall clock.
pub fn import_from_json(json: &str) -> Result<Vec<Task>> {
    import_from_json_at(json, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use indoc::indoc;

    fn utc_datetime(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, 0).unwrap()
    }

    fn sample_task() -> Task {
        let created = utc_datetime(2024, 3, 10, 9, 30);
        let mut t = Task::new(1, "He said \"hi\"", Category::General, created);
        t.completed = true;
        t.updated_at = utc_datetime(2024, 3, 11, 14, 5);
        t
    }

    #[test]
    fn csv_has_header_quoting_and_localized_booleans() {
        let csv = export_to_csv(&[sample_task()]);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(
            lines.next(),
            Some("1,\"He said \"\"hi\"\"\",Sí,General,,,,2024-03-10 09:30,2024-03-11 14:05")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn csv_formats_due_date_priority_and_tags() {
        let mut t = sample_task();
        t.completed = false;
        t.priority = Some(Priority::High);
        t.due_date = Some(utc_datetime(2024, 4, 1, 0, 0));
        t.tags = vec!["equipo".to_string(), "ui".to_string()];

        let row = export_to_csv(&[t]).lines().nth(1).unwrap().to_string();
        assert!(row.contains(",No,"));
        assert!(row.contains(",Alta,2024-04-01,equipo; ui,"));
    }

    #[test]
    fn markdown_groups_by_category_in_first_seen_order() {
        let now = utc_datetime(2024, 3, 10, 9, 0);
        let mut review = Task::new(1, "Revisar el feedback", Category::Review, now);
        review.completed = true;
        review.tags = vec!["equipo".to_string()];
        let mut design = Task::new(2, "Diseñar el dashboard", Category::Design, now);
        design.priority = Some(Priority::High);
        design.due_date = Some(utc_datetime(2024, 3, 15, 0, 0));
        design.sub_tasks.push(SubTask {
            id: 1,
            text: "Elegir paleta".to_string(),
            completed: true,
        });
        design.sub_tasks.push(SubTask {
            id: 2,
            text: "Maquetar".to_string(),
            completed: false,
        });

        let markdown = export_to_markdown(&[review, design]);
        let expected = indoc! {"
            # Mi Lista de Tareas

            ## Review

            - [x] Revisar el feedback #equipo

            ## Design

            - [ ] Diseñar el dashboard **[Alta]** 📅 2024-03-15
              - [x] Elegir paleta
              - [ ] Maquetar

        "};
        assert_eq!(markdown, expected);
    }

    #[test]
    fn json_round_trip_preserves_tasks() {
        let mut second = sample_task();
        second.id = 2;
        second.text = "Otra tarea".to_string();
        second.tags = vec!["ui".to_string()];
        let tasks = vec![sample_task(), second];

        let json = export_to_json(&tasks).unwrap();
        let imported = import_from_json_at(&json, Utc::now()).unwrap();
        assert_eq!(imported, tasks);
    }

    #[test]
    fn import_rejects_non_array_documents() {
        let err = import_from_json("{\"tareas\": []}").unwrap_err();
        assert!(matches!(err, TaskError::InvalidFormat(_)));

        let err = import_from_json("no es json").unwrap_err();
        assert!(matches!(err, TaskError::InvalidFormat(_)));
    }

    #[test]
    fn import_defaults_missing_fields() {
        let now = utc_datetime(2024, 3, 13, 12, 0);
        let json = r#"[
            {"completed": true},
            {"text": "", "tags": "no-array", "subTasks": 3},
            {"id": 9, "text": "Completa", "category": "Review",
             "priority": "Baja", "tags": ["ok"], "subTasks": [{"text": "paso"}]}
        ]"#;

        let imported = import_from_json_at(json, now).unwrap();
        assert_eq!(imported.len(), 3);

        assert_eq!(imported[0].text, UNTITLED);
        assert!(imported[0].completed);
        assert_eq!(imported[0].category, Category::General);
        assert_eq!(imported[0].created_at, now);

        assert_eq!(imported[1].text, UNTITLED);
        assert!(imported[1].tags.is_empty());
        assert!(imported[1].sub_tasks.is_empty());

        assert_eq!(imported[2].id, 9);
        assert_eq!(imported[2].category, Category::Review);
        assert_eq!(imported[2].priority, Some(Priority::Low));
        assert_eq!(imported[2].sub_tasks.len(), 1);
        assert_eq!(imported[2].sub_tasks[0].id, 1);
        assert_eq!(imported[2].sub_tasks[0].text, "paso");

        // Generated ids for the first two stay distinct.
        assert_ne!(imported[0].id, imported[1].id);
    }
}
