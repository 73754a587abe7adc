//! Core error types for tareas-core.
//!
//! All failures are recoverable values surfaced to the caller; no operation
//! panics or leaves the task list partially mutated. Display strings are the
//! user-facing Spanish messages the presentation layer shows verbatim.

use thiserror::Error;

/// Core error type for tareas-core.
#[derive(Error, Debug)]
pub enum TaskError {
    /// Task text is empty after trimming
    #[error("El texto de la tarea no puede estar vacío")]
    EmptyText,

    /// Task text exceeds the maximum length
    #[error("El texto no puede exceder {max} caracteres")]
    TooLong { max: usize },

    /// Another task already has the same (case-insensitive, trimmed) text
    #[error("Ya existe una tarea con este texto")]
    DuplicateTask,

    /// Tag is empty after trimming
    #[error("La etiqueta no puede estar vacía")]
    EmptyTag,

    /// Tag exceeds the maximum length
    #[error("La etiqueta no puede exceder {max} caracteres")]
    TagTooLong { max: usize },

    /// Tag contains characters outside the allowed set
    #[error("La etiqueta contiene caracteres no válidos")]
    InvalidCharacters,

    /// Too many tags on a single task
    #[error("No puedes agregar más de {max} etiquetas")]
    TooManyTags { max: usize },

    /// Imported document is malformed or not a task array
    #[error("Error al importar: {0}")]
    InvalidFormat(String),

    /// Storage collaborator failure
    #[error("Error de almacenamiento: {0}")]
    Storage(String),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for TaskError
pub type Result<T, E = TaskError> = std::result::Result<T, E>;
