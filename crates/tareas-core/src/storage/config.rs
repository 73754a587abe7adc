//! TOML-based application settings.
//!
//! Holds the knobs the core needs from the environment: where the data file
//! lives, which day the calendar week starts on (the stats and due-date
//! windows follow it), and whether a fresh install is seeded with the
//! starter tasks.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskError};

/// First day of the calendar week.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("tareas.json")
}

fn default_week_start() -> WeekStart {
    // Spanish locale convention.
    WeekStart::Monday
}

fn default_true() -> bool {
    true
}

/// Application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Path of the JSON data file used by the file-backed storage
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// First day of the calendar week
    #[serde(default = "default_week_start")]
    pub week_starts_on: WeekStart,
    /// Whether a fresh install starts with the sample tasks
    #[serde(default = "default_true")]
    pub seed_defaults: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_file: default_data_file(),
            week_starts_on: default_week_start(),
            seed_defaults: default_true(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| TaskError::Storage(format!("configuración inválida: {e}")))
    }

    /// Save settings as pretty TOML.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TaskError::Storage(format!("no se pudo serializar la configuración: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
