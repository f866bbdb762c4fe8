//! Optional TOML configuration
//!
//! Every key has a default, so an empty or missing file is a valid
//! configuration:
//!
//! ```toml
//! [tasks]
//! tab_string = "  "
//! exclude = ["done"]
//!
//! [icons]
//! done = "[x]"
//! deadline = "due"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::outliner::{Category, Importance, TaskNode};

/// Task outline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Indentation unit, repeated once per level below the top
    #[serde(default = "default_tab_string")]
    pub tab_string: String,
    /// Importances hidden from listings unless their deadline is still ahead
    #[serde(default = "default_exclude")]
    pub exclude: Vec<Importance>,
}

/// Glyphs printed in front of tasks and events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconsConfig {
    #[serde(default = "default_done_icon")]
    pub done: String,
    #[serde(default = "default_todo_a_icon")]
    pub todo_a: String,
    #[serde(default = "default_todo_icon")]
    pub todo: String,
    #[serde(default = "default_todo_c_icon")]
    pub todo_c: String,
    #[serde(default = "default_doing_a_icon")]
    pub doing_a: String,
    #[serde(default = "default_doing_icon")]
    pub doing: String,
    #[serde(default = "default_doing_c_icon")]
    pub doing_c: String,
    #[serde(default = "default_waiting_icon")]
    pub waiting: String,
    #[serde(default = "default_event_icon")]
    pub event: String,
    /// Prefix of a task's due date
    #[serde(default = "default_deadline_icon")]
    pub deadline: String,
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub icons: IconsConfig,
}

fn default_tab_string() -> String {
    "  ".to_string()
}

fn default_exclude() -> Vec<Importance> {
    vec![Importance::done]
}

fn default_done_icon() -> String {
    "[x]".to_string()
}

fn default_todo_a_icon() -> String {
    "[!]".to_string()
}

fn default_todo_icon() -> String {
    "[ ]".to_string()
}

fn default_todo_c_icon() -> String {
    "[.]".to_string()
}

fn default_doing_a_icon() -> String {
    "[>!]".to_string()
}

fn default_doing_icon() -> String {
    "[>]".to_string()
}

fn default_doing_c_icon() -> String {
    "[>.]".to_string()
}

fn default_waiting_icon() -> String {
    "[?]".to_string()
}

fn default_event_icon() -> String {
    "*".to_string()
}

fn default_deadline_icon() -> String {
    "due".to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            tab_string: default_tab_string(),
            exclude: default_exclude(),
        }
    }
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            done: default_done_icon(),
            todo_a: default_todo_a_icon(),
            todo: default_todo_icon(),
            todo_c: default_todo_c_icon(),
            doing_a: default_doing_a_icon(),
            doing: default_doing_icon(),
            doing_c: default_doing_c_icon(),
            waiting: default_waiting_icon(),
            event: default_event_icon(),
            deadline: default_deadline_icon(),
        }
    }
}

impl IconsConfig {
    /// Glyph of a task: completion first, then its status tier
    pub fn for_task(&self, task: &TaskNode) -> &str {
        if task.is_done() {
            return &self.done;
        }
        match task.status() {
            Importance::todo_a => &self.todo_a,
            Importance::todo_c => &self.todo_c,
            Importance::doing_a => &self.doing_a,
            Importance::doing_b => &self.doing,
            Importance::doing_c => &self.doing_c,
            status if status.category() == Category::Waiting => &self.waiting,
            _ => &self.todo,
        }
    }
}

impl Config {
    /// Load configuration from `path`; `None` or a missing file gives defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
