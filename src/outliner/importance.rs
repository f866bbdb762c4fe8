use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status-priority scale of a task
///
/// Each value encodes a lifecycle category and, within it, a tier (C < B < A).
/// The numeric values are spaced so that integer bands identify the category:
/// `done < waiting_* < todo_* < doing_*`.
/// Uses snake_case naming to match TOML serialization format.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Importance {
    /// Sentinel reported for completed tasks
    done,
    waiting_c,
    waiting_b,
    waiting_a,
    todo_c,
    todo_b,
    todo_a,
    doing_c,
    doing_b,
    doing_a,
}

/// Lifecycle category of an [`Importance`] value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Done,
    Waiting,
    Todo,
    Doing,
}

impl Importance {
    /// Tier assigned to tasks created without an explicit status
    pub const DEFAULT: Importance = Importance::todo_b;

    pub const ALL: [Importance; 10] = [
        Importance::done,
        Importance::waiting_c,
        Importance::waiting_b,
        Importance::waiting_a,
        Importance::todo_c,
        Importance::todo_b,
        Importance::todo_a,
        Importance::doing_c,
        Importance::doing_b,
        Importance::doing_a,
    ];

    /// Numeric value on the scale
    pub fn value(self) -> i64 {
        match self {
            Importance::done => -20,
            Importance::waiting_c => -6,
            Importance::waiting_b => -5,
            Importance::waiting_a => -4,
            Importance::todo_c => 4,
            Importance::todo_b => 5,
            Importance::todo_a => 6,
            Importance::doing_c => 14,
            Importance::doing_b => 15,
            Importance::doing_a => 16,
        }
    }

    pub fn category(self) -> Category {
        // Every variant lands in a band, so the lookup cannot miss.
        Category::from_value(self.value()).unwrap_or(Category::Todo)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Importance::done => "done",
            Importance::waiting_c => "waiting_c",
            Importance::waiting_b => "waiting_b",
            Importance::waiting_a => "waiting_a",
            Importance::todo_c => "todo_c",
            Importance::todo_b => "todo_b",
            Importance::todo_a => "todo_a",
            Importance::doing_c => "doing_c",
            Importance::doing_b => "doing_b",
            Importance::doing_a => "doing_a",
        }
    }
}

impl Default for Importance {
    fn default() -> Self {
        Importance::DEFAULT
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Importance {
    type Err = String;

    /// Accepts exact names (`todo_a`) in any case, and bare categories
    /// (`todo`, `doing`, `waiting`) which select tier B.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "done" => Ok(Importance::done),
            "waiting_c" => Ok(Importance::waiting_c),
            "waiting" | "waiting_b" => Ok(Importance::waiting_b),
            "waiting_a" => Ok(Importance::waiting_a),
            "todo_c" => Ok(Importance::todo_c),
            "todo" | "todo_b" => Ok(Importance::todo_b),
            "todo_a" => Ok(Importance::todo_a),
            "doing_c" => Ok(Importance::doing_c),
            "doing" | "doing_b" => Ok(Importance::doing_b),
            "doing_a" => Ok(Importance::doing_a),
            _ => Err(format!(
                "Invalid status '{}'. Valid options are: waiting_c, waiting_b, waiting_a, todo_c, todo_b, todo_a, doing_c, doing_b, doing_a, done",
                s
            )),
        }
    }
}

impl Category {
    /// Classify a raw scale value by its band of ten
    ///
    /// Returns `None` for values outside every band (e.g. a derived priority).
    pub fn from_value(value: i64) -> Option<Self> {
        match value.div_euclid(10) {
            -2 => Some(Category::Done),
            -1 => Some(Category::Waiting),
            0 => Some(Category::Todo),
            1 => Some(Category::Doing),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Done => "DONE",
            Category::Waiting => "WAITING",
            Category::Todo => "TODO",
            Category::Doing => "DOING",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
