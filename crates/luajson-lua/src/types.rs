//! Shared types for source loading and value inspection

use std::path::{Path, PathBuf};

use mlua::Value;

/// One physical source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Path to the file
    pub path: PathBuf,

    /// File name without its last extension, used as the unit's key
    pub stem: String,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let stem = stem_of(&path);
        Self { path, stem }
    }
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// How a source unit was accepted by the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Ran as a statement chunk
    Chunk,
    /// Chunk failed; the source compiled once wrapped in a function
    Fallback,
}

/// Result of executing one source unit
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub stem: String,
    pub path: PathBuf,
    pub outcome: ExecutionOutcome,
    /// Error message of the failed chunk attempt, when the fallback was used
    pub chunk_error: Option<String>,
    /// Globals that did not exist before this unit ran, sorted
    pub new_names: Vec<String>,
}

/// Coarse classification of a Lua value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Nil,
    Boolean,
    Number,
    Text,
    Table,
    Function,
    /// userdata, threads, light userdata and anything else without data
    Other,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Nil => ValueKind::Nil,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Integer(_) | Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::Text,
            Value::Table(_) => ValueKind::Table,
            Value::Function(_) => ValueKind::Function,
            _ => ValueKind::Other,
        }
    }

    /// Whether values of this kind carry data into JSON
    pub fn is_data(&self) -> bool {
        matches!(
            self,
            ValueKind::Boolean | ValueKind::Number | ValueKind::Text | ValueKind::Table
        )
    }
}
