//! JSON file output
//!
//! Per binding `<name>` the writer produces `<name>.json` (three-space indent,
//! keys sorted) and/or `<name>.min.json` (compact, keys in Lua iteration
//! order). Non-ASCII text is written as-is in both.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::debug;

use crate::error::LuaResult;
use crate::node::{JsonNode, SortedKeys};

const INDENT: &[u8] = b"   ";

/// Which representations to write per binding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Formatted and minified
    #[default]
    All,
    /// Formatted only
    Format,
    /// Minified only
    Min,
}

impl ExportMode {
    pub fn writes_formatted(&self) -> bool {
        matches!(self, ExportMode::All | ExportMode::Format)
    }

    pub fn writes_minified(&self) -> bool {
        matches!(self, ExportMode::All | ExportMode::Min)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExportMode::All => "all",
            ExportMode::Format => "format",
            ExportMode::Min => "min",
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ExportMode::All),
            "format" | "formatted" => Ok(ExportMode::Format),
            "min" | "minified" => Ok(ExportMode::Min),
            other => Err(format!("Unknown export mode: {} (expected all, format or min)", other)),
        }
    }
}

/// Formatted JSON: three-space indent, keys sorted at every depth
pub fn to_formatted_string(node: &JsonNode) -> LuaResult<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    SortedKeys(node).serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Minified JSON in Lua iteration order
pub fn to_minified_string(node: &JsonNode) -> LuaResult<String> {
    Ok(serde_json::to_string(node)?)
}

/// Writes mirrored globals into an output directory
#[derive(Debug, Clone)]
pub struct JsonWriter {
    dir: PathBuf,
    mode: ExportMode,
}

impl JsonWriter {
    pub fn new(dir: impl Into<PathBuf>, mode: ExportMode) -> Self {
        Self {
            dir: dir.into(),
            mode,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn mode(&self) -> ExportMode {
        self.mode
    }

    /// Path of `<name>.json`
    pub fn formatted_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(name)))
    }

    /// Path of `<name>.min.json`
    pub fn minified_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.min.json", file_stem(name)))
    }

    /// Write one binding, returning the files written
    pub fn write(&self, name: &str, node: &JsonNode) -> LuaResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(2);

        if self.mode.writes_formatted() {
            let path = self.formatted_path(name);
            fs::write(&path, to_formatted_string(node)?)?;
            written.push(path);
        }
        if self.mode.writes_minified() {
            let path = self.minified_path(name);
            fs::write(&path, to_minified_string(node)?)?;
            written.push(path);
        }

        debug!("Wrote {} file(s) for '{}'", written.len(), name);
        Ok(written)
    }
}

/// Totals for one export run
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    pub bindings: usize,
    pub files: Vec<PathBuf>,
}

/// Drain an export sequence into `writer`, calling `on_binding` after each
/// binding is written
pub fn write_all<I, F>(exports: I, writer: &JsonWriter, mut on_binding: F) -> LuaResult<ExportSummary>
where
    I: IntoIterator<Item = LuaResult<(String, JsonNode)>>,
    F: FnMut(&str),
{
    let mut summary = ExportSummary::default();
    for item in exports {
        let (name, node) = item?;
        summary.files.extend(writer.write(&name, &node)?);
        summary.bindings += 1;
        on_binding(&name);
    }
    Ok(summary)
}

/// Binding names can hold any text; path separators would escape the
/// output directory.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if std::path::is_separator(c) { '_' } else { c })
        .collect()
}
