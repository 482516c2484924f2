//! Error types for Lua extraction

use std::path::PathBuf;
use thiserror::Error;

use crate::version::LuaVersion;

/// Errors raised while loading Lua sources or exporting their globals
#[derive(Debug, Error)]
pub enum LuaError {
    /// Version tag outside the supported set
    #[error("Unsupported Lua version '{0}' (expected one of 52, 53, 54)")]
    UnsupportedVersion(String),

    /// Version tag is valid but this binary links a different Lua build
    #[error("Lua {requested} requested, but this build links Lua {linked}")]
    VersionUnavailable {
        requested: LuaVersion,
        linked: LuaVersion,
    },

    /// Input directory does not exist
    #[error("Source root does not exist: {}", .0.display())]
    SourceRootMissing(PathBuf),

    /// A source file failed as a chunk and as a wrapped expression
    #[error("Failed to execute {}: {source}", path.display())]
    Execution {
        path: PathBuf,
        #[source]
        source: mlua::Error,
    },

    /// Interpreter error outside of file execution
    #[error("Lua error: {0}")]
    Lua(#[from] mlua::Error),

    /// IO errors (reading sources, writing JSON)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Directory traversal errors
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for Lua extraction operations
pub type LuaResult<T> = Result<T, LuaError>;
