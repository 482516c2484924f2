//! Error types for configuration handling

use std::path::PathBuf;

use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No platform config directory could be determined
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// A value that has no default was never provided
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    /// Source directory does not exist
    #[error("Lua source directory does not exist: {0}")]
    SourceMissing(PathBuf),

    /// Output path exists but is not a directory
    #[error("Output path is not a directory: {0}")]
    OutputNotDirectory(PathBuf),

    /// Config file could not be parsed
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Config could not be rendered as TOML
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
