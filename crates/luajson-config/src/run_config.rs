use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Environment variable for the Lua source directory
pub const ENV_SOURCE_DIR: &str = "LUAJSON_SOURCE_DIR";
/// Environment variable for the JSON output directory
pub const ENV_OUTPUT_DIR: &str = "LUAJSON_OUTPUT_DIR";
/// Environment variable for the Lua version tag
pub const ENV_LUA_VERSION: &str = "LUAJSON_LUA_VERSION";
/// Environment variable for the export mode
pub const ENV_EXPORT_MODE: &str = "LUAJSON_EXPORT_MODE";
/// When set, the implicit config file in the user's config dir is ignored
pub const ENV_TEST_MODE: &str = "LUAJSON_TEST_MODE";

/// Version tag used when nothing else is configured
pub const DEFAULT_LUA_VERSION: &str = "54";
/// Export mode used when nothing else is configured
pub const DEFAULT_EXPORT_MODE: &str = "all";

/// Settings for one export run, remembered between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Directory holding the Lua sources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,

    /// Directory receiving the JSON files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Lua version tag, e.g. "54"
    pub lua_version: String,

    /// `all`, `format` or `min`
    pub export_mode: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            source_dir: None,
            output_dir: None,
            lua_version: DEFAULT_LUA_VERSION.to_string(),
            export_mode: DEFAULT_EXPORT_MODE.to_string(),
        }
    }
}

/// Values given on the command line or at a prompt
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub lua_version: Option<String>,
    pub export_mode: Option<String>,
}

impl RunConfig {
    /// Load configuration with precedence: defaults < file < env < overrides
    pub fn load(config_file: Option<&Path>, overrides: ConfigOverrides) -> ConfigResult<Self> {
        let mut config = Self::from_file_or_default(config_file)?;
        config.apply_env();
        config.apply(overrides);
        Ok(config)
    }

    /// Default config file path: `<config dir>/luajson/config.toml`
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("luajson");
        Ok(config_dir.join("config.toml"))
    }

    /// The explicit path if given, otherwise the default one
    pub fn resolve_path(config_file: Option<&Path>) -> ConfigResult<PathBuf> {
        match config_file {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_config_path(),
        }
    }

    /// Read a config file, or return defaults when there is none
    pub fn from_file_or_default(config_file: Option<&Path>) -> ConfigResult<Self> {
        let path = match config_file {
            Some(path) => Some(path.to_path_buf()),
            // Tests must never pick up the user's remembered settings
            None if std::env::var_os(ENV_TEST_MODE).is_some() => None,
            None => Self::default_config_path().ok(),
        };

        match path.filter(|p| p.exists()) {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                let contents = fs::read_to_string(&path)?;
                toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
            }
            None => Ok(Self::default()),
        }
    }

    /// Override fields from `LUAJSON_*` environment variables
    pub fn apply_env(&mut self) {
        if let Some(dir) = std::env::var_os(ENV_SOURCE_DIR) {
            self.source_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = std::env::var_os(ENV_OUTPUT_DIR) {
            self.output_dir = Some(PathBuf::from(dir));
        }
        if let Ok(version) = std::env::var(ENV_LUA_VERSION) {
            self.lua_version = version;
        }
        if let Ok(mode) = std::env::var(ENV_EXPORT_MODE) {
            self.export_mode = mode;
        }
    }

    /// Override fields that are set in `overrides`
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(dir) = overrides.source_dir {
            self.source_dir = Some(dir);
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = Some(dir);
        }
        if let Some(version) = overrides.lua_version {
            self.lua_version = version;
        }
        if let Some(mode) = overrides.export_mode {
            self.export_mode = mode;
        }
    }

    /// Check the directories before any Lua runs.
    ///
    /// The source directory must exist. The output directory may be missing
    /// (it is created on export) but must not be an existing non-directory.
    pub fn validate(&self) -> ConfigResult<()> {
        let source = self.source_dir()?;
        if !source.exists() {
            return Err(ConfigError::SourceMissing(source.to_path_buf()));
        }
        let output = self.output_dir()?;
        if output.exists() && !output.is_dir() {
            return Err(ConfigError::OutputNotDirectory(output.to_path_buf()));
        }
        Ok(())
    }

    pub fn source_dir(&self) -> ConfigResult<&Path> {
        self.source_dir
            .as_deref()
            .ok_or(ConfigError::Missing("source_dir"))
    }

    pub fn output_dir(&self) -> ConfigResult<&Path> {
        self.output_dir
            .as_deref()
            .ok_or(ConfigError::Missing("output_dir"))
    }

    /// Write the config as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.display_as_toml()?)?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Display the configuration as TOML
    pub fn display_as_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
