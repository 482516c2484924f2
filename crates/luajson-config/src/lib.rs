//! # luajson configuration
//!
//! Remembered settings for export runs: where the Lua sources live, where the
//! JSON goes, which Lua version to run and which files to write.
//!
//! Values are resolved with precedence defaults < config file < `LUAJSON_*`
//! environment variables < explicit overrides, and saved back after a
//! successful run so the next one can reuse them.
//!
//! ```rust,no_run
//! use luajson_config::{ConfigOverrides, RunConfig};
//!
//! # fn main() -> Result<(), luajson_config::ConfigError> {
//! let config = RunConfig::load(None, ConfigOverrides::default())?;
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

mod error;
mod run_config;

pub use error::{ConfigError, ConfigResult};
pub use run_config::*;
