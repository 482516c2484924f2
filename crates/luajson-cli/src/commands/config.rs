use anyhow::Result;
use std::path::Path;

use luajson_config::{ConfigOverrides, RunConfig};

use crate::cli::ConfigCommands;

/// Execute config subcommand
pub fn execute(config_path: Option<&Path>, cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(config_path),
        ConfigCommands::Path => path(config_path),
    }
}

/// Show the current effective configuration
fn show(config_path: Option<&Path>) -> Result<()> {
    // Load the current config (with all precedence applied)
    let config = RunConfig::load(config_path, ConfigOverrides::default())?;
    print!("{}", config.display_as_toml()?);
    Ok(())
}

fn path(config_path: Option<&Path>) -> Result<()> {
    println!("{}", RunConfig::resolve_path(config_path)?.display());
    Ok(())
}
