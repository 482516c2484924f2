//! Interactive menu shown when no subcommand is given
//!
//! Each export choice prompts for the source directory, output directory and
//! Lua version, offering the remembered values as defaults, then runs the
//! export and returns to the menu.

use anyhow::Result;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::path::{Path, PathBuf};

use luajson_config::{ConfigOverrides, RunConfig};
use luajson_lua::{ExportMode, LuaVersion, DEFAULT_MAX_DEPTH};

use crate::cli::ExportArgs;
use crate::commands::export;

const CHOICES: [(&str, Option<ExportMode>); 4] = [
    ("Export formatted and min JSON", Some(ExportMode::All)),
    ("Export formatted JSON only", Some(ExportMode::Format)),
    ("Export min JSON only", Some(ExportMode::Min)),
    ("Quit", None),
];

/// Run the menu until the user quits
pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let theme = ColorfulTheme::default();
    let items: Vec<&str> = CHOICES.iter().map(|(label, _)| *label).collect();

    loop {
        println!(
            "{}",
            format!("--- luajson v{} ---", env!("CARGO_PKG_VERSION")).bold()
        );
        let selection = Select::with_theme(&theme)
            .with_prompt("Select an action")
            .items(&items)
            .default(0)
            .interact()?;

        let Some(mode) = CHOICES[selection].1 else {
            return Ok(());
        };

        let config = prompt_config(&theme, config_path, mode)?;
        let args = ExportArgs {
            max_depth: DEFAULT_MAX_DEPTH,
            ..Default::default()
        };

        // A failed run goes back to the menu; only prompt errors end it
        match export::run(&config, &args) {
            Ok(_) => export::save(&config, config_path)?,
            Err(e) => println!("{} {:#}", "Error:".red().bold(), e),
        }
        println!();
    }
}

/// Ask for each setting, defaulting to the remembered value
fn prompt_config(
    theme: &ColorfulTheme,
    config_path: Option<&Path>,
    mode: ExportMode,
) -> Result<RunConfig> {
    let remembered = RunConfig::load(config_path, ConfigOverrides::default())?;

    let source = prompt_path(theme, "Lua source directory", remembered.source_dir.as_deref())?;
    let output = prompt_path(theme, "JSON output directory", remembered.output_dir.as_deref())?;
    let lua_version: String = Input::with_theme(theme)
        .with_prompt("Lua version (52~54)")
        .default(remembered.lua_version.clone())
        .validate_with(|tag: &String| -> Result<(), String> {
            tag.parse::<LuaVersion>().map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()?;

    Ok(RunConfig {
        source_dir: Some(source),
        output_dir: Some(output),
        lua_version,
        export_mode: mode.to_string(),
    })
}

fn prompt_path(theme: &ColorfulTheme, prompt: &str, remembered: Option<&Path>) -> Result<PathBuf> {
    let mut input = Input::<String>::with_theme(theme).with_prompt(prompt);
    if let Some(path) = remembered {
        input = input.default(path.display().to_string());
    }
    let text = input
        .validate_with(|text: &String| -> Result<(), &str> {
            if text.trim().is_empty() {
                Err("a directory is required")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(PathBuf::from(text.trim()))
}
