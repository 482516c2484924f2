use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use luajson_config::RunConfig;
use luajson_lua::{
    write_all, BatchLoader, ExportMode, JsonWriter, LoadReport, LuaSession, LuaVersion,
    MirrorOptions, SessionOptions,
};

use crate::cli::ExportArgs;
use crate::progress;

/// Result of one export run
#[derive(Debug)]
pub struct ExportOutcome {
    pub report: LoadReport,
    pub bindings: usize,
    pub files: Vec<PathBuf>,
}

/// Execute the export subcommand
pub fn execute(config_path: Option<&Path>, args: &ExportArgs) -> Result<()> {
    let config = RunConfig::load(config_path, args.overrides())?;
    run(&config, args)?;

    if !args.no_save {
        save(&config, config_path)?;
    }
    Ok(())
}

/// Remember the settings of a successful run
pub fn save(config: &RunConfig, config_path: Option<&Path>) -> Result<()> {
    let path = RunConfig::resolve_path(config_path)?;
    config
        .save(&path)
        .with_context(|| format!("Failed to save config to {}", path.display()))?;
    debug!("Remembered settings in {}", path.display());
    Ok(())
}

/// Load every source under the configured directory and write its globals
pub fn run(config: &RunConfig, args: &ExportArgs) -> Result<ExportOutcome> {
    config.validate()?;
    let version: LuaVersion = config.lua_version.parse()?;
    let mode: ExportMode = config
        .export_mode
        .parse()
        .map_err(anyhow::Error::msg)?;
    let source = config.source_dir()?;
    let output = config.output_dir()?;

    println!(
        "{} {} ({}, {} mode)",
        "Reading Lua files in:".cyan().bold(),
        source.display(),
        version.release_name(),
        mode
    );

    let mut session = LuaSession::with_options(
        version,
        SessionOptions {
            fallback: args.fallback_policy(),
            mirror: MirrorOptions {
                max_depth: args.max_depth,
            },
        },
    )?;
    let loader = BatchLoader::new(source)?.with_policy(args.failure_policy());
    let units = loader.sources()?;

    let pb = progress::bar(units.len(), "Loading");
    let report = loader.load_units(&mut session, &units, |unit| {
        pb.set_message(unit.stem.clone());
        pb.inc(1);
    });
    pb.finish_and_clear();
    let report = report?;

    for failure in &report.failures {
        println!(
            "  {} {}: {}",
            "Skipped".yellow().bold(),
            failure.path.display(),
            failure.error
        );
    }

    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;
    println!("{} {}", "Writing JSON files to:".cyan().bold(), output.display());

    let exports = session.exports();
    let pb = progress::bar(exports.len(), "Writing");
    let summary = write_all(exports, &JsonWriter::new(output, mode), |name| {
        pb.set_message(name.to_string());
        pb.inc(1);
    });
    pb.finish_and_clear();
    let summary = summary?;

    info!(
        "Exported {} globals from {} files",
        summary.bindings,
        report.loaded()
    );
    println!(
        "{} {} globals, {} files written ({} sources loaded, {} via fallback, {} skipped)",
        "Done:".green().bold(),
        summary.bindings,
        summary.files.len(),
        report.loaded(),
        report.fallbacks,
        report.failures.len()
    );

    Ok(ExportOutcome {
        report,
        bindings: summary.bindings,
        files: summary.files,
    })
}
