use clap::{Args, Parser, Subcommand, ValueEnum};
use luajson_config::ConfigOverrides;
use luajson_lua::{ExportMode, FailurePolicy, FallbackPolicy, DEFAULT_MAX_DEPTH};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors (default)
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Which JSON files to write per global
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// `<name>.json` and `<name>.min.json`
    All,
    /// `<name>.json` only
    Format,
    /// `<name>.min.json` only
    Min,
}

impl From<ModeArg> for ExportMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::All => ExportMode::All,
            ModeArg::Format => ExportMode::Format,
            ModeArg::Min => ExportMode::Min,
        }
    }
}

#[derive(Parser)]
#[command(name = "luajson")]
#[command(about = "luajson - run a directory of Lua data files and export their globals as JSON")]
#[command(version)]
#[command(arg_required_else_help = false)]
pub struct Cli {
    /// Subcommand to execute (shows the interactive menu if not provided)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Set log level (off, error, warn, info, debug, trace)
    /// RUST_LOG takes precedence when set
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/luajson/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute every file under a directory and write one JSON file per global
    Export(ExportArgs),

    /// Inspect the remembered configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    /// Directory of Lua files (overrides config file)
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Directory for the JSON files (overrides config file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Lua version tag: 52, 53 or 54
    #[arg(long = "lua-version", value_name = "TAG")]
    pub lua_version: Option<String>,

    /// Which files to write per global
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Skip files that fail to load instead of stopping
    #[arg(long)]
    pub keep_going: bool,

    /// Call bare-expression files and export their value under the file name
    #[arg(long)]
    pub invoke_expressions: bool,

    /// Nesting depth after which tables are replaced by a marker
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Do not remember these settings for the next run
    #[arg(long)]
    pub no_save: bool,
}

impl ExportArgs {
    /// The values that take precedence over config file and environment
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            source_dir: self.source.clone(),
            output_dir: self.output.clone(),
            lua_version: self.lua_version.clone(),
            export_mode: self.mode.map(|m| ExportMode::from(m).to_string()),
        }
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        if self.keep_going {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        }
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        if self.invoke_expressions {
            FallbackPolicy::Invoke
        } else {
            FallbackPolicy::Record
        }
    }
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file location
    Path,
}
