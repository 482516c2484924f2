//! Tracing subscriber setup

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Level used when neither a flag nor `RUST_LOG` says otherwise
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::WARN;

/// Resolve the level from `--log-level` and `--verbose`; an explicit level wins
pub fn level_for(log_level: Option<LogLevel>, verbose: bool) -> LevelFilter {
    match (log_level, verbose) {
        (Some(level), _) => level.into(),
        (None, true) => LevelFilter::DEBUG,
        (None, false) => DEFAULT_LEVEL,
    }
}

/// Install the global subscriber. Logs go to stderr so they never mix with
/// command output; `RUST_LOG` overrides the flags.
pub fn init(log_level: Option<LogLevel>, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level_for(log_level, verbose).into()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_level_beats_verbose() {
        assert_eq!(level_for(Some(LogLevel::Error), true), LevelFilter::ERROR);
    }

    #[test]
    fn test_verbose_means_debug() {
        assert_eq!(level_for(None, true), LevelFilter::DEBUG);
        assert_eq!(level_for(None, false), DEFAULT_LEVEL);
    }
}
