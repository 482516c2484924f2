//! luajson CLI library
//!
//! Argument parsing, logging setup and the `export`, `config` and interactive
//! menu commands behind the `luajson` binary.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod progress;
