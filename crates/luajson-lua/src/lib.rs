//! Lua data extraction for luajson
//!
//! Executes a directory of Lua files (game or config data written as scripts
//! or bare table literals) in one interpreter, then exports every global they
//! created as a JSON tree.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ BatchLoader  │──▶│  LuaSession  │──▶│ GlobalSnap-  │
//! │ (walkdir)    │   │ chunk or     │   │ shot diff    │
//! └──────────────┘   │ fn fallback  │   └──────┬───────┘
//!                    └──────────────┘          │ names
//!                                              ▼
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  JsonWriter  │◀──│ TableMirror  │◀──│   Exports    │
//! │ .json / .min │   │ Lua → JSON   │   │ (lazy)       │
//! └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use luajson_lua::{BatchLoader, ExportMode, JsonWriter, LuaSession, LuaVersion};
//!
//! # fn main() -> Result<(), luajson_lua::LuaError> {
//! let mut session = LuaSession::open("54".parse::<LuaVersion>()?)?;
//! BatchLoader::new("data/lua")?.load_all(&mut session)?;
//!
//! let writer = JsonWriter::new("data/json", ExportMode::All);
//! luajson_lua::write_all(session.exports(), &writer, |_| {})?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `lua54` (default), `lua53`, `lua52`: which Lua build to link. Only one may
//!   be enabled; sessions for any other tag fail with
//!   [`LuaError::VersionUnavailable`].

mod error;
mod export;
mod globals;
mod loader;
mod mirror;
mod node;
mod output;
mod session;
mod types;
mod version;

pub use error::{LuaError, LuaResult};
pub use export::Exports;
pub use globals::{DiscoveredNames, GlobalSnapshot};
pub use loader::{BatchLoader, FailurePolicy, LoadFailure, LoadReport};
pub use mirror::{MirrorOptions, MirrorStats, TableMirror, DEFAULT_MAX_DEPTH, EXCLUDED_KEYS};
pub use node::{
    JsonNode, ObjectBuilder, Scalar, SortedKeys, CYCLE_MARKER, DECODE_ERROR_MARKER,
    DEPTH_LIMIT_MARKER, FUNCTION_MARKER,
};
pub use output::{to_formatted_string, to_minified_string, write_all, ExportMode, ExportSummary, JsonWriter};
pub use session::{FallbackPolicy, LuaSession, SessionOptions};
pub use types::{ExecutionOutcome, ExecutionReport, SourceUnit, ValueKind};
pub use version::LuaVersion;
