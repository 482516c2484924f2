//! Lua session: executes source units and tracks the globals they create
//!
//! Each file is first run as a statement chunk. When that fails (typically a
//! file holding a single bare table literal) the source is wrapped as the body
//! of an anonymous function instead, first as statements and then as a
//! returned expression. What happens to that function is decided by the
//! session's [`FallbackPolicy`].

use std::collections::HashMap;
use std::fmt;

use mlua::{Function, Lua, Value};
use tracing::{debug, info};

use crate::error::{LuaError, LuaResult};
use crate::globals::{DiscoveredNames, GlobalSnapshot};
use crate::mirror::{MirrorOptions, TableMirror};
use crate::node::JsonNode;
use crate::types::{ExecutionOutcome, ExecutionReport, SourceUnit, ValueKind};
use crate::version::LuaVersion;

/// What to do with the function produced by the fallback path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Keep the wrapped source for diagnostics; never call it
    #[default]
    Record,
    /// Call it and bind a non-nil result (or a chunk's return value) to a
    /// global named after the file stem, unless that global already exists
    Invoke,
}

/// Session configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub fallback: FallbackPolicy,
    pub mirror: MirrorOptions,
}

/// One interpreter plus everything discovered while loading into it
pub struct LuaSession {
    version: LuaVersion,
    lua: Lua,
    options: SessionOptions,
    discovered: DiscoveredNames,
    /// Wrapped source by file stem, for units that needed the fallback
    fallbacks: HashMap<String, String>,
    loaded: bool,
}

impl fmt::Debug for LuaSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LuaSession")
            .field("version", &self.version)
            .field("options", &self.options)
            .field("discovered_count", &self.discovered.len())
            .field("fallback_count", &self.fallbacks.len())
            .field("loaded", &self.loaded)
            .finish()
    }
}

impl LuaSession {
    /// Open a session with default options
    pub fn open(version: LuaVersion) -> LuaResult<Self> {
        Self::with_options(version, SessionOptions::default())
    }

    /// Open a session; fails if `version` is not the linked Lua build
    pub fn with_options(version: LuaVersion, options: SessionOptions) -> LuaResult<Self> {
        let version = version.ensure_linked()?;
        let lua = Lua::new();
        debug!("Opened Lua {} session ({:?})", version, options.fallback);

        Ok(Self {
            version,
            lua,
            options,
            discovered: DiscoveredNames::new(),
            fallbacks: HashMap::new(),
            loaded: false,
        })
    }

    pub fn version(&self) -> LuaVersion {
        self.version
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// The underlying interpreter
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    /// Names discovered so far, in discovery order
    pub fn discovered(&self) -> &DiscoveredNames {
        &self.discovered
    }

    /// Wrapped source recorded for a unit that needed the fallback
    pub fn fallback_source(&self, stem: &str) -> Option<&str> {
        self.fallbacks.get(stem).map(String::as_str)
    }

    pub fn fallbacks(&self) -> &HashMap<String, String> {
        &self.fallbacks
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub(crate) fn mark_loaded(&mut self) {
        self.loaded = true;
    }

    /// Read and execute one source file
    pub fn execute(&mut self, unit: &SourceUnit) -> LuaResult<ExecutionReport> {
        let source = std::fs::read(&unit.path)?;
        self.execute_source(unit, &source)
    }

    /// Execute source bytes on behalf of `unit`
    pub fn execute_source(&mut self, unit: &SourceUnit, source: &[u8]) -> LuaResult<ExecutionReport> {
        let chunk_name = format!("@{}", unit.path.display());
        let before = GlobalSnapshot::capture(&self.lua)?;

        let chunk_result = self
            .lua
            .load(source)
            .set_name(chunk_name.clone())
            .call::<Value>(());

        let (outcome, chunk_error) = match chunk_result {
            Ok(returned) => {
                if self.options.fallback == FallbackPolicy::Invoke {
                    self.bind_stem(unit, returned)?;
                }
                (ExecutionOutcome::Chunk, None)
            }
            Err(chunk_err) => {
                debug!(
                    "Chunk execution failed for {}, trying function wrapping: {}",
                    unit.path.display(),
                    chunk_err
                );
                self.run_fallback(unit, source, &chunk_name).map_err(|wrap_err| {
                    debug!("Function wrapping failed for {}: {}", unit.path.display(), wrap_err);
                    LuaError::Execution {
                        path: unit.path.clone(),
                        source: chunk_err.clone(),
                    }
                })?;
                (ExecutionOutcome::Fallback, Some(chunk_err.to_string()))
            }
        };

        let after = GlobalSnapshot::capture(&self.lua)?;
        let new_names = before.diff(&after);
        self.discovered.extend(new_names.iter().cloned());

        info!(
            "Loaded {} ({:?}, {} new globals)",
            unit.path.display(),
            outcome,
            new_names.len()
        );

        Ok(ExecutionReport {
            stem: unit.stem.clone(),
            path: unit.path.clone(),
            outcome,
            chunk_error,
            new_names,
        })
    }

    fn run_fallback(&mut self, unit: &SourceUnit, source: &[u8], chunk_name: &str) -> mlua::Result<()> {
        let (wrapped, function) = self.wrap_as_function(source, chunk_name)?;
        self.fallbacks
            .insert(unit.stem.clone(), String::from_utf8_lossy(&wrapped).into_owned());

        if self.options.fallback == FallbackPolicy::Invoke {
            let returned: Value = function.call(())?;
            self.bind_stem(unit, returned)?;
        }
        Ok(())
    }

    /// Compile `source` as a function body, statements first, then as a
    /// returned expression. Returns the wrapping text and the uncalled function.
    fn wrap_as_function(&self, source: &[u8], chunk_name: &str) -> mlua::Result<(Vec<u8>, Function)> {
        let statements = wrap(b"function() ", source);
        let statement_err = match self.compile_wrapped(&statements, chunk_name) {
            Ok(function) => return Ok((statements, function)),
            Err(e) => e,
        };

        let expression = wrap(b"function() return ", source);
        match self.compile_wrapped(&expression, chunk_name) {
            Ok(function) => Ok((expression, function)),
            Err(_) => Err(statement_err),
        }
    }

    fn compile_wrapped(&self, wrapped: &[u8], chunk_name: &str) -> mlua::Result<Function> {
        let mut returning = b"return ".to_vec();
        returning.extend_from_slice(wrapped);
        self.lua
            .load(returning)
            .set_name(chunk_name.to_string())
            .call::<Function>(())
    }

    fn bind_stem(&self, unit: &SourceUnit, value: Value) -> mlua::Result<()> {
        if value.is_nil() || unit.stem.is_empty() {
            return Ok(());
        }
        let globals = self.lua.globals();
        if globals.raw_get::<Value>(unit.stem.as_str())?.is_nil() {
            debug!("Binding value of {} to global '{}'", unit.path.display(), unit.stem);
            globals.raw_set(unit.stem.as_str(), value)?;
        }
        Ok(())
    }

    /// Current snapshot of global names
    pub fn global_names(&self) -> LuaResult<GlobalSnapshot> {
        Ok(GlobalSnapshot::capture(&self.lua)?)
    }

    /// Current value of a global
    pub fn get_global(&self, name: &str) -> LuaResult<Value> {
        Ok(self.lua.globals().get::<Value>(name)?)
    }

    /// Kind of a global's current value
    pub fn global_kind(&self, name: &str) -> LuaResult<ValueKind> {
        Ok(ValueKind::of(&self.get_global(name)?))
    }

    /// Mirror a global's current value, substituting `{}` for empty results
    pub fn mirror_global(&self, name: &str) -> LuaResult<JsonNode> {
        let value = self.get_global(name)?;
        let mut mirror = TableMirror::new(self.options.mirror);
        let node = mirror.mirror(&value).or_empty_object();
        let stats = mirror.stats();
        debug!(
            "Mirrored '{}': {} tables, {} stubbed, {} decode errors, {} cycles",
            name, stats.tables, stats.stubbed, stats.decode_errors, stats.cycles
        );
        Ok(node)
    }
}

fn wrap(prefix: &[u8], source: &[u8]) -> Vec<u8> {
    let mut wrapped = Vec::with_capacity(prefix.len() + source.len() + 4);
    wrapped.extend_from_slice(prefix);
    wrapped.extend_from_slice(source);
    // newline so a trailing line comment cannot swallow `end`
    wrapped.extend_from_slice(b"\nend");
    wrapped
}
