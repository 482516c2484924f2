//! Table mirror: Lua values to JSON trees
//!
//! Rules, applied at every depth:
//!
//! - strings, numbers and booleans become scalars
//! - a non-empty table whose first enumerated key is an integer becomes an
//!   array (values appended in iteration order, keys dropped); any other table
//!   becomes an object
//! - entries keyed `io`, `package` or `_G` are skipped
//! - functions become `"lua function"`, other non-data values `"lua <type>"`
//! - text that is not valid UTF-8 becomes `"UnicodeDecodeError"` for that entry
//!   only
//! - a table reached again while it is still open becomes `"lua cycle"`
//!
//! The array test trusts the first key `pairs` returns; it does not check that
//! the keys form a contiguous `1..n` sequence.

use std::collections::HashSet;
use std::ffi::c_void;

use mlua::{Table, Value};
use tracing::{debug, warn};

use crate::node::{
    JsonNode, ObjectBuilder, Scalar, CYCLE_MARKER, DECODE_ERROR_MARKER, DEPTH_LIMIT_MARKER,
    FUNCTION_MARKER,
};
use crate::version::LuaVersion;

/// Keys never copied into the output, at any depth
pub const EXCLUDED_KEYS: [&str; 3] = ["io", "package", "_G"];

/// Default nesting limit before a table is replaced by a marker
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// Options for [`TableMirror`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorOptions {
    /// Tables nested deeper than this become [`DEPTH_LIMIT_MARKER`]
    pub max_depth: usize,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Counters for values the mirror had to replace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorStats {
    pub tables: usize,
    pub decode_errors: usize,
    pub cycles: usize,
    pub depth_cutoffs: usize,
    pub stubbed: usize,
    pub skipped_keys: usize,
}

/// Converts Lua value graphs into [`JsonNode`] trees.
///
/// Reads only; the interpreter state is not modified.
#[derive(Debug)]
pub struct TableMirror {
    options: MirrorOptions,
    integer_subtype: bool,
    open: HashSet<*const c_void>,
    stats: MirrorStats,
}

impl Default for TableMirror {
    fn default() -> Self {
        Self::new(MirrorOptions::default())
    }
}

impl TableMirror {
    pub fn new(options: MirrorOptions) -> Self {
        Self {
            options,
            integer_subtype: LuaVersion::linked().has_integers(),
            open: HashSet::new(),
            stats: MirrorStats::default(),
        }
    }

    /// Mirror one value, resetting the statistics
    pub fn mirror(&mut self, value: &Value) -> JsonNode {
        self.open.clear();
        self.stats = MirrorStats::default();
        self.mirror_value(value, 0)
    }

    /// Statistics of the last [`TableMirror::mirror`] call
    pub fn stats(&self) -> MirrorStats {
        self.stats
    }

    fn mirror_value(&mut self, value: &Value, depth: usize) -> JsonNode {
        match value {
            Value::Nil => Scalar::Null.into(),
            Value::Boolean(b) => Scalar::Bool(*b).into(),
            Value::Integer(i) => Scalar::Integer(*i as i64).into(),
            Value::Number(n) => Scalar::Float(*n).into(),
            Value::String(s) => match s.to_str() {
                Ok(text) => JsonNode::text(text.to_string()),
                Err(_) => {
                    self.stats.decode_errors += 1;
                    JsonNode::text(DECODE_ERROR_MARKER)
                }
            },
            Value::Table(table) => self.mirror_table(table, depth),
            Value::Function(_) => {
                self.stats.stubbed += 1;
                JsonNode::text(FUNCTION_MARKER)
            }
            other => {
                self.stats.stubbed += 1;
                JsonNode::text(format!("lua {}", other.type_name()))
            }
        }
    }

    fn mirror_table(&mut self, table: &Table, depth: usize) -> JsonNode {
        if depth >= self.options.max_depth {
            self.stats.depth_cutoffs += 1;
            debug!("Table nesting exceeds {} levels", self.options.max_depth);
            return JsonNode::text(DEPTH_LIMIT_MARKER);
        }

        let identity = table.to_pointer();
        if !self.open.insert(identity) {
            self.stats.cycles += 1;
            debug!("Cycle detected at depth {}", depth);
            return JsonNode::text(CYCLE_MARKER);
        }
        self.stats.tables += 1;

        let mut shape: Option<Shape> = None;
        for pair in table.pairs::<Value, Value>() {
            let (key, value) = match pair {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("Stopped reading table after iteration error: {}", e);
                    break;
                }
            };

            let shape = shape.get_or_insert_with(|| {
                if self.is_integer_key(&key) {
                    Shape::Array(Vec::new())
                } else {
                    Shape::Object(ObjectBuilder::new())
                }
            });

            if is_excluded(&key) {
                continue;
            }

            let key_text = key_text(&key);
            let node = match key_text {
                KeyText::Undecodable(_) => {
                    self.stats.decode_errors += 1;
                    JsonNode::text(DECODE_ERROR_MARKER)
                }
                _ => self.mirror_value(&value, depth + 1),
            };

            match shape {
                Shape::Array(items) => items.push(node),
                Shape::Object(builder) => match key_text {
                    KeyText::Text(k) | KeyText::Undecodable(k) => builder.insert(k, node),
                    KeyText::Unsupported(kind) => {
                        self.stats.skipped_keys += 1;
                        debug!("Skipping entry with {} key", kind);
                    }
                },
            }
        }

        self.open.remove(&identity);

        match shape {
            Some(Shape::Array(items)) => JsonNode::Array(items),
            Some(Shape::Object(builder)) => builder.build(),
            None => JsonNode::empty_object(),
        }
    }

    fn is_integer_key(&self, key: &Value) -> bool {
        match key {
            Value::Integer(_) => true,
            Value::Number(n) => !self.integer_subtype && fits_i64(*n),
            _ => false,
        }
    }
}

enum Shape {
    Array(Vec<JsonNode>),
    Object(ObjectBuilder),
}

enum KeyText {
    Text(String),
    /// Lossy rendering of a key whose bytes are not UTF-8
    Undecodable(String),
    Unsupported(&'static str),
}

fn key_text(key: &Value) -> KeyText {
    match key {
        Value::String(s) => match s.to_str() {
            Ok(text) => KeyText::Text(text.to_string()),
            Err(_) => KeyText::Undecodable(s.to_string_lossy().to_string()),
        },
        Value::Integer(i) => KeyText::Text(i.to_string()),
        Value::Number(n) if fits_i64(*n) => KeyText::Text(format!("{}", *n as i64)),
        Value::Number(n) => KeyText::Text(n.to_string()),
        Value::Boolean(b) => KeyText::Text(b.to_string()),
        other => KeyText::Unsupported(other.type_name()),
    }
}

/// Integral and inside the i64 range, so the `as` cast is exact
fn fits_i64(n: f64) -> bool {
    n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64
}

fn is_excluded(key: &Value) -> bool {
    match key {
        Value::String(s) => s
            .to_str()
            .as_deref()
            .map_or(false, |k| EXCLUDED_KEYS.contains(&k)),
        _ => false,
    }
}
