//! Lua version tags
//!
//! A batch is run against one Lua dialect, selected by a short tag (`52`, `53`,
//! `54`). mlua links a single Lua build per binary, so only the tag matching the
//! enabled cargo feature can actually open a session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LuaError;

#[cfg(any(
    all(feature = "lua52", feature = "lua53"),
    all(feature = "lua52", feature = "lua54"),
    all(feature = "lua53", feature = "lua54"),
))]
compile_error!(
    "luajson-lua links one Lua build: enable exactly one of `lua52`, `lua53`, `lua54` \
     (use --no-default-features to replace the default `lua54`)"
);

#[cfg(feature = "lua52")]
const LINKED: LuaVersion = LuaVersion::Lua52;
#[cfg(all(feature = "lua53", not(feature = "lua52")))]
const LINKED: LuaVersion = LuaVersion::Lua53;
#[cfg(not(any(feature = "lua52", feature = "lua53")))]
const LINKED: LuaVersion = LuaVersion::Lua54;

/// Supported Lua dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LuaVersion {
    #[serde(rename = "52")]
    Lua52,
    #[serde(rename = "53")]
    Lua53,
    #[serde(rename = "54")]
    Lua54,
}

impl LuaVersion {
    /// All supported tags, oldest first
    pub const ALL: [LuaVersion; 3] = [LuaVersion::Lua52, LuaVersion::Lua53, LuaVersion::Lua54];

    /// The Lua build this binary was compiled against
    pub const fn linked() -> Self {
        LINKED
    }

    /// Short tag, e.g. `"54"`
    pub fn tag(&self) -> &'static str {
        match self {
            LuaVersion::Lua52 => "52",
            LuaVersion::Lua53 => "53",
            LuaVersion::Lua54 => "54",
        }
    }

    /// Value of `_VERSION` inside the interpreter
    pub fn release_name(&self) -> &'static str {
        match self {
            LuaVersion::Lua52 => "Lua 5.2",
            LuaVersion::Lua53 => "Lua 5.3",
            LuaVersion::Lua54 => "Lua 5.4",
        }
    }

    /// Whether numbers carry a separate integer subtype (5.3 and later)
    pub fn has_integers(&self) -> bool {
        !matches!(self, LuaVersion::Lua52)
    }

    /// Fail unless this tag is the linked build
    pub fn ensure_linked(self) -> Result<Self, LuaError> {
        let linked = Self::linked();
        if self == linked {
            Ok(self)
        } else {
            Err(LuaError::VersionUnavailable {
                requested: self,
                linked,
            })
        }
    }
}

impl Default for LuaVersion {
    fn default() -> Self {
        Self::linked()
    }
}

impl fmt::Display for LuaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for LuaVersion {
    type Err = LuaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let digits = normalized
            .strip_prefix("lua")
            .unwrap_or(&normalized)
            .trim()
            .replace('.', "");

        match digits.as_str() {
            "52" => Ok(LuaVersion::Lua52),
            "53" => Ok(LuaVersion::Lua53),
            "54" => Ok(LuaVersion::Lua54),
            _ => Err(LuaError::UnsupportedVersion(s.to_string())),
        }
    }
}
