//! Global diff tracking
//!
//! Before and after each source unit runs, the names bound in the global table
//! are captured; whatever appeared in between is appended to the session's
//! discovered sequence.

use std::collections::HashSet;

use mlua::{Lua, Value};
use tracing::debug;

/// Set of global names bound at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalSnapshot {
    names: HashSet<String>,
}

impl GlobalSnapshot {
    /// Capture every text-keyed global.
    ///
    /// Keys that are not strings, or not valid UTF-8, cannot name an output
    /// file and are left out.
    pub fn capture(lua: &Lua) -> mlua::Result<Self> {
        let mut names = HashSet::new();
        for pair in lua.globals().pairs::<Value, Value>() {
            let (key, _) = pair?;
            match key {
                Value::String(s) => match s.to_str() {
                    Ok(name) => {
                        names.insert(name.to_string());
                    }
                    Err(_) => debug!("Skipping global with undecodable name"),
                },
                other => debug!("Skipping non-text global key of type {}", other.type_name()),
            }
        }
        Ok(Self { names })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names present in `after` but not in `self`, sorted for stable output
    pub fn diff(&self, after: &GlobalSnapshot) -> Vec<String> {
        let mut added: Vec<String> = after.names.difference(&self.names).cloned().collect();
        added.sort();
        added
    }
}

/// Cumulative discovery order across a batch.
///
/// A name can appear more than once when a later file rebinds a global that
/// an earlier file cleared; [`DiscoveredNames::distinct`] yields each name once,
/// at its first position.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredNames {
    order: Vec<String>,
}

impl DiscoveredNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, names: impl IntoIterator<Item = String>) {
        self.order.extend(names);
    }

    /// Every recorded name, duplicates included
    pub fn all(&self) -> &[String] {
        &self.order
    }

    /// Each name once, in first-discovery order
    pub fn distinct(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.order
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_sees_standard_library() {
        let lua = Lua::new();
        let snapshot = GlobalSnapshot::capture(&lua).unwrap();

        assert!(snapshot.contains("_G"));
        assert!(snapshot.contains("print"));
        assert!(!snapshot.contains("items"));
    }

    #[test]
    fn test_diff_reports_only_new_names_sorted() {
        let lua = Lua::new();
        lua.load("existing = 1").exec().unwrap();
        let before = GlobalSnapshot::capture(&lua).unwrap();

        lua.load("zeta = {} ; alpha = 2 ; existing = 3").exec().unwrap();
        let after = GlobalSnapshot::capture(&lua).unwrap();

        assert_eq!(before.diff(&after), vec!["alpha".to_string(), "zeta".to_string()]);
    }

    #[test]
    fn test_diff_ignores_locals() {
        let lua = Lua::new();
        let before = GlobalSnapshot::capture(&lua).unwrap();
        lua.load("local hidden = {1, 2, 3}").exec().unwrap();
        let after = GlobalSnapshot::capture(&lua).unwrap();

        assert!(before.diff(&after).is_empty());
    }

    #[test]
    fn test_non_text_global_keys_are_skipped() {
        let lua = Lua::new();
        let before = GlobalSnapshot::capture(&lua).unwrap();
        lua.load("_G[1] = 'one' ; _G[true] = 'yes'").exec().unwrap();
        let after = GlobalSnapshot::capture(&lua).unwrap();

        assert!(before.diff(&after).is_empty());
        assert_eq!(before.len(), after.len());
    }

    #[test]
    fn test_discovered_names_distinct_keeps_first_position() {
        let mut names = DiscoveredNames::new();
        names.extend(vec!["b".to_string(), "a".to_string()]);
        names.extend(vec!["c".to_string(), "b".to_string()]);

        assert_eq!(names.len(), 4);
        assert_eq!(names.distinct(), vec!["b", "a", "c"]);
    }
}
