//! Export driver
//!
//! Yields one `(name, tree)` pair per distinct discovered global, reading the
//! global's value only when the pair is requested. When several files bound
//! the same name, the value in the interpreter at export time is what gets
//! exported.

use std::vec;

use crate::error::LuaResult;
use crate::node::JsonNode;
use crate::session::LuaSession;

/// Lazy sequence of mirrored globals, see [`LuaSession::exports`]
#[derive(Debug)]
pub struct Exports<'a> {
    session: &'a LuaSession,
    names: vec::IntoIter<String>,
}

impl<'a> Exports<'a> {
    pub(crate) fn new(session: &'a LuaSession) -> Self {
        Self {
            session,
            names: session.discovered().distinct().into_iter(),
        }
    }
}

impl Iterator for Exports<'_> {
    type Item = LuaResult<(String, JsonNode)>;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.names.next()?;
        Some(self.session.mirror_global(&name).map(|node| (name, node)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.names.size_hint()
    }
}

impl ExactSizeIterator for Exports<'_> {}

impl LuaSession {
    /// Mirror every distinct discovered global, in discovery order
    pub fn exports(&self) -> Exports<'_> {
        Exports::new(self)
    }
}
