//! Captured path parameters.

use std::str::FromStr;

/// Parameters captured while dispatching one path.
///
/// Names borrow from the routing table and values borrow from the request
/// path, so collecting them never copies. Captures are stored outermost
/// level first; lookups use "last write wins", so an inner router's `{id}`
/// shadows an outer one with the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params<'a> {
    entries: Vec<(&'a str, &'a str)>,
}

impl<'a> Params<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: &'a str, value: &'a str) {
        self.entries.push((name, value));
    }

    /// Get a parameter value by name.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.entries
            .iter()
            .rfind(|(k, _)| *k == name)
            .map(|&(_, v)| v)
    }

    /// Get a parameter and parse it, e.g. `params.parse::<u64>("id")`.
    ///
    /// Returns `None` if the parameter is absent or does not parse.
    pub fn parse<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|v| v.parse().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The captures as `(name, value)` pairs, ready for
    /// [`RoutingTable::reverse`](super::RoutingTable::reverse).
    pub fn as_pairs(&self) -> &[(&'a str, &'a str)] {
        &self.entries
    }
}
