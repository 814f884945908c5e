//! Core type definitions for the graph store

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a node inside its owning graph's arena
///
/// Handles are only meaningful for the graph that issued them. A removed
/// node's handle may be reissued to a node created later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Arena slot for this handle
    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

/// Relation label naming the kind of a directed edge (e.g. "Knows")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Relation(String);

impl Relation {
    pub fn new(label: impl Into<String>) -> Self {
        Relation(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Relation {
    fn from(s: String) -> Self {
        Relation(s)
    }
}

impl From<&str> for Relation {
    fn from(s: &str) -> Self {
        Relation(s.to_string())
    }
}

impl std::borrow::Borrow<str> for Relation {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One directed edge as seen from outside the graph: `from -[label]-> to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeTriple<'a> {
    pub from: &'a str,
    pub label: &'a str,
    pub to: &'a str,
}

impl fmt::Display for EdgeTriple<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.from, self.label, self.to)
    }
}
