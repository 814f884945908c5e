//! Graphite
//!
//! A small in-memory store of named, directed, labeled multigraphs with a
//! plain-text file format and a line-oriented command shell.
//!
//! # Layout
//!
//! - [`graph`]: nodes, property tags, relation indices and the [`Graph`] itself
//! - [`codec`]: the `#GraphDef` / `#NodeDef` / `#RelationDef` text format
//! - [`collection`]: [`GraphCollection`], a registry of graphs by name
//! - [`shell`]: command grammar, dispatch and a lock-aware [`Session`]
//!
//! ## Example Usage
//!
//! ```rust
//! use graphite::GraphCollection;
//!
//! let mut collection = GraphCollection::new();
//! let people = collection.create_graph("People").unwrap();
//!
//! people.add_relation("Dave", "Bob", "Knows").unwrap();
//! people.add_relation("Dave", "Dave", "Knows").unwrap();
//! people.add_properties("Dave", &["Smart", "Blue"]).unwrap();
//!
//! assert_eq!(people.related_nodes("Dave", "Knows").unwrap(), vec!["Bob", "Dave"]);
//! assert_eq!(people.nodes_with_properties(&["Smart", "Blue"]), vec!["Dave"]);
//!
//! // Round-trip through the text format
//! let text = GraphCollection::encode(people).unwrap();
//! let decoded = GraphCollection::decode(&text).unwrap();
//! assert_eq!(decoded.graph("People").unwrap().edge_count(), 2);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod collection;
pub mod graph;
pub mod shell;

// Re-export main types for convenience
pub use codec::{CodecError, CodecResult};
pub use collection::GraphCollection;
pub use graph::{EdgeTriple, Graph, GraphError, GraphResult, Node, NodeId, Relation};
pub use shell::{Command, CommandOutput, Session, SharedCollection, ShellConfig, ShellError, ShellResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.3.0");
    }
}
