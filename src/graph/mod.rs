//! Core graph implementation
//!
//! This module implements the labeled multigraph data model with:
//! - Nodes identified by unique names, tagged with property sets
//! - Directed edges carrying a relation label, parallel edges allowed
//! - A per-node relation index kept in lock-step in both directions
//! - Removal that cascades through every index

pub mod node;
pub mod relation;
pub mod store;
pub mod types;

// Re-export main types
pub use node::Node;
pub use relation::RelationIndex;
pub use store::{Graph, GraphError, GraphResult};
pub use types::{EdgeTriple, NodeId, Relation};
