//! Node implementation for the multigraph
//!
//! A node is a unique name inside its graph, a set of property tags and the
//! index of its outgoing relations.

use super::relation::RelationIndex;
use super::types::NodeId;
use indexmap::IndexSet;

/// A node in the graph
///
/// Nodes have:
/// - An arena handle assigned by the owning graph
/// - A name, unique within the graph and fixed at creation
/// - Property tags (presence only, no values)
/// - Outgoing relations to other nodes of the same graph
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    name: String,

    /// Property tags in insertion order
    properties: IndexSet<String>,

    /// Outgoing edges
    relations: RelationIndex,
}

impl Node {
    /// Create a node without properties or relations
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Node {
            id,
            name: name.into(),
            properties: IndexSet::new(),
            relations: RelationIndex::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a property tag, returning `false` if it was already present
    pub fn add_property(&mut self, property: impl Into<String>) -> bool {
        self.properties.insert(property.into())
    }

    /// Remove a property tag, returning `false` if it was absent
    pub fn remove_property(&mut self, property: &str) -> bool {
        self.properties.shift_remove(property)
    }

    pub fn has_property(&self, property: &str) -> bool {
        self.properties.contains(property)
    }

    /// True when every listed property is present (vacuously true for none)
    pub fn has_properties<S: AsRef<str>>(&self, properties: &[S]) -> bool {
        properties.iter().all(|p| self.has_property(p.as_ref()))
    }

    /// Property tags in insertion order
    pub fn properties(&self) -> impl Iterator<Item = &str> + '_ {
        self.properties.iter().map(String::as_str)
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn relations(&self) -> &RelationIndex {
        &self.relations
    }

    /// Mutable access is reserved for the owning graph, which also maintains
    /// the incoming side of every edge.
    pub(crate) fn relations_mut(&mut self) -> &mut RelationIndex {
        &mut self.relations
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.name.hash(state);
    }
}
