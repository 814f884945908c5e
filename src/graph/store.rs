//! In-memory graph storage implementation
//!
//! A [`Graph`] owns its nodes in an arena addressed by [`NodeId`]. Names map
//! to handles through an insertion-ordered index which doubles as the
//! iteration and encoding order. Each node owns its outgoing
//! [`RelationIndex`](super::relation::RelationIndex); the graph keeps the
//! incoming side so that removing a node can purge every edge pointing at it.

use super::node::Node;
use super::types::{EdgeTriple, NodeId, Relation};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Graph '{0}' not found")]
    GraphNotFound(String),

    #[error("Graph invariant violated: {0}")]
    InvariantViolation(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Reject empty or whitespace-only names
pub(crate) fn validate_name(kind: &str, value: &str) -> GraphResult<()> {
    if value.trim().is_empty() {
        return Err(GraphError::InvalidArgument(format!(
            "{} name must not be blank",
            kind
        )));
    }
    Ok(())
}

fn validate_names<S: AsRef<str>>(kind: &str, values: &[S]) -> GraphResult<()> {
    values.iter().try_for_each(|v| validate_name(kind, v.as_ref()))
}

/// Named, in-memory directed multigraph
///
/// Storage layout:
/// - nodes: arena slot -> Node (None for freed slots)
/// - by_name: name -> NodeId, in node creation order
/// - incoming: arena slot -> set of nodes with at least one edge to it
#[derive(Debug, Clone)]
pub struct Graph {
    name: String,

    /// Node arena
    nodes: Vec<Option<Node>>,

    /// Name index, also the authoritative iteration order
    by_name: IndexMap<String, NodeId>,

    /// Sources of incoming edges for each node
    incoming: Vec<FxHashSet<NodeId>>,

    /// Free node IDs for reuse
    free_node_ids: Vec<u64>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Graph {
            name: name.into(),
            nodes: Vec::new(),
            by_name: IndexMap::new(),
            incoming: Vec::new(),
            free_node_ids: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ============================================================
    // Nodes
    // ============================================================

    /// Return the node called `name`, creating it if needed
    ///
    /// Re-adding an existing name leaves the node and its indices untouched.
    pub fn ensure_node(&mut self, name: &str) -> GraphResult<NodeId> {
        validate_name("node", name)?;
        if let Some(&id) = self.by_name.get(name) {
            return Ok(id);
        }

        let node_id = match self.free_node_ids.pop() {
            Some(id) => NodeId::new(id),
            None => {
                let id = NodeId::new(self.nodes.len() as u64);
                self.nodes.push(None);
                self.incoming.push(FxHashSet::default());
                id
            }
        };

        self.nodes[node_id.index()] = Some(Node::new(node_id, name));
        self.by_name.insert(name.to_string(), node_id);
        debug!(graph = %self.name, node = name, "created node {}", node_id);

        Ok(node_id)
    }

    /// Handle of the node called `name`
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Get a node by name
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.node_id(name).and_then(|id| self.node_by_id(id))
    }

    /// Get a node by handle
    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    fn node_by_id_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    fn require(&self, name: &str) -> GraphResult<NodeId> {
        self.node_id(name)
            .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))
    }

    fn name_of(&self, id: NodeId) -> Option<&str> {
        self.node_by_id(id).map(Node::name)
    }

    /// Nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.by_name.values().filter_map(|&id| self.node_by_id(id))
    }

    /// Node names in creation order
    pub fn node_names(&self) -> Vec<&str> {
        self.by_name.keys().map(String::as_str).collect()
    }

    pub fn node_count(&self) -> usize {
        self.by_name.len()
    }

    /// Total number of edges (parallel edges counted individually)
    pub fn edge_count(&self) -> usize {
        self.nodes().map(|n| n.relations().edge_count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    // ============================================================
    // Relations
    // ============================================================

    /// Add the edge `from -[relation]-> to`, creating missing endpoints
    ///
    /// Adding the same labelled edge twice yields two parallel edges.
    pub fn add_relation(&mut self, from: &str, to: &str, relation: &str) -> GraphResult<()> {
        validate_name("node", from)?;
        validate_name("node", to)?;
        validate_name("relation", relation)?;

        let source = self.ensure_node(from)?;
        let target = self.ensure_node(to)?;
        self.link(source, target, Relation::new(relation));
        debug!(graph = %self.name, "added relation {} -[{}]-> {}", from, relation, to);

        Ok(())
    }

    /// Add `a -[relation]-> b` and `b -[relation]-> a` as two independent edges
    pub fn add_bidirectional_relation(&mut self, a: &str, b: &str, relation: &str) -> GraphResult<()> {
        validate_name("node", a)?;
        validate_name("node", b)?;
        validate_name("relation", relation)?;

        self.add_relation(a, b, relation)?;
        self.add_relation(b, a, relation)
    }

    fn link(&mut self, source: NodeId, target: NodeId, relation: Relation) {
        if let Some(node) = self.node_by_id_mut(source) {
            node.relations_mut().insert(target, relation);
            self.incoming[target.index()].insert(source);
        }
    }

    /// Names of the nodes reachable from `from` through `relation`
    ///
    /// One entry per edge, in insertion order. An existing node without such
    /// a relation yields an empty list; a missing node is an error.
    pub fn related_nodes(&self, from: &str, relation: &str) -> GraphResult<Vec<&str>> {
        let source = self.require(from)?;
        let node = self
            .node_by_id(source)
            .ok_or_else(|| GraphError::NodeNotFound(from.to_string()))?;

        Ok(node
            .relations()
            .targets(relation)
            .iter()
            .filter_map(|&target| self.name_of(target))
            .collect())
    }

    /// Labels of every edge `from -> to`, in insertion order
    pub fn relations_between(&self, from: &str, to: &str) -> GraphResult<Vec<&str>> {
        let source = self.require(from)?;
        let target = self.require(to)?;
        let node = self
            .node_by_id(source)
            .ok_or_else(|| GraphError::NodeNotFound(from.to_string()))?;

        Ok(node
            .relations()
            .relations_to(target)
            .iter()
            .map(Relation::as_str)
            .collect())
    }

    /// Remove one edge `from -[relation]-> to`
    ///
    /// Returns `false` if both nodes exist but no such edge does.
    pub fn remove_relation(&mut self, from: &str, to: &str, relation: &str) -> GraphResult<bool> {
        let source = self.require(from)?;
        let target = self.require(to)?;

        let Some(node) = self.node_by_id_mut(source) else {
            return Err(GraphError::NodeNotFound(from.to_string()));
        };
        let removed = node.relations_mut().remove(target, relation);
        let still_linked = !node.relations().relations_to(target).is_empty();

        if removed && !still_linked {
            self.incoming[target.index()].remove(&source);
        }
        if removed {
            debug!(graph = %self.name, "removed relation {} -[{}]-> {}", from, relation, to);
        }

        Ok(removed)
    }

    /// Every edge, grouped by source in node order, then by target in
    /// first-insertion order
    pub fn edges(&self) -> impl Iterator<Item = EdgeTriple<'_>> + '_ {
        self.nodes().flat_map(move |node| {
            node.relations().edges().filter_map(move |(target, relation)| {
                Some(EdgeTriple {
                    from: node.name(),
                    label: relation.as_str(),
                    to: self.name_of(target)?,
                })
            })
        })
    }

    /// One line per edge, `from -[label]-> to`
    pub fn describe(&self) -> Vec<String> {
        self.edges().map(|edge| edge.to_string()).collect()
    }

    // ============================================================
    // Properties
    // ============================================================

    /// Tag a node with a property, creating the node if needed
    pub fn add_property(&mut self, node: &str, property: &str) -> GraphResult<()> {
        self.add_properties(node, &[property])
    }

    /// Tag a node with several properties, creating the node if needed
    pub fn add_properties<S: AsRef<str>>(&mut self, node: &str, properties: &[S]) -> GraphResult<()> {
        validate_name("node", node)?;
        validate_names("property", properties)?;

        let id = self.ensure_node(node)?;
        if let Some(node) = self.node_by_id_mut(id) {
            for property in properties {
                node.add_property(property.as_ref());
            }
        }
        Ok(())
    }

    /// Tag several nodes with the same property
    pub fn add_property_to_nodes<S: AsRef<str>>(&mut self, nodes: &[S], property: &str) -> GraphResult<()> {
        self.add_properties_to_nodes(nodes, &[property])
    }

    /// Tag every listed node with every listed property
    pub fn add_properties_to_nodes<N, P>(&mut self, nodes: &[N], properties: &[P]) -> GraphResult<()>
    where
        N: AsRef<str>,
        P: AsRef<str>,
    {
        validate_names("node", nodes)?;
        validate_names("property", properties)?;

        for node in nodes {
            self.add_properties(node.as_ref(), properties)?;
        }
        Ok(())
    }

    /// Drop one property tag from a node
    ///
    /// Returns `false` when the node did not carry it. The remaining tags keep
    /// their order.
    pub fn remove_property(&mut self, node: &str, property: &str) -> GraphResult<bool> {
        let id = self.require(node)?;
        let removed = self
            .node_by_id_mut(id)
            .map(|n| n.remove_property(property))
            .unwrap_or(false);
        if removed {
            debug!(graph = %self.name, node, "removed property {}", property);
        }
        Ok(removed)
    }

    /// Property tags of a node in insertion order
    pub fn properties_of(&self, node: &str) -> GraphResult<Vec<&str>> {
        self.node(node)
            .map(|n| n.properties().collect())
            .ok_or_else(|| GraphError::NodeNotFound(node.to_string()))
    }

    /// Names of nodes carrying `property`, in node order
    pub fn nodes_with_property(&self, property: &str) -> Vec<&str> {
        self.nodes()
            .filter(|n| n.has_property(property))
            .map(Node::name)
            .collect()
    }

    /// Names of nodes carrying every one of `properties`, in node order
    ///
    /// An empty property list matches every node.
    pub fn nodes_with_properties<S: AsRef<str>>(&self, properties: &[S]) -> Vec<&str> {
        self.nodes()
            .filter(|n| n.has_properties(properties))
            .map(Node::name)
            .collect()
    }

    // ============================================================
    // Removal
    // ============================================================

    /// Delete a node together with every edge into or out of it
    pub fn remove_node(&mut self, name: &str) -> GraphResult<Node> {
        let id = self.require(name)?;
        self.detach(id)
            .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))
    }

    /// Delete several nodes
    ///
    /// Every name must exist; nothing is removed otherwise. Duplicate names
    /// are removed once. Returns the number of nodes removed.
    pub fn remove_nodes<S: AsRef<str>>(&mut self, names: &[S]) -> GraphResult<usize> {
        let mut victims = Vec::with_capacity(names.len());
        for name in names {
            let id = self.require(name.as_ref())?;
            if !victims.contains(&id) {
                victims.push(id);
            }
        }

        Ok(victims
            .into_iter()
            .filter_map(|id| self.detach(id))
            .count())
    }

    /// Delete every node carrying `property`, returning their names
    pub fn remove_nodes_with_property(&mut self, property: &str) -> Vec<String> {
        self.remove_matching(|node| node.has_property(property))
    }

    /// Delete every node carrying all of `properties`, returning their names
    pub fn remove_nodes_with_properties<S: AsRef<str>>(&mut self, properties: &[S]) -> Vec<String> {
        self.remove_matching(|node| node.has_properties(properties))
    }

    fn remove_matching(&mut self, predicate: impl Fn(&Node) -> bool) -> Vec<String> {
        let victims: Vec<NodeId> = self
            .nodes()
            .filter(|&n| predicate(n))
            .map(Node::id)
            .collect();

        victims
            .into_iter()
            .filter_map(|id| self.detach(id))
            .map(|node| node.name().to_string())
            .collect()
    }

    /// Unlink a node from every index and free its slot
    fn detach(&mut self, id: NodeId) -> Option<Node> {
        let idx = id.index();
        let mut node = self.nodes.get_mut(idx)?.take()?;

        // Edges pointing at the node
        let sources = std::mem::take(&mut self.incoming[idx]);
        for source in sources {
            if source == id {
                continue;
            }
            if let Some(other) = self.node_by_id_mut(source) {
                other.relations_mut().remove_target(id);
            }
        }

        // Edges leaving the node
        for target in node.relations().neighbours() {
            if target != id {
                if let Some(sources) = self.incoming.get_mut(target.index()) {
                    sources.remove(&id);
                }
            }
        }
        node.relations_mut().clear();

        self.by_name.shift_remove(node.name());
        self.free_node_ids.push(id.as_u64());
        debug!(graph = %self.name, node = node.name(), "removed node {}", id);

        Some(node)
    }

    // ============================================================
    // Consistency
    // ============================================================

    /// Verify the name index, the relation indices and the incoming index
    /// all agree
    pub fn check_invariants(&self) -> GraphResult<()> {
        let violation = |msg: String| Err(GraphError::InvariantViolation(msg));

        let live = self.nodes.iter().flatten().count();
        if live != self.by_name.len() {
            return violation(format!(
                "{} live nodes but {} indexed names",
                live,
                self.by_name.len()
            ));
        }

        for (name, &id) in &self.by_name {
            let Some(node) = self.node_by_id(id) else {
                return violation(format!("name '{}' points at empty slot {}", name, id));
            };
            if node.name() != name || node.id() != id {
                return violation(format!("name '{}' points at node '{}'", name, node.name()));
            }
            if !node.relations().is_consistent() {
                return violation(format!("relation views of '{}' disagree", name));
            }
            for target in node.relations().neighbours() {
                if self.node_by_id(target).is_none() {
                    return violation(format!("'{}' has an edge to removed node {}", name, target));
                }
                if !self.incoming[target.index()].contains(&id) {
                    return violation(format!("incoming index misses edge from '{}' to {}", name, target));
                }
            }
        }

        for (idx, sources) in self.incoming.iter().enumerate() {
            let target = NodeId::new(idx as u64);
            for &source in sources {
                let linked = self
                    .node_by_id(source)
                    .map(|n| !n.relations().relations_to(target).is_empty())
                    .unwrap_or(false);
                if !linked {
                    return violation(format!("stale incoming entry {} -> {}", source, target));
                }
            }
        }

        Ok(())
    }
}
