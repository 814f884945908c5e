//! Per-node relation index
//!
//! Every node keeps two views of its outgoing edges:
//! - `outgoing`: target -> labels, one entry per parallel edge
//! - `by_relation`: label -> targets, one entry per parallel edge
//!
//! Both views are updated together so that for every `(label, target)` pair
//! the multiplicity of `target` under `label` equals the multiplicity of
//! `label` under `target`.

use super::types::{NodeId, Relation};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

/// Forward adjacency of a single node, keyed both by target and by label
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    /// Target node -> relation labels in insertion order
    outgoing: IndexMap<NodeId, Vec<Relation>>,

    /// Relation label -> target nodes in insertion order
    by_relation: IndexMap<Relation, Vec<NodeId>>,
}

impl RelationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one edge `self -[relation]-> target`
    pub fn insert(&mut self, target: NodeId, relation: Relation) {
        self.outgoing
            .entry(target)
            .or_default()
            .push(relation.clone());
        self.by_relation.entry(relation).or_default().push(target);
    }

    /// Remove a single edge `self -[relation]-> target`
    ///
    /// Returns `false` when no such edge exists. Remaining entries keep their
    /// relative order.
    pub fn remove(&mut self, target: NodeId, relation: &str) -> bool {
        let Some(labels) = self.outgoing.get_mut(&target) else {
            return false;
        };
        let Some(pos) = labels.iter().position(|l| l.as_str() == relation) else {
            return false;
        };
        labels.remove(pos);
        if labels.is_empty() {
            self.outgoing.shift_remove(&target);
        }

        if let Some(targets) = self.by_relation.get_mut(relation) {
            if let Some(pos) = targets.iter().position(|&t| t == target) {
                targets.remove(pos);
            }
            if targets.is_empty() {
                self.by_relation.shift_remove(relation);
            }
        }
        true
    }

    /// Drop every edge pointing at `target`, returning how many were removed
    pub fn remove_target(&mut self, target: NodeId) -> usize {
        let Some(labels) = self.outgoing.shift_remove(&target) else {
            return 0;
        };

        for label in &labels {
            if let Some(targets) = self.by_relation.get_mut(label.as_str()) {
                targets.retain(|&t| t != target);
            }
        }
        self.by_relation.retain(|_, targets| !targets.is_empty());

        labels.len()
    }

    /// Targets reachable through `relation`, one entry per edge
    pub fn targets(&self, relation: &str) -> &[NodeId] {
        self.by_relation
            .get(relation)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Labels of the edges pointing at `target`, one entry per edge
    pub fn relations_to(&self, target: NodeId) -> &[Relation] {
        self.outgoing
            .get(&target)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Distinct targets in first-insertion order
    pub fn neighbours(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing.keys().copied()
    }

    /// Distinct labels in first-insertion order
    pub fn labels(&self) -> impl Iterator<Item = &Relation> + '_ {
        self.by_relation.keys()
    }

    /// Every edge as `(target, label)`, grouped by target in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, &Relation)> + '_ {
        self.outgoing
            .iter()
            .flat_map(|(&target, labels)| labels.iter().map(move |label| (target, label)))
    }

    /// Total number of edges (parallel edges counted individually)
    pub fn edge_count(&self) -> usize {
        self.outgoing.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty()
    }

    pub fn clear(&mut self) {
        self.outgoing.clear();
        self.by_relation.clear();
    }

    /// Check that both views describe the same multiset of edges
    pub fn is_consistent(&self) -> bool {
        let mut balance: FxHashMap<(NodeId, &str), i64> = FxHashMap::default();

        for (&target, labels) in &self.outgoing {
            if labels.is_empty() {
                return false;
            }
            for label in labels {
                *balance.entry((target, label.as_str())).or_insert(0) += 1;
            }
        }
        for (label, targets) in &self.by_relation {
            if targets.is_empty() {
                return false;
            }
            for &target in targets {
                *balance.entry((target, label.as_str())).or_insert(0) -= 1;
            }
        }

        balance.values().all(|&count| count == 0)
    }
}
