//! Named registry of graphs
//!
//! [`GraphCollection`] owns every [`Graph`] by name and drives the text codec
//! for whole collections and files.

use crate::codec::{self, CodecResult};
use crate::graph::{Graph, GraphError, GraphResult};
use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Graphs keyed by name, in creation order
#[derive(Debug, Clone, Default)]
pub struct GraphCollection {
    graphs: IndexMap<String, Graph>,
}

impl GraphCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the graph called `name`, creating an empty one if needed
    pub fn create_graph(&mut self, name: &str) -> GraphResult<&mut Graph> {
        crate::graph::store::validate_name("graph", name)?;
        if !self.graphs.contains_key(name) {
            debug!(graph = name, "created graph");
        }
        Ok(self
            .graphs
            .entry(name.to_string())
            .or_insert_with(|| Graph::new(name)))
    }

    pub fn graph(&self, name: &str) -> GraphResult<&Graph> {
        self.graphs
            .get(name)
            .ok_or_else(|| GraphError::GraphNotFound(name.to_string()))
    }

    pub fn graph_mut(&mut self, name: &str) -> GraphResult<&mut Graph> {
        self.graphs
            .get_mut(name)
            .ok_or_else(|| GraphError::GraphNotFound(name.to_string()))
    }

    pub fn contains_graph(&self, name: &str) -> bool {
        self.graphs.contains_key(name)
    }

    /// Drop a graph, keeping the order of the rest
    pub fn remove_graph(&mut self, name: &str) -> GraphResult<Graph> {
        let graph = self
            .graphs
            .shift_remove(name)
            .ok_or_else(|| GraphError::GraphNotFound(name.to_string()))?;
        debug!(graph = name, "removed graph");
        Ok(graph)
    }

    /// Insert under the graph's own name, returning any graph it replaced
    pub fn insert_graph(&mut self, graph: Graph) -> Option<Graph> {
        let replaced = self.graphs.insert(graph.name().to_string(), graph);
        if let Some(old) = &replaced {
            warn!(graph = old.name(), "replaced existing graph");
        }
        replaced
    }

    pub fn graph_names(&self) -> Vec<&str> {
        self.graphs.keys().map(String::as_str).collect()
    }

    pub fn graphs(&self) -> impl Iterator<Item = &Graph> + '_ {
        self.graphs.values()
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Move every graph of `other` in, overwriting on name clashes
    ///
    /// Returns the number of graphs moved.
    pub fn merge(&mut self, other: GraphCollection) -> usize {
        let count = other.len();
        for graph in other.graphs.into_values() {
            self.insert_graph(graph);
        }
        count
    }

    // ============================================================
    // Codec
    // ============================================================

    /// Build a collection from text holding zero or more graph blocks
    ///
    /// Later blocks overwrite earlier blocks with the same name. Nothing is
    /// returned if any block is malformed.
    pub fn decode(text: &str) -> CodecResult<Self> {
        let mut collection = Self::new();
        for graph in codec::decode(text)? {
            collection.insert_graph(graph);
        }
        Ok(collection)
    }

    /// Serialize a single graph
    pub fn encode(graph: &Graph) -> CodecResult<String> {
        codec::encode(graph)
    }

    /// Serialize every graph, one block after another
    pub fn encode_all(&self) -> CodecResult<String> {
        let mut out = String::new();
        for graph in self.graphs.values() {
            codec::encode_into(graph, &mut out)?;
        }
        Ok(out)
    }

    // ============================================================
    // Files
    // ============================================================

    /// Load every graph stored in a file
    pub fn from_file(path: impl AsRef<Path>) -> CodecResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let collection = Self::decode(&text)?;
        info!(
            "Loaded {} graph(s) from {}",
            collection.len(),
            path.display()
        );
        Ok(collection)
    }

    /// Write one graph to a file, replacing its contents
    ///
    /// The graph is encoded before the file is opened, so an unencodable
    /// graph never truncates an existing file.
    pub fn write_graph_to_file(graph: &Graph, path: impl AsRef<Path>) -> CodecResult<()> {
        let text = codec::encode(graph)?;
        write_text(path.as_ref(), &text)?;
        info!("Saved graph '{}' to {}", graph.name(), path.as_ref().display());
        Ok(())
    }

    /// Write every graph to a file, replacing its contents
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> CodecResult<()> {
        let text = self.encode_all()?;
        write_text(path.as_ref(), &text)?;
        info!("Saved {} graph(s) to {}", self.len(), path.as_ref().display());
        Ok(())
    }
}

fn write_text(path: &Path, text: &str) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(text.as_bytes())?;
    writer.flush()
}
