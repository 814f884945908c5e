//! Graph -> text

use super::{
    is_marker, CodecError, CodecResult, FIELD_SEPARATOR, GRAPH_DEF, GRAPH_DEF_END,
    NODE_DEF, NODE_DEF_END, PROPERTY_DEF, PROPERTY_DEF_END, RELATION_DEF, RELATION_DEF_END,
};
use crate::graph::Graph;
use tracing::debug;

/// Serialize one graph as a single block
///
/// Nodes are written in graph order; relations grouped by source node in
/// graph order, then by target in insertion order.
pub fn encode(graph: &Graph) -> CodecResult<String> {
    let mut out = String::new();
    encode_into(graph, &mut out)?;
    Ok(out)
}

/// Append the block for `graph` to `out`
///
/// The graph is validated before anything is written, so `out` is left
/// untouched on error.
pub fn encode_into(graph: &Graph, out: &mut String) -> CodecResult<()> {
    check_encodable(graph)?;

    push_line(out, GRAPH_DEF);
    push_line(out, graph.name());
    push_line(out, GRAPH_DEF_END);

    push_line(out, NODE_DEF);
    for node in graph.nodes() {
        push_line(out, node.name());
    }
    push_line(out, NODE_DEF_END);

    let mut edges = 0usize;
    push_line(out, RELATION_DEF);
    for edge in graph.edges() {
        push_fields(out, &[edge.from, edge.label, edge.to]);
        edges += 1;
    }
    push_line(out, RELATION_DEF_END);

    if graph.nodes().any(|n| n.property_count() > 0) {
        push_line(out, PROPERTY_DEF);
        for node in graph.nodes() {
            for property in node.properties() {
                push_fields(out, &[node.name(), property]);
            }
        }
        push_line(out, PROPERTY_DEF_END);
    }

    debug!(
        graph = graph.name(),
        nodes = graph.node_count(),
        edges,
        "encoded graph"
    );
    Ok(())
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn push_fields(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(FIELD_SEPARATOR);
        }
        out.push_str(field);
    }
    out.push('\n');
}

fn check_encodable(graph: &Graph) -> CodecResult<()> {
    check_value("graph name", graph.name(), false)?;

    for node in graph.nodes() {
        check_value("node name", node.name(), true)?;
        for property in node.properties() {
            check_value("property", property, true)?;
        }
        for label in node.relations().labels() {
            check_value("relation label", label.as_str(), true)?;
        }
    }
    Ok(())
}

/// Graph names sit alone on their line, so only fields need the separator check
fn check_value(kind: &str, value: &str, is_field: bool) -> CodecResult<()> {
    let problem = if value.trim().is_empty() {
        Some("is blank")
    } else if value.contains(['\n', '\r']) {
        Some("contains a line break")
    } else if is_field && value.contains(FIELD_SEPARATOR) {
        Some("contains a comma")
    } else if is_marker(value) {
        Some("is a section marker")
    } else {
        None
    };

    match problem {
        Some(problem) => Err(CodecError::Unencodable(format!(
            "{} '{}': {}",
            kind,
            value.escape_debug(),
            problem
        ))),
        None => Ok(()),
    }
}
