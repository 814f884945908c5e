//! Text -> graphs

use super::{
    is_marker, CodecError, CodecResult, FIELD_SEPARATOR, GRAPH_DEF, GRAPH_DEF_END,
    NODE_DEF, NODE_DEF_END, PROPERTY_DEF, PROPERTY_DEF_END, RELATION_DEF, RELATION_DEF_END,
};
use crate::graph::Graph;
use tracing::debug;

/// Parse every graph block in `text`, in file order
///
/// Blank lines between blocks are ignored. Any structural problem aborts the
/// whole decode; no partially built graph is returned.
pub fn decode(text: &str) -> CodecResult<Vec<Graph>> {
    let mut reader = LineReader::new(text);
    let mut graphs = Vec::new();

    loop {
        reader.skip_blank();
        if reader.is_at_end() {
            break;
        }
        let graph = read_block(&mut reader)?;
        debug!(
            graph = graph.name(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "decoded graph block"
        );
        graphs.push(graph);
    }

    Ok(graphs)
}

fn read_block(reader: &mut LineReader<'_>) -> CodecResult<Graph> {
    let header = reader.section(GRAPH_DEF, GRAPH_DEF_END)?;
    let name = match header.as_slice() {
        [(_, name)] => *name,
        [] => {
            return Err(CodecError::format(
                reader.current_line(),
                "graph block has no name",
            ))
        }
        [_, (line, _), ..] => {
            return Err(CodecError::format(
                *line,
                "graph block declares more than one name",
            ))
        }
    };
    let mut graph = Graph::new(name);

    for (line_no, line) in reader.section(NODE_DEF, NODE_DEF_END)? {
        graph
            .ensure_node(line)
            .map_err(|e| CodecError::format(line_no, e.to_string()))?;
    }

    for (line_no, line) in reader.section(RELATION_DEF, RELATION_DEF_END)? {
        let [from, relation, to] = split_fields::<3>(line_no, line)?;
        for endpoint in [from, to] {
            if !graph.contains_node(endpoint) {
                return Err(CodecError::format(
                    line_no,
                    format!(
                        "relation '{}' references undeclared node '{}'",
                        line, endpoint
                    ),
                ));
            }
        }
        graph
            .add_relation(from, to, relation)
            .map_err(|e| CodecError::format(line_no, e.to_string()))?;
    }

    reader.skip_blank();
    if reader.peek_is(PROPERTY_DEF) {
        for (line_no, line) in reader.section(PROPERTY_DEF, PROPERTY_DEF_END)? {
            let [node, property] = split_fields::<2>(line_no, line)?;
            if !graph.contains_node(node) {
                return Err(CodecError::format(
                    line_no,
                    format!("property '{}' references undeclared node '{}'", line, node),
                ));
            }
            graph
                .add_property(node, property)
                .map_err(|e| CodecError::format(line_no, e.to_string()))?;
        }
    }

    Ok(graph)
}

/// Split a line into exactly `N` non-blank fields
fn split_fields<const N: usize>(line_no: usize, line: &str) -> CodecResult<[&str; N]> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    let fields: [&str; N] = fields.try_into().map_err(|fields: Vec<&str>| {
        CodecError::format(
            line_no,
            format!(
                "expected {} comma-separated fields in '{}', found {}",
                N,
                line,
                fields.len()
            ),
        )
    })?;

    if let Some(pos) = fields.iter().position(|f| f.trim().is_empty()) {
        return Err(CodecError::format(
            line_no,
            format!("field {} of '{}' is blank", pos + 1, line),
        ));
    }
    Ok(fields)
}

/// Cursor over input lines with 1-based line numbers
struct LineReader<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineReader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// Number of the most recently consumed line
    fn current_line(&self) -> usize {
        self.pos.max(1)
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let line = *self.lines.get(self.pos)?;
        self.pos += 1;
        Some((self.pos, line))
    }

    fn peek_is(&self, marker: &str) -> bool {
        self.lines
            .get(self.pos)
            .map(|line| line.trim() == marker)
            .unwrap_or(false)
    }

    fn skip_blank(&mut self) {
        while self
            .lines
            .get(self.pos)
            .map(|line| line.trim().is_empty())
            .unwrap_or(false)
        {
            self.pos += 1;
        }
    }

    fn expect_marker(&mut self, marker: &str) -> CodecResult<()> {
        match self.next_line() {
            Some((_, line)) if line.trim() == marker => Ok(()),
            Some((line_no, line)) => Err(CodecError::format(
                line_no,
                format!("expected {}, found '{}'", marker, line),
            )),
            None => Err(CodecError::format(
                self.current_line(),
                format!("expected {}, found end of input", marker),
            )),
        }
    }

    /// Read the body between `opening` and `closing`
    ///
    /// Bodies may not contain blank lines or other section markers. Any other
    /// line, including one starting with `#`, is data.
    fn section(&mut self, opening: &str, closing: &str) -> CodecResult<Vec<(usize, &'a str)>> {
        self.expect_marker(opening)?;
        let opened_at = self.pos;
        let mut body = Vec::new();

        loop {
            match self.next_line() {
                None => {
                    return Err(CodecError::format(
                        opened_at,
                        format!("unterminated {} section, missing {}", opening, closing),
                    ))
                }
                Some((_, line)) if line.trim() == closing => return Ok(body),
                Some((line_no, line)) if is_marker(line) => {
                    return Err(CodecError::format(
                        line_no,
                        format!("unexpected '{}' inside {} section", line.trim(), opening),
                    ))
                }
                Some((line_no, line)) if line.trim().is_empty() => {
                    return Err(CodecError::format(
                        line_no,
                        format!("blank line inside {} section", opening),
                    ))
                }
                Some(entry) => body.push(entry),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE: &str = "\
#GraphDef
People
#GraphDefEnd
#NodeDef
Dave
Bob
Charlie
#NodeDefEnd
#RelationDef
Dave,Knows,Bob
Bob,Knows,Charlie
Dave,Knows,Bob
#RelationDefEnd
";

    fn format_line(err: CodecError) -> usize {
        match err {
            CodecError::Format { line, .. } => line,
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_single_block() {
        let graphs = decode(PEOPLE).unwrap();
        assert_eq!(graphs.len(), 1);

        let graph = &graphs[0];
        assert_eq!(graph.name(), "People");
        assert_eq!(graph.node_names(), vec!["Dave", "Bob", "Charlie"]);
        assert_eq!(graph.related_nodes("Dave", "Knows").unwrap(), vec!["Bob", "Bob"]);
        assert_eq!(graph.related_nodes("Bob", "Knows").unwrap(), vec!["Charlie"]);
        graph.check_invariants().unwrap();
    }

    #[test]
    fn test_decode_multiple_blocks_with_blank_lines() {
        let text = format!("\n{}\n\n{}", PEOPLE, PEOPLE.replace("People", "Others"));
        let graphs = decode(&text).unwrap();
        let names: Vec<_> = graphs.iter().map(Graph::name).collect();
        assert_eq!(names, vec!["People", "Others"]);
    }

    #[test]
    fn test_decode_empty_input() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("\n  \n").unwrap().is_empty());
    }

    #[test]
    fn test_decode_crlf() {
        let graphs = decode(&PEOPLE.replace('\n', "\r\n")).unwrap();
        assert_eq!(graphs[0].node_names(), vec!["Dave", "Bob", "Charlie"]);
    }

    #[test]
    fn test_decode_property_section() {
        let text = format!(
            "{}#PropertyDef\nDave,Smart\nDave,Blue\nBob,Smart\n#PropertyDefEnd\n",
            PEOPLE
        );
        let graphs = decode(&text).unwrap();
        let graph = &graphs[0];
        assert_eq!(graph.properties_of("Dave").unwrap(), vec!["Smart", "Blue"]);
        assert_eq!(graph.nodes_with_properties(&["Smart", "Blue"]), vec!["Dave"]);
    }

    #[test]
    fn test_undeclared_node_in_relation() {
        let text = PEOPLE.replace("Bob,Knows,Charlie", "Bob,Knows,Eve");
        let err = decode(&text).unwrap_err();
        assert!(err.to_string().contains("undeclared node 'Eve'"));
        assert_eq!(format_line(err), 11);
    }

    #[test]
    fn test_undeclared_node_in_property() {
        let text = format!("{}#PropertyDef\nEve,Smart\n#PropertyDefEnd\n", PEOPLE);
        let err = decode(&text).unwrap_err();
        assert_eq!(format_line(err), 15);
    }

    #[test]
    fn test_wrong_field_count() {
        let text = PEOPLE.replace("Bob,Knows,Charlie", "Bob,Knows");
        assert_eq!(format_line(decode(&text).unwrap_err()), 11);

        let text = PEOPLE.replace("Bob,Knows,Charlie", "Bob,Knows,Charlie,Dave");
        assert_eq!(format_line(decode(&text).unwrap_err()), 11);
    }

    #[test]
    fn test_blank_field() {
        let text = PEOPLE.replace("Bob,Knows,Charlie", "Bob,,Charlie");
        let err = decode(&text).unwrap_err();
        assert!(err.to_string().contains("field 2"));
    }

    #[test]
    fn test_missing_section() {
        let text = PEOPLE.replace("#NodeDef\nDave\nBob\nCharlie\n#NodeDefEnd\n", "");
        let err = decode(&text).unwrap_err();
        assert!(err.to_string().contains("expected #NodeDef"));
    }

    #[test]
    fn test_unterminated_section() {
        let text = PEOPLE.replace("#RelationDefEnd\n", "");
        let err = decode(&text).unwrap_err();
        assert!(err.to_string().contains("unterminated #RelationDef"));
        assert_eq!(format_line(err), 9);
    }

    #[test]
    fn test_marker_inside_section() {
        let text = PEOPLE.replace("#NodeDefEnd\n", "");
        let err = decode(&text).unwrap_err();
        assert!(err.to_string().contains("unexpected '#RelationDef'"));
    }

    #[test]
    fn test_hash_prefixed_names_are_data() {
        let text = "\
#GraphDef
#channels
#GraphDefEnd
#NodeDef
#general
Dave
#NodeDefEnd
#RelationDef
#general,#Member,Dave
#RelationDefEnd
#PropertyDef
Dave,#admin
#PropertyDefEnd
";
        let graphs = decode(text).unwrap();
        let graph = &graphs[0];
        assert_eq!(graph.name(), "#channels");
        assert_eq!(graph.node_names(), vec!["#general", "Dave"]);
        assert_eq!(graph.related_nodes("#general", "#Member").unwrap(), vec!["Dave"]);
        assert_eq!(graph.properties_of("Dave").unwrap(), vec!["#admin"]);
    }

    #[test]
    fn test_blank_line_inside_section() {
        let text = PEOPLE.replace("Dave\nBob\n", "Dave\n\nBob\n");
        let err = decode(&text).unwrap_err();
        assert_eq!(format_line(err), 6);
    }

    #[test]
    fn test_graph_header_must_hold_one_name() {
        let text = PEOPLE.replace("People\n", "");
        assert!(decode(&text).unwrap_err().to_string().contains("no name"));

        let text = PEOPLE.replace("People\n", "People\nAgain\n");
        assert_eq!(format_line(decode(&text).unwrap_err()), 3);
    }

    #[test]
    fn test_stray_text_between_blocks() {
        let text = format!("{}garbage\n{}", PEOPLE, PEOPLE);
        let err = decode(&text).unwrap_err();
        assert!(err.to_string().contains("expected #GraphDef"));
        assert_eq!(format_line(err), 14);
    }

    #[test]
    fn test_duplicate_node_declaration_is_idempotent() {
        let text = PEOPLE.replace("Charlie\n#NodeDefEnd", "Charlie\nDave\n#NodeDefEnd");
        let graphs = decode(&text).unwrap();
        assert_eq!(graphs[0].node_count(), 3);
    }
}
