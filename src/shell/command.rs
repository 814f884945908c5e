//! Command grammar and dispatch
//!
//! Verbs and keywords are case-insensitive; names are not. Lists are
//! comma-separated with no spaces.

use super::{CommandOutput, ShellError, ShellResult};
use crate::collection::GraphCollection;
use std::path::PathBuf;
use tracing::debug;

/// Usage line for every command, in HELP order
pub const USAGE: &[&str] = &[
    "CREATE <graph> [<graph> ...]",
    "ADD <node> TO <graph>",
    "GIVE <nodes> PROPERTIES <properties> IN <graph>",
    "RELATE <from> TO <to> AS <relation> IN <graph>",
    "RELATEBOTH <a> TO <b> AS <relation> IN <graph>",
    "REMOVE <nodes> FROM <graph>",
    "REMOVE WITH <properties> FROM <graph>",
    "GET NODES WITH <properties> IN <graph>",
    "RELATED <node> BY <relation> IN <graph>",
    "PROPERTIES <node> IN <graph>",
    "LIST <graph>",
    "SHOW <graph>",
    "GRAPHS",
    "DROP <graph>",
    "LOAD <path>",
    "SAVE <graph> TO <path>",
    "HELP",
];

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create {
        graphs: Vec<String>,
    },
    Add {
        node: String,
        graph: String,
    },
    Give {
        nodes: Vec<String>,
        properties: Vec<String>,
        graph: String,
    },
    Relate {
        from: String,
        to: String,
        relation: String,
        graph: String,
        bidirectional: bool,
    },
    Remove {
        nodes: Vec<String>,
        graph: String,
    },
    RemoveWith {
        properties: Vec<String>,
        graph: String,
    },
    NodesWith {
        properties: Vec<String>,
        graph: String,
    },
    Related {
        node: String,
        relation: String,
        graph: String,
    },
    Properties {
        node: String,
        graph: String,
    },
    List {
        graph: String,
    },
    Show {
        graph: String,
    },
    Graphs,
    Drop {
        graph: String,
    },
    Load {
        path: PathBuf,
    },
    Save {
        graph: String,
        path: PathBuf,
    },
    Help,
}

impl Command {
    /// Parse one input line; `None` for a blank line
    pub fn parse(line: &str) -> ShellResult<Option<Command>> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some(verb) = words.first() else {
            return Ok(None);
        };
        let verb = verb.to_uppercase();

        let command = match verb.as_str() {
            "CREATE" => {
                let mut args = Args::new(line, &words, USAGE[0]);
                let graphs = args.rest_words()?;
                Command::Create { graphs }
            }
            "ADD" => {
                let mut args = Args::new(line, &words, USAGE[1]);
                let node = args.word()?;
                args.keyword("TO")?;
                let graph = args.word()?;
                args.finish()?;
                Command::Add { node, graph }
            }
            "GIVE" => {
                let mut args = Args::new(line, &words, USAGE[2]);
                let nodes = args.list()?;
                args.keyword("PROPERTIES")?;
                let properties = args.list()?;
                args.keyword("IN")?;
                let graph = args.word()?;
                args.finish()?;
                Command::Give {
                    nodes,
                    properties,
                    graph,
                }
            }
            "RELATE" | "RELATEBOTH" => {
                let bidirectional = verb == "RELATEBOTH";
                let usage = if bidirectional { USAGE[4] } else { USAGE[3] };
                let mut args = Args::new(line, &words, usage);
                let from = args.word()?;
                args.keyword("TO")?;
                let to = args.word()?;
                args.keyword("AS")?;
                let relation = args.word()?;
                args.keyword("IN")?;
                let graph = args.word()?;
                args.finish()?;
                Command::Relate {
                    from,
                    to,
                    relation,
                    graph,
                    bidirectional,
                }
            }
            // REMOVE WITH p FROM g has five words, REMOVE n FROM g four, so a
            // node literally called WITH still parses as a node list
            "REMOVE" if words.len() == 5 && words[1].eq_ignore_ascii_case("WITH") => {
                let mut args = Args::new(line, &words, USAGE[6]);
                args.keyword("WITH")?;
                let properties = args.list()?;
                args.keyword("FROM")?;
                let graph = args.word()?;
                args.finish()?;
                Command::RemoveWith { properties, graph }
            }
            "REMOVE" => {
                let mut args = Args::new(line, &words, USAGE[5]);
                let nodes = args.list()?;
                args.keyword("FROM")?;
                let graph = args.word()?;
                args.finish()?;
                Command::Remove { nodes, graph }
            }
            "GET" => {
                let mut args = Args::new(line, &words, USAGE[7]);
                args.keyword("NODES")?;
                args.keyword("WITH")?;
                let properties = args.list()?;
                args.keyword("IN")?;
                let graph = args.word()?;
                args.finish()?;
                Command::NodesWith { properties, graph }
            }
            "RELATED" => {
                let mut args = Args::new(line, &words, USAGE[8]);
                let node = args.word()?;
                args.keyword("BY")?;
                let relation = args.word()?;
                args.keyword("IN")?;
                let graph = args.word()?;
                args.finish()?;
                Command::Related {
                    node,
                    relation,
                    graph,
                }
            }
            "PROPERTIES" => {
                let mut args = Args::new(line, &words, USAGE[9]);
                let node = args.word()?;
                args.keyword("IN")?;
                let graph = args.word()?;
                args.finish()?;
                Command::Properties { node, graph }
            }
            "LIST" => Command::List {
                graph: Args::single(line, &words, USAGE[10])?,
            },
            "SHOW" => Command::Show {
                graph: Args::single(line, &words, USAGE[11])?,
            },
            "GRAPHS" => {
                Args::new(line, &words, USAGE[12]).finish()?;
                Command::Graphs
            }
            "DROP" => Command::Drop {
                graph: Args::single(line, &words, USAGE[13])?,
            },
            "LOAD" => {
                let mut args = Args::new(line, &words, USAGE[14]);
                Command::Load {
                    path: PathBuf::from(args.rest()?),
                }
            }
            "SAVE" => {
                let mut args = Args::new(line, &words, USAGE[15]);
                let graph = args.word()?;
                args.keyword("TO")?;
                Command::Save {
                    graph,
                    path: PathBuf::from(args.rest()?),
                }
            }
            "HELP" => {
                Args::new(line, &words, USAGE[16]).finish()?;
                Command::Help
            }
            _ => return Err(ShellError::UnknownCommand(words[0].to_string())),
        };

        debug!(?command, "parsed command");
        Ok(Some(command))
    }

    /// Upper-case verb, for messages
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Create { .. } => "CREATE",
            Command::Add { .. } => "ADD",
            Command::Give { .. } => "GIVE",
            Command::Relate {
                bidirectional: false,
                ..
            } => "RELATE",
            Command::Relate {
                bidirectional: true,
                ..
            } => "RELATEBOTH",
            Command::Remove { .. } | Command::RemoveWith { .. } => "REMOVE",
            Command::NodesWith { .. } => "GET",
            Command::Related { .. } => "RELATED",
            Command::Properties { .. } => "PROPERTIES",
            Command::List { .. } => "LIST",
            Command::Show { .. } => "SHOW",
            Command::Graphs => "GRAPHS",
            Command::Drop { .. } => "DROP",
            Command::Load { .. } => "LOAD",
            Command::Save { .. } => "SAVE",
            Command::Help => "HELP",
        }
    }

    /// Whether the command changes the collection
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Create { .. }
                | Command::Add { .. }
                | Command::Give { .. }
                | Command::Relate { .. }
                | Command::Remove { .. }
                | Command::RemoveWith { .. }
                | Command::Drop { .. }
                | Command::Load { .. }
        )
    }

    /// Run any command
    pub fn execute(&self, collection: &mut GraphCollection) -> ShellResult<CommandOutput> {
        match self {
            Command::Create { graphs } => {
                for name in graphs {
                    collection.create_graph(name)?;
                }
                Ok(CommandOutput::message(format!(
                    "Created graph(s): {}",
                    graphs.join(", ")
                )))
            }
            Command::Add { node, graph } => {
                collection.graph_mut(graph)?.ensure_node(node)?;
                Ok(CommandOutput::message(format!(
                    "Added node '{}' to '{}'",
                    node, graph
                )))
            }
            Command::Give {
                nodes,
                properties,
                graph,
            } => {
                collection
                    .graph_mut(graph)?
                    .add_properties_to_nodes(nodes, properties)?;
                Ok(CommandOutput::message(format!(
                    "Updated properties of {} node(s) in '{}'",
                    nodes.len(),
                    graph
                )))
            }
            Command::Relate {
                from,
                to,
                relation,
                graph,
                bidirectional,
            } => {
                let target = collection.graph_mut(graph)?;
                let arrow = if *bidirectional {
                    target.add_bidirectional_relation(from, to, relation)?;
                    "<-"
                } else {
                    target.add_relation(from, to, relation)?;
                    "-"
                };
                Ok(CommandOutput::message(format!(
                    "{} {}[{}]-> {}",
                    from, arrow, relation, to
                )))
            }
            Command::Remove { nodes, graph } => {
                let removed = collection.graph_mut(graph)?.remove_nodes(nodes)?;
                Ok(CommandOutput::message(format!(
                    "Removed {} node(s) from '{}'",
                    removed, graph
                )))
            }
            Command::RemoveWith { properties, graph } => {
                let target = collection.graph_mut(graph)?;
                let removed = match properties.as_slice() {
                    [property] => target.remove_nodes_with_property(property),
                    _ => target.remove_nodes_with_properties(properties),
                };
                Ok(CommandOutput::rows("removed", removed))
            }
            Command::Drop { graph } => {
                collection.remove_graph(graph)?;
                Ok(CommandOutput::message(format!("Dropped graph '{}'", graph)))
            }
            Command::Load { path } => {
                let loaded = GraphCollection::from_file(path)?;
                let count = collection.merge(loaded);
                Ok(CommandOutput::message(format!(
                    "Loaded {} graph(s) from {}",
                    count,
                    path.display()
                )))
            }
            _ => self.query(collection),
        }
    }

    /// Run a read-only command
    pub fn query(&self, collection: &GraphCollection) -> ShellResult<CommandOutput> {
        match self {
            Command::NodesWith { properties, graph } => Ok(CommandOutput::rows(
                "node",
                collection.graph(graph)?.nodes_with_properties(properties),
            )),
            Command::Related {
                node,
                relation,
                graph,
            } => Ok(CommandOutput::rows(
                "node",
                collection.graph(graph)?.related_nodes(node, relation)?,
            )),
            Command::Properties { node, graph } => Ok(CommandOutput::rows(
                "property",
                collection.graph(graph)?.properties_of(node)?,
            )),
            Command::List { graph } => Ok(CommandOutput::rows(
                "node",
                collection.graph(graph)?.node_names(),
            )),
            Command::Show { graph } => Ok(CommandOutput::rows(
                "relation",
                collection.graph(graph)?.describe(),
            )),
            Command::Graphs => Ok(CommandOutput::rows("graph", collection.graph_names())),
            Command::Save { graph, path } => {
                GraphCollection::write_graph_to_file(collection.graph(graph)?, path)?;
                Ok(CommandOutput::message(format!(
                    "Saved graph '{}' to {}",
                    graph,
                    path.display()
                )))
            }
            Command::Help => Ok(CommandOutput::rows("command", USAGE.iter().copied())),
            _ => Err(ShellError::ReadOnly(self.verb().to_string())),
        }
    }
}

/// Cursor over the words following the verb
///
/// `words` is `line` split on whitespace.
struct Args<'a, 'w> {
    line: &'a str,
    words: &'w [&'a str],
    pos: usize,
    usage: &'static str,
}

impl<'a, 'w> Args<'a, 'w> {
    fn new(line: &'a str, words: &'w [&'a str], usage: &'static str) -> Self {
        Self {
            line,
            words,
            pos: 1,
            usage,
        }
    }

    /// Exactly one argument after the verb
    fn single(line: &'a str, words: &'w [&'a str], usage: &'static str) -> ShellResult<String> {
        let mut args = Self::new(line, words, usage);
        let word = args.word()?;
        args.finish()?;
        Ok(word)
    }

    fn usage(&self) -> ShellError {
        ShellError::Usage(self.usage.to_string())
    }

    fn word(&mut self) -> ShellResult<String> {
        let word = self.words.get(self.pos).ok_or_else(|| self.usage())?;
        self.pos += 1;
        Ok(word.to_string())
    }

    fn keyword(&mut self, keyword: &str) -> ShellResult<()> {
        match self.words.get(self.pos) {
            Some(word) if word.eq_ignore_ascii_case(keyword) => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.usage()),
        }
    }

    fn list(&mut self) -> ShellResult<Vec<String>> {
        let word = self.word()?;
        let items: Vec<String> = word.split(',').map(str::to_string).collect();
        if items.iter().any(|item| item.is_empty()) {
            return Err(self.usage());
        }
        Ok(items)
    }

    /// Every remaining word, at least one
    fn rest_words(&mut self) -> ShellResult<Vec<String>> {
        let rest = &self.words[self.pos.min(self.words.len())..];
        if rest.is_empty() {
            return Err(self.usage());
        }
        self.pos = self.words.len();
        Ok(rest.iter().map(|w| w.to_string()).collect())
    }

    /// The rest of the line as typed, inner whitespace intact
    fn rest(&mut self) -> ShellResult<String> {
        let mut rest = self.line;
        for _ in 0..self.pos {
            rest = rest.trim_start();
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            rest = &rest[end..];
        }

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(self.usage());
        }
        self.pos = self.words.len();
        Ok(rest.to_string())
    }

    fn finish(&self) -> ShellResult<()> {
        if self.pos < self.words.len() {
            return Err(self.usage());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    fn run(collection: &mut GraphCollection, line: &str) -> CommandOutput {
        parse(line).execute(collection).unwrap()
    }

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse(" \t ").unwrap(), None);
    }

    #[test]
    fn test_parse_is_case_insensitive_for_keywords() {
        assert_eq!(
            parse("relate Dave to Bob as Knows in People"),
            Command::Relate {
                from: "Dave".to_string(),
                to: "Bob".to_string(),
                relation: "Knows".to_string(),
                graph: "People".to_string(),
                bidirectional: false,
            }
        );
    }

    #[test]
    fn test_parse_lists() {
        assert_eq!(
            parse("GIVE Dave,Bob PROPERTIES Smart,Blue IN People"),
            Command::Give {
                nodes: vec!["Dave".to_string(), "Bob".to_string()],
                properties: vec!["Smart".to_string(), "Blue".to_string()],
                graph: "People".to_string(),
            }
        );
        assert!(matches!(
            Command::parse("GIVE Dave,,Bob PROPERTIES Smart IN People"),
            Err(ShellError::Usage(_))
        ));
    }

    #[test]
    fn test_parse_remove_forms() {
        assert_eq!(
            parse("REMOVE WITH Smart,Blue FROM People"),
            Command::RemoveWith {
                properties: vec!["Smart".to_string(), "Blue".to_string()],
                graph: "People".to_string(),
            }
        );
        assert_eq!(
            parse("REMOVE WITH FROM People"),
            Command::Remove {
                nodes: vec!["WITH".to_string()],
                graph: "People".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_paths_keep_spaces() {
        assert_eq!(
            parse("SAVE People TO my graphs.txt"),
            Command::Save {
                graph: "People".to_string(),
                path: PathBuf::from("my graphs.txt"),
            }
        );
        assert_eq!(
            parse("LOAD a  b.txt"),
            Command::Load {
                path: PathBuf::from("a  b.txt"),
            }
        );
        assert_eq!(
            parse("  save People\tto  /tmp/two  spaces\t.txt  "),
            Command::Save {
                graph: "People".to_string(),
                path: PathBuf::from("/tmp/two  spaces\t.txt"),
            }
        );
        assert!(matches!(Command::parse("LOAD   "), Err(ShellError::Usage(_))));
        assert!(matches!(Command::parse("SAVE People TO  "), Err(ShellError::Usage(_))));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Command::parse("FROBNICATE x"),
            Err(ShellError::UnknownCommand(verb)) if verb == "FROBNICATE"
        ));
        assert!(matches!(Command::parse("ADD Dave People"), Err(ShellError::Usage(_))));
        assert!(matches!(Command::parse("LIST"), Err(ShellError::Usage(_))));
        assert!(matches!(Command::parse("LIST a b"), Err(ShellError::Usage(_))));
        assert!(matches!(Command::parse("CREATE"), Err(ShellError::Usage(_))));
        assert!(matches!(Command::parse("GRAPHS now"), Err(ShellError::Usage(_))));
    }

    #[test]
    fn test_mutations_need_a_graph() {
        let mut collection = GraphCollection::new();
        let err = parse("ADD Dave TO People").execute(&mut collection).unwrap_err();
        assert!(matches!(
            err,
            ShellError::Graph(crate::graph::GraphError::GraphNotFound(_))
        ));
    }

    #[test]
    fn test_people_session() {
        let mut collection = GraphCollection::new();
        run(&mut collection, "CREATE People Places");
        run(&mut collection, "ADD Charlie TO People");
        run(&mut collection, "GIVE Dave,Bob PROPERTIES Smart IN People");
        run(&mut collection, "GIVE Dave PROPERTIES Blue IN People");
        run(&mut collection, "RELATE Dave TO Bob AS Knows IN People");
        run(&mut collection, "RELATEBOTH Bob TO Charlie AS Likes IN People");

        assert_eq!(
            run(&mut collection, "GRAPHS").lines(),
            vec!["People", "Places"]
        );
        assert_eq!(
            run(&mut collection, "LIST People").lines(),
            vec!["Charlie", "Dave", "Bob"]
        );
        assert_eq!(
            run(&mut collection, "GET NODES WITH Smart,Blue IN People").lines(),
            vec!["Dave"]
        );
        assert_eq!(
            run(&mut collection, "RELATED Charlie BY Likes IN People").lines(),
            vec!["Bob"]
        );
        assert_eq!(
            run(&mut collection, "PROPERTIES Dave IN People").lines(),
            vec!["Smart", "Blue"]
        );
        assert_eq!(
            run(&mut collection, "SHOW People").lines(),
            vec![
                "Charlie -[Likes]-> Bob",
                "Dave -[Knows]-> Bob",
                "Bob -[Likes]-> Charlie",
            ]
        );

        assert_eq!(
            run(&mut collection, "REMOVE WITH Smart FROM People").lines(),
            vec!["Dave", "Bob"]
        );
        assert_eq!(run(&mut collection, "LIST People").lines(), vec!["Charlie"]);
        assert!(run(&mut collection, "SHOW People").lines().is_empty());

        run(&mut collection, "DROP Places");
        assert_eq!(run(&mut collection, "GRAPHS").lines(), vec!["People"]);
    }

    #[test]
    fn test_remove_nodes_command() {
        let mut collection = GraphCollection::new();
        run(&mut collection, "CREATE G");
        run(&mut collection, "RELATE a TO b AS r IN G");
        run(&mut collection, "ADD c TO G");

        assert!(parse("REMOVE a,ghost FROM G").execute(&mut collection).is_err());
        assert_eq!(
            run(&mut collection, "REMOVE a,c FROM G"),
            CommandOutput::message("Removed 2 node(s) from 'G'")
        );
        assert_eq!(run(&mut collection, "LIST G").lines(), vec!["b"]);
    }

    #[test]
    fn test_query_rejects_mutations() {
        let collection = GraphCollection::new();
        let err = parse("CREATE G").query(&collection).unwrap_err();
        assert!(matches!(err, ShellError::ReadOnly(verb) if verb == "CREATE"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.txt");

        let mut collection = GraphCollection::new();
        run(&mut collection, "CREATE People");
        run(&mut collection, "RELATE Dave TO Bob AS Knows IN People");
        run(
            &mut collection,
            &format!("SAVE People TO {}", path.display()),
        );

        let mut fresh = GraphCollection::new();
        run(&mut fresh, &format!("LOAD {}", path.display()));
        assert_eq!(
            run(&mut fresh, "RELATED Dave BY Knows IN People").lines(),
            vec!["Bob"]
        );
    }

    #[test]
    fn test_help_lists_every_command() {
        let mut collection = GraphCollection::new();
        assert_eq!(run(&mut collection, "help").lines().len(), USAGE.len());
    }
}
