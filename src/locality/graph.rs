use std::collections::HashMap;
use std::fmt::Write as _;

use petgraph::graph::NodeIndex;
use petgraph::Directed;

type Node = String;
type Edge = ();
pub type Graph = petgraph::Graph<Node, Edge, Directed>;

/// Synthetic sink node labels for the module-level locality graph's output format.
pub const GLOBAL_OBJECTS_SINK: &str = "Global objects";
pub const UNEVALUATED_ARGUMENT_SINK: &str = "Unevaluated argument (ERROR)";

pub fn unknown_locality_sink(reason: &str) -> String {
    format!("Unknown locality (INACCURACY, {reason})")
}

/// The module-level locality graph C3 produces: a directed graph of function names (plus
/// synthetic sinks) built up edge by edge as the tracer walks the call graph.
#[derive(Debug, Default)]
pub struct LocalityGraph {
    graph: Graph,
    node_ids: HashMap<String, NodeIndex>,
}

impl LocalityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, label: &str) -> NodeIndex {
        if let Some(&ix) = self.node_ids.get(label) {
            return ix;
        }
        let ix = self.graph.add_node(label.to_owned());
        self.node_ids.insert(label.to_owned(), ix);
        ix
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        let from_ix = self.node(from);
        let to_ix = self.node(to);
        if !self.graph.contains_edge(from_ix, to_ix) {
            self.graph.add_edge(from_ix, to_ix, ());
        }
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_ids.get(from), self.node_ids.get(to)) {
            (Some(&f), Some(&t)) => self.graph.contains_edge(f, t),
            _ => false,
        }
    }

    /// Emits the exact output shape: `digraph Locality { "u" -> "v"; ... }`.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        write!(out, "digraph Locality {{ ").unwrap();
        let mut edges: Vec<(String, String)> = self
            .graph
            .edge_indices()
            .filter_map(|e| {
                let (a, b) = self.graph.edge_endpoints(e)?;
                Some((self.graph[a].clone(), self.graph[b].clone()))
            })
            .collect();
        edges.sort();
        for (from, to) in edges {
            write!(out, "\"{from}\" -> \"{to}\"; ").unwrap();
        }
        write!(out, "}}").unwrap();
        out
    }
}
