//! Nesting graph: which schemas hold which domain objects
//!
//! Edges run from the outer schema to the nested type and are labelled with
//! the field and its kind. Exported as DOT by the CLI.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use super::bind::BoundSchema;
use crate::schema::DomainKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestingEdge {
    pub field: String,
    pub kind: DomainKind,
}

impl NestingEdge {
    fn label(&self) -> String {
        match self.kind {
            DomainKind::List => format!("{} [list]", self.field),
            _ => self.field.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct NestingGraph {
    graph: DiGraph<String, NestingEdge>,
    nodes: HashMap<String, NodeIndex>,
}

impl NestingGraph {
    pub fn build(schemas: &[BoundSchema]) -> Self {
        let mut this = Self::default();

        for bound in schemas {
            this.node(&bound.schema.name);
        }

        for bound in schemas {
            let source = this.node(&bound.schema.name);
            for field in bound.schema.domain_fields() {
                let target = this.node(&field.domain_type().path);
                this.graph.add_edge(
                    source,
                    target,
                    NestingEdge {
                        field: field.name.clone(),
                        kind: field.kind,
                    },
                );
            }
        }

        this
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.nodes.insert(name.to_string(), idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Types nested directly inside `schema`
    pub fn dependencies(&self, schema: &str) -> Vec<(&str, &NestingEdge)> {
        self.neighbors(schema, Direction::Outgoing)
    }

    /// Schemas that directly nest `ty`
    pub fn dependents(&self, ty: &str) -> Vec<(&str, &NestingEdge)> {
        self.neighbors(ty, Direction::Incoming)
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<(&str, &NestingEdge)> {
        let Some(&idx) = self.nodes.get(name) else {
            return Vec::new();
        };
        let mut out: Vec<_> = self
            .graph
            .edges_directed(idx, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (self.graph[other].as_str(), edge.weight())
            })
            .collect();
        out.sort_by(|a, b| a.1.field.cmp(&b.1.field).then(a.0.cmp(b.0)));
        out
    }

    /// Export as DOT format for Graphviz
    pub fn to_dot(&self) -> String {
        let mut output = String::new();

        output.push_str("digraph DomainNesting {\n");
        output.push_str("  rankdir=LR;\n");
        output.push_str("  node [shape=box, style=\"rounded\", fontname=\"Helvetica\", fontsize=10];\n");
        output.push_str("  edge [fontname=\"Helvetica\", fontsize=8];\n");
        output.push('\n');

        let mut names: Vec<&String> = self.nodes.keys().collect();
        names.sort();
        for name in names {
            let label = name.rsplit("::").next().unwrap_or(name);
            output.push_str(&format!("  \"{}\" [label=\"{}\"];\n", name, label));
        }

        output.push('\n');

        let mut edges: Vec<(String, String, String)> = self
            .graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()].clone(),
                    self.graph[edge.target()].clone(),
                    edge.weight().label(),
                )
            })
            .collect();
        edges.sort();
        for (source, target, label) in edges {
            output.push_str(&format!("  \"{}\" -> \"{}\" [label=\"{}\"];\n", source, target, label));
        }

        output.push_str("}\n");
        output
    }
}
