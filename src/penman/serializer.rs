//! Penman serializer: prints a [`Graph`] as Penman text.
//!
//! Traversal is depth-first from each root, following edges in insertion
//! order. The first visit of a concept introduces it; every later visit
//! prints the bare variable.

use serde::{Deserialize, Serialize};

use super::naming::{VariableNamer, VariablePolicy};
use crate::model::{Graph, NodeId, NodeKind};

/// Whitespace layout of printed graphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Relations line up under the `/` of their node, nested by role width.
    #[default]
    Aligned,
    /// Fixed number of spaces per nesting level.
    Indented(usize),
    /// One line per graph.
    Compact,
}

/// Options for [`serialize`](super::serialize).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializeOptions {
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub variables: VariablePolicy,
}

/// Printed text plus the variable chosen for every concept.
#[derive(Debug, Clone)]
pub struct Printed {
    pub text: String,
    /// Indexed by `NodeId`; `None` for constants.
    pub names: Vec<Option<String>>,
}

/// Tree-shaped view of the graph: one `Tree` per introduced concept.
struct Tree {
    node: NodeId,
    branches: Vec<(String, Branch)>,
}

enum Branch {
    Tree(Tree),
    Reference(NodeId),
    Constant(NodeId),
}

/// Print `graph` with variables from `namer`.
pub fn print(graph: &Graph, layout: Layout, namer: &mut VariableNamer) -> Printed {
    let mut visited = vec![false; graph.len()];
    let mut discovery = Vec::with_capacity(graph.len());
    let mut trees = Vec::new();

    for root in graph.roots() {
        if !visited[root.index()] {
            trees.push(plan(graph, root, &mut visited, &mut discovery));
        }
    }
    // Concepts only reachable through a cycle get their own tree.
    while let Some(node) = graph.nodes().iter().find(|n| n.is_concept() && !visited[n.id.index()]) {
        trees.push(plan(graph, node.id, &mut visited, &mut discovery));
    }

    let names = namer.assign(graph, &discovery);
    let mut text = String::new();
    for (i, tree) in trees.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        render(graph, &names, tree, layout, 0, 0, &mut text);
    }
    Printed { text, names }
}

fn plan(graph: &Graph, node: NodeId, visited: &mut [bool], discovery: &mut Vec<NodeId>) -> Tree {
    visited[node.index()] = true;
    discovery.push(node);

    let mut branches = Vec::new();
    for edge in graph.outgoing(node) {
        let child = edge.child;
        let branch = match graph.node(child).map(|n| &n.kind) {
            Some(NodeKind::Constant(_)) => Branch::Constant(child),
            _ if visited[child.index()] => Branch::Reference(child),
            _ => Branch::Tree(plan(graph, child, visited, discovery)),
        };
        branches.push((edge.role.printed(), branch));
    }
    Tree { node, branches }
}

/// `column` is where the tree's `(` sits under the aligned layout.
fn render(
    graph: &Graph,
    names: &[Option<String>],
    tree: &Tree,
    layout: Layout,
    depth: usize,
    column: usize,
    out: &mut String,
) {
    let var = var_name(names, tree.node);
    let concept = graph.node(tree.node).map(|n| n.label()).unwrap_or_default();
    out.push('(');
    out.push_str(var);
    out.push_str(" / ");
    out.push_str(&concept);

    let child_column = column + var.chars().count() + 2;
    for (role, branch) in &tree.branches {
        let indent = match layout {
            Layout::Aligned => {
                out.push('\n');
                child_column
            }
            Layout::Indented(width) => {
                out.push('\n');
                (depth + 1) * width
            }
            Layout::Compact => {
                out.push(' ');
                0
            }
        };
        out.extend(std::iter::repeat_n(' ', indent));
        out.push(':');
        out.push_str(role);
        out.push(' ');
        match branch {
            Branch::Tree(sub) => {
                let sub_column = indent + role.chars().count() + 2;
                render(graph, names, sub, layout, depth + 1, sub_column, out);
            }
            Branch::Reference(id) => out.push_str(var_name(names, *id)),
            Branch::Constant(id) => {
                let value = graph.node(*id).map(|n| n.label()).unwrap_or_default();
                out.push_str(&value);
            }
        }
    }
    out.push(')');
}

fn var_name(names: &[Option<String>], id: NodeId) -> &str {
    names.get(id.index()).and_then(|n| n.as_deref()).unwrap_or("_")
}
