//! Node in the semantic graph.

use serde::{Deserialize, Serialize};
use super::Literal;

/// Arena index of a node inside its [`Graph`](super::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a node stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// A predicate or entity concept, e.g. `want-01`.
    Concept(String),
    /// A constant leaf attached through an attribute relation.
    Constant(Literal),
}

/// A node in the semantic graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Penman variable for concepts; record identifier for constants
    /// (never printed in Penman).
    pub name: Option<String>,
    pub kind: NodeKind,
}

impl Node {
    pub fn concept(id: NodeId, concept: impl Into<String>) -> Self {
        Self { id, name: None, kind: NodeKind::Concept(concept.into()) }
    }

    pub fn constant(id: NodeId, value: Literal) -> Self {
        Self { id, name: None, kind: NodeKind::Constant(value) }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_concept(&self) -> bool {
        matches!(self.kind, NodeKind::Concept(_))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, NodeKind::Constant(_))
    }

    /// The concept label or the printed constant.
    pub fn label(&self) -> String {
        match &self.kind {
            NodeKind::Concept(c) => c.clone(),
            NodeKind::Constant(v) => v.to_text(),
        }
    }

    pub fn concept_label(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Concept(c) => Some(c),
            NodeKind::Constant(_) => None,
        }
    }
}
