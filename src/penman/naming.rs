//! Variable assignment for printed graphs.
//!
//! A [`VariableNamer`] is a resource table owned by the caller. It
//! remembers which names are taken so that names stay unique across
//! everything it has named.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::model::{Graph, Literal, NodeId, NodeKind};

/// How concept variables are chosen when printing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariablePolicy {
    /// Keep existing names; generate `Initial` names for the rest.
    #[default]
    Preserve,
    /// First letter of the concept, then `b2`, `b3`, ... on collision.
    Initial,
    /// `c0`, `c1`, ... in discovery order.
    Sequential { prefix: String },
}

impl VariablePolicy {
    pub fn sequential(prefix: impl Into<String>) -> Self {
        VariablePolicy::Sequential { prefix: prefix.into() }
    }
}

/// Hands out Penman variables.
#[derive(Debug, Clone, Default)]
pub struct VariableNamer {
    policy: VariablePolicy,
    used: HashSet<String>,
    suffixes: HashMap<String, usize>,
    next_sequential: usize,
}

impl VariableNamer {
    pub fn new(policy: VariablePolicy) -> Self {
        Self { policy, ..Self::default() }
    }

    /// Assign a variable to every concept of `graph`.
    ///
    /// `order` is the discovery order; concepts missing from it are named
    /// afterwards in insertion order. The result is indexed by `NodeId`
    /// and holds `None` for constants.
    pub fn assign(&mut self, graph: &Graph, order: &[NodeId]) -> Vec<Option<String>> {
        let mut names: Vec<Option<String>> = vec![None; graph.len()];

        // Bare symbols would read back as references to a same-named variable.
        for node in graph.nodes() {
            if let NodeKind::Constant(Literal::Symbol(s)) = &node.kind {
                self.used.insert(s.clone());
            }
        }

        let mut sequence: Vec<NodeId> = order.to_vec();
        let mut listed = vec![false; graph.len()];
        for id in order {
            listed[id.index()] = true;
        }
        sequence.extend(graph.nodes().iter().map(|n| n.id).filter(|id| !listed[id.index()]));

        if self.policy == VariablePolicy::Preserve {
            for &id in &sequence {
                let node = &graph.nodes()[id.index()];
                if let (true, Some(name)) = (node.is_concept(), &node.name) {
                    if is_valid_variable(name) && self.used.insert(name.clone()) {
                        names[id.index()] = Some(name.clone());
                    }
                }
            }
        }

        for &id in &sequence {
            let node = &graph.nodes()[id.index()];
            let Some(concept) = node.concept_label() else { continue };
            if names[id.index()].is_none() {
                names[id.index()] = Some(self.fresh(concept));
            }
        }

        names
    }

    /// A fresh name for a concept under the current policy.
    pub fn fresh(&mut self, concept: &str) -> String {
        match &self.policy {
            VariablePolicy::Sequential { prefix } => {
                let prefix = prefix.clone();
                loop {
                    let name = format!("{prefix}{}", self.next_sequential);
                    self.next_sequential += 1;
                    if self.used.insert(name.clone()) {
                        return name;
                    }
                }
            }
            VariablePolicy::Preserve | VariablePolicy::Initial => {
                let initial = concept
                    .chars()
                    .next()
                    .filter(|c| c.is_ascii_alphabetic())
                    .map_or('x', |c| c.to_ascii_lowercase())
                    .to_string();
                let counter = self.suffixes.entry(initial.clone()).or_insert(1);
                loop {
                    let name = if *counter == 1 {
                        initial.clone()
                    } else {
                        format!("{initial}{counter}")
                    };
                    *counter += 1;
                    if self.used.insert(name.clone()) {
                        return name;
                    }
                }
            }
        }
    }
}

/// A name the lexer reads back as one symbol and the parser cannot
/// mistake for a number.
pub fn is_valid_variable(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Letters followed by digits (`c9`, `b2`): the shape of a generated
/// variable. Unknown bare tokens of this shape are dangling references;
/// anything else is a symbol constant.
pub fn looks_like_variable(text: &str) -> bool {
    let letters = text.chars().take_while(|c| c.is_ascii_alphabetic()).count();
    letters > 0
        && letters < text.len()
        && text[letters..].chars().all(|c| c.is_ascii_digit())
}
