//! Token spans and node alignments.

use std::fmt;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::NodeId;

/// Half-open token range `[start, end)`, serialized as `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Non-empty and within `token_count`.
    pub fn fits(&self, token_count: usize) -> bool {
        !self.is_empty() && self.end <= token_count
    }
}

impl From<[usize; 2]> for Span {
    fn from([start, end]: [usize; 2]) -> Self {
        Span { start, end }
    }
}

impl From<Span> for [usize; 2] {
    fn from(span: Span) -> Self {
        [span.start, span.end]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Spans of one node. Disjoint spans stay separate, in the order given.
pub type SpanList = SmallVec<[Span; 2]>;

/// Node → token spans, carried alongside a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    spans: HashMap<NodeId, SpanList>,
}

impl Alignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append spans for a node. Nothing is merged or deduplicated.
    pub fn extend(&mut self, node: NodeId, spans: impl IntoIterator<Item = Span>) {
        let entry = self.spans.entry(node).or_default();
        entry.extend(spans);
        if entry.is_empty() {
            self.spans.remove(&node);
        }
    }

    pub fn insert(&mut self, node: NodeId, span: Span) {
        self.spans.entry(node).or_default().push(span);
    }

    pub fn get(&self, node: NodeId) -> &[Span] {
        self.spans.get(&node).map(|s| s.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &[Span])> {
        self.spans.iter().map(|(id, s)| (*id, s.as_slice()))
    }

    /// First span that does not fit in `token_count` tokens.
    pub fn first_out_of_range(&self, token_count: usize) -> Option<(NodeId, Span)> {
        let mut bad: Vec<(NodeId, Span)> = self
            .iter()
            .flat_map(|(id, spans)| spans.iter().map(move |s| (id, *s)))
            .filter(|(_, s)| !s.fits(token_count))
            .collect();
        bad.sort();
        bad.into_iter().next()
    }
}
