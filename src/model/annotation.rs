//! Annotation: one sentence with its graph, alignment and metadata.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::{Alignment, Graph, Span};

/// Bookkeeping carried with every annotated sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub id: Option<String>,
    pub save_date: Option<String>,
    pub annotator: Option<String>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.save_date.is_none() && self.annotator.is_none()
    }
}

/// The annotated sentence, as raw text and/or an explicit token list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: Option<String>,
    pub tokens: Option<Vec<String>>,
}

impl Sentence {
    /// Raw text with runs of whitespace collapsed and ends trimmed.
    pub fn from_text(text: &str) -> Self {
        Self {
            text: Some(text.split_whitespace().collect::<Vec<_>>().join(" ")),
            tokens: None,
        }
    }

    pub fn from_tokens(tokens: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            text: None,
            tokens: Some(tokens.into_iter().map(Into::into).collect()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.tokens.is_none()
    }

    /// Explicit tokens, or the whitespace-split text.
    pub fn tokens(&self) -> Vec<&str> {
        match (&self.tokens, &self.text) {
            (Some(tokens), _) => tokens.iter().map(String::as_str).collect(),
            (None, Some(text)) => text.split_whitespace().collect(),
            (None, None) => Vec::new(),
        }
    }

    pub fn token_count(&self) -> usize {
        match (&self.tokens, &self.text) {
            (Some(tokens), _) => tokens.len(),
            (None, Some(text)) => text.split_whitespace().count(),
            (None, None) => 0,
        }
    }

    /// The text, or the tokens joined by single spaces.
    pub fn text(&self) -> Cow<'_, str> {
        match (&self.text, &self.tokens) {
            (Some(text), _) => Cow::Borrowed(text),
            (None, Some(tokens)) => Cow::Owned(tokens.join(" ")),
            (None, None) => Cow::Borrowed(""),
        }
    }

    /// Token span covering a character selection `[begin, end)` of
    /// [`Sentence::text`]. Partially selected words are widened to whole
    /// tokens; a selection touching no token yields `None`.
    pub fn token_span(&self, begin: usize, end: usize) -> Option<Span> {
        let text = self.text();
        let mut first = None;
        let mut last = None;
        let mut index = 0;
        let mut token_start: Option<usize> = None;

        let chars: Vec<char> = text.chars().collect();
        for (pos, c) in chars.iter().chain(std::iter::once(&' ')).enumerate() {
            match (c.is_whitespace(), token_start) {
                (false, None) => token_start = Some(pos),
                (true, Some(start)) => {
                    if start < end && begin < pos {
                        first.get_or_insert(index);
                        last = Some(index);
                    }
                    index += 1;
                    token_start = None;
                }
                _ => {}
            }
        }

        Some(Span::new(first?, last? + 1))
    }
}

/// The per-sentence unit carried by both Penman and JSON files.
#[derive(Debug, Clone, Default)]
pub struct Annotation {
    pub metadata: Metadata,
    pub sentence: Sentence,
    pub graph: Graph,
    pub alignment: Alignment,
}

impl Annotation {
    pub fn new(sentence: Sentence) -> Self {
        Self { sentence, ..Self::default() }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_graph(mut self, graph: Graph, alignment: Alignment) -> Self {
        self.graph = graph;
        self.alignment = alignment;
        self
    }
}
