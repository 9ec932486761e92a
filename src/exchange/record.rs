//! JSON record types of the annotation tool.
//!
//! ```json
//! { "graphs": [
//!   { "id": "sample.0", "save-date": "2020-06-01", "annotator": "jdchoi",
//!     "text": "The boy wants",
//!     "nodes": [ {"id": "c0", "label": "want-01", "isAttribute": false, "spans": [[2, 3]]} ],
//!     "edges": [ {"parentId": "c0", "childId": "c1", "label": "ARG0",
//!                 "isReferent": false, "isInverse": false} ] }
//! ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::model::Span;

/// A file of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub graphs: Vec<Record>,
}

/// One annotated sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "save-date", default, skip_serializing_if = "Option::is_none")]
    pub save_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<String>>,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// A concept, or an attribute constant when `is_attribute` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    /// Concept label, or the printed constant (`"Obama"` quoted, `5`, `-`).
    pub label: String,
    #[serde(default)]
    pub is_attribute: bool,
    #[serde(default)]
    pub spans: Vec<Span>,
}

impl NodeRecord {
    pub fn concept(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into(), is_attribute: false, spans: Vec::new() }
    }

    pub fn attribute(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into(), is_attribute: true, spans: Vec::new() }
    }

    pub fn with_spans(mut self, spans: impl IntoIterator<Item = (usize, usize)>) -> Self {
        self.spans = spans.into_iter().map(|(s, e)| Span::new(s, e)).collect();
        self
    }
}

/// A relation; `label` is the base role, `is_inverse` adds the `-of`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    pub parent_id: String,
    pub child_id: String,
    pub label: String,
    #[serde(default)]
    pub is_referent: bool,
    #[serde(default)]
    pub is_inverse: bool,
}

impl EdgeRecord {
    pub fn new(parent_id: impl Into<String>, child_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            child_id: child_id.into(),
            label: label.into(),
            is_referent: false,
            is_inverse: false,
        }
    }

    pub fn referent(mut self) -> Self {
        self.is_referent = true;
        self
    }

    pub fn inverse(mut self) -> Self {
        self.is_inverse = true;
        self
    }
}
