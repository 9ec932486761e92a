//! # Exchange Adapter
//!
//! Converts between the annotation tool's JSON records and [`Annotation`].
//!
//! ```text
//! Record ── to_annotation() ──▶ Annotation ── penman::write_annotation() ──▶ Penman
//! Penman ── penman::read_document() ──▶ Annotation ── to_record() ──▶ Record
//! ```

pub mod record;

use hashbrown::{HashMap, HashSet};
use tracing::debug;

use crate::model::edge::is_valid_label;
use crate::model::{Alignment, Annotation, Graph, Literal, Metadata, NodeId, Role, Sentence};
use crate::penman::naming::looks_like_variable;
use crate::{Error, Result};

pub use record::{Document, EdgeRecord, NodeRecord, Record};

/// Build an annotation from a record (`toGraph`).
///
/// Text is whitespace-normalized. A record without text or tokens is
/// accepted and its spans go unchecked, matching the Penman reader.
pub fn to_annotation(record: &Record) -> Result<Annotation> {
    let metadata = Metadata {
        id: record.id.clone(),
        save_date: record.save_date.clone(),
        annotator: record.annotator.clone(),
    };
    check_metadata(&metadata)?;

    let mut sentence = record.text.as_deref().map(Sentence::from_text).unwrap_or_default();
    if let Some(tokens) = &record.tokens {
        if let Some(bad) = tokens.iter().find(|t| t.is_empty() || t.chars().any(char::is_whitespace)) {
            return Err(Error::MalformedRecord(format!(
                "record '{}' has an invalid token {bad:?}", record_id(record)
            )));
        }
        sentence.tokens = Some(tokens.clone());
    }
    let token_count = (!sentence.is_empty()).then(|| sentence.token_count());

    let mut graph = Graph::new();
    let mut alignment = Alignment::new();
    let mut ids: HashMap<&str, NodeId> = HashMap::with_capacity(record.nodes.len());

    for node in &record.nodes {
        if ids.contains_key(node.id.as_str()) {
            return Err(Error::MalformedRecord(format!("duplicate node id '{}'", node.id)));
        }
        if !is_bare_token(&node.label) && !(node.is_attribute && is_quoted(&node.label)) {
            return Err(Error::MalformedRecord(format!(
                "node '{}' has an unprintable label '{}'", node.id, node.label
            )));
        }

        let id = if node.is_attribute {
            let value = Literal::from_text(&node.label);
            if matches!(&value, Literal::Symbol(s) if looks_like_variable(s)) {
                return Err(Error::MalformedRecord(format!(
                    "attribute '{}' label '{}' would read back as a variable; quote it", node.id, node.label
                )));
            }
            graph.add_constant(Some(node.id.as_str()), value)
        } else {
            graph.add_concept(Some(node.id.as_str()), node.label.as_str())?
        };

        if let Some(tokens) = token_count {
            if let Some(span) = node.spans.iter().find(|s| !s.fits(tokens)) {
                return Err(Error::SpanRange {
                    node: node.id.clone(),
                    start: span.start,
                    end: span.end,
                    tokens,
                });
            }
        }
        alignment.extend(id, node.spans.iter().copied());
        ids.insert(node.id.as_str(), id);
    }

    for (i, edge) in record.edges.iter().enumerate() {
        let resolve = |key: &str| {
            ids.get(key).copied().ok_or_else(|| Error::MalformedRecord(format!(
                "edge {i} references undeclared node '{key}'"
            )))
        };
        let parent = resolve(&edge.parent_id)?;
        let child = resolve(&edge.child_id)?;
        if !is_valid_label(&edge.label) {
            return Err(Error::MalformedRecord(format!("edge {i} has malformed label '{}'", edge.label)));
        }
        let role = Role { name: edge.label.clone(), inverse: edge.is_inverse };
        graph.add_edge(parent, child, role, edge.is_referent)?;
    }

    if let Some(orphan) = graph.nodes().iter().find(|n| n.is_constant() && graph.in_degree(n.id) == 0) {
        return Err(Error::MalformedRecord(format!(
            "attribute '{}' is not attached to any concept", orphan.name.as_deref().unwrap_or("")
        )));
    }
    if let Some(stray) = graph.first_unreachable() {
        return Err(Error::MalformedRecord(format!(
            "node '{}' is unreachable from any root", stray.name.as_deref().unwrap_or("")
        )));
    }

    debug!(id = record_id(record), nodes = graph.len(), edges = graph.edge_count(), "built graph from record");

    Ok(Annotation::new(sentence)
        .with_metadata(metadata)
        .with_graph(graph, alignment))
}

/// Flatten an annotation back into a record (`toJSON`).
///
/// Nodes and edges keep graph insertion order. Nodes without a name get a
/// fresh id: `a0, a1, ...` for constants, `c0, c1, ...` for concepts.
pub fn to_record(annotation: &Annotation) -> Record {
    let graph = &annotation.graph;
    let ids = record_ids(graph);

    let nodes = graph
        .nodes()
        .iter()
        .map(|node| NodeRecord {
            id: ids[node.id.index()].clone(),
            label: node.label(),
            is_attribute: node.is_constant(),
            spans: annotation.alignment.get(node.id).to_vec(),
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .map(|edge| EdgeRecord {
            parent_id: ids[edge.parent.index()].clone(),
            child_id: ids[edge.child.index()].clone(),
            label: edge.role.name.clone(),
            is_referent: edge.referent,
            is_inverse: edge.role.inverse,
        })
        .collect();

    Record {
        id: annotation.metadata.id.clone(),
        save_date: annotation.metadata.save_date.clone(),
        annotator: annotation.metadata.annotator.clone(),
        text: annotation.sentence.text.clone(),
        tokens: annotation.sentence.tokens.clone(),
        nodes,
        edges,
    }
}

/// Parse a `{"graphs": [...]}` file into annotations.
pub fn read_document(json: &str) -> Result<Vec<Annotation>> {
    let document: Document = serde_json::from_str(json)?;
    document.graphs.iter().map(to_annotation).collect()
}

/// Render annotations as a pretty-printed `{"graphs": [...]}` file.
pub fn write_document(annotations: &[Annotation]) -> Result<String> {
    let document = Document {
        graphs: annotations.iter().map(to_record).collect(),
    };
    let mut json = serde_json::to_string_pretty(&document)?;
    json.push('\n');
    Ok(json)
}

fn record_ids(graph: &Graph) -> Vec<String> {
    let mut used: HashSet<String> = graph.nodes().iter().filter_map(|n| n.name.clone()).collect();
    let mut counters = [0usize; 2];
    graph
        .nodes()
        .iter()
        .map(|node| match &node.name {
            Some(name) => name.clone(),
            None => {
                let (prefix, counter) = if node.is_constant() {
                    ('a', &mut counters[0])
                } else {
                    ('c', &mut counters[1])
                };
                loop {
                    let candidate = format!("{prefix}{counter}");
                    *counter += 1;
                    if used.insert(candidate.clone()) {
                        break candidate;
                    }
                }
            }
        })
        .collect()
}

/// Metadata values share one `# ::` comment line.
fn check_metadata(metadata: &Metadata) -> Result<()> {
    let fields = [
        ("id", &metadata.id),
        ("save-date", &metadata.save_date),
        ("annotator", &metadata.annotator),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            if value.contains("::") || value.chars().any(char::is_control) {
                return Err(Error::MalformedRecord(format!("{key} {value:?} cannot be written as metadata")));
            }
        }
    }
    Ok(())
}

fn record_id(record: &Record) -> &str {
    record.id.as_deref().unwrap_or("")
}

/// Prints as a single bare Penman token.
fn is_bare_token(label: &str) -> bool {
    !label.is_empty()
        && !label.starts_with('#')
        && !label.chars().any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"' | '/' | ':' | '~'))
}

fn is_quoted(label: &str) -> bool {
    label.len() >= 2
        && label.starts_with('"')
        && label.ends_with('"')
        && !label.chars().any(char::is_control)
}
