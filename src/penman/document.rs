//! Penman files: graphs with `# ::` metadata comments.
//!
//! ```text
//! # ::id sample.0 ::save-date 2020-06-01 ::annotator jdchoi
//! # ::snt The boy wants the girl to believe him .
//! # ::align c1/2-3
//! (c1 / want-01
//!     :ARG0 (c0 / boy))
//!
//! # ::id sample.1
//! ...
//! ```
//!
//! Blocks are separated by blank lines. `::align` keys are concept
//! variables, or `<parent>:<role>` for constants (with `#n` appended when
//! one parent has several constants under the same role).

use std::io::Write;

use hashbrown::HashMap;
use tracing::debug;

use super::naming::VariableNamer;
use super::serializer::{print, SerializeOptions};
use crate::model::{Alignment, Annotation, Graph, Metadata, NodeId, Sentence, Span};
use crate::{Error, Result};

// ============================================================================
// Reading
// ============================================================================

/// Read every annotation in a Penman file.
pub fn read_document(text: &str) -> Result<Vec<Annotation>> {
    let mut annotations = Vec::new();
    for block in blocks(text) {
        let annotation = read_block(&block)?;
        debug!(
            id = annotation.metadata.id.as_deref().unwrap_or(""),
            nodes = annotation.graph.len(),
            "read penman graph"
        );
        annotations.push(annotation);
    }
    Ok(annotations)
}

/// Blank-line-separated groups of lines.
fn blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Metadata gathered from the comment lines of one block.
#[derive(Default)]
struct Comments {
    metadata: Metadata,
    sentence: Sentence,
    aligns: Vec<(String, Vec<Span>)>,
}

fn read_block(lines: &[&str]) -> Result<Annotation> {
    let mut comments = Comments::default();
    let mut body = String::new();

    for line in lines {
        let trimmed = line.trim_start();
        if let Some(comment) = trimmed.strip_prefix('#') {
            read_comment(comment.trim(), &mut comments)?;
        } else {
            body.push_str(line);
            body.push('\n');
        }
    }

    let (graph, mut alignment) = if body.trim().is_empty() {
        (Graph::new(), Alignment::new())
    } else {
        super::parse_with_alignment(&body)?
    };

    resolve_aligns(&graph, &comments.aligns, &mut alignment)?;

    if !comments.sentence.is_empty() {
        check_spans(&graph, &alignment, comments.sentence.token_count())?;
    }

    Ok(Annotation::new(comments.sentence)
        .with_metadata(comments.metadata)
        .with_graph(graph, alignment))
}

fn read_comment(comment: &str, out: &mut Comments) -> Result<()> {
    // Sentence lines keep everything after the key, `::` included.
    if let Some(snt) = comment.strip_prefix("::snt") {
        out.sentence.text = Some(snt.trim().to_string());
        return Ok(());
    }
    if let Some(tok) = comment.strip_prefix("::tok") {
        out.sentence.tokens = Some(tok.split_whitespace().map(String::from).collect());
        return Ok(());
    }
    if !comment.starts_with("::") {
        return Ok(());
    }

    for field in comment.split("::").map(str::trim).filter(|f| !f.is_empty()) {
        let (key, value) = field.split_once(char::is_whitespace).unwrap_or((field, ""));
        let value = value.trim();
        match key {
            "id" => out.metadata.id = Some(value.to_string()),
            "save-date" => out.metadata.save_date = Some(value.to_string()),
            "annotator" => out.metadata.annotator = Some(value.to_string()),
            "align" => out.aligns.push(parse_align(value)?),
            other => debug!(key = other, "ignoring penman metadata field"),
        }
    }
    Ok(())
}

/// `c1/1-2,4-5` → (`c1`, [1..2, 4..5])
fn parse_align(value: &str) -> Result<(String, Vec<Span>)> {
    let malformed = || Error::MalformedRecord(format!("malformed ::align value '{value}'"));
    let (key, ranges) = value.rsplit_once('/').ok_or_else(malformed)?;
    let mut spans = Vec::new();
    for range in ranges.split(',').map(str::trim).filter(|r| !r.is_empty()) {
        let (start, end) = range.split_once('-').ok_or_else(malformed)?;
        let start = start.trim().parse().map_err(|_| malformed())?;
        let end = end.trim().parse().map_err(|_| malformed())?;
        spans.push(Span::new(start, end));
    }
    if key.is_empty() {
        return Err(malformed());
    }
    Ok((key.to_string(), spans))
}

fn resolve_aligns(graph: &Graph, aligns: &[(String, Vec<Span>)], alignment: &mut Alignment) -> Result<()> {
    if aligns.is_empty() {
        return Ok(());
    }
    let constants = constant_keys(graph, |id| graph.node(id).and_then(|n| n.name.clone()));
    let by_key: HashMap<&str, NodeId> = constants.iter().map(|(id, key)| (key.as_str(), *id)).collect();

    for (key, spans) in aligns {
        let node = graph
            .by_name(key)
            .or_else(|| by_key.get(key.as_str()).copied())
            .ok_or_else(|| Error::MalformedRecord(format!("::align names unknown node '{key}'")))?;
        alignment.extend(node, spans.iter().copied());
    }
    Ok(())
}

fn check_spans(graph: &Graph, alignment: &Alignment, tokens: usize) -> Result<()> {
    match alignment.first_out_of_range(tokens) {
        Some((id, span)) => Err(Error::SpanRange {
            node: graph.node(id).map(|n| n.name.clone().unwrap_or_else(|| n.label())).unwrap_or_default(),
            start: span.start,
            end: span.end,
            tokens,
        }),
        None => Ok(()),
    }
}

/// `<parent>:<role>[#n]` for every constant, in node order.
fn constant_keys<F>(graph: &Graph, parent_name: F) -> Vec<(NodeId, String)>
where
    F: Fn(NodeId) -> Option<String>,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut keyed = Vec::new();
    for node in graph.nodes().iter().filter(|n| n.is_constant()) {
        let Some(edge) = graph.incoming(node.id).next() else { continue };
        let Some(parent) = parent_name(edge.parent) else { continue };
        let base = format!("{parent}:{}", edge.role.printed());
        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        let key = if *count == 1 { base } else { format!("{base}#{count}") };
        keyed.push((node.id, key));
    }
    keyed
}

// ============================================================================
// Writing
// ============================================================================

/// Write one annotation: metadata comments, then the graph.
pub fn write_annotation(
    writer: &mut dyn Write,
    annotation: &Annotation,
    options: &SerializeOptions,
) -> Result<()> {
    let Annotation { metadata, sentence, graph, alignment } = annotation;

    let mut fields = Vec::new();
    if let Some(id) = &metadata.id { fields.push(format!("::id {id}")); }
    if let Some(date) = &metadata.save_date { fields.push(format!("::save-date {date}")); }
    if let Some(who) = &metadata.annotator { fields.push(format!("::annotator {who}")); }
    if !fields.is_empty() {
        writeln!(writer, "# {}", fields.join(" "))?;
    }
    if let Some(text) = &sentence.text {
        writeln!(writer, "# ::snt {text}")?;
    }
    if let Some(tokens) = &sentence.tokens {
        writeln!(writer, "# ::tok {}", tokens.join(" "))?;
    }

    if graph.is_empty() {
        return Ok(());
    }

    let mut namer = VariableNamer::new(options.variables.clone());
    let printed = print(graph, options.layout, &mut namer);

    let constants: HashMap<NodeId, String> =
        constant_keys(graph, |id| printed.names.get(id.index()).cloned().flatten())
            .into_iter()
            .collect();
    for node in graph.nodes() {
        let spans = alignment.get(node.id);
        if spans.is_empty() {
            continue;
        }
        let key = match &printed.names[node.id.index()] {
            Some(var) => var.clone(),
            None => match constants.get(&node.id) {
                Some(key) => key.clone(),
                None => continue,
            },
        };
        let ranges: Vec<String> = spans.iter().map(Span::to_string).collect();
        writeln!(writer, "# ::align {key}/{}", ranges.join(","))?;
    }

    writeln!(writer, "{}", printed.text)?;
    Ok(())
}

/// Write annotations separated by blank lines. Graph-less annotations are
/// skipped unless `keep_empty` is set. Returns how many were written.
pub fn write_document(
    writer: &mut dyn Write,
    annotations: &[Annotation],
    options: &SerializeOptions,
    keep_empty: bool,
) -> Result<usize> {
    let mut written = 0;
    for annotation in annotations {
        if annotation.graph.is_empty() && !keep_empty {
            debug!(id = annotation.metadata.id.as_deref().unwrap_or(""), "skipping empty graph");
            continue;
        }
        if written > 0 {
            writeln!(writer)?;
        }
        write_annotation(writer, annotation, options)?;
        written += 1;
    }
    Ok(written)
}
