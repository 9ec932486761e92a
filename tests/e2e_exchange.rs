//! End-to-end tests for the JSON exchange format.
//!
//! Each test exercises: JSON record → Annotation → Penman → Annotation →
//! JSON record, checking that nothing annotators care about is lost.

use pretty_assertions::assert_eq;

use streamside::convert::Direction;
use streamside::exchange::{self, Document, EdgeRecord, NodeRecord, Record};
use streamside::penman::{self, Layout, SerializeOptions, VariablePolicy};
use streamside::{Annotation, ConvertConfig, Error, Span};

const SAMPLE_JSON: &str = include_str!("../samples/sample.json");
const SAMPLE_PENMAN: &str = include_str!("../samples/sample.penman");

fn sample_records() -> Vec<Record> {
    serde_json::from_str::<Document>(SAMPLE_JSON).unwrap().graphs
}

/// JSON records through Penman text and back.
fn through_penman(annotations: &[Annotation], keep_empty: bool) -> Vec<Annotation> {
    let mut out = Vec::new();
    penman::write_document(&mut out, annotations, &SerializeOptions::default(), keep_empty).unwrap();
    penman::read_document(&String::from_utf8(out).unwrap()).unwrap()
}

// ============================================================================
// Record ↔ Annotation
// ============================================================================

#[test]
fn test_sample_records_round_trip() {
    for record in sample_records() {
        let annotation = exchange::to_annotation(&record).unwrap();
        assert_eq!(exchange::to_record(&annotation), record);
    }
}

#[test]
fn test_sample_json_prints_as_sample_penman() {
    let annotations = exchange::read_document(SAMPLE_JSON).unwrap();
    let mut out = Vec::new();
    let written = penman::write_document(&mut out, &annotations, &SerializeOptions::default(), false).unwrap();
    assert_eq!(written, 3);
    assert_eq!(String::from_utf8(out).unwrap(), SAMPLE_PENMAN);
}

#[test]
fn test_json_penman_json_is_stable() {
    let annotations = exchange::read_document(SAMPLE_JSON).unwrap();
    let back: Vec<Record> = through_penman(&annotations, true).iter().map(exchange::to_record).collect();
    assert_eq!(back, sample_records());
}

#[test]
fn test_written_json_reads_back() {
    let annotations = exchange::read_document(SAMPLE_JSON).unwrap();
    let json = exchange::write_document(&annotations).unwrap();
    assert!(json.starts_with("{\n  \"graphs\": ["));
    let reread: Document = serde_json::from_str(&json).unwrap();
    assert_eq!(reread.graphs, sample_records());
}

// ============================================================================
// Alignments and roles
// ============================================================================

#[test]
fn test_disjoint_spans_survive_penman() {
    let record = Record {
        id: Some("t.0".into()),
        text: Some("The boy said the boy left".into()),
        nodes: vec![
            NodeRecord::concept("c0", "say-01").with_spans([(2, 3)]),
            NodeRecord::concept("c1", "boy").with_spans([(1, 2), (4, 5)]),
        ],
        edges: vec![EdgeRecord::new("c0", "c1", "ARG0")],
        ..Record::default()
    };
    let annotation = exchange::to_annotation(&record).unwrap();
    let mut out = Vec::new();
    penman::write_annotation(&mut out, &annotation, &SerializeOptions::default()).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("# ::align c1/1-2,4-5\n"), "{text}");

    let back = penman::read_document(&text).unwrap();
    let boy = back[0].graph.by_name("c1").unwrap();
    assert_eq!(back[0].alignment.get(boy), &[Span::new(1, 2), Span::new(4, 5)]);
    assert_eq!(exchange::to_record(&back[0]), record);
}

#[test]
fn test_inverse_edge_keeps_label_and_flag() {
    let record = Record {
        text: Some("the park where he sleeps".into()),
        nodes: vec![
            NodeRecord::concept("c0", "park"),
            NodeRecord::concept("c1", "sleep-01"),
        ],
        edges: vec![EdgeRecord::new("c0", "c1", "location").inverse()],
        ..Record::default()
    };
    let annotation = exchange::to_annotation(&record).unwrap();
    let options = SerializeOptions { layout: Layout::Compact, variables: VariablePolicy::Preserve };
    assert_eq!(penman::serialize(&annotation.graph, &options), "(c0 / park :location-of (c1 / sleep-01))");

    let back = through_penman(&[annotation], false);
    let edge = &exchange::to_record(&back[0]).edges[0];
    assert_eq!(edge.label, "location");
    assert!(edge.is_inverse);
}

#[test]
fn test_tokens_instead_of_text() {
    let record = Record {
        tokens: Some(vec!["do".into(), "n't".into(), "go".into()]),
        nodes: vec![
            NodeRecord::concept("c0", "go-02").with_spans([(2, 3)]),
            NodeRecord::attribute("a0", "-").with_spans([(1, 2)]),
        ],
        edges: vec![EdgeRecord::new("c0", "a0", "polarity")],
        ..Record::default()
    };
    let annotation = exchange::to_annotation(&record).unwrap();
    let back = through_penman(&[annotation], false);
    assert_eq!(exchange::to_record(&back[0]), record);
}

#[test]
fn test_penman_without_sentence_converts_both_ways() {
    let config = ConvertConfig::default();
    let penman_in = "# ::id bare.0\n(c0 / boy)\n";

    let json = Direction::PenmanToJson.convert_str(penman_in, "bare", &config).unwrap();
    let doc: Document = serde_json::from_str(&json).unwrap();
    assert!(doc.graphs[0].text.is_none() && doc.graphs[0].tokens.is_none());

    let penman_out = Direction::JsonToPenman.convert_str(&json, "bare", &config).unwrap();
    assert_eq!(penman_out, penman_in);
}

#[test]
fn test_multiline_text_stays_on_one_comment_line() {
    let record = Record {
        id: Some("t.0".into()),
        text: Some("The boy\nsleeps".into()),
        nodes: vec![NodeRecord::concept("c0", "sleep-01").with_spans([(2, 3)])],
        ..Record::default()
    };
    let json = serde_json::to_string(&Document { graphs: vec![record] }).unwrap();
    let config = ConvertConfig::default();

    let penman_text = Direction::JsonToPenman.convert_str(&json, "t", &config).unwrap();
    assert_eq!(penman_text, "# ::id t.0\n# ::snt The boy sleeps\n# ::align c0/2-3\n(c0 / sleep-01)\n");

    let back = penman::read_document(&penman_text).unwrap();
    assert_eq!(back[0].sentence.text.as_deref(), Some("The boy sleeps"));
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_variable_shaped_attribute_is_malformed() {
    let record = Record {
        text: Some("a big item".into()),
        nodes: vec![
            NodeRecord::concept("c0", "item"),
            NodeRecord::attribute("a0", "x2"),
        ],
        edges: vec![EdgeRecord::new("c0", "a0", "mod")],
        ..Record::default()
    };
    let err = exchange::to_annotation(&record).unwrap_err();
    assert_eq!(err.kind(), "MalformedRecordError");

    // Quoted, it prints as a string and reads back as one.
    let mut record = record;
    record.nodes[1].label = "\"x2\"".into();
    let annotation = exchange::to_annotation(&record).unwrap();
    let back = through_penman(&[annotation], false);
    assert_eq!(exchange::to_record(&back[0]), record);
}

#[test]
fn test_unknown_child_is_malformed() {
    let mut record = sample_records().remove(0);
    record.edges[0].child_id = "c42".into();
    let err = exchange::to_annotation(&record).unwrap_err();
    assert_eq!(err.kind(), "MalformedRecordError");
}

#[test]
fn test_span_past_sentence_end() {
    let mut record = sample_records().remove(0);
    record.nodes[1].spans.push(Span::new(10, 11));
    match exchange::to_annotation(&record) {
        Err(Error::SpanRange { node, tokens, .. }) => {
            assert_eq!(node, "c0");
            assert_eq!(tokens, 10);
        }
        other => panic!("Expected SpanRange, got {other:?}"),
    }
}

#[test]
fn test_undecodable_json_is_malformed() {
    let err = exchange::read_document(r#"{"graphs": [{"nodes": 3}]}"#).unwrap_err();
    assert_eq!(err.kind(), "MalformedRecordError");
}
