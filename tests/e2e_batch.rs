//! End-to-end batch conversion: directories, failure isolation and the
//! `streamside` binary.

use std::fs;
use std::path::Path;
use std::process::Command;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use streamside::convert::{convert_path, Direction};
use streamside::exchange::Document;
use streamside::ConvertConfig;

const SAMPLE_JSON: &str = include_str!("../samples/sample.json");
const SAMPLE_PENMAN: &str = include_str!("../samples/sample.penman");
const SAMPLE_TXT: &str = include_str!("../samples/sample.txt");

const MALFORMED_JSON: &str = r#"{"graphs": [{"id": "bad.0", "text": "boy",
    "nodes": [{"id": "c0", "label": "boy", "isAttribute": false, "spans": []}],
    "edges": [{"parentId": "c0", "childId": "c9", "label": "ARG0", "isReferent": false, "isInverse": false}]}]}"#;

/// Three JSON files, the middle one malformed.
fn seed_json_dir(dir: &Path) {
    fs::write(dir.join("a.json"), SAMPLE_JSON).unwrap();
    fs::write(dir.join("b.json"), MALFORMED_JSON).unwrap();
    fs::write(dir.join("c.json"), SAMPLE_JSON).unwrap();
}

// ============================================================================
// Library driver
// ============================================================================

#[test]
fn test_directory_failure_is_isolated() {
    let dir = tempdir().unwrap();
    seed_json_dir(dir.path());

    let report = convert_path(dir.path(), None, Direction::JsonToPenman, &ConvertConfig::default());

    assert!(!report.is_success());
    assert_eq!(report.total(), 3);
    assert_eq!(report.converted, vec![dir.path().join("a.penman"), dir.path().join("c.penman")]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, dir.path().join("b.json"));
    assert_eq!(report.failures[0].kind, "MalformedRecordError");
    assert!(report.failures[0].message.contains("c9"));

    assert!(!dir.path().join("b.penman").exists());
    assert_eq!(fs::read_to_string(dir.path().join("a.penman")).unwrap(), SAMPLE_PENMAN);
}

#[test]
fn test_output_directory_is_created() {
    let input = tempdir().unwrap();
    seed_json_dir(input.path());
    let out = input.path().join("penman");

    let config = ConvertConfig::default().with_jobs(2);
    let report = convert_path(input.path(), Some(out.as_path()), Direction::JsonToPenman, &config);

    assert_eq!(report.converted.len(), 2);
    assert!(out.join("a.penman").is_file());
    assert!(out.join("c.penman").is_file());
    assert!(!input.path().join("a.penman").exists());
}

#[test]
fn test_penman_directory_to_json() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("wsj.penman"), SAMPLE_PENMAN).unwrap();
    fs::write(dir.path().join("notes.txt"), "not picked up").unwrap();

    let report = convert_path(dir.path(), None, Direction::PenmanToJson, &ConvertConfig::default());
    assert!(report.is_success());
    assert_eq!(report.converted, vec![dir.path().join("wsj.json")]);

    let written: Document = serde_json::from_str(&fs::read_to_string(dir.path().join("wsj.json")).unwrap()).unwrap();
    let expected: Document = serde_json::from_str(SAMPLE_JSON).unwrap();
    // The graph-less record never made it into the Penman file.
    assert_eq!(written.graphs, expected.graphs[..3].to_vec());
}

#[test]
fn test_single_file_to_named_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.json");
    fs::write(&input, SAMPLE_JSON).unwrap();
    let target = dir.path().join("custom-name.penman");

    let report = convert_path(&input, Some(target.as_path()), Direction::JsonToPenman, &ConvertConfig::default());
    assert_eq!(report.converted, vec![target.clone()]);
    assert_eq!(fs::read_to_string(target).unwrap(), SAMPLE_PENMAN);
}

#[test]
fn test_text_import() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sample.txt");
    fs::write(&input, SAMPLE_TXT).unwrap();

    let config = ConvertConfig::default().with_annotator("jdchoi");
    let report = convert_path(&input, None, Direction::TextToJson, &config);
    assert_eq!(report.converted, vec![dir.path().join("sample.jdchoi.json")]);

    let doc: Document = serde_json::from_str(&fs::read_to_string(&report.converted[0]).unwrap()).unwrap();
    let ids: Vec<_> = doc.graphs.iter().map(|r| r.id.as_deref().unwrap()).collect();
    assert_eq!(ids, vec!["sample.0", "sample.1", "sample.2", "sample.3"]);
    assert!(doc.graphs.iter().all(|r| r.annotator.as_deref() == Some("jdchoi") && r.nodes.is_empty()));
    assert_eq!(doc.graphs[1].text.as_deref(), Some("Barack Obama visited the city of Paris ."));
}

// ============================================================================
// Binary
// ============================================================================

fn streamside() -> Command {
    Command::new(env!("CARGO_BIN_EXE_streamside"))
}

#[test]
fn test_cli_exit_status_reflects_failures() {
    let dir = tempdir().unwrap();
    seed_json_dir(dir.path());

    let output = streamside()
        .args(["json-to-penman", "-i"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("b.json"), "{stderr}");
    assert!(stderr.contains("MalformedRecordError"), "{stderr}");
    assert!(dir.path().join("a.penman").is_file());
    assert!(dir.path().join("c.penman").is_file());
}

#[test]
fn test_cli_layout_flags() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("one.json");
    fs::write(&input, SAMPLE_JSON).unwrap();

    let status = streamside()
        .args(["--layout", "compact", "json-to-penman", "-i"])
        .arg(&input)
        .status()
        .unwrap();
    assert!(status.success());

    let text = fs::read_to_string(dir.path().join("one.penman")).unwrap();
    assert!(text.contains("(c0 / quiet-01 :ARG1 (c1 / park :location-of (c2 / sleep-01 :ARG0 (c3 / boy))))\n"));
}

#[test]
fn test_cli_rejects_bad_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("streamside.json");
    fs::write(&config, r#"{"jobs": 0}"#).unwrap();
    fs::write(dir.path().join("a.json"), SAMPLE_JSON).unwrap();

    let output = streamside()
        .arg("--config")
        .arg(&config)
        .args(["json-to-penman", "-i"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!dir.path().join("a.penman").exists());
}
