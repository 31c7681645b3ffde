//! End-to-end tests that run the compiled `treeform` binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const BTS_MODEL: &str = r#"<?xml version="1.0"?>
<Model>
    <Class name="BTS" isRoot="true" documentation="Base transceiver station"/>
    <Class name="Antenna">
        <Attribute name="height" type="Integer"/>
    </Class>
    <Aggregation source="Antenna" target="BTS" sourceMultiplicity="1..10" targetMultiplicity="1"/>
</Model>"#;

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_treeform"))
        .current_dir(dir)
        .env("TREEFORM_LOG_LEVEL", "off")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run treeform binary")
}

#[test]
fn convert_writes_default_outputs() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("model.xml"), BTS_MODEL).unwrap();

    let output = run(dir.path(), &["convert", "-i", "model.xml"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let config = fs::read_to_string(dir.path().join("config.xml")).unwrap();
    assert_eq!(
        config,
        "<BTS>\n    <Antenna>\n        <height>Integer</height>\n    </Antenna>\n</BTS>"
    );

    let metadata = fs::read_to_string(dir.path().join("metadata.json")).unwrap();
    let records: serde_json::Value = serde_json::from_str(&metadata).unwrap();
    assert_eq!(records[0]["class"], "BTS");
    assert_eq!(records[0]["isRoot"], true);
    assert!(records[0].get("min").is_none());
    assert_eq!(records[1]["min"], "1");
    assert_eq!(records[1]["max"], "10");
}

#[test]
fn convert_to_named_outputs_with_indent() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("model.xml"), BTS_MODEL).unwrap();

    let output = run(
        dir.path(),
        &[
            "convert",
            "-i",
            "model.xml",
            "--config-output",
            "bts.xml",
            "--metadata-output",
            "bts.json",
            "--indent",
            "2",
        ],
    );
    assert!(output.status.success());

    let config = fs::read_to_string(dir.path().join("bts.xml")).unwrap();
    assert!(config.contains("\n  <Antenna>\n    <height>"));
    assert!(dir.path().join("bts.json").exists());
    assert!(!dir.path().join("config.xml").exists());
}

#[test]
fn convert_reads_stdin_and_writes_stdout() {
    use std::io::Write;
    use std::process::Stdio;

    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_treeform"))
        .current_dir(dir.path())
        .env("TREEFORM_LOG_LEVEL", "off")
        .args(["convert", "-i", "-", "--config-output", "-", "--metadata-output", "m.json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(BTS_MODEL.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("<BTS>\n"));
    assert!(stdout.ends_with("</BTS>\n"));
    assert!(dir.path().join("m.json").exists());
}

#[test]
fn unrecognized_entity_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("model.xml"),
        r#"<Model><Class name="BTS" isRoot="true"/><Interface name="X"/></Model>"#,
    )
    .unwrap();

    let output = run(dir.path(), &["convert", "-i", "model.xml"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Unrecognized entity"));
    assert!(stderr.trim_end().ends_with("[UnrecognizedEntity]"));
    assert!(!dir.path().join("config.xml").exists());
    assert!(!dir.path().join("metadata.json").exists());
}

#[test]
fn missing_root_fails_without_fallback() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("model.xml"),
        r#"<Model><Class name="A"/><Class name="B"/></Model>"#,
    )
    .unwrap();

    let output = run(dir.path(), &["convert", "-i", "model.xml"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No root found"));

    let output = run(dir.path(), &["convert", "-i", "model.xml", "--root-class", "B"]);
    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(dir.path().join("config.xml")).unwrap(),
        "<B>\n</B>"
    );
}

#[test]
fn missing_input_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["convert", "-i", "absent.xml"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read input file"));
    assert!(stderr.trim_end().ends_with("[Io]"));
}

#[test]
fn validate_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("model.xml"), BTS_MODEL).unwrap();

    let output = run(dir.path(), &["validate", "-i", "model.xml"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "✓ Valid model (2 classes, 1 aggregations)"
    );
    assert!(!dir.path().join("config.xml").exists());
}

#[test]
fn validate_strict_rejects_orphan() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("model.xml"),
        r#"<Model><Class name="R" isRoot="true"/><Class name="Orphan"/></Model>"#,
    )
    .unwrap();

    let output = run(dir.path(), &["validate", "-i", "model.xml"]);
    assert!(output.status.success());

    let output = run(dir.path(), &["validate", "-i", "model.xml", "--strict"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("✗ Invalid model:"));
}

#[test]
fn inspect_json_lists_classes_and_aggregations() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("model.xml"), BTS_MODEL).unwrap();

    let output = run(dir.path(), &["inspect", "-i", "model.xml", "--json"]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["classes"].as_array().unwrap().len(), 2);
    assert_eq!(report["classes"][0]["documentation"], "Base transceiver station");
    assert_eq!(report["aggregations"][0]["source"], "Antenna");
}
