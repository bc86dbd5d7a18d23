//! End-to-end tests of the `domain-forge` binary

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn root() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}

fn demo_schemas() -> PathBuf {
    root().join("demo/schemas")
}

fn forge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_domain-forge"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_check_clean_schemas() {
    let output = forge(&["check", demo_schemas().to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("7 schema(s) ready for emission"));
}

#[test]
fn test_check_reports_diagnostics_as_json() {
    let fixture = root().join("tests/fixtures/diagnostics.json");
    let output = forge(&["--format", "json", "check", fixture.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(json["items"].as_array().unwrap().len() >= 10);
}

#[test]
fn test_generate_then_verify() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("generated");
    let schemas = demo_schemas();

    let generated = forge(&["generate", schemas.to_str().unwrap(), "--out", out.to_str().unwrap()]);
    assert!(generated.status.success());
    assert!(out.join("shapes.domain.rs").exists());

    let verified = forge(&["verify", schemas.to_str().unwrap(), "--out", out.to_str().unwrap()]);
    assert!(verified.status.success());
    assert!(stdout(&verified).contains("ok"));

    let shapes = out.join("shapes.domain.rs");
    let edited = fs::read_to_string(&shapes).unwrap().replacen("impl Pair {", "impl Pair { // edited", 1);
    fs::write(&shapes, edited).unwrap();

    let drifted = forge(&["verify", schemas.to_str().unwrap(), "--out", out.to_str().unwrap()]);
    assert_eq!(drifted.status.code(), Some(1));
    let text = stdout(&drifted);
    assert!(text.contains("stale"));
    assert!(text.contains("edited by hand"));
    assert!(text.contains("-impl Pair { // edited"));
}

#[test]
fn test_graph_and_index() {
    let schemas = demo_schemas();

    let graph = forge(&["graph", schemas.to_str().unwrap()]);
    assert!(graph.status.success());
    assert!(stdout(&graph).contains("\"crate::shapes::Pair\" -> \"crate::numbers::PositiveInt\" [label=\"b\"];"));

    let index = forge(&["index", schemas.to_str().unwrap()]);
    assert!(index.status.success());
    let text = stdout(&index);
    assert!(text.contains("crate::shapes::Pair"));
    assert!(text.lines().any(|l| l.trim_start().starts_with('b') && l.ends_with("a_less_than_b")));
}

#[test]
fn test_config_file_changes_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("forge.toml");
    fs::write(&config, "[naming]\nconstructor = \"create\"\n").unwrap();
    let out = dir.path().join("out");

    let output = forge(&[
        "--config",
        config.to_str().unwrap(),
        "generate",
        demo_schemas().to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let code = fs::read_to_string(out.join("numbers.domain.rs")).unwrap();
    assert!(code.contains("pub fn create("));
}

#[test]
fn test_generate_honours_warnings_as_errors() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("open.json");
    fs::write(
        &schema,
        r#"{ "types": [{ "name": "Open", "domain": true, "members": [
            { "field": { "name": "x", "ty": { "path": "i32" },
                         "accessors": [{ "kind": "set", "visibility": "public" }] } }
        ] }] }"#,
    )
    .unwrap();
    let out = dir.path().join("out");

    let lenient = forge(&["generate", schema.to_str().unwrap(), "--out", out.to_str().unwrap()]);
    assert!(lenient.status.success());

    let strict = dir.path().join("strict.toml");
    fs::write(&strict, "[diagnostics]\nwarnings_as_errors = true\n").unwrap();
    let output = forge(&[
        "--config",
        strict.to_str().unwrap(),
        "generate",
        schema.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(out.join("crate.domain.rs").exists());
}

#[test]
fn test_missing_input_fails() {
    let output = forge(&["check", "/definitely/not/here.json"]);
    assert_eq!(output.status.code(), Some(2));
}
