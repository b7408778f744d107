//! Integration tests for the html-to-mdast CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_html-to-mdast"))
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

fn paragraph(text: &str) -> Value {
    json!({"type": "paragraph", "children": [{"type": "text", "value": text}]})
}

#[test]
fn test_basic_stdin() {
    let output = cli().write_stdin("<p>Hello</p>").assert().success().get_output().stdout.clone();
    assert_eq!(
        stdout_json(&output),
        json!({"type": "root", "children": [paragraph("Hello")]})
    );
}

#[test]
fn test_pretty_output_by_default() {
    cli()
        .write_stdin("<p>Hello</p>")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{\n  \"type\": \"root\""))
        .stdout(predicate::str::ends_with("}\n"));
}

#[test]
fn test_compact_output_is_single_line() {
    cli()
        .arg("--compact")
        .write_stdin("<p>Hello</p>")
        .assert()
        .success()
        .stdout(predicate::str::is_match("^[^\n]+\n$").unwrap());
}

#[test]
fn test_file_input() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("input.html");
    fs::write(&input_path, "<h2>Section</h2>").unwrap();

    let output = cli()
        .arg(input_path.to_str().unwrap())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(
        stdout_json(&output)["children"][0],
        json!({"type": "heading", "depth": 2, "children": [{"type": "text", "value": "Section"}]})
    );
}

#[test]
fn test_file_output() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("output.json");

    cli()
        .arg("-o")
        .arg(output_path.to_str().unwrap())
        .write_stdin("<p>Output test</p>")
        .assert()
        .success()
        .stdout("");

    let written = fs::read_to_string(&output_path).unwrap();
    assert_eq!(stdout_json(written.as_bytes())["children"][0], paragraph("Output test"));
}

#[test]
fn test_dash_reads_stdin() {
    let output = cli()
        .arg("-")
        .write_stdin("<p>Dash test</p>")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(stdout_json(&output)["children"][0], paragraph("Dash test"));
}

#[test]
fn test_show_unhandled_reports_on_stderr() {
    cli()
        .arg("--show-unhandled")
        .write_stdin(r#"<figure class="wide"><p>Inside</p></figure>"#)
        .assert()
        .success()
        .stderr(predicate::str::contains("unhandled: figure.wide"));
}

#[test]
fn test_unhandled_is_silent_by_default() {
    cli()
        .write_stdin("<figure><p>Inside</p></figure>")
        .assert()
        .success()
        .stderr(predicate::str::contains("unhandled").not());
}

#[test]
fn test_json_input() {
    let hast = json!({
        "type": "root",
        "children": [
            {"type": "element", "tagName": "p", "properties": {}, "children": [
                {"type": "text", "value": "From JSON"}
            ]}
        ]
    });
    let output = cli()
        .arg("--json-input")
        .write_stdin(hast.to_string())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(
        stdout_json(&output),
        json!({"type": "root", "children": [paragraph("From JSON")]})
    );
}

#[test]
fn test_invalid_json_input_fails() {
    cli()
        .arg("--json-input")
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: invalid hast JSON input"));
}

#[test]
fn test_strict_whitespace_keeps_source_text() {
    let hast = json!({
        "type": "root",
        "children": [{"type": "text", "value": "  spaced  "}]
    });
    let output = cli()
        .args(["--json-input", "--whitespace", "strict"])
        .write_stdin(hast.to_string())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(stdout_json(&output)["children"][0]["value"], json!("  spaced  "));
}

#[test]
fn test_one_line_setting_reaches_text_nodes() {
    let hast = json!({
        "type": "root",
        "children": [{"type": "text", "value": "a\nb"}]
    });
    let output = cli()
        .args(["--json-input", "--whitespace", "strict", "--one-line"])
        .write_stdin(hast.to_string())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(stdout_json(&output)["children"][0]["value"], json!("a b"));
}

#[test]
fn test_settings_file() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.json");
    fs::write(&settings_path, r#"{"oneLine": true}"#).unwrap();
    let hast = json!({"type": "root", "children": [{"type": "text", "value": "x\ny"}]});

    let output = cli()
        .args(["--json-input", "--whitespace", "strict", "--settings"])
        .arg(settings_path.to_str().unwrap())
        .write_stdin(hast.to_string())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(stdout_json(&output)["children"][0]["value"], json!("x y"));
}

#[test]
fn test_settings_file_must_be_object() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.json");
    fs::write(&settings_path, "[1, 2]").unwrap();

    cli()
        .arg("--settings")
        .arg(settings_path.to_str().unwrap())
        .write_stdin("<p>x</p>")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_invalid_set_argument() {
    cli()
        .args(["--set", "missing-equals"])
        .write_stdin("<p>x</p>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn test_missing_input_file() {
    cli()
        .arg("does-not-exist.html")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: failed to read does-not-exist.html"));
}

#[test]
fn test_generate_completion() {
    cli()
        .args(["--generate-completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("html-to-mdast"));
}

#[test]
fn test_generate_man() {
    cli()
        .arg("--generate-man")
        .assert()
        .success()
        .stdout(predicate::str::contains(".TH"));
}

#[test]
fn test_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("html-to-mdast "));
}
