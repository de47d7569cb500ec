//! CLI behavior tests: exit codes, output formats, init.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const REPORT: &str = "tests/fixtures/report.json";

fn report_tables_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_report-tables"))
}

#[test]
fn no_args_returns_error_not_panic() {
    let mut cmd = report_tables_cmd();
    cmd.assert().failure().code(2);
}

#[test]
fn render_to_stdout() {
    let mut cmd = report_tables_cmd();
    cmd.arg("render").arg(REPORT);
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains(r#"<table class="caps_table">"#))
        .stdout(predicate::str::contains(r#"<table class="policy-data">"#))
        .stdout(predicate::str::contains(r#"data-state="incorrect-shall""#));
}

#[test]
fn render_to_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("report.html");
    let mut cmd = report_tables_cmd();
    cmd.arg("render").arg(REPORT).arg("-o").arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Wrote"));

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains(r#"id="tpl-details-riskyApps-0-6""#));
    assert!(html.contains(r#"<section id="risky-third-party-sps">"#));
    assert!(html.contains("No data found"));
}

#[test]
fn render_dark_mode_and_expand_all() {
    let mut cmd = report_tables_cmd();
    cmd.arg("render").arg(REPORT).arg("--dark-mode").arg("--expand-all");
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let html = String::from_utf8_lossy(&output.stdout);
    assert!(html.contains(r#"data-theme="dark""#));

    let main = &html[html.find("<main").unwrap()..html.find("</main>").unwrap()];
    assert!(main.contains(r#"data-expanded="true""#));
    assert!(!main.contains(r#"data-expanded="false""#));
}

#[test]
fn render_light_mode_overrides_input_and_config() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("report.json");
    fs::write(&input, r#"{"caps": [{"Name": "A"}], "darkMode": true}"#).unwrap();
    fs::write(dir.path().join(".report-tables.json"), r#"{"darkMode": true}"#).unwrap();

    let mut cmd = report_tables_cmd();
    cmd.arg("render").arg(&input).arg("--light-mode");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"data-theme="light""#));

    let mut cmd = report_tables_cmd();
    cmd.arg("render").arg(&input).arg("--light-mode").arg("--dark-mode");
    cmd.assert().failure().code(2);
}

#[test]
fn render_custom_title() {
    let mut cmd = report_tables_cmd();
    cmd.arg("render").arg(REPORT).arg("--title").arg("Tenant <A>");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<title>Tenant &lt;A&gt;</title>"));
}

#[test]
fn summary_json_output_valid() {
    let mut cmd = report_tables_cmd();
    cmd.arg("summary").arg(REPORT).arg("--json");
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let s = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(s.trim()).expect("valid JSON");
    assert_eq!(value["tables"][0]["table"], "caps");
    assert_eq!(value["tables"][0]["rows"], 2);
    assert_eq!(value["tables"][2]["rows"], 0);
    assert_eq!(value["results"]["pass"], 1);
    assert_eq!(value["results"]["deleted"], 1);
}

#[test]
fn summary_console_output() {
    let mut cmd = report_tables_cmd();
    cmd.arg("summary").arg(REPORT);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Conditional Access Policies"))
        .stdout(predicate::str::contains("No data found"))
        .stdout(predicate::str::contains("Control results"));
}

#[test]
fn file_not_found_exit_2() {
    let mut cmd = report_tables_cmd();
    cmd.arg("render").arg("nonexistent.json");
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Failed to read input file"));
}

#[test]
fn invalid_input_exit_2() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("bad.json");
    fs::write(&input, "{ not json").unwrap();
    let mut cmd = report_tables_cmd();
    cmd.arg("render").arg(&input);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid report input"));
}

#[test]
fn malformed_rows_are_warned_not_fatal() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("report.json");
    fs::write(&input, r#"{"caps": [{"Name": "A"}, "oops"]}"#).unwrap();
    let mut cmd = report_tables_cmd();
    cmd.arg("render").arg(&input);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Warning"))
        .stderr(predicate::str::contains("found a string"));
}

#[test]
fn malformed_sections_keep_the_rest_of_the_report() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("report.json");
    fs::write(
        &input,
        r#"{
            "caps": [{"Name": "Require MFA", "State": "On"}],
            "riskyApps": {"DisplayName": "not a list"},
            "controls": [{"Control ID": "MS.AAD.1.1v1", "Result": "Pass", "Criticality": "Shall", "Details": null}],
            "spfDomains": ["a.example.com", 7]
        }"#,
    )
    .unwrap();
    let mut cmd = report_tables_cmd();
    cmd.arg("render").arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"<table class="caps_table">"#))
        .stdout(predicate::str::contains(r#"data-state="pass""#))
        .stdout(predicate::str::contains("a.example.com"))
        .stderr(predicate::str::contains("Warning"))
        .stderr(predicate::str::contains("Malformed riskyApps"));
}

#[test]
fn config_next_to_input_is_used() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("report.json");
    fs::write(&input, r#"{"caps": [{"Name": "A", "State": "abcdefghijklmnop"}]}"#).unwrap();
    fs::write(
        dir.path().join(".report-tables.json"),
        r#"{"charLimit": 5, "titles": {"caps": "Policies"}}"#,
    )
    .unwrap();

    let mut cmd = report_tables_cmd();
    cmd.arg("render").arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<h2>Policies</h2>"))
        .stdout(predicate::str::contains("abcde"));
}

#[test]
fn invalid_config_exit_2() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("report.json");
    fs::write(&input, "{}").unwrap();
    fs::write(dir.path().join(".report-tables.json"), r#"{"showMoreIncrement": 0}"#).unwrap();

    let mut cmd = report_tables_cmd();
    cmd.arg("render").arg(&input);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("showMoreIncrement"));
}

#[test]
fn missing_custom_config_exit_2() {
    let mut cmd = report_tables_cmd();
    cmd.arg("summary").arg(REPORT).arg("--config").arg("does-not-exist.json");
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn init_creates_config() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join(".report-tables.json");
    let mut cmd = report_tables_cmd();
    cmd.arg("init").arg("--dir").arg(dir.path());
    cmd.assert().success();
    assert!(config_path.exists(), ".report-tables.json should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("charLimit"));
    assert!(content.contains("titles"));
}

#[test]
fn init_does_not_overwrite() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join(".report-tables.json");
    fs::write(&config_path, "{}").unwrap();
    let mut cmd = report_tables_cmd();
    cmd.arg("init").arg("--dir").arg(dir.path());
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(fs::read_to_string(&config_path).unwrap(), "{}");
}
