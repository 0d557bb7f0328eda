//! End-to-end tests for the `vc` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCENARIO: &str = r#"
panels:
  - id: logs-filters
    view: logs
    controls:
      - name: status
        kind: select
        value: active
      - name: owner
views:
  - id: logs
steps:
  - signal: apply_clicked
    panel: logs-filters
  - signal: item_created
    view_id: logs
"#;

const DEFECTIVE: &str = r#"
panels:
  - id: orphan
    controls:
      - name: q
views:
  - id: logs
steps:
  - signal: apply_clicked
    panel: orphan
"#;

fn write_scenario(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn vc(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("vc").unwrap();
    cmd.current_dir(dir).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    vc(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("replay"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_replay_text() {
    let dir = TempDir::new().unwrap();
    let scenario = write_scenario(&dir, "session.yml", SCENARIO);

    vc(dir.path())
        .arg("replay")
        .arg(&scenario)
        .assert()
        .success()
        .stdout(predicate::str::contains("apply clicked on logs-filters"))
        .stdout(predicate::str::contains("FiltersApplied logs"))
        .stdout(predicate::str::contains("RefreshComplete logs (reload)"))
        .stdout(predicate::str::contains("2 reloads"));
}

#[test]
fn test_replay_json() {
    let dir = TempDir::new().unwrap();
    let scenario = write_scenario(&dir, "session.yml", SCENARIO);

    let output = vc(dir.path())
        .args(["replay", "--format", "json"])
        .arg(&scenario)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["steps"].as_array().unwrap().len(), 2);
    assert_eq!(report["widgets"][0]["reloads"], 2);
    assert_eq!(report["filters"][0][1]["status"], "active");
}

#[test]
fn test_replay_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    vc(dir.path())
        .args(["replay", "does-not-exist.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read scenario"));
}

#[test]
fn test_check_clean() {
    let dir = TempDir::new().unwrap();
    let scenario = write_scenario(&dir, "session.yml", SCENARIO);

    vc(dir.path())
        .arg("check")
        .arg(&scenario)
        .assert()
        .success()
        .stdout(predicate::str::contains("is clean"));
}

#[test]
fn test_check_reports_defects() {
    let dir = TempDir::new().unwrap();
    let scenario = write_scenario(&dir, "broken.yml", DEFECTIVE);

    vc(dir.path())
        .arg("check")
        .arg(&scenario)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Panel 'orphan' has no view marker"))
        .stderr(predicate::str::contains("1 configuration defect(s) found"));
}

#[test]
fn test_check_reports_view_without_widget() {
    let dir = TempDir::new().unwrap();
    let scenario = write_scenario(
        &dir,
        "unregistered.yml",
        r#"
panels:
  - id: logs-filters
    view: logs
views:
  - id: logs
    register: false
"#,
    );

    vc(dir.path())
        .arg("check")
        .arg(&scenario)
        .assert()
        .failure()
        .stdout(predicate::str::contains("filters view 'logs' which never registers a widget"));
}

#[test]
fn test_replay_journal_roundtrip() {
    let dir = TempDir::new().unwrap();
    let scenario = write_scenario(&dir, "session.yml", SCENARIO);
    let journal = dir.path().join("events.jsonl");

    vc(dir.path())
        .arg("replay")
        .arg(&scenario)
        .arg("--journal")
        .arg(&journal)
        .assert()
        .success()
        .stdout(predicate::str::contains("events journaled"));

    let content = fs::read_to_string(&journal).unwrap();
    assert!(content.lines().count() >= 4);

    vc(dir.path())
        .arg("journal")
        .arg(&journal)
        .assert()
        .success()
        .stdout(predicate::str::contains("CoordinatorReady"))
        .stdout(predicate::str::contains("FiltersApplied logs"));
}

#[test]
fn test_config_file_from_working_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".viewcoord.yml"), "apply-key: F5\n").unwrap();
    let scenario = write_scenario(
        &dir,
        "keys.yml",
        r#"
panels:
  - id: p
    view: logs
    controls:
      - name: q
        value: x
views:
  - id: logs
steps:
  - signal: key_pressed
    panel: p
    key: Enter
"#,
    );

    vc(dir.path())
        .arg("replay")
        .arg(&scenario)
        .assert()
        .success()
        .stdout(predicate::str::contains("key 'Enter' does not apply filters"));
}
