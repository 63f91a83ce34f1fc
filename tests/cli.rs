#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::tempdir;

fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("budget-forge").expect("binary built");
    cmd.env_remove("BUDGET_FORGE_DATA_DIR")
        .env("BUDGET_FORGE_LOG", "budget_forge=warn")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--no-log-file");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("run budget-forge");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf8 stdout")
}

#[test]
fn show_seeds_default_state() {
    let dir = tempdir().unwrap();
    let out = stdout_of(cli(dir.path()).arg("show"));
    let state: Value = serde_json::from_str(&out).expect("state json");
    assert_eq!(state["brand"], "Budget Forge");
    assert_eq!(state["onboarded"], false);
    assert!(dir.path().join("budget-app-state_v2.json").exists());
}

#[test]
fn update_merges_into_saved_state() {
    let dir = tempdir().unwrap();
    stdout_of(cli(dir.path()).args(["update", r#"{"householdName":"A","incomeAmount":1000}"#]));
    stdout_of(cli(dir.path()).args(["update", r#"{"incomeAmount":2000}"#]));

    let state: Value = serde_json::from_str(&stdout_of(cli(dir.path()).arg("show"))).unwrap();
    assert_eq!(state["householdName"], "A");
    assert_eq!(state["incomeAmount"].as_f64(), Some(2000.0));
}

#[test]
fn update_rejects_unknown_fields() {
    let dir = tempdir().unwrap();
    cli(dir.path())
        .args(["update", r#"{"houseName":"A"}"#])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn update_rejects_negative_income() {
    let dir = tempdir().unwrap();
    stdout_of(cli(dir.path()).args(["update", r#"{"incomeAmount":1500}"#]));

    let output = cli(dir.path())
        .args(["update", r#"{"incomeAmount":-5}"#])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("VALIDATION/PATCH"));

    let state: Value = serde_json::from_str(&stdout_of(cli(dir.path()).arg("show"))).unwrap();
    assert_eq!(state["incomeAmount"].as_f64(), Some(1500.0));
}

#[test]
fn preset_then_summary_lists_tips_in_order() {
    let dir = tempdir().unwrap();
    stdout_of(cli(dir.path()).args(["preset", "renting-kids-fulltime"]));

    let out = stdout_of(cli(dir.path()).args(["summary", "--json"]));
    let summary: Value = serde_json::from_str(&out).unwrap();
    let tips: Vec<&str> = summary["tips"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    let housing = tips
        .iter()
        .position(|t| t.starts_with("Housing tip"))
        .expect("housing tip");
    let family = tips
        .iter()
        .position(|t| t.starts_with("Family tip"))
        .expect("family tip");
    assert!(housing < family);
    assert_eq!(summary["monthlyIncome"].as_f64(), Some(4550.0));
}

#[test]
fn wizard_marks_household_onboarded() {
    let dir = tempdir().unwrap();
    let out = stdout_of(cli(dir.path()).args([
        "wizard",
        "--preset",
        "starter",
        "--household-name",
        "Maple House",
    ]));
    assert!(out.contains("Maple House"));

    let state: Value = serde_json::from_str(&stdout_of(cli(dir.path()).arg("show"))).unwrap();
    assert_eq!(state["onboarded"], true);
    assert_eq!(state["householdName"], "Maple House");
}

#[test]
fn wizard_without_answers_fails() {
    let dir = tempdir().unwrap();
    let output = cli(dir.path())
        .args(["wizard", "--household-name", "Solo"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("VALIDATION/WIZARD"));
}

#[test]
fn export_import_round_trip_between_data_dirs() {
    let source = tempdir().unwrap();
    let target = tempdir().unwrap();
    let exports = tempdir().unwrap();

    stdout_of(cli(source.path()).args(["preset", "couple-homeowner-retired"]));
    let out = stdout_of(
        cli(source.path())
            .arg("export")
            .arg("--out")
            .arg(exports.path()),
    );
    assert!(out.starts_with("Exported to "));

    let file = std::fs::read_dir(exports.path())
        .unwrap()
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .expect("export file");

    stdout_of(cli(target.path()).arg("import").arg(&file));

    let left: Value = serde_json::from_str(&stdout_of(cli(source.path()).arg("show"))).unwrap();
    let right: Value = serde_json::from_str(&stdout_of(cli(target.path()).arg("show"))).unwrap();
    assert_eq!(left, right);
}

#[test]
fn malformed_import_keeps_previous_state() {
    let dir = tempdir().unwrap();
    stdout_of(cli(dir.path()).args(["preset", "starter"]));
    let before = stdout_of(cli(dir.path()).arg("show"));

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{not json").unwrap();
    let output = cli(dir.path()).arg("import").arg(&bad).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("STATE/MALFORMED_PAYLOAD"));

    assert_eq!(stdout_of(cli(dir.path()).arg("show")), before);
}

#[test]
fn reset_restores_defaults() {
    let dir = tempdir().unwrap();
    stdout_of(cli(dir.path()).args(["preset", "starter"]));
    stdout_of(cli(dir.path()).arg("reset"));
    let state: Value = serde_json::from_str(&stdout_of(cli(dir.path()).arg("show"))).unwrap();
    assert_eq!(state["householdName"], "");
    assert_eq!(state["onboarded"], false);
}

#[test]
fn presets_lists_default_first() {
    let dir = tempdir().unwrap();
    let out = stdout_of(cli(dir.path()).arg("presets"));
    let first = out.lines().next().expect("at least one preset");
    assert!(first.starts_with("starter"));
    assert!(first.ends_with("(default)"));
    assert_eq!(out.lines().count(), 5);
}
