//! Integration tests for the lifegrid binary.

use assert_cmd::cargo::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn lifegrid() -> Command {
    let mut cmd = Command::new(cargo_bin("lifegrid"));
    for var in [
        "LIFEGRID_BIRTH_DATE",
        "LIFEGRID_SEX",
        "LIFEGRID_VIEW",
        "LIFEGRID_TABLE",
        "LIFEGRID_OUTPUT_DIR",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn writes_dark_and_light_svg() {
    let dir = tempfile::tempdir().unwrap();

    lifegrid()
        .args(["--birth-date", "1992-06-14", "--sex", "male", "--now", "2025-11-10"])
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .success();

    let dark = std::fs::read_to_string(dir.path().join("dark_mode.svg")).unwrap();
    let light = std::fs::read_to_string(dir.path().join("light_mode.svg")).unwrap();
    assert!(dark.starts_with("<?xml"));
    assert!(dark.contains("Age 33"));
    assert!(light.contains("(Current week)"));
}

#[test]
fn json_output_carries_estimate_and_grid() {
    let output = lifegrid()
        .args([
            "--birth-date",
            "2000-01-01",
            "--sex",
            "female",
            "--now",
            "2025-11-10",
            "--view",
            "years",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["estimate"]["current_age"], 25);
    assert_eq!(doc["estimate"]["total_lifespan_years"], 85.0);
    assert_eq!(doc["grid"]["view"], "years");
    assert_eq!(doc["grid"]["rows"].as_array().unwrap().len(), 9);
    assert_eq!(doc["grid"]["rows"][2]["buckets"][5]["state"], "present");
    assert_eq!(doc["grid"]["rows"][0]["buckets"][0]["stage"], "infancy");
}

#[test]
fn custom_table_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("table.json");
    std::fs::write(&table, r#"{ "male": { "0": 50.0 }, "female": { "0": 60.0 } }"#).unwrap();

    lifegrid()
        .env("LIFEGRID_TABLE", &table)
        .args(["--birth-date", "2000-01-01", "--sex", "male", "--now", "2025-11-10"])
        .args(["--format", "json", "--view", "months"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"remaining_years\": 50.0"));
}

#[test]
fn table_without_floor_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("table.json");
    std::fs::write(&table, r#"{ "male": { "10": 50.0 } }"#).unwrap();

    lifegrid()
        .arg("--table")
        .arg(&table)
        .args(["--birth-date", "2000-01-01", "--sex", "male", "--format", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading expectancy table"));
}

#[test]
fn missing_sex_in_table_is_a_user_error() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("table.json");
    std::fs::write(&table, r#"{ "male": { "0": 50.0 } }"#).unwrap();

    lifegrid()
        .arg("--table")
        .arg(&table)
        .args(["--birth-date", "2000-01-01", "--sex", "female", "--format", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Could not retrieve life expectancy data",
        ));
}

#[test]
fn future_birth_date_is_rejected() {
    lifegrid()
        .args(["--birth-date", "2030-01-01", "--sex", "male", "--now", "2025-11-10"])
        .args(["--format", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("valid birth date in the past"));
}

#[test]
fn unknown_sex_is_rejected_by_the_parser() {
    lifegrid()
        .args(["--birth-date", "2000-01-01", "--sex", "nonbinary"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown sex"));
}
