//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;

/// Build command for the circuitguard-cli binary (finds it in target/debug when run via cargo test).
fn circuitguard_cli() -> Command {
    cargo_bin_cmd!("circuitguard-cli")
}

/// Path to circuitguard library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("circuitguard")
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_cli_help() {
    let mut cmd = circuitguard_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("NF C 15-100"));
}

#[test]
fn test_cli_version() {
    let mut cmd = circuitguard_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_check_compliant_file() {
    let mut cmd = circuitguard_cli();
    let path = fixtures_dir().join("compliant_flat.json");

    cmd.arg("check").arg(path).arg("--fail-on").arg("warning");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Status: COMPLIANT"));
}

#[test]
fn test_cli_check_non_compliant_without_fail_on() {
    let mut cmd = circuitguard_cli();
    let path = fixtures_dir().join("non_compliant_flat.json");

    cmd.arg("check").arg(path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("NON-COMPLIANT"))
        .stdout(predicate::str::contains("Missing: 3 sockets, 1 32A socket"));
}

#[test]
fn test_cli_check_with_fail_on_error() {
    let mut cmd = circuitguard_cli();
    let path = fixtures_dir().join("non_compliant_flat.json");

    cmd.arg("check").arg(path).arg("--fail-on").arg("error");

    cmd.assert().failure().code(1);
}

#[test]
fn test_cli_check_json_output() {
    let mut cmd = circuitguard_cli();
    let path = fixtures_dir().join("non_compliant_flat.json");

    cmd.arg("check").arg(path).arg("--format").arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(json["installation_id"], "flat-non-compliant");
    assert_eq!(json["global_compliance"]["overall_status"], "non_compliant");
    assert_eq!(json["room_results"][1]["missing_equipment"][0], "3 sockets");
}

#[test]
fn test_cli_github_format() {
    let mut cmd = circuitguard_cli();
    let path = fixtures_dir().join("non_compliant_flat.json");

    cmd.arg("check").arg(path).arg("--format").arg("github");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("::error file="))
        .stdout(predicate::str::contains("::warning file="))
        .stdout(predicate::str::contains("title=NFC-15-100-KITCHEN-001"));
}

#[test]
fn test_cli_full_rules_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garage.json");
    std::fs::write(
        &path,
        r#"{"installation_id": "garage", "rooms": [{"room_id": "g", "room_type": "Other"}]}"#,
    )
    .unwrap();

    circuitguard_cli()
        .arg("check")
        .arg(&path)
        .arg("--fail-on")
        .arg("error")
        .assert()
        .success();

    circuitguard_cli()
        .arg("check")
        .arg(&path)
        .arg("--full-rules")
        .arg("--fail-on")
        .arg("error")
        .assert()
        .failure()
        .stdout(predicate::str::contains("NFC-15-100-INSTALLATION-001"));
}

#[test]
fn test_cli_dimension_human() {
    let mut cmd = circuitguard_cli();
    let path = fixtures_dir().join("heated_house.json");

    cmd.arg("dimension").arg(path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Circuit breakers (10)"))
        .stdout(predicate::str::contains("Parafoudre Type 2"))
        .stdout(predicate::str::contains("Tableau électrique principal avec 13 modules"));
}

#[test]
fn test_cli_dimension_json_with_config() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    write!(config, r#"{{"breaker_type": "Type B"}}"#).unwrap();

    let mut cmd = circuitguard_cli();
    let path = fixtures_dir().join("compliant_flat.json");

    cmd.arg("--config")
        .arg(config.path())
        .arg("dimension")
        .arg(path)
        .arg("--format")
        .arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    let breakers = json["dimensioning"]["circuit_breakers"].as_array().unwrap();
    assert_eq!(breakers.len(), 8);
    assert!(breakers.iter().all(|b| b["type"] == "Type B"));
    assert_eq!(json["dimensioning"]["electrical_panels"][0]["modules"], 13);
    assert!(json["dimensioning"]["surge_protectors"].as_array().unwrap().is_empty());
    assert_eq!(json["installation_id"], "flat-compliant");
}

#[test]
fn test_cli_unreachable_matcher_reports_system_error() {
    let mut cmd = circuitguard_cli();
    let path = fixtures_dir().join("compliant_flat.json");

    cmd.arg("--matcher-url")
        .arg("http://127.0.0.1:9")
        .arg("check")
        .arg(path)
        .arg("--fail-on")
        .arg("error");

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("SYSTEM-ERROR"))
        .stdout(predicate::str::contains("Rule matcher error"));
}

#[test]
fn test_cli_check_nonexistent_file() {
    let mut cmd = circuitguard_cli();

    cmd.arg("check").arg("nonexistent.json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_rejects_negative_quantity() {
    let mut cmd = circuitguard_cli();
    let path = fixtures_dir().join("invalid_quantity.json");

    cmd.arg("check").arg(path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("JSON error"));
}

#[test]
fn test_cli_rejects_duplicate_rooms() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"installation_id": "dup", "rooms": [
            {{"room_id": "a", "room_type": "Bedroom"}},
            {{"room_id": "a", "room_type": "Office"}}
        ]}}"#
    )
    .unwrap();

    circuitguard_cli()
        .arg("dimension")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_cli_rejects_oversized_quantity() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"installation_id": "big", "rooms": [
            {{"room_id": "a", "room_type": "Bedroom",
              "equipment": [{{"equipment_type": "TripleSocket", "quantity": 4000000000}}]}}
        ]}}"#
    )
    .unwrap();

    circuitguard_cli()
        .arg("dimension")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"))
        .stderr(predicate::str::contains("limit is 1000"));
}

#[test]
fn test_cli_rules_command() {
    let mut cmd = circuitguard_cli();

    cmd.arg("rules");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("NFC-15-100-KITCHEN-001"))
        .stdout(predicate::str::contains("NFC-15-100-NETWORK-001"))
        .stdout(predicate::str::contains("severity").not());
}

#[test]
fn test_cli_rules_verbose() {
    let mut cmd = circuitguard_cli();

    cmd.arg("rules").arg("--verbose");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("severity: Warning"));
}

#[test]
fn test_cli_output_formats_are_different() {
    let path = fixtures_dir().join("non_compliant_flat.json");

    let human = circuitguard_cli()
        .arg("check")
        .arg(&path)
        .output()
        .unwrap();
    let json = circuitguard_cli()
        .arg("check")
        .arg(&path)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    assert_ne!(human.stdout, json.stdout);
}
