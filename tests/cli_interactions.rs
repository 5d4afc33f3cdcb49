//! CLI options interaction tests
//!
//! These drive the built binary. Nothing here runs a real diagnostic probe:
//! the only sequence exercised end to end is maintenance on unix-like hosts,
//! where every probe is reported as skipped.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Command isolated from any .env file and inherited configuration
fn create_test_cmd(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("uniserve-diag").unwrap();
    cmd.current_dir(workdir.path())
        .env_remove("DIAG_OUTPUT_DIR")
        .env_remove("ENABLE_COLOR")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help_lists_options() {
    let workdir = TempDir::new().unwrap();
    create_test_cmd(&workdir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--ui"))
        .stdout(predicate::str::contains("--maintenance"))
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("--output-dir"));
}

#[test]
fn test_version_flag() {
    let workdir = TempDir::new().unwrap();
    create_test_cmd(&workdir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_invalid_mode_is_rejected() {
    let workdir = TempDir::new().unwrap();
    create_test_cmd(&workdir)
        .args(["--mode", "thorough"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid mode 'thorough'"));
}

#[test]
fn test_conflicting_color_flags() {
    let workdir = TempDir::new().unwrap();
    create_test_cmd(&workdir)
        .args(["--color", "--no-color"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--color and --no-color"));
}

#[test]
fn test_ui_and_maintenance_conflict() {
    let workdir = TempDir::new().unwrap();
    create_test_cmd(&workdir)
        .args(["--ui", "--maintenance"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--maintenance"));
}

#[test]
fn test_output_dir_that_is_a_file() {
    let workdir = TempDir::new().unwrap();
    let file = workdir.path().join("report.txt");
    fs::write(&file, "not a directory").unwrap();

    create_test_cmd(&workdir)
        .args(["--maintenance", "--output-dir"])
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_invalid_env_value() {
    let workdir = TempDir::new().unwrap();
    create_test_cmd(&workdir)
        .env("ENABLE_COLOR", "maybe")
        .arg("--maintenance")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ENABLE_COLOR"))
        .stderr(predicate::str::contains("Supported Environment Variables"));
}

#[test]
fn test_ui_quits_on_q() {
    let workdir = TempDir::new().unwrap();
    create_test_cmd(&workdir)
        .arg("--ui")
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to the Uniserve Data Collection Tool"))
        .stdout(predicate::str::contains("1) Quick Test"))
        .stdout(predicate::str::contains("2) Full Test"));

    // Nothing was run, so nothing was written
    assert_eq!(fs::read_dir(workdir.path()).unwrap().count(), 0);
}

#[cfg(unix)]
#[test]
fn test_maintenance_on_unix_writes_skip_report() {
    let workdir = TempDir::new().unwrap();
    let reports = TempDir::new().unwrap();

    create_test_cmd(&workdir)
        .arg("--maintenance")
        .arg("--output-dir")
        .arg(reports.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Testing is complete"))
        .stdout(predicate::str::contains("Uniserve_Maintenance_"));

    let entries: Vec<_> = fs::read_dir(reports.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1);

    let name = entries[0].file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("Uniserve_Maintenance_"));
    assert!(name.ends_with(".log"));

    let content = fs::read_to_string(&entries[0]).unwrap();
    let (header, body) = content.split_once("\n\n").unwrap();
    assert!(name.contains(header));
    assert!(body.starts_with("\nRelease command skipped"));
    assert!(body.contains("DNS registration command skipped"));
}

#[cfg(unix)]
#[test]
fn test_maintenance_report_failure_sets_exit_code() {
    let workdir = TempDir::new().unwrap();

    create_test_cmd(&workdir)
        .args(["--maintenance", "--output-dir", "no/such/dir"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("no/such/dir"))
        .stdout(predicate::str::contains("Testing is complete").not());
}
