//! Integration tests for the `cfgchain` binary.
//! These tests exercise flags that exit before any cluster is contacted.
#![allow(deprecated)] // cargo_bin is deprecated only for custom build-dirs; standard builds are fine.

use assert_cmd::Command;
use predicates::prelude::*;

fn cfgchain(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("cfgchain").unwrap();
    // Keep a developer's own config file out of the run.
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

// ── --help ────────────────────────────────────────────────────────────────────

#[test]
fn help_flag() {
    let home = tempfile::tempdir().unwrap();
    cfgchain(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Show which workloads consume each ConfigMap and Secret key",
        ))
        .stdout(predicate::str::contains("--namespace"))
        .stdout(predicate::str::contains("--kubeconfig"))
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--config-name"))
        .stdout(predicate::str::contains("--simplify"));
}

// ── --version ─────────────────────────────────────────────────────────────────

#[test]
fn version_flag() {
    let home = tempfile::tempdir().unwrap();
    cfgchain(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cfgchain"));
}

// ── --completions / --mangen ──────────────────────────────────────────────────

#[test]
fn completions_bash() {
    let home = tempfile::tempdir().unwrap();
    cfgchain(home.path())
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn mangen_flag() {
    let home = tempfile::tempdir().unwrap();
    cfgchain(home.path())
        .arg("--mangen")
        .assert()
        .success()
        .stdout(predicate::str::contains("cfgchain"));
}

// ── Configuration errors (fatal before cluster access) ────────────────────────

#[test]
fn unknown_format_fails() {
    let home = tempfile::tempdir().unwrap();
    cfgchain(home.path())
        .args(["--format", "xml"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn invalid_name_filter_fails() {
    let home = tempfile::tempdir().unwrap();
    cfgchain(home.path())
        .args(["--config-name", "([unclosed"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid name filter"));
}

#[test]
fn missing_config_file_fails() {
    let home = tempfile::tempdir().unwrap();
    let absent = home.path().join("nope.toml");
    cfgchain(home.path())
        .arg("--config")
        .arg(&absent)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn unknown_format_in_config_file_fails() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("cfgchain.toml");
    std::fs::write(&path, "format = \"xml\"\n").unwrap();
    cfgchain(home.path())
        .arg("--config")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such format: xml"));
}
