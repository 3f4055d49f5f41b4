use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn scan_quiet_suppresses_text_output() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("a.js"), "require('./b');\n").unwrap();
    fs::write(root.join("b.js"), "").unwrap();

    let mut cmd_no_quiet = Command::cargo_bin("depgraph-scanner").unwrap();
    cmd_no_quiet.arg("scan").arg("--path").arg(root);
    cmd_no_quiet.assert().success().stdout(predicate::str::contains("Scanned 2 files"));

    let mut cmd_quiet = Command::cargo_bin("depgraph-scanner").unwrap();
    cmd_quiet.arg("-q").arg("scan").arg("--path").arg(root);
    cmd_quiet.assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn quiet_still_prints_requested_json() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.js"), "").unwrap();

    let mut cmd = Command::cargo_bin("depgraph-scanner").unwrap();
    cmd.arg("scan").arg("-q").arg("--path").arg(dir.path()).arg("--format").arg("json");
    cmd.assert().success().stdout(predicate::str::contains("\"a.js\""));
}
