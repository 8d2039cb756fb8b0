use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .to_string()
}

#[test]
fn config_hash_prints_hash_and_canonical_json() {
    Command::cargo_bin("bgp")
        .unwrap()
        .arg("config-hash")
        .arg(fixture("base.yaml"))
        .arg(fixture("fast.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::is_match("config_hash=[0-9a-f]{64}").unwrap())
        .stdout(predicate::str::contains("\"window_days\":2"));
}

#[test]
fn config_hash_is_stable_across_invocations() {
    let run = || {
        let out = Command::cargo_bin("bgp")
            .unwrap()
            .arg("config-hash")
            .arg(fixture("base.yaml"))
            .output()
            .unwrap();
        assert!(out.status.success());
        String::from_utf8(out.stdout).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn config_hash_refuses_secret_literals() {
    Command::cargo_bin("bgp")
        .unwrap()
        .arg("config-hash")
        .arg(fixture("secret_literal.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIG_SECRET_DETECTED"))
        .stderr(predicate::str::contains("hunter2").not());
}
