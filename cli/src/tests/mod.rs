
use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn cli_no_subcommand() {
    Command::cargo_bin("bp").unwrap().assert().failure();
}

#[test]
fn cli_config_file() {
    Command::cargo_bin("bp")
        .unwrap()
        .arg("--config=src/tests/testdata/config.toml")
        .arg("dfa")
        .arg("01")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph automaton {"));
}

#[test]
fn cli_invalid_config_file() {
    Command::cargo_bin("bp")
        .unwrap()
        .arg("--config=src/tests/testdata/invalid.toml")
        .arg("dfa")
        .arg("01")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "error: invalid config file `src/tests/testdata/invalid.toml`",
        ));
}

#[test]
fn cli_missing_config_file() {
    Command::cargo_bin("bp")
        .unwrap()
        .arg("--config=src/tests/testdata/missing.toml")
        .arg("dfa")
        .arg("01")
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}
