//! End-to-end tests for the `sf-toolbox completions` command.

mod common;
use common::prelude::*;

#[test]
fn test_completions_help() {
    cargo_bin_cmd!("sf-toolbox")
        .args(["completions", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generate shell completion scripts"))
        .stdout(predicate::str::contains("bash"))
        .stdout(predicate::str::contains("zsh"))
        .stdout(predicate::str::contains("fish"))
        .stdout(predicate::str::contains("powershell"))
        .stdout(predicate::str::contains("elvish"));
}

#[test]
fn test_completions_bash() {
    cargo_bin_cmd!("sf-toolbox")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_sf-toolbox()"))
        .stdout(predicate::str::contains("profiles"))
        .stdout(predicate::str::contains("translations"))
        .stdout(predicate::str::contains("init-config"));
}

#[test]
fn test_completions_zsh() {
    cargo_bin_cmd!("sf-toolbox")
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#compdef sf-toolbox"))
        .stdout(predicate::str::contains("--target-org"));
}

#[test]
fn test_completions_fish() {
    cargo_bin_cmd!("sf-toolbox")
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete -c sf-toolbox"));
}

#[test]
fn test_completions_invalid_shell() {
    cargo_bin_cmd!("sf-toolbox")
        .args(["completions", "tcsh"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}
