// ABOUTME: Integration tests for the podgate CLI commands.
// ABOUTME: Validates --help output, init behavior and start-up failures.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn podgate_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("podgate"))
}

#[test]
fn help_shows_commands() {
    podgate_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn serve_help_shows_listen() {
    podgate_cmd()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--listen"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("podgate.yml");

    podgate_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("port_pairing"), "template should document port pairing");
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("podgate.yml"), "listen: 127.0.0.1:1\n").unwrap();

    podgate_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn broken_config_fails_with_error_prefix() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("podgate.yml"), "listen: [not, an, address]\n").unwrap();

    podgate_cmd()
        .current_dir(temp_dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn missing_explicit_socket_fails_check() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("podgate.yml"),
        "engine:\n  socket: /nonexistent/podgate.sock\n",
    )
    .unwrap();

    podgate_cmd()
        .current_dir(temp_dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/podgate.sock"))
        .stderr(predicate::str::contains("Hint: engine.socket"));
}
