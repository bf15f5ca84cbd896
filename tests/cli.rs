//! End-to-end tests for the pagesentinel binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

const ENV_VARS: &[&str] = &[
    "PAGESENTINEL_CONFIG",
    "SENTINEL_TABLE",
    "WEBPAGE_URI",
    "SENTINEL_SELECTOR",
    "SENTINEL_DB",
    "SLACK_URL",
    "SLACK_CHANNEL",
    "SLACK_USERNAME",
    "SLACK_AVATAR",
    "SLACK_ACTION_URL",
    "SLACK_ACTION_TEXT",
];

/// Command with a clean configuration environment and a private database
fn sentinel(db_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pagesentinel").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("SENTINEL_DB", db_dir.join("sentinel.db"));
    cmd
}

fn with_slack(cmd: &mut Command) -> &mut Command {
    cmd.env("SLACK_URL", "https://hooks.slack.com/services/T000/B000/SECRET")
        .env("SLACK_CHANNEL", "#alerts")
        .env("SLACK_USERNAME", "pagesentinel")
        .env("SLACK_AVATAR", "https://example.com/avatar.png")
}

#[test]
fn test_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    sentinel(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("forget"));
}

#[test]
fn test_check_without_page_fails() {
    let dir = tempfile::tempdir().unwrap();
    sentinel(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("WEBPAGE_URI"));
}

#[test]
fn test_check_unreachable_page_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = sentinel(dir.path());
    with_slack(&mut cmd)
        .env("WEBPAGE_URI", "http://127.0.0.1:9/")
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Check failed"));
}

#[test]
fn test_status_on_empty_database() {
    let dir = tempfile::tempdir().unwrap();
    sentinel(dir.path())
        .args(["status", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No fingerprints stored."));

    sentinel(dir.path())
        .args(["-o", "json", "status", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[]"));
}

#[test]
fn test_forget_unknown_uri() {
    let dir = tempfile::tempdir().unwrap();
    sentinel(dir.path())
        .args(["forget", "https://example.com/tour"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No fingerprint stored"));
}

#[test]
fn test_config_masks_webhook() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = sentinel(dir.path());
    with_slack(&mut cmd)
        .env("WEBPAGE_URI", "https://example.com/tour")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://hooks.slack.com/***"))
        .stdout(predicate::str::contains("div.thb-text"))
        .stdout(predicate::str::contains("SECRET").not());
}

#[test]
fn test_config_file_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pagesentinel.toml");
    std::fs::write(
        &path,
        "webpage_uri = \"https://example.com/from-file\"\nselector = \"main\"\n",
    )
    .unwrap();

    sentinel(dir.path())
        .arg("--config")
        .arg(&path)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://example.com/from-file"))
        .stdout(predicate::str::contains("Selector: main"));
}
