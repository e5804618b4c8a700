use assert_cmd::Command;
use feedlm_core::{SessionState, Store};
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn get_feedlm_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("feedlm")
}

fn feedlm(home: &TempDir) -> Command {
    let mut cmd = Command::new(get_feedlm_bin());
    cmd.env("FEEDLM_HOME", home.path());
    cmd
}

fn leave_running_session(home: &TempDir) {
    let store = Store::new(home.path());
    let mut session = SessionState::started("https://notebooklm.google.com/notebook/abc", 3);
    session.record_success();
    session.set_message("Adding video 2 of 3: \"Second\"");
    store.save_session(&session).unwrap();
}

#[test]
fn test_status_without_session() {
    let home = TempDir::new().unwrap();

    feedlm(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No batch in progress"));
}

#[test]
fn test_status_shows_progress() {
    let home = TempDir::new().unwrap();
    leave_running_session(&home);

    feedlm(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("running"))
        .stdout(predicate::str::contains("1 of 3 added, 2 remaining"))
        .stdout(predicate::str::contains("Adding video 2 of 3"))
        .stdout(predicate::str::contains("feedlm status --clear"));
}

#[test]
fn test_status_json() {
    let home = TempDir::new().unwrap();
    leave_running_session(&home);

    feedlm(&home)
        .args(["status", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"running\": true"))
        .stdout(predicate::str::contains("\"processed\": 1"));
}

#[test]
fn test_running_session_locks_list() {
    let home = TempDir::new().unwrap();
    leave_running_session(&home);

    feedlm(&home)
        .args(["add", "https://www.youtube.com/watch?v=late"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already running"));

    feedlm(&home)
        .arg("clear")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already running"));
}

#[test]
fn test_status_clear_unlocks_list() {
    let home = TempDir::new().unwrap();
    leave_running_session(&home);

    feedlm(&home)
        .args(["status", "--clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Discarded"));

    feedlm(&home)
        .args(["add", "https://www.youtube.com/watch?v=late"])
        .assert()
        .success();
}

#[test]
fn test_status_with_overcounted_record() {
    let home = TempDir::new().unwrap();
    let mut session = SessionState::started("https://notebooklm.google.com/notebook/abc", 1);
    session.processed = 2;
    session.running = false;
    Store::new(home.path()).save_session(&session).unwrap();

    feedlm(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 of 1 added, 0 remaining"));
}
