//! End-to-end tests driving the murmr binary.
//!
//! Each test gets its own data directory via XDG_DATA_HOME so runs are
//! isolated from the user's real log and from each other.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn murmr(data_dir: &Path, args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .env("XDG_DATA_HOME", data_dir)
        .env("XDG_CONFIG_HOME", data_dir)
        .env("HOME", data_dir)
        .output()
        .expect("failed to execute binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_status_on_fresh_install() {
    let dir = TempDir::new().unwrap();
    let output = murmr(dir.path(), &["status"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Streak: 0:00:0"), "unexpected output: {}", text);
    // Full onboarding flock before any session exists
    assert!(text.contains("Flock: 7200 birds"), "unexpected output: {}", text);
}

#[test]
fn test_log_session_resets_flock() {
    let dir = TempDir::new().unwrap();

    let log = murmr(dir.path(), &["log"]);
    assert!(log.status.success());
    assert!(stdout(&log).contains("Logged session"));

    let status = murmr(dir.path(), &["status"]);
    let text = stdout(&status);
    // Streak just restarted: one bird
    assert!(text.contains("Flock: 1 birds"), "unexpected output: {}", text);
}

#[test]
fn test_expense_validation_rejects_non_positive() {
    let dir = TempDir::new().unwrap();

    let output = murmr(dir.path(), &["expense", "0"]);
    assert!(!output.status.success());

    let output = murmr(dir.path(), &["expense", "-3.5"]);
    assert!(!output.status.success());

    // Nothing was recorded
    let list = murmr(dir.path(), &["expenses"]);
    assert!(stdout(&list).contains("No expenses logged yet"));
}

#[test]
fn test_backdated_entries_and_stats() {
    let dir = TempDir::new().unwrap();

    assert!(murmr(dir.path(), &["log", "--at", "2025-06-14 21:30"]).status.success());
    assert!(murmr(dir.path(), &["expense", "3.50", "--at", "2025-06-14 21:35"])
        .status
        .success());
    assert!(murmr(dir.path(), &["expense", "6.50", "--at", "2025-06-14 21:40", "--note", "pack"])
        .status
        .success());

    let sessions = murmr(dir.path(), &["sessions"]);
    assert!(stdout(&sessions).contains("(retroactive)"));

    let stats = murmr(dir.path(), &["stats", "--period", "yearly", "--json"]);
    assert!(stats.status.success());
    let payload: serde_json::Value = serde_json::from_str(&stdout(&stats)).unwrap();
    assert_eq!(payload["periodLabel"], "This Year");
    assert_eq!(payload["chartData"]["labels"].as_array().unwrap().len(), 12);
}

#[test]
fn test_future_backdate_rejected() {
    let dir = TempDir::new().unwrap();
    let output = murmr(dir.path(), &["log", "--at", "2099-01-01 00:00"]);
    assert!(!output.status.success());

    let sessions = murmr(dir.path(), &["sessions"]);
    assert!(stdout(&sessions).contains("No sessions logged yet"));
}

#[test]
fn test_export_import_round_trip() {
    let source = TempDir::new().unwrap();
    assert!(murmr(source.path(), &["log", "--at", "2025-06-14 21:30"]).status.success());
    assert!(murmr(source.path(), &["expense", "9.99", "--at", "2025-06-14 22:00"])
        .status
        .success());

    let export = murmr(source.path(), &["export"]);
    assert!(export.status.success());
    let blob_path = source.path().join("export.json");
    std::fs::write(&blob_path, stdout(&export)).unwrap();

    let target = TempDir::new().unwrap();
    let import = murmr(target.path(), &["import", blob_path.to_str().unwrap()]);
    assert!(import.status.success());
    assert!(stdout(&import).contains("Imported 1 sessions, 1 expenses"));

    let expenses = murmr(target.path(), &["expenses"]);
    assert!(stdout(&expenses).contains("$9.99"));
}

#[test]
fn test_delete_unknown_id_is_noop() {
    let dir = TempDir::new().unwrap();
    assert!(murmr(dir.path(), &["log"]).status.success());

    let output = murmr(dir.path(), &["delete-session", "42"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("nothing changed"));
}

#[test]
fn test_clear_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    assert!(murmr(dir.path(), &["log"]).status.success());

    // Without --yes nothing happens
    let refused = murmr(dir.path(), &["clear"]);
    assert!(refused.status.success());
    assert!(stdout(&refused).contains("--yes"));
    assert!(!stdout(&murmr(dir.path(), &["sessions"])).contains("No sessions"));

    let cleared = murmr(dir.path(), &["clear", "--yes"]);
    assert!(cleared.status.success());
    assert!(stdout(&murmr(dir.path(), &["sessions"])).contains("No sessions logged yet"));
}
