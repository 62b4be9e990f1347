//! CLI tests driving the compiled binary against a temp storage root.
//! The binary records history through git, so every test bails out when
//! git is not installed.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn pastez(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pastez").unwrap();
    cmd.env("PASTEZ_ROOT", root);
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Runs `new` and returns the short id printed on the first line.
fn create_paste(root: &Path, extra: &[&str]) -> String {
    let output = pastez(root)
        .arg("new")
        .args(extra)
        .output()
        .unwrap();
    assert!(output.status.success(), "new failed: {:?}", output);
    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout.split_whitespace().next().unwrap().to_string()
}

/// Digs the generated private key out of `new --private` output.
fn private_key_from(output: &str) -> String {
    output
        .lines()
        .find(|line| line.contains("private key:"))
        .and_then(|line| line.split_whitespace().last())
        .unwrap()
        .to_string()
}

#[test]
fn test_new_and_list() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().unwrap();

    pastez(temp.path())
        .args(["new", "my snippets", "--owner", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("my snippets"));

    pastez(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("my snippets"))
        .stdout(predicate::str::contains("alice"));
}

#[test]
fn test_list_with_no_pastes() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().unwrap();

    pastez(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No pastes found."));
}

#[test]
fn test_add_files_and_cat() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let id = create_paste(temp.path(), &["shared bits"]);

    pastez(temp.path())
        .args(["add", &id, "a.txt", "hello world"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Adds a.txt"));

    pastez(temp.path())
        .args(["files", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt"));

    pastez(temp.path())
        .args(["cat", &id, "a.txt"])
        .assert()
        .success()
        .stdout(predicate::eq("hello world"));
}

#[test]
fn test_add_reads_stdin_when_content_omitted() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let id = create_paste(temp.path(), &["piped"]);

    pastez(temp.path())
        .args(["add", &id, "piped.txt"])
        .write_stdin("from stdin\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Adds piped.txt"));

    pastez(temp.path())
        .args(["cat", &id, "piped.txt"])
        .assert()
        .success()
        .stdout(predicate::eq("from stdin\n"));
}

#[test]
fn test_overwrite_reports_update() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let id = create_paste(temp.path(), &["edited"]);

    pastez(temp.path())
        .args(["add", &id, "a.txt", "one"])
        .assert()
        .success();
    pastez(temp.path())
        .args(["add", &id, "a.txt", "two"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updates a.txt"));

    pastez(temp.path())
        .args(["log", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Adds a.txt"))
        .stdout(predicate::str::contains("Updates a.txt"));
}

#[test]
fn test_remove_missing_file_fails() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let id = create_paste(temp.path(), &["strict"]);

    pastez(temp.path())
        .args(["rm", &id, "ghost.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_unknown_paste_reference_fails() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().unwrap();

    pastez(temp.path())
        .args(["files", "deadbeef"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Paste not found"));
}

#[test]
fn test_private_paste_is_gated_by_key() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().unwrap();

    let output = pastez(temp.path())
        .args(["new", "secret stuff", "--private", "--owner", "alice"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let id = stdout.split_whitespace().next().unwrap().to_string();
    let key = private_key_from(&stdout);

    // No credentials: denied.
    pastez(temp.path())
        .args(["files", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Access denied"));

    // The key opens it.
    pastez(temp.path())
        .args(["files", &id, "--key", &key])
        .assert()
        .success();

    // So does acting as the owner.
    pastez(temp.path())
        .args(["files", &id, "--owner", "alice"])
        .assert()
        .success();
}

#[test]
fn test_private_paste_hidden_from_list() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    create_paste(temp.path(), &["public note", "--owner", "alice"]);
    create_paste(temp.path(), &["hidden note", "--private", "--owner", "alice"]);

    pastez(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("public note"))
        .stdout(predicate::str::contains("hidden note").not());

    pastez(temp.path())
        .args(["list", "--owner", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hidden note"));
}

#[test]
fn test_fork_via_cli() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let id = create_paste(temp.path(), &["origin", "--owner", "alice"]);

    pastez(temp.path())
        .args(["add", &id, "a.txt", "alpha"])
        .assert()
        .success();

    pastez(temp.path())
        .args(["fork", &id, "--owner", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Forked"));

    let output = pastez(temp.path()).arg("list").output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.matches("origin").count(), 2);
    assert!(stdout.contains("bob"));
}

#[test]
fn test_status_via_cli() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let id = create_paste(temp.path(), &["clean"]);

    pastez(temp.path())
        .args(["add", &id, "a.txt", "x"])
        .assert()
        .success();

    pastez(temp.path())
        .args(["status", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("working tree clean"));
}
