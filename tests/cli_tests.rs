//! End-to-end tests for the `doccache` binary.
//!
//! Each test points the binary at its own temporary cache root.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn doccache(root: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("doccache").unwrap();
    cmd.env("DOCCACHE_ROOT", root.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_write_check_and_query_scenario() {
    let root = TempDir::new().unwrap();

    doccache(&root)
        .args(["write", "/x/y"])
        .write_stdin("line1\nfoo\nline3\nline4\nline5\nbar\nline7\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("CACHED: "));

    doccache(&root)
        .args(["check", "/x/y"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("HIT: Found cache ("))
        .stdout(predicate::str::contains("SOURCE: Context7 (Cached)\n---CACHED-CONTENT---\nline1\n"));

    doccache(&root)
        .args(["query", "/x/y", "foo"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "QUERY HIT: Found 1 relevant sections in /x/y",
        ))
        .stdout(predicate::str::ends_with(
            "---CACHED-CONTENT---\nline1\nfoo\nline3\nline4\nline5\n",
        ));

    doccache(&root)
        .args(["query", "/x/y", "zzz"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "QUERY MISS: No relevant content found for 'zzz' in /x/y",
        ));
}

#[test]
fn test_write_empty_stdin_fails() {
    let root = TempDir::new().unwrap();

    doccache(&root)
        .args(["write", "/x/y"])
        .write_stdin("")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "ERROR: No documentation provided via stdin",
        ));

    assert!(!root.path().join("library").exists());
}

#[test]
fn test_check_miss_exits_zero() {
    let root = TempDir::new().unwrap();

    doccache(&root)
        .args(["check", "/never/cached"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("MISS: No cache found at "));
}

#[test]
fn test_missing_arguments_fail() {
    let root = TempDir::new().unwrap();

    doccache(&root).arg("check").assert().failure();
    doccache(&root).args(["query", "/x/y"]).assert().failure();
    doccache(&root).arg("frobnicate").assert().failure();
}

#[test]
fn test_query_mode_write_and_check() {
    let root = TempDir::new().unwrap();

    doccache(&root)
        .args(["--mode", "query", "write", "how to use react hooks", "WebSearch"])
        .write_stdin("useState and useEffect")
        .assert()
        .success();

    doccache(&root)
        .args(["--mode", "query", "check", "how to use react hooks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SOURCE: WebSearch (Cached)"))
        .stdout(predicate::str::contains("useState and useEffect"));

    assert!(root
        .path()
        .join("query")
        .join("how_to_use_react_hooks")
        .is_dir());
}

#[test]
fn test_expired_entry_is_evicted_on_check() {
    let root = TempDir::new().unwrap();

    doccache(&root)
        .args(["--ttl", "0", "write", "short-lived"])
        .write_stdin("gone soon")
        .assert()
        .success();

    std::thread::sleep(std::time::Duration::from_millis(2100));

    doccache(&root)
        .args(["check", "short-lived"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("EXPIRED: Cache expired at "));

    assert!(!root.path().join("library").join("short-lived").exists());
}

#[test]
fn test_sweep_command() {
    let root = TempDir::new().unwrap();

    doccache(&root)
        .args(["--ttl", "0", "write", "old"])
        .write_stdin("old docs")
        .assert()
        .success();
    doccache(&root)
        .args(["write", "new"])
        .write_stdin("new docs")
        .assert()
        .success();

    std::thread::sleep(std::time::Duration::from_millis(2100));

    doccache(&root)
        .arg("sweep")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("SWEPT: 1 expired entries removed"));

    assert!(!root.path().join("library").join("old").exists());
    assert!(root.path().join("library").join("new").exists());
}
