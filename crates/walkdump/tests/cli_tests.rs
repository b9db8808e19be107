use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const TS_A: &str = "2014-09-18T09:44:27.146812";
const TS_B: &str = "2014-09-18T10:05:39.040744";

fn line(ts: &str, message: &str) -> String {
    format!("[----] I, [{ts} #2483:3fe8d6c33e64]  INFO -- : <AEMethod object_walker> {message}\n")
}

fn write_log(dir: &TempDir) -> std::path::PathBuf {
    let mut log = String::new();
    log.push_str(&line(TS_A, "object_walker#AAAA0001:   Object Walker 1.9 Starting"));
    log.push_str(&line(TS_A, "object_walker#AAAA0001:[0] --- walking $evm.root ---"));
    log.push_str(&line(TS_A, "object_walker#AAAA0001:[1] $evm.root['vm'].name = web01"));
    log.push_str(&line(TS_A, "object_walker#AAAA0001:   Object Walker Complete"));
    log.push_str(&line(TS_B, "object_walker#BBBB0002:   Object Walker 1.9 Starting"));
    log.push_str(&line(TS_B, "object_walker#BBBB0002:[0] --- walking $evm.root ---"));
    log.push_str(&line(TS_B, "object_walker#BBBB0002:[1] $evm.root['vm'].name = web02"));
    log.push_str(&line(TS_B, "object_walker#BBBB0002:   Object Walker Complete"));

    let path = dir.path().join("automation.log");
    fs::write(&path, log).unwrap();
    path
}

/// Run the binary with an empty config file so the user's own config never leaks in.
fn walkdump(dir: &TempDir, args: &[&str]) -> Output {
    let config = dir.path().join("config.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }
    Command::new(env!("CARGO_BIN_EXE_walkdump"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_list_prints_every_dump() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir);

    let output = walkdump(&dir, &["-l", "-f", path_arg(&log)]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        format!("Found object_walker dump at {TS_A}\nFound object_walker dump at {TS_B}\n")
    );
}

#[test]
fn test_list_empty_file() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("empty.log");
    fs::write(&log, "").unwrap();

    let output = walkdump(&dir, &["--list", "--file", path_arg(&log)]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_default_prints_latest_dump() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir);

    let output = walkdump(&dir, &["-f", path_arg(&log)]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "Object Walker 1.9 Starting\n     --- walking $evm.root ---\n     |    $evm.root['vm'].name = web02\nObject Walker Complete\n"
    );
}

#[test]
fn test_timestamp_selects_dump() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir);

    let output = walkdump(&dir, &["-t", TS_A, "-f", path_arg(&log)]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("web01"));
    assert!(!stdout.contains("web02"));
}

#[test]
fn test_unknown_timestamp_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir);

    let output = walkdump(&dir, &["-t", "2001-01-01T00:00:00.000000", "-f", path_arg(&log)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("2001-01-01T00:00:00.000000"));
    assert_eq!(stderr.trim_end().lines().count(), 1);
}

#[test]
fn test_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.log");

    let output = walkdump(&dir, &["-f", path_arg(&missing)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr)
        .unwrap()
        .contains("Error opening log file"));
}

#[test]
fn test_usage_error_before_file_access() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.log");

    let output = walkdump(&dir, &["-l", "-t", TS_A, "-f", path_arg(&missing)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(!String::from_utf8(output.stderr)
        .unwrap()
        .contains("Error opening log file"));
}

#[test]
fn test_diff_two_dumps() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir);
    let pair = format!("{TS_A},{TS_B}");

    let output = walkdump(&dir, &["-d", pair.as_str(), "-f", path_arg(&log)]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with(&format!("--- {TS_A}\n+++ {TS_B}\n")));
    assert!(stdout.contains("-     |    $evm.root['vm'].name = web01\n"));
    assert!(stdout.contains("+     |    $evm.root['vm'].name = web02\n"));
}

#[test]
fn test_diff_same_dump_is_empty() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir);
    let pair = format!("{TS_A},{TS_A}");

    let output = walkdump(&dir, &["--diff", pair.as_str(), "-f", path_arg(&log)]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_diff_requires_two_timestamps() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir);

    let output = walkdump(&dir, &["--diff", TS_A, "-f", path_arg(&log)]);
    assert_eq!(output.status.code(), Some(2));
}
