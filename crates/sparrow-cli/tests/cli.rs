// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Integration tests driving the `sparrow` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn sparrow(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sparrow"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run sparrow")
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path.to_str().expect("utf-8 path").to_string()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn check_clean_file_succeeds() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file = write(
        dir.path(),
        "ok.swift",
        "var count: Int = 0 {\n  didSet { print(count) }\n}\n",
    );

    let output = sparrow(&["check", &file]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Checked 1 file: no errors"));
}

#[test]
fn check_reports_errors_and_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file = write(dir.path(), "bad.swift", "var x = 0 { willSet { } 42 }\n");

    let output = sparrow(&["check", &file]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("1 error"));
    assert!(stderr(&output).contains("unexpected code '42'"));
}

#[test]
fn check_walks_directories_and_emits_json() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(dir.path(), "a.swift", "let a = 1\n");
    fs::create_dir(dir.path().join("sub")).expect("create dir");
    write(&dir.path().join("sub"), "b.swift", "#endif\n");
    write(dir.path(), "readme.md", "not swift");

    let root = dir.path().to_str().expect("utf-8 path");
    let output = sparrow(&["check", root, "--format", "json"]);
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid json");
    let files = json.as_array().expect("array of files");
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["errors"].as_array().map(Vec::len), Some(0));
    assert_eq!(files[1]["errors"][0]["kind"], "misplaced_directive");
    assert_eq!(files[1]["errors"][0]["start"], 0);
}

#[test]
fn max_depth_flag_limits_nesting() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file = write(dir.path(), "deep.swift", "var x: A<A<A<Int>>>\n");

    assert!(sparrow(&["check", &file]).status.success());

    let output = sparrow(&["check", &file, "--max-depth", "2", "--format", "json"]);
    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid json");
    assert_eq!(json[0]["errors"][0]["kind"], "nesting_too_deep");
}

#[test]
fn directive_recovery_flag() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file = write(
        dir.path(),
        "attrs.swift",
        "#if DEBUG\n@inlinable\n#endif\nfunc f() {}\n",
    );

    let with = sparrow(&["check", &file, "--format", "json"]);
    let without = sparrow(&["check", &file, "--format", "json", "--no-directive-recovery"]);
    assert!(with.status.success());
    assert!(without.status.success());

    let items = |output: &Output| {
        let json: serde_json::Value = serde_json::from_str(&stdout(output)).expect("valid json");
        json[0]["items"].as_u64()
    };
    assert_eq!(items(&with), Some(2));
    assert_eq!(items(&without), Some(2));
}

#[test]
fn tokens_prints_lexemes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file = write(dir.path(), "t.swift", "let x: Array<Int>\n");

    let output = sparrow(&["tokens", &file]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert_eq!(text.lines().count(), 7);
    assert!(text.lines().next().is_some_and(|line| line.contains("keyword")));

    let output = sparrow(&["tokens", &file, "--format", "json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid json");
    assert_eq!(json[3]["text"], "Array");
    assert_eq!(json[6]["kind"], "postfix_operator");
}

#[test]
fn roundtrip_accepts_broken_input() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file = write(
        dir.path(),
        "broken.swift",
        "struct S {\n  var x: Array<Array<Int>> = [] {\n  ) junk\n",
    );

    let output = sparrow(&["roundtrip", &file]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains(": ok ("));
}

#[test]
fn missing_file_fails_cleanly() {
    let output = sparrow(&["roundtrip", "/nonexistent/file.swift"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to read"));
}
