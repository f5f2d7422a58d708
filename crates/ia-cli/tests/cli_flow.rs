//! End-to-end tests driving the `ia` binary.
//!
//! Each test runs with `HOME` pointed at a temporary directory so the user's
//! own config and database are never touched.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn ia_binary() -> String {
    env!("CARGO_BIN_EXE_ia").to_string()
}

/// Builds an `ia` command isolated in `temp`, with the given API key.
fn ia(temp: &Path, api_key: Option<&str>) -> Command {
    let mut command = Command::new(ia_binary());
    command
        .env("HOME", temp)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("RUST_LOG")
        .env("IA_DATABASE_PATH", temp.join("ia.db"));
    match api_key {
        Some(key) => command.env("IA_API_KEY", key),
        None => command.env_remove("IA_API_KEY"),
    };
    command
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_gain_is_recorded_and_shown_in_status() {
    let temp = TempDir::new().unwrap();

    let output = ia(temp.path(), Some("key"))
        .args(["gain", "Gold", "25"])
        .output()
        .unwrap();
    assert!(output.status.success(), "gain failed: {}", stderr(&output));
    assert_eq!(stdout(&output), "Recorded gain stat 'Gold'.\n");

    let output = ia(temp.path(), None).arg("status").output().unwrap();
    assert!(output.status.success(), "status failed: {}", stderr(&output));
    let status = stdout(&output);
    assert!(status.contains("Sessions:"), "unexpected status: {status}");
    assert!(
        status.contains("1 submissions, 1 distinct stats (pending, needs 10)"),
        "unexpected status: {status}"
    );
}

#[test]
fn test_rejected_stat_exits_with_backend_message() {
    let temp = TempDir::new().unwrap();

    let output = ia(temp.path(), Some("key"))
        .args(["keyword", ""])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("keyword stat rejected (code 2): stat identifier cannot be empty"),
        "unexpected stderr: {}",
        stderr(&output)
    );

    let output = ia(temp.path(), None).arg("last-error").output().unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("stat identifier cannot be empty: keyword (code 2"));
}

#[test]
fn test_recording_requires_api_key() {
    let temp = TempDir::new().unwrap();

    let output = ia(temp.path(), None)
        .args(["loss", "Health", "5"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("no API key configured"));
}

#[test]
fn test_negative_values_and_custom_options() {
    let temp = TempDir::new().unwrap();

    let output = ia(temp.path(), Some("key"))
        .args([
            "custom",
            "Altitude",
            "-12.5",
            "--measurement",
            "feet",
            "--formula",
            "average",
            "--target",
            "Balloon",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "custom failed: {}", stderr(&output));

    let output = ia(temp.path(), Some("key"))
        .args(["gesture", "Pinch", "--kind", "double-tap"])
        .output()
        .unwrap();
    assert!(output.status.success(), "gesture failed: {}", stderr(&output));
}

#[test]
fn test_replay_from_stdin_reaches_accepted_session() {
    let temp = TempDir::new().unwrap();

    let mut script = String::new();
    for i in 0..10 {
        script.push_str(&format!(
            "{{\"at\": {i}, \"op\": \"gain\", \"identifier\": \"Stat{i}\", \"value\": 1}}\n"
        ));
    }
    script.push_str("{\"at\": 10, \"op\": \"gaze_on\", \"target\": \"Cube\"}\n");
    script.push_str("{\"at\": 12.5, \"op\": \"gaze_off\"}\n");

    let mut child = ia(temp.path(), Some("key"))
        .args(["replay", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "replay failed: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "Replayed 12 steps: 11 stats accepted, 0 rejected.\nSession accepted (11 distinct stats).\n"
    );
}

#[test]
fn test_replay_rejects_out_of_order_script() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("bad.jsonl");
    std::fs::write(
        &script,
        "{\"at\": 3, \"op\": \"hold_started\"}\n{\"at\": 1, \"op\": \"hold_complete\", \"identifier\": \"Grab\"}\n",
    )
    .unwrap();

    let output = ia(temp.path(), Some("key"))
        .arg("replay")
        .arg(&script)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("line 2: time 1 is earlier than the previous step (3)"));
}

#[test]
fn test_error_code_lookup() {
    let temp = TempDir::new().unwrap();

    let output = ia(temp.path(), None).args(["error", "4"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "4: enum ordinal is out of range\n");

    let output = ia(temp.path(), None).args(["error", "-3"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "-3: unrecognized status\n");
}
