//! Integration tests for the webui-replay CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Isolated directory with its own config file
struct TestEnv {
    temp_dir: TempDir,
    config_path: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
[router]
origin = "chrome://password-manager/"
initial_path = "/passwords"

[events]
capacity = 64

[logging]
level = "error"
"#,
        )
        .unwrap();

        Self {
            temp_dir,
            config_path,
        }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("webui-replay").unwrap();
        cmd.env("WEBUI_CONFIG", &self.config_path);
        cmd.env_remove("RUST_LOG");
        cmd
    }
}

#[test]
fn test_route_navigate_and_params() {
    let env = TestEnv::new();
    let script = env.write(
        "steps.jsonl",
        r#"{"step":"navigate","page":"checkup"}
{"step":"params","params":{"q":"test"}}
"#,
    );

    env.cmd()
        .args(["route", "--script"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("page: checkup"))
        .stdout(predicate::str::contains("query: q=test"))
        .stdout(predicate::str::contains(
            "url: chrome://password-manager/checkup?q=test",
        ));
}

#[test]
fn test_route_back_restores_previous_page() {
    let env = TestEnv::new();
    let script = env.write(
        "steps.jsonl",
        r#"{"step":"navigate","page":"settings"}

{"step":"back"}
"#,
    );

    let output = env
        .cmd()
        .args(["--format", "json", "route", "--script"])
        .arg(&script)
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["page"], "passwords");
    assert_eq!(report["history_length"], 2);
}

#[test]
fn test_route_unknown_initial_path_is_normalized() {
    let env = TestEnv::new();
    let script = env.write("steps.jsonl", "");

    env.cmd()
        .args(["route", "--url", "/invalid-page", "--script"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("page: passwords"))
        .stdout(predicate::str::contains("url: chrome://password-manager/passwords"));
}

#[test]
fn test_route_trace_emits_events() {
    let env = TestEnv::new();
    let script = env.write("steps.jsonl", r#"{"step":"navigate","page":"checkup"}"#);

    env.cmd()
        .args(["route", "--trace", "--script"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""type":"route_changed""#))
        .stdout(predicate::str::contains(r#""navigation":"push""#));
}

#[test]
fn test_route_unknown_page_in_script_is_invalid_input() {
    let env = TestEnv::new();
    let script = env.write("steps.jsonl", r#"{"step":"navigate","page":"bogus"}"#);

    env.cmd()
        .args(["route", "--script"])
        .arg(&script)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("steps.jsonl:1"));
}

#[test]
fn test_missing_script_fails() {
    let env = TestEnv::new();

    env.cmd()
        .args(["route", "--script"])
        .arg(env.temp_dir.path().join("missing.jsonl"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read script"));
}

#[test]
fn test_state_replays_actions() {
    let env = TestEnv::new();
    let actions = env.write(
        "actions.jsonl",
        r#"{"type":"change-directory","newDirectory":{"rootUrl":"filesystem:downloads","rootLabel":"Downloads","fullPath":"/photos","isDirectory":true},"key":"filesystem:downloads/photos","status":"SUCCESS"}
{"type":"search","query":"beach","status":"STARTED"}
{"type":"open-volume"}
"#,
    );

    env.cmd()
        .args(["state", "--actions"])
        .arg(&actions)
        .assert()
        .success()
        .stdout(predicate::str::contains("actions: 3"))
        .stdout(predicate::str::contains("entries: 1"))
        .stdout(predicate::str::contains(
            "directory: filesystem:downloads/photos (Success)",
        ))
        .stdout(predicate::str::contains("search: beach"));
}

#[test]
fn test_state_trace_keeps_every_event_beyond_bus_capacity() {
    let env = TestEnv::new();
    let config = env.write("small-bus.toml", "[events]\ncapacity = 2\n");
    let actions = env.write(
        "actions.jsonl",
        r#"{"type":"search","query":"a"}
{"type":"search","query":"b"}
{"type":"search","query":"c"}
{"type":"search","query":"d"}
"#,
    );

    let output = env
        .cmd()
        .args(["--trace", "state", "--config"])
        .arg(&config)
        .arg("--actions")
        .arg(&actions)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let sequences: Vec<u64> = stdout
        .lines()
        .filter(|line| line.contains(r#""type":"state_changed""#))
        .map(|line| {
            let event: serde_json::Value = serde_json::from_str(line).unwrap();
            event["sequence"].as_u64().unwrap()
        })
        .collect();
    assert_eq!(sequences, vec![1, 2, 3, 4]);
    assert!(stdout.contains("search: d"));
}

#[test]
fn test_state_with_initial_state_as_json() {
    let env = TestEnv::new();
    let initial = env.write(
        "state.json",
        r#"{"allEntries":{},"search":{"query":"old","status":"SUCCESS","options":null}}"#,
    );
    let actions = env.write("actions.jsonl", r#"{"type":"search","status":"STARTED"}"#);

    let output = env
        .cmd()
        .args(["state", "--format", "json", "--actions"])
        .arg(&actions)
        .arg("--initial")
        .arg(&initial)
        .output()
        .unwrap();

    assert!(output.status.success());
    let state: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(state["search"]["query"], "old");
    assert_eq!(state["search"]["status"], "STARTED");
}

#[test]
fn test_state_malformed_action_line() {
    let env = TestEnv::new();
    let actions = env.write("actions.jsonl", "{\"type\":\"search\"}\nnot json\n");

    env.cmd()
        .args(["state", "--actions"])
        .arg(&actions)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("actions.jsonl:2"));
}

#[test]
fn test_invalid_config_fails() {
    let env = TestEnv::new();
    let config = env.write("broken.toml", "[router]\norigin = \"\"\n");
    let script = env.write("steps.jsonl", "");

    env.cmd()
        .args(["route", "--config"])
        .arg(&config)
        .arg("--script")
        .arg(&script)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("router.origin"));
}
