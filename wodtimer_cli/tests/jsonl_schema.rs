use assert_cmd::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[timer]
duration_secs = 30
tick_hz = 10

[notify]
sound = false
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("not JSON ({e}): {l}")))
        .collect()
}

fn summary(lines: &[serde_json::Value]) -> &serde_json::Value {
    lines
        .iter()
        .find(|v| v.get("stopped_by").is_some())
        .expect("no summary line with stopped_by")
}

/// Validate the JSONL schema for a countdown that reaches zero.
#[rstest]
fn jsonl_success_schema() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("wodtimer").unwrap();
    cmd.env("WODTIMER_TEST_FAST", "1")
        .arg("--json")
        .arg("--log-level")
        .arg("error")
        .arg("--config")
        .arg(&cfg)
        .arg("countdown")
        .arg("--secs")
        .arg("4");

    let out = cmd.assert().success().get_output().stdout.clone();
    let lines = json_lines(&out);

    // Every stdout line is an event or the summary.
    let events: Vec<&str> = lines
        .iter()
        .filter_map(|v| v.get("event").and_then(|e| e.as_str()))
        .collect();
    assert_eq!(
        events,
        vec![
            "run_state_changed",
            "countdown_tick",
            "countdown_tick",
            "countdown_tick",
            "complete",
            "run_state_changed"
        ]
    );
    let ticks: Vec<u64> = lines
        .iter()
        .filter_map(|v| v.get("seconds_remaining").and_then(|s| s.as_u64()))
        .collect();
    assert_eq!(ticks, vec![3, 2, 1]);

    let s = summary(&lines);
    assert!(s.get("timestamp").and_then(|x| x.as_i64()).is_some());
    assert_eq!(s["mode"], "countdown");
    assert_eq!(s["phase"], "completed");
    assert_eq!(s["stopped_by"], "completed");
    assert_eq!(s["completed"], true);
    assert_eq!(s["duration_secs"], 4);
    assert_eq!(s["value_ms"], 0);
    assert_eq!(s["clock"], "00:00");
    assert_eq!(s["wall_ms"], 4_000);
    for key in ["repetitions", "voice_count"] {
        assert!(s.get(key).and_then(|x| x.as_u64()).is_some(), "{key}");
    }
}

/// An unfinished countdown prints its summary, then a structured error.
#[rstest]
fn jsonl_max_runtime_schema() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("wodtimer").unwrap();
    cmd.env("WODTIMER_TEST_FAST", "1")
        .arg("--json")
        .arg("--log-level")
        .arg("error")
        .arg("--config")
        .arg(&cfg)
        .arg("countdown")
        .arg("--max-run-ms")
        .arg("1500");

    let out = cmd.assert().code(3).get_output().stdout.clone();
    let lines = json_lines(&out);

    let s = summary(&lines);
    assert_eq!(s["stopped_by"], "max_runtime");
    assert_eq!(s["completed"], false);
    assert_eq!(s["phase"], "paused");
    assert_eq!(s["value_ms"], 28_500);

    let err = lines
        .iter()
        .find(|v| v.get("reason").is_some())
        .expect("no error object");
    assert_eq!(err["reason"], "MaxRuntime");
    assert_eq!(err["details"]["max_run_ms"], 1_500);
    assert!(err["message"].as_str().unwrap().contains("What happened"));
}

#[rstest]
fn jsonl_self_check_schema() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("wodtimer").unwrap();
    cmd.arg("--json").arg("--config").arg(&cfg).arg("self-check");
    let out = cmd.assert().success().get_output().stdout.clone();
    let lines = json_lines(&out);
    let v = &lines[0];
    assert_eq!(v["ok"], true);
    assert_eq!(v["collaborators"]["sound"], true);
    assert_eq!(v["collaborators"]["haptics"], false);
    assert_eq!(v["settings"]["sound"], false);
}
