use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use assert_cmd::Command;
use tempfile::tempdir;

// Minimal valid config with a couple of templates
fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[timer]
mode = "countdown"
duration_secs = 10
tick_hz = 10

[notify]
sound = false
vibration = false
keep_screen_on = true

[[templates]]
name = "tabata"
duration_secs = 20

[[templates]]
name = "emom"
duration_secs = 60
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn wodtimer(cfg: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("wodtimer").unwrap();
    // ManualClock: every session finishes instantly
    cmd.env("WODTIMER_TEST_FAST", "1")
        .arg("--log-level")
        .arg("error")
        .arg("--config")
        .arg(cfg);
    cmd
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["countdown", "--secs", "5"], 0, "time!", "stdout")]
#[case(&["countdown", "--secs", "5"], 0, "completed at 00:00", "stdout")]
#[case(&["countdown", "--template", "TABATA"], 0, "(reps 0, 20000 ms)", "stdout")]
#[case(&["countdown", "--secs", "99999"], 0, "3599000 ms", "stdout")]
#[case(&["countdown", "--template", "nope"], 1, "unknown template", "stderr")]
#[case(&["countdown", "--secs", "5", "--template", "emom"], 2, "cannot be used with", "stderr")]
#[case(&["countdown", "--secs", "120", "--max-run-ms", "1000"], 3, "max run time", "stderr")]
#[case(&["countdown", "--secs", "3", "--reps", "4"], 0, "reps 4", "stdout")]
#[case(&["stopwatch", "--max-run-ms", "2500"], 0, "stopwatch max_runtime at 00:02", "stdout")]
#[case(&["stopwatch", "--max-run-ms", "3000", "--voice-count"], 0, "[3]", "stdout")]
#[case(&["self-check"], 0, "OK", "stdout")]
#[case(&["templates"], 0, "tabata", "stdout")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = wodtimer(&cfg);
    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
fn countdown_prints_each_final_second_once() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let out = wodtimer(&cfg)
        .args(["countdown", "--secs", "6"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8_lossy(&out);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(&lines[..4], &["3...", "2...", "1...", "time!"]);
}

#[rstest]
fn cli_reports_bad_templates_header() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let bad_csv = dir.path().join("templates.csv");
    let mut f = fs::File::create(&bad_csv).unwrap();
    writeln!(f, "title,seconds").unwrap();
    writeln!(f, "rest,90").unwrap();

    wodtimer(&cfg)
        .arg("--templates")
        .arg(&bad_csv)
        .arg("self-check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid headers"));
}

#[rstest]
fn csv_templates_are_selectable() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let csv = dir.path().join("templates.csv");
    fs::write(&csv, "name,duration_secs\nrest,7\n").unwrap();

    wodtimer(&cfg)
        .arg("--templates")
        .arg(&csv)
        .args(["countdown", "--template", "rest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("7000 ms"));
}

#[rstest]
#[case("[timer]\nduration_secs = 0\n")]
#[case("[timer]\ntick_hz = 0\n")]
#[case("[logging]\nrotation = \"weekly\"\n")]
#[case("[[templates]]\nname = \"x\"\nduration_secs = 4000\n")]
fn invalid_config_is_explained(#[case] toml: &str) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, toml).unwrap();

    wodtimer(&path)
        .arg("self-check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration is invalid"));
}

#[rstest]
fn explicit_missing_config_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    wodtimer(&missing)
        .arg("self-check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("read config"));
}

#[rstest]
fn default_config_path_may_be_absent() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("wodtimer").unwrap();
    cmd.current_dir(dir.path())
        .env("WODTIMER_TEST_FAST", "1")
        .args(["--log-level", "error", "countdown", "--secs", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("completed"));
}

#[rstest]
fn interactive_session_applies_stdin_commands() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    wodtimer(&cfg)
        .arg("interactive")
        .write_stdin("dur 3\nreps 4\n+\nbogus\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("intents_closed"))
        .stdout(predicate::str::contains("reps 5"))
        .stderr(predicate::str::contains("unknown command"));
}

#[rstest]
fn log_file_is_written() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("run.log");
    let cfg = dir.path().join("cfg.toml");
    fs::write(
        &cfg,
        format!(
            "[logging]\nfile = {:?}\nlevel = \"info\"\nrotation = \"never\"\n",
            log.display().to_string()
        ),
    )
    .unwrap();

    wodtimer(&cfg)
        .args(["countdown", "--secs", "1"])
        .assert()
        .success();

    let text = fs::read_to_string(&log).unwrap();
    assert!(text.contains("session end"), "log was: {text}");
}
