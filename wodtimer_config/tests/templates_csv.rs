use std::fs::File;
use std::io::Write;

use rstest::rstest;
use tempfile::tempdir;
use wodtimer_config::{Template, load_templates_csv};

fn write_csv(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("templates.csv");
    let mut f = File::create(&path).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    (dir, path)
}

#[rstest]
fn loads_rows_in_order() {
    let (_dir, path) = write_csv("name,duration_secs\ntabata,20\n emom , 60\n");
    let rows = load_templates_csv(&path).unwrap();
    assert_eq!(
        rows,
        vec![
            Template {
                name: "tabata".into(),
                duration_secs: 20
            },
            Template {
                name: "emom".into(),
                duration_secs: 60
            },
        ]
    );
}

#[rstest]
fn rejects_wrong_headers() {
    let (_dir, path) = write_csv("label,seconds\ntabata,20\n");
    let err = load_templates_csv(&path).expect_err("headers must match");
    assert!(format!("{err}").contains("must have headers 'name,duration_secs'"));
}

#[rstest]
#[case("name,duration_secs\ntabata,0\n")]
#[case("name,duration_secs\ntabata,3600\n")]
#[case("name,duration_secs\n,20\n")]
fn rejects_invalid_rows(#[case] body: &str) {
    let (_dir, path) = write_csv(body);
    let err = load_templates_csv(&path).expect_err("row should be rejected");
    assert!(format!("{err}").contains("row 2"), "got: {err}");
}

#[rstest]
fn rejects_non_numeric_duration() {
    let (_dir, path) = write_csv("name,duration_secs\ntabata,twenty\n");
    let err = load_templates_csv(&path).expect_err("not a number");
    assert!(format!("{err}").contains("invalid CSV row 2"));
}

#[rstest]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = load_templates_csv(&dir.path().join("nope.csv")).expect_err("missing file");
    assert!(format!("{err}").contains("open templates CSV"));
}
