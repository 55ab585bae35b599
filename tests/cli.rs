//! CLI integration tests.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn hindsight() -> Command {
    let mut cmd = cargo_bin_cmd!("hindsight");
    for key in [
        "MIN_HOLD_MINUTES",
        "MAX_HOLD_MINUTES",
        "PROGRESS_INTERVAL",
        "REPORT_PRECISION",
        "REPORT_PATH",
        "REPORT_FORMAT",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

/// Two dips, two rallies: 1 -> 21 at minutes 10..50, 1 -> 31 at 90..130
fn two_dip_csv() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "timestamp,price").unwrap();
    for minute in 0..150 {
        let price = match minute {
            10 | 90 => 1.0,
            50 => 21.0,
            130 => 31.0,
            _ => 10.0,
        };
        writeln!(file, "2021-03-01 {:02}:{:02},{}", minute / 60, minute % 60, price).unwrap();
    }
    file
}

#[test]
fn test_missing_file_fails() {
    hindsight()
        .arg("this_file_does_not_exist.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn test_directory_argument_is_not_found() {
    let dir = tempfile::tempdir().unwrap();

    hindsight()
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn test_requires_file_argument() {
    hindsight().assert().failure();
}

#[test]
fn test_text_report_on_stdout() {
    let csv = two_dip_csv();

    hindsight()
        .arg(csv.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Trade 0 - Buy: 1 -> Sell: 21 = Profit: 20.0000  ---- start: 10, end: 50",
        ))
        .stdout(predicate::str::contains(
            "Trade 1 - Buy: 1 -> Sell: 31 = Profit: 30.0000  ---- start: 90, end: 130",
        ))
        .stdout(predicate::str::contains("total profit: 50.0000"));
}

#[test]
fn test_json_report_to_file() {
    let csv = two_dip_csv();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("trades.json");

    hindsight()
        .arg(csv.path())
        .args(["--quiet", "--json", "--output"])
        .arg(&out)
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(report["trade_count"], 2);
    assert_eq!(report["total_profit"], 50.0);
    assert_eq!(report["trades"][1]["open_label"], "2021-03-01 01:30");
}

#[test]
fn test_short_series_reports_zero_profit() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "timestamp,price").unwrap();
    for minute in 0..30 {
        writeln!(file, "m{},{}", minute, minute).unwrap();
    }

    hindsight()
        .arg(file.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::diff("total profit: 0.0000\n"));
}

#[test]
fn test_malformed_price_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "timestamp,price\nm0,1.0\nm1,oops").unwrap();

    hindsight()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3: malformed price"));
}
