//! CLI options interaction tests
//!
//! These tests run the `g2g` binary and check exit codes and operator
//! messages for the paths that need no measurement hardware.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const ENV_VARS: [&str; 9] = [
    "G2G_PORT",
    "G2G_VENDOR",
    "G2G_BAUD_RATE",
    "G2G_READ_TIMEOUT",
    "G2G_DRAIN_WINDOW_MS",
    "G2G_SETTLE_DELAY_MS",
    "G2G_MAX_ATTEMPTS",
    "G2G_HISTOGRAM_BINS",
    "G2G_ENABLE_COLOR",
];

/// Command running in `dir` with no inherited configuration
fn create_test_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("g2g").unwrap();
    cmd.current_dir(dir.path());
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Write a results file in the canonical layout
fn write_results(dir: &TempDir, name: &str, content: &str) {
    fs::write(dir.path().join(name), content).unwrap();
}

#[test]
fn test_wrong_extension_is_rejected_before_anything_else() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(&dir)
        .args(["results.txt", "10", "--no-color"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(".csv extension"));

    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn test_extension_check_beats_broken_env_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "G2G_BAUD_RATE=fast\n").unwrap();

    create_test_cmd(&dir)
        .args(["results.png", "--no-color"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("results.png"));
}

#[test]
fn test_invalid_sample_count_is_a_usage_error() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(&dir)
        .args(["results.csv", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("greater than 0"));
}

#[test]
fn test_missing_device_exits_with_device_code() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(&dir)
        .args(["run.csv", "5", "--no-color", "--no-show"])
        .env("G2G_VENDOR", "NoSuchVendor-7f3a")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("DEVICE"));

    assert!(!dir.path().join("run.csv").exists());
    assert!(!dir.path().join("run.svg").exists());
}

#[test]
fn test_replay_prints_summary_and_saves_histogram() {
    let dir = TempDir::new().unwrap();
    write_results(
        &dir,
        "old.csv",
        "Samples,Min,Max,Mean,Median,stdDev\n5,1,5,3,3,1.4142135623730951\n1,2,3,4,5\n",
    );

    create_test_cmd(&dir)
        .args(["old.csv", "--readcsv", "--no-show", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reading data from old.csv"))
        .stdout(predicate::str::contains("Obtained values from old.csv"))
        .stdout(predicate::str::contains("min: 1.00 ms | max: 5.00 ms | median: 3.00 ms"))
        .stdout(predicate::str::contains("mean: 3.00 ms | std_dev: 1.41 ms"))
        .stdout(predicate::str::contains("Saved histogram to old.svg"));

    let svg = fs::read_to_string(dir.path().join("old.svg")).unwrap();
    assert!(svg.contains("Latency Histogram"));
}

#[test]
fn test_replay_of_short_file_is_format_error() {
    let dir = TempDir::new().unwrap();
    write_results(&dir, "short.csv", "Samples,Min,Max,Mean,Median,stdDev\n1,5,5,5,5,0\n");

    create_test_cmd(&dir)
        .args(["short.csv", "-r", "--no-show", "--no-color"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("FORMAT"));

    assert!(!dir.path().join("short.svg").exists());
}

#[test]
fn test_replay_of_non_numeric_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    write_results(&dir, "bad.csv", "h\n2,1,2,1.5,1.5,0.5\n1.0,two\n");

    create_test_cmd(&dir)
        .args(["bad.csv", "-r", "--no-show", "--no-color"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("'two'"));
}

#[test]
fn test_replay_with_blank_statistics_line_is_format_error() {
    let dir = TempDir::new().unwrap();
    write_results(&dir, "gap.csv", "Samples,Min,Max,Mean,Median,stdDev\n\n1,5,5,5,5,0\n5\n");

    create_test_cmd(&dir)
        .args(["gap.csv", "-r", "--no-show", "--no-color"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("FORMAT"));
}

#[test]
fn test_replay_of_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(&dir)
        .args(["absent.csv", "-r", "--no-show", "--no-color"])
        .assert()
        .code(5);
}

#[test]
fn test_help_topics() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(&dir)
        .args(["--help-topic", "format", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Samples,Min,Max,Mean,Median,stdDev"));

    create_test_cmd(&dir)
        .args(["--help-topic", "setup", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("phototransistor"));

    create_test_cmd(&dir)
        .args(["--help-topic", "dns", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown help topic: 'dns'"));
}

#[test]
fn test_print_env_example() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(&dir)
        .arg("--print-env-example")
        .assert()
        .success()
        .stdout(predicate::str::contains("G2G_VENDOR"))
        .stdout(predicate::str::contains("G2G_READ_TIMEOUT"));
}

#[test]
fn test_conflicting_color_flags() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(&dir)
        .args(["--color", "--no-color"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--color"));
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("g2g"));
}
