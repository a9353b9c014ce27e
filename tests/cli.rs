use assert_cmd::Command;
use predicates::prelude::*;

fn timple() -> Command {
    Command::cargo_bin("timple").unwrap_or_else(|err| panic!("timple binary: {err}"))
}

#[test]
fn ticks_over_ten_days() {
    timple()
        .args(["ticks", "0", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("interval: 2 days"))
        .stdout(predicate::str::contains(" 4   4\n"))
        .stdout(predicate::str::contains("10  10\n"));
}

#[test]
fn ticks_in_minutes_use_hour_minute_labels() {
    timple()
        .args(["ticks", "0", "90", "--unit", "minutes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("interval: 15 minutes"))
        .stdout(predicate::str::contains("45  0:45\n"))
        .stdout(predicate::str::contains("90  1:30\n"));
}

#[test]
fn concise_ticks_print_offset() {
    timple()
        .args(["ticks", "100.125", "100.16666666666667", "--style", "concise"])
        .assert()
        .success()
        .stdout(predicate::str::contains("offset: 100 days"))
        .stdout(predicate::str::contains("3:00"));
}

#[test]
fn label_formats_seconds() {
    timple()
        .args(["label", "185", "-185", "--unit", "seconds", "--step", "20", "--step-unit", "seconds"])
        .assert()
        .success()
        .stdout(predicate::str::contains(" 185   3:05\n"))
        .stdout(predicate::str::contains("-185  -3:05\n"));
}

#[test]
fn label_uses_placeholder_for_nat() {
    timple()
        .args(["label", "nat", "--placeholder", "n/a", "--step-unit", "hours"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nat  n/a\n"));
}

#[test]
fn unknown_unit_fails() {
    timple()
        .args(["ticks", "0", "1", "--unit", "fortnights"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fortnights"));
}

#[test]
fn non_numeric_value_fails() {
    timple()
        .args(["label", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("soon"));
}

#[test]
fn inconsistent_tick_limits_fail() {
    timple()
        .args(["ticks", "0", "1", "--target-ticks", "30", "--max-ticks", "10"])
        .assert()
        .failure();
}

#[test]
fn log_file_is_written() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("timple.log");
    timple()
        .args(["ticks", "0", "1", "--log"])
        .arg(&log)
        .assert()
        .success();

    let contents = std::fs::read_to_string(&log)?;
    anyhow::ensure!(
        contents.contains("Starting timple"),
        "log file missing start line:\n{contents}"
    );
    Ok(())
}
