use assert_fs::prelude::*;
use predicates::prelude::*;

const STORAGE: &str = r#"{
  "projects": [
    {"id": 1, "name": "Harbor Tower", "status": "active"},
    {"id": 2, "name": "Depot Annex", "status": "planning"}
  ],
  "tasks": [
    {"id": 1, "projectId": 1, "name": "Excavate", "status": "completed"},
    {"id": 2, "projectId": 1, "name": "Frame", "status": "in-progress", "dependencies": [1]},
    {"id": 3, "projectId": 2, "name": "Survey", "status": "completed"}
  ],
  "dailyReports": [
    {
      "id": 1,
      "date": "2026-02-16",
      "projectId": 1,
      "crewDetails": {"workers": 5, "hoursWorked": 8},
      "tasksCompleted": ["Set rebar", "Pour footing"],
      "notes": "Near miss reported as incident"
    },
    {
      "id": 2,
      "date": "2026-02-17",
      "projectId": 1,
      "crewDetails": {"workers": 3, "hoursWorked": 6},
      "tasksCompleted": ["Strip forms"]
    },
    {
      "id": 3,
      "date": "2026-02-10",
      "projectId": 2,
      "crewDetails": {"workers": 2, "hoursWorked": 4},
      "tasksCompleted": []
    }
  ]
}"#;

fn storage_file() -> assert_fs::NamedTempFile {
    let file = assert_fs::NamedTempFile::new("site.json").unwrap();
    file.write_str(STORAGE).unwrap();
    file
}

#[test]
fn trend_data_lists_reported_days_in_order() {
    let storage = storage_file();

    let mut cmd = assert_cmd::cargo_bin_cmd!("sitetrack");
    cmd.args(["trend-data", "-t", "2026-02-20", "-d", "7", "-s"])
        .arg(storage.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("date: 2026-02-16"))
        .stdout(predicate::str::contains("man_hours: 40.0"))
        .stdout(predicate::str::contains("incidents: 1"))
        .stdout(predicate::str::contains("date: 2026-02-17"))
        .stdout(predicate::str::contains("2026-02-10").not());
}

#[test]
fn progress_counts_completed_tasks_of_a_project() {
    let storage = storage_file();

    let mut cmd = assert_cmd::cargo_bin_cmd!("sitetrack");
    cmd.args(["progress", "-p", "1", "-s"]).arg(storage.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("project_name: Harbor Tower"))
        .stdout(predicate::str::contains("total_tasks: 2"))
        .stdout(predicate::str::contains("progress: 50"));
}

#[test]
fn progress_for_unknown_project_fails() {
    let storage = storage_file();

    let mut cmd = assert_cmd::cargo_bin_cmd!("sitetrack");
    cmd.args(["progress", "-p", "42", "-s"]).arg(storage.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown project `42`"));
}

#[test]
fn progress_project_can_come_from_the_environment() {
    let storage = storage_file();

    let mut cmd = assert_cmd::cargo_bin_cmd!("sitetrack");
    cmd.arg("progress")
        .env("SITETRACK_STORAGE", storage.path())
        .env("SITETRACK_PROJECT", "2");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("project_name: Depot Annex"))
        .stdout(predicate::str::contains("progress: 100"));
}

#[test]
fn resource_utilization_buckets_by_iso_week() {
    let storage = storage_file();

    let mut cmd = assert_cmd::cargo_bin_cmd!("sitetrack");
    cmd.args(["resource-utilization", "-s"]).arg(storage.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("week: 2026-W7"))
        .stdout(predicate::str::contains("week: 2026-W8"))
        .stdout(predicate::str::contains("man_hours: 58.0"));
}

#[test]
fn resource_utilization_keeps_the_most_recent_weeks() {
    let storage = storage_file();

    let mut cmd = assert_cmd::cargo_bin_cmd!("sitetrack");
    cmd.args(["resource-utilization", "-n", "1", "-s"])
        .arg(storage.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("week: 2026-W8"))
        .stdout(predicate::str::contains("2026-W7").not());
}

#[test]
fn forecast_extends_the_daily_series() {
    let storage = storage_file();

    let mut cmd = assert_cmd::cargo_bin_cmd!("sitetrack");
    cmd.args([
        "forecast", "-p", "1", "-m", "man-hours", "-n", "3", "-t", "2026-02-20", "-s",
    ])
    .arg(storage.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("metric: man-hours"))
        .stdout(predicate::str::contains("observed_days: 2"))
        .stdout(predicate::str::contains("Forecast +1d"))
        .stdout(predicate::str::contains("Forecast +3d"))
        .stdout(predicate::str::contains("Forecast +4d").not());
}

#[test]
fn trend_data_rejects_windows_longer_than_a_century() {
    let storage = storage_file();

    let mut cmd = assert_cmd::cargo_bin_cmd!("sitetrack");
    cmd.args(["trend-data", "-d", "200000000", "-s"])
        .arg(storage.path());

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("200000000"))
        .stderr(predicate::str::contains("panicked").not());
}
