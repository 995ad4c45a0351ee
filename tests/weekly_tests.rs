use assert_fs::prelude::*;
use predicates::prelude::*;
use std::fs;

const STORAGE: &str = r#"{
  "projects": [{"id": 1, "name": "Harbor Tower", "status": "active"}],
  "dailyReports": [
    {
      "id": 1771261200000,
      "date": "2026-02-16",
      "projectId": 1,
      "projectName": "Harbor Tower",
      "crewDetails": {"workers": 5, "hoursWorked": 8, "crewType": "general"},
      "tasksCompleted": ["Set rebar", "Pour footing"],
      "weather": {"condition": "sunny", "temperature": 12},
      "notes": "",
      "status": "submitted"
    },
    {
      "id": "1771347600000",
      "date": "2026-02-17",
      "projectId": 1,
      "projectName": "Harbor Tower",
      "crewDetails": {"workers": 3, "hoursWorked": 6},
      "tasksCompleted": ["Strip forms"],
      "notes": "Minor defect found in formwork",
      "status": "draft"
    }
  ]
}"#;

fn storage_file() -> assert_fs::NamedTempFile {
    let file = assert_fs::NamedTempFile::new("site.json").unwrap();
    file.write_str(STORAGE).unwrap();
    file
}

#[test]
fn weekly_summary_prints_yaml_for_the_week_of_the_given_day() {
    let storage = storage_file();

    let mut cmd = assert_cmd::cargo_bin_cmd!("sitetrack");
    cmd.args(["weekly-summary", "-s"])
        .arg(storage.path())
        .args(["-w", "2026-02-19"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("week_start_date: 2026-02-16"))
        .stdout(predicate::str::contains("week_end_date: 2026-02-22"))
        .stdout(predicate::str::contains("total_man_hours: 58.0"))
        .stdout(predicate::str::contains("productivity_rate: 0.05"))
        .stdout(predicate::str::contains("quality_score: 66.7"))
        .stdout(predicate::str::contains("Zero safety incidents this week"))
        .stdout(predicate::str::contains(
            "Consider reviewing crew allocation and task assignments",
        ));
}

#[test]
fn weekly_summary_can_be_written_to_a_file() {
    let storage = storage_file();
    let output = assert_fs::NamedTempFile::new("summary.yaml").unwrap();

    let mut cmd = assert_cmd::cargo_bin_cmd!("sitetrack");
    cmd.args(["weekly-summary", "-p", "1", "-w", "2026-02-16", "-o"])
        .arg(output.path())
        .env("SITETRACK_STORAGE", storage.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Weekly summary written to"));

    let yaml = fs::read_to_string(output.path()).unwrap();
    assert!(yaml.contains("total_reports: 2"));
    assert!(yaml.contains("total_days_reported: 2"));
}

#[test]
fn weekly_trends_detail_compares_with_previous_week() {
    let storage = storage_file();

    let mut cmd = assert_cmd::cargo_bin_cmd!("sitetrack");
    cmd.args(["weekly-trends", "--detail", "-p", "1", "-w", "2026-02-16", "-s"])
        .arg(storage.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Weekly Intelligence Report"))
        .stdout(predicate::str::contains("Project: Harbor Tower"))
        .stdout(predicate::str::contains("Productivity | 0.05 | 0 | improving"))
        .stdout(predicate::str::contains("Quality | 66.7% | 100% | declining"));
}

#[test]
fn weekly_list_prints_one_card_per_week() {
    let storage = storage_file();

    let mut cmd = assert_cmd::cargo_bin_cmd!("sitetrack");
    cmd.args(["weekly-list", "-n", "2", "-t", "2026-02-18", "-s"])
        .arg(storage.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Week of Feb 16, 2026"))
        .stdout(predicate::str::contains("Week of Feb 9, 2026"))
        .stdout(predicate::str::contains("0 daily reports"));
}

#[test]
fn weekly_export_writes_the_report_csv() {
    let storage = storage_file();
    let dir = assert_fs::TempDir::new().unwrap();
    let output = dir.child("weekly.csv");

    let mut cmd = assert_cmd::cargo_bin_cmd!("sitetrack");
    cmd.args(["weekly-export", "-w", "2026-02-16", "-s"])
        .arg(storage.path())
        .arg("-o")
        .arg(output.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Weekly report exported to"));

    output.assert(predicate::str::contains("Project: All Projects"));
    output.assert(predicate::str::contains("Total Man-hours,58"));
    output.assert(predicate::str::contains("Quality Score,66.7%"));
}

#[test]
fn weekly_export_defaults_to_a_dated_file_name() {
    let storage = storage_file();
    let dir = assert_fs::TempDir::new().unwrap();

    let mut cmd = assert_cmd::cargo_bin_cmd!("sitetrack");
    cmd.current_dir(dir.path())
        .args(["weekly-export", "-w", "2026-02-18", "-s"])
        .arg(storage.path());

    cmd.assert().success();

    dir.child("weekly_report_20260216.csv")
        .assert(predicate::str::contains("Weekly Intelligence Report"));
}

#[test]
fn weekly_list_rejects_huge_week_counts() {
    let storage = storage_file();

    let mut cmd = assert_cmd::cargo_bin_cmd!("sitetrack");
    cmd.args(["weekly-list", "-n", "20000000", "-s"])
        .arg(storage.path());

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("20000000"))
        .stderr(predicate::str::contains("panicked").not());
}
