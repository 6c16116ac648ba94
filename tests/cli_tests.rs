use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::fs;
use tempfile::TempDir;

const ENROLLMENT: &str = "\
SID,CourseSection,Time Slot
1,BIO 101-01,MWF 9
2,BIO 101-02,MWF 9
2,BIO 101L-01,T 1
3,MATH 120-01,TR 11
1,NURS 417-AC,TR 11
4,NURS 101-01,MWF 10
";

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.write_stdin(script.to_string()).assert()
}

fn enrollment_file(dir: &TempDir) -> String {
    let path = dir.path().join("enrollment.csv");
    fs::write(&path, ENROLLMENT).expect("write enrollment");
    path.to_string_lossy().into_owned()
}

#[test]
fn cli_generates_schedule_for_all_courses() {
    let dir = TempDir::new().unwrap();
    let script = format!("load {}\ninclude-all\ngenerate\nquit\n", enrollment_file(&dir));
    run_cli(&script)
        .success()
        .stdout(str_contains("Loaded 6 rows, 4 courses."))
        .stdout(str_contains("DAY 1: SLOT 1:"))
        .stdout(str_contains("Number of slots used:"));
}

#[test]
fn cli_lists_courses_by_major() {
    let dir = TempDir::new().unwrap();
    let script = format!(
        "load {}\ninclude-major nurs\ncourses\nquit\n",
        enrollment_file(&dir)
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("2 nurs courses marked."))
        .stdout(str_contains("NURS: [x] NURS 101  [x] NURS 417"))
        .stdout(str_contains("BIO: [ ] BIO 101"));
}

#[test]
fn cli_reports_bad_source_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grades.csv");
    fs::write(&path, "Name,Grade\nAda,A\n").unwrap();
    run_cli(&format!("load {}\nquit\n", path.display()))
        .success()
        .stdout(str_contains("is not a valid enrollment file"));
}

#[test]
fn cli_empty_selection_cannot_be_exported() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("finals.xlsx");
    let script = format!(
        "load {}\ngenerate\nexport {}\nquit\n",
        enrollment_file(&dir),
        out.display()
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("Number of slots used: 0"))
        .stdout(str_contains("Error: render error"));
    assert!(!out.exists());
}

#[test]
fn cli_exports_and_reopens_schedule() {
    let dir = TempDir::new().unwrap();
    let xlsx = dir.path().join("finals.xlsx");
    let json = dir.path().join("finals.json");
    let script = format!(
        "load {}\ninclude BIO 101, MATH 120\ngenerate\nexport {}\nsave json {}\nopen json {}\nquit\n",
        enrollment_file(&dir),
        xlsx.display(),
        json.display(),
        json.display()
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("Schedule written to"))
        .stdout(str_contains("Schedule loaded from"))
        .stdout(str_contains("BIO 101, MATH 120"));
    assert!(xlsx.exists());
}

#[test]
fn cli_rejects_invalid_settings() {
    run_cli("set max-tests 0\nset compact maybe\nreview\nquit\n")
        .success()
        .stdout(str_contains("Error: invalid configuration"))
        .stdout(str_contains("Max Daily Finals: 4"));
}

#[test]
fn cli_rejects_row_limit_beyond_sheet() {
    run_cli("set max-rows 4294967295\nset max-rows 20\nquit\n")
        .success()
        .stdout(str_contains("Error: invalid configuration"))
        .stdout(str_contains("max-rows set."));
}
