//! End-to-end runs of the relgrade binary against files in a temp dir.

use std::path::Path;
use std::process::Command;

const SEMESTER: &str = r#"{
    "name": "Semester 4",
    "subjects": [
        {
            "name": "Signals",
            "credit_hours": 3,
            "components": [
                {"name": "Midterm", "weight": 50, "max_marks": 100, "my_marks": 80, "class_avg_marks": 60},
                {"name": "Final", "weight": 50, "max_marks": 100, "my_marks": 60, "class_avg_marks": 60}
            ]
        },
        {
            "name": "Electronics",
            "lab": {"theory_credits": 3, "lab_credits": 1},
            "components": [
                {"name": "Final", "weight": 100, "max_marks": 50, "my_marks": 30, "class_avg_marks": 40}
            ]
        }
    ]
}"#;

fn relgrade(dir: &Path, args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_relgrade"))
        .args(args)
        .current_dir(dir)
        .env_remove("RELGRADE_SCALE")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

fn setup() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("semester.json"), SEMESTER).unwrap();
    dir
}

#[test]
fn grade_prints_subjects_and_sgpa() {
    let dir = setup();
    let (ok, stdout, stderr) = relgrade(dir.path(), &["grade", "--input", "semester.json"]);

    assert!(ok, "stderr: {stderr}");
    assert!(stdout.contains("Semester: Semester 4"));
    // Signals: +16.7% -> B+ (3.5); Electronics: -25% -> F (0.0)
    assert!(stdout.contains("Predicted Grade: B+ (3.5 points)"));
    assert!(stdout.contains("Subject: Electronics (Theory: 3, Lab: 1) (4 credits)"));
    assert!(stdout.contains("Predicted Grade: F (0 points)"));
    assert!(stdout.contains("Semester GPA (SGPA): 1.50"));
    assert!(!stdout.contains("CGPA"));
}

#[test]
fn export_writes_summary_json() {
    let dir = setup();
    let (ok, _, stderr) = relgrade(
        dir.path(),
        &[
            "grade",
            "--input",
            "semester.json",
            "--previous-cgpa",
            "3.0",
            "--previous-credits",
            "30",
            "--export",
            "summary.json",
        ],
    );
    assert!(ok, "stderr: {stderr}");

    let raw = std::fs::read_to_string(dir.path().join("summary.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["name"], "Semester 4");
    assert_eq!(value["total_credits"], 7.0);
    assert_eq!(value["previous_credits"], 30.0);
    assert_eq!(value["subjects"][0]["predicted_grade"], "B+");
    let cgpa = value["cgpa"].as_f64().unwrap();
    let expected = (3.0 * 30.0 + 1.5 * 7.0) / 37.0;
    assert!((cgpa - expected).abs() < 1e-9);
}

#[test]
fn history_flags_must_come_together() {
    let dir = setup();
    let (ok, _, _) = relgrade(
        dir.path(),
        &["grade", "--input", "semester.json", "--previous-cgpa", "3.0"],
    );
    assert!(!ok);
}

#[test]
fn threshold_overrides_change_the_grade() {
    let dir = setup();
    let (ok, stdout, stderr) = relgrade(
        dir.path(),
        &["grade", "--input", "semester.json", "--threshold", "A=15"],
    );
    assert!(ok, "stderr: {stderr}");
    assert!(stdout.contains("Predicted Grade: A (4 points)"));
}

#[test]
fn scale_command_reads_custom_scale_file() {
    let dir = setup();
    std::fs::write(
        dir.path().join("scale.json"),
        r#"[{"threshold": 0.0, "letter": "P", "points": 1.0},
            {"threshold": -0.5, "letter": "N", "points": 0.0}]"#,
    )
    .unwrap();

    let (ok, stdout, stderr) = relgrade(dir.path(), &["scale", "--scale", "scale.json"]);
    assert!(ok, "stderr: {stderr}");
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        vec![
            "+0% relative to average: P (1.0 points)",
            "-50% relative to average: N (0.0 points)"
        ]
    );
}

#[test]
fn report_writes_markdown_from_csv() {
    let dir = setup();
    std::fs::write(
        dir.path().join("spring.csv"),
        "subject,credit_hours,component,weight,max_marks,my_marks,class_avg_marks\n\
         Statistics,3,Midterm,30,100,72,60\n\
         Statistics,3,Final,50,100,80,64\n",
    )
    .unwrap();

    let (ok, stdout, stderr) = relgrade(
        dir.path(),
        &["report", "--input", "spring.csv", "--out", "spring.md"],
    );
    assert!(ok, "stderr: {stderr}");
    assert!(stdout.contains("Report written to spring.md."));
    assert!(stderr.contains("normalizing"));

    let report = std::fs::read_to_string(dir.path().join("spring.md")).unwrap();
    assert!(report.contains("Generated for spring on"));
    assert!(report.contains("### Statistics (3 credits): A (4 points)"));
    assert!(report.contains("| Midterm | 37.5% |"));
}

#[test]
fn strict_weights_reject_short_subjects() {
    let dir = setup();
    std::fs::write(
        dir.path().join("short.csv"),
        "subject,credit_hours,component,weight,max_marks,my_marks,class_avg_marks\n\
         Statistics,3,Midterm,30,100,72,60\n",
    )
    .unwrap();

    let (ok, _, stderr) = relgrade(
        dir.path(),
        &["grade", "--input", "short.csv", "--strict-weights"],
    );
    assert!(!ok);
    assert!(stderr.contains("total 30.0% instead of 100%"));
}
