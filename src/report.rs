use std::fmt::Write;

use chrono::NaiveDate;

use crate::scale::GradeScale;
use crate::summary::{SemesterSummary, SubjectSummary};

pub fn render_scale(scale: &GradeScale) -> String {
    let mut output = String::new();
    for band in scale.bands() {
        let _ = writeln!(
            output,
            "{:+.0}% relative to average: {} ({:.1} points)",
            band.threshold * 100.0,
            band.grade.letter,
            band.grade.points
        );
    }
    output
}

pub fn render_subject(subject: &SubjectSummary) -> String {
    let mut output = String::new();
    let rule = "=".repeat(60);

    let _ = writeln!(output, "{rule}");
    let _ = writeln!(
        output,
        "Subject: {} ({} credits)",
        subject.name, subject.credit_hours
    );
    let _ = writeln!(output, "{rule}");
    let _ = writeln!(output);
    let _ = writeln!(output, "Component Breakdown:");
    let _ = writeln!(
        output,
        "{:<20} {:>8} {:>22} {:>22} {:>9}",
        "Component", "Weight", "My Score", "Class Avg", "Relative"
    );

    for comp in subject.components.iter() {
        let mine = format!(
            "{}/{} ({:.1}%)",
            comp.my_marks, comp.max_marks, comp.my_percentage
        );
        let class = format!(
            "{}/{} ({:.1}%)",
            comp.class_avg_marks, comp.max_marks, comp.class_avg_percentage
        );
        let _ = writeln!(
            output,
            "{:<20} {:>7.1}% {:>22} {:>22} {:>+8.1}%",
            comp.name, comp.weight, mine, class, comp.relative_performance_percentage
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "My weighted total: {:.1}/100",
        subject.weighted_my_score
    );
    let _ = writeln!(
        output,
        "Class average: {:.1}/100",
        subject.weighted_class_avg
    );
    let _ = writeln!(
        output,
        "Relative performance: {:+.1}%",
        subject.relative_performance_percentage
    );
    let _ = writeln!(
        output,
        "Predicted Grade: {} ({} points)",
        subject.predicted_grade, subject.grade_points
    );

    output
}

pub fn render_semester(summary: &SemesterSummary) -> String {
    let mut output = String::new();
    let rule = "#".repeat(70);

    let _ = writeln!(output, "{rule}");
    let _ = writeln!(output, "Semester: {}", summary.name);
    let _ = writeln!(output, "{rule}");

    for subject in summary.subjects.iter() {
        let _ = writeln!(output);
        output.push_str(&render_subject(subject));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "{rule}");
    let _ = writeln!(output, "Semester GPA (SGPA): {:.2}", summary.sgpa);
    if let Some(cgpa) = summary.cgpa {
        let _ = writeln!(output, "Cumulative GPA (CGPA): {:.2}", cgpa);
    }
    let _ = writeln!(output, "{rule}");

    output
}

pub fn build_report(summary: &SemesterSummary, scale: &GradeScale, generated_on: NaiveDate) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Academic Performance Report");
    let _ = writeln!(
        output,
        "Generated for {} on {}",
        summary.name, generated_on
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Results");
    let _ = writeln!(output, "- SGPA: {:.2}", summary.sgpa);
    match summary.cgpa {
        Some(cgpa) => {
            let _ = writeln!(output, "- CGPA: {:.2}", cgpa);
        }
        None => {
            let _ = writeln!(output, "- CGPA: no prior history supplied");
        }
    }
    let _ = writeln!(output, "- Credit hours this semester: {}", summary.total_credits);
    if let (Some(cgpa), Some(credits)) = (summary.previous_cgpa, summary.previous_credits) {
        let _ = writeln!(output, "- Previous record: {:.2} over {} credit hours", cgpa, credits);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Subjects");

    if summary.subjects.is_empty() {
        let _ = writeln!(output, "No subjects recorded for this semester.");
    }

    for subject in summary.subjects.iter() {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "### {} ({} credits): {} ({} points)",
            subject.name, subject.credit_hours, subject.predicted_grade, subject.grade_points
        );
        let _ = writeln!(
            output,
            "Weighted total {:.1}/100 against a class average of {:.1}/100 ({:+.1}%).",
            subject.weighted_my_score,
            subject.weighted_class_avg,
            subject.relative_performance_percentage
        );
        let _ = writeln!(output);
        let _ = writeln!(output, "| Component | Weight | My Score | Class Avg | Relative |");
        let _ = writeln!(output, "|---|---:|---:|---:|---:|");
        for comp in subject.components.iter() {
            let _ = writeln!(
                output,
                "| {} | {:.1}% | {}/{} ({:.1}%) | {}/{} ({:.1}%) | {:+.1}% |",
                comp.name,
                comp.weight,
                comp.my_marks,
                comp.max_marks,
                comp.my_percentage,
                comp.class_avg_marks,
                comp.max_marks,
                comp.class_avg_percentage,
                comp.relative_performance_percentage
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Grade Scale");
    for band in scale.bands() {
        let _ = writeln!(
            output,
            "- {:+.0}%: {} ({:.1} points)",
            band.threshold * 100.0,
            band.grade.letter,
            band.grade.points
        );
    }

    output
}
