//! Serializable snapshots of a graded semester.
//!
//! These are the export format: key names are stable and written as-is to
//! JSON. A summary is rebuilt from the semester every time it is needed.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::gpa::subject_grade;
use crate::models::{Component, Semester, Subject};
use crate::scale::GradeScale;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSummary {
    pub name: String,
    pub weight: f64,
    pub my_marks: f64,
    pub max_marks: f64,
    pub class_avg_marks: f64,
    pub my_percentage: f64,
    pub class_avg_percentage: f64,
    pub weighted_my_score: f64,
    pub weighted_class_avg: f64,
    pub relative_performance: f64,
    pub relative_performance_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub name: String,
    pub credit_hours: f64,
    pub my_total_raw: f64,
    pub max_total_raw: f64,
    pub class_avg_raw: f64,
    pub my_percentage: f64,
    pub class_avg_percentage: f64,
    pub weighted_my_score: f64,
    pub weighted_class_avg: f64,
    pub relative_performance: f64,
    pub relative_performance_percentage: f64,
    pub predicted_grade: String,
    pub grade_points: f64,
    pub components: Vec<ComponentSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterSummary {
    pub name: String,
    pub subjects: Vec<SubjectSummary>,
    pub sgpa: f64,
    pub cgpa: Option<f64>,
    pub total_credits: f64,
    pub previous_cgpa: Option<f64>,
    pub previous_credits: Option<f64>,
}

pub fn summarize_component(component: &Component) -> ComponentSummary {
    let relative_performance = component.relative_performance();
    ComponentSummary {
        name: component.name().to_string(),
        weight: component.weight(),
        my_marks: component.my_marks(),
        max_marks: component.max_marks(),
        class_avg_marks: component.class_avg_marks(),
        my_percentage: component.my_percentage(),
        class_avg_percentage: component.class_avg_percentage(),
        weighted_my_score: component.weighted_my_score(),
        weighted_class_avg: component.weighted_class_avg(),
        relative_performance,
        relative_performance_percentage: relative_performance * 100.0,
    }
}

/// Uses the same grade lookup as the semester GPA, so the letter and points
/// shown here are the ones counted in SGPA/CGPA.
pub fn summarize_subject(subject: &Subject, scale: &GradeScale) -> SubjectSummary {
    let grade = subject_grade(subject, scale);
    let my_total = subject.total_my_marks();
    let max_total = subject.total_max_marks();
    let class_avg_total = subject.total_class_avg_marks();
    let relative_performance = subject.overall_relative_performance();

    let share_of_max = |marks: f64| {
        if max_total == 0.0 {
            0.0
        } else {
            marks / max_total * 100.0
        }
    };

    SubjectSummary {
        name: subject.name.clone(),
        credit_hours: subject.credit_hours,
        my_total_raw: my_total,
        max_total_raw: max_total,
        class_avg_raw: class_avg_total,
        my_percentage: share_of_max(my_total),
        class_avg_percentage: share_of_max(class_avg_total),
        weighted_my_score: subject.weighted_total_my_score(),
        weighted_class_avg: subject.weighted_total_class_avg(),
        relative_performance,
        relative_performance_percentage: relative_performance * 100.0,
        predicted_grade: grade.letter.clone(),
        grade_points: grade.points,
        components: subject.components().iter().map(summarize_component).collect(),
    }
}

pub fn summarize_semester(semester: &Semester, scale: &GradeScale) -> SemesterSummary {
    let cgpa = if semester.has_prior_history() {
        Some(semester.calculate_cgpa(scale))
    } else {
        None
    };

    SemesterSummary {
        name: semester.name.clone(),
        subjects: semester
            .subjects
            .iter()
            .map(|subject| summarize_subject(subject, scale))
            .collect(),
        sgpa: semester.calculate_sgpa(scale),
        cgpa,
        total_credits: semester.total_credits(),
        previous_cgpa: semester.previous_cgpa,
        previous_credits: semester.previous_credits,
    }
}

impl SemesterSummary {
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
