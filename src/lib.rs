//! Grades a semester relative to class averages.
//!
//! Components roll up into subjects, subjects are graded on a relative
//! performance scale, and the grade points roll up into SGPA and CGPA.

pub mod assembly;
pub mod error;
pub mod gpa;
pub mod models;
pub mod report;
pub mod scale;
pub mod summary;

pub use error::{InputError, ScaleError};
pub use models::{Component, Semester, Subject};
pub use scale::{Grade, GradeBand, GradeScale};
pub use summary::{summarize_semester, summarize_subject, SemesterSummary, SubjectSummary};
