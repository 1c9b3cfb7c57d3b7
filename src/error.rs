use thiserror::Error;

/// Reasons a grade scale cannot be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    #[error("a grade scale needs at least one band")]
    Empty,
    #[error("threshold {0} for grade {1} is not a finite number")]
    NonFiniteThreshold(f64, String),
    #[error("grade {letter} has invalid points {points}")]
    InvalidPoints { letter: String, points: f64 },
    #[error("threshold {threshold} is used by both {first} and {second}")]
    DuplicateThreshold {
        threshold: f64,
        first: String,
        second: String,
    },
    #[error("grade {0} is not part of this scale")]
    UnknownGrade(String),
}

/// Input that must be rejected before it reaches the grading core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("a semester needs at least one subject")]
    NoSubjects,
    #[error("subject name cannot be empty")]
    EmptySubjectName,
    #[error("component name in {subject} cannot be empty")]
    EmptyComponentName { subject: String },
    #[error("{subject} has no components")]
    NoComponents { subject: String },
    #[error("{subject} needs credit hours or a theory/lab split")]
    MissingCredits { subject: String },
    #[error("theory/lab split for {subject} cannot be negative, got {theory_credits} and {lab_credits}")]
    InvalidLabSplit {
        subject: String,
        theory_credits: f64,
        lab_credits: f64,
    },
    #[error("credit hours for {subject} must be greater than zero, got {credits}")]
    NonPositiveCredits { subject: String, credits: f64 },
    #[error("max marks for {component} must be greater than zero, got {max_marks}")]
    NonPositiveMaxMarks { component: String, max_marks: f64 },
    #[error("{field} for {component} must be between 0 and {max_marks}, got {value}")]
    MarksOutOfRange {
        component: String,
        field: &'static str,
        value: f64,
        max_marks: f64,
    },
    #[error("weight for {component} must be greater than 0 and at most 100, got {weight}")]
    InvalidWeight { component: String, weight: f64 },
    #[error("component weights in {subject} total {total:.1}% instead of 100%")]
    WeightMismatch { subject: String, total: f64 },
    #[error("component weights in {subject} total zero and cannot be normalized")]
    ZeroTotalWeight { subject: String },
    #[error("unknown preset {0}")]
    UnknownPreset(String),
    #[error("preset {preset} has {expected} slots but {got} scores were given")]
    PresetScoreCount {
        preset: String,
        expected: usize,
        got: usize,
    },
    #[error("group {0} needs at least one item")]
    EmptyGroup(String),
    #[error("total weight for group {group} must be greater than zero, got {weight}")]
    NonPositiveGroupWeight { group: String, weight: f64 },
    #[error("previous CGPA must be between 0 and 4, got {0}")]
    PreviousCgpaOutOfRange(f64),
    #[error("previous credit hours cannot be negative, got {0}")]
    NegativePreviousCredits(f64),
    #[error("previous CGPA and previous credit hours must be given together")]
    IncompleteHistory,
    #[error("{subject} is listed with credit hours {first} and {second}")]
    ConflictingCredits {
        subject: String,
        first: f64,
        second: f64,
    },
}
