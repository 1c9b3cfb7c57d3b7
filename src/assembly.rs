//! Turns loosely structured input into validated semesters.
//!
//! Everything the grading core assumes (positive max marks, marks inside
//! their range, weights summing to 100, at least one subject and component)
//! is checked here. Nothing downstream re-validates.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::InputError;
use crate::models::{Component, Semester, Subject};

/// How far a subject's weights may drift from 100 before the policy applies.
pub const WEIGHT_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WeightPolicy {
    /// Rescale every weight by 100 / total.
    #[default]
    Normalize,
    /// Reject subjects whose weights are off 100.
    Strict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    #[default]
    Equal,
    ByMaxMarks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub max_marks: f64,
    pub my_marks: f64,
    pub class_avg_marks: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInput {
    pub name: String,
    pub weight: f64,
    pub max_marks: f64,
    pub my_marks: f64,
    pub class_avg_marks: f64,
}

/// Several similar items ("Quiz 1".."Quiz 4") sharing one total weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInput {
    pub base_name: String,
    pub total_weight: f64,
    #[serde(default)]
    pub distribution: Distribution,
    pub items: Vec<ComponentScore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabSplit {
    pub theory_credits: f64,
    pub lab_credits: f64,
}

impl LabSplit {
    /// 70% theory, 30% lab.
    pub fn suggested(total_credits: f64) -> Self {
        Self {
            theory_credits: total_credits * 0.7,
            lab_credits: total_credits * 0.3,
        }
    }

    pub fn total(&self) -> f64 {
        self.theory_credits + self.lab_credits
    }

    fn label(&self) -> String {
        format!(
            "(Theory: {}, Lab: {})",
            self.theory_credits, self.lab_credits
        )
    }
}

/// A theory/lab split as written in input. Missing parts are derived from
/// the subject's credit hours: one missing part is the remainder, both
/// missing gives the suggested split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LabInput {
    #[serde(default)]
    pub theory_credits: Option<f64>,
    #[serde(default)]
    pub lab_credits: Option<f64>,
}

impl LabInput {
    pub fn explicit(theory_credits: f64, lab_credits: f64) -> Self {
        Self {
            theory_credits: Some(theory_credits),
            lab_credits: Some(lab_credits),
        }
    }

    /// `None` when a part is missing and there are no credit hours to
    /// derive it from.
    pub fn resolve(&self, credit_hours: Option<f64>) -> Option<LabSplit> {
        match (self.theory_credits, self.lab_credits, credit_hours) {
            (Some(theory_credits), Some(lab_credits), _) => Some(LabSplit {
                theory_credits,
                lab_credits,
            }),
            (Some(theory_credits), None, Some(total)) => Some(LabSplit {
                theory_credits,
                lab_credits: total - theory_credits,
            }),
            (None, Some(lab_credits), Some(total)) => Some(LabSplit {
                theory_credits: total - lab_credits,
                lab_credits,
            }),
            (None, None, Some(total)) => Some(LabSplit::suggested(total)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectInput {
    pub name: String,
    #[serde(default)]
    pub credit_hours: Option<f64>,
    #[serde(default)]
    pub lab: Option<LabInput>,
    /// Preset template; `scores` fill its slots in order.
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub scores: Vec<ComponentScore>,
    #[serde(default)]
    pub components: Vec<ComponentInput>,
    #[serde(default)]
    pub groups: Vec<GroupInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemesterInput {
    pub name: String,
    #[serde(default)]
    pub previous_cgpa: Option<f64>,
    #[serde(default)]
    pub previous_credits: Option<f64>,
    pub subjects: Vec<SubjectInput>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetSlot {
    pub name: &'static str,
    pub weight: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub slots: &'static [PresetSlot],
}

const fn slot(name: &'static str, weight: f64, count: usize) -> PresetSlot {
    PresetSlot {
        name,
        weight,
        count,
    }
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "Standard Academic",
        slots: &[
            slot("Quizzes", 10.0, 4),
            slot("Assignments", 10.0, 2),
            slot("Mid-Semester Exam", 30.0, 1),
            slot("End-Semester Exam", 50.0, 1),
        ],
    },
    Preset {
        name: "Lab Course",
        slots: &[
            slot("Lab Reports", 30.0, 8),
            slot("Lab Performance", 30.0, 1),
            slot("Lab Project", 20.0, 1),
            slot("Lab Exam", 20.0, 1),
        ],
    },
    Preset {
        name: "Project Based",
        slots: &[
            slot("Progress Reports", 20.0, 3),
            slot("Presentations", 30.0, 2),
            slot("Final Project", 40.0, 1),
            slot("Peer Review", 10.0, 1),
        ],
    },
];

pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
}

impl Preset {
    /// One (name, weight) per component; grouped slots split their weight
    /// equally and number their items from 1.
    pub fn expand(&self) -> Vec<(String, f64)> {
        let mut expanded = Vec::new();
        for slot in self.slots {
            if slot.count > 1 {
                let each = slot.weight / slot.count as f64;
                for i in 1..=slot.count {
                    expanded.push((format!("{} {}", slot.name, i), each));
                }
            } else {
                expanded.push((slot.name.to_string(), slot.weight));
            }
        }
        expanded
    }
}

fn check_score(component: &str, score: &ComponentScore) -> Result<(), InputError> {
    if !(score.max_marks > 0.0) {
        return Err(InputError::NonPositiveMaxMarks {
            component: component.to_string(),
            max_marks: score.max_marks,
        });
    }
    for (field, value) in [
        ("my marks", score.my_marks),
        ("class average", score.class_avg_marks),
    ] {
        if !(0.0..=score.max_marks).contains(&value) {
            return Err(InputError::MarksOutOfRange {
                component: component.to_string(),
                field,
                value,
                max_marks: score.max_marks,
            });
        }
    }
    Ok(())
}

fn build_component(
    subject: &str,
    name: &str,
    weight: f64,
    score: &ComponentScore,
) -> Result<Component, InputError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InputError::EmptyComponentName {
            subject: subject.to_string(),
        });
    }
    if !(weight > 0.0 && weight <= 100.0) {
        return Err(InputError::InvalidWeight {
            component: name.to_string(),
            weight,
        });
    }
    check_score(name, score)?;
    Ok(Component::new(
        name,
        weight,
        score.max_marks,
        score.my_marks,
        score.class_avg_marks,
    ))
}

pub fn expand_group(subject: &str, group: &GroupInput) -> Result<Vec<Component>, InputError> {
    if group.items.is_empty() {
        return Err(InputError::EmptyGroup(group.base_name.clone()));
    }
    if !(group.total_weight > 0.0) {
        return Err(InputError::NonPositiveGroupWeight {
            group: group.base_name.clone(),
            weight: group.total_weight,
        });
    }

    let count = group.items.len() as f64;
    let total_max: f64 = group.items.iter().map(|item| item.max_marks).sum();
    let by_marks = group.distribution == Distribution::ByMaxMarks && total_max > 0.0;

    group
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let weight = if by_marks {
                item.max_marks / total_max * group.total_weight
            } else {
                group.total_weight / count
            };
            let name = format!("{} {}", group.base_name.trim(), i + 1);
            build_component(subject, &name, weight, item)
        })
        .collect()
}

/// Rescales weights so they sum to 100. `None` when they sum to zero.
pub fn normalize_weights(components: &[Component]) -> Option<Vec<Component>> {
    let total: f64 = components.iter().map(Component::weight).sum();
    if total == 0.0 {
        return None;
    }
    Some(
        components
            .iter()
            .map(|comp| comp.with_weight(comp.weight() / total * 100.0))
            .collect(),
    )
}

fn finalize_weights(
    subject: &str,
    components: Vec<Component>,
    policy: WeightPolicy,
) -> Result<Vec<Component>, InputError> {
    let total: f64 = components.iter().map(Component::weight).sum();
    if (total - 100.0).abs() <= WEIGHT_TOLERANCE {
        return Ok(components);
    }

    match policy {
        WeightPolicy::Strict => Err(InputError::WeightMismatch {
            subject: subject.to_string(),
            total,
        }),
        WeightPolicy::Normalize => {
            warn!(subject, total, "component weights do not total 100%, normalizing");
            normalize_weights(&components).ok_or_else(|| InputError::ZeroTotalWeight {
                subject: subject.to_string(),
            })
        }
    }
}

pub fn assemble_subject(input: &SubjectInput, policy: WeightPolicy) -> Result<Subject, InputError> {
    let base_name = input.name.trim();
    if base_name.is_empty() {
        return Err(InputError::EmptySubjectName);
    }

    let (name, credits) = match (&input.lab, input.credit_hours) {
        (Some(lab), stated) => {
            let split = lab.resolve(stated).ok_or_else(|| InputError::MissingCredits {
                subject: base_name.to_string(),
            })?;
            if !(split.theory_credits >= 0.0 && split.lab_credits >= 0.0) {
                return Err(InputError::InvalidLabSplit {
                    subject: base_name.to_string(),
                    theory_credits: split.theory_credits,
                    lab_credits: split.lab_credits,
                });
            }
            let explicit = lab.theory_credits.is_some() && lab.lab_credits.is_some();
            let credits = match stated {
                Some(stated) if !explicit => stated,
                Some(stated) if (stated - split.total()).abs() > f64::EPSILON => {
                    warn!(
                        subject = base_name,
                        stated,
                        split = split.total(),
                        "credit hours differ from the theory/lab split, using the split"
                    );
                    split.total()
                }
                _ => split.total(),
            };
            (format!("{} {}", base_name, split.label()), credits)
        }
        (None, Some(credits)) => (base_name.to_string(), credits),
        (None, None) => {
            return Err(InputError::MissingCredits {
                subject: base_name.to_string(),
            })
        }
    };
    if !(credits > 0.0) {
        return Err(InputError::NonPositiveCredits {
            subject: name,
            credits,
        });
    }

    let mut components = Vec::new();

    if let Some(preset_name) = &input.preset {
        let preset = find_preset(preset_name)
            .ok_or_else(|| InputError::UnknownPreset(preset_name.clone()))?;
        let slots = preset.expand();
        if slots.len() != input.scores.len() {
            return Err(InputError::PresetScoreCount {
                preset: preset.name.to_string(),
                expected: slots.len(),
                got: input.scores.len(),
            });
        }
        for ((slot_name, weight), score) in slots.iter().zip(input.scores.iter()) {
            components.push(build_component(&name, slot_name, *weight, score)?);
        }
    }

    for comp in input.components.iter() {
        let score = ComponentScore {
            max_marks: comp.max_marks,
            my_marks: comp.my_marks,
            class_avg_marks: comp.class_avg_marks,
        };
        components.push(build_component(&name, &comp.name, comp.weight, &score)?);
    }

    for group in input.groups.iter() {
        components.extend(expand_group(&name, group)?);
    }

    if components.is_empty() {
        return Err(InputError::NoComponents { subject: name });
    }

    let components = finalize_weights(&name, components, policy)?;
    debug!(subject = %name, credits, components = components.len(), "assembled subject");
    Ok(Subject::new(name, credits, components))
}

pub fn assemble_semester(input: &SemesterInput, policy: WeightPolicy) -> Result<Semester, InputError> {
    if input.subjects.is_empty() {
        return Err(InputError::NoSubjects);
    }

    let subjects = input
        .subjects
        .iter()
        .map(|subject| assemble_subject(subject, policy))
        .collect::<Result<Vec<_>, _>>()?;

    let semester = Semester::new(input.name.trim(), subjects);
    match (input.previous_cgpa, input.previous_credits) {
        (None, None) => Ok(semester),
        (Some(cgpa), Some(credits)) => {
            if !(0.0..=4.0).contains(&cgpa) {
                return Err(InputError::PreviousCgpaOutOfRange(cgpa));
            }
            if !(credits >= 0.0) {
                return Err(InputError::NegativePreviousCredits(credits));
            }
            Ok(semester.with_history(cgpa, credits))
        }
        _ => Err(InputError::IncompleteHistory),
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    subject: String,
    credit_hours: f64,
    component: String,
    weight: f64,
    max_marks: f64,
    my_marks: f64,
    class_avg_marks: f64,
}

/// One row per component; rows for a subject must agree on credit hours.
/// Subjects keep the order in which they first appear.
pub fn subjects_from_csv<R: Read>(reader: R) -> anyhow::Result<Vec<SubjectInput>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut subjects: Vec<SubjectInput> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (line, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("invalid CSV record {}", line + 1))?;
        let position = *index.entry(row.subject.clone()).or_insert_with(|| {
            subjects.push(SubjectInput {
                name: row.subject.clone(),
                credit_hours: Some(row.credit_hours),
                ..SubjectInput::default()
            });
            subjects.len() - 1
        });

        let subject = &mut subjects[position];
        if let Some(first) = subject.credit_hours {
            if first != row.credit_hours {
                return Err(InputError::ConflictingCredits {
                    subject: row.subject,
                    first,
                    second: row.credit_hours,
                }
                .into());
            }
        }
        subject.components.push(ComponentInput {
            name: row.component,
            weight: row.weight,
            max_marks: row.max_marks,
            my_marks: row.my_marks,
            class_avg_marks: row.class_avg_marks,
        });
    }

    Ok(subjects)
}

/// Loads a semester document. `.csv` files hold component rows and take the
/// semester name from `name` or the file stem; anything else is read as JSON.
pub fn load_semester_input(path: &Path, name: Option<&str>) -> anyhow::Result<SemesterInput> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let mut input = if is_csv {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let subjects = subjects_from_csv(file)
            .with_context(|| format!("failed to import {}", path.display()))?;
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("Semester")
            .to_string();
        SemesterInput {
            name: stem,
            previous_cgpa: None,
            previous_credits: None,
            subjects,
        }
    } else {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a valid semester document", path.display()))?
    };

    if let Some(name) = name {
        input.name = name.to_string();
    }
    debug!(path = %path.display(), subjects = input.subjects.len(), "loaded semester input");
    Ok(input)
}
