/// One graded item (a quiz, an assignment, an exam).
///
/// `weight` is the number of percentage points this item contributes to its
/// subject's 100-point total. Every metric is derived on access, so a
/// component rebuilt with a new weight never carries stale values.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    name: String,
    weight: f64,
    max_marks: f64,
    my_marks: f64,
    class_avg_marks: f64,
}

impl Component {
    pub fn new(
        name: impl Into<String>,
        weight: f64,
        max_marks: f64,
        my_marks: f64,
        class_avg_marks: f64,
    ) -> Self {
        Self {
            name: name.into(),
            weight,
            max_marks,
            my_marks,
            class_avg_marks,
        }
    }

    /// Returns a copy of this component carrying `weight` instead.
    pub fn with_weight(&self, weight: f64) -> Self {
        Self {
            weight,
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn max_marks(&self) -> f64 {
        self.max_marks
    }

    pub fn my_marks(&self) -> f64 {
        self.my_marks
    }

    pub fn class_avg_marks(&self) -> f64 {
        self.class_avg_marks
    }

    pub fn my_percentage(&self) -> f64 {
        self.my_marks / self.max_marks * 100.0
    }

    pub fn class_avg_percentage(&self) -> f64 {
        self.class_avg_marks / self.max_marks * 100.0
    }

    pub fn weighted_my_score(&self) -> f64 {
        self.my_marks / self.max_marks * self.weight
    }

    pub fn weighted_class_avg(&self) -> f64 {
        self.class_avg_marks / self.max_marks * self.weight
    }

    /// (mine - class average) / class average, or 0 when the class average is 0.
    pub fn relative_performance(&self) -> f64 {
        if self.class_avg_marks == 0.0 {
            return 0.0;
        }
        (self.my_marks - self.class_avg_marks) / self.class_avg_marks
    }
}

/// A course made of weighted components.
#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    pub name: String,
    pub credit_hours: f64,
    components: Vec<Component>,
}

impl Subject {
    pub fn new(name: impl Into<String>, credit_hours: f64, components: Vec<Component>) -> Self {
        Self {
            name: name.into(),
            credit_hours,
            components,
        }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn total_my_marks(&self) -> f64 {
        self.components.iter().map(Component::my_marks).sum()
    }

    pub fn total_max_marks(&self) -> f64 {
        self.components.iter().map(Component::max_marks).sum()
    }

    pub fn total_class_avg_marks(&self) -> f64 {
        self.components.iter().map(Component::class_avg_marks).sum()
    }

    pub fn weighted_total_my_score(&self) -> f64 {
        self.components.iter().map(Component::weighted_my_score).sum()
    }

    pub fn weighted_total_class_avg(&self) -> f64 {
        self.components.iter().map(Component::weighted_class_avg).sum()
    }

    pub fn total_weight(&self) -> f64 {
        self.components.iter().map(Component::weight).sum()
    }

    pub fn overall_relative_performance(&self) -> f64 {
        let class_avg = self.weighted_total_class_avg();
        if class_avg == 0.0 {
            return 0.0;
        }
        (self.weighted_total_my_score() - class_avg) / class_avg
    }
}

/// One grading session: the current subjects plus optional prior history.
///
/// `previous_cgpa` and `previous_credits` are meant to travel as a pair. When
/// either is missing the cumulative figure degenerates to the semester one.
#[derive(Debug, Clone, PartialEq)]
pub struct Semester {
    pub name: String,
    pub subjects: Vec<Subject>,
    pub previous_cgpa: Option<f64>,
    pub previous_credits: Option<f64>,
}

impl Semester {
    pub fn new(name: impl Into<String>, subjects: Vec<Subject>) -> Self {
        Self {
            name: name.into(),
            subjects,
            previous_cgpa: None,
            previous_credits: None,
        }
    }

    pub fn with_history(mut self, previous_cgpa: f64, previous_credits: f64) -> Self {
        self.previous_cgpa = Some(previous_cgpa);
        self.previous_credits = Some(previous_credits);
        self
    }

    pub fn has_prior_history(&self) -> bool {
        self.previous_cgpa.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn component_metrics_follow_marks_and_weight() {
        let quiz = Component::new("Quiz 1", 50.0, 100.0, 80.0, 60.0);

        assert!(close(quiz.my_percentage(), 80.0));
        assert!(close(quiz.class_avg_percentage(), 60.0));
        assert!(close(quiz.weighted_my_score(), 40.0));
        assert!(close(quiz.weighted_class_avg(), 30.0));
        assert!(close(quiz.relative_performance(), 20.0 / 60.0));
    }

    #[test]
    fn weighted_score_tracks_percentage() {
        let samples = [
            Component::new("a", 12.5, 40.0, 33.0, 21.0),
            Component::new("b", 30.0, 7.0, 0.0, 7.0),
            Component::new("c", 100.0, 250.0, 250.0, 125.5),
        ];

        for comp in samples.iter() {
            assert!(close(
                comp.weighted_my_score() / comp.weight(),
                comp.my_percentage() / 100.0
            ));
        }
    }

    #[test]
    fn zero_class_average_yields_zero_relative_performance() {
        let lab = Component::new("Lab", 20.0, 10.0, 9.0, 0.0);
        assert_eq!(lab.relative_performance(), 0.0);
    }

    #[test]
    fn with_weight_leaves_original_untouched() {
        let exam = Component::new("Final", 40.0, 100.0, 70.0, 50.0);
        let scaled = exam.with_weight(80.0);

        assert_eq!(exam.weight(), 40.0);
        assert_eq!(scaled.weight(), 80.0);
        assert!(close(scaled.weighted_my_score(), 56.0));
        assert_eq!(scaled.name(), "Final");
    }

    #[test]
    fn subject_totals_are_sums_of_components() {
        let subject = Subject::new(
            "Physics",
            3.0,
            vec![
                Component::new("Midterm", 50.0, 100.0, 80.0, 60.0),
                Component::new("Final", 50.0, 100.0, 60.0, 60.0),
            ],
        );

        assert!(close(subject.total_my_marks(), 140.0));
        assert!(close(subject.total_max_marks(), 200.0));
        assert!(close(subject.total_class_avg_marks(), 120.0));

        let my_sum: f64 = subject.components().iter().map(|c| c.weighted_my_score()).sum();
        let avg_sum: f64 = subject.components().iter().map(|c| c.weighted_class_avg()).sum();
        assert!(close(subject.weighted_total_my_score(), my_sum));
        assert!(close(subject.weighted_total_class_avg(), avg_sum));
        assert!(close(subject.weighted_total_my_score(), 70.0));
        assert!(close(subject.weighted_total_class_avg(), 60.0));
        assert!(close(
            subject.overall_relative_performance(),
            (70.0 - 60.0) / 60.0
        ));
    }

    #[test]
    fn subject_without_class_average_is_neutral() {
        let subject = Subject::new(
            "Seminar",
            1.0,
            vec![Component::new("Talk", 100.0, 10.0, 8.0, 0.0)],
        );
        assert_eq!(subject.overall_relative_performance(), 0.0);
    }

    #[test]
    fn subject_metrics_are_repeatable() {
        let subject = Subject::new(
            "Geology",
            2.0,
            vec![
                Component::new("Field Report", 35.0, 40.0, 31.0, 27.5),
                Component::new("Final", 65.0, 80.0, 52.0, 49.0),
            ],
        );

        let first = subject.overall_relative_performance();
        assert_eq!(subject.overall_relative_performance(), first);
        assert_eq!(subject.weighted_total_my_score(), subject.weighted_total_my_score());
        let report = &subject.components()[0];
        assert_eq!(report.relative_performance(), report.relative_performance());
    }

    #[test]
    fn history_is_attached_as_a_pair() {
        let semester = Semester::new("Fall", Vec::new());
        assert!(!semester.has_prior_history());

        let semester = semester.with_history(3.1, 45.0);
        assert!(semester.has_prior_history());
        assert_eq!(semester.previous_cgpa, Some(3.1));
        assert_eq!(semester.previous_credits, Some(45.0));
    }
}
