use crate::models::{Semester, Subject};
use crate::scale::{Grade, GradeScale};

/// The grade a subject earns under `scale`.
pub fn subject_grade<'a>(subject: &Subject, scale: &'a GradeScale) -> &'a Grade {
    scale.predict_grade(subject.overall_relative_performance())
}

impl Semester {
    pub fn total_credits(&self) -> f64 {
        self.subjects.iter().map(|subject| subject.credit_hours).sum()
    }

    /// Credit-weighted mean of each subject's grade points. 0 without credits.
    pub fn calculate_sgpa(&self, scale: &GradeScale) -> f64 {
        let total_credits = self.total_credits();
        if total_credits == 0.0 {
            return 0.0;
        }

        let credit_points: f64 = self
            .subjects
            .iter()
            .map(|subject| subject_grade(subject, scale).points * subject.credit_hours)
            .sum();

        credit_points / total_credits
    }

    /// Blends prior history with this semester by credit hours. Without a
    /// complete history this is the SGPA.
    pub fn calculate_cgpa(&self, scale: &GradeScale) -> f64 {
        let sgpa = self.calculate_sgpa(scale);
        let (previous_cgpa, previous_credits) = match (self.previous_cgpa, self.previous_credits) {
            (Some(cgpa), Some(credits)) => (cgpa, credits),
            _ => return sgpa,
        };

        if previous_credits == 0.0 {
            return sgpa;
        }

        let current_credits = self.total_credits();
        let total_credits = previous_credits + current_credits;
        if total_credits == 0.0 {
            return sgpa;
        }

        (previous_cgpa * previous_credits + sgpa * current_credits) / total_credits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Component;
    use crate::scale::GradeBand;

    fn subject(name: &str, credits: f64, my_marks: f64, class_avg: f64) -> Subject {
        Subject::new(
            name,
            credits,
            vec![Component::new("Final", 100.0, 100.0, my_marks, class_avg)],
        )
    }

    #[test]
    fn empty_semester_scores_zero() {
        let semester = Semester::new("Empty", Vec::new());
        assert_eq!(semester.calculate_sgpa(&GradeScale::default()), 0.0);
        assert_eq!(semester.calculate_cgpa(&GradeScale::default()), 0.0);
    }

    #[test]
    fn sgpa_weights_points_by_credits() {
        let scale = GradeScale::default();
        let semester = Semester::new(
            "Spring",
            vec![
                // +25% -> A (4.0)
                subject("Algebra", 3.0, 75.0, 60.0),
                // 0% -> C+ (2.5)
                subject("History", 1.0, 60.0, 60.0),
            ],
        );

        let expected = (4.0 * 3.0 + 2.5 * 1.0) / 4.0;
        assert!((semester.calculate_sgpa(&scale) - expected).abs() < 1e-9);
        assert_eq!(semester.total_credits(), 4.0);
    }

    #[test]
    fn cgpa_blends_history_with_current_credits() {
        let scale = GradeScale::from_bands(vec![
            GradeBand::new(0.0, "A-", 3.6),
            GradeBand::new(-1.0, "F", 0.0),
        ])
        .unwrap();
        let semester = Semester::new(
            "Third",
            vec![
                subject("Optics", 9.0, 70.0, 60.0),
                subject("Circuits", 6.0, 90.0, 60.0),
            ],
        )
        .with_history(3.0, 30.0);

        assert!((semester.calculate_sgpa(&scale) - 3.6).abs() < 1e-9);
        assert!((semester.calculate_cgpa(&scale) - 3.2).abs() < 1e-9);
    }

    #[test]
    fn gpa_is_repeatable() {
        let scale = GradeScale::default();
        let semester = Semester::new(
            "Fourth",
            vec![subject("Ecology", 3.0, 71.0, 64.0), subject("Ethics", 2.0, 55.0, 60.0)],
        )
        .with_history(3.3, 48.0);

        let sgpa = semester.calculate_sgpa(&scale);
        let cgpa = semester.calculate_cgpa(&scale);
        assert_eq!(semester.calculate_sgpa(&scale), sgpa);
        assert_eq!(semester.calculate_cgpa(&scale), cgpa);
    }

    #[test]
    fn zero_previous_credits_ignores_previous_cgpa() {
        let scale = GradeScale::default();
        let subjects = vec![subject("Chemistry", 3.0, 66.0, 60.0), subject("Art", 2.0, 50.0, 61.0)];

        for previous_cgpa in [0.0, 1.7, 4.0] {
            let semester = Semester::new("First", subjects.clone()).with_history(previous_cgpa, 0.0);
            assert_eq!(semester.calculate_cgpa(&scale), semester.calculate_sgpa(&scale));
        }
    }

    #[test]
    fn half_a_history_falls_back_to_sgpa() {
        let scale = GradeScale::default();
        let mut semester = Semester::new("Second", vec![subject("Biology", 4.0, 50.0, 60.0)]);
        semester.previous_cgpa = Some(3.9);

        assert_eq!(semester.calculate_cgpa(&scale), semester.calculate_sgpa(&scale));
    }

    #[test]
    fn zero_current_credits_contribute_nothing() {
        let scale = GradeScale::default();
        let semester = Semester::new("Audit", vec![subject("Audit", 0.0, 80.0, 60.0)])
            .with_history(3.4, 20.0);

        assert_eq!(semester.calculate_sgpa(&scale), 0.0);
        assert!((semester.calculate_cgpa(&scale) - 3.4).abs() < 1e-9);
    }
}
