//! Relative-performance grade scales.
//!
//! A scale is an ordered list of bands. Each band maps the lowest relative
//! performance that earns it (0.20 means 20% above the class average) to a
//! letter and its grade points. Bands are kept sorted from the highest
//! threshold down, so prediction is a single forward scan.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ScaleError;

/// A letter grade and the points it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub letter: String,
    pub points: f64,
}

impl Grade {
    pub fn new(letter: impl Into<String>, points: f64) -> Self {
        Self {
            letter: letter.into(),
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBand {
    pub threshold: f64,
    #[serde(flatten)]
    pub grade: Grade,
}

impl GradeBand {
    pub fn new(threshold: f64, letter: impl Into<String>, points: f64) -> Self {
        Self {
            threshold,
            grade: Grade::new(letter, points),
        }
    }
}

/// Never empty; bands sorted by descending threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeScale {
    bands: Vec<GradeBand>,
}

impl GradeScale {
    pub fn from_bands(mut bands: Vec<GradeBand>) -> Result<Self, ScaleError> {
        if bands.is_empty() {
            return Err(ScaleError::Empty);
        }

        for band in bands.iter() {
            if !band.threshold.is_finite() {
                return Err(ScaleError::NonFiniteThreshold(
                    band.threshold,
                    band.grade.letter.clone(),
                ));
            }
            if !band.grade.points.is_finite() || band.grade.points < 0.0 {
                return Err(ScaleError::InvalidPoints {
                    letter: band.grade.letter.clone(),
                    points: band.grade.points,
                });
            }
        }

        bands.sort_by(|a, b| b.threshold.total_cmp(&a.threshold));

        if let Some(pair) = bands.windows(2).find(|w| w[0].threshold == w[1].threshold) {
            return Err(ScaleError::DuplicateThreshold {
                threshold: pair[0].threshold,
                first: pair[0].grade.letter.clone(),
                second: pair[1].grade.letter.clone(),
            });
        }

        Ok(Self { bands })
    }

    /// Reads a JSON array of `{"threshold", "letter", "points"}` objects.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read grade scale {}", path.display()))?;
        let bands: Vec<GradeBand> = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a valid grade scale", path.display()))?;
        Ok(Self::from_bands(bands)?)
    }

    /// Grade for a relative performance: the first band, scanning from the
    /// top, whose threshold the value reaches. Values under every threshold
    /// (and NaN) get the lowest band.
    pub fn predict_grade(&self, relative_performance: f64) -> &Grade {
        match self
            .bands
            .iter()
            .find(|band| band.threshold <= relative_performance)
        {
            Some(band) => &band.grade,
            None => &self.floor().grade,
        }
    }

    pub fn bands(&self) -> &[GradeBand] {
        &self.bands
    }

    pub fn floor(&self) -> &GradeBand {
        &self.bands[self.bands.len() - 1]
    }

    /// Moves the named letters to new thresholds, keeping every letter's
    /// points. `overrides` pairs a letter with a relative-performance ratio.
    pub fn retuned(&self, overrides: &[(String, f64)]) -> Result<Self, ScaleError> {
        let mut bands = self.bands.clone();
        for (letter, threshold) in overrides {
            let band = bands
                .iter_mut()
                .find(|band| band.grade.letter == *letter)
                .ok_or_else(|| ScaleError::UnknownGrade(letter.clone()))?;
            band.threshold = *threshold;
        }
        Self::from_bands(bands)
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self {
            bands: vec![
                GradeBand::new(0.20, "A", 4.0),
                GradeBand::new(0.10, "B+", 3.5),
                GradeBand::new(0.05, "B", 3.0),
                GradeBand::new(0.00, "C+", 2.5),
                GradeBand::new(-0.05, "C", 2.0),
                GradeBand::new(-0.10, "D+", 1.5),
                GradeBand::new(-0.15, "D", 1.0),
                GradeBand::new(-0.20, "F", 0.0),
            ],
        }
    }
}
