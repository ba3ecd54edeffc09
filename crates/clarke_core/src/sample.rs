//! Paired glucose samples and input validation
//!
//! Both the classifier and the renderer go through [`SampleSet::new`], so the
//! shape check (fatal) and the physiological range check (advisory) behave
//! identically on either path.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GridError, Result};

/// Upper bound of the normal physiological glucose range (mg/dl)
pub const PHYSIOLOGICAL_MAX: f64 = 400.0;
/// Lower bound of the physiological glucose range (mg/dl)
pub const PHYSIOLOGICAL_MIN: f64 = 0.0;

/// One (reference, prediction) pair in mg/dl
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub reference: f64,
    pub prediction: f64,
}

impl Sample {
    pub fn new(reference: f64, prediction: f64) -> Self {
        Self {
            reference,
            prediction,
        }
    }
}

/// Non-fatal out-of-range finding on a sample set
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeWarning {
    AboveRange {
        max_reference: f64,
        max_prediction: f64,
    },
    BelowRange {
        min_reference: f64,
        min_prediction: f64,
    },
    /// Pairs holding NaN or an infinity
    NonFinite { count: usize },
}

impl fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeWarning::AboveRange {
                max_reference,
                max_prediction,
            } => write!(
                f,
                "Input Warning: the maximum reference value {} or the maximum prediction value {} \
                 exceeds the normal physiological range of glucose (<400 mg/dl).",
                max_reference, max_prediction
            ),
            RangeWarning::BelowRange {
                min_reference,
                min_prediction,
            } => write!(
                f,
                "Input Warning: the minimum reference value {} or the minimum prediction value {} \
                 is less than 0 mg/dl.",
                min_reference, min_prediction
            ),
            RangeWarning::NonFinite { count } => write!(
                f,
                "Input Warning: {} sample pair(s) contain non-finite values (NaN or infinity).",
                count
            ),
        }
    }
}

/// Validated view over two equal-length, non-empty sequences
#[derive(Debug, Clone)]
pub struct SampleSet<'a> {
    reference: &'a [f64],
    prediction: &'a [f64],
    warnings: Vec<RangeWarning>,
}

impl<'a> SampleSet<'a> {
    /// Check shape, then range. Range findings are logged and kept on the set.
    pub fn new(reference: &'a [f64], prediction: &'a [f64]) -> Result<Self> {
        if reference.len() != prediction.len() {
            return Err(GridError::LengthMismatch {
                reference: reference.len(),
                prediction: prediction.len(),
            });
        }
        if reference.is_empty() {
            return Err(GridError::EmptyInput);
        }

        let warnings = range_warnings(reference, prediction);
        for warning in &warnings {
            warn!(samples = reference.len(), "{}", warning);
        }

        Ok(Self {
            reference,
            prediction,
            warnings,
        })
    }

    pub fn len(&self) -> usize {
        self.reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    pub fn reference(&self) -> &'a [f64] {
        self.reference
    }

    pub fn prediction(&self) -> &'a [f64] {
        self.prediction
    }

    pub fn warnings(&self) -> &[RangeWarning] {
        &self.warnings
    }

    pub fn iter(&self) -> impl Iterator<Item = Sample> + 'a {
        self.reference
            .iter()
            .zip(self.prediction.iter())
            .map(|(&r, &p)| Sample::new(r, p))
    }
}

/// Extrema are taken over finite entries only; non-finite pairs get their own warning.
fn range_warnings(reference: &[f64], prediction: &[f64]) -> Vec<RangeWarning> {
    let finite = |v: &[f64]| v.iter().copied().filter(|x| x.is_finite()).collect::<Vec<_>>();
    let max_of = |v: &[f64]| finite(v).into_iter().fold(f64::NEG_INFINITY, f64::max);
    let min_of = |v: &[f64]| finite(v).into_iter().fold(f64::INFINITY, f64::min);

    let mut warnings = Vec::new();

    let (max_reference, max_prediction) = (max_of(reference), max_of(prediction));
    if max_reference > PHYSIOLOGICAL_MAX || max_prediction > PHYSIOLOGICAL_MAX {
        warnings.push(RangeWarning::AboveRange {
            max_reference,
            max_prediction,
        });
    }

    let (min_reference, min_prediction) = (min_of(reference), min_of(prediction));
    if min_reference < PHYSIOLOGICAL_MIN || min_prediction < PHYSIOLOGICAL_MIN {
        warnings.push(RangeWarning::BelowRange {
            min_reference,
            min_prediction,
        });
    }

    let non_finite = reference
        .iter()
        .zip(prediction)
        .filter(|(r, p)| !r.is_finite() || !p.is_finite())
        .count();
    if non_finite > 0 {
        warnings.push(RangeWarning::NonFinite { count: non_finite });
    }

    warnings
}
