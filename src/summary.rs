//! Summary statistics of generated fields.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Mean, population variance and range of one field.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldSummary {
    /// Arithmetic mean
    pub mean: f64,
    /// Population variance (divides by N)
    pub variance: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

impl FieldSummary {
    /// Summarize `values`; every statistic is NaN for an empty slice.
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            mean: values.iter().mean(),
            variance: values.iter().population_variance(),
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
        }
    }
}

/// One summary per output field of a skewer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkewerSummary {
    /// Gaussian field
    pub delta: FieldSummary,
    /// Lognormal density
    pub density: FieldSummary,
    /// Optical depth
    pub optical_depth: FieldSummary,
    /// Transmitted flux
    pub flux: FieldSummary,
}
