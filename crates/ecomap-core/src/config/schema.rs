use serde::{Deserialize, Serialize};

use crate::error::EcomapError;

/// Reporting years tracked by a dataset, ascending and without duplicates.
///
/// The first and last year define the trend window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i32>", into = "Vec<i32>")]
pub struct TrackedYears(Vec<i32>);

impl TrackedYears {
    pub fn new(mut years: Vec<i32>) -> Result<Self, EcomapError> {
        if years.is_empty() {
            return Err(EcomapError::ConfigInvalid(
                "years must not be empty".into(),
            ));
        }
        years.sort_unstable();
        years.dedup();
        Ok(Self(years))
    }

    /// Consecutive years from `first` to `last`, inclusive.
    pub fn range(first: i32, last: i32) -> Result<Self, EcomapError> {
        if last < first {
            return Err(EcomapError::ConfigInvalid(format!(
                "year range {first}-{last} is reversed"
            )));
        }
        Self::new((first..=last).collect())
    }

    pub fn first(&self) -> i32 {
        self.0[0]
    }

    pub fn last(&self) -> i32 {
        self.0[self.0.len() - 1]
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<i32>> for TrackedYears {
    type Error = EcomapError;

    fn try_from(years: Vec<i32>) -> Result<Self, Self::Error> {
        Self::new(years)
    }
}

impl From<TrackedYears> for Vec<i32> {
    fn from(years: TrackedYears) -> Self {
        years.0
    }
}

/// Parameters of a zonal analysis for one reporting series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub years: TrackedYears,
    /// Radius used when a query does not specify one.
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
    /// Maximum number of facilities pivoted into the chart.
    #[serde(default = "default_limit")]
    pub top_emitters: usize,
    /// Maximum number of entries in the category and residue breakdowns.
    #[serde(default = "default_limit")]
    pub breakdown_limit: usize,
    /// Residue labels longer than this many characters are shortened.
    #[serde(default = "default_residue_label_max")]
    pub residue_label_max: usize,
    /// Radii offered to the user, in kilometres.
    #[serde(default = "default_radius_choices")]
    pub radius_choices: Vec<f64>,
}

impl AnalysisConfig {
    /// Config with default limits for the given years.
    pub fn with_years(name: impl Into<String>, years: TrackedYears) -> Self {
        Self {
            name: name.into(),
            description: None,
            years,
            default_radius_km: default_radius_km(),
            top_emitters: default_limit(),
            breakdown_limit: default_limit(),
            residue_label_max: default_residue_label_max(),
            radius_choices: default_radius_choices(),
        }
    }
}

fn default_radius_km() -> f64 {
    3.0
}

fn default_limit() -> usize {
    5
}

fn default_residue_label_max() -> usize {
    40
}

fn default_radius_choices() -> Vec<f64> {
    vec![1.0, 3.0, 5.0]
}
