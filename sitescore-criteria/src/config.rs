//! Scoring configuration.
//!
//! Every type deserialises with `serde`, so callers can keep a run's settings
//! in JSON next to the reference snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sitescore_core::GradeCluster;

use crate::ScoringConfigError;

/// Tenancy type of the proposed development.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tenancy {
    /// Family housing. Full K-12 coverage earns the top school award.
    #[default]
    Family,
    /// Housing for older persons.
    Elderly,
    /// Any other tenancy.
    Other,
}

/// Whether the site lies in a qualified census tract.
///
/// Has no default; housing need is only scored once the status is stated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QctStatus {
    /// The site is inside a qualified census tract.
    InQct,
    /// The site is outside every qualified census tract.
    NotInQct,
}

impl QctStatus {
    /// Report whether the site is in a qualified census tract.
    #[must_use]
    pub const fn is_qualified(self) -> bool {
        matches!(self, Self::InQct)
    }
}

/// Settings for the housing-need bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingNeedConfig {
    /// Qualified census tract status of the development.
    pub qct: QctStatus,
}

impl HousingNeedConfig {
    /// Score housing need for a development with the given QCT status.
    #[must_use]
    pub const fn new(qct: QctStatus) -> Self {
        Self { qct }
    }
}

/// Regional mean school performance per grade cluster and year.
///
/// The default table holds the 2018 and 2019 state averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalAverages {
    averages: BTreeMap<GradeCluster, BTreeMap<u16, f64>>,
}

impl Default for RegionalAverages {
    fn default() -> Self {
        Self::empty()
            .with_year(GradeCluster::Elementary, 2018, 77.8)
            .with_year(GradeCluster::Elementary, 2019, 79.9)
            .with_year(GradeCluster::Middle, 2018, 76.2)
            .with_year(GradeCluster::Middle, 2019, 77.0)
            .with_year(GradeCluster::High, 2018, 75.3)
            .with_year(GradeCluster::High, 2019, 78.8)
    }
}

impl RegionalAverages {
    /// A table with no entries.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            averages: BTreeMap::new(),
        }
    }

    /// Set the regional average of `cluster` for `year`.
    #[must_use]
    pub fn with_year(mut self, cluster: GradeCluster, year: u16, value: f64) -> Self {
        self.averages.entry(cluster).or_default().insert(year, value);
        self
    }

    /// The regional average of `cluster` in `year`, if known.
    #[must_use]
    pub fn get(&self, cluster: GradeCluster, year: u16) -> Option<f64> {
        self.averages
            .get(&cluster)
            .and_then(|years| years.get(&year))
            .copied()
    }

    fn validate(&self) -> Result<(), ScoringConfigError> {
        for (cluster, years) in &self.averages {
            if let Some((year, value)) = years.iter().find(|(_, value)| !value.is_finite()) {
                return Err(ScoringConfigError::NonFiniteRegionalAverage {
                    cluster: *cluster,
                    year: *year,
                    value: *value,
                });
            }
        }
        Ok(())
    }
}

/// Configuration consumed by [`ScoreAggregator`](crate::ScoreAggregator).
///
/// Supplying a [`HousingNeedConfig`] selects the extended aggregate, which
/// adds the housing-need bonus to the four base criteria.
///
/// # Examples
/// ```
/// use sitescore_criteria::{HousingNeedConfig, QctStatus, ScoringConfig, Tenancy};
///
/// let config = ScoringConfig::default()
///     .with_tenancy(Tenancy::Elderly)
///     .with_housing_need(HousingNeedConfig::new(QctStatus::NotInQct));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Regional school performance averages.
    #[serde(default)]
    pub regional_averages: RegionalAverages,
    /// Tenancy of the development.
    #[serde(default)]
    pub tenancy: Tenancy,
    /// Housing-need settings; `None` selects the reduced aggregate.
    #[serde(default)]
    pub housing_need: Option<HousingNeedConfig>,
}

impl ScoringConfig {
    /// Override the tenancy.
    #[must_use]
    pub const fn with_tenancy(mut self, tenancy: Tenancy) -> Self {
        self.tenancy = tenancy;
        self
    }

    /// Replace the regional averages.
    #[must_use]
    pub fn with_regional_averages(mut self, regional_averages: RegionalAverages) -> Self {
        self.regional_averages = regional_averages;
        self
    }

    /// Enable the housing-need bonus.
    #[must_use]
    pub const fn with_housing_need(mut self, housing_need: HousingNeedConfig) -> Self {
        self.housing_need = Some(housing_need);
        self
    }

    /// Check the configuration before scoring starts.
    ///
    /// # Errors
    /// Returns [`ScoringConfigError::NonFiniteRegionalAverage`] when a
    /// regional average is NaN or infinite.
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        self.regional_averages.validate()
    }
}
