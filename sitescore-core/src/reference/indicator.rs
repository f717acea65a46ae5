//! Neighbourhood opportunity indicators per census tract.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One of the five above-regional-median opportunity indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    /// Environmental health index.
    EnvironmentalHealth,
    /// Transit access index.
    TransitAccess,
    /// Share of the population above the poverty level.
    PovertyRateInverse,
    /// Median household income.
    MedianIncome,
    /// Jobs proximity index.
    JobsProximity,
}

impl Indicator {
    /// Every indicator.
    pub const ALL: [Self; 5] = [
        Self::EnvironmentalHealth,
        Self::TransitAccess,
        Self::PovertyRateInverse,
        Self::MedianIncome,
        Self::JobsProximity,
    ];

    const fn bit(self) -> u8 {
        match self {
            Self::EnvironmentalHealth => 1,
            Self::TransitAccess => 1 << 1,
            Self::PovertyRateInverse => 1 << 2,
            Self::MedianIncome => 1 << 3,
            Self::JobsProximity => 1 << 4,
        }
    }
}

/// The set of indicators a tract scores above the regional median on.
///
/// # Examples
/// ```
/// use sitescore_core::{Indicator, IndicatorFlags};
///
/// let actual = IndicatorFlags::from_indicators([Indicator::MedianIncome]);
/// let nearby = IndicatorFlags::from_indicators([Indicator::MedianIncome, Indicator::JobsProximity]);
/// assert_eq!(actual.union(nearby).count(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndicatorFlags(u8);

impl IndicatorFlags {
    /// No indicator set.
    pub const NONE: Self = Self(0);

    /// Build flags from five booleans in [`Indicator::ALL`] order.
    #[must_use]
    pub fn new(flags: [bool; 5]) -> Self {
        Self::from_indicators(
            Indicator::ALL
                .into_iter()
                .zip(flags)
                .filter_map(|(indicator, set)| set.then_some(indicator)),
        )
    }

    /// Build flags from the indicators that are set.
    #[must_use]
    pub fn from_indicators<I>(indicators: I) -> Self
    where
        I: IntoIterator<Item = Indicator>,
    {
        Self(
            indicators
                .into_iter()
                .fold(0, |bits, indicator| bits | indicator.bit()),
        )
    }

    /// Report whether `indicator` is set.
    #[must_use]
    pub const fn is_set(self, indicator: Indicator) -> bool {
        self.0 & indicator.bit() != 0
    }

    /// Element-wise OR of two flag sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Number of indicators set.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }
}

/// Indicator flags of one tract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    /// Tract identifier as text.
    pub tract_id: String,
    /// Indicators set for the tract.
    pub flags: IndicatorFlags,
}

impl IndicatorRecord {
    /// Construct a record, trimming the identifier.
    #[must_use]
    pub fn new(tract_id: &str, flags: IndicatorFlags) -> Self {
        Self {
            tract_id: tract_id.trim().to_owned(),
            flags,
        }
    }
}

/// Indicator flags keyed by tract identifier. The first record wins.
#[derive(Debug, Clone, Default)]
pub struct IndicatorTable {
    rows: HashMap<String, IndicatorFlags>,
}

impl IndicatorTable {
    /// Build the lookup table.
    #[must_use]
    pub fn new(records: Vec<IndicatorRecord>) -> Self {
        let mut rows = HashMap::with_capacity(records.len());
        for record in records {
            rows.entry(record.tract_id).or_insert(record.flags);
        }
        Self { rows }
    }

    /// Flags of `tract_id`, if the table has a row for it.
    #[must_use]
    pub fn get(&self, tract_id: &str) -> Option<IndicatorFlags> {
        self.rows.get(tract_id.trim()).copied()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Report whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
