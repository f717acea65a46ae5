//! Tract-level housing-need characteristics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Housing and demographic measures of one legacy-vintage tract.
///
/// A tract without a row reads as [`HousingNeedRow::default`]: every measure
/// zero and no population growth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HousingNeedRow {
    /// Tract identifier.
    pub geoid: String,
    /// Percentage of low-income rental units with severe housing problems.
    pub severe_housing_problem_pct: f64,
    /// Whether population grew between the two reference years.
    pub population_grew: bool,
    /// Average year-over-year population growth rate.
    pub average_growth_rate: f64,
    /// Average employment change.
    pub average_employment_change: f64,
}

/// Housing-need rows keyed by GEOID. The first row wins.
#[derive(Debug, Clone, Default)]
pub struct HousingNeedTable {
    rows: HashMap<String, HousingNeedRow>,
}

impl HousingNeedTable {
    /// Build the lookup table.
    #[must_use]
    pub fn new(rows: Vec<HousingNeedRow>) -> Self {
        let mut table = HashMap::with_capacity(rows.len());
        for row in rows {
            table.entry(row.geoid.trim().to_owned()).or_insert(row);
        }
        Self { rows: table }
    }

    /// The row for `geoid`, if present.
    #[must_use]
    pub fn get(&self, geoid: &str) -> Option<&HousingNeedRow> {
        self.rows.get(geoid.trim())
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
