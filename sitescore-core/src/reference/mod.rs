//! Read-only reference datasets consulted by every criterion.
//!
//! [`ReferenceData`] is the plain bundle produced by ingestion: every table
//! and polygon layer, already in WGS84 degrees. [`ReferenceStore::new`] builds
//! the spatial indices and lookup tables once; the resulting store is
//! immutable and shared by reference across scoring workers.

mod activity;
mod housing;
mod indicator;
mod polygon_index;
mod school;
mod tract;
mod transit;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use activity::{
    Amenity, AmenityCategory, AmenityGroup, AmenityIndex, FoodAccessRecord, FoodAccessTable,
    UndesirableSite, parse_food_desert_flag,
};
pub use housing::{HousingNeedRow, HousingNeedTable};
pub use indicator::{Indicator, IndicatorFlags, IndicatorRecord, IndicatorTable};
pub use school::{
    GradeCluster, LayerSchema, RosterEntry, SchoolBoundaryLayer, SchoolLayerIndex, SchoolRecord,
    SchoolRoster, SchoolZone, is_beating_the_odds, normalize_school_name,
};
pub use tract::{CensusTract, RuralBoundary, TractLayer, resolve_tract_id};
pub use transit::TransitStop;

/// Errors raised while preparing reference data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// Two tracts in one layer share a GEOID.
    #[error("duplicate tract {geoid} in {layer} tract layer")]
    DuplicateTract {
        /// Layer being built.
        layer: String,
        /// Repeated identifier.
        geoid: String,
    },
    /// An `amenity_key` did not name a known category.
    #[error("unknown amenity category {key:?}")]
    UnknownAmenityCategory {
        /// Raw key.
        key: String,
    },
    /// A grade cluster code was not `E`, `M` or `H`.
    #[error("unknown grade cluster {value:?}")]
    UnknownGradeCluster {
        /// Raw value.
        value: String,
    },
}

/// Every reference dataset, unindexed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Transit stops.
    pub transit_stops: Vec<TransitStop>,
    /// Desirable amenities, including grocery stores.
    pub amenities: Vec<Amenity>,
    /// Undesirable land uses.
    pub undesirable_sites: Vec<UndesirableSite>,
    /// Food-access status per tract.
    pub food_access: Vec<FoodAccessRecord>,
    /// Current-vintage tracts used by activity and stability scoring.
    pub current_tracts: Vec<CensusTract>,
    /// Legacy-vintage tracts used by housing-need scoring.
    pub legacy_tracts: Vec<CensusTract>,
    /// Rural area; `None` classifies every site as metro.
    pub rural_boundary: Option<RuralBoundary>,
    /// School boundary layers in evaluation order.
    pub school_layers: Vec<SchoolBoundaryLayer>,
    /// School performance roster.
    pub schools: Vec<SchoolRecord>,
    /// Opportunity indicators per tract.
    pub indicators: Vec<IndicatorRecord>,
    /// Housing-need measures per legacy tract.
    pub housing_need: Vec<HousingNeedRow>,
}

/// Indexed, immutable reference datasets.
///
/// # Examples
/// ```
/// use sitescore_core::{ReferenceData, ReferenceStore};
///
/// let store = ReferenceStore::new(ReferenceData::default())?;
/// assert!(store.transit_stops().is_empty());
/// # Ok::<(), sitescore_core::ReferenceError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReferenceStore {
    transit_stops: Vec<TransitStop>,
    amenities: AmenityIndex,
    undesirable_sites: Vec<UndesirableSite>,
    food_access: FoodAccessTable,
    current_tracts: TractLayer,
    legacy_tracts: TractLayer,
    rural_boundary: Option<RuralBoundary>,
    school_layers: Vec<SchoolLayerIndex>,
    schools: SchoolRoster,
    indicators: IndicatorTable,
    housing_need: HousingNeedTable,
}

impl ReferenceStore {
    /// Index `data`.
    ///
    /// # Errors
    /// Returns [`ReferenceError::DuplicateTract`] when a tract layer repeats a
    /// GEOID.
    pub fn new(data: ReferenceData) -> Result<Self, ReferenceError> {
        let ReferenceData {
            transit_stops,
            amenities,
            undesirable_sites,
            food_access,
            current_tracts,
            legacy_tracts,
            rural_boundary,
            school_layers,
            schools,
            indicators,
            housing_need,
        } = data;
        let store = Self {
            transit_stops,
            amenities: AmenityIndex::new(amenities),
            undesirable_sites,
            food_access: FoodAccessTable::new(food_access),
            current_tracts: TractLayer::new("current", current_tracts)?,
            legacy_tracts: TractLayer::new("legacy", legacy_tracts)?,
            rural_boundary,
            school_layers: school_layers.into_iter().map(SchoolLayerIndex::new).collect(),
            schools: SchoolRoster::new(schools),
            indicators: IndicatorTable::new(indicators),
            housing_need: HousingNeedTable::new(housing_need),
        };
        log::debug!(
            "reference store ready: {} stops, {} amenities, {} current tracts, {} legacy tracts, {} school layers, {} schools",
            store.transit_stops.len(),
            store.amenities.len(),
            store.current_tracts.len(),
            store.legacy_tracts.len(),
            store.school_layers.len(),
            store.schools.len(),
        );
        Ok(store)
    }

    /// Transit stops.
    #[must_use]
    pub fn transit_stops(&self) -> &[TransitStop] {
        &self.transit_stops
    }

    /// Desirable amenity index.
    #[must_use]
    pub const fn amenities(&self) -> &AmenityIndex {
        &self.amenities
    }

    /// Undesirable land uses.
    #[must_use]
    pub fn undesirable_sites(&self) -> &[UndesirableSite] {
        &self.undesirable_sites
    }

    /// Food-access lookup.
    #[must_use]
    pub const fn food_access(&self) -> &FoodAccessTable {
        &self.food_access
    }

    /// Current-vintage tracts.
    #[must_use]
    pub const fn current_tracts(&self) -> &TractLayer {
        &self.current_tracts
    }

    /// Legacy-vintage tracts.
    #[must_use]
    pub const fn legacy_tracts(&self) -> &TractLayer {
        &self.legacy_tracts
    }

    /// Rural area, if supplied.
    #[must_use]
    pub const fn rural_boundary(&self) -> Option<&RuralBoundary> {
        self.rural_boundary.as_ref()
    }

    /// School boundary layers in evaluation order.
    #[must_use]
    pub fn school_layers(&self) -> &[SchoolLayerIndex] {
        &self.school_layers
    }

    /// School performance roster.
    #[must_use]
    pub const fn schools(&self) -> &SchoolRoster {
        &self.schools
    }

    /// Opportunity indicators.
    #[must_use]
    pub const fn indicators(&self) -> &IndicatorTable {
        &self.indicators
    }

    /// Housing-need measures.
    #[must_use]
    pub const fn housing_need(&self) -> &HousingNeedTable {
        &self.housing_need
    }
}
