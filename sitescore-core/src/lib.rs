//! Core domain types for the site-scoring engine.
//!
//! The crate defines the candidate [`Site`], the read-only
//! [`ReferenceStore`] every criterion consults, the [`Criterion`] contract
//! shared by the evaluators, and the [`NetworkDistanceProvider`] seam used to
//! ask an external road-graph service for walking distances. Constructors
//! return `Result` so invalid input surfaces before scoring starts.

#![forbid(unsafe_code)]

pub mod criterion;
pub mod geo_math;
pub mod reference;
pub mod routing;
mod site;
mod snapshot;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use criterion::{Assessment, Criterion, CriterionKind, EvaluationError};
pub use reference::{
    Amenity, AmenityCategory, AmenityGroup, AmenityIndex, CensusTract, FoodAccessRecord,
    FoodAccessTable, GradeCluster, HousingNeedRow, HousingNeedTable, Indicator, IndicatorFlags,
    IndicatorRecord, IndicatorTable, LayerSchema, ReferenceData, ReferenceError, ReferenceStore,
    RosterEntry, RuralBoundary, SchoolBoundaryLayer, SchoolLayerIndex, SchoolRecord, SchoolRoster,
    SchoolZone, TractLayer, TransitStop, UndesirableSite, is_beating_the_odds,
    normalize_school_name, parse_food_desert_flag, resolve_tract_id,
};
pub use routing::{NetworkDistanceProvider, RoutingError};
pub use site::{Site, SiteError};
pub use snapshot::{
    SnapshotError, SnapshotWriteError, load_reference_snapshot, write_reference_snapshot,
};
