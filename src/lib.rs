//! Facade crate for the site-scoring engine.
//!
//! This crate re-exports the core domain types and the policy criteria, and
//! exposes the parallel grid scan and the HTTP routing adapter behind feature
//! flags.

#![forbid(unsafe_code)]

pub use sitescore_core::{
    Criterion, CriterionKind, EvaluationError, NetworkDistanceProvider, ReferenceData,
    ReferenceError, ReferenceStore, RoutingError, Site, SiteError, SnapshotError,
    SnapshotWriteError, load_reference_snapshot, write_reference_snapshot,
};
pub use sitescore_criteria::{
    ActivityBalance, CriterionScores, DevelopmentPool, EconomicDevelopmentOutcome,
    EconomicDevelopmentProposal, EconomicDevelopmentProximity, HousingNeedBonus,
    HousingNeedConfig, NeighborhoodStability, PointFailure, QctStatus, RegionalAverages,
    SchoolQuality, ScoreAggregator, ScoreResult, ScoringConfig, ScoringConfigError, Tenancy,
    TransitAccess,
};

#[cfg(feature = "grid")]
pub use sitescore_grid::{
    GridError, GridScanConfig, GridScanDriver, GridSpec, MAX_GRID_POINTS, PointScorer, ScanFailure,
    ScanReport,
};

#[cfg(feature = "routing-http")]
pub use sitescore_data::{
    HttpNetworkDistanceConfig, HttpNetworkDistanceProvider, ProviderBuildError,
};
