//! Policy criteria and score aggregation for candidate sites.
//!
//! Each evaluator implements [`Criterion`](sitescore_core::Criterion) and is a
//! pure function of a [`Site`](sitescore_core::Site) and the shared
//! [`ReferenceStore`](sitescore_core::ReferenceStore):
//! - [`TransitAccess`] scores walking access to transit stops and hubs;
//! - [`ActivityBalance`] awards nearby amenities and deducts undesirable land
//!   uses and food-desert exposure;
//! - [`SchoolQuality`] counts grades served by high-performing zoned schools;
//! - [`NeighborhoodStability`] counts opportunity indicators of the containing
//!   and adjacent tracts;
//! - [`HousingNeedBonus`] rewards demonstrated housing need outside qualified
//!   census tracts.
//!
//! [`ScoreAggregator`] runs them for one site and sums the sub-scores.
//! [`EconomicDevelopmentProximity`] is a standalone eligibility check that
//! does not contribute to the aggregate.
//!
//! # Examples
//!
//! ```
//! use sitescore_core::{ReferenceData, ReferenceStore, Site};
//! use sitescore_core::test_support::FixedDistanceProvider;
//! use sitescore_criteria::ScoreAggregator;
//!
//! let store = ReferenceStore::new(ReferenceData::default())?;
//! let aggregator = ScoreAggregator::new(FixedDistanceProvider::new(0.2));
//! let result = aggregator.score(&Site::new(33.75, -84.39)?, &store)?;
//! assert_eq!(result.total(), 0.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod activity;
mod aggregate;
mod config;
mod economic;
mod error;
pub mod fuzzy;
mod housing;
mod school;
mod stability;
mod tiers;
mod transit;

pub use activity::{
    ActivityBalance, ActivityDetail, AmenityAward, FOOD_DESERT_DEDUCTION, GROCERY_RADIUS_MILES,
    SEARCH_RADIUS_MILES, UNDESIRABLE_DEDUCTION, UNDESIRABLE_RADIUS_MILES,
};
pub use aggregate::{CriterionScores, ScoreAggregator, ScoreResult};
pub use config::{HousingNeedConfig, QctStatus, RegionalAverages, ScoringConfig, Tenancy};
pub use economic::{
    DevelopmentPool, EconomicDevelopmentOutcome, EconomicDevelopmentProposal,
    EconomicDevelopmentProximity, Ineligibility, PoolRequirements,
};
pub use error::{PointFailure, ScoringConfigError};
pub use housing::{HousingNeedBonus, HousingNeedDetail};
pub use school::{ClusterOutcome, MatchedSchool, QualifyingTest, SchoolDetail, SchoolQuality};
pub use stability::{NEARBY_BUFFER_METRES, NeighborhoodStability, StabilityDetail};
pub use transit::{CANDIDATE_RADIUS_MILES, TransitAccess, TransitCandidate, TransitDetail};
