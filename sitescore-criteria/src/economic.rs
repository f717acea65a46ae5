//! Economic-development proximity eligibility.
//!
//! A standalone check on a proposed development's relationship to a nearby
//! economic-development project. It does not contribute to the aggregate
//! score.

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Funding pool of the proposed development.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevelopmentPool {
    /// Rural pool.
    Rural,
    /// Other metro pool.
    OtherMetro,
    /// Any other pool; never eligible.
    Other,
}

impl DevelopmentPool {
    /// Distance and job requirements of the pool, if it is eligible at all.
    #[must_use]
    pub const fn requirements(self) -> Option<PoolRequirements> {
        match self {
            Self::Rural => Some(PoolRequirements {
                max_distance_miles: 30.0,
                min_net_new_jobs: 90,
            }),
            Self::OtherMetro => Some(PoolRequirements {
                max_distance_miles: 20.0,
                min_net_new_jobs: 250,
            }),
            Self::Other => None,
        }
    }
}

impl FromStr for DevelopmentPool {
    type Err = Infallible;

    /// Parse a pool label such as `Rural` or `Other Metro`, ignoring case.
    /// Unrecognised labels parse as [`DevelopmentPool::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label: String = s
            .split(|c: char| c.is_whitespace() || c == '_')
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        Ok(match label.as_str() {
            "rural" => Self::Rural,
            "other metro" => Self::OtherMetro,
            _ => Self::Other,
        })
    }
}

/// Limits a development must meet in its pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PoolRequirements {
    /// Greatest allowed distance to the economic-development project.
    pub max_distance_miles: f64,
    /// Fewest net new jobs the project must create.
    pub min_net_new_jobs: i64,
}

/// A development's claim to economic-development proximity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicDevelopmentProposal {
    /// Funding pool.
    pub pool: DevelopmentPool,
    /// Distance to the economic-development project in miles.
    pub distance_miles: f64,
    /// Net new jobs created by the project.
    pub net_new_jobs: i64,
    /// Whether the local development authority's letter was provided.
    pub letter_provided: bool,
    /// Whether the distance was verified on a map.
    pub map_verified: bool,
}

/// The first requirement a proposal fails.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Error)]
pub enum Ineligibility {
    /// Only the rural and other-metro pools are eligible.
    #[error("only the rural and other metro pools are eligible")]
    UnsupportedPool,
    /// The project is too far away.
    #[error("distance {distance_miles} mi exceeds the limit of {limit_miles} mi")]
    TooFar {
        /// Pool limit.
        limit_miles: f64,
        /// Claimed distance.
        distance_miles: f64,
    },
    /// The project creates too few jobs.
    #[error("{net_new_jobs} net new jobs is below the required {required}")]
    TooFewJobs {
        /// Pool minimum.
        required: i64,
        /// Claimed net new jobs.
        net_new_jobs: i64,
    },
    /// The development authority's letter is missing.
    #[error("the local economic development authority letter is missing")]
    MissingLetter,
    /// The distance was not verified on a map.
    #[error("map verification of the distance is required")]
    MissingMapVerification,
}

/// Result of an eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EconomicDevelopmentOutcome {
    /// `1` when eligible, otherwise `0`.
    pub score: u8,
    /// Why the proposal is ineligible, if it is.
    pub ineligibility: Option<Ineligibility>,
}

impl EconomicDevelopmentOutcome {
    /// Report whether the proposal is eligible.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        self.ineligibility.is_none()
    }
}

/// Checks economic-development proximity eligibility.
///
/// Requirements are checked in order (pool, distance, jobs, letter, map
/// verification) and the first failure is reported.
///
/// # Examples
/// ```
/// use sitescore_criteria::{
///     DevelopmentPool, EconomicDevelopmentProposal, EconomicDevelopmentProximity,
/// };
///
/// let proposal = EconomicDevelopmentProposal {
///     pool: DevelopmentPool::Rural,
///     distance_miles: 25.0,
///     net_new_jobs: 100,
///     letter_provided: true,
///     map_verified: true,
/// };
/// assert_eq!(EconomicDevelopmentProximity::score(&proposal).score, 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EconomicDevelopmentProximity;

impl EconomicDevelopmentProximity {
    /// Check `proposal` and return the requirements it met.
    ///
    /// # Errors
    /// Returns the first [`Ineligibility`] the proposal hits. Non-finite
    /// distances are treated as too far.
    pub fn eligibility(
        proposal: &EconomicDevelopmentProposal,
    ) -> Result<PoolRequirements, Ineligibility> {
        let requirements = proposal
            .pool
            .requirements()
            .ok_or(Ineligibility::UnsupportedPool)?;
        if !proposal.distance_miles.is_finite()
            || proposal.distance_miles > requirements.max_distance_miles
        {
            return Err(Ineligibility::TooFar {
                limit_miles: requirements.max_distance_miles,
                distance_miles: proposal.distance_miles,
            });
        }
        if proposal.net_new_jobs < requirements.min_net_new_jobs {
            return Err(Ineligibility::TooFewJobs {
                required: requirements.min_net_new_jobs,
                net_new_jobs: proposal.net_new_jobs,
            });
        }
        if !proposal.letter_provided {
            return Err(Ineligibility::MissingLetter);
        }
        if !proposal.map_verified {
            return Err(Ineligibility::MissingMapVerification);
        }
        Ok(requirements)
    }

    /// Score `proposal`: `1` when eligible, otherwise `0` with the reason.
    #[must_use]
    pub fn score(proposal: &EconomicDevelopmentProposal) -> EconomicDevelopmentOutcome {
        match Self::eligibility(proposal) {
            Ok(_) => EconomicDevelopmentOutcome {
                score: 1,
                ineligibility: None,
            },
            Err(reason) => {
                log::debug!("economic development proximity not met: {reason}");
                EconomicDevelopmentOutcome {
                    score: 0,
                    ineligibility: Some(reason),
                }
            }
        }
    }
}
