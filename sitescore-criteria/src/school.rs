//! School quality: grades served by high-performing zoned schools.

use std::collections::BTreeSet;

use serde::Serialize;
use sitescore_core::{
    Assessment, Criterion, CriterionKind, EvaluationError, GradeCluster, ReferenceStore,
    RosterEntry, SchoolRecord, Site, normalize_school_name,
};

use crate::fuzzy::{MATCH_THRESHOLD, extract_one};
use crate::{RegionalAverages, Tenancy};

/// A test under which a matched school qualifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualifyingTest {
    /// Mean performance beats the regional mean over shared years.
    AboveRegionalAverage,
    /// Designated as beating the odds.
    BeatingTheOdds,
    /// Positive growth with an average at or above the percentile threshold.
    Growth,
}

/// The roster school matched for one grade cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedSchool {
    /// Roster name of the matched school.
    pub name: String,
    /// Token-set similarity of the match.
    pub similarity: u8,
    /// Tests the school passes; empty when it does not qualify.
    pub qualified_by: Vec<QualifyingTest>,
}

/// Matching outcome for one grade cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterOutcome {
    /// Grade cluster.
    pub cluster: GradeCluster,
    /// Zoned school names found in the boundary layers.
    pub candidate_names: Vec<String>,
    /// Accepted roster match, if any.
    pub matched: Option<MatchedSchool>,
}

/// How a school-quality score was reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchoolDetail {
    /// One outcome per grade cluster, elementary first.
    pub clusters: Vec<ClusterOutcome>,
    /// Distinct grades covered by qualifying schools.
    pub qualified_grades: usize,
}

/// Scores the share of K-12 grades served by high-performing zoned schools.
#[derive(Debug, Clone, Default)]
pub struct SchoolQuality {
    regional_averages: RegionalAverages,
    tenancy: Tenancy,
}

impl SchoolQuality {
    /// Score schools against `regional_averages` for a development of the
    /// given `tenancy`.
    #[must_use]
    pub const fn new(regional_averages: RegionalAverages, tenancy: Tenancy) -> Self {
        Self {
            regional_averages,
            tenancy,
        }
    }

    /// Zoned school names for `cluster` across every boundary layer, in layer
    /// order.
    fn candidate_names(site: &Site, store: &ReferenceStore, cluster: GradeCluster) -> Vec<String> {
        store
            .school_layers()
            .iter()
            .flat_map(|layer| layer.school_names(site.coord(), cluster))
            .map(str::to_owned)
            .collect()
    }

    /// The single best roster match across all candidate names.
    fn best_match<'a>(
        roster: &'a [RosterEntry],
        candidate_names: &[String],
    ) -> Option<(&'a RosterEntry, u8)> {
        let mut best: Option<(&RosterEntry, u8)> = None;
        for name in candidate_names {
            let query = normalize_school_name(name);
            let Some(found) = extract_one(&query, roster.iter().map(RosterEntry::normalized_name))
            else {
                continue;
            };
            let best_score = best.map_or(0, |(_, score)| score);
            if found.is_accepted() && found.score > best_score {
                best = roster.get(found.index).map(|entry| (entry, found.score));
            }
        }
        best
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "comparing means of performance scores"
    )]
    fn above_regional_average(&self, record: &SchoolRecord) -> bool {
        let (school_sum, regional_sum, years) = record
            .performance
            .iter()
            .filter(|(_, value)| value.is_finite())
            .filter_map(|(year, value)| {
                self.regional_averages
                    .get(record.cluster, *year)
                    .map(|regional| (*value, regional))
            })
            .fold((0.0, 0.0, 0.0), |(school, regional, n), (value, average)| {
                (school + value, regional + average, n + 1.0)
            });
        if years == 0.0 {
            return false;
        }
        school_sum / years > regional_sum / years
    }

    fn qualifying_tests(&self, record: &SchoolRecord) -> Vec<QualifyingTest> {
        let growth = matches!(
            (record.yoy_average, record.average_score, record.percentile_threshold),
            (Some(yoy), Some(average), Some(threshold)) if yoy > 0.0 && average >= threshold
        );
        [
            (
                QualifyingTest::AboveRegionalAverage,
                self.above_regional_average(record),
            ),
            (QualifyingTest::BeatingTheOdds, record.beating_the_odds),
            (QualifyingTest::Growth, growth),
        ]
        .into_iter()
        .filter_map(|(test, passed)| passed.then_some(test))
        .collect()
    }

    fn grade_points(&self, grade_count: usize) -> f64 {
        match grade_count {
            3..=6 => 1.0,
            7..=12 => 1.5,
            13 if self.tenancy == Tenancy::Family => 3.0,
            13 => 2.0,
            _ => 0.0,
        }
    }
}

impl Criterion for SchoolQuality {
    type Detail = SchoolDetail;

    fn kind(&self) -> CriterionKind {
        CriterionKind::SchoolQuality
    }

    fn evaluate(
        &self,
        site: &Site,
        store: &ReferenceStore,
    ) -> Result<Assessment<SchoolDetail>, EvaluationError> {
        let mut grades: BTreeSet<u8> = BTreeSet::new();
        let mut clusters = Vec::with_capacity(GradeCluster::ALL.len());
        for cluster in GradeCluster::ALL {
            let candidate_names = Self::candidate_names(site, store, cluster);
            let matched = Self::best_match(store.schools().cluster(cluster), &candidate_names)
                .map(|(entry, similarity)| {
                    let record = entry.record();
                    let qualified_by = self.qualifying_tests(record);
                    if !qualified_by.is_empty() {
                        grades.extend(record.cluster.grades());
                    }
                    MatchedSchool {
                        name: record.name.clone(),
                        similarity,
                        qualified_by,
                    }
                });
            if matched.is_none() && !candidate_names.is_empty() {
                log::debug!(
                    "no roster match above {MATCH_THRESHOLD} for {cluster:?} schools {candidate_names:?}"
                );
            }
            clusters.push(ClusterOutcome {
                cluster,
                candidate_names,
                matched,
            });
        }

        let qualified_grades = grades.len();
        let score = self.grade_points(qualified_grades);
        let detail = SchoolDetail {
            clusters,
            qualified_grades,
        };
        Assessment::checked(self.kind(), score, detail)
    }
}
