//! School attendance zones and the school performance roster.

use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;
use std::str::FromStr;

use geo::{Contains, Coord, MultiPolygon, Point};
use rstar::AABB;
use serde::{Deserialize, Serialize};

use super::ReferenceError;
use super::polygon_index::PolygonIndex;

/// Tokens removed from school names before matching.
const GENERIC_NAME_TOKENS: [&str; 11] = [
    "elementary",
    "middle",
    "high",
    "school",
    "academy",
    "jr",
    "sr",
    "dr",
    "es",
    "ms",
    "hs",
];

/// Elementary, middle or high school grade band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GradeCluster {
    /// Grades K (0) through 5.
    Elementary,
    /// Grades 6 through 8.
    Middle,
    /// Grades 9 through 12.
    High,
}

impl GradeCluster {
    /// Every cluster in grade order.
    pub const ALL: [Self; 3] = [Self::Elementary, Self::Middle, Self::High];

    /// Grades served by the cluster.
    #[must_use]
    pub const fn grades(self) -> RangeInclusive<u8> {
        match self {
            Self::Elementary => 0..=5,
            Self::Middle => 6..=8,
            Self::High => 9..=12,
        }
    }

    /// Single-letter code used by performance tables.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Elementary => 'E',
            Self::Middle => 'M',
            Self::High => 'H',
        }
    }
}

impl FromStr for GradeCluster {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "E" | "ELEMENTARY" => Ok(Self::Elementary),
            "M" | "MIDDLE" => Ok(Self::Middle),
            "H" | "HIGH" => Ok(Self::High),
            _ => Err(ReferenceError::UnknownGradeCluster {
                value: s.to_owned(),
            }),
        }
    }
}

/// Normalise a school name for fuzzy matching.
///
/// Lowercases, strips punctuation and drops generic tokens such as
/// `elementary`, `school` or `hs`.
///
/// # Examples
/// ```
/// use sitescore_core::normalize_school_name;
///
/// assert_eq!(normalize_school_name("Dr. M.L. King Jr. High School"), "ml king");
/// ```
#[must_use]
pub fn normalize_school_name(name: &str) -> String {
    let stripped: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    stripped
        .split_whitespace()
        .filter(|token| !GENERIC_NAME_TOKENS.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Maps grade clusters to the attribute naming the zoned school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSchema {
    /// Layer label used in diagnostics.
    pub name: String,
    /// Attribute field per cluster.
    pub fields: Vec<(GradeCluster, String)>,
}

impl LayerSchema {
    /// Start an empty schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Read the `cluster` school name from `field`.
    #[must_use]
    pub fn with_field(mut self, cluster: GradeCluster, field: impl Into<String>) -> Self {
        self.fields.push((cluster, field.into()));
        self
    }

    /// The attribute field for `cluster`, if the layer exposes that level.
    #[must_use]
    pub fn field(&self, cluster: GradeCluster) -> Option<&str> {
        self.fields
            .iter()
            .find(|(candidate, _)| *candidate == cluster)
            .map(|(_, field)| field.as_str())
    }

    /// Administrative boundaries exposing all three levels in upper case.
    #[must_use]
    pub fn administrative() -> Self {
        Self::new("administrative")
            .with_field(GradeCluster::Elementary, "ELEMENTARY")
            .with_field(GradeCluster::Middle, "MIDDLE")
            .with_field(GradeCluster::High, "HIGH")
    }

    /// District boundaries exposing all three levels in title case.
    #[must_use]
    pub fn district() -> Self {
        Self::new("district")
            .with_field(GradeCluster::Elementary, "Elementary")
            .with_field(GradeCluster::Middle, "Middle")
            .with_field(GradeCluster::High, "High")
    }

    /// District elementary attendance zones.
    #[must_use]
    pub fn elementary_zones() -> Self {
        Self::new("elementary_zones").with_field(GradeCluster::Elementary, "DDP_ES_Nam")
    }

    /// District middle attendance zones.
    #[must_use]
    pub fn middle_zones() -> Self {
        Self::new("middle_zones").with_field(GradeCluster::Middle, "DDP_MS_Name")
    }

    /// District high attendance zones.
    #[must_use]
    pub fn high_zones() -> Self {
        Self::new("high_zones").with_field(GradeCluster::High, "DDP_HS_Nam")
    }

    /// The five standard layer schemas in evaluation order.
    #[must_use]
    pub fn standard() -> [Self; 5] {
        [
            Self::administrative(),
            Self::district(),
            Self::elementary_zones(),
            Self::middle_zones(),
            Self::high_zones(),
        ]
    }
}

/// One attendance-zone polygon with its attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolZone {
    /// Zone boundary in WGS84 degrees.
    pub geometry: MultiPolygon<f64>,
    /// Raw feature attributes.
    pub attributes: HashMap<String, String>,
}

impl SchoolZone {
    /// Construct a zone.
    #[must_use]
    pub const fn new(geometry: MultiPolygon<f64>, attributes: HashMap<String, String>) -> Self {
        Self {
            geometry,
            attributes,
        }
    }
}

/// A school boundary layer: schema plus zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolBoundaryLayer {
    /// How zone attributes map to school levels.
    pub schema: LayerSchema,
    /// Zones in source order.
    pub zones: Vec<SchoolZone>,
}

impl SchoolBoundaryLayer {
    /// Construct a layer.
    #[must_use]
    pub const fn new(schema: LayerSchema, zones: Vec<SchoolZone>) -> Self {
        Self { schema, zones }
    }
}

/// A [`SchoolBoundaryLayer`] with a spatial index over its zones.
#[derive(Debug, Clone)]
pub struct SchoolLayerIndex {
    layer: SchoolBoundaryLayer,
    index: PolygonIndex,
}

impl SchoolLayerIndex {
    /// Index a layer.
    #[must_use]
    pub fn new(layer: SchoolBoundaryLayer) -> Self {
        let index = PolygonIndex::build(layer.zones.iter().map(|zone| &zone.geometry));
        Self { layer, index }
    }

    /// The layer schema.
    #[must_use]
    pub const fn schema(&self) -> &LayerSchema {
        &self.layer.schema
    }

    /// Names of `cluster` schools zoned for `coord`.
    ///
    /// Only zones whose interior contains the point are considered. Missing
    /// or blank attributes are skipped; duplicates are kept.
    #[must_use]
    pub fn school_names(&self, coord: Coord<f64>, cluster: GradeCluster) -> Vec<&str> {
        let Some(field) = self.layer.schema.field(cluster) else {
            return Vec::new();
        };
        let point = Point::from(coord);
        self.index
            .candidates(&AABB::from_point([coord.x, coord.y]))
            .into_iter()
            .filter_map(|slot| self.layer.zones.get(slot))
            .filter(|zone| zone.geometry.contains(&point))
            .filter_map(|zone| zone.attributes.get(field))
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Performance data for one school.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolRecord {
    /// School name as published.
    pub name: String,
    /// Grade band served.
    pub cluster: GradeCluster,
    /// Performance metric keyed by year.
    pub performance: BTreeMap<u16, f64>,
    /// Carries a "beating the odds" designation.
    pub beating_the_odds: bool,
    /// Year-over-year average change.
    pub yoy_average: Option<f64>,
    /// Average score.
    pub average_score: Option<f64>,
    /// Applicable percentile threshold for the average score.
    pub percentile_threshold: Option<f64>,
}

impl SchoolRecord {
    /// Start a record with no metrics.
    #[must_use]
    pub fn new(name: impl Into<String>, cluster: GradeCluster) -> Self {
        Self {
            name: name.into(),
            cluster,
            performance: BTreeMap::new(),
            beating_the_odds: false,
            yoy_average: None,
            average_score: None,
            percentile_threshold: None,
        }
    }

    /// Record the performance metric for `year`.
    #[must_use]
    pub fn with_performance(mut self, year: u16, value: f64) -> Self {
        self.performance.insert(year, value);
        self
    }

    /// Set the beating-the-odds designation from its published label.
    #[must_use]
    pub fn with_designation(mut self, label: &str) -> Self {
        self.beating_the_odds = is_beating_the_odds(label);
        self
    }

    /// Set the growth metrics.
    #[must_use]
    pub const fn with_growth(
        mut self,
        yoy_average: Option<f64>,
        average_score: Option<f64>,
        percentile_threshold: Option<f64>,
    ) -> Self {
        self.yoy_average = yoy_average;
        self.average_score = average_score;
        self.percentile_threshold = percentile_threshold;
        self
    }
}

/// Report whether a published designation reads "beating the odds".
#[must_use]
pub fn is_beating_the_odds(label: &str) -> bool {
    label.to_lowercase() == "beating the odds"
}

/// A roster record paired with its normalised name.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    normalized_name: String,
    record: SchoolRecord,
}

impl RosterEntry {
    /// The name after [`normalize_school_name`].
    #[must_use]
    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    /// The underlying record.
    #[must_use]
    pub const fn record(&self) -> &SchoolRecord {
        &self.record
    }
}

/// School records grouped by grade cluster, in source order.
#[derive(Debug, Clone, Default)]
pub struct SchoolRoster {
    clusters: HashMap<GradeCluster, Vec<RosterEntry>>,
}

impl SchoolRoster {
    /// Group and normalise the records.
    #[must_use]
    pub fn new(records: Vec<SchoolRecord>) -> Self {
        let mut clusters: HashMap<GradeCluster, Vec<RosterEntry>> = HashMap::new();
        for record in records {
            clusters.entry(record.cluster).or_default().push(RosterEntry {
                normalized_name: normalize_school_name(&record.name),
                record,
            });
        }
        Self { clusters }
    }

    /// Roster entries for `cluster`.
    #[must_use]
    pub fn cluster(&self, cluster: GradeCluster) -> &[RosterEntry] {
        self.clusters.get(&cluster).map_or(&[][..], Vec::as_slice)
    }

    /// Total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clusters.values().map(Vec::len).sum()
    }

    /// Report whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.values().all(Vec::is_empty)
    }
}
