//! Census tract polygons and the rural boundary.

use std::collections::{HashMap, HashSet};

use geo::{Contains, Coord, MultiPolygon, Point};
use rstar::AABB;
use serde::{Deserialize, Serialize};

use super::ReferenceError;
use super::polygon_index::PolygonIndex;
use crate::geo_math::{disc_intersects, project_multipolygon, to_web_mercator};

/// Attribute keys consulted for a tract identifier, in priority order.
const TRACT_ID_FIELDS: [&str; 2] = ["GEOID", "CensusTract"];

/// Resolve a tract identifier from a feature's attributes.
///
/// `GEOID` is preferred, then `CensusTract`. Blank values are ignored and the
/// returned identifier is trimmed.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use sitescore_core::resolve_tract_id;
///
/// let attributes = HashMap::from([(String::from("CensusTract"), String::from(" 13089020100 "))]);
/// assert_eq!(resolve_tract_id(&attributes), Some("13089020100"));
/// ```
#[must_use]
pub fn resolve_tract_id<S>(attributes: &HashMap<String, String, S>) -> Option<&str>
where
    S: std::hash::BuildHasher,
{
    TRACT_ID_FIELDS.iter().find_map(|field| {
        attributes
            .get(*field)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    })
}

/// A census tract polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensusTract {
    /// Tract identifier, unique within one vintage.
    pub geoid: String,
    /// Tract boundary in WGS84 degrees.
    pub geometry: MultiPolygon<f64>,
}

impl CensusTract {
    /// Construct a tract, trimming the identifier.
    #[must_use]
    pub fn new(geoid: &str, geometry: MultiPolygon<f64>) -> Self {
        Self {
            geoid: geoid.trim().to_owned(),
            geometry,
        }
    }

    /// Construct a tract from a feature's attributes.
    ///
    /// Returns `None` when no identifier can be resolved.
    #[must_use]
    pub fn from_attributes<S>(
        attributes: &HashMap<String, String, S>,
        geometry: MultiPolygon<f64>,
    ) -> Option<Self>
    where
        S: std::hash::BuildHasher,
    {
        resolve_tract_id(attributes).map(|geoid| Self::new(geoid, geometry))
    }
}

/// Spatially indexed tracts of one vintage.
///
/// Each tract is kept in WGS84 for point-in-polygon joins and in Web Mercator
/// for metric buffer queries.
#[derive(Debug, Clone, Default)]
pub struct TractLayer {
    tracts: Vec<CensusTract>,
    projected: Vec<MultiPolygon<f64>>,
    index: PolygonIndex,
    projected_index: PolygonIndex,
}

impl TractLayer {
    /// Build the layer.
    ///
    /// # Errors
    /// Returns [`ReferenceError::DuplicateTract`] when two tracts share a
    /// GEOID.
    pub fn new(layer: &str, tracts: Vec<CensusTract>) -> Result<Self, ReferenceError> {
        let mut seen = HashSet::with_capacity(tracts.len());
        for tract in &tracts {
            if !seen.insert(tract.geoid.as_str()) {
                return Err(ReferenceError::DuplicateTract {
                    layer: layer.to_owned(),
                    geoid: tract.geoid.clone(),
                });
            }
        }
        let projected: Vec<MultiPolygon<f64>> = tracts
            .iter()
            .map(|tract| project_multipolygon(&tract.geometry))
            .collect();
        let index = PolygonIndex::build(tracts.iter().map(|tract| &tract.geometry));
        let projected_index = PolygonIndex::build(&projected);
        Ok(Self {
            tracts,
            projected,
            index,
            projected_index,
        })
    }

    /// The tract whose interior contains `coord`.
    ///
    /// Points on a shared edge belong to no tract. When tracts overlap, the
    /// first one in input order wins.
    #[must_use]
    pub fn containing(&self, coord: Coord<f64>) -> Option<&CensusTract> {
        let point = Point::from(coord);
        self.index
            .candidates(&AABB::from_point([coord.x, coord.y]))
            .into_iter()
            .filter_map(|slot| self.tracts.get(slot))
            .find(|tract| tract.geometry.contains(&point))
    }

    /// Tracts touching a disc of `radius_metres` around `coord`.
    ///
    /// The disc is evaluated in Web Mercator metres. Results follow input
    /// order.
    #[must_use]
    pub fn within_buffer(&self, coord: Coord<f64>, radius_metres: f64) -> Vec<&CensusTract> {
        let centre = to_web_mercator(coord);
        let envelope = AABB::from_corners(
            [centre.x - radius_metres, centre.y - radius_metres],
            [centre.x + radius_metres, centre.y + radius_metres],
        );
        self.projected_index
            .candidates(&envelope)
            .into_iter()
            .filter(|slot| {
                self.projected
                    .get(*slot)
                    .is_some_and(|geometry| disc_intersects(geometry, centre, radius_metres))
            })
            .filter_map(|slot| self.tracts.get(slot))
            .collect()
    }

    /// Every tract in input order.
    pub fn iter(&self) -> impl Iterator<Item = &CensusTract> + '_ {
        self.tracts.iter()
    }

    /// Number of tracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracts.len()
    }

    /// Report whether the layer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracts.is_empty()
    }
}

/// Union of every rural-designated tract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuralBoundary {
    /// Unioned rural area in WGS84 degrees.
    pub geometry: MultiPolygon<f64>,
}

impl RuralBoundary {
    /// Wrap a unioned rural geometry.
    #[must_use]
    pub const fn new(geometry: MultiPolygon<f64>) -> Self {
        Self { geometry }
    }

    /// Report whether `coord` lies strictly inside the rural area.
    #[must_use]
    pub fn contains(&self, coord: Coord<f64>) -> bool {
        self.geometry.contains(&Point::from(coord))
    }
}
