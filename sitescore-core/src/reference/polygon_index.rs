//! Envelope index over a slice of multipolygons.

use geo::{BoundingRect, MultiPolygon};
use rstar::{AABB, RTree, RTreeObject};

/// A polygon's bounding box and its position in the owning slice.
#[derive(Debug, Clone)]
struct PolygonEntry {
    slot: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for PolygonEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R\*-tree of polygon envelopes. Empty geometries are never returned.
#[derive(Debug, Clone, Default)]
pub(crate) struct PolygonIndex {
    tree: RTree<PolygonEntry>,
}

impl PolygonIndex {
    pub(crate) fn build<'a, I>(geometries: I) -> Self
    where
        I: IntoIterator<Item = &'a MultiPolygon<f64>>,
    {
        let entries = geometries
            .into_iter()
            .enumerate()
            .filter_map(|(slot, geometry)| {
                geometry.bounding_rect().map(|rect| PolygonEntry {
                    slot,
                    envelope: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                })
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Slots whose envelope intersects `envelope`, in ascending order.
    pub(crate) fn candidates(&self, envelope: &AABB<[f64; 2]>) -> Vec<usize> {
        let mut slots: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(envelope)
            .map(|entry| entry.slot)
            .collect();
        slots.sort_unstable();
        slots
    }
}
