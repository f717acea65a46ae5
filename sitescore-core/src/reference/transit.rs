//! Transit stops.

use geo::Coord;
use serde::{Deserialize, Serialize};

/// A fixed-route transit stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitStop {
    /// Stop position (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
    /// Whether the stop is a potential transit hub.
    pub is_potential_hub: bool,
}

impl TransitStop {
    /// Construct a stop at `location`.
    #[must_use]
    pub const fn new(location: Coord<f64>, is_potential_hub: bool) -> Self {
        Self {
            location,
            is_potential_hub,
        }
    }
}
