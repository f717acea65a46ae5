//! Ascending distance tiers.

/// `(max_miles, points)` pairs sorted by distance. The first tier whose bound
/// is at least the distance wins.
pub(crate) type Tiers = [(f64, f64)];

/// Points awarded for `distance` by the first satisfied tier, or zero.
pub(crate) fn award(distance: f64, tiers: &Tiers) -> f64 {
    tiers
        .iter()
        .find(|(max_miles, _)| distance <= *max_miles)
        .map_or(0.0, |(_, points)| *points)
}
