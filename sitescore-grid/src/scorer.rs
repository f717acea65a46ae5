//! The per-point scoring seam used by the scan driver.

use sitescore_core::{NetworkDistanceProvider, ReferenceStore, Site};
use sitescore_criteria::{PointFailure, ScoreAggregator, ScoreResult};

/// Score one point against the shared reference store.
///
/// Implementations are called concurrently from every worker thread.
pub trait PointScorer: Send + Sync {
    /// Score `site`.
    ///
    /// # Errors
    /// Returns [`PointFailure`] when the point cannot be scored.
    fn score_point(&self, site: &Site, store: &ReferenceStore) -> Result<ScoreResult, PointFailure>;
}

impl<P> PointScorer for ScoreAggregator<P>
where
    P: NetworkDistanceProvider,
{
    fn score_point(&self, site: &Site, store: &ReferenceStore) -> Result<ScoreResult, PointFailure> {
        self.score(site, store)
    }
}
