//! Fan grid points out over a rayon worker pool.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use sitescore_core::{ReferenceStore, Site};
use sitescore_criteria::ScoreResult;

use crate::{GridError, GridScanConfig, GridSpec, PointScorer, ScanFailure};

/// Scored points and excluded points of one scan, in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    results: Vec<ScoreResult>,
    failures: Vec<ScanFailure>,
}

impl ScanReport {
    /// Points that were scored.
    #[must_use]
    pub fn results(&self) -> &[ScoreResult] {
        &self.results
    }

    /// Points that were excluded.
    #[must_use]
    pub fn failures(&self) -> &[ScanFailure] {
        &self.failures
    }

    /// Split the report into scored and excluded points.
    #[must_use]
    pub fn into_parts(self) -> (Vec<ScoreResult>, Vec<ScanFailure>) {
        (self.results, self.failures)
    }
}

/// Scores many points concurrently against one shared store.
///
/// Each point is an independent task on a dedicated rayon pool. Outcomes are
/// sent back over a channel and collected in arrival order. A point whose
/// scoring fails or panics is logged at `warn` and reported in
/// [`ScanReport::failures`]; the remaining points are unaffected.
#[derive(Debug)]
pub struct GridScanDriver<S>
where
    S: PointScorer,
{
    scorer: S,
    config: GridScanConfig,
}

impl<S> GridScanDriver<S>
where
    S: PointScorer,
{
    /// Drive `scorer` with the given pool settings.
    #[must_use]
    pub const fn new(scorer: S, config: GridScanConfig) -> Self {
        Self { scorer, config }
    }

    /// The wrapped scorer.
    #[must_use]
    pub const fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Score every point of `grid`.
    ///
    /// # Errors
    /// Returns [`GridError`] when the grid points cannot be built or the
    /// worker pool cannot start. Per-point failures are reported in the
    /// [`ScanReport`] instead.
    pub fn scan(&self, grid: &GridSpec, store: &ReferenceStore) -> Result<ScanReport, GridError> {
        let sites = grid.sites()?;
        self.scan_sites(&sites, store)
    }

    /// Score an explicit list of points.
    ///
    /// # Errors
    /// Returns [`GridError::ThreadPool`] when the worker pool cannot start.
    pub fn scan_sites(
        &self,
        sites: &[Site],
        store: &ReferenceStore,
    ) -> Result<ScanReport, GridError> {
        let workers = self.config.worker_count();
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("sitescore-grid-{index}"))
            .build()
            .map_err(GridError::ThreadPool)?;
        let total = sites.len();
        log::info!("scanning {total} points on {workers} workers");

        let (tx, rx) = mpsc::channel::<Result<ScoreResult, ScanFailure>>();
        let mut report = ScanReport::default();
        thread::scope(|scope| {
            scope.spawn(move || {
                pool.install(|| {
                    sites.par_iter().for_each_with(tx, |tx, site| {
                        if tx.send(self.score_isolated(site, store)).is_err() {
                            log::debug!("scan collector stopped; dropping point outcome");
                        }
                    });
                });
            });

            for (index, outcome) in rx.into_iter().enumerate() {
                match outcome {
                    Ok(result) => report.results.push(result),
                    Err(failure) => {
                        log::warn!("skipping point: {failure}");
                        report.failures.push(failure);
                    }
                }
                let done = index.saturating_add(1);
                let interval = self.config.progress_interval;
                if interval > 0 && done.is_multiple_of(interval) {
                    log::info!("scored {done}/{total} points");
                }
            }
        });

        log::info!(
            "scan finished: {} scored, {} skipped",
            report.results.len(),
            report.failures.len()
        );
        Ok(report)
    }

    fn score_isolated(&self, site: &Site, store: &ReferenceStore) -> Result<ScoreResult, ScanFailure> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.scorer.score_point(site, store))) {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(failure)) => Err(ScanFailure::Evaluation(failure)),
            Err(payload) => Err(ScanFailure::Panicked {
                site: *site,
                message: panic_message(payload.as_ref()),
            }),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| String::from("non-string panic payload"))
}
