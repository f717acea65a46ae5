//! Configuration for [`GridScanDriver`](crate::GridScanDriver).

use std::num::NonZeroUsize;
use std::thread;

use serde::{Deserialize, Serialize};

/// Points scored between progress log lines, unless overridden.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 500;

/// Worker pool and progress settings for a scan.
///
/// # Examples
/// ```
/// use sitescore_grid::GridScanConfig;
///
/// let config: GridScanConfig = serde_json::from_str(r#"{"workers": 4}"#)?;
/// assert_eq!(config.worker_count(), 4);
/// assert_eq!(config.progress_interval, 500);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridScanConfig {
    /// Worker threads; `None` uses the available parallelism.
    pub workers: Option<NonZeroUsize>,
    /// Log progress every this many points; `0` disables progress lines.
    pub progress_interval: usize,
}

impl Default for GridScanConfig {
    fn default() -> Self {
        Self {
            workers: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl GridScanConfig {
    /// Use `workers` threads. Zero selects the available parallelism.
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = NonZeroUsize::new(workers);
        self
    }

    /// Log progress every `interval` points.
    #[must_use]
    pub const fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Number of worker threads the scan will use.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers
            .or_else(|| thread::available_parallelism().ok())
            .map_or(1, NonZeroUsize::get)
    }
}
