//! Parallel scoring of a regular latitude/longitude grid.
//!
//! [`GridSpec`] enumerates the grid points, [`GridScanDriver`] scores them on
//! a rayon worker pool against one shared
//! [`ReferenceStore`](sitescore_core::ReferenceStore), and [`ScanReport`]
//! collects the scored points alongside the points that failed. A failing or
//! panicking point never aborts the scan.
//!
//! # Examples
//!
//! ```
//! use sitescore_core::test_support::FixedDistanceProvider;
//! use sitescore_core::{ReferenceData, ReferenceStore};
//! use sitescore_criteria::ScoreAggregator;
//! use sitescore_grid::{GridScanConfig, GridScanDriver, GridSpec};
//!
//! let store = ReferenceStore::new(ReferenceData::default())?;
//! let grid = GridSpec::new(33.0, 33.5, -84.5, -84.0, 0.25)?;
//! let driver = GridScanDriver::new(
//!     ScoreAggregator::new(FixedDistanceProvider::new(0.3)),
//!     GridScanConfig::default().with_workers(2),
//! );
//! let report = driver.scan(&grid, &store)?;
//! assert_eq!(report.results().len(), 4);
//! assert!(report.failures().is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod config;
mod driver;
mod error;
mod grid;
mod scorer;

pub use config::{DEFAULT_PROGRESS_INTERVAL, GridScanConfig};
pub use driver::{GridScanDriver, ScanReport};
pub use error::{GridError, ScanFailure};
pub use grid::{GridSpec, MAX_GRID_POINTS};
pub use scorer::PointScorer;
