//! K-medians site selection for geospatial points.
//!
//! `kmedian` groups 2D (or any fixed-dimension) coordinates into `k` clusters
//! under the Manhattan distance and reports one representative site per cluster.
//!
//! The public API is split in three parts:
//! - [`normalize`](mod@normalize): per-dimension standardization and its inverse
//! - [`cluster`](mod@cluster): k-medians (seeded random-sample init, Lloyd iterations)
//! - [`sites`](mod@sites): the two chained together, with sites reported in original units
//!
//! ```rust
//! use kmedian::{locate_sites, KMedians};
//!
//! let vehicles = vec![
//!     vec![47.60, -122.33],
//!     vec![47.61, -122.32],
//!     vec![46.73, -117.18],
//!     vec![46.74, -117.17],
//! ];
//! let selection = locate_sites(&vehicles, &KMedians::new(2).with_seed(1)).unwrap();
//! assert_eq!(selection.sites().len(), 2);
//! assert_eq!(selection.labels()[0], selection.labels()[1]);
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod normalize;
pub mod sites;

pub use cluster::{
    cluster, Clustering, Init, IterationStats, KMedians, KMediansFit, Termination,
};
pub use error::{Error, Result};
pub use normalize::{denormalize, normalize, NormalizationParams};
pub use sites::{locate_sites, locate_sites_with_cancel, Site, SiteSelection};
