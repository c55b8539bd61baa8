//! Partitional clustering under the Manhattan distance.
//!
//! ## K-medians
//!
//! Assign each point to the nearest median, then move every median to the
//! coordinate-wise median of its points. Repeat until nothing moves.
//!
//! **Objective**: minimize the within-cluster sum of L1 distances:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - m_k||₁
//! ```
//!
//! **Compared to k-means**: the median ignores how far away an outlier is,
//! only which side of the center it falls on. A single stray point therefore
//! cannot drag a center off the bulk of its cluster.
//!
//! **Assumptions**:
//! - You know k in advance
//! - Dimensions are on comparable scales (see [`crate::normalize()`])
//!
//! ## Usage
//!
//! ```rust
//! use kmedian::cluster::{Clustering, KMedians};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = KMedians::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);  // First two together
//! assert_ne!(labels[0], labels[2]);  // Separate from last two
//! ```

mod kmedians;
mod traits;
pub(crate) mod util;

pub use kmedians::{cluster, Init, IterationStats, KMedians, KMediansFit, Termination};
pub use traits::Clustering;
