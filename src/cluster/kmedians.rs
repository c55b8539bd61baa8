//! K-medians: Lloyd-style partitioning under the Manhattan (L1) distance.
//!
//! # The Algorithm
//!
//! K-medians follows the same alternating scheme as k-means, but replaces the
//! squared Euclidean distance by the L1 distance and the cluster mean by the
//! coordinate-wise median:
//!
//! 1. **Initialize**: pick `k` distinct input points as the starting medians.
//! 2. **Assign**: send every point to its nearest median (ties go to the
//!    lowest median index).
//! 3. **Update**: replace each median by the per-dimension median of its members.
//!    A median with no members keeps its previous value.
//! 4. **Stop** once no coordinate of any median moves by `tol` or more, or after
//!    `max_iter` rounds.
//!
//! **Objective**: minimize the total within-cluster L1 distance:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - m_k||₁
//! ```
//!
//! Because the L1 norm is separable, the coordinate-wise median is an exact
//! minimizer of each cluster's term, so neither step can increase `J`.
//!
//! ## When to Use
//!
//! - Data with outliers (the median is far less sensitive than the mean)
//! - Grid-like geometry where L1 is the natural travel cost
//! - Picking `k` representative locations for a set of sites
//!
//! ## Limitations
//!
//! - Local optimum only; results depend on the seed.
//! - An empty cluster is never repaired, so it can stay empty for the rest of
//!   the run.
//!
//! ## Complexity
//!
//! - **Assignment**: O(n·k·d) per iteration.
//! - **Update**: O(n·d) per iteration (quickselect).

use std::sync::atomic::{AtomicBool, Ordering};

use rand::prelude::*;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::traits::Clustering;
use super::util;
use crate::error::{Error, Result};

/// How the starting medians are chosen.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Init {
    /// `k` distinct input points, sampled uniformly without replacement.
    RandomSample,
    /// Caller-supplied medians (exactly `k` points of the data's dimension).
    Provided(Vec<Vec<f64>>),
}

/// K-medians clusterer (parameters only).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KMedians {
    k: usize,
    max_iter: usize,
    tol: f64,
    seed: Option<u64>,
    init: Init,
}

/// Why the iteration loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// The largest median shift fell below the tolerance.
    Converged,
    /// The iteration budget ran out first.
    MaxIterations,
    /// The cancellation flag was raised between iterations.
    Cancelled,
}

/// Per-iteration diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationStats {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Total L1 distance of the assignment made in this iteration.
    pub cost: f64,
    /// Largest coordinate change of any median in the update step.
    pub max_shift: f64,
    /// Clusters that received no points.
    pub empty_clusters: usize,
}

/// Result of a k-medians fit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KMediansFit {
    medians: Vec<Vec<f64>>,
    labels: Vec<usize>,
    n_iter: usize,
    termination: Termination,
    cost: f64,
    history: Vec<IterationStats>,
}

impl KMediansFit {
    /// Final medians, one per cluster, indexed `0..k`.
    pub fn medians(&self) -> &[Vec<f64>] {
        &self.medians
    }

    /// Cluster index for each input point, in input order.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Consume the fit and keep only the labels.
    pub fn into_labels(self) -> Vec<usize> {
        self.labels
    }

    /// Number of assign/update iterations actually performed.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Whether the run stopped because the medians stopped moving.
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    /// Why the run stopped.
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Total L1 distance from every point to its assigned median.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Diagnostics for each iteration, in order.
    pub fn history(&self) -> &[IterationStats] {
        &self.history
    }

    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.medians.len()
    }

    /// Point count per cluster.
    ///
    /// Labels outside `0..k` (possible only in a hand-built or deserialized
    /// fit) are not counted.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k()];
        for &l in &self.labels {
            if let Some(size) = sizes.get_mut(l) {
                *size += 1;
            }
        }
        sizes
    }

    /// Indices of the points assigned to `cluster` (empty if out of range).
    pub fn members(&self, cluster: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == cluster)
            .map(|(i, _)| i)
            .collect()
    }

    /// Clusters with no assigned points.
    pub fn empty_clusters(&self) -> Vec<usize> {
        self.cluster_sizes()
            .into_iter()
            .enumerate()
            .filter(|(_, size)| *size == 0)
            .map(|(c, _)| c)
            .collect()
    }

    /// Assign new points (in the same space as the fit) to the nearest median.
    pub fn predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        let d = util::validate_points(data)?;
        let expected = self.medians.first().map_or(0, Vec::len);
        if d != expected {
            return Err(Error::DimensionMismatch { expected, found: d });
        }
        Ok(data
            .iter()
            .map(|p| util::nearest(p, &self.medians).0)
            .collect())
    }
}

impl KMedians {
    /// Create a new k-medians clusterer.
    ///
    /// Defaults: `max_iter = 100`, `tol = 1e-4`, random-sample init, unseeded.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            tol: 1e-4,
            seed: None,
            init: Init::RandomSample,
        }
    }

    /// Set the iteration budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the convergence tolerance on the largest median coordinate change.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Fix the RNG seed; equal inputs then give equal results.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Choose how starting medians are picked.
    pub fn with_init(mut self, init: Init) -> Self {
        self.init = init;
        self
    }

    /// Iteration budget.
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Convergence tolerance.
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// RNG seed, if fixed.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Run k-medians to completion.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<KMediansFit> {
        self.run(data, None)
    }

    /// Run k-medians, checking `cancel` before each iteration.
    ///
    /// A raised flag stops the run with [`Termination::Cancelled`]; the
    /// returned fit reflects the medians reached so far.
    pub fn fit_with_cancel(&self, data: &[Vec<f64>], cancel: &AtomicBool) -> Result<KMediansFit> {
        self.run(data, Some(cancel))
    }

    fn validate(&self, data: &[Vec<f64>]) -> Result<usize> {
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        // Also rejects NaN.
        if !(self.tol >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "tol",
                message: "must be non-negative",
            });
        }

        let d = util::validate_points(data)?;
        if self.k > data.len() {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: data.len(),
            });
        }
        Ok(d)
    }

    fn initial_medians(&self, data: &[Vec<f64>], d: usize) -> Result<Vec<Vec<f64>>> {
        match &self.init {
            Init::RandomSample => {
                let mut rng: Box<dyn RngCore> = match self.seed {
                    Some(s) => Box::new(StdRng::seed_from_u64(s)),
                    None => Box::new(rand::rng()),
                };
                Ok(rand::seq::index::sample(&mut rng, data.len(), self.k)
                    .into_iter()
                    .map(|i| data[i].clone())
                    .collect())
            }
            Init::Provided(medians) => {
                if medians.len() != self.k {
                    return Err(Error::InvalidParameter {
                        name: "init",
                        message: "must provide exactly k medians",
                    });
                }
                for m in medians {
                    if m.len() != d {
                        return Err(Error::DimensionMismatch {
                            expected: d,
                            found: m.len(),
                        });
                    }
                }
                Ok(medians.clone())
            }
        }
    }

    fn run(&self, data: &[Vec<f64>], cancel: Option<&AtomicBool>) -> Result<KMediansFit> {
        let d = self.validate(data)?;
        let mut medians = self.initial_medians(data, d)?;

        let n = data.len();
        let mut labels = vec![0usize; n];
        let mut history = Vec::new();
        let mut termination = Termination::MaxIterations;

        for iteration in 1..=self.max_iter {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                termination = Termination::Cancelled;
                break;
            }

            let cost = assign(data, &medians, &mut labels);
            let (updated, empty_clusters) = update(data, &labels, &medians);
            let max_shift = util::max_shift(&medians, &updated);

            history.push(IterationStats {
                iteration,
                cost,
                max_shift,
                empty_clusters,
            });
            tracing::debug!(iteration, cost, max_shift, empty_clusters, "k-medians iteration");

            if max_shift < self.tol {
                termination = Termination::Converged;
                break;
            }
            medians = updated;
        }

        // Labels must describe the medians we hand back.
        let cost = match (termination, history.last()) {
            (Termination::Converged, Some(last)) => last.cost,
            _ => assign(data, &medians, &mut labels),
        };

        let n_iter = history.len();
        match termination {
            Termination::MaxIterations => tracing::warn!(
                k = self.k,
                max_iter = self.max_iter,
                cost,
                "k-medians hit the iteration cap without converging"
            ),
            _ => tracing::info!(
                k = self.k,
                n_points = n,
                n_iter,
                cost,
                ?termination,
                "k-medians finished"
            ),
        }

        Ok(KMediansFit {
            medians,
            labels,
            n_iter,
            termination,
            cost,
            history,
        })
    }
}

impl Default for KMedians {
    /// Five clusters with the [`KMedians::new`] defaults.
    fn default() -> Self {
        Self::new(5)
    }
}

impl Clustering for KMedians {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        self.fit(data).map(KMediansFit::into_labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// Seeded k-medians with an explicit iteration budget and tolerance.
///
/// A pure function of its arguments: the same call always returns the same fit.
///
/// ```rust
/// let points = vec![vec![0.0, 0.0], vec![0.1, 0.0], vec![5.0, 5.0], vec![5.1, 5.0]];
/// let fit = kmedian::cluster(&points, 2, 100, 1e-4, 7).unwrap();
/// assert_eq!(fit.labels()[0], fit.labels()[1]);
/// assert_ne!(fit.labels()[0], fit.labels()[2]);
/// ```
pub fn cluster(
    points: &[Vec<f64>],
    k: usize,
    max_iters: usize,
    tolerance: f64,
    seed: u64,
) -> Result<KMediansFit> {
    KMedians::new(k)
        .with_max_iter(max_iters)
        .with_tol(tolerance)
        .with_seed(seed)
        .fit(points)
}

/// Assignment step. Writes `labels` and returns the total distance.
fn assign(data: &[Vec<f64>], medians: &[Vec<f64>], labels: &mut [usize]) -> f64 {
    #[cfg(feature = "parallel")]
    let nearest: Vec<(usize, f64)> = data
        .par_iter()
        .map(|p| util::nearest(p, medians))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let nearest: Vec<(usize, f64)> = data.iter().map(|p| util::nearest(p, medians)).collect();

    // Summed in input order so both paths agree bit for bit.
    let mut cost = 0.0;
    for (label, (c, dist)) in labels.iter_mut().zip(nearest) {
        *label = c;
        cost += dist;
    }
    cost
}

/// Update step. Returns the new medians and the number of empty clusters.
fn update(data: &[Vec<f64>], labels: &[usize], medians: &[Vec<f64>]) -> (Vec<Vec<f64>>, usize) {
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); medians.len()];
    for (i, &l) in labels.iter().enumerate() {
        members[l].push(i);
    }
    let empty = members.iter().filter(|m| m.is_empty()).count();

    let step = |(idx, old): (&Vec<usize>, &Vec<f64>)| {
        cluster_median(data, idx).unwrap_or_else(|| old.clone())
    };

    #[cfg(feature = "parallel")]
    let updated = members.par_iter().zip(medians.par_iter()).map(step).collect();
    #[cfg(not(feature = "parallel"))]
    let updated = members.iter().zip(medians.iter()).map(step).collect();

    (updated, empty)
}

/// Coordinate-wise median of the given rows, or `None` if there are none.
fn cluster_median(data: &[Vec<f64>], members: &[usize]) -> Option<Vec<f64>> {
    let d = data[*members.first()?].len();
    let mut scratch = Vec::with_capacity(members.len());
    let mut out = Vec::with_capacity(d);
    for dim in 0..d {
        scratch.clear();
        scratch.extend(members.iter().map(|&i| data[i][dim]));
        out.push(util::median_in_place(&mut scratch)?);
    }
    Some(out)
}
