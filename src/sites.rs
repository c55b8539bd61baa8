//! Site selection: standardize raw coordinates, cluster, and map the medians
//! back to original units.

use std::sync::atomic::AtomicBool;

use crate::cluster::{KMedians, KMediansFit};
use crate::error::Result;
use crate::normalize::{normalize, NormalizationParams};

/// One selected site in original coordinates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Site {
    /// Cluster index.
    pub index: usize,
    /// Median in original units (e.g. `[lat, lon]`).
    pub location: Vec<f64>,
    /// Input indices of the points served by this site.
    pub members: Vec<usize>,
}

/// Sites plus everything needed to attribute input rows to them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiteSelection {
    sites: Vec<Site>,
    params: NormalizationParams,
    fit: KMediansFit,
}

impl SiteSelection {
    /// Selected sites, in cluster order.
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Site index per input point, in input order.
    pub fn labels(&self) -> &[usize] {
        self.fit.labels()
    }

    /// The underlying fit (medians in standardized space).
    pub fn fit(&self) -> &KMediansFit {
        &self.fit
    }

    /// Standardization fitted on the input points.
    pub fn params(&self) -> &NormalizationParams {
        &self.params
    }

    /// Whether the underlying fit converged.
    pub fn converged(&self) -> bool {
        self.fit.converged()
    }

    /// Site locations only, in cluster order.
    pub fn locations(&self) -> Vec<Vec<f64>> {
        self.sites.iter().map(|s| s.location.clone()).collect()
    }
}

/// Pick `model`'s `k` sites for the given raw points.
pub fn locate_sites(points: &[Vec<f64>], model: &KMedians) -> Result<SiteSelection> {
    let (normalized, params) = normalize(points)?;
    let fit = model.fit(&normalized)?;
    assemble(params, fit)
}

/// Like [`locate_sites`], but stops early once `cancel` is raised.
pub fn locate_sites_with_cancel(
    points: &[Vec<f64>],
    model: &KMedians,
    cancel: &AtomicBool,
) -> Result<SiteSelection> {
    let (normalized, params) = normalize(points)?;
    let fit = model.fit_with_cancel(&normalized, cancel)?;
    assemble(params, fit)
}

fn assemble(params: NormalizationParams, fit: KMediansFit) -> Result<SiteSelection> {
    let locations = params.denormalize_all(fit.medians())?;
    let sites = locations
        .into_iter()
        .enumerate()
        .map(|(index, location)| Site {
            index,
            location,
            members: fit.members(index),
        })
        .collect();

    if !fit.converged() {
        tracing::warn!(
            termination = ?fit.termination(),
            n_iter = fit.n_iter(),
            "site selection returned an unconverged fit"
        );
    }

    Ok(SiteSelection { sites, params, fit })
}
