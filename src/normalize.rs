//! Per-dimension standardization (zero mean, unit variance) and its inverse.
//!
//! Clustering runs in standardized space so that a dimension with a wide
//! numeric range does not dominate the L1 distance. A dimension with zero
//! variance maps to `0.0` and maps back to its mean.

use crate::cluster::util;
use crate::error::{Error, Result};

/// Fitted per-dimension mean and (population) standard deviation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizationParams {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl NormalizationParams {
    /// Compute means and standard deviations of a non-empty, finite point set.
    pub fn fit(points: &[Vec<f64>]) -> Result<Self> {
        let d = util::validate_points(points)?;
        if let Some(index) = points
            .iter()
            .position(|p| p.iter().any(|v| !v.is_finite()))
        {
            return Err(Error::NonFinite { index });
        }

        // Running mean; each step is bounded by the largest magnitude seen.
        let mut means = vec![0.0; d];
        for (i, p) in points.iter().enumerate() {
            let k = (i + 1) as f64;
            for (m, v) in means.iter_mut().zip(p) {
                *m += v / k - *m / k;
            }
        }

        let n = points.len() as f64;
        let mut stds = Vec::with_capacity(d);
        for (dim, &m) in means.iter().enumerate() {
            // Halved deviations cannot overflow; rescale by the largest before squaring.
            let scale = points
                .iter()
                .map(|p| half_deviation(p[dim], m).abs())
                .fold(0.0, f64::max);
            if scale == 0.0 {
                stds.push(0.0);
                continue;
            }
            let sum_sq: f64 = points
                .iter()
                .map(|p| {
                    let r = half_deviation(p[dim], m) / scale;
                    r * r
                })
                .sum();
            // At most half the range, so finite.
            stds.push(2.0 * scale * (sum_sq / n).sqrt());
        }

        Ok(Self { means, stds })
    }

    /// Number of dimensions.
    pub fn dim(&self) -> usize {
        self.means.len()
    }

    /// Per-dimension means.
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Per-dimension population standard deviations (`0.0` for flat dimensions).
    pub fn stds(&self) -> &[f64] {
        &self.stds
    }

    /// Standardize points with these parameters.
    pub fn transform(&self, points: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        points
            .iter()
            .map(|p| -> Result<Vec<f64>> {
                self.check_dim(p)?;
                Ok(p.iter()
                    .zip(&self.means)
                    .zip(&self.stds)
                    .map(|((&v, &m), &s)| {
                        if s == 0.0 {
                            0.0
                        } else {
                            half_deviation(v, m) / (s / 2.0)
                        }
                    })
                    .collect())
            })
            .collect()
    }

    /// Map one standardized point back to original units.
    pub fn denormalize(&self, point: &[f64]) -> Result<Vec<f64>> {
        self.check_dim(point)?;
        Ok(point
            .iter()
            .zip(&self.means)
            .zip(&self.stds)
            // Same as `z * s + m`, halved so the product stays finite near f64::MAX.
            .map(|((z, m), s)| (z * (s / 2.0) + m / 2.0) * 2.0)
            .collect())
    }

    /// Map many standardized points back to original units.
    pub fn denormalize_all(&self, points: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        points.iter().map(|p| self.denormalize(p)).collect()
    }

    fn check_dim(&self, point: &[f64]) -> Result<()> {
        if point.len() != self.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.dim(),
                found: point.len(),
            });
        }
        Ok(())
    }
}

/// `(v - m) / 2` without overflowing for any finite `v`, `m`.
#[inline]
fn half_deviation(v: f64, m: f64) -> f64 {
    v / 2.0 - m / 2.0
}

/// Fit standardization parameters and apply them in one pass.
pub fn normalize(points: &[Vec<f64>]) -> Result<(Vec<Vec<f64>>, NormalizationParams)> {
    let params = NormalizationParams::fit(points)?;
    let normalized = params.transform(points)?;
    Ok((normalized, params))
}

/// Inverse of [`normalize`] for a single point.
pub fn denormalize(params: &NormalizationParams, point: &[f64]) -> Result<Vec<f64>> {
    params.denormalize(point)
}
