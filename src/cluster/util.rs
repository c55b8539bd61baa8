use crate::error::{Error, Result};

/// Check that `data` is non-empty and rectangular; returns the dimension.
pub(crate) fn validate_points(data: &[Vec<f64>]) -> Result<usize> {
    let first = data.first().ok_or(Error::EmptyInput)?;
    let d = first.len();
    if d == 0 {
        return Err(Error::EmptyInput);
    }
    for point in data.iter().skip(1) {
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: point.len(),
            });
        }
    }
    Ok(d)
}

#[inline]
pub(crate) fn manhattan(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

/// Index of the nearest median and the distance to it.
///
/// Ties go to the lowest index: only a strictly smaller distance replaces the
/// current best.
#[inline]
pub(crate) fn nearest(point: &[f64], medians: &[Vec<f64>]) -> (usize, f64) {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, m) in medians.iter().enumerate() {
        let d = manhattan(point, m);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    (best, best_dist)
}

/// Median of a scratch buffer, reordering it in place.
///
/// Even lengths average the two middle values. Returns `None` when empty.
pub(crate) fn median_in_place(v: &mut [f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }

    let len = v.len();
    let mid = len / 2;
    let (lower, upper, _) = v.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
    let upper = *upper;
    if len % 2 == 1 {
        return Some(upper);
    }

    // After selection everything left of `mid` is <= v[mid]; its max is the lower middle.
    let lower = lower.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((lower + upper) / 2.0)
}

/// Largest per-coordinate absolute change between two median sets (Chebyshev).
pub(crate) fn max_shift(old: &[Vec<f64>], new: &[Vec<f64>]) -> f64 {
    old.iter()
        .zip(new.iter())
        .flat_map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd() {
        let mut values = vec![3.0, 1.0, 5.0, 2.0, 4.0];
        assert_eq!(median_in_place(&mut values), Some(3.0));
    }

    #[test]
    fn test_median_even_averages_middle_pair() {
        let mut values = vec![10.0, 0.0, 4.0, 2.0];
        assert_eq!(median_in_place(&mut values), Some(3.0));
    }

    #[test]
    fn test_median_even_unsorted_pairs() {
        let mut values = vec![7.0, -1.0, 3.0, 5.0, 9.0, 1.0];
        assert_eq!(median_in_place(&mut values), Some(4.0));
        let mut values = vec![2.0, 1.0];
        assert_eq!(median_in_place(&mut values), Some(1.5));
    }

    #[test]
    fn test_median_empty() {
        let mut values: Vec<f64> = vec![];
        assert_eq!(median_in_place(&mut values), None);
    }

    #[test]
    fn test_nearest_tie_prefers_lowest_index() {
        let medians = vec![vec![-1.0, 0.0], vec![1.0, 0.0]];
        assert_eq!(nearest(&[0.0, 0.0], &medians), (0, 1.0));
        assert_eq!(nearest(&[0.5, 0.0], &medians), (1, 0.5));
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(&[0.0, 0.0], &[3.0, -4.0]), 7.0);
    }

    #[test]
    fn test_max_shift_is_chebyshev() {
        let old = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        let new = vec![vec![0.5, -2.0], vec![1.0, 1.25]];
        assert_eq!(max_shift(&old, &new), 2.0);
    }

    #[test]
    fn test_validate_points() {
        assert_eq!(validate_points(&[vec![1.0, 2.0], vec![3.0, 4.0]]), Ok(2));
        assert_eq!(validate_points(&[]), Err(Error::EmptyInput));
        assert_eq!(validate_points(&[vec![]]), Err(Error::EmptyInput));
        assert_eq!(
            validate_points(&[vec![1.0, 2.0], vec![3.0]]),
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        );
    }
}
