use thiserror::Error;

/// Errors returned by normalization and clustering in this crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Input slice is empty (or its points have no coordinates).
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("non-finite coordinate in point {index}")]
    NonFinite {
        /// Index of the offending point.
        index: usize,
    },
}

impl Error {
    /// The input point set was empty or malformed.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::EmptyInput | Error::DimensionMismatch { .. } | Error::NonFinite { .. }
        )
    }

    /// A tuning parameter (`k`, iteration budget, tolerance, ...) was out of range.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(
            self,
            Error::InvalidParameter { .. } | Error::InvalidClusterCount { .. }
        )
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
