//! Error types for Hausdorff distance computation.
//!
//! Every variant is raised during validation, before the engine calls the
//! metric even once. Failures raised by a caller's metric are not represented
//! here: [`try_hausdorff_distance`](crate::try_hausdorff_distance) hands them
//! back in the caller's own error type.

/// Result type alias for validation and engine operations.
pub type Result<T> = std::result::Result<T, HausdorffError>;

/// Which of the two point sets an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The first argument (`A`).
    Left,
    /// The second argument (`B`).
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Errors raised while validating a Hausdorff distance call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HausdorffError {
    /// Input is not a rectangular two-dimensional array of points.
    #[error("invalid point set shape: {reason}")]
    InvalidShape {
        /// What was wrong with the input.
        reason: String,
    },

    /// The two point sets have a different number of columns.
    #[error("point sets must have an equal number of columns ({left} vs {right})")]
    DimensionMismatch {
        /// Columns in `A`.
        left: usize,
        /// Columns in `B`.
        right: usize,
    },

    /// Metric name is not a registered metric.
    #[error("unknown metric '{name}'")]
    UnknownMetric {
        /// The name that failed to resolve.
        name: String,
    },

    /// The chosen metric needs more coordinates per point than were given.
    #[error("{metric} distance requires at least {required} coordinates per point, got {actual}")]
    MetricPrecondition {
        /// Metric name.
        metric: String,
        /// Minimum columns the metric needs.
        required: usize,
        /// Columns actually present.
        actual: usize,
    },

    /// A point set has no points and the engine is configured to reject that.
    #[error("{side} point set is empty")]
    EmptyPointSet {
        /// Which argument was empty.
        side: Side,
    },
}

impl HausdorffError {
    pub(crate) fn invalid_shape(reason: impl Into<String>) -> Self {
        HausdorffError::InvalidShape {
            reason: reason.into(),
        }
    }
}
