//! Point set storage.
//!
//! A [`PointSet`] is a rectangular `(n_points, n_dims)` array of `f64`
//! coordinates kept in one contiguous row-major buffer:
//!
//! ```text
//! [p0_d0, p0_d1, p0_d2] [p1_d0, p1_d1, p1_d2] ...
//!       point 0               point 1
//! data[i * n_dims + d] = point i, dimension d
//! ```
//!
//! The scan compares whole points against each other, so rows (not columns)
//! are the unit of access and each row is handed to the metric as a plain
//! `&[f64]` slice with no copying.

use crate::error::{HausdorffError, Result};

/// A fixed-dimension, ordered collection of points.
///
/// Construction validates the shape once; every `PointSet` afterwards is
/// guaranteed rectangular with at least one column.
///
/// # Example
///
/// ```rust
/// use hausdorff::PointSet;
///
/// let set = PointSet::from_rows(&[vec![0.0, 0.0], vec![1.0, 1.0]]).unwrap();
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.n_dims(), 2);
/// assert_eq!(set.row(1), &[1.0, 1.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet {
    /// Row-major coordinates: data[i * n_dims + d]
    data: Vec<f64>,
    n_points: usize,
    n_dims: usize,
}

impl PointSet {
    /// Create from a list of rows.
    ///
    /// # Errors
    ///
    /// [`HausdorffError::InvalidShape`] if the rows have differing lengths,
    /// if rows have zero columns, or if `rows` is empty (dimensionality
    /// cannot be inferred; use [`PointSet::empty`]).
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(HausdorffError::invalid_shape(
                "cannot infer dimensionality from zero rows; use PointSet::empty",
            ));
        };

        let n_dims = first.as_ref().len();
        if n_dims == 0 {
            return Err(HausdorffError::invalid_shape("points must have at least one column"));
        }

        let mut data = Vec::with_capacity(n_dims * rows.len());
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n_dims {
                return Err(HausdorffError::invalid_shape(format!(
                    "array is not rectangular: row {i} has {} columns, expected {n_dims}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            data,
            n_points: rows.len(),
            n_dims,
        })
    }

    /// Create from flat row-major data.
    ///
    /// # Errors
    ///
    /// [`HausdorffError::InvalidShape`] if `n_dims` is zero or `data.len()`
    /// is not a multiple of `n_dims`.
    pub fn from_flat(data: Vec<f64>, n_dims: usize) -> Result<Self> {
        if n_dims == 0 {
            return Err(HausdorffError::invalid_shape("points must have at least one column"));
        }
        if data.len() % n_dims != 0 {
            return Err(HausdorffError::invalid_shape(format!(
                "{} values cannot be split into rows of {n_dims} columns",
                data.len()
            )));
        }

        Ok(Self {
            n_points: data.len() / n_dims,
            data,
            n_dims,
        })
    }

    /// A point set with no points and a known dimensionality.
    ///
    /// # Errors
    ///
    /// [`HausdorffError::InvalidShape`] if `n_dims` is zero.
    pub fn empty(n_dims: usize) -> Result<Self> {
        Self::from_flat(Vec::new(), n_dims)
    }

    /// Number of points (rows).
    #[inline]
    pub fn len(&self) -> usize {
        self.n_points
    }

    /// True if the set holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_points == 0
    }

    /// Coordinates per point (columns).
    #[inline]
    pub fn n_dims(&self) -> usize {
        self.n_dims
    }

    /// `(n_points, n_dims)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_points, self.n_dims)
    }

    /// Borrow point `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.n_dims;
        &self.data[start..start + self.n_dims]
    }

    /// Iterate over points in order.
    #[inline]
    pub fn rows(&self) -> std::slice::ChunksExact<'_, f64> {
        self.data.chunks_exact(self.n_dims)
    }

    /// The underlying row-major buffer.
    #[inline]
    pub fn as_flat(&self) -> &[f64] {
        &self.data
    }

    /// Consume the set, returning the row-major buffer.
    pub fn into_flat(self) -> Vec<f64> {
        self.data
    }
}
