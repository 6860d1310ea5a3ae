//! Exact Hausdorff distance between finite point sets.
//!
//! `hausdorff` computes the symmetric Hausdorff distance
//!
//! ```text
//! H(A, B) = max( max_{a ∈ A} min_{b ∈ B} d(a, b),  max_{b ∈ B} min_{a ∈ A} d(a, b) )
//! ```
//!
//! with an early-break nearest-neighbor scan that skips most of the
//! O(|A| * |B|) metric evaluations on typical data while returning exactly the
//! same value as the exhaustive computation.
//!
//! - **Point sets**: [`PointSet`], a validated rectangular `f64` array
//! - **Metrics**: [`Distance`] built-ins ([`distance::manhattan`],
//!   [`distance::euclidean`], [`distance::chebyshev`],
//!   [`distance::cosine_distance`], [`distance::haversine`]), any closure via
//!   [`Metric`], fallible closures via [`FallibleMetric`], runtime lookup via
//!   [`MetricRegistry`]
//! - **Engine**: [`Hausdorff`] with [`HausdorffOptions`], plus the free
//!   functions [`hausdorff_distance`], [`hausdorff_distance_by_name`],
//!   [`hausdorff_distance_in`], [`try_hausdorff_distance`]
//! - **Parallel**: `par_hausdorff_distance` (feature `parallel`)
//!
//! # SIMD Dispatch
//!
//! The dense kernels behind the L1, L2 and cosine metrics dispatch to the
//! fastest available instruction set:
//!
//! | Architecture | Instructions | Detection |
//! |--------------|--------------|-----------|
//! | x86_64 | AVX2 + FMA | Runtime |
//! | aarch64 | NEON | Always available |
//! | Other | Portable | LLVM auto-vectorizes |
//!
//! Vectors shorter than 16 dimensions use portable code (SIMD overhead not worthwhile).
//!
//! # Historical Context
//!
//! Felix Hausdorff introduced the distance in "Grundzüge der Mengenlehre"
//! (1914). The early-break scan follows Taha & Hanbury (2015), who showed
//! that breaking the inner loop once a point cannot raise the running
//! maximum, combined with random ordering, brings the average cost close to
//! linear on realistic segmentation data.
//!
//! # Example
//!
//! ```rust
//! use hausdorff::{hausdorff_distance, hausdorff_distance_by_name, Distance, PointSet};
//!
//! let a = PointSet::from_rows(&[[0.0, 0.0], [1.0, 1.0]]).unwrap();
//! let b = PointSet::from_rows(&[[0.0, 0.0]]).unwrap();
//!
//! // Built-in metric
//! let d = hausdorff_distance(&a, &b, &Distance::Euclidean).unwrap();
//! assert!((d - 2.0_f64.sqrt()).abs() < 1e-12);
//!
//! // Same thing, selected by name
//! let d = hausdorff_distance_by_name(&a, &b, "euclidean").unwrap();
//! assert!((d - 2.0_f64.sqrt()).abs() < 1e-12);
//!
//! // Any closure with the pointwise signature
//! let weighted = |x: &[f64], y: &[f64]| (3.0 * (x[0] - y[0]).abs()).max((x[1] - y[1]).abs());
//! assert_eq!(hausdorff_distance(&a, &b, &weighted).unwrap(), 3.0);
//! ```
//!
//! # References
//!
//! - Hausdorff, F. (1914). "Grundzüge der Mengenlehre"
//! - Taha, A.A. & Hanbury, A. (2015). "An Efficient Algorithm for Calculating
//!   the Exact Hausdorff Distance" (IEEE TPAMI)

#![warn(missing_docs)]
#![warn(clippy::all)]

mod arch;
mod dense;
pub mod distance;
mod error;
mod hausdorff;
mod metric;
mod points;

pub use dense::{
    dot, dot_portable, l1_distance, l1_distance_portable, l2_distance_squared,
    l2_distance_squared_portable, norm,
};
pub use error::{HausdorffError, Result, Side};
pub use hausdorff::{
    hausdorff_distance, hausdorff_distance_by_name, hausdorff_distance_in, try_hausdorff_distance,
    EmptySetPolicy, Hausdorff, HausdorffOptions, ScanReport,
};
pub use metric::{CustomMetric, Distance, FallibleMetric, Metric, MetricRegistry, SharedMetric};
pub use points::PointSet;

#[cfg(feature = "parallel")]
pub use hausdorff::par_hausdorff_distance;

/// Minimum vector dimension for SIMD to be worthwhile.
///
/// Below this threshold, function call overhead outweighs SIMD benefits.
pub const MIN_DIM_SIMD: usize = 16;

/// Mean Earth radius in kilometers, used by [`distance::haversine`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_value_by_every_entry_point() {
        let a = PointSet::from_rows(&[[0.0, 0.0], [1.0, 1.0]]).unwrap();
        let b = PointSet::from_rows(&[[0.0, 0.0]]).unwrap();
        let expected = std::f64::consts::SQRT_2;

        let by_enum = hausdorff_distance(&a, &b, &Distance::Euclidean).unwrap();
        let by_fn = hausdorff_distance(&a, &b, &distance::euclidean).unwrap();
        let by_name = hausdorff_distance_by_name(&a, &b, "euclidean").unwrap();
        let registry = MetricRegistry::new();
        let by_registry = hausdorff_distance(&a, &b, &*registry.get("euclidean").unwrap()).unwrap();

        for d in [by_enum, by_fn, by_name, by_registry] {
            assert!((d - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_identical_sets_are_at_zero() {
        let a = PointSet::from_rows(&[[1.0, 2.0], [3.0, 4.0], [-5.0, 0.5]]).unwrap();
        for d in [Distance::Manhattan, Distance::Euclidean, Distance::Chebyshev, Distance::Haversine] {
            assert_eq!(hausdorff_distance(&a, &a, &d).unwrap(), 0.0, "{d}");
        }
        assert!(hausdorff_distance(&a, &a, &Distance::Cosine).unwrap() < 1e-12);
    }
}
