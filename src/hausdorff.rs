//! Symmetric Hausdorff distance with early-break nearest-neighbor scans.
//!
//! # Mathematical Formulation
//!
//! ```text
//! h(A, B) = max_{a ∈ A} min_{b ∈ B} d(a, b)        (directed)
//! H(A, B) = max(h(A, B), h(B, A))                   (symmetric)
//! ```
//!
//! # Early Break
//!
//! Both passes share one running maximum `cmax`. While scanning B for the
//! nearest neighbor of some `a`, the running minimum only ever decreases; as
//! soon as it drops below `cmax`, `a` can no longer raise the maximum, so the
//! rest of B is skipped for that `a`:
//!
//! ```text
//! cmax = 0
//! for a in A:                          (then the same with A and B swapped)
//!     cmin = ∞
//!     for b in B:
//!         cmin = min(cmin, d(a, b))
//!         if cmin < cmax: break
//!     if cmin > cmax and cmin < ∞: cmax = cmin
//! ```
//!
//! The worst case stays O(|A| * |B|) metric evaluations per pass. On
//! clustered or overlapping sets the typical count is far lower.
//!
//! # Empty Sets
//!
//! An empty inner set leaves `cmin = ∞` for every outer point, and infinite
//! minima never update `cmax`. Under [`EmptySetPolicy::Ignore`] (default) an
//! empty set therefore contributes nothing and the result stays finite.
//! [`EmptySetPolicy::Reject`] turns empty input into an error instead.

use std::convert::Infallible;

use crate::distance;
use crate::error::{HausdorffError, Result, Side};
use crate::metric::{Distance, FallibleMetric, Metric, MetricRegistry};
use crate::points::PointSet;

/// What to do when either point set has no points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum EmptySetPolicy {
    /// Empty sets contribute nothing; two empty sets are at distance 0.
    #[default]
    Ignore,
    /// Fail with [`HausdorffError::EmptyPointSet`].
    Reject,
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct HausdorffOptions {
    /// Stop scanning the inner set once a point cannot raise the maximum.
    ///
    /// Turning this off gives the exhaustive max-min scan. The result is
    /// identical; only the number of metric evaluations changes.
    pub early_break: bool,
    /// Handling of empty point sets.
    pub empty_sets: EmptySetPolicy,
}

impl Default for HausdorffOptions {
    fn default() -> Self {
        Self {
            early_break: true,
            empty_sets: EmptySetPolicy::Ignore,
        }
    }
}

/// Outcome of one engine call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScanReport {
    /// The symmetric Hausdorff distance.
    pub distance: f64,
    /// Metric evaluations performed across both passes.
    pub evaluations: u64,
    /// Outer points whose inner scan was cut short.
    pub early_exits: u64,
}

/// Running state of one pass (or one chunk of a pass).
#[derive(Debug, Clone, Copy)]
struct PassStats {
    max: f64,
    evaluations: u64,
    early_exits: u64,
}

impl PassStats {
    fn seeded(max: f64) -> Self {
        Self {
            max,
            evaluations: 0,
            early_exits: 0,
        }
    }

    #[cfg(feature = "parallel")]
    fn merge(self, other: Self) -> Self {
        Self {
            max: self.max.max(other.max),
            evaluations: self.evaluations + other.evaluations,
            early_exits: self.early_exits + other.early_exits,
        }
    }
}

/// One directed pass over row-major buffers.
///
/// `outer` and `inner` are flat buffers of `n_dims`-wide rows. `dist` is
/// called as `dist(outer_row, inner_row)`.
#[inline]
fn scan<E, F>(
    outer: &[f64],
    inner: &[f64],
    n_dims: usize,
    seed: f64,
    early_break: bool,
    mut dist: F,
) -> std::result::Result<PassStats, E>
where
    F: FnMut(&[f64], &[f64]) -> std::result::Result<f64, E>,
{
    let mut stats = PassStats::seeded(seed);

    for p in outer.chunks_exact(n_dims) {
        let mut nearest = f64::INFINITY;
        for q in inner.chunks_exact(n_dims) {
            let d = dist(p, q)?;
            stats.evaluations += 1;
            if d < nearest {
                nearest = d;
            }
            if early_break && nearest < stats.max {
                stats.early_exits += 1;
                break;
            }
        }
        if nearest > stats.max && nearest.is_finite() {
            stats.max = nearest;
        }
    }

    Ok(stats)
}

/// Unwrap a result whose error type is uninhabited.
#[inline]
fn infallible<T>(r: std::result::Result<T, Infallible>) -> T {
    match r {
        Ok(v) => v,
        Err(never) => match never {},
    }
}

/// Hausdorff distance engine.
///
/// Holds configuration only; the metric is supplied per call so the same
/// engine serves generic, `dyn` and fallible metrics alike.
///
/// # Example
///
/// ```rust
/// use hausdorff::{Distance, Hausdorff, PointSet};
///
/// let a = PointSet::from_rows(&[[0.0, 0.0], [1.0, 1.0]]).unwrap();
/// let b = PointSet::from_rows(&[[0.0, 0.0]]).unwrap();
///
/// let engine = Hausdorff::new();
/// let report = engine.distance_with_report(&a, &b, &Distance::Euclidean).unwrap();
/// assert!((report.distance - 2.0_f64.sqrt()).abs() < 1e-12);
/// assert!(report.evaluations <= 4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hausdorff {
    options: HausdorffOptions,
}

impl Hausdorff {
    /// Engine with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with the given options.
    pub fn with_options(options: HausdorffOptions) -> Self {
        Self { options }
    }

    /// Current options.
    pub fn options(&self) -> &HausdorffOptions {
        &self.options
    }

    /// Symmetric Hausdorff distance between `a` and `b` under `metric`.
    ///
    /// # Errors
    ///
    /// - [`HausdorffError::DimensionMismatch`] if column counts differ.
    /// - [`HausdorffError::MetricPrecondition`] if the metric needs more
    ///   columns than the sets have.
    /// - [`HausdorffError::EmptyPointSet`] under [`EmptySetPolicy::Reject`].
    pub fn distance<M>(&self, a: &PointSet, b: &PointSet, metric: &M) -> Result<f64>
    where
        M: Metric + ?Sized,
    {
        self.distance_with_report(a, b, metric).map(|r| r.distance)
    }

    /// Like [`Hausdorff::distance`], also reporting how much work was done.
    pub fn distance_with_report<M>(&self, a: &PointSet, b: &PointSet, metric: &M) -> Result<ScanReport>
    where
        M: Metric + ?Sized,
    {
        self.validate(a, b, metric.name(), metric.min_dimension())?;
        let report = infallible(self.run(a, b, |p, q| Ok(metric.distance(p, q))));
        log_report(metric.name(), a, b, &report);
        Ok(report)
    }

    /// Distance under a built-in metric selected by name.
    ///
    /// The name is resolved once; each built-in gets its own monomorphized
    /// scan, so there is no per-evaluation dispatch. Only the five built-in
    /// names resolve here; use [`Hausdorff::distance_in`] for metrics added
    /// to a [`MetricRegistry`].
    ///
    /// # Errors
    ///
    /// [`HausdorffError::UnknownMetric`] for unrecognized names, plus
    /// everything [`Hausdorff::distance`] can return.
    pub fn distance_by_name(&self, a: &PointSet, b: &PointSet, name: &str) -> Result<f64> {
        let metric: Distance = name.parse().map_err(|e| {
            tracing::trace!(metric = name, "rejecting unknown metric name");
            e
        })?;
        self.validate(a, b, metric.as_str(), metric.min_dimension())?;

        let report = match metric {
            Distance::Manhattan => self.run_kernel(a, b, distance::manhattan),
            Distance::Euclidean => self.run_kernel(a, b, distance::euclidean),
            Distance::Chebyshev => self.run_kernel(a, b, distance::chebyshev),
            Distance::Cosine => self.run_kernel(a, b, distance::cosine_distance),
            Distance::Haversine => self.run_kernel(a, b, distance::haversine),
        };
        log_report(metric.as_str(), a, b, &report);
        Ok(report.distance)
    }

    /// Distance under a metric looked up by name in `registry`.
    ///
    /// Evaluation goes through the registry's shared `dyn Metric`.
    ///
    /// ```rust
    /// use hausdorff::{Hausdorff, MetricRegistry, PointSet};
    ///
    /// let mut registry = MetricRegistry::new();
    /// registry.register("squared", |x: &[f64], y: &[f64]| {
    ///     x.iter().zip(y).map(|(p, q)| (p - q) * (p - q)).sum::<f64>()
    /// });
    ///
    /// let a = PointSet::from_rows(&[[0.0, 0.0], [1.0, 2.0]]).unwrap();
    /// let b = PointSet::from_rows(&[[0.0, 0.0]]).unwrap();
    /// let d = Hausdorff::new().distance_in(&registry, &a, &b, "Squared").unwrap();
    /// assert_eq!(d, 5.0);
    /// ```
    ///
    /// # Errors
    ///
    /// [`HausdorffError::UnknownMetric`] if `name` is not registered, plus
    /// everything [`Hausdorff::distance`] can return.
    pub fn distance_in(
        &self,
        registry: &MetricRegistry,
        a: &PointSet,
        b: &PointSet,
        name: &str,
    ) -> Result<f64> {
        let metric = registry.get(name).map_err(|e| {
            tracing::trace!(metric = name, "metric not in registry");
            e
        })?;
        self.distance(a, b, &*metric)
    }

    /// Distance under a metric that can fail.
    ///
    /// The first metric error aborts the scan and is returned as-is.
    /// Validation errors are converted into the caller's error type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hausdorff::{Hausdorff, HausdorffError, PointSet};
    ///
    /// #[derive(Debug)]
    /// enum MyError {
    ///     Negative,
    ///     Invalid(HausdorffError),
    /// }
    ///
    /// impl From<HausdorffError> for MyError {
    ///     fn from(e: HausdorffError) -> Self {
    ///         MyError::Invalid(e)
    ///     }
    /// }
    ///
    /// let a = PointSet::from_rows(&[[1.0], [-1.0]]).unwrap();
    /// let b = PointSet::from_rows(&[[2.0]]).unwrap();
    ///
    /// let strict = |x: &[f64], y: &[f64]| {
    ///     if x[0] < 0.0 || y[0] < 0.0 {
    ///         Err(MyError::Negative)
    ///     } else {
    ///         Ok((x[0] - y[0]).abs())
    ///     }
    /// };
    ///
    /// let r = Hausdorff::new().try_distance(&a, &b, &strict);
    /// assert!(matches!(r, Err(MyError::Negative)));
    /// ```
    pub fn try_distance<M, E>(&self, a: &PointSet, b: &PointSet, metric: &M) -> std::result::Result<f64, E>
    where
        M: FallibleMetric<Error = E> + ?Sized,
        E: From<HausdorffError>,
    {
        self.validate(a, b, metric.name(), metric.min_dimension())?;
        let report = self.run(a, b, |p, q| metric.try_distance(p, q))?;
        log_report(metric.name(), a, b, &report);
        Ok(report.distance)
    }

    /// Parallel [`Hausdorff::distance`] over the rayon global pool.
    ///
    /// The outer loop of each pass is split into row chunks. Every chunk
    /// keeps its own running maximum, seeded with the result of the previous
    /// pass, and chunk maxima are combined with `max`. Pruning inside a chunk
    /// only uses a lower bound of the global maximum, so the result equals
    /// the sequential one; evaluation counts may differ.
    #[cfg(feature = "parallel")]
    pub fn par_distance<M>(&self, a: &PointSet, b: &PointSet, metric: &M) -> Result<f64>
    where
        M: Metric + Sync + ?Sized,
    {
        self.par_distance_with_report(a, b, metric).map(|r| r.distance)
    }

    /// Parallel [`Hausdorff::distance_with_report`].
    #[cfg(feature = "parallel")]
    pub fn par_distance_with_report<M>(
        &self,
        a: &PointSet,
        b: &PointSet,
        metric: &M,
    ) -> Result<ScanReport>
    where
        M: Metric + Sync + ?Sized,
    {
        self.validate(a, b, metric.name(), metric.min_dimension())?;

        let n_dims = a.n_dims();
        let early_break = self.options.early_break;

        let forward = infallible(par_scan(
            a.as_flat(),
            b.as_flat(),
            n_dims,
            0.0,
            early_break,
            &|p: &[f64], q: &[f64]| Ok(metric.distance(p, q)),
        ));
        let backward = infallible(par_scan(
            b.as_flat(),
            a.as_flat(),
            n_dims,
            forward.max,
            early_break,
            &|q: &[f64], p: &[f64]| Ok(metric.distance(p, q)),
        ));

        let report = ScanReport {
            distance: backward.max,
            evaluations: forward.evaluations + backward.evaluations,
            early_exits: forward.early_exits + backward.early_exits,
        };
        log_report(metric.name(), a, b, &report);
        Ok(report)
    }

    /// Shape and policy checks. Runs before any metric evaluation.
    fn validate(&self, a: &PointSet, b: &PointSet, metric: &str, min_dimension: usize) -> Result<()> {
        if a.n_dims() != b.n_dims() {
            tracing::trace!(left = a.n_dims(), right = b.n_dims(), "column count mismatch");
            return Err(HausdorffError::DimensionMismatch {
                left: a.n_dims(),
                right: b.n_dims(),
            });
        }

        if a.n_dims() < min_dimension {
            tracing::trace!(metric, required = min_dimension, actual = a.n_dims(), "too few columns for metric");
            return Err(HausdorffError::MetricPrecondition {
                metric: metric.to_string(),
                required: min_dimension,
                actual: a.n_dims(),
            });
        }

        if self.options.empty_sets == EmptySetPolicy::Reject {
            if a.is_empty() {
                return Err(HausdorffError::EmptyPointSet { side: Side::Left });
            }
            if b.is_empty() {
                return Err(HausdorffError::EmptyPointSet { side: Side::Right });
            }
        }

        Ok(())
    }

    #[inline]
    fn run_kernel<F>(&self, a: &PointSet, b: &PointSet, f: F) -> ScanReport
    where
        F: Fn(&[f64], &[f64]) -> f64,
    {
        infallible(self.run(a, b, |p, q| Ok(f(p, q))))
    }

    /// Both passes, sharing one running maximum.
    ///
    /// `dist` always receives the point from `a` first.
    fn run<E, F>(&self, a: &PointSet, b: &PointSet, mut dist: F) -> std::result::Result<ScanReport, E>
    where
        F: FnMut(&[f64], &[f64]) -> std::result::Result<f64, E>,
    {
        let n_dims = a.n_dims();
        let early_break = self.options.early_break;

        let forward = scan(a.as_flat(), b.as_flat(), n_dims, 0.0, early_break, &mut dist)?;
        let backward = scan(b.as_flat(), a.as_flat(), n_dims, forward.max, early_break, |q, p| dist(p, q))?;

        Ok(ScanReport {
            distance: backward.max,
            evaluations: forward.evaluations + backward.evaluations,
            early_exits: forward.early_exits + backward.early_exits,
        })
    }
}

/// Rows per parallel work item, never below this.
#[cfg(feature = "parallel")]
const MIN_PAR_CHUNK_ROWS: usize = 64;

#[cfg(feature = "parallel")]
fn par_scan<E, F>(
    outer: &[f64],
    inner: &[f64],
    n_dims: usize,
    seed: f64,
    early_break: bool,
    dist: &F,
) -> std::result::Result<PassStats, E>
where
    E: Send,
    F: Fn(&[f64], &[f64]) -> std::result::Result<f64, E> + Sync,
{
    use rayon::prelude::*;

    let rows = outer.len() / n_dims;
    let per_thread = rows.div_ceil(rayon::current_num_threads() * 4);
    let chunk_rows = per_thread.max(MIN_PAR_CHUNK_ROWS);

    outer
        .par_chunks(chunk_rows * n_dims)
        .map(|chunk| scan(chunk, inner, n_dims, seed, early_break, dist))
        .try_reduce(|| PassStats::seeded(seed), |x, y| Ok(x.merge(y)))
}

fn log_report(metric: &str, a: &PointSet, b: &PointSet, report: &ScanReport) {
    tracing::debug!(
        metric,
        left_points = a.len(),
        right_points = b.len(),
        n_dims = a.n_dims(),
        evaluations = report.evaluations,
        early_exits = report.early_exits,
        distance = report.distance,
        "hausdorff distance computed"
    );
}

/// Symmetric Hausdorff distance between `a` and `b` under `metric`.
///
/// Accepts built-ins ([`Distance`]), closures, `fn` items, and `&dyn Metric`.
///
/// ```rust
/// use hausdorff::{hausdorff_distance, Distance, PointSet};
///
/// let a = PointSet::from_rows(&[[0.0, 0.0], [1.0, 1.0]]).unwrap();
/// let b = PointSet::from_rows(&[[0.0, 0.0]]).unwrap();
///
/// let d = hausdorff_distance(&a, &b, &Distance::Euclidean).unwrap();
/// assert!((d - 2.0_f64.sqrt()).abs() < 1e-12);
///
/// let taxicab = |x: &[f64], y: &[f64]| x.iter().zip(y).map(|(p, q)| (p - q).abs()).sum::<f64>();
/// assert_eq!(hausdorff_distance(&a, &b, &taxicab).unwrap(), 2.0);
/// ```
pub fn hausdorff_distance<M>(a: &PointSet, b: &PointSet, metric: &M) -> Result<f64>
where
    M: Metric + ?Sized,
{
    Hausdorff::new().distance(a, b, metric)
}

/// Symmetric Hausdorff distance under a built-in metric given by name.
///
/// ```rust
/// use hausdorff::{hausdorff_distance_by_name, HausdorffError, PointSet};
///
/// let a = PointSet::from_rows(&[[0.0], [3.0]]).unwrap();
/// let b = PointSet::from_rows(&[[1.0]]).unwrap();
///
/// assert_eq!(hausdorff_distance_by_name(&a, &b, "manhattan").unwrap(), 2.0);
/// assert!(matches!(
///     hausdorff_distance_by_name(&a, &b, "haversine"),
///     Err(HausdorffError::MetricPrecondition { .. })
/// ));
/// ```
pub fn hausdorff_distance_by_name(a: &PointSet, b: &PointSet, name: &str) -> Result<f64> {
    Hausdorff::new().distance_by_name(a, b, name)
}

/// Symmetric Hausdorff distance under a metric looked up in `registry`.
///
/// See [`Hausdorff::distance_in`].
pub fn hausdorff_distance_in(
    registry: &MetricRegistry,
    a: &PointSet,
    b: &PointSet,
    name: &str,
) -> Result<f64> {
    Hausdorff::new().distance_in(registry, a, b, name)
}

/// Symmetric Hausdorff distance under a fallible metric.
///
/// See [`Hausdorff::try_distance`].
pub fn try_hausdorff_distance<M, E>(a: &PointSet, b: &PointSet, metric: &M) -> std::result::Result<f64, E>
where
    M: FallibleMetric<Error = E> + ?Sized,
    E: From<HausdorffError>,
{
    Hausdorff::new().try_distance(a, b, metric)
}

/// Parallel [`hausdorff_distance`].
#[cfg(feature = "parallel")]
pub fn par_hausdorff_distance<M>(a: &PointSet, b: &PointSet, metric: &M) -> Result<f64>
where
    M: Metric + Sync + ?Sized,
{
    Hausdorff::new().par_distance(a, b, metric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::euclidean;

    fn set(rows: &[&[f64]]) -> PointSet {
        PointSet::from_rows(rows).unwrap()
    }

    #[test]
    fn test_known_value() {
        let a = set(&[&[0.0, 0.0], &[1.0, 1.0]]);
        let b = set(&[&[0.0, 0.0]]);
        let d = hausdorff_distance(&a, &b, &Distance::Euclidean).unwrap();
        assert!((d - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_scan_breaks_once_point_cannot_raise_max() {
        // Point 0 scans all of inner and sets max = 10. Point 1 stops at its
        // zero-distance neighbor, the second inner point.
        let outer = [0.0, 20.0];
        let inner = [10.0, 20.0, 30.0];
        let stats = infallible(scan(&outer, &inner, 1, 0.0, true, |p, q| Ok((p[0] - q[0]).abs())));
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.evaluations, 5);
        assert_eq!(stats.early_exits, 1);
    }

    #[test]
    fn test_scan_without_break_is_exhaustive() {
        let outer = [0.0, 20.0];
        let inner = [10.0, 20.0, 30.0];
        let stats = infallible(scan(&outer, &inner, 1, 0.0, false, |p, q| Ok((p[0] - q[0]).abs())));
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.evaluations, 6);
        assert_eq!(stats.early_exits, 0);
    }

    #[test]
    fn test_infinite_minimum_never_updates_max() {
        let stats = infallible(scan::<Infallible, _>(&[1.0, 2.0], &[], 1, 0.0, true, |_, _| {
            unreachable!("no inner points")
        }));
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.evaluations, 0);
    }

    #[test]
    fn test_metric_sees_left_point_first_in_both_passes() {
        let a = set(&[&[1.0], &[2.0]]);
        let b = set(&[&[-1.0], &[-2.0], &[-3.0]]);
        let checked = |x: &[f64], y: &[f64]| {
            assert!(x[0] > 0.0 && y[0] < 0.0, "argument order flipped");
            x[0] - y[0]
        };
        assert!(hausdorff_distance(&a, &b, &checked).is_ok());
    }

    #[test]
    fn test_dyn_metric() {
        let a = set(&[&[0.0, 0.0], &[4.0, 0.0]]);
        let b = set(&[&[0.0, 3.0]]);
        let m: &dyn Metric = &euclidean;
        assert_eq!(hausdorff_distance(&a, &b, m).unwrap(), 5.0);
    }

    #[test]
    fn test_report_counts_fewer_evaluations_with_break() {
        // a[0] sits 5 above the line and sets the maximum first; every
        // later point then finds a closer neighbor and stops early.
        let mut rows: Vec<Vec<f64>> = (0..50).map(|i| vec![i as f64, 0.0]).collect();
        let b = PointSet::from_rows(&rows).unwrap();
        rows[0][1] = 5.0;
        let a = PointSet::from_rows(&rows).unwrap();

        let fast = Hausdorff::new()
            .distance_with_report(&a, &b, &Distance::Euclidean)
            .unwrap();
        let slow = Hausdorff::with_options(HausdorffOptions {
            early_break: false,
            ..Default::default()
        })
        .distance_with_report(&a, &b, &Distance::Euclidean)
        .unwrap();

        assert_eq!(fast.distance, 5.0);
        assert_eq!(slow.distance, 5.0);
        assert_eq!(slow.evaluations, 2 * 50 * 50);
        assert!(fast.evaluations < slow.evaluations);
    }

    #[test]
    fn test_reject_policy() {
        let engine = Hausdorff::with_options(HausdorffOptions {
            empty_sets: EmptySetPolicy::Reject,
            ..Default::default()
        });
        let a = set(&[&[0.0, 0.0]]);
        let empty = PointSet::empty(2).unwrap();

        assert_eq!(
            engine.distance(&a, &empty, &Distance::Euclidean),
            Err(HausdorffError::EmptyPointSet { side: Side::Right })
        );
        assert_eq!(
            engine.distance(&empty, &a, &Distance::Euclidean),
            Err(HausdorffError::EmptyPointSet { side: Side::Left })
        );
    }

    #[test]
    fn test_validation_precedes_evaluation() {
        let a = set(&[&[0.0, 0.0, 0.0]]);
        let b = set(&[&[0.0, 0.0, 0.0, 0.0]]);
        let never = |_: &[f64], _: &[f64]| -> f64 { panic!("metric must not run") };
        assert_eq!(
            hausdorff_distance(&a, &b, &never),
            Err(HausdorffError::DimensionMismatch { left: 3, right: 4 })
        );
    }
}
