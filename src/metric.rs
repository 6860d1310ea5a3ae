//! Metric trait surfaces and the name-keyed metric registry.
//!
//! Two ways to hand the engine a metric:
//!
//! - [`Metric`]: infallible `(&[f64], &[f64]) -> f64`. Implemented by the
//!   built-in [`Distance`] variants and by any plain closure or `fn`.
//! - [`FallibleMetric`]: `(&[f64], &[f64]) -> Result<f64, E>` for caller
//!   metrics that can fail mid-scan. The first error aborts the computation
//!   and reaches the caller unchanged.
//!
//! Both are usable through generics (the scan is monomorphized per metric)
//! or behind `&dyn` when the metric is only known at runtime.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::distance;
use crate::error::{HausdorffError, Result};

/// A pointwise distance between two points of equal dimension.
///
/// Implementations must be pure: no interior state that changes results,
/// deterministic, non-negative for the results to be meaningful. Symmetry
/// is not required structurally; the engine always calls
/// `distance(a, b)` with the point from the first set as `a`.
pub trait Metric {
    /// Distance between `a` and `b`.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;

    /// Name used in errors and logs.
    fn name(&self) -> &str {
        "custom"
    }

    /// Minimum coordinates per point this metric needs.
    fn min_dimension(&self) -> usize {
        1
    }
}

impl<F> Metric for F
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        self(a, b)
    }
}

/// A pointwise distance that may fail.
pub trait FallibleMetric {
    /// Error produced by a failed evaluation.
    type Error;

    /// Distance between `a` and `b`, or the reason it could not be computed.
    fn try_distance(&self, a: &[f64], b: &[f64]) -> std::result::Result<f64, Self::Error>;

    /// Name used in errors and logs.
    fn name(&self) -> &str {
        "custom"
    }

    /// Minimum coordinates per point this metric needs.
    fn min_dimension(&self) -> usize {
        1
    }
}

impl<F, E> FallibleMetric for F
where
    F: Fn(&[f64], &[f64]) -> std::result::Result<f64, E>,
{
    type Error = E;

    #[inline]
    fn try_distance(&self, a: &[f64], b: &[f64]) -> std::result::Result<f64, E> {
        self(a, b)
    }
}

/// Built-in metrics.
///
/// Parsing is case-insensitive:
///
/// ```rust
/// use hausdorff::Distance;
///
/// let d: Distance = "Haversine".parse().unwrap();
/// assert_eq!(d, Distance::Haversine);
/// assert_eq!(d.as_str(), "haversine");
/// assert!("minkowski".parse::<Distance>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Distance {
    /// `Σ|x_i - y_i|`
    Manhattan,
    /// `sqrt(Σ(x_i - y_i)²)`
    #[default]
    Euclidean,
    /// `max_i |x_i - y_i|`
    Chebyshev,
    /// `1 - cos(θ)`, 1.0 for zero vectors
    Cosine,
    /// Great-circle kilometers between `(lat, lng)` in degrees
    Haversine,
}

impl Distance {
    /// Every built-in metric.
    pub const ALL: [Distance; 5] = [
        Distance::Manhattan,
        Distance::Euclidean,
        Distance::Chebyshev,
        Distance::Cosine,
        Distance::Haversine,
    ];

    /// Lowercase registry name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Distance::Manhattan => "manhattan",
            Distance::Euclidean => "euclidean",
            Distance::Chebyshev => "chebyshev",
            Distance::Cosine => "cosine",
            Distance::Haversine => "haversine",
        }
    }

    /// This metric's function, wrapped with its name and minimum dimension.
    ///
    /// Passing the result to the engine avoids the per-call `match` while
    /// keeping the same validation as the enum itself.
    ///
    /// ```rust
    /// use hausdorff::{hausdorff_distance, Distance, HausdorffError, PointSet};
    ///
    /// let one_col = PointSet::from_rows(&[[10.0]]).unwrap();
    /// assert!(matches!(
    ///     hausdorff_distance(&one_col, &one_col, &Distance::Haversine.kernel()),
    ///     Err(HausdorffError::MetricPrecondition { required: 2, .. })
    /// ));
    /// ```
    pub fn kernel(self) -> CustomMetric<fn(&[f64], &[f64]) -> f64> {
        let f: fn(&[f64], &[f64]) -> f64 = match self {
            Distance::Manhattan => distance::manhattan,
            Distance::Euclidean => distance::euclidean,
            Distance::Chebyshev => distance::chebyshev,
            Distance::Cosine => distance::cosine_distance,
            Distance::Haversine => distance::haversine,
        };
        CustomMetric::new(self.as_str(), f).with_min_dimension(self.min_dimension())
    }
}

impl Metric for Distance {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Distance::Manhattan => distance::manhattan(a, b),
            Distance::Euclidean => distance::euclidean(a, b),
            Distance::Chebyshev => distance::chebyshev(a, b),
            Distance::Cosine => distance::cosine_distance(a, b),
            Distance::Haversine => distance::haversine(a, b),
        }
    }

    fn name(&self) -> &str {
        self.as_str()
    }

    fn min_dimension(&self) -> usize {
        match self {
            // latitude + longitude
            Distance::Haversine => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Distance {
    type Err = HausdorffError;

    fn from_str(s: &str) -> Result<Self> {
        Distance::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| HausdorffError::UnknownMetric { name: s.to_string() })
    }
}

/// A caller-supplied metric with an explicit name and minimum dimension.
///
/// ```rust
/// use hausdorff::{CustomMetric, Metric};
///
/// let weighted = CustomMetric::new("weighted", |a: &[f64], b: &[f64]| {
///     (2.0 * (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
/// })
/// .with_min_dimension(2);
///
/// assert_eq!(weighted.name(), "weighted");
/// assert_eq!(weighted.min_dimension(), 2);
/// ```
#[derive(Clone)]
pub struct CustomMetric<F> {
    name: String,
    min_dimension: usize,
    f: F,
}

impl<F> CustomMetric<F>
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    /// Wrap `f` under `name`.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            min_dimension: 1,
            f,
        }
    }

    /// Require at least `n` coordinates per point.
    pub fn with_min_dimension(mut self, n: usize) -> Self {
        self.min_dimension = n.max(1);
        self
    }
}

impl<F> Metric for CustomMetric<F>
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        (self.f)(a, b)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn min_dimension(&self) -> usize {
        self.min_dimension
    }
}

impl<F> fmt::Debug for CustomMetric<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomMetric")
            .field("name", &self.name)
            .field("min_dimension", &self.min_dimension)
            .finish_non_exhaustive()
    }
}

/// Shared handle to a registered metric.
pub type SharedMetric = Arc<dyn Metric + Send + Sync>;

/// Keeps the registered name attached to metrics that don't carry one.
struct Registered<M> {
    name: String,
    inner: M,
}

impl<M: Metric> Metric for Registered<M> {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        self.inner.distance(a, b)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn min_dimension(&self) -> usize {
        self.inner.min_dimension()
    }
}

/// Name-keyed set of metrics selectable at runtime.
///
/// Starts with the five built-ins; callers may add their own. Names are
/// matched case-insensitively.
///
/// ```rust
/// use hausdorff::{MetricRegistry, Metric};
///
/// let mut registry = MetricRegistry::new();
/// registry.register("squared", |a: &[f64], b: &[f64]| {
///     a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f64>()
/// });
///
/// let m = registry.get("Squared").unwrap();
/// assert_eq!(m.name(), "squared");
/// assert_eq!(m.distance(&[0.0, 0.0], &[1.0, 2.0]), 5.0);
/// assert!(registry.get("nope").is_err());
/// ```
#[derive(Clone)]
pub struct MetricRegistry {
    metrics: HashMap<String, SharedMetric>,
}

impl MetricRegistry {
    /// A registry holding the built-in metrics.
    pub fn new() -> Self {
        let mut metrics: HashMap<String, SharedMetric> = HashMap::new();
        for d in Distance::ALL {
            metrics.insert(d.as_str().to_string(), Arc::new(d));
        }
        Self { metrics }
    }

    /// Add or replace a metric under `name`, returning the one it replaced.
    pub fn register<M>(&mut self, name: impl Into<String>, metric: M) -> Option<SharedMetric>
    where
        M: Metric + Send + Sync + 'static,
    {
        let name = name.into().to_ascii_lowercase();
        tracing::debug!(metric = %name, "registering metric");
        let entry: SharedMetric = Arc::new(Registered {
            name: name.clone(),
            inner: metric,
        });
        self.metrics.insert(name, entry)
    }

    /// Look up a metric by name.
    ///
    /// # Errors
    ///
    /// [`HausdorffError::UnknownMetric`] if nothing is registered under `name`.
    pub fn get(&self, name: &str) -> Result<SharedMetric> {
        self.metrics
            .get(&name.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| HausdorffError::UnknownMetric {
                name: name.to_string(),
            })
    }

    /// True if `name` resolves.
    pub fn contains(&self, name: &str) -> bool {
        self.metrics.contains_key(&name.to_ascii_lowercase())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.metrics.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MetricRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricRegistry")
            .field("names", &self.names())
            .finish()
    }
}
