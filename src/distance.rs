//! Built-in pointwise distance functions.
//!
//! Every function maps two equal-length coordinate slices to a non-negative
//! `f64`, never allocates, and never mutates its inputs. They are the
//! comparison primitive on the innermost loop of the Hausdorff scan.
//!
//! | Metric | Formula | Range |
//! |--------|---------|-------|
//! | Manhattan | `Σ|x_i - y_i|` | [0, ∞) |
//! | Euclidean | `sqrt(Σ(x_i - y_i)²)` | [0, ∞) |
//! | Chebyshev | `max_i |x_i - y_i|` | [0, ∞) |
//! | Cosine | `1 - x·y / (‖x‖‖y‖)` | [0, 2] |
//! | Haversine | great-circle km between `(lat, lng)` | [0, πR] |

use crate::dense::{dot, l1_distance, l2_distance_squared, norm};
use crate::EARTH_RADIUS_KM;

/// Manhattan (L1) distance: `Σ|x_i - y_i|`.
///
/// ```rust
/// use hausdorff::distance::manhattan;
///
/// assert_eq!(manhattan(&[1.0, 2.0], &[4.0, 0.0]), 5.0);
/// ```
#[inline]
#[must_use]
pub fn manhattan(x: &[f64], y: &[f64]) -> f64 {
    l1_distance(x, y)
}

/// Euclidean (L2) distance: `sqrt(Σ(x_i - y_i)²)`.
///
/// ```rust
/// use hausdorff::distance::euclidean;
///
/// assert!((euclidean(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 1e-12);
/// ```
#[inline]
#[must_use]
pub fn euclidean(x: &[f64], y: &[f64]) -> f64 {
    l2_distance_squared(x, y).sqrt()
}

/// Chebyshev (L∞) distance: `max_i |x_i - y_i|`.
#[inline]
#[must_use]
pub fn chebyshev(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len(), "chebyshev: dimension mismatch");
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max)
}

/// Cosine distance: `1 - x·y / (‖x‖ ‖y‖)`.
///
/// # Zero Vector Handling
///
/// Returns `1.0` if either vector is exactly zero: a zero vector is treated
/// as orthogonal to everything, including itself. Any non-zero vector has a
/// direction, however small its magnitude. When the norms underflow or
/// overflow the inputs are rescaled by their largest coordinate first.
///
/// The similarity is clamped to `[-1, 1]` before subtracting, so rounding
/// cannot push the distance below zero.
///
/// ```rust
/// use hausdorff::distance::cosine_distance;
///
/// assert!(cosine_distance(&[1.0, 0.0], &[2.0, 0.0]).abs() < 1e-12);
/// assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-12);
/// assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 1.0]), 1.0);
///
/// // Tiny but non-zero vectors keep their direction
/// assert!(cosine_distance(&[1e-200, 0.0], &[3e-200, 0.0]).abs() < 1e-12);
/// ```
#[inline]
#[must_use]
pub fn cosine_distance(x: &[f64], y: &[f64]) -> f64 {
    let denom = norm(x) * norm(y);
    if denom > 0.0 && denom.is_finite() {
        return 1.0 - (dot(x, y) / denom).clamp(-1.0, 1.0);
    }
    cosine_distance_rescaled(x, y)
}

/// Slow path for norms that underflow to zero or overflow to infinity.
///
/// Dividing by the largest magnitude puts every coordinate in `[-1, 1]`
/// with at least one at `±1`, so the rescaled norms are at least 1.
#[cold]
fn cosine_distance_rescaled(x: &[f64], y: &[f64]) -> f64 {
    let max_abs = |v: &[f64]| v.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
    let (sx, sy) = (max_abs(x), max_abs(y));
    if sx == 0.0 || sy == 0.0 {
        return 1.0;
    }

    let (mut xy, mut xx, mut yy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let (a, b) = (a / sx, b / sy);
        xy += a * b;
        xx += a * a;
        yy += b * b;
    }
    1.0 - (xy / (xx.sqrt() * yy.sqrt())).clamp(-1.0, 1.0)
}

/// Haversine great-circle distance in kilometers.
///
/// Coordinates 0 and 1 are latitude and longitude in decimal degrees; any
/// further coordinates are ignored. Callers going through the engine get the
/// two-column minimum checked up front. Called directly with fewer than two
/// coordinates this panics on the slice index.
///
/// ```rust
/// use hausdorff::distance::haversine;
///
/// // One degree of latitude is ~111.19 km
/// let d = haversine(&[0.0, 0.0], &[1.0, 0.0]);
/// assert!((d - 111.195).abs() < 0.01);
/// ```
#[inline]
#[must_use]
pub fn haversine(x: &[f64], y: &[f64]) -> f64 {
    let lat1 = x[0].to_radians();
    let lat2 = y[0].to_radians();
    let half_dlat = (lat2 - lat1) * 0.5;
    let half_dlng = (y[1] - x[1]).to_radians() * 0.5;

    let h = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlng.sin().powi(2);
    // Rounding can leave h a hair above 1 for antipodal points
    2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}
