//! Property-based tests for the Hausdorff engine.
//!
//! Every property is checked across all built-in metrics. The pruned scan is
//! compared against a plain max-min brute force that never breaks early.

use hausdorff::{hausdorff_distance, Distance, Hausdorff, HausdorffOptions, Metric, PointSet};
use proptest::prelude::*;

/// Reference: max over both directions of the exact nearest-neighbor distance.
///
/// Always calls `metric(a_point, b_point)`, matching the engine's argument order.
fn brute_force<M: Metric>(a: &PointSet, b: &PointSet, metric: &M) -> f64 {
    let mut result = 0.0_f64;

    for p in a.rows() {
        let nearest = b
            .rows()
            .map(|q| metric.distance(p, q))
            .fold(f64::INFINITY, f64::min);
        if nearest.is_finite() {
            result = result.max(nearest);
        }
    }

    for q in b.rows() {
        let nearest = a
            .rows()
            .map(|p| metric.distance(p, q))
            .fold(f64::INFINITY, f64::min);
        if nearest.is_finite() {
            result = result.max(nearest);
        }
    }

    result
}

fn to_set(rows: Vec<Vec<f64>>, n_dims: usize) -> PointSet {
    PointSet::from_flat(rows.into_iter().flatten().collect(), n_dims).unwrap()
}

/// Two point sets of equal dimensionality (possibly empty).
fn arb_set_pair(
    dims: std::ops::Range<usize>,
    max_points: usize,
) -> impl Strategy<Value = (PointSet, PointSet)> {
    dims.prop_flat_map(move |d| {
        (
            proptest::collection::vec(proptest::collection::vec(-100.0f64..100.0, d), 0..max_points),
            proptest::collection::vec(proptest::collection::vec(-100.0f64..100.0, d), 0..max_points),
        )
            .prop_map(move |(a, b)| (to_set(a, d), to_set(b, d)))
    })
}

/// Geographic point sets: `[lat, lng]` in degrees.
fn arb_geo_pair(max_points: usize) -> impl Strategy<Value = (PointSet, PointSet)> {
    let point = (-90.0f64..90.0, -180.0f64..180.0).prop_map(|(lat, lng)| vec![lat, lng]);
    (
        proptest::collection::vec(point.clone(), 1..max_points),
        proptest::collection::vec(point, 1..max_points),
    )
        .prop_map(|(a, b)| (to_set(a, 2), to_set(b, 2)))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

const NON_GEO: [Distance; 4] = [
    Distance::Manhattan,
    Distance::Euclidean,
    Distance::Chebyshev,
    Distance::Cosine,
];

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    // ─────────────────────────────────────────────────────────────────────────
    // Pruning equivalence
    // ─────────────────────────────────────────────────────────────────────────

    /// Early break returns exactly the brute-force value.
    #[test]
    fn pruned_scan_matches_brute_force((a, b) in arb_set_pair(1..6, 40)) {
        for metric in NON_GEO {
            let fast = hausdorff_distance(&a, &b, &metric).unwrap();
            let slow = brute_force(&a, &b, &metric);
            prop_assert_eq!(fast, slow, "metric {}", metric);
        }
    }

    /// Same for haversine on valid coordinates.
    #[test]
    fn pruned_scan_matches_brute_force_haversine((a, b) in arb_geo_pair(40)) {
        let fast = hausdorff_distance(&a, &b, &Distance::Haversine).unwrap();
        let slow = brute_force(&a, &b, &Distance::Haversine);
        prop_assert_eq!(fast, slow);
    }

    /// Disabling early break changes the work done, never the answer.
    #[test]
    fn early_break_toggle_agrees((a, b) in arb_set_pair(1..5, 30)) {
        let exhaustive = Hausdorff::with_options(HausdorffOptions {
            early_break: false,
            ..HausdorffOptions::default()
        });
        for metric in NON_GEO {
            let fast = Hausdorff::new().distance_with_report(&a, &b, &metric).unwrap();
            let slow = exhaustive.distance_with_report(&a, &b, &metric).unwrap();
            prop_assert_eq!(fast.distance, slow.distance, "metric {}", metric);
            prop_assert!(fast.evaluations <= slow.evaluations);
            prop_assert_eq!(slow.evaluations, 2 * (a.len() * b.len()) as u64);
        }
    }

    /// Name lookup and enum dispatch run the same arithmetic.
    #[test]
    fn by_name_matches_enum((a, b) in arb_set_pair(2..5, 25)) {
        for metric in Distance::ALL {
            let by_enum = hausdorff_distance(&a, &b, &metric).unwrap();
            let by_name = Hausdorff::new().distance_by_name(&a, &b, metric.as_str()).unwrap();
            prop_assert_eq!(by_enum, by_name, "metric {}", metric);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Metric-space properties
    // ─────────────────────────────────────────────────────────────────────────

    /// H(A, B) == H(B, A).
    #[test]
    fn symmetric((a, b) in arb_set_pair(1..6, 30)) {
        for metric in NON_GEO {
            let ab = hausdorff_distance(&a, &b, &metric).unwrap();
            let ba = hausdorff_distance(&b, &a, &metric).unwrap();
            prop_assert!(close(ab, ba), "metric {}: {} != {}", metric, ab, ba);
        }
    }

    /// Haversine is symmetric too.
    #[test]
    fn symmetric_haversine((a, b) in arb_geo_pair(30)) {
        let ab = hausdorff_distance(&a, &b, &Distance::Haversine).unwrap();
        let ba = hausdorff_distance(&b, &a, &Distance::Haversine).unwrap();
        prop_assert!(close(ab, ba), "{} != {}", ab, ba);
    }

    /// Results are finite and non-negative, empty sets included.
    #[test]
    fn non_negative_and_finite((a, b) in arb_set_pair(1..6, 30)) {
        for metric in NON_GEO {
            let d = hausdorff_distance(&a, &b, &metric).unwrap();
            prop_assert!(d >= 0.0, "metric {}: negative {}", metric, d);
            prop_assert!(d.is_finite(), "metric {}: non-finite {}", metric, d);
        }
    }

    /// H(A, A) == 0 for metrics that vanish on identical inputs.
    #[test]
    fn identity((a, _b) in arb_set_pair(1..6, 30)) {
        for metric in [Distance::Manhattan, Distance::Euclidean, Distance::Chebyshev] {
            prop_assert_eq!(hausdorff_distance(&a, &a, &metric).unwrap(), 0.0, "metric {}", metric);
        }
    }

    /// Haversine of a set with itself is 0.
    #[test]
    fn identity_haversine((a, _b) in arb_geo_pair(30)) {
        prop_assert_eq!(hausdorff_distance(&a, &a, &Distance::Haversine).unwrap(), 0.0);
    }

    /// Row order affects only how fast pruning kicks in, never the result.
    #[test]
    fn order_independent((a, b) in arb_set_pair(1..5, 30)) {
        let reversed = |s: &PointSet| {
            let rows: Vec<Vec<f64>> = s.rows().rev().map(<[f64]>::to_vec).collect();
            to_set(rows, s.n_dims())
        };
        let (ra, rb) = (reversed(&a), reversed(&b));
        for metric in NON_GEO {
            let d = hausdorff_distance(&a, &b, &metric).unwrap();
            let r = hausdorff_distance(&ra, &rb, &metric).unwrap();
            prop_assert_eq!(d, r, "metric {}", metric);
        }
    }

    /// Caller metrics get the same pruning guarantee as the built-ins.
    #[test]
    fn custom_metric_matches_brute_force((a, b) in arb_set_pair(1..4, 25)) {
        // Asymmetric and sign-indefinite
        let skew = |x: &[f64], y: &[f64]| {
            x.iter().zip(y).map(|(p, q)| (p - q).powi(3) / (p * p + q * q + 0.1)).sum::<f64>()
        };
        let fast = hausdorff_distance(&a, &b, &skew).unwrap();
        let slow = brute_force(&a, &b, &skew);
        prop_assert_eq!(fast, slow);
        prop_assert!(fast.is_finite());
    }
}

#[cfg(feature = "parallel")]
proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        ..ProptestConfig::default()
    })]

    /// Parallel chunks reduce to the sequential result.
    #[test]
    fn parallel_matches_sequential((a, b) in arb_set_pair(1..4, 400)) {
        for metric in NON_GEO {
            let seq = hausdorff_distance(&a, &b, &metric).unwrap();
            let par = hausdorff::par_hausdorff_distance(&a, &b, &metric).unwrap();
            prop_assert_eq!(seq, par, "metric {}", metric);
        }
    }
}
