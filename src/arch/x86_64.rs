//! x86_64 SIMD implementations using AVX2 and FMA.
//!
//! These functions are unsafe and require runtime feature detection
//! before calling. The safe public API handles this.
//!
//! # Performance Hierarchy
//!
//! | ISA | Width | Coverage | Speedup vs scalar |
//! |-----|-------|----------|-------------------|
//! | AVX2+FMA | 4 f64 | ~89% | 2-4x |
//! | SSE2 | 2 f64 | ~100% | 1-2x |

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::{
    __m256d, _mm256_add_pd, _mm256_andnot_pd, _mm256_castpd256_pd128, _mm256_extractf128_pd,
    _mm256_fmadd_pd, _mm256_loadu_pd, _mm256_set1_pd, _mm256_setzero_pd, _mm256_sub_pd,
    _mm_add_pd, _mm_add_sd, _mm_cvtsd_f64, _mm_unpackhi_pd,
};

/// Horizontal sum of the four lanes of an AVX register.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn hsum_pd(v: __m256d) -> f64 {
    let lo = _mm256_castpd256_pd128(v);
    let hi = _mm256_extractf128_pd(v, 1);
    let pair = _mm_add_pd(lo, hi);
    let high = _mm_unpackhi_pd(pair, pair);
    _mm_cvtsd_f64(_mm_add_sd(pair, high))
}

/// AVX2+FMA dot product with 4-way unrolling.
///
/// Processes 16 doubles per iteration (4 x 4), hiding memory latency.
///
/// # Safety
///
/// Caller must verify `is_x86_feature_detected!("avx2")` and
/// `is_x86_feature_detected!("fma")` before calling.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
pub unsafe fn dot_avx2(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    let chunks_16 = n / 16;
    let mut sum0: __m256d = _mm256_setzero_pd();
    let mut sum1: __m256d = _mm256_setzero_pd();
    let mut sum2: __m256d = _mm256_setzero_pd();
    let mut sum3: __m256d = _mm256_setzero_pd();

    for i in 0..chunks_16 {
        let base = i * 16;
        sum0 = _mm256_fmadd_pd(
            _mm256_loadu_pd(a_ptr.add(base)),
            _mm256_loadu_pd(b_ptr.add(base)),
            sum0,
        );
        sum1 = _mm256_fmadd_pd(
            _mm256_loadu_pd(a_ptr.add(base + 4)),
            _mm256_loadu_pd(b_ptr.add(base + 4)),
            sum1,
        );
        sum2 = _mm256_fmadd_pd(
            _mm256_loadu_pd(a_ptr.add(base + 8)),
            _mm256_loadu_pd(b_ptr.add(base + 8)),
            sum2,
        );
        sum3 = _mm256_fmadd_pd(
            _mm256_loadu_pd(a_ptr.add(base + 12)),
            _mm256_loadu_pd(b_ptr.add(base + 12)),
            sum3,
        );
    }

    let sum_all = _mm256_add_pd(_mm256_add_pd(sum0, sum1), _mm256_add_pd(sum2, sum3));

    // Remaining 4-double chunks
    let remaining_start = chunks_16 * 16;
    let chunks_4 = (n - remaining_start) / 4;
    let mut sum = sum_all;
    for i in 0..chunks_4 {
        let offset = remaining_start + i * 4;
        sum = _mm256_fmadd_pd(
            _mm256_loadu_pd(a_ptr.add(offset)),
            _mm256_loadu_pd(b_ptr.add(offset)),
            sum,
        );
    }
    let mut result = hsum_pd(sum);

    // Scalar tail
    let tail_start = remaining_start + chunks_4 * 4;
    for i in tail_start..n {
        result += *a.get_unchecked(i) * *b.get_unchecked(i);
    }

    result
}

/// AVX2+FMA squared L2 distance with 4-way unrolling.
///
/// # Safety
///
/// Caller must verify `is_x86_feature_detected!("avx2")` and
/// `is_x86_feature_detected!("fma")` before calling.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
pub unsafe fn l2_squared_avx2(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    let chunks_16 = n / 16;
    let mut sum0: __m256d = _mm256_setzero_pd();
    let mut sum1: __m256d = _mm256_setzero_pd();
    let mut sum2: __m256d = _mm256_setzero_pd();
    let mut sum3: __m256d = _mm256_setzero_pd();

    for i in 0..chunks_16 {
        let base = i * 16;
        let d0 = _mm256_sub_pd(_mm256_loadu_pd(a_ptr.add(base)), _mm256_loadu_pd(b_ptr.add(base)));
        let d1 = _mm256_sub_pd(
            _mm256_loadu_pd(a_ptr.add(base + 4)),
            _mm256_loadu_pd(b_ptr.add(base + 4)),
        );
        let d2 = _mm256_sub_pd(
            _mm256_loadu_pd(a_ptr.add(base + 8)),
            _mm256_loadu_pd(b_ptr.add(base + 8)),
        );
        let d3 = _mm256_sub_pd(
            _mm256_loadu_pd(a_ptr.add(base + 12)),
            _mm256_loadu_pd(b_ptr.add(base + 12)),
        );
        sum0 = _mm256_fmadd_pd(d0, d0, sum0);
        sum1 = _mm256_fmadd_pd(d1, d1, sum1);
        sum2 = _mm256_fmadd_pd(d2, d2, sum2);
        sum3 = _mm256_fmadd_pd(d3, d3, sum3);
    }

    let mut sum = _mm256_add_pd(_mm256_add_pd(sum0, sum1), _mm256_add_pd(sum2, sum3));

    let remaining_start = chunks_16 * 16;
    let chunks_4 = (n - remaining_start) / 4;
    for i in 0..chunks_4 {
        let offset = remaining_start + i * 4;
        let d = _mm256_sub_pd(
            _mm256_loadu_pd(a_ptr.add(offset)),
            _mm256_loadu_pd(b_ptr.add(offset)),
        );
        sum = _mm256_fmadd_pd(d, d, sum);
    }
    let mut result = hsum_pd(sum);

    let tail_start = remaining_start + chunks_4 * 4;
    for i in tail_start..n {
        let d = *a.get_unchecked(i) - *b.get_unchecked(i);
        result += d * d;
    }

    result
}

/// AVX2 L1 distance.
///
/// Absolute value is taken by clearing the sign bit (`andnot` with `-0.0`).
///
/// # Safety
///
/// Caller must verify `is_x86_feature_detected!("avx2")` before calling.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub unsafe fn l1_avx2(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();
    let sign_mask = _mm256_set1_pd(-0.0);

    let chunks_8 = n / 8;
    let mut sum0: __m256d = _mm256_setzero_pd();
    let mut sum1: __m256d = _mm256_setzero_pd();

    for i in 0..chunks_8 {
        let base = i * 8;
        let d0 = _mm256_sub_pd(_mm256_loadu_pd(a_ptr.add(base)), _mm256_loadu_pd(b_ptr.add(base)));
        let d1 = _mm256_sub_pd(
            _mm256_loadu_pd(a_ptr.add(base + 4)),
            _mm256_loadu_pd(b_ptr.add(base + 4)),
        );
        sum0 = _mm256_add_pd(sum0, _mm256_andnot_pd(sign_mask, d0));
        sum1 = _mm256_add_pd(sum1, _mm256_andnot_pd(sign_mask, d1));
    }

    let mut result = hsum_pd(_mm256_add_pd(sum0, sum1));

    let tail_start = chunks_8 * 8;
    for i in tail_start..n {
        result += (*a.get_unchecked(i) - *b.get_unchecked(i)).abs();
    }

    result
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(target_arch = "x86_64")]
    fn test_avx2_kernels_match_scalar() {
        use super::*;

        if !(is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma")) {
            return;
        }

        for size in [1, 3, 4, 5, 7, 8, 9, 15, 16, 17, 31, 32, 33, 64, 129] {
            let a: Vec<f64> = (0..size).map(|i| (i as f64) * 0.1 - 1.0).collect();
            let b: Vec<f64> = (0..size).map(|i| (i as f64) * -0.2 + 0.5).collect();

            let dot: f64 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
            let l2: f64 = a.iter().zip(&b).map(|(x, y)| (x - y) * (x - y)).sum();
            let l1: f64 = a.iter().zip(&b).map(|(x, y)| (x - y).abs()).sum();

            let (d, s, m) = unsafe { (dot_avx2(&a, &b), l2_squared_avx2(&a, &b), l1_avx2(&a, &b)) };
            assert!((d - dot).abs() < 1e-9 * (1.0 + dot.abs()), "size={size}: dot {d} vs {dot}");
            assert!((s - l2).abs() < 1e-9 * (1.0 + l2), "size={size}: l2 {s} vs {l2}");
            assert!((m - l1).abs() < 1e-9 * (1.0 + l1), "size={size}: l1 {m} vs {l1}");
        }
    }
}
