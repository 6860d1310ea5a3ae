//! aarch64 SIMD implementations using NEON.
//!
//! NEON is always available on aarch64, so no runtime detection needed.
//! However, we still use target_feature for consistency with x86_64.
//!
//! A NEON register holds two `f64` lanes; kernels are 4-way unrolled
//! (8 doubles per iteration).

/// NEON dot product with 4-way unrolling.
///
/// # Safety
///
/// NEON is always available on aarch64, but we use `target_feature`
/// annotation for consistency.
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub unsafe fn dot_neon(a: &[f64], b: &[f64]) -> f64 {
    use std::arch::aarch64::{float64x2_t, vaddq_f64, vaddvq_f64, vdupq_n_f64, vfmaq_f64, vld1q_f64};

    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    let chunks_8 = n / 8;
    let mut sum0: float64x2_t = vdupq_n_f64(0.0);
    let mut sum1: float64x2_t = vdupq_n_f64(0.0);
    let mut sum2: float64x2_t = vdupq_n_f64(0.0);
    let mut sum3: float64x2_t = vdupq_n_f64(0.0);

    for i in 0..chunks_8 {
        let base = i * 8;
        sum0 = vfmaq_f64(sum0, vld1q_f64(a_ptr.add(base)), vld1q_f64(b_ptr.add(base)));
        sum1 = vfmaq_f64(sum1, vld1q_f64(a_ptr.add(base + 2)), vld1q_f64(b_ptr.add(base + 2)));
        sum2 = vfmaq_f64(sum2, vld1q_f64(a_ptr.add(base + 4)), vld1q_f64(b_ptr.add(base + 4)));
        sum3 = vfmaq_f64(sum3, vld1q_f64(a_ptr.add(base + 6)), vld1q_f64(b_ptr.add(base + 6)));
    }

    let sum_all = vaddq_f64(vaddq_f64(sum0, sum1), vaddq_f64(sum2, sum3));
    let mut result = vaddvq_f64(sum_all);

    // Scalar tail
    for i in chunks_8 * 8..n {
        result += *a.get_unchecked(i) * *b.get_unchecked(i);
    }

    result
}

/// NEON squared L2 distance with 4-way unrolling.
///
/// # Safety
///
/// See [`dot_neon`].
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub unsafe fn l2_squared_neon(a: &[f64], b: &[f64]) -> f64 {
    use std::arch::aarch64::{
        float64x2_t, vaddq_f64, vaddvq_f64, vdupq_n_f64, vfmaq_f64, vld1q_f64, vsubq_f64,
    };

    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    let chunks_8 = n / 8;
    let mut sum0: float64x2_t = vdupq_n_f64(0.0);
    let mut sum1: float64x2_t = vdupq_n_f64(0.0);
    let mut sum2: float64x2_t = vdupq_n_f64(0.0);
    let mut sum3: float64x2_t = vdupq_n_f64(0.0);

    for i in 0..chunks_8 {
        let base = i * 8;
        let d0 = vsubq_f64(vld1q_f64(a_ptr.add(base)), vld1q_f64(b_ptr.add(base)));
        let d1 = vsubq_f64(vld1q_f64(a_ptr.add(base + 2)), vld1q_f64(b_ptr.add(base + 2)));
        let d2 = vsubq_f64(vld1q_f64(a_ptr.add(base + 4)), vld1q_f64(b_ptr.add(base + 4)));
        let d3 = vsubq_f64(vld1q_f64(a_ptr.add(base + 6)), vld1q_f64(b_ptr.add(base + 6)));
        sum0 = vfmaq_f64(sum0, d0, d0);
        sum1 = vfmaq_f64(sum1, d1, d1);
        sum2 = vfmaq_f64(sum2, d2, d2);
        sum3 = vfmaq_f64(sum3, d3, d3);
    }

    let sum_all = vaddq_f64(vaddq_f64(sum0, sum1), vaddq_f64(sum2, sum3));
    let mut result = vaddvq_f64(sum_all);

    for i in chunks_8 * 8..n {
        let d = *a.get_unchecked(i) - *b.get_unchecked(i);
        result += d * d;
    }

    result
}

/// NEON L1 distance.
///
/// # Safety
///
/// See [`dot_neon`].
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub unsafe fn l1_neon(a: &[f64], b: &[f64]) -> f64 {
    use std::arch::aarch64::{
        float64x2_t, vabdq_f64, vaddq_f64, vaddvq_f64, vdupq_n_f64, vld1q_f64,
    };

    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    let chunks_4 = n / 4;
    let mut sum0: float64x2_t = vdupq_n_f64(0.0);
    let mut sum1: float64x2_t = vdupq_n_f64(0.0);

    for i in 0..chunks_4 {
        let base = i * 4;
        sum0 = vaddq_f64(sum0, vabdq_f64(vld1q_f64(a_ptr.add(base)), vld1q_f64(b_ptr.add(base))));
        sum1 = vaddq_f64(
            sum1,
            vabdq_f64(vld1q_f64(a_ptr.add(base + 2)), vld1q_f64(b_ptr.add(base + 2))),
        );
    }

    let mut result = vaddvq_f64(vaddq_f64(sum0, sum1));

    for i in chunks_4 * 4..n {
        result += (*a.get_unchecked(i) - *b.get_unchecked(i)).abs();
    }

    result
}
