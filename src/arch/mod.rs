//! Architecture-specific `f64` SIMD kernels.
//!
//! Everything here is `unsafe` and assumes the caller has checked CPU
//! support. [`crate::dense`] owns dispatch and the portable fallbacks.

#[cfg(target_arch = "x86_64")]
pub mod x86_64;

#[cfg(target_arch = "aarch64")]
pub mod aarch64;
