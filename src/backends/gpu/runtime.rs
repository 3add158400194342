//! Blocking helpers for GPU operations
//!
//! The probe is a single synchronous round trip, so every async wgpu call is
//! driven to completion with `pollster`.

/// Block on async code.
pub fn block_on<F: std::future::Future>(f: F) -> F::Output {
    pollster::block_on(f)
}
