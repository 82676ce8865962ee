//! Candidate sampling for the placement loop.
//!
//! This module draws the `(radius, center)` pairs that the packing engine tests
//! against the mask and the already placed circles. All randomness comes from a
//! caller-owned [`Rng`], so a fixed seed and call sequence reproduces every draw.
use rand::Rng;

pub mod candidate;
pub mod radius;

pub use candidate::{Candidate, CandidateSampler, CenterSampling};
pub use radius::{small_biased_schedule, RadiusDistribution, RadiusSchedule};

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn Rng) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Uniform index in `0..len` via a 32-bit multiply-shift. `len` must be non-zero.
#[inline]
pub(crate) fn rand_index(rng: &mut dyn Rng, len: usize) -> usize {
    debug_assert!(len > 0);
    let scaled = (rng.next_u32() as u64 * len as u64) >> 32;
    (scaled as usize).min(len - 1)
}

/// Largest float strictly below a positive, finite `val`.
///
/// Used to keep uniform draws strictly inside the right/bottom grid edges, where the
/// `u32` to `f32` conversion in [`rand01`] can round up to exactly 1.0.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if !val.is_finite() || val <= 0.0 {
        return val;
    }
    f32::from_bits(val.to_bits() - 1)
}
