//! Radius distributions.
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sampling::rand01;

/// How candidate radii are chosen.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RadiusDistribution {
    /// A fresh radius uniform in `[r_min, r_max]` on every attempt.
    #[default]
    Uniform,
    /// One radius per target index, drawn up front from a pool weighted towards
    /// small radii and placed largest first. Every attempt for an index reuses it.
    SmallBiased,
}

/// Number of distinct pool radii per unit of radius range.
const POOL_DENSITY: f32 = 10.0;
/// Upper bound on the pool size, reached once the radius range exceeds ~400 px.
const MAX_POOL_LEN: usize = 4096;
/// Slope of the linear weight ramp over the pool.
const WEIGHT_SLOPE: f64 = 20.0;
/// Weight of the largest pool radius.
const WEIGHT_FLOOR: f64 = 5.0;

/// Radii assigned to consecutive target indices, largest first.
///
/// Stored as runs of equal radii, so memory grows with the number of distinct
/// radii rather than with the number of targets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RadiusSchedule {
    /// Distinct radii in descending order.
    radii: Vec<f32>,
    /// Exclusive end index of each run.
    ends: Vec<usize>,
}

impl RadiusSchedule {
    /// Builds a schedule holding `radii` sorted in descending order.
    pub fn from_radii(mut radii: Vec<f32>) -> Self {
        radii.sort_by(|a, b| b.total_cmp(a));
        let mut schedule = Self::default();
        for r in radii {
            schedule.push_run(r, 1);
        }
        schedule
    }

    /// Appends `count` copies of `radius`, which must not exceed the last radius.
    fn push_run(&mut self, radius: f32, count: usize) {
        if count == 0 {
            return;
        }
        let end = self.len().saturating_add(count);
        if self.radii.last() == Some(&radius) {
            if let Some(last_end) = self.ends.last_mut() {
                *last_end = end;
            }
        } else {
            self.radii.push(radius);
            self.ends.push(end);
        }
    }

    /// Number of scheduled target indices.
    pub fn len(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct radii.
    pub fn distinct_len(&self) -> usize {
        self.radii.len()
    }

    /// Radius for target `index`, or `None` past the end of the schedule.
    pub fn get(&self, index: usize) -> Option<f32> {
        let run = self.ends.partition_point(|&end| end <= index);
        self.radii.get(run).copied()
    }

    /// All scheduled radii in index order.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let starts = std::iter::once(0).chain(self.ends.iter().copied());
        self.radii
            .iter()
            .zip(starts.zip(self.ends.iter().copied()))
            .flat_map(|(&r, (start, end))| std::iter::repeat_n(r, end - start))
    }
}

/// Draws `count` radii weighted towards `r_min`, largest first.
///
/// A pool of `max(1, ⌊(r_max − r_min) · 10⌋)` uniform radii (at most
/// `MAX_POOL_LEN`) is sorted ascending and weighted by a ramp that falls linearly
/// from the smallest to the largest entry.
pub fn small_biased_schedule(
    r_min: f32,
    r_max: f32,
    count: usize,
    rng: &mut dyn Rng,
) -> RadiusSchedule {
    let span = r_max - r_min;
    let pool_len = ((span * POOL_DENSITY).floor().min(MAX_POOL_LEN as f32) as usize).max(1);

    let mut pool: Vec<f32> = (0..pool_len)
        .map(|_| (r_min + rand01(rng) * span).min(r_max))
        .collect();
    pool.sort_by(f32::total_cmp);

    let step = if pool_len > 1 {
        span as f64 / (pool_len - 1) as f64
    } else {
        0.0
    };
    let mut cumulative = Vec::with_capacity(pool_len);
    let mut total = 0.0f64;
    for i in 0..pool_len {
        let x = r_min as f64 + step * i as f64;
        total += WEIGHT_SLOPE * (r_max as f64 - x) + WEIGHT_FLOOR;
        cumulative.push(total);
    }

    let mut counts = vec![0usize; pool_len];
    for _ in 0..count {
        let roll = rand01(rng) as f64 * total;
        let picked = cumulative.partition_point(|&c| c < roll).min(pool_len - 1);
        counts[picked] += 1;
    }

    let mut schedule = RadiusSchedule::default();
    for (&r, &n) in pool.iter().zip(&counts).rev() {
        schedule.push_run(r, n);
    }
    schedule
}
