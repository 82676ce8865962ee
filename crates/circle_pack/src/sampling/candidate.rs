//! Candidate `(radius, center)` draws for a single placement attempt.
use glam::Vec2;
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mask::OccupancyMask;
use crate::sampling::{next_down, rand01, rand_index, RadiusSchedule};

/// Where candidate centers are drawn from.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CenterSampling {
    /// Uniform over the whole raster `[0, W) × [0, H)`, allowed or not.
    #[default]
    Domain,
    /// Uniform over the centers of currently allowed cells.
    AllowedCells,
}

/// A proposed circle, not yet validated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Center in pixel space.
    pub center: Vec2,
    /// Radius in pixels.
    pub radius: f32,
}

/// Draws candidates for the placement loop.
#[derive(Clone, Debug)]
pub struct CandidateSampler {
    r_min: f32,
    r_max: f32,
    extent: Vec2,
    schedule: Option<RadiusSchedule>,
    center_sampling: CenterSampling,
    allowed_centers: Vec<Vec2>,
}

impl CandidateSampler {
    /// Creates a sampler with uniform radii in `[r_min, r_max]` and uniform centers
    /// over a raster of size `extent`.
    pub fn try_new(
        r_min: f32,
        r_max: f32,
        extent: impl Into<mint::Vector2<f32>>,
    ) -> Result<Self> {
        let extent = Vec2::from(extent.into());
        if !r_min.is_finite() || !r_max.is_finite() {
            return Err(Error::InvalidConfig("radii must be finite".into()));
        }
        if r_min <= 0.0 {
            return Err(Error::InvalidConfig(format!("r_min must be > 0, got {r_min}")));
        }
        if r_min > r_max {
            return Err(Error::InvalidConfig(format!(
                "r_min ({r_min}) must not exceed r_max ({r_max})"
            )));
        }
        if !(extent.x > 0.0 && extent.y > 0.0) {
            return Err(Error::InvalidConfig(
                "sampling extent must be > 0 in both components".into(),
            ));
        }
        Ok(Self {
            r_min,
            r_max,
            extent,
            schedule: None,
            center_sampling: CenterSampling::Domain,
            allowed_centers: Vec::new(),
        })
    }

    /// Uses a fixed radius per target index instead of per-attempt draws.
    pub fn with_radius_schedule(mut self, schedule: RadiusSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Sets the center sampling mode, taking allowed cells from `mask` if needed.
    pub fn with_center_sampling(mut self, mode: CenterSampling, mask: &OccupancyMask) -> Self {
        self.center_sampling = mode;
        self.refresh_allowed_centers(mask);
        self
    }

    /// Re-reads the allowed cells after the mask shrank.
    pub fn refresh_allowed_centers(&mut self, mask: &OccupancyMask) {
        self.allowed_centers.clear();
        if self.center_sampling == CenterSampling::AllowedCells {
            self.allowed_centers.extend(
                mask.allowed_cells()
                    .map(|(x, y)| Vec2::new(x as f32 + 0.5, y as f32 + 0.5)),
            );
        }
    }

    pub fn radius_range(&self) -> (f32, f32) {
        (self.r_min, self.r_max)
    }

    pub fn center_sampling(&self) -> CenterSampling {
        self.center_sampling
    }

    /// Draws the candidate for one attempt at target `index`.
    ///
    /// Draw order is radius first, then center, so the RNG stream is identical for
    /// identical call sequences.
    pub fn sample(&self, index: usize, rng: &mut dyn Rng) -> Candidate {
        let radius = match self.schedule.as_ref().and_then(|s| s.get(index)) {
            Some(r) => r,
            None => (self.r_min + rand01(rng) * (self.r_max - self.r_min)).min(self.r_max),
        };

        let center = if self.allowed_centers.is_empty() {
            let x = (rand01(rng) * self.extent.x).min(next_down(self.extent.x));
            let y = (rand01(rng) * self.extent.y).min(next_down(self.extent.y));
            Vec2::new(x, y)
        } else {
            self.allowed_centers[rand_index(rng, self.allowed_centers.len())]
        };

        Candidate { center, radius }
    }
}
