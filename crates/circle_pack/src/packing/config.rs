//! Packing run configuration.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::packing::placed::OverlapIndex;
use crate::sampling::{CenterSampling, RadiusDistribution};

/// When accepted circles are burned into the occupancy mask.
///
/// Every refresh costs a full feasibility-field rebuild. Overlap checks against placed
/// circles still run regardless, so refreshing only pays off when mask rejections
/// dominate, and in practice it mostly adds work.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpdateMode {
    /// The mask never changes during a run.
    #[default]
    Off,
    /// Refresh after every accepted circle.
    EveryPlacement,
    /// Refresh before target index `i` is first attempted whenever `i > 0` and `i % k == 0`.
    Every(usize),
}

impl UpdateMode {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, UpdateMode::Off)
    }
}

/// Configuration for a packing run.
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct PackConfig {
    /// Number of circles to place.
    pub n_points: usize,
    /// Smallest radius in pixels.
    pub r_min: f32,
    /// Largest radius in pixels.
    pub r_max: f32,
    /// Attempts per target circle before it is skipped.
    pub max_attempts: usize,
    /// Extra gap kept between any two circles, in pixels.
    pub offset: f32,
    /// Place circles on the dark side of the mask instead of the bright side.
    pub invert: bool,
    /// Mask refresh cadence.
    pub update: UpdateMode,
    /// RNG seed. A random seed is chosen (and reported) when absent.
    pub seed: Option<u64>,
    /// How radii are drawn.
    pub radius_distribution: RadiusDistribution,
    /// How centers are drawn.
    pub center_sampling: CenterSampling,
    /// Spatial index for overlap checks.
    pub overlap_index: OverlapIndex,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            n_points: 300,
            r_min: 2.0,
            r_max: 15.0,
            max_attempts: 100,
            offset: 0.0,
            invert: false,
            update: UpdateMode::Off,
            seed: None,
            radius_distribution: RadiusDistribution::Uniform,
            center_sampling: CenterSampling::Domain,
            overlap_index: OverlapIndex::BucketGrid,
        }
    }
}

impl PackConfig {
    /// Creates a new [`PackConfig`] targeting `n_points` circles with radii in `[r_min, r_max]`.
    pub fn new(n_points: usize, r_min: f32, r_max: f32) -> Self {
        Self {
            n_points,
            r_min,
            r_max,
            ..Default::default()
        }
    }

    /// Sets the per-circle attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the extra gap between circles.
    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    /// Sets whether the mask is inverted before packing.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Sets the mask refresh cadence.
    pub fn with_update(mut self, update: UpdateMode) -> Self {
        self.update = update;
        self
    }

    /// Sets a fixed RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the radius distribution.
    pub fn with_radius_distribution(mut self, distribution: RadiusDistribution) -> Self {
        self.radius_distribution = distribution;
        self
    }

    /// Sets the center sampling mode.
    pub fn with_center_sampling(mut self, center_sampling: CenterSampling) -> Self {
        self.center_sampling = center_sampling;
        self
    }

    /// Sets the overlap index.
    pub fn with_overlap_index(mut self, overlap_index: OverlapIndex) -> Self {
        self.overlap_index = overlap_index;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.n_points == 0 {
            return Err(Error::InvalidConfig("n_points must be > 0".into()));
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max_attempts must be > 0".into()));
        }
        if !self.r_min.is_finite() || !self.r_max.is_finite() {
            return Err(Error::InvalidConfig("r_min and r_max must be finite".into()));
        }
        if self.r_min <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "r_min must be > 0, got {}",
                self.r_min
            )));
        }
        if self.r_min > self.r_max {
            return Err(Error::InvalidConfig(format!(
                "r_min ({}) must not exceed r_max ({})",
                self.r_min, self.r_max
            )));
        }
        if !self.offset.is_finite() || self.offset < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "offset must be finite and >= 0, got {}",
                self.offset
            )));
        }
        if self.update == UpdateMode::Every(0) {
            return Err(Error::InvalidConfig(
                "update cadence must be at least one circle".into(),
            ));
        }
        Ok(())
    }
}
