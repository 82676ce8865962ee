use std::time::Duration;

use circle_pack::prelude::OccupancyMask;
use criterion::{Criterion, Throughput};
use glam::Vec2;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(3);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Square mask with a dark blob in the middle and a dark frame, roughly what a
/// thresholded photo of a logo looks like.
pub fn blob_mask(size: usize) -> OccupancyMask {
    let center = Vec2::splat(size as f32 / 2.0);
    let blob = size as f32 * 0.2;
    let frame = (size / 16).max(1);
    OccupancyMask::from_fn(size, size, |x, y| {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        let in_frame = x < frame || y < frame || x >= size - frame || y >= size - frame;
        !in_frame && p.distance(center) > blob
    })
    .expect("non-empty mask")
}
