//! Feasibility field: per-cell clearance from the forbidden region.
use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec2;

use super::edt::squared_distance_to_forbidden;
use super::OccupancyMask;

/// Distance from each cell center to the nearest forbidden cell center.
///
/// The grid is surrounded by a ring of forbidden cells, so circles are also kept
/// inside the raster bounds. Queries at real-valued points are conservative: a
/// positive answer guarantees the disc touches no forbidden cell square and stays
/// inside `[0, W] × [0, H]`.
#[derive(Clone, Debug)]
pub struct FeasibilityField {
    width: usize,
    height: usize,
    distance: Vec<f32>,
    max_distance: f32,
}

impl FeasibilityField {
    /// Computes the field for `mask`.
    pub fn build(mask: &OccupancyMask) -> Self {
        let (w, h) = mask.size();
        let (pw, ph) = (w + 2, h + 2);

        let mut forbidden = vec![true; pw * ph];
        for (i, &allowed) in mask.cells().iter().enumerate() {
            let (x, y) = (i % w, i / w);
            forbidden[(y + 1) * pw + x + 1] = !allowed;
        }

        let squared = squared_distance_to_forbidden(&forbidden, pw, ph);

        let mut distance = Vec::with_capacity(w * h);
        for y in 0..h {
            let row = (y + 1) * pw + 1;
            distance.extend(squared[row..row + w].iter().map(|d| d.sqrt()));
        }
        let max_distance = distance.iter().copied().fold(0.0f32, f32::max);

        Self {
            width: w,
            height: h,
            distance,
            max_distance,
        }
    }

    /// Recomputes the field in place after `mask` changed. Costs a full transform.
    pub fn rebuild(&mut self, mask: &OccupancyMask) {
        *self = Self::build(mask);
    }

    /// Grid size as `(width, height)` in cells.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of cells covered by one rebuild.
    pub fn cell_count(&self) -> usize {
        self.distance.len()
    }

    /// Distance at cell `(x, y)`; `0.0` outside the grid.
    pub fn distance_at(&self, x: isize, y: isize) -> f32 {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return 0.0;
        }
        self.distance[(y as usize) * self.width + x as usize]
    }

    /// Largest value anywhere in the field.
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Largest radius a circle centered at pixel-space point `p` may have.
    ///
    /// Subtracts the offset of `p` from its cell center and half a cell diagonal
    /// from the cell-center distance, which bounds the distance from `p` to any
    /// point of any forbidden cell square from below.
    pub fn max_radius_at(&self, p: Vec2) -> f32 {
        if !p.is_finite() {
            return 0.0;
        }
        let (ix, iy) = (p.x.floor() as isize, p.y.floor() as isize);
        let d = self.distance_at(ix, iy);
        if d <= 0.0 {
            return 0.0;
        }
        let cell_center = Vec2::new(ix as f32 + 0.5, iy as f32 + 0.5);
        (d - (p - cell_center).length() - FRAC_1_SQRT_2).max(0.0)
    }

    /// Whether a circle of `radius` centered at `p` lies inside the allowed region.
    #[inline]
    pub fn fits(&self, p: Vec2, radius: f32) -> bool {
        self.max_radius_at(p) >= radius
    }
}
