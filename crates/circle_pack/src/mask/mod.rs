//! Occupancy masks and the feasibility field derived from them.
//!
//! An [`OccupancyMask`] marks every raster cell as allowed or forbidden for circle
//! placement. Cell `(x, y)` covers the unit square `[x, x + 1) × [y, y + 1)` in pixel
//! space, with `y` growing downwards like image rows. A [`FeasibilityField`] holds, per
//! cell, the distance to the nearest forbidden cell (the grid border counts as
//! forbidden) and answers "does a circle of radius r fit here?" in constant time.
use glam::Vec2;

use crate::error::{Error, Result};

pub mod edt;
pub mod field;
pub mod threshold;

pub use field::FeasibilityField;
pub use threshold::otsu_threshold;

/// Threshold used when a grayscale image has a single intensity level and Otsu's
/// method has nothing to separate. Pixels strictly above it are foreground.
pub const FALLBACK_THRESHOLD: u8 = 127;

/// Boolean grid of allowed placement cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl OccupancyMask {
    /// Build a mask by evaluating `allowed(x, y)` for every cell.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut allowed: impl FnMut(usize, usize) -> bool,
    ) -> Result<Self> {
        check_dimensions(width, height)?;
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(allowed(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a mask where every cell has the same state.
    pub fn filled(width: usize, height: usize, allowed: bool) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![allowed; width * height],
        })
    }

    /// Build a mask from a strictly binary 8-bit raster (row-major, values 0 or 255).
    ///
    /// White cells are allowed unless `invert` is set. Any other pixel value is
    /// rejected with [`Error::InvalidMask`].
    pub fn from_binary(width: usize, height: usize, pixels: &[u8], invert: bool) -> Result<Self> {
        check_buffer(width, height, pixels)?;
        if let Some((i, v)) = pixels
            .iter()
            .enumerate()
            .find(|(_, v)| **v != 0 && **v != 255)
        {
            return Err(Error::InvalidMask(format!(
                "non-binary value {v} at pixel ({}, {})",
                i % width,
                i / width
            )));
        }
        Ok(Self {
            width,
            height,
            cells: pixels.iter().map(|&v| (v == 255) != invert).collect(),
        })
    }

    /// Build a mask from an 8-bit grayscale raster, binarised with Otsu's threshold.
    ///
    /// Pixels brighter than the threshold are allowed unless `invert` is set. A raster
    /// with a single intensity level falls back to [`FALLBACK_THRESHOLD`].
    pub fn from_luma(width: usize, height: usize, pixels: &[u8], invert: bool) -> Result<Self> {
        check_buffer(width, height, pixels)?;
        let threshold = otsu_threshold(pixels).unwrap_or(FALLBACK_THRESHOLD);
        Ok(Self {
            width,
            height,
            cells: pixels.iter().map(|&v| (v > threshold) != invert).collect(),
        })
    }

    /// Returns a copy with allowed and forbidden cells swapped.
    pub fn inverted(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(|c| !c).collect(),
        }
    }

    /// Grid size as `(width, height)` in cells.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Grid size as a pixel-space extent.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Whether cell `(x, y)` is allowed. Out-of-bounds cells are forbidden.
    #[inline]
    pub fn allowed(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return false;
        }
        self.cells[(y as usize) * self.width + x as usize]
    }

    /// Whether the cell containing pixel-space point `p` is allowed.
    pub fn allowed_at(&self, p: Vec2) -> bool {
        if !p.is_finite() {
            return false;
        }
        self.allowed(p.x.floor() as isize, p.y.floor() as isize)
    }

    /// Number of allowed cells.
    pub fn allowed_count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Iterates over allowed cells as `(x, y)` in row-major order.
    pub fn allowed_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(move |(i, _)| (i % w, i / w))
    }

    /// Row-major cell states.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Marks every cell whose center lies inside the disc as forbidden and returns how
    /// many cells changed. Cells only ever go from allowed to forbidden.
    pub(crate) fn forbid_disc(&mut self, center: Vec2, radius: f32) -> usize {
        if !center.is_finite() || !radius.is_finite() || radius < 0.0 {
            return 0;
        }
        let w = self.width as isize;
        let h = self.height as isize;
        let start_x = ((center.x - radius).floor() as isize).max(0);
        let end_x = ((center.x + radius).ceil() as isize).min(w - 1);
        let start_y = ((center.y - radius).floor() as isize).max(0);
        let end_y = ((center.y + radius).ceil() as isize).min(h - 1);
        let r2 = radius * radius;

        let mut changed = 0;
        for y in start_y..=end_y {
            let row = (y as usize) * self.width;
            for x in start_x..=end_x {
                let cell_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let idx = row + x as usize;
                if self.cells[idx] && (cell_center - center).length_squared() <= r2 {
                    self.cells[idx] = false;
                    changed += 1;
                }
            }
        }
        changed
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidMask(format!(
            "mask must have non-zero size, got {width}x{height}"
        )));
    }
    Ok(())
}

fn check_buffer(width: usize, height: usize, pixels: &[u8]) -> Result<()> {
    check_dimensions(width, height)?;
    let expected = width
        .checked_mul(height)
        .ok_or_else(|| Error::InvalidMask(format!("mask size {width}x{height} overflows")))?;
    if pixels.len() != expected {
        return Err(Error::InvalidMask(format!(
            "expected {expected} pixels for {width}x{height}, got {}",
            pixels.len()
        )));
    }
    Ok(())
}
