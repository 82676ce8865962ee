//! The append-only set of accepted circles and its overlap query.
use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::packing::circle::Circle;

/// Spatial index used to answer overlap queries.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlapIndex {
    /// Compare against every placed circle.
    LinearScan,
    /// Bucket circles by center on a uniform grid and compare only nearby buckets.
    #[default]
    BucketGrid,
}

/// Accepted circles in acceptance order.
///
/// Both index kinds evaluate the same [`Circle::clears`] predicate, so they accept
/// and reject exactly the same candidates.
#[derive(Clone, Debug)]
pub struct PlacedCircleSet {
    circles: Vec<Circle>,
    offset: f32,
    buckets: Option<BucketGrid>,
}

impl PlacedCircleSet {
    /// Creates an empty set for circles in a raster of size `extent`.
    ///
    /// `typical_max_radius` sizes the bucket grid; larger circles are still handled
    /// correctly, just with wider neighborhood scans.
    pub fn new(index: OverlapIndex, extent: Vec2, typical_max_radius: f32, offset: f32) -> Self {
        let buckets = match index {
            OverlapIndex::LinearScan => None,
            OverlapIndex::BucketGrid => Some(BucketGrid::new(
                extent,
                2.0 * typical_max_radius + offset,
            )),
        };
        Self {
            circles: Vec::new(),
            offset,
            buckets,
        }
    }

    /// Which overlap index this set uses.
    pub fn index_kind(&self) -> OverlapIndex {
        if self.buckets.is_some() {
            OverlapIndex::BucketGrid
        } else {
            OverlapIndex::LinearScan
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    pub fn as_slice(&self) -> &[Circle] {
        &self.circles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Circle> {
        self.circles.iter()
    }

    pub fn into_vec(self) -> Vec<Circle> {
        self.circles
    }

    /// Whether a circle of `radius` at `center` keeps the configured gap to every placed circle.
    pub fn is_clear(&self, center: Vec2, radius: f32) -> bool {
        match &self.buckets {
            None => self
                .circles
                .iter()
                .all(|c| c.clears(center, radius, self.offset)),
            Some(grid) => grid
                .neighbors(center, radius + self.offset)
                .all(|i| self.circles[i].clears(center, radius, self.offset)),
        }
    }

    /// Appends a circle, assigning the next acceptance index. Returns the stored circle.
    pub fn push(&mut self, center: Vec2, radius: f32) -> Circle {
        let circle = Circle::new(self.circles.len(), center, radius);
        if let Some(grid) = &mut self.buckets {
            grid.insert(circle.index, center, radius);
        }
        self.circles.push(circle);
        circle
    }
}

/// Uniform grid of circle-index buckets keyed by center cell.
#[derive(Clone, Debug)]
struct BucketGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    buckets: Vec<Vec<usize>>,
    max_radius: f32,
}

impl BucketGrid {
    fn new(extent: Vec2, cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() {
            cell_size.max(1.0)
        } else {
            1.0
        };
        let cols = (extent.x / cell_size).ceil().max(1.0) as usize;
        let rows = (extent.y / cell_size).ceil().max(1.0) as usize;
        Self {
            cell_size,
            cols,
            rows,
            buckets: vec![Vec::new(); cols * rows],
            max_radius: 0.0,
        }
    }

    #[inline]
    fn cell_of(&self, p: Vec2) -> (usize, usize) {
        let x = ((p.x / self.cell_size).floor() as isize).clamp(0, self.cols as isize - 1);
        let y = ((p.y / self.cell_size).floor() as isize).clamp(0, self.rows as isize - 1);
        (x as usize, y as usize)
    }

    fn insert(&mut self, id: usize, center: Vec2, radius: f32) {
        let (x, y) = self.cell_of(center);
        self.buckets[y * self.cols + x].push(id);
        self.max_radius = self.max_radius.max(radius);
    }

    /// Ids of every stored circle that could conflict with a circle whose reach
    /// (radius plus gap) around `center` is `reach`.
    fn neighbors(&self, center: Vec2, reach: f32) -> impl Iterator<Item = usize> + '_ {
        // One extra ring absorbs rounding at bucket borders.
        let span = ((reach + self.max_radius) / self.cell_size).ceil() as usize + 1;
        let (cx, cy) = self.cell_of(center);
        let x0 = cx.saturating_sub(span);
        let x1 = (cx + span).min(self.cols - 1);
        let y0 = cy.saturating_sub(span);
        let y1 = (cy + span).min(self.rows - 1);

        (y0..=y1).flat_map(move |y| {
            (x0..=x1).flat_map(move |x| self.buckets[y * self.cols + x].iter().copied())
        })
    }
}
