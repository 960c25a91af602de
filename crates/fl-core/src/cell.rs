//! Integer grid cell coordinates.
//!
//! A world position maps to the cell `floor(position / cell_size)` per
//! component.  `floor` (not truncation toward zero) keeps every cell the same
//! width on both sides of the origin: with truncation, `(-0.5, 0.5)` would
//! share cell `(0, 0)` and that cell would be twice as wide.

use std::fmt;

use crate::Vec2;

/// A cell in a uniform 2D grid.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell containing `position` for a grid of `cell_size`.
    ///
    /// `cell_size` must be positive; grids validate it at construction.
    /// Out-of-range coordinates saturate at the `i32` bounds.
    #[inline]
    pub fn from_world(position: Vec2, cell_size: f32) -> Self {
        Self {
            x: (position.x / cell_size).floor() as i32,
            y: (position.y / cell_size).floor() as i32,
        }
    }

    /// Inclusive cell rectangle covering the square of half-width `radius`
    /// around `center`.
    #[inline]
    pub fn range_around(center: Vec2, radius: f32, cell_size: f32) -> (CellCoord, CellCoord) {
        (
            CellCoord::from_world(center - radius, cell_size),
            CellCoord::from_world(center + radius, cell_size),
        )
    }

    /// Number of cells in the inclusive rectangle `[min, max]`; zero when
    /// `min` exceeds `max` on either axis.
    #[inline]
    pub fn range_len(min: CellCoord, max: CellCoord) -> usize {
        if min.x > max.x || min.y > max.y {
            return 0;
        }
        let w = (max.x as i64 - min.x as i64 + 1) as usize;
        let h = (max.y as i64 - min.y as i64 + 1) as usize;
        w.saturating_mul(h)
    }

    /// Row-major iterator over the inclusive rectangle `[min, max]`.
    ///
    /// Empty cells are visited too; the cost is `range_len(min, max)`
    /// regardless of occupancy.  `BehaviorConfig::check_query_extent` bounds
    /// the rectangles the force model asks for.
    pub fn iter_range(min: CellCoord, max: CellCoord) -> impl Iterator<Item = CellCoord> + Clone {
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| CellCoord { x, y }))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}
