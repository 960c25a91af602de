//! Static obstacle segments and their partition grid.
//!
//! Segments are created once at level load and never change, so the grid
//! that indexes them is frozen after construction.  A segment is registered
//! in every cell it passes through; callers that range-query several cells
//! must de-duplicate ids (see [`ObstacleMap::collect_near`]).

use tracing::debug;

use fl_core::{CellCoord, ObstacleId, Vec2};

use crate::{FrozenGrid, GridView, SpatialError, SpatialGrid, SpatialResult};

// ── ObstacleSegment ───────────────────────────────────────────────────────────

/// A static line segment with a precomputed unit collision normal.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstacleSegment {
    pub start:  Vec2,
    pub end:    Vec2,
    /// Unit direction agents are pushed toward.
    pub normal: Vec2,
}

impl ObstacleSegment {
    /// Segment with an explicit normal (normalized here).
    pub fn new(start: Vec2, end: Vec2, normal: Vec2) -> SpatialResult<Self> {
        let degenerate = SpatialError::DegenerateSegment { start, end, normal };
        // Divisor in `closest_point`.
        let len_sq = (end - start).length_squared();
        if !(len_sq > 0.0 && len_sq.is_finite()) {
            return Err(degenerate);
        }
        let normal = normal.try_normalize().ok_or(degenerate)?;
        Ok(Self { start, end, normal })
    }

    /// Segment whose normal points to the left of `start → end`.
    ///
    /// Walls listed counter-clockwise around a room therefore push inward.
    pub fn facing_left(start: Vec2, end: Vec2) -> SpatialResult<Self> {
        Self::new(start, end, (end - start).perp())
    }

    /// Point on the segment nearest to `p`.
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let ab = self.end - self.start;
        let t = ((p - self.start).dot(ab) / ab.length_squared()).clamp(0.0, 1.0);
        self.start + ab * t
    }

    /// Squared distance from `p` to the nearest point on the segment.
    #[inline]
    pub fn distance_squared(&self, p: Vec2) -> f32 {
        self.closest_point(p).distance_squared(p)
    }

    /// Axis-aligned bounds `(min, max)`.
    #[inline]
    pub fn bounds(&self) -> (Vec2, Vec2) {
        (self.start.min(self.end), self.start.max(self.end))
    }
}

// ── ObstacleMap ───────────────────────────────────────────────────────────────

/// All obstacle segments of a level plus their partition grid.
///
/// Build with [`ObstacleMapBuilder`].
pub struct ObstacleMap {
    segments: Vec<ObstacleSegment>,
    grid:     FrozenGrid<ObstacleId>,
}

impl ObstacleMap {
    /// A map with no obstacles.
    pub fn empty(cell_size: f32) -> SpatialResult<Self> {
        ObstacleMapBuilder::new(cell_size).build()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.grid.cell_size()
    }

    /// Segment by id.  Panics on an id not produced by this map's builder.
    #[inline]
    pub fn segment(&self, id: ObstacleId) -> &ObstacleSegment {
        &self.segments[id.index()]
    }

    /// Lock-free view of the segment grid.
    pub fn view(&self) -> GridView<'_, ObstacleId> {
        self.grid.view()
    }

    /// Replace `out` with the distinct segments registered in the cells
    /// covering the square of half-width `radius` around `center`.
    pub fn collect_near(&self, center: Vec2, radius: f32, out: &mut Vec<ObstacleId>) {
        out.clear();
        out.extend(self.grid.view().query_radius(center, radius));
        out.sort_unstable();
        out.dedup();
    }
}

// ── ObstacleMapBuilder ────────────────────────────────────────────────────────

/// Collects segments, then partitions them once in [`build`](Self::build).
pub struct ObstacleMapBuilder {
    cell_size: f32,
    segments:  Vec<ObstacleSegment>,
}

impl ObstacleMapBuilder {
    pub fn new(cell_size: f32) -> Self {
        Self { cell_size, segments: Vec::new() }
    }

    /// Add a segment and return its id.
    pub fn add_segment(&mut self, segment: ObstacleSegment) -> ObstacleId {
        let id = ObstacleId(self.segments.len() as u32);
        self.segments.push(segment);
        id
    }

    /// Four inward-facing walls enclosing the rectangle `[min, max]`.
    pub fn add_box(&mut self, min: Vec2, max: Vec2) -> SpatialResult<[ObstacleId; 4]> {
        let corners = [
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ];
        let mut ids = [ObstacleId::INVALID; 4];
        for (i, id) in ids.iter_mut().enumerate() {
            let seg = ObstacleSegment::facing_left(corners[i], corners[(i + 1) % 4])?;
            *id = self.add_segment(seg);
        }
        Ok(ids)
    }

    /// Partition every segment and freeze the grid.
    ///
    /// A segment is registered in each cell of its bounding box whose centre
    /// lies within half a cell diagonal of the segment, which covers every
    /// cell the segment crosses without listing a long diagonal's whole
    /// bounding box.
    pub fn build(self) -> SpatialResult<ObstacleMap> {
        let grid = SpatialGrid::new(self.cell_size)?;
        let half = self.cell_size * 0.5;
        let reach_sq = half * half * 2.0;

        let mut registrations = 0usize;
        for (i, seg) in self.segments.iter().enumerate() {
            let id = ObstacleId(i as u32);
            let (lo, hi) = seg.bounds();
            let min = grid.cell_of(lo);
            let max = grid.cell_of(hi);
            for cell in CellCoord::iter_range(min, max) {
                let center = Vec2::new(
                    cell.x as f32 * self.cell_size + half,
                    cell.y as f32 * self.cell_size + half,
                );
                if seg.distance_squared(center) <= reach_sq {
                    grid.insert(cell, id);
                    registrations += 1;
                }
            }
        }

        debug!(
            segments = self.segments.len(),
            registrations,
            cell_size = self.cell_size,
            "obstacle map built"
        );
        Ok(ObstacleMap { segments: self.segments, grid: grid.freeze() })
    }
}
