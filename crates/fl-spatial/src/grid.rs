//! Uniform-cell multi-map from [`CellCoord`] to entity ids.
//!
//! # Layout
//!
//! Buckets are spread over a fixed number of shards, each a
//! `Mutex<FxHashMap<CellCoord, Vec<T>>>`.  A cell always lives in the shard
//! picked by its FxHash, so two writers only contend when their cells hash
//! to the same shard.  Per-bucket `Vec`s are duplicate-free.
//!
//! ```text
//! insert(cell, id) ──hash(cell) % N──▶ shard[k].lock() ──▶ bucket.push(id)
//! view(&mut grid)  ──get_mut()──▶ [&shard0, &shard1, …]   (no locks)
//! ```
//!
//! # Capacity
//!
//! Buckets and shard maps grow on demand.  [`SpatialGrid::clear`] empties
//! every bucket but keeps the allocations for the next tick;
//! [`SpatialGrid::compact`] drops buckets that have stayed empty.

use std::hash::BuildHasher;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rustc_hash::{FxBuildHasher, FxHashMap};

use fl_core::{CellCoord, Vec2};

use crate::{SpatialError, SpatialResult};

/// Shard count used by [`SpatialGrid::new`].
pub const DEFAULT_SHARD_COUNT: usize = 64;

type Shard<T> = FxHashMap<CellCoord, Vec<T>>;

#[inline]
fn shard_index(cell: CellCoord, shard_count: usize) -> usize {
    (FxBuildHasher.hash_one(cell) as usize) % shard_count
}

fn validate_cell_size(cell_size: f32) -> SpatialResult<()> {
    if cell_size.is_finite() && cell_size > 0.0 {
        Ok(())
    } else {
        Err(SpatialError::InvalidCellSize(cell_size))
    }
}

// ── SpatialGrid ───────────────────────────────────────────────────────────────

/// Concurrent multi-writer partition grid.
pub struct SpatialGrid<T> {
    cell_size: f32,
    shards:    Box<[Mutex<Shard<T>>]>,
}

impl<T: Copy + Eq> SpatialGrid<T> {
    /// Empty grid with [`DEFAULT_SHARD_COUNT`] shards.
    pub fn new(cell_size: f32) -> SpatialResult<Self> {
        Self::with_shards(cell_size, DEFAULT_SHARD_COUNT)
    }

    /// Empty grid with an explicit shard count.
    pub fn with_shards(cell_size: f32, shard_count: usize) -> SpatialResult<Self> {
        validate_cell_size(cell_size)?;
        if shard_count == 0 {
            return Err(SpatialError::NoShards);
        }
        let shards = (0..shard_count)
            .map(|_| Mutex::new(Shard::default()))
            .collect();
        Ok(Self { cell_size, shards })
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// The cell containing `position`.
    #[inline]
    pub fn cell_of(&self, position: Vec2) -> CellCoord {
        CellCoord::from_world(position, self.cell_size)
    }

    // A panicking writer can only leave a bucket with or without its one
    // entry, both of which are valid states, so poisoning is ignored.
    #[inline]
    fn lock(&self, cell: CellCoord) -> MutexGuard<'_, Shard<T>> {
        self.shards[shard_index(cell, self.shards.len())]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Add `id` to the bucket for `cell`.
    ///
    /// Returns `false` (and changes nothing) if `id` was already there.
    pub fn insert(&self, cell: CellCoord, id: T) -> bool {
        let mut shard = self.lock(cell);
        let bucket = shard.entry(cell).or_default();
        if bucket.contains(&id) {
            return false;
        }
        bucket.push(id);
        true
    }

    /// Remove `id` from the bucket for `cell`.
    ///
    /// Removing an entry that is not present is a no-op returning `false`.
    pub fn remove(&self, cell: CellCoord, id: T) -> bool {
        let mut shard = self.lock(cell);
        let Some(bucket) = shard.get_mut(&cell) else {
            return false;
        };
        match bucket.iter().position(|&e| e == id) {
            Some(i) => {
                bucket.swap_remove(i);
                true
            }
            None => false,
        }
    }

    /// Move `id` from `from` to `to`.  Equivalent to `remove` + `insert`.
    ///
    /// Returns whether `id` was found in `from`.
    pub fn relocate(&self, from: CellCoord, to: CellCoord, id: T) -> bool {
        let found = self.remove(from, id);
        self.insert(to, id);
        found
    }

    /// Empty every bucket, keeping allocated capacity.
    pub fn clear(&mut self) {
        for shard in self.shards.iter_mut() {
            let shard = shard.get_mut().unwrap_or_else(PoisonError::into_inner);
            for bucket in shard.values_mut() {
                bucket.clear();
            }
        }
    }

    /// Drop empty buckets, releasing their storage.
    pub fn compact(&mut self) {
        for shard in self.shards.iter_mut() {
            shard
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|_, bucket| !bucket.is_empty());
        }
    }

    /// Sort every bucket, so query order no longer depends on which writer
    /// reached a shard first.
    pub fn sort_buckets(&mut self)
    where
        T: Ord,
    {
        for shard in self.shards.iter_mut() {
            let shard = shard.get_mut().unwrap_or_else(PoisonError::into_inner);
            for bucket in shard.values_mut() {
                bucket.sort_unstable();
            }
        }
    }

    /// Total number of entries across all buckets.
    ///
    /// Takes `&mut self` because it counts through [`view`](Self::view),
    /// which reads every shard without locking. Writers holding `&self`
    /// cannot observe a consistent total anyway.
    pub fn len(&mut self) -> usize {
        self.view().len()
    }

    /// `true` when no bucket holds an entry.  Counts through
    /// [`view`](Self::view), like [`len`](Self::len).
    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Lock-free read-only view.  The exclusive borrow guarantees no writer
    /// can run while the view is alive.
    pub fn view(&mut self) -> GridView<'_, T> {
        let shards = self
            .shards
            .iter_mut()
            .map(|s| &*s.get_mut().unwrap_or_else(PoisonError::into_inner))
            .collect();
        GridView { cell_size: self.cell_size, shards }
    }

    /// Convert into an immutable grid for data that never changes again.
    pub fn freeze(self) -> FrozenGrid<T> {
        let shards = self
            .shards
            .into_vec()
            .into_iter()
            .map(|s| {
                let mut shard = s.into_inner().unwrap_or_else(PoisonError::into_inner);
                shard.retain(|_, bucket| !bucket.is_empty());
                shard
            })
            .collect();
        FrozenGrid { cell_size: self.cell_size, shards }
    }
}

// ── GridView ──────────────────────────────────────────────────────────────────

/// Read-only, lock-free snapshot of a settled grid.
///
/// `GridView` is `Sync` whenever `T` is, so one view can be shared by every
/// worker of a phase.
pub struct GridView<'a, T> {
    cell_size: f32,
    shards:    Vec<&'a Shard<T>>,
}

impl<'a, T: Copy + Eq> GridView<'a, T> {
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// The cell containing `position`.
    #[inline]
    pub fn cell_of(&self, position: Vec2) -> CellCoord {
        CellCoord::from_world(position, self.cell_size)
    }

    /// Entries of one cell.
    #[inline]
    pub fn bucket(&self, cell: CellCoord) -> &'a [T] {
        self.shards[shard_index(cell, self.shards.len())]
            .get(&cell)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Lazy sequence of ids across the inclusive cell rectangle
    /// `[min, max]`.  Finite; call again to restart.
    pub fn query_range(
        &self,
        min: CellCoord,
        max: CellCoord,
    ) -> impl Iterator<Item = T> + Clone + '_ {
        CellCoord::iter_range(min, max).flat_map(move |cell| self.bucket(cell).iter().copied())
    }

    /// [`query_range`](Self::query_range) over the cells covering the square
    /// of half-width `radius` around `center`.
    pub fn query_radius(&self, center: Vec2, radius: f32) -> impl Iterator<Item = T> + Clone + '_ {
        let (min, max) = CellCoord::range_around(center, radius, self.cell_size);
        self.query_range(min, max)
    }

    /// `true` if `cell`'s bucket holds `id`.
    pub fn contains(&self, cell: CellCoord, id: T) -> bool {
        self.bucket(cell).contains(&id)
    }

    /// Every cell whose bucket holds `id`.  Full scan; diagnostics only.
    pub fn cells_containing(&self, id: T) -> Vec<CellCoord> {
        let mut cells: Vec<CellCoord> = self
            .shards
            .iter()
            .flat_map(|shard| shard.iter())
            .filter(|(_, bucket)| bucket.contains(&id))
            .map(|(&cell, _)| cell)
            .collect();
        cells.sort_unstable();
        cells
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .flat_map(|shard| shard.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── FrozenGrid ────────────────────────────────────────────────────────────────

/// Immutable grid for static content such as obstacle segments.
pub struct FrozenGrid<T> {
    cell_size: f32,
    shards:    Vec<Shard<T>>,
}

impl<T: Copy + Eq> FrozenGrid<T> {
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Read-only view; no locking involved.
    pub fn view(&self) -> GridView<'_, T> {
        GridView {
            cell_size: self.cell_size,
            shards:    self.shards.iter().collect(),
        }
    }
}
