//! Unit tests for fl-spatial.

#[cfg(test)]
mod grid {
    use fl_core::{AgentId, CellCoord, Vec2};

    use crate::{SpatialError, SpatialGrid};

    fn sorted(mut v: Vec<AgentId>) -> Vec<AgentId> {
        v.sort_unstable();
        v
    }

    #[test]
    fn rejects_bad_cell_size() {
        assert_eq!(
            SpatialGrid::<AgentId>::new(0.0).err(),
            Some(SpatialError::InvalidCellSize(0.0))
        );
        assert!(SpatialGrid::<AgentId>::new(-2.0).is_err());
        assert!(SpatialGrid::<AgentId>::new(f32::NAN).is_err());
        assert_eq!(
            SpatialGrid::<AgentId>::with_shards(1.0, 0).err(),
            Some(SpatialError::NoShards)
        );
    }

    #[test]
    fn range_query_returns_exactly_cells_in_range() {
        let mut grid = SpatialGrid::new(1.0).unwrap();
        grid.insert(CellCoord::new(0, 0), AgentId(0));
        grid.insert(CellCoord::new(1, 0), AgentId(1));
        grid.insert(CellCoord::new(5, 5), AgentId(2));

        let view = grid.view();
        let found = sorted(
            view.query_range(CellCoord::new(0, 0), CellCoord::new(1, 1)).collect(),
        );
        assert_eq!(found, vec![AgentId(0), AgentId(1)]);
    }

    #[test]
    fn sort_buckets_orders_entries() {
        let mut grid = SpatialGrid::new(1.0).unwrap();
        let cell = CellCoord::new(3, -3);
        for id in [5, 1, 4, 2] {
            grid.insert(cell, AgentId(id));
        }
        grid.sort_buckets();
        assert_eq!(
            grid.view().bucket(cell),
            &[AgentId(1), AgentId(2), AgentId(4), AgentId(5)]
        );
    }

    #[test]
    fn range_query_is_restartable() {
        let mut grid = SpatialGrid::new(1.0).unwrap();
        for i in 0..10 {
            grid.insert(CellCoord::new(i % 3, i / 3), AgentId(i as u32));
        }
        let view = grid.view();
        let it = view.query_range(CellCoord::new(0, 0), CellCoord::new(2, 3));
        let first: Vec<_> = it.clone().collect();
        let second: Vec<_> = it.collect();
        assert_eq!(first.len(), 10);
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_insert_is_noop() {
        let mut grid = SpatialGrid::new(1.0).unwrap();
        assert!(grid.insert(CellCoord::new(2, 2), AgentId(4)));
        assert!(!grid.insert(CellCoord::new(2, 2), AgentId(4)));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn removing_missing_entry_is_noop() {
        let mut grid = SpatialGrid::new(1.0).unwrap();
        grid.insert(CellCoord::new(0, 0), AgentId(1));

        assert!(!grid.remove(CellCoord::new(0, 0), AgentId(99)));
        assert!(!grid.remove(CellCoord::new(7, -3), AgentId(1)));

        let view = grid.view();
        assert_eq!(view.bucket(CellCoord::new(0, 0)), &[AgentId(1)]);
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn relocate_moves_single_entry() {
        let mut grid = SpatialGrid::new(1.0).unwrap();
        let a = CellCoord::new(0, 0);
        let b = CellCoord::new(-1, 0);
        grid.insert(a, AgentId(3));
        assert!(grid.relocate(a, b, AgentId(3)));

        let view = grid.view();
        assert_eq!(view.cells_containing(AgentId(3)), vec![b]);
    }

    #[test]
    fn clear_then_reinsert_reproduces_queries() {
        let mut grid = SpatialGrid::new(2.0).unwrap();
        let pairs: Vec<(CellCoord, AgentId)> = (0..50)
            .map(|i| (CellCoord::new(i % 7 - 3, i / 7 - 3), AgentId(i as u32)))
            .collect();
        for &(c, id) in &pairs {
            grid.insert(c, id);
        }
        let (min, max) = (CellCoord::new(-2, -2), CellCoord::new(2, 2));
        let before = sorted(grid.view().query_range(min, max).collect());

        grid.clear();
        assert!(grid.is_empty());
        for &(c, id) in &pairs {
            grid.insert(c, id);
        }
        let after = sorted(grid.view().query_range(min, max).collect());
        assert_eq!(before, after);
        assert!(!before.is_empty());
    }

    #[test]
    fn compact_drops_empty_buckets_only() {
        let mut grid = SpatialGrid::new(1.0).unwrap();
        grid.insert(CellCoord::new(0, 0), AgentId(0));
        grid.insert(CellCoord::new(1, 1), AgentId(1));
        grid.remove(CellCoord::new(0, 0), AgentId(0));
        grid.compact();
        let view = grid.view();
        assert_eq!(view.len(), 1);
        assert!(view.contains(CellCoord::new(1, 1), AgentId(1)));
    }

    #[test]
    fn query_radius_uses_floor_cells() {
        let mut grid = SpatialGrid::new(1.0).unwrap();
        grid.insert(grid.cell_of(Vec2::new(-0.5, -0.5)), AgentId(0));
        grid.insert(grid.cell_of(Vec2::new(0.5, 0.5)), AgentId(1));
        grid.insert(grid.cell_of(Vec2::new(3.5, 0.5)), AgentId(2));

        let view = grid.view();
        let near = sorted(view.query_radius(Vec2::new(0.0, 0.0), 0.25).collect());
        assert_eq!(near, vec![AgentId(0), AgentId(1)]);
    }

    #[test]
    fn freeze_keeps_contents() {
        let grid = SpatialGrid::new(1.0).unwrap();
        grid.insert(CellCoord::new(4, 4), AgentId(9));
        let frozen = grid.freeze();
        assert_eq!(frozen.view().bucket(CellCoord::new(4, 4)), &[AgentId(9)]);
        assert_eq!(frozen.cell_size(), 1.0);
    }
}

#[cfg(test)]
mod concurrency {
    use std::thread;

    use fl_core::{AgentId, CellCoord};

    use crate::{GridView, SpatialGrid};

    const THREADS: u32 = 16;
    const PER_THREAD: u32 = 500;

    /// Every thread writes into the same 4×4 block so buckets are shared.
    fn cell_for(i: u32) -> CellCoord {
        CellCoord::new((i % 4) as i32, ((i / 4) % 4) as i32)
    }

    /// Each bucket holds exactly the ids `expected_cell` maps to it, once.
    fn assert_buckets(view: &GridView<'_, AgentId>, total: u32, expected_cell: impl Fn(u32) -> CellCoord) {
        for cell in CellCoord::iter_range(CellCoord::new(0, 0), CellCoord::new(3, 3)) {
            let mut got = view.bucket(cell).to_vec();
            got.sort_unstable();
            let expected: Vec<AgentId> = (0..total)
                .filter(|&id| expected_cell(id) == cell)
                .map(AgentId)
                .collect();
            assert_eq!(got, expected, "bucket {cell}");
        }
    }

    #[test]
    fn concurrent_inserts_lose_nothing() {
        let mut grid = SpatialGrid::with_shards(1.0, 4).unwrap();
        thread::scope(|s| {
            for t in 0..THREADS {
                let grid = &grid;
                s.spawn(move || {
                    for i in 0..PER_THREAD {
                        let id = t * PER_THREAD + i;
                        grid.insert(cell_for(id), AgentId(id));
                    }
                });
            }
        });

        let view = grid.view();
        assert_eq!(view.len(), (THREADS * PER_THREAD) as usize);
        assert_buckets(&view, THREADS * PER_THREAD, cell_for);
    }

    #[test]
    fn concurrent_migrations_keep_single_membership() {
        let mut grid = SpatialGrid::with_shards(1.0, 4).unwrap();
        let total = THREADS * PER_THREAD;
        for id in 0..total {
            grid.insert(cell_for(id), AgentId(id));
        }

        // Each thread owns a disjoint id range but all ranges share buckets.
        thread::scope(|s| {
            for t in 0..THREADS {
                let grid = &grid;
                s.spawn(move || {
                    for i in 0..PER_THREAD {
                        let id = t * PER_THREAD + i;
                        let from = cell_for(id);
                        let to = cell_for(id + 1);
                        assert!(grid.relocate(from, to, AgentId(id)));
                        // Removal from a cell the id never occupied is a no-op.
                        grid.remove(CellCoord::new(100, 100), AgentId(id));
                    }
                });
            }
        });

        let view = grid.view();
        assert_eq!(view.len(), total as usize);
        assert_buckets(&view, total, |id| cell_for(id + 1));
    }

    #[test]
    fn concurrent_readers_share_one_view() {
        let mut grid = SpatialGrid::new(1.0).unwrap();
        for id in 0..1000u32 {
            grid.insert(cell_for(id), AgentId(id));
        }
        let view = grid.view();
        thread::scope(|s| {
            for _ in 0..8 {
                let view = &view;
                s.spawn(move || {
                    let n = view
                        .query_range(CellCoord::new(0, 0), CellCoord::new(3, 3))
                        .count();
                    assert_eq!(n, 1000);
                });
            }
        });
    }
}

#[cfg(test)]
mod obstacle {
    use fl_core::{CellCoord, ObstacleId, Vec2};

    use crate::{ObstacleMapBuilder, ObstacleSegment, SpatialError};

    #[test]
    fn degenerate_segments_rejected() {
        let p = Vec2::new(1.0, 1.0);
        assert!(matches!(
            ObstacleSegment::facing_left(p, p),
            Err(SpatialError::DegenerateSegment { .. })
        ));
        assert!(ObstacleSegment::new(Vec2::ZERO, p, Vec2::ZERO).is_err());
    }

    #[test]
    fn vanishingly_short_segment_rejected() {
        // start != end, but the squared length underflows to zero.
        let end = Vec2::new(1e-23, 0.0);
        assert!(matches!(
            ObstacleSegment::new(Vec2::ZERO, end, Vec2::new(0.0, 1.0)),
            Err(SpatialError::DegenerateSegment { .. })
        ));
        assert!(ObstacleSegment::new(Vec2::ZERO, Vec2::new(1e20, 0.0), Vec2::new(0.0, 1.0)).is_err());
    }

    #[test]
    fn normal_is_normalized() {
        let seg = ObstacleSegment::new(Vec2::ZERO, Vec2::new(0.0, 4.0), Vec2::new(3.0, 0.0))
            .unwrap();
        assert_eq!(seg.normal, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn facing_left_points_inward_for_ccw_box() {
        // Bottom edge walked left→right: left is +y.
        let seg = ObstacleSegment::facing_left(Vec2::ZERO, Vec2::new(2.0, 0.0)).unwrap();
        assert_eq!(seg.normal, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn distance_to_interior_and_endpoints() {
        let seg = ObstacleSegment::facing_left(Vec2::ZERO, Vec2::new(4.0, 0.0)).unwrap();
        assert_eq!(seg.distance_squared(Vec2::new(2.0, 3.0)), 9.0);
        assert_eq!(seg.distance_squared(Vec2::new(-3.0, 4.0)), 25.0);
        assert_eq!(seg.distance_squared(Vec2::new(5.0, 0.0)), 1.0);
        assert_eq!(seg.closest_point(Vec2::new(1.0, -1.0)), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn long_segment_registered_in_every_crossed_cell() {
        let mut b = ObstacleMapBuilder::new(1.0);
        let id = b.add_segment(
            ObstacleSegment::facing_left(Vec2::new(0.5, 0.5), Vec2::new(5.5, 0.5)).unwrap(),
        );
        let map = b.build().unwrap();
        let view = map.view();
        let cells = view.cells_containing(id);
        for x in 0..=5 {
            assert!(cells.contains(&CellCoord::new(x, 0)), "missing cell {x}");
        }
        assert!(!cells.contains(&CellCoord::new(2, 3)));
    }

    #[test]
    fn diagonal_segment_skips_far_corners_of_bbox() {
        let mut b = ObstacleMapBuilder::new(1.0);
        let id = b.add_segment(
            ObstacleSegment::facing_left(Vec2::new(0.1, 0.1), Vec2::new(9.9, 9.9)).unwrap(),
        );
        let map = b.build().unwrap();
        let cells = map.view().cells_containing(id);
        assert!(cells.contains(&CellCoord::new(5, 5)));
        assert!(!cells.contains(&CellCoord::new(9, 0)));
        assert!(cells.len() < 100);
    }

    #[test]
    fn collect_near_deduplicates() {
        let mut b = ObstacleMapBuilder::new(1.0);
        let ids = b.add_box(Vec2::new(0.0, 0.0), Vec2::new(4.0, 4.0)).unwrap();
        let map = b.build().unwrap();
        assert_eq!(map.len(), 4);

        let mut out = vec![ObstacleId(77)];
        map.collect_near(Vec2::new(0.5, 2.0), 3.0, &mut out);
        // The left wall spans several queried cells but appears once.
        assert_eq!(out.iter().filter(|&&id| id == ids[3]).count(), 1);
        assert!(!out.contains(&ObstacleId(77)));
    }

    #[test]
    fn box_walls_face_inward() {
        let mut b = ObstacleMapBuilder::new(2.0);
        let ids = b.add_box(Vec2::new(-5.0, -5.0), Vec2::new(5.0, 5.0)).unwrap();
        let map = b.build().unwrap();
        assert_eq!(map.segment(ids[0]).normal, Vec2::new(0.0, 1.0));
        assert_eq!(map.segment(ids[1]).normal, Vec2::new(-1.0, 0.0));
        assert_eq!(map.segment(ids[2]).normal, Vec2::new(0.0, -1.0));
        assert_eq!(map.segment(ids[3]).normal, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn empty_map_rejects_bad_cell_size() {
        assert!(crate::ObstacleMap::empty(0.0).is_err());
        assert!(crate::ObstacleMap::empty(1.0).unwrap().is_empty());
    }
}
