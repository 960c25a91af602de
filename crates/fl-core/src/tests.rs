//! Unit tests for fl-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, ObstacleId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(ObstacleId::INVALID.0, u32::MAX);
        assert_eq!(AgentId::default(), AgentId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod math {
    use crate::Vec2;

    #[test]
    fn normalize_unit_length() {
        let v = Vec2::new(3.0, 4.0).normalize_or_zero();
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert!((v.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_normalizes_to_fallback() {
        assert_eq!(Vec2::ZERO.try_normalize(), None);
        assert_eq!(Vec2::ZERO.normalize_or(Vec2::X), Vec2::X);
        assert_eq!(Vec2::ZERO.normalize_or_zero(), Vec2::ZERO);
    }

    #[test]
    fn huge_components_normalize_without_overflow() {
        let v = Vec2::new(1e30, 0.0).try_normalize().unwrap();
        assert_eq!(v, Vec2::X);
        let d = Vec2::new(-3e25, 4e25).try_normalize().unwrap();
        assert!((d.length() - 1.0).abs() < 1e-5);
        assert!((d.x + 0.6).abs() < 1e-5);
    }

    #[test]
    fn tiny_components_normalize_without_underflow() {
        let v = Vec2::new(0.0, 1e-30).try_normalize().unwrap();
        assert_eq!(v, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn non_finite_vector_has_no_direction() {
        assert_eq!(Vec2::new(f32::INFINITY, 1.0).try_normalize(), None);
        assert_eq!(Vec2::new(f32::NAN, 0.0).normalize_or(Vec2::X), Vec2::X);
    }

    #[test]
    fn perp_is_counter_clockwise() {
        assert_eq!(Vec2::X.perp(), Vec2::new(0.0, 1.0));
        assert_eq!(Vec2::X.perp().dot(Vec2::X), 0.0);
    }

    #[test]
    fn from_angle_matches_cos_sin() {
        let v = Vec2::from_angle(std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }
}

#[cfg(test)]
mod cell {
    use crate::{CellCoord, Vec2};

    #[test]
    fn floor_not_truncation_near_origin() {
        assert_eq!(CellCoord::from_world(Vec2::new(0.5, 0.5), 1.0), CellCoord::new(0, 0));
        assert_eq!(CellCoord::from_world(Vec2::new(-0.5, 0.5), 1.0), CellCoord::new(-1, 0));
        assert_eq!(CellCoord::from_world(Vec2::new(-0.5, -2.5), 1.0), CellCoord::new(-1, -3));
    }

    #[test]
    fn cell_size_scales() {
        assert_eq!(CellCoord::from_world(Vec2::new(9.9, 10.0), 5.0), CellCoord::new(1, 2));
    }

    #[test]
    fn range_around_covers_radius() {
        let (min, max) = CellCoord::range_around(Vec2::new(0.0, 0.0), 1.5, 1.0);
        assert_eq!(min, CellCoord::new(-2, -2));
        assert_eq!(max, CellCoord::new(1, 1));
        assert_eq!(CellCoord::range_len(min, max), 16);
        assert_eq!(CellCoord::iter_range(min, max).count(), 16);
    }

    #[test]
    fn inverted_range_is_empty() {
        let min = CellCoord::new(2, 0);
        let max = CellCoord::new(1, 5);
        assert_eq!(CellCoord::range_len(min, max), 0);
        assert_eq!(CellCoord::iter_range(min, max).count(), 0);
    }
}

#[cfg(test)]
mod config {
    use crate::{BehaviorConfig, FlockError, SimConfig, query_reach};

    #[test]
    fn default_is_valid() {
        BehaviorConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_detection_range_rejected() {
        let cfg = BehaviorConfig { neighbour_detection_range: 0.0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(FlockError::Config(_))));
    }

    #[test]
    fn non_finite_rejected() {
        let cfg = BehaviorConfig { align_force: f32::NAN, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn query_extent_is_bounded_by_cell_size() {
        let cfg = BehaviorConfig::default();
        assert!(cfg.check_query_extent(2.0, 4.0).is_ok());
        // 2.0 / 0.01 = 200 cells.
        assert!(matches!(cfg.check_query_extent(0.01, 4.0), Err(FlockError::Config(_))));

        // Squared range 1e4 reaches 1e4 units: 2500 obstacle cells.
        let walls = BehaviorConfig { wall_repulsion_range: 1e4, ..Default::default() };
        assert!(walls.check_query_extent(2.0, 4.0).is_err());
        assert_eq!(query_reach(1e4), 1e4);
        assert_eq!(query_reach(0.25), 0.5);
    }

    #[test]
    fn sim_config_checks_behaviour_against_its_grid() {
        let sim = SimConfig::default();
        assert!(sim.validate_behavior(&BehaviorConfig::default()).is_ok());
        let wide = BehaviorConfig { neighbour_detection_range: 1000.0, ..Default::default() };
        assert!(wide.validate().is_ok());
        assert!(sim.validate_behavior(&wide).is_err());
    }

    #[test]
    fn negative_speed_rejected_negative_force_allowed() {
        let cfg = BehaviorConfig { speed: -1.0, ..Default::default() };
        assert!(cfg.validate().is_err());
        let cfg = BehaviorConfig { attraction_force: -1.0, ..Default::default() };
        assert!(cfg.validate().is_ok());
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
    }

    #[test]
    fn clock_accumulates_applied_dt() {
        let mut clock = SimClock::new(0.02);
        clock.advance(0.02);
        clock.advance(0.05);
        assert_eq!(clock.current_tick, Tick(2));
        assert!((clock.elapsed_secs - 0.07).abs() < 1e-6);
        assert_eq!(clock.ticks_for_secs(1.0), 50);
    }

    #[test]
    fn config_validation() {
        let cfg = SimConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.make_clock().current_tick, Tick::ZERO);

        let bad = SimConfig { agent_cell_size: 0.0, ..SimConfig::default() };
        assert!(bad.validate().is_err());
        let bad = SimConfig { obstacle_cell_size: -1.0, ..SimConfig::default() };
        assert!(bad.validate().is_err());
        let bad = SimConfig { fixed_dt_secs: f32::INFINITY, ..SimConfig::default() };
        assert!(bad.validate().is_err());
        let bad = SimConfig { num_threads: Some(0), ..SimConfig::default() };
        assert!(bad.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentRng, SimRng, Vec2};

    #[test]
    fn agent_rng_is_deterministic() {
        let mut a = AgentRng::new(42, 7);
        let mut b = AgentRng::new(42, 7);
        for _ in 0..16 {
            assert_eq!(a.signed_unit(), b.signed_unit());
        }
    }

    #[test]
    fn signed_unit_in_range() {
        let mut r = AgentRng::new(1, 1);
        for _ in 0..1000 {
            let v = r.signed_unit();
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn disc_samples_stay_inside() {
        let mut r = SimRng::new(3);
        let center = Vec2::new(10.0, -5.0);
        for _ in 0..1000 {
            let p = r.point_in_disc(center, 2.0);
            assert!(p.distance_squared(center) <= 4.0 + 1e-4);
        }
        assert_eq!(r.point_in_disc(center, 0.0), center);
    }
}
