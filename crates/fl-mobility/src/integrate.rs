//! Position integration.

use fl_core::Vec2;

/// Explicit Euler step: `position += velocity * dt`.
#[inline]
pub fn integrate_position(position: &mut Vec2, velocity: Vec2, dt: f32) {
    *position += velocity * dt;
}
