use glam::Vec2;

use crate::options::WindowSize;

/// Wraps a coordinate into `[0, size)`, negative values included,
/// e.g. `-1` in a space of `10` becomes `9`.
#[inline]
pub fn wrap_coordinate(value: f32, size: f32) -> f32 {
    let wrapped = value.rem_euclid(size);
    // rem_euclid rounds tiny negative values up to `size` itself
    if wrapped >= size {
        0.
    } else {
        wrapped
    }
}

/// Maps a point onto the torus spanned by the window.
pub fn wrap_position(position: Vec2, window: &WindowSize) -> Vec2 {
    Vec2::new(
        wrap_coordinate(position.x, window.win_w),
        wrap_coordinate(position.y, window.win_h),
    )
}

/// Rescales `velocity` to `max_speed` if it is faster, keeping its direction.
///
/// Zero and already slow enough velocities are returned untouched.
#[inline]
pub fn limit_speed(velocity: Vec2, max_speed: f32) -> Vec2 {
    velocity.clamp_length_max(max_speed)
}
