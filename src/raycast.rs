//! Ray marching against the tile grid.
//!
//! Both functions are pure: identical inputs always give identical
//! outputs. Points outside the grid count as walls.

use std::f32::consts::{PI, TAU};

use crate::map::{TileGrid, CELL_SIZE};

/// Horizontal field of view, radians.
pub const FOV: f32 = PI / 3.0;
/// Default view distance, in cells.
pub const MAX_DEPTH: f32 = 20.0;
/// Default march step, in world units.
pub const STEP_SIZE: f32 = 2.0;
/// Spacing between line-of-sight samples, in world units.
pub const SIGHT_SPACING: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayParams {
    /// Distance advanced per sample. Smaller is more precise and slower.
    pub step_size: f32,
    /// Maximum ray length in world units.
    pub max_depth: f32,
}

impl RayParams {
    pub fn with_depth_cells(cells: f32) -> Self {
        Self {
            step_size: STEP_SIZE,
            max_depth: cells * CELL_SIZE,
        }
    }
}

impl Default for RayParams {
    fn default() -> Self {
        Self::with_depth_cells(MAX_DEPTH)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance to the first wall sample, or `max_depth` on a miss.
    pub distance: f32,
    pub hit: bool,
    /// World-space sample point that landed in the wall.
    pub point: Option<(f32, f32)>,
}

/// March a ray from `(x, y)` along `angle` until it enters a wall cell,
/// leaves the grid, or exceeds `params.max_depth`.
pub fn cast_ray(grid: &TileGrid, x: f32, y: f32, angle: f32, params: &RayParams) -> RayHit {
    let (dir_x, dir_y) = (angle.cos(), angle.sin());
    let step = if params.step_size > 0.0 {
        params.step_size
    } else {
        STEP_SIZE
    };
    let max_depth = params.max_depth.max(0.0);

    // Distances are derived from the step index so they never drift.
    let steps = (max_depth / step).ceil() as u32;
    for i in 0..steps {
        let distance = i as f32 * step;
        let px = x + dir_x * distance;
        let py = y + dir_y * distance;
        if grid.is_wall_at(px, py) {
            return RayHit {
                distance,
                hit: true,
                point: Some((px, py)),
            };
        }
    }

    RayHit {
        distance: max_depth,
        hit: false,
        point: None,
    }
}

/// Sample the segment between two points every `SIGHT_SPACING` units.
/// Segments shorter than one spacing are always visible.
pub fn is_line_of_sight(grid: &TileGrid, x1: f32, y1: f32, x2: f32, y2: f32) -> bool {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let distance = dx.hypot(dy);
    let steps = (distance / SIGHT_SPACING).floor() as u32;
    if steps == 0 {
        return true;
    }

    (0..=steps).all(|i| {
        let t = i as f32 / steps as f32;
        !grid.is_wall_at(x1 + dx * t, y1 + dy * t)
    })
}

/// Wrap an angle into `(-π, π]`.
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Signed angle from `facing` to the direction of `(dx, dy)`, in `(-π, π]`.
pub fn relative_angle(facing: f32, dx: f32, dy: f32) -> f32 {
    normalize_angle(dy.atan2(dx) - facing)
}
