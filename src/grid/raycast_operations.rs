//! Grid raycasting - Pure DOP functions
//!
//! Slab test against the grid's world box, then an Amanatides-Woo DDA walk
//! through the voxels. Reads the grid only; identical inputs always give
//! identical hits.

use super::core::{BlockFace, HitInfo, Ray, VoxelPos, WorldBounds};
use super::grid_data::VoxelGridData;
use super::grid_operations::{get_voxel, in_bounds};
use crate::camera::screen_to_ray_direction;
use crate::constants::raycast::{ENTRY_NUDGE, HUGE_INVERSE, MAX_RAY_STEPS, PARALLEL_EPSILON};
use crate::constants::voxel::EMPTY_EPSILON;
use cgmath::{Matrix4, Point3, Vector2, Vector3};

/// Entry/exit parameters of a ray against a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsIntersection {
    pub t_near: f32,
    pub t_far: f32,
    /// Axis (0=x, 1=y, 2=z) whose slab the ray entered last
    pub entry_axis: usize,
}

// ============================================================================
// BOUNDS
// ============================================================================

/// World-space box of the grid
///
/// Each voxel is a cube of edge `voxel_scale`. The grid is centred on the
/// origin in X and Z and rests on `y = 0`.
pub fn grid_world_bounds(grid: &VoxelGridData, voxel_scale: f32) -> WorldBounds {
    let half_w = grid.width as f32 * voxel_scale * 0.5;
    let half_d = grid.depth as f32 * voxel_scale * 0.5;
    WorldBounds {
        min: Point3::new(-half_w, 0.0, -half_d),
        max: Point3::new(half_w, grid.height as f32 * voxel_scale, half_d),
    }
}

/// Component-wise 1/d, with near-zero components mapped to a huge value
/// carrying the component's sign
pub fn safe_inverse_direction(direction: Vector3<f32>) -> Vector3<f32> {
    let inv = |d: f32| {
        if d.abs() < PARALLEL_EPSILON {
            HUGE_INVERSE.copysign(d)
        } else {
            1.0 / d
        }
    };
    Vector3::new(inv(direction.x), inv(direction.y), inv(direction.z))
}

/// Slab test
///
/// # Returns
/// None when the box is missed or lies entirely behind the origin
pub fn intersect_bounds(ray: &Ray, bounds: &WorldBounds) -> Option<BoundsIntersection> {
    let inv = safe_inverse_direction(ray.direction);
    let origin = [ray.origin.x, ray.origin.y, ray.origin.z];
    let inv = [inv.x, inv.y, inv.z];
    let lo = [bounds.min.x, bounds.min.y, bounds.min.z];
    let hi = [bounds.max.x, bounds.max.y, bounds.max.z];

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut entry_axis = 0;

    for axis in 0..3 {
        let t1 = (lo[axis] - origin[axis]) * inv[axis];
        let t2 = (hi[axis] - origin[axis]) * inv[axis];
        let (t_small, t_large) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };

        if t_small > t_near {
            t_near = t_small;
            entry_axis = axis;
        }
        t_far = t_far.min(t_large);
    }

    if t_far < t_near.max(0.0) {
        return None;
    }

    Some(BoundsIntersection {
        t_near,
        t_far,
        entry_axis,
    })
}

// ============================================================================
// RAYCASTING
// ============================================================================

/// Raycast through the grid to the first occupied voxel
///
/// # Arguments
/// * `grid` - Grid to traverse
/// * `ray` - World-space ray
/// * `voxel_scale` - World edge length of one voxel
/// * `fallback_value` - Reported as the palette value of edge hits
///
/// # Returns
/// * `Some(hit)` with `is_edge_hit == false` for an occupied voxel
/// * `Some(hit)` with `is_edge_hit == true` for the last in-bounds voxel
///   traversed when nothing was hit
/// * `None` if the grid box is missed or the direction is degenerate
pub fn raycast(
    grid: &VoxelGridData,
    ray: &Ray,
    voxel_scale: f32,
    fallback_value: f32,
) -> Option<HitInfo> {
    raycast_with_limit(grid, ray, voxel_scale, fallback_value, MAX_RAY_STEPS)
}

/// Raycast with an explicit step limit
pub fn raycast_with_limit(
    grid: &VoxelGridData,
    ray: &Ray,
    voxel_scale: f32,
    fallback_value: f32,
    max_steps: u32,
) -> Option<HitInfo> {
    let d = ray.direction;
    if d.x.abs() < PARALLEL_EPSILON && d.y.abs() < PARALLEL_EPSILON && d.z.abs() < PARALLEL_EPSILON {
        return None;
    }
    if !(voxel_scale > 0.0) {
        log::warn!("[Raycast] Rejected non-positive voxel scale {}", voxel_scale);
        return None;
    }

    let ray = Ray::new(ray.origin, d);
    let bounds = grid_world_bounds(grid, voxel_scale);
    let entry = intersect_bounds(&ray, &bounds)?;
    let starts_outside = entry.t_near > 0.0;

    let start = ray.at(entry.t_near.max(0.0) + ENTRY_NUDGE);
    let local = (start - bounds.min) / voxel_scale;
    let dims = [grid.width as i32, grid.height as i32, grid.depth as i32];
    let local = [local.x, local.y, local.z];
    let mut voxel = [0i32; 3];
    for axis in 0..3 {
        voxel[axis] = (local[axis].floor() as i32).clamp(0, dims[axis] - 1);
    }

    let dir = [ray.direction.x, ray.direction.y, ray.direction.z];
    let inv = safe_inverse_direction(ray.direction);
    let inv = [inv.x, inv.y, inv.z];
    let origin = [ray.origin.x, ray.origin.y, ray.origin.z];
    let bounds_min = [bounds.min.x, bounds.min.y, bounds.min.z];

    let mut step = [0i32; 3];
    let mut t_max = [f32::INFINITY; 3];
    let mut t_delta = [f32::INFINITY; 3];
    for axis in 0..3 {
        if dir[axis] > 0.0 {
            step[axis] = 1;
        } else if dir[axis] < 0.0 {
            step[axis] = -1;
        } else {
            continue;
        }
        let next = voxel[axis] + if step[axis] > 0 { 1 } else { 0 };
        let boundary = bounds_min[axis] + next as f32 * voxel_scale;
        t_max[axis] = (boundary - origin[axis]) * inv[axis];
        t_delta[axis] = (voxel_scale * inv[axis]).abs();
    }

    let mut last_axis = starts_outside.then_some(entry.entry_axis);
    let mut last_voxel: Option<VoxelPos> = None;
    let face_of = |axis: Option<usize>, step: &[i32; 3]| {
        axis.and_then(|a| BlockFace::from_axis_step(a, step[a]))
    };

    for _ in 0..max_steps {
        let pos = VoxelPos::new(voxel[0], voxel[1], voxel[2]);
        if !in_bounds(grid, pos) {
            break;
        }

        let value = get_voxel(grid, pos);
        if value > EMPTY_EPSILON {
            return Some(HitInfo {
                voxel: pos,
                face: face_of(last_axis, &step),
                palette_value: value,
                is_edge_hit: false,
            });
        }
        last_voxel = Some(pos);

        // Ties go to x, then y, then z
        let axis = if t_max[0] <= t_max[1] && t_max[0] <= t_max[2] {
            0
        } else if t_max[1] <= t_max[2] {
            1
        } else {
            2
        };
        voxel[axis] += step[axis];
        t_max[axis] += t_delta[axis];
        last_axis = Some(axis);
    }

    last_voxel.map(|pos| HitInfo {
        voxel: pos,
        face: face_of(last_axis, &step),
        palette_value: fallback_value,
        is_edge_hit: true,
    })
}

/// Raycast from a cursor position
///
/// # Arguments
/// * `mouse_pos` - Cursor in pixels, origin top-left
/// * `viewport_size` - Viewport in pixels
/// * `ray_origin` - Camera position in world space
/// * `inv_view_proj` - Inverse of `projection * view`
///
/// # Returns
/// None for an empty viewport or a degenerate matrix, otherwise as `raycast`
pub fn raycast_from_screen(
    grid: &VoxelGridData,
    mouse_pos: Vector2<f32>,
    viewport_size: Vector2<f32>,
    ray_origin: Point3<f32>,
    inv_view_proj: &Matrix4<f32>,
    voxel_scale: f32,
    fallback_value: f32,
) -> Option<HitInfo> {
    let direction = screen_to_ray_direction(mouse_pos, viewport_size, inv_view_proj)?;
    raycast(grid, &Ray::new(ray_origin, direction), voxel_scale, fallback_value)
}
