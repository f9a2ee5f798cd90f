//! Camera operations - Pure DOP functions
//!
//! All functions are pure: they take data, return new data, no side effects.
//! No methods, no self, just transformations.

use super::camera_data::OrbitCameraData;
use crate::grid::Ray;
use cgmath::{Deg, InnerSpace, Matrix4, Point3, SquareMatrix, Vector2, Vector3, Vector4};
use std::f32::consts::{FRAC_PI_2, TAU};

const WORLD_UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);
const PITCH_LIMIT: f32 = 0.999 * FRAC_PI_2;
const MIN_RADIUS: f32 = 0.25;
const ROTATE_SCALE: f32 = 0.01;
const ZOOM_SCALE: f32 = 0.1;
const PAN_SCALE: f32 = 0.001;

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize an orbit camera with default lens settings
pub fn init_orbit_camera(target: Point3<f32>, radius: f32) -> OrbitCameraData {
    OrbitCameraData {
        target,
        radius: radius.max(MIN_RADIUS),
        ..Default::default()
    }
}

// ============================================================================
// VIEW/PROJECTION MATRICES
// ============================================================================

/// World-space eye position on the orbit sphere
pub fn camera_position(camera: &OrbitCameraData) -> Point3<f32> {
    let (sp, cp) = camera.pitch_radians.sin_cos();
    let (sy, cy) = camera.yaw_radians.sin_cos();
    camera.target + Vector3::new(cp * sy, sp, cp * cy) * camera.radius
}

/// Build view matrix from camera data
pub fn build_view_matrix(camera: &OrbitCameraData) -> Matrix4<f32> {
    Matrix4::look_at_rh(camera_position(camera), camera.target, WORLD_UP)
}

/// Build projection matrix from camera data
pub fn build_projection_matrix(camera: &OrbitCameraData) -> Matrix4<f32> {
    cgmath::perspective(
        Deg(camera.fov_degrees),
        camera.aspect_ratio,
        camera.near_plane,
        camera.far_plane,
    )
}

/// Inverse of `projection * view`, used to unproject cursor positions
pub fn build_inverse_view_projection(camera: &OrbitCameraData) -> Option<Matrix4<f32>> {
    (build_projection_matrix(camera) * build_view_matrix(camera)).invert()
}

// ============================================================================
// UPDATES
// ============================================================================

/// Update aspect ratio (e.g., on window resize). Zero sizes are ignored.
pub fn update_aspect_ratio(camera: &OrbitCameraData, width: u32, height: u32) -> OrbitCameraData {
    let mut new_camera = *camera;
    if width > 0 && height > 0 {
        new_camera.aspect_ratio = width as f32 / height as f32;
    }
    new_camera
}

// ============================================================================
// MOVEMENT
// ============================================================================

/// Rotate around the target by a mouse drag (pixels)
pub fn orbit(camera: &OrbitCameraData, dx: f32, dy: f32) -> OrbitCameraData {
    let mut new_camera = *camera;
    let scale = ROTATE_SCALE * camera.mouse_sensitivity;
    new_camera.yaw_radians += dx * scale;
    new_camera.pitch_radians = (new_camera.pitch_radians + dy * scale).clamp(-PITCH_LIMIT, PITCH_LIMIT);

    if new_camera.yaw_radians.abs() > TAU {
        new_camera.yaw_radians = 0.0;
    }
    new_camera
}

/// Move toward or away from the target by wheel ticks
pub fn zoom(camera: &OrbitCameraData, wheel: f32) -> OrbitCameraData {
    let mut new_camera = *camera;
    new_camera.radius = (camera.radius - wheel * ZOOM_SCALE * camera.scroll_sensitivity).max(MIN_RADIUS);
    new_camera
}

/// Slide the target in the view plane by a mouse drag (pixels)
///
/// Pan speed scales with distance so the target tracks the cursor at any zoom.
pub fn pan(camera: &OrbitCameraData, dx: f32, dy: f32) -> OrbitCameraData {
    let right = calculate_right_vector(camera);
    let up = calculate_up_vector(camera);
    let mut new_camera = *camera;
    new_camera.target += (right * -dx + up * dy) * (PAN_SCALE * camera.radius);
    new_camera
}

// ============================================================================
// PICKING
// ============================================================================

/// Unproject a cursor position into a normalized world-space direction
///
/// # Arguments
/// * `mouse_pos` - Cursor in pixels, origin top-left; sampled at the pixel centre
/// * `viewport_size` - Viewport in pixels
/// * `inv_view_proj` - Inverse of `projection * view`
///
/// # Returns
/// None for an empty viewport or a degenerate matrix
pub fn screen_to_ray_direction(
    mouse_pos: Vector2<f32>,
    viewport_size: Vector2<f32>,
    inv_view_proj: &Matrix4<f32>,
) -> Option<Vector3<f32>> {
    if viewport_size.x <= 0.0 || viewport_size.y <= 0.0 {
        return None;
    }

    let ndc_x = (mouse_pos.x + 0.5) / viewport_size.x * 2.0 - 1.0;
    let ndc_y = 1.0 - (mouse_pos.y + 0.5) / viewport_size.y * 2.0;

    let unproject = |z: f32| {
        let p = *inv_view_proj * Vector4::new(ndc_x, ndc_y, z, 1.0);
        (p.w.abs() > f32::EPSILON).then(|| Vector3::new(p.x / p.w, p.y / p.w, p.z / p.w))
    };
    let near = unproject(-1.0)?;
    let far = unproject(1.0)?;

    let direction = far - near;
    (direction.magnitude2() > 0.0).then(|| direction.normalize())
}

/// Ray from the camera eye through a cursor position
pub fn screen_to_ray(
    camera: &OrbitCameraData,
    mouse_pos: Vector2<f32>,
    viewport_size: Vector2<f32>,
) -> Option<Ray> {
    let inv_view_proj = build_inverse_view_projection(camera)?;
    let direction = screen_to_ray_direction(mouse_pos, viewport_size, &inv_view_proj)?;
    Some(Ray::new(camera_position(camera), direction))
}

// ============================================================================
// UTILITIES
// ============================================================================

/// Camera right vector in world space
pub fn calculate_right_vector(camera: &OrbitCameraData) -> Vector3<f32> {
    let forward = (camera.target - camera_position(camera)).normalize();
    forward.cross(WORLD_UP).normalize()
}

/// Camera up vector in world space
pub fn calculate_up_vector(camera: &OrbitCameraData) -> Vector3<f32> {
    let forward = (camera.target - camera_position(camera)).normalize();
    calculate_right_vector(camera).cross(forward).normalize()
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

/// Log camera context for debugging
pub fn log_camera_context(camera: &OrbitCameraData) {
    let eye = camera_position(camera);
    log::debug!(
        "[Camera] Eye: ({:.2}, {:.2}, {:.2}) | Target: ({:.2}, {:.2}, {:.2}) | Radius: {:.2}",
        eye.x,
        eye.y,
        eye.z,
        camera.target.x,
        camera.target.y,
        camera.target.z,
        camera.radius
    );
    log::debug!(
        "[Camera] Yaw: {:.3}rad ({:.1}°) | Pitch: {:.3}rad ({:.1}°) | FOV: {:.1}°",
        camera.yaw_radians,
        camera.yaw_radians.to_degrees(),
        camera.pitch_radians,
        camera.pitch_radians.to_degrees(),
        camera.fov_degrees
    );
}
