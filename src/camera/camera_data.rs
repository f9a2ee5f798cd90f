//! Camera data structures - Pure DOP
//!
//! NO METHODS. Just data.
//! All transformations happen in camera_operations.rs

use cgmath::Point3;

/// Orbit camera circling a target point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCameraData {
    /// Point the camera orbits and looks at
    pub target: Point3<f32>,

    /// Distance from target
    pub radius: f32,

    /// Elevation (radians), kept inside +/- 0.999 * PI/2
    pub pitch_radians: f32,

    /// Azimuth around Y (radians)
    pub yaw_radians: f32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Aspect ratio (width / height)
    pub aspect_ratio: f32,

    /// Near clipping plane distance
    pub near_plane: f32,

    /// Far clipping plane distance
    pub far_plane: f32,

    /// Multiplier on mouse-drag rotation
    pub mouse_sensitivity: f32,

    /// Multiplier on wheel zoom
    pub scroll_sensitivity: f32,
}

impl Default for OrbitCameraData {
    fn default() -> Self {
        Self {
            target: Point3::new(0.0, 1.0, 0.0),
            radius: 5.0,
            pitch_radians: 0.0,
            yaw_radians: 0.0,
            fov_degrees: 45.0,
            aspect_ratio: 16.0 / 9.0,
            near_plane: 0.01,
            far_plane: 100.0,
            mouse_sensitivity: 1.0,
            scroll_sensitivity: 5.0,
        }
    }
}
