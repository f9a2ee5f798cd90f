/// Camera Module - Data-Oriented Programming (DOP) style
///
/// This module follows pure DOP principles:
/// - camera_data.rs: Pure data structures with NO methods
/// - camera_operations.rs: Pure functions that operate on data
///

pub mod camera_data;
pub mod camera_operations;

// Re-export data structures
pub use camera_data::OrbitCameraData;

// Re-export all operations
pub use camera_operations::{
    // Initialization
    init_orbit_camera,

    // View/projection
    build_inverse_view_projection,
    build_projection_matrix,
    build_view_matrix,
    camera_position,

    // Updates
    update_aspect_ratio,

    // Movement
    orbit,
    pan,
    zoom,

    // Picking
    screen_to_ray,
    screen_to_ray_direction,

    // Utilities
    calculate_right_vector,
    calculate_up_vector,

    // Diagnostics
    log_camera_context,
};
