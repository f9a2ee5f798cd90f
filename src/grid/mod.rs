//! Voxel grid: dense scalar storage, brick occupancy and raycasting
//!
//! Data-oriented layout:
//! - grid_data.rs / brick_data.rs: plain data
//! - grid_operations.rs / brick_operations.rs / raycast_operations.rs: pure functions

pub mod brick_data;
pub mod brick_operations;
pub mod core;
pub mod error;
pub mod grid_data;
pub mod grid_operations;
pub mod raycast_operations;

pub use brick_data::BrickOccupancyData;
pub use core::{BlockFace, HitInfo, Ray, VoxelPos, WorldBounds};
pub use error::{GridError, GridResult};
pub use grid_data::{DirtyRegion, GridDescriptor, VoxelGridData};

pub use brick_operations::{
    brick_dimensions, brick_index, brick_is_occupied, occupied_brick_count, recompute_all_bricks,
    recompute_brick, recompute_bricks_in_region,
};
pub use grid_operations::{
    clear_grid, count_occupied, create_grid, dequantize_value, dump_raw, get_size, get_voxel,
    grid_checksum, in_bounds, is_empty_value, is_occupied, load_raw, log_grid_stats,
    quantize_value, resize, set_region, set_voxel, set_voxels_batch, validate_grid_data,
    voxel_count, voxel_index,
};
pub use raycast_operations::{
    grid_world_bounds, intersect_bounds, raycast, raycast_from_screen, raycast_with_limit,
    safe_inverse_direction, BoundsIntersection,
};
