//! Brick occupancy data - pure data
//!
//! A coarse summary of the voxel grid: one byte per brick of
//! `brick_size`^3 voxels, 0 when every voxel inside is empty and 255 otherwise.
//! Rebuilt from the voxel array, never the other way round.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrickOccupancyData {
    /// Edge length of a brick, in voxels
    pub brick_size: u32,

    /// Brick counts per axis, `ceil(dim / brick_size)`
    pub bricks_x: u32,
    pub bricks_y: u32,
    pub bricks_z: u32,

    /// Index `bz * bricks_x * bricks_y + by * bricks_x + bx`
    pub occupancy: Vec<u8>,
}
