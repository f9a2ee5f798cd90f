//! Grid error types

use super::core::VoxelPos;

pub type GridResult<T> = Result<T, GridError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("Invalid grid dimensions {width}x{height}x{depth}")]
    InvalidDimensions { width: u32, height: u32, depth: u32 },

    #[error("Invalid brick size: {0}")]
    InvalidBrickSize(u32),

    #[error("Data size mismatch: expected {expected} values, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Invalid region {min} .. {max}: inverted or too large")]
    InvalidRegion { min: VoxelPos, max: VoxelPos },

    #[error("Occupancy out of sync at brick ({0}, {1}, {2})")]
    OccupancyMismatch(u32, u32, u32),
}
