//! Upload data structures - pure data

use static_assertions::const_assert_eq;

pub type UploadResult<T> = Result<T, UploadError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UploadError {
    #[error("Upload region {offset:?} + {size:?} exceeds volume {volume:?}")]
    RegionOutOfBounds {
        offset: [u32; 3],
        size: [u32; 3],
        volume: [u32; 3],
    },

    #[error("GPU upload '{operation}' failed: {error}")]
    Backend { operation: String, error: String },
}

/// Grid uniform buffer data for GPU
/// Must match shader layout exactly
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GridUniform {
    /// Grid size (vec3 + 1.0)
    pub grid_size: [f32; 4],

    /// Brick counts (vec3) + brick size; all zero without an occupancy summary
    pub brick_grid: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<GridUniform>(), 32);
