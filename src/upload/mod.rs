//! GPU upload adapter
//!
//! The crate never owns GPU resources. A renderer implements
//! `VolumeUploader` and receives texel payloads for whatever a grid
//! mutation reported as dirty.

pub mod upload_data;
pub mod upload_operations;

pub use upload_data::{GridUniform, UploadError, UploadResult};
pub use upload_operations::{
    build_grid_uniform, extract_occupancy_region, extract_region, sync_dirty_region,
    VolumeUploader,
};
