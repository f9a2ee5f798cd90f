//! Voxel grid data structures - Pure DOP
//!
//! NO behaviour here. All mutation goes through grid_operations.rs so the
//! occupancy summary can never fall out of step with the voxels.

use super::brick_data::BrickOccupancyData;
use super::core::VoxelPos;
use crate::constants::grid::{DEFAULT_BRICK_SIZE, DEFAULT_GRID_DIM};

/// Dense scalar voxel grid
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGridData {
    pub width: u32,
    pub height: u32,
    pub depth: u32,

    /// `width * height * depth` values, index `z * width * height + y * width + x`.
    /// Values <= EMPTY_EPSILON are empty, others are `palette_index / 255`.
    pub voxels: Vec<f32>,

    /// Optional brick occupancy summary
    pub bricks: Option<BrickOccupancyData>,
}

/// Parameters for creating a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDescriptor {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    /// `None` disables the occupancy summary
    pub brick_size: Option<u32>,
}

impl Default for GridDescriptor {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_DIM,
            height: DEFAULT_GRID_DIM,
            depth: DEFAULT_GRID_DIM,
            brick_size: Some(DEFAULT_BRICK_SIZE),
        }
    }
}

/// Voxel box touched by a mutation, half-open `[min, max)` and clipped to the grid.
/// Consumed by the upload layer to decide what to push to the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRegion {
    pub min: VoxelPos,
    pub max: VoxelPos,
    /// Storage was reallocated or replaced; re-upload everything
    pub full_volume: bool,
    /// At least one brick flipped state
    pub occupancy_changed: bool,
}

impl DirtyRegion {
    pub fn single(pos: VoxelPos, occupancy_changed: bool) -> Self {
        Self {
            min: pos,
            max: VoxelPos::new(pos.x + 1, pos.y + 1, pos.z + 1),
            full_volume: false,
            occupancy_changed,
        }
    }

    pub fn whole_grid(width: u32, height: u32, depth: u32) -> Self {
        Self {
            min: VoxelPos::default(),
            max: VoxelPos::new(width as i32, height as i32, depth as i32),
            full_volume: true,
            occupancy_changed: true,
        }
    }

    /// Extent per axis
    pub fn size(&self) -> (u32, u32, u32) {
        (
            (self.max.x - self.min.x).max(0) as u32,
            (self.max.y - self.min.y).max(0) as u32,
            (self.max.z - self.min.z).max(0) as u32,
        )
    }

    pub fn volume(&self) -> usize {
        let (x, y, z) = self.size();
        x as usize * y as usize * z as usize
    }

    pub fn contains(&self, pos: VoxelPos) -> bool {
        pos.x >= self.min.x
            && pos.y >= self.min.y
            && pos.z >= self.min.z
            && pos.x < self.max.x
            && pos.y < self.max.y
            && pos.z < self.max.z
    }

    /// Smallest region covering both
    pub fn merge(&self, other: &DirtyRegion) -> DirtyRegion {
        DirtyRegion {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            full_volume: self.full_volume || other.full_volume,
            occupancy_changed: self.occupancy_changed || other.occupancy_changed,
        }
    }
}
