//! Brick occupancy operations - Pure DOP functions
//!
//! Keeps the coarse occupancy summary consistent with the voxel array.
//! Single-voxel writes patch one brick incrementally; region writes and
//! reallocation recompute affected bricks from scratch.

use super::brick_data::BrickOccupancyData;
use super::core::VoxelPos;
use super::error::{GridError, GridResult};
use super::grid_data::VoxelGridData;
use super::grid_operations::linear_index;
use crate::constants::voxel::{BRICK_EMPTY, BRICK_OCCUPIED, EMPTY_EPSILON};

// ============================================================================
// CREATION
// ============================================================================

/// Brick counts per axis for a grid of the given size
pub fn brick_dimensions(brick_size: u32, width: u32, height: u32, depth: u32) -> (u32, u32, u32) {
    (
        width.div_ceil(brick_size),
        height.div_ceil(brick_size),
        depth.div_ceil(brick_size),
    )
}

/// Create an all-empty occupancy summary sized for the grid
pub fn create_brick_occupancy(
    brick_size: u32,
    width: u32,
    height: u32,
    depth: u32,
) -> GridResult<BrickOccupancyData> {
    if brick_size == 0 {
        return Err(GridError::InvalidBrickSize(brick_size));
    }

    let (bricks_x, bricks_y, bricks_z) = brick_dimensions(brick_size, width, height, depth);
    Ok(BrickOccupancyData {
        brick_size,
        bricks_x,
        bricks_y,
        bricks_z,
        occupancy: vec![BRICK_EMPTY; bricks_x as usize * bricks_y as usize * bricks_z as usize],
    })
}

// ============================================================================
// QUERIES
// ============================================================================

/// Flat index of a brick, or None outside the brick grid
pub fn brick_index(bricks: &BrickOccupancyData, bx: u32, by: u32, bz: u32) -> Option<usize> {
    if bx >= bricks.bricks_x || by >= bricks.bricks_y || bz >= bricks.bricks_z {
        return None;
    }
    Some(
        bz as usize * bricks.bricks_x as usize * bricks.bricks_y as usize
            + by as usize * bricks.bricks_x as usize
            + bx as usize,
    )
}

/// Brick containing an in-bounds voxel
pub fn brick_coord_of(bricks: &BrickOccupancyData, pos: VoxelPos) -> (u32, u32, u32) {
    (
        pos.x.max(0) as u32 / bricks.brick_size,
        pos.y.max(0) as u32 / bricks.brick_size,
        pos.z.max(0) as u32 / bricks.brick_size,
    )
}

/// Whether a brick is flagged occupied. Grids without a summary report false.
pub fn brick_is_occupied(grid: &VoxelGridData, bx: u32, by: u32, bz: u32) -> bool {
    grid.bricks
        .as_ref()
        .and_then(|b| brick_index(b, bx, by, bz).map(|i| b.occupancy[i] != BRICK_EMPTY))
        .unwrap_or(false)
}

/// Number of bricks flagged occupied
pub fn occupied_brick_count(grid: &VoxelGridData) -> usize {
    grid.bricks
        .as_ref()
        .map(|b| b.occupancy.iter().filter(|&&o| o != BRICK_EMPTY).count())
        .unwrap_or(0)
}

/// Scan every voxel in a brick; true if any is occupied
fn scan_brick(grid: &VoxelGridData, bricks: &BrickOccupancyData, bx: u32, by: u32, bz: u32) -> bool {
    let bs = bricks.brick_size;
    let x_end = ((bx + 1) * bs).min(grid.width);
    let y_end = ((by + 1) * bs).min(grid.height);
    let z_end = ((bz + 1) * bs).min(grid.depth);

    for z in bz * bs..z_end {
        for y in by * bs..y_end {
            for x in bx * bs..x_end {
                let index = linear_index(grid.width, grid.height, x, y, z);
                if grid.voxels[index] > EMPTY_EPSILON {
                    return true;
                }
            }
        }
    }
    false
}

// ============================================================================
// UPDATES
// ============================================================================

/// Recompute one brick from its voxels
///
/// # Returns
/// true if the brick's flag changed
pub fn recompute_brick(grid: &mut VoxelGridData, bx: u32, by: u32, bz: u32) -> bool {
    let Some(mut bricks) = grid.bricks.take() else {
        return false;
    };

    let changed = match brick_index(&bricks, bx, by, bz) {
        Some(index) => {
            let flag = if scan_brick(grid, &bricks, bx, by, bz) {
                BRICK_OCCUPIED
            } else {
                BRICK_EMPTY
            };
            let changed = bricks.occupancy[index] != flag;
            bricks.occupancy[index] = flag;
            changed
        }
        None => false,
    };

    grid.bricks = Some(bricks);
    changed
}

/// Recompute every brick overlapping the half-open voxel box `[min, max)`
///
/// The box is clipped to the grid first; an empty clip touches nothing.
pub fn recompute_bricks_in_region(grid: &mut VoxelGridData, min: VoxelPos, max: VoxelPos) -> bool {
    let Some(brick_size) = grid.bricks.as_ref().map(|b| b.brick_size) else {
        return false;
    };

    let lo_x = min.x.max(0) as u32;
    let lo_y = min.y.max(0) as u32;
    let lo_z = min.z.max(0) as u32;
    let hi_x = (max.x.max(0) as u32).min(grid.width);
    let hi_y = (max.y.max(0) as u32).min(grid.height);
    let hi_z = (max.z.max(0) as u32).min(grid.depth);
    if lo_x >= hi_x || lo_y >= hi_y || lo_z >= hi_z {
        return false;
    }

    let mut changed = false;
    for bz in lo_z / brick_size..=(hi_z - 1) / brick_size {
        for by in lo_y / brick_size..=(hi_y - 1) / brick_size {
            for bx in lo_x / brick_size..=(hi_x - 1) / brick_size {
                changed |= recompute_brick(grid, bx, by, bz);
            }
        }
    }
    changed
}

/// Recompute the entire summary
pub fn recompute_all_bricks(grid: &mut VoxelGridData) -> bool {
    let max = VoxelPos::new(grid.width as i32, grid.height as i32, grid.depth as i32);
    recompute_bricks_in_region(grid, VoxelPos::default(), max)
}

/// Patch the brick holding `pos` after a single voxel write
///
/// An occupied value flags the brick at once. An empty value forces a full
/// rescan of that brick, since other voxels may still hold it occupied.
pub fn mark_voxel_written(grid: &mut VoxelGridData, pos: VoxelPos, value: f32) -> bool {
    let Some((bx, by, bz)) = grid.bricks.as_ref().map(|b| brick_coord_of(b, pos)) else {
        return false;
    };

    if value > EMPTY_EPSILON {
        let Some(bricks) = grid.bricks.as_mut() else {
            return false;
        };
        match brick_index(bricks, bx, by, bz) {
            Some(index) => {
                let changed = bricks.occupancy[index] != BRICK_OCCUPIED;
                bricks.occupancy[index] = BRICK_OCCUPIED;
                changed
            }
            None => false,
        }
    } else {
        recompute_brick(grid, bx, by, bz)
    }
}
