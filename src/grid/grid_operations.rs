//! Voxel Grid Operations - Pure DOP Functions
//!
//! This is the PUBLIC API for voxel storage.
//! Every mutation keeps the brick occupancy summary in step with the voxels
//! and reports the touched region so callers can forward it to the GPU.

use super::brick_operations::{
    create_brick_occupancy, mark_voxel_written, occupied_brick_count, recompute_all_bricks,
    recompute_bricks_in_region,
};
use super::core::VoxelPos;
use super::error::{GridError, GridResult};
use super::grid_data::{DirtyRegion, GridDescriptor, VoxelGridData};
use crate::constants::voxel::{EMPTY_EPSILON, ERASE_SENTINEL, PALETTE_SCALE};

// ============================================================================
// CREATION
// ============================================================================

/// Create a zero-filled grid
///
/// # Arguments
/// * `descriptor` - Dimensions and optional brick size
///
/// # Returns
/// The new grid, or an error for zero dimensions / zero brick size
pub fn create_grid(descriptor: &GridDescriptor) -> GridResult<VoxelGridData> {
    let GridDescriptor {
        width,
        height,
        depth,
        brick_size,
    } = *descriptor;
    validate_dimensions(width, height, depth)?;

    let bricks = brick_size
        .map(|size| create_brick_occupancy(size, width, height, depth))
        .transpose()?;

    log::info!(
        "[VoxelGrid] Created {}x{}x{} grid (bricks: {:?})",
        width,
        height,
        depth,
        brick_size
    );

    Ok(VoxelGridData {
        width,
        height,
        depth,
        voxels: vec![0.0; width as usize * height as usize * depth as usize],
        bricks,
    })
}

fn validate_dimensions(width: u32, height: u32, depth: u32) -> GridResult<()> {
    if width == 0 || height == 0 || depth == 0 {
        return Err(GridError::InvalidDimensions {
            width,
            height,
            depth,
        });
    }
    Ok(())
}

// ============================================================================
// VOXEL QUERIES
// ============================================================================

#[inline]
pub(crate) fn linear_index(width: u32, height: u32, x: u32, y: u32, z: u32) -> usize {
    z as usize * width as usize * height as usize + y as usize * width as usize + x as usize
}

/// Grid dimensions as (width, height, depth)
pub fn get_size(grid: &VoxelGridData) -> (u32, u32, u32) {
    (grid.width, grid.height, grid.depth)
}

pub fn voxel_count(grid: &VoxelGridData) -> usize {
    grid.voxels.len()
}

pub fn in_bounds(grid: &VoxelGridData, pos: VoxelPos) -> bool {
    pos.x >= 0
        && pos.y >= 0
        && pos.z >= 0
        && (pos.x as u32) < grid.width
        && (pos.y as u32) < grid.height
        && (pos.z as u32) < grid.depth
}

/// Flat storage index, or None outside the grid
pub fn voxel_index(grid: &VoxelGridData, pos: VoxelPos) -> Option<usize> {
    in_bounds(grid, pos)
        .then(|| linear_index(grid.width, grid.height, pos.x as u32, pos.y as u32, pos.z as u32))
}

/// Get voxel at position (pure function)
///
/// # Returns
/// Stored value, or 0.0 for any coordinate outside the grid
pub fn get_voxel(grid: &VoxelGridData, pos: VoxelPos) -> f32 {
    voxel_index(grid, pos).map(|i| grid.voxels[i]).unwrap_or(0.0)
}

/// True when a stored value counts as empty
#[inline]
pub fn is_empty_value(value: f32) -> bool {
    value.abs() <= EMPTY_EPSILON
}

pub fn is_occupied(grid: &VoxelGridData, pos: VoxelPos) -> bool {
    get_voxel(grid, pos) > EMPTY_EPSILON
}

// ============================================================================
// VOXEL MUTATION
// ============================================================================

/// Set a single voxel
///
/// # Arguments
/// * `grid` - Grid to modify
/// * `pos` - Voxel position; writes outside the grid are ignored
/// * `value` - New value; negative values (the erase sentinel) store 0
///
/// # Returns
/// The one-voxel dirty region, or None when nothing was written
pub fn set_voxel(grid: &mut VoxelGridData, pos: VoxelPos, value: f32) -> Option<DirtyRegion> {
    let index = voxel_index(grid, pos)?;
    let value = value.max(0.0);
    grid.voxels[index] = value;

    let occupancy_changed = mark_voxel_written(grid, pos, value);
    Some(DirtyRegion::single(pos, occupancy_changed))
}

/// Set many individual voxels, then refresh bricks once over their bounding box
///
/// Out-of-bounds entries are skipped. Returns None if nothing landed.
pub fn set_voxels_batch(grid: &mut VoxelGridData, writes: &[(VoxelPos, f32)]) -> Option<DirtyRegion> {
    let mut bounds: Option<(VoxelPos, VoxelPos)> = None;

    for &(pos, value) in writes {
        let Some(index) = voxel_index(grid, pos) else {
            continue;
        };
        grid.voxels[index] = value.max(0.0);

        let upper = VoxelPos::new(pos.x + 1, pos.y + 1, pos.z + 1);
        bounds = Some(match bounds {
            Some((min, max)) => (min.min(pos), max.max(upper)),
            None => (pos, upper),
        });
    }

    let (min, max) = bounds?;
    let occupancy_changed = recompute_bricks_in_region(grid, min, max);

    log::debug!(
        "[VoxelGrid] Batch wrote {} voxels in {} .. {}",
        writes.len(),
        min,
        max
    );

    Some(DirtyRegion {
        min,
        max,
        full_volume: false,
        occupancy_changed,
    })
}

/// Paint a block of values into `[aabb_min, aabb_max)`
///
/// `data` is laid out x-fastest over the box. Per in-bounds cell: the erase
/// sentinel clears to 0, otherwise the source is written only into empty cells.
/// Occupied cells are never overwritten. Cells outside the grid are skipped.
///
/// # Returns
/// * `Err(InvalidRegion)` if any max < min, or the box has more cells than `usize` holds
/// * `Err(SizeMismatch)` if `data` does not cover the box; nothing is written
/// * `Ok(None)` if the box lies entirely outside the grid
pub fn set_region(
    grid: &mut VoxelGridData,
    data: &[f32],
    aabb_min: VoxelPos,
    aabb_max: VoxelPos,
) -> GridResult<Option<DirtyRegion>> {
    if aabb_max.x < aabb_min.x || aabb_max.y < aabb_min.y || aabb_max.z < aabb_min.z {
        return Err(GridError::InvalidRegion {
            min: aabb_min,
            max: aabb_max,
        });
    }

    let Some((dx, dy, dz, expected)) = region_extent(aabb_min, aabb_max) else {
        log::warn!(
            "[VoxelGrid] set_region rejected: box {} .. {} is too large",
            aabb_min,
            aabb_max
        );
        return Err(GridError::InvalidRegion {
            min: aabb_min,
            max: aabb_max,
        });
    };
    if data.len() != expected {
        log::warn!(
            "[VoxelGrid] set_region rejected: expected {} values, got {}",
            expected,
            data.len()
        );
        return Err(GridError::SizeMismatch {
            expected,
            actual: data.len(),
        });
    }

    let clip_min = VoxelPos::new(aabb_min.x.max(0), aabb_min.y.max(0), aabb_min.z.max(0));
    let clip_max = VoxelPos::new(
        aabb_max.x.min(grid.width as i32),
        aabb_max.y.min(grid.height as i32),
        aabb_max.z.min(grid.depth as i32),
    );
    if clip_min.x >= clip_max.x || clip_min.y >= clip_max.y || clip_min.z >= clip_max.z {
        return Ok(None);
    }

    for z in clip_min.z..clip_max.z {
        for y in clip_min.y..clip_max.y {
            for x in clip_min.x..clip_max.x {
                let src_index = (z as i64 - aabb_min.z as i64) as usize * dy * dx
                    + (y as i64 - aabb_min.y as i64) as usize * dx
                    + (x as i64 - aabb_min.x as i64) as usize;
                let src = data[src_index];
                let dst_index = linear_index(grid.width, grid.height, x as u32, y as u32, z as u32);

                if src == ERASE_SENTINEL {
                    grid.voxels[dst_index] = 0.0;
                } else if is_empty_value(grid.voxels[dst_index]) {
                    grid.voxels[dst_index] = src.max(0.0);
                }
            }
        }
    }

    let occupancy_changed = recompute_bricks_in_region(grid, clip_min, clip_max);

    log::debug!(
        "[VoxelGrid] Region write {} .. {} (occupancy changed: {})",
        clip_min,
        clip_max,
        occupancy_changed
    );

    Ok(Some(DirtyRegion {
        min: clip_min,
        max: clip_max,
        full_volume: false,
        occupancy_changed,
    }))
}

/// Box extent per axis and its cell count, or None if the count overflows
fn region_extent(min: VoxelPos, max: VoxelPos) -> Option<(usize, usize, usize, usize)> {
    let dx = usize::try_from(max.x as i64 - min.x as i64).ok()?;
    let dy = usize::try_from(max.y as i64 - min.y as i64).ok()?;
    let dz = usize::try_from(max.z as i64 - min.z as i64).ok()?;
    let count = dx.checked_mul(dy)?.checked_mul(dz)?;
    Some((dx, dy, dz, count))
}

/// Clear every voxel to empty
pub fn clear_grid(grid: &mut VoxelGridData) -> DirtyRegion {
    grid.voxels.iter_mut().for_each(|v| *v = 0.0);
    recompute_all_bricks(grid);
    DirtyRegion::whole_grid(grid.width, grid.height, grid.depth)
}

// ============================================================================
// REALLOCATION
// ============================================================================

/// Resize the grid, keeping the overlapping sub-box
///
/// Voxels inside `min(old, new)` per axis keep their coordinates; everything
/// else is lost. The occupancy summary is rebuilt for the new size.
///
/// # Returns
/// `Ok(None)` if the size is unchanged, else a full-volume dirty region
pub fn resize(
    grid: &mut VoxelGridData,
    width: u32,
    height: u32,
    depth: u32,
) -> GridResult<Option<DirtyRegion>> {
    if (grid.width, grid.height, grid.depth) == (width, height, depth) {
        return Ok(None);
    }
    validate_dimensions(width, height, depth)?;

    let bricks = grid
        .bricks
        .as_ref()
        .map(|b| create_brick_occupancy(b.brick_size, width, height, depth))
        .transpose()?;

    let mut voxels = vec![0.0; width as usize * height as usize * depth as usize];
    let copy_w = grid.width.min(width);
    let copy_h = grid.height.min(height);
    let copy_d = grid.depth.min(depth);

    for z in 0..copy_d {
        for y in 0..copy_h {
            let src_row = linear_index(grid.width, grid.height, 0, y, z);
            let dst_row = linear_index(width, height, 0, y, z);
            voxels[dst_row..dst_row + copy_w as usize]
                .copy_from_slice(&grid.voxels[src_row..src_row + copy_w as usize]);
        }
    }

    log::info!(
        "[VoxelGrid] Resized {}x{}x{} -> {}x{}x{}",
        grid.width,
        grid.height,
        grid.depth,
        width,
        height,
        depth
    );

    grid.width = width;
    grid.height = height;
    grid.depth = depth;
    grid.voxels = voxels;
    grid.bricks = bricks;
    recompute_all_bricks(grid);

    Ok(Some(DirtyRegion::whole_grid(width, height, depth)))
}

/// Replace the whole grid from 8-bit palette indices
///
/// Fails without touching the grid when `bytes` does not hold exactly
/// `width * height * depth` entries.
pub fn load_raw(
    grid: &mut VoxelGridData,
    bytes: &[u8],
    width: u32,
    height: u32,
    depth: u32,
) -> GridResult<DirtyRegion> {
    validate_dimensions(width, height, depth)?;

    let expected = width as usize * height as usize * depth as usize;
    if bytes.len() != expected {
        return Err(GridError::SizeMismatch {
            expected,
            actual: bytes.len(),
        });
    }

    let bricks = grid
        .bricks
        .as_ref()
        .map(|b| create_brick_occupancy(b.brick_size, width, height, depth))
        .transpose()?;

    grid.width = width;
    grid.height = height;
    grid.depth = depth;
    grid.voxels = bytes.iter().map(|&b| dequantize_value(b)).collect();
    grid.bricks = bricks;
    recompute_all_bricks(grid);

    log::info!(
        "[VoxelGrid] Loaded raw volume {}x{}x{} ({} occupied)",
        width,
        height,
        depth,
        count_occupied(grid)
    );

    Ok(DirtyRegion::whole_grid(width, height, depth))
}

/// Quantize the whole grid to 8-bit palette indices in storage order
pub fn dump_raw(grid: &VoxelGridData) -> Vec<u8> {
    grid.voxels.iter().map(|&v| quantize_value(v)).collect()
}

/// Normalized value -> palette index byte
pub fn quantize_value(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * PALETTE_SCALE).round() as u8
}

/// Palette index byte -> normalized value
pub fn dequantize_value(byte: u8) -> f32 {
    byte as f32 / PALETTE_SCALE
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

pub fn count_occupied(grid: &VoxelGridData) -> usize {
    grid.voxels.iter().filter(|&&v| v > EMPTY_EPSILON).count()
}

/// CRC32 over dimensions and voxel bits
pub fn grid_checksum(grid: &VoxelGridData) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&grid.width.to_le_bytes());
    hasher.update(&grid.height.to_le_bytes());
    hasher.update(&grid.depth.to_le_bytes());
    hasher.update(bytemuck::cast_slice::<f32, u8>(&grid.voxels));
    hasher.finalize()
}

/// Log grid statistics
pub fn log_grid_stats(grid: &VoxelGridData) {
    log::info!(
        "[VoxelGrid] Size: {}x{}x{} | Occupied voxels: {}/{} | Occupied bricks: {}",
        grid.width,
        grid.height,
        grid.depth,
        count_occupied(grid),
        grid.voxels.len(),
        occupied_brick_count(grid)
    );
}

/// Validate grid invariants: storage length and occupancy consistency
pub fn validate_grid_data(grid: &VoxelGridData) -> GridResult<()> {
    let expected = grid.width as usize * grid.height as usize * grid.depth as usize;
    if grid.voxels.len() != expected {
        return Err(GridError::SizeMismatch {
            expected,
            actual: grid.voxels.len(),
        });
    }

    let Some(bricks) = grid.bricks.as_ref() else {
        return Ok(());
    };

    let mut expected_flags = vec![false; bricks.occupancy.len()];
    for z in 0..grid.depth {
        for y in 0..grid.height {
            for x in 0..grid.width {
                if grid.voxels[linear_index(grid.width, grid.height, x, y, z)] > EMPTY_EPSILON {
                    let (bx, by, bz) = (x / bricks.brick_size, y / bricks.brick_size, z / bricks.brick_size);
                    let index = bz as usize * bricks.bricks_x as usize * bricks.bricks_y as usize
                        + by as usize * bricks.bricks_x as usize
                        + bx as usize;
                    expected_flags[index] = true;
                }
            }
        }
    }

    for (index, (&flag, &occupied)) in bricks.occupancy.iter().zip(&expected_flags).enumerate() {
        if (flag != 0) != occupied {
            let per_layer = bricks.bricks_x as usize * bricks.bricks_y as usize;
            let bz = index / per_layer;
            let by = (index % per_layer) / bricks.bricks_x as usize;
            let bx = index % bricks.bricks_x as usize;
            return Err(GridError::OccupancyMismatch(bx as u32, by as u32, bz as u32));
        }
    }

    Ok(())
}
