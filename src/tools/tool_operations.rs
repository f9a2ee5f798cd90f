//! Tool operations - Pure DOP functions
//!
//! Every tool takes a raycast hit plus the currently selected palette value
//! and turns it into grid writes. Tools hold no state of their own beyond
//! `ToolState`.

use super::tool_data::{BucketMode, ToolAction, ToolKind, ToolState};
use crate::constants::tools::{MAX_BRUSH_RADIUS, MIN_BRUSH_RADIUS};
use crate::constants::voxel::ERASE_SENTINEL;
use crate::grid::{
    get_voxel, in_bounds, is_empty_value, quantize_value, set_region, set_voxel, set_voxels_batch,
    voxel_index, DirtyRegion, GridError, HitInfo, VoxelGridData, VoxelPos,
};
use std::collections::VecDeque;

pub type ToolResult<T> = Result<T, ToolError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    #[error("Grid rejected tool edit: {0}")]
    Grid(#[from] GridError),
}

// ============================================================================
// SETTINGS
// ============================================================================

pub fn select_tool(state: &ToolState, kind: ToolKind) -> ToolState {
    ToolState {
        selected: kind,
        ..*state
    }
}

/// Set brush radius, clamped to the supported range
pub fn set_brush_radius(state: &ToolState, radius: u32) -> ToolState {
    ToolState {
        brush_radius: radius.clamp(MIN_BRUSH_RADIUS, MAX_BRUSH_RADIUS),
        ..*state
    }
}

pub fn set_bucket_mode(state: &ToolState, mode: BucketMode) -> ToolState {
    ToolState {
        bucket_mode: mode,
        ..*state
    }
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Apply the selected tool at a hit
///
/// # Arguments
/// * `grid` - Grid to edit
/// * `hit` - Raycast result under the cursor
/// * `state` - Tool selection and settings
/// * `selected_value` - Normalized palette value to paint with
/// * `action` - Primary (add/paint) or secondary (remove)
///
/// # Returns
/// The region that changed, or None if the tool did nothing
pub fn apply_tool(
    grid: &mut VoxelGridData,
    hit: &HitInfo,
    state: &ToolState,
    selected_value: f32,
    action: ToolAction,
) -> ToolResult<Option<DirtyRegion>> {
    log::debug!(
        "[Tools] {} {:?} at {} (edge: {})",
        state.selected.name(),
        action,
        hit.voxel,
        hit.is_edge_hit
    );

    match state.selected {
        ToolKind::Pencil => Ok(use_pencil(grid, hit, selected_value, action)),
        ToolKind::Brush => use_brush(grid, hit, state.brush_radius, selected_value, action),
        ToolKind::Bucket => Ok(use_bucket(grid, hit, state.bucket_mode, selected_value, action)),
    }
}

// ============================================================================
// PENCIL
// ============================================================================

/// Single-voxel edit
///
/// Primary places in front of the hit face (or on the traversed voxel for an
/// edge hit). Secondary clears the hit voxel.
pub fn use_pencil(
    grid: &mut VoxelGridData,
    hit: &HitInfo,
    selected_value: f32,
    action: ToolAction,
) -> Option<DirtyRegion> {
    match action {
        ToolAction::Primary => set_voxel(grid, hit.placement_target(), selected_value),
        ToolAction::Secondary => set_voxel(grid, hit.voxel, 0.0),
    }
}

// ============================================================================
// BRUSH
// ============================================================================

/// Build a sphere stamp around `center`, clipped to the grid
///
/// Cells within euclidean distance `radius` of the centre carry `fill`,
/// the rest of the cube carry 0 so region merging leaves them alone.
///
/// # Returns
/// (data, min, max) with `max` exclusive, or None if the cube misses the grid
pub fn brush_stamp(
    grid: &VoxelGridData,
    center: VoxelPos,
    radius: u32,
    fill: f32,
) -> Option<(Vec<f32>, VoxelPos, VoxelPos)> {
    let r = radius as i32;
    let min = VoxelPos::new((center.x - r).max(0), (center.y - r).max(0), (center.z - r).max(0));
    let max = VoxelPos::new(
        (center.x + r + 1).min(grid.width as i32),
        (center.y + r + 1).min(grid.height as i32),
        (center.z + r + 1).min(grid.depth as i32),
    );
    if min.x >= max.x || min.y >= max.y || min.z >= max.z {
        return None;
    }

    let radius_sq = (r as i64) * (r as i64);
    let mut data = Vec::with_capacity(
        ((max.x - min.x) * (max.y - min.y) * (max.z - min.z)) as usize,
    );
    for z in min.z..max.z {
        for y in min.y..max.y {
            for x in min.x..max.x {
                let inside = VoxelPos::new(x, y, z).distance_squared(center) <= radius_sq;
                data.push(if inside { fill } else { 0.0 });
            }
        }
    }

    Some((data, min, max))
}

/// Sphere edit centred in front of the hit face
///
/// Primary paints `selected_value` into empty cells of the sphere.
/// Secondary erases every cell of the sphere.
pub fn use_brush(
    grid: &mut VoxelGridData,
    hit: &HitInfo,
    radius: u32,
    selected_value: f32,
    action: ToolAction,
) -> ToolResult<Option<DirtyRegion>> {
    let radius = radius.clamp(MIN_BRUSH_RADIUS, MAX_BRUSH_RADIUS);
    let fill = match action {
        ToolAction::Primary => selected_value,
        ToolAction::Secondary => ERASE_SENTINEL,
    };

    let Some((data, min, max)) = brush_stamp(grid, hit.placement_target(), radius, fill) else {
        return Ok(None);
    };
    Ok(set_region(grid, &data, min, max)?)
}

// ============================================================================
// BUCKET
// ============================================================================

/// Breadth-first flood over 6-connected neighbours
///
/// Collects every in-bounds cell reachable from `seed` through cells that
/// satisfy `accept`. The seed itself must satisfy it.
pub fn flood_region<F>(grid: &VoxelGridData, seed: VoxelPos, accept: F) -> Vec<VoxelPos>
where
    F: Fn(f32) -> bool,
{
    let Some(seed_index) = voxel_index(grid, seed) else {
        return Vec::new();
    };
    if !accept(grid.voxels[seed_index]) {
        return Vec::new();
    }

    let mut visited = vec![false; grid.voxels.len()];
    let mut queue = VecDeque::new();
    let mut region = Vec::new();
    visited[seed_index] = true;
    queue.push_back(seed);

    while let Some(pos) = queue.pop_front() {
        region.push(pos);
        for next in pos.neighbors() {
            let Some(index) = voxel_index(grid, next) else {
                continue;
            };
            if !visited[index] && accept(grid.voxels[index]) {
                visited[index] = true;
                queue.push_back(next);
            }
        }
    }

    region
}

/// Flood fill
///
/// * Primary + PlaceVoxels: fill the empty space connected to the placement target
/// * Primary + FillColor: recolour the connected region matching the hit voxel
/// * Secondary: clear the connected region matching the hit voxel
pub fn use_bucket(
    grid: &mut VoxelGridData,
    hit: &HitInfo,
    mode: BucketMode,
    selected_value: f32,
    action: ToolAction,
) -> Option<DirtyRegion> {
    let (seed, new_value) = match (action, mode) {
        (ToolAction::Primary, BucketMode::PlaceVoxels) => {
            if is_empty_value(selected_value) {
                return None;
            }
            (hit.placement_target(), selected_value)
        }
        (ToolAction::Primary, BucketMode::FillColor) => (hit.voxel, selected_value),
        (ToolAction::Secondary, _) => (hit.voxel, 0.0),
    };
    if !in_bounds(grid, seed) {
        return None;
    }

    let region = if action == ToolAction::Primary && mode == BucketMode::PlaceVoxels {
        flood_region(grid, seed, is_empty_value)
    } else {
        let seed_value = get_voxel(grid, seed);
        if hit.is_edge_hit || is_empty_value(seed_value) {
            return None;
        }
        let seed_index = quantize_value(seed_value);
        if quantize_value(new_value) == seed_index && !is_empty_value(new_value) {
            return None;
        }
        flood_region(grid, seed, |v| !is_empty_value(v) && quantize_value(v) == seed_index)
    };

    if region.is_empty() {
        return None;
    }

    log::debug!("[Tools] Bucket {:?} touched {} voxels", mode, region.len());

    let writes: Vec<(VoxelPos, f32)> = region.into_iter().map(|p| (p, new_value)).collect();
    set_voxels_batch(grid, &writes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{
        count_occupied, create_grid, grid_checksum, validate_grid_data, BlockFace, GridDescriptor,
    };

    fn grid(size: u32) -> VoxelGridData {
        create_grid(&GridDescriptor {
            width: size,
            height: size,
            depth: size,
            brick_size: Some(8),
        })
        .expect("valid grid")
    }

    fn hit(voxel: VoxelPos, face: Option<BlockFace>, is_edge_hit: bool) -> HitInfo {
        HitInfo {
            voxel,
            face,
            palette_value: 0.0,
            is_edge_hit,
        }
    }

    #[test]
    fn test_tool_names() {
        let names: Vec<_> = ToolKind::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names, ["Pencil", "Bucket", "Brush"]);
    }

    #[test]
    fn test_brush_radius_clamped() {
        let state = ToolState::default();
        assert_eq!(state.brush_radius, 4);
        assert_eq!(set_brush_radius(&state, 0).brush_radius, 1);
        assert_eq!(set_brush_radius(&state, 40).brush_radius, 6);
        assert_eq!(set_brush_radius(&state, 3).brush_radius, 3);
    }

    #[test]
    fn test_pencil_places_in_front_of_face() {
        let mut g = grid(8);
        set_voxel(&mut g, VoxelPos::new(4, 4, 4), 0.2);
        let h = hit(VoxelPos::new(4, 4, 4), Some(BlockFace::Top), false);

        let region = use_pencil(&mut g, &h, 0.5, ToolAction::Primary).expect("placed");
        assert_eq!(region.min, VoxelPos::new(4, 5, 4));
        assert_eq!(get_voxel(&g, VoxelPos::new(4, 5, 4)), 0.5);
        assert_eq!(get_voxel(&g, VoxelPos::new(4, 4, 4)), 0.2);
    }

    #[test]
    fn test_pencil_edge_hit_places_on_voxel() {
        let mut g = grid(8);
        let h = hit(VoxelPos::new(4, 4, 7), Some(BlockFace::Back), true);
        use_pencil(&mut g, &h, 0.5, ToolAction::Primary).expect("placed");
        assert_eq!(get_voxel(&g, VoxelPos::new(4, 4, 7)), 0.5);
        assert_eq!(count_occupied(&g), 1);
    }

    #[test]
    fn test_pencil_secondary_clears_hit() {
        let mut g = grid(8);
        set_voxel(&mut g, VoxelPos::new(1, 2, 3), 0.7);
        let h = hit(VoxelPos::new(1, 2, 3), Some(BlockFace::Right), false);
        use_pencil(&mut g, &h, 0.5, ToolAction::Secondary).expect("cleared");
        assert_eq!(count_occupied(&g), 0);
    }

    #[test]
    fn test_pencil_outside_grid_is_noop() {
        let mut g = grid(8);
        set_voxel(&mut g, VoxelPos::new(0, 0, 0), 0.7);
        let before = grid_checksum(&g);
        let h = hit(VoxelPos::new(0, 0, 0), Some(BlockFace::Left), false);
        assert!(use_pencil(&mut g, &h, 0.5, ToolAction::Primary).is_none());
        assert_eq!(grid_checksum(&g), before);
    }

    #[test]
    fn test_brush_paints_sphere() {
        let mut g = grid(16);
        let h = hit(VoxelPos::new(8, 8, 8), None, true);

        use_brush(&mut g, &h, 1, 0.5, ToolAction::Primary).expect("valid stamp");
        assert_eq!(count_occupied(&g), 7);

        let mut g = grid(16);
        use_brush(&mut g, &h, 2, 0.5, ToolAction::Primary).expect("valid stamp");
        assert_eq!(count_occupied(&g), 33);
        validate_grid_data(&g).expect("consistent");
    }

    #[test]
    fn test_brush_keeps_occupied_cells() {
        let mut g = grid(16);
        set_voxel(&mut g, VoxelPos::new(8, 9, 8), 0.9);
        let h = hit(VoxelPos::new(8, 8, 8), None, true);
        use_brush(&mut g, &h, 1, 0.5, ToolAction::Primary).expect("valid stamp");
        assert_eq!(get_voxel(&g, VoxelPos::new(8, 9, 8)), 0.9);
        assert_eq!(count_occupied(&g), 7);
    }

    #[test]
    fn test_brush_secondary_erases_sphere() {
        let mut g = grid(8);
        g.voxels.iter_mut().for_each(|v| *v = 0.5);
        crate::grid::recompute_all_bricks(&mut g);

        let h = hit(VoxelPos::new(4, 4, 4), Some(BlockFace::Top), false);
        let region = use_brush(&mut g, &h, 1, 0.5, ToolAction::Secondary)
            .expect("valid stamp")
            .expect("inside grid");
        assert_eq!(region.min, VoxelPos::new(3, 4, 3));
        assert_eq!(count_occupied(&g), 512 - 7);
        assert_eq!(get_voxel(&g, VoxelPos::new(4, 4, 4)), 0.0);
    }

    #[test]
    fn test_brush_clipped_at_corner() {
        let mut g = grid(8);
        let h = hit(VoxelPos::new(0, 0, 0), None, true);
        let region = use_brush(&mut g, &h, 1, 0.5, ToolAction::Primary)
            .expect("valid stamp")
            .expect("inside grid");
        assert_eq!(region.min, VoxelPos::new(0, 0, 0));
        assert_eq!(region.max, VoxelPos::new(2, 2, 2));
        assert_eq!(count_occupied(&g), 4);
    }

    #[test]
    fn test_brush_stamp_outside_grid() {
        let g = grid(8);
        assert!(brush_stamp(&g, VoxelPos::new(20, 20, 20), 2, 0.5).is_none());
    }

    #[test]
    fn test_bucket_fills_enclosed_space() {
        let mut g = grid(8);
        // Wall at x == 3 splits the grid in two
        for z in 0..8 {
            for y in 0..8 {
                set_voxel(&mut g, VoxelPos::new(3, y, z), 0.2);
            }
        }
        let h = hit(VoxelPos::new(3, 4, 4), Some(BlockFace::Left), false);
        use_bucket(&mut g, &h, BucketMode::PlaceVoxels, 0.5, ToolAction::Primary).expect("filled");

        assert_eq!(get_voxel(&g, VoxelPos::new(0, 0, 0)), 0.5);
        assert_eq!(get_voxel(&g, VoxelPos::new(5, 0, 0)), 0.0);
        assert_eq!(count_occupied(&g), 64 + 3 * 64);
        validate_grid_data(&g).expect("consistent");
    }

    #[test]
    fn test_bucket_place_needs_empty_seed() {
        let mut g = grid(4);
        set_voxel(&mut g, VoxelPos::new(1, 1, 1), 0.2);
        set_voxel(&mut g, VoxelPos::new(1, 2, 1), 0.2);
        let h = hit(VoxelPos::new(1, 1, 1), Some(BlockFace::Top), false);
        assert!(use_bucket(&mut g, &h, BucketMode::PlaceVoxels, 0.5, ToolAction::Primary).is_none());
    }

    #[test]
    fn test_bucket_recolours_connected_region() {
        let mut g = grid(8);
        for x in 0..4 {
            set_voxel(&mut g, VoxelPos::new(x, 0, 0), 10.0 / 255.0);
        }
        set_voxel(&mut g, VoxelPos::new(4, 0, 0), 20.0 / 255.0);
        set_voxel(&mut g, VoxelPos::new(5, 0, 0), 10.0 / 255.0);

        let h = hit(VoxelPos::new(0, 0, 0), Some(BlockFace::Top), false);
        let region = use_bucket(&mut g, &h, BucketMode::FillColor, 30.0 / 255.0, ToolAction::Primary)
            .expect("recoloured");

        assert_eq!(region.max, VoxelPos::new(4, 1, 1));
        assert_eq!(quantize_value(get_voxel(&g, VoxelPos::new(3, 0, 0))), 30);
        assert_eq!(quantize_value(get_voxel(&g, VoxelPos::new(4, 0, 0))), 20);
        assert_eq!(quantize_value(get_voxel(&g, VoxelPos::new(5, 0, 0))), 10);
    }

    #[test]
    fn test_bucket_secondary_clears_region() {
        let mut g = grid(8);
        for y in 0..3 {
            set_voxel(&mut g, VoxelPos::new(2, y, 2), 0.5);
        }
        set_voxel(&mut g, VoxelPos::new(2, 3, 2), 0.9);

        let h = hit(VoxelPos::new(2, 0, 2), Some(BlockFace::Top), false);
        use_bucket(&mut g, &h, BucketMode::PlaceVoxels, 0.5, ToolAction::Secondary).expect("cleared");
        assert_eq!(count_occupied(&g), 1);
        assert_eq!(get_voxel(&g, VoxelPos::new(2, 3, 2)), 0.9);
    }

    #[test]
    fn test_bucket_edge_hit_fills_whole_empty_grid() {
        let mut g = grid(4);
        let h = hit(VoxelPos::new(1, 1, 1), None, true);
        let region = use_bucket(&mut g, &h, BucketMode::PlaceVoxels, 0.5, ToolAction::Primary)
            .expect("filled");
        assert_eq!(region.size(), (4, 4, 4));
        assert_eq!(count_occupied(&g), 64);
    }

    #[test]
    fn test_apply_tool_dispatch() {
        let mut g = grid(8);
        let h = hit(VoxelPos::new(4, 4, 4), None, true);
        let state = select_tool(&ToolState::default(), ToolKind::Brush);
        let state = set_brush_radius(&state, 1);

        apply_tool(&mut g, &h, &state, 0.5, ToolAction::Primary).expect("valid");
        assert_eq!(count_occupied(&g), 7);

        let state = select_tool(&state, ToolKind::Pencil);
        apply_tool(&mut g, &h, &state, 0.0, ToolAction::Secondary).expect("valid");
        assert_eq!(count_occupied(&g), 6);
    }
}
