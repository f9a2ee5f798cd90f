//! Editor operations - the input → raycast → tool → upload pipeline

use super::editor_data::EditorSession;
use crate::camera::{init_orbit_camera, log_camera_context, screen_to_ray, update_aspect_ratio};
use crate::error::{EditorResult, PathContext};
use crate::grid::{create_grid, log_grid_stats, raycast_with_limit, resize, DirtyRegion, HitInfo};
use crate::palette::{current_palette, selected_value, PaletteLibrary};
use crate::persistence::{apply_model, load_model, save_model};
use crate::tools::{apply_tool, ToolAction};
use crate::upload::{sync_dirty_region, VolumeUploader};
use crate::EditorConfig;
use cgmath::{Point3, Vector2};
use std::path::Path;

// ============================================================================
// SESSION
// ============================================================================

/// Open an empty canvas
///
/// The camera orbits the centre of the grid from twice its largest extent.
pub fn create_session(config: EditorConfig) -> EditorResult<EditorSession> {
    config.check_fields()?;

    let grid = create_grid(&config.grid_descriptor())?;
    let camera = frame_grid(&config);
    let tools = config.tool_state();

    log::info!(
        "[Editor] Session created: {}x{}x{} grid, voxel scale {}",
        grid.width,
        grid.height,
        grid.depth,
        config.voxel_scale
    );
    log_grid_stats(&grid);

    Ok(EditorSession {
        grid,
        palettes: PaletteLibrary::default(),
        tools,
        camera,
        config,
    })
}

fn frame_grid(config: &EditorConfig) -> crate::camera::OrbitCameraData {
    let s = config.voxel_scale;
    let largest = config.grid_width.max(config.grid_height).max(config.grid_depth) as f32;
    init_orbit_camera(
        Point3::new(0.0, config.grid_height as f32 * s * 0.5, 0.0),
        largest * s * 2.0,
    )
}

/// Normalized value of the current palette's selected colour
pub fn paint_value(session: &EditorSession) -> f32 {
    selected_value(current_palette(&session.palettes))
}

// ============================================================================
// POINTER
// ============================================================================

/// Raycast under the cursor without editing (hover highlight)
///
/// The camera's aspect ratio is taken from `viewport_size` for this ray.
pub fn pick(
    session: &EditorSession,
    mouse_pos: Vector2<f32>,
    viewport_size: Vector2<f32>,
) -> Option<HitInfo> {
    let camera = update_aspect_ratio(
        &session.camera,
        viewport_size.x as u32,
        viewport_size.y as u32,
    );
    let Some(ray) = screen_to_ray(&camera, mouse_pos, viewport_size) else {
        log::debug!("[Editor] No pick ray for cursor {:?} in {:?}", mouse_pos, viewport_size);
        log_camera_context(&camera);
        return None;
    };
    raycast_with_limit(
        &session.grid,
        &ray,
        session.config.voxel_scale,
        paint_value(session),
        session.config.max_ray_steps,
    )
}

/// Apply the selected tool under the cursor
///
/// # Returns
/// The region to upload, or None when the ray missed or the tool did nothing
pub fn handle_pointer_action(
    session: &mut EditorSession,
    mouse_pos: Vector2<f32>,
    viewport_size: Vector2<f32>,
    action: ToolAction,
) -> EditorResult<Option<DirtyRegion>> {
    let Some(hit) = pick(session, mouse_pos, viewport_size) else {
        return Ok(None);
    };

    let value = paint_value(session);
    let region = apply_tool(&mut session.grid, &hit, &session.tools, value, action)?;
    Ok(region)
}

// ============================================================================
// CANVAS
// ============================================================================

/// Change the canvas size, keeping the overlapping voxels
pub fn resize_canvas(
    session: &mut EditorSession,
    width: u32,
    height: u32,
    depth: u32,
) -> EditorResult<Option<DirtyRegion>> {
    let region = resize(&mut session.grid, width, height, depth)?;
    if region.is_some() {
        session.config.grid_width = width;
        session.config.grid_height = height;
        session.config.grid_depth = depth;
    }
    Ok(region)
}

/// Replace grid and palettes with a NUUM file
///
/// The file is decoded completely first; on any failure the session is left
/// as it was.
pub fn import_model(session: &mut EditorSession, path: &Path) -> EditorResult<DirtyRegion> {
    let model = load_model(path).with_path(path)?;
    let (width, height, depth) = (model.width, model.height, model.depth);

    let region = apply_model(model, &mut session.grid, &mut session.palettes).with_path(path)?;
    session.config.grid_width = width;
    session.config.grid_height = height;
    session.config.grid_depth = depth;

    log::info!("[Editor] Imported {}", path.display());
    log_grid_stats(&session.grid);
    Ok(region)
}

/// Write the grid with the current palette as a NUUM file
pub fn export_model(session: &EditorSession, path: &Path) -> EditorResult<()> {
    save_model(path, &session.grid, current_palette(&session.palettes)).with_path(path)
}

// ============================================================================
// UPLOAD
// ============================================================================

/// Push a dirty region to the renderer
pub fn flush_to_gpu<U: VolumeUploader + ?Sized>(
    uploader: &mut U,
    session: &EditorSession,
    region: &DirtyRegion,
) -> EditorResult<()> {
    sync_dirty_region(uploader, &session.grid, region)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use crate::grid::{count_occupied, grid_checksum, is_occupied, set_voxel, VoxelPos};
    use crate::palette::{add_palette, create_palette, set_current_palette};
    use crate::tools::{select_tool, ToolKind};
    use crate::upload::upload_operations::tests::RecordingUploader;
    use tempfile::TempDir;

    const VIEWPORT: Vector2<f32> = Vector2::new(100.0, 100.0);
    const CENTER: Vector2<f32> = Vector2::new(49.5, 49.5);

    fn session() -> EditorSession {
        create_session(EditorConfig::default()).expect("default config is valid")
    }

    #[test]
    fn test_create_session_defaults() {
        let s = session();
        assert_eq!((s.grid.width, s.grid.height, s.grid.depth), (16, 16, 16));
        assert!(s.grid.bricks.is_some());
        assert_eq!(s.tools.brush_radius, 4);
        assert_eq!(s.camera.target, Point3::new(0.0, 0.5, 0.0));
        assert_eq!(s.camera.radius, 2.0);
    }

    #[test]
    fn test_create_session_rejects_bad_config() {
        let config = EditorConfig {
            grid_depth: 0,
            ..Default::default()
        };
        assert!(matches!(
            create_session(config),
            Err(EditorError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_brick_size_zero_disables_occupancy() {
        let config = EditorConfig {
            brick_size: 0,
            ..Default::default()
        };
        let s = create_session(config).expect("valid");
        assert!(s.grid.bricks.is_none());
    }

    #[test]
    fn test_pencil_through_pointer() {
        let mut s = session();

        let hover = pick(&s, CENTER, VIEWPORT).expect("ray crosses the grid");
        assert!(hover.is_edge_hit);
        assert_eq!(hover.voxel.z, 0);

        let first = handle_pointer_action(&mut s, CENTER, VIEWPORT, ToolAction::Primary)
            .expect("no error")
            .expect("voxel placed");
        assert!(first.contains(hover.voxel));
        assert!(is_occupied(&s.grid, hover.voxel));

        // The placed voxel now blocks the ray, so the next one lands in front of it
        let hit = pick(&s, CENTER, VIEWPORT).expect("hit");
        assert!(!hit.is_edge_hit);
        assert_eq!(hit.voxel, hover.voxel);

        handle_pointer_action(&mut s, CENTER, VIEWPORT, ToolAction::Primary).expect("no error");
        assert_eq!(count_occupied(&s.grid), 2);
        assert!(is_occupied(&s.grid, hover.voxel.offset(cgmath::Vector3::new(0, 0, 1))));

        handle_pointer_action(&mut s, CENTER, VIEWPORT, ToolAction::Secondary).expect("no error");
        assert_eq!(count_occupied(&s.grid), 1);
    }

    #[test]
    fn test_pointer_paints_current_palette_selection() {
        let mut s = session();
        let idx = add_palette(&mut s.palettes, create_palette("two", [[1.0; 4], [0.5; 4]]));
        set_current_palette(&mut s.palettes, idx);
        crate::palette::set_selected_index(crate::palette::current_palette_mut(&mut s.palettes), 2);

        let region = handle_pointer_action(&mut s, CENTER, VIEWPORT, ToolAction::Primary)
            .expect("no error")
            .expect("placed");
        assert_eq!(crate::grid::get_voxel(&s.grid, region.min), 2.0 / 255.0);
    }

    #[test]
    fn test_pick_with_empty_viewport() {
        let s = session();
        assert!(pick(&s, CENTER, Vector2::new(0.0, 0.0)).is_none());
        assert!(pick(&s, CENTER, Vector2::new(100.0, 0.0)).is_none());
    }

    #[test]
    fn test_pointer_outside_grid_does_nothing() {
        let mut s = session();
        let before = grid_checksum(&s.grid);
        let corner = Vector2::new(0.0, 0.0);
        let region = handle_pointer_action(&mut s, corner, VIEWPORT, ToolAction::Primary)
            .expect("no error");
        assert!(region.is_none());
        assert_eq!(grid_checksum(&s.grid), before);
    }

    #[test]
    fn test_brush_through_pointer() {
        let mut s = session();
        s.tools = select_tool(&s.tools, ToolKind::Brush);
        let region = handle_pointer_action(&mut s, CENTER, VIEWPORT, ToolAction::Primary)
            .expect("no error")
            .expect("stamped");
        assert!(region.volume() > 1);
        assert!(count_occupied(&s.grid) > 1);
    }

    #[test]
    fn test_resize_canvas_tracks_config() {
        let mut s = session();
        set_voxel(&mut s.grid, VoxelPos::new(1, 1, 1), 0.5);

        let region = resize_canvas(&mut s, 8, 4, 8).expect("valid").expect("changed");
        assert!(region.full_volume);
        assert_eq!(s.config.grid_height, 4);
        assert!(is_occupied(&s.grid, VoxelPos::new(1, 1, 1)));

        assert!(resize_canvas(&mut s, 8, 4, 8).expect("valid").is_none());
        assert!(resize_canvas(&mut s, 0, 4, 8).is_err());
        assert_eq!(s.config.grid_width, 8);
    }

    #[test]
    fn test_export_import_round_trip() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("model.nuum");

        let mut s = session();
        set_voxel(&mut s.grid, VoxelPos::new(3, 4, 5), 7.0 / 255.0);
        export_model(&s, &path).expect("export");

        let mut other = create_session(EditorConfig {
            grid_width: 4,
            grid_height: 4,
            grid_depth: 4,
            ..Default::default()
        })
        .expect("valid");
        let region = import_model(&mut other, &path).expect("import");

        assert!(region.full_volume);
        assert_eq!(other.config.grid_width, 16);
        assert_eq!(grid_checksum(&other.grid), grid_checksum(&s.grid));
        assert_eq!(current_palette(&other.palettes).name, "Default");
    }

    #[test]
    fn test_failed_import_leaves_session() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("broken.nuum");
        std::fs::write(&path, b"NUUM\x01").expect("write");

        let mut s = session();
        set_voxel(&mut s.grid, VoxelPos::new(2, 2, 2), 0.5);
        let before = s.grid.clone();

        let err = import_model(&mut s, &path).unwrap_err();
        assert!(err.to_string().contains("broken.nuum"));
        assert_eq!(s.grid, before);
        assert_eq!(s.palettes.palettes.len(), 1);

        let missing = dir.path().join("missing.nuum");
        assert!(import_model(&mut s, &missing).is_err());
        assert_eq!(s.grid, before);
    }

    #[test]
    fn test_flush_to_gpu() {
        let mut s = session();
        let region = handle_pointer_action(&mut s, CENTER, VIEWPORT, ToolAction::Primary)
            .expect("no error")
            .expect("placed");

        let mut uploader = RecordingUploader::default();
        flush_to_gpu(&mut uploader, &s, &region).expect("upload");
        assert_eq!(uploader.sub_regions.len(), 1);
        assert_eq!(uploader.occupancy_regions.len(), 1);

        let full = resize_canvas(&mut s, 12, 12, 12).expect("valid").expect("changed");
        flush_to_gpu(&mut uploader, &s, &full).expect("upload");
        assert_eq!(uploader.volumes, vec![([12, 12, 12], 12 * 12 * 12 * 4)]);
    }
}
