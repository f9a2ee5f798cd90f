//! Headless editing session
//!
//! Drives the full pipeline without a window: pointer edits through the
//! orbit camera, uploads to a logging renderer stub, then a NUUM export
//! and re-import.
//!
//! Run with: RUST_LOG=info cargo run --example headless_session

use cgmath::Vector2;
use nuum::camera::orbit;
use nuum::grid::{count_occupied, grid_checksum};
use nuum::palette::{current_palette_mut, set_selected_index};
use nuum::tools::{select_tool, set_bucket_mode};
use nuum::upload::UploadResult;
use nuum::{
    create_session, export_model, flush_to_gpu, handle_pointer_action, import_model, resize_canvas,
    BucketMode, EditorConfig, ToolAction, ToolKind, VolumeUploader,
};

/// Renderer stand-in that only counts bytes
#[derive(Default)]
struct LoggingUploader {
    bytes: usize,
    calls: usize,
}

impl LoggingUploader {
    fn record(&mut self, what: &str, size: [u32; 3], texels: &[u8]) -> UploadResult<()> {
        self.bytes += texels.len();
        self.calls += 1;
        log::debug!("[Demo] {} {:?} ({} bytes)", what, size, texels.len());
        Ok(())
    }
}

impl VolumeUploader for LoggingUploader {
    fn upload_volume(&mut self, size: [u32; 3], texels: &[u8]) -> UploadResult<()> {
        self.record("volume", size, texels)
    }

    fn upload_sub_region(&mut self, _offset: [u32; 3], size: [u32; 3], texels: &[u8]) -> UploadResult<()> {
        self.record("sub-region", size, texels)
    }

    fn upload_occupancy(&mut self, size: [u32; 3], texels: &[u8]) -> UploadResult<()> {
        self.record("occupancy", size, texels)
    }

    fn upload_occupancy_sub_region(
        &mut self,
        _offset: [u32; 3],
        size: [u32; 3],
        texels: &[u8],
    ) -> UploadResult<()> {
        self.record("occupancy sub-region", size, texels)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = EditorConfig::default();
    config.validate()?;

    let mut session = create_session(config)?;
    let mut uploader = LoggingUploader::default();
    let viewport = Vector2::new(640.0, 480.0);
    let center = Vector2::new(319.5, 239.5);

    // Pencil: a short column growing toward the camera
    for _ in 0..4 {
        if let Some(region) = handle_pointer_action(&mut session, center, viewport, ToolAction::Primary)? {
            flush_to_gpu(&mut uploader, &session, &region)?;
        }
    }
    println!("Pencil: {} voxels", count_occupied(&session.grid));

    // Brush from a different angle
    session.camera = orbit(&session.camera, 60.0, 40.0);
    session.tools = select_tool(&session.tools, ToolKind::Brush);
    if let Some(region) = handle_pointer_action(&mut session, center, viewport, ToolAction::Primary)? {
        flush_to_gpu(&mut uploader, &session, &region)?;
    }
    println!("Brush: {} voxels", count_occupied(&session.grid));

    // Bucket recolour of whatever is under the cursor
    session.tools = set_bucket_mode(&select_tool(&session.tools, ToolKind::Bucket), BucketMode::FillColor);
    set_selected_index(current_palette_mut(&mut session.palettes), 12);
    if let Some(region) = handle_pointer_action(&mut session, center, viewport, ToolAction::Primary)? {
        flush_to_gpu(&mut uploader, &session, &region)?;
    }

    if let Some(region) = resize_canvas(&mut session, 24, 16, 24)? {
        flush_to_gpu(&mut uploader, &session, &region)?;
    }

    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("headless.nuum");
    export_model(&session, &path)?;

    let mut reloaded = create_session(EditorConfig::default())?;
    let region = import_model(&mut reloaded, &path)?;
    flush_to_gpu(&mut uploader, &reloaded, &region)?;

    println!(
        "Round trip: {} -> {} (checksums {:08x} / {:08x})",
        count_occupied(&session.grid),
        count_occupied(&reloaded.grid),
        grid_checksum(&session.grid),
        grid_checksum(&reloaded.grid)
    );
    println!("Uploads: {} calls, {} bytes", uploader.calls, uploader.bytes);
    Ok(())
}
