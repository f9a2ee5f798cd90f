// Nuum - voxel editor core, Data-Oriented Programming (DOP) architecture
//
// Every subsystem is split into plain data (*_data.rs) and pure functions
// over that data (*_operations.rs). A frontend owns windows and GPU
// resources and drives the crate through `editor` or the lower modules.
//
// - grid: dense voxel storage, brick occupancy, DDA raycasting
// - tools: pencil, brush and bucket edits
// - palette / camera: colour lookup and orbit picking
// - upload: dirty-region transfer to a renderer
// - persistence: NUUM v1 import/export

// Constants module
pub mod constants;

// Core modules
pub mod error;
pub mod grid;

// Editing
pub mod camera;
pub mod palette;
pub mod tools;

// Integration
pub mod editor;
pub mod persistence;
pub mod upload;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use camera::OrbitCameraData;
pub use editor::{
    create_session, export_model, flush_to_gpu, handle_pointer_action, import_model, pick,
    resize_canvas, EditorSession,
};
pub use error::{EditorError, EditorResult, PathContext};
pub use grid::{
    BlockFace, DirtyRegion, GridDescriptor, HitInfo, Ray, VoxelGridData, VoxelPos, WorldBounds,
};
pub use palette::{PaletteData, PaletteLibrary, PaletteResolver};
pub use persistence::{NuumModel, PersistenceError};
pub use tools::{BucketMode, ToolAction, ToolKind, ToolState};
pub use upload::{GridUniform, VolumeUploader};

/// Main editor configuration
///
/// Every field has a default, so a TOML file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub grid_width: u32,
    pub grid_height: u32,
    pub grid_depth: u32,
    /// Occupancy brick edge; 0 disables the occupancy summary
    pub brick_size: u32,
    /// World edge length of one voxel
    pub voxel_scale: f32,
    pub max_ray_steps: u32,
    pub brush_radius: u32,
    pub bucket_mode: BucketMode,
}

impl EditorConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> anyhow::Result<()> {
        self.check_fields()?;
        log::info!("[EditorConfig] Configuration validated successfully");
        Ok(())
    }

    /// Field checks reported as `EditorError::InvalidConfig`
    pub fn check_fields(&self) -> EditorResult<()> {
        use constants::grid::MAX_GRID_DIM;
        use constants::tools::{MAX_BRUSH_RADIUS, MIN_BRUSH_RADIUS};

        let invalid = |field: &str, value: String, reason: String| EditorError::InvalidConfig {
            field: field.to_string(),
            value,
            reason,
        };

        for (field, value) in [
            ("grid_width", self.grid_width),
            ("grid_height", self.grid_height),
            ("grid_depth", self.grid_depth),
        ] {
            if value == 0 || value > MAX_GRID_DIM {
                return Err(invalid(
                    field,
                    value.to_string(),
                    format!("must be within 1..={}", MAX_GRID_DIM),
                ));
            }
        }

        if !(self.voxel_scale.is_finite() && self.voxel_scale > 0.0) {
            return Err(invalid(
                "voxel_scale",
                self.voxel_scale.to_string(),
                "must be a positive number".to_string(),
            ));
        }

        if self.max_ray_steps == 0 {
            return Err(invalid(
                "max_ray_steps",
                "0".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        if !(MIN_BRUSH_RADIUS..=MAX_BRUSH_RADIUS).contains(&self.brush_radius) {
            return Err(invalid(
                "brush_radius",
                self.brush_radius.to_string(),
                format!("must be within {}..={}", MIN_BRUSH_RADIUS, MAX_BRUSH_RADIUS),
            ));
        }

        Ok(())
    }

    pub fn grid_descriptor(&self) -> GridDescriptor {
        GridDescriptor {
            width: self.grid_width,
            height: self.grid_height,
            depth: self.grid_depth,
            brick_size: (self.brick_size > 0).then_some(self.brick_size),
        }
    }

    pub fn tool_state(&self) -> ToolState {
        ToolState {
            brush_radius: self.brush_radius,
            bucket_mode: self.bucket_mode,
            ..Default::default()
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_width: constants::grid::DEFAULT_GRID_DIM,
            grid_height: constants::grid::DEFAULT_GRID_DIM,
            grid_depth: constants::grid::DEFAULT_GRID_DIM,
            brick_size: constants::grid::DEFAULT_BRICK_SIZE,
            voxel_scale: constants::grid::DEFAULT_VOXEL_SCALE,
            max_ray_steps: constants::raycast::MAX_RAY_STEPS,
            brush_radius: constants::tools::DEFAULT_BRUSH_RADIUS,
            bucket_mode: BucketMode::PlaceVoxels,
        }
    }
}

/// Parse and validate a TOML configuration
pub fn parse_config(source: &str) -> EditorResult<EditorConfig> {
    let config: EditorConfig = toml::from_str(source)?;
    config.check_fields()?;
    Ok(config)
}

/// Read a TOML configuration file
pub fn load_config(path: &Path) -> EditorResult<EditorConfig> {
    let source = std::fs::read_to_string(path).with_path(path)?;
    let config = parse_config(&source)?;
    log::info!("[EditorConfig] Loaded {}", path.display());
    Ok(config)
}
