//! Editor data structures - pure data

use crate::camera::OrbitCameraData;
use crate::grid::VoxelGridData;
use crate::palette::PaletteLibrary;
use crate::tools::ToolState;
use crate::EditorConfig;

/// Everything one open model needs
///
/// Operations take `&mut EditorSession` for edits and `&EditorSession` for
/// picking, so reads never overlap a write.
#[derive(Debug, Clone)]
pub struct EditorSession {
    pub grid: VoxelGridData,
    pub palettes: PaletteLibrary,
    pub tools: ToolState,
    pub camera: OrbitCameraData,
    /// Settings the session was created with; grid dimensions follow resizes and imports
    pub config: EditorConfig,
}
