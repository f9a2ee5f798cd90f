//! Tool data structures - pure data

use crate::constants::tools::DEFAULT_BRUSH_RADIUS;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Pencil,
    Bucket,
    Brush,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Pencil, ToolKind::Bucket, ToolKind::Brush];

    /// Display name shown in tool pickers
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Pencil => "Pencil",
            ToolKind::Bucket => "Bucket",
            ToolKind::Brush => "Brush",
        }
    }
}

/// Primary adds or paints (left click), secondary removes (right click)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolAction {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketMode {
    /// Fill the connected empty space in front of the hit face
    #[default]
    PlaceVoxels,
    /// Recolour the connected same-colour region under the cursor
    FillColor,
}

/// The only state tools keep between applications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolState {
    pub selected: ToolKind,
    /// Sphere radius in voxels, kept within MIN_BRUSH_RADIUS..=MAX_BRUSH_RADIUS
    pub brush_radius: u32,
    pub bucket_mode: BucketMode,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            selected: ToolKind::Pencil,
            brush_radius: DEFAULT_BRUSH_RADIUS,
            bucket_mode: BucketMode::PlaceVoxels,
        }
    }
}
