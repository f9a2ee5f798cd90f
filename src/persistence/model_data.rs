//! NUUM model data - pure data

use crate::palette::PaletteData;

/// A decoded NUUM v1 file, validated but not yet applied to any grid
#[derive(Debug, Clone, PartialEq)]
pub struct NuumModel {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub palette: PaletteData,
    /// `width * height * depth` palette indices, index `z * w * h + y * w + x`
    pub voxels: Vec<u8>,
}
