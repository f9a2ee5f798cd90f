//! Palette data structures - pure data

use serde::{Deserialize, Serialize};

/// Linear RGBA colour, components in [0, 1]
pub type Rgba = [f32; 4];

/// Colour reported for slot 0
pub const EMPTY_COLOR: Rgba = [0.0, 0.0, 0.0, 0.0];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteData {
    pub name: String,

    /// Slot 0 is always EMPTY_COLOR and never serialized
    pub colors: Vec<Rgba>,

    /// Index into `colors` used by painting tools
    pub selected_index: u16,
}

/// Collection of palettes with one active entry
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteLibrary {
    /// Never empty
    pub palettes: Vec<PaletteData>,
    pub current: usize,
}
