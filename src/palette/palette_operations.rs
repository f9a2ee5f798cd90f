//! Palette operations - Pure DOP functions

use super::palette_data::{PaletteData, PaletteLibrary, Rgba, EMPTY_COLOR};
use crate::grid::{dequantize_value, is_empty_value, quantize_value};

/// Voxels store one byte per palette slot, so slot 255 is the last usable one
const MAX_PALETTE_SLOTS: usize = 256;

const DEFAULT_PALETTE_NAME: &str = "Default";

/// The 16 pico-8 colours
const DEFAULT_COLORS: [Rgba; 16] = [
    [0.0, 0.0, 0.0, 1.0],
    [0.114, 0.169, 0.325, 1.0],
    [0.494, 0.145, 0.325, 1.0],
    [0.0, 0.529, 0.318, 1.0],
    [0.671, 0.322, 0.212, 1.0],
    [0.373, 0.341, 0.310, 1.0],
    [0.761, 0.765, 0.780, 1.0],
    [1.0, 0.945, 0.910, 1.0],
    [1.0, 0.0, 0.302, 1.0],
    [1.0, 0.639, 0.0, 1.0],
    [1.0, 0.925, 0.153, 1.0],
    [0.0, 0.894, 0.212, 1.0],
    [0.161, 0.678, 1.0, 1.0],
    [0.514, 0.463, 0.612, 1.0],
    [1.0, 0.467, 0.659, 1.0],
    [1.0, 0.8, 0.667, 1.0],
];

/// Maps a palette index to a colour
pub trait PaletteResolver {
    fn resolve(&self, index: u8) -> Option<Rgba>;
}

impl PaletteResolver for PaletteData {
    fn resolve(&self, index: u8) -> Option<Rgba> {
        if index == 0 {
            return Some(EMPTY_COLOR);
        }
        self.colors.get(index as usize).copied()
    }
}

// ============================================================================
// CREATION
// ============================================================================

/// Create a palette; slot 0 is inserted ahead of `colors`
///
/// Colours beyond the 255 addressable slots are dropped.
pub fn create_palette(name: impl Into<String>, colors: impl IntoIterator<Item = Rgba>) -> PaletteData {
    let mut all = vec![EMPTY_COLOR];
    all.extend(colors.into_iter().take(MAX_PALETTE_SLOTS - 1));
    let selected_index = if all.len() > 1 { 1 } else { 0 };
    PaletteData {
        name: name.into(),
        colors: all,
        selected_index,
    }
}

/// Grey ramp from black to white
pub fn create_gradient_palette(name: impl Into<String>, steps: usize) -> PaletteData {
    let steps = steps.clamp(1, MAX_PALETTE_SLOTS - 1);
    let colors = (0..steps).map(|i| {
        let t = if steps == 1 { 1.0 } else { i as f32 / (steps - 1) as f32 };
        [t, t, t, 1.0]
    });
    create_palette(name, colors)
}

/// The built-in pico-8 palette
pub fn default_palette() -> PaletteData {
    create_palette(DEFAULT_PALETTE_NAME, DEFAULT_COLORS)
}

// ============================================================================
// COLOURS
// ============================================================================

/// Append a colour
///
/// # Returns
/// The new slot index, or None if the palette is full
pub fn add_color(palette: &mut PaletteData, color: Rgba) -> Option<u16> {
    if palette.colors.len() >= MAX_PALETTE_SLOTS {
        log::warn!("[Palette] '{}' is full, colour not added", palette.name);
        return None;
    }
    palette.colors.push(color);
    Some((palette.colors.len() - 1) as u16)
}

/// Remove a colour. Slot 0 cannot be removed.
///
/// The selection is clamped to the remaining slots.
pub fn remove_color(palette: &mut PaletteData, index: u16) -> bool {
    let index = index as usize;
    if index == 0 || index >= palette.colors.len() {
        return false;
    }
    palette.colors.remove(index);
    let last = (palette.colors.len() - 1) as u16;
    palette.selected_index = palette.selected_index.min(last);
    true
}

/// Select a slot; out-of-range indices are ignored
pub fn set_selected_index(palette: &mut PaletteData, index: u16) -> bool {
    if (index as usize) < palette.colors.len() {
        palette.selected_index = index;
        true
    } else {
        false
    }
}

pub fn selected_color(palette: &PaletteData) -> Rgba {
    palette
        .resolve(palette.selected_index.min(u8::MAX as u16) as u8)
        .unwrap_or(EMPTY_COLOR)
}

/// Normalized value tools paint with
pub fn selected_value(palette: &PaletteData) -> f32 {
    index_to_value(palette.selected_index.min(u8::MAX as u16) as u8)
}

pub fn index_to_value(index: u8) -> f32 {
    dequantize_value(index)
}

pub fn value_to_index(value: f32) -> u8 {
    quantize_value(value)
}

/// Colour of a stored voxel value; empty and unknown slots resolve to EMPTY_COLOR
pub fn resolve_voxel_color<R: PaletteResolver + ?Sized>(resolver: &R, value: f32) -> Rgba {
    if is_empty_value(value) {
        return EMPTY_COLOR;
    }
    resolver.resolve(value_to_index(value)).unwrap_or(EMPTY_COLOR)
}

// ============================================================================
// LIBRARY
// ============================================================================

impl Default for PaletteLibrary {
    fn default() -> Self {
        Self {
            palettes: vec![default_palette()],
            current: 0,
        }
    }
}

/// Add a palette and return its index
pub fn add_palette(library: &mut PaletteLibrary, palette: PaletteData) -> usize {
    log::info!("[Palette] Added '{}' ({} colours)", palette.name, palette.colors.len() - 1);
    library.palettes.push(palette);
    library.palettes.len() - 1
}

/// Remove a palette; removing the last one brings back the default
pub fn remove_palette(library: &mut PaletteLibrary, index: usize) -> bool {
    if index >= library.palettes.len() {
        return false;
    }
    library.palettes.remove(index);
    if library.palettes.is_empty() {
        library.palettes.push(default_palette());
    }
    library.current = library.current.min(library.palettes.len() - 1);
    true
}

pub fn set_current_palette(library: &mut PaletteLibrary, index: usize) -> bool {
    if index < library.palettes.len() {
        library.current = index;
        true
    } else {
        false
    }
}

pub fn current_palette(library: &PaletteLibrary) -> &PaletteData {
    &library.palettes[library.current.min(library.palettes.len() - 1)]
}

pub fn current_palette_mut(library: &mut PaletteLibrary) -> &mut PaletteData {
    let index = library.current.min(library.palettes.len() - 1);
    &mut library.palettes[index]
}

/// Drop every palette and make `palette` the only, current one
pub fn replace_palettes(library: &mut PaletteLibrary, palette: PaletteData) {
    library.palettes.clear();
    library.palettes.push(palette);
    library.current = 0;
}
