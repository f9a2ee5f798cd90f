//! Palettes: normalized voxel values resolve to RGBA through the active palette
//!
//! Slot 0 of every palette is the implicit transparent "empty" colour.

pub mod palette_data;
pub mod palette_operations;

pub use palette_data::{PaletteData, PaletteLibrary, Rgba, EMPTY_COLOR};
pub use palette_operations::{
    add_color, add_palette, create_gradient_palette, create_palette, current_palette,
    current_palette_mut, default_palette, index_to_value, remove_color, remove_palette,
    replace_palettes, resolve_voxel_color, selected_color, selected_value, set_current_palette,
    set_selected_index, value_to_index, PaletteResolver,
};
