//! Editor session
//!
//! Ties the grid, palettes, tools and camera together and runs the
//! pointer → raycast → tool → upload pipeline a frontend drives.

pub mod editor_data;
pub mod editor_operations;

pub use editor_data::EditorSession;
pub use editor_operations::{
    create_session, export_model, flush_to_gpu, handle_pointer_action, import_model, paint_value,
    pick, resize_canvas,
};
