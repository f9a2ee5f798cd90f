//! Editing tools
//!
//! - tool_data.rs: tool kinds, actions and the persistent tool settings
//! - tool_operations.rs: pencil, brush and bucket applied to a raycast hit

pub mod tool_data;
pub mod tool_operations;

pub use tool_data::{BucketMode, ToolAction, ToolKind, ToolState};
pub use tool_operations::{
    apply_tool, brush_stamp, flood_region, select_tool, set_brush_radius, set_bucket_mode,
    use_brush, use_bucket, use_pencil, ToolError, ToolResult,
};
