//! Shared constants for the voxel editor core
//!
//! Values that several subsystems must agree on live here so the grid,
//! the tools and the file format never drift apart.

/// Voxel value constants
pub mod voxel {
    /// Values at or below this magnitude are treated as empty
    pub const EMPTY_EPSILON: f32 = 0.003;

    /// Staged by erasing tools; always cleared to 0, never stored
    pub const ERASE_SENTINEL: f32 = -1.0;

    /// Palette indices are normalized by this before storage
    pub const PALETTE_SCALE: f32 = 255.0;

    /// Occupancy byte for a brick holding at least one occupied voxel
    pub const BRICK_OCCUPIED: u8 = 255;

    /// Occupancy byte for a fully empty brick
    pub const BRICK_EMPTY: u8 = 0;
}

/// Grid sizing constants
pub mod grid {
    /// Default edge length of an occupancy brick, in voxels
    pub const DEFAULT_BRICK_SIZE: u32 = 8;

    /// Default logical grid edge length
    pub const DEFAULT_GRID_DIM: u32 = 16;

    /// Largest dimension the NUUM header can carry (65535 is reserved)
    pub const MAX_GRID_DIM: u32 = 65534;

    /// World-space edge length of one voxel
    pub const DEFAULT_VOXEL_SCALE: f32 = 0.0625;
}

/// Raycasting constants
pub mod raycast {
    /// Upper bound on DDA iterations per ray
    pub const MAX_RAY_STEPS: u32 = 256;

    /// Nudge past the entry point so the first voxel lookup lands inside the grid
    pub const ENTRY_NUDGE: f32 = 1e-5;

    /// Direction components smaller than this are treated as zero
    pub const PARALLEL_EPSILON: f32 = 1e-8;

    /// Stand-in for 1/0 on axes the ray never crosses
    pub const HUGE_INVERSE: f32 = 1e30;
}

/// Tool constants
pub mod tools {
    pub const MIN_BRUSH_RADIUS: u32 = 1;
    pub const MAX_BRUSH_RADIUS: u32 = 6;
    pub const DEFAULT_BRUSH_RADIUS: u32 = 4;
}

/// NUUM v1 file format constants
pub mod nuum {
    pub const MAGIC: [u8; 4] = *b"NUUM";
    pub const VERSION: u16 = 1;

    /// Palette names longer than this are treated as corruption
    pub const MAX_PALETTE_NAME_LEN: u64 = 64 * 1024;
}
