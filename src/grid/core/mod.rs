//! Core grid types shared by storage, raycasting and tools

pub mod position;
pub mod ray;

pub use position::VoxelPos;
pub use ray::{BlockFace, HitInfo, Ray, WorldBounds};
