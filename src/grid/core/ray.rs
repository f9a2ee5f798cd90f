use super::VoxelPos;
use cgmath::{InnerSpace, Point3, Vector3, Zero};

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Build a ray with a normalized direction. A zero direction is kept as-is
    /// so the raycaster can reject it.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        let direction = if direction.magnitude2() > 0.0 {
            direction.normalize()
        } else {
            direction
        };
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}

/// Face of a voxel, named by the outward normal it carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockFace {
    Right,  // +X
    Left,   // -X
    Top,    // +Y
    Bottom, // -Y
    Front,  // +Z
    Back,   // -Z
}

impl BlockFace {
    pub fn normal(&self) -> Vector3<f32> {
        let o = self.offset();
        Vector3::new(o.x as f32, o.y as f32, o.z as f32)
    }

    pub fn offset(&self) -> Vector3<i32> {
        match self {
            BlockFace::Right => Vector3::new(1, 0, 0),
            BlockFace::Left => Vector3::new(-1, 0, 0),
            BlockFace::Top => Vector3::new(0, 1, 0),
            BlockFace::Bottom => Vector3::new(0, -1, 0),
            BlockFace::Front => Vector3::new(0, 0, 1),
            BlockFace::Back => Vector3::new(0, 0, -1),
        }
    }

    /// Face entered when a DDA walk crosses `axis` moving by `step`.
    /// The entered face points against the travel direction.
    pub fn from_axis_step(axis: usize, step: i32) -> Option<BlockFace> {
        match (axis, step.signum()) {
            (0, 1) => Some(BlockFace::Left),
            (0, -1) => Some(BlockFace::Right),
            (1, 1) => Some(BlockFace::Bottom),
            (1, -1) => Some(BlockFace::Top),
            (2, 1) => Some(BlockFace::Back),
            (2, -1) => Some(BlockFace::Front),
            _ => None,
        }
    }
}

/// Result of a grid raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    /// Hit voxel, or the last in-bounds voxel traversed for an edge hit
    pub voxel: VoxelPos,
    /// Face the ray entered through; `None` when it could not be determined
    pub face: Option<BlockFace>,
    /// Stored value of the hit voxel, or the caller's fallback for edge hits
    pub palette_value: f32,
    pub is_edge_hit: bool,
}

impl HitInfo {
    /// Integer face normal, or the zero vector when undetermined
    pub fn normal(&self) -> Vector3<i32> {
        self.face.map(|f| f.offset()).unwrap_or_else(Vector3::zero)
    }

    /// Where an additive tool should place: the empty cell in front of the
    /// hit face, or the traversed cell itself when nothing was hit.
    pub fn placement_target(&self) -> VoxelPos {
        if self.is_edge_hit {
            self.voxel
        } else {
            self.voxel.offset(self.normal())
        }
    }
}

/// Axis-aligned world-space box covering the whole grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}
