//! Integer lattice ↔ world-space conversions, and the immutable grid
//! description every grid type is built on.

use glam::Vec3;

use crate::error::{Error, Result};
use crate::math::BBox;

/// The tolerance used everywhere a world-space coordinate is quantized onto
/// the integer lattice: it biases points sitting exactly on a lattice plane
/// into the lower cell for "min" queries and the upper cell for "max
/// inclusive" queries, so that two origins differing only by floating noise
/// land on the same cell. Kept in one place per the design notes.
pub const QUANTIZATION_EPSILON: f32 = 1e-6;

/// `floor((p - origin + eps) / size)`, componentwise.
pub fn world_to_grid_min(p: Vec3, size: Vec3, origin: Vec3) -> [i32; 3] {
    let q = (p - origin + Vec3::splat(QUANTIZATION_EPSILON)) / size;
    [
        q.x.floor() as i32,
        q.y.floor() as i32,
        q.z.floor() as i32,
    ]
}

/// `floor((p - origin - eps) / size)`, componentwise.
pub fn world_to_grid_max_inclusive(p: Vec3, size: Vec3, origin: Vec3) -> [i32; 3] {
    let q = (p - origin - Vec3::splat(QUANTIZATION_EPSILON)) / size;
    [
        q.x.floor() as i32,
        q.y.floor() as i32,
        q.z.floor() as i32,
    ]
}

pub fn index_to_min_corner(i: [i32; 3], size: Vec3, origin: Vec3) -> Vec3 {
    origin + Vec3::new(i[0] as f32, i[1] as f32, i[2] as f32) * size
}

pub fn index_to_max_corner(i: [i32; 3], size: Vec3, origin: Vec3) -> Vec3 {
    origin + Vec3::new((i[0] + 1) as f32, (i[1] + 1) as f32, (i[2] + 1) as f32) * size
}

/// An immutable snapshot describing a dense grid's integer extents, world
/// origin, and voxel size. Every grid type (`OccupancyGrid`, `DistanceGrid`)
/// owns one and never resizes it after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridMeta {
    pub min_x: i32,
    pub min_y: i32,
    pub min_z: i32,
    pub nx: i32,
    pub ny: i32,
    pub nz: i32,
    pub voxel_size: Vec3,
}

impl GridMeta {
    pub fn new(min: [i32; 3], n: [i32; 3], voxel_size: Vec3) -> Result<Self> {
        if n[0] <= 0 || n[1] <= 0 || n[2] <= 0 {
            return Err(Error::Argument(format!(
                "grid dimensions must be positive, got {n:?}"
            )));
        }
        if voxel_size.x <= 0.0 || voxel_size.y <= 0.0 || voxel_size.z <= 0.0 {
            return Err(Error::Argument(format!(
                "voxel size must be positive, got {voxel_size:?}"
            )));
        }
        Ok(Self {
            min_x: min[0],
            min_y: min[1],
            min_z: min[2],
            nx: n[0],
            ny: n[1],
            nz: n[2],
            voxel_size,
        })
    }

    /// Derives integer extents from a world-space bounding box and a voxel
    /// size, via `world_to_grid_min`/`world_to_grid_max_inclusive`.
    pub fn from_bounds(bounds: &BBox, voxel_size: Vec3) -> Result<Self> {
        if !bounds.is_valid() {
            return Err(Error::Argument("cannot build a grid over an empty/degenerate bounding box".into()));
        }
        if voxel_size.x <= 0.0 || voxel_size.y <= 0.0 || voxel_size.z <= 0.0 {
            return Err(Error::Argument(format!(
                "voxel size must be positive, got {voxel_size:?}"
            )));
        }
        let origin = Vec3::ZERO;
        let min_i = world_to_grid_min(bounds.min, voxel_size, origin);
        let max_i = world_to_grid_max_inclusive(bounds.max, voxel_size, origin);
        let n = [
            (max_i[0] - min_i[0] + 1).max(1),
            (max_i[1] - min_i[1] + 1).max(1),
            (max_i[2] - min_i[2] + 1).max(1),
        ];
        Self::new(min_i, n, voxel_size)
    }

    pub fn count(&self) -> usize {
        self.nx as usize * self.ny as usize * self.nz as usize
    }

    pub fn size_world(&self) -> Vec3 {
        Vec3::new(
            self.nx as f32 * self.voxel_size.x,
            self.ny as f32 * self.voxel_size.y,
            self.nz as f32 * self.voxel_size.z,
        )
    }

    pub fn min_index(&self) -> [i32; 3] {
        [self.min_x, self.min_y, self.min_z]
    }

    pub fn world_origin(&self) -> Vec3 {
        index_to_min_corner(self.min_index(), self.voxel_size, Vec3::ZERO)
    }

    pub fn bounds(&self) -> BBox {
        BBox::new(self.world_origin(), self.world_origin() + self.size_world())
    }

    /// `[minX, minX+nx) × [minY, minY+ny) × [minZ, minZ+nz)`.
    pub fn contains_index(&self, x: i32, y: i32, z: i32) -> bool {
        x >= self.min_x
            && x < self.min_x + self.nx
            && y >= self.min_y
            && y < self.min_y + self.ny
            && z >= self.min_z
            && z < self.min_z + self.nz
    }

    /// Row-major linear index, x fastest.
    #[inline]
    pub fn lin(&self, x: i32, y: i32, z: i32) -> usize {
        debug_assert!(self.contains_index(x, y, z));
        let (x, y, z) = (
            (x - self.min_x) as i64,
            (y - self.min_y) as i64,
            (z - self.min_z) as i64,
        );
        (z * self.nx as i64 * self.ny as i64 + y * self.nx as i64 + x) as usize
    }

    pub fn try_lin(&self, x: i32, y: i32, z: i32) -> Result<usize> {
        if !self.contains_index(x, y, z) {
            return Err(Error::OutOfRange(format!(
                "index ({x}, {y}, {z}) outside grid of size ({}, {}, {}) at min ({}, {}, {})",
                self.nx, self.ny, self.nz, self.min_x, self.min_y, self.min_z
            )));
        }
        Ok(self.lin(x, y, z))
    }

    /// The voxel index containing a world position.
    pub fn world_to_index(&self, p: Vec3) -> [i32; 3] {
        world_to_grid_min(p, self.voxel_size, Vec3::ZERO)
    }

    pub fn index_min_corner(&self, idx: [i32; 3]) -> Vec3 {
        index_to_min_corner(idx, self.voxel_size, Vec3::ZERO)
    }

    pub fn index_max_corner(&self, idx: [i32; 3]) -> Vec3 {
        index_to_max_corner(idx, self.voxel_size, Vec3::ZERO)
    }

    pub fn index_center(&self, idx: [i32; 3]) -> Vec3 {
        (self.index_min_corner(idx) + self.index_max_corner(idx)) * 0.5
    }
}
