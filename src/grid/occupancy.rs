//! The dense occupancy volume: every voxel labeled Outside, Inside, or
//! Boundary, created all-Outside and mutated in place by rasterization and
//! flood fill.

use glam::Vec3;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::{Error, Result};
use crate::math::BBox;
use crate::parallel::parallel_for;

use super::meta::GridMeta;

/// A voxel's classification relative to a rasterized surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Occupancy {
    Outside = 0,
    Inside = 1,
    Boundary = 2,
}

impl Default for Occupancy {
    fn default() -> Self {
        Occupancy::Outside
    }
}

/// A dense 3D array of [`Occupancy`] values, row-major with x fastest.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    meta: GridMeta,
    data: Vec<Occupancy>,
}

impl OccupancyGrid {
    pub fn new(meta: GridMeta) -> Self {
        let count = meta.count();
        Self {
            meta,
            data: vec![Occupancy::Outside; count],
        }
    }

    pub fn from_bounds(bounds: &BBox, voxel_size: Vec3) -> Result<Self> {
        Ok(Self::new(GridMeta::from_bounds(bounds, voxel_size)?))
    }

    pub fn meta(&self) -> &GridMeta {
        &self.meta
    }

    pub fn data(&self) -> &[Occupancy] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [Occupancy] {
        &mut self.data
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Result<Occupancy> {
        Ok(self.data[self.meta.try_lin(x, y, z)?])
    }

    #[inline]
    pub fn get_lin(&self, i: usize) -> Occupancy {
        self.data[i]
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, value: Occupancy) -> Result<()> {
        let i = self.meta.try_lin(x, y, z)?;
        self.data[i] = value;
        Ok(())
    }

    #[inline]
    pub fn set_lin(&mut self, i: usize, value: Occupancy) {
        self.data[i] = value;
    }

    pub fn fill(&mut self, value: Occupancy) {
        self.data.fill(value);
    }

    pub fn count_state(&self, state: Occupancy) -> usize {
        self.data.iter().filter(|&&v| v == state).count()
    }

    /// A flat binary mask: `1` where `flags` (a predicate over `Occupancy`)
    /// is satisfied, `0` otherwise. The conventional call is `|o| o ==
    /// Occupancy::Inside`, giving the mask the SDF builder expects.
    pub fn get_mask_binary(&self, flags: impl Fn(Occupancy) -> bool) -> Vec<u8> {
        self.data.iter().map(|&o| u8::from(flags(o))).collect()
    }

    /// A ternary mask: `Outside=0, Inside=1, Boundary=2`, the encoding the
    /// SDF builder's ternary variant expects.
    pub fn get_mask_ternary(&self) -> Vec<u8> {
        self.data.iter().map(|&o| u8::from(o)).collect()
    }

    pub fn for_each_voxel(&self, mut cb: impl FnMut([i32; 3], Occupancy)) {
        let mut i = 0usize;
        for z in 0..self.meta.nz {
            for y in 0..self.meta.ny {
                for x in 0..self.meta.nx {
                    cb(
                        [self.meta.min_x + x, self.meta.min_y + y, self.meta.min_z + z],
                        self.data[i],
                    );
                    i += 1;
                }
            }
        }
    }

    /// Same traversal as [`OccupancyGrid::for_each_voxel`], but dispatched
    /// through [`parallel_for`] — `cb` must not assume any particular
    /// ordering or that it runs on a single thread.
    pub fn for_each_voxel_parallel(
        &self,
        max_degree: Option<usize>,
        cb: impl Fn([i32; 3], Occupancy) + Sync,
    ) {
        let (nx, ny) = (self.meta.nx as i64, self.meta.ny as i64);
        let (min_x, min_y, min_z) = (self.meta.min_x, self.meta.min_y, self.meta.min_z);
        parallel_for(self.data.len(), 4096, max_degree, |i| {
            let i64_ = i as i64;
            let z = i64_ / (nx * ny);
            let rem = i64_ % (nx * ny);
            let y = rem / nx;
            let x = rem % nx;
            cb(
                [min_x + x as i32, min_y + y as i32, min_z + z as i32],
                self.data[i],
            );
        });
    }

    /// Shifts grid contents by the nearest-integer voxel offset corresponding
    /// to `translation` in world units. Cells that leave the grid's range
    /// are dropped; cells newly exposed at the other edge become `Outside`.
    /// Intentional, not a bug: callers that need a larger working volume
    /// should allocate one up front.
    pub fn transform_world(&mut self, translation: Vec3) {
        let dx = (translation.x / self.meta.voxel_size.x).round() as i32;
        let dy = (translation.y / self.meta.voxel_size.y).round() as i32;
        let dz = (translation.z / self.meta.voxel_size.z).round() as i32;
        self.transform_index([dx, dy, dz]);
    }

    /// Same as `transform_world`, but expressed directly in voxel offsets.
    pub fn transform_index(&mut self, offset: [i32; 3]) {
        if offset == [0, 0, 0] {
            return;
        }
        let mut next = vec![Occupancy::Outside; self.data.len()];
        let meta = self.meta;
        for z in 0..meta.nz {
            for y in 0..meta.ny {
                for x in 0..meta.nx {
                    let src = self.meta.lin(meta.min_x + x, meta.min_y + y, meta.min_z + z);
                    let (dx, dy, dz) = (x + offset[0], y + offset[1], z + offset[2]);
                    if dx < 0 || dx >= meta.nx || dy < 0 || dy >= meta.ny || dz < 0 || dz >= meta.nz {
                        continue;
                    }
                    let dst = self
                        .meta
                        .lin(meta.min_x + dx, meta.min_y + dy, meta.min_z + dz);
                    next[dst] = self.data[src];
                }
            }
        }
        self.data = next;
    }
}

impl std::ops::Index<usize> for OccupancyGrid {
    type Output = Occupancy;
    fn index(&self, i: usize) -> &Occupancy {
        &self.data[i]
    }
}

pub fn parse_mask_length_or_err(mask_len: usize, expected: usize) -> Result<()> {
    if mask_len != expected {
        return Err(Error::Argument(format!(
            "mask length {mask_len} does not match grid cell count {expected}"
        )));
    }
    Ok(())
}
