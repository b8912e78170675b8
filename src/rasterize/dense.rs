//! In-grid rasterization: writes `Boundary` directly into a fixed-size
//! `OccupancyGrid`. Per-face voxel hits are computed in parallel (pure,
//! read-only against the grid) and then scattered into the grid
//! sequentially, the same gather/scatter shape `edt::volume` uses for its
//! strided passes — a mutable grid can't be handed to multiple threads at
//! once without unsafe code, so the write-back stays single-threaded.

use glam::Vec3;

use crate::dda::traverse_segment;
use crate::error::Result;
use crate::flood_fill::flood_fill;
use crate::grid::{world_to_grid_max_inclusive, world_to_grid_min, GridMeta, Occupancy, OccupancyGrid};
use crate::math::{sat, BBox};
use crate::mesh::Mesh;
use crate::parallel::parallel_map;
use crate::polyline::Polyline;

fn grid_index_bounds(meta: &GridMeta) -> ([i32; 3], [i32; 3]) {
    (
        [meta.min_x, meta.min_y, meta.min_z],
        [meta.min_x + meta.nx - 1, meta.min_y + meta.ny - 1, meta.min_z + meta.nz - 1],
    )
}

fn clip_range(lo: [i32; 3], hi: [i32; 3], grid_lo: [i32; 3], grid_hi: [i32; 3]) -> Option<([i32; 3], [i32; 3])> {
    let clo = [lo[0].max(grid_lo[0]), lo[1].max(grid_lo[1]), lo[2].max(grid_lo[2])];
    let chi = [hi[0].min(grid_hi[0]), hi[1].min(grid_hi[1]), hi[2].min(grid_hi[2])];
    if clo[0] > chi[0] || clo[1] > chi[1] || clo[2] > chi[2] {
        None
    } else {
        Some((clo, chi))
    }
}

/// Linear indices of every voxel in `meta` the triangle `(v0, v1, v2)`
/// rasterizes to, visited in z-y-x order.
fn rasterize_triangle(meta: &GridMeta, v0: Vec3, v1: Vec3, v2: Vec3) -> Vec<usize> {
    let mut bounds = BBox::from_point(v0);
    bounds.expand_point(v1);
    bounds.expand_point(v2);

    let lo = world_to_grid_min(bounds.min, meta.voxel_size, Vec3::ZERO);
    let hi = world_to_grid_max_inclusive(bounds.max, meta.voxel_size, Vec3::ZERO);
    let (grid_lo, grid_hi) = grid_index_bounds(meta);
    let Some((clo, chi)) = clip_range(lo, hi, grid_lo, grid_hi) else {
        return Vec::new();
    };

    let half = meta.voxel_size * 0.5;
    let mut hits = Vec::new();
    for z in clo[2]..=chi[2] {
        for y in clo[1]..=chi[1] {
            for x in clo[0]..=chi[0] {
                let center = meta.index_center([x, y, z]);
                if sat::triangle_voxel_boundary(center, half, v0, v1, v2) {
                    hits.push(meta.lin(x, y, z));
                }
            }
        }
    }
    hits
}

/// Writes triangle/polyline rasterization results directly into a
/// caller-owned, fixed-size `OccupancyGrid`.
pub struct DenseRasterizer;

impl DenseRasterizer {
    /// Marks every voxel any face of `mesh` overlaps as `Boundary`, then
    /// optionally flood-fills the interior. Faces are processed
    /// independently and in parallel once `mesh.faces().len() >=
    /// parallel_threshold`.
    pub fn rasterize_mesh(
        grid: &mut OccupancyGrid,
        mesh: &Mesh,
        flood_fill_interior: bool,
        parallel_threshold: usize,
    ) -> Result<()> {
        let meta = *grid.meta();
        let faces = mesh.faces();
        let per_face_hits = parallel_map(faces.len(), parallel_threshold, |i| {
            let (v0, v1, v2) = mesh.triangle(&faces[i]);
            rasterize_triangle(&meta, v0, v1, v2)
        });

        let data = grid.data_mut();
        for hits in per_face_hits {
            for idx in hits {
                data[idx] = Occupancy::Boundary;
            }
        }

        if flood_fill_interior {
            flood_fill(grid)?;
        }
        Ok(())
    }

    /// Marks every voxel the polyline's edges (including the closing edge,
    /// when closed) pass through as `Boundary`, via the Amanatides-Woo DDA.
    pub fn rasterize_polyline(grid: &mut OccupancyGrid, polyline: &Polyline) -> Result<()> {
        let meta = *grid.meta();
        for (p0, p1) in polyline.edges() {
            for idx in traverse_segment(p0, p1, meta.voxel_size)? {
                if meta.contains_index(idx[0], idx[1], idx[2]) {
                    let lin = meta.lin(idx[0], idx[1], idx[2]);
                    grid.data_mut()[lin] = Occupancy::Boundary;
                }
            }
        }
        Ok(())
    }
}
