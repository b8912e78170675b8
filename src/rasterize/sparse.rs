//! Sparse, grid-free rasterization: returns the set of voxel origins a mesh
//! or polyline touches, deduplicated via a quantized integer key so that
//! near-identical floating origins from adjacent faces collapse to one.

use ahash::AHashSet;
use glam::Vec3;

use crate::dda::traverse_segment;
use crate::error::{Error, Result};
use crate::grid::{index_to_min_corner, world_to_grid_max_inclusive, world_to_grid_min};
use crate::math::{sat, BBox};
use crate::mesh::Mesh;
use crate::parallel::parallel_map;
use crate::polyline::Polyline;

fn check_size(size: Vec3) -> Result<()> {
    if size.x <= 0.0 || size.y <= 0.0 || size.z <= 0.0 {
        return Err(Error::Argument(format!("voxel size must be positive, got {size:?}")));
    }
    Ok(())
}

/// Every voxel index (in the implicit lattice anchored at the world origin
/// with spacing `size`) the triangle `(v0, v1, v2)` rasterizes to.
fn rasterize_triangle_indices(size: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> Vec<[i32; 3]> {
    let mut bounds = BBox::from_point(v0);
    bounds.expand_point(v1);
    bounds.expand_point(v2);

    let lo = world_to_grid_min(bounds.min, size, Vec3::ZERO);
    let hi = world_to_grid_max_inclusive(bounds.max, size, Vec3::ZERO);
    let half = size * 0.5;

    let mut hits = Vec::new();
    for z in lo[2]..=hi[2] {
        for y in lo[1]..=hi[1] {
            for x in lo[0]..=hi[0] {
                let idx = [x, y, z];
                let center = index_to_min_corner(idx, size, Vec3::ZERO) + half;
                if sat::triangle_voxel_boundary(center, half, v0, v1, v2) {
                    hits.push(idx);
                }
            }
        }
    }
    hits
}

/// Rasterizes meshes and polylines without a bounded grid, returning the
/// (deduplicated) world-space min corners of every voxel touched.
pub struct SparseRasterizer;

impl SparseRasterizer {
    /// Per-face voxel hits are computed in parallel once `mesh.faces().len()
    /// >= parallel_threshold`; the quantized-key dedup merge is sequential.
    pub fn rasterize_mesh(mesh: &Mesh, size: Vec3, parallel_threshold: usize) -> Result<Vec<Vec3>> {
        check_size(size)?;
        let faces = mesh.faces();
        let per_face_hits = parallel_map(faces.len(), parallel_threshold, |i| {
            let (v0, v1, v2) = mesh.triangle(&faces[i]);
            rasterize_triangle_indices(size, v0, v1, v2)
        });

        let mut seen: AHashSet<[i32; 3]> = AHashSet::default();
        let mut out = Vec::new();
        for hits in per_face_hits {
            for idx in hits {
                if seen.insert(idx) {
                    out.push(index_to_min_corner(idx, size, Vec3::ZERO));
                }
            }
        }
        Ok(out)
    }

    /// `include_closing` only matters for a closed polyline; an open one
    /// never emits a closing edge regardless of the flag.
    pub fn rasterize_polyline(polyline: &Polyline, size: Vec3, include_closing: bool) -> Result<Vec<Vec3>> {
        check_size(size)?;
        let verts = polyline.vertices();
        let n = verts.len();

        let mut seen: AHashSet<[i32; 3]> = AHashSet::default();
        let mut out = Vec::new();
        let mut visit_edge = |p0: Vec3, p1: Vec3| -> Result<()> {
            for idx in traverse_segment(p0, p1, size)? {
                if seen.insert(idx) {
                    out.push(index_to_min_corner(idx, size, Vec3::ZERO));
                }
            }
            Ok(())
        };

        for w in verts.windows(2) {
            visit_edge(w[0], w[1])?;
        }
        if polyline.is_closed() && include_closing && n > 1 {
            visit_edge(verts[n - 1], verts[0])?;
        }
        Ok(out)
    }
}
