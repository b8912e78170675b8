//! `voxfield`: a self-contained numerical core for discrete 3D geometry.
//!
//! Triangle meshes and 3D polylines rasterize into rectilinear voxel grids
//! ([`rasterize`]), voxels classify as inside/outside/boundary via
//! 6-connected flood fill ([`flood_fill`]), exact Euclidean signed distance
//! fields build from that classification via a separable Felzenszwalb-
//! Huttenlocher transform ([`edt`], [`sdf`]), and polygonal surfaces
//! reconstruct from occupied voxel sets via Morton-indexed face culling
//! ([`mesher`]). No host runtime, no GUI, no networking, no GPU paths.
#![forbid(unsafe_code)]

pub mod cord_system;
pub mod dda;
pub mod edt;
pub mod error;
pub mod flood_fill;
pub mod grid;
pub mod math;
pub mod mesh;
pub mod mesher;
pub mod obj;
pub mod parallel;
pub mod polyline;
pub mod rasterize;
pub mod sdf;

pub use cord_system::CordSystem;
pub use error::{Error, Result};
pub use grid::{DistanceGrid, GridMeta, Occupancy, OccupancyGrid};
pub use math::BBox;
pub use mesh::{Mesh, Tri};
pub use mesher::DiscreteMesher;
pub use polyline::Polyline;
pub use rasterize::{DenseRasterizer, SparseRasterizer};

pub use glam::Vec3;

#[cfg(test)]
mod tests {
    use super::*;

    /// One pass over the headline pipeline end to end: rasterize a mesh into
    /// a grid, flood-fill it, build a signed distance field from it, and
    /// sample the field back. Exercises the module seams this crate is cut
    /// along, not any single algorithm's correctness (that's each module's
    /// own job).
    #[test]
    fn rasterize_flood_fill_sdf_pipeline_runs_end_to_end() {
        let mesh = BBox::new(Vec3::splat(-1.0), Vec3::splat(1.0)).to_mesh(CordSystem::RightHanded);

        let bounds = BBox::new(Vec3::splat(-2.0), Vec3::splat(2.0));
        let mut grid = OccupancyGrid::from_bounds(&bounds, Vec3::ONE).unwrap();
        DenseRasterizer::rasterize_mesh(&mut grid, &mesh, true, usize::MAX).unwrap();

        assert!(grid.count_state(Occupancy::Boundary) > 0);
        assert!(grid.count_state(Occupancy::Inside) > 0);

        let sdf = DistanceGrid::from_occupancy(&grid, false).unwrap();
        let (lo, hi) = sdf.min_max();
        assert!(lo < 0.0);
        assert!(hi > 0.0);
    }
}
