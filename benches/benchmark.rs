#![allow(clippy::print_stdout, clippy::print_stderr, clippy::dbg_macro)] // ok to use in tests, benches & build scripts

use glam::Vec3;
use tiny_bench::BenchmarkConfig;
use voxfield::{CordSystem, DenseRasterizer, DiscreteMesher, DistanceGrid, Mesh, OccupancyGrid, SparseRasterizer, Tri};

/// A UV-sphere triangulation, standing in for the "rasterized sphere" the
/// headline pipelines are measured against. Not part of the library surface:
/// just a fixture generator.
fn uv_sphere(radius: f32, rings: u32, segments: u32) -> Mesh {
    let mut vertices = Vec::new();
    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let theta = v * std::f32::consts::PI;
        for seg in 0..segments {
            let u = seg as f32 / segments as f32;
            let phi = u * std::f32::consts::TAU;
            vertices.push(
                radius
                    * Vec3::new(
                        theta.sin() * phi.cos(),
                        theta.cos(),
                        theta.sin() * phi.sin(),
                    ),
            );
        }
    }

    let mut faces = Vec::new();
    for ring in 0..rings {
        for seg in 0..segments {
            let next_seg = (seg + 1) % segments;
            let a = ring * segments + seg;
            let b = ring * segments + next_seg;
            let c = (ring + 1) * segments + next_seg;
            let d = (ring + 1) * segments + seg;
            if ring > 0 {
                faces.push(Tri::new(a, b, c));
            }
            if ring < rings - 1 {
                faces.push(Tri::new(a, c, d));
            }
        }
    }

    Mesh::new(vertices, faces, None)
}

fn rasterize_flood_fill_sdf(mesh: &Mesh) -> DistanceGrid {
    let bounds = mesh.bounds().expanded_by(Vec3::splat(0.2));
    let mut grid = OccupancyGrid::from_bounds(&bounds, Vec3::splat(0.05)).unwrap();
    DenseRasterizer::rasterize_mesh(&mut grid, mesh, true, usize::MAX).unwrap();
    DistanceGrid::from_occupancy(&grid, true).unwrap()
}

fn rasterize_cull_mesh(mesh: &Mesh) -> Mesh {
    let origins = SparseRasterizer::rasterize_mesh(mesh, Vec3::splat(0.05), usize::MAX).unwrap();
    DiscreteMesher::generate_mesh(&origins, Vec3::splat(0.05), CordSystem::RightHanded).unwrap()
}

pub fn main() {
    let sphere = uv_sphere(1.0, 32, 48);
    eprintln!(
        "sphere fixture: {} vertices, {} triangles",
        sphere.vertices().len(),
        sphere.faces().len()
    );

    let sdf = rasterize_flood_fill_sdf(&sphere);
    eprintln!("rasterize -> flood fill -> sdf: {} cells", sdf.meta().count());

    let remeshed = rasterize_cull_mesh(&sphere);
    eprintln!(
        "rasterize -> cull -> mesh: {} vertices, {} triangles",
        remeshed.vertices().len(),
        remeshed.faces().len()
    );

    let bench_cfg = BenchmarkConfig {
        num_samples: 10,
        ..Default::default()
    };

    tiny_bench::bench_with_configuration_labeled("rasterize_flood_fill_sdf", &bench_cfg, || {
        rasterize_flood_fill_sdf(&sphere)
    });

    tiny_bench::bench_with_configuration_labeled("rasterize_cull_mesh", &bench_cfg, || rasterize_cull_mesh(&sphere));
}
