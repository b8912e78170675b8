//! End-to-end coverage for the rasterize -> flood fill pipeline, run against
//! a closed triangulated sphere rather than the small hand-built shapes the
//! unit tests use.

use glam::Vec3;
use voxfield::{DenseRasterizer, GridMeta, Mesh, Occupancy, OccupancyGrid, Tri};

/// A UV sphere with a single shared vertex at each pole (a true fan), so the
/// mesh is watertight by index: a parametrization with `segments` distinct
/// but coincident vertices per pole leaves each pole vertex in only one
/// triangle, so its cap edges never find a second, oppositely-wound user.
fn uv_sphere(radius: f32, rings: u32, segments: u32) -> Mesh {
    assert!(rings >= 2 && segments >= 3);

    let north_pole = 0u32;
    let mut vertices = vec![Vec3::new(0.0, radius, 0.0)];

    let ring_base = |ring: u32| -> u32 { 1 + (ring - 1) * segments };

    for ring in 1..rings {
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

    let south_pole = vertices.len() as u32;
    vertices.push(Vec3::new(0.0, -radius, 0.0));

    let mut faces = Vec::new();

    // North cap: fan from the shared pole vertex to ring 1.
    let base1 = ring_base(1);
    for seg in 0..segments {
        let next_seg = (seg + 1) % segments;
        faces.push(Tri::new(north_pole, base1 + next_seg, base1 + seg));
    }

    // Interior quads between consecutive rings, split into two triangles.
    for ring in 1..rings - 1 {
        let a_base = ring_base(ring);
        let b_base = ring_base(ring + 1);
        for seg in 0..segments {
            let next_seg = (seg + 1) % segments;
            let a = a_base + seg;
            let b = a_base + next_seg;
            let c = b_base + next_seg;
            let d = b_base + seg;
            faces.push(Tri::new(a, b, c));
            faces.push(Tri::new(a, c, d));
        }
    }

    // South cap: fan from the shared pole vertex to the last interior ring.
    let base_last = ring_base(rings - 1);
    for seg in 0..segments {
        let next_seg = (seg + 1) % segments;
        faces.push(Tri::new(south_pole, base_last + seg, base_last + next_seg));
    }

    Mesh::new(vertices, faces, None)
}

#[test]
fn flood_fill_on_a_rasterized_sphere_matches_expected_classification() {
    let sphere = uv_sphere(8.0, 24, 32);
    assert!(sphere.is_closed());

    let meta = GridMeta::new([-16, -16, -16], [32, 32, 32], Vec3::ONE).unwrap();
    let mut grid = OccupancyGrid::new(meta);
    DenseRasterizer::rasterize_mesh(&mut grid, &sphere, true, usize::MAX).unwrap();

    let boundary_count = grid.count_state(Occupancy::Boundary);
    assert!(boundary_count > 0);

    assert_eq!(grid.get(0, 0, 0).unwrap(), Occupancy::Inside);

    for y in -16..16 {
        for z in -16..16 {
            assert_eq!(grid.get(-16, y, z).unwrap(), Occupancy::Outside);
            assert_eq!(grid.get(15, y, z).unwrap(), Occupancy::Outside);
        }
    }
    for x in -16..16 {
        for z in -16..16 {
            assert_eq!(grid.get(x, -16, z).unwrap(), Occupancy::Outside);
            assert_eq!(grid.get(x, 15, z).unwrap(), Occupancy::Outside);
        }
    }
    for x in -16..16 {
        for y in -16..16 {
            assert_eq!(grid.get(x, y, -16).unwrap(), Occupancy::Outside);
            assert_eq!(grid.get(x, y, 15).unwrap(), Occupancy::Outside);
        }
    }

    // flood fill does not touch boundary cells, and the count is stable
    // under a second run (rasterize idempotence + flood fill non-destructive).
    DenseRasterizer::rasterize_mesh(&mut grid, &sphere, true, usize::MAX).unwrap();
    assert_eq!(grid.count_state(Occupancy::Boundary), boundary_count);
}
