//! Separating-Axis-Theorem predicates used by the rasterizer.
//!
//! Follows the canonical Akenine-Möller triangle/box test (box-local frame,
//! 3 box-face axes + 1 triangle-normal axis + 9 edge-cross axes), with the
//! epsilon placements spec'd out for the rasterizer: a small additive
//! epsilon on the 9 edge tests keeps boundary-touching triangles from
//! dropping a voxel due to floating-point error, and `is_covered_by_triangle`
//! closes the gap for large triangles that fully cover a voxel's footprint
//! without any edge crossing it.

use glam::Vec3;

const EDGE_TEST_EPSILON: f32 = 1e-5;
const COVERAGE_SLAB_PAD: f32 = 1e-4;
const COVERAGE_BARY_EPSILON: f32 = -1e-5;
const SEGMENT_PARALLEL_EPSILON: f64 = 1e-12;

/// True if the triangle `(v0, v1, v2)` overlaps the box centered at
/// `box_center` with half-extents `box_half`, under the SAT test plus the
/// triangle-normal plane test. Does **not** include the `is_covered_by_triangle`
/// case; combine both for the rasterizer's full boundary predicate.
pub fn triangle_box_overlap(box_center: Vec3, box_half: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> bool {
    let v0 = v0 - box_center;
    let v1 = v1 - box_center;
    let v2 = v2 - box_center;

    // 1. Triangle AABB vs box half-extents, per axis.
    let min_v = v0.min(v1.min(v2));
    let max_v = v0.max(v1.max(v2));
    if min_v.x > box_half.x
        || max_v.x < -box_half.x
        || min_v.y > box_half.y
        || max_v.y < -box_half.y
        || min_v.z > box_half.z
        || max_v.z < -box_half.z
    {
        return false;
    }

    // 2. Triangle's supporting plane vs box, via the standard projection
    // interval test against `|n| · h`.
    let e0 = v1 - v0;
    let e1 = v2 - v1;
    let e2 = v0 - v2;
    let normal = e0.cross(e1);
    let r = box_half.x * normal.x.abs() + box_half.y * normal.y.abs() + box_half.z * normal.z.abs();
    let s = normal.dot(v0);
    if s > r || s < -r {
        return false;
    }

    // 3. The 9 edge-cross-axis tests.
    let edges = [e0, e1, e2];
    let verts = [v0, v1, v2];
    for edge in edges {
        for axis_unit in [Vec3::X, Vec3::Y, Vec3::Z] {
            let axis = edge.cross(axis_unit);
            if axis.length_squared() < 1e-20 {
                continue;
            }
            let p: [f32; 3] = [
                axis.dot(verts[0]),
                axis.dot(verts[1]),
                axis.dot(verts[2]),
            ];
            let min_p = p[0].min(p[1]).min(p[2]);
            let max_p = p[0].max(p[1]).max(p[2]);
            let radius = box_half.x * axis.x.abs() + box_half.y * axis.y.abs() + box_half.z * axis.z.abs();
            if min_p > radius + EDGE_TEST_EPSILON || max_p < -radius - EDGE_TEST_EPSILON {
                return false;
            }
        }
    }

    true
}

/// True if the box center lies within the triangle's footprint and close
/// enough to its plane, handling the case of a voxel fully inside a large
/// triangle's projection but not touched by any of its edges.
///
/// Near-degenerate triangles (`|n|² < 1e-12`) resolve to `false` rather than
/// failing — the caller still sees whatever `triangle_box_overlap` decided.
pub fn is_covered_by_triangle(box_center: Vec3, box_half: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> bool {
    let e0 = v1 - v0;
    let e1 = v2 - v1;
    let normal = e0.cross(e1);
    let normal_len_sq = normal.length_squared();
    if normal_len_sq < 1e-12 {
        return false;
    }
    let normal_len = normal_len_sq.sqrt();

    // Slab test: box center within a padded band around the triangle's plane.
    let dist_to_plane = normal.dot(box_center - v0);
    let r = box_half.x * normal.x.abs() + box_half.y * normal.y.abs() + box_half.z * normal.z.abs();
    if dist_to_plane.abs() > r + COVERAGE_SLAB_PAD * normal_len {
        return false;
    }

    // Project the center onto the plane without normalizing, then test
    // barycentric coordinates with a slight negative epsilon to close the
    // gap at cell boundaries.
    let projected = box_center - normal * (dist_to_plane / normal_len_sq);

    let d00 = e0.dot(e0);
    let e2 = v2 - v0;
    let d01 = e0.dot(e2);
    let d11 = e2.dot(e2);
    let vp = projected - v0;
    let d20 = vp.dot(e0);
    let d21 = vp.dot(e2);
    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < 1e-20 {
        return false;
    }
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    let u = 1.0 - v - w;

    u >= COVERAGE_BARY_EPSILON && v >= COVERAGE_BARY_EPSILON && w >= COVERAGE_BARY_EPSILON
}

/// True if the box center's voxel is marked `Boundary` by the rasterizer's
/// combined predicate: either the edge-SAT test or the coverage test passes.
pub fn triangle_voxel_boundary(box_center: Vec3, box_half: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> bool {
    triangle_box_overlap(box_center, box_half, v0, v1, v2)
        || is_covered_by_triangle(box_center, box_half, v0, v1, v2)
}

/// Liang-Barsky slab clipping: true if the segment `p0 -> p1` intersects the
/// box `[min, max]`.
pub fn segment_aabb_overlap(p0: Vec3, p1: Vec3, min: Vec3, max: Vec3) -> bool {
    let d = (p1 - p0).as_dvec3();
    let p0 = p0.as_dvec3();
    let min = min.as_dvec3();
    let max = max.as_dvec3();

    let mut t_min = 0.0_f64;
    let mut t_max = 1.0_f64;

    for axis in 0..3 {
        let (d_a, p0_a, min_a, max_a) = (
            [d.x, d.y, d.z][axis],
            [p0.x, p0.y, p0.z][axis],
            [min.x, min.y, min.z][axis],
            [max.x, max.y, max.z][axis],
        );
        if d_a.abs() < SEGMENT_PARALLEL_EPSILON {
            if p0_a < min_a || p0_a > max_a {
                return false;
            }
            continue;
        }
        let inv = 1.0 / d_a;
        let mut t0 = (min_a - p0_a) * inv;
        let mut t1 = (max_a - p0_a) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_aligned_triangle_hits_exactly_its_voxel() {
        let v0 = Vec3::new(0.2, 0.2, 0.5);
        let v1 = Vec3::new(0.8, 0.2, 0.5);
        let v2 = Vec3::new(0.2, 0.8, 0.5);
        assert!(triangle_voxel_boundary(
            Vec3::splat(0.5),
            Vec3::splat(0.5),
            v0,
            v1,
            v2
        ));
        assert!(!triangle_voxel_boundary(
            Vec3::new(1.5, 0.5, 0.5),
            Vec3::splat(0.5),
            v0,
            v1,
            v2
        ));
    }

    #[test]
    fn large_triangle_covers_interior_voxel() {
        // A big triangle whose edges are far from this voxel's footprint,
        // but which still fully covers it.
        let v0 = Vec3::new(-10.0, -10.0, 0.5);
        let v1 = Vec3::new(10.0, -10.0, 0.5);
        let v2 = Vec3::new(0.0, 10.0, 0.5);
        assert!(!triangle_box_overlap(
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::splat(0.5),
            v0,
            v1,
            v2
        ));
        assert!(is_covered_by_triangle(
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::splat(0.5),
            v0,
            v1,
            v2
        ));
    }

    #[test]
    fn degenerate_triangle_never_covers() {
        let v0 = Vec3::ZERO;
        assert!(!is_covered_by_triangle(Vec3::ZERO, Vec3::ONE, v0, v0, v0));
    }

    #[test]
    fn segment_overlap_matches_obvious_cases() {
        let min = Vec3::ZERO;
        let max = Vec3::ONE;
        assert!(segment_aabb_overlap(
            Vec3::new(-1.0, 0.5, 0.5),
            Vec3::new(2.0, 0.5, 0.5),
            min,
            max
        ));
        assert!(!segment_aabb_overlap(
            Vec3::new(-1.0, 5.0, 5.0),
            Vec3::new(2.0, 5.0, 5.0),
            min,
            max
        ));
    }
}
