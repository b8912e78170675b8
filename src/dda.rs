//! Amanatides–Woo 3-D DDA: walks the voxel lattice along a line segment,
//! visiting every cell the segment passes through in order. Shared by both
//! rasterizers for polyline rasterization.

use glam::Vec3;

use crate::error::{Error, Result};
use crate::grid::{world_to_grid_max_inclusive, world_to_grid_min};

fn axis_step(d: f32) -> i32 {
    if d > 0.0 {
        1
    } else if d < 0.0 {
        -1
    } else {
        0
    }
}

fn next_boundary(idx: i32, step: i32, size: f32, origin: f32) -> f32 {
    if step > 0 {
        origin + (idx + 1) as f32 * size
    } else {
        origin + idx as f32 * size
    }
}

fn in_box(idx: [i32; 3], lo: [i32; 3], hi: [i32; 3]) -> bool {
    (0..3).all(|i| idx[i] >= lo[i] && idx[i] <= hi[i])
}

/// Visits every voxel index a straight segment `p0 -> p1` passes through, in
/// traversal order, including both endpoints' voxels. A degenerate
/// (zero-length) segment emits a single voxel: the one containing `p0`.
pub fn traverse_segment(p0: Vec3, p1: Vec3, size: Vec3) -> Result<Vec<[i32; 3]>> {
    if size.x <= 0.0 || size.y <= 0.0 || size.z <= 0.0 {
        return Err(Error::Argument(format!("voxel size must be positive, got {size:?}")));
    }

    let origin = Vec3::ZERO;
    let dir = p1 - p0;

    if dir.length_squared() < 1e-12 {
        return Ok(vec![world_to_grid_min(p0, size, origin)]);
    }

    let lo_world = p0.min(p1);
    let hi_world = p0.max(p1);
    let aabb_min = world_to_grid_min(lo_world, size, origin);
    let aabb_max = world_to_grid_max_inclusive(hi_world, size, origin);

    let mut current = world_to_grid_min(p0, size, origin);
    for i in 0..3 {
        current[i] = current[i].clamp(aabb_min[i], aabb_max[i]);
    }

    let step = [axis_step(dir.x), axis_step(dir.y), axis_step(dir.z)];
    let dir_arr = [dir.x, dir.y, dir.z];
    let size_arr = [size.x, size.y, size.z];
    let origin_arr = [origin.x, origin.y, origin.z];
    let p0_arr = [p0.x, p0.y, p0.z];

    let mut t_delta = [f64::INFINITY; 3];
    let mut t_max = [f64::INFINITY; 3];
    for i in 0..3 {
        if step[i] != 0 {
            t_delta[i] = (size_arr[i] / dir_arr[i].abs()) as f64;
            let boundary = next_boundary(current[i], step[i], size_arr[i], origin_arr[i]);
            t_max[i] = ((boundary - p0_arr[i]) / dir_arr[i]) as f64;
        }
    }

    let mut out = vec![current];
    loop {
        let axis = if t_max[0] <= t_max[1] && t_max[0] <= t_max[2] {
            0
        } else if t_max[1] <= t_max[2] {
            1
        } else {
            2
        };

        if t_max[axis] > 1.0 {
            break;
        }

        current[axis] += step[axis];
        t_max[axis] += t_delta[axis];

        if !in_box(current, aabb_min, aabb_max) {
            break;
        }
        out.push(current);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_aligned_segment_visits_every_integer_cell() {
        let out = traverse_segment(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), Vec3::ONE).unwrap();
        assert_eq!(out, vec![[0, 0, 0], [1, 0, 0], [2, 0, 0]]);
    }

    #[test]
    fn degenerate_segment_emits_a_single_voxel() {
        let p = Vec3::new(1.5, 2.5, 0.5);
        let out = traverse_segment(p, p, Vec3::ONE).unwrap();
        assert_eq!(out, vec![[1, 2, 0]]);
    }

    #[test]
    fn diagonal_segment_stays_within_its_own_voxel_aabb() {
        let out = traverse_segment(Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0), Vec3::ONE).unwrap();
        for idx in &out {
            assert!(idx[0] >= 0 && idx[0] <= 2);
            assert!(idx[1] >= 0 && idx[1] <= 2);
            assert!(idx[2] >= 0 && idx[2] <= 2);
        }
        assert_eq!(out.first(), Some(&[0, 0, 0]));
        assert_eq!(out.last(), Some(&[2, 2, 2]));
    }

    #[test]
    fn non_positive_size_is_an_argument_error() {
        assert!(traverse_segment(Vec3::ZERO, Vec3::ONE, Vec3::new(0.0, 1.0, 1.0)).is_err());
    }
}
