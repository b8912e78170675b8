//! Face-culled surface meshing from a set of occupied voxel origins, via the
//! Morton-coded neighbour lookup in [`super::morton`], plus the naive
//! (uncalled, debugging) per-voxel box variant.

use ahash::AHashSet;
use glam::Vec3;

use crate::cord_system::CordSystem;
use crate::error::{Error, Result};
use crate::math::BBox;
use crate::mesh::{Mesh, Tri};

use super::morton;

const QUANTIZE_EPSILON: f32 = 1e-4;

/// `(face index, corner indices into `BBox::get_corners`'s layout)`, one
/// entry per cardinal direction. Shares the exact quad layout
/// `BBox::to_mesh` uses, since both construct outward-facing faces of the
/// same 8-corner box under the same corner-index convention.
const FACES: [(usize, [usize; 4]); 6] = [
    (0, [0, 4, 6, 2]), // -x
    (1, [1, 3, 7, 5]), // +x
    (2, [0, 1, 5, 4]), // -y
    (3, [2, 6, 7, 3]), // +y
    (4, [0, 2, 3, 1]), // -z
    (5, [4, 5, 7, 6]), // +z
];

const NEIGHBOR_OFFSETS: [[i32; 3]; 6] = [
    [-1, 0, 0],
    [1, 0, 0],
    [0, -1, 0],
    [0, 1, 0],
    [0, 0, -1],
    [0, 0, 1],
];

fn check_positive_size(size: Vec3) -> Result<()> {
    if size.x <= 0.0 || size.y <= 0.0 || size.z <= 0.0 {
        return Err(Error::Argument(format!("voxel size must be positive, got {size:?}")));
    }
    Ok(())
}

/// Quantizes world-space voxel origins to non-negative integer indices on
/// the lattice anchored at their componentwise minimum.
fn quantize_origins(origins: &[Vec3], size: Vec3) -> Result<Vec<[i32; 3]>> {
    let mut min = origins[0];
    for &o in &origins[1..] {
        min = min.min(o);
    }
    let inv = Vec3::ONE / size;

    origins
        .iter()
        .map(|&o| {
            let q = ((o - min) * inv + Vec3::splat(QUANTIZE_EPSILON)).floor();
            if q.x < 0.0 || q.y < 0.0 || q.z < 0.0 {
                return Err(Error::Argument(format!(
                    "voxel origin {o:?} quantizes to a negative index relative to minimum {min:?}"
                )));
            }
            Ok([q.x as i32, q.y as i32, q.z as i32])
        })
        .collect()
}

/// Builds a face-culled mesh from a set of occupied voxel origins on a
/// uniform lattice: an internal face shared by two occupied voxels is
/// omitted. Errors if `origins` is empty — there is nothing to mesh.
pub struct DiscreteMesher;

impl DiscreteMesher {
    pub fn generate_mesh(origins: &[Vec3], size: Vec3, cord: CordSystem) -> Result<Mesh> {
        if origins.is_empty() {
            return Err(Error::InvariantViolation(
                "cannot mesh an empty voxel set".into(),
            ));
        }
        check_positive_size(size)?;

        let mut min = origins[0];
        for &o in &origins[1..] {
            min = min.min(o);
        }
        let indices = quantize_origins(origins, size)?;

        let mut present: AHashSet<u64> = AHashSet::default();
        for idx in &indices {
            present.insert(morton::encode(idx[0] as u32, idx[1] as u32, idx[2] as u32));
        }

        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for idx in &indices {
            let vm = min + Vec3::new(idx[0] as f32, idx[1] as f32, idx[2] as f32) * size;
            let mut corners = [Vec3::ZERO; 8];
            BBox::new(vm, vm + size).get_corners(&mut corners);

            for &(face, quad) in &FACES {
                let offset = NEIGHBOR_OFFSETS[face];
                let (nx, ny, nz) = (idx[0] + offset[0], idx[1] + offset[1], idx[2] + offset[2]);
                let occupied = nx >= 0
                    && ny >= 0
                    && nz >= 0
                    && present.contains(&morton::encode(nx as u32, ny as u32, nz as u32));
                if occupied {
                    continue;
                }

                let base = vertices.len() as u32;
                for &c in &quad {
                    vertices.push(corners[c]);
                }
                let (a, b, c) = cord.orient(base, base + 1, base + 2);
                faces.push(Tri::new(a, b, c));
                let (a2, b2, c2) = cord.orient(base, base + 2, base + 3);
                faces.push(Tri::new(a2, b2, c2));
            }
        }

        Ok(Mesh::new(vertices, faces, None))
    }

    /// As [`DiscreteMesher::generate_mesh`], but for voxels whose sizes
    /// vary: culling requires a shared lattice, so every voxel emits all six
    /// faces unconditionally.
    pub fn generate_mesh_varying_sizes(origins: &[Vec3], sizes: &[Vec3], cord: CordSystem) -> Result<Mesh> {
        if origins.is_empty() {
            return Err(Error::InvariantViolation(
                "cannot mesh an empty voxel set".into(),
            ));
        }
        if origins.len() != sizes.len() {
            return Err(Error::Argument(format!(
                "origins length {} does not match sizes length {}",
                origins.len(),
                sizes.len()
            )));
        }
        for &s in sizes {
            check_positive_size(s)?;
        }

        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for (&origin, &size) in origins.iter().zip(sizes.iter()) {
            let mut corners = [Vec3::ZERO; 8];
            BBox::new(origin, origin + size).get_corners(&mut corners);
            for &(_, quad) in &FACES {
                let base = vertices.len() as u32;
                for &c in &quad {
                    vertices.push(corners[c]);
                }
                let (a, b, c) = cord.orient(base, base + 1, base + 2);
                faces.push(Tri::new(a, b, c));
                let (a2, b2, c2) = cord.orient(base, base + 2, base + 3);
                faces.push(Tri::new(a2, b2, c2));
            }
        }
        Ok(Mesh::new(vertices, faces, None))
    }

    /// Meshes several independent voxel-origin sets (e.g. separate
    /// connected components), one output mesh per set, each culled on its
    /// own lattice.
    pub fn generate_meshes(origin_sets: &[Vec<Vec3>], size: Vec3, cord: CordSystem) -> Result<Vec<Mesh>> {
        origin_sets
            .iter()
            .map(|origins| Self::generate_mesh(origins, size, cord))
            .collect()
    }

    /// The standalone, uncalled per-voxel box mesh: 24 vertices / 12
    /// triangles per voxel, concatenated into one mesh. Used for debugging,
    /// not for production surface output.
    pub fn generate_mesh_naive(origins: &[Vec3], size: Vec3, cord: CordSystem) -> Result<Mesh> {
        if origins.is_empty() {
            return Err(Error::InvariantViolation(
                "cannot mesh an empty voxel set".into(),
            ));
        }
        check_positive_size(size)?;

        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for &origin in origins {
            let voxel = BBox::new(origin, origin + size).to_mesh(cord);
            let base = vertices.len() as u32;
            vertices.extend_from_slice(voxel.vertices());
            faces.extend(voxel.faces().iter().map(|f| {
                Tri::new(f.a + base, f.b + base, f.c + base)
            }));
        }
        Ok(Mesh::new(vertices, faces, Some(false)))
    }

    /// The axis-aligned bounding box covering every voxel in `origins` at
    /// the given `size`.
    pub fn get_voxel_bounds(origins: &[Vec3], size: Vec3) -> BBox {
        let mut b = BBox::EMPTY;
        for &o in origins {
            b.expand_point(o);
            b.expand_point(o + size);
        }
        b
    }
}
