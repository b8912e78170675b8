//! Triangle mesh type: owned vertex/face buffers, a lazily-cached bounding
//! box, and the watertight test flood fill relies on to know whether a mesh
//! is safe to classify interior/exterior.

use std::cell::Cell;
use std::collections::HashMap;

use glam::Vec3;

use crate::error::{Error, Result};
use crate::math::BBox;

/// A triangle: three non-negative, distinct, in-range vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tri {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Tri {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }

    pub fn indices(&self) -> [u32; 3] {
        [self.a, self.b, self.c]
    }

    /// Distinct indices; in-range is checked against a vertex count by the
    /// mesh that owns it.
    pub fn is_valid(&self) -> bool {
        self.a != self.b && self.b != self.c && self.a != self.c
    }
}

/// An owned triangle mesh.
///
/// `closed` is either supplied at construction or derived by the watertight
/// test: every undirected edge must appear exactly twice, once in each
/// orientation. Bounds are computed lazily and cached; `recompute_bounds`
/// invalidates the cache.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<Tri>,
    closed: bool,
    bounds: Cell<Option<BBox>>,
}

impl Mesh {
    /// Builds a mesh, validating every face's indices are in range and
    /// distinct. `closed` is derived by the watertight test when `None`.
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Tri>, closed: Option<bool>) -> Self {
        for f in &faces {
            debug_assert!(f.is_valid(), "degenerate face with repeated index");
            debug_assert!(
                (f.a as usize) < vertices.len()
                    && (f.b as usize) < vertices.len()
                    && (f.c as usize) < vertices.len(),
                "face index out of range"
            );
        }
        let closed = closed.unwrap_or_else(|| is_watertight(&vertices, &faces));
        Self {
            vertices,
            faces,
            closed,
            bounds: Cell::new(None),
        }
    }

    /// Fallible constructor, used by the OBJ loader and any other untrusted
    /// input path.
    pub fn try_new(vertices: Vec<Vec3>, faces: Vec<Tri>, closed: Option<bool>) -> Result<Self> {
        for f in &faces {
            if !f.is_valid() {
                return Err(Error::Argument(format!(
                    "degenerate face with repeated index: {f:?}"
                )));
            }
            if f.a as usize >= vertices.len() || f.b as usize >= vertices.len() || f.c as usize >= vertices.len() {
                return Err(Error::Argument(format!(
                    "face index out of range (have {} vertices): {f:?}",
                    vertices.len()
                )));
            }
        }
        let closed = closed.unwrap_or_else(|| is_watertight(&vertices, &faces));
        Ok(Self {
            vertices,
            faces,
            closed,
            bounds: Cell::new(None),
        })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Tri] {
        &self.faces
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The mesh's bounding box, computed on first access and cached.
    pub fn bounds(&self) -> BBox {
        if let Some(b) = self.bounds.get() {
            return b;
        }
        let mut b = BBox::EMPTY;
        for &v in &self.vertices {
            b.expand_point(v);
        }
        self.bounds.set(Some(b));
        b
    }

    /// Invalidates the cached bounds, e.g. after mutating vertices in place
    /// through some other handle.
    pub fn invalidate_bounds(&self) {
        self.bounds.set(None);
    }

    /// Per-face bounding boxes, in face order. Used by the rasterizer to
    /// derive each triangle's voxel AABB without recomputing vertex lookups.
    pub fn enumerate_triangle_bounds(&self) -> Vec<BBox> {
        self.faces
            .iter()
            .map(|f| {
                let (v0, v1, v2) = self.triangle(f);
                let mut b = BBox::from_point(v0);
                b.expand_point(v1);
                b.expand_point(v2);
                b
            })
            .collect()
    }

    /// The three world-space vertices of a face.
    pub fn triangle(&self, f: &Tri) -> (Vec3, Vec3, Vec3) {
        (
            self.vertices[f.a as usize],
            self.vertices[f.b as usize],
            self.vertices[f.c as usize],
        )
    }
}

fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Every undirected edge must appear exactly twice, once per orientation.
/// Duplicate edges, open edges, or inconsistent winding all fail the test.
fn is_watertight(vertices: &[Vec3], faces: &[Tri]) -> bool {
    if faces.is_empty() || vertices.is_empty() {
        return false;
    }

    // Count each *directed* edge; a watertight, consistently-wound mesh has
    // every directed edge exactly once, and its reverse exactly once.
    let mut directed: HashMap<(u32, u32), u32> = HashMap::new();
    for f in faces {
        for &(from, to) in &[(f.a, f.b), (f.b, f.c), (f.c, f.a)] {
            *directed.entry((from, to)).or_insert(0) += 1;
        }
    }

    let mut undirected: HashMap<(u32, u32), u32> = HashMap::new();
    for (&(from, to), &count) in &directed {
        if count != 1 {
            return false; // duplicate directed edge: inconsistent winding or degenerate overlap
        }
        *undirected.entry(edge_key(from, to)).or_insert(0) += count;
    }

    undirected.values().all(|&count| count == 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pyramid() -> (Vec<Vec3>, Vec<Tri>) {
        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.5, 0.5, 1.6),
        ];
        let faces = vec![
            Tri::new(0, 2, 1),
            Tri::new(0, 3, 2),
            Tri::new(0, 1, 4),
            Tri::new(1, 2, 4),
            Tri::new(2, 3, 4),
            Tri::new(3, 0, 4),
        ];
        (vertices, faces)
    }

    #[test]
    fn pyramid_is_watertight() {
        let (v, f) = pyramid();
        let mesh = Mesh::new(v, f, None);
        assert!(mesh.is_closed());
    }

    #[test]
    fn removing_a_face_breaks_watertightness() {
        let (v, mut f) = pyramid();
        f.pop();
        let mesh = Mesh::new(v, f, None);
        assert!(!mesh.is_closed());
    }

    #[test]
    fn flipping_a_face_breaks_watertightness() {
        let (v, mut f) = pyramid();
        let last = f.len() - 1;
        let t = f[last];
        f[last] = Tri::new(t.a, t.c, t.b);
        let mesh = Mesh::new(v, f, None);
        assert!(!mesh.is_closed());
    }

    #[test]
    fn bounds_are_cached() {
        let (v, f) = pyramid();
        let mesh = Mesh::new(v, f, None);
        let b1 = mesh.bounds();
        let b2 = mesh.bounds();
        assert_eq!(b1, b2);
    }
}
