use glam::Vec3;

use crate::cord_system::CordSystem;
use crate::mesh::{Mesh, Tri};

/// An axis-aligned bounding box.
///
/// The empty box is represented by `min = +infinity`, `max = -infinity` so
/// that repeated [`BBox::expand`] calls build up a box from scratch without
/// a separate "is this the first point" branch. A box is *degenerate* when
/// any component of `min` is greater than the corresponding component of
/// `max` — callers that need `valid ⇒ min ≤ max` should check
/// [`BBox::is_valid`] before relying on [`BBox::center`]/[`BBox::size`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BBox {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// `min ≤ max` on every axis. `false` for the empty box.
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn half_extent(&self) -> Vec3 {
        self.size() * 0.5
    }

    pub fn surface_area(&self) -> f32 {
        if !self.is_valid() {
            return 0.0;
        }
        let s = self.size();
        2.0 * (s.x * s.y + s.y * s.z + s.z * s.x)
    }

    pub fn expand_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn expand_box(&mut self, other: &BBox) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn expanded_by(&self, pad: Vec3) -> Self {
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Inclusive on all faces.
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Inclusive on all faces.
    pub fn contains_box(&self, other: &BBox) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Inclusive overlap test.
    pub fn intersects(&self, other: &BBox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// The 8 corners, in the fixed order used throughout the crate: x varies
    /// fastest, then y, then z (same ordering as grid linear indexing).
    pub fn get_corners(&self, out: &mut [Vec3; 8]) {
        let (min, max) = (self.min, self.max);
        out[0] = Vec3::new(min.x, min.y, min.z);
        out[1] = Vec3::new(max.x, min.y, min.z);
        out[2] = Vec3::new(min.x, max.y, min.z);
        out[3] = Vec3::new(max.x, max.y, min.z);
        out[4] = Vec3::new(min.x, min.y, max.z);
        out[5] = Vec3::new(max.x, min.y, max.z);
        out[6] = Vec3::new(min.x, max.y, max.z);
        out[7] = Vec3::new(max.x, max.y, max.z);
    }

    /// A standalone 8-vertex / 12-triangle box mesh for this bounding box.
    /// Used by the naive (non-culled) voxel mesher and for debugging.
    pub fn to_mesh(&self, cord: CordSystem) -> Mesh {
        let mut corners = [Vec3::ZERO; 8];
        self.get_corners(&mut corners);

        // Corner indices per the `get_corners` layout: bit0=x, bit1=y, bit2=z.
        let mut faces = Vec::with_capacity(12);
        let mut push_quad = |a: u32, b: u32, c: u32, d: u32| {
            let (a0, b0, c0) = cord.orient(a, b, c);
            faces.push(Tri::new(a0, b0, c0));
            let (a1, c1, d1) = cord.orient(a, c, d);
            faces.push(Tri::new(a1, c1, d1));
        };

        // -x, +x, -y, +y, -z, +z, each outward-facing under RightHanded.
        push_quad(0, 4, 6, 2);
        push_quad(1, 3, 7, 5);
        push_quad(0, 1, 5, 4);
        push_quad(2, 6, 7, 3);
        push_quad(0, 2, 3, 1);
        push_quad(4, 5, 7, 6);

        Mesh::new(corners.to_vec(), faces, Some(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_expands_from_scratch() {
        let mut b = BBox::EMPTY;
        assert!(!b.is_valid());
        b.expand_point(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.min, b.max);
        b.expand_point(Vec3::new(-1.0, 5.0, 0.0));
        assert_eq!(b.min, Vec3::new(-1.0, 2.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 5.0, 3.0));
    }

    #[test]
    fn contains_and_intersects_are_inclusive() {
        let b = BBox::new(Vec3::ZERO, Vec3::ONE);
        assert!(b.contains_point(Vec3::ZERO));
        assert!(b.contains_point(Vec3::ONE));
        let touching = BBox::new(Vec3::ONE, Vec3::splat(2.0));
        assert!(b.intersects(&touching));
    }

    #[test]
    fn surface_area_zero_when_degenerate() {
        let degenerate = BBox::new(Vec3::ONE, Vec3::ZERO);
        assert!(!degenerate.is_valid());
        assert_eq!(degenerate.surface_area(), 0.0);
    }

    #[test]
    fn to_mesh_has_eight_vertices_and_twelve_triangles() {
        let b = BBox::new(Vec3::ZERO, Vec3::ONE);
        let mesh = b.to_mesh(CordSystem::RightHanded);
        assert_eq!(mesh.vertices().len(), 8);
        assert_eq!(mesh.faces().len(), 12);
    }
}
