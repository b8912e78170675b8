//! A 3D polyline: an ordered vertex sequence, optionally closed, with an
//! incrementally-maintained cached length.

use glam::Vec3;

use crate::error::{Error, Result};

const CLOSING_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone)]
pub struct Polyline {
    vertices: Vec<Vec3>,
    closed: bool,
    length: f32,
}

impl Polyline {
    /// `closed` requires at least 3 vertices and the first/last vertex to
    /// coincide within `1e-6`.
    pub fn try_new(vertices: Vec<Vec3>, closed: bool) -> Result<Self> {
        if closed {
            if vertices.len() < 3 {
                return Err(Error::Argument(
                    "closed polyline needs at least 3 vertices".into(),
                ));
            }
            let gap = (vertices[0] - vertices[vertices.len() - 1]).length();
            if gap > CLOSING_EPSILON {
                return Err(Error::Argument(format!(
                    "closed polyline endpoints are {gap} apart, must be within {CLOSING_EPSILON}"
                )));
            }
        }
        let length = compute_length(&vertices, closed);
        Ok(Self {
            vertices,
            closed,
            length,
        })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    /// Appends a single vertex, updating the cached length incrementally.
    /// Not valid on a closed polyline (the closing edge would need to move).
    pub fn append(&mut self, v: Vec3) -> Result<()> {
        if self.closed {
            return Err(Error::Argument(
                "cannot append to a closed polyline".into(),
            ));
        }
        if let Some(&last) = self.vertices.last() {
            self.length += (v - last).length();
        }
        self.vertices.push(v);
        Ok(())
    }

    pub fn append_all(&mut self, vs: impl IntoIterator<Item = Vec3>) -> Result<()> {
        for v in vs {
            self.append(v)?;
        }
        Ok(())
    }

    /// The edges of the polyline, including the closing edge when `closed`.
    pub fn edges(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let n = self.vertices.len();
        (0..n.saturating_sub(1))
            .map(move |i| (self.vertices[i], self.vertices[i + 1]))
            .chain(
                (self.closed && n > 1)
                    .then(|| (self.vertices[n - 1], self.vertices[0]))
                    .into_iter(),
            )
    }
}

fn compute_length(vertices: &[Vec3], closed: bool) -> f32 {
    let mut length = 0.0;
    for w in vertices.windows(2) {
        length += (w[1] - w[0]).length();
    }
    if closed && vertices.len() > 1 {
        length += (vertices[0] - vertices[vertices.len() - 1]).length();
    }
    length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_length_sums_adjacent_distances() {
        let p = Polyline::try_new(
            vec![Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), Vec3::new(3.0, 4.0, 0.0)],
            false,
        )
        .unwrap();
        assert!((p.length() - 8.0).abs() < 1e-6);
    }

    #[test]
    fn closed_requires_matching_endpoints() {
        let err = Polyline::try_new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            true,
        );
        assert!(err.is_err());
    }

    #[test]
    fn append_updates_length_incrementally() {
        let mut p = Polyline::try_new(vec![Vec3::ZERO], false).unwrap();
        p.append(Vec3::new(2.0, 0.0, 0.0)).unwrap();
        assert!((p.length() - 2.0).abs() < 1e-6);
    }
}
