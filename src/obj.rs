//! Minimal OBJ reader/writer. Not part of the algorithmic core — supporting
//! infrastructure the mesh type's tests and any caller's interop path lean
//! on: plain `v`/`f` records only, no materials, no groups, no normals.

use glam::Vec3;

use crate::error::{Error, Result};
use crate::mesh::{Mesh, Tri};

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

fn parse_float(raw: &str, line: usize, full_line: &str) -> Result<f32> {
    raw.parse::<f32>().map_err(|_| Error::Format {
        line,
        raw: full_line.to_string(),
    })
}

/// One face index token (`v`, `v/vt`, `v//vn`, or `v/vt/vn`); only the first
/// field is used. Negative indices are relative to the vertex count seen so
/// far (`-1` = last). `0` is never valid.
fn parse_face_index(token: &str, vertex_count: usize, line: usize, full_line: &str) -> Result<u32> {
    let first = token.split('/').next().unwrap_or(token);
    let v: i64 = first.parse().map_err(|_| Error::Format {
        line,
        raw: full_line.to_string(),
    })?;
    if v == 0 {
        return Err(Error::Format {
            line,
            raw: full_line.to_string(),
        });
    }
    let one_based = if v < 0 { vertex_count as i64 + v + 1 } else { v };
    if one_based < 1 || one_based > vertex_count as i64 {
        return Err(Error::Format {
            line,
            raw: full_line.to_string(),
        });
    }
    Ok((one_based - 1) as u32)
}

/// Parses OBJ text into a mesh: `v x y z [w]` (`w` ignored) and `f a b c`
/// records, 1-based indices, inline `#` comments stripped. Unknown record
/// types are ignored. `closed` is derived by the watertight test.
pub fn read(text: &str) -> Result<Mesh> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for (line_no, raw_line) in text.lines().enumerate() {
        let line = line_no + 1;
        let trimmed = strip_comment(raw_line).trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut tokens = trimmed.split_whitespace();
        let Some(record) = tokens.next() else {
            continue;
        };

        match record {
            "v" => {
                let rest: Vec<&str> = tokens.collect();
                if rest.len() < 3 {
                    return Err(Error::Format {
                        line,
                        raw: raw_line.to_string(),
                    });
                }
                let x = parse_float(rest[0], line, raw_line)?;
                let y = parse_float(rest[1], line, raw_line)?;
                let z = parse_float(rest[2], line, raw_line)?;
                vertices.push(Vec3::new(x, y, z));
            }
            "f" => {
                let rest: Vec<&str> = tokens.collect();
                if rest.len() != 3 {
                    return Err(Error::NotSupported("Only triangular faces".into()));
                }
                let a = parse_face_index(rest[0], vertices.len(), line, raw_line)?;
                let b = parse_face_index(rest[1], vertices.len(), line, raw_line)?;
                let c = parse_face_index(rest[2], vertices.len(), line, raw_line)?;
                faces.push(Tri::new(a, b, c));
            }
            _ => {} // unknown record types are ignored
        }
    }

    Mesh::try_new(vertices, faces, None)
}

/// Writes a mesh as OBJ text: LF line endings, invariant (`.`) decimal
/// formatting with no trailing zeros, 1-based indices, one record per line.
pub fn write(mesh: &Mesh) -> String {
    let mut out = String::new();
    for v in mesh.vertices() {
        out.push_str(&format!("v {} {} {}\n", v.x, v.y, v.z));
    }
    for f in mesh.faces() {
        out.push_str(&format!("f {} {} {}\n", f.a + 1, f.b + 1, f.c + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PYRAMID_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0.5 0.5 1.6
f 5 1 2
f 5 2 3
f 5 3 4
f 5 4 1
f 1 3 2
f 1 4 3
";

    #[test]
    fn pyramid_loads_with_expected_shape() {
        let mesh = read(PYRAMID_OBJ).unwrap();
        assert_eq!(mesh.vertices().len(), 5);
        assert_eq!(mesh.faces().len(), 6);
        assert!(mesh.is_closed());
    }

    #[test]
    fn pyramid_round_trips_to_the_expected_lines() {
        let mesh = read(PYRAMID_OBJ).unwrap();
        let text = write(&mesh);
        assert!(text.contains("v 0 0 0"));
        assert!(text.contains("v 0.5 0.5 1.6"));
        assert!(text.contains("f 5 1 2"));
    }

    #[test]
    fn round_trip_preserves_vertices_and_face_multiset() {
        let mesh = read(PYRAMID_OBJ).unwrap();
        let reloaded = read(&write(&mesh)).unwrap();
        assert_eq!(mesh.vertices().len(), reloaded.vertices().len());
        for (a, b) in mesh.vertices().iter().zip(reloaded.vertices().iter()) {
            assert!((*a - *b).length() < 1e-6);
        }
        let mut a: Vec<_> = mesh.faces().iter().map(|t| t.indices()).collect();
        let mut b: Vec<_> = reloaded.faces().iter().map(|t| t.indices()).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn inline_comments_and_blank_lines_are_ignored() {
        let text = "# a comment\nv 0 0 0 # trailing\n\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = read(text).unwrap();
        assert_eq!(mesh.vertices().len(), 3);
    }

    #[test]
    fn negative_face_indices_are_relative_to_vertex_count() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = read(text).unwrap();
        assert_eq!(mesh.faces()[0].indices(), [0, 1, 2]);
    }

    #[test]
    fn zero_face_index_is_a_format_error() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n";
        assert!(matches!(read(text), Err(Error::Format { .. })));
    }

    #[test]
    fn non_triangular_face_is_not_supported() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 3 4\n";
        assert!(matches!(read(text), Err(Error::NotSupported(_))));
    }

    #[test]
    fn face_with_vt_vn_fields_uses_only_the_vertex_index() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1/1 2/2/2 3//3\n";
        let mesh = read(text).unwrap();
        assert_eq!(mesh.faces()[0].indices(), [0, 1, 2]);
    }
}
