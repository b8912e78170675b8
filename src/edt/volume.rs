//! Separable 2-D/3-D application of the 1-D EDT primitive, applied axis by
//! axis with two ping-pong volume buffers reused across passes (never one
//! fresh allocation per pass). Contiguous passes (x, the innermost axis)
//! parallelize over disjoint mutable chunks, the same way the teacher's
//! `Grid3::set_truncated` parallelizes over `chunks_mut`/`par_chunks_mut`;
//! strided passes (y, z) parallel-map each line to an owned result and
//! scatter sequentially, since a disjoint *strided* mutable borrow isn't
//! expressible without unsafe code, which this crate forbids.

use glam::Vec3;

use crate::error::{Error, Result};
use crate::parallel::parallel_map;

use super::line::{transform_isotropic, transform_weighted};

const PARALLEL_LINE_THRESHOLD: usize = 64;

fn expect_len(got: usize, want: usize, what: &str) -> Result<()> {
    if got != want {
        return Err(Error::Argument(format!(
            "{what} length {got} does not match expected {want}"
        )));
    }
    Ok(())
}

fn pass_contiguous_isotropic(a: &[i32], line_len: usize, b: &mut [i32], parallel: bool) {
    let lines = a.len() / line_len;
    let threshold = if parallel { PARALLEL_LINE_THRESHOLD } else { usize::MAX };
    let results = parallel_map(lines, threshold, |line| {
        let base = line * line_len;
        let mut out = vec![0i32; line_len];
        transform_isotropic(&a[base..base + line_len], &mut out);
        out
    });
    for (line, transformed) in results.into_iter().enumerate() {
        let base = line * line_len;
        b[base..base + line_len].copy_from_slice(&transformed);
    }
}

fn pass_contiguous_weighted(a: &[f64], line_len: usize, w: f64, b: &mut [f64], parallel: bool) {
    let lines = a.len() / line_len;
    let threshold = if parallel { PARALLEL_LINE_THRESHOLD } else { usize::MAX };
    let results = parallel_map(lines, threshold, |line| {
        let base = line * line_len;
        let mut out = vec![0.0f64; line_len];
        transform_weighted(&a[base..base + line_len], w, &mut out);
        out
    });
    for (line, transformed) in results.into_iter().enumerate() {
        let base = line * line_len;
        b[base..base + line_len].copy_from_slice(&transformed);
    }
}

/// A strided pass: `num_lines` lines of length `line_len`, where element `k`
/// of line `i` lives at `gather(i, k)` in the flat buffer.
fn pass_strided_isotropic(
    a: &[i32],
    num_lines: usize,
    line_len: usize,
    gather: impl Fn(usize, usize) -> usize + Sync,
    b: &mut [i32],
    parallel: bool,
) {
    let threshold = if parallel { PARALLEL_LINE_THRESHOLD } else { usize::MAX };
    let results = parallel_map(num_lines, threshold, |line| {
        let mut column = vec![0i32; line_len];
        for (k, slot) in column.iter_mut().enumerate() {
            *slot = a[gather(line, k)];
        }
        let mut out = vec![0i32; line_len];
        transform_isotropic(&column, &mut out);
        out
    });
    for (line, transformed) in results.into_iter().enumerate() {
        for (k, v) in transformed.into_iter().enumerate() {
            b[gather(line, k)] = v;
        }
    }
}

fn pass_strided_weighted(
    a: &[f64],
    num_lines: usize,
    line_len: usize,
    w: f64,
    gather: impl Fn(usize, usize) -> usize + Sync,
    b: &mut [f64],
    parallel: bool,
) {
    let threshold = if parallel { PARALLEL_LINE_THRESHOLD } else { usize::MAX };
    let results = parallel_map(num_lines, threshold, |line| {
        let mut column = vec![0.0f64; line_len];
        for (k, slot) in column.iter_mut().enumerate() {
            *slot = a[gather(line, k)];
        }
        let mut out = vec![0.0f64; line_len];
        transform_weighted(&column, w, &mut out);
        out
    });
    for (line, transformed) in results.into_iter().enumerate() {
        for (k, v) in transformed.into_iter().enumerate() {
            b[gather(line, k)] = v;
        }
    }
}

// ---------------------------------------------------------------- isotropic

/// Separable 2-D isotropic EDT: x pass then y pass.
pub fn transform_2d_isotropic(f: &[i32], dims: [usize; 2], out: &mut [i32], parallel: bool) -> Result<()> {
    let n = dims[0] * dims[1];
    expect_len(f.len(), n, "input")?;
    expect_len(out.len(), n, "output")?;
    let [nx, ny] = dims;

    let mut a = f.to_vec();
    let mut b = vec![0i32; n];

    pass_contiguous_isotropic(&a, nx, &mut b, parallel);
    std::mem::swap(&mut a, &mut b);

    pass_strided_isotropic(&a, nx, ny, |x, y| y * nx + x, &mut b, parallel);

    out.copy_from_slice(&b);
    Ok(())
}

/// Separable 3-D isotropic EDT: x pass, then y pass, then z pass, using two
/// ping-pong volume buffers.
pub fn transform_3d_isotropic(f: &[i32], dims: [usize; 3], out: &mut [i32], parallel: bool) -> Result<()> {
    let n = dims[0] * dims[1] * dims[2];
    expect_len(f.len(), n, "input")?;
    expect_len(out.len(), n, "output")?;
    let [nx, ny, nz] = dims;

    let mut a = f.to_vec();
    let mut b = vec![0i32; n];

    // x pass: contiguous rows, ny*nz of them.
    pass_contiguous_isotropic(&a, nx, &mut b, parallel);
    std::mem::swap(&mut a, &mut b);

    // y pass: one strided column per (x, z) pair.
    pass_strided_isotropic(
        &a,
        nx * nz,
        ny,
        move |line, k| {
            let x = line % nx;
            let z = line / nx;
            z * nx * ny + k * nx + x
        },
        &mut b,
        parallel,
    );
    std::mem::swap(&mut a, &mut b);

    // z pass: one strided column per (x, y) pair.
    pass_strided_isotropic(
        &a,
        nx * ny,
        nz,
        move |line, k| {
            let x = line % nx;
            let y = line / nx;
            k * nx * ny + y * nx + x
        },
        &mut b,
        parallel,
    );

    out.copy_from_slice(&b);
    Ok(())
}

// ----------------------------------------------------------------- weighted

/// Separable 3-D anisotropic EDT with per-axis weights `wx, wy, wz`
/// (typically `spacing²`).
pub fn transform_3d_weighted(
    f: &[f64],
    dims: [usize; 3],
    weights: Vec3,
    out: &mut [f64],
    parallel: bool,
) -> Result<()> {
    let n = dims[0] * dims[1] * dims[2];
    expect_len(f.len(), n, "input")?;
    expect_len(out.len(), n, "output")?;
    let [nx, ny, nz] = dims;
    let (wx, wy, wz) = (weights.x as f64, weights.y as f64, weights.z as f64);

    let mut a = f.to_vec();
    let mut b = vec![0.0f64; n];

    pass_contiguous_weighted(&a, nx, wx, &mut b, parallel);
    std::mem::swap(&mut a, &mut b);

    pass_strided_weighted(
        &a,
        nx * nz,
        ny,
        wy,
        move |line, k| {
            let x = line % nx;
            let z = line / nx;
            z * nx * ny + k * nx + x
        },
        &mut b,
        parallel,
    );
    std::mem::swap(&mut a, &mut b);

    pass_strided_weighted(
        &a,
        nx * ny,
        nz,
        wz,
        move |line, k| {
            let x = line % nx;
            let y = line / nx;
            k * nx * ny + y * nx + x
        },
        &mut b,
        parallel,
    );

    out.copy_from_slice(&b);
    Ok(())
}

pub use super::line::{ISOTROPIC_INF as INF_I32, WEIGHTED_INF as INF_F64};

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::line::ISOTROPIC_INF;
    use super::super::line::WEIGHTED_INF;

    #[test]
    fn sequential_and_parallel_3d_match() {
        let dims = [6, 5, 4];
        let n = dims[0] * dims[1] * dims[2];
        let mut f = vec![ISOTROPIC_INF; n];
        f[0] = 0;
        f[n - 1] = 0;

        let mut seq = vec![0; n];
        transform_3d_isotropic(&f, dims, &mut seq, false).unwrap();
        let mut par = vec![0; n];
        transform_3d_isotropic(&f, dims, &mut par, true).unwrap();

        assert_eq!(seq, par);
    }

    #[test]
    fn three_d_matches_brute_force_distance() {
        let dims = [4, 4, 4];
        let n = dims[0] * dims[1] * dims[2];
        let mut f = vec![ISOTROPIC_INF; n];
        let seed = (2usize, 1usize, 3usize);
        f[seed.2 * dims[0] * dims[1] + seed.1 * dims[0] + seed.0] = 0;

        let mut out = vec![0; n];
        transform_3d_isotropic(&f, dims, &mut out, false).unwrap();

        for z in 0..dims[2] {
            for y in 0..dims[1] {
                for x in 0..dims[0] {
                    let expected = (x as i64 - seed.0 as i64).pow(2)
                        + (y as i64 - seed.1 as i64).pow(2)
                        + (z as i64 - seed.2 as i64).pow(2);
                    let got = out[z * dims[0] * dims[1] + y * dims[0] + x];
                    assert_eq!(got as i64, expected);
                }
            }
        }
    }

    #[test]
    fn weighted_matches_isotropic_when_weights_are_one() {
        let dims = [4, 4, 4];
        let n = dims[0] * dims[1] * dims[2];
        let mut fi = vec![ISOTROPIC_INF; n];
        fi[0] = 0;
        let mut fw = vec![WEIGHTED_INF; n];
        fw[0] = 0.0;

        let mut oi = vec![0; n];
        transform_3d_isotropic(&fi, dims, &mut oi, false).unwrap();
        let mut ow = vec![0.0; n];
        transform_3d_weighted(&fw, dims, Vec3::ONE, &mut ow, false).unwrap();

        for i in 0..n {
            assert!((oi[i] as f64 - ow[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn wrong_length_is_an_argument_error() {
        let mut out = vec![0; 4];
        assert!(transform_3d_isotropic(&[0; 3], [2, 2, 2], &mut out, false).is_err());
    }
}
