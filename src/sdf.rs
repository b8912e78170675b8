//! Builds a signed distance field from a binary or ternary occupancy mask:
//! two 3-D EDT passes (to foreground and background), combined with sign.
//!
//! Positive outside the surface, negative inside, zero on the boundary. The
//! isotropic path (uniform voxel spacing) runs the integer EDT throughout
//! and only converts to world units at the final `sqrt`; the anisotropic
//! path runs the floating EDT directly in squared world units.

use std::sync::OnceLock;

use crate::edt::{
    transform_3d_isotropic, transform_3d_weighted, ISOTROPIC_INF, WEIGHTED_INF,
};
use crate::error::{Error, Result};
use crate::grid::GridMeta;
use crate::parallel::BufferPool;

const UNIFORM_SPACING_EPSILON: f32 = 1e-6;

static I32_POOL: OnceLock<BufferPool<i32>> = OnceLock::new();
static F64_POOL: OnceLock<BufferPool<f64>> = OnceLock::new();

fn i32_pool() -> &'static BufferPool<i32> {
    I32_POOL.get_or_init(BufferPool::new)
}

fn f64_pool() -> &'static BufferPool<f64> {
    F64_POOL.get_or_init(BufferPool::new)
}

fn is_uniform_spacing(meta: &GridMeta) -> bool {
    let s = meta.voxel_size;
    (s.x - s.y).abs() < UNIFORM_SPACING_EPSILON && (s.y - s.z).abs() < UNIFORM_SPACING_EPSILON
}

fn check_mask(mask: &[u8], meta: &GridMeta, out: &[f32]) -> Result<()> {
    let n = meta.count();
    if mask.len() != n {
        return Err(Error::Argument(format!(
            "mask length {} does not match grid cell count {n}",
            mask.len()
        )));
    }
    if out.len() != n {
        return Err(Error::Argument(format!(
            "output span length {} does not match grid cell count {n}",
            out.len()
        )));
    }
    Ok(())
}

/// `fg_in(mask[i])` selects which cells seed the foreground cost volume,
/// `bg_in(mask[i])` selects which seed the background one. Shared by the
/// binary and ternary builders — they differ only in these predicates and
/// in what happens to the combined result afterward.
fn build_signed_field(
    mask: &[u8],
    meta: &GridMeta,
    out: &mut [f32],
    parallel: bool,
    fg_in: impl Fn(u8) -> bool,
    bg_in: impl Fn(u8) -> bool,
) -> Result<()> {
    check_mask(mask, meta, out)?;
    let n = meta.count();
    let dims = [meta.nx as usize, meta.ny as usize, meta.nz as usize];

    if is_uniform_spacing(meta) {
        let mut f_fg = i32_pool().rent(n);
        let mut f_bg = i32_pool().rent(n);
        for i in 0..n {
            f_fg[i] = if fg_in(mask[i]) { 0 } else { ISOTROPIC_INF };
            f_bg[i] = if bg_in(mask[i]) { 0 } else { ISOTROPIC_INF };
        }
        let mut d_fg = i32_pool().rent(n);
        let mut d_bg = i32_pool().rent(n);
        transform_3d_isotropic(&f_fg, dims, &mut d_fg, parallel)?;
        transform_3d_isotropic(&f_bg, dims, &mut d_bg, parallel)?;

        let spacing = meta.voxel_size.x;
        for i in 0..n {
            out[i] = (f64::from(d_fg[i]).sqrt() - f64::from(d_bg[i]).sqrt()) as f32 * spacing;
        }
    } else {
        let mut f_fg = f64_pool().rent(n);
        let mut f_bg = f64_pool().rent(n);
        for i in 0..n {
            f_fg[i] = if fg_in(mask[i]) { 0.0 } else { WEIGHTED_INF };
            f_bg[i] = if bg_in(mask[i]) { 0.0 } else { WEIGHTED_INF };
        }
        let weights = meta.voxel_size * meta.voxel_size;
        let mut d_fg = f64_pool().rent(n);
        let mut d_bg = f64_pool().rent(n);
        transform_3d_weighted(&f_fg, dims, weights, &mut d_fg, parallel)?;
        transform_3d_weighted(&f_bg, dims, weights, &mut d_bg, parallel)?;

        for i in 0..n {
            out[i] = (d_fg[i].sqrt() - d_bg[i].sqrt()) as f32;
        }
    }

    Ok(())
}

/// `mask[i] ∈ {0, 1}`, `1` = inside. Mutates `out` in place.
pub fn build_from_binary_mask(mask: &[u8], meta: &GridMeta, out: &mut [f32], parallel: bool) -> Result<()> {
    build_signed_field(mask, meta, out, parallel, |m| m == 1, |m| m == 0)
}

/// `mask[i] ∈ {0, 1, 2}` (`Outside, Inside, Boundary`). Boundary cells seed
/// both the foreground and background cost volumes; after combining, any
/// cell with `mask[i] == 2` is snapped to exactly `0.0` to remove floating
/// noise on the zero level set.
pub fn build_from_ternary_mask(mask: &[u8], meta: &GridMeta, out: &mut [f32], parallel: bool) -> Result<()> {
    build_signed_field(
        mask,
        meta,
        out,
        parallel,
        |m| m == 1 || m == 2,
        |m| m == 0 || m == 2,
    )?;
    for (o, &m) in out.iter_mut().zip(mask.iter()) {
        if m == 2 {
            *o = 0.0;
        }
    }
    Ok(())
}
