//! 6-connected BFS interior/exterior classification over an `OccupancyGrid`.
//!
//! Works entirely in the grid's linear index space: a seed/traversal pass
//! never computes a world position. This is the only traversal shape the
//! crate implements for flood fill — there is no secondary coordinate-space
//! path to keep in sync with it.

use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::grid::{Occupancy, OccupancyGrid};

/// The BFS queue enqueues each cell at most once, so it can never
/// legitimately hold more than the grid's cell count at a time. Exceeding
/// this is a bug, not a large input, hence an error rather than silent
/// unbounded growth.
fn hard_queue_limit(total_cells: usize) -> usize {
    total_cells + 1
}

#[inline]
fn lin(x: usize, y: usize, z: usize, nx: usize, ny: usize) -> usize {
    z * nx * ny + y * nx + x
}

/// Flood-fills `grid` in place: every cell reachable from the six boundary
/// faces without crossing a `Boundary` cell becomes `Outside`; every other
/// non-`Boundary` cell becomes `Inside`. `Boundary` cells are untouched.
pub fn flood_fill(grid: &mut OccupancyGrid) -> Result<()> {
    let meta = *grid.meta();
    let (nx, ny, nz) = (meta.nx as usize, meta.ny as usize, meta.nz as usize);
    let n = nx * ny * nz;
    let limit = hard_queue_limit(n);

    let data = grid.data_mut();
    let mut visited = vec![false; n];
    let mut queue: VecDeque<usize> = VecDeque::new();

    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                let on_face =
                    x == 0 || x == nx - 1 || y == 0 || y == ny - 1 || z == 0 || z == nz - 1;
                if !on_face {
                    continue;
                }
                let i = lin(x, y, z, nx, ny);
                if data[i] != Occupancy::Boundary && !visited[i] {
                    visited[i] = true;
                    queue.push_back(i);
                }
            }
        }
    }

    while let Some(i) = queue.pop_front() {
        let z = i / (nx * ny);
        let rem = i % (nx * ny);
        let y = rem / nx;
        let x = rem % nx;

        let mut neighbors = [None; 6];
        if x > 0 {
            neighbors[0] = Some(lin(x - 1, y, z, nx, ny));
        }
        if x + 1 < nx {
            neighbors[1] = Some(lin(x + 1, y, z, nx, ny));
        }
        if y > 0 {
            neighbors[2] = Some(lin(x, y - 1, z, nx, ny));
        }
        if y + 1 < ny {
            neighbors[3] = Some(lin(x, y + 1, z, nx, ny));
        }
        if z > 0 {
            neighbors[4] = Some(lin(x, y, z - 1, nx, ny));
        }
        if z + 1 < nz {
            neighbors[5] = Some(lin(x, y, z + 1, nx, ny));
        }

        for nb in neighbors.into_iter().flatten() {
            if data[nb] != Occupancy::Boundary && !visited[nb] {
                visited[nb] = true;
                queue.push_back(nb);
                if queue.len() > limit {
                    return Err(Error::InvariantViolation(format!(
                        "flood fill queue grew past {limit} entries for a {n}-cell grid"
                    )));
                }
            }
        }
    }

    for i in 0..n {
        if data[i] == Occupancy::Boundary {
            continue;
        }
        data[i] = if visited[i] { Occupancy::Outside } else { Occupancy::Inside };
    }

    Ok(())
}
