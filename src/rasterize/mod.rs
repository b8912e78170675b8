//! Mesh and polyline rasterization: converting continuous geometry into
//! voxel sets, either written directly into a fixed-size grid ([`dense`]) or
//! collected as a deduplicated, unbounded set of voxel origins ([`sparse`]).

mod dense;
pub use dense::*;

mod sparse;
pub use sparse::*;
