//! Reconstructing polygonal surfaces from a discrete set of occupied voxels.

pub mod morton;

mod discrete;
pub use discrete::*;
