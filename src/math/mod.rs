//! Small geometric types and predicates, adapted from `glam` the way the
//! teacher's own `math.rs` adapted `macaw` types onto `glam` — a thin local
//! layer, not a reimplementation of vector math.

mod bounding_box;
pub use bounding_box::*;

mod sat;
pub use sat::*;

/// World-space vector type used throughout the crate.
pub use glam::Vec3;
