//! Error surface for every fallible entry point in the crate.
//!
//! Numerical edge cases that have a well-defined fallback (a near-degenerate
//! triangle normal, a near-zero sampling gradient) are *not* routed through
//! [`Error`] — they resolve to the documented fallback value instead. See
//! the individual operations for those cases.

/// Everything that can go wrong calling into `voxfield`.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A buffer/slice argument had the wrong length, or a dimension/spacing
    /// argument was non-positive, or a mesh was malformed.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// An index or world position fell outside a grid's bounds and the
    /// caller asked not to clamp.
    #[error("index or position out of range: {0}")]
    OutOfRange(String),

    /// A line of an OBJ file could not be parsed.
    #[error("malformed OBJ data at line {line}: {raw:?}")]
    Format { line: usize, raw: String },

    /// An OBJ face record was not triangular.
    #[error("unsupported record: {0}")]
    NotSupported(String),

    /// An internal invariant that the caller is responsible for upholding
    /// was violated (e.g. meshing an empty voxel set, or a flood-fill queue
    /// that grew past the total cell count).
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
