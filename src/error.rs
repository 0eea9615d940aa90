//! Error taxonomy for the field-of-view kernel.

use thiserror::Error;

/// Things that can go wrong when rasterizing a field of view.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FovError {
    /// Octant index outside `0..=7`.
    #[error("octant index {0} out of range (expected 0..=7)")]
    InvalidOctant(usize),

    /// Negative radius.
    #[error("radius {0} is negative")]
    DegenerateRadius(i32),

    /// A column produced more rays than the configured hard cap.
    #[error("ray list capacity of {capacity} exceeded")]
    RayCapacityExceeded { capacity: usize },

    /// Lightmap and grid disagree on size.
    #[error("lightmap size {lightmap:?} does not match grid size {grid:?}")]
    DimensionMismatch {
        grid: (usize, usize),
        lightmap: (usize, usize),
    },

    #[error("grid has no cells")]
    EmptyGrid,

    /// Raw buffer length does not match `width * height`.
    #[error("buffer holds {actual} cells, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}
