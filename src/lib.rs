//! NumPy-style broadcasting for element-wise operations over dense arrays.
//!
//! Two arrays of different but compatible shapes are combined element by
//! element without materializing expanded copies of either input. Shapes are
//! aligned at their trailing dimensions, and size-1 dimensions are stretched.
//!
//! # Core Types
//!
//! - [`NdArray`]: Owned, dense, row-major array of a single element type
//! - [`Array`] / [`Scalar`]: Tagged variants over the supported element types
//! - [`DataType`]: Element type tag and the promotion rule between tags
//! - [`Missing`]: Per-type "missing data" sentinel (`i32::MIN`, `NaN`, ...)
//!
//! # Broadcast Engine
//!
//! - [`check_compatible`]: Classify two shapes as [`Compatibility::Equal`],
//!   [`Compatibility::Broadcastable`] or [`Compatibility::Incompatible`]
//! - [`broadcast_shape`]: Output shape of a broadcast pair
//! - [`map_output_index_to_input`]: Output coordinate to input coordinate
//!
//! # Element-wise Operations
//!
//! - [`zip_map2`]: Broadcasting driver for an arbitrary binary closure
//! - [`elementwise`]: Driver with missing-value propagation
//! - [`add`], [`sub`], [`mul`], [`div`], [`pow`]: Arithmetic
//! - [`eq`], [`ne`], [`lt`], [`le`], [`gt`], [`ge`]: Comparisons
//! - [`and`], [`or`], [`xor`]: Logical operators on boolean arrays
//!
//! # Reductions
//!
//! - [`sum`], [`min`], [`max`], [`mean`]: Whole-array reductions skipping
//!   missing elements
//! - [`reduce_axis`], [`sum_axis`], [`mean_axis`]: Reduce along one axis
//!
//! # Example
//!
//! ```rust
//! use ndbroadcast::{add, NdArray};
//!
//! let a = NdArray::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
//! let b = NdArray::from_vec(vec![10.0, 20.0, 30.0], &[3]).unwrap();
//!
//! let out = add(&a, &b).unwrap();
//! assert_eq!(out.dims(), &[2, 3]);
//! assert_eq!(out.data(), &[11.0, 22.0, 33.0, 14.0, 25.0, 36.0]);
//! ```
//!
//! # Missing Values
//!
//! Integer types reserve their minimum value as a "missing" marker and float
//! types use NaN. Either marker in an operand short-circuits the operator and
//! the marker is written to the output. See [`Missing`].

mod array;
pub mod broadcast;
mod dtype;
pub mod elementwise;
mod maybe_sync;
mod missing;
mod ops;
pub mod reduce;
pub mod shape;
mod value;

// ============================================================================
// Arrays and element types
// ============================================================================
pub use array::NdArray;
pub use dtype::DataType;
pub use maybe_sync::{MaybeSend, MaybeSync};
pub use missing::{Arithmetic, Missing};
pub use value::{ArithOp, Array, Object, Scalar};

// ============================================================================
// Broadcast engine
// ============================================================================
pub use broadcast::{
    broadcast_shape, broadcast_shape_many, broadcast_strides, check_compatible,
    map_output_index_to_input, map_output_index_to_input_into, Compatibility,
};
pub use shape::{coord_to_linear_index, linear_index_to_coord, row_major_strides};

// ============================================================================
// Element-wise operations
// ============================================================================
pub use elementwise::{elementwise, zip_map2};
pub use ops::{
    add, and, compare, div, eq, ge, gt, le, lt, mul, ne, or, pow, sub, xor, CompareOp,
};

// ============================================================================
// Reductions
// ============================================================================
pub use reduce::{max, mean, mean_axis, min, reduce, reduce_axis, sum, sum_axis};

// ============================================================================
// Constants
// ============================================================================

/// Minimum output length before the `parallel` feature splits work across
/// the rayon pool.
pub const MIN_PARALLEL_LEN: usize = 1 << 15;

/// Output elements handed to a single rayon task.
pub const PARALLEL_CHUNK_LEN: usize = 1 << 12;

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during broadcast and element-wise operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BroadcastError {
    /// Array shapes cannot be broadcast together.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// No common element type exists for the operation.
    #[error("unsupported type combination: {lhs} and {rhs}")]
    UnsupportedTypeCombination { lhs: DataType, rhs: DataType },

    /// Buffer length doesn't match the product of the dimensions.
    #[error("data length {actual} does not match shape (expected {expected})")]
    DataLengthMismatch { expected: usize, actual: usize },

    /// Coordinate length doesn't match the array rank.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Coordinate lies outside the array.
    #[error("index {index:?} out of bounds for dims {dims:?}")]
    IndexOutOfBounds { index: Vec<usize>, dims: Vec<usize> },

    /// Invalid axis index for the given array rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },
}

/// Result type for broadcast operations.
pub type Result<T> = std::result::Result<T, BroadcastError>;
