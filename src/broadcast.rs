//! Shape compatibility, output-shape computation and index mapping for
//! NumPy-style broadcasting.
//!
//! Shapes are aligned at their trailing (rightmost) dimensions; the shorter
//! shape is padded on the left with implicit size-1 dimensions. An aligned
//! pair `(na, nb)` is compatible iff `na == nb`, `na == 1` or `nb == 1`, and
//! the output extent is `max(na, nb)`.
//!
//! ```text
//!   A      (8, 1, 6, 1)
//!   B         (7, 1, 5)
//!   out    (8, 7, 6, 5)
//! ```

use crate::{BroadcastError, Result};

/// Classification of a shape pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compatibility {
    /// Same rank, identical extents. Element `i` of both inputs and of the
    /// output coincide, so no index remapping is needed.
    Equal,
    /// Compatible after padding and/or stretching size-1 dimensions.
    Broadcastable,
    /// Some aligned pair differs and neither extent is 1.
    Incompatible,
}

impl Compatibility {
    /// `true` unless [`Compatibility::Incompatible`].
    #[inline]
    pub fn is_compatible(self) -> bool {
        !matches!(self, Compatibility::Incompatible)
    }
}

/// Extent of `dims` at trailing-aligned position `i` (0 = rightmost), or 1
/// for padded positions.
#[inline]
fn aligned_dim(dims: &[usize], i: usize) -> usize {
    if i < dims.len() {
        dims[dims.len() - 1 - i]
    } else {
        1
    }
}

/// Classify two shapes for broadcasting.
///
/// Rank-0 shapes are all-singleton and broadcast against anything.
pub fn check_compatible(a: &[usize], b: &[usize]) -> Compatibility {
    if a == b {
        return Compatibility::Equal;
    }
    let rank = a.len().max(b.len());
    for i in 0..rank {
        let na = aligned_dim(a, i);
        let nb = aligned_dim(b, i);
        if na != nb && na != 1 && nb != 1 {
            return Compatibility::Incompatible;
        }
    }
    Compatibility::Broadcastable
}

/// Compute the broadcast output shape of two shapes.
///
/// The output rank is `max(rank(a), rank(b))` and each output extent is the
/// maximum of the aligned pair. Symmetric in `a` and `b`.
///
/// # Errors
/// [`BroadcastError::ShapeMismatch`] carrying both shapes when they are
/// incompatible.
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Result<Vec<usize>> {
    let rank = a.len().max(b.len());
    let mut out = vec![0usize; rank];

    for i in 0..rank {
        let na = aligned_dim(a, i);
        let nb = aligned_dim(b, i);

        out[rank - 1 - i] = if na == nb {
            na
        } else if na == 1 {
            nb
        } else if nb == 1 {
            na
        } else {
            tracing::debug!(lhs = ?a, rhs = ?b, "incompatible broadcast shapes");
            return Err(BroadcastError::ShapeMismatch(a.to_vec(), b.to_vec()));
        };
    }

    Ok(out)
}

/// Common broadcast shape across any number of shapes.
///
/// An empty list yields the rank-0 shape.
pub fn broadcast_shape_many(dims_list: &[&[usize]]) -> Result<Vec<usize>> {
    let mut iter = dims_list.iter();
    let mut out = match iter.next() {
        Some(first) => first.to_vec(),
        None => return Ok(vec![]),
    };
    for dims in iter {
        out = broadcast_shape(&out, dims)?;
    }
    Ok(out)
}

/// Map an output coordinate to the coordinate of an input of shape
/// `in_dims`.
///
/// Input dimension `d` corresponds to output dimension
/// `d + (out_rank - in_rank)`. Size-1 input dimensions always map to 0;
/// every other dimension copies the output coordinate verbatim.
///
/// # Panics
/// If `in_rank > out_rank`, or if `out_coord` has fewer than `out_rank`
/// entries or `in_dims` fewer than `in_rank`.
pub fn map_output_index_to_input(
    out_coord: &[usize],
    out_rank: usize,
    in_dims: &[usize],
    in_rank: usize,
) -> Vec<usize> {
    let mut in_coord = vec![0usize; in_rank];
    map_output_index_to_input_into(out_coord, out_rank, in_dims, in_rank, &mut in_coord);
    in_coord
}

/// Buffer-reusing form of [`map_output_index_to_input`]. Writes `in_rank`
/// entries into `in_coord`.
///
/// # Panics
/// Under the same conditions as [`map_output_index_to_input`], or if
/// `in_coord` has fewer than `in_rank` entries.
#[inline]
pub fn map_output_index_to_input_into(
    out_coord: &[usize],
    out_rank: usize,
    in_dims: &[usize],
    in_rank: usize,
    in_coord: &mut [usize],
) {
    assert!(
        in_rank <= out_rank,
        "input rank {in_rank} exceeds output rank {out_rank}"
    );
    assert!(
        out_coord.len() >= out_rank && in_dims.len() >= in_rank && in_coord.len() >= in_rank,
        "coordinate buffers shorter than their ranks"
    );
    let shift = out_rank - in_rank;
    for d in 0..in_rank {
        in_coord[d] = if in_dims[d] == 1 {
            0
        } else {
            out_coord[d + shift]
        };
    }
}

/// Promote the row-major strides of an input to the broadcast target shape.
///
/// Returns one stride per target dimension:
/// - padded (missing) dimensions get stride 0
/// - size-1 dimensions stretched to a larger extent get stride 0
/// - matching dimensions keep their row-major stride
///
/// Walking the target shape with these strides visits exactly the elements
/// [`map_output_index_to_input`] selects.
///
/// # Errors
/// [`BroadcastError::ShapeMismatch`] if `src_dims` cannot be stretched to
/// `target_dims`.
pub fn broadcast_strides(target_dims: &[usize], src_dims: &[usize]) -> Result<Vec<usize>> {
    if src_dims.len() > target_dims.len() {
        return Err(BroadcastError::ShapeMismatch(
            src_dims.to_vec(),
            target_dims.to_vec(),
        ));
    }
    let shift = target_dims.len() - src_dims.len();
    let src_strides = crate::shape::row_major_strides(src_dims);

    let mut out = vec![0usize; target_dims.len()];
    for d in 0..src_dims.len() {
        let sdim = src_dims[d];
        let tdim = target_dims[d + shift];
        if sdim == tdim {
            out[d + shift] = if sdim == 1 { 0 } else { src_strides[d] };
        } else if sdim == 1 {
            out[d + shift] = 0;
        } else {
            return Err(BroadcastError::ShapeMismatch(
                src_dims.to_vec(),
                target_dims.to_vec(),
            ));
        }
    }
    Ok(out)
}
