//! Pure coordinate arithmetic for row-major (C order) dense layouts.
//!
//! These replace a stateful cursor object: every function is a plain mapping
//! between a linear buffer position and a coordinate vector.

use crate::{BroadcastError, Result};

/// Number of elements described by `dims` (1 for a rank-0 shape).
#[inline]
pub fn total_len(dims: &[usize]) -> usize {
    dims.iter().product()
}

/// Row-major strides for `dims`, in elements.
///
/// The last dimension has stride 1. Size-0 and size-1 dimensions get the
/// stride they would have if their extent were 1.
pub fn row_major_strides(dims: &[usize]) -> Vec<usize> {
    let mut strides = vec![0usize; dims.len()];
    let mut stride = 1usize;
    for d in (0..dims.len()).rev() {
        strides[d] = stride;
        stride *= dims[d].max(1);
    }
    strides
}

/// Decompose a row-major linear index into a coordinate vector.
///
/// `index` must be smaller than `total_len(dims)`; a rank-0 shape yields an
/// empty coordinate.
pub fn linear_index_to_coord(index: usize, dims: &[usize]) -> Vec<usize> {
    let mut coord = vec![0usize; dims.len()];
    linear_index_to_coord_into(index, dims, &mut coord);
    coord
}

/// Buffer-reusing form of [`linear_index_to_coord`]. `coord.len()` must equal
/// `dims.len()`.
#[inline]
pub fn linear_index_to_coord_into(mut index: usize, dims: &[usize], coord: &mut [usize]) {
    debug_assert_eq!(coord.len(), dims.len());
    for d in (0..dims.len()).rev() {
        let n = dims[d];
        if n == 0 {
            coord[d] = 0;
            continue;
        }
        coord[d] = index % n;
        index /= n;
    }
}

/// Collapse a coordinate vector into a row-major linear index.
///
/// No bounds checking; see [`checked_coord_to_linear_index`].
#[inline]
pub fn coord_to_linear_index(coord: &[usize], dims: &[usize]) -> usize {
    debug_assert_eq!(coord.len(), dims.len());
    let mut index = 0usize;
    for (&c, &n) in coord.iter().zip(dims) {
        index = index * n + c;
    }
    index
}

/// Bounds-checked [`coord_to_linear_index`].
pub fn checked_coord_to_linear_index(coord: &[usize], dims: &[usize]) -> Result<usize> {
    if coord.len() != dims.len() {
        return Err(BroadcastError::RankMismatch(coord.len(), dims.len()));
    }
    if coord.iter().zip(dims).any(|(&c, &n)| c >= n) {
        return Err(BroadcastError::IndexOutOfBounds {
            index: coord.to_vec(),
            dims: dims.to_vec(),
        });
    }
    Ok(coord_to_linear_index(coord, dims))
}

/// Advance `coord` to the next row-major position. Returns `false` after the
/// last position (the coordinate wraps to all zeros).
#[inline]
pub(crate) fn increment_coord(coord: &mut [usize], dims: &[usize]) -> bool {
    for d in (0..dims.len()).rev() {
        coord[d] += 1;
        if coord[d] < dims[d] {
            return true;
        }
        coord[d] = 0;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_strides() {
        assert_eq!(row_major_strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(row_major_strides(&[5]), vec![1]);
        assert!(row_major_strides(&[]).is_empty());
    }

    #[test]
    fn test_linear_index_to_coord() {
        let dims = [2, 3, 4];
        assert_eq!(linear_index_to_coord(0, &dims), vec![0, 0, 0]);
        assert_eq!(linear_index_to_coord(5, &dims), vec![0, 1, 1]);
        assert_eq!(linear_index_to_coord(23, &dims), vec![1, 2, 3]);
        assert!(linear_index_to_coord(0, &[]).is_empty());
    }

    #[test]
    fn test_coord_linear_agree() {
        let dims = [3, 1, 5, 2];
        for i in 0..total_len(&dims) {
            let coord = linear_index_to_coord(i, &dims);
            assert_eq!(coord_to_linear_index(&coord, &dims), i);
        }
    }

    #[test]
    fn test_checked_coord_errors() {
        let dims = [2, 3];
        assert_eq!(checked_coord_to_linear_index(&[1, 2], &dims), Ok(5));
        assert!(matches!(
            checked_coord_to_linear_index(&[1], &dims),
            Err(BroadcastError::RankMismatch(1, 2))
        ));
        assert!(matches!(
            checked_coord_to_linear_index(&[2, 0], &dims),
            Err(BroadcastError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_increment_coord_matches_linear_order() {
        let dims = [2, 3];
        let mut coord = vec![0, 0];
        let mut seen = vec![coord.clone()];
        while increment_coord(&mut coord, &dims) {
            seen.push(coord.clone());
        }
        assert_eq!(seen.len(), 6);
        for (i, c) in seen.iter().enumerate() {
            assert_eq!(coord_to_linear_index(c, &dims), i);
        }
        assert_eq!(coord, vec![0, 0]);
    }
}
