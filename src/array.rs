use std::sync::Arc;

use crate::shape::{checked_coord_to_linear_index, increment_coord, total_len};
use crate::{BroadcastError, Result};

/// Dense, row-major, homogeneously-typed N-dimensional array.
///
/// The backing buffer always holds exactly `product(dims)` elements. Arrays
/// are values: every operation in this crate allocates a fresh output and
/// never returns a view into an input.
pub struct NdArray<T> {
    data: Vec<T>,
    dims: Arc<[usize]>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for NdArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NdArray")
            .field("dims", &self.dims)
            .field("data", &self.data)
            .finish()
    }
}

impl<T: Clone> Clone for NdArray<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            dims: self.dims.clone(),
        }
    }
}

impl<T: PartialEq> PartialEq for NdArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dims == other.dims && self.data == other.data
    }
}

impl<T> NdArray<T> {
    /// Wrap a row-major buffer.
    ///
    /// # Errors
    /// [`BroadcastError::DataLengthMismatch`] if `data.len()` differs from
    /// the product of `dims`.
    pub fn from_vec(data: Vec<T>, dims: &[usize]) -> Result<Self> {
        let expected = total_len(dims);
        if data.len() != expected {
            return Err(BroadcastError::DataLengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            dims: Arc::from(dims),
        })
    }

    /// Rank-0 array holding a single element.
    pub fn scalar(value: T) -> Self {
        Self {
            data: vec![value],
            dims: Arc::from(&[][..]),
        }
    }

    /// Create an array with values produced by a function.
    ///
    /// The function is called with coordinates in row-major order.
    pub fn from_fn(dims: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Self {
        let total = total_len(dims);
        let mut data = Vec::with_capacity(total);
        let mut idx = vec![0usize; dims.len()];
        for _ in 0..total {
            data.push(f(&idx));
            increment_coord(&mut idx, dims);
        }
        Self {
            data,
            dims: Arc::from(dims),
        }
    }

    pub(crate) fn from_parts(data: Vec<T>, dims: Arc<[usize]>) -> Self {
        debug_assert_eq!(data.len(), total_len(&dims));
        Self { data, dims }
    }

    /// Dimension extents.
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub(crate) fn dims_arc(&self) -> &Arc<[usize]> {
        &self.dims
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the array has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major backing buffer.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consume the array and return its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Iterate over elements in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Reference to the element at `coord`.
    ///
    /// # Errors
    /// [`BroadcastError::RankMismatch`] or [`BroadcastError::IndexOutOfBounds`].
    pub fn get_ref(&self, coord: &[usize]) -> Result<&T> {
        let idx = checked_coord_to_linear_index(coord, &self.dims)?;
        Ok(&self.data[idx])
    }

    /// Apply `f` to every element, keeping the shape.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> NdArray<U> {
        NdArray {
            data: self.data.iter().map(f).collect(),
            dims: self.dims.clone(),
        }
    }

    /// Same buffer, new shape with the same element count.
    pub fn reshape(self, dims: &[usize]) -> Result<Self> {
        Self::from_vec(self.data, dims)
    }
}

impl<T: Copy> NdArray<T> {
    /// Element at `coord`.
    pub fn get(&self, coord: &[usize]) -> Result<T> {
        self.get_ref(coord).copied()
    }
}

impl<T: Clone> NdArray<T> {
    /// Array of `dims` with every element set to `value`.
    pub fn filled(dims: &[usize], value: T) -> Self {
        Self {
            data: vec![value; total_len(dims)],
            dims: Arc::from(dims),
        }
    }
}

impl<T: Clone + Default> NdArray<T> {
    /// Array of `dims` filled with `T::default()`.
    pub fn zeros(dims: &[usize]) -> Self {
        Self::filled(dims, T::default())
    }
}

impl<T> From<Vec<T>> for NdArray<T> {
    /// One-dimensional array over `data`.
    fn from(data: Vec<T>) -> Self {
        let dims: Arc<[usize]> = Arc::from(&[data.len()][..]);
        Self { data, dims }
    }
}
