//! Reductions that skip missing elements.
//!
//! A reduction over zero valid elements (empty input, or every element
//! missing) yields the type's missing marker.

use num_traits::ToPrimitive;

use crate::array::NdArray;
use crate::missing::{Arithmetic, Missing};
use crate::{BroadcastError, Result};

/// Fold every non-missing element: `acc = reduce_fn(acc, map_fn(x))`.
pub fn reduce<T, U, M, R>(src: &NdArray<T>, map_fn: M, reduce_fn: R, init: U) -> U
where
    T: Missing,
    M: Fn(T) -> U,
    R: Fn(U, U) -> U,
{
    src.iter()
        .filter(|x| !x.is_missing())
        .fold(init, |acc, &x| reduce_fn(acc, map_fn(x)))
}

/// Fold along `axis`, skipping missing elements. The output drops `axis`
/// from the shape.
///
/// # Errors
/// [`BroadcastError::InvalidAxis`] if `axis >= rank`.
pub fn reduce_axis<T, U, M, R>(
    src: &NdArray<T>,
    axis: usize,
    map_fn: M,
    reduce_fn: R,
    init: U,
) -> Result<NdArray<U>>
where
    T: Missing,
    M: Fn(T) -> U,
    R: Fn(U, U) -> U,
    U: Clone,
{
    let dims = src.dims();
    let rank = dims.len();
    if axis >= rank {
        return Err(BroadcastError::InvalidAxis { axis, rank });
    }

    let outer: usize = dims[..axis].iter().product();
    let n = dims[axis];
    let inner: usize = dims[axis + 1..].iter().product();
    let data = src.data();

    let mut out = Vec::with_capacity(outer * inner);
    for o in 0..outer {
        for i in 0..inner {
            let mut acc = init.clone();
            for k in 0..n {
                let x = data[(o * n + k) * inner + i];
                if !x.is_missing() {
                    acc = reduce_fn(acc, map_fn(x));
                }
            }
            out.push(acc);
        }
    }

    let out_dims: Vec<usize> = dims
        .iter()
        .enumerate()
        .filter(|&(d, _)| d != axis)
        .map(|(_, &n)| n)
        .collect();
    NdArray::from_vec(out, &out_dims)
}

/// Sum of the non-missing elements.
pub fn sum<T: Arithmetic>(src: &NdArray<T>) -> T {
    reduce(src, Some, |a, b| combine(a, b, T::add_elem), None::<T>)
        .unwrap_or_else(T::missing_value)
}

/// Smallest non-missing element.
pub fn min<T: Missing + PartialOrd>(src: &NdArray<T>) -> T {
    reduce(src, Some, |a, b| combine(a, b, pick_min), None::<T>)
        .unwrap_or_else(T::missing_value)
}

/// Largest non-missing element.
pub fn max<T: Missing + PartialOrd>(src: &NdArray<T>) -> T {
    reduce(src, Some, |a, b| combine(a, b, pick_max), None::<T>)
        .unwrap_or_else(T::missing_value)
}

/// Arithmetic mean of the non-missing elements, as `f64`. NaN when there
/// are no valid elements.
pub fn mean<T: Missing + ToPrimitive>(src: &NdArray<T>) -> f64 {
    let (count, total) = reduce(src, count_f64, add_counts, (0, 0.0));
    finish_mean(count, total)
}

/// Sum along `axis`. Lanes with no valid element hold the missing marker.
pub fn sum_axis<T: Arithmetic>(src: &NdArray<T>, axis: usize) -> Result<NdArray<T>> {
    let partial = reduce_axis(
        src,
        axis,
        Some,
        |a, b| combine(a, b, T::add_elem),
        None::<T>,
    )?;
    Ok(partial.map(|&v| v.unwrap_or_else(T::missing_value)))
}

/// Mean along `axis`, as `f64`. Lanes with no valid element are NaN.
pub fn mean_axis<T: Missing + ToPrimitive>(src: &NdArray<T>, axis: usize) -> Result<NdArray<f64>> {
    let partial = reduce_axis(src, axis, count_f64, add_counts, (0, 0.0))?;
    Ok(partial.map(|&(count, total)| finish_mean(count, total)))
}

#[inline]
fn combine<T>(a: Option<T>, b: Option<T>, f: impl Fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (a, None) => a,
        (None, b) => b,
    }
}

#[inline]
fn pick_min<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}

#[inline]
fn pick_max<T: PartialOrd>(a: T, b: T) -> T {
    if b > a {
        b
    } else {
        a
    }
}

#[inline]
fn count_f64<T: ToPrimitive>(x: T) -> (usize, f64) {
    (1, x.to_f64().unwrap_or(f64::NAN))
}

#[inline]
fn add_counts(a: (usize, f64), b: (usize, f64)) -> (usize, f64) {
    (a.0 + b.0, a.1 + b.1)
}

#[inline]
fn finish_mean(count: usize, total: f64) -> f64 {
    if count == 0 {
        f64::NAN
    } else {
        total / count as f64
    }
}
