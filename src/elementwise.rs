//! Broadcasting driver for binary element-wise operations.
//!
//! Every binary operator in the crate funnels through [`zip_map2`]:
//!
//! 1. [`check_compatible`] classifies the shape pair.
//! 2. `Incompatible`: fail with [`BroadcastError::ShapeMismatch`].
//! 3. `Equal`: walk both buffers linearly, no coordinate arithmetic.
//! 4. `Broadcastable`: walk the output in row-major order. The output
//!    coordinate is advanced like an odometer and each input offset follows
//!    the stride-0 promoted strides from [`broadcast_strides`], which select
//!    the same element as [`map_output_index_to_input`].
//!
//! [`map_output_index_to_input`]: crate::broadcast::map_output_index_to_input

use std::sync::Arc;

use crate::array::NdArray;
use crate::broadcast::{broadcast_shape, broadcast_strides, check_compatible, Compatibility};
use crate::maybe_sync::{MaybeSend, MaybeSync};
use crate::missing::Missing;
use crate::shape::total_len;
use crate::{BroadcastError, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Combine two arrays element-wise with broadcasting.
///
/// `f` is evaluated once per output element, with no missing-value checks.
/// See [`elementwise`] for the sentinel-aware form.
///
/// # Errors
/// [`BroadcastError::ShapeMismatch`] carrying both input shapes.
pub fn zip_map2<A, B, O, F>(a: &NdArray<A>, b: &NdArray<B>, f: F) -> Result<NdArray<O>>
where
    A: Copy + MaybeSync,
    B: Copy + MaybeSync,
    O: MaybeSend,
    F: Fn(A, B) -> O + MaybeSync,
{
    match check_compatible(a.dims(), b.dims()) {
        Compatibility::Incompatible => {
            tracing::debug!(lhs = ?a.dims(), rhs = ?b.dims(), "element-wise shape mismatch");
            Err(BroadcastError::ShapeMismatch(
                a.dims().to_vec(),
                b.dims().to_vec(),
            ))
        }
        Compatibility::Equal => {
            tracing::trace!(dims = ?a.dims(), "element-wise equal-shape fast path");
            let data = map_equal(a.data(), b.data(), &f);
            Ok(NdArray::from_parts(data, a.dims_arc().clone()))
        }
        Compatibility::Broadcastable => {
            let out_dims = broadcast_shape(a.dims(), b.dims())?;
            tracing::trace!(
                lhs = ?a.dims(),
                rhs = ?b.dims(),
                out = ?out_dims,
                "element-wise broadcast path"
            );
            let plan = BroadcastPlan::new(out_dims, a.dims(), b.dims())?;
            let data = plan.run(a.data(), b.data(), &f);
            Ok(NdArray::from_parts(data, Arc::from(plan.dims)))
        }
    }
}

/// Combine two arrays element-wise with broadcasting and missing-value
/// propagation.
///
/// Before `op` runs, both operands are tested with [`Missing::propagate`]; a
/// missing operand short-circuits `op` and the propagated value is written
/// instead.
pub fn elementwise<T, F>(a: &NdArray<T>, b: &NdArray<T>, op: F) -> Result<NdArray<T>>
where
    T: Missing + MaybeSync + MaybeSend,
    F: Fn(T, T) -> T + MaybeSync,
{
    if !T::HAS_SENTINEL {
        return zip_map2(a, b, op);
    }
    zip_map2(a, b, |x, y| match T::propagate(x, y) {
        Some(v) => v,
        None => op(x, y),
    })
}

fn map_equal<A, B, O, F>(a: &[A], b: &[B], f: &F) -> Vec<O>
where
    A: Copy + MaybeSync,
    B: Copy + MaybeSync,
    O: MaybeSend,
    F: Fn(A, B) -> O + MaybeSync,
{
    #[cfg(feature = "parallel")]
    {
        if a.len() >= crate::MIN_PARALLEL_LEN && rayon::current_num_threads() > 1 {
            tracing::trace!(len = a.len(), "element-wise parallel equal-shape path");
            return a
                .par_iter()
                .zip(b.par_iter())
                .with_min_len(crate::PARALLEL_CHUNK_LEN)
                .map(|(&x, &y)| f(x, y))
                .collect();
        }
    }

    a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect()
}

/// Output shape and stride-0 promoted input strides for one broadcast call.
struct BroadcastPlan {
    dims: Vec<usize>,
    strides_a: Vec<usize>,
    strides_b: Vec<usize>,
}

impl BroadcastPlan {
    fn new(dims: Vec<usize>, a_dims: &[usize], b_dims: &[usize]) -> Result<Self> {
        let strides_a = broadcast_strides(&dims, a_dims)?;
        let strides_b = broadcast_strides(&dims, b_dims)?;
        Ok(Self {
            dims,
            strides_a,
            strides_b,
        })
    }

    fn run<A, B, O, F>(&self, a: &[A], b: &[B], f: &F) -> Vec<O>
    where
        A: Copy + MaybeSync,
        B: Copy + MaybeSync,
        O: MaybeSend,
        F: Fn(A, B) -> O + MaybeSync,
    {
        let total = total_len(&self.dims);

        #[cfg(feature = "parallel")]
        {
            if total >= crate::MIN_PARALLEL_LEN && rayon::current_num_threads() > 1 {
                tracing::trace!(len = total, "element-wise parallel broadcast path");
                let chunk = crate::PARALLEL_CHUNK_LEN;
                let n_chunks = total.div_ceil(chunk);
                let parts: Vec<Vec<O>> = (0..n_chunks)
                    .into_par_iter()
                    .map(|c| {
                        let start = c * chunk;
                        let end = (start + chunk).min(total);
                        self.run_range(a, b, f, start, end)
                    })
                    .collect();
                return parts.into_iter().flatten().collect();
            }
        }

        self.run_range(a, b, f, 0, total)
    }

    /// Evaluate output positions `start..end` in row-major order.
    fn run_range<A, B, O, F>(&self, a: &[A], b: &[B], f: &F, start: usize, end: usize) -> Vec<O>
    where
        A: Copy,
        B: Copy,
        F: Fn(A, B) -> O,
    {
        let rank = self.dims.len();
        let mut out = Vec::with_capacity(end - start);
        if start >= end {
            return out;
        }

        let mut coord = crate::shape::linear_index_to_coord(start, &self.dims);
        let mut off_a: usize = coord.iter().zip(&self.strides_a).map(|(c, s)| c * s).sum();
        let mut off_b: usize = coord.iter().zip(&self.strides_b).map(|(c, s)| c * s).sum();

        for _ in start..end {
            out.push(f(a[off_a], b[off_b]));

            // Odometer step, keeping the input offsets in sync.
            for d in (0..rank).rev() {
                coord[d] += 1;
                if coord[d] < self.dims[d] {
                    off_a += self.strides_a[d];
                    off_b += self.strides_b[d];
                    break;
                }
                coord[d] = 0;
                off_a -= self.strides_a[d] * (self.dims[d] - 1);
                off_b -= self.strides_b[d] * (self.dims[d] - 1);
            }
        }
        out
    }
}
