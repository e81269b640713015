//! Feature-gated Send/Sync marker traits.
//!
//! With the `parallel` feature, [`MaybeSend`] is [`Send`] and [`MaybeSync`]
//! is [`Sync`]. Without it both are blanket-implemented for every type, so
//! non-thread-safe element types and closures still work with the drivers.

#[cfg(feature = "parallel")]
pub trait MaybeSend: Send {}
#[cfg(feature = "parallel")]
impl<T: Send> MaybeSend for T {}

#[cfg(feature = "parallel")]
pub trait MaybeSync: Sync {}
#[cfg(feature = "parallel")]
impl<T: Sync> MaybeSync for T {}

#[cfg(not(feature = "parallel"))]
pub trait MaybeSend {}
#[cfg(not(feature = "parallel"))]
impl<T> MaybeSend for T {}

#[cfg(not(feature = "parallel"))]
pub trait MaybeSync {}
#[cfg(not(feature = "parallel"))]
impl<T> MaybeSync for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::NdArray;
    use crate::elementwise::zip_map2;
    use crate::value::Object;
    use num_complex::Complex64;

    fn driver_element<T: Copy + MaybeSync>() {}
    fn driver_output<T: MaybeSend>() {}

    #[test]
    fn test_every_array_element_type_fits_the_drivers() {
        driver_element::<bool>();
        driver_element::<i16>();
        driver_element::<i64>();
        driver_element::<f32>();
        driver_element::<Complex64>();
        driver_output::<(i64, i64)>();
        driver_output::<Object>();
        driver_output::<NdArray<Object>>();
    }

    #[test]
    fn test_capturing_closure_drives_broadcast() {
        let offset = NdArray::from_vec(vec![10.0, 20.0], &[2]).unwrap();
        let a = NdArray::from_vec(vec![1.0, 2.0], &[2, 1]).unwrap();
        let b = NdArray::scalar(0usize);
        let out = zip_map2(&a, &b, |x: f64, _| x + offset.data()[0]).unwrap();
        assert_eq!(out.data(), &[11.0, 12.0]);
    }

    #[cfg(not(feature = "parallel"))]
    #[test]
    fn test_non_sync_closure_without_parallel() {
        use std::cell::Cell;
        use std::rc::Rc;

        let calls = Rc::new(Cell::new(0usize));
        let a = NdArray::from_vec(vec![1, 2, 3], &[3]).unwrap();
        let b = NdArray::from_vec(vec![10, 20], &[2, 1]).unwrap();
        let out = zip_map2(&a, &b, |x: i32, y: i32| {
            calls.set(calls.get() + 1);
            x + y
        })
        .unwrap();
        assert_eq!(out.dims(), &[2, 3]);
        assert_eq!(calls.get(), 6);
    }
}
