use approx::assert_relative_eq;
use ndbroadcast::{
    add, broadcast_shape, check_compatible, div, elementwise, linear_index_to_coord,
    map_output_index_to_input, mul, pow, sub, zip_map2, Array, BroadcastError, Compatibility,
    DataType, NdArray, Scalar,
};
use num_complex::Complex64;

fn make_array(rows: usize, cols: usize) -> NdArray<f64> {
    NdArray::from_fn(&[rows, cols], |idx| (idx[0] * cols + idx[1]) as f64)
}

#[test]
fn test_add_matrix_and_row() {
    let a = NdArray::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    let b = NdArray::from_vec(vec![10.0, 20.0, 30.0], &[3]).unwrap();
    let out = add(&a, &b).unwrap();
    assert_eq!(out.dims(), &[2, 3]);
    assert_eq!(out.data(), &[11.0, 22.0, 33.0, 14.0, 25.0, 36.0]);
}

#[test]
fn test_add_column_and_row() {
    let a = NdArray::from_vec(vec![1, 2], &[2, 1]).unwrap();
    let b = NdArray::from_vec(vec![10, 20, 30], &[1, 3]).unwrap();
    let out = add(&a, &b).unwrap();
    assert_eq!(out.dims(), &[2, 3]);
    assert_eq!(out.data(), &[11, 21, 31, 12, 22, 32]);
}

#[test]
fn test_row_vector_semantics() {
    let a = make_array(3, 4);
    let b = NdArray::from_vec(vec![0.5, 1.5, 2.5, 3.5], &[4]).unwrap();
    assert_eq!(check_compatible(a.dims(), b.dims()), Compatibility::Broadcastable);
    assert_eq!(broadcast_shape(a.dims(), b.dims()).unwrap(), vec![3, 4]);

    let out = mul(&a, &b).unwrap();
    for i in 0..3 {
        for j in 0..4 {
            let expected = a.get(&[i, j]).unwrap() * b.get(&[j]).unwrap();
            assert_relative_eq!(out.get(&[i, j]).unwrap(), expected, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_four_dimensional_broadcast() {
    let a = NdArray::from_fn(&[8, 1, 6, 1], |idx| (idx[0] * 10 + idx[2]) as f64);
    let b = NdArray::from_fn(&[7, 1, 5], |idx| (idx[0] * 100 + idx[2] * 1000) as f64);
    let out = add(&a, &b).unwrap();
    assert_eq!(out.dims(), &[8, 7, 6, 5]);

    for (i, &v) in out.iter().enumerate() {
        let coord = linear_index_to_coord(i, out.dims());
        let ca = map_output_index_to_input(&coord, 4, a.dims(), a.rank());
        let cb = map_output_index_to_input(&coord, 4, b.dims(), b.rank());
        let expected = a.get(&ca).unwrap() + b.get(&cb).unwrap();
        assert_relative_eq!(v, expected, epsilon = 1e-12);
    }
}

#[test]
fn test_equal_shapes_are_elementwise() {
    let a = make_array(5, 7);
    let b = make_array(5, 7);
    assert_eq!(check_compatible(a.dims(), b.dims()), Compatibility::Equal);
    let out = sub(&a, &b).unwrap();
    assert!(out.iter().all(|&x| x == 0.0));
}

#[test]
fn test_incompatible_shapes() {
    let a = make_array(3, 4);
    let b = make_array(3, 5);
    assert_eq!(check_compatible(a.dims(), b.dims()), Compatibility::Incompatible);
    match add(&a, &b) {
        Err(BroadcastError::ShapeMismatch(lhs, rhs)) => {
            assert_eq!(lhs, vec![3, 4]);
            assert_eq!(rhs, vec![3, 5]);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_broadcast_shape_is_symmetric() {
    let shapes: [&[usize]; 5] = [&[8, 1, 6, 1], &[7, 1, 5], &[1], &[], &[6, 5]];
    for a in shapes {
        for b in shapes {
            match (broadcast_shape(a, b), broadcast_shape(b, a)) {
                (Ok(x), Ok(y)) => assert_eq!(x, y),
                (Err(_), Err(_)) => {}
                (x, y) => panic!("asymmetric result for {a:?}, {b:?}: {x:?} vs {y:?}"),
            }
        }
    }
}

#[test]
fn test_scalar_reproduces_unary_op() {
    let a = make_array(4, 3);
    let expected: Vec<f64> = a.iter().map(|x| x * 2.0 + 1.0).collect();

    for s in [NdArray::scalar(2.0), NdArray::from_vec(vec![2.0], &[1]).unwrap()] {
        let out = zip_map2(&a, &s, |x, k| x * k + 1.0).unwrap();
        assert_eq!(out.dims(), a.dims());
        assert_eq!(out.data(), expected.as_slice());
    }
}

#[test]
fn test_nan_propagates_to_every_mapped_position() {
    let a = NdArray::from_vec(vec![1.0, f64::NAN, 3.0], &[3]).unwrap();
    let b = make_array(4, 1);
    let out = add(&a, &b).unwrap();
    assert_eq!(out.dims(), &[4, 3]);
    for i in 0..4 {
        assert!(out.get(&[i, 1]).unwrap().is_nan());
        assert!(!out.get(&[i, 0]).unwrap().is_nan());
        assert!(!out.get(&[i, 2]).unwrap().is_nan());
    }
}

#[test]
fn test_int_sentinel_propagates_identically() {
    let a = NdArray::from_vec(vec![1, i32::MIN, 3], &[3]).unwrap();
    let b = NdArray::from_vec(vec![5, 6, 7, 8], &[4, 1]).unwrap();
    for out in [add(&a, &b), sub(&a, &b), mul(&a, &b), div(&a, &b), pow(&a, &b)] {
        let out = out.unwrap();
        for i in 0..4 {
            assert_eq!(out.get(&[i, 1]).unwrap(), i32::MIN);
            assert_ne!(out.get(&[i, 0]).unwrap(), i32::MIN);
        }
    }
}

#[test]
fn test_complex_invalid_operand_passes_through() {
    let bad = Complex64::new(1.0, f64::NAN);
    let a = NdArray::from_vec(vec![Complex64::new(1.0, 1.0), bad], &[2]).unwrap();
    let b = NdArray::scalar(Complex64::new(f64::NAN, 9.0));
    // Both invalid at position 1: the first operand wins.
    let out = sub(&a, &b).unwrap();
    assert_eq!(out.data()[1].re, 1.0);
    assert!(out.data()[1].im.is_nan());
    // Only the second operand invalid at position 0.
    assert!(out.data()[0].re.is_nan());
    assert_eq!(out.data()[0].im, 9.0);
}

#[test]
fn test_custom_operator_through_elementwise() {
    let a = NdArray::from_vec(vec![3.0f32, f32::NAN], &[2]).unwrap();
    let b = NdArray::from_vec(vec![4.0f32], &[1]).unwrap();
    let out = elementwise(&a, &b, |x: f32, y: f32| x.hypot(y)).unwrap();
    assert_relative_eq!(out.data()[0], 5.0);
    assert!(out.data()[1].is_nan());
}

#[test]
fn test_dynamic_arrays_promote_and_broadcast() {
    let a = Array::from(NdArray::from_vec(vec![1i16, 2, 3, 4, 5, 6], &[2, 3]).unwrap());
    let b = Array::from(NdArray::from_vec(vec![0.5f64, 1.5, 2.5], &[3]).unwrap());
    let out = a.add(&b).unwrap();
    assert_eq!(out.dtype(), DataType::Double);
    assert_eq!(out.dims(), &[2, 3]);
    assert_eq!(
        out.as_double().unwrap().data(),
        &[1.5, 3.5, 5.5, 4.5, 6.5, 8.5]
    );

    let out = a.binary_scalar(Scalar::Int(10), ndbroadcast::ArithOp::Mul).unwrap();
    assert_eq!(out.dtype(), DataType::Int);
    assert_eq!(out.as_int().unwrap().data(), &[10, 20, 30, 40, 50, 60]);
}

#[test]
fn test_dynamic_shape_mismatch_reports_both_shapes() {
    let a = Array::from(NdArray::<f32>::zeros(&[3, 4]));
    let b = Array::from(NdArray::<i32>::zeros(&[3, 5]));
    assert_eq!(
        a.add(&b).unwrap_err(),
        BroadcastError::ShapeMismatch(vec![3, 4], vec![3, 5])
    );
}

#[test]
fn test_large_broadcast_matches_naive() {
    let a = NdArray::from_fn(&[64, 1, 33], |idx| (idx[0] * 33 + idx[2]) as f64);
    let b = NdArray::from_fn(&[17, 1], |idx| idx[0] as f64 * 0.25);
    let out = add(&a, &b).unwrap();
    assert_eq!(out.dims(), &[64, 17, 33]);
    for i in 0..64 {
        for j in 0..17 {
            for k in 0..33 {
                let expected = a.get(&[i, 0, k]).unwrap() + b.get(&[j, 0]).unwrap();
                assert_relative_eq!(out.get(&[i, j, k]).unwrap(), expected, epsilon = 1e-12);
            }
        }
    }
}
