//! Tagged-variant arrays and scalars with runtime type promotion.
//!
//! [`Array`] replaces a family of per-type overloads (`add_int`,
//! `add_double`, ...) with one dispatch: promote both operand tags with
//! [`DataType::promote`], cast each side to the common type while keeping
//! missing markers missing, then run the typed operator.

use std::any::Any;
use std::borrow::Cow;
use std::sync::Arc;

use num_complex::Complex64;

use crate::array::NdArray;
use crate::dtype::DataType;
use crate::elementwise::zip_map2;
use crate::maybe_sync::{MaybeSend, MaybeSync};
use crate::missing::{Arithmetic, Missing};
use crate::ops::{self, CompareOp};
use crate::{BroadcastError, Result};

/// Opaque element of an object-typed array.
pub type Object = Arc<dyn Any + Send + Sync>;

/// Arithmetic operator for [`Array::binary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl ArithOp {
    fn apply<T>(self, a: &NdArray<T>, b: &NdArray<T>) -> Result<NdArray<T>>
    where
        T: Arithmetic + MaybeSync + MaybeSend,
    {
        match self {
            ArithOp::Add => ops::add(a, b),
            ArithOp::Sub => ops::sub(a, b),
            ArithOp::Mul => ops::mul(a, b),
            ArithOp::Div => ops::div(a, b),
            ArithOp::Pow => ops::pow(a, b),
        }
    }
}

/// Dense array of any supported element type.
#[derive(Debug, Clone)]
pub enum Array {
    Boolean(NdArray<bool>),
    Short(NdArray<i16>),
    Int(NdArray<i32>),
    Long(NdArray<i64>),
    Float(NdArray<f32>),
    Double(NdArray<f64>),
    Complex(NdArray<Complex64>),
    Object(NdArray<Object>),
}

/// Single value of any numeric or boolean element type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Boolean(bool),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Complex(Complex64),
}

macro_rules! for_each_variant {
    ($value:expr, $arr:ident => $body:expr) => {
        match $value {
            Array::Boolean($arr) => $body,
            Array::Short($arr) => $body,
            Array::Int($arr) => $body,
            Array::Long($arr) => $body,
            Array::Float($arr) => $body,
            Array::Double($arr) => $body,
            Array::Complex($arr) => $body,
            Array::Object($arr) => $body,
        }
    };
}

/// Real element types that convert through `f64` with missing markers
/// mapped to NaN and back.
trait RealElement: Missing {
    fn to_f64_missing(self) -> f64;
    fn from_f64_missing(v: f64) -> Self;
}

macro_rules! impl_real_element_int {
    ($($t:ty),*) => {
        $(
            impl RealElement for $t {
                #[inline]
                fn to_f64_missing(self) -> f64 {
                    if self.is_missing() { f64::NAN } else { self as f64 }
                }
                #[inline]
                fn from_f64_missing(v: f64) -> Self {
                    if v.is_nan() {
                        return <$t>::MIN;
                    }
                    // `as` saturates; keep out-of-range values off the sentinel.
                    let x = v as $t;
                    if x == <$t>::MIN { <$t>::MIN + 1 } else { x }
                }
            }
        )*
    };
}

macro_rules! impl_real_element_float {
    ($($t:ty),*) => {
        $(
            impl RealElement for $t {
                #[inline]
                fn to_f64_missing(self) -> f64 { self as f64 }
                #[inline]
                fn from_f64_missing(v: f64) -> Self { v as $t }
            }
        )*
    };
}

impl_real_element_int!(i16, i32, i64);
impl_real_element_float!(f32, f64);

fn cast_real<S: RealElement, D: RealElement>(a: &NdArray<S>) -> NdArray<D> {
    a.map(|&x| D::from_f64_missing(x.to_f64_missing()))
}

fn real_to_complex<S: RealElement>(a: &NdArray<S>) -> NdArray<Complex64> {
    a.map(|&x| Complex64::new(x.to_f64_missing(), 0.0))
}

/// Common type for a comparison. Unlike arithmetic, a float operand never
/// narrows to an integer: the result is `bool`, so nothing forces it.
fn compare_dtype(lhs: DataType, rhs: DataType) -> Result<DataType> {
    let dtype = DataType::promote(lhs, rhs)?;
    if dtype.is_int_family() && (lhs.is_float_family() || rhs.is_float_family()) {
        return Ok(DataType::Double);
    }
    Ok(dtype)
}

impl Array {
    pub fn dtype(&self) -> DataType {
        match self {
            Array::Boolean(_) => DataType::Boolean,
            Array::Short(_) => DataType::Short,
            Array::Int(_) => DataType::Int,
            Array::Long(_) => DataType::Long,
            Array::Float(_) => DataType::Float,
            Array::Double(_) => DataType::Double,
            Array::Complex(_) => DataType::Complex,
            Array::Object(_) => DataType::Object,
        }
    }

    pub fn dims(&self) -> &[usize] {
        for_each_variant!(self, a => a.dims())
    }

    pub fn rank(&self) -> usize {
        self.dims().len()
    }

    pub fn len(&self) -> usize {
        for_each_variant!(self, a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to `dtype`, keeping missing elements missing.
    ///
    /// Real types convert into each other through `f64` (integer sentinels
    /// become NaN and back) and into `Complex` with a zero imaginary part.
    ///
    /// # Errors
    /// [`BroadcastError::UnsupportedTypeCombination`] for conversions out of
    /// `Complex`, or between `Boolean`/`Object` and any other type.
    pub fn cast_to(&self, dtype: DataType) -> Result<Array> {
        self.cast_cow(dtype).map(Cow::into_owned)
    }

    fn cast_cow(&self, dtype: DataType) -> Result<Cow<'_, Array>> {
        if self.dtype() == dtype {
            return Ok(Cow::Borrowed(self));
        }
        let unsupported = self.unsupported(dtype);
        macro_rules! real_source {
            ($a:expr) => {
                match dtype {
                    DataType::Short => Array::Short(cast_real($a)),
                    DataType::Int => Array::Int(cast_real($a)),
                    DataType::Long => Array::Long(cast_real($a)),
                    DataType::Float => Array::Float(cast_real($a)),
                    DataType::Double => Array::Double(cast_real($a)),
                    DataType::Complex => Array::Complex(real_to_complex($a)),
                    DataType::Boolean | DataType::Object => return Err(unsupported),
                }
            };
        }
        let out = match self {
            Array::Short(a) => real_source!(a),
            Array::Int(a) => real_source!(a),
            Array::Long(a) => real_source!(a),
            Array::Float(a) => real_source!(a),
            Array::Double(a) => real_source!(a),
            Array::Boolean(_) | Array::Complex(_) | Array::Object(_) => return Err(unsupported),
        };
        Ok(Cow::Owned(out))
    }

    fn unsupported(&self, other: DataType) -> BroadcastError {
        BroadcastError::UnsupportedTypeCombination {
            lhs: self.dtype(),
            rhs: other,
        }
    }

    /// Promote both operands to a common numeric type, then apply `op` with
    /// broadcasting and missing-value propagation.
    ///
    /// # Errors
    /// [`BroadcastError::UnsupportedTypeCombination`] if either side is
    /// boolean or object typed, [`BroadcastError::ShapeMismatch`] if the
    /// shapes do not broadcast.
    pub fn binary(&self, other: &Array, op: ArithOp) -> Result<Array> {
        let dtype = DataType::promote(self.dtype(), other.dtype())?;
        if !dtype.is_numeric() {
            tracing::debug!(lhs = %self.dtype(), rhs = %other.dtype(), ?op, "non-numeric arithmetic");
            return Err(self.unsupported(other.dtype()));
        }
        let a = self.cast_cow(dtype)?;
        let b = other.cast_cow(dtype)?;
        let out = match (a.as_ref(), b.as_ref()) {
            (Array::Short(a), Array::Short(b)) => Array::Short(op.apply(a, b)?),
            (Array::Int(a), Array::Int(b)) => Array::Int(op.apply(a, b)?),
            (Array::Long(a), Array::Long(b)) => Array::Long(op.apply(a, b)?),
            (Array::Float(a), Array::Float(b)) => Array::Float(op.apply(a, b)?),
            (Array::Double(a), Array::Double(b)) => Array::Double(op.apply(a, b)?),
            (Array::Complex(a), Array::Complex(b)) => Array::Complex(op.apply(a, b)?),
            _ => return Err(self.unsupported(other.dtype())),
        };
        Ok(out)
    }

    pub fn add(&self, other: &Array) -> Result<Array> {
        self.binary(other, ArithOp::Add)
    }

    pub fn sub(&self, other: &Array) -> Result<Array> {
        self.binary(other, ArithOp::Sub)
    }

    pub fn mul(&self, other: &Array) -> Result<Array> {
        self.binary(other, ArithOp::Mul)
    }

    pub fn div(&self, other: &Array) -> Result<Array> {
        self.binary(other, ArithOp::Div)
    }

    pub fn pow(&self, other: &Array) -> Result<Array> {
        self.binary(other, ArithOp::Pow)
    }

    /// [`Array::binary`] with a scalar right-hand side (broadcast as rank 0).
    pub fn binary_scalar(&self, other: Scalar, op: ArithOp) -> Result<Array> {
        self.binary(&other.into_array(), op)
    }

    /// Element-wise comparison after type promotion.
    ///
    /// Boolean arrays compare only with boolean arrays. Complex operands
    /// support [`CompareOp::Eq`] and [`CompareOp::Ne`] only. An integer
    /// against a float compares in `Double`, even where arithmetic would
    /// promote to the wider integer type.
    pub fn compare(&self, other: &Array, op: CompareOp) -> Result<NdArray<bool>> {
        if let (Array::Boolean(a), Array::Boolean(b)) = (self, other) {
            return ops::compare(a, b, op);
        }
        let dtype = compare_dtype(self.dtype(), other.dtype())?;
        let a = self.cast_cow(dtype)?;
        let b = other.cast_cow(dtype)?;
        match (a.as_ref(), b.as_ref()) {
            (Array::Short(a), Array::Short(b)) => ops::compare(a, b, op),
            (Array::Int(a), Array::Int(b)) => ops::compare(a, b, op),
            (Array::Long(a), Array::Long(b)) => ops::compare(a, b, op),
            (Array::Float(a), Array::Float(b)) => ops::compare(a, b, op),
            (Array::Double(a), Array::Double(b)) => ops::compare(a, b, op),
            (Array::Complex(a), Array::Complex(b)) => match op {
                CompareOp::Eq => zip_map2(a, b, |x, y| !x.is_missing() && x == y),
                CompareOp::Ne => zip_map2(a, b, |x, y| x.is_missing() || x != y),
                _ => Err(self.unsupported(other.dtype())),
            },
            _ => Err(self.unsupported(other.dtype())),
        }
    }

    /// Logical operator on two boolean arrays.
    pub fn logical(
        &self,
        other: &Array,
        f: fn(&NdArray<bool>, &NdArray<bool>) -> Result<NdArray<bool>>,
    ) -> Result<Array> {
        match (self, other) {
            (Array::Boolean(a), Array::Boolean(b)) => Ok(Array::Boolean(f(a, b)?)),
            _ => Err(self.unsupported(other.dtype())),
        }
    }
}

macro_rules! array_accessors {
    ($($variant:ident, $as_fn:ident, $t:ty);* $(;)?) => {
        impl Array {
            $(
                #[doc = concat!("Borrow the inner array if this is [`Array::", stringify!($variant), "`].")]
                pub fn $as_fn(&self) -> Option<&NdArray<$t>> {
                    match self {
                        Array::$variant(a) => Some(a),
                        _ => None,
                    }
                }
            )*
        }

        $(
            impl From<NdArray<$t>> for Array {
                fn from(a: NdArray<$t>) -> Self {
                    Array::$variant(a)
                }
            }
        )*
    };
}

array_accessors! {
    Boolean, as_boolean, bool;
    Short, as_short, i16;
    Int, as_int, i32;
    Long, as_long, i64;
    Float, as_float, f32;
    Double, as_double, f64;
    Complex, as_complex, Complex64;
    Object, as_object, Object;
}

impl Scalar {
    pub fn dtype(&self) -> DataType {
        match self {
            Scalar::Boolean(_) => DataType::Boolean,
            Scalar::Short(_) => DataType::Short,
            Scalar::Int(_) => DataType::Int,
            Scalar::Long(_) => DataType::Long,
            Scalar::Float(_) => DataType::Float,
            Scalar::Double(_) => DataType::Double,
            Scalar::Complex(_) => DataType::Complex,
        }
    }

    /// Rank-0 array holding this value.
    pub fn into_array(self) -> Array {
        match self {
            Scalar::Boolean(v) => Array::Boolean(NdArray::scalar(v)),
            Scalar::Short(v) => Array::Short(NdArray::scalar(v)),
            Scalar::Int(v) => Array::Int(NdArray::scalar(v)),
            Scalar::Long(v) => Array::Long(NdArray::scalar(v)),
            Scalar::Float(v) => Array::Float(NdArray::scalar(v)),
            Scalar::Double(v) => Array::Double(NdArray::scalar(v)),
            Scalar::Complex(v) => Array::Complex(NdArray::scalar(v)),
        }
    }
}

macro_rules! scalar_from {
    ($($variant:ident, $t:ty);* $(;)?) => {
        $(
            impl From<$t> for Scalar {
                fn from(v: $t) -> Self {
                    Scalar::$variant(v)
                }
            }
        )*
    };
}

scalar_from! {
    Boolean, bool;
    Short, i16;
    Int, i32;
    Long, i64;
    Float, f32;
    Double, f64;
    Complex, Complex64;
}
