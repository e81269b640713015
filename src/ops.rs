use crate::array::NdArray;
use crate::elementwise::{elementwise, zip_map2};
use crate::maybe_sync::{MaybeSend, MaybeSync};
use crate::missing::{Arithmetic, Missing};
use crate::Result;

/// Element-wise `a + b` with broadcasting and missing-value propagation.
pub fn add<T>(a: &NdArray<T>, b: &NdArray<T>) -> Result<NdArray<T>>
where
    T: Arithmetic + MaybeSync + MaybeSend,
{
    elementwise(a, b, T::add_elem)
}

/// Element-wise `a - b`.
pub fn sub<T>(a: &NdArray<T>, b: &NdArray<T>) -> Result<NdArray<T>>
where
    T: Arithmetic + MaybeSync + MaybeSend,
{
    elementwise(a, b, T::sub_elem)
}

/// Element-wise `a * b`.
pub fn mul<T>(a: &NdArray<T>, b: &NdArray<T>) -> Result<NdArray<T>>
where
    T: Arithmetic + MaybeSync + MaybeSend,
{
    elementwise(a, b, T::mul_elem)
}

/// Element-wise `a / b`. Integer division by zero yields the sentinel.
pub fn div<T>(a: &NdArray<T>, b: &NdArray<T>) -> Result<NdArray<T>>
where
    T: Arithmetic + MaybeSync + MaybeSend,
{
    elementwise(a, b, T::div_elem)
}

/// Element-wise `a ^ b`.
pub fn pow<T>(a: &NdArray<T>, b: &NdArray<T>) -> Result<NdArray<T>>
where
    T: Arithmetic + MaybeSync + MaybeSend,
{
    elementwise(a, b, T::pow_elem)
}

/// Relational operator for [`compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    #[inline]
    pub fn apply<T: PartialOrd>(self, a: &T, b: &T) -> bool {
        match self {
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
            CompareOp::Lt => a < b,
            CompareOp::Le => a <= b,
            CompareOp::Gt => a > b,
            CompareOp::Ge => a >= b,
        }
    }
}

/// Element-wise comparison producing a boolean array.
///
/// A missing operand makes every relation false except [`CompareOp::Ne`],
/// which is true. This is the IEEE behaviour of NaN, applied to the integer
/// sentinels as well.
pub fn compare<T>(a: &NdArray<T>, b: &NdArray<T>, op: CompareOp) -> Result<NdArray<bool>>
where
    T: Missing + PartialOrd + MaybeSync,
{
    zip_map2(a, b, move |x: T, y: T| {
        if x.is_missing() || y.is_missing() {
            op == CompareOp::Ne
        } else {
            op.apply(&x, &y)
        }
    })
}

macro_rules! compare_fns {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            #[doc = concat!("Element-wise [`CompareOp::", stringify!($op), "`].")]
            pub fn $name<T>(a: &NdArray<T>, b: &NdArray<T>) -> Result<NdArray<bool>>
            where
                T: Missing + PartialOrd + MaybeSync,
            {
                compare(a, b, CompareOp::$op)
            }
        )*
    };
}

compare_fns!(eq => Eq, ne => Ne, lt => Lt, le => Le, gt => Gt, ge => Ge);

/// Element-wise logical AND.
pub fn and(a: &NdArray<bool>, b: &NdArray<bool>) -> Result<NdArray<bool>> {
    zip_map2(a, b, |x, y| x && y)
}

/// Element-wise logical OR.
pub fn or(a: &NdArray<bool>, b: &NdArray<bool>) -> Result<NdArray<bool>> {
    zip_map2(a, b, |x, y| x || y)
}

/// Element-wise logical XOR.
pub fn xor(a: &NdArray<bool>, b: &NdArray<bool>) -> Result<NdArray<bool>> {
    zip_map2(a, b, |x, y| x ^ y)
}
