use std::fmt;

use crate::{BroadcastError, Result};

/// Element type tag of an [`Array`](crate::Array).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    /// 16-bit signed integer.
    Short,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Pair of 64-bit floats.
    Complex,
    /// Opaque, non-numeric payload.
    Object,
}

impl DataType {
    /// Storage width in bytes used for promotion.
    ///
    /// `Complex` and `Object` never take part in width comparison.
    pub fn byte_width(self) -> usize {
        match self {
            DataType::Boolean => 1,
            DataType::Short => 2,
            DataType::Int | DataType::Float => 4,
            DataType::Long | DataType::Double => 8,
            DataType::Complex => 16,
            DataType::Object => std::mem::size_of::<usize>(),
        }
    }

    pub fn is_float_family(self) -> bool {
        matches!(self, DataType::Float | DataType::Double)
    }

    pub fn is_int_family(self) -> bool {
        matches!(self, DataType::Short | DataType::Int | DataType::Long)
    }

    /// Real or complex number.
    pub fn is_numeric(self) -> bool {
        self.is_float_family() || self.is_int_family() || self == DataType::Complex
    }

    /// Common element type for an arithmetic operation on `a` and `b`.
    ///
    /// - identical tags promote to themselves
    /// - `Complex` dominates any other numeric tag
    /// - otherwise the wider type by [`byte_width`](Self::byte_width) wins,
    ///   and on a width tie the float family wins (`Int` + `Float` is
    ///   `Float`, `Long` + `Double` is `Double`)
    ///
    /// # Errors
    /// [`BroadcastError::UnsupportedTypeCombination`] when `Boolean` or
    /// `Object` is mixed with any other tag.
    pub fn promote(a: DataType, b: DataType) -> Result<DataType> {
        if a == b {
            return Ok(a);
        }
        if !a.is_numeric() || !b.is_numeric() {
            tracing::debug!(lhs = %a, rhs = %b, "no common element type");
            return Err(BroadcastError::UnsupportedTypeCombination { lhs: a, rhs: b });
        }
        if a == DataType::Complex || b == DataType::Complex {
            return Ok(DataType::Complex);
        }

        let (wa, wb) = (a.byte_width(), b.byte_width());
        let promoted = if wa > wb {
            a
        } else if wb > wa {
            b
        } else if a.is_float_family() {
            a
        } else {
            b
        };
        Ok(promoted)
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::Short => "short",
            DataType::Int => "int",
            DataType::Long => "long",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Complex => "complex",
            DataType::Object => "object",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
