//! Sample types shared by every indicator
//!
//! `Float` can be switched between `f32` and `f64` with cargo features; the
//! default is `f64`.
//!
//! - `f64` (default): double precision
//! - `f32`: single precision

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Floating-point type used throughout the library
///
/// When `f32` feature is enabled, this is `f32` (single-precision).
#[cfg(feature = "f32")]
pub type Float = f32;

/// Floating-point type used throughout the library
///
/// When `f32` feature is NOT enabled, this is `f64` (double-precision).
#[cfg(not(feature = "f32"))]
pub type Float = f64;

/// Divisors with an absolute value under this threshold are treated as zero.
pub(crate) const ZERO_EPSILON: Float = 1e-8;

/// Float equality under which NaN equals NaN.
///
/// Warming-up states hold NaN outputs; comparing states with this keeps a
/// state equal to its own copy.
#[inline]
pub(crate) fn same_float(a: Float, b: Float) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Implements `PartialEq` for a state, comparing the listed float fields with
/// [`same_float`] and every other field with `==`.
macro_rules! impl_nan_eq {
    ($ty:ty { floats: [$($float:ident),* $(,)?], fields: [$($field:ident),* $(,)?] $(,)? }) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                true $(&& $crate::types::same_float(self.$float, other.$float))*
                    $(&& self.$field == other.$field)*
            }
        }
    };
}

/// Serde adapter for `Float` fields that keeps non-finite values.
///
/// JSON has no NaN or infinity, so NaN is written as `null` and infinities as
/// `"inf"` / `"-inf"`. Reading accepts the same forms plus plain numbers.
#[cfg(feature = "serde")]
pub(crate) mod nullable {
    use std::fmt;

    use serde::de::{self, Deserializer, Unexpected, Visitor};
    use serde::{Deserialize, Serialize, Serializer};

    use super::Float;

    pub(crate) fn serialize<S: Serializer>(value: &Float, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else if value.is_infinite() {
            serializer.serialize_str(if *value > 0.0 { "inf" } else { "-inf" })
        } else {
            value.serialize(serializer)
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Float, D::Error> {
        deserializer.deserialize_any(FloatVisitor)
    }

    struct FloatVisitor;

    impl<'de> Visitor<'de> for FloatVisitor {
        type Value = Float;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number, null, \"inf\" or \"-inf\"")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Float, E> {
            Ok(v as Float)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Float, E> {
            Ok(v as Float)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Float, E> {
            Ok(v as Float)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Float, E> {
            Ok(Float::NAN)
        }

        fn visit_none<E: de::Error>(self) -> Result<Float, E> {
            Ok(Float::NAN)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Float, E> {
            match v {
                "inf" => Ok(Float::INFINITY),
                "-inf" => Ok(Float::NEG_INFINITY),
                _ => Err(E::invalid_value(Unexpected::Str(v), &self)),
            }
        }
    }

    struct Element(Float);

    impl Serialize for Element {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serialize(&self.0, serializer)
        }
    }

    impl<'de> Deserialize<'de> for Element {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserialize(deserializer).map(Element)
        }
    }

    /// The same encoding for every element of a `VecDeque<Float>`.
    pub(crate) mod deque {
        use std::collections::VecDeque;

        use serde::{Deserialize, Deserializer, Serializer};

        use super::{Element, Float};

        pub(crate) fn serialize<S: Serializer>(
            values: &VecDeque<Float>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(values.iter().map(|v| Element(*v)))
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<VecDeque<Float>, D::Error> {
            let elements = Vec::<Element>::deserialize(deserializer)?;
            Ok(elements.into_iter().map(|e| e.0).collect())
        }
    }
}

/// One bar of a price range, consumed by MIDPRICE.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HighLow {
    /// Bar high
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub high: Float,
    /// Bar low
    #[cfg_attr(feature = "serde", serde(with = "crate::types::nullable"))]
    pub low: Float,
}

impl HighLow {
    /// Creates a bar from its high and low.
    #[inline]
    pub const fn new(high: Float, low: Float) -> Self {
        Self { high, low }
    }
}

impl From<(Float, Float)> for HighLow {
    #[inline]
    fn from((high, low): (Float, Float)) -> Self {
        Self { high, low }
    }
}
