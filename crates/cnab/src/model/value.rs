//! Value kinds for CNAB fields.
//!
//! Every field of a layout projects its Rust value onto one of a closed set
//! of kinds. The kind decides how the value is padded, truncated and parsed.

use std::borrow::Cow;

use crate::error::{Error, Result};

/// Formatting family of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Uppercased, left-justified, space-padded. Decoded lossily when the
    /// bytes are not UTF-8.
    Text,
    /// `1` or `0`, zero-padded on the left.
    Boolean,
    /// Decimal digits, zero-padded on the left.
    SignedInt,
    /// Decimal digits, zero-padded on the left.
    UnsignedInt,
    /// Two implied fractional digits, zero-padded on the left.
    Decimal,
    /// Bytes produced and consumed by capability hooks.
    Custom,
}

/// A field value in transit between a record and its line.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Text(Cow<'a, str>),
    Boolean(bool),
    SignedInt(i64),
    UnsignedInt(u64),
    Decimal(f64),
    /// Raw field bytes, untrimmed on decode.
    Custom(Cow<'a, [u8]>),
}

/// Rust types that map onto a built-in [`ValueKind`].
///
/// Implemented for `String`, `bool`, every primitive integer type, `f32` and
/// `f64`. Types with their own representation use the hooks in
/// [`crate::model::layout`] instead.
pub trait Scalar: Sized {
    /// Kind used to format values of this type.
    const KIND: ValueKind;

    /// Projects the value for encoding.
    fn to_value(&self) -> Value<'_>;

    /// Builds the value back from a decoded projection.
    fn from_value(value: Value<'_>) -> Result<Self>;
}

impl Scalar for String {
    const KIND: ValueKind = ValueKind::Text;

    fn to_value(&self) -> Value<'_> {
        Value::Text(Cow::Borrowed(self.as_str()))
    }

    fn from_value(value: Value<'_>) -> Result<Self> {
        match value {
            Value::Text(text) => Ok(text.into_owned()),
            _ => Err(Error::UnsupportedType),
        }
    }
}

impl Scalar for bool {
    const KIND: ValueKind = ValueKind::Boolean;

    fn to_value(&self) -> Value<'_> {
        Value::Boolean(*self)
    }

    fn from_value(value: Value<'_>) -> Result<Self> {
        match value {
            Value::Boolean(b) => Ok(b),
            _ => Err(Error::UnsupportedType),
        }
    }
}

macro_rules! impl_scalar_int {
    ($variant:ident, $wide:ty, $($t:ty),+) => {
        $(
            impl Scalar for $t {
                const KIND: ValueKind = ValueKind::$variant;

                fn to_value(&self) -> Value<'_> {
                    Value::$variant(*self as $wide)
                }

                fn from_value(value: Value<'_>) -> Result<Self> {
                    match value {
                        Value::$variant(v) => <$t>::try_from(v).map_err(|_| Error::Overflow {
                            value: v.to_string(),
                            target: stringify!($t),
                        }),
                        _ => Err(Error::UnsupportedType),
                    }
                }
            }
        )+
    };
}

impl_scalar_int!(SignedInt, i64, i8, i16, i32, i64, isize);
impl_scalar_int!(UnsignedInt, u64, u8, u16, u32, u64, usize);

impl Scalar for f64 {
    const KIND: ValueKind = ValueKind::Decimal;

    fn to_value(&self) -> Value<'_> {
        Value::Decimal(*self)
    }

    fn from_value(value: Value<'_>) -> Result<Self> {
        match value {
            Value::Decimal(v) => Ok(v),
            _ => Err(Error::UnsupportedType),
        }
    }
}

impl Scalar for f32 {
    const KIND: ValueKind = ValueKind::Decimal;

    fn to_value(&self) -> Value<'_> {
        Value::Decimal(*self as f64)
    }

    fn from_value(value: Value<'_>) -> Result<Self> {
        match value {
            Value::Decimal(v) => Ok(v as f32),
            _ => Err(Error::UnsupportedType),
        }
    }
}
