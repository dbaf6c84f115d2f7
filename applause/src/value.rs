/*!
Typed values and the coercion of raw tokens into them.

Every type a field can hold is named by a [`ValueKind`], and [`coerce`] is
the single place where a token is turned into a [`Value`] of that kind.
Overflow is always an error: there's no silent wraparound or saturation.
*/

use core::fmt::{self, Display};
use core::num::ParseFloatError;
use core::str::FromStr;

use joinery::JoinableIterator;
use thiserror::Error;

/// The closed set of types that a positional or option can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// A complex number with two `f32` components
    Complex32,
    /// A complex number with two `f64` components
    Complex64,
    String,
}

impl ValueKind {
    #[inline]
    #[must_use]
    pub const fn is_bool(self) -> bool {
        matches!(self, Self::Bool)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Complex32 => "complex32",
            Self::Complex64 => "complex64",
            Self::String => "string",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A complex number, stored as its real and imaginary components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    #[inline]
    pub const fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

/// Formats as `(re+imi)`, which [`coerce`] accepts back.
impl<T: Display> Display for Complex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}{:+}i)", self.re, self.im)
    }
}

/// A parsed, typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Complex32(Complex<f32>),
    Complex64(Complex<f64>),
    String(String),

    /// The values collected by a multi-valued positional, in order. All
    /// items share the positional's kind.
    List(Vec<Value>),
}

impl Value {
    /// The kind of this value. For a [`List`][Value::List] this is the kind
    /// of its items, or `None` if it's empty.
    #[must_use]
    pub fn kind(&self) -> Option<ValueKind> {
        Some(match *self {
            Self::Bool(_) => ValueKind::Bool,
            Self::I8(_) => ValueKind::I8,
            Self::I16(_) => ValueKind::I16,
            Self::I32(_) => ValueKind::I32,
            Self::I64(_) => ValueKind::I64,
            Self::U8(_) => ValueKind::U8,
            Self::U16(_) => ValueKind::U16,
            Self::U32(_) => ValueKind::U32,
            Self::U64(_) => ValueKind::U64,
            Self::F32(_) => ValueKind::F32,
            Self::F64(_) => ValueKind::F64,
            Self::Complex32(_) => ValueKind::Complex32,
            Self::Complex64(_) => ValueKind::Complex64,
            Self::String(_) => ValueKind::String,
            Self::List(ref items) => return items.first().and_then(Value::kind),
        })
    }

    /// The string contents, if this is a string value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Self::String(ref s) => Some(s),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Bool(v) => v.fmt(f),
            Self::I8(v) => v.fmt(f),
            Self::I16(v) => v.fmt(f),
            Self::I32(v) => v.fmt(f),
            Self::I64(v) => v.fmt(f),
            Self::U8(v) => v.fmt(f),
            Self::U16(v) => v.fmt(f),
            Self::U32(v) => v.fmt(f),
            Self::U64(v) => v.fmt(f),
            Self::F32(v) => v.fmt(f),
            Self::F64(v) => v.fmt(f),
            Self::Complex32(v) => v.fmt(f),
            Self::Complex64(v) => v.fmt(f),
            Self::String(ref v) => f.write_str(v),
            Self::List(ref items) => items.iter().join_with(' ').fmt(f),
        }
    }
}

/// A token couldn't be converted into the requested kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} value {token:?}: {reason}")]
pub struct CoercionError {
    pub kind: ValueKind,
    pub token: String,
    pub reason: String,
}

/// Convert a raw token into a [`Value`] of the given kind.
pub fn coerce(token: &str, kind: ValueKind) -> Result<Value, CoercionError> {
    let fail = |reason: String| CoercionError {
        kind,
        token: token.to_owned(),
        reason,
    };

    match kind {
        ValueKind::Bool => parse_bool(token)
            .map(Value::Bool)
            .ok_or_else(|| fail("expected one of 1, t, true, 0, f, false".to_owned())),
        ValueKind::I8 => parse_int(token).map(Value::I8).map_err(fail),
        ValueKind::I16 => parse_int(token).map(Value::I16).map_err(fail),
        ValueKind::I32 => parse_int(token).map(Value::I32).map_err(fail),
        ValueKind::I64 => parse_int(token).map(Value::I64).map_err(fail),
        ValueKind::U8 => parse_int(token).map(Value::U8).map_err(fail),
        ValueKind::U16 => parse_int(token).map(Value::U16).map_err(fail),
        ValueKind::U32 => parse_int(token).map(Value::U32).map_err(fail),
        ValueKind::U64 => parse_int(token).map(Value::U64).map_err(fail),
        ValueKind::F32 => parse_float(token).map(Value::F32).map_err(fail),
        ValueKind::F64 => parse_float(token).map(Value::F64).map_err(fail),
        ValueKind::Complex32 => parse_complex(token).map(Value::Complex32).map_err(fail),
        ValueKind::Complex64 => parse_complex(token).map(Value::Complex64).map_err(fail),
        ValueKind::String => Ok(Value::String(token.to_owned())),
    }
}

fn parse_bool(token: &str) -> Option<bool> {
    match token {
        "1" | "t" | "T" | "true" | "True" | "TRUE" => Some(true),
        "0" | "f" | "F" | "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn parse_int<T>(token: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    token.parse().map_err(|err: T::Err| err.to_string())
}

/// Floats that are allowed to come out of [`coerce`]. `FromStr` for floats
/// saturates to infinity on overflow, so that case is detected separately.
trait Float: FromStr<Err = ParseFloatError> + Copy {
    const ZERO: Self;
    const ONE: Self;

    fn is_infinite(self) -> bool;
    fn neg(self) -> Self;
}

macro_rules! float {
    ($($type:ident)*) => {
        $(
            impl Float for $type {
                const ZERO: Self = 0.0;
                const ONE: Self = 1.0;

                #[inline]
                fn is_infinite(self) -> bool {
                    $type::is_infinite(self)
                }

                #[inline]
                fn neg(self) -> Self {
                    -self
                }
            }
        )*
    };
}

float! { f32 f64 }

fn is_infinity_literal(token: &str) -> bool {
    let token = token.strip_prefix(['+', '-']).unwrap_or(token);
    token.eq_ignore_ascii_case("inf") || token.eq_ignore_ascii_case("infinity")
}

fn parse_float<T: Float>(token: &str) -> Result<T, String> {
    let value: T = token.parse().map_err(|err: ParseFloatError| err.to_string())?;

    if value.is_infinite() && !is_infinity_literal(token) {
        Err("value out of range".to_owned())
    } else {
        Ok(value)
    }
}

/// The imaginary part, without its trailing `i`. A bare sign means 1.
fn parse_imaginary<T: Float>(token: &str) -> Result<T, String> {
    match token {
        "" | "+" => Ok(T::ONE),
        "-" => Ok(T::ONE.neg()),
        token => parse_float(token),
    }
}

/// Accepts `re`, `imi`, and `re±imi`, optionally wrapped in parentheses.
fn parse_complex<T: Float>(token: &str) -> Result<Complex<T>, String> {
    let body = token
        .strip_prefix('(')
        .and_then(|body| body.strip_suffix(')'))
        .unwrap_or(token);

    let Some(body) = body.strip_suffix('i') else {
        return parse_float(body).map(|re| Complex::new(re, T::ZERO));
    };

    // The split is the last sign that isn't leading and isn't part of an
    // exponent.
    let bytes = body.as_bytes();
    let split = bytes
        .iter()
        .enumerate()
        .rev()
        .find(|&(i, &b)| (b == b'+' || b == b'-') && i > 0 && !matches!(bytes[i - 1], b'e' | b'E'))
        .map(|(i, _)| i);

    match split {
        None => parse_imaginary(body).map(|im| Complex::new(T::ZERO, im)),
        Some(i) => {
            let (re, im) = body.split_at(i);
            Ok(Complex::new(parse_float(re)?, parse_imaginary(im)?))
        }
    }
}

/// Types that can be extracted from a parsed [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! value_types {
    ($($variant:ident => $type:ty,)*) => {
        $(
            impl FromValue for $type {
                #[inline]
                fn from_value(value: &Value) -> Option<Self> {
                    match *value {
                        Value::$variant(ref inner) => Some(Clone::clone(inner)),
                        _ => None,
                    }
                }
            }

            impl From<$type> for Value {
                #[inline]
                fn from(value: $type) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

value_types! {
    Bool => bool,
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    F32 => f32,
    F64 => f64,
    Complex32 => Complex<f32>,
    Complex64 => Complex<f64>,
    String => String,
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match *value {
            Value::List(ref items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}
