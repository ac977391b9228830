use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

use super::{Scalar, ScalarKind};
use crate::IclError;
use crate::ast::Node;
use crate::utils::format_float;

impl ScalarKind {
    /// Parse number text into a scalar of this kind.
    ///
    /// Integers are range checked against the kind's width, unsigned kinds
    /// reject a leading `-`, floats must be finite.
    pub fn parse_number(self, raw: &str) -> Result<Scalar, IclError> {
        match self {
            ScalarKind::I8 => parse_int::<i8>(raw, self).map(|v| Scalar::Int(v.into())),
            ScalarKind::I16 => parse_int::<i16>(raw, self).map(|v| Scalar::Int(v.into())),
            ScalarKind::I32 => parse_int::<i32>(raw, self).map(|v| Scalar::Int(v.into())),
            ScalarKind::I64 => parse_int::<i64>(raw, self).map(Scalar::Int),
            ScalarKind::Isize => parse_int::<isize>(raw, self).map(|v| Scalar::Int(v as i64)),
            ScalarKind::U8 => parse_uint::<u8>(raw, self).map(|v| Scalar::Uint(v.into())),
            ScalarKind::U16 => parse_uint::<u16>(raw, self).map(|v| Scalar::Uint(v.into())),
            ScalarKind::U32 => parse_uint::<u32>(raw, self).map(|v| Scalar::Uint(v.into())),
            ScalarKind::U64 => parse_uint::<u64>(raw, self).map(Scalar::Uint),
            ScalarKind::Usize => parse_uint::<usize>(raw, self).map(|v| Scalar::Uint(v as u64)),
            ScalarKind::F32 => {
                let v: f32 = raw.parse().map_err(|_| invalid_number(raw, self))?;
                finite(f64::from(v), raw, self)
            }
            ScalarKind::F64 => {
                let v: f64 = raw.parse().map_err(|_| invalid_number(raw, self))?;
                finite(v, raw, self)
            }
            ScalarKind::String | ScalarKind::Bool => Err(IclError::FieldShapeMismatch {
                expected: self.to_string(),
                found: "number".to_string(),
            }),
        }
    }

    /// Coerce environment text into this kind. Booleans are true only for
    /// the exact text `true`.
    pub fn parse_text(self, raw: &str) -> Result<Scalar, IclError> {
        match self {
            ScalarKind::String => Ok(Scalar::String(raw.to_string())),
            ScalarKind::Bool => Ok(Scalar::Bool(raw == "true")),
            _ => self.parse_number(raw),
        }
    }

    /// Literal node for a value of this kind. `precision` only affects floats.
    /// Non-finite floats have no literal form and are out of range.
    pub fn to_node(self, value: &Scalar, precision: Option<usize>) -> Result<Node, IclError> {
        let node = match value {
            Scalar::String(s) => Node::string(s.as_str()),
            Scalar::Bool(b) => Node::boolean(*b),
            Scalar::Int(v) => Node::number(v.to_string()),
            Scalar::Uint(v) => Node::number(v.to_string()),
            Scalar::Float(v) if !v.is_finite() => {
                return Err(IclError::NumericOutOfRange {
                    raw: v.to_string(),
                    kind: self.to_string(),
                });
            }
            Scalar::Float(v) if self == ScalarKind::F32 => {
                Node::number(format_float(*v as f32, precision))
            }
            Scalar::Float(v) => Node::number(format_float(*v, precision)),
        };
        Ok(node)
    }
}

fn parse_int<T>(raw: &str, kind: ScalarKind) -> Result<T, IclError>
where
    T: FromStr<Err = ParseIntError>,
{
    raw.parse::<T>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => IclError::NumericOutOfRange {
            raw: raw.to_string(),
            kind: kind.to_string(),
        },
        _ => invalid_number(raw, kind),
    })
}

fn parse_uint<T>(raw: &str, kind: ScalarKind) -> Result<T, IclError>
where
    T: FromStr<Err = ParseIntError>,
{
    if raw.starts_with('-') {
        return Err(IclError::NumericOutOfRange {
            raw: raw.to_string(),
            kind: kind.to_string(),
        });
    }
    parse_int(raw, kind)
}

fn finite(value: f64, raw: &str, kind: ScalarKind) -> Result<Scalar, IclError> {
    if value.is_finite() {
        Ok(Scalar::Float(value))
    } else {
        Err(IclError::NumericOutOfRange {
            raw: raw.to_string(),
            kind: kind.to_string(),
        })
    }
}

fn invalid_number(raw: &str, kind: ScalarKind) -> IclError {
    IclError::InvalidNumber {
        raw: raw.to_string(),
        kind: kind.to_string(),
    }
}
