// Author: Dustin Pilgrim
// License: MIT

//! Field-metadata provider.
//!
//! A [`Record`] exposes its annotated fields by name as typed slots. The
//! encoder reads slots through [`SlotRef`], the decoder writes through
//! [`SlotMut`]. Implement it with the [`record!`](crate::record) macro:
//!
//! ```
//! use icl::record;
//!
//! #[derive(Debug, Default)]
//! struct Server {
//!     name: String,
//!     port: u16,
//!     ratio: f64,
//!     internal: bool,
//! }
//!
//! record!(Server {
//!     name: ".param",
//!     port: "port",
//!     ratio: "ratio.2",
//!     internal,
//! });
//! ```
//!
//! Fields listed without an annotation are neither written nor read.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use indexmap::IndexMap;

use crate::IclError;

mod conversion;
mod descriptor;
mod schema;

pub use descriptor::{FieldDescriptor, PARAM_ANNOTATION, parse_descriptor};
pub use schema::{FieldSpec, Schema, SchemaField};

#[cfg(test)]
mod tests;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::OnceCell;
}

/// Primitive kinds a scalar field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
}

impl ScalarKind {
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::Isize => "isize",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::Usize => "usize",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
        }
    }

    pub fn is_integer(self) -> bool {
        !matches!(self, ScalarKind::String | ScalarKind::Bool | ScalarKind::F32 | ScalarKind::F64)
    }

    pub fn is_float(self) -> bool {
        matches!(self, ScalarKind::F32 | ScalarKind::F64)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A primitive value in transit between a document and a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
}

/// Rust types that map onto a single [`ScalarKind`].
pub trait Primitive: Clone + Default + 'static {
    const KIND: ScalarKind;

    fn to_scalar(&self) -> Scalar;

    /// `None` when the scalar is not of this type's kind or out of its range.
    fn from_scalar(scalar: Scalar) -> Option<Self>;
}

/// A scalar field, plain or optional.
pub trait ScalarSlot {
    fn kind(&self) -> ScalarKind;
    fn is_optional(&self) -> bool;
    /// Current value, `None` for an empty optional.
    fn get(&self) -> Option<Scalar>;
    /// Store a value. Returns false when the scalar does not fit the slot.
    fn set(&mut self, value: Scalar) -> bool;
    fn clear(&mut self);
}

/// A sequence of primitives.
pub trait SequenceSlot {
    fn kind(&self) -> ScalarKind;
    fn items(&self) -> Vec<Scalar>;
    fn push(&mut self, value: Scalar) -> bool;
}

/// A string-keyed map of primitives.
pub trait MappingSlot {
    /// Kind of the map's values.
    fn kind(&self) -> ScalarKind;
    fn entries(&self) -> Vec<(String, Scalar)>;
    fn insert(&mut self, key: String, value: Scalar) -> bool;
}

/// An optional nested record.
pub trait OptionalRecordSlot {
    fn get(&self) -> Option<&dyn Record>;
    /// The nested record, created with its default value when absent.
    fn ensure(&mut self) -> &mut dyn Record;
}

/// A sequence of nested records.
pub trait RecordSeqSlot {
    fn records(&self) -> Vec<&dyn Record>;
    /// Fill a fresh default record with `fill` and append it on success.
    fn append_with(
        &mut self,
        fill: &mut dyn FnMut(&mut dyn Record) -> Result<(), IclError>,
    ) -> Result<(), IclError>;
}

/// Read access to one field, by shape.
pub enum SlotRef<'a> {
    Scalar(&'a dyn ScalarSlot),
    Sequence(&'a dyn SequenceSlot),
    Mapping(&'a dyn MappingSlot),
    Record(&'a dyn Record),
    OptionalRecord(&'a dyn OptionalRecordSlot),
    Records(&'a dyn RecordSeqSlot),
    /// A type combination the document model has no form for.
    Unsupported(&'static str),
}

/// Write access to one field, by shape.
pub enum SlotMut<'a> {
    Scalar(&'a mut dyn ScalarSlot),
    Sequence(&'a mut dyn SequenceSlot),
    Mapping(&'a mut dyn MappingSlot),
    Record(&'a mut dyn Record),
    OptionalRecord(&'a mut dyn OptionalRecordSlot),
    Records(&'a mut dyn RecordSeqSlot),
    Unsupported(&'static str),
}

impl SlotMut<'_> {
    /// Shape name used in mismatch messages.
    pub fn shape_name(&self) -> String {
        match self {
            SlotMut::Scalar(slot) => slot.kind().to_string(),
            SlotMut::Sequence(slot) => format!("sequence of {}", slot.kind()),
            SlotMut::Mapping(slot) => format!("map of {}", slot.kind()),
            SlotMut::Record(_) | SlotMut::OptionalRecord(_) => "block".to_string(),
            SlotMut::Records(_) => "sequence of blocks".to_string(),
            SlotMut::Unsupported(shape) => shape.to_string(),
        }
    }
}

/// A record: a struct whose annotated fields bind to document keys.
pub trait Record {
    /// Resolved field metadata, in declaration order.
    fn schema(&self) -> Result<&'static Schema, IclError>;

    fn slot(&self, field: &str) -> Option<SlotRef<'_>>;

    fn slot_mut(&mut self, field: &str) -> Option<SlotMut<'_>>;
}

/// A type that can sit in a record field.
pub trait Field {
    fn as_slot(&self) -> SlotRef<'_>;
    fn as_slot_mut(&mut self) -> SlotMut<'_>;
}

/// A type that can sit inside `Option<_>` or `Vec<_>` in a record field.
pub trait Element: Sized {
    fn optional(value: &Option<Self>) -> SlotRef<'_>;
    fn optional_mut(value: &mut Option<Self>) -> SlotMut<'_>;
    fn sequence(values: &Vec<Self>) -> SlotRef<'_>;
    fn sequence_mut(values: &mut Vec<Self>) -> SlotMut<'_>;
}

impl<T: Element> Field for Option<T> {
    fn as_slot(&self) -> SlotRef<'_> {
        T::optional(self)
    }

    fn as_slot_mut(&mut self) -> SlotMut<'_> {
        T::optional_mut(self)
    }
}

impl<T: Element> Field for Vec<T> {
    fn as_slot(&self) -> SlotRef<'_> {
        T::sequence(self)
    }

    fn as_slot_mut(&mut self) -> SlotMut<'_> {
        T::sequence_mut(self)
    }
}

impl<T: Element> Element for Vec<T> {
    fn optional(_: &Option<Self>) -> SlotRef<'_> {
        SlotRef::Unsupported("optional sequence")
    }

    fn optional_mut(_: &mut Option<Self>) -> SlotMut<'_> {
        SlotMut::Unsupported("optional sequence")
    }

    fn sequence(_: &Vec<Self>) -> SlotRef<'_> {
        SlotRef::Unsupported("sequence of sequences")
    }

    fn sequence_mut(_: &mut Vec<Self>) -> SlotMut<'_> {
        SlotMut::Unsupported("sequence of sequences")
    }
}

impl<P: Primitive> ScalarSlot for Option<P> {
    fn kind(&self) -> ScalarKind {
        P::KIND
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn get(&self) -> Option<Scalar> {
        self.as_ref().map(Primitive::to_scalar)
    }

    fn set(&mut self, value: Scalar) -> bool {
        match P::from_scalar(value) {
            Some(v) => {
                *self = Some(v);
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        *self = None;
    }
}

impl<P: Primitive> SequenceSlot for Vec<P> {
    fn kind(&self) -> ScalarKind {
        P::KIND
    }

    fn items(&self) -> Vec<Scalar> {
        self.iter().map(Primitive::to_scalar).collect()
    }

    fn push(&mut self, value: Scalar) -> bool {
        match P::from_scalar(value) {
            Some(v) => {
                Vec::push(self, v);
                true
            }
            None => false,
        }
    }
}

macro_rules! mapping_slot {
    ($($map:ident),*) => {
        $(
            impl<P: Primitive> MappingSlot for $map<String, P> {
                fn kind(&self) -> ScalarKind {
                    P::KIND
                }

                fn entries(&self) -> Vec<(String, Scalar)> {
                    self.iter().map(|(k, v)| (k.clone(), v.to_scalar())).collect()
                }

                fn insert(&mut self, key: String, value: Scalar) -> bool {
                    match P::from_scalar(value) {
                        Some(v) => {
                            $map::insert(self, key, v);
                            true
                        }
                        None => false,
                    }
                }
            }

            impl<P: Primitive> Field for $map<String, P> {
                fn as_slot(&self) -> SlotRef<'_> {
                    SlotRef::Mapping(self)
                }

                fn as_slot_mut(&mut self) -> SlotMut<'_> {
                    SlotMut::Mapping(self)
                }
            }

            impl<P: Primitive> Element for $map<String, P> {
                fn optional(_: &Option<Self>) -> SlotRef<'_> {
                    SlotRef::Unsupported("optional map")
                }

                fn optional_mut(_: &mut Option<Self>) -> SlotMut<'_> {
                    SlotMut::Unsupported("optional map")
                }

                fn sequence(_: &Vec<Self>) -> SlotRef<'_> {
                    SlotRef::Unsupported("sequence of maps")
                }

                fn sequence_mut(_: &mut Vec<Self>) -> SlotMut<'_> {
                    SlotMut::Unsupported("sequence of maps")
                }
            }
        )*
    };
}

mapping_slot!(HashMap, BTreeMap, IndexMap);

impl<R: Record + Default> OptionalRecordSlot for Option<R> {
    fn get(&self) -> Option<&dyn Record> {
        self.as_ref().map(|record| record as &dyn Record)
    }

    fn ensure(&mut self) -> &mut dyn Record {
        self.get_or_insert_with(R::default)
    }
}

impl<R: Record + Default> RecordSeqSlot for Vec<R> {
    fn records(&self) -> Vec<&dyn Record> {
        self.iter().map(|record| record as &dyn Record).collect()
    }

    fn append_with(
        &mut self,
        fill: &mut dyn FnMut(&mut dyn Record) -> Result<(), IclError>,
    ) -> Result<(), IclError> {
        let mut record = R::default();
        fill(&mut record)?;
        self.push(record);
        Ok(())
    }
}

/// Implements `ScalarSlot`, `Field` and `Element` for a primitive type.
macro_rules! primitive_field {
    ($ty:ty) => {
        impl ScalarSlot for $ty {
            fn kind(&self) -> ScalarKind {
                <$ty as Primitive>::KIND
            }

            fn is_optional(&self) -> bool {
                false
            }

            fn get(&self) -> Option<Scalar> {
                Some(self.to_scalar())
            }

            fn set(&mut self, value: Scalar) -> bool {
                match <$ty as Primitive>::from_scalar(value) {
                    Some(v) => {
                        *self = v;
                        true
                    }
                    None => false,
                }
            }

            fn clear(&mut self) {
                *self = <$ty>::default();
            }
        }

        impl Field for $ty {
            fn as_slot(&self) -> SlotRef<'_> {
                SlotRef::Scalar(self)
            }

            fn as_slot_mut(&mut self) -> SlotMut<'_> {
                SlotMut::Scalar(self)
            }
        }

        impl Element for $ty {
            fn optional(value: &Option<Self>) -> SlotRef<'_> {
                SlotRef::Scalar(value)
            }

            fn optional_mut(value: &mut Option<Self>) -> SlotMut<'_> {
                SlotMut::Scalar(value)
            }

            fn sequence(values: &Vec<Self>) -> SlotRef<'_> {
                SlotRef::Sequence(values)
            }

            fn sequence_mut(values: &mut Vec<Self>) -> SlotMut<'_> {
                SlotMut::Sequence(values)
            }
        }
    };
}

macro_rules! signed_primitive {
    ($($ty:ty => $kind:ident),*) => {
        $(
            impl Primitive for $ty {
                const KIND: ScalarKind = ScalarKind::$kind;

                fn to_scalar(&self) -> Scalar {
                    Scalar::Int(*self as i64)
                }

                fn from_scalar(scalar: Scalar) -> Option<Self> {
                    match scalar {
                        Scalar::Int(v) => <$ty>::try_from(v).ok(),
                        Scalar::Uint(v) => <$ty>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }

            primitive_field!($ty);
        )*
    };
}

macro_rules! unsigned_primitive {
    ($($ty:ty => $kind:ident),*) => {
        $(
            impl Primitive for $ty {
                const KIND: ScalarKind = ScalarKind::$kind;

                fn to_scalar(&self) -> Scalar {
                    Scalar::Uint(*self as u64)
                }

                fn from_scalar(scalar: Scalar) -> Option<Self> {
                    match scalar {
                        Scalar::Uint(v) => <$ty>::try_from(v).ok(),
                        Scalar::Int(v) => <$ty>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }

            primitive_field!($ty);
        )*
    };
}

signed_primitive!(i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize);
unsigned_primitive!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize);

impl Primitive for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn to_scalar(&self) -> Scalar {
        Scalar::String(self.clone())
    }

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Primitive for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn to_scalar(&self) -> Scalar {
        Scalar::Bool(*self)
    }

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl Primitive for f32 {
    const KIND: ScalarKind = ScalarKind::F32;

    fn to_scalar(&self) -> Scalar {
        Scalar::Float(f64::from(*self))
    }

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Float(v) => Some(v as f32),
            _ => None,
        }
    }
}

impl Primitive for f64 {
    const KIND: ScalarKind = ScalarKind::F64;

    fn to_scalar(&self) -> Scalar {
        Scalar::Float(*self)
    }

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Float(v) => Some(v),
            _ => None,
        }
    }
}

primitive_field!(String);
primitive_field!(bool);
primitive_field!(f32);
primitive_field!(f64);

/// Implement [`Record`] for a struct.
///
/// Each entry names a struct field, optionally followed by its annotation.
/// Field order in the macro is the declaration order used for encoding and
/// for binding block parameters. The struct must implement `Default`.
#[macro_export]
macro_rules! record {
    (@tag $tag:literal) => { ::core::option::Option::Some($tag) };
    (@tag) => { ::core::option::Option::None };

    ($ty:ident { $($field:ident $(: $tag:literal)?),* $(,)? }) => {
        impl $crate::binding::Record for $ty {
            fn schema(&self) -> ::core::result::Result<&'static $crate::binding::Schema, $crate::IclError> {
                static SCHEMA: $crate::binding::__private::OnceCell<
                    ::core::result::Result<$crate::binding::Schema, $crate::IclError>,
                > = $crate::binding::__private::OnceCell::new();

                SCHEMA
                    .get_or_init(|| {
                        $crate::binding::Schema::resolve(
                            stringify!($ty),
                            &[$($crate::binding::FieldSpec {
                                name: stringify!($field),
                                annotation: $crate::record!(@tag $($tag)?),
                            }),*],
                        )
                    })
                    .as_ref()
                    .map_err(::core::clone::Clone::clone)
            }

            #[allow(unused_variables)]
            fn slot(&self, field: &str) -> ::core::option::Option<$crate::binding::SlotRef<'_>> {
                $(
                    if field == stringify!($field) {
                        return ::core::option::Option::Some($crate::binding::Field::as_slot(&self.$field));
                    }
                )*
                ::core::option::Option::None
            }

            #[allow(unused_variables)]
            fn slot_mut(&mut self, field: &str) -> ::core::option::Option<$crate::binding::SlotMut<'_>> {
                $(
                    if field == stringify!($field) {
                        return ::core::option::Option::Some($crate::binding::Field::as_slot_mut(&mut self.$field));
                    }
                )*
                ::core::option::Option::None
            }
        }

        impl $crate::binding::Field for $ty {
            fn as_slot(&self) -> $crate::binding::SlotRef<'_> {
                $crate::binding::SlotRef::Record(self)
            }

            fn as_slot_mut(&mut self) -> $crate::binding::SlotMut<'_> {
                $crate::binding::SlotMut::Record(self)
            }
        }

        impl $crate::binding::Element for $ty {
            fn optional(value: &::core::option::Option<Self>) -> $crate::binding::SlotRef<'_> {
                $crate::binding::SlotRef::OptionalRecord(value)
            }

            fn optional_mut(value: &mut ::core::option::Option<Self>) -> $crate::binding::SlotMut<'_> {
                $crate::binding::SlotMut::OptionalRecord(value)
            }

            fn sequence(values: &::std::vec::Vec<Self>) -> $crate::binding::SlotRef<'_> {
                $crate::binding::SlotRef::Records(values)
            }

            fn sequence_mut(values: &mut ::std::vec::Vec<Self>) -> $crate::binding::SlotMut<'_> {
                $crate::binding::SlotMut::Records(values)
            }
        }
    };
}
