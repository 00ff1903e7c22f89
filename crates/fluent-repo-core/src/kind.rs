// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Type classification and value conversion for field types.
//!
//! Every field of a [`Model`](crate::Model) must implement [`FieldType`].
//! The trait reports the field's [`TypeKind`] (which decides whether the
//! field is selected as a column or loaded as an association) and converts
//! the field to and from a dynamic [`Value`].
//!
//! # Type Mapping
//!
//! | Rust Type | Kind | Notes |
//! |-----------|------|-------|
//! | `bool` | `Bool` | |
//! | `i8` .. `i64`, `isize` | `I8` .. `Isize` | |
//! | `u8` .. `u64`, `usize` | `U8` .. `Usize` | |
//! | `f32`, `f64` | `F32`, `F64` | |
//! | `String` | `String` | |
//! | `Option<T>` | `Pointer(T)` | `None` is nil |
//! | `Box<T>` | kind of `T` | Transparent |
//! | `Vec<T>` | `Slice(T)` | |
//! | `BTreeMap<String, V>`, `HashMap<String, V>` | `Map` | |
//! | `#[derive(Model)]` struct | `Struct` | |
//!
//! # Conversion
//!
//! Numeric values convert between every numeric kind with `as` semantics.
//! Strings convert only to strings and booleans only to booleans.
//! [`Value::Null`] never converts: the destination keeps its zero value.

use std::{
    collections::{BTreeMap, HashMap},
    fmt
};

use crate::{
    error::{MappingError, MappingResult},
    mapping::MappingPolicy,
    value::Value
};

/// Kind of a field type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `bool`
    Bool,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `String`
    String,
    /// A struct with its own shape.
    Struct,
    /// Optional value, the pointer form.
    Pointer(Box<TypeKind>),
    /// Sequence of elements.
    Slice(Box<TypeKind>),
    /// String-keyed map.
    Map,
    /// Anything else.
    Other
}

impl TypeKind {
    /// Check if this kind is basic: string, bool, integer or float.
    ///
    /// Pointers are never basic; call [`pointee`](Self::pointee) first to
    /// classify the pointee.
    #[must_use]
    pub const fn is_basic(&self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::Isize
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
                | Self::Usize
                | Self::F32
                | Self::F64
                | Self::String
        )
    }

    /// Check if this kind is composite (not basic).
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        !self.is_basic()
    }

    /// Check if this kind is an integer of any width or signedness.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::Isize
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
                | Self::Usize
        )
    }

    /// Strip every pointer layer.
    #[must_use]
    pub fn pointee(&self) -> &Self {
        match self {
            Self::Pointer(inner) => inner.pointee(),
            other => other
        }
    }

    /// Short kind name for diagnostics.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Bool => "bool".into(),
            Self::I8 => "i8".into(),
            Self::I16 => "i16".into(),
            Self::I32 => "i32".into(),
            Self::I64 => "i64".into(),
            Self::Isize => "isize".into(),
            Self::U8 => "u8".into(),
            Self::U16 => "u16".into(),
            Self::U32 => "u32".into(),
            Self::U64 => "u64".into(),
            Self::Usize => "usize".into(),
            Self::F32 => "f32".into(),
            Self::F64 => "f64".into(),
            Self::String => "string".into(),
            Self::Struct => "struct".into(),
            Self::Pointer(inner) => format!("*{}", inner.name()),
            Self::Slice(inner) => format!("[]{}", inner.name()),
            Self::Map => "map".into(),
            Self::Other => "other".into()
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Check if a field kind is basic.
///
/// Shorthand for [`TypeKind::is_basic`].
#[must_use]
pub const fn is_basic(kind: &TypeKind) -> bool {
    kind.is_basic()
}

/// Conversion between a Rust field type and [`Value`].
///
/// `from_value` returns `Ok(None)` when the value cannot be converted and
/// the policy is [`MappingPolicy::BestEffort`]; the caller then leaves the
/// field at its zero value. Under [`MappingPolicy::Strict`] the same
/// situation is [`MappingError::Unconvertible`]. `Null` is always
/// `Ok(None)`.
pub trait FieldType: Sized + Default {
    /// Kind of this type.
    fn kind() -> TypeKind;

    /// Convert to a dynamic value.
    fn to_value(&self) -> Value;

    /// Convert from a dynamic value.
    ///
    /// # Errors
    ///
    /// Returns an error under [`MappingPolicy::Strict`] when the value kind
    /// is incompatible, or when a nested element or record fails.
    fn from_value(value: &Value, policy: MappingPolicy) -> MappingResult<Option<Self>>;
}

/// Outcome for a value that does not convert to `kind`.
///
/// # Errors
///
/// Returns [`MappingError::Unconvertible`] under [`MappingPolicy::Strict`].
pub fn unconvertible<T>(kind: &TypeKind, found: &Value, policy: MappingPolicy) -> MappingResult<Option<T>> {
    match policy {
        MappingPolicy::BestEffort => Ok(None),
        MappingPolicy::Strict => Err(MappingError::Unconvertible {
            expected: kind.name(),
            found:    found.kind_name()
        })
    }
}

macro_rules! numeric_field_type {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FieldType for $ty {
                fn kind() -> TypeKind {
                    TypeKind::$kind
                }

                fn to_value(&self) -> Value {
                    Value::from(*self)
                }

                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_lossless,
                    clippy::unnecessary_cast
                )]
                fn from_value(value: &Value, policy: MappingPolicy) -> MappingResult<Option<Self>> {
                    match value {
                        Value::Null => Ok(None),
                        Value::Int(v) => Ok(Some(*v as $ty)),
                        Value::UInt(v) => Ok(Some(*v as $ty)),
                        Value::Float(v) => Ok(Some(*v as $ty)),
                        other => unconvertible(&Self::kind(), other, policy)
                    }
                }
            }
        )*
    };
}

numeric_field_type! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

impl FieldType for bool {
    fn kind() -> TypeKind {
        TypeKind::Bool
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value, policy: MappingPolicy) -> MappingResult<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(*b)),
            other => unconvertible(&Self::kind(), other, policy)
        }
    }
}

impl FieldType for String {
    fn kind() -> TypeKind {
        TypeKind::String
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: &Value, policy: MappingPolicy) -> MappingResult<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            other => unconvertible(&Self::kind(), other, policy)
        }
    }
}

impl<T: FieldType> FieldType for Option<T> {
    fn kind() -> TypeKind {
        TypeKind::Pointer(Box::new(T::kind()))
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, FieldType::to_value)
    }

    fn from_value(value: &Value, policy: MappingPolicy) -> MappingResult<Option<Self>> {
        if value.is_null() {
            return Ok(None);
        }
        Ok(T::from_value(value, policy)?.map(Some))
    }
}

impl<T: FieldType> FieldType for Box<T> {
    fn kind() -> TypeKind {
        T::kind()
    }

    fn to_value(&self) -> Value {
        self.as_ref().to_value()
    }

    fn from_value(value: &Value, policy: MappingPolicy) -> MappingResult<Option<Self>> {
        Ok(T::from_value(value, policy)?.map(Box::new))
    }
}

impl<T: FieldType> FieldType for Vec<T> {
    fn kind() -> TypeKind {
        TypeKind::Slice(Box::new(T::kind()))
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(FieldType::to_value).collect())
    }

    /// Elements convert independently; an unconvertible element is left at
    /// its zero value so the output keeps the input's length.
    fn from_value(value: &Value, policy: MappingPolicy) -> MappingResult<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::List(items) => {
                let mut out = Self::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let element = T::from_value(item, policy).map_err(|e| MappingError::Element {
                        index,
                        source: Box::new(e)
                    })?;
                    out.push(element.unwrap_or_default());
                }
                Ok(Some(out))
            }
            other => unconvertible(&Self::kind(), other, policy)
        }
    }
}

fn map_entries<V: FieldType>(
    value: &Value,
    policy: MappingPolicy
) -> MappingResult<Option<Vec<(String, V)>>> {
    match value {
        Value::Null => Ok(None),
        Value::Map(entries) => {
            let mut out = Vec::with_capacity(entries.len());
            for (key, entry) in entries {
                let converted = V::from_value(entry, policy).map_err(|e| MappingError::Field {
                    field:  key.clone(),
                    source: Box::new(e)
                })?;
                out.push((key.clone(), converted.unwrap_or_default()));
            }
            Ok(Some(out))
        }
        other => unconvertible(&TypeKind::Map, other, policy)
    }
}

impl<V: FieldType> FieldType for BTreeMap<String, V> {
    fn kind() -> TypeKind {
        TypeKind::Map
    }

    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect())
    }

    fn from_value(value: &Value, policy: MappingPolicy) -> MappingResult<Option<Self>> {
        Ok(map_entries(value, policy)?.map(|entries| entries.into_iter().collect()))
    }
}

impl<V: FieldType> FieldType for HashMap<String, V> {
    fn kind() -> TypeKind {
        TypeKind::Map
    }

    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect())
    }

    fn from_value(value: &Value, policy: MappingPolicy) -> MappingResult<Option<Self>> {
        Ok(map_entries(value, policy)?.map(|entries| entries.into_iter().collect()))
    }
}
