// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Dynamic field values.
//!
//! Engines and the projection engine never see concrete entity or DTO types.
//! They exchange [`Value`]s: scalars, lists, maps, and [`Record`]s, where a
//! record pairs a type's [`Shape`] with its field values in declaration
//! order.
//!
//! # Kinds
//!
//! | Variant | Produced by |
//! |---------|-------------|
//! | `Null` | `None`, un-preloaded associations, non-selected columns |
//! | `Bool` | `bool` |
//! | `Int` | `i8` .. `i64`, `isize` |
//! | `UInt` | `u8` .. `u64`, `usize` |
//! | `Float` | `f32`, `f64` |
//! | `String` | `String` |
//! | `Record` | `#[derive(Model)]` structs |
//! | `List` | `Vec<T>` |
//! | `Map` | `BTreeMap<String, T>`, `HashMap<String, T>` |

use std::{cmp::Ordering, collections::BTreeMap, fmt, ptr};

use crate::shape::{FieldDescriptor, Shape};

/// A dynamically typed field value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value (nil pointer, missing association).
    #[default]
    Null,

    /// Boolean.
    Bool(bool),

    /// Signed integer of any width.
    Int(i64),

    /// Unsigned integer of any width.
    UInt(u64),

    /// Floating point number of any width.
    Float(f64),

    /// UTF-8 string.
    String(String),

    /// Struct value.
    Record(Record),

    /// Slice value.
    List(Vec<Value>),

    /// String-keyed map value.
    Map(BTreeMap<String, Value>)
}

impl Value {
    /// Check if this is [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short kind name for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Record(_) => "record",
            Self::List(_) => "list",
            Self::Map(_) => "map"
        }
    }

    /// Check if the value equals the zero value of its kind.
    ///
    /// Records are zero when every field is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !b,
            Self::Int(i) => *i == 0,
            Self::UInt(u) => *u == 0,
            Self::Float(f) => *f == 0.0,
            Self::String(s) => s.is_empty(),
            Self::Record(r) => r.values().iter().all(Self::is_zero),
            Self::List(items) => items.is_empty(),
            Self::Map(entries) => entries.is_empty()
        }
    }

    /// Borrow the record if this is a struct value.
    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None
        }
    }

    /// Borrow the string if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None
        }
    }

    /// Read an integer value as `i64`.
    ///
    /// Unsigned values above `i64::MAX` yield `None`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::UInt(u) => i64::try_from(*u).ok(),
            _ => None
        }
    }

    /// Compare two values of compatible kinds.
    ///
    /// Integers, unsigned integers and floats compare numerically across
    /// variants. Strings and booleans compare within their kind. Two nulls
    /// are equal. Everything else is incomparable.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Null, Self::Null) => Some(Ordering::Equal),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::UInt(a), Self::UInt(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::UInt(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
            (Self::UInt(a), Self::Int(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y),
                _ => None
            }
        }
    }

    /// Loose equality used by engines: numeric kinds compare by value.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Equal) || self == other
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::UInt(u) => Some(*u as f64),
            Self::Float(f) => Some(*f),
            _ => None
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "'{s}'"),
            Self::Record(r) => write!(f, "{}{{..}}", r.shape().name()),
            Self::List(items) => write!(f, "[{} items]", items.len()),
            Self::Map(entries) => write!(f, "{{{} entries}}", entries.len())
        }
    }
}

macro_rules! value_from {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Value {
                fn from(v: $source) -> Self {
                    Self::$variant(v as $target)
                }
            }
        )*
    };
}

value_from!(Int as i64: i8, i16, i32, i64, isize);
value_from!(UInt as u64: u8, u16, u32, u64, usize);
value_from!(Float as f64: f32, f64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Record(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

/// A struct value: a shape plus one value per declared field.
#[derive(Clone)]
pub struct Record {
    shape:  &'static Shape,
    values: Vec<Value>
}

impl Record {
    /// Create a record from a shape and its values in declaration order.
    #[must_use]
    pub const fn new(shape: &'static Shape, values: Vec<Value>) -> Self {
        Self {
            shape,
            values
        }
    }

    /// The shape describing this record's fields.
    #[must_use]
    pub const fn shape(&self) -> &'static Shape {
        self.shape
    }

    /// Field values in declaration order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Mutable field values in declaration order.
    pub fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }

    /// Consume the record and return its values.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Check that the value count matches the shape.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.values.len() == self.shape.len()
    }

    /// Iterate descriptors alongside values.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldDescriptor, &Value)> {
        self.shape.fields().iter().zip(self.values.iter())
    }

    /// Value of a declared field, by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.shape.index_of(name).and_then(|i| self.values.get(i))
    }

    /// Value of a declared field, falling back to fields promoted from
    /// embedded records (depth-first, declaration order).
    #[must_use]
    pub fn get_promoted(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.get(name) {
            return Some(value);
        }
        self.iter()
            .filter(|(field, _)| field.is_embedded())
            .filter_map(|(_, value)| value.as_record())
            .find_map(|inner| inner.get_promoted(name))
    }

    /// Value addressed by a storage column, looking through embedded records.
    ///
    /// The declared field name is accepted as an alias for its column.
    #[must_use]
    pub fn lookup_column(&self, column: &str) -> Option<&Value> {
        self.position_of_column(column).map(|path| self.value_at(&path))
    }

    /// Replace the value addressed by a storage column.
    ///
    /// Returns `false` when no field answers to the column.
    pub fn set_column(&mut self, column: &str, value: Value) -> bool {
        match self.position_of_column(column) {
            Some(path) => self.set_at(&path, value),
            None => false
        }
    }

    /// Replace the value at a field index.
    ///
    /// Returns `false` when the index is out of range.
    pub fn set(&mut self, index: usize, value: Value) -> bool {
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false
        }
    }

    /// Value at a path of field indices through embedded records.
    ///
    /// Returns [`Value::Null`] for paths that leave the record.
    #[must_use]
    pub fn value_at(&self, path: &[usize]) -> &Value {
        const NULL: &Value = &Value::Null;
        let Some((first, rest)) = path.split_first() else {
            return NULL;
        };
        match (self.values.get(*first), rest.is_empty()) {
            (Some(value), true) => value,
            (Some(Value::Record(inner)), false) => inner.value_at(rest),
            _ => NULL
        }
    }

    /// Replace the value at a path of field indices.
    pub fn set_at(&mut self, path: &[usize], value: Value) -> bool {
        let Some((first, rest)) = path.split_first() else {
            return false;
        };
        if rest.is_empty() {
            return self.set(*first, value);
        }
        match self.values.get_mut(*first) {
            Some(Value::Record(inner)) => inner.set_at(rest, value),
            _ => false
        }
    }

    fn position_of_column(&self, column: &str) -> Option<Vec<usize>> {
        for (index, (field, value)) in self.iter().enumerate() {
            if field.is_embedded()
                && let Value::Record(inner) = value
            {
                if let Some(mut path) = inner.position_of_column(column) {
                    path.insert(0, index);
                    return Some(path);
                }
                continue;
            }
            if field.column_name() == column || field.name() == column {
                return Some(vec![index]);
            }
        }
        None
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        (ptr::eq(self.shape, other.shape) || self.shape.name() == other.shape.name())
            && self.values == other.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(self.shape.name());
        for (field, value) in self.iter() {
            out.field(field.name(), value);
        }
        out.finish()
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::ser::{Serialize, SerializeMap, Serializer};

    use super::{Record, Value};

    impl Serialize for Value {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Null => serializer.serialize_none(),
                Self::Bool(b) => serializer.serialize_bool(*b),
                Self::Int(i) => serializer.serialize_i64(*i),
                Self::UInt(u) => serializer.serialize_u64(*u),
                Self::Float(f) => serializer.serialize_f64(*f),
                Self::String(s) => serializer.serialize_str(s),
                Self::Record(r) => r.serialize(serializer),
                Self::List(items) => serializer.collect_seq(items),
                Self::Map(entries) => serializer.collect_map(entries)
            }
        }
    }

    impl Serialize for Record {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.values().len()))?;
            for (field, value) in self.iter() {
                map.serialize_entry(field.name(), value)?;
            }
            map.end()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use super::*;
    use crate::kind::TypeKind;

    fn base_shape() -> &'static Shape {
        static SHAPE: OnceLock<Shape> = OnceLock::new();
        SHAPE.get_or_init(|| {
            Shape::builder("Base")
                .field(FieldDescriptor::new("id", TypeKind::I64))
                .build()
        })
    }

    fn user_shape() -> &'static Shape {
        static SHAPE: OnceLock<Shape> = OnceLock::new();
        SHAPE.get_or_init(|| {
            Shape::builder("User")
                .field(FieldDescriptor::new("base", TypeKind::Struct).embedded())
                .field(FieldDescriptor::new("UserName", TypeKind::String).with_column("login"))
                .build()
        })
    }

    fn user_record() -> Record {
        let base = Record::new(base_shape(), vec![Value::Int(7)]);
        Record::new(user_shape(), vec![Value::Record(base), Value::from("ana")])
    }

    #[test]
    fn numeric_compare_crosses_variants() {
        assert_eq!(Value::Int(3).compare(&Value::UInt(3)), Some(Ordering::Equal));
        assert_eq!(Value::Int(-1).compare(&Value::UInt(0)), Some(Ordering::Less));
        assert_eq!(Value::Float(2.5).compare(&Value::Int(2)), Some(Ordering::Greater));
        assert!(Value::UInt(9).matches(&Value::Float(9.0)));
    }

    #[test]
    fn incomparable_kinds() {
        assert_eq!(Value::from("1").compare(&Value::Int(1)), None);
        assert_eq!(Value::Bool(true).compare(&Value::Int(1)), None);
        assert!(!Value::from("1").matches(&Value::Int(1)));
    }

    #[test]
    fn zero_values() {
        assert!(Value::Null.is_zero());
        assert!(Value::Int(0).is_zero());
        assert!(Value::from("").is_zero());
        assert!(!Value::from("x").is_zero());
        assert!(Value::List(vec![]).is_zero());
    }

    #[test]
    fn from_option_and_vec() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(4u8)), Value::UInt(4));
        assert_eq!(
            Value::from(vec![1i32, 2]),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn promoted_lookup_descends_into_embedded() {
        let record = user_record();
        assert_eq!(record.get("id"), None);
        assert_eq!(record.get_promoted("id"), Some(&Value::Int(7)));
    }

    #[test]
    fn column_lookup_and_update() {
        let mut record = user_record();
        assert_eq!(record.lookup_column("login"), Some(&Value::from("ana")));
        assert_eq!(record.lookup_column("UserName"), Some(&Value::from("ana")));
        assert_eq!(record.lookup_column("id"), Some(&Value::Int(7)));
        assert!(record.set_column("id", Value::Int(8)));
        assert_eq!(record.value_at(&[0, 0]), &Value::Int(8));
        assert!(!record.set_column("missing", Value::Null));
    }

    #[test]
    fn record_consistency() {
        assert!(user_record().is_consistent());
        assert!(!Record::new(user_shape(), vec![]).is_consistent());
    }

    #[test]
    fn record_debug_uses_field_names() {
        let rendered = format!("{:?}", user_record());
        assert!(rendered.starts_with("User"));
        assert!(rendered.contains("UserName"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn records_serialize_by_field_name() {
        let json = serde_json::to_value(user_record()).unwrap();
        assert_eq!(json, serde_json::json!({"base": {"id": 7}, "UserName": "ana"}));
        assert_eq!(serde_json::to_value(Value::Null).unwrap(), serde_json::Value::Null);
    }
}
