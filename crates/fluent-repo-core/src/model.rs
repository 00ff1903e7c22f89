// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Model traits implemented by `#[derive(Model)]`.
//!
//! A [`Model`] exposes its [`Shape`] and index-based field access. Entities
//! and DTOs are both models: the projection engine reads an entity through
//! [`Model::to_record`] and writes a DTO through [`Model::set_field`].

use crate::{
    error::{MappingError, MappingResult},
    kind::FieldType,
    mapping::MappingPolicy,
    shape::Shape,
    value::{Record, Value}
};

/// Type with a cached field descriptor table and dynamic field access.
///
/// Field indices follow [`Shape::fields`].
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug, Default, Model)]
/// #[model(table = "users")]
/// pub struct User {
///     #[model(primary_key)]
///     pub id: i64,
///     pub name: String,
/// }
/// ```
pub trait Model: Default + Sized + 'static {
    /// Field descriptor table, built once per type.
    fn shape() -> &'static Shape;

    /// Read the field at `index`. Out-of-range indices read as `Null`.
    fn field(&self, index: usize) -> Value;

    /// Write the field at `index` from a dynamic value.
    ///
    /// Returns `Ok(false)` when the value was not assigned: the index is out
    /// of range, the value is `Null`, or it is unconvertible under
    /// [`MappingPolicy::BestEffort`].
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] under [`MappingPolicy::Strict`] or when a
    /// nested record fails structurally.
    fn set_field(&mut self, index: usize, value: &Value, policy: MappingPolicy) -> MappingResult<bool>;

    /// Explicit identity value, overriding primary-key discovery.
    ///
    /// Generated from [`Identifiable`] when the type opts in.
    fn identity(&self) -> Option<Value> {
        None
    }

    /// Snapshot every field into a [`Record`].
    fn to_record(&self) -> Record {
        let shape = Self::shape();
        Record::new(shape, (0..shape.len()).map(|i| self.field(i)).collect())
    }

    /// Build an instance from a record of the same shape.
    ///
    /// Fields are assigned by position, starting from `Self::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::ShapeMismatch`] when the record does not
    /// belong to this type, and field errors under the given policy.
    fn from_record(record: &Record, policy: MappingPolicy) -> MappingResult<Self> {
        let shape = Self::shape();
        if record.shape().name() != shape.name() || !record.is_consistent() {
            return Err(MappingError::ShapeMismatch {
                shape:    shape.name(),
                expected: shape.len(),
                found:    record.values().len()
            });
        }
        let mut out = Self::default();
        for (index, (field, value)) in record.iter().enumerate() {
            out.set_field(index, value, policy)
                .map_err(|e| e.in_field(field.name()))?;
        }
        Ok(out)
    }
}

/// Explicit identity accessor.
///
/// With `#[model(identifiable)]` the derive forwards [`Model::identity`] to
/// this trait, so primary-key resolution reports field `"id"` with this
/// value without inspecting fields.
pub trait Identifiable {
    /// Identity type.
    type Id: FieldType;

    /// Identity value.
    fn id(&self) -> Self::Id;
}

/// Assign `value` into `slot` through [`FieldType::from_value`].
///
/// Used by generated `set_field` bodies.
///
/// # Errors
///
/// Propagates conversion errors.
pub fn assign<T: FieldType>(slot: &mut T, value: &Value, policy: MappingPolicy) -> MappingResult<bool> {
    match T::from_value(value, policy)? {
        Some(converted) => {
            *slot = converted;
            Ok(true)
        }
        None => Ok(false)
    }
}
