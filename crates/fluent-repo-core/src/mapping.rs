// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity-to-DTO mapping.
//!
//! A DTO is built from `D::default()` and each of its fields is looked up
//! on the source record:
//!
//! 1. By exact declared name, including fields promoted from embedded
//!    structs.
//! 2. Otherwise by resolved column name against the source's own fields.
//!
//! The matched value is converted through [`FieldType`](crate::FieldType).
//! Struct values recurse with the same two-step matching, `None` pointers
//! leave the destination untouched, and slices map element by element.
//!
//! # Policies
//!
//! | Policy | Unconvertible field |
//! |--------|---------------------|
//! | [`MappingPolicy::BestEffort`] | Left at its zero value |
//! | [`MappingPolicy::Strict`] | [`MappingError::Unconvertible`] wrapped with the field name |

use tracing::trace;

use crate::{
    error::{MappingError, MappingResult},
    model::Model,
    shape::FieldDescriptor,
    value::{Record, Value}
};

/// How mapping treats values that do not convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingPolicy {
    /// Skip unconvertible fields silently, leaving zero values.
    #[default]
    BestEffort,

    /// Fail on the first unconvertible field.
    Strict
}

/// Build a `D` from a record of any shape.
///
/// # Errors
///
/// Returns [`MappingError::ShapeMismatch`] for an inconsistent record, and
/// field-wrapped errors from nested mapping or strict conversion.
pub fn map_record<D: Model>(source: &Record, policy: MappingPolicy) -> MappingResult<D> {
    if !source.is_consistent() {
        return Err(MappingError::ShapeMismatch {
            shape:    source.shape().name(),
            expected: source.shape().len(),
            found:    source.values().len()
        });
    }

    let mut out = D::default();
    for (index, field) in D::shape().fields().iter().enumerate() {
        let Some(value) = find_source(source, field) else {
            continue;
        };
        let assigned = out
            .set_field(index, value, policy)
            .map_err(|e| e.in_field(field.name()))?;
        if !assigned && !value.is_null() {
            trace!(
                source = source.shape().name(),
                target = D::shape().name(),
                field = field.name(),
                found = value.kind_name(),
                "skipping unconvertible field"
            );
        }
    }
    Ok(out)
}

fn find_source<'a>(source: &'a Record, field: &FieldDescriptor) -> Option<&'a Value> {
    source.get_promoted(field.name()).or_else(|| {
        source
            .iter()
            .find(|(candidate, _)| candidate.column_name() == field.column_name())
            .map(|(_, value)| value)
    })
}

/// Map one entity to a freshly built DTO.
///
/// # Errors
///
/// Returns [`MappingError::NilEntity`] for `None`, and any error from
/// [`map_record`].
pub fn map_entity_to_dto<E: Model, D: Model>(entity: Option<&E>, policy: MappingPolicy) -> MappingResult<D> {
    let entity = entity.ok_or(MappingError::NilEntity)?;
    map_record(&entity.to_record(), policy)
}

/// Map entities element-wise, preserving length and order.
///
/// An empty input yields an empty `Vec<D>`.
///
/// # Errors
///
/// The first failing element aborts the whole operation with its index.
pub fn map_entity_slice_to_dto_slice<E: Model, D: Model>(
    entities: &[E],
    policy: MappingPolicy
) -> MappingResult<Vec<D>> {
    entities
        .iter()
        .enumerate()
        .map(|(index, entity)| {
            map_record(&entity.to_record(), policy).map_err(|e| e.at_index(index))
        })
        .collect()
}
