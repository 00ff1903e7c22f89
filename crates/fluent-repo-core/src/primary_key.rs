// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Primary-key discovery.
//!
//! Resolution order:
//!
//! 1. [`Model::identity`] (the [`Identifiable`](crate::Identifiable)
//!    capability) reports field `"id"` with its value.
//! 2. Otherwise fields are scanned in declaration order; the first whose
//!    name equals `id` case-insensitively, or that carries the
//!    `primary_key` marker, wins.
//! 3. An embedded struct is searched before moving on to its next sibling,
//!    so keys inside embedded structs are found depth-first.

use crate::{
    model::Model,
    value::{Record, Value}
};

/// A resolved primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryKey {
    /// Declared field name.
    pub field:  String,
    /// Storage column of the field.
    pub column: String,
    /// Current value.
    pub value:  Value
}

/// Resolve the primary key of an entity.
///
/// Returns `None` when no field qualifies.
#[must_use]
pub fn resolve<T: Model>(entity: &T) -> Option<PrimaryKey> {
    if let Some(value) = entity.identity() {
        return Some(PrimaryKey {
            field: "id".into(),
            column: "id".into(),
            value
        });
    }
    resolve_record(&entity.to_record())
}

/// Resolve the primary key of a record by field inspection only.
#[must_use]
pub fn resolve_record(record: &Record) -> Option<PrimaryKey> {
    let path = resolve_path(record)?;
    let mut current = record;
    let mut descriptor = None;
    for (depth, index) in path.iter().enumerate() {
        descriptor = current.shape().fields().get(*index);
        if depth + 1 < path.len() {
            current = current.values().get(*index)?.as_record()?;
        }
    }
    let descriptor = descriptor?;
    Some(PrimaryKey {
        field:  descriptor.name().to_string(),
        column: descriptor.column_name().to_string(),
        value:  record.value_at(&path).clone()
    })
}

/// Index path to the primary-key field, through embedded records.
#[must_use]
pub fn resolve_path(record: &Record) -> Option<Vec<usize>> {
    for (index, (field, value)) in record.iter().enumerate() {
        if field.name().eq_ignore_ascii_case("id") || field.is_primary_key() {
            return Some(vec![index]);
        }
        if field.is_embedded()
            && let Value::Record(inner) = value
            && let Some(mut path) = resolve_path(inner)
        {
            path.insert(0, index);
            return Some(path);
        }
    }
    None
}

/// Storage column of `T`'s primary key, `"id"` when none is declared.
#[must_use]
pub fn primary_key_column<T: Model>() -> String {
    let probe = T::default();
    match probe.identity() {
        Some(_) => "id".to_string(),
        None => resolve_record(&probe.to_record()).map_or_else(|| "id".to_string(), |pk| pk.column)
    }
}
