// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Column, association and table name resolution.
//!
//! # Column Priority
//!
//! | Priority | Source | Example |
//! |----------|--------|---------|
//! | 1 | `projection` tag | `#[model(projection = "u.name")]` |
//! | 2 | persistence `column` tag | `#[model(column = "login")]` |
//! | 3 | serialization name, first comma segment | `#[serde(rename = "userName")]` |
//! | 4 | derived name | `UserID` → `user_i_d` |
//!
//! Empty tags are ignored. A serialization tag marked as skip falls through
//! to the derived name.
//!
//! The derived name is letter-by-letter: an underscore is inserted before
//! every uppercase letter except the first character, then the whole string
//! is lower-cased. Acronyms are not treated as words.

use crate::shape::{FieldTags, SerializationTag};

/// Derive a column name from a declared field name.
///
/// # Example
///
/// ```rust
/// use fluent_repo_core::naming::derived_column_name;
///
/// assert_eq!(derived_column_name("UserID"), "user_i_d");
/// assert_eq!(derived_column_name("Name"), "name");
/// assert_eq!(derived_column_name("created_at"), "created_at");
/// ```
#[must_use]
pub fn derived_column_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if i > 0 && ch.is_ascii_uppercase() {
            out.push('_');
        }
        out.push(ch);
    }
    out.to_lowercase()
}

/// Resolve the storage column for a field from its tags.
///
/// Always succeeds; falls back to [`derived_column_name`].
#[must_use]
pub fn column_name(name: &str, tags: &FieldTags) -> String {
    if let Some(projection) = non_empty(tags.projection.as_deref()) {
        return projection.to_string();
    }
    if let Some(column) = non_empty(tags.column.as_deref()) {
        return column.to_string();
    }
    if let Some(SerializationTag::Name(serialized)) = &tags.serialization
        && let Some(first) = non_empty(serialized.split(',').next())
    {
        return first.to_string();
    }
    derived_column_name(name)
}

/// Resolve the association name used to preload a composite field.
///
/// The `preload` tag wins; otherwise the declared name is used verbatim.
#[must_use]
pub fn association_name(name: &str, tags: &FieldTags) -> String {
    non_empty(tags.preload.as_deref()).unwrap_or(name).to_string()
}

/// Default table name for a type: derived name plus `s`.
///
/// ```rust
/// use fluent_repo_core::naming::table_name;
///
/// assert_eq!(table_name("User"), "users");
/// assert_eq!(table_name("OrderItem"), "order_items");
/// ```
#[must_use]
pub fn table_name(type_name: &str) -> String {
    let mut table = derived_column_name(type_name);
    table.push('s');
    table
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
