// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field descriptor tables.
//!
//! A [`Shape`] lists the exported fields of one type, in declaration order,
//! with everything the projection engine needs to know about each field:
//! its kind, its typed tags, and the resolved column and association names.
//! Names are resolved once when a descriptor is built, never per mapping
//! call.
//!
//! `#[derive(Model)]` generates a shape per type and caches it in a
//! `OnceLock`. Hand-written models build one the same way:
//!
//! ```rust
//! use std::sync::OnceLock;
//!
//! use fluent_repo_core::{FieldDescriptor, Shape, TypeKind};
//!
//! fn shape() -> &'static Shape {
//!     static SHAPE: OnceLock<Shape> = OnceLock::new();
//!     SHAPE.get_or_init(|| {
//!         Shape::builder("User")
//!             .table("accounts")
//!             .field(FieldDescriptor::new("ID", TypeKind::I64).primary_key())
//!             .field(FieldDescriptor::new("UserName", TypeKind::String).with_column("login"))
//!             .build()
//!     })
//! }
//!
//! assert_eq!(shape().field("UserName").map(|f| f.column_name()), Some("login"));
//! assert_eq!(shape().table(), "accounts");
//! ```

use crate::{kind::TypeKind, naming};

/// Serialization metadata used as a naming fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializationTag {
    /// Serialized name; only the first comma-delimited segment is used.
    Name(String),

    /// Field is skipped by serialization.
    Skip
}

/// Typed per-field metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTags {
    /// Explicit projection column override.
    pub projection:    Option<String>,
    /// Persistence column name.
    pub column:        Option<String>,
    /// Persistence primary-key marker.
    pub primary_key:   bool,
    /// Serialization name or skip marker.
    pub serialization: Option<SerializationTag>,
    /// Association name override.
    pub preload:       Option<String>
}

/// Descriptor of one exported field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name:        &'static str,
    kind:        TypeKind,
    tags:        FieldTags,
    embedded:    bool,
    column:      String,
    association: String
}

impl FieldDescriptor {
    /// Create a descriptor with no tags.
    #[must_use]
    pub fn new(name: &'static str, kind: TypeKind) -> Self {
        Self::with_tags(name, kind, FieldTags::default())
    }

    /// Create a descriptor from a complete tag set.
    #[must_use]
    pub fn with_tags(name: &'static str, kind: TypeKind, tags: FieldTags) -> Self {
        let column = naming::column_name(name, &tags);
        let association = naming::association_name(name, &tags);
        Self {
            name,
            kind,
            tags,
            embedded: false,
            column,
            association
        }
    }

    /// Set the persistence column name.
    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.tags.column = Some(column.into());
        self.resolve()
    }

    /// Set the projection column override.
    #[must_use]
    pub fn with_projection(mut self, projection: impl Into<String>) -> Self {
        self.tags.projection = Some(projection.into());
        self.resolve()
    }

    /// Set the association name used for preloading.
    #[must_use]
    pub fn with_preload(mut self, association: impl Into<String>) -> Self {
        self.tags.preload = Some(association.into());
        self.resolve()
    }

    /// Set the serialized name.
    #[must_use]
    pub fn with_serialization(mut self, name: impl Into<String>) -> Self {
        self.tags.serialization = Some(SerializationTag::Name(name.into()));
        self.resolve()
    }

    /// Mark the field as skipped by serialization.
    #[must_use]
    pub fn skip_serialization(mut self) -> Self {
        self.tags.serialization = Some(SerializationTag::Skip);
        self.resolve()
    }

    /// Mark the field as the persistence primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.tags.primary_key = true;
        self
    }

    /// Mark the field as an embedded struct whose fields are promoted.
    #[must_use]
    pub const fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    fn resolve(mut self) -> Self {
        self.column = naming::column_name(self.name, &self.tags);
        self.association = naming::association_name(self.name, &self.tags);
        self
    }

    /// Declared field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Field kind.
    #[must_use]
    pub const fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Field tags.
    #[must_use]
    pub const fn tags(&self) -> &FieldTags {
        &self.tags
    }

    /// Check the persistence primary-key marker.
    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.tags.primary_key
    }

    /// Check if the field is an embedded struct.
    #[must_use]
    pub const fn is_embedded(&self) -> bool {
        self.embedded
    }

    /// Resolved storage column.
    #[must_use]
    pub fn column_name(&self) -> &str {
        &self.column
    }

    /// Resolved association name.
    #[must_use]
    pub fn association_name(&self) -> &str {
        &self.association
    }

    /// Check if the field's kind is basic once pointers are stripped.
    #[must_use]
    pub fn is_basic(&self) -> bool {
        self.kind.pointee().is_basic()
    }

    /// Check if the field's kind is composite once pointers are stripped.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        !self.is_basic()
    }
}

/// Field descriptor table of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    name:   &'static str,
    table:  String,
    fields: Vec<FieldDescriptor>
}

impl Shape {
    /// Start building a shape for the named type.
    #[must_use]
    pub const fn builder(name: &'static str) -> ShapeBuilder {
        ShapeBuilder {
            name,
            table: None,
            fields: Vec::new()
        }
    }

    /// Type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Storage table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Descriptors in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Descriptor by declared name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Index of a field by declared name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Index of the first field whose resolved column matches.
    #[must_use]
    pub fn index_of_column(&self, column: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.column == column)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the shape has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`Shape`].
#[derive(Debug, Clone)]
pub struct ShapeBuilder {
    name:   &'static str,
    table:  Option<String>,
    fields: Vec<FieldDescriptor>
}

impl ShapeBuilder {
    /// Set the storage table. Defaults to [`naming::table_name`].
    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Append a field descriptor.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Finish the shape.
    #[must_use]
    pub fn build(self) -> Shape {
        Shape {
            name:   self.name,
            table:  self.table.unwrap_or_else(|| naming::table_name(self.name)),
            fields: self.fields
        }
    }
}
