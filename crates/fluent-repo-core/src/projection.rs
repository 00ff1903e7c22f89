// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Projection descriptors.
//!
//! [`ProjectionShape`] is what a DTO type asks of a query: the columns of
//! its basic fields and the associations behind its composite fields.
//! [`configure_for_projection`] applies it to a [`Query`]:
//!
//! | DTO has associations | Query gets |
//! |----------------------|------------|
//! | yes | one preload per association, no select |
//! | no | a single comma-joined select of the columns |
//!
//! Selecting a column subset together with preloads can drop the foreign
//! keys associations are loaded through, so the two are never combined.
//!
//! [`Projection`] is the explicit, table-aware variant built by hand with
//! [`ProjectionBuilder`] or derived from every field of an entity.

use crate::{model::Model, query::Query, shape::Shape};

/// Columns and associations requested by a DTO type.
///
/// Recomputed on every request from the DTO's cached [`Shape`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionShape {
    /// Columns of basic fields, in declaration order.
    pub columns:      Vec<String>,
    /// Associations of composite fields, in declaration order.
    pub associations: Vec<String>
}

impl ProjectionShape {
    /// Projection requested by DTO type `D`.
    #[must_use]
    pub fn of<D: Model>() -> Self {
        Self::from_shape(D::shape())
    }

    /// Projection requested by a shape.
    ///
    /// Pointer fields are classified by their pointee.
    #[must_use]
    pub fn from_shape(shape: &Shape) -> Self {
        let mut out = Self::default();
        for field in shape.fields() {
            if field.is_basic() {
                out.columns.push(field.column_name().to_string());
            } else {
                out.associations.push(field.association_name().to_string());
            }
        }
        out
    }

    /// Check if any composite field was found.
    #[must_use]
    pub fn has_associations(&self) -> bool {
        !self.associations.is_empty()
    }

    /// Comma-joined column list.
    #[must_use]
    pub fn select_clause(&self) -> String {
        self.columns.join(", ")
    }
}

/// Apply a projection to query state.
pub fn configure_for_projection(query: &mut Query, projection: &ProjectionShape) {
    if projection.has_associations() {
        for association in &projection.associations {
            query.add_preload(association.as_str());
        }
    } else if !projection.columns.is_empty() {
        query.select = vec![projection.select_clause()];
    }
}

/// Explicit projection over one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    table:  String,
    fields: Vec<String>
}

impl Projection {
    /// Start building a projection over `table`.
    pub fn builder(table: impl Into<String>) -> ProjectionBuilder {
        ProjectionBuilder {
            table:  table.into(),
            fields: Vec::new()
        }
    }

    /// Every stored field of entity `T`, basic or not, in declaration order.
    #[must_use]
    pub fn of_entity<T: Model>() -> Self {
        let shape = T::shape();
        Self {
            table:  shape.table().to_string(),
            fields: shape
                .fields()
                .iter()
                .map(|f| f.column_name().to_string())
                .collect()
        }
    }

    /// Columns of DTO `D` read from the table of entity `T`.
    #[must_use]
    pub fn of_dto<T: Model, D: Model>() -> Self {
        Self {
            table:  T::shape().table().to_string(),
            fields: D::shape()
                .fields()
                .iter()
                .map(|f| f.column_name().to_string())
                .collect()
        }
    }

    /// Table the projection reads.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Select expressions.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Replace the query's select list with these fields.
    pub fn apply(&self, query: &mut Query) {
        query.select.clone_from(&self.fields);
    }
}

/// Builder for [`Projection`].
#[derive(Debug, Clone)]
pub struct ProjectionBuilder {
    table:  String,
    fields: Vec<String>
}

impl ProjectionBuilder {
    /// Add one field.
    #[must_use]
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Add several fields.
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Add a field under an alias: `field AS alias`.
    #[must_use]
    pub fn field_as(mut self, field: &str, alias: &str) -> Self {
        self.fields.push(format!("{field} AS {alias}"));
        self
    }

    /// Finish the projection.
    #[must_use]
    pub fn build(self) -> Projection {
        Projection {
            table:  self.table,
            fields: self.fields
        }
    }
}

#[cfg(test)]
mod tests {
    use fluent_repo_derive::Model;

    use super::*;

    #[derive(Debug, Default, Model)]
    pub struct Author {
        pub name: String
    }

    #[allow(non_snake_case)]
    #[derive(Debug, Default, Model)]
    pub struct Flat {
        pub id:       i64,
        #[model(column = "full_name")]
        pub name:     String,
        #[model(projection = "u.email")]
        pub email:    String,
        pub nickname: Option<String>,
        pub UserID:   u64
    }

    #[derive(Debug, Default, Model)]
    pub struct Nested {
        pub title:  String,
        pub author: Option<Author>,
        #[model(preload = "Comments.Author")]
        pub notes:  Vec<Author>,
        pub score:  f32
    }

    #[test]
    fn basic_only_dto_selects_columns_in_order() {
        let projection = ProjectionShape::of::<Flat>();
        assert!(!projection.has_associations());
        assert_eq!(projection.columns, [
            "id",
            "full_name",
            "u.email",
            "nickname",
            "user_i_d"
        ]);
    }

    #[test]
    fn composite_fields_become_associations() {
        let projection = ProjectionShape::of::<Nested>();
        assert_eq!(projection.associations, ["author", "Comments.Author"]);
        assert_eq!(projection.columns, ["title", "score"]);
    }

    #[test]
    fn configure_selects_without_associations() {
        let mut query = Query::new();
        configure_for_projection(&mut query, &ProjectionShape::of::<Flat>());
        assert_eq!(query.select, ["id, full_name, u.email, nickname, user_i_d"]);
        assert!(query.preloads.is_empty());
    }

    #[test]
    fn configure_preloads_and_skips_select() {
        let mut query = Query::new();
        configure_for_projection(&mut query, &ProjectionShape::of::<Nested>());
        assert!(query.select.is_empty());
        assert_eq!(query.preloads, ["author", "Comments.Author"]);
    }

    #[test]
    fn builder_with_alias() {
        let projection = Projection::builder("users")
            .field("id")
            .fields(["name", "email"])
            .field_as("created_at", "joined")
            .build();
        assert_eq!(projection.table(), "users");
        assert_eq!(projection.fields(), ["id", "name", "email", "created_at AS joined"]);

        let mut query = Query::new();
        projection.apply(&mut query);
        assert_eq!(query.select.len(), 4);
    }

    #[test]
    fn entity_projection_lists_every_field() {
        let projection = Projection::of_entity::<Nested>();
        assert_eq!(projection.table(), "nesteds");
        assert_eq!(projection.fields(), ["title", "author", "notes", "score"]);
    }
}
