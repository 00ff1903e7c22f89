// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Core traits and types for fluent-repo.
//!
//! This crate provides the runtime used by `#[derive(Model)]` generated code.
//! It can also be used standalone: every type the derive macro produces can
//! be written by hand through [`ShapeBuilder`] and a manual [`Model`] impl.
//!
//! # Overview
//!
//! - [`Value`] / [`Record`] — Dynamic field values exchanged with engines
//! - [`TypeKind`] / [`FieldType`] — Basic vs composite classification
//! - [`Shape`] / [`FieldDescriptor`] — Per-type field descriptor table
//! - [`naming`] — Column and association name resolution
//! - [`primary_key`] — Primary key discovery
//! - [`ProjectionShape`] / [`mapping`] — Entity-to-DTO projection engine
//! - [`Repository`] — Fluent query repository over a [`Connection`]
//! - [`memory`] — In-memory reference engine
//!
//! # Usage
//!
//! ```rust,ignore
//! use fluent_repo_core::prelude::*;
//!
//! let dtos: Vec<UserSummary> = Repository::<User, _>::new(conn)
//!     .filter(Condition::eq("active", true))
//!     .paginate(1, 20)
//!     .project_to::<UserSummary>()
//!     .all()
//!     .project_slice()?;
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

extern crate self as fluent_repo_core;

pub mod connection;
pub mod error;
pub mod kind;
pub mod mapping;
#[cfg(feature = "memory")]
#[cfg_attr(docsrs, doc(cfg(feature = "memory")))]
pub mod memory;
pub mod model;
pub mod naming;
pub mod prelude;
pub mod primary_key;
pub mod projection;
pub mod query;
pub mod repository;
pub mod shape;
pub mod transaction;
pub mod value;

pub use connection::Connection;
pub use error::{MappingError, MappingResult, RepositoryError, RepositoryResult};
pub use kind::{FieldType, TypeKind, is_basic};
pub use mapping::MappingPolicy;
pub use model::{Identifiable, Model};
pub use primary_key::PrimaryKey;
pub use projection::{Projection, ProjectionBuilder, ProjectionShape};
pub use query::{Clause, Condition, Conjunction, OrderBy, Query};
pub use repository::Repository;
pub use shape::{FieldDescriptor, FieldTags, SerializationTag, Shape, ShapeBuilder};
pub use transaction::{TransactionError, TransactionOps};
pub use value::{Record, Value};

/// Pagination parameters for list operations.
///
/// Used by [`Repository::paginate`] to translate a page request into
/// `offset`/`limit` query state.
///
/// # Example
///
/// ```rust
/// use fluent_repo_core::Pagination;
///
/// let page = Pagination::new(10, 0); // First 10 items
/// let next = Pagination::new(10, 10); // Next 10 items
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Maximum number of results to return.
    pub limit: i64,

    /// Number of results to skip.
    pub offset: i64
}

impl Pagination {
    /// Create new pagination parameters.
    ///
    /// # Arguments
    ///
    /// * `limit` — Maximum results to return
    /// * `offset` — Number of results to skip
    pub const fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit,
            offset
        }
    }

    /// Create pagination for a specific page.
    ///
    /// Pages are 1-based. A page of zero or below produces a negative offset,
    /// which is handed to the engine unchanged.
    ///
    /// # Arguments
    ///
    /// * `page` — Page number (1-indexed)
    /// * `per_page` — Items per page
    ///
    /// # Example
    ///
    /// ```rust
    /// use fluent_repo_core::Pagination;
    ///
    /// let first = Pagination::page(1, 20); // offset=0, limit=20
    /// let second = Pagination::page(2, 20); // offset=20, limit=20
    /// assert_eq!(second.offset, 20);
    /// ```
    pub const fn page(page: i64, per_page: i64) -> Self {
        Self {
            limit:  per_page,
            offset: (page - 1) * per_page
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit:  100,
            offset: 0
        }
    }
}

/// Sort direction for ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9, oldest first).
    #[default]
    Asc,

    /// Descending order (Z-A, 9-0, newest first).
    Desc
}

impl SortDirection {
    /// Convert to SQL keyword.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC"
        }
    }

    /// Parse a direction keyword, case-insensitively.
    ///
    /// Returns `None` for anything other than `asc` or `desc`.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        if keyword.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if keyword.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}
