// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fluent_repo_core::prelude::*;
//! ```

#[cfg(feature = "memory")]
pub use crate::memory::{Cancellation, MemoryConnection, MemoryError};
pub use crate::{
    Condition, Connection, FieldType, Identifiable, MappingError, MappingPolicy, Model, OrderBy,
    Pagination, Projection, ProjectionShape, Query, Record, Repository, RepositoryError,
    RepositoryResult, SortDirection, TransactionError, TransactionOps, Value,
    mapping::{map_entity_slice_to_dto_slice, map_entity_to_dto},
    transaction::run_in_transaction
};
