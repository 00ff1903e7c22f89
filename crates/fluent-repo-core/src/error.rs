// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error types for projection and repository operations.
//!
//! # Overview
//!
//! - [`MappingError`] — Failures while building a DTO from an entity
//! - [`RepositoryError`] — Everything a repository terminal call can store
//!
//! Engine failures are kept verbatim behind an [`Arc`] so the repository's
//! error slot can be cloned out and read any number of times.
//!
//! A destination that is not addressable cannot be expressed here: mapping
//! always builds an owned `D::default()` and fills it in place.

use std::{error::Error as StdError, sync::Arc};

use thiserror::Error;

use crate::transaction::TransactionError;

/// Result type for projection operations.
pub type MappingResult<T> = Result<T, MappingError>;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Structural mapping failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Source entity was absent.
    #[error("entity cannot be nil")]
    NilEntity,

    /// Source entity slice was absent.
    #[error("entity slice cannot be nil")]
    NilSlice,

    /// A record's value count disagrees with its shape.
    #[error("record for {shape} has {found} values, shape declares {expected}")]
    ShapeMismatch {
        /// Shape name.
        shape:    &'static str,
        /// Fields declared by the shape.
        expected: usize,
        /// Values present in the record.
        found:    usize
    },

    /// Value kind cannot be converted to the destination kind.
    ///
    /// Only produced under [`MappingPolicy::Strict`](crate::MappingPolicy).
    #[error("cannot convert {found} value into {expected}")]
    Unconvertible {
        /// Destination kind name.
        expected: String,
        /// Source value kind name.
        found:    &'static str
    },

    /// Failure while mapping one field.
    #[error("error mapping field {field}: {source}")]
    Field {
        /// Destination field name.
        field:  String,
        /// Underlying failure.
        source: Box<MappingError>
    },

    /// Failure while mapping one slice element.
    #[error("error converting element {index}: {source}")]
    Element {
        /// Element position in the source slice.
        index:  usize,
        /// Underlying failure.
        source: Box<MappingError>
    }
}

impl MappingError {
    /// Wrap this error with the destination field that failed.
    #[must_use]
    pub fn in_field(self, field: impl Into<String>) -> Self {
        Self::Field {
            field:  field.into(),
            source: Box::new(self)
        }
    }

    /// Wrap this error with the slice index that failed.
    #[must_use]
    pub fn at_index(self, index: usize) -> Self {
        Self::Element {
            index,
            source: Box::new(self)
        }
    }
}

/// Error stored by a repository operation.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// No row matched a single-result read.
    #[error("record not found")]
    NotFound,

    /// No primary key could be resolved on the entity.
    #[error("primary key not found in {entity}")]
    PrimaryKeyNotFound {
        /// Entity type name.
        entity: &'static str
    },

    /// Projection requested before any result was stored.
    #[error("no result available - execute a query first")]
    NoResult,

    /// Projection failed.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// The underlying engine reported a failure.
    #[error("execution failed: {0}")]
    Execution(Arc<dyn StdError + Send + Sync>),

    /// Transaction begin, commit or rollback failed.
    #[error("{0}")]
    Transaction(Arc<dyn StdError + Send + Sync>)
}

impl RepositoryError {
    /// Wrap an engine error.
    pub fn execution<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static
    {
        Self::Execution(Arc::new(error))
    }

    /// Check if this is [`RepositoryError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Check if this is an engine failure.
    #[must_use]
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Downcast an engine failure to its concrete type.
    #[must_use]
    pub fn execution_source<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Self::Execution(inner) | Self::Transaction(inner) => inner.downcast_ref::<E>(),
            _ => None
        }
    }
}

impl<E> From<TransactionError<E>> for RepositoryError
where
    E: StdError + Send + Sync + 'static
{
    fn from(error: TransactionError<E>) -> Self {
        Self::Transaction(Arc::new(error))
    }
}
