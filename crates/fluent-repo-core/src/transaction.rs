// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Transaction support.
//!
//! A transaction is begun on a [`Connection`], hands out a connection bound
//! to itself, and is finished with exactly one of [`TransactionOps::commit`]
//! or [`TransactionOps::rollback`]. [`run_in_transaction`] wraps the whole
//! cycle: the closure's `Ok` commits, its `Err` rolls back.
//!
//! # Example
//!
//! ```rust,ignore
//! use fluent_repo::prelude::*;
//!
//! let id = run_in_transaction(&conn, |tx| -> RepositoryResult<i64> {
//!     let user = User { name: "ana".into(), ..Default::default() };
//!     let user = Repository::<User, _>::new(tx).create(user).into_result()?;
//!     Ok(user.id)
//! })?;
//! ```

use std::error::Error as StdError;

use thiserror::Error;
use tracing::{debug, warn};

use crate::connection::Connection;

/// Error type for transaction operations.
///
/// Wraps engine errors with the phase that failed.
#[derive(Debug, Error)]
pub enum TransactionError<E> {
    /// Failed to begin transaction.
    #[error("failed to begin transaction: {0}")]
    Begin(#[source] E),

    /// Failed to commit transaction.
    #[error("failed to commit transaction: {0}")]
    Commit(#[source] E),

    /// Failed to rollback transaction.
    #[error("failed to rollback transaction: {0}")]
    Rollback(#[source] E),

    /// Operation within transaction failed.
    #[error("transaction operation failed: {0}")]
    Operation(#[source] E)
}

impl<E> TransactionError<E> {
    /// Check if this is a begin error.
    pub const fn is_begin(&self) -> bool {
        matches!(self, Self::Begin(_))
    }

    /// Check if this is a commit error.
    pub const fn is_commit(&self) -> bool {
        matches!(self, Self::Commit(_))
    }

    /// Check if this is a rollback error.
    pub const fn is_rollback(&self) -> bool {
        matches!(self, Self::Rollback(_))
    }

    /// Check if this is an operation error.
    pub const fn is_operation(&self) -> bool {
        matches!(self, Self::Operation(_))
    }

    /// Get the inner error.
    pub fn into_inner(self) -> E {
        match self {
            Self::Begin(e) | Self::Commit(e) | Self::Rollback(e) | Self::Operation(e) => e
        }
    }
}

/// An open transaction.
pub trait TransactionOps: Sized + Send {
    /// Connection type bound to this transaction.
    type Connection;

    /// Error type.
    type Error: StdError + Send + Sync + 'static;

    /// Connection whose operations run inside this transaction.
    fn connection(&self) -> Self::Connection;

    /// Commit the transaction.
    ///
    /// # Errors
    ///
    /// Returns the engine error when the commit fails.
    fn commit(self) -> Result<(), Self::Error>;

    /// Rollback the transaction.
    ///
    /// # Errors
    ///
    /// Returns the engine error when the rollback fails.
    fn rollback(self) -> Result<(), Self::Error>;
}

/// Run `f` inside a transaction on `conn`.
///
/// Commits iff `f` returns `Ok`. When `f` fails and the rollback fails too,
/// the rollback error is returned and the operation error is logged.
///
/// # Errors
///
/// Begin, commit and rollback failures convert into `E` through
/// [`TransactionError`]; errors from `f` are returned unchanged.
pub fn run_in_transaction<C, F, R, E>(conn: &C, f: F) -> Result<R, E>
where
    C: Connection,
    F: FnOnce(C) -> Result<R, E>,
    E: From<TransactionError<C::Error>>
{
    let tx = conn.begin().map_err(TransactionError::Begin)?;
    debug!("transaction started");
    match f(tx.connection()) {
        Ok(value) => {
            tx.commit().map_err(TransactionError::Commit)?;
            debug!("transaction committed");
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback) = tx.rollback() {
                warn!(error = %rollback, "rollback failed after operation error");
                return Err(TransactionError::Rollback(rollback).into());
            }
            debug!("transaction rolled back");
            Err(error)
        }
    }
}
