// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! The underlying engine contract.
//!
//! A [`Connection`] executes accumulated [`Query`] state, loads requested
//! associations, and performs writes. The repository never generates SQL or
//! loads associations itself; everything goes through this trait.
//!
//! Calls are synchronous and blocking. Handles are cheap to clone and safe
//! to share across threads for independent queries.
//!
//! # Implementing
//!
//! | Method | Contract |
//! |--------|----------|
//! | `find` | All rows matching the query, honoring order, limit, offset, group, having, select and preloads |
//! | `first` | First matching row ordered by primary key unless an order is given |
//! | `count` | Matching rows; never fails for zero rows |
//! | `create` | Insert, writing generated keys back into the entity |
//! | `save` | Insert or replace by primary key |
//! | `update_columns` | Update listed columns on matching rows |
//! | `delete` | Delete matching rows |
//! | `begin` | Open a transaction |

use std::error::Error as StdError;

use crate::{
    model::Model, query::Query, transaction::TransactionOps, value::Value
};

/// Handle to the underlying relational engine.
pub trait Connection: Clone + Send + Sync + Sized {
    /// Engine error.
    type Error: StdError + Send + Sync + 'static;

    /// Opaque cancellation or deadline token.
    type Context: Clone + Send + Sync;

    /// Open transaction.
    type Transaction: TransactionOps<Connection = Self, Error = Self::Error>;

    /// New handle whose calls carry `ctx`.
    fn with_context(&self, ctx: Self::Context) -> Self;

    /// Rows matching `query`.
    ///
    /// # Errors
    ///
    /// Returns the engine error.
    fn find<T: Model>(&self, query: &Query) -> Result<Vec<T>, Self::Error>;

    /// First row matching `query`, `None` when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns the engine error.
    fn first<T: Model>(&self, query: &Query) -> Result<Option<T>, Self::Error>;

    /// Number of rows matching the clauses of `query`.
    ///
    /// # Errors
    ///
    /// Returns the engine error.
    fn count<T: Model>(&self, query: &Query) -> Result<u64, Self::Error>;

    /// Insert an entity, writing generated values back.
    ///
    /// # Errors
    ///
    /// Returns the engine error.
    fn create<T: Model>(&self, entity: &mut T) -> Result<(), Self::Error>;

    /// Insert several entities.
    ///
    /// # Errors
    ///
    /// Stops at the first engine error.
    fn create_batch<T: Model>(&self, entities: &mut [T]) -> Result<(), Self::Error> {
        for entity in entities.iter_mut() {
            self.create(entity)?;
        }
        Ok(())
    }

    /// Insert or replace an entity by primary key.
    ///
    /// # Errors
    ///
    /// Returns the engine error.
    fn save<T: Model>(&self, entity: &T) -> Result<(), Self::Error>;

    /// Update columns on rows matching `query`, returning rows affected.
    ///
    /// # Errors
    ///
    /// Returns the engine error.
    fn update_columns<T: Model>(&self, query: &Query, values: &[(String, Value)]) -> Result<u64, Self::Error>;

    /// Delete rows matching `query`, returning rows affected.
    ///
    /// # Errors
    ///
    /// Returns the engine error.
    fn delete<T: Model>(&self, query: &Query) -> Result<u64, Self::Error>;

    /// Open a transaction.
    ///
    /// # Errors
    ///
    /// Returns the engine error.
    fn begin(&self) -> Result<Self::Transaction, Self::Error>;
}
