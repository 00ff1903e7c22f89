// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Fluent query repository.
//!
//! [`Repository`] is a single-owner builder: every configuration method
//! takes `self` and returns it, and terminal methods store their outcome in
//! result slots instead of returning it. A chain is built, executed and
//! read by one caller; independent chains never share state beyond the
//! connection handle.
//!
//! # States
//!
//! | State | Reached by | Readable with |
//! |-------|------------|---------------|
//! | building | [`new`](Repository::new), configuration methods | [`query`](Repository::query) |
//! | executed-single | [`first`](Repository::first), [`one`](Repository::one), [`find_one`](Repository::find_one), writes | [`result`](Repository::result), [`into_result`](Repository::into_result) |
//! | executed-collection | [`all`](Repository::all), [`create_batch`](Repository::create_batch) | [`results`](Repository::results), [`into_results`](Repository::into_results) |
//! | projected | [`project_to`](Repository::project_to) then [`project`](Repository::project) | DTO values |
//!
//! Each terminal call overwrites the error slot: a success clears it, a
//! failure replaces it and empties the slot it would have filled.
//!
//! # Example
//!
//! ```rust,ignore
//! use fluent_repo::prelude::*;
//!
//! let summaries: Vec<UserSummary> = Repository::<User, _>::new(conn.clone())
//!     .filter(Condition::eq("active", true))
//!     .order("name asc")
//!     .paginate(2, 20)
//!     .project_to::<UserSummary>()
//!     .all()
//!     .project_slice()?;
//!
//! let user = Repository::<User, _>::new(conn)
//!     .find_by_id(7)
//!     .first()
//!     .into_result()?;
//! ```

use std::marker::PhantomData;

use tracing::{debug, warn};

use crate::{
    Pagination, SortDirection,
    connection::Connection,
    error::{MappingError, RepositoryError, RepositoryResult},
    mapping::{self, MappingPolicy},
    model::Model,
    primary_key::{self, PrimaryKey},
    projection::{ProjectionShape, configure_for_projection},
    query::{Condition, Conjunction, OrderBy, Query},
    transaction::{TransactionError, run_in_transaction},
    value::Value
};

/// Fluent repository over entity `T`, connection `C` and projection `P`.
///
/// `P` is `()` until [`project_to`](Self::project_to) selects a DTO type.
pub struct Repository<T, C, P = ()> {
    conn:          C,
    query:         Query,
    policy:        MappingPolicy,
    projection:    Option<ProjectionShape>,
    current:       Option<T>,
    current_slice: Option<Vec<T>>,
    last_error:    Option<RepositoryError>,
    _projection:   PhantomData<fn() -> P>
}

impl<T: Model, C: Connection> Repository<T, C> {
    /// Create a repository bound to a connection handle.
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            query: Query::new(),
            policy: MappingPolicy::default(),
            projection: None,
            current: None,
            current_slice: None,
            last_error: None,
            _projection: PhantomData
        }
    }
}

impl<T: Model, C: Connection, P> Repository<T, C, P> {
    // ==================== CONFIGURATION ====================

    /// Add an `AND` filter.
    #[must_use]
    pub fn filter(mut self, condition: Condition) -> Self {
        self.query.push(Conjunction::And, condition);
        self
    }

    /// Add equality filters, one `AND` clause per pair.
    #[must_use]
    pub fn filter_eq<I, K, V>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>
    {
        for (column, value) in filters {
            self.query.push(Conjunction::And, Condition::eq(column, value));
        }
        self
    }

    /// Add an `OR` filter.
    #[must_use]
    pub fn or_filter(mut self, condition: Condition) -> Self {
        self.query.push(Conjunction::Or, condition);
        self
    }

    /// Add an `AND NOT` filter.
    #[must_use]
    pub fn not_filter(mut self, condition: Condition) -> Self {
        self.query.push(Conjunction::Not, condition);
        self
    }

    /// Add an ordering term: `"column"`, `"column asc"` or `"column desc"`.
    ///
    /// An unparseable expression orders ascending by the trimmed text.
    #[must_use]
    pub fn order(mut self, expr: &str) -> Self {
        let order = OrderBy::parse(expr).unwrap_or_else(|| OrderBy::asc(expr.trim()));
        self.query.order.push(order);
        self
    }

    /// Add an ordering term with an explicit direction.
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.query.order.push(OrderBy {
            column: column.into(),
            direction
        });
        self
    }

    /// Set the row limit.
    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Set the rows to skip.
    #[must_use]
    pub fn offset(mut self, offset: i64) -> Self {
        self.query.offset = Some(offset);
        self
    }

    /// Select a 1-based page.
    ///
    /// Sets `offset = (page - 1) * per_page` and `limit = per_page`. Pages at
    /// or below zero give a negative offset, passed through unchanged.
    #[must_use]
    pub fn paginate(self, page: i64, per_page: i64) -> Self {
        let Pagination {
            limit,
            offset
        } = Pagination::page(page, per_page);
        self.offset(offset).limit(limit)
    }

    /// Group rows by a column.
    #[must_use]
    pub fn group(mut self, column: impl Into<String>) -> Self {
        self.query.group_by.push(column.into());
        self
    }

    /// Filter grouped rows.
    #[must_use]
    pub fn having(mut self, condition: Condition) -> Self {
        self.query.having.push(condition);
        self
    }

    /// Eager-load associations; dotted names load nested associations.
    #[must_use]
    pub fn preload<I, S>(mut self, associations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        for association in associations {
            self.query.add_preload(association);
        }
        self
    }

    /// Add join expressions.
    #[must_use]
    pub fn joins<I, S>(mut self, joins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        self.query.joins.extend(joins.into_iter().map(Into::into));
        self
    }

    /// Add select expressions.
    #[must_use]
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        self.query.select.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Set how projection treats unconvertible fields.
    #[must_use]
    pub fn mapping_policy(mut self, policy: MappingPolicy) -> Self {
        self.policy = policy;
        self
    }

    // ==================== FINDERS ====================

    /// Filter on the primary-key column.
    ///
    /// Uses the declared primary-key column of `T`, `id` when none is
    /// declared.
    #[must_use]
    pub fn find_by_id(self, id: impl Into<Value>) -> Self {
        let column = primary_key::primary_key_column::<T>();
        self.filter(Condition::Eq(column, id.into()))
    }

    /// Select every row. The query runs on the next terminal call.
    #[must_use]
    pub fn find_all(self) -> Self {
        self
    }

    /// Apply equality filters, then run [`first`](Self::first).
    #[must_use]
    pub fn find_one<I, K, V>(self, filters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>
    {
        self.filter_eq(filters).first()
    }

    /// Restrict the query to one row.
    #[must_use]
    pub fn find_first(self) -> Self {
        self.limit(1)
    }

    // ==================== TERMINALS ====================

    /// Run the query and store the first row.
    ///
    /// Stores [`RepositoryError::NotFound`] when nothing matches. The limit
    /// is left as configured.
    #[must_use]
    pub fn first(mut self) -> Self {
        self.last_error = None;
        debug!(entity = T::shape().name(), query = %self.query, "executing first");
        match self.conn.first::<T>(&self.query) {
            Ok(Some(entity)) => self.current = Some(entity),
            Ok(None) => {
                self.current = None;
                self.fail(RepositoryError::NotFound);
            }
            Err(e) => {
                self.current = None;
                self.fail(RepositoryError::execution(e));
            }
        }
        self
    }

    /// Run the query and store every matching row.
    #[must_use]
    pub fn all(mut self) -> Self {
        self.last_error = None;
        debug!(entity = T::shape().name(), query = %self.query, "executing find");
        match self.conn.find::<T>(&self.query) {
            Ok(rows) => self.current_slice = Some(rows),
            Err(e) => {
                self.current_slice = None;
                self.fail(RepositoryError::execution(e));
            }
        }
        self
    }

    /// Force `limit = 1`, then run [`first`](Self::first).
    ///
    /// Several matching rows are not an error: the first of them under the
    /// query's ordering is stored.
    #[must_use]
    pub fn one(self) -> Self {
        self.limit(1).first()
    }

    /// Count rows matching equality filters.
    ///
    /// Runs on a fresh query: prior filters, preloads and selects of this
    /// chain are not inherited. No matching rows is `Ok(0)`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Execution`] when the engine fails.
    pub fn count<I, K, V>(&self, filters: I) -> RepositoryResult<u64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>
    {
        let mut query = Query::new();
        for (column, value) in filters {
            query.push(Conjunction::And, Condition::eq(column, value));
        }
        debug!(entity = T::shape().name(), query = %query, "executing count");
        self.conn.count::<T>(&query).map_err(RepositoryError::execution)
    }

    /// Check if any row matches equality filters.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Execution`] when the engine fails.
    pub fn exists<I, K, V>(&self, filters: I) -> RepositoryResult<bool>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>
    {
        Ok(self.count(filters)? > 0)
    }

    // ==================== WRITES ====================

    /// Insert an entity and store it, generated keys included.
    #[must_use]
    pub fn create(mut self, mut entity: T) -> Self {
        self.last_error = None;
        debug!(entity = T::shape().name(), "executing create");
        match self.conn.create(&mut entity) {
            Ok(()) => self.current = Some(entity),
            Err(e) => {
                self.current = None;
                self.fail(RepositoryError::execution(e));
            }
        }
        self
    }

    /// Insert an entity, then re-read it by primary key with preloads.
    ///
    /// Stores the inserted entity as given when its key cannot be resolved
    /// or the re-read fails.
    #[must_use]
    pub fn create_with_preload<I, S>(self, entity: T, associations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        let repo = self.create(entity);
        repo.reload_with(associations)
    }

    /// Insert an entity, then re-read it with every association loaded.
    #[must_use]
    pub fn create_with_all_associations(self, entity: T) -> Self {
        let associations = ProjectionShape::of::<T>().associations;
        self.create_with_preload(entity, associations)
    }

    /// Insert several entities and store them.
    #[must_use]
    pub fn create_batch(mut self, mut entities: Vec<T>) -> Self {
        self.last_error = None;
        debug!(entity = T::shape().name(), count = entities.len(), "executing create batch");
        match self.conn.create_batch(&mut entities) {
            Ok(()) => self.current_slice = Some(entities),
            Err(e) => {
                self.current_slice = None;
                self.fail(RepositoryError::execution(e));
            }
        }
        self
    }

    /// Save an entity by primary key and store it.
    #[must_use]
    pub fn update(mut self, entity: T) -> Self {
        self.last_error = None;
        debug!(entity = T::shape().name(), "executing save");
        match self.conn.save(&entity) {
            Ok(()) => self.current = Some(entity),
            Err(e) => {
                self.current = None;
                self.fail(RepositoryError::execution(e));
            }
        }
        self
    }

    /// Save an entity, then re-read it by primary key with preloads.
    #[must_use]
    pub fn update_with_preload<I, S>(self, entity: T, associations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        let repo = self.update(entity);
        repo.reload_with(associations)
    }

    /// Update the given columns on the entity's row and store the entity.
    ///
    /// The stored entity is the one passed in; it is not re-read.
    #[must_use]
    pub fn update_fields<I, K, V>(mut self, entity: T, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>
    {
        self.last_error = None;
        let Some(pk) = primary_key::resolve(&entity) else {
            self.current = None;
            self.fail(RepositoryError::PrimaryKeyNotFound {
                entity: T::shape().name()
            });
            return self;
        };
        let values: Vec<(String, Value)> =
            fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        let query = key_query(&pk);
        debug!(entity = T::shape().name(), query = %query, columns = values.len(), "executing update");
        match self.conn.update_columns::<T>(&query, &values) {
            Ok(_) => self.current = Some(entity),
            Err(e) => {
                self.current = None;
                self.fail(RepositoryError::execution(e));
            }
        }
        self
    }

    /// Delete the row with the given primary-key value.
    #[must_use]
    pub fn delete(mut self, id: impl Into<Value>) -> Self {
        let query = Query::new().with(Condition::Eq(
            primary_key::primary_key_column::<T>(),
            id.into()
        ));
        self.last_error = None;
        self.run_delete(&query);
        self
    }

    /// Delete the entity's row by its primary key.
    #[must_use]
    pub fn delete_entity(mut self, entity: &T) -> Self {
        self.last_error = None;
        match primary_key::resolve(entity) {
            Some(pk) => self.run_delete(&key_query(&pk)),
            None => self.fail(RepositoryError::PrimaryKeyNotFound {
                entity: T::shape().name()
            })
        }
        self
    }

    /// Delete the rows of several entities by primary key.
    ///
    /// An empty slice deletes nothing.
    #[must_use]
    pub fn delete_batch(mut self, entities: &[T]) -> Self {
        self.last_error = None;
        let keys: Option<Vec<PrimaryKey>> = entities.iter().map(primary_key::resolve).collect();
        let Some(keys) = keys else {
            self.fail(RepositoryError::PrimaryKeyNotFound {
                entity: T::shape().name()
            });
            return self;
        };
        let Some(first) = keys.first() else {
            return self;
        };
        let column = first.column.clone();
        let query = Query::new().with(Condition::In(
            column,
            keys.into_iter().map(|pk| pk.value).collect()
        ));
        self.run_delete(&query);
        self
    }

    fn run_delete(&mut self, query: &Query) {
        debug!(entity = T::shape().name(), query = %query, "executing delete");
        if let Err(e) = self.conn.delete::<T>(query) {
            self.fail(RepositoryError::execution(e));
        }
    }

    fn reload_with<I, S>(mut self, associations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        if self.last_error.is_some() {
            return self;
        }
        let Some(pk) = self.current.as_ref().and_then(primary_key::resolve) else {
            return self;
        };
        let mut query = key_query(&pk);
        for association in associations {
            query.add_preload(association);
        }
        debug!(entity = T::shape().name(), query = %query, "reloading with preloads");
        if let Ok(Some(reloaded)) = self.conn.first::<T>(&query) {
            self.current = Some(reloaded);
        }
        self
    }

    fn fail(&mut self, error: RepositoryError) {
        warn!(entity = T::shape().name(), error = %error, "repository operation failed");
        self.last_error = Some(error);
    }

    // ==================== PROJECTION ====================

    /// Target DTO type `D`.
    ///
    /// Applies `D`'s projection to the query state: preloads when `D` has
    /// composite fields, otherwise a select of its columns. Results and the
    /// error already stored carry over, so projecting after a terminal call
    /// works the same as before it.
    #[must_use]
    pub fn project_to<D: Model>(self) -> Repository<T, C, D> {
        let projection = ProjectionShape::of::<D>();
        let mut query = self.query;
        configure_for_projection(&mut query, &projection);
        debug!(
            entity = T::shape().name(),
            dto = D::shape().name(),
            columns = projection.columns.len(),
            associations = projection.associations.len(),
            "projection configured"
        );
        Repository {
            conn: self.conn,
            query,
            policy: self.policy,
            projection: Some(projection),
            current: self.current,
            current_slice: self.current_slice,
            last_error: self.last_error,
            _projection: PhantomData
        }
    }

    /// Map an entity to DTO `D` with this repository's policy.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::NilEntity`] for `None`.
    pub fn project_entity<D: Model>(&self, entity: Option<&T>) -> RepositoryResult<D> {
        Ok(mapping::map_entity_to_dto(entity, self.policy)?)
    }

    /// Map entities to DTOs with this repository's policy.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::NilSlice`] for `None`, and the first failing
    /// element's error with its index.
    pub fn project_entity_slice<D: Model>(&self, entities: Option<&[T]>) -> RepositoryResult<Vec<D>> {
        let entities = entities.ok_or(MappingError::NilSlice)?;
        Ok(mapping::map_entity_slice_to_dto_slice(entities, self.policy)?)
    }

    // ==================== SCOPING ====================

    /// Fresh repository over another connection handle.
    ///
    /// Shares nothing with this chain.
    pub fn with_connection(&self, conn: C) -> Repository<T, C> {
        Repository::new(conn).mapping_policy(self.policy)
    }

    /// Same chain bound to a handle carrying `ctx`.
    ///
    /// Query state, projection and policy carry over; stored results do not.
    #[must_use]
    pub fn with_context(self, ctx: C::Context) -> Self {
        Self {
            conn:          self.conn.with_context(ctx),
            query:         self.query,
            policy:        self.policy,
            projection:    self.projection,
            current:       None,
            current_slice: None,
            last_error:    None,
            _projection:   PhantomData
        }
    }

    /// Run `f` with a fresh repository bound to a transaction.
    ///
    /// Commits iff `f` returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns the error of `f`, or [`RepositoryError::Transaction`] when
    /// begin, commit or rollback fails.
    pub fn transaction<R, F>(&self, f: F) -> RepositoryResult<R>
    where
        F: FnOnce(Repository<T, C>) -> RepositoryResult<R>
    {
        let policy = self.policy;
        run_in_transaction(&self.conn, |tx| f(Repository::new(tx).mapping_policy(policy)))
    }

    /// Open an explicit transaction on this repository's connection.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Transaction`] when begin fails.
    pub fn begin(&self) -> RepositoryResult<C::Transaction> {
        self.conn
            .begin()
            .map_err(|e| RepositoryError::from(TransactionError::Begin(e)))
    }

    // ==================== ACCESSORS ====================

    /// Accumulated query state.
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Connection handle.
    pub const fn connection(&self) -> &C {
        &self.conn
    }

    /// Projection applied by [`project_to`](Self::project_to).
    pub const fn projection(&self) -> Option<&ProjectionShape> {
        self.projection.as_ref()
    }

    /// Check if an error is stored.
    pub const fn has_error(&self) -> bool {
        self.last_error.is_some()
    }

    /// Stored error.
    pub const fn last_error(&self) -> Option<&RepositoryError> {
        self.last_error.as_ref()
    }

    /// Stored single result.
    ///
    /// # Errors
    ///
    /// Returns the stored error.
    pub fn result(&self) -> RepositoryResult<Option<&T>> {
        self.check()?;
        Ok(self.current.as_ref())
    }

    /// Stored collection result.
    ///
    /// # Errors
    ///
    /// Returns the stored error.
    pub fn results(&self) -> RepositoryResult<Option<&[T]>> {
        self.check()?;
        Ok(self.current_slice.as_deref())
    }

    /// Outcome of the last operation, ignoring its result.
    ///
    /// # Errors
    ///
    /// Returns the stored error.
    pub fn execute_only(&self) -> RepositoryResult<()> {
        self.check()
    }

    /// Consume the chain and return the single result.
    ///
    /// # Errors
    ///
    /// Returns the stored error, or [`RepositoryError::NoResult`].
    pub fn into_result(self) -> RepositoryResult<T> {
        if let Some(error) = self.last_error {
            return Err(error);
        }
        self.current.ok_or(RepositoryError::NoResult)
    }

    /// Consume the chain and return the collection result.
    ///
    /// # Errors
    ///
    /// Returns the stored error, or [`RepositoryError::NoResult`].
    pub fn into_results(self) -> RepositoryResult<Vec<T>> {
        if let Some(error) = self.last_error {
            return Err(error);
        }
        self.current_slice.ok_or(RepositoryError::NoResult)
    }

    fn check(&self) -> RepositoryResult<()> {
        match &self.last_error {
            Some(error) => Err(error.clone()),
            None => Ok(())
        }
    }
}

impl<T: Model, C: Connection, P: Model> Repository<T, C, P> {
    /// Map the stored single result to `P`.
    ///
    /// # Errors
    ///
    /// Returns the stored error first, [`RepositoryError::NoResult`] when no
    /// single result is stored, and mapping errors.
    pub fn project(&self) -> RepositoryResult<P> {
        self.check()?;
        let entity = self.current.as_ref().ok_or(RepositoryError::NoResult)?;
        Ok(mapping::map_entity_to_dto(Some(entity), self.policy)?)
    }

    /// Map the stored collection result to `Vec<P>`.
    ///
    /// # Errors
    ///
    /// Returns the stored error first, [`RepositoryError::NoResult`] when no
    /// collection is stored, and the first failing element's error.
    pub fn project_slice(&self) -> RepositoryResult<Vec<P>> {
        self.check()?;
        let entities = self.current_slice.as_deref().ok_or(RepositoryError::NoResult)?;
        Ok(mapping::map_entity_slice_to_dto_slice(entities, self.policy)?)
    }
}

fn key_query(pk: &PrimaryKey) -> Query {
    Query::new().with(Condition::Eq(pk.column.clone(), pk.value.clone()))
}
