// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! In-memory reference engine.
//!
//! [`MemoryConnection`] stores [`Record`]s per table and evaluates
//! structured [`Query`] state against them. It backs the crate's tests and
//! is usable wherever a real database is not.
//!
//! # Semantics
//!
//! | Feature | Behavior |
//! |---------|----------|
//! | Where clauses | Folded left to right: `AND`, `OR`, `AND NOT` |
//! | Raw conditions | Rejected with [`MemoryError::UnsupportedCondition`] |
//! | Joins | Reads and counts carrying joins fail with [`MemoryError::UnsupportedJoin`] |
//! | Column names | Resolved columns or declared names; `table.` qualifiers ignored |
//! | Limit / offset | Negative values are unset |
//! | Group by | First row of each group, then `having` on that row |
//! | Select | Non-selected basic columns read back at their zero value |
//! | Preloads | Composite fields not preloaded read back at their zero value; dotted paths nest |
//! | `first` | Ordered by primary key unless an order is given |
//! | `create` | Zero or `None` integer primary keys receive the next value of a per-table sequence shared by every handle |
//! | Transactions | Private snapshot of every table; commit replays the transaction's writes onto the current tables |
//! | Context | A cancelled [`Cancellation`] fails every later call |

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering as AtomicOrdering}
    }
};

use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    SortDirection,
    connection::Connection,
    error::MappingError,
    kind::TypeKind,
    mapping::MappingPolicy,
    model::Model,
    primary_key,
    query::{Clause, Condition, Conjunction, Query},
    shape::Shape,
    transaction::{TransactionError, TransactionOps},
    value::{Record, Value}
};

type Tables = HashMap<String, Vec<Record>>;

/// Memory engine failure.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// Column is not declared by the table's shape.
    #[error("unknown column {column} on table {table}")]
    UnknownColumn {
        /// Table name.
        table:  String,
        /// Column as written in the query.
        column: String
    },

    /// Preload names no association.
    #[error("unknown association {association} on {entity}")]
    UnknownAssociation {
        /// Entity type name.
        entity:      &'static str,
        /// Association as requested.
        association: String
    },

    /// Condition cannot be evaluated in memory.
    #[error("unsupported condition: {0}")]
    UnsupportedCondition(String),

    /// Join directives cannot be evaluated in memory.
    #[error("unsupported join: {0}")]
    UnsupportedJoin(String),

    /// Insert collided with an existing primary key.
    #[error("duplicate primary key {key} on table {table}")]
    DuplicateKey {
        /// Table name.
        table: String,
        /// Offending key value.
        key:   String
    },

    /// Delete without any where clause.
    #[error("delete on table {0} requires a where clause")]
    MissingWhereClause(String),

    /// Save on an entity without a primary key.
    #[error("primary key not found in {0}")]
    MissingPrimaryKey(&'static str),

    /// Context was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// Stored row could not be rebuilt as the entity type.
    #[error(transparent)]
    Mapping(#[from] MappingError)
}

/// Result type for memory engine operations.
pub type MemoryResult<T> = Result<T, MemoryError>;

impl From<TransactionError<MemoryError>> for MemoryError {
    fn from(err: TransactionError<MemoryError>) -> Self {
        err.into_inner()
    }
}

/// Shared cancellation flag used as the memory engine's context.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    /// New, not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every handle carrying this context.
    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::SeqCst);
    }

    /// Check the flag.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::SeqCst)
    }
}

/// Write applied by a transaction handle, replayed onto the parent at commit.
#[derive(Debug, Clone)]
enum Write {
    Insert {
        shape:  &'static Shape,
        record: Record
    },
    Save {
        shape:  &'static Shape,
        record: Record
    },
    Update {
        shape:   &'static Shape,
        clauses: Vec<Clause>,
        values:  Vec<(String, Value)>
    },
    Delete {
        shape:   &'static Shape,
        clauses: Vec<Clause>
    }
}

impl Write {
    fn apply(&self, tables: &mut Tables, sequences: &Mutex<Sequences>) -> MemoryResult<()> {
        match self {
            Self::Insert {
                shape,
                record
            } => insert_row(tables, shape, record.clone(), sequences).map(|_| ()),
            Self::Save {
                shape,
                record
            } => save_row(tables, shape, record.clone()),
            Self::Update {
                shape,
                clauses,
                values
            } => update_rows(tables, shape, clauses, values).map(|_| ()),
            Self::Delete {
                shape,
                clauses
            } => delete_rows(tables, shape, clauses).map(|_| ())
        }
    }
}

type Sequences = HashMap<String, i64>;
type Journal = Arc<Mutex<Vec<Write>>>;

/// In-memory engine handle.
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnection {
    tables:     Arc<RwLock<Tables>>,
    sequences:  Arc<Mutex<Sequences>>,
    journal:    Option<Journal>,
    context:    Option<Cancellation>,
    last_query: Arc<Mutex<Option<Query>>>
}

impl MemoryConnection {
    /// Empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last query passed to a read, count, update or delete.
    #[must_use]
    pub fn last_query(&self) -> Option<Query> {
        self.last_query.lock().clone()
    }

    /// Rows currently stored for `T`.
    #[must_use]
    pub fn row_count<T: Model>(&self) -> usize {
        self.tables.read().get(T::shape().table()).map_or(0, Vec::len)
    }

    fn check_context(&self) -> MemoryResult<()> {
        match &self.context {
            Some(ctx) if ctx.is_cancelled() => Err(MemoryError::Cancelled),
            _ => Ok(())
        }
    }

    fn remember(&self, query: &Query) {
        *self.last_query.lock() = Some(query.clone());
    }

    fn record(&self, write: Write) {
        if let Some(journal) = &self.journal {
            journal.lock().push(write);
        }
    }

    fn rows<T: Model>(&self) -> Vec<Record> {
        self.tables.read().get(T::shape().table()).cloned().unwrap_or_default()
    }

    fn select_rows<T: Model>(&self, query: &Query, default_order: bool) -> MemoryResult<Vec<T>> {
        self.check_context()?;
        self.remember(query);
        reject_joins(query)?;
        let shape = T::shape();
        let probe = T::default().to_record();

        let mut rows = Vec::new();
        for row in self.rows::<T>() {
            if matches_clauses(&row, &query.clauses, shape)? {
                rows.push(row);
            }
        }

        if !query.group_by.is_empty() {
            rows = group_rows(rows, &query.group_by, shape)?;
            let mut kept = Vec::with_capacity(rows.len());
            for row in rows {
                if all_match(&row, &query.having, shape)? {
                    kept.push(row);
                }
            }
            rows = kept;
        }

        let mut order: Vec<(String, SortDirection)> = query
            .order
            .iter()
            .map(|o| (o.column.clone(), o.direction))
            .collect();
        if order.is_empty() && default_order && primary_key::resolve_path(&probe).is_some() {
            order.push((primary_key::primary_key_column::<T>(), SortDirection::Asc));
        }
        sort_rows(&mut rows, &order, &probe, shape)?;

        let offset = query.effective_offset();
        let rows = rows.into_iter().skip(offset);
        let rows: Vec<Record> = match query.effective_limit() {
            Some(limit) => rows.take(limit).collect(),
            None => rows.collect()
        };

        let selected = selected_columns(&query.select, &probe, shape)?;
        let tree = preload_tree(&query.preloads);
        validate_preloads(&probe, &tree)?;

        let mut out = Vec::with_capacity(rows.len());
        for mut row in rows {
            if let Some(selected) = &selected {
                zero_unselected(&mut row, selected);
            }
            apply_preloads(&mut row, &tree);
            out.push(T::from_record(&row, MappingPolicy::Strict)?);
        }
        debug!(table = shape.table(), rows = out.len(), "memory select");
        Ok(out)
    }
}

impl Connection for MemoryConnection {
    type Error = MemoryError;
    type Context = Cancellation;
    type Transaction = MemoryTransaction;

    fn with_context(&self, ctx: Cancellation) -> Self {
        Self {
            context: Some(ctx),
            ..self.clone()
        }
    }

    fn find<T: Model>(&self, query: &Query) -> MemoryResult<Vec<T>> {
        self.select_rows(query, false)
    }

    fn first<T: Model>(&self, query: &Query) -> MemoryResult<Option<T>> {
        let mut limited = query.clone();
        limited.limit = Some(1);
        let mut rows = self.select_rows::<T>(&limited, true)?;
        self.remember(query);
        Ok(if rows.is_empty() { None } else { Some(rows.swap_remove(0)) })
    }

    fn count<T: Model>(&self, query: &Query) -> MemoryResult<u64> {
        self.check_context()?;
        self.remember(query);
        reject_joins(query)?;
        let mut count = 0u64;
        for row in self.rows::<T>() {
            if matches_clauses(&row, &query.clauses, T::shape())? {
                count += 1;
            }
        }
        Ok(count)
    }

    fn create<T: Model>(&self, entity: &mut T) -> MemoryResult<()> {
        self.check_context()?;
        let shape = T::shape();
        let original = entity.to_record();
        let record = insert_row(&mut self.tables.write(), shape, original.clone(), &self.sequences)?;
        if record != original {
            *entity = T::from_record(&record, MappingPolicy::BestEffort)?;
        }
        debug!(table = shape.table(), "memory insert");
        self.record(Write::Insert {
            shape,
            record
        });
        Ok(())
    }

    fn save<T: Model>(&self, entity: &T) -> MemoryResult<()> {
        self.check_context()?;
        let shape = T::shape();
        let record = entity.to_record();
        save_row(&mut self.tables.write(), shape, record.clone())?;
        debug!(table = shape.table(), "memory save");
        self.record(Write::Save {
            shape,
            record
        });
        Ok(())
    }

    fn update_columns<T: Model>(&self, query: &Query, values: &[(String, Value)]) -> MemoryResult<u64> {
        self.check_context()?;
        self.remember(query);
        let shape = T::shape();
        let probe = T::default().to_record();
        for (column, _) in values {
            lookup(&probe, column, shape)?;
        }
        let affected = update_rows(&mut self.tables.write(), shape, &query.clauses, values)?;
        debug!(table = shape.table(), affected, "memory update");
        self.record(Write::Update {
            shape,
            clauses: query.clauses.clone(),
            values: values.to_vec()
        });
        Ok(affected)
    }

    fn delete<T: Model>(&self, query: &Query) -> MemoryResult<u64> {
        self.check_context()?;
        self.remember(query);
        let shape = T::shape();
        if query.clauses.is_empty() {
            return Err(MemoryError::MissingWhereClause(shape.table().to_string()));
        }
        let removed = delete_rows(&mut self.tables.write(), shape, &query.clauses)?;
        debug!(table = shape.table(), removed, "memory delete");
        self.record(Write::Delete {
            shape,
            clauses: query.clauses.clone()
        });
        Ok(removed)
    }

    fn begin(&self) -> MemoryResult<MemoryTransaction> {
        self.check_context()?;
        let snapshot = self.tables.read().clone();
        Ok(MemoryTransaction {
            parent:   self.clone(),
            snapshot: Arc::new(RwLock::new(snapshot)),
            journal:  Journal::default()
        })
    }
}

/// Open memory transaction.
///
/// Reads and writes go to a private snapshot of every table. Commit replays
/// the transaction's own writes onto the parent's current tables, so writes
/// made through other handles in the meantime are kept.
#[derive(Debug)]
pub struct MemoryTransaction {
    parent:   MemoryConnection,
    snapshot: Arc<RwLock<Tables>>,
    journal:  Journal
}

impl TransactionOps for MemoryTransaction {
    type Connection = MemoryConnection;
    type Error = MemoryError;

    fn connection(&self) -> MemoryConnection {
        MemoryConnection {
            tables: Arc::clone(&self.snapshot),
            journal: Some(Arc::clone(&self.journal)),
            ..self.parent.clone()
        }
    }

    fn commit(self) -> MemoryResult<()> {
        if let Err(err) = self.parent.check_context() {
            warn!("memory transaction cancelled before commit");
            return Err(err);
        }
        let writes = std::mem::take(&mut *self.journal.lock());
        {
            let mut tables = self.parent.tables.write();
            let mut staged = tables.clone();
            for write in &writes {
                write.apply(&mut staged, &self.parent.sequences)?;
            }
            *tables = staged;
        }
        info!(writes = writes.len(), "memory transaction committed");
        for write in writes {
            self.parent.record(write);
        }
        Ok(())
    }

    fn rollback(self) -> MemoryResult<()> {
        warn!("memory transaction rolled back");
        Ok(())
    }
}

fn reject_joins(query: &Query) -> MemoryResult<()> {
    match query.joins.first() {
        Some(join) => Err(MemoryError::UnsupportedJoin(join.clone())),
        None => Ok(())
    }
}

/// Insert a row, generating its key when the key is an unset integer.
fn insert_row(
    tables: &mut Tables,
    shape: &Shape,
    mut record: Record,
    sequences: &Mutex<Sequences>
) -> MemoryResult<Record> {
    let rows = tables.entry(shape.table().to_string()).or_default();
    if let Some(path) = primary_key::resolve_path(&record) {
        let key = record.value_at(&path).clone();
        let integer = field_kind(&record, &path)
            .map(TypeKind::pointee)
            .is_some_and(TypeKind::is_integer);
        if key.is_zero() && integer {
            let stored = rows
                .iter()
                .filter_map(|row| row.value_at(&path).as_i64())
                .max()
                .unwrap_or(0);
            let mut sequences = sequences.lock();
            let counter = sequences.entry(shape.table().to_string()).or_insert(0);
            *counter = (*counter).max(stored) + 1;
            record.set_at(&path, Value::Int(*counter));
        } else if !key.is_null() && rows.iter().any(|row| row.value_at(&path).matches(&key)) {
            return Err(MemoryError::DuplicateKey {
                table: shape.table().to_string(),
                key:   key.to_string()
            });
        }
    }
    rows.push(record.clone());
    Ok(record)
}

fn save_row(tables: &mut Tables, shape: &Shape, record: Record) -> MemoryResult<()> {
    let path = primary_key::resolve_path(&record).ok_or(MemoryError::MissingPrimaryKey(shape.name()))?;
    let key = record.value_at(&path).clone();
    let rows = tables.entry(shape.table().to_string()).or_default();
    match rows.iter_mut().find(|row| row.value_at(&path).matches(&key)) {
        Some(row) => *row = record,
        None => rows.push(record)
    }
    Ok(())
}

fn update_rows(
    tables: &mut Tables,
    shape: &Shape,
    clauses: &[Clause],
    values: &[(String, Value)]
) -> MemoryResult<u64> {
    let Some(rows) = tables.get_mut(shape.table()) else {
        return Ok(0);
    };
    let mut affected = 0;
    for row in rows.iter_mut() {
        if matches_clauses(row, clauses, shape)? {
            for (column, value) in values {
                row.set_column(strip_qualifier(column), value.clone());
            }
            affected += 1;
        }
    }
    Ok(affected)
}

fn delete_rows(tables: &mut Tables, shape: &Shape, clauses: &[Clause]) -> MemoryResult<u64> {
    let Some(rows) = tables.get_mut(shape.table()) else {
        return Ok(0);
    };
    let mut kept = Vec::with_capacity(rows.len());
    let mut removed = 0;
    for row in rows.drain(..) {
        if matches_clauses(&row, clauses, shape)? {
            removed += 1;
        } else {
            kept.push(row);
        }
    }
    *rows = kept;
    Ok(removed)
}

fn strip_qualifier(column: &str) -> &str {
    column.rsplit('.').next().unwrap_or(column)
}

fn lookup<'a>(row: &'a Record, column: &str, shape: &Shape) -> MemoryResult<&'a Value> {
    row.lookup_column(strip_qualifier(column))
        .ok_or_else(|| MemoryError::UnknownColumn {
            table:  shape.table().to_string(),
            column: column.to_string()
        })
}

fn field_kind<'a>(record: &'a Record, path: &[usize]) -> Option<&'a TypeKind> {
    let (last, parents) = path.split_last()?;
    let mut current = record;
    for index in parents {
        current = current.values().get(*index)?.as_record()?;
    }
    current.shape().fields().get(*last).map(|f| f.kind())
}

fn matches_clauses(row: &Record, clauses: &[Clause], shape: &Shape) -> MemoryResult<bool> {
    let mut acc: Option<bool> = None;
    for clause in clauses {
        let hit = evaluate(row, &clause.condition, shape)?;
        acc = Some(match (acc, clause.conjunction) {
            (None, Conjunction::Not) => !hit,
            (None, _) => hit,
            (Some(prev), Conjunction::And) => prev && hit,
            (Some(prev), Conjunction::Or) => prev || hit,
            (Some(prev), Conjunction::Not) => prev && !hit
        });
    }
    Ok(acc.unwrap_or(true))
}

fn all_match(row: &Record, conditions: &[Condition], shape: &Shape) -> MemoryResult<bool> {
    for condition in conditions {
        if !evaluate(row, condition, shape)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn evaluate(row: &Record, condition: &Condition, shape: &Shape) -> MemoryResult<bool> {
    let ordered = |column: &str, value: &Value, accept: fn(Ordering) -> bool| {
        lookup(row, column, shape).map(|found| found.compare(value).is_some_and(accept))
    };
    match condition {
        Condition::Eq(c, v) => lookup(row, c, shape).map(|found| found.matches(v)),
        Condition::Ne(c, v) => lookup(row, c, shape).map(|found| !found.matches(v)),
        Condition::Gt(c, v) => ordered(c, v, Ordering::is_gt),
        Condition::Ge(c, v) => ordered(c, v, Ordering::is_ge),
        Condition::Lt(c, v) => ordered(c, v, Ordering::is_lt),
        Condition::Le(c, v) => ordered(c, v, Ordering::is_le),
        Condition::In(c, values) => {
            lookup(row, c, shape).map(|found| values.iter().any(|v| found.matches(v)))
        }
        Condition::Like(c, pattern) => lookup(row, c, shape)
            .map(|found| found.as_str().is_some_and(|text| like(pattern, text))),
        Condition::IsNull(c) => lookup(row, c, shape).map(Value::is_null),
        Condition::Raw {
            sql, ..
        } => Err(MemoryError::UnsupportedCondition(sql.clone()))
    }
}

/// SQL `LIKE` with `%` (any run) and `_` (one character).
fn like(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let mut reachable = vec![false; text.len() + 1];
    reachable[0] = true;
    for p in &pattern {
        let mut next = vec![false; text.len() + 1];
        match p {
            '%' => {
                let mut seen = false;
                for (i, slot) in next.iter_mut().enumerate() {
                    seen |= reachable[i];
                    *slot = seen;
                }
            }
            _ => {
                for i in 0..text.len() {
                    if reachable[i] && (*p == '_' || *p == text[i]) {
                        next[i + 1] = true;
                    }
                }
            }
        }
        reachable = next;
    }
    reachable[text.len()]
}

fn group_rows(rows: Vec<Record>, columns: &[String], shape: &Shape) -> MemoryResult<Vec<Record>> {
    let mut seen: Vec<Vec<Value>> = Vec::new();
    let mut kept = Vec::new();
    for row in rows {
        let key = columns
            .iter()
            .map(|c| lookup(&row, c, shape).cloned())
            .collect::<MemoryResult<Vec<_>>>()?;
        let duplicate = seen
            .iter()
            .any(|k| k.iter().zip(&key).all(|(a, b)| a.matches(b)));
        if !duplicate {
            seen.push(key);
            kept.push(row);
        }
    }
    Ok(kept)
}

fn sort_rows(
    rows: &mut [Record],
    order: &[(String, SortDirection)],
    probe: &Record,
    shape: &Shape
) -> MemoryResult<()> {
    for (column, _) in order {
        lookup(probe, column, shape)?;
    }
    rows.sort_by(|a, b| {
        for (column, direction) in order {
            let column = strip_qualifier(column);
            let left = a.lookup_column(column).unwrap_or(&Value::Null);
            let right = b.lookup_column(column).unwrap_or(&Value::Null);
            let ord = left.compare(right).unwrap_or(Ordering::Equal);
            let ord = match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse()
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
    Ok(())
}

/// Selected column names, `None` when everything is selected.
fn selected_columns(select: &[String], probe: &Record, shape: &Shape) -> MemoryResult<Option<Vec<String>>> {
    let mut columns = Vec::new();
    for expr in select.iter().flat_map(|s| s.split(',')) {
        let expr = expr.trim();
        if expr.is_empty() {
            continue;
        }
        let source = match expr.find(" AS ").or_else(|| expr.find(" as ")) {
            Some(at) => expr[..at].trim(),
            None => expr
        };
        if source == "*" {
            return Ok(None);
        }
        let column = strip_qualifier(source);
        lookup(probe, column, shape)?;
        columns.push(column.to_string());
    }
    Ok(if columns.is_empty() { None } else { Some(columns) })
}

fn zero_for(kind: &TypeKind, current: &Value) -> Value {
    match (kind, current) {
        (TypeKind::Pointer(_), _) => Value::Null,
        (TypeKind::Slice(_), _) => Value::List(Vec::new()),
        (TypeKind::Map, _) => Value::Map(BTreeMap::new()),
        (_, Value::Record(inner)) => Value::Record(zero_record(inner)),
        (_, Value::Bool(_)) => Value::Bool(false),
        (_, Value::Int(_)) => Value::Int(0),
        (_, Value::UInt(_)) => Value::UInt(0),
        (_, Value::Float(_)) => Value::Float(0.0),
        (_, Value::String(_)) => Value::String(String::new()),
        (_, Value::List(_)) => Value::List(Vec::new()),
        (_, Value::Map(_)) => Value::Map(BTreeMap::new()),
        (_, Value::Null) => Value::Null
    }
}

fn zero_record(record: &Record) -> Record {
    let values = record
        .iter()
        .map(|(field, value)| zero_for(field.kind(), value))
        .collect();
    Record::new(record.shape(), values)
}

fn zero_unselected(row: &mut Record, selected: &[String]) {
    let shape = row.shape();
    for (field, value) in shape.fields().iter().zip(row.values_mut()) {
        if field.is_embedded() {
            if let Value::Record(inner) = value {
                zero_unselected(inner, selected);
            }
            continue;
        }
        let chosen = selected
            .iter()
            .any(|c| c == field.column_name() || c == field.name());
        if field.is_basic() && !chosen {
            *value = zero_for(field.kind(), value);
        }
    }
}

/// Preload paths grouped by their first segment.
fn preload_tree(preloads: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut tree: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for path in preloads {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path.as_str(), None)
        };
        let children = tree.entry(head.to_string()).or_default();
        if let Some(rest) = rest {
            children.push(rest.to_string());
        }
    }
    tree
}

fn answers_to(field: &crate::shape::FieldDescriptor, name: &str) -> bool {
    field.association_name() == name || field.name() == name
}

fn validate_preloads(probe: &Record, tree: &BTreeMap<String, Vec<String>>) -> MemoryResult<()> {
    for name in tree.keys() {
        if !declares_association(probe, name) {
            return Err(MemoryError::UnknownAssociation {
                entity:      probe.shape().name(),
                association: name.clone()
            });
        }
    }
    Ok(())
}

/// Composite field named `name`, searched through embedded structs.
fn declares_association(record: &Record, name: &str) -> bool {
    record.iter().any(|(field, value)| match value {
        Value::Record(inner) if field.is_embedded() => declares_association(inner, name),
        _ => !field.is_embedded() && field.is_composite() && answers_to(field, name)
    })
}

fn apply_preloads(row: &mut Record, tree: &BTreeMap<String, Vec<String>>) {
    let shape = row.shape();
    for (field, value) in shape.fields().iter().zip(row.values_mut()) {
        if field.is_embedded() {
            if let Value::Record(inner) = value {
                apply_preloads(inner, tree);
            }
            continue;
        }
        if field.is_basic() {
            continue;
        }
        let requested = tree.iter().find(|(name, _)| answers_to(field, name));
        match requested {
            Some((_, nested)) => {
                let subtree = preload_tree(nested);
                preload_nested(value, &subtree);
            }
            None => *value = zero_for(field.kind(), value)
        }
    }
}

fn preload_nested(value: &mut Value, tree: &BTreeMap<String, Vec<String>>) {
    match value {
        Value::Record(inner) => apply_preloads(inner, tree),
        Value::List(items) => {
            for item in items {
                preload_nested(item, tree);
            }
        }
        _ => {}
    }
}
