// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Accumulated query state handed to a [`Connection`](crate::Connection).
//!
//! A [`Query`] is plain data: engines interpret it, the repository only
//! appends to it. Nothing here validates column names; unknown columns are
//! the engine's concern.

use std::fmt;

use crate::{SortDirection, value::Value};

/// How a where clause joins the clauses before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conjunction {
    /// `AND condition`
    #[default]
    And,

    /// `OR condition`
    Or,

    /// `AND NOT condition`
    Not
}

/// A single predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column = value`
    Eq(String, Value),
    /// `column != value`
    Ne(String, Value),
    /// `column > value`
    Gt(String, Value),
    /// `column >= value`
    Ge(String, Value),
    /// `column < value`
    Lt(String, Value),
    /// `column <= value`
    Le(String, Value),
    /// `column IN (values)`
    In(String, Vec<Value>),
    /// `column LIKE pattern` with `%` and `_` wildcards
    Like(String, String),
    /// `column IS NULL`
    IsNull(String),
    /// Engine-specific SQL fragment with positional arguments.
    Raw {
        /// SQL text.
        sql:  String,
        /// Bound arguments.
        args: Vec<Value>
    }
}

impl Condition {
    /// `column = value`
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(column.into(), value.into())
    }

    /// `column != value`
    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ne(column.into(), value.into())
    }

    /// `column > value`
    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gt(column.into(), value.into())
    }

    /// `column >= value`
    pub fn ge(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ge(column.into(), value.into())
    }

    /// `column < value`
    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lt(column.into(), value.into())
    }

    /// `column <= value`
    pub fn le(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Le(column.into(), value.into())
    }

    /// `column IN (values)`
    pub fn is_in<V: Into<Value>>(column: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self::In(column.into(), values.into_iter().map(Into::into).collect())
    }

    /// `column LIKE pattern`
    pub fn like(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::Like(column.into(), pattern.into())
    }

    /// `column IS NULL`
    pub fn is_null(column: impl Into<String>) -> Self {
        Self::IsNull(column.into())
    }

    /// Raw SQL fragment.
    pub fn raw(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self::Raw {
            sql: sql.into(),
            args
        }
    }

    /// Column the condition tests, if structured.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Eq(c, _)
            | Self::Ne(c, _)
            | Self::Gt(c, _)
            | Self::Ge(c, _)
            | Self::Lt(c, _)
            | Self::Le(c, _)
            | Self::In(c, _)
            | Self::Like(c, _)
            | Self::IsNull(c) => Some(c),
            Self::Raw {
                ..
            } => None
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq(c, v) => write!(f, "{c} = {v}"),
            Self::Ne(c, v) => write!(f, "{c} != {v}"),
            Self::Gt(c, v) => write!(f, "{c} > {v}"),
            Self::Ge(c, v) => write!(f, "{c} >= {v}"),
            Self::Lt(c, v) => write!(f, "{c} < {v}"),
            Self::Le(c, v) => write!(f, "{c} <= {v}"),
            Self::In(c, values) => {
                write!(f, "{c} IN (")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str(")")
            }
            Self::Like(c, p) => write!(f, "{c} LIKE '{p}'"),
            Self::IsNull(c) => write!(f, "{c} IS NULL"),
            Self::Raw {
                sql, ..
            } => f.write_str(sql)
        }
    }
}

/// A where clause: a condition and how it joins the previous ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// Joining conjunction.
    pub conjunction: Conjunction,
    /// Predicate.
    pub condition:   Condition
}

/// One ordering term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Column to sort by.
    pub column:    String,
    /// Direction.
    pub direction: SortDirection
}

impl OrderBy {
    /// Ascending order on `column`.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column:    column.into(),
            direction: SortDirection::Asc
        }
    }

    /// Descending order on `column`.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column:    column.into(),
            direction: SortDirection::Desc
        }
    }

    /// Parse `"column"`, `"column asc"` or `"column desc"`.
    ///
    /// ```rust
    /// use fluent_repo_core::{OrderBy, SortDirection};
    ///
    /// let order = OrderBy::parse("created_at DESC").unwrap();
    /// assert_eq!(order.column, "created_at");
    /// assert_eq!(order.direction, SortDirection::Desc);
    /// ```
    #[must_use]
    pub fn parse(expr: &str) -> Option<Self> {
        let mut parts = expr.split_whitespace();
        let column = parts.next()?;
        let direction = match parts.next() {
            Some(keyword) => SortDirection::from_keyword(keyword)?,
            None => SortDirection::Asc
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            column: column.to_string(),
            direction
        })
    }
}

/// Accumulated query state.
///
/// `limit` and `offset` are passed through as given; engines treat negative
/// values as unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Where clauses in call order.
    pub clauses:  Vec<Clause>,
    /// Ordering terms in call order.
    pub order:    Vec<OrderBy>,
    /// Row limit.
    pub limit:    Option<i64>,
    /// Rows to skip.
    pub offset:   Option<i64>,
    /// Group-by columns.
    pub group_by: Vec<String>,
    /// Conditions on grouped rows.
    pub having:   Vec<Condition>,
    /// Associations to eager-load, dotted for nested paths.
    pub preloads: Vec<String>,
    /// Join expressions.
    pub joins:    Vec<String>,
    /// Selected columns; empty selects everything.
    pub select:   Vec<String>
}

impl Query {
    /// Empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clause with a conjunction.
    pub fn push(&mut self, conjunction: Conjunction, condition: Condition) {
        self.clauses.push(Clause {
            conjunction,
            condition
        });
    }

    /// Append an `AND` clause and return the query.
    #[must_use]
    pub fn with(mut self, condition: Condition) -> Self {
        self.push(Conjunction::And, condition);
        self
    }

    /// Append a preload unless it is already requested.
    pub fn add_preload(&mut self, association: impl Into<String>) {
        let association = association.into();
        if !self.preloads.contains(&association) {
            self.preloads.push(association);
        }
    }

    /// Limit that applies, ignoring negative values.
    #[must_use]
    pub fn effective_limit(&self) -> Option<usize> {
        self.limit.and_then(|l| usize::try_from(l).ok())
    }

    /// Offset that applies, ignoring negative values.
    #[must_use]
    pub fn effective_offset(&self) -> usize {
        self.offset.and_then(|o| usize::try_from(o).ok()).unwrap_or(0)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.select.is_empty() {
            f.write_str("SELECT *")?;
        } else {
            write!(f, "SELECT {}", self.select.join(", "))?;
        }
        for join in &self.joins {
            write!(f, " {join}")?;
        }
        for (i, clause) in self.clauses.iter().enumerate() {
            let keyword = match (i, clause.conjunction) {
                (0, Conjunction::Not) => " WHERE NOT",
                (0, _) => " WHERE",
                (_, Conjunction::And) => " AND",
                (_, Conjunction::Or) => " OR",
                (_, Conjunction::Not) => " AND NOT"
            };
            write!(f, "{keyword} {}", clause.condition)?;
        }
        if !self.group_by.is_empty() {
            write!(f, " GROUP BY {}", self.group_by.join(", "))?;
        }
        for (i, condition) in self.having.iter().enumerate() {
            let keyword = if i == 0 { " HAVING" } else { " AND" };
            write!(f, "{keyword} {condition}")?;
        }
        for (i, order) in self.order.iter().enumerate() {
            let keyword = if i == 0 { " ORDER BY" } else { "," };
            write!(f, "{keyword} {} {}", order.column, order.direction.as_sql())?;
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {limit}")?;
        }
        if let Some(offset) = self.offset {
            write!(f, " OFFSET {offset}")?;
        }
        if !self.preloads.is_empty() {
            write!(f, " PRELOAD {}", self.preloads.join(", "))?;
        }
        Ok(())
    }
}
