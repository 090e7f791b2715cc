//! Immutable chainable statement builder.

use crate::qb::clause::{self, Field, JoinKind, OrderItem, Record};
use crate::qb::expr::{Expression, Operand};
use std::fmt;
use std::sync::Arc;

/// The statement verb a [`Query`] was started with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verb {
    Select,
    Insert,
    Update,
    Delete,
}

impl Verb {
    pub fn as_sql(self) -> &'static str {
        match self {
            Verb::Select => "SELECT",
            Verb::Insert => "INSERT",
            Verb::Update => "UPDATE",
            Verb::Delete => "DELETE",
        }
    }
}

/// A statement under construction.
///
/// Every method borrows `self` and returns a new `Query` whose text is the
/// previous text, a space, and one more clause. A partial query is never
/// mutated, so it can be reused freely, e.g. as a sub-query:
///
/// ```
/// use sqlchain::qb::{select, Condition};
///
/// let base = select().all().from("Test");
/// let one = base.where_(Condition::new().eq("id", 2));
/// assert_eq!(base.to_string(), "SELECT * FROM `Test`");
/// assert_eq!(one.to_string(), "SELECT * FROM `Test` WHERE `id` = 2");
///
/// let outer = select().fields(&["a"]).from_subquery_as(&base, "t");
/// assert_eq!(outer.to_string(), "SELECT a FROM (SELECT * FROM `Test`) `t`");
/// ```
///
/// Clause order is not validated; each fragment is well-formed and escaped,
/// placing them sensibly is the caller's job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    verb: Verb,
    sql: Arc<str>,
}

impl Query {
    /// Start a statement with the given verb.
    pub fn new(verb: Verb) -> Self {
        Self {
            verb,
            sql: Arc::from(verb.as_sql()),
        }
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// The accumulated statement text.
    pub fn as_str(&self) -> &str {
        &self.sql
    }

    /// Append a fragment as-is.
    pub fn push(&self, fragment: impl AsRef<str>) -> Self {
        let fragment = fragment.as_ref();
        let mut sql = String::with_capacity(self.sql.len() + 1 + fragment.len());
        sql.push_str(&self.sql);
        sql.push(' ');
        sql.push_str(fragment);
        Self {
            verb: self.verb,
            sql: Arc::from(sql),
        }
    }

    /// `*`
    pub fn all(&self) -> Self {
        self.push(clause::all())
    }

    /// `a, b AS `c``. Accepts anything convertible to [`Field`].
    pub fn fields<F>(&self, fields: &[F]) -> Self
    where
        F: Clone + Into<Field>,
    {
        let fields: Vec<Field> = fields.iter().cloned().map(Into::into).collect();
        self.push(clause::fields(&fields))
    }

    /// `INTO `table``
    pub fn into_table(&self, table: &str) -> Self {
        self.push(clause::into(table))
    }

    /// The UPDATE target table.
    pub fn table(&self, name: &str) -> Self {
        self.push(clause::table(name))
    }

    /// `FROM `table``
    pub fn from(&self, table: &str) -> Self {
        self.push(clause::from(table, None))
    }

    /// `FROM `table` AS `alias``
    pub fn from_as(&self, table: &str, alias: &str) -> Self {
        self.push(clause::from(table, Some(alias)))
    }

    /// `FROM (<sub>)`
    pub fn from_subquery(&self, sub: &impl fmt::Display) -> Self {
        self.push(clause::from_subquery(sub, None))
    }

    /// `FROM (<sub>) `alias``
    pub fn from_subquery_as(&self, sub: &impl fmt::Display, alias: &str) -> Self {
        self.push(clause::from_subquery(sub, Some(alias)))
    }

    /// `JOIN `name``
    pub fn join(&self, name: &str) -> Self {
        self.push(clause::join(name, None, None))
    }

    /// `JOIN `name` `alias``
    pub fn join_as(&self, name: &str, alias: &str) -> Self {
        self.push(clause::join(name, Some(alias), None))
    }

    /// `<KIND> JOIN `name`[ `alias`]`
    pub fn join_kind(&self, kind: JoinKind, name: &str, alias: Option<&str>) -> Self {
        self.push(clause::join(name, alias, Some(kind)))
    }

    /// `ON <cond>`: raw text or a compiled [`Condition`](crate::qb::Condition).
    pub fn on(&self, cond: impl Into<Expression>) -> Self {
        self.push(clause::on(cond))
    }

    /// `WHERE <cond>`
    pub fn where_(&self, cond: impl Into<Expression>) -> Self {
        self.push(clause::where_(cond))
    }

    /// `GROUP BY <expr>`
    pub fn group(&self, expr: impl Into<Expression>) -> Self {
        self.push(clause::group(expr))
    }

    /// `HAVING <cond>`
    pub fn having(&self, cond: impl Into<Expression>) -> Self {
        self.push(clause::having(cond))
    }

    /// `ORDER BY ...`
    pub fn order<O>(&self, items: &[O]) -> Self
    where
        O: Clone + Into<OrderItem>,
    {
        let items: Vec<OrderItem> = items.iter().cloned().map(Into::into).collect();
        self.push(clause::order(&items))
    }

    /// `LIMIT n`
    pub fn limit(&self, count: u64) -> Self {
        self.push(clause::limit(count))
    }

    /// `OFFSET n`
    pub fn offset(&self, count: u64) -> Self {
        self.push(clause::offset(count))
    }

    /// `(cols) VALUES (vals)`
    pub fn values(&self, record: &Record) -> Self {
        self.push(clause::values(record))
    }

    /// `(cols) VALUES (row), (row), ...` using the first record's columns.
    pub fn bulk_values(&self, records: &[Record]) -> Self {
        self.push(clause::bulk_values(records))
    }

    /// `SET col = val, ...`
    pub fn set(&self, record: &Record) -> Self {
        self.push(clause::set(record))
    }

    /// `UNION <sub>`
    pub fn union(&self, sub: &impl fmt::Display) -> Self {
        self.push(clause::union(sub, false))
    }

    /// `UNION ALL <sub>`
    pub fn union_all(&self, sub: &impl fmt::Display) -> Self {
        self.push(clause::union(sub, true))
    }

    /// Wrap the statement as a parenthesized sub-query expression.
    pub fn subquery(&self) -> Expression {
        Expression::raw(format!("({})", self.sql))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.sql
    }
}

impl From<Query> for Expression {
    fn from(q: Query) -> Self {
        Expression::raw(q.sql.to_string())
    }
}

impl From<&Query> for Expression {
    fn from(q: &Query) -> Self {
        Expression::raw(q.sql.to_string())
    }
}

impl From<Query> for Operand {
    fn from(q: Query) -> Self {
        Operand::Expr(q.subquery())
    }
}

impl From<&Query> for Operand {
    fn from(q: &Query) -> Self {
        Operand::Expr(q.subquery())
    }
}
