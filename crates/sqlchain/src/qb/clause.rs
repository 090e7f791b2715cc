//! Clause operators.
//!
//! Each function renders one clause fragment in isolation. [`Query`] chains
//! them; they are public so fragments can also be assembled by hand.
//!
//! [`Query`]: crate::qb::Query

use crate::error::{SqlError, SqlResult};
use crate::escape::escape_id_unqualified;
use crate::qb::expr::{Expression, Operand};
use crate::value::Value;
use std::fmt;

/// A column in a SELECT list.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    /// Rendered verbatim (`a`, `COUNT(*)`, `t.*`).
    Plain(Expression),
    /// `expr AS `alias``
    Aliased(Expression, String),
}

impl Field {
    pub fn aliased(expr: impl Into<Expression>, alias: impl Into<String>) -> Self {
        Field::Aliased(expr.into(), alias.into())
    }

    fn render(&self) -> String {
        match self {
            Field::Plain(e) => e.to_string(),
            Field::Aliased(e, alias) => format!("{} AS {}", e, escape_id_unqualified(alias)),
        }
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::Plain(Expression::raw(s))
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Field::Plain(Expression::raw(s))
    }
}

impl From<Expression> for Field {
    fn from(e: Expression) -> Self {
        Field::Plain(e)
    }
}

impl<E: Into<Expression>> From<(E, &str)> for Field {
    fn from((e, alias): (E, &str)) -> Self {
        Field::Aliased(e.into(), alias.to_string())
    }
}

/// Join flavour. `None` at the call site renders a bare `JOIN`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinKind {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Cross => "CROSS",
        }
    }
}

/// Sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// One ORDER BY entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderItem {
    pub column: String,
    pub direction: Option<Direction>,
}

impl OrderItem {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Some(Direction::Asc),
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Some(Direction::Desc),
        }
    }

    fn render(&self) -> String {
        match self.direction {
            Some(dir) => format!("{} {}", Expression::id(&self.column), dir.as_sql()),
            None => Expression::id(&self.column).into_string(),
        }
    }
}

impl From<&str> for OrderItem {
    fn from(column: &str) -> Self {
        Self {
            column: column.to_string(),
            direction: None,
        }
    }
}

impl From<(&str, Direction)> for OrderItem {
    fn from((column, direction): (&str, Direction)) -> Self {
        Self {
            column: column.to_string(),
            direction: Some(direction),
        }
    }
}

/// An ordered column -> value mapping for INSERT and UPDATE.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Operand)>,
}

impl Record {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a column. Insertion order is rendering order.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Operand>) -> Self {
        self.entries.push((column.into(), value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    /// Read a record from a JSON object, keeping key order.
    pub fn from_json(json: &serde_json::Value) -> SqlResult<Self> {
        let object = json
            .as_object()
            .ok_or_else(|| SqlError::condition(format!("expected an object, got {json}")))?;
        object
            .iter()
            .map(|(k, v)| -> SqlResult<(String, Operand)> {
                Ok((k.clone(), Operand::Value(Value::from_json(v)?)))
            })
            .collect()
    }

    fn column_list(&self) -> String {
        self.entries
            .iter()
            .map(|(c, _)| Expression::id(c).into_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn value_list(&self) -> String {
        self.entries
            .iter()
            .map(|(_, v)| Expression::value_or_expr(v.clone()).into_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<K: Into<String>, V: Into<Operand>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// Wrapping an empty condition keeps WHERE / HAVING / ON syntactically valid.
fn condition_text(cond: Expression) -> Expression {
    if cond.is_empty() {
        Expression::raw("TRUE")
    } else {
        cond
    }
}

/// `*`
pub fn all() -> String {
    "*".to_string()
}

/// `a, b AS `c`, ...`
pub fn fields(fields: &[Field]) -> String {
    fields.iter().map(Field::render).collect::<Vec<_>>().join(", ")
}

/// `INTO `table``
pub fn into(table: &str) -> String {
    format!("INTO {}", Expression::id(table))
}

/// `` `table` `` (UPDATE target)
pub fn table(name: &str) -> String {
    Expression::id(name).into_string()
}

/// `FROM `table`[ AS `alias`]`
pub fn from(table: &str, alias: Option<&str>) -> String {
    match alias {
        Some(alias) => format!(
            "FROM {} AS {}",
            Expression::id(table),
            escape_id_unqualified(alias)
        ),
        None => format!("FROM {}", Expression::id(table)),
    }
}

/// `FROM (<sub>)[ `alias`]`
pub fn from_subquery(sub: &impl fmt::Display, alias: Option<&str>) -> String {
    match alias {
        Some(alias) => format!("FROM ({}) {}", sub, escape_id_unqualified(alias)),
        None => format!("FROM ({sub})"),
    }
}

/// `[KIND ]JOIN `name`[ `alias`]`
pub fn join(name: &str, alias: Option<&str>, kind: Option<JoinKind>) -> String {
    let mut out = String::new();
    if let Some(kind) = kind {
        out.push_str(kind.as_sql());
        out.push(' ');
    }
    out.push_str("JOIN ");
    out.push_str(Expression::id(name).as_str());
    if let Some(alias) = alias {
        out.push(' ');
        out.push_str(&escape_id_unqualified(alias));
    }
    out
}

/// `ON <cond>`
pub fn on(cond: impl Into<Expression>) -> String {
    format!("ON {}", condition_text(cond.into()))
}

/// `WHERE <cond>`
pub fn where_(cond: impl Into<Expression>) -> String {
    format!("WHERE {}", condition_text(cond.into()))
}

/// `GROUP BY <expr>`
pub fn group(expr: impl Into<Expression>) -> String {
    format!("GROUP BY {}", expr.into())
}

/// `HAVING <cond>`
pub fn having(cond: impl Into<Expression>) -> String {
    format!("HAVING {}", condition_text(cond.into()))
}

/// `ORDER BY `a`, `b` DESC`
pub fn order(items: &[OrderItem]) -> String {
    let rendered: Vec<String> = items.iter().map(OrderItem::render).collect();
    format!("ORDER BY {}", rendered.join(", "))
}

/// `LIMIT n`
pub fn limit(count: u64) -> String {
    format!("LIMIT {}", Expression::value(count))
}

/// `OFFSET n`
pub fn offset(count: u64) -> String {
    format!("OFFSET {}", Expression::value(count))
}

/// `(`a`, `b`) VALUES (1, 'x')`
pub fn values(record: &Record) -> String {
    format!("({}) VALUES ({})", record.column_list(), record.value_list())
}

/// `(`a`, `b`) VALUES (1, 'x'), (2, 'y')`
///
/// The first record's columns are the column list; the remaining records
/// must carry the same keys in the same order.
pub fn bulk_values(records: &[Record]) -> String {
    let columns = records.first().map(Record::column_list).unwrap_or_default();
    let rows: Vec<String> = if records.is_empty() {
        vec!["()".to_string()]
    } else {
        records
            .iter()
            .map(|r| format!("({})", r.value_list()))
            .collect()
    };
    format!("({}) VALUES {}", columns, rows.join(", "))
}

/// `SET `a` = 1, `b` = 'x'`
pub fn set(record: &Record) -> String {
    let assignments: Vec<String> = record
        .entries
        .iter()
        .map(|(c, v)| format!("{} = {}", Expression::id(c), Expression::value_or_expr(v.clone())))
        .collect();
    format!("SET {}", assignments.join(", "))
}

/// `UNION [ALL] <sub>`
pub fn union(sub: &impl fmt::Display, all: bool) -> String {
    if all {
        format!("UNION ALL {sub}")
    } else {
        format!("UNION {sub}")
    }
}
