//! Immutable SQL fragments and the combinators that build them.
//!
//! An [`Expression`] is only ever created from:
//! - another expression (text reused verbatim),
//! - a [`Condition`] (compiled by the condition compiler),
//! - a value explicitly escaped with [`Expression::value`] / [`Expression::id`],
//! - text the caller marks as already-SQL with [`Expression::raw`].
//!
//! The free functions in this module combine expressions without ever
//! touching untrusted input directly.

use crate::escape;
use crate::qb::condition::Condition;
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use std::fmt;

/// A fragment of already-valid SQL text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Expression(String);

impl Expression {
    /// Wrap text that is already SQL. The caller is responsible for its safety.
    pub fn raw(sql: impl Into<String>) -> Self {
        Expression(sql.into())
    }

    /// An escaped identifier (`` `name` ``).
    pub fn id(name: &str) -> Self {
        Expression(escape::escape_id(name))
    }

    /// An escaped literal value.
    pub fn value(value: impl Into<Value>) -> Self {
        Expression(escape::escape_value(&value.into()))
    }

    /// Keep an expression operand as-is, escape a value operand.
    pub fn value_or_expr(operand: impl Into<Operand>) -> Self {
        match operand.into() {
            Operand::Value(v) => Expression(escape::escape_value(&v)),
            Operand::Expr(e) => e,
        }
    }

    /// The empty fragment. It contributes nothing to `and`/`or` chains.
    pub fn empty() -> Self {
        Expression(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Expression {
    fn from(sql: &str) -> Self {
        Expression::raw(sql)
    }
}

impl From<String> for Expression {
    fn from(sql: String) -> Self {
        Expression::raw(sql)
    }
}

impl From<&Expression> for Expression {
    fn from(e: &Expression) -> Self {
        e.clone()
    }
}

impl From<Condition> for Expression {
    fn from(c: Condition) -> Self {
        c.compile()
    }
}

impl From<&Condition> for Expression {
    fn from(c: &Condition) -> Self {
        c.compile()
    }
}

/// Either a literal to escape or a prebuilt fragment to pass through.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Value(Value),
    Expr(Expression),
}

impl From<Expression> for Operand {
    fn from(e: Expression) -> Self {
        Operand::Expr(e)
    }
}

impl From<&Expression> for Operand {
    fn from(e: &Expression) -> Self {
        Operand::Expr(e.clone())
    }
}

macro_rules! impl_operand_from_value {
    ($($t:ty),* $(,)?) => {
        $(impl From<$t> for Operand {
            fn from(v: $t) -> Self {
                Operand::Value(v.into())
            }
        })*
    };
}

impl_operand_from_value!(
    Value, i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64, bool, &str, String, &String,
    Vec<u8>, NaiveDate, NaiveDateTime, uuid::Uuid,
);

impl<Tz: TimeZone> From<DateTime<Tz>> for Operand {
    fn from(v: DateTime<Tz>) -> Self {
        Operand::Value(v.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        Operand::Value(v.into())
    }
}

// ==================== combinators ====================

/// `a = b`
pub fn equals(a: impl Into<Expression>, b: impl Into<Expression>) -> Expression {
    Expression(format!("{} = {}", a.into(), b.into()))
}

/// `a IS NULL`
pub fn is_null(a: impl Into<Expression>) -> Expression {
    Expression(format!("{} IS NULL", a.into()))
}

/// `a IS NOT NULL`
pub fn is_not_null(a: impl Into<Expression>) -> Expression {
    Expression(format!("{} IS NOT NULL", a.into()))
}

/// `a > b`
pub fn gt(a: impl Into<Expression>, b: impl Into<Expression>) -> Expression {
    Expression(format!("{} > {}", a.into(), b.into()))
}

/// `a LIKE b`
pub fn like(a: impl Into<Expression>, b: impl Into<Expression>) -> Expression {
    Expression(format!("{} LIKE {}", a.into(), b.into()))
}

/// `a NOT LIKE b`
pub fn not_like(a: impl Into<Expression>, b: impl Into<Expression>) -> Expression {
    Expression(format!("{} NOT LIKE {}", a.into(), b.into()))
}

/// `now()`
pub fn now() -> Expression {
    Expression::raw("now()")
}

/// `COUNT(a)`
pub fn count(a: impl Into<Expression>) -> Expression {
    Expression(format!("COUNT({})", a.into()))
}

/// `SUM(a)`
pub fn sum(a: impl Into<Expression>) -> Expression {
    Expression(format!("SUM({})", a.into()))
}

/// Join operands with AND; parenthesized only when more than one remains.
pub fn and<I>(operands: I) -> Expression
where
    I: IntoIterator,
    I::Item: Into<Expression>,
{
    join_group(operands, " AND ")
}

/// Join operands with OR; parenthesized only when more than one remains.
pub fn or<I>(operands: I) -> Expression
where
    I: IntoIterator,
    I::Item: Into<Expression>,
{
    join_group(operands, " OR ")
}

fn join_group<I>(operands: I, sep: &str) -> Expression
where
    I: IntoIterator,
    I::Item: Into<Expression>,
{
    let parts: Vec<Expression> = operands
        .into_iter()
        .map(Into::<Expression>::into)
        .filter(|e| !e.is_empty())
        .collect();

    match parts.len() {
        0 => Expression::empty(),
        1 => parts.into_iter().next().unwrap_or_default(),
        _ => {
            let body: Vec<&str> = parts.iter().map(Expression::as_str).collect();
            Expression(format!("({})", body.join(sep)))
        }
    }
}

/// `a IN (v, ...)`; an empty list yields the empty fragment.
pub fn in_list<I>(a: impl Into<Expression>, operands: I) -> Expression
where
    I: IntoIterator,
    I::Item: Into<Expression>,
{
    list_predicate(a.into(), "IN", operands)
}

/// `a NOT IN (v, ...)`; an empty list yields the empty fragment.
pub fn not_in<I>(a: impl Into<Expression>, operands: I) -> Expression
where
    I: IntoIterator,
    I::Item: Into<Expression>,
{
    list_predicate(a.into(), "NOT IN", operands)
}

fn list_predicate<I>(a: Expression, op: &str, operands: I) -> Expression
where
    I: IntoIterator,
    I::Item: Into<Expression>,
{
    let items: Vec<String> = operands
        .into_iter()
        .map(|e| Into::<Expression>::into(e).0)
        .collect();
    if items.is_empty() {
        return Expression::empty();
    }
    Expression(format!("{} {} ({})", a, op, items.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_is_verbatim() {
        assert_eq!(Expression::raw("t.id = T.id").as_str(), "t.id = T.id");
        let e = Expression::raw("COUNT(*)");
        assert_eq!(Expression::from(&e), e);
    }

    #[test]
    fn value_or_expr_escapes_only_values() {
        assert_eq!(Expression::value_or_expr("x").as_str(), "'x'");
        assert_eq!(Expression::value_or_expr(now()).as_str(), "now()");
    }

    #[test]
    fn comparisons() {
        let id = Expression::id("a");
        assert_eq!(equals(&id, Expression::value(1)).as_str(), "`a` = 1");
        assert_eq!(is_null(&id).as_str(), "`a` IS NULL");
        assert_eq!(is_not_null(&id).as_str(), "`a` IS NOT NULL");
        assert_eq!(gt(&id, Expression::value(0)).as_str(), "`a` > 0");
        assert_eq!(like(&id, Expression::value("%x%")).as_str(), "`a` LIKE '%x%'");
        assert_eq!(not_like(&id, Expression::value("%x%")).as_str(), "`a` NOT LIKE '%x%'");
    }

    #[test]
    fn aggregates() {
        assert_eq!(count("id").as_str(), "COUNT(id)");
        assert_eq!(sum(Expression::id("total")).as_str(), "SUM(`total`)");
        assert_eq!(now().as_str(), "now()");
    }

    #[test]
    fn and_single_operand_is_bare() {
        assert_eq!(and(["`a` = 1"]).as_str(), "`a` = 1");
    }

    #[test]
    fn and_or_parenthesize_multiple() {
        assert_eq!(and(["`a` = 1", "`b` = 2"]).as_str(), "(`a` = 1 AND `b` = 2)");
        assert_eq!(or(["`a` = 1", "`b` = 2"]).as_str(), "(`a` = 1 OR `b` = 2)");
    }

    #[test]
    fn and_drops_empty_fragments() {
        let e = and([Expression::raw("`a` = 1"), Expression::empty(), Expression::raw("`b` = 2")]);
        assert_eq!(e.as_str(), "(`a` = 1 AND `b` = 2)");
        let only = and([Expression::empty(), Expression::raw("`a` = 1")]);
        assert_eq!(only.as_str(), "`a` = 1");
        assert!(or(Vec::<Expression>::new()).is_empty());
    }

    #[test]
    fn in_lists() {
        let items = [1, 2, 3].map(Expression::value);
        assert_eq!(in_list(Expression::id("id"), items.clone()).as_str(), "`id` IN (1, 2, 3)");
        assert_eq!(not_in(Expression::id("id"), items).as_str(), "`id` NOT IN (1, 2, 3)");
    }

    #[test]
    fn empty_in_lists_are_empty() {
        assert!(in_list(Expression::id("id"), Vec::<Expression>::new()).is_empty());
        assert!(not_in(Expression::id("id"), Vec::<Expression>::new()).is_empty());
    }
}
