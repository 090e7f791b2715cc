//! Simple condition objects: structured predicates for WHERE / ON / HAVING.
//!
//! A [`Condition`] maps columns to [`Predicate`]s, with nested `OR` / `AND`
//! groups. Compiling it yields a single boolean [`Expression`]:
//!
//! ```
//! use sqlchain::qb::Condition;
//!
//! let cond = Condition::new()
//!     .or([Condition::new().is_null("id"), Condition::new().eq("x", 4)]);
//! assert_eq!(cond.compile().as_str(), "(`id` IS NULL OR `x` = 4)");
//! ```
//!
//! Conditions can also be read from JSON in the `$or` / `$and` / `$not` /
//! `$gt` / `$like` / `$in` operator notation with [`Condition::from_json`].

use crate::error::{SqlError, SqlResult};
use crate::qb::expr::{self, Expression, Operand};
use crate::value::Value;

/// The test applied to one column.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// Always satisfied; renders `TRUE` so the key drops out of an AND chain.
    Ignore,
    /// `col IS NULL`
    IsNull,
    /// `col IS NOT NULL`
    IsNotNull,
    /// `col = v`
    Eq(Operand),
    /// `col > v`
    Gt(Operand),
    /// `col LIKE v`
    Like(Operand),
    /// `col NOT LIKE v`
    NotLike(Operand),
    /// `col IN (...)`; an empty list contributes nothing.
    In(Vec<Operand>),
    /// `col NOT IN (...)`; an empty list contributes nothing.
    NotIn(Vec<Operand>),
}

impl Predicate {
    /// Compile this predicate against a column.
    pub fn compile(&self, column: &str) -> Expression {
        let id = Expression::id(column);
        match self {
            Predicate::Ignore => Expression::raw("TRUE"),
            Predicate::IsNull => expr::is_null(id),
            Predicate::IsNotNull => expr::is_not_null(id),
            Predicate::Eq(v) => expr::equals(id, Expression::value_or_expr(v.clone())),
            Predicate::Gt(v) => expr::gt(id, Expression::value_or_expr(v.clone())),
            Predicate::Like(v) => expr::like(id, Expression::value_or_expr(v.clone())),
            Predicate::NotLike(v) => expr::not_like(id, Expression::value_or_expr(v.clone())),
            Predicate::In(items) => {
                expr::in_list(id, items.iter().cloned().map(Expression::value_or_expr))
            }
            Predicate::NotIn(items) => {
                expr::not_in(id, items.iter().cloned().map(Expression::value_or_expr))
            }
        }
    }
}

/// One entry of a condition level.
#[derive(Clone, Debug, PartialEq)]
pub enum ConditionItem {
    Field { column: String, predicate: Predicate },
    Or(Vec<Condition>),
    And(Vec<Condition>),
}

impl ConditionItem {
    fn compile(&self) -> Expression {
        match self {
            ConditionItem::Field { column, predicate } => predicate.compile(column),
            ConditionItem::Or(conds) => expr::or(conds.iter().map(Condition::compile)),
            ConditionItem::And(conds) => expr::and(conds.iter().map(Condition::compile)),
        }
    }
}

/// An ordered set of predicates joined with AND.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Condition {
    items: Vec<ConditionItem>,
}

impl Condition {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ConditionItem] {
        &self.items
    }

    /// Add a predicate for a column.
    pub fn field(mut self, column: impl Into<String>, predicate: Predicate) -> Self {
        self.items.push(ConditionItem::Field {
            column: column.into(),
            predicate,
        });
        self
    }

    /// `col = v`
    pub fn eq(self, column: impl Into<String>, value: impl Into<Operand>) -> Self {
        self.field(column, Predicate::Eq(value.into()))
    }

    /// `col = v` when `Some`, otherwise the key is ignored (`TRUE`).
    pub fn eq_opt<T: Into<Operand>>(self, column: impl Into<String>, value: Option<T>) -> Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self.ignore(column),
        }
    }

    /// Keep the key but make it always true.
    pub fn ignore(self, column: impl Into<String>) -> Self {
        self.field(column, Predicate::Ignore)
    }

    pub fn is_null(self, column: impl Into<String>) -> Self {
        self.field(column, Predicate::IsNull)
    }

    pub fn is_not_null(self, column: impl Into<String>) -> Self {
        self.field(column, Predicate::IsNotNull)
    }

    pub fn gt(self, column: impl Into<String>, value: impl Into<Operand>) -> Self {
        self.field(column, Predicate::Gt(value.into()))
    }

    pub fn like(self, column: impl Into<String>, pattern: impl Into<Operand>) -> Self {
        self.field(column, Predicate::Like(pattern.into()))
    }

    pub fn not_like(self, column: impl Into<String>, pattern: impl Into<Operand>) -> Self {
        self.field(column, Predicate::NotLike(pattern.into()))
    }

    pub fn in_list<I>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.field(column, Predicate::In(values))
    }

    pub fn not_in<I>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.field(column, Predicate::NotIn(values))
    }

    /// Add an OR group of nested conditions.
    pub fn or(mut self, conds: impl IntoIterator<Item = Condition>) -> Self {
        self.items.push(ConditionItem::Or(conds.into_iter().collect()));
        self
    }

    /// Add an AND group of nested conditions.
    pub fn and(mut self, conds: impl IntoIterator<Item = Condition>) -> Self {
        self.items.push(ConditionItem::And(conds.into_iter().collect()));
        self
    }

    /// Compile to a boolean expression.
    ///
    /// Items are joined with AND and parenthesized when more than one
    /// contributes text. An empty condition compiles to the empty fragment.
    pub fn compile(&self) -> Expression {
        expr::and(self.items.iter().map(ConditionItem::compile))
    }

    /// Read a condition from its JSON object form.
    ///
    /// Keys keep their document order. Unknown `$` operators and malformed
    /// operator payloads are rejected instead of being compared for equality.
    ///
    /// ```
    /// use serde_json::json;
    /// use sqlchain::qb::Condition;
    ///
    /// let cond = Condition::from_json(&json!({"id": {"$in": [2, 3]}, "deleted": null}))?;
    /// assert_eq!(cond.compile().as_str(), "(`id` IN (2, 3) AND `deleted` IS NULL)");
    /// # Ok::<(), sqlchain::SqlError>(())
    /// ```
    pub fn from_json(json: &serde_json::Value) -> SqlResult<Self> {
        let object = json
            .as_object()
            .ok_or_else(|| SqlError::condition(format!("expected an object, got {json}")))?;

        let mut cond = Condition::new();
        for (key, value) in object {
            match key.as_str() {
                "$or" => cond.items.push(ConditionItem::Or(nested_conditions(key, value)?)),
                "$and" => cond.items.push(ConditionItem::And(nested_conditions(key, value)?)),
                k if k.starts_with('$') => {
                    return Err(SqlError::condition(format!("unknown condition item '{k}'")));
                }
                column => {
                    let predicate = predicate_from_json(column, value)?;
                    cond = cond.field(column, predicate);
                }
            }
        }
        Ok(cond)
    }
}

fn nested_conditions(key: &str, value: &serde_json::Value) -> SqlResult<Vec<Condition>> {
    let items = value
        .as_array()
        .ok_or_else(|| SqlError::condition(format!("'{key}' expects an array of conditions")))?;
    items.iter().map(Condition::from_json).collect()
}

fn predicate_from_json(column: &str, value: &serde_json::Value) -> SqlResult<Predicate> {
    use serde_json::Value as Json;

    match value {
        Json::Null => Ok(Predicate::IsNull),
        Json::Object(ops) => {
            let (op, payload) = single_operator(column, ops)?;
            match op {
                "$not" => match payload {
                    Json::Null => Ok(Predicate::IsNotNull),
                    Json::Object(inner) => match single_operator(column, inner)? {
                        ("$like", pattern) => Ok(Predicate::NotLike(scalar(column, pattern)?)),
                        ("$in", items) => Ok(Predicate::NotIn(scalar_list(column, items)?)),
                        (other, _) => Err(SqlError::condition(format!(
                            "unsupported operator '$not.{other}' on '{column}'"
                        ))),
                    },
                    _ => Err(SqlError::condition(format!(
                        "'$not' on '{column}' expects null or an operator object"
                    ))),
                },
                "$gt" => Ok(Predicate::Gt(scalar(column, payload)?)),
                "$like" => Ok(Predicate::Like(scalar(column, payload)?)),
                "$in" => Ok(Predicate::In(scalar_list(column, payload)?)),
                other => Err(SqlError::condition(format!(
                    "unknown operator '{other}' on '{column}'"
                ))),
            }
        }
        Json::Array(_) => Err(SqlError::condition(format!(
            "array value for '{column}'; use {{\"$in\": [...]}}"
        ))),
        scalar_value => Ok(Predicate::Eq(Operand::Value(Value::from_json(scalar_value)?))),
    }
}

fn single_operator<'a>(
    column: &str,
    ops: &'a serde_json::Map<String, serde_json::Value>,
) -> SqlResult<(&'a str, &'a serde_json::Value)> {
    let mut iter = ops.iter();
    match (iter.next(), iter.next()) {
        (Some((op, payload)), None) => Ok((op.as_str(), payload)),
        _ => Err(SqlError::condition(format!(
            "operator object for '{column}' must have exactly one key, got {}",
            ops.len()
        ))),
    }
}

fn scalar(column: &str, value: &serde_json::Value) -> SqlResult<Operand> {
    Value::from_json(value)
        .map(Operand::Value)
        .map_err(|e| SqlError::condition(format!("'{column}': {e}")))
}

fn scalar_list(column: &str, value: &serde_json::Value) -> SqlResult<Vec<Operand>> {
    let items = value
        .as_array()
        .ok_or_else(|| SqlError::condition(format!("'$in' on '{column}' expects an array")))?;
    items.iter().map(|item| scalar(column, item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sql(c: &Condition) -> String {
        c.compile().into_string()
    }

    #[test]
    fn single_key_is_not_parenthesized() {
        assert_eq!(sql(&Condition::new().eq("key", 2)), "`key` = 2");
        assert_eq!(sql(&Condition::new().eq("key", "x")), "`key` = 'x'");
    }

    #[test]
    fn multiple_keys_are_anded() {
        let c = Condition::new().eq("id", 2).eq("test", 4);
        assert_eq!(sql(&c), "(`id` = 2 AND `test` = 4)");
    }

    #[test]
    fn null_checks() {
        assert_eq!(sql(&Condition::new().is_null("a")), "`a` IS NULL");
        assert_eq!(sql(&Condition::new().is_not_null("a")), "`a` IS NOT NULL");
    }

    #[test]
    fn ignore_renders_tautology() {
        assert_eq!(sql(&Condition::new().ignore("a")), "TRUE");
        let c = Condition::new().eq_opt("a", None::<i32>).eq("b", 1);
        assert_eq!(sql(&c), "(TRUE AND `b` = 1)");
    }

    #[test]
    fn operators() {
        assert_eq!(sql(&Condition::new().gt("test", 0)), "`test` > 0");
        assert_eq!(sql(&Condition::new().like("test", "%foo%")), "`test` LIKE '%foo%'");
        assert_eq!(sql(&Condition::new().not_like("test", "%foo%")), "`test` NOT LIKE '%foo%'");
        assert_eq!(sql(&Condition::new().in_list("id", [2, 3, 4])), "`id` IN (2, 3, 4)");
        assert_eq!(sql(&Condition::new().not_in("id", [2, 3, 4])), "`id` NOT IN (2, 3, 4)");
    }

    #[test]
    fn empty_in_contributes_nothing() {
        assert_eq!(sql(&Condition::new().in_list("id", Vec::<i32>::new())), "");
        let c = Condition::new()
            .in_list("id", Vec::<i32>::new())
            .eq("x", 1);
        assert_eq!(sql(&c), "`x` = 1");
        let c = Condition::new()
            .eq("a", 1)
            .not_in("id", Vec::<i32>::new())
            .eq("b", 2);
        assert_eq!(sql(&c), "(`a` = 1 AND `b` = 2)");
    }

    #[test]
    fn or_group() {
        let c = Condition::new().or([Condition::new().is_null("id"), Condition::new().eq("x", 4)]);
        assert_eq!(sql(&c), "(`id` IS NULL OR `x` = 4)");
    }

    #[test]
    fn nested_groups() {
        let c = Condition::new().eq("status", "active").or([
            Condition::new().eq("role", "admin"),
            Condition::new().eq("role", "user").gt("reputation", 100),
        ]);
        assert_eq!(
            sql(&c),
            "(`status` = 'active' AND (`role` = 'admin' OR (`role` = 'user' AND `reputation` > 100)))"
        );
    }

    #[test]
    fn expression_operands_pass_through() {
        let c = Condition::new().gt("created_at", expr::now());
        assert_eq!(sql(&c), "`created_at` > now()");
        let sub = Expression::raw("(SELECT id FROM `Other`)");
        let c = Condition::new().in_list("id", [Operand::from(sub)]);
        assert_eq!(sql(&c), "`id` IN ((SELECT id FROM `Other`))");
    }

    #[test]
    fn literal_values_are_escaped() {
        let c = Condition::new().eq("name", "O'Brien");
        assert_eq!(sql(&c), r"`name` = 'O\'Brien'");
    }

    #[test]
    fn empty_condition_compiles_to_empty() {
        assert!(Condition::new().compile().is_empty());
    }

    #[test]
    fn json_matches_builder() {
        let json = json!({
            "$or": [{"id": null}, {"test": {"$not": null}}],
            "name": {"$like": "%a%"},
            "kind": {"$not": {"$like": "tmp%"}},
            "score": {"$gt": 10},
            "tag": {"$in": ["a", "b"]},
            "skip": {"$not": {"$in": [1]}},
            "active": true
        });
        let expected = Condition::new()
            .or([Condition::new().is_null("id"), Condition::new().is_not_null("test")])
            .like("name", "%a%")
            .not_like("kind", "tmp%")
            .gt("score", 10i64)
            .in_list("tag", ["a", "b"])
            .not_in("skip", [1i64])
            .eq("active", true);
        assert_eq!(Condition::from_json(&json).unwrap(), expected);
    }

    #[test]
    fn json_keeps_key_order() {
        let c = Condition::from_json(&json!({"b": 1, "a": 2})).unwrap();
        assert_eq!(sql(&c), "(`b` = 1 AND `a` = 2)");
    }

    #[test]
    fn json_unknown_operator_fails() {
        let err = Condition::from_json(&json!({"a": {"$xyz": 1}})).unwrap_err();
        assert!(matches!(err, SqlError::Condition(_)));
        assert!(Condition::from_json(&json!({"$nor": []})).is_err());
        assert!(Condition::from_json(&json!({"a": {"$not": {"$gt": 1}}})).is_err());
    }

    #[test]
    fn json_malformed_shapes_fail() {
        assert!(Condition::from_json(&json!([1, 2])).is_err());
        assert!(Condition::from_json(&json!({"a": [1, 2]})).is_err());
        assert!(Condition::from_json(&json!({"a": {}})).is_err());
        assert!(Condition::from_json(&json!({"a": {"$gt": 1, "$like": "x"}})).is_err());
        assert!(Condition::from_json(&json!({"a": {"$in": 3}})).is_err());
        assert!(Condition::from_json(&json!({"$or": {"a": 1}})).is_err());
        assert!(Condition::from_json(&json!({"a": {"$gt": [1]}})).is_err());
    }
}
