//! Query builder scenarios through the public API.

use serde_json::json;
use sqlchain::{Condition, Direction, Expression, OrderItem, Record, SqlError, expr};
use sqlchain::{delete, insert, select, update};

#[test]
fn select_fields_where() {
    let q = select()
        .fields(&["a", "b"])
        .from("T")
        .where_(Condition::new().eq("id", 2));
    assert_eq!(q.to_string(), "SELECT a, b FROM `T` WHERE `id` = 2");
}

#[test]
fn select_join_on_raw_text() {
    let q = select().all().from("T").join_as("T2", "t").on("t.id = T.id");
    assert_eq!(q.to_string(), "SELECT * FROM `T` JOIN `T2` `t` ON t.id = T.id");
}

#[test]
fn condition_from_json_document() {
    let cond = Condition::from_json(&json!({
        "$or": [{ "id": null }, { "x": 4 }]
    }))
    .unwrap();
    assert_eq!(cond.compile().as_str(), "(`id` IS NULL OR `x` = 4)");

    let cond = Condition::from_json(&json!({
        "status": "active",
        "deleted_at": null,
        "email": { "$not": { "$like": "%@spam.test" } },
        "role": { "$not": { "$in": ["guest"] } },
        "score": { "$gt": 10 },
        "verified_at": { "$not": null }
    }))
    .unwrap();
    assert_eq!(
        select().all().from("users").where_(cond).to_string(),
        "SELECT * FROM `users` WHERE (`status` = 'active' AND `deleted_at` IS NULL \
         AND `email` NOT LIKE '%@spam.test' AND `role` NOT IN ('guest') AND `score` > 10 \
         AND `verified_at` IS NOT NULL)"
    );
}

#[test]
fn condition_from_json_empty_in_contributes_nothing() {
    let cond = Condition::from_json(&json!({ "id": { "$in": [] } })).unwrap();
    assert_eq!(cond.compile().as_str(), "");

    let cond = Condition::from_json(&json!({ "id": { "$in": [] }, "x": 1 })).unwrap();
    assert_eq!(cond.compile().as_str(), "`x` = 1");
}

#[test]
fn condition_from_json_rejects_unknown_operators() {
    for doc in [
        json!({ "a": { "$xyz": 1 } }),
        json!({ "a": { "$gt": 1, "$like": "x" } }),
        json!({ "$nor": [] }),
        json!({ "a": [1, 2] }),
        json!({ "a": { "$not": { "$gt": 1 } } }),
        json!({ "a": { "$in": 3 } }),
        json!({ "a": { "$like": { "nested": true } } }),
        json!([1, 2]),
    ] {
        let err = Condition::from_json(&doc).unwrap_err();
        assert!(matches!(err, SqlError::Condition(_)), "{doc}: {err}");
    }
}

#[test]
fn empty_condition_in_where_is_tautology() {
    let q = select().all().from("T").where_(Condition::new());
    assert_eq!(q.to_string(), "SELECT * FROM `T` WHERE TRUE");
}

#[test]
fn values_column_list_keeps_insertion_order() {
    let record = Record::from_json(&json!({ "b": 1, "a": "x", "c": null })).unwrap();
    assert_eq!(record.columns().collect::<Vec<_>>(), ["b", "a", "c"]);
    assert_eq!(
        insert().into_table("t").values(&record).to_string(),
        "INSERT INTO `t` (`b`, `a`, `c`) VALUES (1, 'x', NULL)"
    );
}

#[test]
fn record_from_json_rejects_nested_values() {
    let err = Record::from_json(&json!({ "a": [1] })).unwrap_err();
    assert!(matches!(err, SqlError::Condition(_) | SqlError::Decode { .. }), "{err}");
}

#[test]
fn sub_query_reuse() {
    let active = select()
        .fields(&["id"])
        .from("users")
        .where_(Condition::new().eq("active", true));

    let orders = select()
        .all()
        .from("orders")
        .where_(Condition::new().in_list("user_id", [&active]));
    let counted = select()
        .fields(&[expr::count("*")])
        .from_subquery_as(&active, "a");

    assert_eq!(
        orders.to_string(),
        "SELECT * FROM `orders` WHERE `user_id` IN ((SELECT id FROM `users` WHERE `active` = true))"
    );
    assert_eq!(
        counted.to_string(),
        "SELECT COUNT(*) FROM (SELECT id FROM `users` WHERE `active` = true) `a`"
    );
    assert_eq!(active.to_string(), "SELECT id FROM `users` WHERE `active` = true");
}

#[test]
fn expression_combinators() {
    let e = expr::or([
        expr::equals(Expression::id("a"), Expression::value(1)),
        expr::and([expr::is_null(Expression::id("b")), Expression::empty()]),
    ]);
    assert_eq!(e.as_str(), "(`a` = 1 OR `b` IS NULL)");
    assert_eq!(expr::in_list(Expression::id("a"), Vec::<Expression>::new()).as_str(), "");
}

#[test]
fn update_and_delete_statements() {
    let q = update()
        .table("users")
        .set(&Record::new().set("name", "O'Brien").set("deleted_at", None::<i64>))
        .where_(Condition::new().eq("id", 3));
    assert_eq!(
        q.to_string(),
        r"UPDATE `users` SET `name` = 'O\'Brien', `deleted_at` = NULL WHERE `id` = 3"
    );

    let q = delete()
        .from("sessions")
        .where_(Condition::new().gt("expires", 100))
        .order(&[OrderItem::from(("expires", Direction::Desc))])
        .limit(50);
    assert_eq!(
        q.to_string(),
        "DELETE FROM `sessions` WHERE `expires` > 100 ORDER BY `expires` DESC LIMIT 50"
    );
}
