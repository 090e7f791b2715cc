//! Query builder: expressions, condition objects, clause operators and the
//! chainable [`Query`].
//!
//! # Usage
//!
//! ```
//! use sqlchain::qb::{self, Condition, Direction, OrderItem, Record};
//!
//! // SELECT
//! let q = qb::select()
//!     .fields(&["a", "b"])
//!     .from("T")
//!     .where_(Condition::new().eq("id", 2));
//! assert_eq!(q.to_string(), "SELECT a, b FROM `T` WHERE `id` = 2");
//!
//! // INSERT
//! let q = qb::insert()
//!     .into_table("users")
//!     .values(&Record::new().set("name", "alice").set("age", 30));
//! assert_eq!(q.to_string(), "INSERT INTO `users` (`name`, `age`) VALUES ('alice', 30)");
//!
//! // UPDATE
//! let q = qb::update()
//!     .table("users")
//!     .set(&Record::new().set("status", "inactive"))
//!     .where_(Condition::new().eq("id", 7));
//! assert_eq!(q.to_string(), "UPDATE `users` SET `status` = 'inactive' WHERE `id` = 7");
//!
//! // DELETE
//! let q = qb::delete()
//!     .from("sessions")
//!     .where_(Condition::new().is_null("user_id"))
//!     .order(&[OrderItem::from(("created_at", Direction::Asc))])
//!     .limit(100);
//! assert_eq!(
//!     q.to_string(),
//!     "DELETE FROM `sessions` WHERE `user_id` IS NULL ORDER BY `created_at` ASC LIMIT 100"
//! );
//! ```

pub mod clause;
mod condition;
pub mod expr;
mod query;

pub use clause::{Direction, Field, JoinKind, OrderItem, Record};
pub use condition::{Condition, ConditionItem, Predicate};
pub use expr::{Expression, Operand};
pub use query::{Query, Verb};

/// Start a SELECT statement.
pub fn select() -> Query {
    Query::new(Verb::Select)
}

/// Start an INSERT statement.
pub fn insert() -> Query {
    Query::new(Verb::Insert)
}

/// Start an UPDATE statement.
pub fn update() -> Query {
    Query::new(Verb::Update)
}

/// Start a DELETE statement.
pub fn delete() -> Query {
    Query::new(Verb::Delete)
}
