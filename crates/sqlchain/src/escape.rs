//! Identifier and literal escaping (MySQL rules).
//!
//! These are the only functions that turn caller-provided names and values
//! into SQL text. Everything in [`crate::qb`] goes through them.
//!
//! - identifiers are backtick-quoted, inner backticks doubled, and `.`
//!   separates qualified parts: `t.id` -> `` `t`.`id` ``
//! - strings are single-quoted with `\0 \b \t \n \r \x1a " ' \` backslash-escaped
//! - numbers and booleans are bare tokens, `NULL` is the keyword
//!
//! # Example
//! ```
//! use sqlchain::escape::{escape_id, escape_str};
//!
//! assert_eq!(escape_id("users.id"), "`users`.`id`");
//! assert_eq!(escape_str("it's"), r"'it\'s'");
//! ```

use crate::value::Value;
use std::fmt::Write;

/// Quote an identifier, treating `.` as a qualifier separator.
pub fn escape_id(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('`');
    for ch in name.chars() {
        match ch {
            '`' => out.push_str("``"),
            '.' => out.push_str("`.`"),
            c => out.push(c),
        }
    }
    out.push('`');
    out
}

/// Quote an identifier as a single part; dots are kept inside the name.
pub fn escape_id_unqualified(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('`');
    for ch in name.chars() {
        if ch == '`' {
            out.push_str("``");
        } else {
            out.push(ch);
        }
    }
    out.push('`');
    out
}

/// Quote a string literal.
pub fn escape_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\0' => out.push_str("\\0"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{1a}' => out.push_str("\\Z"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Render a value as a SQL literal token.
pub fn escape_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Int(i) => i.to_string(),
        Value::UInt(u) => u.to_string(),
        // NaN and infinities have no literal form.
        Value::Float(f) if !f.is_finite() => "NULL".to_string(),
        Value::Float(f) => f.to_string(),
        Value::Text(s) => escape_str(s),
        Value::Bytes(bytes) => {
            let mut out = String::with_capacity(bytes.len() * 2 + 3);
            out.push_str("X'");
            for b in bytes {
                let _ = write!(out, "{b:02x}");
            }
            out.push('\'');
            out
        }
        Value::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
        Value::DateTime(dt) => format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S%.3f")),
    }
}
