//! # Database Port (Synchronous)
//!
//! Defines an abstract database interface (`Db`) and supporting types
//! used by adapters such as the MySQL implementation.
//!
//! - [`Param`]: Represents SQL parameters.
//! - [`Value`] / [`Row`]: Generic owned data representations.
//! - [`Db`]: Defines minimal operations (`fetch_one`, `fetch_all`, `exec`, etc.).
//!
//! The port is blocking; async callers move work onto the blocking pool
//! with `tokio::task::spawn_blocking`.
//!
//! # Example
//! ```rust,ignore
//! use postboard::db::port::{Db, Param};
//! use postboard::params;
//!
//! let id = db.exec_returning_last_insert_id(
//!     "INSERT INTO users (email, username, password_hash) VALUES (?, ?, ?)",
//!     &params!["a@b.com", "alice", hash.as_str()],
//! )?;
//! ```
use std::collections::HashMap;

use anyhow::{bail, Result};
use chrono::NaiveDateTime;

/// SQL parameter types passed to a query.
///
/// - `Str(&str)` holds a borrowed string reference.
/// - `Null` represents an SQL NULL.
/// - `DateTime` uses [`NaiveDateTime`] (no time zone).
#[derive(Debug)]
pub enum Param<'a> {
    I64(i64),
    U64(u64),
    Str(&'a str),
    DateTime(NaiveDateTime),
    Null,
}

/// Generic owned database value used for row mapping.
#[derive(Debug, Clone)]
pub enum Value {
    I64(i64),
    U64(u64),
    Str(String),
    DateTime(NaiveDateTime),
    Null,
}

/// Represents a single database row (column name → value map).
#[derive(Debug, Clone, Default)]
pub struct Row {
    cols: HashMap<String, Value>,
}

// ------------------------------
// Param conversions (From impls)
// ------------------------------

impl<'a> From<i64> for Param<'a> {
    fn from(x: i64) -> Self {
        Param::I64(x)
    }
}

impl<'a> From<u64> for Param<'a> {
    fn from(x: u64) -> Self {
        Param::U64(x)
    }
}

impl<'a> From<&'a str> for Param<'a> {
    fn from(x: &'a str) -> Self {
        Param::Str(x)
    }
}

impl<'a> From<Option<&'a str>> for Param<'a> {
    fn from(x: Option<&'a str>) -> Self {
        match x {
            Some(s) => Param::Str(s),
            None => Param::Null,
        }
    }
}

impl<'a> From<NaiveDateTime> for Param<'a> {
    fn from(x: NaiveDateTime) -> Self {
        Param::DateTime(x)
    }
}

// ------------------------------------
// params! macro
// ------------------------------------

/// Macro to build a `Vec<Param>` for SQL queries.
///
/// # Example
/// ```rust
/// use postboard::db::port::Param;
/// use postboard::params;
///
/// let note: Option<&str> = None; // becomes NULL
/// let ps = params![42u64, "Alice", note];
///
/// assert!(matches!(ps[0], Param::U64(42)));
/// assert!(matches!(ps[1], Param::Str("Alice")));
/// assert!(matches!(ps[2], Param::Null));
/// ```
#[macro_export]
macro_rules! params {
    ($($x:expr),* $(,)?) => {{
        let mut v = Vec::<$crate::db::port::Param>::new();
        $( v.push($crate::db::port::Param::from($x)); )*
        v
    }};
}

// ------------------------------
// Row helper methods
// ------------------------------

impl Row {
    /// Inserts a new column (used internally by DB adapters).
    pub fn insert(&mut self, key: impl Into<String>, val: Value) {
        self.cols.insert(key.into(), val);
    }

    /// Returns an `i64` (accepts `u64` values that fit).
    pub fn get_i64(&self, key: &str) -> Result<i64> {
        match self.cols.get(key) {
            Some(Value::I64(v)) => Ok(*v),
            Some(Value::U64(v)) if *v <= i64::MAX as u64 => Ok(*v as i64),
            _ => bail!("column `{key}` is not I64"),
        }
    }

    /// Returns a `String` (only for `Value::Str`).
    pub fn get_string(&self, key: &str) -> Result<String> {
        match self.cols.get(key) {
            Some(Value::Str(s)) => Ok(s.clone()),
            _ => bail!("column `{key}` is not String"),
        }
    }

    /// Returns a `String`, mapping SQL `NULL` to an empty string.
    pub fn get_string_or_empty(&self, key: &str) -> Result<String> {
        match self.cols.get(key) {
            Some(Value::Str(s)) => Ok(s.clone()),
            Some(Value::Null) => Ok(String::new()),
            Some(_) => bail!("column `{key}` is not String/NULL"),
            None => bail!("column `{key}` not found"),
        }
    }

    /// Returns a [`NaiveDateTime`].
    pub fn get_datetime(&self, key: &str) -> Result<NaiveDateTime> {
        match self.cols.get(key) {
            Some(Value::DateTime(dt)) => Ok(*dt),
            _ => bail!("column `{key}` is not DateTime"),
        }
    }
}

/// Database abstraction (synchronous).
pub trait Db: Send + Sync + 'static {
    fn fetch_one(&self, sql: &str, params: &[Param]) -> Result<Option<Row>>;

    fn fetch_all(&self, sql: &str, params: &[Param]) -> Result<Vec<Row>>;

    /// Execute a write operation (`INSERT`, `UPDATE`, `DELETE`).
    ///
    /// Returns affected row count.
    fn exec(&self, sql: &str, params: &[Param]) -> Result<u64>;

    /// Execute and return `LAST_INSERT_ID()` (for inserts).
    fn exec_returning_last_insert_id(&self, sql: &str, params: &[Param]) -> Result<u64>;
}
