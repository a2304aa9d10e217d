//! # MySQL Database Adapter
//!
//! An implementation of the [`Db`] port using the [`mysql`] driver crate.
//!
//! ## Responsibilities
//! - Convert generic [`Param`] values into [`mysql::Value`]
//! - Convert [`mysql::Row`] into a generic [`Row`]
//! - Implement `fetch_one`, `fetch_all`, `exec`, and
//!   `exec_returning_last_insert_id` using `mysql::Pool`
//! - Recognise duplicate-key failures so stores can report which unique
//!   constraint was hit ([`duplicate_entry_key`])
//!
//! ## Testing Policy
//! Unit tests cover the pure conversion functions and error inspection.
//! Query execution needs a live MySQL instance and is not exercised here.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use mysql::{prelude::*, Error as MyError, Params, Pool, Value as My};
use tracing::{debug, error};

use crate::db::port::{Db, Param, Row as GRow, Value};

/// MySQL server error code for a unique-key violation.
pub const ER_DUP_ENTRY: u16 = 1062;

fn mysql_err_summary(e: &MyError) -> String {
    match e {
        MyError::MySqlError(me) => format!(
            "code={}, state={}, message={}",
            me.code, me.state, me.message
        ),
        MyError::DriverError(de) => format!("driver={de:?}"),
        MyError::UrlError(ue) => format!("url={ue:?}"),
        MyError::IoError(ioe) => format!("io={ioe}"),
        MyError::CodecError(ce) => format!("codec={ce:?}"),
        MyError::FromValueError(fve) => format!("from_value={fve:?}"),
        MyError::FromRowError(fre) => format!("from_row={fre:?}"),
    }
}

/// Returns the key name of a duplicate-entry failure, if `err` is one.
///
/// MySQL reports `Duplicate entry 'x' for key 'users.users_email'`; the
/// returned value is the unquoted key (`users.users_email`).
pub fn duplicate_entry_key(err: &anyhow::Error) -> Option<&str> {
    match err.downcast_ref::<MyError>()? {
        MyError::MySqlError(me) if me.code == ER_DUP_ENTRY => me
            .message
            .rsplit("for key ")
            .next()
            .map(|k| k.trim().trim_matches('\'')),
        _ => None,
    }
}

/// MySQL implementation of the [`Db`] port.
///
/// - Wraps a connection pool (`mysql::Pool`) for query execution.
/// - Propagates errors as [`anyhow::Error`] with the driver error as source.
#[derive(Clone)]
pub struct MySqlDb {
    pool: Arc<Pool>,
}

impl MySqlDb {
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    /// Converts a single [`Param`] into a [`mysql::Value`].
    ///
    /// Mapping conventions:
    /// - `Str` → `Bytes`
    /// - `DateTime` → `Value::Date` (Y, M, D, H, M, S, μs)
    /// - `Null` → `NULL`
    fn to_mysql_value(p: &Param) -> My {
        match p {
            Param::I64(x) => My::Int(*x),
            Param::U64(x) => My::UInt(*x),
            Param::Str(s) => My::Bytes(s.as_bytes().to_vec()),
            Param::DateTime(dt) => {
                let d = dt.date();
                let t = dt.time();
                My::Date(
                    d.year() as u16,
                    d.month() as u8,
                    d.day() as u8,
                    t.hour() as u8,
                    t.minute() as u8,
                    t.second() as u8,
                    t.nanosecond() / 1_000,
                )
            }
            Param::Null => My::NULL,
        }
    }

    fn to_mysql_params(params_in: &[Param]) -> Params {
        let v: Vec<My> = params_in.iter().map(Self::to_mysql_value).collect();
        Params::Positional(v)
    }

    /// Converts a [`mysql::Row`] into a generic [`Row`].
    ///
    /// Floating point and `TIME` values are stringified.
    fn row_from_mysql(mut r: mysql::Row) -> GRow {
        let names: Vec<String> = r
            .columns_ref()
            .iter()
            .map(|c| c.name_str().to_string())
            .collect();

        let mut out = GRow::default();
        for (idx, name) in names.into_iter().enumerate() {
            let v = r
                .take_opt::<My, _>(idx)
                .unwrap_or(Ok(My::NULL))
                .unwrap_or(My::NULL);

            let vv = match v {
                My::NULL => Value::Null,
                My::Int(i) => Value::I64(i),
                My::UInt(u) => Value::U64(u),
                My::Float(f) => Value::Str(f.to_string()),
                My::Double(f) => Value::Str(f.to_string()),
                My::Bytes(b) => match String::from_utf8(b) {
                    Ok(s) => Value::Str(s),
                    Err(e) => Value::Str(String::from_utf8_lossy(e.as_bytes()).into_owned()),
                },
                My::Date(y, m, d, hh, mm, ss, micro) => {
                    let date = NaiveDate::from_ymd_opt(y as i32, m as u32, d as u32)
                        .unwrap_or_default();
                    let time = NaiveTime::from_hms_micro_opt(hh as u32, mm as u32, ss as u32, micro)
                        .unwrap_or_default();
                    Value::DateTime(NaiveDateTime::new(date, time))
                }
                My::Time(neg, days, hh, mm, ss, micro) => {
                    let sign = if neg { "-" } else { "" };
                    Value::Str(format!(
                        "{sign}{days:03} {hh:02}:{mm:02}:{ss:02}.{micro:06}"
                    ))
                }
            };

            out.insert(name, vv);
        }
        out
    }

    fn conn(&self) -> Result<mysql::PooledConn> {
        self.pool.get_conn().context("get_conn failed")
    }
}

fn log_failure(op: &str, sql: &str, e: &MyError) {
    error!(op, sql, error = %mysql_err_summary(e), "query failed");
}

impl Db for MySqlDb {
    fn fetch_one(&self, sql: &str, params_in: &[Param]) -> Result<Option<GRow>> {
        debug!(sql, params = ?params_in, "fetch_one");
        let mut conn = self.conn()?;

        let res: std::result::Result<Option<mysql::Row>, MyError> =
            conn.exec_first(sql, Self::to_mysql_params(params_in));
        if let Err(ref e) = res {
            log_failure("fetch_one", sql, e);
        }
        let row_opt = res.context("exec_first failed")?;

        Ok(row_opt.map(Self::row_from_mysql))
    }

    fn fetch_all(&self, sql: &str, params_in: &[Param]) -> Result<Vec<GRow>> {
        debug!(sql, params = ?params_in, "fetch_all");
        let mut conn = self.conn()?;

        let res: std::result::Result<Vec<mysql::Row>, MyError> =
            conn.exec(sql, Self::to_mysql_params(params_in));
        if let Err(ref e) = res {
            log_failure("fetch_all", sql, e);
        }
        let rows = res.context("exec (fetch_all) failed")?;
        debug!(rows = rows.len(), "fetch_all done");

        Ok(rows.into_iter().map(Self::row_from_mysql).collect())
    }

    fn exec(&self, sql: &str, params_in: &[Param]) -> Result<u64> {
        debug!(sql, params = ?params_in, "exec");
        let mut conn = self.conn()?;

        let res: std::result::Result<(), MyError> =
            conn.exec_drop(sql, Self::to_mysql_params(params_in));
        if let Err(ref e) = res {
            log_failure("exec", sql, e);
        }
        res.context("exec_drop failed")?;

        Ok(conn.affected_rows())
    }

    fn exec_returning_last_insert_id(&self, sql: &str, params_in: &[Param]) -> Result<u64> {
        debug!(sql, "exec_returning_last_insert_id");
        let mut conn = self.conn()?;

        let res: std::result::Result<(), MyError> =
            conn.exec_drop(sql, Self::to_mysql_params(params_in));
        if let Err(ref e) = res {
            // Duplicate keys are an expected outcome for inserts; the caller maps them.
            if !matches!(e, MyError::MySqlError(me) if me.code == ER_DUP_ENTRY) {
                log_failure("insert", sql, e);
            }
        }
        res.context("exec_drop failed")?;

        match conn.last_insert_id() {
            0 => Err(anyhow::anyhow!("LAST_INSERT_ID() returned 0")),
            id => Ok(id),
        }
    }
}
