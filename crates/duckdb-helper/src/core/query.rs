use base64::Engine as _;
use chrono::{DateTime, NaiveDate, NaiveTime};
use duckdb::{
    types::{TimeUnit, ValueRef},
    Connection,
};
use serde_json::Value;

use crate::core::types::{QueryResult, Row};
use crate::error::{AppError, AppResult};

/// 1970-01-01 counted from 0001-01-01 (proleptic Gregorian).
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub fn run_query(conn: &Connection, sql: &str) -> AppResult<QueryResult> {
    if sql.trim().is_empty() {
        return Err(AppError::Query("No statement to execute".into()));
    }

    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;

    // Column names are only known once the statement has run, and `Rows`
    // borrows the statement, so collect values first and name them after.
    let mut raw: Vec<Vec<Value>> = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::new();
        for i in 0.. {
            match row.get_ref(i) {
                Ok(v) => values.push(value_to_json(v)),
                Err(_) => break,
            }
        }
        raw.push(values);
    }
    drop(rows);

    let col_names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
    let out = raw
        .into_iter()
        .map(|values| {
            let mut row = Row::with_capacity(col_names.len());
            for (name, v) in col_names.iter().zip(values) {
                row.insert(name.clone(), v);
            }
            row
        })
        .collect();
    Ok(out)
}

fn value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Bool(b),
        ValueRef::TinyInt(i) => Value::from(i),
        ValueRef::SmallInt(i) => Value::from(i),
        ValueRef::Int(i) => Value::from(i),
        ValueRef::BigInt(i) => Value::from(i),
        ValueRef::HugeInt(i) => match i64::try_from(i) {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(i.to_string()),
        },
        ValueRef::UHugeInt(i) => match u64::try_from(i) {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(i.to_string()),
        },
        ValueRef::UTinyInt(i) => Value::from(i),
        ValueRef::USmallInt(i) => Value::from(i),
        ValueRef::UInt(i) => Value::from(i),
        ValueRef::UBigInt(i) => Value::from(i),
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Decimal(d) => Value::String(d.to_string()),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        // Enum values arrive as a dictionary key; the label is what the user sees.
        ValueRef::Enum(..) => value
            .as_str()
            .map(|label| Value::String(label.to_string()))
            .unwrap_or(Value::Null),
        ValueRef::Blob(b) => Value::String(base64::engine::general_purpose::STANDARD.encode(b)),
        ValueRef::Date32(days) => {
            match NaiveDate::from_num_days_from_ce_opt(days.saturating_add(UNIX_EPOCH_DAYS_FROM_CE)) {
                Some(d) => Value::String(d.format("%Y-%m-%d").to_string()),
                None => Value::String(days.to_string()),
            }
        }
        ValueRef::Time64(unit, t) => {
            let (secs, nanos) = split_micros(to_micros(unit, t));
            match NaiveTime::from_num_seconds_from_midnight_opt(secs as u32, nanos) {
                Some(time) => Value::String(time.format("%H:%M:%S%.f").to_string()),
                None => Value::String(t.to_string()),
            }
        }
        ValueRef::Timestamp(unit, ts) => {
            let (secs, nanos) = split_micros(to_micros(unit, ts));
            match DateTime::from_timestamp(secs, nanos) {
                Some(dt) => Value::String(dt.naive_utc().format("%Y-%m-%d %H:%M:%S%.f").to_string()),
                None => Value::String(ts.to_string()),
            }
        }
        other => Value::String(format!("{other:?}")),
    }
}

fn to_micros(unit: TimeUnit, v: i64) -> i64 {
    match unit {
        TimeUnit::Second => v.saturating_mul(1_000_000),
        TimeUnit::Millisecond => v.saturating_mul(1_000),
        TimeUnit::Microsecond => v,
        TimeUnit::Nanosecond => v / 1_000,
    }
}

fn split_micros(micros: i64) -> (i64, u32) {
    let secs = micros.div_euclid(1_000_000);
    let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
    (secs, nanos)
}
