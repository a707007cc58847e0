//! Value preparation for the database.
//!
//! Non-scalar values are reduced to scalars before they are used as filter
//! values or bound as query parameters:
//!
//! 1. Dates: normalized to UTC and formatted as `YYYY-MM-DD HH:MM:SS`
//! 2. JSON arrays and objects: compact JSON text
//! 3. Custom values: whatever their [`DbSerializable`] impl produces
//!
//! Scalars pass through unchanged.

use crate::error::ParamError;
use crate::param::{ParamValue, RawValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt;

/// Database date format, always in UTC
pub const DB_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A value that knows its own database text form
pub trait DbSerializable: fmt::Debug + Send + Sync {
    fn db_serialize(&self) -> Result<String, ParamError>;
}

/// A value on its way into the database
#[derive(Debug)]
pub enum DbValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(DateTime<Utc>),
    Json(serde_json::Value),
    Custom(Box<dyn DbSerializable>),
}

impl DbValue {
    /// Wrap any serializable value as JSON
    ///
    /// # Errors
    ///
    /// Returns `ParamError::Serialization` if the value cannot be represented as JSON
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ParamError> {
        Ok(DbValue::Json(serde_json::to_value(value)?))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DbValue {
    fn from(value: DateTime<Tz>) -> Self {
        DbValue::DateTime(value.with_timezone(&Utc))
    }
}

impl From<serde_json::Value> for DbValue {
    fn from(value: serde_json::Value) -> Self {
        DbValue::Json(value)
    }
}

impl From<&str> for DbValue {
    fn from(value: &str) -> Self {
        DbValue::Text(value.to_string())
    }
}

impl From<String> for DbValue {
    fn from(value: String) -> Self {
        DbValue::Text(value)
    }
}

impl From<i64> for DbValue {
    fn from(value: i64) -> Self {
        DbValue::Int(value)
    }
}

impl From<f64> for DbValue {
    fn from(value: f64) -> Self {
        DbValue::Float(value)
    }
}

impl From<bool> for DbValue {
    fn from(value: bool) -> Self {
        DbValue::Bool(value)
    }
}

/// A scalar ready to be bound or used as a filter value
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<PreparedValue> for RawValue {
    fn from(value: PreparedValue) -> Self {
        match value {
            PreparedValue::Null => RawValue::Null,
            PreparedValue::Bool(b) => RawValue::Scalar(ParamValue::Bool(b)),
            PreparedValue::Int(i) => RawValue::Scalar(ParamValue::Int(i)),
            PreparedValue::Float(f) => RawValue::Scalar(ParamValue::Str(f.to_string())),
            PreparedValue::Text(s) => RawValue::Scalar(ParamValue::Str(s)),
        }
    }
}

impl From<PreparedValue> for sea_query::Value {
    fn from(value: PreparedValue) -> Self {
        match value {
            PreparedValue::Null => Option::<String>::None.into(),
            PreparedValue::Bool(b) => b.into(),
            PreparedValue::Int(i) => i.into(),
            PreparedValue::Float(f) => f.into(),
            PreparedValue::Text(s) => s.into(),
        }
    }
}

fn format_date(value: &DateTime<Utc>) -> String {
    value.format(DB_DATE_FORMAT).to_string()
}

fn prepare_json(value: serde_json::Value) -> Result<PreparedValue, ParamError> {
    let prepared = match value {
        serde_json::Value::Null => PreparedValue::Null,
        serde_json::Value::Bool(b) => PreparedValue::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => PreparedValue::Int(i),
            None => n
                .as_f64()
                .map(PreparedValue::Float)
                .unwrap_or_else(|| PreparedValue::Text(n.to_string())),
        },
        serde_json::Value::String(s) => PreparedValue::Text(s),
        compound => PreparedValue::Text(serde_json::to_string(&compound)?),
    };
    Ok(prepared)
}

/// Reduce a value to a database scalar
///
/// # Errors
///
/// Returns `ParamError` if a JSON or custom value fails to serialize
pub fn prepare_value_for_db(value: DbValue) -> Result<PreparedValue, ParamError> {
    match value {
        DbValue::Null => Ok(PreparedValue::Null),
        DbValue::Bool(b) => Ok(PreparedValue::Bool(b)),
        DbValue::Int(i) => Ok(PreparedValue::Int(i)),
        DbValue::Float(f) => Ok(PreparedValue::Float(f)),
        DbValue::Text(s) => Ok(PreparedValue::Text(s)),
        DbValue::DateTime(dt) => Ok(PreparedValue::Text(format_date(&dt))),
        DbValue::Json(json) => prepare_json(json),
        DbValue::Custom(custom) => custom.db_serialize().map(PreparedValue::Text),
    }
}

/// Prepare a batch of values, stopping at the first failure
///
/// # Errors
///
/// Returns the first `ParamError` encountered
pub fn prepare_values_for_db<I>(values: I) -> Result<Vec<PreparedValue>, ParamError>
where
    I: IntoIterator<Item = DbValue>,
{
    values.into_iter().map(prepare_value_for_db).collect()
}

/// Normalize a date string to the UTC database format
///
/// Accepts RFC 3339 (the offset is honored) as well as `YYYY-MM-DD HH:MM:SS`
/// and `YYYY-MM-DD`, which are read as UTC. Returns `None` for anything else.
pub fn prepare_date_for_db(value: &str) -> Option<String> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(format_date(&dt.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, DB_DATE_FORMAT) {
        return Some(format_date(&Utc.from_utc_datetime(&naive)));
    }
    if let Some(naive) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Some(format_date(&Utc.from_utc_datetime(&naive)));
    }

    log::debug!("Unrecognized date value {value:?}");
    None
}
