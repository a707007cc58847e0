//! Input shapes accepted by the normalizer.

use std::fmt;

/// A single scalar filter value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn is_blank(&self) -> bool {
        matches!(self, ParamValue::Str(s) if s.trim().is_empty())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<ParamValue> for sea_query::Value {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Str(s) => s.into(),
            ParamValue::Int(i) => i.into(),
            ParamValue::Bool(b) => b.into(),
        }
    }
}

/// Raw filter value as handed over by a query parameter
///
/// Scalars may embed operators (`">= 5"`), negation (`"not foo"`) or several
/// comma-separated values. Lists may start with an explicit combinator
/// (`["or", ...]`, `["and", ...]`, `["not", ...]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Null,
    Scalar(ParamValue),
    List(Vec<RawValue>),
}

impl RawValue {
    /// Flatten into scalars, dropping nulls
    pub(crate) fn into_scalars(self) -> Vec<ParamValue> {
        let mut out = Vec::new();
        self.collect_scalars(&mut out);
        out
    }

    fn collect_scalars(self, out: &mut Vec<ParamValue>) {
        match self {
            RawValue::Null => {}
            RawValue::Scalar(value) => out.push(value),
            RawValue::List(items) => {
                for item in items {
                    item.collect_scalars(out);
                }
            }
        }
    }
}

macro_rules! scalar_raw_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for RawValue {
                fn from(value: $ty) -> Self {
                    RawValue::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_raw_value!(ParamValue, &str, String, i64, i32, bool);

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(values: Vec<T>) -> Self {
        RawValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Null)
    }
}
