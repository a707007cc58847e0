//! Boolean coercion for boolean-typed columns.

use super::value::ParamValue;
use crate::column_type::parse_column_type;
use std::collections::BTreeSet;

/// Which declared column types receive boolean coercion
///
/// Backends disagree on how booleans are stored (`boolean`, `bool`,
/// `tinyint(1)`, `bit`), so the set of eligible base types is configurable.
/// The default covers `boolean` and `bool`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanPolicy {
    base_types: BTreeSet<String>,
}

impl Default for BooleanPolicy {
    fn default() -> Self {
        Self::new(["boolean", "bool"])
    }
}

impl BooleanPolicy {
    pub fn new<I, S>(base_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            base_types: base_types
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// A policy that never coerces
    pub fn disabled() -> Self {
        Self {
            base_types: BTreeSet::new(),
        }
    }

    /// Add an eligible base type
    pub fn with_type(mut self, base_type: &str) -> Self {
        self.base_types.insert(base_type.trim().to_lowercase());
        self
    }

    pub fn base_types(&self) -> impl Iterator<Item = &str> {
        self.base_types.iter().map(String::as_str)
    }

    /// Whether a declared column type gets boolean coercion
    pub fn is_eligible(&self, declared_type: &str) -> bool {
        parse_column_type(declared_type)
            .map(|column_type| self.base_types.contains(&column_type.base_type))
            .unwrap_or(false)
    }
}

/// Truthiness of a single (already un-negated) value
///
/// `":empty:"` is the empty-value sentinel and counts as false.
pub(crate) fn coerce(value: &ParamValue) -> bool {
    match value {
        ParamValue::Bool(b) => *b,
        ParamValue::Int(i) => *i != 0,
        ParamValue::Str(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "0" | "false" | "no" | "off" | ":empty:"
        ),
    }
}
