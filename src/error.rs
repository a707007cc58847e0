//! Error type for the fallible edges of the crate.
//!
//! Normalization and classification are total and never return errors. Only
//! value preparation (serializing values before they reach the normalizer)
//! can fail.

use std::fmt;

/// `lifeguard-params` error type
#[derive(Debug)]
pub enum ParamError {
    /// A value could not be serialized to JSON text
    Serialization(String),
    /// A custom serializable value refused to serialize
    Custom(String),
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::Serialization(s) => {
                write!(f, "Serialization error: {s}")
            }
            ParamError::Custom(s) => {
                write!(f, "Custom value error: {s}")
            }
        }
    }
}

impl std::error::Error for ParamError {}

impl From<serde_json::Error> for ParamError {
    fn from(err: serde_json::Error) -> Self {
        ParamError::Serialization(err.to_string())
    }
}
