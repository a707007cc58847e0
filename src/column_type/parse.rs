//! Descriptor grammar: `identifier [ "(" digits [ "," digits ] ")" ]`.
//!
//! Only the leading identifier is required. Trailing modifiers reported by
//! some backends (`unsigned`, `with time zone`, enum option lists) are
//! ignored, but a length is only read from a well-formed numeric argument
//! group that directly follows the identifier.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static DESCRIPTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9_]*)(?:\(\s*(\d+)\s*(?:,\s*(\d+)\s*)?\))?")
        .expect("column type descriptor pattern is valid")
});

/// Parsed column type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnType {
    /// Lower-cased type keyword (e.g. "integer", "decimal", "string")
    pub base_type: String,
    /// First numeric argument (length, display width or precision)
    pub length: Option<u64>,
    /// Second numeric argument (scale), only present alongside a length
    pub scale: Option<u64>,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.length, self.scale) {
            (Some(length), Some(scale)) => write!(f, "{}({},{})", self.base_type, length, scale),
            (Some(length), None) => write!(f, "{}({})", self.base_type, length),
            _ => f.write_str(&self.base_type),
        }
    }
}

/// Parse a descriptor into its base type and arguments
///
/// # Example
///
/// ```
/// use lifeguard_params::column_type::parse_column_type;
///
/// let parsed = parse_column_type("STRING(255)").unwrap();
/// assert_eq!(parsed.base_type, "string");
/// assert_eq!(parsed.length, Some(255));
///
/// assert_eq!(parse_column_type("\"invalid\""), None);
/// ```
pub fn parse_column_type(descriptor: &str) -> Option<ColumnType> {
    let captures = DESCRIPTOR.captures(descriptor)?;
    let base_type = captures.get(1)?.as_str().to_lowercase();

    // Arguments too large for u64 are treated as absent rather than truncated
    let length = captures
        .get(2)
        .and_then(|m| m.as_str().parse::<u64>().ok());
    let scale = match length {
        Some(_) => captures.get(3).and_then(|m| m.as_str().parse::<u64>().ok()),
        None => None,
    };

    Some(ColumnType {
        base_type,
        length,
        scale,
    })
}

/// Extract only the first numeric argument of a descriptor
pub fn parse_column_length(descriptor: &str) -> Option<u64> {
    parse_column_type(descriptor).and_then(|column_type| column_type.length)
}
