//! Keyword tables shared by the classifier.
//!
//! Built lazily on first access, read-only afterwards.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Integer and decimal family keywords
static NUMERIC_TYPES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "tinyint",
        "smallint",
        "mediumint",
        "int",
        "integer",
        "bigint",
        "decimal",
        "numeric",
        "float",
        "double",
        "real",
        "money",
    ]
    .into_iter()
    .collect()
});

/// Character and string family keywords; the text family is matched by suffix
static TEXTUAL_TYPES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["char", "nchar", "varchar", "nvarchar", "string", "enum"]
        .into_iter()
        .collect()
});

/// Storage width in bits of each integer family
static INTEGER_BIT_WIDTHS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    HashMap::from([
        ("tinyint", 8),
        ("smallint", 16),
        ("mediumint", 24),
        ("int", 32),
        ("integer", 32),
        ("bigint", 64),
    ])
});

/// Capacity tiers of the unbounded text family
static TEXT_CAPACITIES: Lazy<HashMap<&'static str, u64>> = Lazy::new(|| {
    HashMap::from([
        ("tinytext", 255),
        ("text", 65_535),
        ("mediumtext", 16_777_215),
        ("longtext", 4_294_967_295),
    ])
});

/// Integer families considered when choosing a column for a value range,
/// narrowest first
pub(crate) const INTEGER_FAMILIES: [&str; 3] = ["smallint", "integer", "bigint"];

pub(crate) fn is_numeric_keyword(base_type: &str) -> bool {
    NUMERIC_TYPES.contains(base_type)
}

pub(crate) fn is_textual_keyword(base_type: &str) -> bool {
    TEXTUAL_TYPES.contains(base_type) || base_type.ends_with("text")
}

pub(crate) fn integer_bit_width(base_type: &str) -> Option<u32> {
    INTEGER_BIT_WIDTHS.get(base_type).copied()
}

pub(crate) fn text_capacity(base_type: &str) -> Option<u64> {
    TEXT_CAPACITIES.get(base_type).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_family_matched_by_suffix() {
        assert!(is_textual_keyword("tinytext"));
        assert!(is_textual_keyword("longtext"));
        assert!(is_textual_keyword("text"));
        assert!(!is_textual_keyword("textual"));
    }

    #[test]
    fn test_integer_families_have_bit_widths() {
        for family in INTEGER_FAMILIES {
            assert!(integer_bit_width(family).is_some(), "{family} needs a bit width");
        }
        assert_eq!(integer_bit_width("decimal"), None);
    }

    #[test]
    fn test_keyword_sets_are_disjoint() {
        for keyword in NUMERIC_TYPES.iter() {
            assert!(!is_textual_keyword(keyword), "{keyword} is in both families");
        }
    }
}
