//! Column type classification.
//!
//! Schema introspection hands us raw type descriptors exactly as the active
//! backend reports them (`"DECIMAL(14,4)"`, `"varchar(255)"`, `"longtext"`,
//! `"enum('a','b')"`). This module reduces those strings to something callers
//! can reason about across backends:
//!
//! - a parsed [`ColumnType`] (lower-cased base keyword, length, scale)
//! - a simplified [`Category`] (`numeric`, `textual`, or the literal base type)
//! - the legal [`NumericRange`] of integer and fixed-point columns
//! - the storage capacity of textual columns
//!
//! Every function here is pure. The keyword tables are built once on first use
//! and never mutated afterwards.
//!
//! # Example
//!
//! ```
//! use lifeguard_params::column_type::{self, Category};
//!
//! let classification = column_type::classify("DECIMAL(14,4)").unwrap();
//! assert_eq!(classification.category, Category::Numeric);
//! assert_eq!(classification.column_type.base_type, "decimal");
//! assert_eq!(classification.column_type.length, Some(14));
//!
//! assert!(column_type::are_column_types_compatible("tinytext", "longtext"));
//! assert!(!column_type::are_column_types_compatible("decimal", "string"));
//! ```

mod numeric;
mod parse;
mod tables;
mod textual;

pub use numeric::{
    max_allowed_value_for_numeric_column, min_allowed_value_for_numeric_column,
    numerical_column_type, NumericRange,
};
pub use parse::{parse_column_length, parse_column_type, ColumnType};
pub use textual::textual_column_storage_capacity;

use std::fmt;

/// Simplified category of a column type
///
/// `Other` carries the lower-cased base type so that two unrecognized types
/// only compare equal when they are literally the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// Integer or decimal family
    Numeric,
    /// Character, string, text or enum family
    Textual,
    /// Anything else, keyed by its own lower-cased name
    Other(String),
}

impl Category {
    /// The simplified type name (`"numeric"`, `"textual"`, or the fallback name)
    pub fn as_str(&self) -> &str {
        match self {
            Category::Numeric => "numeric",
            Category::Textual => "textual",
            Category::Other(name) => name,
        }
    }

    /// Categorize a descriptor
    pub fn of(descriptor: &str) -> Self {
        match parse_column_type(descriptor) {
            Some(column_type) => Self::of_base_type(&column_type.base_type),
            None => {
                log::trace!("Column type {descriptor:?} did not parse; using it verbatim");
                Category::Other(descriptor.to_lowercase())
            }
        }
    }

    pub(crate) fn of_base_type(base_type: &str) -> Self {
        if tables::is_numeric_keyword(base_type) {
            Category::Numeric
        } else if tables::is_textual_keyword(base_type) {
            Category::Textual
        } else {
            Category::Other(base_type.to_string())
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the classifier knows about a single descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Parsed base type, length and scale
    pub column_type: ColumnType,
    /// Simplified category
    pub category: Category,
    /// Legal value range (integer and fixed-point numeric columns only)
    pub numeric_range: Option<NumericRange>,
    /// Character capacity (textual columns only; `None` when unbounded or unknown)
    pub storage_capacity: Option<u64>,
}

impl Classification {
    pub fn is_numeric(&self) -> bool {
        self.category == Category::Numeric
    }

    pub fn is_textual(&self) -> bool {
        self.category == Category::Textual
    }
}

/// Classify a raw type descriptor
///
/// Returns `None` when the descriptor does not start with a type identifier
/// (quoted names, bare parentheses, bare numbers).
#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace"))]
pub fn classify(descriptor: &str) -> Option<Classification> {
    let column_type = parse_column_type(descriptor)?;
    let category = Category::of_base_type(&column_type.base_type);

    let numeric_range = match category {
        Category::Numeric => numeric::range_of(&column_type),
        _ => None,
    };
    let storage_capacity = match category {
        Category::Textual => textual::capacity_of(&column_type, descriptor),
        _ => None,
    };

    Some(Classification {
        column_type,
        category,
        numeric_range,
        storage_capacity,
    })
}

/// Simplified type of a descriptor: `"numeric"`, `"textual"`, or the
/// lower-cased type name itself
pub fn simplified_column_type(descriptor: &str) -> String {
    Category::of(descriptor).as_str().to_string()
}

/// Whether the descriptor belongs to the integer or decimal family
pub fn is_numeric_column_type(descriptor: &str) -> bool {
    Category::of(descriptor) == Category::Numeric
}

/// Whether the descriptor belongs to the character/string/text family
pub fn is_textual_column_type(descriptor: &str) -> bool {
    Category::of(descriptor) == Category::Textual
}

/// Whether values of one column type can be moved into the other
///
/// Both types must simplify to the same category. Unrecognized types are only
/// compatible with the identical type name.
pub fn are_column_types_compatible(a: &str, b: &str) -> bool {
    Category::of(a) == Category::of(b)
}
