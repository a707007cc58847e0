//! Storage capacity of textual columns.

use super::parse::{parse_column_type, ColumnType};
use super::tables;
use once_cell::sync::Lazy;
use regex::Regex;

static ENUM_OPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'((?:[^']|'')*)'").expect("enum option pattern is valid"));

/// Longest option of an `enum('a','bb')` descriptor
fn enum_capacity(descriptor: &str) -> Option<u64> {
    ENUM_OPTION
        .captures_iter(descriptor)
        .filter_map(|captures| captures.get(1))
        // '' is an escaped quote inside an option
        .map(|option| option.as_str().replace("''", "'").chars().count() as u64)
        .max()
}

pub(crate) fn capacity_of(column_type: &ColumnType, descriptor: &str) -> Option<u64> {
    match column_type.base_type.as_str() {
        "char" | "nchar" => Some(column_type.length.unwrap_or(1)),
        "string" | "varchar" | "nvarchar" => Some(column_type.length.unwrap_or(255)),
        "enum" => enum_capacity(descriptor),
        other => tables::text_capacity(other),
    }
}

/// Number of characters a textual column can hold
///
/// Bounded types (`char`, `string`, `varchar`) report their declared length,
/// falling back to the conventional default. The text family reports its
/// capacity tier. Anything that is not textual returns `None`.
///
/// ```
/// use lifeguard_params::column_type::textual_column_storage_capacity;
///
/// assert_eq!(textual_column_storage_capacity("char"), Some(1));
/// assert_eq!(textual_column_storage_capacity("string"), Some(255));
/// assert_eq!(textual_column_storage_capacity("mediumtext"), Some(16_777_215));
/// assert_eq!(textual_column_storage_capacity("money"), None);
/// ```
pub fn textual_column_storage_capacity(descriptor: &str) -> Option<u64> {
    let column_type = parse_column_type(descriptor)?;
    capacity_of(&column_type, descriptor)
}
