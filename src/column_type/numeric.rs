//! Numeric ranges and numeric column type selection.

use super::parse::{parse_column_type, ColumnType};
use super::tables;

/// Inclusive legal range of a numeric column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumericRange {
    pub min: i64,
    pub max: i64,
}

impl NumericRange {
    /// Signed range of an integer stored in `bits` bits
    fn signed(bits: u32) -> Self {
        let half = 1i128 << (bits - 1);
        // bits never exceeds 64, so both endpoints fit in i64
        Self {
            min: (-half) as i64,
            max: (half - 1) as i64,
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Range of an integer family by bit-width convention
///
/// The parenthesized length of integer types is a display width, not a
/// storage width, and is ignored here.
fn integer_range(base_type: &str) -> Option<NumericRange> {
    tables::integer_bit_width(base_type).map(NumericRange::signed)
}

/// Range of a parsed numeric column
///
/// Integer families use their bit width. Fixed-point `decimal`/`numeric`
/// columns allow `precision - scale` integer digits. Floating point and money
/// columns have no exact range.
pub(crate) fn range_of(column_type: &ColumnType) -> Option<NumericRange> {
    if let Some(range) = integer_range(&column_type.base_type) {
        return Some(range);
    }

    match column_type.base_type.as_str() {
        "decimal" | "numeric" => {
            let precision = column_type.length?;
            let integer_digits = precision.saturating_sub(column_type.scale.unwrap_or(0));
            let bound = 10i64.checked_pow(u32::try_from(integer_digits).ok()?)? - 1;
            Some(NumericRange {
                min: -bound,
                max: bound,
            })
        }
        _ => None,
    }
}

/// Largest value an integer column can hold, or `None` for other types
///
/// ```
/// use lifeguard_params::column_type::max_allowed_value_for_numeric_column;
///
/// assert_eq!(max_allowed_value_for_numeric_column("integer(9)"), Some(2_147_483_647));
/// assert_eq!(max_allowed_value_for_numeric_column("stuff(9)"), None);
/// ```
pub fn max_allowed_value_for_numeric_column(descriptor: &str) -> Option<i64> {
    let column_type = parse_column_type(descriptor)?;
    integer_range(&column_type.base_type).map(|range| range.max)
}

/// Smallest value an integer column can hold, or `None` for other types
pub fn min_allowed_value_for_numeric_column(descriptor: &str) -> Option<i64> {
    let column_type = parse_column_type(descriptor)?;
    integer_range(&column_type.base_type).map(|range| range.min)
}

fn digit_count(mut magnitude: u64) -> u32 {
    let mut digits = 0;
    while magnitude > 0 {
        digits += 1;
        magnitude /= 10;
    }
    digits
}

/// Pick the narrowest column type able to store every value in `[min, max]`
///
/// Missing endpoints default to the signed 32-bit range. The parenthesized
/// length is the number of decimal digits of the largest magnitude. When
/// `decimals` is non-zero a `decimal(precision,scale)` descriptor is returned
/// instead.
///
/// # Example
///
/// ```
/// use lifeguard_params::column_type::numerical_column_type;
///
/// assert_eq!(numerical_column_type(Some(0), Some(5), None), "smallint(1)");
/// assert_eq!(numerical_column_type(Some(0), Some(1_231_224), None), "integer(7)");
/// assert_eq!(numerical_column_type(Some(123), Some(1233), Some(2)), "decimal(6,2)");
/// assert_eq!(numerical_column_type(None, None, None), "integer(10)");
/// ```
pub fn numerical_column_type(min: Option<i64>, max: Option<i64>, decimals: Option<u32>) -> String {
    let default_range = NumericRange::signed(32);
    let min = min.unwrap_or(default_range.min);
    let max = max.unwrap_or(default_range.max);
    let (low, high) = if min <= max { (min, max) } else { (max, min) };

    let length = digit_count(low.unsigned_abs().max(high.unsigned_abs()));

    let decimals = decimals.unwrap_or(0);
    if decimals > 0 {
        return format!("decimal({},{})", length.saturating_add(decimals), decimals);
    }

    let family = tables::INTEGER_FAMILIES
        .into_iter()
        .find(|family| {
            integer_range(family)
                .map(|range| range.contains(low) && range.contains(high))
                .unwrap_or(false)
        })
        // bigint covers every i64, so the search cannot come up empty
        .unwrap_or("bigint");

    format!("{family}({length})")
}
