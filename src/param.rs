//! Query parameter normalization.
//!
//! Turns loosely-typed, human-friendly filter values into a [`Condition`]
//! tree that a query builder can render for any backend:
//!
//! | raw value                  | condition                                  |
//! |----------------------------|--------------------------------------------|
//! | `"bar"`                    | `foo = 'bar'`                              |
//! | `"a, b"` / `["a", "b"]`    | `foo = 'a' OR foo = 'b'`                   |
//! | `["or", "a", "b"]`         | `foo IN ('a', 'b')`                        |
//! | `["not", "a", "b"]`        | `foo NOT IN ('a', 'b')`                    |
//! | `"not a, b"`               | `foo != 'a' AND foo != 'b'`                |
//! | `">= 5"`                   | `foo >= '5'`                               |
//! | `"bar*"`                   | `foo LIKE 'bar%'`                          |
//! | `null` / `""` / `[]`       | no constraint                              |
//!
//! Columns declared with a boolean type (see [`BooleanPolicy`]) coerce a
//! single value to `true`/`false` instead.
//!
//! # Example
//!
//! ```
//! use lifeguard_params::param::{normalize, Condition, Operator};
//!
//! let condition = normalize("foo", "not field_1, field_2", "=", false, None);
//! assert_eq!(
//!     condition,
//!     Condition::And(vec![
//!         Condition::raw(Operator::Ne, "foo", "field_1"),
//!         Condition::raw(Operator::Ne, "foo", "field_2"),
//!     ])
//! );
//!
//! assert!(normalize("foo", "", "=", false, None).is_empty());
//! ```

mod boolean;
mod condition;
mod escape;
mod operator;
mod value;

pub use boolean::BooleanPolicy;
pub use condition::Condition;
pub use escape::{escape, unescape};
pub use operator::{split_operator, Operator};
pub(crate) use operator::is_safe_custom;
pub use value::{ParamValue, RawValue};

use crate::config::ParamsConfig;
use once_cell::sync::Lazy;

static DEFAULT_NORMALIZER: Lazy<Normalizer> = Lazy::new(Normalizer::default);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Glue {
    Or,
    And,
}

/// A raw value after the single discrimination step
#[derive(Debug)]
struct Parsed {
    glue: Glue,
    negate: bool,
    /// Came from a list with an explicit combinator, values are literal
    explicit: bool,
    values: Vec<ParamValue>,
}

fn strip_not_prefix(value: &str) -> Option<&str> {
    value
        .get(..4)
        .filter(|prefix| prefix.eq_ignore_ascii_case("not "))
        .map(|_| value[4..].trim())
}

/// Resolve the input shape: split strings on commas, peel off combinators
/// and a leading negation. Returns `None` for "no constraint".
fn discriminate(raw: RawValue) -> Option<Parsed> {
    let (mut values, from_list) = match raw {
        RawValue::Null => return None,
        RawValue::Scalar(ParamValue::Str(s)) => (
            escape::split_unescaped(&s)
                .into_iter()
                .map(ParamValue::Str)
                .collect::<Vec<_>>(),
            false,
        ),
        RawValue::Scalar(value) => (vec![value], false),
        list @ RawValue::List(_) => (list.into_scalars(), true),
    };
    values.retain(|value| !value.is_blank());

    let mut parsed = Parsed {
        glue: Glue::Or,
        negate: false,
        explicit: false,
        values: Vec::new(),
    };

    let combinator = match values.first() {
        Some(ParamValue::Str(first)) => Some(first.trim().to_ascii_lowercase()),
        _ => None,
    };
    let consumed = match combinator.as_deref() {
        Some("or") => true,
        Some("and") => {
            parsed.glue = Glue::And;
            true
        }
        Some("not") => {
            parsed.negate = true;
            true
        }
        _ => false,
    };

    if consumed {
        values.remove(0);
        parsed.explicit = from_list;
    } else if let Some(ParamValue::Str(first)) = values.first_mut() {
        // "not a, b" negates the whole list
        if let Some(rest) = strip_not_prefix(first).map(str::to_string) {
            *first = rest;
            parsed.negate = true;
        }
    }

    values.retain(|value| !value.is_blank());
    if values.is_empty() {
        return None;
    }

    parsed.values = values;
    Some(parsed)
}

/// Work out the operator of a single value and strip it
fn resolve(value: ParamValue, default_operator: &Operator) -> (Operator, ParamValue) {
    let text = match value {
        ParamValue::Str(text) => text,
        other => return (default_operator.clone(), other),
    };

    let (operator, rest) = match operator::split_operator(&text) {
        Some((operator, rest)) => (operator, rest),
        None => (default_operator.clone(), text.trim()),
    };

    let like = operator
        .to_like()
        .and_then(|like| escape::wildcard_pattern(rest).map(|pattern| (like, pattern)));

    match like {
        Some((like, pattern)) => (like, ParamValue::Str(pattern)),
        None => {
            let literal = unescape(rest);
            (operator, ParamValue::Str(literal))
        }
    }
}

/// Normalizes filter parameters into [`Condition`] trees
///
/// Holds the [`BooleanPolicy`]; otherwise stateless and cheap to share
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    boolean_policy: BooleanPolicy,
}

impl Normalizer {
    pub fn new(boolean_policy: BooleanPolicy) -> Self {
        Self { boolean_policy }
    }

    pub fn from_config(config: &ParamsConfig) -> Self {
        Self::new(config.boolean_policy())
    }

    pub fn boolean_policy(&self) -> &BooleanPolicy {
        &self.boolean_policy
    }

    /// Normalize one filter parameter
    ///
    /// # Arguments
    ///
    /// * `column` - Column the condition applies to
    /// * `raw` - The raw value (scalar, comma-separated string or list)
    /// * `default_operator` - Operator for values without an operator prefix (usually `"="`)
    /// * `case_insensitive` - Ask the query builder to compare case-folded values
    /// * `declared_type` - Column type descriptor, enables boolean coercion
    ///
    /// Never fails. Values that denote "no constraint" yield [`Condition::Empty`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "trace", skip_all, fields(column = %column))
    )]
    pub fn normalize(
        &self,
        column: &str,
        raw: impl Into<RawValue>,
        default_operator: &str,
        case_insensitive: bool,
        declared_type: Option<&str>,
    ) -> Condition {
        let Some(parsed) = discriminate(raw.into()) else {
            return Condition::Empty;
        };

        if let Some(declared_type) = declared_type {
            if parsed.values.len() == 1 && self.boolean_policy.is_eligible(declared_type) {
                let value = boolean::coerce(&parsed.values[0]) != parsed.negate;
                log::trace!("Coerced {column} filter to boolean {value}");
                return Condition::Equals {
                    column: column.to_string(),
                    value: ParamValue::Bool(value),
                    negated: false,
                    case_insensitive,
                };
            }
        }

        let default_operator = Operator::parse(default_operator);
        let pairs: Vec<(Operator, ParamValue)> = parsed
            .values
            .into_iter()
            .map(|value| resolve(value, &default_operator))
            .collect();

        // Explicit lists of plain values become a single IN
        if parsed.explicit
            && parsed.glue == Glue::Or
            && pairs.iter().all(|(operator, _)| *operator == Operator::Eq)
        {
            let values: Vec<ParamValue> = pairs.into_iter().map(|(_, value)| value).collect();
            return match <[ParamValue; 1]>::try_from(values) {
                Ok([value]) => Condition::Equals {
                    column: column.to_string(),
                    value,
                    negated: parsed.negate,
                    case_insensitive,
                },
                Err(values) => Condition::In {
                    column: column.to_string(),
                    values,
                    negated: parsed.negate,
                    case_insensitive,
                },
            };
        }

        let leaves: Vec<Condition> = pairs
            .into_iter()
            .map(|(operator, value)| Condition::compare(column, operator, value, case_insensitive))
            .collect();

        let condition = match <[Condition; 1]>::try_from(leaves) {
            Ok([leaf]) => leaf,
            Err(leaves) => match parsed.glue {
                Glue::Or => Condition::Or(leaves),
                Glue::And => Condition::And(leaves),
            },
        };

        if parsed.negate {
            condition.negate()
        } else {
            condition
        }
    }
}

/// Normalize one filter parameter with the default [`BooleanPolicy`]
///
/// See [`Normalizer::normalize`].
pub fn normalize(
    column: &str,
    raw: impl Into<RawValue>,
    default_operator: &str,
    case_insensitive: bool,
    declared_type: Option<&str>,
) -> Condition {
    DEFAULT_NORMALIZER.normalize(column, raw, default_operator, case_insensitive, declared_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multi() -> Condition {
        Condition::Or(vec![
            Condition::equals("foo", "field_1"),
            Condition::equals("foo", "field_2"),
        ])
    }

    fn multi_not() -> Condition {
        Condition::Or(vec![
            Condition::raw(Operator::Ne, "foo", "field_1"),
            Condition::raw(Operator::Ne, "foo", "field_2"),
        ])
    }

    #[test]
    fn test_normalize_basic() {
        assert_eq!(
            normalize("foo", "bar", "=", false, None),
            Condition::equals("foo", "bar")
        );
    }

    #[test]
    fn test_normalize_multi_list() {
        assert_eq!(normalize("foo", vec!["field_1", "field_2"], "=", false, None), multi());
    }

    #[test]
    fn test_normalize_multi_split_by_comma() {
        assert_eq!(normalize("foo", "field_1, field_2", "=", false, None), multi());
    }

    #[test]
    fn test_normalize_multi_not_default_operator() {
        assert_eq!(normalize("foo", "field_1, field_2", "not", false, None), multi_not());
        assert_eq!(normalize("foo", "field_1, field_2", "!=", false, None), multi_not());
    }

    #[test]
    fn test_normalize_custom_operator() {
        let raaa = Operator::Custom("raaa".to_string());
        assert_eq!(
            normalize("foo", "field_1", "raaa", false, None),
            Condition::raw(raaa.clone(), "foo", "field_1")
        );
        assert_eq!(
            normalize("foo", "field_1, field_2", "raaa", false, None),
            Condition::Or(vec![
                Condition::raw(raaa.clone(), "foo", "field_1"),
                Condition::raw(raaa, "foo", "field_2"),
            ])
        );
    }

    #[test]
    fn test_normalize_empty_values() {
        assert!(normalize("foo", "not", "=", false, None).is_empty());
        assert!(normalize("foo", Vec::<&str>::new(), "=", false, None).is_empty());
        assert!(normalize("", "", "=", false, None).is_empty());
        assert!(normalize("foo", RawValue::Null, "=", false, None).is_empty());
        assert!(normalize("foo", "", "=", false, None).is_empty());
        assert!(normalize("foo", " , ", "=", false, None).is_empty());
        assert!(normalize("foo", vec!["or"], "=", false, None).is_empty());
    }

    #[test]
    fn test_normalize_explicit_or() {
        assert_eq!(
            normalize("foo", vec!["or", "field_1", "field_2"], "=", false, None),
            Condition::is_in("foo", ["field_1", "field_2"])
        );
    }

    #[test]
    fn test_normalize_explicit_not() {
        assert_eq!(
            normalize("foo", vec!["not", "field_1", "field_2"], "=", false, None),
            Condition::is_in("foo", ["field_1", "field_2"]).negate()
        );
    }

    #[test]
    fn test_normalize_explicit_list_is_not_split() {
        assert_eq!(
            normalize("foo", vec!["or", "a, b", "c"], "=", false, None),
            Condition::is_in("foo", ["a, b", "c"])
        );
    }

    #[test]
    fn test_normalize_explicit_and_with_operators() {
        assert_eq!(
            normalize("n", vec!["and", ">= 1", "< 10"], "=", false, None),
            Condition::And(vec![
                Condition::raw(Operator::Gte, "n", "1"),
                Condition::raw(Operator::Lt, "n", "10"),
            ])
        );
    }

    #[test]
    fn test_normalize_not_prefix_de_morgan() {
        assert_eq!(
            normalize("foo", "not field_1, field_2", "=", false, None),
            Condition::And(vec![
                Condition::raw(Operator::Ne, "foo", "field_1"),
                Condition::raw(Operator::Ne, "foo", "field_2"),
            ])
        );
    }

    #[test]
    fn test_normalize_not_inverts_embedded_operators() {
        assert_eq!(
            normalize("n", "not >5, <1", "=", false, None),
            Condition::And(vec![
                Condition::raw(Operator::Lte, "n", "5"),
                Condition::raw(Operator::Gte, "n", "1"),
            ])
        );
    }

    #[test]
    fn test_normalize_bare_not_element() {
        assert_eq!(
            normalize("foo", "not, a, b", "=", false, None),
            Condition::And(vec![
                Condition::raw(Operator::Ne, "foo", "a"),
                Condition::raw(Operator::Ne, "foo", "b"),
            ])
        );
    }

    #[test]
    fn test_normalize_bare_or_element() {
        assert_eq!(normalize("foo", "or, a, b", "=", false, None), multi_of("foo", ["a", "b"]));
    }

    #[test]
    fn test_normalize_single_not() {
        assert_eq!(
            normalize("foo", "not bar", "=", false, None),
            Condition::raw(Operator::Ne, "foo", "bar")
        );
    }

    #[test]
    fn test_normalize_embedded_operators() {
        assert_eq!(
            normalize("n", ">= 5", "=", false, None),
            Condition::raw(Operator::Gte, "n", "5")
        );
        assert_eq!(
            normalize("n", "<>5, =6", "=", false, None),
            Condition::Or(vec![
                Condition::raw(Operator::Ne, "n", "5"),
                Condition::equals("n", "6"),
            ])
        );
    }

    #[test]
    fn test_normalize_non_string_scalars() {
        assert_eq!(normalize("id", 5, "=", false, None), Condition::equals("id", 5i64));
        assert_eq!(
            normalize("id", vec![RawValue::from(1), RawValue::from(2)], "=", false, None),
            Condition::Or(vec![Condition::equals("id", 1i64), Condition::equals("id", 2i64)])
        );
    }

    #[test]
    fn test_normalize_wildcards() {
        assert_eq!(
            normalize("title", "foo*", "=", false, None),
            Condition::raw(Operator::Like, "title", "foo%")
        );
        assert_eq!(
            normalize("title", "not *foo", "=", false, None),
            Condition::raw(Operator::NotLike, "title", "%foo")
        );
        assert_eq!(
            normalize("title", "5\\*", "=", false, None),
            Condition::equals("title", "5*")
        );
    }

    #[test]
    fn test_normalize_escaped_comma() {
        let value = format!("{}, other", escape("a,b"));
        assert_eq!(
            normalize("foo", value.as_str(), "=", false, None),
            Condition::Or(vec![Condition::equals("foo", "a,b"), Condition::equals("foo", "other")])
        );
    }

    #[test]
    fn test_normalize_case_insensitive_flag() {
        assert_eq!(
            normalize("email", "A@B.C", "=", true, None),
            Condition::equals("email", "A@B.C").with_case_insensitive(true)
        );
        assert_eq!(
            normalize("email", "a, b", "=", true, None),
            multi_of("email", ["a", "b"]).with_case_insensitive(true)
        );
    }

    fn multi_of<const N: usize>(column: &str, values: [&str; N]) -> Condition {
        Condition::Or(values.into_iter().map(|v| Condition::equals(column, v)).collect())
    }

    #[test]
    fn test_normalize_boolean_true() {
        let truthy = [
            RawValue::from(true),
            RawValue::from(1),
            RawValue::from("1"),
            RawValue::from("not 0"),
            RawValue::from("not :empty:"),
        ];
        for raw in truthy {
            assert_eq!(
                normalize("foo", raw.clone(), "=", false, Some("boolean")),
                Condition::equals("foo", true),
                "{raw:?} should coerce to true"
            );
        }
    }

    #[test]
    fn test_normalize_boolean_false() {
        let falsy = [
            RawValue::from(false),
            RawValue::from(0),
            RawValue::from("0"),
            RawValue::from("not 1"),
            RawValue::from(":empty:"),
        ];
        for raw in falsy {
            assert_eq!(
                normalize("foo", raw.clone(), "=", false, Some("boolean")),
                Condition::equals("foo", false),
                "{raw:?} should coerce to false"
            );
        }
    }

    #[test]
    fn test_normalize_boolean_needs_single_value() {
        assert_eq!(
            normalize("foo", "1, 0", "=", false, Some("boolean")),
            multi_of("foo", ["1", "0"])
        );
    }

    #[test]
    fn test_normalize_decimal_is_not_boolean() {
        assert_eq!(
            normalize("price", "not :empty:", "=", false, Some("decimal(14,4)")),
            Condition::raw(Operator::Ne, "price", ":empty:")
        );
    }

    #[test]
    fn test_normalizer_with_custom_policy() {
        let normalizer = Normalizer::new(BooleanPolicy::default().with_type("tinyint"));
        assert_eq!(
            normalizer.normalize("active", "not 0", "=", false, Some("tinyint(1)")),
            Condition::equals("active", true)
        );
        assert_eq!(
            normalize("active", "not 0", "=", false, Some("tinyint(1)")),
            Condition::raw(Operator::Ne, "active", "0")
        );
    }
}
