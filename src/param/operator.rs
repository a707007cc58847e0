//! Comparison operators and the prefix tokenizer.
//!
//! A value may start with an operator token (`">= 5"`, `"!=foo"`,
//! `"not bar"`). Tokens are tried longest first, so `"<="` never reads as
//! `"<"` followed by `"=5"`.

use std::fmt;

/// Comparison operator of a single condition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    NotLike,
    /// Operator passed through verbatim to the query builder
    Custom(String),
}

/// Prefix tokens, longest first
const PREFIX_TOKENS: [(&str, Operator); 8] = [
    ("not ", Operator::Ne),
    ("!=", Operator::Ne),
    ("<>", Operator::Ne),
    ("<=", Operator::Lte),
    (">=", Operator::Gte),
    ("<", Operator::Lt),
    (">", Operator::Gt),
    ("=", Operator::Eq),
];

impl Operator {
    /// Parse an operator name
    ///
    /// `"not"` and `"<>"` are synonyms for `"!="`; an empty string is `"="`.
    /// Anything else that is a plausible SQL operator becomes
    /// [`Operator::Custom`]; text outside that alphabet falls back to `"="`.
    pub fn parse(operator: &str) -> Self {
        let trimmed = operator.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "=" => Operator::Eq,
            "!=" | "<>" | "not" => Operator::Ne,
            "<" => Operator::Lt,
            "<=" => Operator::Lte,
            ">" => Operator::Gt,
            ">=" => Operator::Gte,
            "like" => Operator::Like,
            "not like" => Operator::NotLike,
            _ if is_safe_custom(trimmed) => {
                log::trace!("Passing custom operator {trimmed:?} through unchanged");
                Operator::Custom(trimmed.to_string())
            }
            _ => {
                log::debug!("Rejected operator {trimmed:?}, comparing with = instead");
                Operator::Eq
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Like => "like",
            Operator::NotLike => "not like",
            Operator::Custom(op) => op,
        }
    }

    /// Logical inverse, if one is known
    pub fn inverse(&self) -> Option<Operator> {
        let inverse = match self {
            Operator::Eq => Operator::Ne,
            Operator::Ne => Operator::Eq,
            Operator::Lt => Operator::Gte,
            Operator::Gte => Operator::Lt,
            Operator::Gt => Operator::Lte,
            Operator::Lte => Operator::Gt,
            Operator::Like => Operator::NotLike,
            Operator::NotLike => Operator::Like,
            Operator::Custom(_) => return None,
        };
        Some(inverse)
    }

    /// Pattern-matching counterpart of an (in)equality operator
    pub(crate) fn to_like(&self) -> Option<Operator> {
        match self {
            Operator::Eq => Some(Operator::Like),
            Operator::Ne => Some(Operator::NotLike),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether custom operator text can be pasted into SQL as is
///
/// Symbol runs (`@>`, `~*`, `||`) and keyword runs (`ilike`, `similar to`)
/// are accepted. Placeholders (`$`, `?`), quotes, separators and comment
/// openers are not.
pub(crate) fn is_safe_custom(operator: &str) -> bool {
    const SYMBOLS: &str = "~!@#%^&*+-=<>|/";
    !operator.is_empty()
        && !operator.contains("--")
        && !operator.contains("/*")
        && operator
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ' || SYMBOLS.contains(c))
}

/// Split a leading operator token off a value
///
/// Returns the operator and the trimmed remainder, or `None` when the value
/// does not start with an operator.
pub fn split_operator(value: &str) -> Option<(Operator, &str)> {
    let value = value.trim_start();
    PREFIX_TOKENS.iter().find_map(|(token, operator)| {
        value
            .get(..token.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(token))
            .map(|_| (operator.clone(), value[token.len()..].trim()))
    })
}
