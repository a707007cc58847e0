//! Escaping of the characters that carry meaning inside a parameter string.
//!
//! Commas separate values and a leading or trailing asterisk is a wildcard. A
//! backslash makes the following character literal.

const ESCAPE: char = '\\';
const SEPARATOR: char = ',';
const WILDCARD: char = '*';

/// Escape commas, asterisks and backslashes so the value is taken literally
///
/// ```
/// use lifeguard_params::escape;
///
/// assert_eq!(escape("*"), "\\*");
/// assert_eq!(escape(","), "\\,");
/// assert_eq!(escape(",*"), "\\,\\*");
/// ```
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, ESCAPE | SEPARATOR | WILDCARD) {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}

/// Remove one level of backslash escaping
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            // A trailing lone backslash stays as it is
            out.push(chars.next().unwrap_or(ESCAPE));
        } else {
            out.push(c);
        }
    }
    out
}

/// Split on unescaped commas
///
/// Pieces keep their escapes so later stages can still tell an escaped
/// asterisk from a wildcard. Pieces are trimmed and empty ones dropped.
pub(crate) fn split_unescaped(value: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            ESCAPE => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            SEPARATOR => pieces.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    pieces.push(current);

    pieces
        .into_iter()
        .map(|piece| piece.trim().to_string())
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Whether the character at `index` is preceded by an odd number of backslashes
fn is_escaped(value: &str, index: usize) -> bool {
    value[..index]
        .chars()
        .rev()
        .take_while(|c| *c == ESCAPE)
        .count()
        % 2
        == 1
}

/// Turn an unescaped leading/trailing asterisk into a SQL `%` wildcard
///
/// Returns the unescaped LIKE pattern, or `None` when the value has no
/// wildcard.
pub(crate) fn wildcard_pattern(value: &str) -> Option<String> {
    let leading = value.starts_with(WILDCARD);
    let body = if leading { &value[1..] } else { value };

    let trailing = body.ends_with(WILDCARD) && !is_escaped(body, body.len() - 1);
    let body = if trailing { &body[..body.len() - 1] } else { body };

    if !leading && !trailing {
        return None;
    }

    let mut pattern = String::with_capacity(body.len() + 2);
    if leading {
        pattern.push('%');
    }
    pattern.push_str(&unescape(body));
    if trailing {
        pattern.push('%');
    }
    Some(pattern)
}
