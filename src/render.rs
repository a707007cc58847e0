//! Rendering of [`Condition`] trees through SeaQuery.
//!
//! SeaQuery is the query-building collaborator of the lifeguard stack; once a
//! condition is turned into a [`sea_query::Condition`] it can be attached to
//! any statement with `cond_where` and built for any backend.

use crate::param::{is_safe_custom, Condition, Operator, ParamValue};
use sea_query::{Condition as SeaCondition, Expr, ExprTrait, Func, Iden};

/// Runtime column name usable as a SeaQuery identifier
#[derive(Debug, Clone)]
struct ColumnName(String);

impl Iden for ColumnName {
    fn unquoted(&self) -> &str {
        &self.0
    }
}

/// Left-hand side of a comparison, case-folded when requested
fn column_expr(column: &str, case_insensitive: bool) -> Expr {
    let column = Expr::col(ColumnName(column.to_string()));
    if case_insensitive {
        Expr::from(Func::lower(column))
    } else {
        column
    }
}

/// Right-hand side value, case-folded when requested
fn value_of(value: &ParamValue, case_insensitive: bool) -> sea_query::Value {
    match value {
        ParamValue::Str(s) if case_insensitive => s.to_lowercase().into(),
        other => other.clone().into(),
    }
}

fn pattern_of(value: &ParamValue, case_insensitive: bool) -> String {
    let pattern = value.to_string();
    if case_insensitive {
        pattern.to_lowercase()
    } else {
        pattern
    }
}

fn compare(
    operator: &Operator,
    column: &str,
    value: &ParamValue,
    case_insensitive: bool,
) -> Expr {
    // Only strings have a case to fold
    let case_insensitive = case_insensitive && matches!(value, ParamValue::Str(_));
    let lhs = column_expr(column, case_insensitive);
    match operator {
        Operator::Eq => lhs.eq(value_of(value, case_insensitive)),
        Operator::Ne => lhs.ne(value_of(value, case_insensitive)),
        Operator::Lt => lhs.lt(value_of(value, case_insensitive)),
        Operator::Lte => lhs.lte(value_of(value, case_insensitive)),
        Operator::Gt => lhs.gt(value_of(value, case_insensitive)),
        Operator::Gte => lhs.gte(value_of(value, case_insensitive)),
        Operator::Like => lhs.like(pattern_of(value, case_insensitive)),
        Operator::NotLike => lhs.not_like(pattern_of(value, case_insensitive)),
        Operator::Custom(op) if is_safe_custom(op) => Expr::cust_with_exprs(
            format!("$1 {op} $2"),
            [lhs, Expr::val(value_of(value, case_insensitive))],
        ),
        Operator::Custom(op) => {
            log::debug!("Rejected operator {op:?} on {column}, comparing with = instead");
            lhs.eq(value_of(value, case_insensitive))
        }
    }
}

/// Convert a condition tree into a SeaQuery condition
///
/// Returns `None` for [`Condition::Empty`] (and for combinators whose
/// children are all empty), meaning no WHERE clause should be added.
///
/// # Example
///
/// ```
/// use lifeguard_params::{normalize, render::to_sea_condition};
///
/// let condition = normalize("status", vec!["or", "active", "pending"], "=", false, None);
/// assert!(to_sea_condition(&condition).is_some());
///
/// let empty = normalize("status", "", "=", false, None);
/// assert!(to_sea_condition(&empty).is_none());
/// ```
pub fn to_sea_condition(condition: &Condition) -> Option<SeaCondition> {
    match condition {
        Condition::Empty => None,
        Condition::Equals {
            column,
            value,
            negated,
            case_insensitive,
        } => {
            let operator = if *negated { Operator::Ne } else { Operator::Eq };
            Some(SeaCondition::all().add(compare(&operator, column, value, *case_insensitive)))
        }
        Condition::In {
            column,
            values,
            negated,
            case_insensitive,
        } => {
            let fold = *case_insensitive
                && values.iter().all(|value| matches!(value, ParamValue::Str(_)));
            let lhs = column_expr(column, fold);
            let values = values
                .iter()
                .map(|value| value_of(value, fold))
                .collect::<Vec<_>>();
            let expr = if *negated {
                lhs.is_not_in(values)
            } else {
                lhs.is_in(values)
            };
            Some(SeaCondition::all().add(expr))
        }
        Condition::Raw {
            operator,
            column,
            value,
            case_insensitive,
        } => Some(SeaCondition::all().add(compare(operator, column, value, *case_insensitive))),
        Condition::Or(children) => combine(SeaCondition::any(), children),
        Condition::And(children) => combine(SeaCondition::all(), children),
        Condition::Not(inner) => to_sea_condition(inner).map(SeaCondition::not),
    }
}

fn combine(mut combined: SeaCondition, children: &[Condition]) -> Option<SeaCondition> {
    let mut any = false;
    for child in children.iter().filter_map(to_sea_condition) {
        combined = combined.add(child);
        any = true;
    }
    any.then_some(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::normalize;
    use sea_query::{Asterisk, PostgresQueryBuilder, SelectStatement};

    struct TableName(&'static str);

    impl Iden for TableName {
        fn unquoted(&self) -> &str {
            self.0
        }
    }

    fn build(condition: &Condition) -> (String, usize) {
        let mut query = SelectStatement::default();
        query.column(Asterisk).from(TableName("users"));
        if let Some(cond) = to_sea_condition(condition) {
            query.cond_where(cond);
        }
        let (sql, values) = query.build(PostgresQueryBuilder);
        (sql, values.0.len())
    }

    #[test]
    fn test_render_empty_has_no_where() {
        let (sql, params) = build(&Condition::Empty);
        assert!(!sql.to_uppercase().contains("WHERE"), "Empty should not add WHERE: {sql}");
        assert_eq!(params, 0);
    }

    #[test]
    fn test_render_equals() {
        let (sql, params) = build(&normalize("username", "activeUser", "=", false, None));
        assert!(sql.contains("\"username\""), "SQL should reference the column: {sql}");
        assert!(sql.contains('$'), "SQL should contain a parameter placeholder: {sql}");
        assert_eq!(params, 1);
    }

    #[test]
    fn test_render_in() {
        let (sql, params) = build(&normalize("status", vec!["or", "a", "b", "c"], "=", false, None));
        assert!(sql.to_uppercase().contains(" IN "), "SQL should contain IN: {sql}");
        assert_eq!(params, 3);

        let (sql, _) = build(&normalize("status", vec!["not", "a", "b"], "=", false, None));
        assert!(sql.to_uppercase().contains("NOT IN"), "SQL should contain NOT IN: {sql}");
    }

    #[test]
    fn test_render_or_and() {
        let (sql, params) = build(&normalize("foo", "a, b", "=", false, None));
        assert!(sql.to_uppercase().contains(" OR "), "SQL should contain OR: {sql}");
        assert_eq!(params, 2);

        let (sql, params) = build(&normalize("foo", "not a, b", "=", false, None));
        assert!(sql.to_uppercase().contains(" AND "), "SQL should contain AND: {sql}");
        assert!(sql.contains("<>"), "SQL should contain an inequality: {sql}");
        assert_eq!(params, 2);
    }

    #[test]
    fn test_render_like() {
        let (sql, _) = build(&normalize("title", "foo*", "=", false, None));
        assert!(sql.to_uppercase().contains("LIKE"), "SQL should contain LIKE: {sql}");
    }

    #[test]
    fn test_render_case_insensitive() {
        let (sql, params) = build(&normalize("email", "Active@User.com", "=", true, None));
        assert!(sql.to_uppercase().contains("LOWER"), "SQL should fold case: {sql}");
        assert_eq!(params, 1);
    }

    #[test]
    fn test_render_custom_operator() {
        let (sql, params) = build(&normalize("tags", "x", "@>", false, None));
        assert!(sql.contains("@>"), "SQL should contain the custom operator: {sql}");
        assert_eq!(params, 1);
    }

    #[test]
    fn test_render_case_insensitive_skips_non_strings() {
        let (sql, params) = build(&normalize("active", "1", "=", true, Some("boolean")));
        assert!(!sql.to_uppercase().contains("LOWER"), "booleans have no case: {sql}");
        assert_eq!(params, 1);

        let (sql, _) = build(&normalize("id", 5, "=", true, None));
        assert!(!sql.to_uppercase().contains("LOWER"), "integers have no case: {sql}");

        let (sql, _) = build(&Condition::is_in("id", [1i64, 2]).with_case_insensitive(true));
        assert!(!sql.to_uppercase().contains("LOWER"), "integer IN lists have no case: {sql}");
    }

    #[test]
    fn test_render_unsafe_custom_operator_falls_back_to_equality() {
        let condition = Condition::raw(Operator::Custom("$3".to_string()), "tags", "x");
        let (sql, params) = build(&condition);
        assert!(!sql.contains("$3"), "operator text must not reach the SQL: {sql}");
        assert!(sql.contains("\"tags\" = $1"), "SQL should compare with =: {sql}");
        assert_eq!(params, 1);

        let (sql, _) = build(&normalize("tags", "x", "'; drop table users", false, None));
        assert!(!sql.contains("drop"), "operator text must not reach the SQL: {sql}");
    }

    #[test]
    fn test_render_all_empty_children() {
        let condition = Condition::Or(vec![Condition::Empty, Condition::Empty]);
        assert!(to_sea_condition(&condition).is_none());
    }
}
