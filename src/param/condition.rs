//! Condition expression tree produced by the normalizer.

use super::operator::Operator;
use super::value::ParamValue;

/// Backend-agnostic description of a WHERE constraint on one column
///
/// `case_insensitive` asks the query builder to compare case-folded values.
/// It never changes the shape of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// No constraint; the caller should omit the condition entirely
    Empty,
    /// `column = value` (or `!=` when negated)
    Equals {
        column: String,
        value: ParamValue,
        negated: bool,
        case_insensitive: bool,
    },
    /// `column IN (values)` (or `NOT IN` when negated)
    In {
        column: String,
        values: Vec<ParamValue>,
        negated: bool,
        case_insensitive: bool,
    },
    /// `column <operator> value` for anything but plain equality
    Raw {
        operator: Operator,
        column: String,
        value: ParamValue,
        case_insensitive: bool,
    },
    Or(Vec<Condition>),
    And(Vec<Condition>),
    /// Negation of a condition with no known inverse operator
    Not(Box<Condition>),
}

impl Condition {
    /// `column = value`
    pub fn equals(column: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Condition::Equals {
            column: column.into(),
            value: value.into(),
            negated: false,
            case_insensitive: false,
        }
    }

    /// `column IN (values)`
    pub fn is_in<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        Condition::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
            case_insensitive: false,
        }
    }

    /// `column <operator> value`
    pub fn raw(operator: Operator, column: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Condition::Raw {
            operator,
            column: column.into(),
            value: value.into(),
            case_insensitive: false,
        }
    }

    /// A single comparison in canonical form: `=` becomes [`Condition::Equals`],
    /// everything else [`Condition::Raw`]
    pub(crate) fn compare(
        column: &str,
        operator: Operator,
        value: ParamValue,
        case_insensitive: bool,
    ) -> Self {
        match operator {
            Operator::Eq => Condition::Equals {
                column: column.to_string(),
                value,
                negated: false,
                case_insensitive,
            },
            operator => Condition::Raw {
                operator,
                column: column.to_string(),
                value,
                case_insensitive,
            },
        }
    }

    /// Set the case-insensitivity flag on every comparison in the tree
    pub fn with_case_insensitive(self, flag: bool) -> Self {
        match self {
            Condition::Equals {
                column,
                value,
                negated,
                ..
            } => Condition::Equals {
                column,
                value,
                negated,
                case_insensitive: flag,
            },
            Condition::In {
                column,
                values,
                negated,
                ..
            } => Condition::In {
                column,
                values,
                negated,
                case_insensitive: flag,
            },
            Condition::Raw {
                operator,
                column,
                value,
                ..
            } => Condition::Raw {
                operator,
                column,
                value,
                case_insensitive: flag,
            },
            Condition::Or(children) => Condition::Or(
                children
                    .into_iter()
                    .map(|c| c.with_case_insensitive(flag))
                    .collect(),
            ),
            Condition::And(children) => Condition::And(
                children
                    .into_iter()
                    .map(|c| c.with_case_insensitive(flag))
                    .collect(),
            ),
            Condition::Not(inner) => Condition::Not(Box::new(inner.with_case_insensitive(flag))),
            Condition::Empty => Condition::Empty,
        }
    }

    /// Logical negation, pushed down to the leaves (De Morgan)
    ///
    /// `Or` and `And` swap and every child is negated. Comparisons invert
    /// their operator; only a custom operator with no known inverse is
    /// wrapped in [`Condition::Not`]. `Empty` stays `Empty`.
    pub fn negate(self) -> Self {
        match self {
            Condition::Empty => Condition::Empty,
            Condition::Equals {
                column,
                value,
                negated: true,
                case_insensitive,
            } => Condition::Equals {
                column,
                value,
                negated: false,
                case_insensitive,
            },
            Condition::Equals {
                column,
                value,
                negated: false,
                case_insensitive,
            } => Condition::Raw {
                operator: Operator::Ne,
                column,
                value,
                case_insensitive,
            },
            Condition::In {
                column,
                values,
                negated,
                case_insensitive,
            } => Condition::In {
                column,
                values,
                negated: !negated,
                case_insensitive,
            },
            Condition::Raw {
                operator,
                column,
                value,
                case_insensitive,
            } => match operator.inverse() {
                Some(inverse) => Condition::compare(&column, inverse, value, case_insensitive),
                None => Condition::Not(Box::new(Condition::Raw {
                    operator,
                    column,
                    value,
                    case_insensitive,
                })),
            },
            Condition::Or(children) => {
                Condition::And(children.into_iter().map(Condition::negate).collect())
            }
            Condition::And(children) => {
                Condition::Or(children.into_iter().map(Condition::negate).collect())
            }
            Condition::Not(inner) => *inner,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Condition::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negate_or_is_and_of_negations() {
        let condition = Condition::Or(vec![
            Condition::equals("foo", "a"),
            Condition::equals("foo", "b"),
        ]);
        assert_eq!(
            condition.negate(),
            Condition::And(vec![
                Condition::raw(Operator::Ne, "foo", "a"),
                Condition::raw(Operator::Ne, "foo", "b"),
            ])
        );
    }

    #[test]
    fn test_negate_and_is_or_of_negations() {
        let condition = Condition::And(vec![
            Condition::raw(Operator::Gt, "n", 1i64),
            Condition::raw(Operator::Lt, "n", 10i64),
        ]);
        assert_eq!(
            condition.negate(),
            Condition::Or(vec![
                Condition::raw(Operator::Lte, "n", 1i64),
                Condition::raw(Operator::Gte, "n", 10i64),
            ])
        );
    }

    #[test]
    fn test_double_negation() {
        let condition = Condition::equals("foo", "bar");
        assert_eq!(condition.clone().negate().negate(), condition);

        let custom = Condition::raw(Operator::Custom("@>".into()), "tags", "x");
        assert_eq!(custom.clone().negate(), Condition::Not(Box::new(custom.clone())));
        assert_eq!(custom.clone().negate().negate(), custom);
    }

    #[test]
    fn test_negate_in_toggles() {
        let condition = Condition::is_in("foo", ["a", "b"]);
        match condition.negate() {
            Condition::In { negated, values, .. } => {
                assert!(negated);
                assert_eq!(values.len(), 2);
            }
            other => panic!("expected In, got {other:?}"),
        }
    }

    #[test]
    fn test_negate_keeps_case_insensitivity() {
        let condition = Condition::equals("email", "A@B.C").with_case_insensitive(true);
        match condition.negate() {
            Condition::Raw {
                case_insensitive, ..
            } => assert!(case_insensitive),
            other => panic!("expected Raw, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_stays_empty() {
        assert!(Condition::Empty.negate().is_empty());
        assert!(Condition::Empty.with_case_insensitive(true).is_empty());
    }
}
