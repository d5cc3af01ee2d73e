//! Boolean clause composition for Solr query syntax.
//!
//! Every function here is pure. Blank operands never fail: they degrade to an
//! empty string so results can be fed straight back into other composers or
//! into [`crate::QueryBuilder`], which ignores blank clauses.
//!
//! ```
//! use solr_query::clause;
//!
//! assert_eq!(clause::and("a", "b"), "(a AND b)");
//! assert_eq!(clause::or("topics", ["news", "events"]), "(topics:(news events))");
//! assert_eq!(clause::not_with("draft", false), "! draft");
//! ```

use std::fmt;

/// Logical operators understood by the Solr standard query parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
    Not,
    Prohibit,
    Required,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "!",
            Self::Prohibit => "-",
            Self::Required => "+",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand operand of [`and`] / [`or`]: a single term or a list of terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terms {
    Single(String),
    Many(Vec<String>),
}

impl Terms {
    /// A single term is valid when it is not blank; a list when it is not empty.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Single(term) => is_valid(term),
            Self::Many(terms) => !terms.is_empty(),
        }
    }
}

impl From<&str> for Terms {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for Terms {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<&String> for Terms {
    fn from(value: &String) -> Self {
        Self::Single(value.clone())
    }
}

impl<S: Into<String>> From<Vec<S>> for Terms {
    fn from(values: Vec<S>) -> Self {
        Self::Many(values.into_iter().map(Into::into).collect())
    }
}

impl<S: AsRef<str>> From<&[S]> for Terms {
    fn from(values: &[S]) -> Self {
        Self::Many(values.iter().map(|v| v.as_ref().to_string()).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Terms {
    fn from(values: [S; N]) -> Self {
        Self::Many(values.into_iter().map(Into::into).collect())
    }
}

/// A string operand is valid only when it is non-empty after trimming.
pub(crate) fn is_valid(value: &str) -> bool {
    !value.trim().is_empty()
}

/// `(left AND right)`, or `(left:(t1 t2 ...))` when `right` is a list.
pub fn and(left: &str, right: impl Into<Terms>) -> String {
    and_with(left, right, true)
}

/// [`and`] with explicit control over the outer parentheses.
pub fn and_with(left: &str, right: impl Into<Terms>, use_parentheses: bool) -> String {
    multi_clause(left, right.into(), LogicalOperator::And, use_parentheses)
}

/// `(left OR right)`, or `(left:(t1 t2 ...))` when `right` is a list.
pub fn or(left: &str, right: impl Into<Terms>) -> String {
    or_with(left, right, true)
}

/// [`or`] with explicit control over the outer parentheses.
pub fn or_with(left: &str, right: impl Into<Terms>, use_parentheses: bool) -> String {
    multi_clause(left, right.into(), LogicalOperator::Or, use_parentheses)
}

/// Excludes documents matching `clause`: `(! clause)`.
pub fn not(clause: &str) -> String {
    not_with(clause, true)
}

pub fn not_with(clause: &str, use_parentheses: bool) -> String {
    single_clause(clause, LogicalOperator::Not, use_parentheses)
}

/// Prohibits the term: `(- clause)`.
pub fn prohibit(clause: &str) -> String {
    prohibit_with(clause, true)
}

pub fn prohibit_with(clause: &str, use_parentheses: bool) -> String {
    single_clause(clause, LogicalOperator::Prohibit, use_parentheses)
}

/// Requires the term to match: `(+ clause)`.
pub fn required(clause: &str) -> String {
    required_with(clause, true)
}

pub fn required_with(clause: &str, use_parentheses: bool) -> String {
    single_clause(clause, LogicalOperator::Required, use_parentheses)
}

/// Wraps a value in double quotes for an exact phrase match.
pub fn strict_string(value: &str) -> String {
    if is_valid(value) {
        format!("\"{}\"", value)
    } else {
        String::new()
    }
}

fn multi_clause(left: &str, right: Terms, op: LogicalOperator, use_parentheses: bool) -> String {
    match right {
        // A term list always groups its items; only the outer parens are optional.
        Terms::Many(items) if !items.is_empty() => parenthesize(
            &format!("{}:{}", left, parenthesize(&items.join(" "), true)),
            use_parentheses,
        ),
        Terms::Many(_) => {
            if !is_valid(left) {
                return String::new();
            }
            parenthesize(&format!("{} {} ", left, op), use_parentheses)
        }
        Terms::Single(right) => {
            if !is_valid(left) && !is_valid(&right) {
                return String::new();
            }
            parenthesize(&format!("{} {} {}", left, op, right), use_parentheses)
        }
    }
}

fn single_clause(clause: &str, op: LogicalOperator, use_parentheses: bool) -> String {
    if !is_valid(clause) {
        return String::new();
    }
    parenthesize(&format!("{} {}", op, clause), use_parentheses)
}

fn parenthesize(clause: &str, include: bool) -> String {
    if include {
        format!("({})", clause)
    } else {
        clause.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_clause() {
        assert_eq!(and("a", "b"), "(a AND b)");
        assert_eq!(and_with("a", "b", false), "a AND b");
    }

    #[test]
    fn test_and_with_term_list() {
        assert_eq!(and("a", ["b", "c"]), "(a:(b c))");
        assert_eq!(and_with("a", vec!["b", "c"], false), "a:(b c)");
    }

    #[test]
    fn test_or_clause() {
        assert_eq!(or("a", "b"), "(a OR b)");
        assert_eq!(or("a", ["b", "c"]), "(a:(b c))");
        assert_eq!(or_with("a", "b", false), "a OR b");
    }

    #[test]
    fn test_term_list_from_slice() {
        let terms: &[String] = &["news".to_string(), "events".to_string()];
        assert_eq!(or("topics", terms), "(topics:(news events))");
    }

    #[test]
    fn test_both_operands_blank() {
        assert_eq!(and("", ""), "");
        assert_eq!(or("  ", "\t"), "");
        assert_eq!(and("", Vec::<String>::new()), "");
    }

    #[test]
    fn test_single_operand_clauses() {
        assert_eq!(not("a"), "(! a)");
        assert_eq!(prohibit("a"), "(- a)");
        assert_eq!(required("a"), "(+ a)");
        assert_eq!(not_with("a", false), "! a");
        assert_eq!(prohibit_with("a", false), "- a");
        assert_eq!(required_with("a", false), "+ a");
    }

    #[test]
    fn test_single_operand_blank() {
        assert_eq!(not(""), "");
        assert_eq!(prohibit("   "), "");
        assert_eq!(required(""), "");
    }

    #[test]
    fn test_strict_string() {
        assert_eq!(strict_string("a"), "\"a\"");
        assert_eq!(strict_string(""), "");
        assert_eq!(strict_string("  "), "");
    }

    #[test]
    fn test_nested_composition() {
        let inner = and("authtemplate:news", strict_string("Tech Talk"));
        assert_eq!(
            or(&inner, not("contenttype:video")),
            "((authtemplate:news AND \"Tech Talk\") OR (! contenttype:video))"
        );
    }

    #[test]
    fn test_composers_are_repeatable() {
        for _ in 0..3 {
            assert_eq!(and("a", ["b", "c"]), "(a:(b c))");
            assert_eq!(strict_string("a"), "\"a\"");
        }
    }

    #[test]
    fn test_operator_tokens() {
        assert_eq!(LogicalOperator::And.to_string(), "AND");
        assert_eq!(LogicalOperator::Required.as_str(), "+");
    }
}
