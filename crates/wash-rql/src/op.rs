//! Comparison operators for numeric and time predicates.
//!
//! Each [`ComparisonOp`] has a fixed wire symbol (`<`, `<=`, `>`, `>=`, `=`)
//! used as the head of a `[op, operand]` pair.

use std::cmp::Ordering;

/// Comparison operator of a numeric or time predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Equal.
    Eq,
}

impl ComparisonOp {
    /// Every operator, in the order alternations try them.
    pub const ALL: [ComparisonOp; 5] = [
        ComparisonOp::Lt,
        ComparisonOp::Lte,
        ComparisonOp::Gt,
        ComparisonOp::Gte,
        ComparisonOp::Eq,
    ];

    /// Evaluates a comparison given `actual.cmp(&operand)`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            ComparisonOp::Eq => ordering == Ordering::Equal,
            ComparisonOp::Gt => ordering == Ordering::Greater,
            ComparisonOp::Gte => ordering != Ordering::Less,
            ComparisonOp::Lt => ordering == Ordering::Less,
            ComparisonOp::Lte => ordering != Ordering::Greater,
        }
    }

    /// Evaluates a comparison between two floats. `NaN` never matches.
    pub fn eval_f64(self, actual: f64, operand: f64) -> bool {
        actual
            .partial_cmp(&operand)
            .is_some_and(|ordering| self.eval_ordering(ordering))
    }

    /// Returns the wire symbol of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Lt => "<",
            ComparisonOp::Lte => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Gte => ">=",
            ComparisonOp::Eq => "=",
        }
    }

    /// Looks up an operator by its wire symbol.
    pub fn from_symbol(symbol: &str) -> Option<ComparisonOp> {
        Self::ALL.into_iter().find(|op| op.as_str() == symbol)
    }
}

impl std::fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_eval_ordering() {
        // Equal
        assert!(ComparisonOp::Eq.eval_ordering(Ordering::Equal));
        assert!(!ComparisonOp::Eq.eval_ordering(Ordering::Less));
        assert!(!ComparisonOp::Eq.eval_ordering(Ordering::Greater));

        // Greater than
        assert!(!ComparisonOp::Gt.eval_ordering(Ordering::Equal));
        assert!(ComparisonOp::Gt.eval_ordering(Ordering::Greater));

        // Greater than or equal
        assert!(ComparisonOp::Gte.eval_ordering(Ordering::Equal));
        assert!(!ComparisonOp::Gte.eval_ordering(Ordering::Less));

        // Less than
        assert!(ComparisonOp::Lt.eval_ordering(Ordering::Less));
        assert!(!ComparisonOp::Lt.eval_ordering(Ordering::Equal));

        // Less than or equal
        assert!(ComparisonOp::Lte.eval_ordering(Ordering::Equal));
        assert!(!ComparisonOp::Lte.eval_ordering(Ordering::Greater));
    }

    #[test]
    fn op_eval_f64_rejects_nan() {
        assert!(ComparisonOp::Lt.eval_f64(1.0, 2.0));
        assert!(!ComparisonOp::Eq.eval_f64(f64::NAN, f64::NAN));
        assert!(!ComparisonOp::Lte.eval_f64(f64::NAN, 1.0));
    }

    #[test]
    fn op_symbols_round_trip() {
        for op in ComparisonOp::ALL {
            assert_eq!(ComparisonOp::from_symbol(op.as_str()), Some(op));
        }
        assert_eq!(ComparisonOp::from_symbol("!="), None);
        assert_eq!(ComparisonOp::Gte.to_string(), ">=");
    }
}
