//! Numeric predicates: `[op, n]` comparisons and their value wrapper.

use serde_json::{json, Value};

use crate::alternation::OneOf;
use crate::ast::{AstNode, Capability, NumericPredicate, ValuePredicate};
use crate::error::{Result, RqlError};
use crate::matcher::tagged_payload;
use crate::op::ComparisonOp;

use super::decode_wrapped;

/// Encodes `n` as a JSON number, preferring the integer form for whole values.
pub(crate) fn number_value(n: f64) -> Value {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT {
        json!(n as i64)
    } else {
        json!(n)
    }
}

/// Compares a number against a fixed operand: `[op, n]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericComparison {
    op: ComparisonOp,
    operand: f64,
}

impl NumericComparison {
    pub fn new(op: ComparisonOp, operand: f64) -> Self {
        NumericComparison { op, operand }
    }

    pub fn op(&self) -> ComparisonOp {
        self.op
    }

    pub fn operand(&self) -> f64 {
        self.operand
    }

    fn template(op: ComparisonOp) -> Box<dyn NumericPredicate> {
        Box::new(NumericComparison::new(op, 0.0))
    }
}

impl AstNode for NumericComparison {
    fn marshal(&self) -> Value {
        json!([self.op.as_str(), number_value(self.operand)])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        let format = self.format();
        let payload = tagged_payload(input, self.op.as_str(), &format, "missing the number")?;
        self.operand = payload
            .as_f64()
            .ok_or_else(|| RqlError::validation("must provide a number"))?;
        Ok(())
    }

    fn format(&self) -> String {
        format!("['{}', <number>]", self.op)
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Numeric]
    }
}

impl NumericPredicate for NumericComparison {
    fn eval_number(&self, n: f64) -> bool {
        self.op.eval_f64(n, self.operand)
    }
}

/// The numeric predicate alternation, one candidate per operator.
pub fn numeric_predicate() -> OneOf<dyn NumericPredicate> {
    OneOf::new()
        .or(|| NumericComparison::template(ComparisonOp::Lt))
        .or(|| NumericComparison::template(ComparisonOp::Lte))
        .or(|| NumericComparison::template(ComparisonOp::Gt))
        .or(|| NumericComparison::template(ComparisonOp::Gte))
        .or(|| NumericComparison::template(ComparisonOp::Eq))
}

/// A numeric predicate lifted to values: `["number", <numeric_predicate>]`.
#[derive(Debug)]
pub struct NumericValue {
    inner: Box<dyn NumericPredicate>,
}

impl NumericValue {
    const FORMAT: &'static str = "['number', <numeric_predicate>]";

    pub fn new(inner: Box<dyn NumericPredicate>) -> Self {
        NumericValue { inner }
    }

    pub fn comparison(op: ComparisonOp, operand: f64) -> Self {
        Self::new(Box::new(NumericComparison::new(op, operand)))
    }
}

impl Default for NumericValue {
    fn default() -> Self {
        Self::new(Box::new(numeric_predicate()))
    }
}

impl AstNode for NumericValue {
    fn marshal(&self) -> Value {
        json!(["number", self.inner.marshal()])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        let mut inner = numeric_predicate();
        decode_wrapped(
            input,
            "number",
            Self::FORMAT,
            "missing the numeric predicate",
            &mut inner,
        )?;
        self.inner = Box::new(inner);
        Ok(())
    }

    fn format(&self) -> String {
        Self::FORMAT.to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Value, Capability::Numeric]
    }
}

impl NumericPredicate for NumericValue {
    fn eval_number(&self, n: f64) -> bool {
        self.inner.eval_number(n)
    }
}

impl ValuePredicate for NumericValue {
    fn value_in_domain(&self, value: &Value) -> bool {
        value.is_number()
    }

    fn eval_value(&self, value: &Value) -> bool {
        value.as_f64().is_some_and(|n| self.eval_number(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn comparison_unmarshal() {
        let mut p = NumericComparison::new(ComparisonOp::Gt, 0.0);
        assert!(p.unmarshal(&json!(["<", 1])).unwrap_err().is_shape());
        assert_eq!(
            p.unmarshal(&json!([">"])).unwrap_err().to_string(),
            "missing the number"
        );
        assert_eq!(
            p.unmarshal(&json!([">", 1, 2])).unwrap_err().to_string(),
            "must be formatted as ['>', <number>]"
        );
        assert_eq!(
            p.unmarshal(&json!([">", "1"])).unwrap_err().to_string(),
            "must provide a number"
        );
        p.unmarshal(&json!([">", 1.5])).unwrap();
        assert_eq!(p.operand(), 1.5);
        assert!(p.eval_number(2.0));
        assert!(!p.eval_number(1.5));
    }

    #[test]
    fn alternation_picks_the_operator() {
        let mut p = numeric_predicate();
        p.unmarshal(&json!(["<=", 3])).unwrap();
        assert!(p.eval_number(3.0));
        assert!(!p.eval_number(3.5));
        assert_eq!(p.marshal(), json!(["<=", 3]));

        let err = p.unmarshal(&json!(["!=", 3])).unwrap_err();
        assert!(err.is_shape());
        assert_eq!(
            err.to_string(),
            "must be formatted as either ['<', <number>], ['<=', <number>], ['>', <number>], ['>=', <number>], or ['=', <number>]"
        );
    }

    #[test]
    fn numeric_value_domain() {
        let p = NumericValue::comparison(ComparisonOp::Eq, 4.0);
        assert!(p.accepts(&json!(4)));
        assert!(p.accepts(&json!(4.0)));
        assert!(!p.accepts(&json!("4")));
        assert!(!p.value_in_domain(&json!(null)));
    }

    #[test]
    fn number_value_prefers_integers() {
        assert_eq!(number_value(10.0), json!(10));
        assert_eq!(number_value(-3.0), json!(-3));
        assert_eq!(number_value(1.25), json!(1.25));
    }

    #[test]
    fn numeric_value_round_trip() {
        let input = json!(["number", [">=", 2.5]]);
        let mut p = NumericValue::default();
        p.unmarshal(&input).unwrap();
        assert_eq!(p.marshal(), input);
    }
}
