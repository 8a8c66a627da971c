//! The value-predicate alternation and its expression.

use crate::alternation::OneOf;
use crate::ast::ValuePredicate;
use crate::expression::{ExprNode, Expression};

use super::array::Array;
use super::numeric::NumericValue;
use super::object::Object;
use super::primitive::{Boolean, Empty, Exists, Null};
use super::string::StringValue;
use super::time::TimeValue;

/// Every value predicate kind, in the order decoding tries them.
pub fn value_alternation() -> OneOf<dyn ValuePredicate> {
    OneOf::new()
        .or(|| -> Box<dyn ValuePredicate> { Box::new(Object::default()) })
        .or(|| -> Box<dyn ValuePredicate> { Box::new(Array::default()) })
        .or(|| -> Box<dyn ValuePredicate> { Box::new(Null) })
        .or(|| -> Box<dyn ValuePredicate> { Box::new(Exists) })
        .or(|| -> Box<dyn ValuePredicate> { Box::new(Empty) })
        .or(|| -> Box<dyn ValuePredicate> { Box::new(Boolean::default()) })
        .or(|| -> Box<dyn ValuePredicate> { Box::new(NumericValue::default()) })
        .or(|| -> Box<dyn ValuePredicate> { Box::new(TimeValue::default()) })
        .or(|| -> Box<dyn ValuePredicate> { Box::new(StringValue::default()) })
}

/// A boolean expression over value predicates (a "PE ValuePredicate").
pub fn value_predicate() -> Expression<dyn ValuePredicate> {
    Expression::new(|| -> Box<dyn ValuePredicate> { Box::new(value_alternation()) })
}

/// Wraps a programmatically built tree as a value expression.
pub fn value_expression(root: ExprNode<dyn ValuePredicate>) -> Expression<dyn ValuePredicate> {
    value_predicate().with_root(root)
}
