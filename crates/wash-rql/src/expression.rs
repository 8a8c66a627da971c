//! The boolean combinator.
//!
//! An [`Expression`] lifts one capability (value, string, entry, ...)
//! into a propositional layer:
//!
//! ```text
//! <atom>              the bare predicate's own encoding
//! ["NOT", e]
//! ["AND", l, r]
//! ["OR", l, r]
//! ```
//!
//! The expression satisfies exactly the capability it wraps and nothing
//! else. Evaluation short-circuits left to right.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::alternation::Template;
use crate::ast::{
    ArrayPredicate, AstNode, Capability, Capable, EntryPredicate, EntrySchemaPredicate,
    NumericPredicate, StringPredicate, TimePredicate, ValuePredicate,
};
use crate::entry::{Entry, EntrySchema};
use crate::error::{Result, RqlError};
use crate::matcher::tagged;

/// A node of an expression tree.
#[derive(Debug)]
pub enum ExprNode<P: ?Sized> {
    Atom(Box<P>),
    Not(Box<ExprNode<P>>),
    And(Box<ExprNode<P>>, Box<ExprNode<P>>),
    Or(Box<ExprNode<P>>, Box<ExprNode<P>>),
}

impl<P: ?Sized + AstNode> ExprNode<P> {
    pub fn atom(predicate: Box<P>) -> Self {
        ExprNode::Atom(predicate)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: ExprNode<P>) -> Self {
        ExprNode::Not(Box::new(inner))
    }

    pub fn and(left: ExprNode<P>, right: ExprNode<P>) -> Self {
        ExprNode::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: ExprNode<P>, right: ExprNode<P>) -> Self {
        ExprNode::Or(Box::new(left), Box::new(right))
    }

    /// Evaluates the tree, calling `f` on the atoms it reaches.
    pub fn eval<F: Fn(&P) -> bool>(&self, f: &F) -> bool {
        match self {
            ExprNode::Atom(p) => f(p),
            ExprNode::Not(inner) => !inner.eval(f),
            ExprNode::And(left, right) => left.eval(f) && right.eval(f),
            ExprNode::Or(left, right) => left.eval(f) || right.eval(f),
        }
    }

    /// Returns `true` if `f` holds for at least one atom.
    pub fn any_atom<F: Fn(&P) -> bool>(&self, f: &F) -> bool {
        match self {
            ExprNode::Atom(p) => f(p),
            ExprNode::Not(inner) => inner.any_atom(f),
            ExprNode::And(left, right) | ExprNode::Or(left, right) => {
                left.any_atom(f) || right.any_atom(f)
            }
        }
    }

    pub fn marshal(&self) -> Value {
        match self {
            ExprNode::Atom(p) => p.marshal(),
            ExprNode::Not(inner) => json!(["NOT", inner.marshal()]),
            ExprNode::And(left, right) => json!(["AND", left.marshal(), right.marshal()]),
            ExprNode::Or(left, right) => json!(["OR", left.marshal(), right.marshal()]),
        }
    }
}

/// A boolean expression over predicates of one capability.
pub struct Expression<P: ?Sized> {
    atom: Template<P>,
    root: Option<ExprNode<P>>,
}

impl<P: ?Sized + AstNode> Expression<P> {
    /// Creates an empty expression whose atoms are decoded with `atom`.
    pub fn new(atom: Template<P>) -> Self {
        Expression { atom, root: None }
    }

    /// Replaces the tree with one built programmatically.
    pub fn with_root(mut self, root: ExprNode<P>) -> Self {
        self.root = Some(root);
        self
    }

    pub fn root(&self) -> Option<&ExprNode<P>> {
        self.root.as_ref()
    }

    pub fn into_root(self) -> Option<ExprNode<P>> {
        self.root
    }

    /// Evaluates the expression, calling `f` on each atom reached.
    ///
    /// An expression that was never decoded evaluates to `false`.
    pub fn eval(&self, f: impl Fn(&P) -> bool) -> bool {
        self.root.as_ref().is_some_and(|root| root.eval(&f))
    }

    fn any_atom(&self, f: impl Fn(&P) -> bool) -> bool {
        self.root.as_ref().is_some_and(|root| root.any_atom(&f))
    }

    fn decode(&self, input: &Value) -> Result<ExprNode<P>> {
        if tagged(input, "NOT") {
            let [_, inner] = operands::<2>(input, "['NOT', <pe>]")?;
            let inner = self
                .decode(inner)
                .map_err(|err| RqlError::wrap("NOT", err))?;
            return Ok(ExprNode::not(inner));
        }
        for tag in ["AND", "OR"] {
            if !tagged(input, tag) {
                continue;
            }
            let [_, left, right] = operands::<3>(input, &format!("['{tag}', <pe>, <pe>]"))?;
            let left = self.decode(left).map_err(|err| RqlError::wrap(tag, err))?;
            let right = self.decode(right).map_err(|err| RqlError::wrap(tag, err))?;
            return Ok(if tag == "AND" {
                ExprNode::and(left, right)
            } else {
                ExprNode::or(left, right)
            });
        }
        let mut atom = (self.atom)();
        atom.unmarshal(input)?;
        Ok(ExprNode::Atom(atom))
    }
}

/// Destructures a tagged operator node of exactly `N` elements.
fn operands<'a, const N: usize>(input: &'a Value, format: &str) -> Result<&'a [Value; N]> {
    input
        .as_array()
        .and_then(|array| <&[Value; N]>::try_from(array.as_slice()).ok())
        .ok_or_else(|| RqlError::validation(format!("must be formatted as {format}")))
}

impl<P: ?Sized + AstNode> fmt::Debug for Expression<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expression").field("root", &self.root).finish()
    }
}

impl<P: ?Sized + AstNode + Capable> AstNode for Expression<P> {
    fn marshal(&self) -> Value {
        self.root.as_ref().map_or(Value::Null, ExprNode::marshal)
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        self.root = None;
        self.root = Some(self.decode(input)?);
        Ok(())
    }

    fn format(&self) -> String {
        format!("<PE {}>", P::NAME)
    }

    fn capabilities(&self) -> &'static [Capability] {
        P::CAPABILITIES
    }
}

impl ValuePredicate for Expression<dyn ValuePredicate> {
    /// A value is in the expression's domain if it is in any atom's domain.
    fn value_in_domain(&self, value: &Value) -> bool {
        self.any_atom(|p| p.value_in_domain(value))
    }

    /// Atoms are checked against their own domain, so an atom of another
    /// type is false inside the expression.
    fn eval_value(&self, value: &Value) -> bool {
        self.eval(|p| p.accepts(value))
    }
}

impl StringPredicate for Expression<dyn StringPredicate> {
    fn eval_string(&self, s: &str) -> bool {
        self.eval(|p| p.eval_string(s))
    }
}

impl NumericPredicate for Expression<dyn NumericPredicate> {
    fn eval_number(&self, n: f64) -> bool {
        self.eval(|p| p.eval_number(n))
    }
}

impl TimePredicate for Expression<dyn TimePredicate> {
    fn eval_time(&self, t: DateTime<Utc>) -> bool {
        self.eval(|p| p.eval_time(t))
    }
}

impl ArrayPredicate for Expression<dyn ArrayPredicate> {
    fn eval_array(&self, array: &[Value]) -> bool {
        self.eval(|p| p.eval_array(array))
    }
}

impl EntryPredicate for Expression<dyn EntryPredicate> {
    fn eval_entry(&self, entry: &Entry) -> bool {
        self.eval(|p| p.eval_entry(entry))
    }
}

impl EntrySchemaPredicate for Expression<dyn EntrySchemaPredicate> {
    fn eval_schema(&self, schema: &EntrySchema) -> bool {
        self.eval(|p| p.eval_schema(schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::array::Array;
    use crate::predicate::primitive::Boolean;
    use crate::predicate::string::string_predicate;
    use crate::predicate::value::value_predicate;
    use serde_json::json;

    fn string_expr() -> Expression<dyn StringPredicate> {
        Expression::new(|| -> Box<dyn StringPredicate> { Box::new(string_predicate()) })
    }

    #[test]
    fn atom_and_not() {
        let mut e = string_expr();
        e.unmarshal(&json!(["=", "foo"])).unwrap();
        assert!(e.eval_string("foo"));

        e.unmarshal(&json!(["NOT", ["=", "foo"]])).unwrap();
        assert!(!e.eval_string("foo"));
        assert!(e.eval_string("bar"));
        assert_eq!(e.marshal(), json!(["NOT", ["=", "foo"]]));
    }

    #[test]
    fn and_or_round_trip() {
        let input = json!(["OR", ["AND", ["glob", "f*"], ["NOT", ["=", "fox"]]], ["=", "bar"]]);
        let mut e = string_expr();
        e.unmarshal(&input).unwrap();
        assert_eq!(e.marshal(), input);
        assert!(e.eval_string("foo"));
        assert!(!e.eval_string("fox"));
        assert!(e.eval_string("bar"));
        assert!(!e.eval_string("baz"));
    }

    #[test]
    fn operator_errors_are_validation_errors() {
        let mut e = string_expr();

        let err = e.unmarshal(&json!(["NOT"])).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "must be formatted as ['NOT', <pe>]");

        let err = e.unmarshal(&json!(["AND", ["=", "a"]])).unwrap_err();
        assert_eq!(err.to_string(), "must be formatted as ['AND', <pe>, <pe>]");

        let err = e.unmarshal(&json!(["NOT", ["foo"]])).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("NOT: must be formatted as either"));
    }

    #[test]
    fn bare_atom_shape_errors_propagate_as_shape() {
        let mut e = string_expr();
        assert!(e.unmarshal(&json!(["foo"])).unwrap_err().is_shape());
    }

    #[test]
    fn undecoded_expression_is_false() {
        let e = string_expr();
        assert!(!e.eval_string("anything"));
        assert_eq!(e.marshal(), Value::Null);
    }

    #[test]
    fn value_expression_over_arrays_only_has_value_capability() {
        let mut e = value_predicate();
        e.unmarshal(&json!(["array", ["some", ["boolean", true]]]))
            .unwrap();
        assert_eq!(e.capabilities(), &[Capability::Value]);
        for other in [
            Capability::Entry,
            Capability::EntrySchema,
            Capability::String,
            Capability::Numeric,
            Capability::Time,
        ] {
            assert!(!e.has_capability(other));
        }
    }

    #[test]
    fn programmatic_trees() {
        let node = ExprNode::<dyn ValuePredicate>::or(
            ExprNode::atom(Box::new(Array::some(value_predicate().with_root(
                ExprNode::atom(Box::new(Boolean::new(true))),
            )))),
            ExprNode::not(ExprNode::atom(Box::new(Boolean::new(false)))),
        );
        let e = value_predicate().with_root(node);
        assert!(e.accepts(&json!([true])));
        assert!(e.accepts(&json!(true)));
        assert!(!e.accepts(&json!(false)));
        assert!(!e.accepts(&json!("foo")));
    }
}
