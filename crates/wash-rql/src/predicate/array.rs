//! The array predicate: `["array", [selector, <PE ValuePredicate>]]`.
//!
//! The selector quantifies over the elements:
//!
//! - `"some"`: at least one element matches (false for `[]`)
//! - `"all"`: every element matches (true for `[]`)
//! - `n`: element `n` exists and matches
//!
//! Elements outside the inner predicate's domain never match.

use serde_json::{json, Value};

use crate::ast::{ArrayPredicate, AstNode, Capability, ValuePredicate};
use crate::error::{Result, RqlError};
use crate::expression::Expression;
use crate::matcher::{array_with_head, tagged_payload};

use super::value::value_predicate;

/// How an array predicate aggregates per-element results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Some,
    All,
    Index(usize),
}

impl Selector {
    fn marshal(self) -> Value {
        match self {
            Selector::Some => json!("some"),
            Selector::All => json!("all"),
            Selector::Index(n) => json!(n),
        }
    }

    fn unmarshal(value: &Value) -> Result<Self> {
        if let Some(index) = value.as_u64() {
            return usize::try_from(index)
                .map(Selector::Index)
                .map_err(|_| RqlError::validation("index is too large"));
        }
        match value {
            Value::String(s) if s == "some" => Ok(Selector::Some),
            Value::String(s) if s == "all" => Ok(Selector::All),
            Value::Number(n) => match n.as_f64() {
                Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= usize::MAX as f64 => {
                    Ok(Selector::Index(f as usize))
                }
                _ => Err(RqlError::validation("index must be an unsigned integer")),
            },
            _ => Err(RqlError::validation(
                "selector must be 'some', 'all', or an index",
            )),
        }
    }

    fn is_selector(value: &Value) -> bool {
        value.is_number() || matches!(value.as_str(), Some("some" | "all"))
    }
}

/// The `[selector, <PE ValuePredicate>]` pair inside an array predicate.
#[derive(Debug)]
pub struct ElementPredicate {
    selector: Selector,
    predicate: Expression<dyn ValuePredicate>,
}

impl ElementPredicate {
    const FORMAT: &'static str = "[<element_selector>, <PE ValuePredicate>]";

    pub fn new(selector: Selector, predicate: Expression<dyn ValuePredicate>) -> Self {
        ElementPredicate {
            selector,
            predicate,
        }
    }

    pub fn selector(&self) -> Selector {
        self.selector
    }

    fn format_error() -> RqlError {
        RqlError::validation(format!("must be formatted as {}", Self::FORMAT))
    }
}

impl Default for ElementPredicate {
    fn default() -> Self {
        Self::new(Selector::Some, value_predicate())
    }
}

impl AstNode for ElementPredicate {
    fn marshal(&self) -> Value {
        json!([self.selector.marshal(), self.predicate.marshal()])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        let array = match input.as_array() {
            Some(array) if array_with_head(input, Selector::is_selector) => array,
            _ => {
                return Err(RqlError::shape(format!(
                    "must be formatted as {}",
                    Self::FORMAT
                )))
            }
        };
        if array.len() > 2 {
            return Err(Self::format_error());
        }
        let selector = Selector::unmarshal(&array[0])?;
        let Some(raw) = array.get(1) else {
            return Err(Self::format_error()
                .with_cause(RqlError::validation("missing the PE ValuePredicate")));
        };
        let mut predicate = value_predicate();
        predicate
            .unmarshal(raw)
            .map_err(RqlError::into_validation)?;
        self.selector = selector;
        self.predicate = predicate;
        Ok(())
    }

    fn format(&self) -> String {
        Self::FORMAT.to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Array]
    }
}

impl ArrayPredicate for ElementPredicate {
    fn eval_array(&self, array: &[Value]) -> bool {
        let matches = |v: &Value| self.predicate.accepts(v);
        match self.selector {
            Selector::Some => array.iter().any(matches),
            Selector::All => array.iter().all(matches),
            Selector::Index(n) => array.get(n).is_some_and(matches),
        }
    }
}

/// `["array", [selector, <PE ValuePredicate>]]`.
#[derive(Debug, Default)]
pub struct Array {
    element: ElementPredicate,
}

impl Array {
    const FORMAT: &'static str = "['array', [<element_selector>, <PE ValuePredicate>]]";

    pub fn new(selector: Selector, predicate: Expression<dyn ValuePredicate>) -> Self {
        Array {
            element: ElementPredicate::new(selector, predicate),
        }
    }

    pub fn some(predicate: Expression<dyn ValuePredicate>) -> Self {
        Self::new(Selector::Some, predicate)
    }

    pub fn all(predicate: Expression<dyn ValuePredicate>) -> Self {
        Self::new(Selector::All, predicate)
    }

    pub fn index(n: usize, predicate: Expression<dyn ValuePredicate>) -> Self {
        Self::new(Selector::Index(n), predicate)
    }

    pub fn selector(&self) -> Selector {
        self.element.selector()
    }
}

impl AstNode for Array {
    fn marshal(&self) -> Value {
        json!(["array", self.element.marshal()])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        let payload = tagged_payload(
            input,
            "array",
            Self::FORMAT,
            "missing the element predicate",
        )?;
        let mut element = ElementPredicate::default();
        element
            .unmarshal(payload)
            .map_err(|err| RqlError::wrap("array", err))?;
        self.element = element;
        Ok(())
    }

    fn format(&self) -> String {
        Self::FORMAT.to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Value, Capability::Array]
    }
}

impl ArrayPredicate for Array {
    fn eval_array(&self, array: &[Value]) -> bool {
        self.element.eval_array(array)
    }
}

impl ValuePredicate for Array {
    fn value_in_domain(&self, value: &Value) -> bool {
        value.is_array()
    }

    fn eval_value(&self, value: &Value) -> bool {
        value.as_array().is_some_and(|array| self.eval_array(array))
    }
}
