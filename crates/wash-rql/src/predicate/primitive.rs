//! Predicates over JSON primitives: `null`, `exists`, `empty`, `boolean`.

use serde_json::{json, Value};

use crate::ast::{AstNode, Capability, ValuePredicate};
use crate::error::{Result, RqlError};
use crate::matcher::{tag_only, tagged_payload};

const VALUE: &[Capability] = &[Capability::Value];

/// `["null"]`: the value is JSON null.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Null;

impl AstNode for Null {
    fn marshal(&self) -> Value {
        json!(["null"])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        tag_only(input, "null", "['null']")
    }

    fn format(&self) -> String {
        "['null']".to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        VALUE
    }
}

impl ValuePredicate for Null {
    fn value_in_domain(&self, _value: &Value) -> bool {
        true
    }

    fn eval_value(&self, value: &Value) -> bool {
        value.is_null()
    }
}

/// `["exists"]`: matches any value that is present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Exists;

impl AstNode for Exists {
    fn marshal(&self) -> Value {
        json!(["exists"])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        tag_only(input, "exists", "['exists']")
    }

    fn format(&self) -> String {
        "['exists']".to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        VALUE
    }
}

impl ValuePredicate for Exists {
    fn value_in_domain(&self, _value: &Value) -> bool {
        true
    }

    fn eval_value(&self, _value: &Value) -> bool {
        true
    }
}

/// `["empty"]`: an array or object with no elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Empty;

impl AstNode for Empty {
    fn marshal(&self) -> Value {
        json!(["empty"])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        tag_only(input, "empty", "['empty']")
    }

    fn format(&self) -> String {
        "['empty']".to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        VALUE
    }
}

impl ValuePredicate for Empty {
    fn value_in_domain(&self, value: &Value) -> bool {
        value.is_array() || value.is_object()
    }

    fn eval_value(&self, value: &Value) -> bool {
        match value {
            Value::Array(array) => array.is_empty(),
            Value::Object(object) => object.is_empty(),
            _ => false,
        }
    }
}

/// `["boolean", b]`: the value is the boolean `b`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boolean {
    value: bool,
}

impl Boolean {
    const FORMAT: &'static str = "['boolean', <bool>]";

    pub fn new(value: bool) -> Self {
        Boolean { value }
    }
}

impl AstNode for Boolean {
    fn marshal(&self) -> Value {
        json!(["boolean", self.value])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        let payload = tagged_payload(input, "boolean", Self::FORMAT, "missing the boolean")?;
        self.value = payload
            .as_bool()
            .ok_or_else(|| RqlError::validation("must provide a boolean"))?;
        Ok(())
    }

    fn format(&self) -> String {
        Self::FORMAT.to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        VALUE
    }
}

impl ValuePredicate for Boolean {
    fn value_in_domain(&self, value: &Value) -> bool {
        value.is_boolean()
    }

    fn eval_value(&self, value: &Value) -> bool {
        value.as_bool() == Some(self.value)
    }
}
