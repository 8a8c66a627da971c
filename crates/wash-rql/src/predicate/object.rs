//! The object predicate: `["object", [["key", <name>], <PE ValuePredicate>]]`.

use serde_json::{json, Map, Value};

use crate::ast::{AstNode, Capability, ObjectPredicate, ValuePredicate};
use crate::error::{Result, RqlError};
use crate::expression::Expression;
use crate::matcher::{tagged, tagged_payload};

use super::value::value_predicate;

/// Looks up `key`, falling back to an ASCII case-insensitive match.
pub fn lookup<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).or_else(|| {
        object
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

/// Matches objects whose `key` field satisfies the inner predicate.
///
/// A missing key is a non-match.
#[derive(Debug)]
pub struct Object {
    key: String,
    predicate: Expression<dyn ValuePredicate>,
}

impl Object {
    const FORMAT: &'static str = "['object', [['key', <key>], <PE ValuePredicate>]]";
    const ELEMENT_FORMAT: &'static str = "[['key', <key>], <PE ValuePredicate>]";

    pub fn new(key: impl Into<String>, predicate: Expression<dyn ValuePredicate>) -> Self {
        Object {
            key: key.into(),
            predicate,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn decode(payload: &Value) -> Result<(String, Expression<dyn ValuePredicate>)> {
        let element_error =
            || RqlError::validation(format!("must be formatted as {}", Self::ELEMENT_FORMAT));
        let [selector, raw] = payload
            .as_array()
            .and_then(|array| <&[Value; 2]>::try_from(array.as_slice()).ok())
            .ok_or_else(element_error)?;
        if !tagged(selector, "key") {
            return Err(element_error());
        }
        let key = tagged_payload(selector, "key", "['key', <key>]", "missing the key")?
            .as_str()
            .ok_or_else(|| RqlError::validation("key must be a string"))?;
        let mut predicate = value_predicate();
        predicate
            .unmarshal(raw)
            .map_err(RqlError::into_validation)?;
        Ok((key.to_string(), predicate))
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new(String::new(), value_predicate())
    }
}

impl AstNode for Object {
    fn marshal(&self) -> Value {
        json!(["object", [["key", self.key], self.predicate.marshal()]])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        let payload = tagged_payload(input, "object", Self::FORMAT, "missing the key predicate")?;
        let (key, predicate) = Self::decode(payload).map_err(|err| RqlError::wrap("object", err))?;
        self.key = key;
        self.predicate = predicate;
        Ok(())
    }

    fn format(&self) -> String {
        Self::FORMAT.to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Value, Capability::Object]
    }
}

impl ObjectPredicate for Object {
    fn eval_object(&self, object: &Map<String, Value>) -> bool {
        lookup(object, &self.key).is_some_and(|v| self.predicate.accepts(v))
    }
}

impl ValuePredicate for Object {
    fn value_in_domain(&self, value: &Value) -> bool {
        value.is_object()
    }

    fn eval_value(&self, value: &Value) -> bool {
        value
            .as_object()
            .is_some_and(|object| self.eval_object(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decoded(input: Value) -> Object {
        let mut p = Object::default();
        p.unmarshal(&input).unwrap();
        p
    }

    #[test]
    fn lookup_prefers_exact_match() {
        let object = json!({"Key": 1, "key": 2, "OTHER": 3});
        let object = object.as_object().unwrap();
        assert_eq!(lookup(object, "key"), Some(&json!(2)));
        assert_eq!(lookup(object, "other"), Some(&json!(3)));
        assert_eq!(lookup(object, "missing"), None);
    }

    #[test]
    fn evaluates_the_field() {
        let p = decoded(json!(["object", [["key", "arch"], ["string", ["=", "x86_64"]]]]));
        assert_eq!(p.key(), "arch");
        assert!(p.accepts(&json!({"arch": "x86_64"})));
        assert!(p.accepts(&json!({"ARCH": "x86_64"})));
        assert!(!p.accepts(&json!({"arch": "arm64"})));
        assert!(!p.accepts(&json!({"other": "x86_64"})));
        assert!(!p.accepts(&json!(["x86_64"])));
    }

    #[test]
    fn unmarshal_errors() {
        let mut p = Object::default();
        assert!(p.unmarshal(&json!(["array", []])).unwrap_err().is_shape());

        let err = p.unmarshal(&json!(["object", ["arch"]])).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "object: must be formatted as [['key', <key>], <PE ValuePredicate>]"
        );

        let err = p
            .unmarshal(&json!(["object", [["key", 1], ["null"]]]))
            .unwrap_err();
        assert_eq!(err.to_string(), "object: key must be a string");

        let err = p
            .unmarshal(&json!(["object", [["key", "a"], ["bogus"]]]))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("object: must be formatted as either"));
    }

    #[test]
    fn round_trip() {
        let input = json!(["object", [["key", "tags"], ["array", ["some", ["exists"]]]]]);
        assert_eq!(decoded(input.clone()).marshal(), input);
    }
}
