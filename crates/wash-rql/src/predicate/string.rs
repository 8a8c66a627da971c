//! String predicates: glob, regex and equality.

use glob::Pattern;
use regex::Regex;
use serde_json::{json, Value};

use crate::alternation::OneOf;
use crate::ast::{AstNode, Capability, StringPredicate, ValuePredicate};
use crate::error::{Result, RqlError};
use crate::expression::Expression;
use crate::matcher::tagged_payload;

use super::decode_wrapped;

/// Shell-glob match: `["glob", "<glob>"]`.
#[derive(Debug, Clone, Default)]
pub struct StringGlob {
    source: String,
    pattern: Option<Pattern>,
}

impl StringGlob {
    const FORMAT: &'static str = "['glob', <glob_str>]";

    pub fn new(glob: &str) -> Result<Self> {
        let pattern = Pattern::new(glob)
            .map_err(|err| RqlError::validation(format!("invalid glob {glob}: {err}")))?;
        Ok(StringGlob {
            source: glob.to_string(),
            pattern: Some(pattern),
        })
    }
}

impl AstNode for StringGlob {
    fn marshal(&self) -> Value {
        json!(["glob", self.source])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        let payload = tagged_payload(input, "glob", Self::FORMAT, "missing the glob")?;
        let glob = payload
            .as_str()
            .ok_or_else(|| RqlError::validation("glob must be a string"))?;
        *self = StringGlob::new(glob)?;
        Ok(())
    }

    fn format(&self) -> String {
        Self::FORMAT.to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::String]
    }
}

impl StringPredicate for StringGlob {
    fn eval_string(&self, s: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.matches(s))
    }
}

/// Full-string regex match: `["regex", "<regex>"]`.
#[derive(Debug, Clone, Default)]
pub struct StringRegex {
    source: String,
    regex: Option<Regex>,
}

impl StringRegex {
    const FORMAT: &'static str = "['regex', <regex_str>]";

    pub fn new(source: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{source})$"))
            .map_err(|err| RqlError::validation(format!("invalid regex {source}: {err}")))?;
        Ok(StringRegex {
            source: source.to_string(),
            regex: Some(regex),
        })
    }
}

impl AstNode for StringRegex {
    fn marshal(&self) -> Value {
        json!(["regex", self.source])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        let payload = tagged_payload(input, "regex", Self::FORMAT, "missing the regex")?;
        let source = payload
            .as_str()
            .ok_or_else(|| RqlError::validation("regex must be a string"))?;
        *self = StringRegex::new(source)?;
        Ok(())
    }

    fn format(&self) -> String {
        Self::FORMAT.to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::String]
    }
}

impl StringPredicate for StringRegex {
    fn eval_string(&self, s: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(s))
    }
}

/// Exact equality: `["=", "<str>"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringEqual {
    value: String,
}

impl StringEqual {
    const FORMAT: &'static str = "['=', <str>]";

    pub fn new(value: impl Into<String>) -> Self {
        StringEqual {
            value: value.into(),
        }
    }
}

impl AstNode for StringEqual {
    fn marshal(&self) -> Value {
        json!(["=", self.value])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        let payload = tagged_payload(input, "=", Self::FORMAT, "missing the string")?;
        let value = payload
            .as_str()
            .ok_or_else(|| RqlError::validation("must provide a string"))?;
        self.value = value.to_string();
        Ok(())
    }

    fn format(&self) -> String {
        Self::FORMAT.to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::String]
    }
}

impl StringPredicate for StringEqual {
    fn eval_string(&self, s: &str) -> bool {
        s == self.value
    }
}

/// The string predicate alternation: glob, regex, then equality.
pub fn string_predicate() -> OneOf<dyn StringPredicate> {
    OneOf::new()
        .or(|| -> Box<dyn StringPredicate> { Box::new(StringGlob::default()) })
        .or(|| -> Box<dyn StringPredicate> { Box::new(StringRegex::default()) })
        .or(|| -> Box<dyn StringPredicate> { Box::new(StringEqual::default()) })
}

/// A boolean expression over string predicates.
pub fn string_expression() -> Expression<dyn StringPredicate> {
    Expression::new(|| -> Box<dyn StringPredicate> { Box::new(string_predicate()) })
}

/// A string predicate lifted to values: `["string", <string_predicate>]`.
///
/// Its domain is exactly the string-typed values.
#[derive(Debug)]
pub struct StringValue {
    inner: Box<dyn StringPredicate>,
}

impl StringValue {
    const FORMAT: &'static str = "['string', <string_predicate>]";

    pub fn new(inner: Box<dyn StringPredicate>) -> Self {
        StringValue { inner }
    }

    pub fn glob(glob: &str) -> Result<Self> {
        Ok(Self::new(Box::new(StringGlob::new(glob)?)))
    }

    pub fn regex(regex: &str) -> Result<Self> {
        Ok(Self::new(Box::new(StringRegex::new(regex)?)))
    }

    pub fn equal(value: impl Into<String>) -> Self {
        Self::new(Box::new(StringEqual::new(value)))
    }
}

impl Default for StringValue {
    fn default() -> Self {
        Self::new(Box::new(string_predicate()))
    }
}

impl AstNode for StringValue {
    fn marshal(&self) -> Value {
        json!(["string", self.inner.marshal()])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        let mut inner = string_predicate();
        decode_wrapped(
            input,
            "string",
            Self::FORMAT,
            "missing the string predicate",
            &mut inner,
        )?;
        self.inner = Box::new(inner);
        Ok(())
    }

    fn format(&self) -> String {
        Self::FORMAT.to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Value, Capability::String]
    }
}

impl StringPredicate for StringValue {
    fn eval_string(&self, s: &str) -> bool {
        self.inner.eval_string(s)
    }
}

impl ValuePredicate for StringValue {
    fn value_in_domain(&self, value: &Value) -> bool {
        value.is_string()
    }

    fn eval_value(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|s| self.eval_string(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn glob_unmarshal_errors() {
        let mut p = StringGlob::default();
        assert!(p.unmarshal(&json!(["regex", "a"])).unwrap_err().is_shape());
        assert_eq!(
            p.unmarshal(&json!(["glob"])).unwrap_err().to_string(),
            "missing the glob"
        );
        assert_eq!(
            p.unmarshal(&json!(["glob", 1])).unwrap_err().to_string(),
            "glob must be a string"
        );
        let err = p.unmarshal(&json!(["glob", "[a"])).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("invalid glob [a"));
    }

    #[test]
    fn glob_matches() {
        let mut p = StringGlob::default();
        p.unmarshal(&json!(["glob", "*.txt"])).unwrap();
        assert!(p.eval_string("notes.txt"));
        assert!(!p.eval_string("notes.md"));
        assert_eq!(p.marshal(), json!(["glob", "*.txt"]));
    }

    #[test]
    fn regex_is_a_full_match() {
        let p = StringRegex::new("fo+").unwrap();
        assert!(p.eval_string("foo"));
        assert!(!p.eval_string("foobar"));
        assert!(!p.eval_string("afoo"));
        assert_eq!(p.marshal(), json!(["regex", "fo+"]));
    }

    #[test]
    fn regex_alternation_is_anchored_as_a_group() {
        let p = StringRegex::new("a|b").unwrap();
        assert!(p.eval_string("a"));
        assert!(!p.eval_string("ab"));
    }

    #[test]
    fn invalid_regex_is_validation_error() {
        let mut p = StringRegex::default();
        let err = p.unmarshal(&json!(["regex", "("])).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("invalid regex ("));
    }

    #[test]
    fn equal_unmarshal() {
        let mut p = StringEqual::default();
        assert!(p.unmarshal(&json!(["glob", "a"])).unwrap_err().is_shape());
        assert_eq!(
            p.unmarshal(&json!(["=", "a", "b"])).unwrap_err().to_string(),
            "must be formatted as ['=', <str>]"
        );
        assert_eq!(
            p.unmarshal(&json!(["=", true])).unwrap_err().to_string(),
            "must provide a string"
        );
        p.unmarshal(&json!(["=", "a"])).unwrap();
        assert_eq!(p, StringEqual::new("a"));
    }

    #[test]
    fn string_value_domain() {
        let p = StringValue::equal("foo");
        assert!(p.value_in_domain(&json!("foo")));
        assert!(!p.value_in_domain(&json!(1)));
        assert!(p.accepts(&json!("foo")));
        assert!(!p.accepts(&json!(["foo"])));
    }

    #[test]
    fn string_value_inner_errors_are_validation_errors() {
        let mut p = StringValue::default();
        assert!(p.unmarshal(&json!(["number", 1])).unwrap_err().is_shape());
        let err = p.unmarshal(&json!(["string", ["foo"]])).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("must be formatted as either"));
        assert_eq!(
            p.unmarshal(&json!(["string"])).unwrap_err().to_string(),
            "missing the string predicate"
        );
    }

    #[test]
    fn string_value_round_trip() {
        let input = json!(["string", ["regex", "x.*"]]);
        let mut p = StringValue::default();
        p.unmarshal(&input).unwrap();
        assert_eq!(p.marshal(), input);
        assert!(p.accepts(&json!("xyz")));
    }
}
