//! Entry and entry-schema predicates.
//!
//! `["name", S]`, `["path", S]` and `["meta", V]` apply to entries only.
//! `["action", a]` and `["kind", S]` apply to both entries and schemas.

use serde_json::{json, Value};

use crate::alternation::OneOf;
use crate::ast::{
    AstNode, Capability, EntryPredicate, EntrySchemaPredicate, StringPredicate, ValuePredicate,
};
use crate::entry::{is_action, Entry, EntrySchema, ACTIONS};
use crate::error::{Result, RqlError};
use crate::expression::Expression;
use crate::matcher::tagged_payload;

use super::decode_wrapped;
use super::string::string_expression;
use super::value::value_predicate;

const ENTRY: &[Capability] = &[Capability::Entry];
const BOTH: &[Capability] = &[Capability::Entry, Capability::EntrySchema];

/// `["name", <PE StringPredicate>]`: the entry's name.
#[derive(Debug)]
pub struct Name {
    predicate: Expression<dyn StringPredicate>,
}

impl Name {
    const FORMAT: &'static str = "['name', <PE StringPredicate>]";

    pub fn new(predicate: Expression<dyn StringPredicate>) -> Self {
        Name { predicate }
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::new(string_expression())
    }
}

impl AstNode for Name {
    fn marshal(&self) -> Value {
        json!(["name", self.predicate.marshal()])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        let mut predicate = string_expression();
        decode_wrapped(input, "name", Self::FORMAT, "missing the string predicate", &mut predicate)?;
        self.predicate = predicate;
        Ok(())
    }

    fn format(&self) -> String {
        Self::FORMAT.to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        ENTRY
    }
}

impl EntryPredicate for Name {
    fn eval_entry(&self, entry: &Entry) -> bool {
        self.predicate.eval_string(&entry.name)
    }
}

/// `["path", <PE StringPredicate>]`: the entry's full path.
#[derive(Debug)]
pub struct Path {
    predicate: Expression<dyn StringPredicate>,
}

impl Path {
    const FORMAT: &'static str = "['path', <PE StringPredicate>]";

    pub fn new(predicate: Expression<dyn StringPredicate>) -> Self {
        Path { predicate }
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::new(string_expression())
    }
}

impl AstNode for Path {
    fn marshal(&self) -> Value {
        json!(["path", self.predicate.marshal()])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        let mut predicate = string_expression();
        decode_wrapped(input, "path", Self::FORMAT, "missing the string predicate", &mut predicate)?;
        self.predicate = predicate;
        Ok(())
    }

    fn format(&self) -> String {
        Self::FORMAT.to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        ENTRY
    }
}

impl EntryPredicate for Path {
    fn eval_entry(&self, entry: &Entry) -> bool {
        self.predicate.eval_string(&entry.path)
    }
}

/// `["meta", <PE ValuePredicate>]`: the entry's metadata document.
#[derive(Debug)]
pub struct Meta {
    predicate: Expression<dyn ValuePredicate>,
}

impl Meta {
    const FORMAT: &'static str = "['meta', <PE ValuePredicate>]";

    pub fn new(predicate: Expression<dyn ValuePredicate>) -> Self {
        Meta { predicate }
    }

    pub fn predicate(&self) -> &Expression<dyn ValuePredicate> {
        &self.predicate
    }
}

impl Default for Meta {
    fn default() -> Self {
        Self::new(value_predicate())
    }
}

impl AstNode for Meta {
    fn marshal(&self) -> Value {
        json!(["meta", self.predicate.marshal()])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        let mut predicate = value_predicate();
        decode_wrapped(input, "meta", Self::FORMAT, "missing the value predicate", &mut predicate)?;
        self.predicate = predicate;
        Ok(())
    }

    fn format(&self) -> String {
        Self::FORMAT.to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        ENTRY
    }
}

impl EntryPredicate for Meta {
    fn eval_entry(&self, entry: &Entry) -> bool {
        self.predicate.accepts(&entry.meta)
    }
}

/// `["action", "<name>"]`: the entry (or kind) supports an action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Action {
    action: String,
}

impl Action {
    const FORMAT: &'static str = "['action', <action>]";

    pub fn new(action: &str) -> Result<Self> {
        if !is_action(action) {
            return Err(RqlError::validation(format!(
                "unknown action {action}; valid actions are {}",
                ACTIONS.join(", ")
            )));
        }
        Ok(Action {
            action: action.to_string(),
        })
    }
}

impl AstNode for Action {
    fn marshal(&self) -> Value {
        json!(["action", self.action])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        let payload = tagged_payload(input, "action", Self::FORMAT, "missing the action")?;
        let action = payload
            .as_str()
            .ok_or_else(|| RqlError::validation("action must be a string"))?;
        *self = Action::new(action)?;
        Ok(())
    }

    fn format(&self) -> String {
        Self::FORMAT.to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        BOTH
    }
}

impl EntryPredicate for Action {
    fn eval_entry(&self, entry: &Entry) -> bool {
        entry.supports(&self.action)
    }
}

impl EntrySchemaPredicate for Action {
    fn eval_schema(&self, schema: &EntrySchema) -> bool {
        schema.supports(&self.action)
    }
}

/// `["kind", <PE StringPredicate>]`: the schema's type ID.
///
/// Entries without a schema never match.
#[derive(Debug)]
pub struct Kind {
    predicate: Expression<dyn StringPredicate>,
}

impl Kind {
    const FORMAT: &'static str = "['kind', <PE StringPredicate>]";

    pub fn new(predicate: Expression<dyn StringPredicate>) -> Self {
        Kind { predicate }
    }
}

impl Default for Kind {
    fn default() -> Self {
        Self::new(string_expression())
    }
}

impl AstNode for Kind {
    fn marshal(&self) -> Value {
        json!(["kind", self.predicate.marshal()])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        let mut predicate = string_expression();
        decode_wrapped(input, "kind", Self::FORMAT, "missing the string predicate", &mut predicate)?;
        self.predicate = predicate;
        Ok(())
    }

    fn format(&self) -> String {
        Self::FORMAT.to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        BOTH
    }
}

impl EntryPredicate for Kind {
    fn eval_entry(&self, entry: &Entry) -> bool {
        entry
            .schema
            .as_ref()
            .is_some_and(|schema| self.eval_schema(schema))
    }
}

impl EntrySchemaPredicate for Kind {
    fn eval_schema(&self, schema: &EntrySchema) -> bool {
        self.predicate.eval_string(&schema.type_id)
    }
}

/// Every entry predicate kind.
pub fn entry_alternation() -> OneOf<dyn EntryPredicate> {
    OneOf::new()
        .or(|| -> Box<dyn EntryPredicate> { Box::new(Name::default()) })
        .or(|| -> Box<dyn EntryPredicate> { Box::new(Path::default()) })
        .or(|| -> Box<dyn EntryPredicate> { Box::new(Meta::default()) })
        .or(|| -> Box<dyn EntryPredicate> { Box::new(Action::default()) })
        .or(|| -> Box<dyn EntryPredicate> { Box::new(Kind::default()) })
}

/// A boolean expression over entry predicates.
pub fn entry_predicate() -> Expression<dyn EntryPredicate> {
    Expression::new(|| -> Box<dyn EntryPredicate> { Box::new(entry_alternation()) })
}

/// Every entry-schema predicate kind.
pub fn schema_alternation() -> OneOf<dyn EntrySchemaPredicate> {
    OneOf::new()
        .or(|| -> Box<dyn EntrySchemaPredicate> { Box::new(Action::default()) })
        .or(|| -> Box<dyn EntrySchemaPredicate> { Box::new(Kind::default()) })
}

/// A boolean expression over entry-schema predicates.
pub fn schema_predicate() -> Expression<dyn EntrySchemaPredicate> {
    Expression::new(|| -> Box<dyn EntrySchemaPredicate> { Box::new(schema_alternation()) })
}
