//! The AST node contract and the predicate capabilities.
//!
//! Every predicate is an [`AstNode`]: it decodes itself from the wire
//! encoding with [`AstNode::unmarshal`] and encodes itself back with
//! [`AstNode::marshal`]. What a node can be evaluated against is a
//! separate concern, expressed as capability traits such as
//! [`ValuePredicate`] or [`EntryPredicate`]. A node may carry several
//! capabilities; [`AstNode::capabilities`] lists them so callers can ask
//! before they cast.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::entry::{Entry, EntrySchema};
use crate::error::Result;

/// A node of the predicate AST.
///
/// `unmarshal` must distinguish shape errors (the input is some other
/// construct) from validation errors (the input is this construct, but
/// malformed). A node is only evaluated after a successful `unmarshal`
/// or when built directly through its constructors.
pub trait AstNode: fmt::Debug + Send + Sync {
    /// Encodes the node in its canonical tag-first array form.
    fn marshal(&self) -> Value;

    /// Decodes the node from `input`, replacing its current state.
    fn unmarshal(&mut self, input: &Value) -> Result<()>;

    /// Describes the expected wire shape, e.g. `['glob', <glob_str>]`.
    fn format(&self) -> String;

    /// The capabilities this node can be evaluated through.
    fn capabilities(&self) -> &'static [Capability];

    fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

/// The closed set of evaluation capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Value,
    String,
    Numeric,
    Time,
    Array,
    Object,
    Entry,
    EntrySchema,
}

/// A predicate over one JSON value, guarded by a domain check.
pub trait ValuePredicate: AstNode {
    /// Returns `true` if `value` has a type this predicate can evaluate.
    fn value_in_domain(&self, value: &Value) -> bool;

    /// Evaluates the predicate. Only meaningful when `value_in_domain` holds.
    fn eval_value(&self, value: &Value) -> bool;

    /// Domain check and evaluation in one step. Out-of-domain values never match.
    fn accepts(&self, value: &Value) -> bool {
        self.value_in_domain(value) && self.eval_value(value)
    }
}

pub trait StringPredicate: AstNode {
    fn eval_string(&self, s: &str) -> bool;
}

pub trait NumericPredicate: AstNode {
    fn eval_number(&self, n: f64) -> bool;
}

pub trait TimePredicate: AstNode {
    fn eval_time(&self, t: DateTime<Utc>) -> bool;
}

pub trait ArrayPredicate: AstNode {
    fn eval_array(&self, array: &[Value]) -> bool;
}

pub trait ObjectPredicate: AstNode {
    fn eval_object(&self, object: &Map<String, Value>) -> bool;
}

pub trait EntryPredicate: AstNode {
    fn eval_entry(&self, entry: &Entry) -> bool;
}

pub trait EntrySchemaPredicate: AstNode {
    fn eval_schema(&self, schema: &EntrySchema) -> bool;
}

/// Static description of a capability trait object.
///
/// Generic wrappers ([`OneOf`](crate::OneOf), [`Expression`](crate::Expression))
/// use it to report the capabilities and names of what they wrap.
pub trait Capable {
    /// Name used in format descriptions, e.g. `ValuePredicate`.
    const NAME: &'static str;
    const CAPABILITIES: &'static [Capability];
}

impl Capable for dyn ValuePredicate {
    const NAME: &'static str = "ValuePredicate";
    const CAPABILITIES: &'static [Capability] = &[Capability::Value];
}

impl Capable for dyn StringPredicate {
    const NAME: &'static str = "StringPredicate";
    const CAPABILITIES: &'static [Capability] = &[Capability::String];
}

impl Capable for dyn NumericPredicate {
    const NAME: &'static str = "NumericPredicate";
    const CAPABILITIES: &'static [Capability] = &[Capability::Numeric];
}

impl Capable for dyn TimePredicate {
    const NAME: &'static str = "TimePredicate";
    const CAPABILITIES: &'static [Capability] = &[Capability::Time];
}

impl Capable for dyn ArrayPredicate {
    const NAME: &'static str = "ArrayPredicate";
    const CAPABILITIES: &'static [Capability] = &[Capability::Array];
}

impl Capable for dyn EntryPredicate {
    const NAME: &'static str = "EntryPredicate";
    const CAPABILITIES: &'static [Capability] = &[Capability::Entry];
}

impl Capable for dyn EntrySchemaPredicate {
    const NAME: &'static str = "EntrySchemaPredicate";
    const CAPABILITIES: &'static [Capability] = &[Capability::EntrySchema];
}
