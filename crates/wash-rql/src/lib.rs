//! wash-rql - a typed predicate language for filtering resource entries.
//!
//! Predicates are JSON arrays whose first element is a tag:
//!
//! ```text
//! ["string", ["glob", "*.txt"]]
//! ["array", ["some", ["boolean", true]]]
//! ["meta", ["object", [["key", "state"], ["string", ["=", "running"]]]]]
//! ["NOT", <predicate>]
//! ["AND", <predicate>, <predicate>]
//! ["OR", <predicate>, <predicate>]
//! ```
//!
//! Decoding goes through [`AstNode::unmarshal`]; evaluation goes through
//! capability traits such as [`ValuePredicate`] and [`EntryPredicate`].
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use wash_rql::{AstNode, ValuePredicate, value_predicate};
//!
//! let mut p = value_predicate();
//! p.unmarshal(&json!(["array", ["some", ["boolean", true]]]))?;
//!
//! assert!(p.accepts(&json!([false, true])));
//! assert!(!p.accepts(&json!([false])));
//! # Ok::<(), wash_rql::RqlError>(())
//! ```
//!
//! # Errors
//!
//! Decoding distinguishes a *shape* error (the input is some other
//! construct) from a *validation* error (the input is this construct but
//! malformed). Alternations move on after a shape error and stop at a
//! validation error, so diagnostics always describe the construct the
//! input was evidently meant to be.
//!
//! Evaluation never fails: missing keys, out-of-range indices and
//! values of the wrong type simply do not match.

pub mod alternation;
pub mod ast;
pub mod entry;
mod error;
pub mod expression;
pub mod matcher;
mod op;
pub mod predicate;
mod query;

pub use alternation::OneOf;
pub use ast::{
    ArrayPredicate, AstNode, Capability, Capable, EntryPredicate, EntrySchemaPredicate,
    NumericPredicate, ObjectPredicate, StringPredicate, TimePredicate, ValuePredicate,
};
pub use entry::{Entry, EntrySchema, ACTIONS};
pub use error::{ErrorKind, Result, RqlError};
pub use expression::{ExprNode, Expression};
pub use op::ComparisonOp;
pub use predicate::array::{Array, Selector};
pub use predicate::entry::{entry_predicate, schema_predicate, Action, Kind, Meta, Name, Path};
pub use predicate::numeric::{NumericComparison, NumericValue};
pub use predicate::object::Object;
pub use predicate::primitive::{Boolean, Empty, Exists, Null};
pub use predicate::string::{StringEqual, StringGlob, StringRegex, StringValue};
pub use predicate::time::{TimeComparison, TimeValue};
pub use predicate::value::{value_expression, value_predicate};
pub use query::Query;
