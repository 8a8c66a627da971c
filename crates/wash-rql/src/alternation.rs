//! Alternation: one node that accepts any of several known shapes.
//!
//! A [`OneOf`] holds an ordered list of candidate templates. Decoding
//! tries a fresh instance of each template in turn:
//!
//! - a shape error discards the candidate and moves on;
//! - a validation error stops the search and is returned as is;
//! - the first success becomes the selected candidate.
//!
//! If every candidate reports a shape error, the alternation itself fails
//! with a shape error listing all the accepted formats.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::ast::{
    ArrayPredicate, AstNode, Capability, Capable, EntryPredicate, EntrySchemaPredicate,
    NumericPredicate, StringPredicate, TimePredicate, ValuePredicate,
};
use crate::entry::{Entry, EntrySchema};
use crate::error::{Result, RqlError};
use crate::matcher::join_either;

/// Builds a fresh, undecoded candidate.
pub type Template<P> = fn() -> Box<P>;

/// A node that is exactly one of several candidate shapes.
pub struct OneOf<P: ?Sized> {
    templates: Vec<Template<P>>,
    selected: Option<Box<P>>,
}

impl<P: ?Sized + AstNode> OneOf<P> {
    /// Creates an alternation with no candidates.
    pub fn new() -> Self {
        OneOf {
            templates: Vec::new(),
            selected: None,
        }
    }

    /// Appends a candidate. Candidates are tried in insertion order.
    pub fn or(mut self, template: Template<P>) -> Self {
        self.templates.push(template);
        self
    }

    /// Creates an alternation that already selected `node`.
    pub fn selecting(mut self, node: Box<P>) -> Self {
        self.selected = Some(node);
        self
    }

    /// The candidate chosen by the last successful `unmarshal`.
    pub fn selected(&self) -> Option<&P> {
        self.selected.as_deref()
    }

    fn formats(&self) -> Vec<String> {
        self.templates
            .iter()
            .map(|template| template().format())
            .collect()
    }

    /// Runs `f` against the selected candidate.
    ///
    /// Evaluating an undecoded alternation is a programming error; release
    /// builds treat it as a non-match.
    fn with_selected(&self, f: impl FnOnce(&P) -> bool) -> bool {
        debug_assert!(
            self.selected.is_some(),
            "alternation evaluated before a candidate was selected"
        );
        self.selected.as_deref().is_some_and(f)
    }
}

impl<P: ?Sized + AstNode> Default for OneOf<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized + AstNode> fmt::Debug for OneOf<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneOf")
            .field("candidates", &self.templates.len())
            .field("selected", &self.selected)
            .finish()
    }
}

impl<P: ?Sized + AstNode + Capable> AstNode for OneOf<P> {
    fn marshal(&self) -> Value {
        self.selected
            .as_ref()
            .map_or(Value::Null, |selected| selected.marshal())
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        self.selected = None;
        for template in &self.templates {
            let mut candidate = template();
            match candidate.unmarshal(input) {
                Ok(()) => {
                    log::debug!("{}: selected {}", P::NAME, candidate.format());
                    self.selected = Some(candidate);
                    return Ok(());
                }
                Err(err) if err.is_shape() => continue,
                Err(err) => {
                    log::debug!("{}: {} rejected input: {err}", P::NAME, candidate.format());
                    return Err(err);
                }
            }
        }
        Err(RqlError::shape(format!("must be formatted as {}", self.format())))
    }

    fn format(&self) -> String {
        join_either(&self.formats())
    }

    fn capabilities(&self) -> &'static [Capability] {
        P::CAPABILITIES
    }
}

impl ValuePredicate for OneOf<dyn ValuePredicate> {
    fn value_in_domain(&self, value: &Value) -> bool {
        self.with_selected(|p| p.value_in_domain(value))
    }

    fn eval_value(&self, value: &Value) -> bool {
        self.with_selected(|p| p.eval_value(value))
    }
}

impl StringPredicate for OneOf<dyn StringPredicate> {
    fn eval_string(&self, s: &str) -> bool {
        self.with_selected(|p| p.eval_string(s))
    }
}

impl NumericPredicate for OneOf<dyn NumericPredicate> {
    fn eval_number(&self, n: f64) -> bool {
        self.with_selected(|p| p.eval_number(n))
    }
}

impl TimePredicate for OneOf<dyn TimePredicate> {
    fn eval_time(&self, t: DateTime<Utc>) -> bool {
        self.with_selected(|p| p.eval_time(t))
    }
}

impl ArrayPredicate for OneOf<dyn ArrayPredicate> {
    fn eval_array(&self, array: &[Value]) -> bool {
        self.with_selected(|p| p.eval_array(array))
    }
}

impl EntryPredicate for OneOf<dyn EntryPredicate> {
    fn eval_entry(&self, entry: &Entry) -> bool {
        self.with_selected(|p| p.eval_entry(entry))
    }
}

impl EntrySchemaPredicate for OneOf<dyn EntrySchemaPredicate> {
    fn eval_schema(&self, schema: &EntrySchema) -> bool {
        self.with_selected(|p| p.eval_schema(schema))
    }
}
