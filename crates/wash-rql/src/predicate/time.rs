//! Time predicates: `[op, "<RFC3339>"]` comparisons and their value wrapper.
//!
//! Time values are RFC3339 strings. Numbers are counts, not timestamps, and
//! fall outside the domain.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::alternation::OneOf;
use crate::ast::{AstNode, Capability, TimePredicate, ValuePredicate};
use crate::error::{Result, RqlError};
use crate::matcher::tagged_payload;
use crate::op::ComparisonOp;

use super::decode_wrapped;

/// Interprets a JSON value as a point in time.
pub fn to_time(value: &Value) -> Option<DateTime<Utc>> {
    let s = value.as_str()?;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Compares a time against a fixed instant: `[op, "<RFC3339>"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeComparison {
    op: ComparisonOp,
    operand: DateTime<Utc>,
}

impl TimeComparison {
    pub fn new(op: ComparisonOp, operand: DateTime<Utc>) -> Self {
        TimeComparison { op, operand }
    }

    pub fn op(&self) -> ComparisonOp {
        self.op
    }

    pub fn operand(&self) -> DateTime<Utc> {
        self.operand
    }

    fn template(op: ComparisonOp) -> Box<dyn TimePredicate> {
        Box::new(TimeComparison::new(op, DateTime::<Utc>::UNIX_EPOCH))
    }
}

impl AstNode for TimeComparison {
    fn marshal(&self) -> Value {
        json!([
            self.op.as_str(),
            self.operand.to_rfc3339_opts(SecondsFormat::AutoSi, true)
        ])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        let format = self.format();
        let payload = tagged_payload(input, self.op.as_str(), &format, "missing the time")?;
        let raw = payload
            .as_str()
            .ok_or_else(|| RqlError::validation("must provide an RFC3339 timestamp"))?;
        self.operand = DateTime::parse_from_rfc3339(raw)
            .map_err(|err| RqlError::validation(format!("invalid timestamp {raw}: {err}")))?
            .with_timezone(&Utc);
        Ok(())
    }

    fn format(&self) -> String {
        format!("['{}', <time>]", self.op)
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Time]
    }
}

impl TimePredicate for TimeComparison {
    fn eval_time(&self, t: DateTime<Utc>) -> bool {
        self.op.eval_ordering(t.cmp(&self.operand))
    }
}

/// The time predicate alternation, one candidate per operator.
pub fn time_predicate() -> OneOf<dyn TimePredicate> {
    OneOf::new()
        .or(|| TimeComparison::template(ComparisonOp::Lt))
        .or(|| TimeComparison::template(ComparisonOp::Lte))
        .or(|| TimeComparison::template(ComparisonOp::Gt))
        .or(|| TimeComparison::template(ComparisonOp::Gte))
        .or(|| TimeComparison::template(ComparisonOp::Eq))
}

/// A time predicate lifted to values: `["time", <time_predicate>]`.
#[derive(Debug)]
pub struct TimeValue {
    inner: Box<dyn TimePredicate>,
}

impl TimeValue {
    const FORMAT: &'static str = "['time', <time_predicate>]";

    pub fn new(inner: Box<dyn TimePredicate>) -> Self {
        TimeValue { inner }
    }

    pub fn comparison(op: ComparisonOp, operand: DateTime<Utc>) -> Self {
        Self::new(Box::new(TimeComparison::new(op, operand)))
    }
}

impl Default for TimeValue {
    fn default() -> Self {
        Self::new(Box::new(time_predicate()))
    }
}

impl AstNode for TimeValue {
    fn marshal(&self) -> Value {
        json!(["time", self.inner.marshal()])
    }

    fn unmarshal(&mut self, input: &Value) -> Result<()> {
        let mut inner = time_predicate();
        decode_wrapped(
            input,
            "time",
            Self::FORMAT,
            "missing the time predicate",
            &mut inner,
        )?;
        self.inner = Box::new(inner);
        Ok(())
    }

    fn format(&self) -> String {
        Self::FORMAT.to_string()
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Value, Capability::Time]
    }
}

impl TimePredicate for TimeValue {
    fn eval_time(&self, t: DateTime<Utc>) -> bool {
        self.inner.eval_time(t)
    }
}

impl ValuePredicate for TimeValue {
    fn value_in_domain(&self, value: &Value) -> bool {
        to_time(value).is_some()
    }

    fn eval_value(&self, value: &Value) -> bool {
        to_time(value).is_some_and(|t| self.eval_time(t))
    }
}
