//! Query executor.
//!
//! A [`Query`] is a compiled entry expression with the execution helpers
//! needed to run it against collections of entries.

use serde_json::Value;

use crate::ast::{AstNode, EntryPredicate};
use crate::entry::Entry;
use crate::error::Result;
use crate::expression::{ExprNode, Expression};
use crate::predicate::entry::entry_predicate;

/// A compiled entry query.
///
/// Queries are immutable once built, so one query can be evaluated from
/// many threads at once.
///
/// # Example
///
/// ```
/// use wash_rql::{Entry, Query};
///
/// let query = Query::parse(r#"["OR", ["name", ["glob", "*.log"]], ["action", "exec"]]"#)?;
///
/// let entries = vec![
///     Entry::new("app.log"),
///     Entry::new("run.sh").with_actions(["read", "exec"]),
///     Entry::new("notes.txt"),
/// ];
///
/// assert_eq!(query.count(&entries), 2);
/// # Ok::<(), wash_rql::RqlError>(())
/// ```
#[derive(Debug)]
pub struct Query {
    expression: Expression<dyn EntryPredicate>,
}

impl Query {
    /// Compiles a query from its wire encoding.
    pub fn from_value(value: &Value) -> Result<Self> {
        let mut expression = entry_predicate();
        expression.unmarshal(value)?;
        Ok(Query { expression })
    }

    /// Compiles a query from JSON text.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Wraps an expression tree built programmatically.
    pub fn from_node(root: ExprNode<dyn EntryPredicate>) -> Self {
        Query {
            expression: entry_predicate().with_root(root),
        }
    }

    /// Encodes the query back to its wire form.
    pub fn to_value(&self) -> Value {
        self.expression.marshal()
    }

    pub fn expression(&self) -> &Expression<dyn EntryPredicate> {
        &self.expression
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single entry matches this query.
    pub fn matches(&self, entry: &Entry) -> bool {
        self.expression.eval_entry(entry)
    }

    /// Filters a slice, returning references to matching entries.
    pub fn filter<'a>(&self, entries: &'a [Entry]) -> Vec<&'a Entry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }

    /// Counts the number of matching entries.
    pub fn count(&self, entries: &[Entry]) -> usize {
        entries.iter().filter(|e| self.matches(e)).count()
    }

    /// Returns `true` if any entry matches.
    pub fn any(&self, entries: &[Entry]) -> bool {
        entries.iter().any(|e| self.matches(e))
    }

    /// Returns `true` if all entries match.
    pub fn all(&self, entries: &[Entry]) -> bool {
        entries.iter().all(|e| self.matches(e))
    }

    /// Finds the first matching entry.
    pub fn find<'a>(&self, entries: &'a [Entry]) -> Option<&'a Entry> {
        entries.iter().find(|e| self.matches(e))
    }
}
