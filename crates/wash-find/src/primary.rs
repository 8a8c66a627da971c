//! The primary interface.
//!
//! A primary is a named predicate in a find expression (`-meta ...`). It
//! consumes the tokens it understands and hands the rest back.

use wash_rql::{EntryPredicate, Result};

use crate::options::Options;

/// A find expression primary.
pub trait Primary: Send + Sync {
    /// The tokens that introduce this primary, e.g. `-meta`.
    fn tokens(&self) -> &'static [&'static str];

    /// Parses the primary's arguments, returning the compiled predicate and
    /// the unconsumed tokens.
    fn parse<'a>(&self, tokens: &'a [String])
        -> Result<(Box<dyn EntryPredicate>, &'a [String])>;

    /// Adjusts traversal options before any entry is evaluated.
    fn options_setter(&self, _options: &mut Options) {}
}

/// Finds the primary introduced by `token`.
pub fn lookup<'p>(primaries: &[&'p dyn Primary], token: &str) -> Option<&'p dyn Primary> {
    primaries
        .iter()
        .copied()
        .find(|primary| primary.tokens().contains(&token))
}
