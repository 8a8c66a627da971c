//! The `-meta` primary: filter entries by their metadata document.
//!
//! ```text
//! -meta .cpuOptions.coreCount +2
//! -meta .tags[?] .key department -a .value eng*
//! -meta .attachTime +1h
//! ```
//!
//! Metadata lives on the entry itself, so using `-meta` limits the search to
//! the roots and their direct children unless `--maxdepth` was given.

mod keypath;
mod parser;
mod primitive;

pub use keypath::{KeyPath, Segment};
pub use primitive::parse_duration;

use chrono::{DateTime, Utc};
use wash_rql::{value_expression, EntryPredicate, Meta, Result};

use crate::options::{OptionFlags, Options};
use crate::primary::Primary;

#[derive(Debug, Clone, Copy, Default)]
pub struct MetaPrimary;

impl MetaPrimary {
    /// Parses `-meta` arguments, resolving relative times against `now`.
    pub fn parse_at<'a>(
        &self,
        tokens: &'a [String],
        now: DateTime<Utc>,
    ) -> Result<(Meta, &'a [String])> {
        let (node, rest) = parser::parse(tokens, now)?;
        log::debug!("-meta consumed {} tokens", tokens.len() - rest.len());
        Ok((Meta::new(value_expression(node)), rest))
    }
}

impl Primary for MetaPrimary {
    fn tokens(&self) -> &'static [&'static str] {
        &["-meta", "-m"]
    }

    fn parse<'a>(
        &self,
        tokens: &'a [String],
    ) -> Result<(Box<dyn EntryPredicate>, &'a [String])> {
        let (meta, rest) = self.parse_at(tokens, Utc::now())?;
        Ok((Box::new(meta), rest))
    }

    fn options_setter(&self, options: &mut Options) {
        if !options.is_set(OptionFlags::MAXDEPTH) {
            options.maxdepth = Some(1);
        }
    }
}
