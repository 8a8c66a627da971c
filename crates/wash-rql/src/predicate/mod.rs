//! The predicate library.
//!
//! Wire forms, by capability:
//!
//! | Capability | Forms |
//! |---|---|
//! | String | `["glob", g]`, `["regex", r]`, `["=", s]` |
//! | Numeric | `[op, n]` with op one of `<` `<=` `>` `>=` `=` |
//! | Time | `[op, "<RFC3339>"]` |
//! | Value | `["string", S]`, `["number", N]`, `["time", T]`, `["boolean", b]`, `["null"]`, `["exists"]`, `["empty"]`, `["array", [selector, V]]`, `["object", [["key", k], V]]` |
//! | Entry | `["name", S]`, `["path", S]`, `["meta", V]`, `["action", a]`, `["kind", S]` |
//! | EntrySchema | `["action", a]`, `["kind", S]` |

pub mod array;
pub mod entry;
pub mod numeric;
pub mod object;
pub mod primitive;
pub mod string;
pub mod time;
pub mod value;

use serde_json::Value;

use crate::ast::AstNode;
use crate::error::{Result, RqlError};
use crate::matcher::tagged_payload;

/// Decodes `[tag, <inner>]` into `inner`.
///
/// Once the tag matches, every failure below it is a validation error.
pub(crate) fn decode_wrapped<P: AstNode + ?Sized>(
    input: &Value,
    tag: &str,
    format: &str,
    missing: &str,
    inner: &mut P,
) -> Result<()> {
    let payload = tagged_payload(input, tag, format, missing)?;
    inner.unmarshal(payload).map_err(RqlError::into_validation)
}
