//! Structural shape tests over raw wire values.
//!
//! These never fail; they only answer whether a value looks like a
//! given construct. Decoders use them to decide between a shape error
//! and a validation error.

use serde_json::Value;

use crate::error::{Result, RqlError};

/// Returns `true` if `value` is an array whose first element satisfies `head`.
pub fn array_with_head(value: &Value, head: impl Fn(&Value) -> bool) -> bool {
    value
        .as_array()
        .and_then(|array| array.first())
        .is_some_and(|first| head(first))
}

/// Returns `true` if `value` is an array whose first element is the string `tag`.
pub fn tagged(value: &Value, tag: &str) -> bool {
    array_with_head(value, |head| head.as_str() == Some(tag))
}

/// Returns `true` if `value` is an array of exactly `len` elements.
pub fn array_of_len(value: &Value, len: usize) -> bool {
    value.as_array().is_some_and(|array| array.len() == len)
}

/// Returns the elements of a `[tag, ...]` array, or a shape error.
pub fn tagged_elements<'a>(input: &'a Value, tag: &str, format: &str) -> Result<&'a [Value]> {
    match input.as_array() {
        Some(array) if array.first().and_then(Value::as_str) == Some(tag) => Ok(array),
        _ => Err(RqlError::shape(format!("must be formatted as {format}"))),
    }
}

/// Decodes a `[tag, payload]` pair and returns the payload.
///
/// A missing tag is a shape error; a wrong arity is a validation error
/// (`missing` names what the short form lacks).
pub fn tagged_payload<'a>(
    input: &'a Value,
    tag: &str,
    format: &str,
    missing: &str,
) -> Result<&'a Value> {
    let array = tagged_elements(input, tag, format)?;
    match array.len() {
        2 => Ok(&array[1]),
        0 | 1 => Err(RqlError::validation(missing)),
        _ => Err(RqlError::validation(format!("must be formatted as {format}"))),
    }
}

/// Decodes a bare `[tag]` node.
pub fn tag_only(input: &Value, tag: &str, format: &str) -> Result<()> {
    let array = tagged_elements(input, tag, format)?;
    if array.len() != 1 {
        return Err(RqlError::validation(format!("must be formatted as {format}")));
    }
    Ok(())
}

/// Joins candidate formats as "either A, B, or C".
pub fn join_either(formats: &[String]) -> String {
    match formats {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("either {first} or {second}"),
        [init @ .., last] => format!("either {}, or {last}", init.join(", ")),
    }
}
