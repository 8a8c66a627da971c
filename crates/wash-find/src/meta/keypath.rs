//! Key sequences: `.key`, `.a.b`, `[?]`, `[*]`, `[n]`.
//!
//! A key sequence walks into the metadata document. Each segment wraps the
//! predicate that follows it, so `.tags[?] .key foo` becomes
//! `object(tags, array(some, object(key, foo)))`.

use wash_rql::{value_expression, Array, ExprNode, Object, Result, RqlError, ValuePredicate};

/// One step of a key sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `.key`
    Key(String),
    /// `[n]`
    Index(usize),
    /// `[?]`, at least one element.
    Exists,
    /// `[*]`, every element.
    ForAll,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    /// Parses a single token such as `.cpuOptions.coreCount` or `[?]`.
    pub fn parse(token: &str) -> Result<KeyPath> {
        let mut segments = Vec::new();
        let mut rest = token;
        while let Some(c) = rest.chars().next() {
            match c {
                '.' => {
                    let key_len = rest[1..]
                        .find(['.', '[', ']'])
                        .unwrap_or(rest.len() - 1);
                    if key_len == 0 {
                        return Err(RqlError::parse("expected a key sequence after '.'"));
                    }
                    segments.push(Segment::Key(rest[1..=key_len].to_string()));
                    rest = &rest[1 + key_len..];
                }
                '[' => {
                    let close = rest
                        .find(']')
                        .ok_or_else(|| RqlError::parse("expected a closing ']'"))?;
                    segments.push(parse_selector(&rest[1..close])?);
                    rest = &rest[close + 1..];
                }
                ']' => return Err(RqlError::parse("expected an opening '['")),
                _ => return Err(RqlError::parse("key sequences must begin with a '.'")),
            }
        }
        Ok(KeyPath { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn extend(&mut self, other: KeyPath) {
        self.segments.extend(other.segments);
    }

    /// Wraps `inner` so it applies to the value this path reaches.
    pub fn bind(&self, inner: ExprNode<dyn ValuePredicate>) -> ExprNode<dyn ValuePredicate> {
        self.segments.iter().rev().fold(inner, |node, segment| {
            let expr = value_expression(node);
            let wrapped: Box<dyn ValuePredicate> = match segment {
                Segment::Key(key) => Box::new(Object::new(key.clone(), expr)),
                Segment::Index(n) => Box::new(Array::index(*n, expr)),
                Segment::Exists => Box::new(Array::some(expr)),
                Segment::ForAll => Box::new(Array::all(expr)),
            };
            ExprNode::atom(wrapped)
        })
    }
}

fn parse_selector(inner: &str) -> Result<Segment> {
    match inner {
        "?" => Ok(Segment::Exists),
        "*" => Ok(Segment::ForAll),
        _ if inner.starts_with('-') && inner[1..].parse::<u64>().is_ok() => Err(RqlError::parse(
            "array: index must be an unsigned integer",
        )),
        _ if !inner.is_empty() && inner.bytes().all(|b| b.is_ascii_digit()) => inner
            .parse::<usize>()
            .map(Segment::Index)
            .map_err(|_| RqlError::parse(format!("index {inner} is too large"))),
        _ => Err(RqlError::parse(format!(
            "expected '?', '*' or an index inside [{inner}]"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wash_rql::{AstNode, Boolean};

    #[test]
    fn parses_dotted_keys_and_selectors() {
        let path = KeyPath::parse(".a.b[0][?][*]").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("a".into()),
                Segment::Key("b".into()),
                Segment::Index(0),
                Segment::Exists,
                Segment::ForAll,
            ]
        );
    }

    #[test]
    fn bare_selector_token() {
        let path = KeyPath::parse("[?]").unwrap();
        assert_eq!(path.segments(), &[Segment::Exists]);
    }

    #[test]
    fn syntax_errors() {
        let cases = [
            (".", "expected a key sequence after '.'"),
            (".[", "expected a key sequence after '.'"),
            (".a..b", "expected a key sequence after '.'"),
            (".key]", "expected an opening '['"),
            (".key[", "expected a closing ']'"),
            (".key[-1]", "array: index must be an unsigned integer"),
            (".key[x]", "expected '?', '*' or an index inside [x]"),
            (".key[+1]", "expected '?', '*' or an index inside [+1]"),
            (".key[]", "expected '?', '*' or an index inside []"),
        ];
        for (token, message) in cases {
            let err = KeyPath::parse(token).unwrap_err();
            assert!(err.is_parse(), "{token}");
            assert_eq!(err.to_string(), message, "{token}");
        }
    }

    #[test]
    fn bind_nests_outermost_first() {
        let path = KeyPath::parse(".a[1]").unwrap();
        let node = path.bind(ExprNode::atom(Box::new(Boolean::new(true))));
        let expr = value_expression(node);
        assert_eq!(
            expr.marshal(),
            json!(["object", [["key", "a"], ["array", [1, ["boolean", true]]]]])
        );
        assert!(expr.accepts(&json!({"a": [false, true]})));
        assert!(!expr.accepts(&json!({"a": [true, false]})));
    }
}
