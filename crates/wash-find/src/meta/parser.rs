//! Recursive-descent parser for `-meta` expressions.
//!
//! ```text
//! meta     := keyseq expr
//! expr     := and ('-o' and)*
//! and      := unary (['-a'] unary)*
//! unary    := '!' unary | '(' expr ')' | keyseq expr | literal
//! keyseq   := '.'-token '['-token*
//! ```
//!
//! A key sequence's expression is greedy when its first term is itself a
//! key sequence. Otherwise it only takes primitive terms, so in
//! `.tags[?] .key foo -o .key bar` the `-o` belongs to `.tags[?]`.

use chrono::{DateTime, Utc};
use wash_rql::{ExprNode, Result, RqlError, ValuePredicate};

use super::keypath::KeyPath;
use super::primitive::{classify_dash, parse_literal, DashToken};

type Node = ExprNode<dyn ValuePredicate>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Takes every following term.
    Greedy,
    /// Stops before a term that starts with a key sequence.
    Primitive,
}

/// Parses a `-meta` argument list.
///
/// Returns the predicate on the metadata document and the tokens left over.
pub fn parse<'a>(tokens: &'a [String], now: DateTime<Utc>) -> Result<(Node, &'a [String])> {
    let first = tokens
        .first()
        .ok_or_else(|| RqlError::parse("expected a key sequence"))?;
    if !first.starts_with('.') {
        return Err(RqlError::parse("key sequences must begin with a '.'"));
    }
    let mut parser = MetaParser::new(tokens, now);
    let node = parser.parse_key_sequence_term()?;
    Ok((node, &tokens[parser.index..]))
}

struct MetaParser<'a> {
    tokens: &'a [String],
    index: usize,
    depth: usize,
    now: DateTime<Utc>,
}

impl<'a> MetaParser<'a> {
    fn new(tokens: &'a [String], now: DateTime<Utc>) -> Self {
        Self {
            tokens,
            index: 0,
            depth: 0,
            now,
        }
    }

    fn parse_or_expression(&mut self, scope: Scope) -> Result<Node> {
        let mut left = self.parse_and_expression(scope)?;
        while self.peek() == Some("-o") && self.absorbs(self.index + 1, scope) {
            self.index += 1;
            let right = self.parse_and_expression(scope)?;
            left = ExprNode::or(left, right);
        }
        Ok(left)
    }

    fn parse_and_expression(&mut self, scope: Scope) -> Result<Node> {
        let mut left = self.parse_unary_expression(scope)?;
        loop {
            let next = match self.peek() {
                Some("-a") => self.index + 1,
                Some(token) if starts_term(token) => self.index,
                _ => break,
            };
            if !self.absorbs(next, scope) {
                break;
            }
            self.index = next;
            let right = self.parse_unary_expression(scope)?;
            left = ExprNode::and(left, right);
        }
        Ok(left)
    }

    fn parse_unary_expression(&mut self, scope: Scope) -> Result<Node> {
        let Some(token) = self.peek() else {
            return Err(RqlError::parse("expected a predicate expression"));
        };
        match token {
            "!" => {
                self.index += 1;
                let inner = self.parse_unary_expression(scope)?;
                Ok(ExprNode::not(inner))
            }
            "(" => self.parse_group(),
            _ if token.starts_with('.') || token.starts_with('[') => {
                self.parse_key_sequence_term()
            }
            _ if token.starts_with('-') && classify_dash(token) == DashToken::Unknown => {
                Err(self.unexpected(token))
            }
            ")" | "-a" | "-o" => Err(RqlError::parse("expected a predicate expression")),
            _ => {
                let atom = parse_literal(token, self.now)?;
                self.index += 1;
                Ok(ExprNode::atom(atom))
            }
        }
    }

    fn parse_group(&mut self) -> Result<Node> {
        self.index += 1;
        if self.peek().is_none() {
            return Err(missing_close());
        }
        self.depth += 1;
        let inner = self
            .parse_or_expression(Scope::Greedy)
            .map_err(|err| match self.peek() {
                None => missing_close(),
                Some(_) => err,
            })?;
        match self.peek() {
            Some(")") => {
                self.index += 1;
                self.depth -= 1;
                Ok(inner)
            }
            Some(token) if token.starts_with('-') => Err(self.unexpected(token)),
            _ => Err(missing_close()),
        }
    }

    fn parse_key_sequence_term(&mut self) -> Result<Node> {
        let mut path = KeyPath::parse(&self.tokens[self.index])?;
        self.index += 1;
        while let Some(token) = self.peek().filter(|token| token.starts_with('[')) {
            path.extend(KeyPath::parse(token)?);
            self.index += 1;
        }
        let scope = if self.structural_at(self.index) {
            Scope::Greedy
        } else {
            Scope::Primitive
        };
        let inner = self.parse_or_expression(scope)?;
        Ok(path.bind(inner))
    }

    // ---------------------------------------------------------------
    // Lookahead
    // ---------------------------------------------------------------

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.index).map(String::as_str)
    }

    /// Returns `true` if the term at `pos` starts with a key sequence once
    /// any leading `!` and `(` are skipped.
    fn structural_at(&self, pos: usize) -> bool {
        self.tokens[pos.min(self.tokens.len())..]
            .iter()
            .find(|token| *token != "!" && *token != "(")
            .is_some_and(|token| token.starts_with('.') || token.starts_with('['))
    }

    fn absorbs(&self, pos: usize, scope: Scope) -> bool {
        scope == Scope::Greedy || !self.structural_at(pos)
    }

    /// Inside a group an unknown `-token` is an error; at the top level it
    /// ends the expression and is reported as a missing operand.
    fn unexpected(&self, token: &str) -> RqlError {
        if self.depth > 0 {
            RqlError::parse(format!("unknown predicate {token}"))
        } else {
            RqlError::parse("expected a predicate expression")
        }
    }
}

fn starts_term(token: &str) -> bool {
    match token {
        "!" | "(" => true,
        ")" => false,
        _ if token.starts_with('-') => classify_dash(token) == DashToken::Literal,
        _ => true,
    }
}

fn missing_close() -> RqlError {
    RqlError::parse("(: missing closing ')'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{json, Value};
    use wash_rql::{value_expression, AstNode};

    fn toks(input: &str) -> Vec<String> {
        input.split_whitespace().map(String::from).collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn compile(input: &str) -> (Value, Vec<String>) {
        let tokens = toks(input);
        let (node, rest) = parse(&tokens, now()).unwrap();
        (value_expression(node).marshal(), rest.to_vec())
    }

    fn error(input: &str) -> String {
        parse(&toks(input), now()).unwrap_err().to_string()
    }

    #[test]
    fn key_sequence_with_literal() {
        let (rql, rest) = compile(".a foo");
        assert_eq!(rql, json!(["object", [["key", "a"], ["string", ["=", "foo"]]]]));
        assert!(rest.is_empty());
    }

    #[test]
    fn separate_selector_tokens_extend_the_key_sequence() {
        assert_eq!(compile(".a [?] -true").0, compile(".a[?] -true").0);
    }

    #[test]
    fn primitive_scope_stops_before_key_sequences() {
        let (rql, _) = compile(".t[?] .k foo -o .k bar");
        let foo = json!(["object", [["key", "k"], ["string", ["=", "foo"]]]]);
        let bar = json!(["object", [["key", "k"], ["string", ["=", "bar"]]]]);
        assert_eq!(
            rql,
            json!(["object", [["key", "t"], ["array", ["some", ["OR", foo, bar]]]]])
        );
    }

    #[test]
    fn implicit_and_between_primitives() {
        let (rql, _) = compile(".n +1 -5");
        assert_eq!(
            rql,
            json!(["object", [["key", "n"], ["AND", ["number", [">", 1]], ["number", ["<", 5]]]]])
        );
    }

    #[test]
    fn not_binds_one_term() {
        let (rql, _) = compile(".a ! foo -o bar");
        assert_eq!(
            rql,
            json!(["object", [["key", "a"], ["OR", ["NOT", ["string", ["=", "foo"]]], ["string", ["=", "bar"]]]]])
        );
    }

    #[test]
    fn unknown_dash_token_ends_the_expression() {
        let (_, rest) = compile(".a foo -primary x");
        assert_eq!(rest, toks("-primary x"));
    }

    #[test]
    fn group_errors() {
        assert_eq!(error(".a .b ("), "(: missing closing ')'");
        assert_eq!(error(".a .b ( foo"), "(: missing closing ')'");
        assert_eq!(error(".a .b ( -foo"), "unknown predicate -foo");
        assert_eq!(error(".a ( foo -foo )"), "unknown predicate -foo");
    }

    #[test]
    fn missing_operands() {
        assert_eq!(error(".a"), "expected a predicate expression");
        assert_eq!(error(".a -primary"), "expected a predicate expression");
        assert_eq!(error(".a foo -o"), "expected a predicate expression");
        assert_eq!(error(".a !"), "expected a predicate expression");
    }
}
