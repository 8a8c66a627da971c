//! Primitive literals of the `-meta` grammar.
//!
//! | token               | predicate                              |
//! |---------------------|----------------------------------------|
//! | `-null`             | value is null                          |
//! | `-exists`           | value is present                       |
//! | `-true`, `-false`   | boolean equality                       |
//! | `-empty`            | empty array or object                  |
//! | `N`, `+N`, `-N`     | number `=`, `>`, `<`                   |
//! | `+D`, `-D`          | time more / less than `D` ago          |
//! | `+{D}`, `-{D}`      | time more / less than `D` from now     |
//! | anything else       | string glob if it has `*?[`, else `=`  |
//!
//! Durations are one or more `<int><unit>` pairs with units `s m h d w`.

use chrono::{DateTime, TimeDelta, Utc};
use wash_rql::{
    Boolean, ComparisonOp, Empty, Exists, Null, NumericValue, Result, RqlError, StringValue,
    TimeValue, ValuePredicate,
};

/// How a token starting with `-` should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashToken {
    /// `-a`
    And,
    /// `-o`
    Or,
    /// A literal handled by [`parse_literal`].
    Literal,
    /// Anything else; ends the `-meta` expression.
    Unknown,
}

pub fn classify_dash(token: &str) -> DashToken {
    let body = token.strip_prefix('-').unwrap_or(token);
    match token {
        "-a" => DashToken::And,
        "-o" => DashToken::Or,
        "-null" | "-exists" | "-true" | "-false" | "-empty" => DashToken::Literal,
        _ if token.starts_with("-{") => DashToken::Literal,
        _ if is_number(body) || parse_duration(body).is_some() => {
            DashToken::Literal
        }
        _ => DashToken::Unknown,
    }
}

/// Compiles a primitive token into a value predicate.
///
/// Relative times are resolved against `now`.
pub fn parse_literal(token: &str, now: DateTime<Utc>) -> Result<Box<dyn ValuePredicate>> {
    match token {
        "-null" => return Ok(Box::new(Null)),
        "-exists" => return Ok(Box::new(Exists)),
        "-true" => return Ok(Box::new(Boolean::new(true))),
        "-false" => return Ok(Box::new(Boolean::new(false))),
        "-empty" => return Ok(Box::new(Empty)),
        _ => {}
    }

    let (sign, body) = if let Some(body) = token.strip_prefix('+') {
        (Some('+'), body)
    } else if let Some(body) = token.strip_prefix('-') {
        (Some('-'), body)
    } else {
        (None, token)
    };

    if let (Some(sign), Some(inner)) = (sign, body.strip_prefix('{')) {
        let inner = inner
            .strip_suffix('}')
            .ok_or_else(|| RqlError::parse("expected a closing '}'"))?;
        let delta = parse_duration(inner).ok_or_else(|| invalid_duration(token))?;
        let at = now
            .checked_add_signed(delta)
            .ok_or_else(|| invalid_duration(token))?;
        let op = if sign == '+' { ComparisonOp::Gt } else { ComparisonOp::Lt };
        return Ok(Box::new(TimeValue::comparison(op, at)));
    }

    if is_number(body) {
        let n: f64 = body
            .parse()
            .map_err(|_| RqlError::parse(format!("invalid number {token}")))?;
        let op = match sign {
            Some('+') => ComparisonOp::Gt,
            Some(_) => ComparisonOp::Lt,
            None => ComparisonOp::Eq,
        };
        return Ok(Box::new(NumericValue::comparison(op, n)));
    }

    if let (Some(sign), Some(delta)) = (sign, parse_duration(body)) {
        let at = now
            .checked_sub_signed(delta)
            .ok_or_else(|| invalid_duration(token))?;
        let op = if sign == '+' { ComparisonOp::Lt } else { ComparisonOp::Gt };
        return Ok(Box::new(TimeValue::comparison(op, at)));
    }

    if token.contains(['*', '?', '[']) {
        Ok(Box::new(StringValue::glob(token)?))
    } else {
        Ok(Box::new(StringValue::equal(token)))
    }
}

fn invalid_duration(token: &str) -> RqlError {
    RqlError::parse(format!("{token}: expected a duration such as 1h or 2d3h"))
}

fn is_number(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().any(|b| b.is_ascii_digit())
        && s.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && s.bytes().filter(|&b| b == b'.').count() <= 1
}

/// Parses `1h`, `2d3h`, `90s`. Returns `None` for anything else.
pub fn parse_duration(s: &str) -> Option<TimeDelta> {
    let mut total: i64 = 0;
    let mut digits = 0usize;
    let mut amount: i64 = 0;
    for b in s.bytes() {
        if b.is_ascii_digit() {
            amount = amount.checked_mul(10)?.checked_add(i64::from(b - b'0'))?;
            digits += 1;
            continue;
        }
        if digits == 0 {
            return None;
        }
        let unit: i64 = match b {
            b's' => 1,
            b'm' => 60,
            b'h' => 60 * 60,
            b'd' => 24 * 60 * 60,
            b'w' => 7 * 24 * 60 * 60,
            _ => return None,
        };
        total = total.checked_add(amount.checked_mul(unit)?)?;
        amount = 0;
        digits = 0;
    }
    if digits != 0 || s.is_empty() {
        return None;
    }
    TimeDelta::try_seconds(total)
}
