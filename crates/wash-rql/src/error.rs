//! Error types for the rql crate.
//!
//! Every `unmarshal` reports one of two failures, and the difference
//! drives alternation:
//!
//! - [`ErrorKind::Shape`]: the input's outer shape is not this construct.
//!   An alternation discards the candidate and tries the next one.
//! - [`ErrorKind::Validation`]: the shape matched but the content is
//!   invalid. An alternation stops and reports this error.
//!
//! [`ErrorKind::Parse`] covers textual input (JSON text, CLI tokens).

use thiserror::Error;

/// The class of an [`RqlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input does not have this construct's outer shape.
    Shape,
    /// The input has this construct's shape but invalid content.
    Validation,
    /// Textual input could not be parsed.
    Parse,
}

/// Errors raised while decoding or compiling predicates.
///
/// Evaluation never fails: missing keys, out-of-range indices and
/// ill-typed values all evaluate to `false`.
#[derive(Debug, Error)]
#[error("{message}{}", render_cause(.cause))]
pub struct RqlError {
    kind: ErrorKind,
    message: String,
    #[source]
    cause: Option<Box<RqlError>>,
}

fn render_cause(cause: &Option<Box<RqlError>>) -> String {
    match cause {
        Some(cause) => format!(": {cause}"),
        None => String::new(),
    }
}

impl RqlError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        RqlError {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a shape mismatch error.
    pub fn shape(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Shape, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    /// Creates a validation error carrying `cause`.
    pub fn wrap(message: impl Into<String>, cause: RqlError) -> Self {
        Self::validation(message).with_cause(cause)
    }

    /// Attaches the error that caused this one.
    pub fn with_cause(mut self, cause: RqlError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Reclassifies the error as a validation error.
    ///
    /// Used once a construct's tag has matched: anything wrong below it
    /// is a problem with that construct, not a reason to try siblings.
    pub fn into_validation(mut self) -> Self {
        if self.kind == ErrorKind::Shape {
            self.kind = ErrorKind::Validation;
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The message of this error alone, without its causes.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&RqlError> {
        self.cause.as_deref()
    }

    pub fn is_shape(&self) -> bool {
        self.kind == ErrorKind::Shape
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }

    pub fn is_parse(&self) -> bool {
        self.kind == ErrorKind::Parse
    }
}

impl From<serde_json::Error> for RqlError {
    fn from(err: serde_json::Error) -> Self {
        RqlError::parse(format!("invalid JSON: {err}"))
    }
}

/// Result type for rql operations.
pub type Result<T> = std::result::Result<T, RqlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_cause_chain() {
        let err = RqlError::wrap("array", RqlError::validation("missing the PE ValuePredicate"));
        assert_eq!(err.to_string(), "array: missing the PE ValuePredicate");
        assert_eq!(err.message(), "array");
        assert!(err.cause().is_some());
    }

    #[test]
    fn into_validation_only_promotes_shape_errors() {
        assert!(RqlError::shape("x").into_validation().is_validation());
        assert!(RqlError::parse("x").into_validation().is_parse());
    }

    #[test]
    fn json_errors_are_parse_errors() {
        let err: RqlError = serde_json::from_str::<serde_json::Value>("[")
            .unwrap_err()
            .into();
        assert!(err.is_parse());
        assert!(err.to_string().starts_with("invalid JSON"));
    }
}
