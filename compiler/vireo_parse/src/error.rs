//! Parse errors.
//!
//! One failure channel for the whole front end: the first violation aborts
//! the enclosing parse unit (top level or one background job) and is carried
//! up as a `ParseError`. There is no multi-error recovery.

use std::fmt;

use vireo_diagnostic::{Diagnostic, ErrorCode};
use vireo_ir::Span;
use vireo_lexer::LexError;

pub type PResult<T> = Result<T, ParseError>;

/// A grammar or binding error: code, location, rendered message.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParseError {
    pub code: ErrorCode,
    pub span: Span,
    pub message: String,
}

impl ParseError {
    pub fn new(code: ErrorCode, span: Span, message: impl Into<String>) -> Self {
        ParseError {
            code,
            span,
            message: message.into(),
        }
    }

    /// Convert into a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code)
            .with_message(self.message.clone())
            .with_label(self.span, "")
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            code: err.code,
            span: err.span,
            message: err.message,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.span, self.code, self.message)
    }
}

impl std::error::Error for ParseError {}
