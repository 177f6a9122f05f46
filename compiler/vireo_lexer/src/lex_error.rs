//! Scanner errors.

use std::fmt;

use vireo_diagnostic::{Diagnostic, ErrorCode};
use vireo_ir::Span;

/// A scanning error: code, location, and a rendered message.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct LexError {
    pub code: ErrorCode,
    pub span: Span,
    pub message: String,
}

impl LexError {
    pub fn new(code: ErrorCode, span: Span, message: impl Into<String>) -> Self {
        LexError {
            code,
            span,
            message: message.into(),
        }
    }

    /// Convert into a renderable diagnostic.
    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::error(self.code)
            .with_message(self.message)
            .with_label(self.span, "")
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.span, self.code, self.message)
    }
}

impl std::error::Error for LexError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = LexError::new(ErrorCode::E0001, Span::new(4, 9), "unterminated string");
        let text = err.to_string();
        assert!(text.contains("E0001"));
        assert!(text.contains("unterminated string"));
    }

    #[test]
    fn test_into_diagnostic() {
        let err = LexError::new(ErrorCode::E0003, Span::new(0, 2), "invalid number literal");
        let diag = err.into_diagnostic();
        assert_eq!(diag.code, ErrorCode::E0003);
        assert_eq!(diag.primary_span(), Some(Span::new(0, 2)));
    }
}
