//! Diagnostic system for the Vireo front end.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Context labels (why it's wrong)

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod span_utils;

pub use diagnostic::{
    duplicate_declaration, expected_expression, invalid_assign_target, unclosed_delimiter,
    unexpected_token, use_before_declaration, Diagnostic, Label, Severity,
};
pub use emitter::{ColorMode, TerminalEmitter};
pub use error_code::ErrorCode;
