//! On-demand JavaScript scanner.
//!
//! The scanner produces exactly one token per request and keeps no lookahead
//! of its own, so the grammar can snapshot and restore lexical position by
//! byte offset. Context-sensitive decisions (regex vs. division, template
//! continuations, strict-mode octal) are driven by the caller.

mod cursor;
mod lex_error;
mod scanner;
mod source_buffer;

pub use cursor::Cursor;
pub use lex_error::LexError;
pub use scanner::Scanner;
pub use source_buffer::SourceBuffer;
