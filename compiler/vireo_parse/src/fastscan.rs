//! Fast approximate body scan.
//!
//! When a function body is deferred, its tokens are skimmed once without
//! building nodes: braces are matched, nested functions counted, and
//! `eval`/`arguments` usage recorded for the stub. The skim trusts the
//! regex-vs-division heuristic everywhere except directly after a `}`,
//! where the two readings genuinely diverge; hitting a `/` there aborts
//! the skim (`Ok(None)`) and the caller rewinds and parses the body
//! inline. That bounded fallback is what guarantees forward progress.

use smallvec::SmallVec;

use vireo_diagnostic::ErrorCode;
use vireo_ir::{FunctionFlags, Name, TokenKind};

use crate::cursor::TokenCursor;
use crate::error::{PResult, ParseError};

/// What a successful skim learned about a skipped body.
#[derive(Copy, Clone, Debug)]
pub(crate) struct FastScanOutcome {
    /// Offset just past the closing `}`.
    pub end: u32,
    /// Function forms seen inside the skipped region.
    pub nested_functions: u32,
    /// `CALLS_EVAL` / `USES_ARGUMENTS`, recovered lexically.
    pub flags: FunctionFlags,
}

/// Skim a `{ ... }` body. The current token must be the opening `{`.
///
/// On success the cursor rests on the token after the closing `}`.
/// `Ok(None)` means the skim hit a `}`-then-`/` ambiguity; the caller must
/// restore its snapshot and parse inline.
pub(crate) fn fast_scan_body(
    cursor: &mut TokenCursor<'_>,
    eval: Name,
    arguments: Name,
) -> PResult<Option<FastScanOutcome>> {
    debug_assert!(cursor.at(TokenKind::LBrace));
    let open_span = cursor.span();

    let mut depth: u32 = 0;
    let mut nested: u32 = 0;
    let mut flags = FunctionFlags::empty();
    // Brace depth at each open template substitution.
    let mut template_marks: SmallVec<[u32; 4]> = SmallVec::new();

    loop {
        let tok = cursor.token();
        match tok.kind {
            TokenKind::Eof => {
                return Err(ParseError::new(
                    ErrorCode::E1003,
                    open_span,
                    "unclosed function body",
                ));
            }
            TokenKind::LBrace => depth += 1,
            TokenKind::RBrace => {
                if template_marks.last() == Some(&depth) {
                    // This `}` resumes a template literal, not a block.
                    cursor.rescan_template()?;
                    if matches!(cursor.kind(), TokenKind::TemplateTail(_)) {
                        template_marks.pop();
                    }
                    cursor.bump()?;
                    continue;
                }
                depth -= 1;
                if depth == 0 {
                    let end = tok.span.end;
                    if !advance_checked(cursor)? {
                        return Ok(None);
                    }
                    return Ok(Some(FastScanOutcome {
                        end,
                        nested_functions: nested,
                        flags,
                    }));
                }
            }
            TokenKind::TemplateHead(_) => template_marks.push(depth),
            TokenKind::Function | TokenKind::Arrow => nested += 1,
            TokenKind::Ident(name) => {
                if name == eval {
                    flags |= FunctionFlags::CALLS_EVAL;
                } else if name == arguments {
                    flags |= FunctionFlags::USES_ARGUMENTS;
                }
            }
            _ => {}
        }
        if !advance_checked(cursor)? {
            return Ok(None);
        }
    }
}

/// Bump the cursor, detecting the `}`-then-`/` ambiguity. Returns `false`
/// on bailout; the cursor state is then meaningless until restored.
fn advance_checked(cursor: &mut TokenCursor<'_>) -> PResult<bool> {
    let was_rbrace = cursor.at(TokenKind::RBrace);
    match cursor.bump() {
        Ok(_) => {
            if was_rbrace && matches!(cursor.kind(), TokenKind::Regex { .. }) {
                return Ok(false);
            }
            Ok(true)
        }
        // A scan failure straight after `}` is most likely the same
        // ambiguity (a division mis-read as an unterminated regex).
        Err(_) if was_rbrace => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vireo_ir::StringInterner;
    use vireo_lexer::{Scanner, SourceBuffer};

    fn scan(source: &str) -> (StringInterner, PResult<Option<FastScanOutcome>>) {
        let interner = StringInterner::new();
        let buf = SourceBuffer::new(source);
        let mut cursor = TokenCursor::new(Scanner::new(&buf, &interner)).unwrap();
        let eval = interner.intern("eval");
        let arguments = interner.intern("arguments");
        let outcome = fast_scan_body(&mut cursor, eval, arguments);
        (interner, outcome)
    }

    #[test]
    fn test_simple_body() {
        let src = "{ return 1 + 2; } next";
        let (_i, outcome) = scan(src);
        let outcome = outcome.unwrap().unwrap();
        assert_eq!(outcome.end, 17);
        assert_eq!(outcome.nested_functions, 0);
    }

    #[test]
    fn test_counts_nested_functions() {
        let src = "{ let f = function () {}; let g = x => x; }";
        let (_i, outcome) = scan(src);
        let outcome = outcome.unwrap().unwrap();
        assert_eq!(outcome.nested_functions, 2);
    }

    #[test]
    fn test_detects_eval_and_arguments() {
        let src = "{ eval(s); return arguments[0]; }";
        let (_i, outcome) = scan(src);
        let outcome = outcome.unwrap().unwrap();
        assert!(outcome.flags.contains(FunctionFlags::CALLS_EVAL));
        assert!(outcome.flags.contains(FunctionFlags::USES_ARGUMENTS));
    }

    #[test]
    fn test_nested_braces_and_template() {
        let src = "{ if (x) { tag`a${ {k: 1} }b`; } }";
        let (_i, outcome) = scan(src);
        let outcome = outcome.unwrap().unwrap();
        assert_eq!(outcome.end, src.len() as u32);
    }

    #[test]
    fn test_bails_on_slash_after_brace() {
        let src = "{ let x = {} / 2; }";
        let (_i, outcome) = scan(src);
        assert!(outcome.unwrap().is_none());
    }

    #[test]
    fn test_unclosed_body() {
        let src = "{ if (x) {";
        let (_i, outcome) = scan(src);
        assert_eq!(outcome.unwrap_err().code, ErrorCode::E1003);
    }
}
