//! Token cursor: one token of lookahead over the on-demand scanner.
//!
//! The grammar driver never buffers tokens. It holds exactly the current
//! token; fetching the next one derives the scanner's regex-vs-division
//! hint from the kind of the token being consumed. Speculative parses
//! (arrow parameter lists) capture a [`Snapshot`] and restore it, which is
//! a byte-offset seek plus a saved token.

use vireo_ir::{Span, Token, TokenKind};
use vireo_lexer::Scanner;

use crate::error::{PResult, ParseError};
use vireo_diagnostic::ErrorCode;

/// Restorable cursor state.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Snapshot {
    pos: u32,
    token: Token,
    prev_end: u32,
    strict: bool,
}

impl Snapshot {
    /// Span of the token that was current when the snapshot was taken.
    pub(crate) fn token_span(&self) -> Span {
        self.token.span
    }
}

pub(crate) struct TokenCursor<'a> {
    scanner: Scanner<'a>,
    token: Token,
    /// End offset of the most recently consumed token; node spans close here.
    prev_end: u32,
}

impl<'a> TokenCursor<'a> {
    /// Wrap a scanner and prime the first token.
    pub(crate) fn new(mut scanner: Scanner<'a>) -> PResult<Self> {
        let token = scanner.next_token(true)?;
        Ok(TokenCursor {
            scanner,
            token,
            prev_end: 0,
        })
    }

    #[inline]
    pub(crate) fn token(&self) -> Token {
        self.token
    }

    #[inline]
    pub(crate) fn kind(&self) -> TokenKind {
        self.token.kind
    }

    #[inline]
    pub(crate) fn span(&self) -> Span {
        self.token.span
    }

    /// True when a line terminator precedes the current token.
    #[inline]
    pub(crate) fn newline_before(&self) -> bool {
        self.token.newline_before
    }

    #[inline]
    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.token.kind == kind
    }

    /// End offset of the last consumed token.
    #[inline]
    pub(crate) fn prev_end(&self) -> u32 {
        self.prev_end
    }

    /// Consume the current token and scan the next.
    pub(crate) fn bump(&mut self) -> PResult<Token> {
        let consumed = self.token;
        self.prev_end = consumed.span.end;
        self.token = self
            .scanner
            .next_token(consumed.kind.regex_allowed_after())?;
        Ok(consumed)
    }

    /// Consume the current token if it matches.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> PResult<bool> {
        if self.at(kind) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Require and consume a token, returning its span.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<Span> {
        if self.at(kind) {
            Ok(self.bump()?.span)
        } else {
            Err(ParseError::new(
                ErrorCode::E1001,
                self.token.span,
                format!("expected {}, found {}", kind, self.token.kind),
            ))
        }
    }

    /// Capture the cursor state for speculative parsing.
    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.scanner.pos(),
            token: self.token,
            prev_end: self.prev_end,
            strict: self.scanner.is_strict(),
        }
    }

    /// Rewind to a previous snapshot. Nodes built since the snapshot stay
    /// in the arena unreferenced.
    pub(crate) fn restore(&mut self, snap: Snapshot) {
        self.scanner.seek(snap.pos);
        self.scanner.set_strict(snap.strict);
        self.token = snap.token;
        self.prev_end = snap.prev_end;
    }

    /// Flip strict-mode scanning (legacy octal restrictions).
    pub(crate) fn set_strict(&mut self, strict: bool) {
        self.scanner.set_strict(strict);
    }

    pub(crate) fn is_strict(&self) -> bool {
        self.scanner.is_strict()
    }

    /// Rescan the current `}` as a template continuation.
    ///
    /// The grammar calls this after closing a `${}` substitution; the
    /// current token must be the `RBrace`. It is replaced by a
    /// `TemplateMiddle` or `TemplateTail` token.
    pub(crate) fn rescan_template(&mut self) -> PResult<()> {
        debug_assert_eq!(self.token.kind, TokenKind::RBrace);
        self.token = self
            .scanner
            .rescan_template_continuation(self.token.span.start + 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vireo_ir::StringInterner;
    use vireo_lexer::SourceBuffer;

    fn cursor<'a>(buf: &'a SourceBuffer, interner: &'a StringInterner) -> TokenCursor<'a> {
        TokenCursor::new(Scanner::new(buf, interner)).unwrap()
    }

    #[test]
    fn test_bump_and_expect() {
        let interner = StringInterner::new();
        let buf = SourceBuffer::new("( x )");
        let mut cur = cursor(&buf, &interner);
        assert!(cur.at(TokenKind::LParen));
        cur.expect(TokenKind::LParen).unwrap();
        assert!(matches!(cur.kind(), TokenKind::Ident(_)));
        cur.bump().unwrap();
        cur.expect(TokenKind::RParen).unwrap();
        assert!(cur.at(TokenKind::Eof));
    }

    #[test]
    fn test_expect_failure() {
        let interner = StringInterner::new();
        let buf = SourceBuffer::new("]");
        let mut cur = cursor(&buf, &interner);
        let err = cur.expect(TokenKind::LParen).unwrap_err();
        assert_eq!(err.code, ErrorCode::E1001);
    }

    #[test]
    fn test_snapshot_restore() {
        let interner = StringInterner::new();
        let buf = SourceBuffer::new("a + b * c");
        let mut cur = cursor(&buf, &interner);
        let snap = cur.snapshot();
        cur.bump().unwrap();
        cur.bump().unwrap();
        assert!(matches!(cur.kind(), TokenKind::Ident(_)));
        cur.restore(snap);
        let a = interner.intern("a");
        assert_eq!(cur.kind(), TokenKind::Ident(a));
        cur.bump().unwrap();
        assert!(cur.at(TokenKind::Plus));
    }

    #[test]
    fn test_regex_after_equals() {
        let interner = StringInterner::new();
        let buf = SourceBuffer::new("x = /ab/g");
        let mut cur = cursor(&buf, &interner);
        cur.bump().unwrap();
        cur.expect(TokenKind::Eq).unwrap();
        assert!(matches!(cur.kind(), TokenKind::Regex { .. }));
    }

    #[test]
    fn test_division_after_ident() {
        let interner = StringInterner::new();
        let buf = SourceBuffer::new("x / 2");
        let mut cur = cursor(&buf, &interner);
        cur.bump().unwrap();
        assert!(cur.at(TokenKind::Slash));
    }

    #[test]
    fn test_template_rescan() {
        let interner = StringInterner::new();
        let buf = SourceBuffer::new("`a${x}b`");
        let mut cur = cursor(&buf, &interner);
        assert!(matches!(cur.kind(), TokenKind::TemplateHead(_)));
        cur.bump().unwrap();
        cur.bump().unwrap(); // x
        assert!(cur.at(TokenKind::RBrace));
        cur.rescan_template().unwrap();
        assert!(matches!(cur.kind(), TokenKind::TemplateTail(_)));
    }
}
