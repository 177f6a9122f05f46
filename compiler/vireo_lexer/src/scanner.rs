//! On-demand token scanner.
//!
//! Produces one token per call; nothing is buffered ahead, so the grammar
//! can re-point the cursor (snapshot restore, deferred-body re-parse) by
//! byte offset alone. Context the scanner cannot decide locally comes in
//! from the caller: `regex_allowed` picks between a regex literal and
//! division for `/`, and template middles/tails are produced by an explicit
//! rescan when the grammar closes a `${}` substitution.

use vireo_diagnostic::ErrorCode;
use vireo_ir::{Name, Span, StringInterner, Token, TokenKind};

use crate::cursor::Cursor;
use crate::lex_error::LexError;
use crate::source_buffer::SourceBuffer;

#[inline]
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

#[inline]
fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Unicode line terminators beyond `\n`/`\r`.
#[inline]
fn is_unicode_line_terminator(c: char) -> bool {
    c == '\u{2028}' || c == '\u{2029}'
}

/// The scanner. Borrows the source buffer and the shared interner.
pub struct Scanner<'a> {
    cursor: Cursor<'a>,
    interner: &'a StringInterner,
    /// Strict-mode octal restrictions; flipped by the grammar when a
    /// directive prologue or module context establishes strictness.
    strict: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(buffer: &'a SourceBuffer, interner: &'a StringInterner) -> Self {
        Scanner {
            cursor: buffer.cursor(),
            interner,
            strict: false,
        }
    }

    /// Current byte offset (start of the next unscanned token's trivia).
    #[inline]
    pub fn pos(&self) -> u32 {
        self.cursor.pos()
    }

    /// Reposition the scanner. `pos` must come from a previous `pos()` or a
    /// token span boundary.
    #[inline]
    pub fn seek(&mut self, pos: u32) {
        self.cursor.seek(pos);
    }

    /// Enable strict-mode scanning restrictions (legacy octal).
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    #[inline]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Scan the next token.
    ///
    /// `regex_allowed` tells the scanner whether a `/` here starts a regular
    /// expression literal; the grammar derives it from the previous token.
    pub fn next_token(&mut self, regex_allowed: bool) -> Result<Token, LexError> {
        let newline_before = self.skip_trivia()?;
        let start = self.cursor.pos();

        if self.cursor.is_eof() {
            let mut tok = Token::eof(start);
            tok.newline_before = newline_before;
            return Ok(tok);
        }

        let kind = self.scan_token(regex_allowed)?;
        let mut tok = Token::new(kind, Span::new(start, self.cursor.pos()));
        tok.newline_before = newline_before;
        Ok(tok)
    }

    /// Rescan a template continuation after the grammar closed a `${}`
    /// substitution. The cursor must sit just past the closing `}` (the
    /// grammar passes the end of its `RBrace` token).
    ///
    /// Produces `TemplateMiddle` or `TemplateTail`.
    pub fn rescan_template_continuation(&mut self, rbrace_end: u32) -> Result<Token, LexError> {
        // The `}` byte itself is the start of the continuation token.
        let start = rbrace_end - 1;
        self.cursor.seek(rbrace_end);
        let (cooked, terminated) = self.scan_template_chunk(start)?;
        let kind = if terminated {
            TokenKind::TemplateTail(cooked)
        } else {
            TokenKind::TemplateMiddle(cooked)
        };
        Ok(Token::new(kind, Span::new(start, self.cursor.pos())))
    }

    /// Skip whitespace and comments; returns whether a line terminator was
    /// crossed.
    fn skip_trivia(&mut self) -> Result<bool, LexError> {
        let mut newline = false;
        loop {
            match self.cursor.current() {
                b' ' | b'\t' | 0x0B | 0x0C => self.cursor.advance(),
                b'\n' => {
                    newline = true;
                    self.cursor.advance();
                }
                b'\r' => {
                    newline = true;
                    self.cursor.advance();
                    if self.cursor.current() == b'\n' {
                        self.cursor.advance();
                    }
                }
                b'/' if self.cursor.peek() == b'/' => {
                    self.cursor.eat_until_newline_or_eof();
                }
                b'/' if self.cursor.peek() == b'*' => {
                    newline |= self.skip_block_comment()?;
                }
                b if b >= 0x80 => {
                    let c = self.cursor.current_char();
                    if is_unicode_line_terminator(c) {
                        newline = true;
                        self.cursor.advance_char();
                    } else if c.is_whitespace() || c == '\u{FEFF}' {
                        self.cursor.advance_char();
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(newline)
    }

    /// Skip a `/* */` comment; returns whether it contained a newline.
    fn skip_block_comment(&mut self) -> Result<bool, LexError> {
        let start = self.cursor.pos();
        self.cursor.advance_n(2);
        let mut newline = false;
        loop {
            let scan_from = self.cursor.pos();
            if !self.cursor.skip_to_star() {
                // Check the skipped region for newlines before reporting.
                newline |= self
                    .cursor
                    .slice(scan_from, self.cursor.pos())
                    .contains(['\n', '\r']);
                return Err(LexError::new(
                    ErrorCode::E0007,
                    Span::new(start, self.cursor.pos()),
                    "unterminated block comment",
                ));
            }
            newline |= self
                .cursor
                .slice(scan_from, self.cursor.pos())
                .contains(['\n', '\r', '\u{2028}', '\u{2029}']);
            if self.cursor.peek() == b'/' {
                self.cursor.advance_n(2);
                return Ok(newline);
            }
            self.cursor.advance();
        }
    }

    fn scan_token(&mut self, regex_allowed: bool) -> Result<TokenKind, LexError> {
        let b = self.cursor.current();
        match b {
            b'0'..=b'9' => self.scan_number(),
            b'"' | b'\'' => self.scan_string(b),
            b'`' => {
                let start = self.cursor.pos();
                self.cursor.advance();
                let (cooked, terminated) = self.scan_template_chunk(start)?;
                Ok(if terminated {
                    TokenKind::NoSubTemplate(cooked)
                } else {
                    TokenKind::TemplateHead(cooked)
                })
            }
            b'/' if regex_allowed => self.scan_regex(),
            b'#' => self.scan_private_name(),
            _ if is_ident_start(b) || b >= 0x80 => self.scan_ident_or_keyword(),
            _ => self.scan_punctuator(),
        }
    }

    // ── Identifiers and keywords ──

    fn scan_ident_or_keyword(&mut self) -> Result<TokenKind, LexError> {
        let start = self.cursor.pos();
        loop {
            let b = self.cursor.current();
            if is_ident_continue(b) {
                self.cursor.advance();
            } else if b >= 0x80 {
                let c = self.cursor.current_char();
                if c.is_alphanumeric() || c == '\u{200C}' || c == '\u{200D}' {
                    self.cursor.advance_char();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
        let text = self.cursor.slice_from(start);
        if text.is_empty() {
            let span = Span::new(start, start + Cursor::utf8_char_width(self.cursor.current()));
            let c = self.cursor.current_char();
            self.cursor.advance_char();
            return Err(LexError::new(
                ErrorCode::E0002,
                span,
                format!("invalid character `{c}` in source"),
            ));
        }
        Ok(Self::keyword_or_ident(text, self.interner))
    }

    /// Classify identifier text as a reserved word, contextual keyword, or
    /// plain identifier.
    fn keyword_or_ident(text: &str, interner: &StringInterner) -> TokenKind {
        match text {
            "await" => TokenKind::Await,
            "break" => TokenKind::Break,
            "case" => TokenKind::Case,
            "catch" => TokenKind::Catch,
            "class" => TokenKind::Class,
            "const" => TokenKind::Const,
            "continue" => TokenKind::Continue,
            "debugger" => TokenKind::Debugger,
            "default" => TokenKind::Default,
            "delete" => TokenKind::Delete,
            "do" => TokenKind::Do,
            "else" => TokenKind::Else,
            "enum" => TokenKind::Enum,
            "export" => TokenKind::Export,
            "extends" => TokenKind::Extends,
            "false" => TokenKind::False,
            "finally" => TokenKind::Finally,
            "for" => TokenKind::For,
            "function" => TokenKind::Function,
            "if" => TokenKind::If,
            "import" => TokenKind::Import,
            "in" => TokenKind::In,
            "instanceof" => TokenKind::Instanceof,
            "new" => TokenKind::New,
            "null" => TokenKind::Null,
            "return" => TokenKind::Return,
            "super" => TokenKind::Super,
            "switch" => TokenKind::Switch,
            "this" => TokenKind::This,
            "throw" => TokenKind::Throw,
            "true" => TokenKind::True,
            "try" => TokenKind::Try,
            "typeof" => TokenKind::Typeof,
            "var" => TokenKind::Var,
            "void" => TokenKind::Void,
            "while" => TokenKind::While,
            "with" => TokenKind::With,
            "yield" => TokenKind::Yield,
            "as" => TokenKind::As,
            "async" => TokenKind::Async,
            "from" => TokenKind::From,
            "get" => TokenKind::Get,
            "let" => TokenKind::Let,
            "meta" => TokenKind::Meta,
            "of" => TokenKind::Of,
            "set" => TokenKind::Set,
            "static" => TokenKind::Static,
            "target" => TokenKind::Target,
            _ => TokenKind::Ident(interner.intern(text)),
        }
    }

    fn scan_private_name(&mut self) -> Result<TokenKind, LexError> {
        let start = self.cursor.pos();
        self.cursor.advance();
        if !is_ident_start(self.cursor.current()) && self.cursor.current() < 0x80 {
            return Err(LexError::new(
                ErrorCode::E0010,
                Span::new(start, self.cursor.pos()),
                "`#` must be followed by an identifier",
            ));
        }
        let name_start = self.cursor.pos();
        self.cursor.eat_while(is_ident_continue);
        while self.cursor.current() >= 0x80 && self.cursor.current_char().is_alphanumeric() {
            self.cursor.advance_char();
        }
        let name = self.interner.intern(self.cursor.slice_from(name_start));
        Ok(TokenKind::PrivateName(name))
    }

    // ── Numbers ──

    fn scan_number(&mut self) -> Result<TokenKind, LexError> {
        let start = self.cursor.pos();

        if self.cursor.current() == b'0' {
            match self.cursor.peek() {
                b'x' | b'X' => return self.scan_radix_literal(start, 16, u8::is_ascii_hexdigit),
                b'o' | b'O' => return self.scan_radix_literal(start, 8, |b| (b'0'..=b'7').contains(b)),
                b'b' | b'B' => return self.scan_radix_literal(start, 2, |b| *b == b'0' || *b == b'1'),
                b'0'..=b'9' => return self.scan_legacy_octal(start),
                _ => {}
            }
        }

        self.eat_digits()?;
        let mut is_int = true;
        if self.cursor.current() == b'.' {
            is_int = false;
            self.cursor.advance();
            if self.cursor.current().is_ascii_digit() {
                self.eat_digits()?;
            }
        }
        if matches!(self.cursor.current(), b'e' | b'E') {
            is_int = false;
            self.cursor.advance();
            if matches!(self.cursor.current(), b'+' | b'-') {
                self.cursor.advance();
            }
            if !self.cursor.current().is_ascii_digit() {
                return Err(self.bad_number(start, "missing exponent digits"));
            }
            self.eat_digits()?;
        }

        if self.cursor.current() == b'n' {
            if !is_int {
                return Err(self.bad_number(start, "BigInt literal cannot have a fractional part"));
            }
            let digits = self.cursor.slice_from(start).replace('_', "");
            self.cursor.advance();
            self.check_number_boundary(start)?;
            return Ok(TokenKind::BigInt(self.interner.intern_owned(digits)));
        }

        self.check_number_boundary(start)?;
        let text = self.cursor.slice_from(start).replace('_', "");
        let value: f64 = text
            .parse()
            .unwrap_or_else(|_| panic!("scanned number literal failed to parse: {text}"));
        Ok(TokenKind::Number(value.to_bits()))
    }

    /// Scan digits with `_` separators; a separator must sit between digits.
    fn eat_digits(&mut self) -> Result<(), LexError> {
        let start = self.cursor.pos();
        let mut prev_sep = false;
        loop {
            let b = self.cursor.current();
            if b.is_ascii_digit() {
                prev_sep = false;
                self.cursor.advance();
            } else if b == b'_' {
                if prev_sep {
                    return Err(self.bad_number(start, "repeated numeric separator"));
                }
                prev_sep = true;
                self.cursor.advance();
            } else {
                break;
            }
        }
        if prev_sep {
            return Err(self.bad_number(start, "trailing numeric separator"));
        }
        Ok(())
    }

    fn scan_radix_literal(
        &mut self,
        start: u32,
        radix: u32,
        is_digit: impl Fn(&u8) -> bool,
    ) -> Result<TokenKind, LexError> {
        self.cursor.advance_n(2);
        let digits_start = self.cursor.pos();
        let mut prev_sep = true; // a separator right after the prefix is invalid
        loop {
            let b = self.cursor.current();
            if is_digit(&b) {
                prev_sep = false;
                self.cursor.advance();
            } else if b == b'_' {
                if prev_sep {
                    return Err(self.bad_number(start, "misplaced numeric separator"));
                }
                prev_sep = true;
                self.cursor.advance();
            } else {
                break;
            }
        }
        if self.cursor.pos() == digits_start || prev_sep {
            return Err(self.bad_number(start, "missing digits after radix prefix"));
        }

        if self.cursor.current() == b'n' {
            let digits = self.cursor.slice(start, self.cursor.pos()).replace('_', "");
            self.cursor.advance();
            self.check_number_boundary(start)?;
            return Ok(TokenKind::BigInt(self.interner.intern_owned(digits)));
        }

        let mut value = 0.0f64;
        for b in self.cursor.slice(digits_start, self.cursor.pos()).bytes() {
            if b == b'_' {
                continue;
            }
            let digit = (b as char)
                .to_digit(radix)
                .unwrap_or_else(|| panic!("scanned radix digit out of range: {b}"));
            value = value * f64::from(radix) + f64::from(digit);
        }
        self.check_number_boundary(start)?;
        Ok(TokenKind::Number(value.to_bits()))
    }

    /// `0123` style literals: octal value in sloppy mode, an error in strict.
    fn scan_legacy_octal(&mut self, start: u32) -> Result<TokenKind, LexError> {
        self.cursor.advance();
        let digits_start = self.cursor.pos();
        self.cursor.eat_while(|b| b.is_ascii_digit());
        let digits = self.cursor.slice(digits_start, self.cursor.pos());

        // `08`/`09` fall back to decimal per Annex B.
        if digits.bytes().any(|b| b >= b'8') {
            let text = self.cursor.slice_from(start);
            let value: f64 = text
                .parse()
                .unwrap_or_else(|_| panic!("scanned number literal failed to parse: {text}"));
            self.check_number_boundary(start)?;
            return Ok(TokenKind::Number(value.to_bits()));
        }

        if self.strict {
            return Err(LexError::new(
                ErrorCode::E0011,
                Span::new(start, self.cursor.pos()),
                "legacy octal literals are not allowed in strict mode",
            ));
        }

        let mut value = 0.0f64;
        for b in digits.bytes() {
            value = value * 8.0 + f64::from(b - b'0');
        }
        self.check_number_boundary(start)?;
        Ok(TokenKind::Number(value.to_bits()))
    }

    /// A number must not run straight into an identifier (`3in` is an error).
    fn check_number_boundary(&mut self, start: u32) -> Result<(), LexError> {
        let b = self.cursor.current();
        if is_ident_start(b) || b.is_ascii_digit() || (b >= 0x80 && self.cursor.current_char().is_alphanumeric()) {
            return Err(self.bad_number(start, "identifier starts immediately after number"));
        }
        Ok(())
    }

    fn bad_number(&mut self, start: u32, reason: &str) -> LexError {
        // Consume the rest of the malformed literal so the span covers it.
        self.cursor
            .eat_while(|b| is_ident_continue(b) || b == b'.');
        LexError::new(
            ErrorCode::E0003,
            Span::new(start, self.cursor.pos()),
            format!("invalid number literal: {reason}"),
        )
    }

    // ── Strings ──

    fn scan_string(&mut self, quote: u8) -> Result<TokenKind, LexError> {
        let start = self.cursor.pos();
        self.cursor.advance();

        // Fast path: memchr to the next delimiter; escape-free strings are
        // interned straight from the source slice.
        let content_start = self.cursor.pos();
        let mut cooked: Option<String> = None;
        loop {
            let chunk_start = self.cursor.pos();
            let b = self.cursor.skip_to_string_delim(quote);
            match b {
                0 | b'\n' | b'\r' => {
                    return Err(LexError::new(
                        ErrorCode::E0001,
                        Span::new(start, self.cursor.pos()),
                        "unterminated string literal",
                    ));
                }
                b'\\' => {
                    let cooked = cooked.get_or_insert_with(|| {
                        self.cursor.slice(content_start, chunk_start).to_owned()
                    });
                    cooked.push_str(self.cursor.slice(chunk_start, self.cursor.pos()));
                    self.cook_escape(cooked, start)?;
                }
                _ => {
                    // Closing quote.
                    let name = match cooked {
                        Some(mut s) => {
                            s.push_str(self.cursor.slice(chunk_start, self.cursor.pos()));
                            self.interner.intern_owned(s)
                        }
                        None => self
                            .interner
                            .intern(self.cursor.slice(content_start, self.cursor.pos())),
                    };
                    self.cursor.advance();
                    return Ok(TokenKind::Str(name));
                }
            }
        }
    }

    /// Cook one escape sequence (cursor on the backslash) into `out`.
    fn cook_escape(&mut self, out: &mut String, tok_start: u32) -> Result<(), LexError> {
        let esc_start = self.cursor.pos();
        self.cursor.advance();
        let b = self.cursor.current();
        match b {
            b'n' => {
                out.push('\n');
                self.cursor.advance();
            }
            b't' => {
                out.push('\t');
                self.cursor.advance();
            }
            b'r' => {
                out.push('\r');
                self.cursor.advance();
            }
            b'b' => {
                out.push('\u{8}');
                self.cursor.advance();
            }
            b'f' => {
                out.push('\u{C}');
                self.cursor.advance();
            }
            b'v' => {
                out.push('\u{B}');
                self.cursor.advance();
            }
            b'0' if !self.cursor.peek().is_ascii_digit() => {
                out.push('\0');
                self.cursor.advance();
            }
            b'0'..=b'7' => {
                if self.strict {
                    return Err(LexError::new(
                        ErrorCode::E0004,
                        Span::new(esc_start, esc_start + 2),
                        "octal escape sequences are not allowed in strict mode",
                    ));
                }
                let mut value = 0u32;
                let mut count = 0;
                while count < 3 && (b'0'..=b'7').contains(&self.cursor.current()) {
                    let next = value * 8 + u32::from(self.cursor.current() - b'0');
                    if next > 0xFF {
                        break;
                    }
                    value = next;
                    count += 1;
                    self.cursor.advance();
                }
                out.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
            }
            b'x' => {
                self.cursor.advance();
                let mut value = 0u32;
                for _ in 0..2 {
                    let d = (self.cursor.current() as char).to_digit(16).ok_or_else(|| {
                        LexError::new(
                            ErrorCode::E0004,
                            Span::new(esc_start, self.cursor.pos()),
                            "invalid hexadecimal escape",
                        )
                    })?;
                    value = value * 16 + d;
                    self.cursor.advance();
                }
                out.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
            }
            b'u' => {
                let c = self.scan_unicode_escape(esc_start)?;
                out.push(c);
            }
            b'\n' | b'\r' => {
                // Line continuation: the escape and the terminator vanish.
                self.cursor.advance();
                if b == b'\r' && self.cursor.current() == b'\n' {
                    self.cursor.advance();
                }
            }
            0 if self.cursor.is_eof() => {
                return Err(LexError::new(
                    ErrorCode::E0001,
                    Span::new(tok_start, self.cursor.pos()),
                    "unterminated string literal",
                ));
            }
            _ => {
                let c = self.cursor.current_char();
                if is_unicode_line_terminator(c) {
                    self.cursor.advance_char();
                } else {
                    out.push(c);
                    self.cursor.advance_char();
                }
            }
        }
        Ok(())
    }

    /// Scan `uXXXX` or `u{XXXXXX}` with the cursor on the `u`.
    fn scan_unicode_escape(&mut self, esc_start: u32) -> Result<char, LexError> {
        self.cursor.advance();
        let bad = |scanner: &Scanner<'a>| {
            LexError::new(
                ErrorCode::E0008,
                Span::new(esc_start, scanner.cursor.pos()),
                "invalid Unicode escape",
            )
        };
        let value = if self.cursor.current() == b'{' {
            self.cursor.advance();
            let digits_start = self.cursor.pos();
            self.cursor.eat_while(|b| b.is_ascii_hexdigit());
            if self.cursor.current() != b'}' || self.cursor.pos() == digits_start {
                return Err(bad(self));
            }
            let value = u32::from_str_radix(self.cursor.slice_from(digits_start), 16)
                .map_err(|_| bad(self))?;
            self.cursor.advance();
            value
        } else {
            let mut value = 0u32;
            for _ in 0..4 {
                let d = (self.cursor.current() as char)
                    .to_digit(16)
                    .ok_or_else(|| bad(self))?;
                value = value * 16 + d;
                self.cursor.advance();
            }
            value
        };
        char::from_u32(value).ok_or_else(|| bad(self))
    }

    // ── Templates ──

    /// Scan template content with the cursor just past the opening
    /// `` ` `` or `}`. Returns the cooked chunk and whether the chunk ended
    /// at `` ` `` (true) or `${` (false). The cursor ends past the
    /// terminator.
    fn scan_template_chunk(&mut self, tok_start: u32) -> Result<(Name, bool), LexError> {
        let content_start = self.cursor.pos();
        let mut cooked: Option<String> = None;
        loop {
            let chunk_start = self.cursor.pos();
            let b = self.cursor.skip_to_template_delim();
            match b {
                0 => {
                    return Err(LexError::new(
                        ErrorCode::E0005,
                        Span::new(tok_start, self.cursor.pos()),
                        "unterminated template literal",
                    ));
                }
                b'`' | b'$' if b == b'$' && self.cursor.peek() != b'{' => {
                    // Lone `$`: ordinary content.
                    self.cursor.advance();
                    continue;
                }
                b'`' | b'$' => {
                    let name = match cooked {
                        Some(mut s) => {
                            s.push_str(self.cursor.slice(chunk_start, self.cursor.pos()));
                            self.interner.intern_owned(s)
                        }
                        None => self
                            .interner
                            .intern(self.cursor.slice(content_start, self.cursor.pos())),
                    };
                    let terminated = b == b'`';
                    self.cursor.advance_n(if terminated { 1 } else { 2 });
                    return Ok((name, terminated));
                }
                b'\\' => {
                    let cooked = cooked.get_or_insert_with(|| {
                        self.cursor.slice(content_start, chunk_start).to_owned()
                    });
                    cooked.push_str(self.cursor.slice(chunk_start, self.cursor.pos()));
                    self.cook_escape(cooked, tok_start)?;
                }
                b'\r' => {
                    // Normalize CR and CRLF to LF in cooked content.
                    let cooked = cooked.get_or_insert_with(|| {
                        self.cursor.slice(content_start, chunk_start).to_owned()
                    });
                    cooked.push_str(self.cursor.slice(chunk_start, self.cursor.pos()));
                    cooked.push('\n');
                    self.cursor.advance();
                    if self.cursor.current() == b'\n' {
                        self.cursor.advance();
                    }
                }
                _ => {
                    // Plain newline: legal template content.
                    self.cursor.advance();
                }
            }
        }
    }

    // ── Regular expressions ──

    /// Scan a regex literal with the cursor on the opening `/`.
    fn scan_regex(&mut self) -> Result<TokenKind, LexError> {
        let start = self.cursor.pos();
        self.cursor.advance();
        let pattern_start = self.cursor.pos();
        let mut in_class = false;
        loop {
            match self.cursor.current() {
                0 if self.cursor.is_eof() => {
                    return Err(LexError::new(
                        ErrorCode::E0006,
                        Span::new(start, self.cursor.pos()),
                        "unterminated regular expression",
                    ));
                }
                b'\n' | b'\r' => {
                    return Err(LexError::new(
                        ErrorCode::E0006,
                        Span::new(start, self.cursor.pos()),
                        "unterminated regular expression",
                    ));
                }
                b'\\' => {
                    self.cursor.advance();
                    match self.cursor.current() {
                        b'\n' | b'\r' | 0 => {}
                        _ => self.cursor.advance_char(),
                    }
                }
                b'[' => {
                    in_class = true;
                    self.cursor.advance();
                }
                b']' => {
                    in_class = false;
                    self.cursor.advance();
                }
                b'/' if !in_class => break,
                b if b >= 0x80 => {
                    if is_unicode_line_terminator(self.cursor.current_char()) {
                        return Err(LexError::new(
                            ErrorCode::E0006,
                            Span::new(start, self.cursor.pos()),
                            "unterminated regular expression",
                        ));
                    }
                    self.cursor.advance_char();
                }
                _ => self.cursor.advance(),
            }
        }
        let pattern = self.interner.intern(self.cursor.slice_from(pattern_start));
        self.cursor.advance();

        let flags_start = self.cursor.pos();
        self.cursor.eat_while(is_ident_continue);
        let flags = self.interner.intern(self.cursor.slice_from(flags_start));
        Ok(TokenKind::Regex { pattern, flags })
    }

    // ── Punctuators ──

    #[allow(clippy::too_many_lines)]
    fn scan_punctuator(&mut self) -> Result<TokenKind, LexError> {
        let b = self.cursor.current();
        let b1 = self.cursor.peek();
        let b2 = self.cursor.peek2();
        let (kind, len) = match b {
            b'{' => (TokenKind::LBrace, 1),
            b'}' => (TokenKind::RBrace, 1),
            b'(' => (TokenKind::LParen, 1),
            b')' => (TokenKind::RParen, 1),
            b'[' => (TokenKind::LBracket, 1),
            b']' => (TokenKind::RBracket, 1),
            b';' => (TokenKind::Semicolon, 1),
            b',' => (TokenKind::Comma, 1),
            b':' => (TokenKind::Colon, 1),
            b'~' => (TokenKind::Tilde, 1),
            b'.' => {
                if b1.is_ascii_digit() {
                    return self.scan_fraction();
                } else if b1 == b'.' && b2 == b'.' {
                    (TokenKind::DotDotDot, 3)
                } else {
                    (TokenKind::Dot, 1)
                }
            }
            b'?' => match (b1, b2) {
                (b'.', d) if !d.is_ascii_digit() => (TokenKind::QuestionDot, 2),
                (b'?', b'=') => (TokenKind::QuestionQuestionEq, 3),
                (b'?', _) => (TokenKind::QuestionQuestion, 2),
                _ => (TokenKind::Question, 1),
            },
            b'=' => match (b1, b2) {
                (b'=', b'=') => (TokenKind::EqEqEq, 3),
                (b'=', _) => (TokenKind::EqEq, 2),
                (b'>', _) => (TokenKind::Arrow, 2),
                _ => (TokenKind::Eq, 1),
            },
            b'!' => match (b1, b2) {
                (b'=', b'=') => (TokenKind::NotEqEq, 3),
                (b'=', _) => (TokenKind::NotEq, 2),
                _ => (TokenKind::Bang, 1),
            },
            b'+' => match b1 {
                b'+' => (TokenKind::PlusPlus, 2),
                b'=' => (TokenKind::PlusEq, 2),
                _ => (TokenKind::Plus, 1),
            },
            b'-' => match b1 {
                b'-' => (TokenKind::MinusMinus, 2),
                b'=' => (TokenKind::MinusEq, 2),
                _ => (TokenKind::Minus, 1),
            },
            b'*' => match (b1, b2) {
                (b'*', b'=') => (TokenKind::StarStarEq, 3),
                (b'*', _) => (TokenKind::StarStar, 2),
                (b'=', _) => (TokenKind::StarEq, 2),
                _ => (TokenKind::Star, 1),
            },
            b'/' => match b1 {
                b'=' => (TokenKind::SlashEq, 2),
                _ => (TokenKind::Slash, 1),
            },
            b'%' => match b1 {
                b'=' => (TokenKind::PercentEq, 2),
                _ => (TokenKind::Percent, 1),
            },
            b'<' => match (b1, b2) {
                (b'<', b'=') => (TokenKind::ShlEq, 3),
                (b'<', _) => (TokenKind::Shl, 2),
                (b'=', _) => (TokenKind::LtEq, 2),
                _ => (TokenKind::Lt, 1),
            },
            b'>' => match (b1, b2, self.cursor.peek3()) {
                (b'>', b'>', b'=') => (TokenKind::UShrEq, 4),
                (b'>', b'>', _) => (TokenKind::UShr, 3),
                (b'>', b'=', _) => (TokenKind::ShrEq, 3),
                (b'>', _, _) => (TokenKind::Shr, 2),
                (b'=', _, _) => (TokenKind::GtEq, 2),
                _ => (TokenKind::Gt, 1),
            },
            b'&' => match (b1, b2) {
                (b'&', b'=') => (TokenKind::AmpAmpEq, 3),
                (b'&', _) => (TokenKind::AmpAmp, 2),
                (b'=', _) => (TokenKind::AmpEq, 2),
                _ => (TokenKind::Amp, 1),
            },
            b'|' => match (b1, b2) {
                (b'|', b'=') => (TokenKind::PipePipeEq, 3),
                (b'|', _) => (TokenKind::PipePipe, 2),
                (b'=', _) => (TokenKind::PipeEq, 2),
                _ => (TokenKind::Pipe, 1),
            },
            b'^' => match b1 {
                b'=' => (TokenKind::CaretEq, 2),
                _ => (TokenKind::Caret, 1),
            },
            _ => {
                let start = self.cursor.pos();
                let c = self.cursor.current_char();
                self.cursor.advance_char();
                return Err(LexError::new(
                    ErrorCode::E0002,
                    Span::new(start, self.cursor.pos()),
                    format!("invalid character `{c}` in source"),
                ));
            }
        };
        self.cursor.advance_n(len);
        Ok(kind)
    }

    /// `.5` style number with the cursor on the dot.
    fn scan_fraction(&mut self) -> Result<TokenKind, LexError> {
        let start = self.cursor.pos();
        self.cursor.advance();
        self.eat_digits()?;
        if matches!(self.cursor.current(), b'e' | b'E') {
            self.cursor.advance();
            if matches!(self.cursor.current(), b'+' | b'-') {
                self.cursor.advance();
            }
            if !self.cursor.current().is_ascii_digit() {
                return Err(self.bad_number(start, "missing exponent digits"));
            }
            self.eat_digits()?;
        }
        self.check_number_boundary(start)?;
        let text = self.cursor.slice_from(start).replace('_', "");
        let value: f64 = text
            .parse()
            .unwrap_or_else(|_| panic!("scanned number literal failed to parse: {text}"));
        Ok(TokenKind::Number(value.to_bits()))
    }
}
