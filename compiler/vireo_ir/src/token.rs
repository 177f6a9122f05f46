//! Lexical tokens for JavaScript.

use std::fmt;

use crate::{Name, Span, StringInterner};

/// Token kinds for JavaScript.
///
/// Literal payloads are interned [`Name`]s so tokens stay `Copy`-cheap and
/// hashable; numeric literals store the `f64` bit pattern.
///
/// Contextual keywords (`async`, `let`, `of`, `get`, ...) are scanned as
/// their own kinds and downgraded to identifiers by the grammar wherever the
/// surrounding production permits.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    /// End of input.
    Eof,

    /// Numeric literal (f64 bits for Eq/Hash).
    Number(u64),
    /// BigInt literal (digits, without the trailing `n`).
    BigInt(Name),
    /// String literal (cooked value, interned).
    Str(Name),
    /// Template head: `` `text${ ``
    TemplateHead(Name),
    /// Template middle: `}text${`
    TemplateMiddle(Name),
    /// Template tail: `` }text` ``
    TemplateTail(Name),
    /// Template with no substitutions: `` `text` ``
    NoSubTemplate(Name),
    /// Regular expression literal.
    Regex { pattern: Name, flags: Name },
    /// Identifier (interned).
    Ident(Name),
    /// Private class member name: `#field`.
    PrivateName(Name),

    // Reserved words
    Await,
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Enum,
    Export,
    Extends,
    False,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    Instanceof,
    New,
    Null,
    Return,
    Super,
    Switch,
    This,
    Throw,
    True,
    Try,
    Typeof,
    Var,
    Void,
    While,
    With,
    Yield,

    // Contextual keywords
    As,
    Async,
    From,
    Get,
    Let,
    Meta,
    Of,
    Set,
    Static,
    Target,

    // Punctuators
    LBrace,           // {
    RBrace,           // }
    LParen,           // (
    RParen,           // )
    LBracket,         // [
    RBracket,         // ]
    Semicolon,        // ;
    Comma,            // ,
    Dot,              // .
    DotDotDot,        // ...
    Arrow,            // =>
    Colon,            // :
    Question,         // ?
    QuestionDot,      // ?.
    QuestionQuestion, // ??

    Eq,                 // =
    PlusEq,             // +=
    MinusEq,            // -=
    StarEq,             // *=
    SlashEq,            // /=
    PercentEq,          // %=
    StarStarEq,         // **=
    ShlEq,              // <<=
    ShrEq,              // >>=
    UShrEq,             // >>>=
    AmpEq,              // &=
    PipeEq,             // |=
    CaretEq,            // ^=
    AmpAmpEq,           // &&=
    PipePipeEq,         // ||=
    QuestionQuestionEq, // ??=

    EqEq,    // ==
    EqEqEq,  // ===
    NotEq,   // !=
    NotEqEq, // !==
    Lt,      // <
    LtEq,    // <=
    Gt,      // >
    GtEq,    // >=
    Shl,     // <<
    Shr,     // >>
    UShr,    // >>>

    Plus,     // +
    Minus,    // -
    Star,     // *
    StarStar, // **
    Slash,    // /
    Percent,  // %

    Amp,      // &
    Pipe,     // |
    Caret,    // ^
    Tilde,    // ~
    Bang,     // !
    AmpAmp,   // &&
    PipePipe, // ||

    PlusPlus,   // ++
    MinusMinus, // --
}

impl TokenKind {
    /// True for identifiers and contextual keywords — anything the grammar
    /// may accept where an identifier is expected.
    #[inline]
    pub fn is_ident_like(&self) -> bool {
        matches!(
            self,
            TokenKind::Ident(_)
                | TokenKind::As
                | TokenKind::Async
                | TokenKind::From
                | TokenKind::Get
                | TokenKind::Let
                | TokenKind::Meta
                | TokenKind::Of
                | TokenKind::Set
                | TokenKind::Static
                | TokenKind::Target
        )
    }

    /// The interned name for an identifier-like token.
    ///
    /// Contextual keywords resolve through the interner; all of them are
    /// pre-interned so this never allocates.
    pub fn ident_name(&self, interner: &StringInterner) -> Option<Name> {
        match self {
            TokenKind::Ident(name) => Some(*name),
            TokenKind::As => Some(interner.intern("as")),
            TokenKind::Async => Some(interner.intern("async")),
            TokenKind::From => Some(interner.intern("from")),
            TokenKind::Get => Some(interner.intern("get")),
            TokenKind::Let => Some(interner.intern("let")),
            TokenKind::Meta => Some(interner.intern("meta")),
            TokenKind::Of => Some(interner.intern("of")),
            TokenKind::Set => Some(interner.intern("set")),
            TokenKind::Static => Some(interner.intern("static")),
            TokenKind::Target => Some(interner.intern("target")),
            _ => None,
        }
    }

    /// True when a `/` immediately after this token starts a regular
    /// expression rather than a division. Decides the `regex_allowed` hint
    /// the cursor passes to the scanner.
    pub fn regex_allowed_after(&self) -> bool {
        !matches!(
            self,
            TokenKind::Ident(_)
                | TokenKind::Number(_)
                | TokenKind::BigInt(_)
                | TokenKind::Str(_)
                | TokenKind::NoSubTemplate(_)
                | TokenKind::TemplateTail(_)
                | TokenKind::Regex { .. }
                | TokenKind::PrivateName(_)
                | TokenKind::This
                | TokenKind::Super
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
        )
        // `}` is genuinely ambiguous (block end vs object literal end); the
        // scanner treats it as regex-start, which matches statement position.
    }

    /// True for any reserved word (not contextual keywords).
    pub fn is_reserved_word(&self) -> bool {
        matches!(
            self,
            TokenKind::Await
                | TokenKind::Break
                | TokenKind::Case
                | TokenKind::Catch
                | TokenKind::Class
                | TokenKind::Const
                | TokenKind::Continue
                | TokenKind::Debugger
                | TokenKind::Default
                | TokenKind::Delete
                | TokenKind::Do
                | TokenKind::Else
                | TokenKind::Enum
                | TokenKind::Export
                | TokenKind::Extends
                | TokenKind::False
                | TokenKind::Finally
                | TokenKind::For
                | TokenKind::Function
                | TokenKind::If
                | TokenKind::Import
                | TokenKind::In
                | TokenKind::Instanceof
                | TokenKind::New
                | TokenKind::Null
                | TokenKind::Return
                | TokenKind::Super
                | TokenKind::Switch
                | TokenKind::This
                | TokenKind::Throw
                | TokenKind::True
                | TokenKind::Try
                | TokenKind::Typeof
                | TokenKind::Var
                | TokenKind::Void
                | TokenKind::While
                | TokenKind::With
                | TokenKind::Yield
        )
    }

    /// Short human-readable description for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Eof => "end of input",
            TokenKind::Number(_) => "number",
            TokenKind::BigInt(_) => "bigint",
            TokenKind::Str(_) => "string",
            TokenKind::TemplateHead(_)
            | TokenKind::TemplateMiddle(_)
            | TokenKind::TemplateTail(_)
            | TokenKind::NoSubTemplate(_) => "template literal",
            TokenKind::Regex { .. } => "regular expression",
            TokenKind::Ident(_) => "identifier",
            TokenKind::PrivateName(_) => "private name",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::DotDotDot => "'...'",
            TokenKind::Arrow => "'=>'",
            TokenKind::Colon => "':'",
            TokenKind::Eq => "'='",
            _ => "token",
        }
    }
}

/// One lexical token.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// True when a line terminator precedes this token — drives automatic
    /// semicolon insertion and restricted productions.
    pub newline_before: bool,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token {
            kind,
            span,
            newline_before: false,
        }
    }

    pub fn eof(offset: u32) -> Self {
        Token {
            kind: TokenKind::Eof,
            span: Span::point(offset),
            newline_before: false,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_context() {
        assert!(TokenKind::Eq.regex_allowed_after());
        assert!(TokenKind::LParen.regex_allowed_after());
        assert!(TokenKind::Return.regex_allowed_after());
        assert!(!TokenKind::Ident(Name::EMPTY).regex_allowed_after());
        assert!(!TokenKind::RParen.regex_allowed_after());
        assert!(!TokenKind::Number(0).regex_allowed_after());
    }

    #[test]
    fn test_ident_like() {
        assert!(TokenKind::Ident(Name::EMPTY).is_ident_like());
        assert!(TokenKind::Async.is_ident_like());
        assert!(TokenKind::Of.is_ident_like());
        assert!(!TokenKind::Function.is_ident_like());
    }

    #[test]
    fn test_contextual_name() {
        let interner = StringInterner::new();
        let name = TokenKind::Async.ident_name(&interner);
        assert_eq!(name.map(|n| interner.lookup(n).to_owned()).as_deref(), Some("async"));
        assert!(TokenKind::Function.ident_name(&interner).is_none());
    }
}
