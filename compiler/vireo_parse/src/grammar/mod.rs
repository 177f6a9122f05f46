//! Grammar driver.
//!
//! Recursive-descent over the token cursor, split by grammar area:
//! statements in [`stmt`], expressions in [`expr`], function forms and the
//! deferral hooks in [`func`], classes in [`class`], import/export in
//! [`module_items`]. The driver owns the arena and the binder; nodes are
//! allocated as productions complete and identifier references go straight
//! onto the binder's chains.

pub(crate) mod class;
pub(crate) mod expr;
pub(crate) mod func;
pub(crate) mod module_items;
pub(crate) mod stmt;

use vireo_diagnostic::ErrorCode;
use vireo_ir::{
    FuncId, FunctionFlags, Name, NodeArena, NodeId, NodeKind, Span, StringInterner, TokenKind,
};
use vireo_lexer::{Scanner, SourceBuffer};

use crate::background::BackgroundHandle;
use crate::binder::{Binder, ScopeKind};
use crate::cursor::TokenCursor;
use crate::error::{PResult, ParseError};
use crate::options::{FeatureFlags, ParseOptions};

/// Names the grammar compares against repeatedly; all pre-interned.
pub(crate) struct WellKnown {
    pub eval: Name,
    pub arguments: Name,
    pub use_strict: Name,
    pub constructor: Name,
}

impl WellKnown {
    fn new(interner: &StringInterner) -> Self {
        WellKnown {
            eval: interner.intern("eval"),
            arguments: interner.intern("arguments"),
            use_strict: interner.intern("use strict"),
            constructor: interner.intern("constructor"),
        }
    }
}

/// Grammar context threaded through nested productions.
#[derive(Copy, Clone, Default)]
pub(crate) struct Context {
    /// Inside a generator: `yield` is an expression, not an identifier.
    pub allow_yield: bool,
    /// Inside an async function: `await` is an expression.
    pub allow_await: bool,
    pub in_function: bool,
    pub in_loop: bool,
    pub in_switch: bool,
    /// Inside a parameter default initializer (deferral is forced off).
    pub in_param_default: bool,
    /// Inside a class field initializer (deferral is forced off).
    pub in_class_field: bool,
    /// `in` is a for-head terminator here, not a relational operator.
    pub no_in: bool,
}

/// One active statement label.
///
/// `depth` is the statement nesting depth at which the label was applied;
/// a loop marks the contiguous run of labels directly above it (`a: b:
/// while ...`) as valid `continue` targets by walking depths downward.
#[derive(Copy, Clone)]
pub(crate) struct LabelEntry {
    pub name: Name,
    pub is_loop: bool,
    pub depth: u32,
}

pub(crate) struct Parser<'a> {
    pub(crate) cursor: TokenCursor<'a>,
    /// Raw source text, for slicing property names and template raw chunks.
    pub(crate) source: &'a str,
    pub(crate) arena: NodeArena,
    pub(crate) binder: Binder,
    pub(crate) interner: &'a StringInterner,
    pub(crate) options: &'a ParseOptions,
    pub(crate) source_len: u32,
    pub(crate) ctx: Context,
    /// Function whose body is being parsed; INVALID at the top level.
    pub(crate) current_func: FuncId,
    pub(crate) strict: bool,
    /// Active statement labels, innermost last.
    pub(crate) labels: Vec<LabelEntry>,
    /// Statement nesting depth, for label-chain bookkeeping.
    pub(crate) stmt_depth: u32,
    /// Span of the first shorthand-with-initializer (`{a = 1}`) parsed in
    /// expression position; an error unless a pattern conversion claims it.
    pub(crate) cover_init: Option<Span>,
    pub(crate) background: Option<BackgroundHandle>,
    pub(crate) names: WellKnown,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(
        source: &'a str,
        buffer: &'a SourceBuffer,
        interner: &'a StringInterner,
        options: &'a ParseOptions,
        background: Option<BackgroundHandle>,
    ) -> PResult<Self> {
        let strict = options.module || options.strict_mode;
        let mut scanner = Scanner::new(buffer, interner);
        scanner.set_strict(strict);
        let cursor = TokenCursor::new(scanner)?;
        Ok(Parser {
            cursor,
            source,
            arena: NodeArena::new(),
            binder: Binder::new(interner),
            interner,
            options,
            source_len: buffer.len(),
            ctx: Context {
                allow_await: options.module,
                ..Context::default()
            },
            current_func: FuncId::INVALID,
            strict,
            labels: Vec::new(),
            stmt_depth: 0,
            cover_init: None,
            background,
            names: WellKnown::new(interner),
        })
    }

    /// Sub-parser positioned at a deferred body's `{`, used for on-demand
    /// re-parse and background workers. The produced arena is spliced into
    /// the main unit afterwards.
    pub(crate) fn new_at(
        source: &'a str,
        buffer: &'a SourceBuffer,
        interner: &'a StringInterner,
        options: &'a ParseOptions,
        restore: u32,
        strict: bool,
        flags: FunctionFlags,
    ) -> PResult<Self> {
        let mut scanner = Scanner::new(buffer, interner);
        scanner.set_strict(strict);
        scanner.seek(restore);
        let cursor = TokenCursor::new(scanner)?;
        Ok(Parser {
            cursor,
            source,
            arena: NodeArena::new(),
            binder: Binder::new(interner),
            interner,
            options,
            source_len: buffer.len(),
            ctx: Context {
                allow_yield: flags.contains(FunctionFlags::GENERATOR),
                allow_await: flags.contains(FunctionFlags::ASYNC),
                in_function: true,
                ..Context::default()
            },
            current_func: FuncId::INVALID,
            strict,
            labels: Vec::new(),
            stmt_depth: 0,
            cover_init: None,
            background: None,
            names: WellKnown::new(interner),
        })
    }

    #[inline]
    pub(crate) fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.arena.push(kind, span)
    }

    pub(crate) fn err(
        &self,
        code: ErrorCode,
        span: Span,
        message: impl Into<String>,
    ) -> ParseError {
        ParseError::new(code, span, message)
    }

    /// Generic "didn't expect that here" at the current token.
    pub(crate) fn unexpected(&self) -> ParseError {
        ParseError::new(
            ErrorCode::E1001,
            self.cursor.span(),
            format!("unexpected {}", self.cursor.kind()),
        )
    }

    pub(crate) fn require_feature(&self, feature: FeatureFlags, what: &str) -> PResult<()> {
        if self.options.features.contains(feature) {
            Ok(())
        } else {
            Err(ParseError::new(
                ErrorCode::E1001,
                self.cursor.span(),
                format!("{what} support is disabled"),
            ))
        }
    }

    /// Statement terminator with automatic semicolon insertion: an explicit
    /// `;`, or a newline / `}` / end of input standing in for one.
    pub(crate) fn semicolon(&mut self) -> PResult<()> {
        if self.cursor.eat(TokenKind::Semicolon)? {
            return Ok(());
        }
        if self.cursor.at(TokenKind::RBrace)
            || self.cursor.at(TokenKind::Eof)
            || self.cursor.newline_before()
        {
            return Ok(());
        }
        Err(ParseError::new(
            ErrorCode::E1007,
            self.cursor.span(),
            format!("expected ';' before {}", self.cursor.kind()),
        ))
    }

    /// Set strict mode on the parser and the scanner together.
    pub(crate) fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
        self.cursor.set_strict(strict);
    }

    /// Interned name of the current token when it can serve as an
    /// identifier in this context. Covers contextual keywords always, and
    /// `yield`/`await` where the surrounding context demotes them.
    pub(crate) fn ident_like_name(&self) -> Option<Name> {
        match self.cursor.kind() {
            TokenKind::Yield if !self.strict && !self.ctx.allow_yield => {
                Some(self.interner.intern("yield"))
            }
            TokenKind::Await if !self.options.module && !self.ctx.allow_await => {
                Some(self.interner.intern("await"))
            }
            kind => kind.ident_name(self.interner),
        }
    }

    /// Require an identifier usable as a binding name; consumes it.
    pub(crate) fn expect_binding_ident(&mut self) -> PResult<(Name, Span)> {
        let span = self.cursor.span();
        match self.cursor.kind() {
            TokenKind::Yield if self.strict || self.ctx.allow_yield => Err(self.err(
                ErrorCode::E1020,
                span,
                "'yield' cannot be used as an identifier here",
            )),
            TokenKind::Await if self.options.module || self.ctx.allow_await => Err(self.err(
                ErrorCode::E1020,
                span,
                "'await' cannot be used as an identifier here",
            )),
            TokenKind::Let | TokenKind::Static if self.strict => Err(self.err(
                ErrorCode::E1014,
                span,
                format!("'{}' is a reserved word in strict mode", self.cursor.kind()),
            )),
            // Sloppy-mode `yield`/`await` fell past the gated arms above
            // and are ordinary identifiers.
            kind if kind.is_reserved_word()
                && !matches!(kind, TokenKind::Yield | TokenKind::Await) =>
            Err(self.err(
                ErrorCode::E1014,
                span,
                format!("{} cannot be used as an identifier", kind),
            )),
            _ => match self.ident_like_name() {
                Some(name) => {
                    self.cursor.bump()?;
                    Ok((name, span))
                }
                None => Err(self.err(
                    ErrorCode::E1004,
                    span,
                    format!("expected identifier, found {}", self.cursor.kind()),
                )),
            },
        }
    }

    /// Parse a complete program or module.
    pub(crate) fn parse_program(&mut self) -> PResult<NodeId> {
        let scope_kind = if self.options.module {
            ScopeKind::Module
        } else {
            ScopeKind::Global
        };
        self.binder.push_scope(scope_kind, FuncId::INVALID);

        let mut stmts = Vec::new();
        if self.parse_directives(&mut stmts)? {
            self.set_strict(true);
        }
        while !self.cursor.at(TokenKind::Eof) {
            let stmt = if self.options.module {
                self.parse_module_item()?
            } else {
                self.parse_statement()?
            };
            stmts.push(stmt);
        }

        self.binder.pop_scope(&mut self.arena)?;
        let body = self.arena.push_list(&stmts);
        Ok(self.push(NodeKind::Program { body }, Span::new(0, self.source_len)))
    }

    /// Consume a directive prologue; returns whether `"use strict"`
    /// appeared. Only statements that are exactly a string literal (with a
    /// real or inserted semicolon) are directives.
    pub(crate) fn parse_directives(&mut self, stmts: &mut Vec<NodeId>) -> PResult<bool> {
        let mut strict = false;
        while let TokenKind::Str(value) = self.cursor.kind() {
            let snap = self.cursor.snapshot();
            let tok = self.cursor.bump()?;
            let is_directive = if self.cursor.at(TokenKind::Semicolon) {
                self.cursor.bump()?;
                true
            } else {
                self.cursor.at(TokenKind::RBrace)
                    || self.cursor.at(TokenKind::Eof)
                    || self.cursor.newline_before()
            };
            if !is_directive {
                self.cursor.restore(snap);
                break;
            }
            let lit = self.push(NodeKind::Str(value), tok.span);
            let span = Span::new(tok.span.start, self.cursor.prev_end());
            stmts.push(self.push(NodeKind::ExprStmt { expr: lit }, span));
            if value == self.names.use_strict {
                strict = true;
            }
        }
        Ok(strict)
    }

    /// Record a reference for an identifier expression node.
    pub(crate) fn record_ident_ref(&mut self, name: Name, node: NodeId, span: Span) {
        self.binder.record_ref(name, node, span.start, false);
    }

    /// Tear down, yielding the arena and resolved symbols. Top-level free
    /// references are host globals and are dropped.
    pub(crate) fn finish(self) -> (NodeArena, vireo_ir::SymbolTable) {
        let (arena, symbols, _) = self.finish_parts();
        (arena, symbols)
    }

    /// Tear down a sub-parse, keeping the free references for the splice
    /// to resolve against the enclosing unit.
    pub(crate) fn finish_parts(
        self,
    ) -> (NodeArena, vireo_ir::SymbolTable, Vec<crate::binder::FreeRef>) {
        let (symbols, free) = self.binder.into_parts();
        (self.arena, symbols, free)
    }
}
