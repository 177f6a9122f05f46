//! Statement grammar.
//!
//! One dispatch on the leading token; everything that is not a recognized
//! statement keyword falls through to the expression statement path, which
//! also handles labels (an expression that turns out to be a lone
//! identifier followed by `:`).

use smallvec::SmallVec;
use vireo_diagnostic::ErrorCode;
use vireo_ir::symbol::SymbolKind;
use vireo_ir::{FunctionFlags, Name, NodeId, NodeKind, Span, TokenKind, VarKind};

use super::{LabelEntry, Parser};
use crate::binder::ScopeKind;
use crate::error::PResult;
use crate::pattern::check_assign_target;

/// What kind of head a `for` statement parsed.
enum ForHead {
    Classic(Option<NodeId>),
    In(NodeId),
    Of(NodeId),
}

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement(&mut self) -> PResult<NodeId> {
        self.stmt_depth += 1;
        let result = self.parse_statement_inner();
        self.stmt_depth -= 1;
        result
    }

    fn parse_statement_inner(&mut self) -> PResult<NodeId> {
        let span = self.cursor.span();
        match self.cursor.kind() {
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Semicolon => {
                self.cursor.bump()?;
                Ok(self.push(NodeKind::Empty, span))
            }
            TokenKind::Var => {
                self.cursor.bump()?;
                let decl = self.parse_var_declarations(VarKind::Var, span.start)?;
                self.semicolon()?;
                Ok(decl)
            }
            TokenKind::Const => {
                self.cursor.bump()?;
                let decl = self.parse_var_declarations(VarKind::Const, span.start)?;
                self.semicolon()?;
                Ok(decl)
            }
            TokenKind::Let => self.parse_let_or_expr(span.start),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Try => self.parse_try(),
            TokenKind::Throw => self.parse_throw(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => self.parse_break_continue(false),
            TokenKind::Continue => self.parse_break_continue(true),
            TokenKind::With => self.parse_with(),
            TokenKind::Debugger => {
                self.cursor.bump()?;
                self.semicolon()?;
                Ok(self.push(NodeKind::Debugger, Span::new(span.start, self.cursor.prev_end())))
            }
            TokenKind::Function => self.parse_function_decl(FunctionFlags::empty(), span.start, true),
            TokenKind::Class => {
                self.require_feature(crate::options::FeatureFlags::CLASSES, "class")?;
                self.parse_class_decl(span.start)
            }
            TokenKind::Async => {
                let snap = self.cursor.snapshot();
                self.cursor.bump()?;
                if self.cursor.at(TokenKind::Function) && !self.cursor.newline_before() {
                    self.require_feature(
                        crate::options::FeatureFlags::ASYNC_AWAIT,
                        "async function",
                    )?;
                    return self.parse_function_decl(FunctionFlags::ASYNC, span.start, true);
                }
                self.cursor.restore(snap);
                self.parse_expr_stmt()
            }
            TokenKind::Import => {
                // `import.meta` is an expression; everything else is a
                // module item in the wrong place.
                let snap = self.cursor.snapshot();
                self.cursor.bump()?;
                let meta = self.cursor.at(TokenKind::Dot);
                self.cursor.restore(snap);
                if meta {
                    return self.parse_expr_stmt();
                }
                Err(self.err(
                    ErrorCode::E1015,
                    span,
                    "'import' declarations are only allowed at the top level of a module",
                ))
            }
            TokenKind::Export => Err(self.err(
                ErrorCode::E1015,
                span,
                format!(
                    "{} declarations are only allowed at the top level of a module",
                    self.cursor.kind()
                ),
            )),
            _ => self.parse_expr_stmt(),
        }
    }

    pub(crate) fn parse_block(&mut self) -> PResult<NodeId> {
        let lbrace = self.cursor.expect(TokenKind::LBrace)?;
        self.binder.push_scope(ScopeKind::Block, self.current_func);
        let mut stmts = Vec::new();
        while !self.cursor.at(TokenKind::RBrace) {
            stmts.push(self.parse_statement()?);
        }
        let rbrace = self.cursor.expect(TokenKind::RBrace)?;
        self.binder.pop_scope(&mut self.arena)?;
        let body = self.arena.push_list(&stmts);
        Ok(self.push(
            NodeKind::Block { body },
            Span::new(lbrace.start, rbrace.end),
        ))
    }

    /// `let` begins a declaration only when a binding form follows;
    /// otherwise (sloppy mode) it is an ordinary identifier.
    fn parse_let_or_expr(&mut self, start: u32) -> PResult<NodeId> {
        let snap = self.cursor.snapshot();
        self.cursor.bump()?;
        let is_decl = matches!(
            self.cursor.kind(),
            TokenKind::LBracket | TokenKind::LBrace
        ) || self.ident_like_name().is_some();
        if is_decl {
            let decl = self.parse_var_declarations(VarKind::Let, start)?;
            self.semicolon()?;
            return Ok(decl);
        }
        if self.strict {
            return Err(self.err(
                ErrorCode::E1014,
                Span::new(start, self.cursor.prev_end()),
                "'let' is a reserved word in strict mode",
            ));
        }
        self.cursor.restore(snap);
        self.parse_expr_stmt()
    }

    /// Declarator list after `var`/`let`/`const` (keyword consumed).
    fn parse_var_declarations(&mut self, kind: VarKind, start: u32) -> PResult<NodeId> {
        let sym_kind = match kind {
            VarKind::Var => SymbolKind::Var,
            VarKind::Let => SymbolKind::Let,
            VarKind::Const => SymbolKind::Const,
        };
        let mut decls: SmallVec<[NodeId; 4]> = SmallVec::new();
        loop {
            let decl_start = self.cursor.span().start;
            let mut names = SmallVec::new();
            let pattern = self.parse_binding_pattern(sym_kind, &mut names)?;
            let is_pattern = !matches!(self.arena.get(pattern).kind, NodeKind::Ident { .. });
            let init = if self.cursor.eat(TokenKind::Eq)? {
                Some(self.parse_assign()?)
            } else {
                None
            };
            if init.is_none() {
                if kind == VarKind::Const {
                    return Err(self.err(
                        ErrorCode::E1001,
                        self.arena.get(pattern).span,
                        "missing initializer in const declaration",
                    ));
                }
                if is_pattern {
                    return Err(self.err(
                        ErrorCode::E1006,
                        self.arena.get(pattern).span,
                        "missing initializer in destructuring declaration",
                    ));
                }
            }
            decls.push(self.push(
                NodeKind::VarDeclarator { pattern, init },
                Span::new(decl_start, self.cursor.prev_end()),
            ));
            if !self.cursor.eat(TokenKind::Comma)? {
                break;
            }
        }
        let range = self.arena.push_list(&decls);
        Ok(self.push(
            NodeKind::VarDecl { kind, decls: range },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    fn parse_if(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        self.cursor.bump()?;
        self.cursor.expect(TokenKind::LParen)?;
        let test = self.parse_expr()?;
        self.cursor.expect(TokenKind::RParen)?;
        let cons = self.parse_statement()?;
        let alt = if self.cursor.eat(TokenKind::Else)? {
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(self.push(
            NodeKind::If { test, cons, alt },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    fn parse_loop_body(&mut self) -> PResult<NodeId> {
        let saved = std::mem::replace(&mut self.ctx.in_loop, true);
        let body = self.parse_statement();
        self.ctx.in_loop = saved;
        body
    }

    /// Mark the contiguous chain of labels directly enclosing the loop
    /// statement about to be parsed as `continue` targets.
    fn mark_loop_labels(&mut self) {
        let mut expect = self.stmt_depth.wrapping_sub(1);
        for entry in self.labels.iter_mut().rev() {
            if entry.depth != expect {
                break;
            }
            entry.is_loop = true;
            expect = expect.wrapping_sub(1);
        }
    }

    fn parse_while(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        self.mark_loop_labels();
        self.cursor.bump()?;
        self.cursor.expect(TokenKind::LParen)?;
        let test = self.parse_expr()?;
        self.cursor.expect(TokenKind::RParen)?;
        let body = self.parse_loop_body()?;
        Ok(self.push(
            NodeKind::While { test, body },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    fn parse_do_while(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        self.mark_loop_labels();
        self.cursor.bump()?;
        let body = self.parse_loop_body()?;
        self.cursor.expect(TokenKind::While)?;
        self.cursor.expect(TokenKind::LParen)?;
        let test = self.parse_expr()?;
        self.cursor.expect(TokenKind::RParen)?;
        // The semicolon after do-while is always optional.
        self.cursor.eat(TokenKind::Semicolon)?;
        Ok(self.push(
            NodeKind::DoWhile { body, test },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    fn parse_for(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        self.mark_loop_labels();
        self.cursor.bump()?;
        let is_await = if self.ctx.allow_await && self.cursor.at(TokenKind::Await) {
            self.cursor.bump()?;
            true
        } else {
            false
        };
        self.cursor.expect(TokenKind::LParen)?;

        // Lexical declarations in the head scope over head and body both.
        self.binder.push_scope(ScopeKind::Block, self.current_func);
        let result = self.parse_for_tail(start, is_await);
        self.binder.pop_scope(&mut self.arena)?;
        result
    }

    fn parse_for_tail(&mut self, start: u32, is_await: bool) -> PResult<NodeId> {
        let head = if self.cursor.at(TokenKind::Semicolon) {
            ForHead::Classic(None)
        } else {
            match self.cursor.kind() {
                TokenKind::Var => self.parse_for_decl_head(VarKind::Var)?,
                TokenKind::Const => self.parse_for_decl_head(VarKind::Const)?,
                TokenKind::Let => {
                    let snap = self.cursor.snapshot();
                    self.cursor.bump()?;
                    let is_decl = matches!(
                        self.cursor.kind(),
                        TokenKind::LBracket | TokenKind::LBrace
                    ) || self.ident_like_name().is_some();
                    if is_decl {
                        // parse_for_decl_head re-reads the keyword.
                        self.cursor.restore(snap);
                        self.cursor.bump()?;
                        self.parse_for_decl_head_after_kw(VarKind::Let, snap)?
                    } else {
                        self.cursor.restore(snap);
                        self.parse_for_expr_head()?
                    }
                }
                _ => self.parse_for_expr_head()?,
            }
        };

        match head {
            ForHead::Of(left) => {
                let right = self.parse_assign()?;
                self.cursor.expect(TokenKind::RParen)?;
                let body = self.parse_loop_body()?;
                Ok(self.push(
                    NodeKind::ForOf {
                        left,
                        right,
                        body,
                        is_await,
                    },
                    Span::new(start, self.cursor.prev_end()),
                ))
            }
            ForHead::In(left) => {
                if is_await {
                    return Err(self.err(
                        ErrorCode::E1018,
                        Span::point(start),
                        "'for await' is only valid with 'of'",
                    ));
                }
                let right = self.parse_expr()?;
                self.cursor.expect(TokenKind::RParen)?;
                let body = self.parse_loop_body()?;
                Ok(self.push(
                    NodeKind::ForIn { left, right, body },
                    Span::new(start, self.cursor.prev_end()),
                ))
            }
            ForHead::Classic(init) => {
                if is_await {
                    return Err(self.err(
                        ErrorCode::E1018,
                        Span::point(start),
                        "'for await' is only valid with 'of'",
                    ));
                }
                self.cursor.expect(TokenKind::Semicolon)?;
                let test = if self.cursor.at(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.cursor.expect(TokenKind::Semicolon)?;
                let update = if self.cursor.at(TokenKind::RParen) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.cursor.expect(TokenKind::RParen)?;
                let body = self.parse_loop_body()?;
                Ok(self.push(
                    NodeKind::For {
                        init,
                        test,
                        update,
                        body,
                    },
                    Span::new(start, self.cursor.prev_end()),
                ))
            }
        }
    }

    fn parse_for_decl_head(&mut self, kind: VarKind) -> PResult<ForHead> {
        let snap = self.cursor.snapshot();
        self.cursor.bump()?;
        self.parse_for_decl_head_after_kw(kind, snap)
    }

    /// Declaration head: the keyword is consumed; `snap` points at it.
    fn parse_for_decl_head_after_kw(
        &mut self,
        kind: VarKind,
        snap: crate::cursor::Snapshot,
    ) -> PResult<ForHead> {
        let start = snap.token_span().start;
        let sym_kind = match kind {
            VarKind::Var => SymbolKind::Var,
            VarKind::Let => SymbolKind::Let,
            VarKind::Const => SymbolKind::Const,
        };

        let mut names = SmallVec::new();
        let first_start = self.cursor.span().start;
        let pattern = self.parse_binding_pattern(sym_kind, &mut names)?;
        let is_pattern = !matches!(self.arena.get(pattern).kind, NodeKind::Ident { .. });

        if self.cursor.at(TokenKind::In) || self.cursor.at(TokenKind::Of) {
            let of = self.cursor.at(TokenKind::Of);
            self.cursor.bump()?;
            let declarator = self.push(
                NodeKind::VarDeclarator {
                    pattern,
                    init: None,
                },
                Span::new(first_start, self.cursor.prev_end()),
            );
            let decls = self.arena.push_list(&[declarator]);
            let left = self.push(
                NodeKind::VarDecl { kind, decls },
                Span::new(start, self.cursor.prev_end()),
            );
            return Ok(if of { ForHead::Of(left) } else { ForHead::In(left) });
        }

        // Classic head; finish the declarator list with `in` disabled.
        let saved_no_in = std::mem::replace(&mut self.ctx.no_in, true);
        let mut decls: SmallVec<[NodeId; 4]> = SmallVec::new();
        let mut pattern = pattern;
        let mut is_pat = is_pattern;
        let mut decl_start = first_start;
        loop {
            let init = if self.cursor.eat(TokenKind::Eq)? {
                Some(self.parse_assign()?)
            } else {
                None
            };
            if init.is_none() && (kind == VarKind::Const || is_pat) {
                self.ctx.no_in = saved_no_in;
                return Err(self.err(
                    ErrorCode::E1018,
                    self.arena.get(pattern).span,
                    "missing initializer in for-loop declaration",
                ));
            }
            decls.push(self.push(
                NodeKind::VarDeclarator { pattern, init },
                Span::new(decl_start, self.cursor.prev_end()),
            ));
            if !self.cursor.eat(TokenKind::Comma)? {
                break;
            }
            decl_start = self.cursor.span().start;
            let mut more_names = SmallVec::new();
            pattern = self.parse_binding_pattern(sym_kind, &mut more_names)?;
            is_pat = !matches!(self.arena.get(pattern).kind, NodeKind::Ident { .. });
        }
        self.ctx.no_in = saved_no_in;
        let range = self.arena.push_list(&decls);
        Ok(ForHead::Classic(Some(self.push(
            NodeKind::VarDecl { kind, decls: range },
            Span::new(start, self.cursor.prev_end()),
        ))))
    }

    fn parse_for_expr_head(&mut self) -> PResult<ForHead> {
        let saved_no_in = std::mem::replace(&mut self.ctx.no_in, true);
        let expr = self.parse_expr();
        self.ctx.no_in = saved_no_in;
        let expr = expr?;

        if self.cursor.at(TokenKind::In) || self.cursor.at(TokenKind::Of) {
            let of = self.cursor.at(TokenKind::Of);
            // The head was really an assignment target.
            check_assign_target(&mut self.arena, expr, false).map_err(|mut e| {
                e.code = ErrorCode::E1018;
                e
            })?;
            self.cover_init = None;
            self.cursor.bump()?;
            return Ok(if of { ForHead::Of(expr) } else { ForHead::In(expr) });
        }
        if let Some(span) = self.cover_init.take() {
            return Err(self.err(
                ErrorCode::E1006,
                span,
                "shorthand property initializer is only valid in a destructuring pattern",
            ));
        }
        Ok(ForHead::Classic(Some(expr)))
    }

    fn parse_switch(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        self.cursor.bump()?;
        self.cursor.expect(TokenKind::LParen)?;
        let disc = self.parse_expr()?;
        self.cursor.expect(TokenKind::RParen)?;
        self.cursor.expect(TokenKind::LBrace)?;

        self.binder.push_scope(ScopeKind::Block, self.current_func);
        let saved = std::mem::replace(&mut self.ctx.in_switch, true);
        let mut cases: SmallVec<[NodeId; 8]> = SmallVec::new();
        let mut seen_default = false;
        while !self.cursor.at(TokenKind::RBrace) {
            let case_start = self.cursor.span().start;
            let test = if self.cursor.eat(TokenKind::Case)? {
                Some(self.parse_expr()?)
            } else {
                let default_span = self.cursor.span();
                self.cursor.expect(TokenKind::Default)?;
                if seen_default {
                    self.ctx.in_switch = saved;
                    return Err(self.err(
                        ErrorCode::E1001,
                        default_span,
                        "multiple default clauses in switch",
                    ));
                }
                seen_default = true;
                None
            };
            self.cursor.expect(TokenKind::Colon)?;
            let mut stmts = Vec::new();
            while !matches!(
                self.cursor.kind(),
                TokenKind::Case | TokenKind::Default | TokenKind::RBrace
            ) {
                stmts.push(self.parse_statement()?);
            }
            let body = self.arena.push_list(&stmts);
            cases.push(self.push(
                NodeKind::SwitchCase { test, body },
                Span::new(case_start, self.cursor.prev_end()),
            ));
        }
        self.ctx.in_switch = saved;
        let rbrace = self.cursor.expect(TokenKind::RBrace)?;
        self.binder.pop_scope(&mut self.arena)?;

        let cases = self.arena.push_list(&cases);
        Ok(self.push(
            NodeKind::Switch { disc, cases },
            Span::new(start, rbrace.end),
        ))
    }

    fn parse_try(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        self.cursor.bump()?;
        let block = self.parse_block()?;

        let handler = if self.cursor.at(TokenKind::Catch) {
            let catch_start = self.cursor.span().start;
            self.cursor.bump()?;
            self.binder.push_scope(ScopeKind::Catch, self.current_func);
            let param = if self.cursor.eat(TokenKind::LParen)? {
                let mut names = SmallVec::new();
                let pat = self.parse_binding_pattern(SymbolKind::CatchParam, &mut names)?;
                self.cursor.expect(TokenKind::RParen)?;
                Some(pat)
            } else {
                None
            };
            let body = self.parse_block()?;
            self.binder.pop_scope(&mut self.arena)?;
            Some(self.push(
                NodeKind::Catch { param, body },
                Span::new(catch_start, self.cursor.prev_end()),
            ))
        } else {
            None
        };

        let finalizer = if self.cursor.eat(TokenKind::Finally)? {
            Some(self.parse_block()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.err(
                ErrorCode::E1001,
                self.cursor.span(),
                "expected 'catch' or 'finally' after try block",
            ));
        }
        Ok(self.push(
            NodeKind::Try {
                block,
                handler,
                finalizer,
            },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    fn parse_throw(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        self.cursor.bump()?;
        if self.cursor.newline_before() {
            return Err(self.err(
                ErrorCode::E1017,
                self.cursor.span(),
                "newline is not allowed between 'throw' and its expression",
            ));
        }
        let arg = self.parse_expr()?;
        self.semicolon()?;
        Ok(self.push(
            NodeKind::Throw { arg },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    fn parse_return(&mut self) -> PResult<NodeId> {
        let span = self.cursor.span();
        if !self.ctx.in_function {
            return Err(self.err(
                ErrorCode::E1008,
                span,
                "'return' outside of a function",
            ));
        }
        self.cursor.bump()?;
        let arg = if self.cursor.newline_before()
            || matches!(
                self.cursor.kind(),
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
            ) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.semicolon()?;
        Ok(self.push(
            NodeKind::Return { arg },
            Span::new(span.start, self.cursor.prev_end()),
        ))
    }

    fn parse_break_continue(&mut self, is_continue: bool) -> PResult<NodeId> {
        let span = self.cursor.span();
        self.cursor.bump()?;

        let label = if !self.cursor.newline_before() {
            match self.ident_like_name() {
                Some(name) => {
                    self.cursor.bump()?;
                    Some(name)
                }
                None => None,
            }
        } else {
            None
        };

        match label {
            Some(name) => {
                let entry = self.labels.iter().rev().find(|l| l.name == name);
                match entry {
                    None => {
                        return Err(self.err(
                            ErrorCode::E1009,
                            span,
                            format!("undefined label '{}'", self.interner.lookup(name)),
                        ))
                    }
                    Some(l) if is_continue && !l.is_loop => {
                        return Err(self.err(
                            ErrorCode::E1009,
                            span,
                            format!(
                                "cannot continue to non-loop label '{}'",
                                self.interner.lookup(name)
                            ),
                        ))
                    }
                    Some(_) => {}
                }
            }
            None => {
                let valid = if is_continue {
                    self.ctx.in_loop
                } else {
                    self.ctx.in_loop || self.ctx.in_switch
                };
                if !valid {
                    return Err(self.err(
                        ErrorCode::E1009,
                        span,
                        if is_continue {
                            "'continue' outside of a loop"
                        } else {
                            "'break' outside of a loop or switch"
                        },
                    ));
                }
            }
        }

        self.semicolon()?;
        let stmt_span = Span::new(span.start, self.cursor.prev_end());
        Ok(if is_continue {
            self.push(NodeKind::Continue { label }, stmt_span)
        } else {
            self.push(NodeKind::Break { label }, stmt_span)
        })
    }

    fn parse_with(&mut self) -> PResult<NodeId> {
        let span = self.cursor.span();
        if self.strict {
            return Err(self.err(
                ErrorCode::E1013,
                span,
                "'with' statements are not allowed in strict mode",
            ));
        }
        self.cursor.bump()?;
        self.cursor.expect(TokenKind::LParen)?;
        let obj = self.parse_expr()?;
        self.cursor.expect(TokenKind::RParen)?;
        self.binder.push_scope(ScopeKind::With, self.current_func);
        let body = self.parse_statement()?;
        self.binder.pop_scope(&mut self.arena)?;
        Ok(self.push(
            NodeKind::With { obj, body },
            Span::new(span.start, self.cursor.prev_end()),
        ))
    }

    /// Expression statement, or a labeled statement if the expression
    /// turns out to be a lone identifier followed by `:`.
    fn parse_expr_stmt(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        let expr = self.parse_expr()?;

        if self.cursor.at(TokenKind::Colon) {
            if let NodeKind::Ident { name, .. } = self.arena.get(expr).kind {
                return self.parse_labeled(expr, name, start);
            }
        }

        if let Some(span) = self.cover_init.take() {
            return Err(self.err(
                ErrorCode::E1006,
                span,
                "shorthand property initializer is only valid in a destructuring pattern",
            ));
        }
        self.semicolon()?;
        Ok(self.push(
            NodeKind::ExprStmt { expr },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    fn parse_labeled(&mut self, ident: NodeId, name: Name, start: u32) -> PResult<NodeId> {
        // The identifier was a label, not a reference.
        self.binder.retract_ref(name, ident);
        self.cursor.bump()?;

        if self.labels.iter().any(|l| l.name == name) {
            return Err(self.err(
                ErrorCode::E1010,
                self.arena.get(ident).span,
                format!("duplicate label '{}'", self.interner.lookup(name)),
            ));
        }
        self.labels.push(LabelEntry {
            name,
            is_loop: false,
            depth: self.stmt_depth,
        });
        let body = self.parse_statement();
        self.labels.pop();
        let body = body?;
        Ok(self.push(
            NodeKind::Labeled { label: name, body },
            Span::new(start, self.cursor.prev_end()),
        ))
    }
}
