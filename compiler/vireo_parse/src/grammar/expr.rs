//! Expression grammar.
//!
//! Precedence climbing over one operator table for the binary and logical
//! tiers, recursive descent everywhere else. Parenthesized heads are parsed
//! with the cover grammar: items are collected as expressions and converted
//! to arrow parameters only when `=>` follows, so no backtracking is needed
//! for the common case.

use smallvec::SmallVec;
use vireo_diagnostic::ErrorCode;
use vireo_ir::symbol::SymbolId;
use vireo_ir::{
    AssignOp, BinaryOp, FunctionFlags, LogicalOp, Name, NodeId, NodeKind, NodeRange,
    PropertyKind, Span, TokenKind, UnaryOp, UpdateOp,
};

use super::Parser;
use crate::error::PResult;
use crate::options::FeatureFlags;
use crate::pattern::check_assign_target;

/// One infix operator: plain binary or short-circuiting.
#[derive(Copy, Clone)]
enum InfixOp {
    Bin(BinaryOp),
    Log(LogicalOp),
}

impl InfixOp {
    fn precedence(self) -> u8 {
        match self {
            InfixOp::Bin(op) => op.precedence(),
            InfixOp::Log(op) => op.precedence(),
        }
    }
}

fn assign_op_of(kind: TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Mod,
        TokenKind::StarStarEq => AssignOp::Exp,
        TokenKind::ShlEq => AssignOp::Shl,
        TokenKind::ShrEq => AssignOp::Shr,
        TokenKind::UShrEq => AssignOp::UShr,
        TokenKind::AmpEq => AssignOp::BitAnd,
        TokenKind::PipeEq => AssignOp::BitOr,
        TokenKind::CaretEq => AssignOp::BitXor,
        TokenKind::AmpAmpEq => AssignOp::And,
        TokenKind::PipePipeEq => AssignOp::Or,
        TokenKind::QuestionQuestionEq => AssignOp::Nullish,
        _ => return None,
    })
}

impl<'a> Parser<'a> {
    /// Expression including the comma operator.
    pub(crate) fn parse_expr(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        let first = self.parse_assign()?;
        if !self.cursor.at(TokenKind::Comma) {
            return Ok(first);
        }
        let mut exprs: SmallVec<[NodeId; 4]> = SmallVec::new();
        exprs.push(first);
        while self.cursor.eat(TokenKind::Comma)? {
            exprs.push(self.parse_assign()?);
        }
        let range = self.arena.push_list(&exprs);
        Ok(self.push(
            NodeKind::Sequence { exprs: range },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    /// AssignmentExpression.
    pub(crate) fn parse_assign(&mut self) -> PResult<NodeId> {
        if self.cursor.at(TokenKind::Yield) && self.ctx.allow_yield {
            return self.parse_yield();
        }

        let outer_cover = self.cover_init.take();
        let start = self.cursor.span().start;
        let left = self.parse_cond()?;

        // Single-identifier arrow: `x => body`.
        if self.cursor.at(TokenKind::Arrow) && !self.cursor.newline_before() {
            if let NodeKind::Ident { name, .. } = self.arena.get(left).kind {
                self.cover_init = outer_cover;
                return self.parse_arrow_from_ident(left, name, start);
            }
        }

        if let Some(op) = assign_op_of(self.cursor.kind()) {
            check_assign_target(&mut self.arena, left, op.is_compound())?;
            if op == AssignOp::Assign {
                // Pattern conversion claims any pending cover initializer.
                self.cover_init = outer_cover;
            } else {
                self.cover_init = self.cover_init.or(outer_cover);
            }
            self.mark_assigned(left);
            self.cursor.bump()?;
            let value = self.parse_assign()?;
            return Ok(self.push(
                NodeKind::Assign {
                    op,
                    target: left,
                    value,
                },
                Span::new(start, self.cursor.prev_end()),
            ));
        }

        self.cover_init = self.cover_init.or(outer_cover);
        Ok(left)
    }

    /// Flip the most recent reference to `target` to a write, for the
    /// binder's `ASSIGNED` analysis.
    fn mark_assigned(&mut self, target: NodeId) {
        if let NodeKind::Ident { name, .. } = self.arena.get(target).kind {
            let offset = self.arena.get(target).span.start;
            self.binder.retract_ref(name, target);
            self.binder.record_ref(name, target, offset, true);
        }
    }

    fn parse_yield(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        self.cursor.bump()?;
        let delegate = !self.cursor.newline_before() && self.cursor.eat(TokenKind::Star)?;
        let arg = if delegate {
            Some(self.parse_assign()?)
        } else if self.expression_ahead() {
            Some(self.parse_assign()?)
        } else {
            None
        };
        Ok(self.push(
            NodeKind::Yield { arg, delegate },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    /// True when the current token can begin an expression on this line.
    fn expression_ahead(&self) -> bool {
        if self.cursor.newline_before() {
            return false;
        }
        !matches!(
            self.cursor.kind(),
            TokenKind::Eof
                | TokenKind::Semicolon
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::Comma
                | TokenKind::Colon
        )
    }

    fn parse_cond(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        let test = self.parse_binary(0)?;
        if !self.cursor.eat(TokenKind::Question)? {
            return Ok(test);
        }
        let saved_no_in = std::mem::replace(&mut self.ctx.no_in, false);
        let cons = self.parse_assign()?;
        self.ctx.no_in = saved_no_in;
        self.cursor.expect(TokenKind::Colon)?;
        let alt = self.parse_assign()?;
        Ok(self.push(
            NodeKind::Cond { test, cons, alt },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    fn infix_op(&self) -> Option<InfixOp> {
        use TokenKind::*;
        Some(match self.cursor.kind() {
            PipePipe => InfixOp::Log(LogicalOp::Or),
            AmpAmp => InfixOp::Log(LogicalOp::And),
            QuestionQuestion => InfixOp::Log(LogicalOp::Nullish),
            Pipe => InfixOp::Bin(BinaryOp::BitOr),
            Caret => InfixOp::Bin(BinaryOp::BitXor),
            Amp => InfixOp::Bin(BinaryOp::BitAnd),
            EqEq => InfixOp::Bin(BinaryOp::EqEq),
            NotEq => InfixOp::Bin(BinaryOp::NotEq),
            EqEqEq => InfixOp::Bin(BinaryOp::StrictEq),
            NotEqEq => InfixOp::Bin(BinaryOp::StrictNotEq),
            Lt => InfixOp::Bin(BinaryOp::Lt),
            LtEq => InfixOp::Bin(BinaryOp::LtEq),
            Gt => InfixOp::Bin(BinaryOp::Gt),
            GtEq => InfixOp::Bin(BinaryOp::GtEq),
            In if !self.ctx.no_in => InfixOp::Bin(BinaryOp::In),
            Instanceof => InfixOp::Bin(BinaryOp::Instanceof),
            Shl => InfixOp::Bin(BinaryOp::Shl),
            Shr => InfixOp::Bin(BinaryOp::Shr),
            UShr => InfixOp::Bin(BinaryOp::UShr),
            Plus => InfixOp::Bin(BinaryOp::Add),
            Minus => InfixOp::Bin(BinaryOp::Sub),
            Star => InfixOp::Bin(BinaryOp::Mul),
            Slash => InfixOp::Bin(BinaryOp::Div),
            Percent => InfixOp::Bin(BinaryOp::Mod),
            StarStar => InfixOp::Bin(BinaryOp::Exp),
            _ => return None,
        })
    }

    /// Precedence climbing over the binary and logical tiers.
    fn parse_binary(&mut self, min_prec: u8) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        let mut left = self.parse_unary()?;
        loop {
            let Some(op) = self.infix_op() else { break };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            match op {
                InfixOp::Bin(BinaryOp::Exp) => {
                    self.require_feature(FeatureFlags::EXPONENTIATION, "exponentiation")?;
                    // `-a ** b` is a syntax error; the operand needs parens.
                    if matches!(
                        self.arena.get(left).kind,
                        NodeKind::Unary { .. } | NodeKind::Await { .. }
                    ) {
                        return Err(self.err(
                            ErrorCode::E1001,
                            self.cursor.span(),
                            "unary operand of '**' must be parenthesized",
                        ));
                    }
                }
                InfixOp::Log(LogicalOp::Nullish) => {
                    if matches!(
                        self.arena.get(left).kind,
                        NodeKind::Logical {
                            op: LogicalOp::And | LogicalOp::Or,
                            ..
                        }
                    ) {
                        return Err(self.err(
                            ErrorCode::E1001,
                            self.cursor.span(),
                            "cannot mix '??' with '&&' or '||' without parentheses",
                        ));
                    }
                }
                InfixOp::Log(LogicalOp::And | LogicalOp::Or) => {
                    if matches!(
                        self.arena.get(left).kind,
                        NodeKind::Logical {
                            op: LogicalOp::Nullish,
                            ..
                        }
                    ) {
                        return Err(self.err(
                            ErrorCode::E1001,
                            self.cursor.span(),
                            "cannot mix '??' with '&&' or '||' without parentheses",
                        ));
                    }
                }
                InfixOp::Bin(_) => {}
            }
            self.cursor.bump()?;
            let right_assoc = matches!(op, InfixOp::Bin(b) if b.right_assoc());
            let next_min = if right_assoc { prec } else { prec + 1 };
            let right = self.parse_binary(next_min)?;
            let span = Span::new(start, self.cursor.prev_end());
            left = match op {
                InfixOp::Bin(op) => self.push(NodeKind::Binary { op, left, right }, span),
                InfixOp::Log(op) => self.push(NodeKind::Logical { op, left, right }, span),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        let op = match self.cursor.kind() {
            TokenKind::Delete => Some(UnaryOp::Delete),
            TokenKind::Void => Some(UnaryOp::Void),
            TokenKind::Typeof => Some(UnaryOp::Typeof),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.cursor.bump()?;
            let expr = self.parse_unary()?;
            if op == UnaryOp::Delete
                && self.strict
                && matches!(self.arena.get(expr).kind, NodeKind::Ident { .. })
            {
                return Err(self.err(
                    ErrorCode::E1013,
                    self.arena.get(expr).span,
                    "cannot delete a variable in strict mode",
                ));
            }
            return Ok(self.push(
                NodeKind::Unary { op, expr },
                Span::new(start, self.cursor.prev_end()),
            ));
        }

        match self.cursor.kind() {
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = if self.cursor.at(TokenKind::PlusPlus) {
                    UpdateOp::Inc
                } else {
                    UpdateOp::Dec
                };
                self.cursor.bump()?;
                let expr = self.parse_unary()?;
                self.check_update_target(expr)?;
                Ok(self.push(
                    NodeKind::Update {
                        op,
                        prefix: true,
                        expr,
                    },
                    Span::new(start, self.cursor.prev_end()),
                ))
            }
            TokenKind::Await if self.ctx.allow_await => {
                self.require_feature(FeatureFlags::ASYNC_AWAIT, "async/await")?;
                self.cursor.bump()?;
                let arg = self.parse_unary()?;
                Ok(self.push(
                    NodeKind::Await { arg },
                    Span::new(start, self.cursor.prev_end()),
                ))
            }
            _ => self.parse_postfix(),
        }
    }

    fn check_update_target(&self, expr: NodeId) -> PResult<()> {
        let mut node = expr;
        loop {
            match &self.arena.get(node).kind {
                NodeKind::Ident { .. } | NodeKind::Member { .. } => return Ok(()),
                NodeKind::Paren { expr } => node = *expr,
                _ => {
                    return Err(self.err(
                        ErrorCode::E1005,
                        self.arena.get(expr).span,
                        "invalid increment/decrement target",
                    ))
                }
            }
        }
    }

    fn parse_postfix(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        let expr = self.parse_lhs_expr()?;
        if (self.cursor.at(TokenKind::PlusPlus) || self.cursor.at(TokenKind::MinusMinus))
            && !self.cursor.newline_before()
        {
            let op = if self.cursor.at(TokenKind::PlusPlus) {
                UpdateOp::Inc
            } else {
                UpdateOp::Dec
            };
            self.check_update_target(expr)?;
            self.cursor.bump()?;
            return Ok(self.push(
                NodeKind::Update {
                    op,
                    prefix: false,
                    expr,
                },
                Span::new(start, self.cursor.prev_end()),
            ));
        }
        Ok(expr)
    }

    /// LeftHandSideExpression: `new` forms plus the call/member chain.
    pub(crate) fn parse_lhs_expr(&mut self) -> PResult<NodeId> {
        let base = if self.cursor.at(TokenKind::New) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        self.parse_call_member_chain(base, true)
    }

    fn parse_new(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        self.cursor.bump()?;

        if self.cursor.eat(TokenKind::Dot)? {
            let meta_span = self.cursor.span();
            if !self.cursor.eat(TokenKind::Target)? {
                return Err(self.err(
                    ErrorCode::E1019,
                    meta_span,
                    "expected 'target' after 'new.'",
                ));
            }
            if !self.ctx.in_function {
                return Err(self.err(
                    ErrorCode::E1019,
                    Span::new(start, meta_span.end),
                    "'new.target' is only allowed inside a function",
                ));
            }
            return Ok(self.push(NodeKind::NewTarget, Span::new(start, meta_span.end)));
        }

        let callee = if self.cursor.at(TokenKind::New) {
            self.parse_new()?
        } else {
            let primary = self.parse_primary()?;
            self.parse_call_member_chain(primary, false)?
        };
        let args = if self.cursor.at(TokenKind::LParen) {
            self.parse_arguments()?
        } else {
            NodeRange::EMPTY
        };
        Ok(self.push(
            NodeKind::New { callee, args },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    fn parse_call_member_chain(&mut self, mut expr: NodeId, allow_call: bool) -> PResult<NodeId> {
        let start = self.arena.get(expr).span.start;
        let mut optional_seen = false;
        loop {
            match self.cursor.kind() {
                TokenKind::Dot => {
                    self.cursor.bump()?;
                    let prop = self.parse_member_name()?;
                    expr = self.push(
                        NodeKind::Member {
                            obj: expr,
                            prop,
                            computed: false,
                            optional: false,
                        },
                        Span::new(start, self.cursor.prev_end()),
                    );
                }
                TokenKind::LBracket => {
                    self.cursor.bump()?;
                    let saved_no_in = std::mem::replace(&mut self.ctx.no_in, false);
                    let prop = self.parse_expr()?;
                    self.ctx.no_in = saved_no_in;
                    self.cursor.expect(TokenKind::RBracket)?;
                    expr = self.push(
                        NodeKind::Member {
                            obj: expr,
                            prop,
                            computed: true,
                            optional: false,
                        },
                        Span::new(start, self.cursor.prev_end()),
                    );
                }
                TokenKind::LParen if allow_call => {
                    let args = self.parse_arguments()?;
                    expr = self.push(
                        NodeKind::Call {
                            callee: expr,
                            args,
                            optional: false,
                        },
                        Span::new(start, self.cursor.prev_end()),
                    );
                }
                TokenKind::QuestionDot => {
                    self.require_feature(FeatureFlags::OPTIONAL_CHAINING, "optional chaining")?;
                    optional_seen = true;
                    self.cursor.bump()?;
                    expr = match self.cursor.kind() {
                        TokenKind::LParen => {
                            if !allow_call {
                                return Err(self.err(
                                    ErrorCode::E1012,
                                    self.cursor.span(),
                                    "optional call is not allowed here",
                                ));
                            }
                            let args = self.parse_arguments()?;
                            self.push(
                                NodeKind::Call {
                                    callee: expr,
                                    args,
                                    optional: true,
                                },
                                Span::new(start, self.cursor.prev_end()),
                            )
                        }
                        TokenKind::LBracket => {
                            self.cursor.bump()?;
                            let prop = self.parse_expr()?;
                            self.cursor.expect(TokenKind::RBracket)?;
                            self.push(
                                NodeKind::Member {
                                    obj: expr,
                                    prop,
                                    computed: true,
                                    optional: true,
                                },
                                Span::new(start, self.cursor.prev_end()),
                            )
                        }
                        _ => {
                            let prop = self.parse_member_name()?;
                            self.push(
                                NodeKind::Member {
                                    obj: expr,
                                    prop,
                                    computed: false,
                                    optional: true,
                                },
                                Span::new(start, self.cursor.prev_end()),
                            )
                        }
                    };
                }
                TokenKind::TemplateHead(_) | TokenKind::NoSubTemplate(_) => {
                    self.require_feature(FeatureFlags::TEMPLATES, "template literal")?;
                    if optional_seen {
                        return Err(self.err(
                            ErrorCode::E1012,
                            self.cursor.span(),
                            "tagged template is not allowed in an optional chain",
                        ));
                    }
                    let quasi = self.parse_template()?;
                    expr = self.push(
                        NodeKind::TaggedTemplate { tag: expr, quasi },
                        Span::new(start, self.cursor.prev_end()),
                    );
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Name after `.` or `?.`: any identifier-like token, any reserved
    /// word, or a private name.
    fn parse_member_name(&mut self) -> PResult<NodeId> {
        let span = self.cursor.span();
        if let TokenKind::PrivateName(name) = self.cursor.kind() {
            self.cursor.bump()?;
            return Ok(self.push(NodeKind::PrivateName(name), span));
        }
        let Some(name) = self.property_name_of_current() else {
            return Err(self.err(
                ErrorCode::E1004,
                span,
                format!("expected property name, found {}", self.cursor.kind()),
            ));
        };
        self.cursor.bump()?;
        // Member names are not variable references; no symbol, no chain.
        Ok(self.push(
            NodeKind::Ident {
                name,
                sym: SymbolId::INVALID,
            },
            span,
        ))
    }

    /// Interned text of the current token when it can serve as a property
    /// name (identifiers, contextual keywords, and reserved words alike).
    pub(crate) fn property_name_of_current(&self) -> Option<Name> {
        let kind = self.cursor.kind();
        if kind.is_ident_like()
            || kind.is_reserved_word()
            || matches!(kind, TokenKind::Yield | TokenKind::Await)
        {
            let text = &self.source[self.cursor.span().to_range()];
            Some(self.interner.intern(text))
        } else {
            None
        }
    }

    fn parse_arguments(&mut self) -> PResult<NodeRange> {
        self.cursor.expect(TokenKind::LParen)?;
        let saved_no_in = std::mem::replace(&mut self.ctx.no_in, false);
        let mut args: SmallVec<[NodeId; 4]> = SmallVec::new();
        while !self.cursor.at(TokenKind::RParen) {
            if self.cursor.at(TokenKind::DotDotDot) {
                self.require_feature(FeatureFlags::SPREAD_REST, "spread argument")?;
                let start = self.cursor.span().start;
                self.cursor.bump()?;
                let expr = self.parse_assign()?;
                args.push(self.push(
                    NodeKind::Spread { expr },
                    Span::new(start, self.cursor.prev_end()),
                ));
            } else {
                args.push(self.parse_assign()?);
            }
            if !self.cursor.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.ctx.no_in = saved_no_in;
        self.cursor.expect(TokenKind::RParen)?;
        Ok(self.arena.push_list(&args))
    }

    /// Identifier expression node: records a reference and feeds the
    /// `eval`/`arguments` function flags.
    pub(crate) fn ident_expr(&mut self, name: Name, span: Span) -> NodeId {
        let node = self.push(
            NodeKind::Ident {
                name,
                sym: SymbolId::INVALID,
            },
            span,
        );
        self.record_ident_ref(name, node, span);
        if self.current_func.is_valid() {
            if name == self.names.eval {
                self.arena.function_mut(self.current_func).flags |= FunctionFlags::CALLS_EVAL;
            } else if name == self.names.arguments {
                self.arena.function_mut(self.current_func).flags |= FunctionFlags::USES_ARGUMENTS;
            }
        }
        node
    }

    fn parse_primary(&mut self) -> PResult<NodeId> {
        let span = self.cursor.span();
        match self.cursor.kind() {
            TokenKind::Number(bits) => {
                self.cursor.bump()?;
                Ok(self.push(NodeKind::Number(bits), span))
            }
            TokenKind::BigInt(digits) => {
                self.cursor.bump()?;
                Ok(self.push(NodeKind::BigInt(digits), span))
            }
            TokenKind::Str(value) => {
                self.cursor.bump()?;
                Ok(self.push(NodeKind::Str(value), span))
            }
            TokenKind::True => {
                self.cursor.bump()?;
                Ok(self.push(NodeKind::Bool(true), span))
            }
            TokenKind::False => {
                self.cursor.bump()?;
                Ok(self.push(NodeKind::Bool(false), span))
            }
            TokenKind::Null => {
                self.cursor.bump()?;
                Ok(self.push(NodeKind::Null, span))
            }
            TokenKind::Regex { pattern, flags } => {
                self.cursor.bump()?;
                Ok(self.push(NodeKind::Regex { pattern, flags }, span))
            }
            TokenKind::This => {
                self.cursor.bump()?;
                Ok(self.push(NodeKind::This, span))
            }
            TokenKind::Super => {
                if !self.ctx.in_function {
                    return Err(self.err(
                        ErrorCode::E1001,
                        span,
                        "'super' is only allowed inside a method",
                    ));
                }
                self.cursor.bump()?;
                Ok(self.push(NodeKind::SuperBase, span))
            }
            TokenKind::PrivateName(name) => {
                // Only valid as `#field in obj`; the binary tier takes over.
                self.cursor.bump()?;
                Ok(self.push(NodeKind::PrivateName(name), span))
            }
            TokenKind::TemplateHead(_) | TokenKind::NoSubTemplate(_) => {
                self.require_feature(FeatureFlags::TEMPLATES, "template literal")?;
                self.parse_template()
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_object_literal(),
            TokenKind::LParen => self.parse_paren_or_arrow(),
            TokenKind::Function => self.parse_function_expr(FunctionFlags::empty(), span.start),
            TokenKind::Class => {
                self.require_feature(FeatureFlags::CLASSES, "class")?;
                self.parse_class_expr()
            }
            TokenKind::Async => self.parse_async_prefixed(),
            TokenKind::Import => {
                self.cursor.bump()?;
                let dot = self.cursor.span();
                if !self.cursor.eat(TokenKind::Dot)? || !self.cursor.eat(TokenKind::Meta)? {
                    return Err(self.err(
                        ErrorCode::E1019,
                        Span::new(span.start, dot.end),
                        "expected 'import.meta'",
                    ));
                }
                if !self.options.module {
                    return Err(self.err(
                        ErrorCode::E1019,
                        Span::new(span.start, self.cursor.prev_end()),
                        "'import.meta' is only allowed in modules",
                    ));
                }
                Ok(self.push(
                    NodeKind::ImportMeta,
                    Span::new(span.start, self.cursor.prev_end()),
                ))
            }
            _ => match self.ident_like_name() {
                Some(name) => {
                    self.cursor.bump()?;
                    Ok(self.ident_expr(name, span))
                }
                None => Err(self.err(
                    ErrorCode::E1002,
                    span,
                    format!("expected expression, found {}", self.cursor.kind()),
                )),
            },
        }
    }

    /// `async` in expression position: async function expression, async
    /// arrow, or plain identifier.
    fn parse_async_prefixed(&mut self) -> PResult<NodeId> {
        let span = self.cursor.span();
        let async_name = self
            .cursor
            .kind()
            .ident_name(self.interner)
            .unwrap_or_else(|| panic!("async token has a name"));
        self.cursor.bump()?;

        if self.cursor.at(TokenKind::Function) && !self.cursor.newline_before() {
            self.require_feature(FeatureFlags::ASYNC_AWAIT, "async function")?;
            return self.parse_function_expr(FunctionFlags::ASYNC, span.start);
        }
        if self.cursor.at(TokenKind::LParen) && !self.cursor.newline_before() {
            self.require_feature(FeatureFlags::ASYNC_AWAIT, "async arrow")?;
            return self.parse_paren_cover(span.start, FunctionFlags::ASYNC, Some(async_name));
        }
        if !self.cursor.newline_before() {
            if let Some(param) = self.ident_like_name() {
                let param_span = self.cursor.span();
                // `async x => ...`; anything else after the identifier is
                // a syntax error anyway, caught by the arrow check.
                self.require_feature(FeatureFlags::ASYNC_AWAIT, "async arrow")?;
                self.cursor.bump()?;
                let ident = self.ident_expr(param, param_span);
                if !self.cursor.at(TokenKind::Arrow) || self.cursor.newline_before() {
                    return Err(self.err(
                        ErrorCode::E1001,
                        self.cursor.span(),
                        "expected '=>' after async arrow parameter",
                    ));
                }
                return self.parse_arrow_from_ident_flags(
                    ident,
                    param,
                    span.start,
                    FunctionFlags::ASYNC,
                );
            }
        }
        Ok(self.ident_expr(async_name, span))
    }

    fn parse_paren_or_arrow(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        self.parse_paren_cover(start, FunctionFlags::empty(), None)
    }

    /// Parse `( ... )` as the cover grammar shared by parenthesized
    /// expressions, arrow parameter lists, and `async(...)` calls.
    ///
    /// `async_callee` is the interned `async` name when the cover followed
    /// an `async` token; if no `=>` follows, the items become a call.
    fn parse_paren_cover(
        &mut self,
        start: u32,
        flags: FunctionFlags,
        async_callee: Option<Name>,
    ) -> PResult<NodeId> {
        self.cursor.expect(TokenKind::LParen)?;
        let saved_no_in = std::mem::replace(&mut self.ctx.no_in, false);

        let mut items: SmallVec<[NodeId; 4]> = SmallVec::new();
        let mut arrow_required = false;
        let mut trailing_comma = false;
        while !self.cursor.at(TokenKind::RParen) {
            if self.cursor.at(TokenKind::DotDotDot) {
                self.require_feature(FeatureFlags::SPREAD_REST, "rest parameter")?;
                let rest_start = self.cursor.span().start;
                self.cursor.bump()?;
                let expr = self.parse_assign()?;
                items.push(self.push(
                    NodeKind::Spread { expr },
                    Span::new(rest_start, self.cursor.prev_end()),
                ));
                if async_callee.is_none() {
                    // Rest is meaningless in a plain parenthesized
                    // expression; only an arrow can follow.
                    arrow_required = true;
                }
            } else {
                items.push(self.parse_assign()?);
            }
            if !self.cursor.eat(TokenKind::Comma)? {
                break;
            }
            if self.cursor.at(TokenKind::RParen) {
                trailing_comma = true;
                arrow_required = async_callee.is_none();
                break;
            }
        }
        self.ctx.no_in = saved_no_in;
        self.cursor.expect(TokenKind::RParen)?;

        if self.cursor.at(TokenKind::Arrow) && !self.cursor.newline_before() {
            return self.parse_arrow_function(items, start, flags);
        }

        if let Some(name) = async_callee {
            // `async(...)` was a call all along.
            let callee = self.ident_expr(name, Span::new(start, start + 5));
            let args = self.arena.push_list(&items);
            return Ok(self.push(
                NodeKind::Call {
                    callee,
                    args,
                    optional: false,
                },
                Span::new(start, self.cursor.prev_end()),
            ));
        }

        if arrow_required || trailing_comma {
            return Err(self.err(
                ErrorCode::E1002,
                self.cursor.span(),
                "expected '=>' after arrow parameter list",
            ));
        }
        if items.is_empty() {
            return Err(self.err(
                ErrorCode::E1002,
                self.cursor.span(),
                "expected expression inside parentheses",
            ));
        }

        let span = Span::new(start, self.cursor.prev_end());
        let expr = if items.len() == 1 {
            items[0]
        } else {
            let range = self.arena.push_list(&items);
            self.push(NodeKind::Sequence { exprs: range }, span)
        };
        Ok(self.push(NodeKind::Paren { expr }, span))
    }

    fn parse_array_literal(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        self.cursor.bump()?;
        let saved_no_in = std::mem::replace(&mut self.ctx.no_in, false);

        let mut elems: SmallVec<[NodeId; 8]> = SmallVec::new();
        loop {
            if self.cursor.at(TokenKind::RBracket) {
                break;
            }
            if self.cursor.at(TokenKind::Comma) {
                let hole = self.cursor.span();
                self.cursor.bump()?;
                elems.push(self.push(NodeKind::Elision, Span::point(hole.start)));
                continue;
            }
            if self.cursor.at(TokenKind::DotDotDot) {
                self.require_feature(FeatureFlags::SPREAD_REST, "spread element")?;
                let spread_start = self.cursor.span().start;
                self.cursor.bump()?;
                let expr = self.parse_assign()?;
                elems.push(self.push(
                    NodeKind::Spread { expr },
                    Span::new(spread_start, self.cursor.prev_end()),
                ));
            } else {
                elems.push(self.parse_assign()?);
            }
            if !self.cursor.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.ctx.no_in = saved_no_in;
        self.cursor.expect(TokenKind::RBracket)?;
        let range = self.arena.push_list(&elems);
        Ok(self.push(
            NodeKind::Array { elems: range },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    fn parse_object_literal(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        self.cursor.bump()?;
        let saved_no_in = std::mem::replace(&mut self.ctx.no_in, false);

        let mut props: SmallVec<[NodeId; 8]> = SmallVec::new();
        while !self.cursor.at(TokenKind::RBrace) {
            if self.cursor.at(TokenKind::DotDotDot) {
                self.require_feature(FeatureFlags::SPREAD_REST, "spread property")?;
                let spread_start = self.cursor.span().start;
                self.cursor.bump()?;
                let expr = self.parse_assign()?;
                props.push(self.push(
                    NodeKind::Spread { expr },
                    Span::new(spread_start, self.cursor.prev_end()),
                ));
            } else {
                props.push(self.parse_property()?);
            }
            if !self.cursor.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.ctx.no_in = saved_no_in;
        self.cursor.expect(TokenKind::RBrace)?;
        let range = self.arena.push_list(&props);
        Ok(self.push(
            NodeKind::Object { props: range },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    fn parse_property(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;

        // `get`/`set` are accessors only when a property key follows.
        let accessor = match self.cursor.kind() {
            TokenKind::Get if self.key_follows() => Some(PropertyKind::Get),
            TokenKind::Set if self.key_follows() => Some(PropertyKind::Set),
            _ => None,
        };
        if let Some(kind) = accessor {
            self.cursor.bump()?;
            let (key, computed) = self.parse_property_key()?;
            let flags = if kind == PropertyKind::Get {
                FunctionFlags::METHOD | FunctionFlags::GETTER
            } else {
                FunctionFlags::METHOD | FunctionFlags::SETTER
            };
            let value = self.parse_method_tail(flags, start)?;
            return Ok(self.push(
                NodeKind::Property {
                    key,
                    value,
                    kind,
                    computed,
                    shorthand: false,
                },
                Span::new(start, self.cursor.prev_end()),
            ));
        }

        let mut flags = FunctionFlags::METHOD;
        if self.cursor.at(TokenKind::Async) && !self.async_is_key() {
            self.require_feature(FeatureFlags::ASYNC_AWAIT, "async method")?;
            self.cursor.bump()?;
            flags |= FunctionFlags::ASYNC;
        }
        if self.cursor.at(TokenKind::Star) {
            self.require_feature(FeatureFlags::GENERATORS, "generator method")?;
            self.cursor.bump()?;
            flags |= FunctionFlags::GENERATOR;
        }

        let key_span = self.cursor.span();
        let key_name = self.property_name_of_current();
        let (key, computed) = self.parse_property_key()?;

        if self.cursor.at(TokenKind::LParen)
            || flags.intersects(FunctionFlags::ASYNC | FunctionFlags::GENERATOR)
        {
            let value = self.parse_method_tail(flags, start)?;
            return Ok(self.push(
                NodeKind::Property {
                    key,
                    value,
                    kind: PropertyKind::Init,
                    computed,
                    shorthand: false,
                },
                Span::new(start, self.cursor.prev_end()),
            ));
        }

        if self.cursor.eat(TokenKind::Colon)? {
            let value = self.parse_assign()?;
            return Ok(self.push(
                NodeKind::Property {
                    key,
                    value,
                    kind: PropertyKind::Init,
                    computed,
                    shorthand: false,
                },
                Span::new(start, self.cursor.prev_end()),
            ));
        }

        // Shorthand: the key doubles as a reference.
        let Some(name) = key_name else {
            return Err(self.err(
                ErrorCode::E1001,
                self.cursor.span(),
                "expected ':' after property key",
            ));
        };
        if computed {
            return Err(self.err(
                ErrorCode::E1001,
                self.cursor.span(),
                "expected ':' after computed property key",
            ));
        }
        let value = self.ident_expr(name, key_span);
        let value = if self.cursor.at(TokenKind::Eq) {
            // Cover grammar: `{a = 1}` is only valid if the object later
            // converts to a pattern.
            let eq_span = self.cursor.span();
            if self.cover_init.is_none() {
                self.cover_init = Some(eq_span);
            }
            self.cursor.bump()?;
            let default = self.parse_assign()?;
            self.push(
                NodeKind::AssignPattern {
                    target: value,
                    default,
                },
                Span::new(key_span.start, self.cursor.prev_end()),
            )
        } else {
            value
        };
        Ok(self.push(
            NodeKind::Property {
                key,
                value,
                kind: PropertyKind::Init,
                computed: false,
                shorthand: true,
            },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    /// Does a property key follow the current token? Decides whether
    /// `get`/`set`/`async` are prefixes or keys themselves.
    pub(crate) fn key_follows(&mut self) -> bool {
        // One token of lookahead: snapshot, peek, restore.
        let snap = self.cursor.snapshot();
        if self.cursor.bump().is_err() {
            self.cursor.restore(snap);
            return false;
        }
        let follows = self.property_name_of_current().is_some()
            || matches!(
                self.cursor.kind(),
                TokenKind::Str(_)
                    | TokenKind::Number(_)
                    | TokenKind::LBracket
                    | TokenKind::Star
                    | TokenKind::PrivateName(_)
            );
        self.cursor.restore(snap);
        follows
    }

    /// `async` followed by `(`, `:`, `,`, `}` or `=` is a key, not a prefix.
    pub(crate) fn async_is_key(&mut self) -> bool {
        let snap = self.cursor.snapshot();
        if self.cursor.bump().is_err() {
            self.cursor.restore(snap);
            return true;
        }
        let is_key = matches!(
            self.cursor.kind(),
            TokenKind::LParen
                | TokenKind::Colon
                | TokenKind::Comma
                | TokenKind::RBrace
                | TokenKind::Eq
        ) || self.cursor.newline_before();
        self.cursor.restore(snap);
        is_key
    }

    /// PropertyName: literal, identifier-ish, or computed `[expr]`.
    pub(crate) fn parse_property_key(&mut self) -> PResult<(NodeId, bool)> {
        let span = self.cursor.span();
        match self.cursor.kind() {
            TokenKind::LBracket => {
                self.cursor.bump()?;
                let key = self.parse_assign()?;
                self.cursor.expect(TokenKind::RBracket)?;
                Ok((key, true))
            }
            TokenKind::Str(value) => {
                self.cursor.bump()?;
                Ok((self.push(NodeKind::Str(value), span), false))
            }
            TokenKind::Number(bits) => {
                self.cursor.bump()?;
                Ok((self.push(NodeKind::Number(bits), span), false))
            }
            TokenKind::BigInt(digits) => {
                self.cursor.bump()?;
                Ok((self.push(NodeKind::BigInt(digits), span), false))
            }
            TokenKind::PrivateName(name) => {
                self.cursor.bump()?;
                Ok((self.push(NodeKind::PrivateName(name), span), false))
            }
            _ => match self.property_name_of_current() {
                Some(name) => {
                    self.cursor.bump()?;
                    let node = self.push(
                        NodeKind::Ident {
                            name,
                            sym: SymbolId::INVALID,
                        },
                        span,
                    );
                    Ok((node, false))
                }
                None => Err(self.err(
                    ErrorCode::E1004,
                    span,
                    format!("expected property name, found {}", self.cursor.kind()),
                )),
            },
        }
    }

    /// Template literal. The current token is the head (or a no-sub
    /// template); chunks alternate with substitution expressions.
    pub(crate) fn parse_template(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        let mut chunks: SmallVec<[NodeId; 4]> = SmallVec::new();
        let mut exprs: SmallVec<[NodeId; 4]> = SmallVec::new();

        match self.cursor.kind() {
            TokenKind::NoSubTemplate(cooked) => {
                let span = self.cursor.span();
                let raw = self.template_raw(span, 1, 1);
                self.cursor.bump()?;
                chunks.push(self.push(NodeKind::TemplateChunk { cooked, raw }, span));
            }
            TokenKind::TemplateHead(cooked) => {
                let span = self.cursor.span();
                let raw = self.template_raw(span, 1, 2);
                self.cursor.bump()?;
                chunks.push(self.push(NodeKind::TemplateChunk { cooked, raw }, span));
                loop {
                    let saved_no_in = std::mem::replace(&mut self.ctx.no_in, false);
                    exprs.push(self.parse_expr()?);
                    self.ctx.no_in = saved_no_in;
                    if !self.cursor.at(TokenKind::RBrace) {
                        return Err(self.err(
                            ErrorCode::E1003,
                            self.cursor.span(),
                            "expected '}' to close template substitution",
                        ));
                    }
                    self.cursor.rescan_template()?;
                    let span = self.cursor.span();
                    match self.cursor.kind() {
                        TokenKind::TemplateMiddle(cooked) => {
                            let raw = self.template_raw(span, 1, 2);
                            self.cursor.bump()?;
                            chunks.push(self.push(NodeKind::TemplateChunk { cooked, raw }, span));
                        }
                        TokenKind::TemplateTail(cooked) => {
                            let raw = self.template_raw(span, 1, 1);
                            self.cursor.bump()?;
                            chunks.push(self.push(NodeKind::TemplateChunk { cooked, raw }, span));
                            break;
                        }
                        _ => return Err(self.unexpected()),
                    }
                }
            }
            _ => return Err(self.unexpected()),
        }

        let chunks = self.arena.push_list(&chunks);
        let exprs = self.arena.push_list(&exprs);
        Ok(self.push(
            NodeKind::Template { chunks, exprs },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    /// Raw chunk text, with the chunk delimiters stripped.
    fn template_raw(&self, span: Span, open: u32, close: u32) -> Name {
        let start = (span.start + open) as usize;
        let end = (span.end - close) as usize;
        self.interner.intern(&self.source[start..end])
    }

    /// Arrow from a bare identifier parameter: `x => body`.
    fn parse_arrow_from_ident(
        &mut self,
        ident: NodeId,
        name: Name,
        start: u32,
    ) -> PResult<NodeId> {
        self.parse_arrow_from_ident_flags(ident, name, start, FunctionFlags::empty())
    }

    fn parse_arrow_from_ident_flags(
        &mut self,
        ident: NodeId,
        name: Name,
        start: u32,
        flags: FunctionFlags,
    ) -> PResult<NodeId> {
        self.binder.retract_ref(name, ident);
        let items: SmallVec<[NodeId; 4]> = [ident].into_iter().collect();
        self.parse_arrow_function(items, start, flags)
    }
}
