//! Function forms: declarations, expressions, arrows, and methods.
//!
//! All forms funnel through one header/params/body sequence. The body step
//! is where deferral happens: eligible block bodies are skimmed by the fast
//! scanner and recorded as stubs (or handed to background workers) instead
//! of being parsed into nodes.

use smallvec::SmallVec;
use tracing::debug;
use vireo_diagnostic::ErrorCode;
use vireo_ir::symbol::{SymbolId, SymbolKind};
use vireo_ir::{
    DeferredStub, FuncId, FunctionData, FunctionFlags, Name, NodeId, NodeKind, NodeRange,
    ParseState, Span, TokenKind,
};

use super::{Context, LabelEntry, Parser};
use crate::background::WorkItem;
use crate::defer::{decide, DeferInputs, Deferral};
use crate::error::PResult;
use crate::fastscan::fast_scan_body;
use crate::options::FeatureFlags;
use crate::pattern::{to_pattern, PatternMode};

/// Parser state saved across a nested function's parse.
struct FuncSave {
    ctx: Context,
    current_func: FuncId,
    strict: bool,
    labels: Vec<LabelEntry>,
    cover_init: Option<Span>,
}

type ParamNames = SmallVec<[(Name, Span); 4]>;

impl<'a> Parser<'a> {
    /// `function` expression, cursor at the `function` keyword (any `async`
    /// prefix already consumed into `flags`).
    pub(crate) fn parse_function_expr(
        &mut self,
        flags: FunctionFlags,
        start: u32,
    ) -> PResult<NodeId> {
        self.parse_function_common(flags, start, false, false)
    }

    /// `function` declaration. `name_required` is false only for
    /// `export default function`.
    pub(crate) fn parse_function_decl(
        &mut self,
        flags: FunctionFlags,
        start: u32,
        name_required: bool,
    ) -> PResult<NodeId> {
        self.parse_function_common(
            flags | FunctionFlags::DECLARATION,
            start,
            true,
            name_required,
        )
    }

    fn parse_function_common(
        &mut self,
        mut flags: FunctionFlags,
        start: u32,
        declaration: bool,
        name_required: bool,
    ) -> PResult<NodeId> {
        self.cursor.expect(TokenKind::Function)?;
        if self.cursor.eat(TokenKind::Star)? {
            self.require_feature(FeatureFlags::GENERATORS, "generator")?;
            flags |= FunctionFlags::GENERATOR;
        }
        if self.strict {
            flags |= FunctionFlags::STRICT;
        }

        // Declaration names bind in the enclosing scope (hoisted); named
        // expression names bind in the function's own parameter scope.
        let mut name = None;
        let mut name_span = Span::DUMMY;
        let mut sym = SymbolId::INVALID;
        let has_name = self.ident_like_name().is_some();
        if declaration {
            if has_name || name_required {
                let (n, span) = self.expect_binding_ident()?;
                sym = self.binder.declare(
                    n,
                    SymbolKind::FunctionDecl,
                    span,
                    self.strict,
                    self.interner,
                )?;
                name = Some(n);
                name_span = span;
            }
        } else if has_name {
            let (n, span) = self.expect_binding_ident()?;
            name = Some(n);
            name_span = span;
        }

        let func = self
            .arena
            .push_function(FunctionData::new(start, flags, self.current_func));
        let save = self.enter_function(func, flags);

        self.binder
            .push_scope(crate::binder::ScopeKind::FunctionParams, func);
        if !declaration {
            if let Some(n) = name {
                sym = self.binder.declare(
                    n,
                    SymbolKind::FunctionExprName,
                    name_span,
                    self.strict,
                    self.interner,
                )?;
            }
        }

        let (params, names, simple) = self.parse_params(flags)?;
        if simple {
            flags |= FunctionFlags::SIMPLE_PARAMS;
        }
        self.validate_params(&names, simple, self.strict, flags)?;

        let (body, end, state, stub) = self.parse_body_or_defer(func, &names, simple, &mut flags)?;

        self.binder.pop_scope(&mut self.arena)?;
        self.leave_function(save);

        let data = self.arena.function_mut(func);
        data.name = name;
        data.sym = sym;
        data.params = params;
        data.body = body;
        data.span = Span::new(start, end);
        // OR, not assign: the body parse writes CALLS_EVAL and capture
        // bits straight onto the record.
        data.flags |= flags;
        data.state = state;
        data.stub = stub;

        Ok(self.push(NodeKind::Function { func }, Span::new(start, end)))
    }

    /// Method value after its key: `(params) { body }`. Shared by object
    /// literal methods, accessors, and class members.
    pub(crate) fn parse_method_tail(
        &mut self,
        mut flags: FunctionFlags,
        start: u32,
    ) -> PResult<NodeId> {
        if self.strict {
            flags |= FunctionFlags::STRICT;
        }
        let func = self
            .arena
            .push_function(FunctionData::new(start, flags, self.current_func));
        let save = self.enter_function(func, flags);

        self.binder
            .push_scope(crate::binder::ScopeKind::FunctionParams, func);
        let (params, names, simple) = self.parse_params(flags)?;
        if simple {
            flags |= FunctionFlags::SIMPLE_PARAMS;
        }
        self.validate_params(&names, simple, self.strict, flags)?;
        self.check_accessor_arity(flags, params, start)?;

        let (body, end, state, stub) = self.parse_body_or_defer(func, &names, simple, &mut flags)?;

        self.binder.pop_scope(&mut self.arena)?;
        self.leave_function(save);

        let data = self.arena.function_mut(func);
        data.params = params;
        data.body = body;
        data.span = Span::new(start, end);
        data.flags |= flags;
        data.state = state;
        data.stub = stub;

        Ok(self.push(NodeKind::Function { func }, Span::new(start, end)))
    }

    /// Arrow function from already-parsed cover items. The cursor sits on
    /// `=>`; each item is reinterpreted as a binding pattern and its
    /// identifier references become parameter declarations.
    pub(crate) fn parse_arrow_function(
        &mut self,
        items: SmallVec<[NodeId; 4]>,
        start: u32,
        mut flags: FunctionFlags,
    ) -> PResult<NodeId> {
        flags |= FunctionFlags::ARROW;
        if self.strict {
            flags |= FunctionFlags::STRICT;
        }
        self.cursor.expect(TokenKind::Arrow)?;
        // Conversion claims any shorthand initializer recorded while the
        // parameter list was still being read as an expression. Clear it
        // before `enter_function` stashes the outer state.
        self.cover_init = None;

        let outer_func = self.current_func;
        let func = self
            .arena
            .push_function(FunctionData::new(start, flags, outer_func));
        let save = self.enter_function(func, flags);

        let params_block = self
            .binder
            .push_scope(crate::binder::ScopeKind::FunctionParams, func);
        // References recorded while the cover was still an expression
        // (parameter defaults) move into the new parameter scope.
        self.binder.rebase_refs(start, params_block, outer_func, func);

        let mut names: ParamNames = SmallVec::new();
        let mut simple = true;
        for (i, &item) in items.iter().enumerate() {
            if let NodeKind::Spread { expr } = self.arena.get(item).kind {
                if i + 1 != items.len() {
                    return Err(self.err(
                        ErrorCode::E1011,
                        self.arena.get(item).span,
                        "rest parameter must be last",
                    ));
                }
                if matches!(self.arena.get(expr).kind, NodeKind::Assign { .. }) {
                    return Err(self.err(
                        ErrorCode::E1011,
                        self.arena.get(expr).span,
                        "rest parameter cannot have a default",
                    ));
                }
                to_pattern(&mut self.arena, expr, PatternMode::Binding)?;
                self.arena.get_mut(item).kind = NodeKind::RestElement { arg: expr };
                simple = false;
            } else {
                to_pattern(&mut self.arena, item, PatternMode::Binding)?;
                if !matches!(self.arena.get(item).kind, NodeKind::Ident { .. }) {
                    simple = false;
                }
            }
            self.bind_cover_param(item, &mut names)?;
        }
        if simple {
            flags |= FunctionFlags::SIMPLE_PARAMS;
        }
        self.validate_params(&names, simple, self.strict, flags)?;
        let params = self.arena.push_list(&items);

        let (body, end, state, stub) = if self.cursor.at(TokenKind::LBrace) {
            self.parse_body_or_defer(func, &names, simple, &mut flags)?
        } else {
            // Expression bodies are never deferred.
            flags |= FunctionFlags::EXPR_BODY;
            let body = self.parse_assign()?;
            (body, self.cursor.prev_end(), ParseState::FullyParsed, None)
        };

        self.binder.pop_scope(&mut self.arena)?;
        self.leave_function(save);

        let data = self.arena.function_mut(func);
        data.params = params;
        data.body = body;
        data.span = Span::new(start, end);
        data.flags |= flags;
        data.state = state;
        data.stub = stub;

        Ok(self.push(NodeKind::Function { func }, Span::new(start, end)))
    }

    fn enter_function(&mut self, func: FuncId, flags: FunctionFlags) -> FuncSave {
        let save = FuncSave {
            ctx: self.ctx,
            current_func: self.current_func,
            strict: self.strict,
            labels: std::mem::take(&mut self.labels),
            cover_init: self.cover_init.take(),
        };
        self.current_func = func;
        self.ctx = Context {
            allow_yield: flags.contains(FunctionFlags::GENERATOR),
            allow_await: flags.contains(FunctionFlags::ASYNC),
            in_function: true,
            ..Context::default()
        };
        save
    }

    fn leave_function(&mut self, save: FuncSave) {
        self.ctx = save.ctx;
        self.current_func = save.current_func;
        self.set_strict(save.strict);
        self.labels = save.labels;
        self.cover_init = save.cover_init;
    }

    /// Formal parameter list, declaring each binding as it is parsed.
    /// Duplicate and strict-name checks run afterwards in
    /// [`Parser::validate_params`], once the list's shape is known.
    fn parse_params(
        &mut self,
        flags: FunctionFlags,
    ) -> PResult<(NodeRange, ParamNames, bool)> {
        self.cursor.expect(TokenKind::LParen)?;
        let mut params: SmallVec<[NodeId; 4]> = SmallVec::new();
        let mut names: ParamNames = SmallVec::new();
        let mut simple = true;

        while !self.cursor.at(TokenKind::RParen) {
            if self.cursor.at(TokenKind::DotDotDot) {
                self.require_feature(FeatureFlags::SPREAD_REST, "rest parameter")?;
                simple = false;
                let rest_start = self.cursor.span().start;
                self.cursor.bump()?;
                let arg = self.parse_binding_pattern(SymbolKind::Param, &mut names)?;
                params.push(self.push(
                    NodeKind::RestElement { arg },
                    Span::new(rest_start, self.cursor.prev_end()),
                ));
                if !self.cursor.at(TokenKind::RParen) {
                    return Err(self.err(
                        ErrorCode::E1011,
                        self.cursor.span(),
                        "rest parameter must be last",
                    ));
                }
                break;
            }

            let pat = self.parse_binding_pattern(SymbolKind::Param, &mut names)?;
            if !matches!(self.arena.get(pat).kind, NodeKind::Ident { .. }) {
                simple = false;
            }
            let pat = if self.cursor.at(TokenKind::Eq) {
                simple = false;
                self.cursor.bump()?;
                let saved = std::mem::replace(&mut self.ctx.in_param_default, true);
                let default = self.parse_assign()?;
                self.ctx.in_param_default = saved;
                let span = self.arena.get(pat).span;
                self.push(
                    NodeKind::AssignPattern {
                        target: pat,
                        default,
                    },
                    Span::new(span.start, self.cursor.prev_end()),
                )
            } else {
                pat
            };
            params.push(pat);
            if !self.cursor.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.cursor.expect(TokenKind::RParen)?;

        // Setter parameter restrictions don't depend on strictness; a rest
        // parameter was already marked non-simple above.
        let _ = flags;
        let range = self.arena.push_list(&params);
        Ok((range, names, simple))
    }

    /// Binding-position pattern: identifier, array pattern, or object
    /// pattern, with nested defaults. Declares every bound name.
    pub(crate) fn parse_binding_pattern(
        &mut self,
        kind: SymbolKind,
        names: &mut ParamNames,
    ) -> PResult<NodeId> {
        match self.cursor.kind() {
            TokenKind::LBracket => {
                self.require_feature(FeatureFlags::DESTRUCTURING, "destructuring")?;
                self.parse_array_binding(kind, names)
            }
            TokenKind::LBrace => {
                self.require_feature(FeatureFlags::DESTRUCTURING, "destructuring")?;
                self.parse_object_binding(kind, names)
            }
            _ => self.parse_binding_ident_node(kind, names),
        }
    }

    fn parse_binding_ident_node(
        &mut self,
        kind: SymbolKind,
        names: &mut ParamNames,
    ) -> PResult<NodeId> {
        let (name, span) = self.expect_binding_ident()?;
        let sym = self.declare_pattern_name(name, span, kind)?;
        names.push((name, span));
        Ok(self.push(NodeKind::Ident { name, sym }, span))
    }

    fn declare_pattern_name(
        &mut self,
        name: Name,
        span: Span,
        kind: SymbolKind,
    ) -> PResult<SymbolId> {
        if kind == SymbolKind::Param {
            // Strict and non-simple duplicate rules run after the full
            // list; tolerate everything here.
            self.binder
                .declare_param(name, span, true, false, self.interner)
        } else {
            self.binder
                .declare(name, kind, span, self.strict, self.interner)
        }
    }

    fn parse_array_binding(
        &mut self,
        kind: SymbolKind,
        names: &mut ParamNames,
    ) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        self.cursor.bump()?;
        let mut elems: SmallVec<[NodeId; 4]> = SmallVec::new();
        loop {
            if self.cursor.at(TokenKind::RBracket) {
                break;
            }
            if self.cursor.at(TokenKind::Comma) {
                let hole = self.cursor.span().start;
                self.cursor.bump()?;
                elems.push(self.push(NodeKind::Elision, Span::point(hole)));
                continue;
            }
            if self.cursor.at(TokenKind::DotDotDot) {
                self.require_feature(FeatureFlags::SPREAD_REST, "rest element")?;
                let rest_start = self.cursor.span().start;
                self.cursor.bump()?;
                let arg = self.parse_binding_pattern(kind, names)?;
                elems.push(self.push(
                    NodeKind::RestElement { arg },
                    Span::new(rest_start, self.cursor.prev_end()),
                ));
                if !self.cursor.at(TokenKind::RBracket) {
                    return Err(self.err(
                        ErrorCode::E1011,
                        self.cursor.span(),
                        "rest element must be last",
                    ));
                }
                break;
            }
            let pat = self.parse_binding_pattern(kind, names)?;
            elems.push(self.maybe_binding_default(pat)?);
            if !self.cursor.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.cursor.expect(TokenKind::RBracket)?;
        let range = self.arena.push_list(&elems);
        Ok(self.push(
            NodeKind::ArrayPattern { elems: range },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    fn parse_object_binding(
        &mut self,
        kind: SymbolKind,
        names: &mut ParamNames,
    ) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        self.cursor.bump()?;
        let mut props: SmallVec<[NodeId; 4]> = SmallVec::new();
        while !self.cursor.at(TokenKind::RBrace) {
            if self.cursor.at(TokenKind::DotDotDot) {
                self.require_feature(FeatureFlags::SPREAD_REST, "rest property")?;
                let rest_start = self.cursor.span().start;
                self.cursor.bump()?;
                let arg = self.parse_binding_ident_node(kind, names)?;
                props.push(self.push(
                    NodeKind::RestElement { arg },
                    Span::new(rest_start, self.cursor.prev_end()),
                ));
                if !self.cursor.at(TokenKind::RBrace) {
                    return Err(self.err(
                        ErrorCode::E1011,
                        self.cursor.span(),
                        "rest property must be last",
                    ));
                }
                break;
            }

            let prop_start = self.cursor.span().start;
            let key_span = self.cursor.span();
            let shorthand_name = match self.cursor.kind() {
                TokenKind::LBracket | TokenKind::Str(_) | TokenKind::Number(_) => None,
                _ => self.ident_like_name(),
            };
            let (key, computed) = self.parse_property_key()?;

            let (value, shorthand) = if self.cursor.eat(TokenKind::Colon)? {
                let pat = self.parse_binding_pattern(kind, names)?;
                (self.maybe_binding_default(pat)?, false)
            } else {
                let Some(name) = shorthand_name else {
                    return Err(self.err(
                        ErrorCode::E1006,
                        self.cursor.span(),
                        "expected ':' after property key in binding pattern",
                    ));
                };
                let sym = self.declare_pattern_name(name, key_span, kind)?;
                names.push((name, key_span));
                let ident = self.push(NodeKind::Ident { name, sym }, key_span);
                (self.maybe_binding_default(ident)?, true)
            };

            props.push(self.push(
                NodeKind::Property {
                    key,
                    value,
                    kind: vireo_ir::PropertyKind::Init,
                    computed,
                    shorthand,
                },
                Span::new(prop_start, self.cursor.prev_end()),
            ));
            if !self.cursor.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.cursor.expect(TokenKind::RBrace)?;
        let range = self.arena.push_list(&props);
        Ok(self.push(
            NodeKind::ObjectPattern { props: range },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    /// Wrap a binding pattern in `AssignPattern` when `= default` follows.
    fn maybe_binding_default(&mut self, pat: NodeId) -> PResult<NodeId> {
        if !self.cursor.at(TokenKind::Eq) {
            return Ok(pat);
        }
        self.cursor.bump()?;
        let default = self.parse_assign()?;
        let span = self.arena.get(pat).span;
        Ok(self.push(
            NodeKind::AssignPattern {
                target: pat,
                default,
            },
            Span::new(span.start, self.cursor.prev_end()),
        ))
    }

    /// Walk a converted cover pattern, turning its identifier leaves into
    /// parameter declarations (and retracting the references the cover
    /// parse recorded for them).
    fn bind_cover_param(&mut self, id: NodeId, names: &mut ParamNames) -> PResult<()> {
        let node = self.arena.get(id);
        let span = node.span;
        match node.kind.clone() {
            NodeKind::Ident { name, .. } => {
                self.binder.retract_ref(name, id);
                let sym = self
                    .binder
                    .declare_param(name, span, true, false, self.interner)?;
                if let NodeKind::Ident { sym: slot, .. } = &mut self.arena.get_mut(id).kind {
                    *slot = sym;
                }
                names.push((name, span));
            }
            NodeKind::ArrayPattern { elems } => {
                let elems: SmallVec<[NodeId; 4]> =
                    self.arena.get_list(elems).iter().copied().collect();
                for elem in elems {
                    if matches!(self.arena.get(elem).kind, NodeKind::Elision) {
                        continue;
                    }
                    self.bind_cover_param(elem, names)?;
                }
            }
            NodeKind::ObjectPattern { props } => {
                let props: SmallVec<[NodeId; 4]> =
                    self.arena.get_list(props).iter().copied().collect();
                for prop in props {
                    match self.arena.get(prop).kind {
                        NodeKind::Property { value, .. } => {
                            self.bind_cover_param(value, names)?;
                        }
                        NodeKind::RestElement { arg } => self.bind_cover_param(arg, names)?,
                        _ => {
                            return Err(self.err(
                                ErrorCode::E9001,
                                span,
                                "unexpected node in converted object pattern",
                            ))
                        }
                    }
                }
            }
            NodeKind::AssignPattern { target, .. } => self.bind_cover_param(target, names)?,
            NodeKind::RestElement { arg } => self.bind_cover_param(arg, names)?,
            _ => {
                return Err(self.err(
                    ErrorCode::E1006,
                    span,
                    "invalid arrow function parameter",
                ))
            }
        }
        Ok(())
    }

    /// Duplicate and restricted-name checks, once the parameter list's
    /// shape (and possibly a late strict directive) is known.
    fn validate_params(
        &self,
        names: &[(Name, Span)],
        simple: bool,
        strict: bool,
        flags: FunctionFlags,
    ) -> PResult<()> {
        let no_duplicates = strict || !simple || flags.contains(FunctionFlags::ARROW);
        if no_duplicates {
            for (i, &(name, span)) in names.iter().enumerate() {
                if names[..i].iter().any(|&(n, _)| n == name) {
                    return Err(self.err(
                        ErrorCode::E2001,
                        span,
                        format!("duplicate parameter '{}'", self.interner.lookup(name)),
                    ));
                }
            }
        }
        if strict {
            for &(name, span) in names {
                if name == self.names.eval || name == self.names.arguments {
                    return Err(self.err(
                        ErrorCode::E2003,
                        span,
                        format!(
                            "cannot bind '{}' in strict mode",
                            self.interner.lookup(name)
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    fn check_accessor_arity(
        &self,
        flags: FunctionFlags,
        params: NodeRange,
        start: u32,
    ) -> PResult<()> {
        let list = self.arena.get_list(params);
        if flags.contains(FunctionFlags::GETTER) && !list.is_empty() {
            return Err(self.err(
                ErrorCode::E1016,
                Span::point(start),
                "getter must have no parameters",
            ));
        }
        if flags.contains(FunctionFlags::SETTER) {
            let bad_count = list.len() != 1;
            let rest = list
                .first()
                .is_some_and(|&p| matches!(self.arena.get(p).kind, NodeKind::RestElement { .. }));
            if bad_count || rest {
                return Err(self.err(
                    ErrorCode::E1016,
                    Span::point(start),
                    "setter must have exactly one non-rest parameter",
                ));
            }
        }
        Ok(())
    }

    /// Parse, stub, or enqueue the `{ ... }` body of the current function.
    fn parse_body_or_defer(
        &mut self,
        func: FuncId,
        names: &[(Name, Span)],
        simple: bool,
        flags: &mut FunctionFlags,
    ) -> PResult<(NodeId, u32, ParseState, Option<DeferredStub>)> {
        let body_start = self.cursor.span().start;
        let enclosing_calls_eval = self
            .arena
            .function(func)
            .parent
            .is_valid()
            .then(|| self.arena.function(self.arena.function(func).parent).flags)
            .is_some_and(|f| f.contains(FunctionFlags::CALLS_EVAL));

        let decision = decide(&DeferInputs {
            defer_enabled: self.options.defer_enabled,
            defer_threshold: self.options.defer_threshold,
            min_body_len: self.options.min_body_len,
            source_len: self.source_len,
            body_start,
            in_param_default: self.ctx.in_param_default,
            in_class_field: self.ctx.in_class_field,
            in_with: self.binder.in_with(),
            enclosing_calls_eval,
            background_available: self.background.as_ref().is_some_and(|b| !b.has_failed()),
        });

        if decision != Deferral::Inline {
            let snap = self.cursor.snapshot();
            match fast_scan_body(&mut self.cursor, self.names.eval, self.names.arguments)? {
                Some(outcome) if outcome.end - body_start >= self.options.min_body_len => {
                    *flags |= outcome.flags;
                    let stub = DeferredStub {
                        restore: body_start,
                        end: outcome.end,
                        nested_functions: outcome.nested_functions,
                        flags: outcome.flags,
                        open_scopes: self.binder.open_block_ids(),
                    };
                    let state = if decision == Deferral::Background {
                        let handle = self
                            .background
                            .as_ref()
                            .unwrap_or_else(|| panic!("background decision without handle"));
                        handle.enqueue(WorkItem {
                            func,
                            restore: body_start,
                            strict: self.strict,
                            flags: *flags,
                        });
                        debug!(func = func.index(), restore = body_start, "body enqueued");
                        ParseState::BackgroundDeferred
                    } else {
                        debug!(func = func.index(), end = outcome.end, "body stubbed");
                        ParseState::StubbedDeferred
                    };
                    return Ok((NodeId::INVALID, outcome.end, state, Some(stub)));
                }
                _ => {
                    // Too small or ambiguous; parse it now.
                    self.cursor.restore(snap);
                }
            }
        }

        let body = self.parse_function_body(func, names, simple, flags)?;
        Ok((body, self.cursor.prev_end(), ParseState::FullyParsed, None))
    }

    /// Inline `{ ... }` body parse, including the directive prologue and
    /// retroactive strict-mode validation.
    pub(crate) fn parse_function_body(
        &mut self,
        func: FuncId,
        names: &[(Name, Span)],
        simple: bool,
        flags: &mut FunctionFlags,
    ) -> PResult<NodeId> {
        let lbrace = self.cursor.expect(TokenKind::LBrace)?;
        self.binder
            .push_scope(crate::binder::ScopeKind::FunctionBody, func);

        let mut stmts = Vec::new();
        if self.parse_directives(&mut stmts)? {
            if !simple {
                return Err(self.err(
                    ErrorCode::E1013,
                    lbrace,
                    "'use strict' directive in a function with non-simple parameters",
                ));
            }
            if !self.strict {
                self.set_strict(true);
                *flags |= FunctionFlags::STRICT;
                // The parameters were validated under sloppy rules; redo
                // them now the body has made the function strict.
                self.validate_params(names, simple, true, *flags)?;
            }
        }
        while !self.cursor.at(TokenKind::RBrace) {
            let stmt = self.parse_statement()?;
            stmts.push(stmt);
        }
        let rbrace = self.cursor.expect(TokenKind::RBrace)?;

        self.binder.pop_scope(&mut self.arena)?;
        let body = self.arena.push_list(&stmts);
        Ok(self.push(
            NodeKind::Block { body },
            Span::new(lbrace.start, rbrace.end),
        ))
    }
}
