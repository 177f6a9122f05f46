//! Class declarations and expressions.
//!
//! Class bodies are always strict. Member parsing shares the property-key
//! and method machinery with object literals; what is distinct here is the
//! `static` prefix, fields, private names, and the constructor rules.

use smallvec::SmallVec;
use vireo_diagnostic::ErrorCode;
use vireo_ir::symbol::{SymbolId, SymbolKind};
use vireo_ir::{FunctionFlags, MemberKind, NodeId, NodeKind, Span, TokenKind};

use super::Parser;
use crate::binder::ScopeKind;
use crate::error::PResult;
use crate::options::FeatureFlags;

impl<'a> Parser<'a> {
    pub(crate) fn parse_class_decl(&mut self, start: u32) -> PResult<NodeId> {
        self.parse_class_common(start, true, true)
    }

    /// `export default class` may omit the name.
    pub(crate) fn parse_class_decl_default(&mut self, start: u32) -> PResult<NodeId> {
        self.parse_class_common(start, true, false)
    }

    pub(crate) fn parse_class_expr(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        self.parse_class_common(start, false, false)
    }

    fn parse_class_common(
        &mut self,
        start: u32,
        declaration: bool,
        name_required: bool,
    ) -> PResult<NodeId> {
        self.cursor.expect(TokenKind::Class)?;
        let saved_strict = self.strict;
        self.set_strict(true);

        let has_name = self.ident_like_name().is_some();
        let mut name = None;
        let mut name_span = Span::DUMMY;
        let mut sym = SymbolId::INVALID;
        if has_name || (declaration && name_required) {
            let (n, span) = self.expect_binding_ident()?;
            name = Some(n);
            name_span = span;
        }
        if declaration {
            if let Some(n) = name {
                sym = self
                    .binder
                    .declare(n, SymbolKind::Class, name_span, true, self.interner)?;
            }
        }

        // A class expression's name is visible only inside the class body.
        self.binder.push_scope(ScopeKind::Block, self.current_func);
        if !declaration {
            if let Some(n) = name {
                sym = self
                    .binder
                    .declare(n, SymbolKind::Class, name_span, true, self.interner)?;
            }
        }

        let result = self.parse_class_tail(start, name, sym);
        self.binder.pop_scope(&mut self.arena)?;
        self.set_strict(saved_strict);
        result
    }

    fn parse_class_tail(
        &mut self,
        start: u32,
        name: Option<vireo_ir::Name>,
        sym: SymbolId,
    ) -> PResult<NodeId> {
        let heritage = if self.cursor.eat(TokenKind::Extends)? {
            Some(self.parse_lhs_expr()?)
        } else {
            None
        };

        self.cursor.expect(TokenKind::LBrace)?;
        let mut members: SmallVec<[NodeId; 8]> = SmallVec::new();
        let mut seen_constructor = false;
        while !self.cursor.at(TokenKind::RBrace) {
            if self.cursor.eat(TokenKind::Semicolon)? {
                continue;
            }
            members.push(self.parse_class_member(&mut seen_constructor)?);
        }
        let rbrace = self.cursor.expect(TokenKind::RBrace)?;

        let body = self.arena.push_list(&members);
        Ok(self.push(
            NodeKind::Class {
                name,
                sym,
                heritage,
                body,
            },
            Span::new(start, rbrace.end),
        ))
    }

    fn parse_class_member(&mut self, seen_constructor: &mut bool) -> PResult<NodeId> {
        let start = self.cursor.span().start;

        let is_static = self.cursor.at(TokenKind::Static) && !self.static_is_key()?;
        if is_static {
            self.cursor.bump()?;
        }

        let accessor = match self.cursor.kind() {
            TokenKind::Get if self.key_follows() => Some(FunctionFlags::GETTER),
            TokenKind::Set if self.key_follows() => Some(FunctionFlags::SETTER),
            _ => None,
        };
        if accessor.is_some() {
            self.cursor.bump()?;
        }

        let mut flags = FunctionFlags::METHOD | accessor.unwrap_or_else(FunctionFlags::empty);
        if accessor.is_none() {
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
        }

        let key_span = self.cursor.span();
        let key_name = self.property_name_of_current_or_literal();
        let (key, computed) = self.parse_property_key()?;

        let is_ctor_name =
            !computed && !is_static && key_name == Some(self.names.constructor);
        if is_static && key_name == Some(self.interner.intern("prototype")) {
            return Err(self.err(
                ErrorCode::E1001,
                key_span,
                "static member cannot be named 'prototype'",
            ));
        }

        // Method form.
        if self.cursor.at(TokenKind::LParen) {
            let kind = if is_ctor_name {
                if flags.intersects(
                    FunctionFlags::ASYNC
                        | FunctionFlags::GENERATOR
                        | FunctionFlags::GETTER
                        | FunctionFlags::SETTER,
                ) {
                    return Err(self.err(
                        ErrorCode::E1001,
                        key_span,
                        "constructor cannot be an accessor, generator, or async method",
                    ));
                }
                if *seen_constructor {
                    return Err(self.err(
                        ErrorCode::E1001,
                        key_span,
                        "class may only have one constructor",
                    ));
                }
                *seen_constructor = true;
                flags |= FunctionFlags::CONSTRUCTOR;
                MemberKind::Constructor
            } else if flags.contains(FunctionFlags::GETTER) {
                MemberKind::Getter
            } else if flags.contains(FunctionFlags::SETTER) {
                MemberKind::Setter
            } else {
                MemberKind::Method
            };
            let value = self.parse_method_tail(flags, start)?;
            return Ok(self.push(
                NodeKind::ClassMember {
                    kind,
                    key,
                    value: Some(value),
                    is_static,
                    computed,
                },
                Span::new(start, self.cursor.prev_end()),
            ));
        }

        // Field form.
        if flags.intersects(
            FunctionFlags::ASYNC
                | FunctionFlags::GENERATOR
                | FunctionFlags::GETTER
                | FunctionFlags::SETTER,
        ) {
            return Err(self.err(
                ErrorCode::E1001,
                self.cursor.span(),
                "expected '(' after method name",
            ));
        }
        if is_ctor_name {
            return Err(self.err(
                ErrorCode::E1001,
                key_span,
                "class field cannot be named 'constructor'",
            ));
        }
        let value = if self.cursor.eat(TokenKind::Eq)? {
            let saved = std::mem::replace(&mut self.ctx.in_class_field, true);
            let init = self.parse_assign();
            self.ctx.in_class_field = saved;
            Some(init?)
        } else {
            None
        };
        self.semicolon()?;
        Ok(self.push(
            NodeKind::ClassMember {
                kind: MemberKind::Field,
                key,
                value,
                is_static,
                computed,
            },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    /// `static` followed by `(` or `=` is itself a member key.
    fn static_is_key(&mut self) -> PResult<bool> {
        let snap = self.cursor.snapshot();
        self.cursor.bump()?;
        let is_key = matches!(
            self.cursor.kind(),
            TokenKind::LParen | TokenKind::Eq | TokenKind::Semicolon | TokenKind::RBrace
        );
        self.cursor.restore(snap);
        Ok(is_key)
    }

    /// Key name for constructor/prototype checks: identifier-ish keys via
    /// the source slice, string keys via their cooked value.
    fn property_name_of_current_or_literal(&self) -> Option<vireo_ir::Name> {
        if let TokenKind::Str(value) = self.cursor.kind() {
            return Some(value);
        }
        self.property_name_of_current()
    }
}
