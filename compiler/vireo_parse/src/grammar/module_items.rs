//! Import and export declarations.
//!
//! Only reached from the module-goal top level; statement position rejects
//! these keywords with a placement error. Imported names declare module
//! bindings; exported names are flagged on the binder and stamped onto
//! their symbols when the module scope closes.

use smallvec::SmallVec;
use vireo_diagnostic::ErrorCode;
use vireo_ir::symbol::SymbolKind;
use vireo_ir::{FunctionFlags, ImportKind, Name, NodeId, NodeKind, Span, TokenKind};

use super::Parser;
use crate::error::PResult;
use crate::options::FeatureFlags;

impl<'a> Parser<'a> {
    /// Top-level item in a module: import, export, or any statement.
    pub(crate) fn parse_module_item(&mut self) -> PResult<NodeId> {
        match self.cursor.kind() {
            TokenKind::Import => {
                // `import.meta` routes through the expression grammar.
                let snap = self.cursor.snapshot();
                self.cursor.bump()?;
                if self.cursor.at(TokenKind::Dot) {
                    self.cursor.restore(snap);
                    return self.parse_statement();
                }
                self.cursor.restore(snap);
                self.require_feature(FeatureFlags::MODULES, "import")?;
                self.parse_import_decl()
            }
            TokenKind::Export => {
                self.require_feature(FeatureFlags::MODULES, "export")?;
                self.parse_export_decl()
            }
            _ => self.parse_statement(),
        }
    }

    fn parse_import_decl(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        self.cursor.bump()?;

        // `import "m";` — side effect only.
        if let TokenKind::Str(source) = self.cursor.kind() {
            self.cursor.bump()?;
            self.semicolon()?;
            return Ok(self.push(
                NodeKind::ImportDecl {
                    specifiers: vireo_ir::NodeRange::EMPTY,
                    source,
                },
                Span::new(start, self.cursor.prev_end()),
            ));
        }

        let mut specifiers: SmallVec<[NodeId; 4]> = SmallVec::new();
        let mut want_clause = true;

        if self.ident_like_name().is_some() {
            let spec_start = self.cursor.span().start;
            let local = self.parse_import_binding()?;
            specifiers.push(self.push(
                NodeKind::ImportSpec {
                    kind: ImportKind::Default,
                    imported: None,
                    local,
                },
                Span::new(spec_start, self.cursor.prev_end()),
            ));
            want_clause = self.cursor.eat(TokenKind::Comma)?;
        }

        if want_clause {
            match self.cursor.kind() {
                TokenKind::Star => {
                    let spec_start = self.cursor.span().start;
                    self.cursor.bump()?;
                    self.cursor.expect(TokenKind::As)?;
                    let local = self.parse_import_binding()?;
                    specifiers.push(self.push(
                        NodeKind::ImportSpec {
                            kind: ImportKind::Namespace,
                            imported: None,
                            local,
                        },
                        Span::new(spec_start, self.cursor.prev_end()),
                    ));
                }
                TokenKind::LBrace => {
                    self.cursor.bump()?;
                    while !self.cursor.at(TokenKind::RBrace) {
                        let spec_start = self.cursor.span().start;
                        let imported = self.parse_module_export_name()?;
                        let local = if self.cursor.eat(TokenKind::As)? {
                            self.parse_import_binding()?
                        } else {
                            // Without `as` the import name must itself be a
                            // valid binding identifier.
                            self.import_binding_from_name(imported, spec_start)?
                        };
                        specifiers.push(self.push(
                            NodeKind::ImportSpec {
                                kind: ImportKind::Named,
                                imported: Some(imported),
                                local,
                            },
                            Span::new(spec_start, self.cursor.prev_end()),
                        ));
                        if !self.cursor.eat(TokenKind::Comma)? {
                            break;
                        }
                    }
                    self.cursor.expect(TokenKind::RBrace)?;
                }
                _ => return Err(self.unexpected()),
            }
        }

        self.cursor.expect(TokenKind::From)?;
        let source = self.expect_module_source()?;
        self.semicolon()?;
        let specifiers = self.arena.push_list(&specifiers);
        Ok(self.push(
            NodeKind::ImportDecl { specifiers, source },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    /// Binding identifier for an imported name; declares the symbol.
    fn parse_import_binding(&mut self) -> PResult<NodeId> {
        let (name, span) = self.expect_binding_ident()?;
        let sym = self
            .binder
            .declare(name, SymbolKind::Import, span, self.strict, self.interner)?;
        Ok(self.push(NodeKind::Ident { name, sym }, span))
    }

    /// The already-consumed export name doubles as the local binding.
    fn import_binding_from_name(&mut self, name: Name, start: u32) -> PResult<NodeId> {
        let span = Span::new(start, self.cursor.prev_end());
        let sym = self
            .binder
            .declare(name, SymbolKind::Import, span, self.strict, self.interner)?;
        Ok(self.push(NodeKind::Ident { name, sym }, span))
    }

    /// ModuleExportName: any identifier-like token or reserved word.
    fn parse_module_export_name(&mut self) -> PResult<Name> {
        if let TokenKind::Str(value) = self.cursor.kind() {
            self.cursor.bump()?;
            return Ok(value);
        }
        match self.property_name_of_current() {
            Some(name) => {
                self.cursor.bump()?;
                Ok(name)
            }
            None => Err(self.err(
                ErrorCode::E1004,
                self.cursor.span(),
                format!("expected export name, found {}", self.cursor.kind()),
            )),
        }
    }

    fn expect_module_source(&mut self) -> PResult<Name> {
        if let TokenKind::Str(source) = self.cursor.kind() {
            self.cursor.bump()?;
            Ok(source)
        } else {
            Err(self.err(
                ErrorCode::E1015,
                self.cursor.span(),
                format!("expected module specifier, found {}", self.cursor.kind()),
            ))
        }
    }

    fn parse_export_decl(&mut self) -> PResult<NodeId> {
        let start = self.cursor.span().start;
        self.cursor.bump()?;

        match self.cursor.kind() {
            TokenKind::Star => {
                self.cursor.bump()?;
                let alias = if self.cursor.eat(TokenKind::As)? {
                    Some(self.parse_module_export_name()?)
                } else {
                    None
                };
                self.cursor.expect(TokenKind::From)?;
                let source = self.expect_module_source()?;
                self.semicolon()?;
                Ok(self.push(
                    NodeKind::ExportAll { source, alias },
                    Span::new(start, self.cursor.prev_end()),
                ))
            }
            TokenKind::Default => {
                self.cursor.bump()?;
                let decl_start = self.cursor.span().start;
                let decl = match self.cursor.kind() {
                    TokenKind::Function => {
                        let node = self.parse_function_decl(
                            FunctionFlags::empty(),
                            decl_start,
                            false,
                        )?;
                        self.mark_function_exported(node);
                        node
                    }
                    TokenKind::Async => {
                        let snap = self.cursor.snapshot();
                        self.cursor.bump()?;
                        if self.cursor.at(TokenKind::Function) && !self.cursor.newline_before() {
                            let node = self.parse_function_decl(
                                FunctionFlags::ASYNC,
                                decl_start,
                                false,
                            )?;
                            self.mark_function_exported(node);
                            node
                        } else {
                            self.cursor.restore(snap);
                            let expr = self.parse_assign()?;
                            self.semicolon()?;
                            expr
                        }
                    }
                    TokenKind::Class => {
                        let node = self.parse_class_decl_default(decl_start)?;
                        self.mark_class_exported(node);
                        node
                    }
                    _ => {
                        let expr = self.parse_assign()?;
                        self.semicolon()?;
                        expr
                    }
                };
                Ok(self.push(
                    NodeKind::ExportDefault { decl },
                    Span::new(start, self.cursor.prev_end()),
                ))
            }
            TokenKind::LBrace => self.parse_export_named(start),
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                let decl = self.parse_statement()?;
                self.mark_var_decl_exported(decl);
                Ok(self.push(
                    NodeKind::ExportDecl { decl },
                    Span::new(start, self.cursor.prev_end()),
                ))
            }
            TokenKind::Function | TokenKind::Class | TokenKind::Async => {
                let decl = self.parse_statement()?;
                match self.arena.get(decl).kind {
                    NodeKind::Function { .. } => self.mark_function_exported(decl),
                    NodeKind::Class { .. } => self.mark_class_exported(decl),
                    _ => {
                        return Err(self.err(
                            ErrorCode::E1015,
                            self.arena.get(decl).span,
                            "expected a declaration after 'export'",
                        ))
                    }
                }
                Ok(self.push(
                    NodeKind::ExportDecl { decl },
                    Span::new(start, self.cursor.prev_end()),
                ))
            }
            _ => Err(self.err(
                ErrorCode::E1015,
                self.cursor.span(),
                format!("expected a declaration after 'export', found {}", self.cursor.kind()),
            )),
        }
    }

    fn parse_export_named(&mut self, start: u32) -> PResult<NodeId> {
        self.cursor.bump()?;
        let mut specifiers: SmallVec<[NodeId; 4]> = SmallVec::new();
        let mut locals: SmallVec<[Name; 4]> = SmallVec::new();
        while !self.cursor.at(TokenKind::RBrace) {
            let spec_start = self.cursor.span().start;
            let local = self.parse_module_export_name()?;
            let exported = if self.cursor.eat(TokenKind::As)? {
                self.parse_module_export_name()?
            } else {
                local
            };
            locals.push(local);
            specifiers.push(self.push(
                NodeKind::ExportSpec { local, exported },
                Span::new(spec_start, self.cursor.prev_end()),
            ));
            if !self.cursor.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.cursor.expect(TokenKind::RBrace)?;

        let source = if self.cursor.eat(TokenKind::From)? {
            Some(self.expect_module_source()?)
        } else {
            // Without `from`, the locals are this module's own bindings.
            for name in locals {
                self.binder.mark_exported(name);
            }
            None
        };
        self.semicolon()?;
        let specifiers = self.arena.push_list(&specifiers);
        Ok(self.push(
            NodeKind::ExportNamed { specifiers, source },
            Span::new(start, self.cursor.prev_end()),
        ))
    }

    fn mark_function_exported(&mut self, node: NodeId) {
        if let NodeKind::Function { func } = self.arena.get(node).kind {
            if let Some(name) = self.arena.function(func).name {
                self.binder.mark_exported(name);
            }
        }
    }

    fn mark_class_exported(&mut self, node: NodeId) {
        if let NodeKind::Class {
            name: Some(name), ..
        } = self.arena.get(node).kind
        {
            self.binder.mark_exported(name);
        }
    }

    /// Mark every name bound by an exported `var`/`let`/`const`.
    fn mark_var_decl_exported(&mut self, decl: NodeId) {
        let mut stack: SmallVec<[NodeId; 8]> = SmallVec::new();
        stack.push(decl);
        while let Some(id) = stack.pop() {
            match self.arena.get(id).kind {
                NodeKind::Ident { name, .. } => self.binder.mark_exported(name),
                NodeKind::VarDecl { decls, .. } => {
                    stack.extend(self.arena.get_list(decls).iter().copied());
                }
                NodeKind::VarDeclarator { pattern, .. } => stack.push(pattern),
                NodeKind::ArrayPattern { elems } => {
                    stack.extend(self.arena.get_list(elems).iter().copied());
                }
                NodeKind::ObjectPattern { props } => {
                    stack.extend(self.arena.get_list(props).iter().copied());
                }
                NodeKind::Property { value, .. } => stack.push(value),
                NodeKind::AssignPattern { target, .. } => stack.push(target),
                NodeKind::RestElement { arg } => stack.push(arg),
                _ => {}
            }
        }
    }
}
