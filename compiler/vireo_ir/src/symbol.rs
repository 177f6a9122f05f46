//! Binding symbols.
//!
//! The binder allocates one [`Symbol`] per declared binding and patches the
//! owning `Ident` nodes with the resolved [`SymbolId`]. References that
//! resolve to nothing (globals) keep `SymbolId::INVALID`.

use bitflags::bitflags;

use crate::ast::FuncId;
use crate::{Name, Span};
use std::fmt;

/// Index into the symbol table.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Unresolved reference sentinel.
    pub const INVALID: SymbolId = SymbolId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        SymbolId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "SymbolId({})", self.0)
        } else {
            write!(f, "SymbolId::INVALID")
        }
    }
}

impl Default for SymbolId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// What kind of declaration introduced a binding.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolKind {
    /// `var` — hoisted to the enclosing function scope.
    Var,
    Let,
    Const,
    /// `function f() {}` in statement position.
    FunctionDecl,
    Param,
    CatchParam,
    Class,
    Import,
    /// Name of a named function expression, visible only inside its body.
    FunctionExprName,
}

impl SymbolKind {
    /// Lexical bindings are block-scoped and use-before-declaration checked.
    pub fn is_lexical(self) -> bool {
        matches!(
            self,
            SymbolKind::Let | SymbolKind::Const | SymbolKind::Class
        )
    }

    /// Function-scoped bindings hoist past intervening blocks.
    pub fn is_function_scoped(self) -> bool {
        matches!(self, SymbolKind::Var | SymbolKind::FunctionDecl)
    }
}

bitflags! {
    /// Analysis flags attached to a binding.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct SymbolFlags: u8 {
        /// Referenced from a function nested inside the declaring one.
        const CAPTURED = 1 << 0;
        /// Named in an export clause.
        const EXPORTED = 1 << 1;
        /// Assigned somewhere after declaration.
        const ASSIGNED = 1 << 2;
        /// A `var` shadowed by a later lexical declaration of the same name.
        const HIDDEN_BY_LEXICAL = 1 << 3;
    }
}

/// One declared binding.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Symbol {
    pub name: Name,
    pub kind: SymbolKind,
    pub flags: SymbolFlags,
    /// Span of the declaring identifier.
    pub decl_span: Span,
    /// Function whose scope owns this binding.
    pub func: FuncId,
    /// Block id of the declaring scope (for lexical bindings).
    pub block_id: u32,
}

/// Flat symbol table, indexed by [`SymbolId`].
#[derive(Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            symbols: Vec::with_capacity(32),
        }
    }

    /// Allocate a symbol.
    ///
    /// # Panics
    /// Panics if the table exceeds `u32::MAX` symbols.
    pub fn push(&mut self, symbol: Symbol) -> SymbolId {
        let id = u32::try_from(self.symbols.len())
            .unwrap_or_else(|_| panic!("symbol table exceeded u32::MAX entries"));
        self.symbols.push(symbol);
        SymbolId::new(id)
    }

    #[inline]
    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId::new(i as u32), s))
    }
}
