//! Scope and binding resolution.
//!
//! Resolution is single-pass and interleaved with parsing. Identifier
//! references are not resolved where they occur; each one is appended to a
//! per-name reference chain tagged with the block id and function id current
//! at that point. When a scope closes, every name it declares consumes the
//! tail of its chain: entries whose block id is `>=` the closing block's id
//! belong to this scope (or one nested inside it) and bind here; the first
//! smaller id stops the sweep and the rest of the chain propagates outward.
//! Block ids increase monotonically as scopes open, which is what makes the
//! tail sweep correct for siblings.
//!
//! Names still chained when the outermost scope closes are free references;
//! their `Ident` nodes keep `SymbolId::INVALID`. At the top level those are
//! host globals. In a deferred-body sub-parse they may instead be bindings
//! of the enclosing unit, so they are handed back as [`FreeRef`]s for the
//! splice to resolve against the outer symbol table.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use vireo_diagnostic::ErrorCode;
use vireo_ir::symbol::{Symbol, SymbolFlags, SymbolId, SymbolKind, SymbolTable};
use vireo_ir::{FuncId, FunctionFlags, Name, NodeArena, NodeId, NodeKind, Span, StringInterner};

use crate::error::{PResult, ParseError};

/// What introduced a scope frame.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum ScopeKind {
    Global,
    Module,
    /// Parameter list of a function, enclosing the body scope.
    FunctionParams,
    FunctionBody,
    Block,
    Catch,
    With,
}

impl ScopeKind {
    /// True for frames that own `var` and function-declaration hoisting.
    fn is_var_target(self) -> bool {
        matches!(
            self,
            ScopeKind::Global | ScopeKind::Module | ScopeKind::FunctionBody
        )
    }
}

/// One recorded identifier reference, pending resolution.
struct RefEntry {
    block_id: u32,
    func: FuncId,
    node: NodeId,
    /// Source offset of the identifier, for use-before-declaration checks.
    offset: u32,
    /// The reference is a write (assignment or update target).
    assigns: bool,
}

/// A reference left unresolved when the outermost scope closed.
///
/// `func` is the referencing function in the local unit's numbering;
/// `FuncId::INVALID` means the unit's own top level.
pub(crate) struct FreeRef {
    pub name: Name,
    pub node: NodeId,
    pub func: FuncId,
    pub assigns: bool,
}

struct ScopeFrame {
    kind: ScopeKind,
    block_id: u32,
    func: FuncId,
    decls: FxHashMap<Name, SymbolId>,
}

pub(crate) struct Binder {
    scopes: Vec<ScopeFrame>,
    refs: FxHashMap<Name, SmallVec<[RefEntry; 4]>>,
    table: SymbolTable,
    exported: FxHashSet<Name>,
    free: Vec<FreeRef>,
    next_block_id: u32,
    eval_name: Name,
    arguments_name: Name,
}

impl Binder {
    pub(crate) fn new(interner: &StringInterner) -> Self {
        Binder {
            scopes: Vec::with_capacity(8),
            refs: FxHashMap::default(),
            table: SymbolTable::new(),
            exported: FxHashSet::default(),
            free: Vec::new(),
            next_block_id: 0,
            eval_name: interner.intern("eval"),
            arguments_name: interner.intern("arguments"),
        }
    }

    /// Open a scope; returns its block id.
    pub(crate) fn push_scope(&mut self, kind: ScopeKind, func: FuncId) -> u32 {
        let block_id = self.next_block_id;
        self.next_block_id += 1;
        self.scopes.push(ScopeFrame {
            kind,
            block_id,
            func,
            decls: FxHashMap::default(),
        });
        block_id
    }

    pub(crate) fn current_block_id(&self) -> u32 {
        self.scopes.last().map_or(0, |f| f.block_id)
    }

    pub(crate) fn in_with(&self) -> bool {
        self.scopes.iter().any(|f| f.kind == ScopeKind::With)
    }

    /// Record an identifier reference for later resolution.
    pub(crate) fn record_ref(&mut self, name: Name, node: NodeId, offset: u32, assigns: bool) {
        let frame = match self.scopes.last() {
            Some(f) => f,
            None => return,
        };
        self.refs.entry(name).or_default().push(RefEntry {
            block_id: frame.block_id,
            func: frame.func,
            node,
            offset,
            assigns,
        });
    }

    /// Remove a previously recorded reference.
    ///
    /// Used when cover-grammar reinterpretation turns an identifier that
    /// was parsed as an expression into a binding position (arrow
    /// parameters, labels). The entry is near the chain tail, so the
    /// backward scan is short.
    pub(crate) fn retract_ref(&mut self, name: Name, node: NodeId) {
        if let Some(chain) = self.refs.get_mut(&name) {
            if let Some(idx) = chain.iter().rposition(|e| e.node == node) {
                chain.remove(idx);
            }
        }
    }

    /// Retag references recorded during a cover-grammar parse so they
    /// resolve through an arrow function's parameter scope.
    ///
    /// Parameter-default expressions are first parsed as plain expressions
    /// in the enclosing scope; when `=>` turns the cover into an arrow, the
    /// references they recorded carry the enclosing block and function ids.
    /// Entries at or past `min_offset` (the `(`) are moved to the freshly
    /// opened parameter scope. Chains are offset-ordered, so only each
    /// chain's tail is touched. References tagged with a deeper function
    /// (a nested function inside a default) keep that function id so
    /// capture analysis still sees the crossing.
    pub(crate) fn rebase_refs(
        &mut self,
        min_offset: u32,
        block_id: u32,
        outer: FuncId,
        arrow: FuncId,
    ) {
        for chain in self.refs.values_mut() {
            for entry in chain.iter_mut().rev() {
                if entry.offset < min_offset {
                    break;
                }
                entry.block_id = block_id;
                if entry.func == outer {
                    entry.func = arrow;
                }
            }
        }
    }

    /// Flag a name as appearing in an export clause.
    pub(crate) fn mark_exported(&mut self, name: Name) {
        self.exported.insert(name);
    }

    /// Declare a binding in the appropriate scope.
    pub(crate) fn declare(
        &mut self,
        name: Name,
        kind: SymbolKind,
        span: Span,
        strict: bool,
        interner: &StringInterner,
    ) -> PResult<SymbolId> {
        if strict && (name == self.eval_name || name == self.arguments_name) {
            return Err(ParseError::new(
                ErrorCode::E2003,
                span,
                format!(
                    "cannot declare '{}' in strict mode",
                    interner.lookup(name)
                ),
            ));
        }
        // Function-scoped kinds always route through the hoisting path:
        // even when the top frame is the hoist target, duplicates merge
        // into one binding and a `var` rebinds a same-named parameter.
        if kind.is_function_scoped() {
            self.declare_hoisted(name, kind, span, interner)
        } else {
            self.declare_in_top(name, kind, span, false, interner)
        }
    }

    /// Declare a formal parameter. Duplicates are tolerated only when the
    /// caller says so (non-strict simple parameter lists).
    pub(crate) fn declare_param(
        &mut self,
        name: Name,
        span: Span,
        allow_duplicates: bool,
        strict: bool,
        interner: &StringInterner,
    ) -> PResult<SymbolId> {
        if strict && (name == self.eval_name || name == self.arguments_name) {
            return Err(ParseError::new(
                ErrorCode::E2003,
                span,
                format!("cannot bind '{}' in strict mode", interner.lookup(name)),
            ));
        }
        self.declare_in_top(name, SymbolKind::Param, span, allow_duplicates, interner)
    }

    /// Hoist a `var` or function declaration past intervening blocks into
    /// the enclosing function (or global/module) frame.
    fn declare_hoisted(
        &mut self,
        name: Name,
        kind: SymbolKind,
        span: Span,
        interner: &StringInterner,
    ) -> PResult<SymbolId> {
        let mut target = self.scopes.len() - 1;
        loop {
            let frame = &self.scopes[target];
            if frame.kind.is_var_target() {
                break;
            }
            // A lexical declaration of the same name in any skipped frame
            // conflicts with the hoisting var.
            if let Some(&sym) = frame.decls.get(&name) {
                if self.table.get(sym).kind.is_lexical() {
                    return Err(self.redeclaration_error(name, sym, span, interner));
                }
            }
            if target == 0 {
                break;
            }
            target -= 1;
        }

        let frame_block = self.scopes[target].block_id;
        let frame_func = self.scopes[target].func;
        if let Some(&existing) = self.scopes[target].decls.get(&name) {
            let existing_kind = self.table.get(existing).kind;
            if existing_kind.is_lexical() {
                return Err(self.redeclaration_error(name, existing, span, interner));
            }
            // var over var, var over param, function over function: one
            // binding, first declaration span wins.
            return Ok(existing);
        }
        // var in a body with a same-named parameter binds the parameter.
        if kind == SymbolKind::Var {
            if let Some(sym) = self.find_param_in_enclosing(name, target) {
                return Ok(sym);
            }
        }

        let sym = self.push_symbol(name, kind, span, frame_func, frame_block);
        self.scopes[target].decls.insert(name, sym);
        Ok(sym)
    }

    fn find_param_in_enclosing(&self, name: Name, body_frame: usize) -> Option<SymbolId> {
        if self.scopes[body_frame].kind != ScopeKind::FunctionBody || body_frame == 0 {
            return None;
        }
        let params = &self.scopes[body_frame - 1];
        if params.kind != ScopeKind::FunctionParams {
            return None;
        }
        params.decls.get(&name).copied()
    }

    fn declare_in_top(
        &mut self,
        name: Name,
        kind: SymbolKind,
        span: Span,
        allow_duplicates: bool,
        interner: &StringInterner,
    ) -> PResult<SymbolId> {
        let top = self.scopes.len() - 1;
        if let Some(&existing) = self.scopes[top].decls.get(&name) {
            if allow_duplicates && self.table.get(existing).kind == SymbolKind::Param {
                // Later duplicate formal shadows the earlier one.
                let frame = &self.scopes[top];
                let sym = self.push_symbol(name, kind, span, frame.func, frame.block_id);
                self.scopes[top].decls.insert(name, sym);
                return Ok(sym);
            }
            return Err(self.redeclaration_error(name, existing, span, interner));
        }

        let frame = &self.scopes[top];
        let sym = self.push_symbol(name, kind, span, frame.func, frame.block_id);
        self.scopes[top].decls.insert(name, sym);

        // A lexical declaration in an inner block hides a function-level
        // `var` of the same name without conflicting with it.
        if kind.is_lexical() && !self.scopes[top].kind.is_var_target() {
            for frame in self.scopes[..top].iter().rev() {
                if let Some(&outer) = frame.decls.get(&name) {
                    if self.table.get(outer).kind == SymbolKind::Var {
                        self.table.get_mut(outer).flags |= SymbolFlags::HIDDEN_BY_LEXICAL;
                    }
                    break;
                }
                if frame.kind.is_var_target() {
                    break;
                }
            }
        }
        Ok(sym)
    }

    fn push_symbol(
        &mut self,
        name: Name,
        kind: SymbolKind,
        span: Span,
        func: FuncId,
        block_id: u32,
    ) -> SymbolId {
        self.table.push(Symbol {
            name,
            kind,
            flags: SymbolFlags::empty(),
            decl_span: span,
            func,
            block_id,
        })
    }

    fn redeclaration_error(
        &self,
        name: Name,
        existing: SymbolId,
        span: Span,
        interner: &StringInterner,
    ) -> ParseError {
        let first = self.table.get(existing).decl_span;
        ParseError::new(
            ErrorCode::E2001,
            span,
            format!(
                "'{}' has already been declared (first declaration at {first})",
                interner.lookup(name)
            ),
        )
    }

    /// Close the top scope, binding the tail of every declared name's
    /// reference chain.
    pub(crate) fn pop_scope(&mut self, arena: &mut NodeArena) -> PResult<()> {
        let frame = self
            .scopes
            .pop()
            .unwrap_or_else(|| panic!("scope stack underflow"));

        for (&name, &sym) in &frame.decls {
            let chain = match self.refs.get_mut(&name) {
                Some(c) => c,
                None => continue,
            };
            while let Some(entry) = chain.last() {
                if entry.block_id < frame.block_id {
                    break;
                }
                let entry = chain.pop().unwrap_or_else(|| panic!("chain emptied"));
                bind_ref(arena, &mut self.table, sym, &entry)?;
            }
        }

        // The outermost scope leaves remaining chains as free references.
        if self.scopes.is_empty() {
            for name in self.exported.drain() {
                if let Some(&sym) = frame.decls.get(&name) {
                    self.table.get_mut(sym).flags |= SymbolFlags::EXPORTED;
                }
            }
            for (name, chain) in self.refs.drain() {
                for entry in chain {
                    self.free.push(FreeRef {
                        name,
                        node: entry.node,
                        func: entry.func,
                        assigns: entry.assigns,
                    });
                }
            }
        }
        Ok(())
    }

    /// Block ids of every currently open scope, outermost first. Recorded
    /// into a stub when a body is skipped; the splice uses them to tell
    /// which outer bindings were visible at the skip point.
    pub(crate) fn open_block_ids(&self) -> Vec<u32> {
        self.scopes.iter().map(|f| f.block_id).collect()
    }

    /// Finish binding, returning the symbol table and whatever references
    /// never resolved locally.
    pub(crate) fn into_parts(self) -> (SymbolTable, Vec<FreeRef>) {
        debug_assert!(self.scopes.is_empty(), "unclosed scope at end of parse");
        (self.table, self.free)
    }

    #[cfg(test)]
    pub(crate) fn table(&self) -> &SymbolTable {
        &self.table
    }
}

/// Attach one resolved reference to its symbol.
fn bind_ref(
    arena: &mut NodeArena,
    table: &mut SymbolTable,
    sym: SymbolId,
    entry: &RefEntry,
) -> PResult<()> {
    let symbol = table.get(sym);
    if symbol.kind.is_lexical()
        && entry.func == symbol.func
        && entry.offset < symbol.decl_span.start
    {
        return Err(ParseError::new(
            ErrorCode::E2002,
            arena.get(entry.node).span,
            "cannot use a lexical binding before its declaration",
        ));
    }

    let captured = entry.func != symbol.func;
    {
        let symbol = table.get_mut(sym);
        if captured {
            symbol.flags |= SymbolFlags::CAPTURED;
        }
        if entry.assigns {
            symbol.flags |= SymbolFlags::ASSIGNED;
        }
    }
    if captured && table.get(sym).func.is_valid() {
        let owner = table.get(sym).func;
        arena.function_mut(owner).flags |= FunctionFlags::HAS_CAPTURED_BINDINGS;
    }

    if let NodeKind::Ident { sym: slot, .. } = &mut arena.get_mut(entry.node).kind {
        *slot = sym;
    }
    Ok(())
}
