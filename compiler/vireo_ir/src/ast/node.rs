//! AST node definitions.
//!
//! One tagged enum covers the full grammar: literals, operator expressions,
//! binding patterns, statements, declarations, and module items. A node's tag
//! determines which payload fields are meaningful; child links are
//! [`NodeId`]/[`NodeRange`] indices into the owning arena.

use crate::ast::node_id::{FuncId, NodeId, NodeRange};
use crate::ast::operators::{
    AssignOp, BinaryOp, LogicalOp, MemberKind, PropertyKind, UnaryOp, UpdateOp, VarKind,
};
use crate::symbol::SymbolId;
use crate::{Name, Span};

/// One AST node: kind plus source span.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

/// Import specifier kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ImportKind {
    /// `import x from "m"`
    Default,
    /// `import * as ns from "m"`
    Namespace,
    /// `import { a as b } from "m"`
    Named,
}

/// The tagged node variant.
///
/// Grouping mirrors the grammar: literals first, then expressions, patterns,
/// statements, and module items.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    // ── Literals ──
    Null,
    Bool(bool),
    /// f64 bits, for Eq/Hash.
    Number(u64),
    BigInt(Name),
    Str(Name),
    /// Pattern text and flags, interned but not compiled (the regex engine
    /// is a separate subsystem).
    Regex {
        pattern: Name,
        flags: Name,
    },
    /// One cooked/raw chunk of a template literal.
    TemplateChunk {
        cooked: Name,
        raw: Name,
    },
    /// `` `a${x}b` `` — chunks.len() == exprs.len() + 1.
    Template {
        chunks: NodeRange,
        exprs: NodeRange,
    },
    TaggedTemplate {
        tag: NodeId,
        quasi: NodeId,
    },

    // ── Names and primaries ──
    /// Identifier reference or binding identifier. `sym` is
    /// `SymbolId::INVALID` until the binder resolves it (and stays invalid
    /// for free/global references).
    Ident {
        name: Name,
        sym: SymbolId,
    },
    PrivateName(Name),
    This,
    SuperBase,
    NewTarget,
    ImportMeta,

    Array {
        elems: NodeRange,
    },
    Object {
        props: NodeRange,
    },
    Property {
        key: NodeId,
        value: NodeId,
        kind: PropertyKind,
        computed: bool,
        shorthand: bool,
    },
    Spread {
        expr: NodeId,
    },
    /// Hole in an array literal: `[1, , 3]`.
    Elision,

    // ── Patterns ──
    ArrayPattern {
        elems: NodeRange,
    },
    ObjectPattern {
        props: NodeRange,
    },
    /// `target = default` inside a pattern or parameter list.
    AssignPattern {
        target: NodeId,
        default: NodeId,
    },
    RestElement {
        arg: NodeId,
    },

    // ── Functions and classes ──
    /// Any function form; payload lives in the arena's function table.
    Function {
        func: FuncId,
    },
    Class {
        name: Option<Name>,
        sym: SymbolId,
        heritage: Option<NodeId>,
        body: NodeRange,
    },
    ClassMember {
        kind: MemberKind,
        key: NodeId,
        value: Option<NodeId>,
        is_static: bool,
        computed: bool,
    },

    // ── Operator expressions ──
    Unary {
        op: UnaryOp,
        expr: NodeId,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        expr: NodeId,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    Logical {
        op: LogicalOp,
        left: NodeId,
        right: NodeId,
    },
    Assign {
        op: AssignOp,
        target: NodeId,
        value: NodeId,
    },
    Cond {
        test: NodeId,
        cons: NodeId,
        alt: NodeId,
    },
    Call {
        callee: NodeId,
        args: NodeRange,
        optional: bool,
    },
    New {
        callee: NodeId,
        args: NodeRange,
    },
    Member {
        obj: NodeId,
        prop: NodeId,
        computed: bool,
        optional: bool,
    },
    Sequence {
        exprs: NodeRange,
    },
    Yield {
        arg: Option<NodeId>,
        delegate: bool,
    },
    Await {
        arg: NodeId,
    },
    /// Kept (not folded away) so assignment-target validation and pattern
    /// reinterpretation can see the original parenthesization.
    Paren {
        expr: NodeId,
    },

    // ── Statements ──
    Program {
        body: NodeRange,
    },
    ExprStmt {
        expr: NodeId,
    },
    Block {
        body: NodeRange,
    },
    VarDecl {
        kind: VarKind,
        decls: NodeRange,
    },
    VarDeclarator {
        pattern: NodeId,
        init: Option<NodeId>,
    },
    Empty,
    If {
        test: NodeId,
        cons: NodeId,
        alt: Option<NodeId>,
    },
    For {
        init: Option<NodeId>,
        test: Option<NodeId>,
        update: Option<NodeId>,
        body: NodeId,
    },
    ForIn {
        left: NodeId,
        right: NodeId,
        body: NodeId,
    },
    ForOf {
        left: NodeId,
        right: NodeId,
        body: NodeId,
        is_await: bool,
    },
    While {
        test: NodeId,
        body: NodeId,
    },
    DoWhile {
        body: NodeId,
        test: NodeId,
    },
    Continue {
        label: Option<Name>,
    },
    Break {
        label: Option<Name>,
    },
    Return {
        arg: Option<NodeId>,
    },
    With {
        obj: NodeId,
        body: NodeId,
    },
    Labeled {
        label: Name,
        body: NodeId,
    },
    Switch {
        disc: NodeId,
        cases: NodeRange,
    },
    SwitchCase {
        test: Option<NodeId>,
        body: NodeRange,
    },
    Throw {
        arg: NodeId,
    },
    Try {
        block: NodeId,
        handler: Option<NodeId>,
        finalizer: Option<NodeId>,
    },
    Catch {
        param: Option<NodeId>,
        body: NodeId,
    },
    Debugger,

    // ── Module items ──
    ImportDecl {
        specifiers: NodeRange,
        source: Name,
    },
    ImportSpec {
        kind: ImportKind,
        imported: Option<Name>,
        local: NodeId,
    },
    ExportNamed {
        specifiers: NodeRange,
        source: Option<Name>,
    },
    ExportSpec {
        local: Name,
        exported: Name,
    },
    ExportDefault {
        decl: NodeId,
    },
    ExportDecl {
        decl: NodeId,
    },
    ExportAll {
        source: Name,
        alias: Option<Name>,
    },
}

impl NodeKind {
    /// True for the pattern node kinds produced by reinterpretation.
    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            NodeKind::ArrayPattern { .. }
                | NodeKind::ObjectPattern { .. }
                | NodeKind::AssignPattern { .. }
                | NodeKind::RestElement { .. }
        )
    }

    /// True for kinds that are valid simple assignment targets.
    pub fn is_simple_assign_target(&self) -> bool {
        matches!(self, NodeKind::Ident { .. } | NodeKind::Member { .. })
    }
}
