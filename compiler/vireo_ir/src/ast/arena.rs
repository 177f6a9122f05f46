//! Flat node arena.
//!
//! Nodes, child-list storage, and the function side table live in three
//! plain vectors. A background worker parses a deferred body into its own
//! private arena; [`NodeArena::splice`] appends that arena onto the main one
//! and rewrites every embedded index by a fixed base offset, so merging a
//! finished background job is O(nodes in the job) with no pointer fixup.

use crate::ast::function::FunctionData;
use crate::ast::node::{Node, NodeKind};
use crate::ast::node_id::{FuncId, NodeId, NodeRange};
use crate::symbol::SymbolId;
use crate::Span;

/// Base offsets produced by a splice, for relocating ids the caller kept
/// (e.g. the root node of a background-parsed body).
#[derive(Copy, Clone, Debug)]
pub struct SpliceMap {
    pub node_base: u32,
    pub list_base: u32,
    pub func_base: u32,
    pub sym_base: u32,
}

impl SpliceMap {
    #[inline]
    pub fn node(&self, id: NodeId) -> NodeId {
        if id.is_valid() {
            NodeId::new(id.raw() + self.node_base)
        } else {
            id
        }
    }

    #[inline]
    pub fn func(&self, id: FuncId) -> FuncId {
        if id.is_valid() {
            FuncId::new(id.raw() + self.func_base)
        } else {
            id
        }
    }

    #[inline]
    pub fn sym(&self, id: SymbolId) -> SymbolId {
        if id.is_valid() {
            SymbolId::new(id.raw() + self.sym_base)
        } else {
            id
        }
    }

    #[inline]
    pub fn range(&self, r: NodeRange) -> NodeRange {
        if r.len == 0 {
            r
        } else {
            NodeRange::new(r.start + self.list_base, r.len)
        }
    }
}

/// Arena of AST nodes, child lists, and function records.
#[derive(Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    /// Flattened storage for variable-length child lists.
    lists: Vec<NodeId>,
    functions: Vec<FunctionData>,
}

impl NodeArena {
    pub fn new() -> Self {
        NodeArena {
            nodes: Vec::with_capacity(256),
            lists: Vec::with_capacity(128),
            functions: Vec::with_capacity(16),
        }
    }

    /// Allocate a node, returning its id.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` nodes.
    pub fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = u32::try_from(self.nodes.len())
            .unwrap_or_else(|_| panic!("node arena exceeded u32::MAX nodes"));
        self.nodes.push(Node { kind, span });
        NodeId::new(id)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Copy a child list into flattened storage.
    pub fn push_list(&mut self, children: &[NodeId]) -> NodeRange {
        if children.is_empty() {
            return NodeRange::EMPTY;
        }
        let start = u32::try_from(self.lists.len())
            .unwrap_or_else(|_| panic!("node arena list storage exceeded u32::MAX entries"));
        self.lists.extend_from_slice(children);
        #[allow(clippy::cast_possible_truncation)] // list fits, start fit above
        NodeRange::new(start, children.len() as u32)
    }

    #[inline]
    pub fn get_list(&self, range: NodeRange) -> &[NodeId] {
        &self.lists[range.start as usize..range.start as usize + range.len()]
    }

    /// Allocate a function record.
    pub fn push_function(&mut self, data: FunctionData) -> FuncId {
        let id = u32::try_from(self.functions.len())
            .unwrap_or_else(|_| panic!("function table exceeded u32::MAX entries"));
        self.functions.push(data);
        FuncId::new(id)
    }

    #[inline]
    pub fn function(&self, id: FuncId) -> &FunctionData {
        &self.functions[id.index()]
    }

    #[inline]
    pub fn function_mut(&mut self, id: FuncId) -> &mut FunctionData {
        &mut self.functions[id.index()]
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn functions(&self) -> impl Iterator<Item = (FuncId, &FunctionData)> {
        self.functions
            .iter()
            .enumerate()
            .map(|(i, f)| (FuncId::new(i as u32), f))
    }

    /// Append another arena, rewriting its internal indices.
    ///
    /// `sym_base` is where the other arena's symbol table will land when the
    /// caller merges symbol tables (pass 0 when the sub-parse had none).
    /// Ids the caller retained from `other` (its root node, its function
    /// ids) must be relocated through the returned [`SpliceMap`].
    pub fn splice(&mut self, other: NodeArena, sym_base: u32) -> SpliceMap {
        #[allow(clippy::cast_possible_truncation)] // push() enforces u32 bounds
        let map = SpliceMap {
            node_base: self.nodes.len() as u32,
            list_base: self.lists.len() as u32,
            func_base: self.functions.len() as u32,
            sym_base,
        };

        self.nodes.reserve(other.nodes.len());
        for mut node in other.nodes {
            remap_kind(&mut node.kind, &map);
            self.nodes.push(node);
        }

        self.lists.reserve(other.lists.len());
        for id in other.lists {
            self.lists.push(map.node(id));
        }

        self.functions.reserve(other.functions.len());
        for mut func in other.functions {
            func.sym = map.sym(func.sym);
            func.params = map.range(func.params);
            func.body = map.node(func.body);
            func.parent = map.func(func.parent);
            self.functions.push(func);
        }

        map
    }

    /// Collect the direct child node ids of `id`, in source order.
    ///
    /// Used by the binder's tree walk and by structural tests.
    pub fn child_nodes(&self, id: NodeId, out: &mut Vec<NodeId>) {
        fn push(out: &mut Vec<NodeId>, n: NodeId) {
            if n.is_valid() {
                out.push(n);
            }
        }
        fn push_opt(out: &mut Vec<NodeId>, n: Option<NodeId>) {
            if let Some(n) = n {
                push(out, n);
            }
        }
        match &self.get(id).kind {
            NodeKind::Null
            | NodeKind::Bool(_)
            | NodeKind::Number(_)
            | NodeKind::BigInt(_)
            | NodeKind::Str(_)
            | NodeKind::Regex { .. }
            | NodeKind::TemplateChunk { .. }
            | NodeKind::Ident { .. }
            | NodeKind::PrivateName(_)
            | NodeKind::This
            | NodeKind::SuperBase
            | NodeKind::NewTarget
            | NodeKind::ImportMeta
            | NodeKind::Elision
            | NodeKind::Empty
            | NodeKind::Continue { .. }
            | NodeKind::Break { .. }
            | NodeKind::Debugger
            | NodeKind::ExportSpec { .. }
            | NodeKind::ExportAll { .. } => {}

            NodeKind::Template { chunks, exprs } => {
                out.extend_from_slice(self.get_list(*chunks));
                out.extend_from_slice(self.get_list(*exprs));
            }
            NodeKind::TaggedTemplate { tag, quasi } => {
                push(out, *tag);
                push(out, *quasi);
            }
            NodeKind::Array { elems }
            | NodeKind::ArrayPattern { elems } => out.extend_from_slice(self.get_list(*elems)),
            NodeKind::Object { props }
            | NodeKind::ObjectPattern { props } => out.extend_from_slice(self.get_list(*props)),
            NodeKind::Property { key, value, .. } => {
                push(out, *key);
                push(out, *value);
            }
            NodeKind::Spread { expr }
            | NodeKind::RestElement { arg: expr }
            | NodeKind::Unary { expr, .. }
            | NodeKind::Update { expr, .. }
            | NodeKind::Await { arg: expr }
            | NodeKind::Paren { expr }
            | NodeKind::ExprStmt { expr }
            | NodeKind::Throw { arg: expr }
            | NodeKind::ExportDefault { decl: expr }
            | NodeKind::ExportDecl { decl: expr } => push(out, *expr),
            NodeKind::AssignPattern { target, default } => {
                push(out, *target);
                push(out, *default);
            }
            NodeKind::Function { func } => {
                let f = self.function(*func);
                out.extend_from_slice(self.get_list(f.params));
                push(out, f.body);
            }
            NodeKind::Class { heritage, body, .. } => {
                push_opt(out, *heritage);
                out.extend_from_slice(self.get_list(*body));
            }
            NodeKind::ClassMember { key, value, .. } => {
                push(out, *key);
                push_opt(out, *value);
            }
            NodeKind::Binary { left, right, .. }
            | NodeKind::Logical { left, right, .. } => {
                push(out, *left);
                push(out, *right);
            }
            NodeKind::Assign { target, value, .. } => {
                push(out, *target);
                push(out, *value);
            }
            NodeKind::Cond { test, cons, alt } => {
                push(out, *test);
                push(out, *cons);
                push(out, *alt);
            }
            NodeKind::Call { callee, args, .. } | NodeKind::New { callee, args } => {
                push(out, *callee);
                out.extend_from_slice(self.get_list(*args));
            }
            NodeKind::Member { obj, prop, .. } => {
                push(out, *obj);
                push(out, *prop);
            }
            NodeKind::Sequence { exprs } => out.extend_from_slice(self.get_list(*exprs)),
            NodeKind::Yield { arg, .. } | NodeKind::Return { arg } => push_opt(out, *arg),
            NodeKind::Program { body } | NodeKind::Block { body } => {
                out.extend_from_slice(self.get_list(*body));
            }
            NodeKind::VarDecl { decls, .. } => out.extend_from_slice(self.get_list(*decls)),
            NodeKind::VarDeclarator { pattern, init } => {
                push(out, *pattern);
                push_opt(out, *init);
            }
            NodeKind::If { test, cons, alt } => {
                push(out, *test);
                push(out, *cons);
                push_opt(out, *alt);
            }
            NodeKind::For {
                init,
                test,
                update,
                body,
            } => {
                push_opt(out, *init);
                push_opt(out, *test);
                push_opt(out, *update);
                push(out, *body);
            }
            NodeKind::ForIn { left, right, body }
            | NodeKind::ForOf {
                left, right, body, ..
            } => {
                push(out, *left);
                push(out, *right);
                push(out, *body);
            }
            NodeKind::While { test, body } => {
                push(out, *test);
                push(out, *body);
            }
            NodeKind::DoWhile { body, test } => {
                push(out, *body);
                push(out, *test);
            }
            NodeKind::With { obj, body } => {
                push(out, *obj);
                push(out, *body);
            }
            NodeKind::Labeled { body, .. } => push(out, *body),
            NodeKind::Switch { disc, cases } => {
                push(out, *disc);
                out.extend_from_slice(self.get_list(*cases));
            }
            NodeKind::SwitchCase { test, body } => {
                push_opt(out, *test);
                out.extend_from_slice(self.get_list(*body));
            }
            NodeKind::Try {
                block,
                handler,
                finalizer,
            } => {
                push(out, *block);
                push_opt(out, *handler);
                push_opt(out, *finalizer);
            }
            NodeKind::Catch { param, body } => {
                push_opt(out, *param);
                push(out, *body);
            }
            NodeKind::ImportDecl { specifiers, .. } => {
                out.extend_from_slice(self.get_list(*specifiers));
            }
            NodeKind::ImportSpec { local, .. } => push(out, *local),
            NodeKind::ExportNamed { specifiers, .. } => {
                out.extend_from_slice(self.get_list(*specifiers));
            }
        }
    }
}

/// Rewrite every arena index embedded in one node kind.
fn remap_kind(kind: &mut NodeKind, map: &SpliceMap) {
    let n = |id: &mut NodeId| *id = map.node(*id);
    let opt = |id: &mut Option<NodeId>| {
        if let Some(inner) = id {
            *inner = map.node(*inner);
        }
    };
    let r = |range: &mut NodeRange| *range = map.range(*range);
    match kind {
        NodeKind::Null
        | NodeKind::Bool(_)
        | NodeKind::Number(_)
        | NodeKind::BigInt(_)
        | NodeKind::Str(_)
        | NodeKind::Regex { .. }
        | NodeKind::TemplateChunk { .. }
        | NodeKind::PrivateName(_)
        | NodeKind::This
        | NodeKind::SuperBase
        | NodeKind::NewTarget
        | NodeKind::ImportMeta
        | NodeKind::Elision
        | NodeKind::Empty
        | NodeKind::Continue { .. }
        | NodeKind::Break { .. }
        | NodeKind::Debugger
        | NodeKind::ExportSpec { .. }
        | NodeKind::ExportAll { .. } => {}

        NodeKind::Ident { sym, .. } => *sym = map.sym(*sym),
        NodeKind::Template { chunks, exprs } => {
            r(chunks);
            r(exprs);
        }
        NodeKind::TaggedTemplate { tag, quasi } => {
            n(tag);
            n(quasi);
        }
        NodeKind::Array { elems } | NodeKind::ArrayPattern { elems } => r(elems),
        NodeKind::Object { props } | NodeKind::ObjectPattern { props } => r(props),
        NodeKind::Property { key, value, .. } => {
            n(key);
            n(value);
        }
        NodeKind::Spread { expr }
        | NodeKind::RestElement { arg: expr }
        | NodeKind::Unary { expr, .. }
        | NodeKind::Update { expr, .. }
        | NodeKind::Await { arg: expr }
        | NodeKind::Paren { expr }
        | NodeKind::ExprStmt { expr }
        | NodeKind::Throw { arg: expr }
        | NodeKind::ExportDefault { decl: expr }
        | NodeKind::ExportDecl { decl: expr } => n(expr),
        NodeKind::AssignPattern { target, default } => {
            n(target);
            n(default);
        }
        NodeKind::Function { func } => *func = map.func(*func),
        NodeKind::Class {
            sym,
            heritage,
            body,
            ..
        } => {
            *sym = map.sym(*sym);
            opt(heritage);
            r(body);
        }
        NodeKind::ClassMember { key, value, .. } => {
            n(key);
            opt(value);
        }
        NodeKind::Binary { left, right, .. } | NodeKind::Logical { left, right, .. } => {
            n(left);
            n(right);
        }
        NodeKind::Assign { target, value, .. } => {
            n(target);
            n(value);
        }
        NodeKind::Cond { test, cons, alt } => {
            n(test);
            n(cons);
            n(alt);
        }
        NodeKind::Call { callee, args, .. } | NodeKind::New { callee, args } => {
            n(callee);
            r(args);
        }
        NodeKind::Member { obj, prop, .. } => {
            n(obj);
            n(prop);
        }
        NodeKind::Sequence { exprs } => r(exprs),
        NodeKind::Yield { arg, .. } | NodeKind::Return { arg } => opt(arg),
        NodeKind::Program { body } | NodeKind::Block { body } => r(body),
        NodeKind::VarDecl { decls, .. } => r(decls),
        NodeKind::VarDeclarator { pattern, init } => {
            n(pattern);
            opt(init);
        }
        NodeKind::If { test, cons, alt } => {
            n(test);
            n(cons);
            opt(alt);
        }
        NodeKind::For {
            init,
            test,
            update,
            body,
        } => {
            opt(init);
            opt(test);
            opt(update);
            n(body);
        }
        NodeKind::ForIn { left, right, body }
        | NodeKind::ForOf {
            left, right, body, ..
        } => {
            n(left);
            n(right);
            n(body);
        }
        NodeKind::While { test, body } => {
            n(test);
            n(body);
        }
        NodeKind::DoWhile { body, test } => {
            n(body);
            n(test);
        }
        NodeKind::With { obj, body } => {
            n(obj);
            n(body);
        }
        NodeKind::Labeled { body, .. } => n(body),
        NodeKind::Switch { disc, cases } => {
            n(disc);
            r(cases);
        }
        NodeKind::SwitchCase { test, body } => {
            opt(test);
            r(body);
        }
        NodeKind::Try {
            block,
            handler,
            finalizer,
        } => {
            n(block);
            opt(handler);
            opt(finalizer);
        }
        NodeKind::Catch { param, body } => {
            opt(param);
            n(body);
        }
        NodeKind::ImportDecl { specifiers, .. } => r(specifiers),
        NodeKind::ImportSpec { local, .. } => n(local),
        NodeKind::ExportNamed { specifiers, .. } => r(specifiers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::function::{FunctionFlags, ParseState};
    use crate::ast::operators::BinaryOp;
    use crate::symbol::SymbolId;
    use crate::Name;
    use pretty_assertions::assert_eq;

    fn num(arena: &mut NodeArena, v: f64, at: u32) -> NodeId {
        arena.push(NodeKind::Number(v.to_bits()), Span::new(at, at + 1))
    }

    #[test]
    fn test_push_and_get() {
        let mut arena = NodeArena::new();
        let a = num(&mut arena, 1.0, 0);
        let b = num(&mut arena, 2.0, 2);
        let add = arena.push(
            NodeKind::Binary {
                op: BinaryOp::Add,
                left: a,
                right: b,
            },
            Span::new(0, 3),
        );
        assert_eq!(arena.node_count(), 3);
        match arena.get(add).kind {
            NodeKind::Binary { left, right, .. } => {
                assert_eq!(left, a);
                assert_eq!(right, b);
            }
            ref other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_list_roundtrip() {
        let mut arena = NodeArena::new();
        let a = num(&mut arena, 1.0, 0);
        let b = num(&mut arena, 2.0, 2);
        let range = arena.push_list(&[a, b]);
        assert_eq!(arena.get_list(range), &[a, b]);
        assert_eq!(arena.push_list(&[]), NodeRange::EMPTY);
    }

    #[test]
    fn test_splice_remaps_ids() {
        let mut main = NodeArena::new();
        // Occupy some slots so bases are nonzero.
        num(&mut main, 0.0, 0);
        num(&mut main, 0.0, 0);

        let mut sub = NodeArena::new();
        let a = num(&mut sub, 1.0, 10);
        let b = num(&mut sub, 2.0, 12);
        let args = sub.push_list(&[a, b]);
        let callee = sub.push(
            NodeKind::Ident {
                name: Name::EMPTY,
                sym: SymbolId::INVALID,
            },
            Span::new(8, 9),
        );
        let call = sub.push(
            NodeKind::Call {
                callee,
                args,
                optional: false,
            },
            Span::new(8, 13),
        );

        let map = main.splice(sub, 0);
        let call = map.node(call);
        match main.get(call).kind {
            NodeKind::Call { callee, args, .. } => {
                assert_eq!(callee, map.node(NodeId::new(2)));
                let children = main.get_list(args);
                assert_eq!(children, &[map.node(a), map.node(b)]);
                for &c in children {
                    assert!(matches!(main.get(c).kind, NodeKind::Number(_)));
                }
            }
            ref other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_splice_remaps_functions() {
        let mut main = NodeArena::new();
        main.push_function(FunctionData::new(0, FunctionFlags::empty(), FuncId::INVALID));

        let mut sub = NodeArena::new();
        let body = sub.push(NodeKind::Block { body: NodeRange::EMPTY }, Span::new(4, 6));
        let mut data = FunctionData::new(0, FunctionFlags::ARROW, FuncId::INVALID);
        data.body = body;
        data.state = ParseState::FullyParsed;
        let func = sub.push_function(data);
        let node = sub.push(NodeKind::Function { func }, Span::new(0, 6));

        let map = main.splice(sub, 0);
        assert_eq!(map.func_base, 1);
        let node = map.node(node);
        match main.get(node).kind {
            NodeKind::Function { func } => {
                let f = main.function(func);
                assert_eq!(f.body, map.node(body));
                assert!(f.is_parsed());
            }
            ref other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_child_nodes() {
        let mut arena = NodeArena::new();
        let test = num(&mut arena, 1.0, 4);
        let cons = arena.push(NodeKind::Block { body: NodeRange::EMPTY }, Span::new(7, 9));
        let stmt = arena.push(
            NodeKind::If {
                test,
                cons,
                alt: None,
            },
            Span::new(0, 9),
        );
        let mut children = Vec::new();
        arena.child_nodes(stmt, &mut children);
        assert_eq!(children, vec![test, cons]);
    }
}
