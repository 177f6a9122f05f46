//! Parser tests.
//!
//! Tests are organized into modules by grammar area:
//! - `exprs`: expressions, operator precedence, optional chaining, templates
//! - `stmts`: statements, automatic semicolon insertion, labels, loops
//! - `functions`: function forms, arrows, parameter validation, strict mode
//! - `bindings`: scope resolution, hoisting, capture, use-before-declaration
//! - `classes`: class declarations, members, constructor rules
//! - `modules`: import/export parsing and placement
//! - `deferred`: deferral policy, on-demand completion, and the worker pool
//! - `props`: property tests pinning deferral and parallelism transparency

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod bindings;
mod classes;
mod exprs;
mod functions;
mod modules;
mod props;
mod stmts;

use vireo_ir::{FuncId, FunctionData, NodeId, NodeKind, StringInterner, Symbol, SymbolId};

use crate::{parse_module, parse_program, ParseError, ParseOptions, ParseResult};

/// Parse a script with deferral off, asserting success.
fn parse_ok(source: &str) -> (StringInterner, ParseResult) {
    let interner = StringInterner::new();
    let result = parse_program(source, &interner, &ParseOptions::eager());
    assert!(
        result.error.is_none(),
        "unexpected error for {source:?}: {:?}",
        result.error
    );
    (interner, result)
}

/// Parse a script with deferral off, asserting failure.
fn parse_err(source: &str) -> ParseError {
    let interner = StringInterner::new();
    let result = parse_program(source, &interner, &ParseOptions::eager());
    result
        .error
        .unwrap_or_else(|| panic!("expected an error for {source:?}"))
}

fn module_ok(source: &str) -> (StringInterner, ParseResult) {
    let interner = StringInterner::new();
    let options = ParseOptions {
        defer_enabled: false,
        ..ParseOptions::module()
    };
    let result = parse_module(source, &interner, &options);
    assert!(
        result.error.is_none(),
        "unexpected error for {source:?}: {:?}",
        result.error
    );
    (interner, result)
}

fn module_err(source: &str) -> ParseError {
    let interner = StringInterner::new();
    let options = ParseOptions {
        defer_enabled: false,
        ..ParseOptions::module()
    };
    let result = parse_module(source, &interner, &options);
    result
        .error
        .unwrap_or_else(|| panic!("expected an error for {source:?}"))
}

/// Top-level statement ids of a successful parse.
fn top_stmts(result: &ParseResult) -> Vec<NodeId> {
    match result.arena.get(result.root).kind {
        NodeKind::Program { body } => result.arena.get_list(body).to_vec(),
        ref other => panic!("root is not a program: {other:?}"),
    }
}

/// Expression of the index-th top-level statement.
fn expr_stmt(result: &ParseResult, index: usize) -> NodeId {
    let stmt = top_stmts(result)[index];
    match result.arena.get(stmt).kind {
        NodeKind::ExprStmt { expr } => expr,
        ref other => panic!("not an expression statement: {other:?}"),
    }
}

/// The unique symbol with the given name.
fn symbol_named(
    result: &ParseResult,
    interner: &StringInterner,
    name: &str,
) -> (SymbolId, Symbol) {
    let want = interner.intern(name);
    let mut found = None;
    for (id, sym) in result.symbols.iter() {
        if sym.name == want {
            assert!(found.is_none(), "more than one symbol named {name}");
            found = Some((id, sym.clone()));
        }
    }
    found.unwrap_or_else(|| panic!("no symbol named {name}"))
}

/// Every occurrence of `name` as an identifier node, in source order,
/// paired with the symbol it resolved to (`SymbolId::INVALID` for free
/// references).
fn ident_refs(
    result: &ParseResult,
    interner: &StringInterner,
    name: &str,
) -> Vec<(u32, SymbolId)> {
    let want = interner.intern(name);
    let mut refs = Vec::new();
    let mut stack = vec![result.root];
    let mut children = Vec::new();
    while let Some(id) = stack.pop() {
        let node = result.arena.get(id);
        if let NodeKind::Ident { name, sym } = node.kind {
            if name == want {
                refs.push((node.span.start, sym));
            }
        }
        children.clear();
        result.arena.child_nodes(id, &mut children);
        stack.extend(children.iter().copied());
    }
    refs.sort_unstable_by_key(|&(start, _)| start);
    refs
}

/// The first function record with the given name.
fn function_named(
    result: &ParseResult,
    interner: &StringInterner,
    name: &str,
) -> (FuncId, FunctionData) {
    let want = interner.intern(name);
    for (id, data) in result.arena.functions() {
        if data.name == Some(want) {
            return (id, data.clone());
        }
    }
    panic!("no function named {name}")
}
