//! Scope resolution tests: hoisting, shadowing, capture, and
//! use-before-declaration checks.

use pretty_assertions::assert_eq;
use vireo_diagnostic::ErrorCode;
use vireo_ir::{NodeKind, SymbolFlags, SymbolId, SymbolKind};

use super::{expr_stmt, function_named, parse_err, parse_ok, symbol_named};

fn ident_sym(result: &crate::ParseResult, id: vireo_ir::NodeId) -> SymbolId {
    match result.arena.get(id).kind {
        NodeKind::Ident { sym, .. } => sym,
        ref other => panic!("not an identifier: {other:?}"),
    }
}

#[test]
fn test_reference_resolves_to_let_binding() {
    let (interner, result) = parse_ok("let x = 1; x;");
    let (x_id, x_sym) = symbol_named(&result, &interner, "x");
    assert_eq!(x_sym.kind, SymbolKind::Let);
    assert_eq!(ident_sym(&result, expr_stmt(&result, 1)), x_id);
}

#[test]
fn test_var_hoists_out_of_blocks() {
    let (interner, result) = parse_ok("{ var x = 1; } x;");
    let (x_id, x_sym) = symbol_named(&result, &interner, "x");
    assert_eq!(x_sym.kind, SymbolKind::Var);
    assert_eq!(ident_sym(&result, expr_stmt(&result, 1)), x_id);
}

#[test]
fn test_function_declaration_is_visible_before_its_statement() {
    let (interner, result) = parse_ok("f(); function f() {}");
    let (f_id, _) = symbol_named(&result, &interner, "f");
    let call = expr_stmt(&result, 0);
    let NodeKind::Call { callee, .. } = result.arena.get(call).kind else {
        panic!("expected call");
    };
    assert_eq!(ident_sym(&result, callee), f_id);
}

#[test]
fn test_lexical_use_before_declaration() {
    assert_eq!(parse_err("x; let x = 1;").code, ErrorCode::E2002);
    assert_eq!(parse_err("{ x; } let x = 1;").code, ErrorCode::E2002);
    assert_eq!(parse_err("C; class C {}").code, ErrorCode::E2002);
    // `var` has no such restriction.
    parse_ok("x; var x = 1;");
}

#[test]
fn test_forward_reference_from_nested_function_is_allowed() {
    let (interner, result) = parse_ok("function g() { return x; } let x = 1;");
    let (_, x_sym) = symbol_named(&result, &interner, "x");
    assert!(x_sym.flags.contains(SymbolFlags::CAPTURED));
}

#[test]
fn test_redeclaration_errors() {
    assert_eq!(parse_err("let x; let x;").code, ErrorCode::E2001);
    assert_eq!(parse_err("let x; var x;").code, ErrorCode::E2001);
    assert_eq!(parse_err("var x; let x;").code, ErrorCode::E2001);
    assert_eq!(parse_err("const x = 1; function x() {}").code, ErrorCode::E2001);
    parse_ok("var x; var x;");
}

#[test]
fn test_var_rebinds_parameter() {
    let (interner, result) = parse_ok("function f(a) { var a; }");
    // One binding only; the `var` folds into the parameter.
    let (_, sym) = symbol_named(&result, &interner, "a");
    assert_eq!(sym.kind, SymbolKind::Param);
}

#[test]
fn test_block_shadowing() {
    let (interner, result) = parse_ok("let x = 1; { let x = 2; }");
    let want = interner.intern("x");
    let count = result
        .symbols
        .iter()
        .filter(|(_, s)| s.name == want)
        .count();
    assert_eq!(count, 2);
}

#[test]
fn test_var_hidden_by_inner_lexical() {
    let (interner, result) = parse_ok("function f() { var x; { let x; } }");
    let want = interner.intern("x");
    let hidden = result
        .symbols
        .iter()
        .find(|(_, s)| s.name == want && s.kind == SymbolKind::Var)
        .map(|(_, s)| s.flags)
        .unwrap_or_else(|| panic!("no var binding"));
    assert!(hidden.contains(SymbolFlags::HIDDEN_BY_LEXICAL));
}

#[test]
fn test_capture_marks_symbol_and_owner() {
    let (interner, result) =
        parse_ok("function outer() { let v = 1; function inner() { return v; } }");
    let (_, v_sym) = symbol_named(&result, &interner, "v");
    assert!(v_sym.flags.contains(SymbolFlags::CAPTURED));
    let (_, outer) = function_named(&result, &interner, "outer");
    assert!(outer
        .flags
        .contains(vireo_ir::FunctionFlags::HAS_CAPTURED_BINDINGS));
    let (_, inner) = function_named(&result, &interner, "inner");
    assert!(!inner
        .flags
        .contains(vireo_ir::FunctionFlags::HAS_CAPTURED_BINDINGS));
}

#[test]
fn test_assignment_marks_symbol() {
    let (interner, result) = parse_ok("let x; x = 1; let y; y;");
    let (_, x_sym) = symbol_named(&result, &interner, "x");
    assert!(x_sym.flags.contains(SymbolFlags::ASSIGNED));
    let (_, y_sym) = symbol_named(&result, &interner, "y");
    assert!(!y_sym.flags.contains(SymbolFlags::ASSIGNED));
}

#[test]
fn test_catch_parameter_scope() {
    let (interner, result) = parse_ok("try {} catch (e) { e; }");
    let (_, e_sym) = symbol_named(&result, &interner, "e");
    assert_eq!(e_sym.kind, SymbolKind::CatchParam);
}

#[test]
fn test_free_references_stay_unresolved() {
    let (_, result) = parse_ok("missing;");
    assert_eq!(ident_sym(&result, expr_stmt(&result, 0)), SymbolId::INVALID);
    assert!(result.symbols.is_empty());
}

#[test]
fn test_loop_head_binding_scopes_over_body() {
    let (interner, result) = parse_ok("for (let i = 0; i < 3; i++) use(i);");
    let (_, i_sym) = symbol_named(&result, &interner, "i");
    assert_eq!(i_sym.kind, SymbolKind::Let);
}
