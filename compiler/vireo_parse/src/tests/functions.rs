//! Function forms: declarations, expressions, arrows, parameter rules,
//! and strict-mode validation.

use pretty_assertions::assert_eq;
use vireo_diagnostic::ErrorCode;
use vireo_ir::{FunctionFlags, NodeKind, ParseState, SymbolKind};

use super::{function_named, parse_err, parse_ok, symbol_named};

#[test]
fn test_function_declaration() {
    let (interner, result) = parse_ok("function add(a, b) { return a + b; }");
    let (_, data) = function_named(&result, &interner, "add");
    assert!(data.flags.contains(FunctionFlags::DECLARATION));
    assert!(data.flags.contains(FunctionFlags::SIMPLE_PARAMS));
    assert_eq!(data.state, ParseState::FullyParsed);
    assert_eq!(result.arena.get_list(data.params).len(), 2);

    let (_, sym) = symbol_named(&result, &interner, "add");
    assert_eq!(sym.kind, SymbolKind::FunctionDecl);
}

#[test]
fn test_named_function_expression_sees_its_own_name() {
    let (interner, result) = parse_ok("(function rec() { return rec; });");
    let (_, sym) = symbol_named(&result, &interner, "rec");
    assert_eq!(sym.kind, SymbolKind::FunctionExprName);
}

#[test]
fn test_arrow_with_expression_body() {
    let (interner, result) = parse_ok("let f = x => x + 1;");
    let (_, data) = result
        .arena
        .functions()
        .find(|(_, d)| d.flags.contains(FunctionFlags::ARROW))
        .map(|(id, d)| (id, d.clone()))
        .unwrap_or_else(|| panic!("no arrow function"));
    assert!(data.flags.contains(FunctionFlags::EXPR_BODY));
    assert_eq!(data.state, ParseState::FullyParsed);

    let (_, param) = symbol_named(&result, &interner, "x");
    assert_eq!(param.kind, SymbolKind::Param);
}

#[test]
fn test_arrow_default_sees_earlier_parameter() {
    let (interner, result) = parse_ok("let f = (a, b = a) => b;");
    let (a_id, a_sym) = symbol_named(&result, &interner, "a");
    assert_eq!(a_sym.kind, SymbolKind::Param);

    let (_, data) = result
        .arena
        .functions()
        .find(|(_, d)| d.flags.contains(FunctionFlags::ARROW))
        .map(|(id, d)| (id, d.clone()))
        .unwrap_or_else(|| panic!("no arrow function"));
    let params = result.arena.get_list(data.params).to_vec();
    assert_eq!(params.len(), 2);
    let NodeKind::AssignPattern { default, .. } = result.arena.get(params[1]).kind
    else {
        panic!("expected defaulted parameter");
    };
    let NodeKind::Ident { sym, .. } = result.arena.get(default).kind else {
        panic!("expected identifier default");
    };
    assert_eq!(sym, a_id);
}

#[test]
fn test_arrow_with_pattern_parameters() {
    let (_, result) = parse_ok("let f = ({a, b}, [c]) => a + b + c;");
    let (_, data) = result
        .arena
        .functions()
        .find(|(_, d)| d.flags.contains(FunctionFlags::ARROW))
        .map(|(id, d)| (id, d.clone()))
        .unwrap_or_else(|| panic!("no arrow function"));
    let params = result.arena.get_list(data.params).to_vec();
    assert!(matches!(
        result.arena.get(params[0]).kind,
        NodeKind::ObjectPattern { .. }
    ));
    assert!(matches!(
        result.arena.get(params[1]).kind,
        NodeKind::ArrayPattern { .. }
    ));
}

#[test]
fn test_duplicate_parameters() {
    // Sloppy mode with a simple list tolerates duplicates.
    parse_ok("function f(a, a) {}");
    assert_eq!(
        parse_err("\"use strict\"; function f(a, a) {}").code,
        ErrorCode::E2001
    );
    assert_eq!(parse_err("let f = (a, a) => a;").code, ErrorCode::E2001);
    // A non-simple list makes duplicates an error even in sloppy mode.
    assert_eq!(parse_err("function f(a, [a]) {}").code, ErrorCode::E2001);
    assert_eq!(parse_err("function f(a, a = 1) {}").code, ErrorCode::E2001);
}

#[test]
fn test_strict_mode_restricted_parameter_names() {
    assert_eq!(
        parse_err("\"use strict\"; function f(eval) {}").code,
        ErrorCode::E2003
    );
    assert_eq!(
        parse_err("\"use strict\"; var arguments = 1;").code,
        ErrorCode::E2003
    );
    parse_ok("function f(eval) {}");
}

#[test]
fn test_use_strict_directive_revalidates_parameters() {
    assert_eq!(
        parse_err("function f(a, a) { \"use strict\"; }").code,
        ErrorCode::E2001
    );
    // Directive in a body with non-simple parameters is itself an error.
    assert_eq!(
        parse_err("function f(a = 1) { \"use strict\"; }").code,
        ErrorCode::E1013
    );
}

#[test]
fn test_rest_parameter() {
    let (interner, result) = parse_ok("function f(first, ...rest) {}");
    let (_, data) = function_named(&result, &interner, "f");
    assert!(!data.flags.contains(FunctionFlags::SIMPLE_PARAMS));
    let params = result.arena.get_list(data.params).to_vec();
    assert!(matches!(
        result.arena.get(params[1]).kind,
        NodeKind::RestElement { .. }
    ));
}

#[test]
fn test_rest_parameter_must_be_last() {
    assert_eq!(parse_err("function f(...r, x) {}").code, ErrorCode::E1011);
    assert_eq!(parse_err("let f = (...r = []) => r;").code, ErrorCode::E1011);
}

#[test]
fn test_generator_yield() {
    let (interner, result) = parse_ok("function* g() { yield 1; yield* rest; }");
    let (_, data) = function_named(&result, &interner, "g");
    assert!(data.flags.contains(FunctionFlags::GENERATOR));
    let NodeKind::Block { body } = result.arena.get(data.body).kind else {
        panic!("expected block body");
    };
    let stmts = result.arena.get_list(body).to_vec();
    let first = match result.arena.get(stmts[0]).kind {
        NodeKind::ExprStmt { expr } => expr,
        ref other => panic!("not an expression statement: {other:?}"),
    };
    assert!(matches!(
        result.arena.get(first).kind,
        NodeKind::Yield {
            arg: Some(_),
            delegate: false,
        }
    ));
    let second = match result.arena.get(stmts[1]).kind {
        NodeKind::ExprStmt { expr } => expr,
        ref other => panic!("not an expression statement: {other:?}"),
    };
    assert!(matches!(
        result.arena.get(second).kind,
        NodeKind::Yield { delegate: true, .. }
    ));
}

#[test]
fn test_yield_is_not_a_binding_name_in_generators() {
    assert_eq!(parse_err("function* g(yield) {}").code, ErrorCode::E1020);
    // Plain sloppy functions may still use it.
    parse_ok("function f(yield) { return yield; }");
}

#[test]
fn test_async_function_and_await() {
    let (interner, result) = parse_ok("async function f(p) { return await p; }");
    let (_, data) = function_named(&result, &interner, "f");
    assert!(data.flags.contains(FunctionFlags::ASYNC));

    // Outside async, `await` is an ordinary identifier in scripts.
    parse_ok("var await = 1; await;");
    assert_eq!(
        parse_err("async function f(await) {}").code,
        ErrorCode::E1020
    );
}

#[test]
fn test_async_arrow() {
    let (_, result) = parse_ok("let f = async x => await x;");
    let (_, data) = result
        .arena
        .functions()
        .find(|(_, d)| d.flags.contains(FunctionFlags::ARROW))
        .map(|(id, d)| (id, d.clone()))
        .unwrap_or_else(|| panic!("no arrow function"));
    assert!(data.flags.contains(FunctionFlags::ASYNC));
}

#[test]
fn test_eval_and_arguments_references_flagged() {
    let (interner, result) = parse_ok("function f(code) { eval(code); return arguments[0]; }");
    let (_, data) = function_named(&result, &interner, "f");
    assert!(data.flags.contains(FunctionFlags::CALLS_EVAL));
    assert!(data.flags.contains(FunctionFlags::USES_ARGUMENTS));
}

#[test]
fn test_method_body_keeps_arguments_flag() {
    let (_, result) = parse_ok("({ m() { return arguments[0]; } });");
    let (_, data) = result
        .arena
        .functions()
        .find(|(_, d)| d.flags.contains(FunctionFlags::METHOD))
        .map(|(id, d)| (id, d.clone()))
        .unwrap_or_else(|| panic!("no method"));
    assert!(data.flags.contains(FunctionFlags::USES_ARGUMENTS));
    assert!(data.flags.contains(FunctionFlags::METHOD));
}

#[test]
fn test_arrow_body_keeps_eval_flag() {
    let (_, result) = parse_ok("let f = code => eval(code);");
    let (_, data) = result
        .arena
        .functions()
        .find(|(_, d)| d.flags.contains(FunctionFlags::ARROW))
        .map(|(id, d)| (id, d.clone()))
        .unwrap_or_else(|| panic!("no arrow function"));
    assert!(data.flags.contains(FunctionFlags::CALLS_EVAL));
}

#[test]
fn test_object_accessor_arity() {
    parse_ok("({ get g() { return 1; }, set s(v) {} });");
    assert_eq!(parse_err("({ get g(a) {} });").code, ErrorCode::E1016);
    assert_eq!(parse_err("({ set s() {} });").code, ErrorCode::E1016);
    assert_eq!(parse_err("({ set s(a, b) {} });").code, ErrorCode::E1016);
}

#[test]
fn test_arrow_conversion_claims_shorthand_initializer() {
    // `{a = 1}` becomes a defaulted binding once `=>` is seen.
    parse_ok("let f = ({a = 1}) => a;");
}
