//! Statement grammar tests: declarations, control flow, labels, and
//! automatic semicolon insertion.

use pretty_assertions::assert_eq;
use vireo_diagnostic::ErrorCode;
use vireo_ir::{NodeKind, VarKind};

use super::{expr_stmt, function_named, parse_err, parse_ok, top_stmts};

#[test]
fn test_var_declaration_with_multiple_declarators() {
    let (_, result) = parse_ok("var a = 1, b, c = 3;");
    let stmt = top_stmts(&result)[0];
    let NodeKind::VarDecl {
        kind: VarKind::Var,
        decls,
    } = result.arena.get(stmt).kind
    else {
        panic!("expected var declaration");
    };
    let ids = result.arena.get_list(decls).to_vec();
    assert_eq!(ids.len(), 3);
    assert!(matches!(
        result.arena.get(ids[1]).kind,
        NodeKind::VarDeclarator { init: None, .. }
    ));
}

#[test]
fn test_const_requires_initializer() {
    parse_ok("const x = 1;");
    assert_eq!(parse_err("const x;").code, ErrorCode::E1001);
}

#[test]
fn test_destructuring_declaration_requires_initializer() {
    parse_ok("let [a, b] = pair;");
    assert_eq!(parse_err("let [a, b];").code, ErrorCode::E1006);
}

#[test]
fn test_if_else() {
    let (_, result) = parse_ok("if (a) b; else c;");
    let stmt = top_stmts(&result)[0];
    assert!(matches!(
        result.arena.get(stmt).kind,
        NodeKind::If { alt: Some(_), .. }
    ));
}

#[test]
fn test_while_and_do_while() {
    let (_, result) = parse_ok("while (a) b; do c; while (d);");
    let stmts = top_stmts(&result);
    assert!(matches!(result.arena.get(stmts[0]).kind, NodeKind::While { .. }));
    assert!(matches!(
        result.arena.get(stmts[1]).kind,
        NodeKind::DoWhile { .. }
    ));
}

#[test]
fn test_classic_for() {
    let (_, result) = parse_ok("for (var i = 0; i < 10; i++) body();");
    let stmt = top_stmts(&result)[0];
    assert!(matches!(
        result.arena.get(stmt).kind,
        NodeKind::For {
            init: Some(_),
            test: Some(_),
            update: Some(_),
            ..
        }
    ));
}

#[test]
fn test_for_with_empty_clauses() {
    let (_, result) = parse_ok("for (;;) break;");
    let stmt = top_stmts(&result)[0];
    assert!(matches!(
        result.arena.get(stmt).kind,
        NodeKind::For {
            init: None,
            test: None,
            update: None,
            ..
        }
    ));
}

#[test]
fn test_for_in_and_for_of() {
    let (_, result) = parse_ok("for (var k in obj) f(k); for (const v of xs) g(v);");
    let stmts = top_stmts(&result);
    assert!(matches!(result.arena.get(stmts[0]).kind, NodeKind::ForIn { .. }));
    assert!(matches!(
        result.arena.get(stmts[1]).kind,
        NodeKind::ForOf {
            is_await: false,
            ..
        }
    ));
}

#[test]
fn test_for_await_in_async_function() {
    let (interner, result) = parse_ok("async function f(it) { for await (const x of it) use(x); }");
    let (_, data) = function_named(&result, &interner, "f");
    let NodeKind::Block { body } = result.arena.get(data.body).kind else {
        panic!("expected block body");
    };
    let stmt = result.arena.get_list(body)[0];
    assert!(matches!(
        result.arena.get(stmt).kind,
        NodeKind::ForOf { is_await: true, .. }
    ));
}

#[test]
fn test_for_head_errors() {
    assert_eq!(parse_err("for (const x;;);").code, ErrorCode::E1018);
    assert_eq!(parse_err("for (1 in obj);").code, ErrorCode::E1018);
    // A destructuring head claims the shorthand initializer.
    parse_ok("for ({a = 1} in obj) ;");
    assert_eq!(parse_err("for ({a = 1};;);").code, ErrorCode::E1006);
}

#[test]
fn test_switch_cases() {
    let (_, result) = parse_ok("switch (x) { case 1: a(); break; default: b(); }");
    let stmt = top_stmts(&result)[0];
    let NodeKind::Switch { cases, .. } = result.arena.get(stmt).kind else {
        panic!("expected switch");
    };
    let ids = result.arena.get_list(cases).to_vec();
    assert_eq!(ids.len(), 2);
    assert!(matches!(
        result.arena.get(ids[1]).kind,
        NodeKind::SwitchCase { test: None, .. }
    ));
}

#[test]
fn test_switch_rejects_two_defaults() {
    let err = parse_err("switch (x) { default: a(); default: b(); }");
    assert_eq!(err.code, ErrorCode::E1001);
}

#[test]
fn test_try_forms() {
    let (_, result) = parse_ok("try { a(); } catch (e) { b(e); } finally { c(); }");
    let stmt = top_stmts(&result)[0];
    let NodeKind::Try {
        handler: Some(handler),
        finalizer: Some(_),
        ..
    } = result.arena.get(stmt).kind
    else {
        panic!("expected full try statement");
    };
    assert!(matches!(
        result.arena.get(handler).kind,
        NodeKind::Catch { param: Some(_), .. }
    ));

    // Optional catch binding.
    let (_, result) = parse_ok("try { a(); } catch { b(); }");
    let stmt = top_stmts(&result)[0];
    let NodeKind::Try {
        handler: Some(handler),
        ..
    } = result.arena.get(stmt).kind
    else {
        panic!("expected try/catch");
    };
    assert!(matches!(
        result.arena.get(handler).kind,
        NodeKind::Catch { param: None, .. }
    ));
}

#[test]
fn test_try_requires_handler_or_finalizer() {
    assert_eq!(parse_err("try { a(); }").code, ErrorCode::E1001);
}

#[test]
fn test_throw_argument_must_start_on_same_line() {
    parse_ok("throw err;");
    assert_eq!(parse_err("throw\nerr;").code, ErrorCode::E1017);
}

#[test]
fn test_return_outside_function() {
    assert_eq!(parse_err("return 1;").code, ErrorCode::E1008);
    parse_ok("function f() { return 1; }");
}

#[test]
fn test_break_and_continue_placement() {
    parse_ok("while (a) { break; }");
    parse_ok("while (a) { continue; }");
    assert_eq!(parse_err("break;").code, ErrorCode::E1009);
    assert_eq!(parse_err("continue;").code, ErrorCode::E1009);
    // Break is fine inside switch, continue is not.
    parse_ok("switch (x) { default: break; }");
    assert_eq!(
        parse_err("switch (x) { default: continue; }").code,
        ErrorCode::E1009
    );
}

#[test]
fn test_labeled_loops() {
    let (_, result) = parse_ok("outer: while (a) { continue outer; }");
    let stmt = top_stmts(&result)[0];
    assert!(matches!(result.arena.get(stmt).kind, NodeKind::Labeled { .. }));

    // A chain of labels on one loop are all continue targets.
    parse_ok("a: b: while (x) { continue a; continue b; }");
    // Break may target any label, continue only loop labels.
    parse_ok("block: { break block; }");
    assert_eq!(
        parse_err("block: { continue block; }").code,
        ErrorCode::E1009
    );
}

#[test]
fn test_unknown_and_duplicate_labels() {
    assert_eq!(
        parse_err("while (a) { break missing; }").code,
        ErrorCode::E1009
    );
    assert_eq!(
        parse_err("dup: while (a) { dup: b(); }").code,
        ErrorCode::E1010
    );
}

#[test]
fn test_with_statement() {
    let (_, result) = parse_ok("with (obj) { f(); }");
    let stmt = top_stmts(&result)[0];
    assert!(matches!(result.arena.get(stmt).kind, NodeKind::With { .. }));
    assert_eq!(
        parse_err("\"use strict\"; with (obj) {}").code,
        ErrorCode::E1013
    );
}

#[test]
fn test_semicolon_insertion_at_newline() {
    let (_, result) = parse_ok("x = 1\ny = 2");
    assert_eq!(top_stmts(&result).len(), 2);
}

#[test]
fn test_missing_semicolon_on_same_line() {
    assert_eq!(parse_err("x = 1 y = 2").code, ErrorCode::E1007);
}

#[test]
fn test_empty_and_debugger_statements() {
    let (_, result) = parse_ok(";; debugger;");
    let stmts = top_stmts(&result);
    assert_eq!(stmts.len(), 3);
    assert!(matches!(result.arena.get(stmts[0]).kind, NodeKind::Empty));
    assert!(matches!(result.arena.get(stmts[2]).kind, NodeKind::Debugger));
}

#[test]
fn test_sloppy_let_as_identifier() {
    let (_, result) = parse_ok("let = 5;");
    let expr = expr_stmt(&result, 0);
    assert!(matches!(result.arena.get(expr).kind, NodeKind::Assign { .. }));
    assert_eq!(parse_err("\"use strict\"; let = 5;").code, ErrorCode::E1014);
}

#[test]
fn test_directive_prologue_sets_strict() {
    // Strict only applies when the directive is first in the prologue.
    assert_eq!(parse_err("\"use strict\"; with (x) {}").code, ErrorCode::E1013);
    parse_ok("f(); \"use strict\"; with (x) {}");
}
