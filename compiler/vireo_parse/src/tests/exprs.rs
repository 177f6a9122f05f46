//! Expression grammar tests: precedence, assignment targets, optional
//! chains, templates, and the literal forms.

use pretty_assertions::assert_eq;
use vireo_diagnostic::ErrorCode;
use vireo_ir::{
    AssignOp, BinaryOp, LogicalOp, NodeKind, PropertyKind, UnaryOp, UpdateOp,
};

use super::{expr_stmt, parse_err, parse_ok, top_stmts};

fn number(result: &crate::ParseResult, id: vireo_ir::NodeId) -> f64 {
    match result.arena.get(id).kind {
        NodeKind::Number(bits) => f64::from_bits(bits),
        ref other => panic!("not a number: {other:?}"),
    }
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let (_, result) = parse_ok("1 + 2 * 3;");
    let expr = expr_stmt(&result, 0);
    let NodeKind::Binary {
        op: BinaryOp::Add,
        left,
        right,
    } = result.arena.get(expr).kind
    else {
        panic!("expected addition at the top");
    };
    assert_eq!(number(&result, left), 1.0);
    assert!(matches!(
        result.arena.get(right).kind,
        NodeKind::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
}

#[test]
fn test_exponentiation_is_right_associative() {
    let (_, result) = parse_ok("2 ** 3 ** 2;");
    let expr = expr_stmt(&result, 0);
    let NodeKind::Binary {
        op: BinaryOp::Exp,
        left,
        right,
    } = result.arena.get(expr).kind
    else {
        panic!("expected exponentiation at the top");
    };
    assert_eq!(number(&result, left), 2.0);
    assert!(matches!(
        result.arena.get(right).kind,
        NodeKind::Binary {
            op: BinaryOp::Exp,
            ..
        }
    ));
}

#[test]
fn test_unary_operand_of_exponent_rejected() {
    let err = parse_err("-a ** b;");
    assert_eq!(err.code, ErrorCode::E1001);
}

#[test]
fn test_nullish_does_not_mix_with_logical_or() {
    assert_eq!(parse_err("a ?? b || c;").code, ErrorCode::E1001);
    assert_eq!(parse_err("a || b ?? c;").code, ErrorCode::E1001);
    // Parenthesized is fine.
    parse_ok("(a ?? b) || c;");
}

#[test]
fn test_logical_and_binds_tighter_than_or() {
    let (_, result) = parse_ok("a || b && c;");
    let expr = expr_stmt(&result, 0);
    let NodeKind::Logical {
        op: LogicalOp::Or,
        right,
        ..
    } = result.arena.get(expr).kind
    else {
        panic!("expected '||' at the top");
    };
    assert!(matches!(
        result.arena.get(right).kind,
        NodeKind::Logical {
            op: LogicalOp::And,
            ..
        }
    ));
}

#[test]
fn test_conditional_expression() {
    let (_, result) = parse_ok("a ? 1 : 2;");
    let expr = expr_stmt(&result, 0);
    let NodeKind::Cond { cons, alt, .. } = result.arena.get(expr).kind else {
        panic!("expected conditional");
    };
    assert_eq!(number(&result, cons), 1.0);
    assert_eq!(number(&result, alt), 2.0);
}

#[test]
fn test_sequence_expression() {
    let (_, result) = parse_ok("a, b, c;");
    let expr = expr_stmt(&result, 0);
    let NodeKind::Sequence { exprs } = result.arena.get(expr).kind else {
        panic!("expected sequence");
    };
    assert_eq!(result.arena.get_list(exprs).len(), 3);
}

#[test]
fn test_compound_assignment() {
    let (_, result) = parse_ok("x += 1;");
    let expr = expr_stmt(&result, 0);
    assert!(matches!(
        result.arena.get(expr).kind,
        NodeKind::Assign {
            op: AssignOp::Add,
            ..
        }
    ));
}

#[test]
fn test_literal_is_not_an_assignment_target() {
    assert_eq!(parse_err("1 = 2;").code, ErrorCode::E1005);
    assert_eq!(parse_err("a + b = c;").code, ErrorCode::E1005);
}

#[test]
fn test_array_destructuring_assignment() {
    let (_, result) = parse_ok("[a, b] = c;");
    let expr = expr_stmt(&result, 0);
    let NodeKind::Assign {
        op: AssignOp::Assign,
        target,
        ..
    } = result.arena.get(expr).kind
    else {
        panic!("expected assignment");
    };
    let NodeKind::ArrayPattern { elems } = result.arena.get(target).kind else {
        panic!("target was not reinterpreted as a pattern");
    };
    assert_eq!(result.arena.get_list(elems).len(), 2);
}

#[test]
fn test_object_destructuring_assignment_needs_parens() {
    let (_, result) = parse_ok("({x} = y);");
    let expr = expr_stmt(&result, 0);
    let NodeKind::Paren { expr: inner } = result.arena.get(expr).kind else {
        panic!("expected parenthesized expression");
    };
    let NodeKind::Assign { target, .. } = result.arena.get(inner).kind else {
        panic!("expected assignment inside parens");
    };
    assert!(matches!(
        result.arena.get(target).kind,
        NodeKind::ObjectPattern { .. }
    ));
}

#[test]
fn test_compound_assignment_rejects_pattern_target() {
    assert_eq!(parse_err("[a] += b;").code, ErrorCode::E1005);
}

#[test]
fn test_optional_member_and_call() {
    let (_, result) = parse_ok("a?.b; a?.(x); a?.[i];");
    let member = expr_stmt(&result, 0);
    assert!(matches!(
        result.arena.get(member).kind,
        NodeKind::Member { optional: true, computed: false, .. }
    ));
    let call = expr_stmt(&result, 1);
    assert!(matches!(
        result.arena.get(call).kind,
        NodeKind::Call { optional: true, .. }
    ));
    let indexed = expr_stmt(&result, 2);
    assert!(matches!(
        result.arena.get(indexed).kind,
        NodeKind::Member { optional: true, computed: true, .. }
    ));
}

#[test]
fn test_plain_member_after_optional_link() {
    let (_, result) = parse_ok("a?.b.c;");
    let outer = expr_stmt(&result, 0);
    let NodeKind::Member {
        obj,
        optional: false,
        ..
    } = result.arena.get(outer).kind
    else {
        panic!("expected non-optional outer member");
    };
    assert!(matches!(
        result.arena.get(obj).kind,
        NodeKind::Member { optional: true, .. }
    ));
}

#[test]
fn test_tagged_template_rejected_in_optional_chain() {
    assert_eq!(parse_err("a?.b`t`;").code, ErrorCode::E1012);
}

#[test]
fn test_update_expressions() {
    let (_, result) = parse_ok("x++; --y;");
    let postfix = expr_stmt(&result, 0);
    assert!(matches!(
        result.arena.get(postfix).kind,
        NodeKind::Update {
            op: UpdateOp::Inc,
            prefix: false,
            ..
        }
    ));
    let prefix = expr_stmt(&result, 1);
    assert!(matches!(
        result.arena.get(prefix).kind,
        NodeKind::Update {
            op: UpdateOp::Dec,
            prefix: true,
            ..
        }
    ));
}

#[test]
fn test_update_requires_simple_target() {
    assert_eq!(parse_err("1++;").code, ErrorCode::E1005);
    assert_eq!(parse_err("++(a + b);").code, ErrorCode::E1005);
}

#[test]
fn test_newline_detaches_postfix_update() {
    // The line break turns `x++` into two statements.
    let (_, result) = parse_ok("x\n++y;");
    let stmts = top_stmts(&result);
    assert_eq!(stmts.len(), 2);
    assert!(matches!(
        result.arena.get(expr_stmt(&result, 1)).kind,
        NodeKind::Update { prefix: true, .. }
    ));
}

#[test]
fn test_strict_mode_rejects_delete_of_variable() {
    let err = parse_err("\"use strict\"; delete x;");
    assert_eq!(err.code, ErrorCode::E1013);
    // Deleting a property is fine.
    parse_ok("\"use strict\"; delete a.b;");
}

#[test]
fn test_typeof_of_free_name() {
    let (_, result) = parse_ok("typeof missing;");
    let expr = expr_stmt(&result, 0);
    assert!(matches!(
        result.arena.get(expr).kind,
        NodeKind::Unary {
            op: UnaryOp::Typeof,
            ..
        }
    ));
}

#[test]
fn test_template_literal_chunks_and_raw_text() {
    let (interner, result) = parse_ok("`a${x}b`;");
    let expr = expr_stmt(&result, 0);
    let NodeKind::Template { chunks, exprs } = result.arena.get(expr).kind else {
        panic!("expected template");
    };
    let chunk_ids = result.arena.get_list(chunks).to_vec();
    assert_eq!(chunk_ids.len(), 2);
    assert_eq!(result.arena.get_list(exprs).len(), 1);
    let NodeKind::TemplateChunk { cooked, raw } = result.arena.get(chunk_ids[0]).kind
    else {
        panic!("expected chunk");
    };
    assert_eq!(interner.lookup(cooked), "a");
    assert_eq!(interner.lookup(raw), "a");
}

#[test]
fn test_regex_literal() {
    let (interner, result) = parse_ok("var r = /ab+c/gi;");
    let stmt = top_stmts(&result)[0];
    let NodeKind::VarDecl { decls, .. } = result.arena.get(stmt).kind else {
        panic!("expected var declaration");
    };
    let decl = result.arena.get_list(decls)[0];
    let NodeKind::VarDeclarator {
        init: Some(init), ..
    } = result.arena.get(decl).kind
    else {
        panic!("expected initialized declarator");
    };
    let NodeKind::Regex { pattern, flags } = result.arena.get(init).kind else {
        panic!("expected regex literal");
    };
    assert_eq!(interner.lookup(pattern), "ab+c");
    assert_eq!(interner.lookup(flags), "gi");
}

#[test]
fn test_new_expression() {
    let (_, result) = parse_ok("new Foo(1, 2); new a.b; new f()();");
    let with_args = expr_stmt(&result, 0);
    let NodeKind::New { args, .. } = result.arena.get(with_args).kind else {
        panic!("expected new expression");
    };
    assert_eq!(result.arena.get_list(args).len(), 2);

    let bare = expr_stmt(&result, 1);
    let NodeKind::New { callee, args } = result.arena.get(bare).kind else {
        panic!("expected new expression");
    };
    assert!(matches!(result.arena.get(callee).kind, NodeKind::Member { .. }));
    assert!(result.arena.get_list(args).is_empty());

    // `new f()()` calls the constructed value.
    let chained = expr_stmt(&result, 2);
    let NodeKind::Call { callee, .. } = result.arena.get(chained).kind else {
        panic!("expected call of constructed value");
    };
    assert!(matches!(result.arena.get(callee).kind, NodeKind::New { .. }));
}

#[test]
fn test_new_target_only_inside_functions() {
    assert_eq!(parse_err("new.target;").code, ErrorCode::E1019);
    parse_ok("function f() { return new.target; }");
}

#[test]
fn test_import_meta_only_in_modules() {
    assert_eq!(parse_err("import.meta;").code, ErrorCode::E1019);
}

#[test]
fn test_object_literal_properties() {
    let (_, result) = parse_ok("({ a: 1, b, [k]: 2, m() {}, get g() { return 1; } });");
    let expr = expr_stmt(&result, 0);
    let NodeKind::Paren { expr: obj } = result.arena.get(expr).kind else {
        panic!("expected parens");
    };
    let NodeKind::Object { props } = result.arena.get(obj).kind else {
        panic!("expected object literal");
    };
    let prop_ids = result.arena.get_list(props).to_vec();
    assert_eq!(prop_ids.len(), 5);

    let NodeKind::Property {
        shorthand: true, ..
    } = result.arena.get(prop_ids[1]).kind
    else {
        panic!("expected shorthand property");
    };
    let NodeKind::Property { computed: true, .. } = result.arena.get(prop_ids[2]).kind
    else {
        panic!("expected computed property");
    };
    let NodeKind::Property {
        kind: PropertyKind::Get,
        ..
    } = result.arena.get(prop_ids[4]).kind
    else {
        panic!("expected getter property");
    };
}

#[test]
fn test_shorthand_initializer_outside_destructuring_is_an_error() {
    assert_eq!(parse_err("({ a = 1 });").code, ErrorCode::E1006);
    // Claimed by a destructuring assignment.
    parse_ok("({ a = 1 } = obj);");
}

#[test]
fn test_spread_in_calls_and_arrays() {
    let (_, result) = parse_ok("f(...xs); [1, ...xs, 2];");
    let call = expr_stmt(&result, 0);
    let NodeKind::Call { args, .. } = result.arena.get(call).kind else {
        panic!("expected call");
    };
    let arg = result.arena.get_list(args)[0];
    assert!(matches!(result.arena.get(arg).kind, NodeKind::Spread { .. }));

    let array = expr_stmt(&result, 1);
    let NodeKind::Array { elems } = result.arena.get(array).kind else {
        panic!("expected array literal");
    };
    assert_eq!(result.arena.get_list(elems).len(), 3);
}

#[test]
fn test_array_holes() {
    let (_, result) = parse_ok("[1, , 3];");
    let array = expr_stmt(&result, 0);
    let NodeKind::Array { elems } = result.arena.get(array).kind else {
        panic!("expected array literal");
    };
    let ids = result.arena.get_list(elems).to_vec();
    assert_eq!(ids.len(), 3);
    assert!(matches!(result.arena.get(ids[1]).kind, NodeKind::Elision));
}

#[test]
fn test_in_operator_in_expression_position() {
    let (_, result) = parse_ok("a in b;");
    let expr = expr_stmt(&result, 0);
    assert!(matches!(
        result.arena.get(expr).kind,
        NodeKind::Binary {
            op: BinaryOp::In,
            ..
        }
    ));
}

#[test]
fn test_member_name_may_be_reserved_word() {
    let (_, result) = parse_ok("a.class; a.if;");
    assert!(matches!(
        result.arena.get(expr_stmt(&result, 0)).kind,
        NodeKind::Member { .. }
    ));
}

#[test]
fn test_expected_expression_error() {
    assert_eq!(parse_err("a + ;").code, ErrorCode::E1002);
}
