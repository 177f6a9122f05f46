//! Class declarations and expressions: member forms, constructor rules,
//! and body strictness.

use pretty_assertions::assert_eq;
use vireo_diagnostic::ErrorCode;
use vireo_ir::{MemberKind, NodeKind, SymbolKind};

use super::{parse_err, parse_ok, symbol_named, top_stmts};

fn class_members(result: &crate::ParseResult, stmt: vireo_ir::NodeId) -> Vec<vireo_ir::NodeId> {
    match result.arena.get(stmt).kind {
        NodeKind::Class { body, .. } => result.arena.get_list(body).to_vec(),
        ref other => panic!("not a class: {other:?}"),
    }
}

fn member_kind(result: &crate::ParseResult, member: vireo_ir::NodeId) -> MemberKind {
    match result.arena.get(member).kind {
        NodeKind::ClassMember { kind, .. } => kind,
        ref other => panic!("not a class member: {other:?}"),
    }
}

#[test]
fn test_class_declaration_members() {
    let (interner, result) = parse_ok(
        "class C {\n\
           constructor(a) {}\n\
           m() {}\n\
           get g() { return 1; }\n\
           set g(v) {}\n\
           static s() {}\n\
           x = 1;\n\
         }",
    );
    let (_, c_sym) = symbol_named(&result, &interner, "C");
    assert_eq!(c_sym.kind, SymbolKind::Class);

    let members = class_members(&result, top_stmts(&result)[0]);
    assert_eq!(members.len(), 6);
    assert_eq!(member_kind(&result, members[0]), MemberKind::Constructor);
    assert_eq!(member_kind(&result, members[1]), MemberKind::Method);
    assert_eq!(member_kind(&result, members[2]), MemberKind::Getter);
    assert_eq!(member_kind(&result, members[3]), MemberKind::Setter);
    assert_eq!(member_kind(&result, members[4]), MemberKind::Method);
    assert!(matches!(
        result.arena.get(members[4]).kind,
        NodeKind::ClassMember { is_static: true, .. }
    ));
    assert!(matches!(
        result.arena.get(members[5]).kind,
        NodeKind::ClassMember {
            kind: MemberKind::Field,
            value: Some(_),
            ..
        }
    ));
}

#[test]
fn test_class_heritage() {
    let (_, result) = parse_ok("class D extends base.Class {}");
    assert!(matches!(
        result.arena.get(top_stmts(&result)[0]).kind,
        NodeKind::Class {
            heritage: Some(_),
            ..
        }
    ));
}

#[test]
fn test_only_one_constructor() {
    let err = parse_err("class C { constructor() {} constructor() {} }");
    assert_eq!(err.code, ErrorCode::E1001);
}

#[test]
fn test_constructor_cannot_be_special() {
    assert_eq!(
        parse_err("class C { get constructor() {} }").code,
        ErrorCode::E1001
    );
    assert_eq!(
        parse_err("class C { *constructor() {} }").code,
        ErrorCode::E1001
    );
    assert_eq!(
        parse_err("class C { async constructor() {} }").code,
        ErrorCode::E1001
    );
    // A static method named constructor is an ordinary method.
    parse_ok("class C { static constructor() {} }");
}

#[test]
fn test_field_cannot_be_named_constructor() {
    assert_eq!(
        parse_err("class C { constructor = 1; }").code,
        ErrorCode::E1001
    );
}

#[test]
fn test_static_member_cannot_be_named_prototype() {
    assert_eq!(
        parse_err("class C { static prototype() {} }").code,
        ErrorCode::E1001
    );
    assert_eq!(
        parse_err("class C { static prototype = 1; }").code,
        ErrorCode::E1001
    );
}

#[test]
fn test_class_bodies_are_strict() {
    let err = parse_err("class C { m() { with (x) {} } }");
    assert_eq!(err.code, ErrorCode::E1013);
}

#[test]
fn test_class_expression_name_is_body_local() {
    let (interner, result) = parse_ok("let C = class Named {};");
    let (_, named) = symbol_named(&result, &interner, "Named");
    assert_eq!(named.kind, SymbolKind::Class);
    parse_ok("let D = class {};");
}

#[test]
fn test_private_fields() {
    let (_, result) = parse_ok("class C { #x = 1; read() { return this.#x; } }");
    let members = class_members(&result, top_stmts(&result)[0]);
    let NodeKind::ClassMember { key, .. } = result.arena.get(members[0]).kind else {
        panic!("expected member");
    };
    assert!(matches!(
        result.arena.get(key).kind,
        NodeKind::PrivateName(_)
    ));
}

#[test]
fn test_member_semicolons_are_skipped() {
    let (_, result) = parse_ok("class C { ; m() {} ; }");
    assert_eq!(class_members(&result, top_stmts(&result)[0]).len(), 1);
}

#[test]
fn test_generator_and_async_methods() {
    let (_, result) = parse_ok("class C { *gen() { yield 1; } async go() { await p; } }");
    let members = class_members(&result, top_stmts(&result)[0]);
    assert_eq!(members.len(), 2);
    assert_eq!(member_kind(&result, members[0]), MemberKind::Method);
}
