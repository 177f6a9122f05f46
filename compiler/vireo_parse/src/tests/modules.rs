//! Module grammar: import and export forms, placement rules, and module
//! strictness.

use pretty_assertions::assert_eq;
use vireo_diagnostic::ErrorCode;
use vireo_ir::{ImportKind, NodeKind, SymbolFlags, SymbolKind};

use super::{module_err, module_ok, parse_err, symbol_named, top_stmts};

fn import_specs(result: &crate::ParseResult, stmt: vireo_ir::NodeId) -> Vec<vireo_ir::NodeId> {
    match result.arena.get(stmt).kind {
        NodeKind::ImportDecl { specifiers, .. } => result.arena.get_list(specifiers).to_vec(),
        ref other => panic!("not an import: {other:?}"),
    }
}

#[test]
fn test_default_import() {
    let (interner, result) = module_ok("import d from \"m\"; d;");
    let specs = import_specs(&result, top_stmts(&result)[0]);
    assert_eq!(specs.len(), 1);
    assert!(matches!(
        result.arena.get(specs[0]).kind,
        NodeKind::ImportSpec {
            kind: ImportKind::Default,
            imported: None,
            ..
        }
    ));
    let (_, d_sym) = symbol_named(&result, &interner, "d");
    assert_eq!(d_sym.kind, SymbolKind::Import);
}

#[test]
fn test_named_import_with_rename() {
    let (interner, result) = module_ok("import { a as b } from \"m\"; b;");
    let specs = import_specs(&result, top_stmts(&result)[0]);
    let NodeKind::ImportSpec {
        kind: ImportKind::Named,
        imported: Some(imported),
        ..
    } = result.arena.get(specs[0]).kind
    else {
        panic!("expected named import");
    };
    assert_eq!(interner.lookup(imported), "a");
    // The local binding is `b`; `a` is only the external name.
    symbol_named(&result, &interner, "b");
}

#[test]
fn test_namespace_import() {
    let (interner, result) = module_ok("import * as ns from \"m\"; ns.thing;");
    let specs = import_specs(&result, top_stmts(&result)[0]);
    assert!(matches!(
        result.arena.get(specs[0]).kind,
        NodeKind::ImportSpec {
            kind: ImportKind::Namespace,
            ..
        }
    ));
    symbol_named(&result, &interner, "ns");
}

#[test]
fn test_side_effect_import() {
    let (_, result) = module_ok("import \"m\";");
    assert!(import_specs(&result, top_stmts(&result)[0]).is_empty());
}

#[test]
fn test_combined_default_and_named_import() {
    let (_, result) = module_ok("import d, { a, b } from \"m\";");
    assert_eq!(import_specs(&result, top_stmts(&result)[0]).len(), 3);
}

#[test]
fn test_export_clause_marks_bindings() {
    let (interner, result) = module_ok("let a = 1; let b = 2; export { a, b as c };");
    let (_, a_sym) = symbol_named(&result, &interner, "a");
    assert!(a_sym.flags.contains(SymbolFlags::EXPORTED));
    let (_, b_sym) = symbol_named(&result, &interner, "b");
    assert!(b_sym.flags.contains(SymbolFlags::EXPORTED));

    let stmt = top_stmts(&result)[2];
    let NodeKind::ExportNamed {
        specifiers,
        source: None,
    } = result.arena.get(stmt).kind
    else {
        panic!("expected export clause");
    };
    let specs = result.arena.get_list(specifiers).to_vec();
    let NodeKind::ExportSpec { local, exported } = result.arena.get(specs[1]).kind else {
        panic!("expected export specifier");
    };
    assert_eq!(interner.lookup(local), "b");
    assert_eq!(interner.lookup(exported), "c");
}

#[test]
fn test_export_declaration() {
    let (interner, result) = module_ok("export const answer = 42;");
    let stmt = top_stmts(&result)[0];
    assert!(matches!(
        result.arena.get(stmt).kind,
        NodeKind::ExportDecl { .. }
    ));
    let (_, sym) = symbol_named(&result, &interner, "answer");
    assert!(sym.flags.contains(SymbolFlags::EXPORTED));
}

#[test]
fn test_export_default() {
    let (_, result) = module_ok("export default function f() {}");
    assert!(matches!(
        result.arena.get(top_stmts(&result)[0]).kind,
        NodeKind::ExportDefault { .. }
    ));
    module_ok("export default 42;");
    // Default export of an anonymous function is allowed.
    module_ok("export default function () {}");
}

#[test]
fn test_export_all() {
    let (interner, result) = module_ok("export * from \"m\"; export * as ns from \"n\";");
    let stmts = top_stmts(&result);
    assert!(matches!(
        result.arena.get(stmts[0]).kind,
        NodeKind::ExportAll { alias: None, .. }
    ));
    let NodeKind::ExportAll {
        alias: Some(alias), ..
    } = result.arena.get(stmts[1]).kind
    else {
        panic!("expected aliased export-all");
    };
    assert_eq!(interner.lookup(alias), "ns");
}

#[test]
fn test_reexport_does_not_touch_local_bindings() {
    let (interner, result) = module_ok("let a = 1; export { a } from \"m\";");
    let (_, a_sym) = symbol_named(&result, &interner, "a");
    assert!(!a_sym.flags.contains(SymbolFlags::EXPORTED));
}

#[test]
fn test_import_export_placement() {
    assert_eq!(parse_err("import x from \"m\";").code, ErrorCode::E1015);
    assert_eq!(
        module_err("function f() { import x from \"m\"; }").code,
        ErrorCode::E1015
    );
    assert_eq!(module_err("if (c) export {};").code, ErrorCode::E1015);
}

#[test]
fn test_import_meta_in_modules() {
    let (_, result) = module_ok("import.meta.url;");
    let stmt = top_stmts(&result)[0];
    let NodeKind::ExprStmt { expr } = result.arena.get(stmt).kind else {
        panic!("expected expression statement");
    };
    let NodeKind::Member { obj, .. } = result.arena.get(expr).kind else {
        panic!("expected member access");
    };
    assert!(matches!(result.arena.get(obj).kind, NodeKind::ImportMeta));
}

#[test]
fn test_modules_are_strict_and_reserve_await() {
    assert_eq!(module_err("with (x) {}").code, ErrorCode::E1013);
    assert_eq!(module_err("var await = 1;").code, ErrorCode::E1020);
    // Top-level await expressions are fine.
    module_ok("await p;");
}
