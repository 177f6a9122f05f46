//! Property tests: neither the deferral policy nor the worker thread
//! count may change what a parse produces.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use vireo_ir::StringInterner;

use super::ident_refs;
use crate::{parse_deferred_function, parse_program, ParseOptions, ParseResult};

/// One function of `stmts` accumulating assignments, padded to `pad`
/// bytes so the deferral threshold is in play for most generated cases.
fn accumulating_script(stmts: usize, pad: usize) -> String {
    let mut body = String::new();
    for i in 0..stmts {
        body.push_str(&format!("  total = total + {i};\n"));
    }
    let mut src = format!("var total = 0;\nfunction run() {{\n{body}}}\nrun();\n");
    while src.len() < pad {
        src.push_str("total = total + 1;\n");
    }
    src
}

/// Complete every body the parse left deferred.
fn complete_all(
    result: &mut ParseResult,
    src: &str,
    interner: &StringInterner,
    options: &ParseOptions,
) {
    let deferred: Vec<_> = result
        .arena
        .functions()
        .filter(|(_, data)| data.is_deferred())
        .map(|(id, _)| id)
        .collect();
    for func in deferred {
        parse_deferred_function(result, func, src, interner, options)
            .unwrap_or_else(|e| panic!("{e}"));
    }
}

/// Occurrence-by-occurrence agreement between two parses of `src`.
fn assert_same_bindings(
    a: &ParseResult,
    a_interner: &StringInterner,
    b: &ParseResult,
    b_interner: &StringInterner,
    src: &str,
) -> Result<(), TestCaseError> {
    prop_assert_eq!(a.arena.function_count(), b.arena.function_count());
    let a_refs = ident_refs(a, a_interner, "total");
    let b_refs = ident_refs(b, b_interner, "total");
    prop_assert_eq!(a_refs.len(), b_refs.len(), "ref count differs: {:?}", src.len());
    for (&(a_start, a_sym), &(b_start, b_sym)) in a_refs.iter().zip(&b_refs) {
        prop_assert_eq!(a_start, b_start);
        prop_assert_eq!(a_sym.is_valid(), b_sym.is_valid(), "at offset {}", a_start);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_deferral_preserves_bindings(stmts in 5usize..60, pad in 4200usize..6500) {
        let src = accumulating_script(stmts, pad);

        let eager_interner = StringInterner::new();
        let eager = parse_program(&src, &eager_interner, &ParseOptions::eager());
        prop_assert!(eager.is_ok());

        let interner = StringInterner::new();
        let options = ParseOptions::default();
        let mut result = parse_program(&src, &interner, &options);
        prop_assert!(result.is_ok());
        complete_all(&mut result, &src, &interner, &options);

        assert_same_bindings(&result, &interner, &eager, &eager_interner, &src)?;
    }

    #[test]
    fn prop_thread_count_is_invisible(threads in 0usize..4, stmts in 5usize..60) {
        let src = accumulating_script(stmts, 5000);

        let eager_interner = StringInterner::new();
        let eager = parse_program(&src, &eager_interner, &ParseOptions::eager());
        prop_assert!(eager.is_ok());

        let interner = StringInterner::new();
        let options = ParseOptions {
            background_threads: threads,
            ..ParseOptions::default()
        };
        let mut result = parse_program(&src, &interner, &options);
        prop_assert!(result.is_ok(), "parse failed: {:?}", result.error);
        complete_all(&mut result, &src, &interner, &options);

        assert_same_bindings(&result, &interner, &eager, &eager_interner, &src)?;
    }
}
