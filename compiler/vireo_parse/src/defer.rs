//! Deferred-parse policy and sub-parse plumbing.
//!
//! The policy decides, per function body, between parsing inline, skipping
//! the body behind a stub, and handing it to a background worker. The
//! sub-parse half of this module turns a stub back into nodes: the body is
//! parsed into a fresh arena (offsets are absolute, so the same source
//! buffer serves every sub-parse) and spliced into the owning unit.

use rustc_hash::FxHashMap;
use tracing::debug;
use vireo_ir::symbol::{SymbolFlags, SymbolId, SymbolTable};
use vireo_ir::{FuncId, FunctionFlags, Name, NodeArena, NodeId, NodeKind, ParseState, StringInterner};
use vireo_lexer::SourceBuffer;

use crate::binder::FreeRef;
use crate::error::PResult;
use crate::grammar::Parser;
use crate::options::ParseOptions;

/// Where a function body's parse happens.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Deferral {
    Inline,
    Stub,
    Background,
}

/// Everything the policy looks at, gathered by the grammar driver.
pub(crate) struct DeferInputs {
    pub defer_enabled: bool,
    pub defer_threshold: u32,
    pub min_body_len: u32,
    pub source_len: u32,
    pub body_start: u32,
    pub in_param_default: bool,
    pub in_class_field: bool,
    pub in_with: bool,
    pub enclosing_calls_eval: bool,
    pub background_available: bool,
}

/// The deferral decision for one function body.
///
/// Contexts that need bindings resolved eagerly (parameter defaults, class
/// field initializers, `with` bodies) and functions under a visible `eval`
/// always parse inline. Small sources and small remainders are not worth
/// the stub bookkeeping; the threshold gate reads the whole source length,
/// not the remainder past the body start, which has its own `min_body_len`
/// gate. The fast scan may still veto a non-inline decision afterwards,
/// when the measured body turns out tiny or the scan hits a lexical
/// ambiguity.
pub(crate) fn decide(inputs: &DeferInputs) -> Deferral {
    if !inputs.defer_enabled
        || inputs.in_param_default
        || inputs.in_class_field
        || inputs.in_with
        || inputs.enclosing_calls_eval
    {
        return Deferral::Inline;
    }
    if inputs.source_len < inputs.defer_threshold {
        return Deferral::Inline;
    }
    if inputs.source_len - inputs.body_start < inputs.min_body_len {
        return Deferral::Inline;
    }
    if inputs.background_available {
        Deferral::Background
    } else {
        Deferral::Stub
    }
}

/// A function body parsed on its own, pending a splice into the main unit.
pub(crate) struct SubUnit {
    pub arena: NodeArena,
    pub symbols: SymbolTable,
    pub body: NodeId,
    /// Flags the body parse added (strict directive, eval/arguments use).
    pub flags: FunctionFlags,
    /// References that resolved to nothing inside the sub-parse: parameters
    /// of the deferred function, enclosing bindings, or true globals. The
    /// splice sorts them out.
    pub free: Vec<FreeRef>,
}

/// Parse one deferred body at `restore` (the `{`) into a fresh arena.
///
/// Nested bodies parse inline here: a stub written by a sub-parse would
/// record block ids from the sub-parse's own numbering, which the outer
/// table cannot interpret.
pub(crate) fn parse_body_subunit(
    source: &str,
    buffer: &SourceBuffer,
    interner: &StringInterner,
    options: &ParseOptions,
    restore: u32,
    strict: bool,
    flags: FunctionFlags,
) -> PResult<SubUnit> {
    let options = ParseOptions {
        defer_enabled: false,
        background_threads: 0,
        ..options.clone()
    };
    let mut parser = Parser::new_at(source, buffer, interner, &options, restore, strict, flags)?;
    let mut body_flags = flags;
    let simple = flags.contains(FunctionFlags::SIMPLE_PARAMS);
    let body = parser.parse_function_body(FuncId::INVALID, &[], simple, &mut body_flags)?;
    let (arena, symbols, free) = parser.finish_parts();
    Ok(SubUnit {
        arena,
        symbols,
        body,
        flags: body_flags,
        free,
    })
}

/// Splice a sub-parsed body into the owning unit.
///
/// Node, list, function, and symbol ids are rewritten by a base offset;
/// sub-parse records that pointed at the sub-parse's own top level
/// (`FuncId::INVALID`) are re-homed onto the deferred function. References
/// the sub-parse left free are then resolved against the outer bindings
/// that were visible at the skip point (`enclosing` holds those scopes'
/// block ids), so the merged unit binds exactly as an inline parse would.
pub(crate) fn merge_subunit(
    arena: &mut NodeArena,
    symbols: &mut SymbolTable,
    func: FuncId,
    enclosing: &[u32],
    sub: SubUnit,
) -> NodeId {
    let sym_base = u32::try_from(symbols.len())
        .unwrap_or_else(|_| panic!("symbol table exceeded u32::MAX entries"));
    let map = arena.splice(sub.arena, sym_base);

    let mut has_captured = false;
    for (_, symbol) in sub.symbols.iter() {
        let mut s = symbol.clone();
        s.func = if s.func.is_valid() {
            map.func(s.func)
        } else {
            func
        };
        if s.func == func && s.flags.contains(SymbolFlags::CAPTURED) {
            has_captured = true;
        }
        symbols.push(s);
    }

    let func_count = u32::try_from(arena.function_count())
        .unwrap_or_else(|_| panic!("function table exceeded u32::MAX entries"));
    for idx in map.func_base..func_count {
        let f = arena.function_mut(FuncId::new(idx));
        if !f.parent.is_valid() {
            f.parent = func;
        }
    }

    // Outer bindings visible at the skip point, innermost scope winning.
    // A later symbol in the same block (a shadowing duplicate formal)
    // overrides an earlier one, matching declaration order.
    let mut visible: FxHashMap<Name, (u32, SymbolId)> = FxHashMap::default();
    for (id, symbol) in symbols.iter() {
        if id.index() >= sym_base as usize {
            break;
        }
        if !enclosing.contains(&symbol.block_id) {
            continue;
        }
        let slot = visible.entry(symbol.name).or_insert((symbol.block_id, id));
        if symbol.block_id >= slot.0 {
            *slot = (symbol.block_id, id);
        }
    }

    for fr in sub.free {
        let Some(&(_, sym)) = visible.get(&fr.name) else {
            // A genuinely free reference; stays a host global.
            continue;
        };
        let ref_func = if fr.func.is_valid() {
            map.func(fr.func)
        } else {
            func
        };
        let captured = ref_func != symbols.get(sym).func;
        {
            let symbol = symbols.get_mut(sym);
            if captured {
                symbol.flags |= SymbolFlags::CAPTURED;
            }
            if fr.assigns {
                symbol.flags |= SymbolFlags::ASSIGNED;
            }
        }
        if captured && symbols.get(sym).func.is_valid() {
            let owner = symbols.get(sym).func;
            arena.function_mut(owner).flags |= FunctionFlags::HAS_CAPTURED_BINDINGS;
        }
        let node = map.node(fr.node);
        if let NodeKind::Ident { sym: slot, .. } = &mut arena.get_mut(node).kind {
            *slot = sym;
        }
    }

    let body = map.node(sub.body);
    let data = arena.function_mut(func);
    data.body = body;
    data.state = ParseState::FullyParsed;
    data.stub = None;
    data.flags |= sub.flags
        & (FunctionFlags::STRICT
            | FunctionFlags::CALLS_EVAL
            | FunctionFlags::USES_ARGUMENTS
            | FunctionFlags::HAS_CAPTURED_BINDINGS);
    if has_captured {
        data.flags |= FunctionFlags::HAS_CAPTURED_BINDINGS;
    }
    debug!(func = func.index(), "deferred body merged");
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn inputs() -> DeferInputs {
        DeferInputs {
            defer_enabled: true,
            defer_threshold: 4096,
            min_body_len: 160,
            source_len: 10_000,
            body_start: 100,
            in_param_default: false,
            in_class_field: false,
            in_with: false,
            enclosing_calls_eval: false,
            background_available: false,
        }
    }

    #[test]
    fn test_defers_large_source() {
        assert_eq!(decide(&inputs()), Deferral::Stub);
    }

    #[test]
    fn test_background_preferred_when_available() {
        let mut i = inputs();
        i.background_available = true;
        assert_eq!(decide(&i), Deferral::Background);
    }

    #[test]
    fn test_small_source_parses_inline() {
        let mut i = inputs();
        i.source_len = 1000;
        assert_eq!(decide(&i), Deferral::Inline);
    }

    #[test]
    fn test_threshold_gates_on_total_source_length() {
        // The gate compares total source length, not the remainder.
        let mut i = inputs();
        i.body_start = 0;
        i.source_len = 4095;
        assert_eq!(decide(&i), Deferral::Inline);
        i.source_len = 4096;
        assert_eq!(decide(&i), Deferral::Stub);
    }

    #[test]
    fn test_small_remainder_parses_inline() {
        let mut i = inputs();
        i.body_start = i.source_len - 50;
        assert_eq!(decide(&i), Deferral::Inline);
    }

    #[test]
    fn test_eval_and_special_scopes_force_inline() {
        for f in [
            |i: &mut DeferInputs| i.enclosing_calls_eval = true,
            |i: &mut DeferInputs| i.in_with = true,
            |i: &mut DeferInputs| i.in_param_default = true,
            |i: &mut DeferInputs| i.in_class_field = true,
            |i: &mut DeferInputs| i.defer_enabled = false,
        ] {
            let mut i = inputs();
            f(&mut i);
            assert_eq!(decide(&i), Deferral::Inline);
        }
    }
}
