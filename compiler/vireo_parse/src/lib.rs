//! Recursive descent front end: grammar driver, binder, and the deferred /
//! background parse machinery.
//!
//! Tokens come from `vireo_lexer` on demand; nodes land in a flat
//! [`NodeArena`]; identifier references resolve through the binder's
//! per-name chains as scopes close. Function bodies that pass the deferral
//! policy are skimmed and stubbed instead of parsed, to be completed later
//! by [`parse_deferred_function`] or in parallel by the background pool.

mod background;
mod binder;
mod cursor;
mod defer;
mod error;
mod fastscan;
mod grammar;
mod options;
mod pattern;
#[cfg(test)]
mod tests;

pub use error::{PResult, ParseError};
pub use options::{FeatureFlags, ParseOptions};

use tracing::debug_span;
use vireo_diagnostic::ErrorCode;
use vireo_ir::{FuncId, FunctionFlags, NodeArena, NodeId, Span, StringInterner, SymbolTable};
use vireo_lexer::SourceBuffer;

use crate::defer::{merge_subunit, parse_body_subunit};
use crate::grammar::Parser;

/// Everything one parse produces.
///
/// On failure `root` is invalid and the arena holds whatever partial AST
/// was built before the error; callers that only want a verdict should use
/// [`validate`].
pub struct ParseResult {
    pub arena: NodeArena,
    pub symbols: SymbolTable,
    pub root: NodeId,
    pub error: Option<ParseError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Parse `source` with the script goal.
pub fn parse_program(
    source: &str,
    interner: &StringInterner,
    options: &ParseOptions,
) -> ParseResult {
    parse_goal(source, interner, options)
}

/// Parse `source` with the module goal (import/export, strict throughout).
pub fn parse_module(source: &str, interner: &StringInterner, options: &ParseOptions) -> ParseResult {
    let options = ParseOptions {
        module: true,
        ..options.clone()
    };
    parse_goal(source, interner, &options)
}

/// Syntax-check `source` without keeping the AST.
///
/// Deferral is forced off so every body is actually parsed; the arena and
/// symbols are dropped on the way out.
pub fn validate(source: &str, interner: &StringInterner, options: &ParseOptions) -> PResult<()> {
    let options = ParseOptions {
        defer_enabled: false,
        background_threads: 0,
        ..options.clone()
    };
    let result = parse_goal(source, interner, &options);
    match result.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn parse_goal(source: &str, interner: &StringInterner, options: &ParseOptions) -> ParseResult {
    let _span = debug_span!("parse", len = source.len(), module = options.module).entered();
    if let Some(err) = check_source_len(source) {
        return ParseResult {
            arena: NodeArena::new(),
            symbols: SymbolTable::new(),
            root: NodeId::INVALID,
            error: Some(err),
        };
    }

    let buffer = SourceBuffer::new(source);
    if options.background_threads > 0 && options.defer_enabled {
        return background::parse_parallel(source, &buffer, interner, options);
    }

    let outcome = Parser::new(source, &buffer, interner, options, None).and_then(|mut parser| {
        let root = parser.parse_program()?;
        Ok((parser, root))
    });
    match outcome {
        Ok((parser, root)) => {
            let (arena, symbols) = parser.finish();
            ParseResult {
                arena,
                symbols,
                root,
                error: None,
            }
        }
        Err(err) => ParseResult {
            arena: NodeArena::new(),
            symbols: SymbolTable::new(),
            root: NodeId::INVALID,
            error: Some(err),
        },
    }
}

/// Node ids are u32; longer sources cannot be spanned.
fn check_source_len(source: &str) -> Option<ParseError> {
    if u32::try_from(source.len()).is_ok() {
        None
    } else {
        Some(ParseError::new(
            ErrorCode::E9002,
            Span::DUMMY,
            "source exceeds the 4 GiB addressing limit",
        ))
    }
}

/// Complete a stubbed function body on demand.
///
/// Seeks a fresh scanner to the stub's restore point, parses the body into
/// a sub-arena, and splices it into `result`. Calling this on an
/// already-parsed function is a no-op returning the existing body.
pub fn parse_deferred_function(
    result: &mut ParseResult,
    func: FuncId,
    source: &str,
    interner: &StringInterner,
    options: &ParseOptions,
) -> PResult<NodeId> {
    let data = result.arena.function(func);
    if data.is_parsed() {
        return Ok(data.body);
    }
    let stub = data.stub.clone().ok_or_else(|| {
        ParseError::new(
            ErrorCode::E9001,
            data.span,
            "deferred function has no stub to restore from",
        )
    })?;
    let flags = data.flags;
    let strict = flags.contains(FunctionFlags::STRICT);

    let buffer = SourceBuffer::new(source);
    let sub = parse_body_subunit(
        source,
        &buffer,
        interner,
        options,
        stub.restore,
        strict,
        flags,
    )?;
    Ok(merge_subunit(
        &mut result.arena,
        &mut result.symbols,
        func,
        &stub.open_scopes,
        sub,
    ))
}
