//! Function side table entries.
//!
//! Every function form (declaration, expression, arrow, method, accessor)
//! gets one [`FunctionData`] record in the arena, referenced from a
//! `NodeKind::Function` node by [`FuncId`]. Keeping the payload out of the
//! node enum keeps nodes small and gives the deferral machinery one place to
//! record how far a body was parsed.

use bitflags::bitflags;

use crate::ast::node_id::{FuncId, NodeId, NodeRange};
use crate::symbol::SymbolId;
use crate::{Name, Span};

bitflags! {
    /// Per-function modifier and analysis flags.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct FunctionFlags: u16 {
        const ARROW        = 1 << 0;
        const ASYNC        = 1 << 1;
        const GENERATOR    = 1 << 2;
        const METHOD       = 1 << 3;
        const GETTER       = 1 << 4;
        const SETTER       = 1 << 5;
        const CONSTRUCTOR  = 1 << 6;
        /// Statement-position `function f() {}` (hoisted binding).
        const DECLARATION  = 1 << 7;
        /// Body is `"use strict"` or inherits module strictness.
        const STRICT       = 1 << 8;
        /// Parameter list is plain identifiers only, no defaults or rest.
        const SIMPLE_PARAMS = 1 << 9;
        /// Arrow with an expression body instead of a block.
        const EXPR_BODY    = 1 << 10;
        /// Body references `eval` — disables deferral for enclosed scopes.
        const CALLS_EVAL   = 1 << 11;
        /// Body references `arguments`.
        const USES_ARGUMENTS = 1 << 12;
        /// Some binding declared here is referenced from a nested function.
        const HAS_CAPTURED_BINDINGS = 1 << 13;
    }
}

/// How much of a function body has been parsed.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ParseState {
    /// Header parsed; the deferral decision has not been made yet.
    Undetermined,
    /// Body fully parsed into the arena.
    FullyParsed,
    /// Body skipped by the fast scanner; a stub records where to resume.
    StubbedDeferred,
    /// Body handed to a background worker; nodes arrive at splice time.
    BackgroundDeferred,
}

/// Restore record for a deferred function body.
///
/// Written by the fast scanner when it skips a body, consumed by
/// on-demand re-parse (`restore` is where the cursor resumes).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct DeferredStub {
    /// Byte offset of the `{` opening the body (or the arrow body start).
    pub restore: u32,
    /// Byte offset just past the closing `}` (or expression end).
    pub end: u32,
    /// Functions nested inside the skipped body, counted by the fast scan.
    pub nested_functions: u32,
    /// Flags recovered by the fast scan (strictness is not among them; it
    /// is re-derived when the body is actually parsed).
    pub flags: FunctionFlags,
    /// Block ids of the scopes enclosing the skipped body, outermost first.
    /// The splice resolves the completed body's free references against the
    /// bindings those scopes hold, so a deferred body ends up with the same
    /// resolutions an inline parse would have produced.
    pub open_scopes: Vec<u32>,
}

/// One function record in the arena's side table.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FunctionData {
    /// Declared or inferred name; `None` for anonymous expressions/arrows.
    pub name: Option<Name>,
    /// Binding symbol for declarations and named expressions.
    pub sym: SymbolId,
    /// Parameter pattern nodes.
    pub params: NodeRange,
    /// Block node or expression node (arrows); `NodeId::INVALID` while the
    /// body is deferred.
    pub body: NodeId,
    /// Span of the whole function, header through body end.
    pub span: Span,
    pub flags: FunctionFlags,
    pub state: ParseState,
    /// Present iff `state == StubbedDeferred`.
    pub stub: Option<DeferredStub>,
    /// Lexically enclosing function; `FuncId::INVALID` for the top level.
    pub parent: FuncId,
}

impl FunctionData {
    /// Fresh record for a function whose header is being parsed.
    pub fn new(span_start: u32, flags: FunctionFlags, parent: FuncId) -> Self {
        FunctionData {
            name: None,
            sym: SymbolId::INVALID,
            params: NodeRange::EMPTY,
            body: NodeId::INVALID,
            span: Span::new(span_start, span_start),
            flags,
            state: ParseState::Undetermined,
            stub: None,
            parent,
        }
    }

    /// True once the body's nodes exist in the arena.
    #[inline]
    pub fn is_parsed(&self) -> bool {
        matches!(self.state, ParseState::FullyParsed)
    }

    /// True while the body is a stub awaiting on-demand re-parse.
    #[inline]
    pub fn is_deferred(&self) -> bool {
        matches!(
            self.state,
            ParseState::StubbedDeferred | ParseState::BackgroundDeferred
        )
    }
}
