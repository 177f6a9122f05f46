//! Core data structures for the Vireo JavaScript front end.
//!
//! Design principles:
//! - **Intern everything**: identifier and literal text becomes `Name(u32)`
//!   handles with O(1) equality, shared across parse threads.
//! - **Flatten everything**: no `Box<Node>`; cross-node links are `u32`
//!   indices into a [`NodeArena`], so background sub-parses splice in with
//!   an offset rewrite instead of pointer fixup.
//!
//! Types that contain floats store them as u64 bits for Hash compatibility.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod interner;
mod name;
mod span;
pub mod symbol;
mod token;

pub use ast::{
    AssignOp, BinaryOp, DeferredStub, FuncId, FunctionData, FunctionFlags, ImportKind,
    LogicalOp, MemberKind, Node, NodeArena, NodeId, NodeKind, NodeRange, ParseState,
    PropertyKind, SpliceMap, UnaryOp, UpdateOp, VarKind,
};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use span::Span;
pub use symbol::{Symbol, SymbolFlags, SymbolId, SymbolKind, SymbolTable};
pub use token::{Token, TokenKind};
