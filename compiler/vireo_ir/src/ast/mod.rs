//! Flat AST: node definitions, the arena, and the function side table.

mod arena;
mod function;
mod node;
mod node_id;
mod operators;

pub use arena::{NodeArena, SpliceMap};
pub use function::{DeferredStub, FunctionData, FunctionFlags, ParseState};
pub use node::{ImportKind, Node, NodeKind};
pub use node_id::{FuncId, NodeId, NodeRange};
pub use operators::{
    AssignOp, BinaryOp, LogicalOp, MemberKind, PropertyKind, UnaryOp, UpdateOp, VarKind,
};
