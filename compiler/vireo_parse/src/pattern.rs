//! Cover-grammar reinterpretation.
//!
//! Destructuring targets and arrow parameter lists are parsed as ordinary
//! expressions first; when the grammar then sees `=>` or a `=` after a
//! literal in binding position, the already-built expression is converted
//! to a pattern in place. Conversion rewrites node kinds inside the arena
//! (`Array` becomes `ArrayPattern`, `Spread` becomes `RestElement`, a plain
//! `=` assignment becomes `AssignPattern`) without re-allocating children.

use vireo_diagnostic::ErrorCode;
use vireo_ir::{AssignOp, NodeArena, NodeId, NodeKind, PropertyKind, Span};

use crate::error::{PResult, ParseError};

/// Which pattern grammar applies.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum PatternMode {
    /// Declarations and parameters: leaves must be plain identifiers.
    Binding,
    /// Destructuring assignment: member expressions are valid leaves.
    Assignment,
}

/// Convert an expression node to a pattern, in place.
pub(crate) fn to_pattern(arena: &mut NodeArena, id: NodeId, mode: PatternMode) -> PResult<()> {
    let span = arena.get(id).span;
    match &arena.get(id).kind {
        NodeKind::Ident { .. } => Ok(()),

        NodeKind::Member { .. } if mode == PatternMode::Assignment => Ok(()),

        NodeKind::Paren { expr } if mode == PatternMode::Assignment => {
            let expr = *expr;
            to_pattern(arena, expr, mode)
        }

        // Already a pattern: produced while parsing a cover position
        // (shorthand `{a = 1}` builds AssignPattern directly).
        NodeKind::ArrayPattern { .. }
        | NodeKind::ObjectPattern { .. }
        | NodeKind::AssignPattern { .. }
        | NodeKind::RestElement { .. } => Ok(()),

        NodeKind::Array { elems } => {
            let elems = *elems;
            let children: Vec<NodeId> = arena.get_list(elems).to_vec();
            for (i, &child) in children.iter().enumerate() {
                convert_element(arena, child, i + 1 == children.len(), mode)?;
            }
            arena.get_mut(id).kind = NodeKind::ArrayPattern { elems };
            Ok(())
        }

        NodeKind::Object { props } => {
            let props = *props;
            let children: Vec<NodeId> = arena.get_list(props).to_vec();
            for (i, &child) in children.iter().enumerate() {
                convert_property(arena, child, i + 1 == children.len(), mode)?;
            }
            arena.get_mut(id).kind = NodeKind::ObjectPattern { props };
            Ok(())
        }

        NodeKind::Assign {
            op: AssignOp::Assign,
            target,
            value,
        } => {
            let (target, default) = (*target, *value);
            to_pattern(arena, target, mode)?;
            arena.get_mut(id).kind = NodeKind::AssignPattern { target, default };
            Ok(())
        }

        _ => Err(invalid_destructuring(span)),
    }
}

fn convert_element(
    arena: &mut NodeArena,
    id: NodeId,
    is_last: bool,
    mode: PatternMode,
) -> PResult<()> {
    match &arena.get(id).kind {
        NodeKind::Elision => Ok(()),
        NodeKind::Spread { expr } => {
            let arg = *expr;
            let span = arena.get(id).span;
            if !is_last {
                return Err(ParseError::new(
                    ErrorCode::E1011,
                    span,
                    "a rest element must be the last element of a pattern",
                ));
            }
            // Rest targets may nest patterns but never carry defaults.
            if matches!(arena.get(arg).kind, NodeKind::Assign { .. }) {
                return Err(invalid_destructuring(span));
            }
            to_pattern(arena, arg, mode)?;
            arena.get_mut(id).kind = NodeKind::RestElement { arg };
            Ok(())
        }
        _ => to_pattern(arena, id, mode),
    }
}

fn convert_property(
    arena: &mut NodeArena,
    id: NodeId,
    is_last: bool,
    mode: PatternMode,
) -> PResult<()> {
    let span = arena.get(id).span;
    match &arena.get(id).kind {
        NodeKind::Property { kind, value, .. } => {
            if *kind != PropertyKind::Init {
                return Err(invalid_destructuring(span));
            }
            let value = *value;
            to_pattern(arena, value, mode)
        }
        NodeKind::Spread { expr } => {
            let arg = *expr;
            if !is_last {
                return Err(ParseError::new(
                    ErrorCode::E1011,
                    span,
                    "a rest property must be the last property of a pattern",
                ));
            }
            // Object rest binds a single name (or member in assignments).
            let ok = match &arena.get(arg).kind {
                NodeKind::Ident { .. } => true,
                NodeKind::Member { .. } => mode == PatternMode::Assignment,
                _ => false,
            };
            if !ok {
                return Err(invalid_destructuring(arena.get(arg).span));
            }
            arena.get_mut(id).kind = NodeKind::RestElement { arg };
            Ok(())
        }
        _ => Err(invalid_destructuring(span)),
    }
}

fn invalid_destructuring(span: Span) -> ParseError {
    ParseError::new(
        ErrorCode::E1006,
        span,
        "invalid destructuring target",
    )
}

/// Validate (and where needed convert) the target of an assignment.
///
/// Simple targets stay as they are; array and object literals convert to
/// patterns. Compound operators (`+=` and friends) require a simple target.
pub(crate) fn check_assign_target(
    arena: &mut NodeArena,
    id: NodeId,
    compound: bool,
) -> PResult<()> {
    let span = arena.get(id).span;
    match &arena.get(id).kind {
        NodeKind::Ident { .. } | NodeKind::Member { .. } => Ok(()),
        NodeKind::Paren { expr } => {
            let expr = *expr;
            check_assign_target(arena, expr, compound)
        }
        NodeKind::Array { .. } | NodeKind::Object { .. } if !compound => {
            to_pattern(arena, id, PatternMode::Assignment)
        }
        NodeKind::ArrayPattern { .. } | NodeKind::ObjectPattern { .. } if !compound => Ok(()),
        _ => Err(ParseError::new(
            ErrorCode::E1005,
            span,
            "invalid assignment target",
        )),
    }
}
