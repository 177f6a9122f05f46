//! Operator enums for the JavaScript AST.

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Minus,
    Plus,
    Not,
    BitNot,
    Typeof,
    Void,
    Delete,
}

/// Update operators (`++`/`--`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UpdateOp {
    Inc,
    Dec,
}

/// Binary (non-logical) operators, with grammar precedence.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Relational / equality
    EqEq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    In,
    Instanceof,
    // Shift
    Shl,
    Shr,
    UShr,
    // Additive / multiplicative
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
}

impl BinaryOp {
    /// Binding power for the precedence-climbing loop. Higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::BitOr => 3,
            BinaryOp::BitXor => 4,
            BinaryOp::BitAnd => 5,
            BinaryOp::EqEq | BinaryOp::NotEq | BinaryOp::StrictEq | BinaryOp::StrictNotEq => 6,
            BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq
            | BinaryOp::In
            | BinaryOp::Instanceof => 7,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => 8,
            BinaryOp::Add | BinaryOp::Sub => 9,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 10,
            BinaryOp::Exp => 11,
        }
    }

    /// `**` is the one right-associative binary operator.
    pub fn right_assoc(self) -> bool {
        matches!(self, BinaryOp::Exp)
    }
}

/// Short-circuiting operators, parsed below the binary tier.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LogicalOp {
    And,
    Or,
    Nullish,
}

impl LogicalOp {
    pub fn precedence(self) -> u8 {
        match self {
            LogicalOp::Nullish | LogicalOp::Or => 1,
            LogicalOp::And => 2,
        }
    }
}

/// Assignment operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Nullish,
}

impl AssignOp {
    /// Compound assignments require a simple (non-pattern) target.
    pub fn is_compound(self) -> bool {
        !matches!(self, AssignOp::Assign)
    }
}

/// Declaration kind for `var`/`let`/`const`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    /// Lexical declarations are block-scoped and use-before-declaration
    /// checked; `var` hoists to the enclosing function scope.
    pub fn is_lexical(self) -> bool {
        matches!(self, VarKind::Let | VarKind::Const)
    }
}

/// Object literal property kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

/// Class member kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MemberKind {
    Constructor,
    Method,
    Getter,
    Setter,
    Field,
}
