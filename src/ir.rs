//! IR expression family produced by the instruction lifter (C7). A closed
//! sum type, matched exhaustively wherever it's consumed — adding a
//! variant is a compile error at every dispatch site, per spec.md §9.

use crate::arg::Argument;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// A parser `Argument` reused unmodified as an IR leaf (an immediate,
    /// a global symbol, a bare register reference that was never rebound).
    Leaf(Argument),
    BinaryOp {
        left: Box<Expr>,
        op: &'static str,
        right: Box<Expr>,
    },
    UnaryOp {
        op: &'static str,
        expr: Box<Expr>,
    },
    Cast {
        to_type: &'static str,
        expr: Box<Expr>,
    },
    /// A dereferenced memory operand: `lhs(rhs)`, with `rhs` already
    /// rebound through the register map (unless it's a stack slot).
    AddressMode {
        lhs: Option<Box<Expr>>,
        rhs: Box<Expr>,
    },
    TypeHint {
        ty: &'static str,
        value: Box<Expr>,
    },
    /// The quotient/remainder pair `div`/`divu` bind to a single
    /// destination register — see DESIGN.md "Open Question decisions".
    Pair(Box<Expr>, Box<Expr>),
    Return,
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Leaf(arg) => write!(f, "{}", arg),
            Expr::BinaryOp { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Expr::UnaryOp { op, expr } => write!(f, "{}{}", op, expr),
            Expr::Cast { to_type, expr } => write!(f, "{}{}", to_type, expr),
            Expr::AddressMode { lhs: Some(lhs), rhs } => write!(f, "{}({})", lhs, rhs),
            Expr::AddressMode { lhs: None, rhs } => write!(f, "({})", rhs),
            Expr::TypeHint { ty, value } => write!(f, "({}){}", ty, value),
            Expr::Pair(a, b) => write!(f, "({}, {})", a, b),
            Expr::Return => write!(f, "return"),
        }
    }
}

/// A store emitted by a source-first store instruction (`sb`/`sh`/`sw`/
/// `swc1`/`sdc1`). Kept in an ordered list per block rather than written
/// into the register map, since a store has no destination register.
#[derive(Clone, Debug, PartialEq)]
pub struct Store {
    pub size: u32,
    pub source: Expr,
    pub dest: Expr,
    pub float: bool,
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Store(size={}, source={}, dest={}, float={})",
            self.size, self.source, self.dest, self.float
        )
    }
}

/// What a jump instruction produced, recorded separately from the
/// register map since neither `jr` nor `jal` write a destination
/// register (spec.md §4.6 Jumps group).
#[derive(Clone, Debug, PartialEq)]
pub enum Terminator {
    /// `jr`: function return.
    Return,
    /// `jal target`: a call site: the jump target expression.
    Call(Expr),
}
