/*
* Copyright (C) 2026  Henrique Almeida
* This file is part of WAZebra.
*
* WAZebra is free software: you can redistribute it and/or modify
* it under the terms of the GNU Affero General Public License as published
* by the Free Software Foundation, either version 3 of the License, or
* (at your option) any later version.
*
* WAZebra is distributed in the hope that it will be useful,
* but WITHOUT ANY WARRANTY; without even the implied warranty of
* MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
* GNU Affero General Public License for more details.
*
* You should have received a copy of the GNU Affero General Public License
* along with WAZebra.  If not, see <https://www.gnu.org/licenses/>.
*/

//! The clue syntax tree.
//!
//! Nodes are immutable once built. Anything the solver learns about a node
//! during search (its settled truth value) lives in per-branch state indexed
//! by [`NodeId`], so branches never contaminate each other.

use std::fmt;

/// Source position of a token or node, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.line, self.column)
    }
}

/// Dense id assigned to every clue node by the parser. Indexes the
/// per-branch settled-truth vector.
pub type NodeId = usize;

/// A written reference to a row: a short item name, a qualified
/// `category.item`, a position (`#3`), or the dynamic position (`$`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn is_dynamic(&self) -> bool {
        self.name == "$"
    }
}

/// Two-operand logical connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
    Iff,
    Implies,
}

/// Connectives that also come in chained, n-ary form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaryOp {
    And,
    Or,
}

/// Comparison operators over arithmetic operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl RelOp {
    pub fn apply(self, lhs: i64, rhs: i64) -> bool {
        match self {
            RelOp::Eq => lhs == rhs,
            RelOp::Ne => lhs != rhs,
            RelOp::Lt => lhs < rhs,
            RelOp::Le => lhs <= rhs,
            RelOp::Gt => lhs > rhs,
            RelOp::Ge => lhs >= rhs,
        }
    }

    /// The operator with its operands swapped, so `a op b == b op.flip() a`.
    pub fn flip(self) -> RelOp {
        match self {
            RelOp::Eq => RelOp::Eq,
            RelOp::Ne => RelOp::Ne,
            RelOp::Lt => RelOp::Gt,
            RelOp::Le => RelOp::Ge,
            RelOp::Gt => RelOp::Lt,
            RelOp::Ge => RelOp::Le,
        }
    }
}

/// Arithmetic operators. Division is integer division; `Diff` is the
/// absolute difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Diff,
}

impl ArithOp {
    /// Applies the operator; division or remainder by zero yields `None`
    /// (treated as indeterminate, never a panic).
    pub fn apply(self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            ArithOp::Add => Some(lhs.wrapping_add(rhs)),
            ArithOp::Sub => Some(lhs.wrapping_sub(rhs)),
            ArithOp::Mul => Some(lhs.wrapping_mul(rhs)),
            ArithOp::Div => lhs.checked_div(rhs),
            ArithOp::Rem => lhs.checked_rem(rhs),
            ArithOp::Diff => Some(lhs.wrapping_sub(rhs).wrapping_abs()),
        }
    }
}

/// An arithmetic expression: reduces to a definite integer or "unknown".
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(i64),
    /// `sym:cat`: the value category `cat` takes in the position occupied
    /// by `sym`.
    Value { item: Ident, category: Ident },
    Binary {
        op: ArithOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `truths(c1, c2, ...)`: how many member clues hold.
    Truths { members: Vec<Clue>, span: Span },
}

/// One element of an `in` set: either a row reference or an arithmetic
/// value. Mixing the two kinds in one set is a type error raised by the
/// checker.
#[derive(Debug, Clone, PartialEq)]
pub enum SetMember {
    Item(Ident),
    Value(Expr),
}

/// The right-hand side of `in`.
#[derive(Debug, Clone, PartialEq)]
pub enum Membership {
    Set(Vec<SetMember>),
    Range(Box<Expr>, Box<Expr>),
}

/// A logical clue node.
#[derive(Debug, Clone, PartialEq)]
pub struct Clue {
    pub id: NodeId,
    pub span: Span,
    /// True when `$` occurs anywhere beneath this node. Dynamic clues are
    /// instantiated once per position and never use the settled-truth memo.
    pub dynamic: bool,
    pub kind: ClueKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClueKind {
    Not(Box<Clue>),
    Binary {
        op: BinaryOp,
        lhs: Box<Clue>,
        rhs: Box<Clue>,
    },
    Nary { op: NaryOp, operands: Vec<Clue> },
    Relation { op: RelOp, lhs: Expr, rhs: Expr },
    /// `a = b`: both occupy the same position.
    SamePosition(Ident, Ident),
    /// `a -k- b`: `a` sits exactly `distance` positions left of `b`.
    Offset {
        left: Ident,
        right: Ident,
        distance: usize,
    },
    /// `a -- b`: `a` sits somewhere strictly left of `b`.
    Before(Ident, Ident),
    In { lhs: SetMember, rhs: Membership },
}
