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

//! Clue truth evaluation.
//!
//! A verdict is a pair (value, settled). `false` is only ever reported when
//! the clue is permanently violated in this branch; anything still
//! undetermined comes back as a conservative `true` so live branches are
//! never cut. The two row sentinels (no remaining cell, several remaining
//! cells) both mean "cannot read a position yet" and convert to that
//! conservative `true` here, which lets the rest of the body assume
//! singleton rows.
//!
//! Settled verdicts of non-dynamic nodes are memoized in the branch's
//! `solved` vector. Dynamic nodes bypass the memo: their truth depends on
//! the binding they are instantiated with.

use crate::ast::{BinaryOp, Clue, ClueKind, Ident, Membership, NaryOp, SetMember};
use crate::error::Error;
use crate::matrix::{Layout, Matrix};
use crate::solver::{Solved, arith, resolve};

/// Checks one clue, expanding a dynamic clue over every binding. A dynamic
/// clue holds only if every instantiation does.
pub fn holds(
    clue: &Clue,
    matrix: &Matrix,
    layout: &Layout,
    solved: &mut [Solved],
) -> Result<bool, Error> {
    if clue.dynamic {
        for binding in 1..=layout.positions() {
            if !verdict(clue, matrix, layout, solved, binding)?.0 {
                return Ok(false);
            }
        }
        return Ok(true);
    }
    Ok(verdict(clue, matrix, layout, solved, 1)?.0)
}

/// Evaluates one clue under one binding, reading and updating the memo.
pub fn verdict(
    clue: &Clue,
    matrix: &Matrix,
    layout: &Layout,
    solved: &mut [Solved],
    binding: usize,
) -> Result<(bool, bool), Error> {
    if !clue.dynamic {
        match solved[clue.id] {
            Solved::True => return Ok((true, true)),
            Solved::False => return Ok((false, true)),
            Solved::Unknown => {}
        }
    }

    let (value, settled) = match &clue.kind {
        ClueKind::Not(child) => {
            let (value, settled) = verdict(child, matrix, layout, solved, binding)?;
            if settled { (!value, true) } else { (true, false) }
        }
        ClueKind::Binary { op, lhs, rhs } => {
            let (lv, ls) = verdict(lhs, matrix, layout, solved, binding)?;
            let (rv, rs) = verdict(rhs, matrix, layout, solved, binding)?;
            let settled = ls && rs;
            match op {
                BinaryOp::And => (lv && rv, settled),
                BinaryOp::Or => (lv || rv, settled),
                // These cannot be read off conservative operand values;
                // they stay true until both sides are permanent.
                BinaryOp::Xor => (if settled { lv != rv } else { true }, settled),
                BinaryOp::Iff => (if settled { lv == rv } else { true }, settled),
                BinaryOp::Implies => (if settled { !lv || rv } else { true }, settled),
            }
        }
        ClueKind::Nary { op, operands } => {
            let mut settled = true;
            let mut all = true;
            let mut any = false;
            for operand in operands {
                let (value, s) = verdict(operand, matrix, layout, solved, binding)?;
                settled &= s;
                all &= value;
                any |= value;
            }
            match op {
                NaryOp::And => (all, settled),
                NaryOp::Or => (any, settled),
            }
        }
        ClueKind::Relation { op, lhs, rhs } => {
            let lhs = arith::eval(lhs, matrix, layout, solved, binding)?;
            let rhs = arith::eval(rhs, matrix, layout, solved, binding)?;
            match (lhs, rhs) {
                (Some(lhs), Some(rhs)) => (op.apply(lhs, rhs), true),
                _ => (true, false),
            }
        }
        ClueKind::SamePosition(a, b) => {
            match positions(a, b, matrix, layout, binding)? {
                Some((pa, pb)) => (pa == pb, true),
                None => (true, false),
            }
        }
        ClueKind::Offset { left, right, distance } => {
            match positions(left, right, matrix, layout, binding)? {
                Some((pa, pb)) => (pb as i64 - pa as i64 == *distance as i64, true),
                None => (true, false),
            }
        }
        ClueKind::Before(a, b) => {
            match positions(a, b, matrix, layout, binding)? {
                Some((pa, pb)) => (pa < pb, true),
                None => (true, false),
            }
        }
        ClueKind::In { lhs, rhs } => membership(clue, lhs, rhs, matrix, layout, solved, binding)?,
    };

    if settled && !clue.dynamic {
        solved[clue.id] = if value { Solved::True } else { Solved::False };
    }
    Ok((value, settled))
}

/// Both operands' pinned positions, or `None` while either row is
/// undetermined.
fn positions(
    a: &Ident,
    b: &Ident,
    matrix: &Matrix,
    layout: &Layout,
    binding: usize,
) -> Result<Option<(usize, usize)>, Error> {
    let ra = resolve::row_id(layout, a, binding)?;
    let rb = resolve::row_id(layout, b, binding)?;
    match (matrix.sole_position(ra), matrix.sole_position(rb)) {
        (Ok(pa), Ok(pb)) => Ok(Some((pa, pb))),
        _ => Ok(None),
    }
}

/// The three `in` shapes: rows in a set of rows, a value in a set of
/// values, a value in a range. Mixing rows and values is a type error.
fn membership(
    clue: &Clue,
    lhs: &SetMember,
    rhs: &Membership,
    matrix: &Matrix,
    layout: &Layout,
    solved: &mut [Solved],
    binding: usize,
) -> Result<(bool, bool), Error> {
    match (lhs, rhs) {
        (SetMember::Item(item), Membership::Set(members)) => {
            if members.iter().any(|m| matches!(m, SetMember::Value(_))) {
                return Err(Error::SetRequiresArithmetic { span: clue.span });
            }
            let row = resolve::row_id(layout, item, binding)?;
            let Ok(position) = matrix.sole_position(row) else {
                return Ok((true, false));
            };
            let mut contains = false;
            for member in members {
                let SetMember::Item(member) = member else { unreachable!() };
                let member_row = resolve::row_id(layout, member, binding)?;
                match matrix.sole_position(member_row) {
                    Ok(p) => contains |= p == position,
                    Err(_) => return Ok((true, false)),
                }
            }
            Ok((contains, true))
        }
        (SetMember::Value(expr), Membership::Set(members)) => {
            if members.iter().any(|m| matches!(m, SetMember::Item(_))) {
                return Err(Error::SetRequiresArithmetic { span: clue.span });
            }
            let Some(value) = arith::eval(expr, matrix, layout, solved, binding)? else {
                return Ok((true, false));
            };
            let mut contains = false;
            for member in members {
                let SetMember::Value(member) = member else { unreachable!() };
                match arith::eval(member, matrix, layout, solved, binding)? {
                    Some(v) => contains |= v == value,
                    None => return Ok((true, false)),
                }
            }
            Ok((contains, true))
        }
        (SetMember::Value(expr), Membership::Range(lo, hi)) => {
            let value = arith::eval(expr, matrix, layout, solved, binding)?;
            let lo = arith::eval(lo, matrix, layout, solved, binding)?;
            let hi = arith::eval(hi, matrix, layout, solved, binding)?;
            match (value, lo, hi) {
                (Some(value), Some(lo), Some(hi)) => Ok((lo <= value && value <= hi, true)),
                _ => Ok((true, false)),
            }
        }
        (SetMember::Item(_), Membership::Range(..)) => {
            Err(Error::SetRequiresArithmetic { span: clue.span })
        }
    }
}
