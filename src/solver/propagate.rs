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

//! Per-clue narrowing of the possibility matrix.
//!
//! Every rule here only clears cells that no satisfying completion can
//! use; none of them has to be complete, the search picks up whatever they
//! leave open. Operators with no sound narrowing rule (negation, xor,
//! implication, equivalence, most `in` shapes) are checked, never
//! propagated.

use crate::ast::{Clue, ClueKind, Expr, Membership, NaryOp, RelOp, SetMember};
use crate::error::Error;
use crate::matrix::{Layout, Matrix};
use crate::solver::combos::SubsetMasks;
use crate::solver::{Solved, arith, resolve, subsets};

/// Applies one clue, expanding a dynamic clue over every binding. Clues
/// with a permanent verdict are skipped.
pub fn apply(
    clue: &Clue,
    matrix: &mut Matrix,
    layout: &Layout,
    masks: &SubsetMasks,
    solved: &mut [Solved],
) -> Result<(), Error> {
    if clue.dynamic {
        for binding in 1..=layout.positions() {
            narrow(clue, matrix, layout, masks, solved, binding)?;
        }
        return Ok(());
    }
    if solved[clue.id] != Solved::Unknown {
        return Ok(());
    }
    narrow(clue, matrix, layout, masks, solved, 1)
}

fn narrow(
    clue: &Clue,
    matrix: &mut Matrix,
    layout: &Layout,
    masks: &SubsetMasks,
    solved: &mut [Solved],
    binding: usize,
) -> Result<(), Error> {
    match &clue.kind {
        ClueKind::SamePosition(a, b) => {
            let ra = resolve::row_id(layout, a, binding)?;
            let rb = resolve::row_id(layout, b, binding)?;
            let both = matrix.mask(ra) & matrix.mask(rb);
            matrix.retain(ra, both);
            matrix.retain(rb, both);
            Ok(())
        }
        ClueKind::Offset { left, right, distance } => {
            let ra = resolve::row_id(layout, left, binding)?;
            let rb = resolve::row_id(layout, right, binding)?;
            let k = *distance;
            if k >= layout.positions() {
                matrix.retain(ra, 0);
                matrix.retain(rb, 0);
                return Ok(());
            }
            // A position survives only while its k-shifted partner does;
            // the shifts also drop the k cells with no partner at all.
            let left_mask = matrix.mask(ra);
            matrix.retain(ra, matrix.mask(rb) >> k);
            matrix.retain(rb, left_mask << k);
            Ok(())
        }
        ClueKind::Before(a, b) => {
            let ra = resolve::row_id(layout, a, binding)?;
            let rb = resolve::row_id(layout, b, binding)?;
            let ma = matrix.mask(ra);
            let mb = matrix.mask(rb);
            // The right row cannot sit before the left row's first open
            // position, and mirrored from the other end.
            if ma == 0 {
                matrix.retain(rb, 0);
            } else {
                matrix.retain(rb, !0u64 << ma.trailing_zeros());
            }
            if mb == 0 {
                matrix.retain(ra, 0);
            } else {
                let last = 63 - mb.leading_zeros();
                matrix.retain(ra, u64::MAX >> (63 - last));
            }
            Ok(())
        }
        ClueKind::Binary { op: crate::ast::BinaryOp::And, lhs, rhs } => {
            conjunct(lhs, matrix, layout, masks, solved, binding)?;
            conjunct(rhs, matrix, layout, masks, solved, binding)
        }
        ClueKind::Nary { op: NaryOp::And, operands } => {
            for operand in operands {
                conjunct(operand, matrix, layout, masks, solved, binding)?;
            }
            Ok(())
        }
        ClueKind::Binary { op: crate::ast::BinaryOp::Or, lhs, rhs } => {
            disjoin(&[lhs.as_ref(), rhs.as_ref()], matrix, layout, masks, solved, binding)
        }
        ClueKind::Nary { op: NaryOp::Or, operands } => {
            let refs: Vec<&Clue> = operands.iter().collect();
            disjoin(&refs, matrix, layout, masks, solved, binding)
        }
        ClueKind::In { lhs: SetMember::Item(item), rhs: Membership::Set(members) }
            if members.iter().all(|m| matches!(m, SetMember::Item(_))) =>
        {
            // The row must share a position with one of the members.
            let mut union = 0u64;
            for member in members {
                let SetMember::Item(member) = member else { unreachable!() };
                union |= matrix.mask(resolve::row_id(layout, member, binding)?);
            }
            let row = resolve::row_id(layout, item, binding)?;
            matrix.retain(row, union);
            Ok(())
        }
        ClueKind::Relation { op, lhs, rhs } => {
            pinned_relation(*op, lhs, rhs, matrix, layout, solved, binding)?;
            pinned_relation(op.flip(), rhs, lhs, matrix, layout, solved, binding)
        }
        _ => Ok(()),
    }
}

/// A conjunct narrows directly, unless it already has a permanent verdict.
fn conjunct(
    clue: &Clue,
    matrix: &mut Matrix,
    layout: &Layout,
    masks: &SubsetMasks,
    solved: &mut [Solved],
    binding: usize,
) -> Result<(), Error> {
    if !clue.dynamic && solved[clue.id] != Solved::Unknown {
        return Ok(());
    }
    narrow(clue, matrix, layout, masks, solved, binding)
}

/// Disjunction: a cell survives if at least one disjunct can live with it.
/// Each disjunct gets its own copy of the matrix, narrowed and swept by the
/// elimination engine, and the copies' union is intersected back.
fn disjoin(
    disjuncts: &[&Clue],
    matrix: &mut Matrix,
    layout: &Layout,
    masks: &SubsetMasks,
    solved: &mut [Solved],
    binding: usize,
) -> Result<(), Error> {
    let mut union = vec![0u64; layout.row_count()];
    for disjunct in disjuncts {
        let mut trial = matrix.clone();
        narrow(disjunct, &mut trial, layout, masks, solved, binding)?;
        subsets::eliminate_all(&mut trial, layout, masks);
        for (row, bits) in union.iter_mut().enumerate() {
            *bits |= trial.mask(row);
        }
    }
    for (row, bits) in union.into_iter().enumerate() {
        matrix.retain(row, bits);
    }
    Ok(())
}

/// Relational narrowing applies once one side is a `sym:cat` value pinned
/// to a single position: every item of that category whose value fails the
/// comparison is cleared from that position. Items with no numeric form
/// fail it by definition.
fn pinned_relation(
    op: RelOp,
    side: &Expr,
    other: &Expr,
    matrix: &mut Matrix,
    layout: &Layout,
    solved: &mut [Solved],
    binding: usize,
) -> Result<(), Error> {
    let Expr::Value { item, category } = side else {
        return Ok(());
    };
    let cat = layout
        .category_index(&category.name)
        .ok_or_else(|| Error::UnknownCategory {
            name: category.name.clone(),
            span: category.span,
        })?;
    let row = resolve::row_id(layout, item, binding)?;
    let Ok(position) = matrix.sole_position(row) else {
        return Ok(());
    };
    let Some(target) = arith::eval(other, matrix, layout, solved, binding)? else {
        return Ok(());
    };
    for r in layout.categories()[cat].rows.clone() {
        let keep = layout.value(r).map(|v| op.apply(v, target)).unwrap_or(false);
        if !keep {
            matrix.clear(r, position);
        }
    }
    Ok(())
}
