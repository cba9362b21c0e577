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

//! Arithmetic evaluation against a partially determined matrix.
//!
//! Everything reduces to `Some(value)` when the matrix pins it down and
//! `None` while it does not. `None` is not an error; it simply defers the
//! surrounding comparison until the search has narrowed things further.

use crate::ast::Expr;
use crate::error::Error;
use crate::matrix::{Layout, Matrix};
use crate::solver::{Solved, check, resolve};

pub fn eval(
    expr: &Expr,
    matrix: &Matrix,
    layout: &Layout,
    solved: &mut [Solved],
    binding: usize,
) -> Result<Option<i64>, Error> {
    match expr {
        Expr::Number(value) => Ok(Some(*value)),
        Expr::Value { item, category } => value_of(item, category, matrix, layout, binding),
        Expr::Binary { op, lhs, rhs } => {
            let Some(lhs) = eval(lhs, matrix, layout, solved, binding)? else {
                return Ok(None);
            };
            let Some(rhs) = eval(rhs, matrix, layout, solved, binding)? else {
                return Ok(None);
            };
            Ok(op.apply(lhs, rhs))
        }
        Expr::Truths { members, .. } => {
            // The count is only usable once every member has a permanent
            // verdict; before that a comparison against it could cut live
            // branches.
            let mut count = 0;
            for member in members {
                let (value, settled) = check::verdict(member, matrix, layout, solved, binding)?;
                if !settled {
                    return Ok(None);
                }
                if value {
                    count += 1;
                }
            }
            Ok(Some(count))
        }
    }
}

/// `sym:cat` walks every still-possible (position, item) pairing between
/// the symbol's row and the named category; the value is definite only when
/// all pairings agree. Items without numeric form never produce a value.
fn value_of(
    item: &crate::ast::Ident,
    category: &crate::ast::Ident,
    matrix: &Matrix,
    layout: &Layout,
    binding: usize,
) -> Result<Option<i64>, Error> {
    let cat = layout
        .category_index(&category.name)
        .ok_or_else(|| Error::UnknownCategory {
            name: category.name.clone(),
            span: category.span,
        })?;
    let row = resolve::row_id(layout, item, binding)?;
    let slot = &layout.categories()[cat];

    let mut result: Option<i64> = None;
    let mut positions = matrix.mask(row);
    while positions != 0 {
        let p = positions.trailing_zeros() as usize;
        positions &= positions - 1;
        for r in slot.rows.clone() {
            if !matrix.possible(r, p) {
                continue;
            }
            let Some(value) = layout.value(r) else {
                return Ok(None);
            };
            match result {
                None => result = Some(value),
                Some(prev) if prev != value => return Ok(None),
                Some(_) => {}
            }
        }
    }
    Ok(result)
}
