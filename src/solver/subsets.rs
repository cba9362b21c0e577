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

//! Naked-subset elimination, generalized to any subset size.
//!
//! Inside one strict category: take a set S of k positions. Rows that are
//! already confined to the complement of S will consume it. If at least
//! N−k rows are confined there, no other row of the category can land in
//! the complement, so their cells outside S are cleared.
//!
//! Only strict categories take part. A great category's confined rows are
//! not obliged to occupy anything, so the complement is never saturated and
//! the rule would cut live branches.

use crate::matrix::{Layout, Matrix};
use crate::solver::combos::SubsetMasks;

/// One elimination sweep over a single category. Returns whether any cell
/// was cleared.
pub fn eliminate(
    matrix: &mut Matrix,
    layout: &Layout,
    category: usize,
    masks: &SubsetMasks,
) -> bool {
    let slot = &layout.categories()[category];
    if !slot.strict {
        return false;
    }
    let positions = layout.positions();
    let mut changed = false;

    for k in 1..positions {
        let needed = positions - k;
        for &subset in masks.of_size(k) {
            let confined = slot
                .rows
                .clone()
                .filter(|&row| matrix.mask(row) & subset == 0)
                .count();
            if confined < needed {
                continue;
            }
            for row in slot.rows.clone() {
                if matrix.mask(row) & subset != 0 {
                    changed |= matrix.retain(row, subset);
                }
            }
        }
    }
    changed
}

/// Sweeps every strict category once.
pub fn eliminate_all(matrix: &mut Matrix, layout: &Layout, masks: &SubsetMasks) -> bool {
    let mut changed = false;
    for category in 0..layout.categories().len() {
        changed |= eliminate(matrix, layout, category, masks);
    }
    changed
}
