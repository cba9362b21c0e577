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

//! The boolean possibility grid and the row interning behind it.
//!
//! Every `category.item` row gets a dense [`RowId`] at construction, and a
//! row is one `u64` bitmask over positions. Bit `p` set means "this item may
//! still occupy position p". Cells only ever flip from set to clear, so a
//! branch narrows monotonically, and cloning a matrix is a flat copy.

use crate::error::{Error, Undetermined};
use crate::puzzle::Puzzle;
use std::collections::HashMap;
use std::ops::Range;

/// Dense index of a matrix row.
pub type RowId = usize;

/// Name of the synthetic position category. Its items `1..=N` give
/// positions numeric meaning; row `#.i` starts with the single bit `i - 1`.
pub const POSITION_CATEGORY: &str = "#";

/// Rows may not exceed the bits of one mask word.
pub const MAX_POSITIONS: usize = 64;

/// One category's slice of the row space.
#[derive(Debug, Clone)]
pub struct CategorySlot {
    pub name: String,
    /// Strict categories cover all positions bijectively; great ones may
    /// have surplus items that end up unassigned.
    pub strict: bool,
    pub rows: Range<RowId>,
}

/// Immutable per-puzzle row interning: category layout, row keys, item
/// values, and the short-name table.
#[derive(Debug, Clone)]
pub struct Layout {
    positions: usize,
    categories: Vec<CategorySlot>,
    keys: Vec<String>,
    items: Vec<String>,
    /// `items[r]` parsed as an integer, where it parses.
    values: Vec<Option<i64>>,
    by_key: HashMap<String, RowId>,
    by_category: HashMap<String, usize>,
    /// Unambiguous short item names only; colliding names must be written
    /// qualified.
    short_names: HashMap<String, RowId>,
}

impl Layout {
    /// Builds the row space for a puzzle, appending the `#` pseudo-category
    /// as a final strict category. Validates the category set.
    pub fn new(puzzle: &Puzzle) -> Result<Layout, Error> {
        let strict_len = puzzle
            .categories
            .iter()
            .find(|c| !c.great)
            .map(|c| c.items.len())
            .ok_or(Error::NoCategories)?;
        if strict_len == 0 {
            return Err(Error::NoCategories);
        }
        if strict_len > MAX_POSITIONS {
            return Err(Error::TooManyPositions { len: strict_len });
        }
        for cat in &puzzle.categories {
            let len = cat.items.len();
            let ok = if cat.great { len >= strict_len } else { len == strict_len };
            if !ok {
                return Err(Error::MismatchedCategorySize {
                    name: cat.name.clone(),
                    len,
                    expected: strict_len,
                });
            }
        }

        let mut layout = Layout {
            positions: strict_len,
            categories: Vec::with_capacity(puzzle.categories.len() + 1),
            keys: Vec::new(),
            items: Vec::new(),
            values: Vec::new(),
            by_key: HashMap::new(),
            by_category: HashMap::new(),
            short_names: HashMap::new(),
        };

        let mut seen_short: HashMap<String, Vec<RowId>> = HashMap::new();
        for cat in &puzzle.categories {
            let start = layout.keys.len();
            for item in &cat.items {
                let row = layout.keys.len();
                layout.keys.push(format!("{}.{}", cat.name, item));
                layout.items.push(item.clone());
                layout.values.push(item.parse().ok());
                layout.by_key.insert(layout.keys[row].clone(), row);
                seen_short.entry(item.clone()).or_default().push(row);
            }
            layout
                .by_category
                .insert(cat.name.clone(), layout.categories.len());
            layout.categories.push(CategorySlot {
                name: cat.name.clone(),
                strict: !cat.great,
                rows: start..layout.keys.len(),
            });
        }
        for (name, rows) in seen_short {
            if let [row] = rows[..] {
                layout.short_names.insert(name, row);
            }
        }

        // The position pseudo-category.
        let start = layout.keys.len();
        for i in 1..=strict_len {
            let row = layout.keys.len();
            layout.keys.push(format!("{}.{}", POSITION_CATEGORY, i));
            layout.items.push(i.to_string());
            layout.values.push(Some(i as i64));
            layout.by_key.insert(layout.keys[row].clone(), row);
        }
        layout
            .by_category
            .insert(POSITION_CATEGORY.to_string(), layout.categories.len());
        layout.categories.push(CategorySlot {
            name: POSITION_CATEGORY.to_string(),
            strict: true,
            rows: start..layout.keys.len(),
        });

        Ok(layout)
    }

    pub fn positions(&self) -> usize {
        self.positions
    }

    pub fn row_count(&self) -> usize {
        self.keys.len()
    }

    /// All categories in declaration order, the `#` pseudo-category last.
    pub fn categories(&self) -> &[CategorySlot] {
        &self.categories
    }

    /// User-declared categories only.
    pub fn user_categories(&self) -> &[CategorySlot] {
        &self.categories[..self.categories.len() - 1]
    }

    pub fn category_index(&self, name: &str) -> Option<usize> {
        self.by_category.get(name).copied()
    }

    pub fn key(&self, row: RowId) -> &str {
        &self.keys[row]
    }

    pub fn item(&self, row: RowId) -> &str {
        &self.items[row]
    }

    /// The row's item parsed as an integer, if it is numeric.
    pub fn value(&self, row: RowId) -> Option<i64> {
        self.values[row]
    }

    pub fn lookup_key(&self, key: &str) -> Option<RowId> {
        self.by_key.get(key).copied()
    }

    pub fn lookup_short(&self, name: &str) -> Option<RowId> {
        self.short_names.get(name).copied()
    }

    /// The `#.index` row for a 1-based position index.
    pub fn position_row(&self, index: usize) -> Option<RowId> {
        if index == 0 || index > self.positions {
            return None;
        }
        let slot = &self.categories[self.categories.len() - 1];
        Some(slot.rows.start + index - 1)
    }

    /// Bitmask with one set bit per position.
    pub fn full_mask(&self) -> u64 {
        u64::MAX >> (MAX_POSITIONS - self.positions)
    }
}

/// The possibility grid for one search branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: Vec<u64>,
}

impl Matrix {
    /// A fresh grid: every row may occupy every position, except the `#`
    /// rows which start pinned to their own column.
    pub fn new(layout: &Layout) -> Matrix {
        let full = layout.full_mask();
        let mut rows = vec![full; layout.row_count()];
        let pos_slot = &layout.categories()[layout.categories().len() - 1];
        for (i, row) in pos_slot.rows.clone().enumerate() {
            rows[row] = 1 << i;
        }
        Matrix { rows }
    }

    pub fn mask(&self, row: RowId) -> u64 {
        self.rows[row]
    }

    pub fn possible(&self, row: RowId, position: usize) -> bool {
        self.rows[row] & (1 << position) != 0
    }

    /// Clears one cell. Returns whether it was set.
    pub fn clear(&mut self, row: RowId, position: usize) -> bool {
        let bit = 1 << position;
        let changed = self.rows[row] & bit != 0;
        self.rows[row] &= !bit;
        changed
    }

    /// Intersects a row with `mask`. Returns whether anything was cleared.
    pub fn retain(&mut self, row: RowId, mask: u64) -> bool {
        let next = self.rows[row] & mask;
        let changed = next != self.rows[row];
        self.rows[row] = next;
        changed
    }

    pub fn count(&self, row: RowId) -> u32 {
        self.rows[row].count_ones()
    }

    /// The single position a row is pinned to, or why it cannot be read yet.
    pub fn sole_position(&self, row: RowId) -> Result<usize, Undetermined> {
        match self.rows[row].count_ones() {
            0 => Err(Undetermined::NoTrueCell),
            1 => Ok(self.rows[row].trailing_zeros() as usize),
            _ => Err(Undetermined::MultipleTrueCells),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Category;

    fn two_by_three() -> Puzzle {
        Puzzle {
            categories: vec![
                Category {
                    name: "name".into(),
                    items: vec!["ann".into(), "bea".into(), "cy".into()],
                    great: false,
                },
                Category {
                    name: "pet".into(),
                    items: vec!["cat".into(), "dog".into(), "fox".into()],
                    great: false,
                },
            ],
            clues: Vec::new(),
            node_count: 0,
        }
    }

    #[test]
    fn layout_interns_rows_and_positions() {
        let layout = Layout::new(&two_by_three()).unwrap();
        assert_eq!(layout.positions(), 3);
        assert_eq!(layout.row_count(), 9);
        assert_eq!(layout.lookup_key("pet.dog"), Some(4));
        assert_eq!(layout.lookup_short("fox"), Some(5));
        assert_eq!(layout.position_row(1), Some(6));
        assert_eq!(layout.position_row(4), None);
        assert_eq!(layout.value(layout.position_row(2).unwrap()), Some(2));
    }

    #[test]
    fn ambiguous_short_names_are_absent() {
        let mut puzzle = two_by_three();
        puzzle.categories[1].items[0] = "ann".into();
        let layout = Layout::new(&puzzle).unwrap();
        assert_eq!(layout.lookup_short("ann"), None);
        assert!(layout.lookup_key("pet.ann").is_some());
    }

    #[test]
    fn position_rows_start_pinned() {
        let layout = Layout::new(&two_by_three()).unwrap();
        let matrix = Matrix::new(&layout);
        assert_eq!(matrix.mask(layout.position_row(2).unwrap()), 0b010);
        assert_eq!(matrix.mask(layout.lookup_short("ann").unwrap()), 0b111);
        assert_eq!(matrix.sole_position(layout.position_row(3).unwrap()), Ok(2));
    }

    #[test]
    fn narrowing_is_one_way() {
        let layout = Layout::new(&two_by_three()).unwrap();
        let mut matrix = Matrix::new(&layout);
        assert!(matrix.clear(0, 1));
        assert!(!matrix.clear(0, 1));
        assert_eq!(matrix.mask(0), 0b101);
        assert!(matrix.retain(0, 0b001));
        assert_eq!(matrix.sole_position(0), Ok(0));
    }

    #[test]
    fn strict_size_mismatch_is_rejected() {
        let mut puzzle = two_by_three();
        puzzle.categories[1].items.pop();
        match Layout::new(&puzzle) {
            Err(Error::MismatchedCategorySize { name, len, expected }) => {
                assert_eq!(name, "pet");
                assert_eq!((len, expected), (2, 3));
            }
            other => panic!("expected size mismatch, got {other:?}"),
        }
    }

    #[test]
    fn great_categories_may_be_larger() {
        let mut puzzle = two_by_three();
        puzzle.categories[1].items.push("owl".into());
        puzzle.categories[1].great = true;
        let layout = Layout::new(&puzzle).unwrap();
        assert_eq!(layout.positions(), 3);
        assert!(!layout.categories()[1].strict);
        assert_eq!(layout.categories()[1].rows.len(), 4);
    }
}
