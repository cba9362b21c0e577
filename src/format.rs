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

//! Human-readable grid rendering for solved puzzles.

use crate::solver::Solution;
use std::fmt;

impl fmt::Display for Solution {
    /// One row per category, cells column-aligned:
    ///
    /// ```text
    /// name  ann  bea  cy
    /// pet   dog  fox  cat
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let positions = self
            .categories
            .first()
            .map(|c| c.items.len())
            .unwrap_or_default();

        let name_width = self
            .categories
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or_default();
        let column_widths: Vec<usize> = (0..positions)
            .map(|p| {
                self.categories
                    .iter()
                    .map(|c| c.items[p].len())
                    .max()
                    .unwrap_or_default()
            })
            .collect();

        for category in &self.categories {
            write!(f, "{:name_width$}", category.name)?;
            for (item, &width) in category.items.iter().zip(&column_widths) {
                write!(f, "  {item:width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::solver::{Solution, SolvedCategory};

    #[test]
    fn columns_line_up() {
        let solution = Solution {
            categories: vec![
                SolvedCategory {
                    name: "name".into(),
                    items: vec!["ann".into(), "bea".into(), "cy".into()],
                },
                SolvedCategory {
                    name: "pet".into(),
                    items: vec!["dog".into(), "fox".into(), "cat".into()],
                },
            ],
        };
        let rendered = solution.to_string();
        assert_eq!(rendered, "name  ann  bea  cy\npet   dog  fox  cat\n");
    }
}
