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

//! Identifier resolution: a written symbol plus the current dynamic
//! binding, down to a matrix row.

use crate::ast::Ident;
use crate::error::Error;
use crate::matrix::{Layout, RowId};

/// Resolves `ident` under a 1-based dynamic binding. Tried in order:
/// `$` is the bound position; `#`-prefixed symbols are position rows;
/// unambiguous short names; verbatim `category.item` keys.
pub fn row_id(layout: &Layout, ident: &Ident, binding: usize) -> Result<RowId, Error> {
    let name = ident.name.as_str();
    let unknown = || Error::UnknownIdentifier {
        name: name.to_string(),
        span: ident.span,
    };

    if name == "$" {
        return layout.position_row(binding).ok_or_else(unknown);
    }
    if let Some(rest) = name.strip_prefix('#') {
        let digits: String = rest.chars().filter(|&c| c != '.').collect();
        let index: usize = digits.parse().map_err(|_| unknown())?;
        return layout.position_row(index).ok_or_else(unknown);
    }
    if let Some(row) = layout.lookup_short(name) {
        return Ok(row);
    }
    if let Some(row) = layout.lookup_key(name) {
        return Ok(row);
    }
    Err(unknown())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;
    use crate::puzzle::Puzzle;

    fn ident(name: &str) -> Ident {
        Ident {
            name: name.to_string(),
            span: Span { line: 1, column: 1 },
        }
    }

    fn layout() -> Layout {
        let puzzle: Puzzle = "name: ann, bea, cy\npet: cat, dog, fox\n".parse().unwrap();
        Layout::new(&puzzle).unwrap()
    }

    #[test]
    fn resolves_in_documented_order() {
        let layout = layout();
        assert_eq!(row_id(&layout, &ident("$"), 2).unwrap(), layout.position_row(2).unwrap());
        assert_eq!(row_id(&layout, &ident("#3"), 1).unwrap(), layout.position_row(3).unwrap());
        assert_eq!(row_id(&layout, &ident("#.3"), 1).unwrap(), layout.position_row(3).unwrap());
        assert_eq!(row_id(&layout, &ident("dog"), 1), Ok(4));
        assert_eq!(row_id(&layout, &ident("pet.dog"), 1), Ok(4));
    }

    #[test]
    fn unknown_symbols_fail_with_their_span() {
        let layout = layout();
        match row_id(&layout, &ident("wolf"), 1) {
            Err(Error::UnknownIdentifier { name, .. }) => assert_eq!(name, "wolf"),
            other => panic!("expected an unknown identifier, got {other:?}"),
        }
        assert!(row_id(&layout, &ident("#9"), 1).is_err());
    }
}
