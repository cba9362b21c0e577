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

//! Failure types shared across the crate.

use crate::ast::Span;
use thiserror::Error;

/// A permanent failure: malformed input, an unresolved symbol, or a type
/// mismatch. These abort solving and carry a source position where one
/// exists. Branch rejection during search is *not* an error and never
/// surfaces here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("the puzzle defines no categories")]
    NoCategories,

    #[error("category '{name}' has {len} items but the puzzle has {expected} positions")]
    MismatchedCategorySize {
        name: String,
        len: usize,
        expected: usize,
    },

    #[error("the puzzle has {len} positions; at most 64 are supported")]
    TooManyPositions { len: usize },

    #[error("{span} unknown identifier '{name}'")]
    UnknownIdentifier { name: String, span: Span },

    #[error("{span} unknown category '{name}'")]
    UnknownCategory { name: String, span: Span },

    #[error("{span} 'in' requires all-arithmetic or all-identifier members")]
    SetRequiresArithmetic { span: Span },

    #[error("{span} positional operators take identifiers, not values")]
    InvalidPositionalOperand { span: Span },

    #[error("{span} {message}")]
    Syntax { message: String, span: Span },
}

/// Why a row's position cannot be read off the matrix yet. Raised by
/// [`crate::matrix::Matrix::sole_position`] and converted to a conservative
/// `true` at the checker boundary: an empty row is a contradiction that the
/// per-branch state checks will surface, a multi-cell row is simply not
/// determined yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Undetermined {
    NoTrueCell,
    MultipleTrueCells,
}
