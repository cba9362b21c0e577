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

//! A solver for zebra-style logic puzzles, compiled to WebAssembly and
//! usable natively.
//!
//! Puzzles arrive as ZBC text (see the repository README for the format):
//! a header of item categories followed by one clue per line. The solver
//! interleaves clue propagation, subset elimination and depth-limited
//! branching until every consistent assignment is found.

pub mod ast;
pub mod error;
pub mod format;
pub mod matrix;
pub mod parse;
pub mod puzzle;
pub mod solver;
pub mod wasm;

pub use error::Error;
pub use puzzle::Puzzle;
pub use solver::{Branch, Outcome, Solution, Solver};
