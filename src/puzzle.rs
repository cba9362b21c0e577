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

//! A parsed puzzle: the category header plus the clue list.

use crate::ast::Clue;
use crate::error::Error;
use crate::parse;
use std::str::FromStr;

/// One header line: a named, ordered list of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub items: Vec<String>,
    /// Great categories may list more items than there are positions; the
    /// surplus goes unassigned.
    pub great: bool,
}

/// A complete puzzle description as read from ZBC text.
#[derive(Debug, Clone, PartialEq)]
pub struct Puzzle {
    pub categories: Vec<Category>,
    pub clues: Vec<Clue>,
    /// Total clue nodes allocated by the parser; sizes the per-branch
    /// settled-truth vector.
    pub node_count: usize,
}

impl Puzzle {
    pub fn parse(source: &str) -> Result<Puzzle, Error> {
        parse::parse_source(source)
    }

    /// Number of positions, once a strict category exists to define it.
    pub fn positions(&self) -> Option<usize> {
        self.categories.iter().find(|c| !c.great).map(|c| c.items.len())
    }
}

impl FromStr for Puzzle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Puzzle::parse(s)
    }
}
