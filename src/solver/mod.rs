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

//! The constraint solver.
//!
//! This module orchestrates and delegates to the submodules: each branch is
//! settled to a fixpoint of clue propagation plus subset elimination, dead
//! and solved branches are retired, and open ones fork on the
//! most-constrained cell. Branches own their matrix and their memo of
//! settled clue verdicts; the clue list and layout are shared read-only.

pub mod arith;
pub mod check;
pub mod combos;
pub mod propagate;
pub mod resolve;
pub mod subsets;

use crate::ast::Clue;
use crate::error::Error;
use crate::matrix::{Layout, Matrix};
use crate::puzzle::Puzzle;
use combos::SubsetMasks;
use serde::{Deserialize, Serialize};

/// Per-branch memo of a clue node's permanent verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Solved {
    #[default]
    Unknown,
    True,
    False,
}

/// One open state in the search: its matrix plus its verdict memo.
#[derive(Debug, Clone)]
pub struct Branch {
    pub matrix: Matrix,
    pub solved: Vec<Solved>,
}

/// A fully determined assignment, user categories only. `items[p]` is the
/// item at position `p`; unused great-category items do not appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub categories: Vec<SolvedCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedCategory {
    pub name: String,
    pub items: Vec<String>,
}

/// Result of one (possibly budget-limited) search run.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// True when the work stack is exhausted.
    pub done: bool,
    /// Remaining open branches; feed back into [`Solver::solve`] to resume.
    pub stack: Vec<Branch>,
    pub solutions: Vec<Solution>,
    /// Branch states settled during this run.
    pub iterations: usize,
    /// Child branches created during this run.
    pub options: usize,
}

enum Settled {
    Solved,
    Open,
    Dead,
}

pub struct Solver {
    layout: Layout,
    clues: Vec<Clue>,
    masks: SubsetMasks,
    node_count: usize,
}

impl Solver {
    pub fn new(puzzle: &Puzzle) -> Result<Solver, Error> {
        let layout = Layout::new(puzzle)?;
        let masks = SubsetMasks::new(layout.positions());
        Ok(Solver {
            layout,
            clues: puzzle.clues.clone(),
            masks,
            node_count: puzzle.node_count,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn subset_masks(&self) -> &SubsetMasks {
        &self.masks
    }

    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }

    /// The unconstrained starting branch.
    pub fn initial_branch(&self) -> Branch {
        Branch {
            matrix: Matrix::new(&self.layout),
            solved: vec![Solved::Unknown; self.node_count],
        }
    }

    /// Runs the search for at most `max_iterations` settled branches.
    /// A `resume` stack replaces the initial state.
    ///
    /// The stack is processed in waves: every branch of the current wave is
    /// settled, its children go into the next wave. If the budget runs out
    /// mid-wave the unprocessed tail is returned ahead of the children, so
    /// resuming with a fresh budget continues exactly where this run
    /// stopped.
    pub fn solve(
        &self,
        max_iterations: usize,
        resume: Option<Vec<Branch>>,
    ) -> Result<Outcome, Error> {
        let mut stack = resume.unwrap_or_else(|| vec![self.initial_branch()]);
        let mut solutions = Vec::new();
        let mut iterations = 0usize;
        let mut options = 0usize;

        while !stack.is_empty() && iterations < max_iterations {
            let mut next: Vec<Branch> = Vec::new();
            let mut wave = stack.into_iter();
            while let Some(mut branch) = wave.next() {
                if iterations >= max_iterations {
                    let mut carry: Vec<Branch> = std::iter::once(branch).chain(wave).collect();
                    carry.append(&mut next);
                    return Ok(Outcome {
                        done: false,
                        stack: carry,
                        solutions,
                        iterations,
                        options,
                    });
                }
                iterations += 1;
                match self.settle(&mut branch)? {
                    Settled::Solved => solutions.push(self.extract(&branch.matrix)),
                    Settled::Dead => {}
                    Settled::Open => {
                        let children = self.fork(&branch);
                        options += children.len();
                        next.extend(children);
                    }
                }
            }
            stack = next;
        }

        Ok(Outcome {
            done: stack.is_empty(),
            stack,
            solutions,
            iterations,
            options,
        })
    }

    /// Narrows one branch to quiescence, then classifies it.
    fn settle(&self, branch: &mut Branch) -> Result<Settled, Error> {
        loop {
            let before = branch.matrix.clone();
            for clue in &self.clues {
                propagate::apply(
                    clue,
                    &mut branch.matrix,
                    &self.layout,
                    &self.masks,
                    &mut branch.solved,
                )?;
            }
            subsets::eliminate_all(&mut branch.matrix, &self.layout, &self.masks);
            if branch.matrix == before {
                break;
            }
        }

        // Strict items must still fit somewhere.
        for slot in self.layout.categories().iter().filter(|s| s.strict) {
            for row in slot.rows.clone() {
                if branch.matrix.count(row) == 0 {
                    return Ok(Settled::Dead);
                }
            }
        }

        // Every position needs a candidate from every category; the branch
        // is determined once each of these counts reaches one.
        let mut complete = true;
        for slot in self.layout.categories() {
            for position in 0..self.layout.positions() {
                let remaining = slot
                    .rows
                    .clone()
                    .filter(|&row| branch.matrix.possible(row, position))
                    .count();
                if remaining == 0 {
                    return Ok(Settled::Dead);
                }
                complete &= remaining == 1;
            }
        }

        // No item twice: catches a surplus great item claimed by two
        // positions, which the column counts cannot see.
        if complete {
            for slot in self.layout.categories() {
                for row in slot.rows.clone() {
                    if branch.matrix.count(row) > 1 {
                        return Ok(Settled::Dead);
                    }
                }
            }
        }

        // Final say goes to the checker; a permanent violation that
        // propagation could not express kills the branch here.
        for clue in &self.clues {
            if !check::holds(clue, &branch.matrix, &self.layout, &mut branch.solved)? {
                return Ok(Settled::Dead);
            }
        }

        Ok(if complete { Settled::Solved } else { Settled::Open })
    }

    /// Forks on the open (category, position) cell with the fewest
    /// remaining items. Ties go to the earliest category, then the lowest
    /// position, so runs are reproducible.
    fn fork(&self, branch: &Branch) -> Vec<Branch> {
        let mut best: Option<(usize, usize, usize)> = None;
        for (ci, slot) in self.layout.categories().iter().enumerate() {
            for position in 0..self.layout.positions() {
                let count = slot
                    .rows
                    .clone()
                    .filter(|&row| branch.matrix.possible(row, position))
                    .count();
                if count >= 2 && best.is_none_or(|(c, _, _)| count < c) {
                    best = Some((count, ci, position));
                }
            }
        }
        let Some((_, ci, position)) = best else {
            return Vec::new();
        };

        let slot = &self.layout.categories()[ci];
        let mut children = Vec::new();
        for row in slot.rows.clone() {
            if !branch.matrix.possible(row, position) {
                continue;
            }
            let mut child = branch.clone();
            for other in slot.rows.clone() {
                if other != row {
                    child.matrix.clear(other, position);
                }
            }
            children.push(child);
        }
        children
    }

    /// Reads a fully determined matrix into a [`Solution`].
    fn extract(&self, matrix: &Matrix) -> Solution {
        let categories = self
            .layout
            .user_categories()
            .iter()
            .map(|slot| SolvedCategory {
                name: slot.name.clone(),
                items: (0..self.layout.positions())
                    .map(|position| {
                        slot.rows
                            .clone()
                            .find(|&row| matrix.possible(row, position))
                            .map(|row| self.layout.item(row).to_string())
                            .unwrap_or_default()
                    })
                    .collect(),
            })
            .collect();
        Solution { categories }
    }
}
