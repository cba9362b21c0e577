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

use wazebra_wasm::solver::{Outcome, Solution, propagate, subsets};
use wazebra_wasm::{Puzzle, Solver};

fn solver_for(source: &str) -> Solver {
    let puzzle: Puzzle = source.parse().unwrap();
    Solver::new(&puzzle).unwrap()
}

fn solve_all(source: &str) -> Outcome {
    let solver = solver_for(source);
    let outcome = solver.solve(100_000, None).unwrap();
    assert!(outcome.done, "budget should cover the whole search");
    outcome
}

fn items<'a>(solution: &'a Solution, category: &str) -> &'a [String] {
    &solution
        .categories
        .iter()
        .find(|c| c.name == category)
        .unwrap_or_else(|| panic!("no category '{category}' in solution"))
        .items
}

const ZEBRA: &str = "\
nationality: englishman, spaniard, ukrainian, norwegian, japanese
color: red, green, ivory, yellow, blue
drink: coffee, tea, milk, juice, water
smoke: oldgold, kools, chesterfields, luckystrike, parliaments
pet: dog, snails, fox, horse, zebra

englishman = red
spaniard = dog
coffee = green
ukrainian = tea
ivory - green
oldgold = snails
kools = yellow
milk = #3
norwegian = #1
chesterfields _ fox
kools _ horse
luckystrike = juice
japanese = parliaments
norwegian _ blue
";

#[test]
fn classic_zebra_puzzle_has_the_known_unique_solution() {
    let outcome = solve_all(ZEBRA);
    assert_eq!(outcome.solutions.len(), 1);

    let solution = &outcome.solutions[0];
    assert_eq!(
        items(solution, "nationality"),
        ["norwegian", "ukrainian", "englishman", "spaniard", "japanese"]
    );
    assert_eq!(
        items(solution, "color"),
        ["yellow", "blue", "red", "ivory", "green"]
    );
    assert_eq!(
        items(solution, "drink"),
        ["water", "tea", "milk", "juice", "coffee"]
    );
    assert_eq!(
        items(solution, "smoke"),
        ["kools", "chesterfields", "oldgold", "luckystrike", "parliaments"]
    );
    assert_eq!(
        items(solution, "pet"),
        ["fox", "horse", "snails", "dog", "zebra"]
    );
}

#[test]
fn one_equality_over_two_free_categories() {
    // One pairing clue leaves 3 columns for the pair and the remaining two
    // rows of each category free: 3 * 2 * 2 assignments.
    let outcome = solve_all("letter: a, b, c\ngreek: x, y, z\n\na = x\n");
    assert_eq!(outcome.solutions.len(), 12);
    for solution in &outcome.solutions {
        let letters = items(solution, "letter");
        let greeks = items(solution, "greek");
        let position = letters.iter().position(|i| i == "a").unwrap();
        assert_eq!(greeks[position], "x");
    }
}

#[test]
fn two_items_forced_onto_one_position_is_a_contradiction() {
    let outcome = solve_all("letter: a, b\n\na = #1 & b = #1\n");
    assert!(outcome.done);
    assert!(outcome.solutions.is_empty());
}

#[test]
fn surplus_items_may_go_unused() {
    // 3 positions, 5 colors: P(5,3) = 60 injective color assignments, minus
    // the 12 that put red in position 3, times 3! letter orders.
    let source = "letter: a, b, c\ncolor+: red, green, blue, white, black\n\nred in (#1, #2)\n";
    let outcome = solve_all(source);
    assert_eq!(outcome.solutions.len(), 288);
    for solution in &outcome.solutions {
        let colors = items(solution, "color");
        assert_ne!(colors[2], "red");
        let mut sorted = colors.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 3, "a color may be used at most once");
    }
}

#[test]
fn arithmetic_over_a_numeric_category() {
    let source = "person: alice, bob, carol\nage: 10, 20, 30\n\nalice:age + bob:age == 40\n";
    let outcome = solve_all(source);
    assert_eq!(outcome.solutions.len(), 12);
    for solution in &outcome.solutions {
        let people = items(solution, "person");
        let ages = items(solution, "age");
        let alice = people.iter().position(|p| p == "alice").unwrap();
        let bob = people.iter().position(|p| p == "bob").unwrap();
        let sum: i64 = ages[alice].parse::<i64>().unwrap() + ages[bob].parse::<i64>().unwrap();
        assert_eq!(sum, 40);
    }
}

#[test]
fn truths_counts_exactly() {
    // Permutations of four letters where exactly two of the three pins
    // hold; with four items that leaves three assignments.
    let source = "letter: a, b, c, d\n\ntruths(a = #1, b = #2, c = #3) == 2\n";
    let outcome = solve_all(source);
    assert_eq!(outcome.solutions.len(), 3);
    for solution in &outcome.solutions {
        let letters = items(solution, "letter");
        let pins = [("a", 0), ("b", 1), ("c", 2)];
        let held = pins
            .iter()
            .filter(|(letter, position)| letters[*position] == *letter)
            .count();
        assert_eq!(held, 2);
    }
}

#[test]
fn dynamic_clue_equals_its_expansion() {
    let dynamic = "age: 1, 2, 3\nsize: 1, 2, 3\n\n$:age != $:size\n";
    let expanded = "age: 1, 2, 3\nsize: 1, 2, 3\n\n\
        (#1:age != #1:size) & (#2:age != #2:size) & (#3:age != #3:size)\n";

    let first = solve_all(dynamic);
    let second = solve_all(expanded);
    assert_eq!(first.solutions.len(), 12);

    let mut lhs: Vec<String> = first.solutions.iter().map(|s| s.to_string()).collect();
    let mut rhs: Vec<String> = second.solutions.iter().map(|s| s.to_string()).collect();
    lhs.sort();
    rhs.sort();
    assert_eq!(lhs, rhs);
}

#[test]
fn identical_inputs_solve_identically() {
    let first = solve_all(ZEBRA);
    let second = solve_all(ZEBRA);
    assert_eq!(first.solutions, second.solutions);
    assert_eq!(first.iterations, second.iterations);
    assert_eq!(first.options, second.options);
}

#[test]
fn interrupted_runs_resume_without_loss() {
    let source = "letter: a, b, c\ngreek: x, y, z\n\na = x\n";
    let solver = solver_for(source);
    let full = solver.solve(100_000, None).unwrap();
    assert!(full.done);

    let mut partial = solver.solve(2, None).unwrap();
    assert!(!partial.done);
    let mut solutions = partial.solutions.clone();
    let mut iterations = partial.iterations;
    while !partial.done {
        partial = solver.solve(3, Some(partial.stack)).unwrap();
        solutions.extend(partial.solutions.iter().cloned());
        iterations += partial.iterations;
    }

    assert_eq!(solutions, full.solutions);
    assert_eq!(iterations, full.iterations);
}

#[test]
fn propagation_only_ever_clears_cells() {
    let solver = solver_for(ZEBRA);
    let mut branch = solver.initial_branch();
    let before: Vec<u64> = (0..solver.layout().row_count())
        .map(|row| branch.matrix.mask(row))
        .collect();

    for clue in solver.clues() {
        propagate::apply(
            clue,
            &mut branch.matrix,
            solver.layout(),
            solver.subset_masks(),
            &mut branch.solved,
        )
        .unwrap();
    }

    for (row, &mask) in before.iter().enumerate() {
        let after = branch.matrix.mask(row);
        assert_eq!(after & !mask, 0, "row {row} gained a position");
    }
}

#[test]
fn offset_clue_narrows_both_rows() {
    let solver = solver_for("letter: a, b, c\n\na - b\n");
    let mut branch = solver.initial_branch();
    propagate::apply(
        &solver.clues()[0],
        &mut branch.matrix,
        solver.layout(),
        solver.subset_masks(),
        &mut branch.solved,
    )
    .unwrap();

    let a = solver.layout().lookup_short("a").unwrap();
    let b = solver.layout().lookup_short("b").unwrap();
    assert_eq!(branch.matrix.mask(a), 0b011, "a cannot sit in the last column");
    assert_eq!(branch.matrix.mask(b), 0b110, "b cannot sit in the first column");
}

#[test]
fn subset_elimination_reserves_covered_positions() {
    let solver = solver_for("letter: a, b, c\n");
    let mut branch = solver.initial_branch();
    let layout = solver.layout();
    let a = layout.lookup_short("a").unwrap();
    let b = layout.lookup_short("b").unwrap();
    let c = layout.lookup_short("c").unwrap();

    // a and b squeezed into the first two columns: c loses them.
    branch.matrix.retain(a, 0b011);
    branch.matrix.retain(b, 0b011);
    let changed = subsets::eliminate(&mut branch.matrix, layout, 0, solver.subset_masks());
    assert!(changed);
    assert_eq!(branch.matrix.mask(c), 0b100);
}

#[test]
fn ordering_clue_with_pinned_right_operand_is_unsatisfiable() {
    let outcome = solve_all("letter: a, b, c\n\nb = #1 & a -- b\n");
    assert!(outcome.solutions.is_empty());
}

#[test]
fn statistics_count_settles_and_children() {
    let outcome = solve_all("letter: a, b, c\ngreek: x, y, z\n\na = x\n");
    // The root settles once and every created child settles exactly once.
    assert_eq!(outcome.iterations, outcome.options + 1);
}
