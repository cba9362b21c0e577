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

use wazebra_wasm::{Error, Puzzle, Solver};

fn solve(source: &str) -> Result<usize, Error> {
    let puzzle: Puzzle = source.parse()?;
    let solver = Solver::new(&puzzle)?;
    let outcome = solver.solve(100_000, None)?;
    Ok(outcome.solutions.len())
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let source = "\
// a tiny puzzle
letter: a, b, c   // the sizing category

greek: x, y
";
    match solve(source) {
        Err(Error::MismatchedCategorySize { name, len, expected }) => {
            assert_eq!(name, "greek");
            assert_eq!((len, expected), (2, 3));
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn an_empty_puzzle_has_no_categories() {
    assert!(matches!(solve("// nothing here\n"), Err(Error::NoCategories)));
}

#[test]
fn unknown_identifiers_surface_with_a_position() {
    let source = "letter: a, b\n\na = wolf\n";
    match solve(source) {
        Err(Error::UnknownIdentifier { name, span }) => {
            assert_eq!(name, "wolf");
            assert_eq!((span.line, span.column), (3, 5));
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn unknown_categories_surface_from_value_expressions() {
    let source = "letter: a, b\n\na:height == 3\n";
    match solve(source) {
        Err(Error::UnknownCategory { name, .. }) => assert_eq!(name, "height"),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn mixed_membership_sets_are_a_type_error() {
    let source = "letter: a, b\n\na in (b, 3)\n";
    assert!(matches!(
        solve(source),
        Err(Error::SetRequiresArithmetic { .. })
    ));
}

#[test]
fn ranges_need_an_arithmetic_subject() {
    let source = "letter: a, b\n\na in [1, 2]\n";
    assert!(matches!(
        solve(source),
        Err(Error::SetRequiresArithmetic { .. })
    ));
}

#[test]
fn ambiguous_short_names_must_be_qualified() {
    let source = "ink: red, blue\npaint: red, green\n\nred = #1\n";
    assert!(matches!(solve(source), Err(Error::UnknownIdentifier { .. })));

    let qualified = "ink: red, blue\npaint: red, green\n\nink.red = #1\n";
    assert_eq!(solve(qualified).unwrap(), 2);
}

#[test]
fn error_messages_lead_with_the_position() {
    let source = "letter: a, b\n\na = wolf\n";
    let message = solve(source).unwrap_err().to_string();
    assert!(message.starts_with("[3, 5]"), "got: {message}");
    assert!(message.contains("wolf"));
}

#[test]
fn adjacency_matches_its_spelled_out_form() {
    let sugar = "letter: a, b, c\n\na _ b\n";
    let spelled = "letter: a, b, c\n\n(a -1- b) | (b -1- a)\n";
    assert_eq!(solve(sugar).unwrap(), solve(spelled).unwrap());
    assert_eq!(solve(sugar).unwrap(), 4);
}

#[test]
fn qualified_numeric_items_resolve() {
    let source = "age: 10, 20, 30\n\nage.20 = #2\n";
    assert_eq!(solve(source).unwrap(), 2);
}

#[test]
fn membership_in_a_range_filters_values() {
    let source = "person: ann, bea\nage: 10, 30\n\nann:age in [5, 15]\n";
    // ann must take the age 10, leaving only bea's position free.
    assert_eq!(solve(source).unwrap(), 2);
}

#[test]
fn implication_is_checked() {
    // If a leads, b is last; a leading with b in the middle must vanish.
    let source = "letter: a, b, c\n\na = #1 => b = #3\n";
    let count = solve(source).unwrap();
    // 6 permutations, minus the one with a first and b second.
    assert_eq!(count, 5);
}
