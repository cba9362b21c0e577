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

//! Exercises the JavaScript-facing entry point under `wasm-pack test`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::wasm_bindgen_test;
use wazebra_wasm::wasm::solve_source;

#[wasm_bindgen_test]
fn solve_source_reports_an_object() {
    let report = solve_source("letter: a, b\n\na = #1\n", 100).unwrap();
    assert!(report.is_object());
}

#[wasm_bindgen_test]
fn parse_errors_become_js_strings() {
    let error = solve_source("letter a b\n", 100).unwrap_err();
    assert!(error.as_string().is_some());
}
