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

//! The WebAssembly surface.

use crate::puzzle::Puzzle;
use crate::solver::{Solution, Solver};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// What a single solve call reports back to JavaScript. The open work
/// stack stays on the Rust side; callers wanting to resume raise the
/// iteration budget instead.
#[derive(Debug, Serialize, Deserialize)]
pub struct SolveReport {
    pub done: bool,
    pub iterations: usize,
    pub options: usize,
    pub solutions: Vec<Solution>,
}

/// Parses and solves a ZBC puzzle text, returning
/// `{ done, iterations, options, solutions }`.
#[wasm_bindgen]
pub fn solve_source(source: &str, max_iterations: u32) -> Result<JsValue, JsValue> {
    let puzzle: Puzzle = source.parse().map_err(err_to_js)?;
    let solver = Solver::new(&puzzle).map_err(err_to_js)?;
    let outcome = solver.solve(max_iterations as usize, None).map_err(err_to_js)?;

    let report = SolveReport {
        done: outcome.done,
        iterations: outcome.iterations,
        options: outcome.options,
        solutions: outcome.solutions,
    };
    serde_wasm_bindgen::to_value(&report).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn err_to_js(error: crate::error::Error) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Module initialization.
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
