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

//! Native command line: `zebra-solver <path> [iterations=50]`.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use wazebra_wasm::{Puzzle, Solver};

const DEFAULT_ITERATIONS: usize = 50;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        return Err("usage: zebra-solver <path> [iterations]".to_string());
    };
    let mut budget = match args.next() {
        Some(raw) => raw
            .parse()
            .map_err(|_| format!("'{raw}' is not an iteration count"))?,
        None => DEFAULT_ITERATIONS,
    };

    let source = std::fs::read_to_string(&path).map_err(|e| format!("{path}: {e}"))?;
    let puzzle: Puzzle = source.parse().map_err(|e| format!("{path}: {e}"))?;
    let solver = Solver::new(&puzzle).map_err(|e| format!("{path}: {e}"))?;

    let mut resume = None;
    let mut total = 0;
    loop {
        let outcome = solver.solve(budget, resume).map_err(|e| e.to_string())?;
        for solution in &outcome.solutions {
            println!("--- Solution ---");
            print!("{solution}");
        }
        total += outcome.solutions.len();

        if outcome.done {
            println!("{total} solution(s), search exhausted.");
            return Ok(());
        }
        match prompt(outcome.stack.len())? {
            Some(next_budget) => budget = next_budget,
            None => return Ok(()),
        }
        resume = Some(outcome.stack);
    }
}

/// Asks whether to keep going. `None` means quit.
fn prompt(open_branches: usize) -> Result<Option<usize>, String> {
    let stdin = io::stdin();
    loop {
        println!("{open_branches} branch(es) still open.");
        print!("Enter new iteration count to continue or 'q' to quit: ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| e.to_string())?;
        if read == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        match line.parse::<usize>() {
            Ok(count) if count > 0 => return Ok(Some(count)),
            _ => println!("'{line}' is not an iteration count."),
        }
    }
}
