// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bp history [<run-number> [<step-number>]]`: prints captured output.
//! Run 0 or omitted means the latest run.

use std::path::Path;

use bp_storage::history;

use crate::exit_error::ExitError;

pub fn handle(home: &Path, run_number: Option<u64>, step_number: Option<usize>) -> Result<(), ExitError> {
    let run = match run_number {
        Some(0) | None => history::latest_run_number(home).map_err(|e| ExitError::new(1, e.to_string()))?,
        Some(n) => n,
    };

    if run == 0 {
        println!("no runs recorded");
        return Ok(());
    }

    match step_number {
        Some(step) => match history::read_step_output(home, run, step) {
            Ok(content) => print!("{content}"),
            Err(e) => return Err(ExitError::new(1, format!("no output for run {run} step {step}: {e}"))),
        },
        None => {
            println!("run {run}:");
            // history.json records are not grouped by run number, so the
            // per-rule breakdown comes from the run's own output directory
            // instead: read sequential <i>.output files until one is missing.
            let mut step = 0;
            while let Ok(content) = history::read_step_output(home, run, step) {
                println!("--- step {step} ---");
                print!("{content}");
                step += 1;
            }
            if step == 0 {
                println!("no output recorded for run {run}");
            }
        }
    }
    Ok(())
}
