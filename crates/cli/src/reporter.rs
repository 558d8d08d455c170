// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal `Reporter` implementation: prints the `[i/N] <action> <detail>`
//! header line spec.md §4.7 describes before each rule, using the crate's
//! color palette.

use bp_engine::Reporter;

use crate::color;

pub struct TerminalReporter;

impl Reporter for TerminalReporter {
    fn rule_header(&self, index: usize, total: usize, _action: &str, detail: &str) {
        println!("[{}/{}] {}", index + 1, total, color::header(detail));
    }

    fn rule_failed(&self, index: usize, total: usize, error: &str) {
        eprintln!("[{}/{}] {}", index + 1, total, color::context(&format!("failed: {error}")));
    }
}
