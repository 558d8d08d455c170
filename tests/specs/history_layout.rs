// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario 6: history output files, one per rule, and the `history`
//! command's run-number defaulting and step-filtering.

use crate::support::Project;

#[test]
fn each_rule_gets_a_banner_shaped_output_file() {
    let project = Project::empty();
    let blueprint = project.file(
        "setup.bp",
        "mkdir one id:a on:[linux, mac]\nmkdir two id:b on:[linux, mac]\nmkdir three id:c on:[linux, mac]\n",
    );
    project.bp().args(&["apply", blueprint.to_str().unwrap()]).passes();

    for step in 0..3 {
        let content = project.step_output(1, step);
        assert!(content.starts_with("=== STDOUT ===\n"), "step {step} missing stdout banner:\n{content}");
        assert!(content.contains("\n\n=== STDERR ===\n"), "step {step} missing stderr banner:\n{content}");
    }
}

#[test]
fn history_with_no_args_prints_the_latest_run() {
    let project = Project::empty();
    let blueprint = project.file("setup.bp", "mkdir one id:a on:[linux, mac]\n");
    project.bp().args(&["apply", blueprint.to_str().unwrap()]).passes();
    project.file("setup.bp", "mkdir one id:a on:[linux, mac]\nmkdir two id:b on:[linux, mac]\n");
    project.bp().args(&["apply", blueprint.to_str().unwrap()]).passes();

    let output = project.bp().args(&["history"]).passes();
    output.stdout_has("run 2:");
}

#[test]
fn history_with_run_and_step_prints_only_that_step() {
    let project = Project::empty();
    let blueprint = project.file(
        "setup.bp",
        "mkdir one id:a on:[linux, mac]\nmkdir two id:b on:[linux, mac]\n",
    );
    project.bp().args(&["apply", blueprint.to_str().unwrap()]).passes();

    let output = project.bp().args(&["history", "1", "1"]).passes();
    let stdout = output.stdout();
    assert!(stdout.contains("=== STDOUT ==="));
    assert!(!stdout.contains("--- step"), "a specific step request should not print the step-breakdown headers");
}
