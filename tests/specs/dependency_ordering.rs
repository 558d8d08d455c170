// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario 2: a rule with `after:` runs strictly after the rule it
//! names, regardless of the order the rules appear in the blueprint.

use crate::support::Project;

#[test]
fn after_dependency_runs_in_source_order() {
    let project = Project::empty();
    let blueprint = project.file(
        "setup.bp",
        "mkdir one id:a on:[linux, mac]\nmkdir two id:b after:a on:[linux, mac]\n",
    );

    let output = project.bp().args(&["apply", blueprint.to_str().unwrap()]).passes();

    let stdout = output.stdout();
    let a_pos = stdout.find("mkdir one").expect("mkdir one header present");
    let b_pos = stdout.find("mkdir two").expect("mkdir two header present");
    assert!(a_pos < b_pos, "mkdir one must run before mkdir two, which depends on it:\n{stdout}");
    assert!(project.path().join("two").is_dir());
}

#[test]
fn swapping_source_order_does_not_change_execution_order() {
    let project = Project::empty();
    let blueprint = project.file(
        "setup.bp",
        "mkdir two id:b after:a on:[linux, mac]\nmkdir one id:a on:[linux, mac]\n",
    );

    let output = project.bp().args(&["apply", blueprint.to_str().unwrap()]).passes();

    let stdout = output.stdout();
    let a_pos = stdout.find("mkdir one").expect("mkdir one header present");
    let b_pos = stdout.find("mkdir two").expect("mkdir two header present");
    assert!(a_pos < b_pos, "execution order must stay a,b regardless of source order:\n{stdout}");
}
