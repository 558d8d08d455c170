// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario 3: a dependency cycle fails the run cleanly, with no side
//! effects and no history entries.

use crate::support::Project;

#[test]
fn cyclic_after_dependencies_fail_apply_without_side_effects() {
    let project = Project::empty();
    let blueprint = project.file(
        "setup.bp",
        "mkdir x id:x after:y on:[linux, mac]\nmkdir y id:y after:x on:[linux, mac]\n",
    );

    let output = project.bp().args(&["apply", blueprint.to_str().unwrap()]).fails();
    let stderr = output.stderr();
    assert!(stderr.contains('x') || stderr.contains('y'), "error should mention the cyclic rule ids:\n{stderr}");

    assert!(!project.path().join("x").exists());
    assert!(!project.path().join("y").exists());
    assert!(project.history_json().is_empty(), "no history entries should be recorded on a cycle error");
}
