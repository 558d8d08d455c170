// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario 1: removing a rule from the blueprint synthesizes an
//! uninstall for the resource it used to create, and a second apply on
//! the now-empty blueprint produces no further uninstalls.

use crate::support::Project;

#[test]
fn removing_a_mkdir_rule_removes_the_directory_it_created() {
    let project = Project::empty();
    let blueprint = project.file("setup.bp", "mkdir sub id:a on:[linux, mac]\n");

    project.bp().args(&["apply", blueprint.to_str().unwrap()]).passes();
    assert!(project.path().join("sub").is_dir());
    let state = project.state_json();
    assert_eq!(state["mkdirs"].as_array().expect("mkdirs array").len(), 1);

    project.file("setup.bp", "");
    project.bp().args(&["apply", blueprint.to_str().unwrap()]).passes();
    assert!(!project.path().join("sub").exists(), "directory should be removed by drift cleanup");
    let state = project.state_json();
    assert!(state["mkdirs"].as_array().expect("mkdirs array").is_empty());

    // A repeat apply against the still-empty blueprint must not synthesize
    // further work: the reconciler has nothing left in state to clean up.
    let output = project.bp().args(&["plan", blueprint.to_str().unwrap()]).passes();
    output.stdout_has("no changes will be applied");
}
