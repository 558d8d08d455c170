// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario 5: `--skip-id`/`--skip-group` suppress all drift-derived
//! work, not just the rules they name directly.

use crate::support::Project;

#[test]
fn skip_id_suppresses_the_uninstall_it_would_otherwise_synthesize() {
    let project = Project::empty();
    let v1 = project.file("setup.bp", "mkdir curl id:curl on:[linux, mac]\nmkdir vim id:vim on:[linux, mac]\n");
    project.bp().args(&["apply", v1.to_str().unwrap()]).passes();
    assert!(project.path().join("vim").is_dir());

    let v1_prime = project.file("setup.bp", "mkdir curl id:curl on:[linux, mac]\n");
    project.bp().args(&["apply", v1_prime.to_str().unwrap(), "--skip-id", "vim"]).passes();
    assert!(project.path().join("vim").is_dir(), "vim must survive while its id is skipped");
    let state = project.state_json();
    assert!(
        state["mkdirs"].as_array().unwrap().iter().any(|m| m["path"].as_str().unwrap().ends_with("vim")),
        "vim entry must remain in state while skipped"
    );

    project.bp().args(&["apply", v1_prime.to_str().unwrap()]).passes();
    assert!(!project.path().join("vim").exists(), "a subsequent apply without skip flags must clean up vim");
}
