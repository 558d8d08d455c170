// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario 4: a first apply clones and records the commit; a second
//! apply against an unchanged remote reports "Already up to date" and
//! keeps the same commit; a third apply after the remote advances
//! reports "Updated" and records the new commit.

use std::process::Command;

use crate::support::Project;

fn git(dir: &std::path::Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "bp-specs")
        .env("GIT_AUTHOR_EMAIL", "bp-specs@example.com")
        .env("GIT_COMMITTER_NAME", "bp-specs")
        .env("GIT_COMMITTER_EMAIL", "bp-specs@example.com")
        .status()
        .expect("run git");
    assert!(status.success(), "git {args:?} failed");
}

fn head_commit(dir: &std::path::Path) -> String {
    let out = Command::new("git").args(["rev-parse", "HEAD"]).current_dir(dir).output().expect("git rev-parse");
    String::from_utf8(out.stdout).expect("utf8").trim().to_string()
}

#[test]
fn repeat_apply_is_idempotent_and_tracks_remote_advances() {
    let project = Project::empty();
    let remote = tempfile::tempdir().expect("remote tempdir");
    git(remote.path(), &["init"]);
    project.file_in(remote.path(), "README.md", "v1");
    git(remote.path(), &["add", "."]);
    git(remote.path(), &["commit", "-m", "v1"]);
    let c1 = head_commit(remote.path());

    let blueprint = project.file(
        "setup.bp",
        &format!("clone {} to:r on:[linux, mac]\n", remote.path().display()),
    );

    project.bp().args(&["apply", blueprint.to_str().unwrap()]).passes();
    let state = project.state_json();
    let clones = state["clones"].as_array().expect("clones array");
    assert_eq!(clones.len(), 1);
    assert_eq!(clones[0]["commit"], c1);

    let output = project.bp().args(&["apply", blueprint.to_str().unwrap()]).passes();
    output.stdout_has("Already up to date");
    let state = project.state_json();
    assert_eq!(state["clones"][0]["commit"], c1);

    project.file_in(remote.path(), "README.md", "v2");
    git(remote.path(), &["add", "."]);
    git(remote.path(), &["commit", "-m", "v2"]);
    let c2 = head_commit(remote.path());

    let output = project.bp().args(&["apply", blueprint.to_str().unwrap()]).passes();
    output.stdout_has("Updated");
    let state = project.state_json();
    assert_eq!(state["clones"][0]["commit"], c2);
}
