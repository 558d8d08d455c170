// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for the black-box `bp` specs: a scratch project
//! directory plus a scratch `$BP_STATE_DIR`, and a thin wrapper around
//! `assert_cmd` for invoking the built binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub struct Project {
    dir: TempDir,
    home: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
            home: TempDir::new().expect("tempdir"),
        }
    }

    /// Writes `name` under the project directory and returns its path.
    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write fixture file");
        path
    }

    /// Writes `name` under an arbitrary directory (e.g. a scratch git
    /// remote that lives outside the project directory).
    pub fn file_in(&self, dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write fixture file");
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The persisted state document, parsed as generic JSON.
    pub fn state_json(&self) -> serde_json::Value {
        let path = self.home.path().join(".blueprint").join("status.json");
        let raw = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()));
        serde_json::from_str(&raw).expect("parse status.json")
    }

    pub fn history_json(&self) -> Vec<serde_json::Value> {
        let path = self.home.path().join(".blueprint").join("history.json");
        match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).expect("parse history.json"),
            Err(_) => Vec::new(),
        }
    }

    pub fn step_output(&self, run: u64, step: usize) -> String {
        let path = self.home.path().join(".blueprint").join("history").join(run.to_string()).join(format!("{step}.output"));
        std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
    }

    pub fn bp(&self) -> Run {
        let mut cmd = Command::cargo_bin("bp").expect("built bp binary");
        cmd.current_dir(self.dir.path());
        cmd.env("BP_STATE_DIR", self.home.path());
        cmd.env("NO_COLOR", "1");
        Run { cmd }
    }
}

pub struct Run {
    cmd: Command,
}

impl Run {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    /// Asserts the run exits successfully and returns its output for
    /// further inspection.
    pub fn passes(mut self) -> Output {
        let assert = self.cmd.assert().success();
        let out = assert.get_output();
        Output { stdout: out.stdout.clone(), stderr: out.stderr.clone() }
    }

    /// Asserts the run exits with a failure and returns its output.
    pub fn fails(mut self) -> Output {
        let assert = self.cmd.assert().failure();
        let out = assert.get_output();
        Output { stdout: out.stdout.clone(), stderr: out.stderr.clone() }
    }
}

pub struct Output {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl Output {
    pub fn stdout_has(self, needle: &str) -> Self {
        let stdout = String::from_utf8_lossy(&self.stdout);
        assert!(stdout.contains(needle), "stdout did not contain {needle:?}:\n{stdout}");
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let stderr = String::from_utf8_lossy(&self.stderr);
        assert!(stderr.contains(needle), "stderr did not contain {needle:?}:\n{stderr}");
        self
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}
