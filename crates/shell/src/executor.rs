// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The command executor: shell-need/sudo-need detection, password
//! injection, and combined-output capture.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::detect::{needs_shell, needs_sudo};
use crate::escape::{replace_first, shell_escape};
use crate::error::ExecError;

/// Combined stdout/stderr transcript of one executed command.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Contract: run a shell command and return its captured transcript.
///
/// Implementations decide the shell-vs-direct-spawn and sudo-password
/// handling described in the executor's detection rules; callers only
/// ever see the resulting transcript and exit status.
pub trait CommandExecutor: Send + Sync {
    fn execute(&self, cmd: &str) -> Result<ExecOutput, ExecError>;
}

/// Spawns real child processes via `std::process::Command`.
pub struct SystemExecutor {
    shell: PathBuf,
    sudo_password: Option<String>,
}

impl SystemExecutor {
    pub fn new() -> Self {
        let shell = std::env::var_os("SHELL").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("/bin/sh"));
        Self { shell, sudo_password: None }
    }

    /// Caches the sudo password for the lifetime of this executor. The
    /// caller (the execution driver) is responsible for zeroizing its own
    /// copy once the run completes.
    pub fn with_sudo_password(mut self, password: impl Into<String>) -> Self {
        self.sudo_password = Some(password.into());
        self
    }
}

impl Default for SystemExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for SystemExecutor {
    fn execute(&self, cmd: &str) -> Result<ExecOutput, ExecError> {
        if cmd.trim().is_empty() {
            return Err(ExecError::EmptyCommand);
        }

        let mut cmd = cmd.to_string();
        if needs_sudo(&cmd) {
            let passwordless = passwordless_sudo_available();
            cmd = rewrite_for_sudo(&cmd, passwordless, self.sudo_password.as_deref());
        }

        debug!(command = %cmd, "executing");

        let output = if needs_shell(&cmd) {
            Command::new(&self.shell).arg("-c").arg(&cmd).stdin(Stdio::null()).output()
        } else {
            let mut parts = cmd.split_whitespace();
            let program = parts.next().ok_or(ExecError::EmptyCommand)?;
            Command::new(program).args(parts).stdin(Stdio::null()).output()
        }
        .map_err(|source| ExecError::Spawn { cmd: cmd.clone(), source })?;

        Ok(ExecOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
        })
    }
}

impl Drop for SystemExecutor {
    fn drop(&mut self) {
        // Best-effort sudo timestamp invalidation; ignore failures.
        let _ = Command::new("sudo").arg("-K").stdin(Stdio::null()).output();
    }
}

fn passwordless_sudo_available() -> bool {
    Command::new("sudo")
        .args(["-n", "true"])
        .stdin(Stdio::null())
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Rewrites a sudo-needing command to either use `-n` (passwordless) or
/// pipe the cached password through `-S`.
fn rewrite_for_sudo(cmd: &str, passwordless: bool, cached_password: Option<&str>) -> String {
    if passwordless {
        replace_first(cmd, "sudo ", "sudo -n ")
    } else if let Some(pw) = cached_password {
        replace_first(cmd, "sudo ", &format!("echo {} | sudo -S ", shell_escape(pw)))
    } else {
        cmd.to_string()
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;

    /// Records every command passed to `execute` and returns scripted
    /// outputs in order, falling back to a default success once exhausted.
    pub struct FakeExecutor {
        calls: Mutex<Vec<String>>,
        scripted: Mutex<Vec<ExecOutput>>,
    }

    impl FakeExecutor {
        pub fn new() -> Self {
            Self { calls: Mutex::new(Vec::new()), scripted: Mutex::new(Vec::new()) }
        }

        pub fn push_output(&self, output: ExecOutput) {
            self.scripted.lock().push(output);
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    impl Default for FakeExecutor {
        fn default() -> Self {
            Self::new()
        }
    }

    impl CommandExecutor for FakeExecutor {
        fn execute(&self, cmd: &str) -> Result<ExecOutput, ExecError> {
            self.calls.lock().push(cmd.to_string());
            let mut scripted = self.scripted.lock();
            if scripted.is_empty() {
                Ok(ExecOutput { stdout: String::new(), stderr: String::new(), success: true })
            } else {
                Ok(scripted.remove(0))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_prefers_passwordless_when_available() {
        let rewritten = rewrite_for_sudo("sudo apt-get update", true, Some("hunter2"));
        assert_eq!(rewritten, "sudo -n apt-get update");
    }

    #[test]
    fn rewrite_pipes_cached_password_through_sudo_s() {
        let rewritten = rewrite_for_sudo("sudo apt-get update", false, Some("hunter2"));
        assert_eq!(rewritten, "echo 'hunter2' | sudo -S apt-get update");
    }

    #[test]
    fn rewrite_leaves_command_untouched_without_credentials() {
        let rewritten = rewrite_for_sudo("sudo apt-get update", false, None);
        assert_eq!(rewritten, "sudo apt-get update");
    }

    #[test]
    fn empty_command_is_rejected() {
        let exec = SystemExecutor::new();
        assert!(matches!(exec.execute(""), Err(ExecError::EmptyCommand)));
    }

    #[test]
    fn direct_spawn_of_true_succeeds() {
        let exec = SystemExecutor::new();
        let out = exec.execute("true").unwrap();
        assert!(out.success);
    }
}
