// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use bp_core::{Action, KnownHostsPayload, Os, Rule};
use bp_storage::{KnownHostEntry, StateDocument};
use chrono::Utc;

use crate::error::HandlerError;
use crate::handler::{Handler, HandlerContext, HandlerOutcome};

const KNOWN_HOSTS_RELATIVE: &str = ".ssh/known_hosts";

pub struct KnownHostsHandler {
    pub payload: KnownHostsPayload,
}

impl KnownHostsHandler {
    pub fn new(payload: KnownHostsPayload) -> Self {
        Self { payload }
    }
}

fn known_hosts_path(home: &Path) -> PathBuf {
    home.join(KNOWN_HOSTS_RELATIVE)
}

impl Handler for KnownHostsHandler {
    fn apply(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        let type_flag = self
            .payload
            .key_type
            .as_deref()
            .map(|t| format!(" -t {t}"))
            .unwrap_or_default();
        let out = ctx.executor.execute(&format!("ssh-keyscan{type_flag} {}", self.payload.host))?;
        if !out.success || out.stdout.trim().is_empty() {
            return Err(HandlerError::Git(format!(
                "ssh-keyscan for {} produced no output",
                self.payload.host
            )));
        }

        let path = known_hosts_path(ctx.home);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| HandlerError::io(parent, e))?;
        }

        let existing = std::fs::read_to_string(&path).unwrap_or_default();
        let mut lines: Vec<&str> = existing.lines().collect();
        let mut appended = 0;
        for new_line in out.stdout.lines() {
            let new_line = new_line.trim();
            if new_line.is_empty() || new_line.starts_with('#') {
                continue;
            }
            if !lines.iter().any(|l| *l == new_line) {
                lines.push(new_line);
                appended += 1;
            }
        }
        let mut contents = lines.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        std::fs::write(&path, contents).map_err(|e| HandlerError::io(&path, e))?;

        Ok(HandlerOutcome {
            detail: format!("known_hosts {} ({appended} new)", self.payload.host),
            ..Default::default()
        })
    }

    fn revert(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError> {
        remove_known_host_lines(ctx.home, &self.payload.host)?;
        Ok(HandlerOutcome { detail: format!("removed known_hosts entry for {}", self.payload.host), ..Default::default() })
    }

    fn command_preview(&self, _ctx: &HandlerContext, is_revert: bool) -> String {
        if is_revert {
            format!("ssh-keygen -R {}", self.payload.host)
        } else {
            format!("ssh-keyscan {} >> ~/.ssh/known_hosts", self.payload.host)
        }
    }

    fn display_summary(&self) -> String {
        format!("known_hosts {}", self.payload.host)
    }

    fn dependency_key(&self) -> String {
        self.payload.host.clone()
    }

    fn find_stale_in_state(
        &self,
        state: &StateDocument,
        current_rules: &[Rule],
        blueprint: &Path,
        os: &Os,
    ) -> Vec<Rule> {
        let desired: std::collections::HashSet<&str> = current_rules
            .iter()
            .filter_map(|r| match &r.action {
                Action::KnownHosts(p) => Some(p.host.as_str()),
                _ => None,
            })
            .collect();

        state
            .known_hosts
            .iter()
            .filter(|e| e.blueprint == blueprint && e.os == os.tag() && !desired.contains(e.host.as_str()))
            .map(|e| Rule::new(Action::Uninstall(bp_core::UninstallPayload::KnownHost(e.host.clone()))))
            .collect()
    }

    fn update_state(
        &self,
        state: &mut StateDocument,
        _outcome: &HandlerOutcome,
        blueprint: &Path,
        os: &Os,
        is_revert: bool,
    ) {
        if is_revert {
            state.remove_known_host(&self.payload.host, blueprint, os.tag());
        } else {
            state.upsert_known_host(KnownHostEntry {
                host: self.payload.host.clone(),
                blueprint: blueprint.to_path_buf(),
                os: os.tag().to_string(),
                added_at: Utc::now(),
            });
        }
    }
}

/// Removes every known_hosts line matching `host`, using ssh-keygen's own
/// hashed-host matching semantics is out of scope here; instead this does a
/// plain textual filter, mirroring what `ssh-keygen -R` does for unhashed
/// entries.
pub(crate) fn remove_known_host_lines(home: &Path, host: &str) -> Result<(), HandlerError> {
    let path = known_hosts_path(home);
    let existing = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(HandlerError::io(&path, e)),
    };

    let filtered: Vec<&str> = existing
        .lines()
        .filter(|line| !line.split_whitespace().next().map(|h| h == host).unwrap_or(false))
        .collect();
    let mut contents = filtered.join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }
    std::fs::write(&path, contents).map_err(|e| HandlerError::io(&path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_shell::FakeExecutor;
    use bp_shell::ExecOutput;

    #[test]
    fn apply_appends_new_host_key_deduplicated() {
        let dir = tempfile::tempdir().unwrap();

        let exec = FakeExecutor::new();
        exec.push_output(ExecOutput {
            stdout: "github.com ssh-rsa AAAA\n".to_string(),
            stderr: String::new(),
            success: true,
        });
        let passwords = crate::PasswordCache::new();
        let git = crate::git_client::ShellGitClient::new(&exec);
        let ctx = HandlerContext {
            base_dir: dir.path(),
            home: dir.path(),
            os: &Os::Linux,
            executor: &exec,
            passwords: &passwords,
            git: &git,
        };

        let handler = KnownHostsHandler::new(KnownHostsPayload { host: "github.com".into(), key_type: None });
        handler.apply(&ctx).unwrap();

        let contents = std::fs::read_to_string(dir.path().join(".ssh/known_hosts")).unwrap();
        assert!(contents.contains("github.com ssh-rsa AAAA"));
    }
}
