// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The common capability set every action handler implements, plus the
//! optional capabilities (`RequiresSudo`, `ExpectedOutputDetails`) that
//! only some variants opt into.

use std::collections::BTreeMap;
use std::path::Path;

use bp_core::{Os, Rule};
use bp_shell::CommandExecutor;
use bp_storage::StateDocument;

use crate::error::HandlerError;
use crate::git_client::GitClient;
use crate::password_cache::PasswordCache;

/// Shared, read-only dependencies every handler needs to act.
pub struct HandlerContext<'a> {
    /// Directory relative paths in the blueprint resolve against (the
    /// blueprint's own directory).
    pub base_dir: &'a Path,
    pub home: &'a Path,
    pub os: &'a Os,
    pub executor: &'a dyn CommandExecutor,
    pub passwords: &'a PasswordCache,
    pub git: &'a dyn GitClient,
}

/// The result of a successful `apply`/`revert` call: captured output and a
/// short human-readable detail used for the run's display line and for
/// `update_state`.
#[derive(Debug, Clone, Default)]
pub struct HandlerOutcome {
    pub stdout: String,
    pub stderr: String,
    pub detail: String,
    /// Handler-specific data that belongs in the state entry but doesn't
    /// fit `detail` (e.g. the clone handler's resulting commit id).
    pub extra: BTreeMap<String, String>,
}

impl HandlerOutcome {
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// The capability set every handler variant implements.
pub trait Handler {
    fn apply(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError>;
    fn revert(&self, ctx: &HandlerContext) -> Result<HandlerOutcome, HandlerError>;
    fn command_preview(&self, ctx: &HandlerContext, is_revert: bool) -> String;
    fn display_summary(&self) -> String;
    /// The secondary key used when a rule has no explicit `id:` — e.g. the
    /// first package name, the clone destination, the keyring name.
    fn dependency_key(&self) -> String;

    /// Synthesizes `uninstall` rules for this handler's own state entries
    /// that belong to `blueprint`+`os` and no longer appear in `current_rules`.
    fn find_stale_in_state(
        &self,
        state: &StateDocument,
        current_rules: &[Rule],
        blueprint: &Path,
        os: &Os,
    ) -> Vec<Rule>;

    /// Applies the effect of a successful `apply`/`revert` to `state`.
    fn update_state(
        &self,
        state: &mut StateDocument,
        outcome: &HandlerOutcome,
        blueprint: &Path,
        os: &Os,
        is_revert: bool,
    );
}

/// Opt-in capability: does this rule require elevated privileges to apply?
pub trait RequiresSudo {
    fn requires_sudo(&self, os: &Os) -> bool;
}

/// Opt-in capability: a human-readable description of what successful
/// output should look like, for status lines that don't echo raw stdout.
pub trait ExpectedOutputDetails {
    fn expected_output_details(&self, is_revert: bool) -> String;
}

/// True when the current user is root (UID 0) on a unix host.
#[cfg(unix)]
pub fn running_as_root() -> bool {
    nix::unistd::getuid().is_root()
}

#[cfg(not(unix))]
pub fn running_as_root() -> bool {
    false
}
